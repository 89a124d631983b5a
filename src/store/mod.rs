// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Storage boundaries.
//!
//! ```text
//!   Engine ----> CredentialStore   find_by_app / find_by_app_account / save
//!          ----> ReviewStore       find / save / delete
//!   Deployer --> LogSink           append / reset (never fails)
//!
//!   impls:  MemoryStore      (tests, embedding)
//!           JsonFileStore    (CLI; one JSON document, atomic replace)
//!           MemoryLogSink / TracingLogSink
//! ```

pub mod file;
pub mod log;
pub mod memory;


use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{AppCredential, ReviewRecord};

pub use file::JsonFileStore;
pub use log::{LogEntry, MemoryLogSink, TracingLogSink};
pub use memory::MemoryStore;

/// Persistence for [`AppCredential`] records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_app(&self, app: &str) -> Result<Option<AppCredential>, StoreError>;

    /// Like [`find_by_app`](Self::find_by_app) but also matches the owning account.
    async fn find_by_app_account(
        &self,
        app: &str,
        account: &str,
    ) -> Result<Option<AppCredential>, StoreError> {
        Ok(self
            .find_by_app(app)
            .await?
            .filter(|record| record.account == account))
    }

    async fn save(&self, record: &AppCredential) -> Result<(), StoreError>;
}

/// Persistence for [`ReviewRecord`]s keyed by `(app, module)`.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find(&self, app: &str, module: &str) -> Result<Option<ReviewRecord>, StoreError>;

    async fn save(&self, record: &ReviewRecord) -> Result<(), StoreError>;

    /// Remove the record. Deleting an absent record is not an error.
    async fn delete(&self, app: &str, module: &str) -> Result<(), StoreError>;
}

/// Ordered, per-application progress stream for deployments.
///
/// Sinks swallow their own failures: a broken log stream must never abort
/// a pipeline.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append(&self, app: &str, message: &str);

    /// Drop prior entries before a fresh pipeline run.
    async fn reset(&self, app: &str);
}
