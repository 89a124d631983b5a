// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory credential and review store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{CredentialStore, ReviewStore};
use crate::error::StoreError;
use crate::model::{AppCredential, ReviewRecord};

#[derive(Debug, Default)]
struct Tables {
    credentials: HashMap<String, AppCredential>,
    reviews: HashMap<(String, String), ReviewRecord>,
}

/// Process-local store backing both traits. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of open review records.
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.tables().reviews.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_app(&self, app: &str) -> Result<Option<AppCredential>, StoreError> {
        Ok(self.tables().credentials.get(app).cloned())
    }

    async fn save(&self, record: &AppCredential) -> Result<(), StoreError> {
        if !record.bindings_valid() {
            return Err(StoreError::Validation(format!(
                "app '{}' has malformed repository bindings",
                record.app
            )));
        }
        self.tables()
            .credentials
            .insert(record.app.clone(), record.clone());
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn find(&self, app: &str, module: &str) -> Result<Option<ReviewRecord>, StoreError> {
        Ok(self
            .tables()
            .reviews
            .get(&(app.to_string(), module.to_string()))
            .cloned())
    }

    async fn save(&self, record: &ReviewRecord) -> Result<(), StoreError> {
        self.tables().reviews.insert(
            (record.app.clone(), record.module.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn delete(&self, app: &str, module: &str) -> Result<(), StoreError> {
        self.tables()
            .reviews
            .remove(&(app.to_string(), module.to_string()));
        Ok(())
    }
}
