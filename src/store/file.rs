// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-document JSON store.
//!
//! ```text
//! open(path) --> read whole document (missing file = empty)
//!     |
//!     v
//! Mutex<Document> --mutate--> serialize --> NamedTempFile --> persist (rename)
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::{CredentialStore, ReviewStore};
use crate::error::StoreError;
use crate::model::{AppCredential, ReviewRecord};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    credentials: BTreeMap<String, AppCredential>,
    #[serde(default)]
    reviews: Vec<ReviewRecord>,
}

/// Credential and review store persisted to one JSON file.
///
/// Every mutation rewrites the document through a temporary file in the
/// same directory, so readers never observe a torn write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<Document>,
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing contents if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Document::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(io_error(&path, e)),
        };
        debug!(
            path = %path.display(),
            apps = document.credentials.len(),
            reviews = document.reviews.len(),
            "opened store"
        );
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    tmp.write_all(bytes).map_err(|e| io_error(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| io_error(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

#[async_trait]
impl CredentialStore for JsonFileStore {
    async fn find_by_app(&self, app: &str) -> Result<Option<AppCredential>, StoreError> {
        Ok(self.document.lock().await.credentials.get(app).cloned())
    }

    async fn save(&self, record: &AppCredential) -> Result<(), StoreError> {
        if !record.bindings_valid() {
            return Err(StoreError::Validation(format!(
                "app '{}' has malformed repository bindings",
                record.app
            )));
        }
        let mut document = self.document.lock().await;
        let mut next = document.clone();
        next.credentials.insert(record.app.clone(), record.clone());
        self.persist(&next).await?;
        *document = next;
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for JsonFileStore {
    async fn find(&self, app: &str, module: &str) -> Result<Option<ReviewRecord>, StoreError> {
        Ok(self
            .document
            .lock()
            .await
            .reviews
            .iter()
            .find(|r| r.app == app && r.module == module)
            .cloned())
    }

    async fn save(&self, record: &ReviewRecord) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        let mut next = document.clone();
        match next
            .reviews
            .iter_mut()
            .find(|r| r.app == record.app && r.module == record.module)
        {
            Some(existing) => *existing = record.clone(),
            None => next.reviews.push(record.clone()),
        }
        self.persist(&next).await?;
        *document = next;
        Ok(())
    }

    async fn delete(&self, app: &str, module: &str) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        if !document
            .reviews
            .iter()
            .any(|r| r.app == app && r.module == module)
        {
            return Ok(());
        }
        let mut next = document.clone();
        next.reviews.retain(|r| !(r.app == app && r.module == module));
        self.persist(&next).await?;
        *document = next;
        Ok(())
    }
}
