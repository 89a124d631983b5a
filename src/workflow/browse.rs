// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Feature-branch tree browsing for the default binding.

use tracing::{debug, warn};

use super::{Engine, default_binding};
use crate::error::{ZeedasError, ZeedasResult, bad_input};
use crate::model::branch::feature_branch;
use crate::provider::TreeEntry;

/// Precondition errors pass through; provider failures get a fixed message.
fn flatten(err: ZeedasError, message: &str) -> ZeedasError {
    match err {
        ZeedasError::BadInputFormat(_) => err,
        other => {
            warn!(error = %other, "{message}");
            bad_input(message)
        }
    }
}

impl Engine {
    /// Entries under `path` on the module's feature branch.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` ("Failed to fetch trees") if the listing fails.
    pub async fn branch_tree(
        &self,
        app: &str,
        module: &str,
        path: &str,
    ) -> ZeedasResult<Vec<TreeEntry>> {
        let (record, gateway) = self.load_default(app).await?;
        let access = default_binding(&record)?.access()?;
        gateway
            .list_tree(access, &feature_branch(module), path)
            .await
            .map_err(|e| flatten(e, "Failed to fetch trees"))
    }

    /// The single file entry at `path` on the module's feature branch.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` ("Failed to fetch trees") if the lookup fails or the
    /// file does not exist.
    pub async fn branch_file(&self, app: &str, module: &str, path: &str) -> ZeedasResult<TreeEntry> {
        let (record, gateway) = self.load_default(app).await?;
        let access = default_binding(&record)?.access()?;
        gateway
            .read_file(access, &feature_branch(module), path)
            .await
            .map_err(|e| flatten(e, "Failed to fetch trees"))
    }

    /// Commit an empty file at `path` on the module's feature branch.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` ("Failed to add path to tree") if the commit fails.
    pub async fn add_to_tree(&self, app: &str, module: &str, path: &str) -> ZeedasResult<()> {
        let (record, gateway) = self.load_default(app).await?;
        let access = default_binding(&record)?.access()?;
        let branch = feature_branch(module);
        gateway
            .write_empty_file(access, &branch, path)
            .await
            .map_err(|e| flatten(e, "Failed to add path to tree"))?;
        debug!(app, module, path, "added empty file");
        Ok(())
    }
}
