// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Review records: this system's own history of an open submission.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-native pull/merge request identifier (GitHub number, GitLab
/// iid, Bitbucket id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub String);

impl From<u64> for ReviewId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One observed version of a changed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffVersion {
    pub path: String,
    pub diff: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub download_url: String,
}

/// All versions recorded for a filename, oldest observation first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub name: String,
    pub versions: Vec<DiffVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub app: String,
    pub module: String,
    pub review_id: ReviewId,
    pub submission_count: u32,
    #[serde(default)]
    pub changes: Vec<FileChange>,
}

/// Last path segment, which keys the change list.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl ReviewRecord {
    #[must_use]
    pub fn new(app: impl Into<String>, module: impl Into<String>, review_id: ReviewId) -> Self {
        Self {
            app: app.into(),
            module: module.into(),
            review_id,
            submission_count: 0,
            changes: Vec::new(),
        }
    }

    /// Whether a version with this exact `(path, diff)` was already recorded.
    #[must_use]
    pub fn has_version(&self, path: &str, diff: &str) -> bool {
        self.changes
            .iter()
            .find(|c| c.name == file_name(path))
            .is_some_and(|c| c.versions.iter().any(|v| v.path == path && v.diff == diff))
    }

    /// Append `version` under its filename. Returns `false` for duplicates.
    pub fn push_version(&mut self, version: DiffVersion) -> bool {
        if self.has_version(&version.path, &version.diff) {
            return false;
        }
        let name = file_name(&version.path);
        match self.changes.iter_mut().find(|c| c.name == name) {
            Some(change) => change.versions.push(version),
            None => self.changes.push(FileChange {
                name: name.to_string(),
                versions: vec![version],
            }),
        }
        true
    }

    /// Total number of recorded versions across all files.
    #[must_use]
    pub fn version_count(&self) -> usize {
        self.changes.iter().map(|c| c.versions.len()).sum()
    }
}
