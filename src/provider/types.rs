// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider-neutral values exchanged across the gateway contract.

use serde::{Deserialize, Serialize};

/// A repository the authenticated identity can administer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Identifier accepted by `bind_repository` (full name or numeric id).
    pub id: String,
    pub name: String,
}

/// Result of an OAuth code exchange or refresh grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// A commit that belongs to an open review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub id: String,
    pub created_at: Option<String>,
}

/// Per-file change extracted from one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub path: String,
    pub diff: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a branch tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub path: String,
    pub name: String,
    /// Only populated for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl TreeEntry {
    #[must_use]
    pub fn file(path: impl Into<String>, download_url: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind: EntryKind::File,
            name: crate::model::review::file_name(&path).to_string(),
            path,
            download_url: Some(download_url.into()),
        }
    }

    #[must_use]
    pub fn dir(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind: EntryKind::Dir,
            name: crate::model::review::file_name(&path).to_string(),
            path,
            download_url: None,
        }
    }
}
