// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistent data model.
//!
//! ```text
//! AppCredential (one per app)
//!   bindings: [GitHub, GitLab, Bitbucket]   <= exactly one slot each
//!              url / project / tokens / default (at most one true)
//!   server:   Option<ServerProfile>
//!              host, user, auth (password | private key), path, commands
//!
//! ReviewRecord (one per app+module while a submission is open)
//!   review_id, submission_count
//!   changes: [FileChange { name, versions: [DiffVersion] }]
//!
//! Branches: <module>-zeedas  ->  qa-zeedas  ->  master-zeedas
//! ```

pub mod branch;
pub mod credential;
pub mod review;
pub mod server;


use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ZeedasError, bad_input};

pub use credential::{AppCredential, RepoAccess, RepositoryBinding};
pub use review::{DiffVersion, FileChange, ReviewId, ReviewRecord};
pub use server::{AuthMechanism, Commands, ServerAuth, ServerProfile, is_valid_host};

/// Supported source-control hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Github,
    Gitlab,
    Bitbucket,
}

impl Provider {
    /// Every supported provider, in binding-slot order.
    pub const ALL: [Self; 3] = [Self::Github, Self::Gitlab, Self::Bitbucket];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Github => write!(f, "GitHub"),
            Self::Gitlab => write!(f, "GitLab"),
            Self::Bitbucket => write!(f, "Bitbucket"),
        }
    }
}

impl FromStr for Provider {
    type Err = ZeedasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Self::Github),
            "gitlab" => Ok(Self::Gitlab),
            "bitbucket" => Ok(Self::Bitbucket),
            _ => Err(bad_input(format!(
                "unknown provider '{s}', expected github, gitlab or bitbucket"
            ))),
        }
    }
}
