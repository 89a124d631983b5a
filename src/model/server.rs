// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deployment server connection profile.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the executor authenticates against the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMechanism {
    Password,
    PrivateKey,
}

impl fmt::Display for AuthMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password => write!(f, "password"),
            Self::PrivateKey => write!(f, "private-key"),
        }
    }
}

/// Secret material, tagged by mechanism. Exactly one secret is ever stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mechanism", rename_all = "kebab-case")]
pub enum ServerAuth {
    Password { password: String },
    PrivateKey { key: String },
}

impl ServerAuth {
    #[must_use]
    pub const fn mechanism(&self) -> AuthMechanism {
        match self {
            Self::Password { .. } => AuthMechanism::Password,
            Self::PrivateKey { .. } => AuthMechanism::PrivateKey,
        }
    }
}

impl fmt::Debug for ServerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerAuth")
            .field("mechanism", &self.mechanism())
            .field("secret", &"[hidden]")
            .finish()
    }
}

/// Commands run after checkout on a full deploy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commands {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
}

impl Commands {
    /// `<build> && <run>`, joining whichever of the two are configured.
    #[must_use]
    pub fn build_and_run(&self) -> Option<String> {
        let parts: Vec<&str> = [self.build.as_deref(), self.run.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" && "))
    }
}

/// Where and how to deploy an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProfile {
    pub host: String,
    pub user: String,
    pub auth: ServerAuth,
    pub path: String,
    #[serde(default)]
    pub commands: Commands,
}

/// A host name usable as a single command-line operand: non-empty, no
/// leading `-`, no whitespace or control characters.
#[must_use]
pub fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && !host.starts_with('-')
        && !host.chars().any(|c| c.is_whitespace() || c.is_control())
}
