// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: GlobalConfig, StoreConfig, ProvidersConfig, DeployConfig
//! ProvidersConfig: github / gitlab / bitbucket (OAuth app + base URLs)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;

/// Global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; empty disables file logging.
    pub log_file: PathBuf,
    /// Write the log file as JSON lines.
    pub log_json: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: PathBuf::new(),
            log_json: false,
        }
    }
}

/// Where records and file snapshots live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON document holding credentials and review records.
    pub path: PathBuf,
    /// Root directory for submitted file snapshots.
    pub artifacts_dir: PathBuf,
    /// Public URL prefix under which `artifacts_dir` is served.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub artifacts_base_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("zeedas.json"),
            artifacts_dir: PathBuf::from("public"),
            artifacts_base_url: String::new(),
        }
    }
}

/// OAuth application and API endpoints for GitHub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub api_url: String,
    pub oauth_url: String,
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_url: "https://api.github.com".to_string(),
            oauth_url: "https://github.com/login/oauth/access_token".to_string(),
            user_agent: "Zeedas".to_string(),
        }
    }
}

/// OAuth application and API endpoints for GitLab.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitlabConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub api_url: String,
    pub oauth_url: String,
}

impl Default for GitlabConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_url: "https://gitlab.com/api/v4".to_string(),
            oauth_url: "https://gitlab.com/oauth/token".to_string(),
        }
    }
}

/// OAuth consumer and API endpoints for Bitbucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BitbucketConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub api_url: String,
    pub oauth_url: String,
    /// Base for clone URLs (`<web_url>/<project>.git`).
    pub web_url: String,
}

impl Default for BitbucketConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_url: "https://api.bitbucket.org/2.0".to_string(),
            oauth_url: "https://bitbucket.org/site/oauth2/access_token".to_string(),
            web_url: "https://bitbucket.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvidersConfig {
    pub github: GithubConfig,
    pub gitlab: GitlabConfig,
    pub bitbucket: BitbucketConfig,
}

/// Remote deployment executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// Parent of the per-application scratch key directories.
    pub scratch_dir: PathBuf,
    /// Upper bound for the reachability probe.
    pub ping_timeout_secs: u64,
    pub ssh_port: u16,
    /// Upper bound for establishing the shell session.
    pub connect_timeout_secs: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join("zeedas"),
            ping_timeout_secs: 2,
            ssh_port: 22,
            connect_timeout_secs: 30,
        }
    }
}

impl DeployConfig {
    #[must_use]
    pub const fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
