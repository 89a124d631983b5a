// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for zeedas-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. --ini FILE (repeatable, required)
//! 3. zeedas.toml (cwd, optional)
//! 4. ZEEDAS_* env vars
//! 5. --set KEY=VALUE
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! ZEEDAS_STORE__PATH=/var/lib/zeedas.json      → store.path
//! ZEEDAS_PROVIDERS__GITHUB__CLIENT_ID=abc      → providers.github.client_id
//! ZEEDAS_DEPLOY__PING_TIMEOUT_SECS=5           → deploy.ping_timeout_secs
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{DeployConfig, GlobalConfig, ProvidersConfig, StoreConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Record and snapshot storage.
    pub store: StoreConfig,
    /// Hosting provider OAuth apps and endpoints.
    pub providers: ProvidersConfig,
    /// Remote deployment settings.
    pub deploy: DeployConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use zeedas_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("config/default.toml")
    ///     .add_toml_file_optional("zeedas.toml")
    ///     .with_env_prefix("ZEEDAS")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Reject values the rest of the crate cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.deploy.ping_timeout_secs == 0 {
            return Err(invalid("deploy", "ping_timeout_secs", "must be at least 1").into());
        }
        if self.deploy.ssh_port == 0 {
            return Err(invalid("deploy", "ssh_port", "must be a valid TCP port").into());
        }
        let endpoints = [
            ("providers.github", "api_url", &self.providers.github.api_url),
            ("providers.github", "oauth_url", &self.providers.github.oauth_url),
            ("providers.gitlab", "api_url", &self.providers.gitlab.api_url),
            ("providers.gitlab", "oauth_url", &self.providers.gitlab.oauth_url),
            ("providers.bitbucket", "api_url", &self.providers.bitbucket.api_url),
            ("providers.bitbucket", "oauth_url", &self.providers.bitbucket.oauth_url),
            ("providers.bitbucket", "web_url", &self.providers.bitbucket.web_url),
        ];
        for (section, key, url) in endpoints {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(section, key, &format!("'{url}' is not an http(s) URL")).into());
            }
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Client secrets are shown as `[hidden]`. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_store_options(&mut options);
        self.format_provider_options(&mut options);
        self.format_deploy_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global.log_file.display().to_string(),
        );
        options.insert("global.log_json".into(), self.global.log_json.to_string());
    }

    fn format_store_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("store.path".into(), self.store.path.display().to_string());
        options.insert(
            "store.artifacts_dir".into(),
            self.store.artifacts_dir.display().to_string(),
        );
        if !self.store.artifacts_base_url.is_empty() {
            options.insert(
                "store.artifacts_base_url".into(),
                self.store.artifacts_base_url.clone(),
            );
        }
    }

    fn format_provider_options(&self, options: &mut BTreeMap<String, String>) {
        let hide = |secret: &str| {
            if secret.is_empty() {
                String::new()
            } else {
                "[hidden]".to_string()
            }
        };

        let github = &self.providers.github;
        options.insert("providers.github.client_id".into(), github.client_id.clone());
        options.insert(
            "providers.github.client_secret".into(),
            hide(&github.client_secret),
        );
        options.insert("providers.github.api_url".into(), github.api_url.clone());
        options.insert("providers.github.oauth_url".into(), github.oauth_url.clone());
        options.insert("providers.github.user_agent".into(), github.user_agent.clone());

        let gitlab = &self.providers.gitlab;
        options.insert("providers.gitlab.client_id".into(), gitlab.client_id.clone());
        options.insert(
            "providers.gitlab.client_secret".into(),
            hide(&gitlab.client_secret),
        );
        options.insert("providers.gitlab.api_url".into(), gitlab.api_url.clone());
        options.insert("providers.gitlab.oauth_url".into(), gitlab.oauth_url.clone());

        let bitbucket = &self.providers.bitbucket;
        options.insert(
            "providers.bitbucket.client_id".into(),
            bitbucket.client_id.clone(),
        );
        options.insert(
            "providers.bitbucket.client_secret".into(),
            hide(&bitbucket.client_secret),
        );
        options.insert("providers.bitbucket.api_url".into(), bitbucket.api_url.clone());
        options.insert(
            "providers.bitbucket.oauth_url".into(),
            bitbucket.oauth_url.clone(),
        );
        options.insert("providers.bitbucket.web_url".into(), bitbucket.web_url.clone());
    }

    fn format_deploy_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "deploy.scratch_dir".into(),
            self.deploy.scratch_dir.display().to_string(),
        );
        options.insert(
            "deploy.ping_timeout_secs".into(),
            self.deploy.ping_timeout_secs.to_string(),
        );
        options.insert("deploy.ssh_port".into(), self.deploy.ssh_port.to_string());
        options.insert(
            "deploy.connect_timeout_secs".into(),
            self.deploy.connect_timeout_secs.to_string(),
        );
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
