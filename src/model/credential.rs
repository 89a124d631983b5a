// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Application credential records and repository bindings.

use serde::{Deserialize, Serialize};

use super::{Provider, ServerProfile};
use crate::error::{ZeedasResult, bad_input};

/// Association between an application and one provider's repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryBinding {
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub default: bool,
}

/// Borrowed project + token pair handed to provider gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoAccess<'a> {
    pub project: &'a str,
    pub token: &'a str,
}

impl RepositoryBinding {
    /// An unconfigured slot for `provider`.
    #[must_use]
    pub const fn empty(provider: Provider) -> Self {
        Self {
            provider,
            url: None,
            project: None,
            access_token: None,
            refresh_token: None,
            default: false,
        }
    }

    /// Whether a repository has been bound to this slot.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// The stored access token, if the provider has been integrated.
    ///
    /// # Errors
    ///
    /// Returns `BadInputFormat` when no access token has been stored.
    pub fn token(&self) -> ZeedasResult<&str> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| bad_input(format!("{} has not been integrated", self.provider)))
    }

    /// Project and token for gateway calls against the bound repository.
    ///
    /// # Errors
    ///
    /// Returns `BadInputFormat` when the slot has no project or token.
    pub fn access(&self) -> ZeedasResult<RepoAccess<'_>> {
        let token = self.token()?;
        let project = self
            .project
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| bad_input(format!("No repository bound for {}", self.provider)))?;
        Ok(RepoAccess { project, token })
    }

    /// Forget everything except the provider slot itself.
    pub fn clear(&mut self) {
        *self = Self::empty(self.provider);
    }
}

/// One record per application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCredential {
    pub app: String,
    pub account: String,
    #[serde(rename = "repository")]
    pub bindings: Vec<RepositoryBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerProfile>,
}

impl AppCredential {
    /// Fresh record with one empty binding per provider and no server.
    #[must_use]
    pub fn initiate(app: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            account: account.into(),
            bindings: Provider::ALL
                .into_iter()
                .map(RepositoryBinding::empty)
                .collect(),
            server: None,
        }
    }

    /// Restore the binding invariants on a record read from storage.
    ///
    /// Duplicate slots are dropped (first wins), missing slots are appended
    /// and, if several bindings claim `default`, only the first keeps it.
    /// Returns `true` when anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.bindings.clone();

        let mut seen_default = false;
        let mut bindings: Vec<RepositoryBinding> = Vec::with_capacity(Provider::ALL.len());
        for mut binding in std::mem::take(&mut self.bindings) {
            if bindings.iter().any(|b| b.provider == binding.provider) {
                continue;
            }
            if binding.default {
                binding.default = !seen_default;
                seen_default = true;
            }
            bindings.push(binding);
        }
        for provider in Provider::ALL {
            if !bindings.iter().any(|b| b.provider == provider) {
                bindings.push(RepositoryBinding::empty(provider));
            }
        }
        bindings.sort_by_key(|b| b.provider);

        self.bindings = bindings;
        self.bindings != before
    }

    /// Binding slot for `provider`.
    #[must_use]
    pub fn binding(&self, provider: Provider) -> Option<&RepositoryBinding> {
        self.bindings.iter().find(|b| b.provider == provider)
    }

    /// Mutable binding slot for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `BadInputFormat` when the record has no slot for `provider`.
    pub fn binding_mut(&mut self, provider: Provider) -> ZeedasResult<&mut RepositoryBinding> {
        self.bindings
            .iter_mut()
            .find(|b| b.provider == provider)
            .ok_or_else(|| bad_input("No config for this provider"))
    }

    /// The binding currently designated as source of truth.
    #[must_use]
    pub fn default_binding(&self) -> Option<&RepositoryBinding> {
        self.bindings.iter().find(|b| b.default)
    }

    /// Make `provider` the only default binding.
    ///
    /// The whole list is rebuilt in one assignment so no observer can see a
    /// state with zero or two defaults in between.
    ///
    /// # Errors
    ///
    /// Returns `BadInputFormat` when the record has no slot for `provider`.
    pub fn set_default_provider(&mut self, provider: Provider) -> ZeedasResult<()> {
        if self.binding(provider).is_none() {
            return Err(bad_input("No config for this provider"));
        }
        self.bindings = self
            .bindings
            .iter()
            .map(|b| RepositoryBinding {
                default: b.provider == provider,
                ..b.clone()
            })
            .collect();
        Ok(())
    }

    /// Clear url, project, tokens and default flag of one slot.
    ///
    /// # Errors
    ///
    /// Returns `BadInputFormat` when the record has no slot for `provider`.
    pub fn reset_binding(&mut self, provider: Provider) -> ZeedasResult<()> {
        self.binding_mut(provider)?.clear();
        Ok(())
    }

    /// Checks the binding invariants: one slot per provider, at most one default.
    #[must_use]
    pub fn bindings_valid(&self) -> bool {
        self.bindings.len() == Provider::ALL.len()
            && Provider::ALL
                .iter()
                .all(|p| self.bindings.iter().filter(|b| b.provider == *p).count() == 1)
            && self.bindings.iter().filter(|b| b.default).count() <= 1
    }
}
