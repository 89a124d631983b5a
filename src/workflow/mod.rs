// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Review workflow engine.
//!
//! ```text
//!                           Engine
//!   credentials: dyn CredentialStore    reviews: dyn ReviewStore
//!   gateways:    Gateways               artifacts: dyn ArtifactStore
//!   deployer:    Deployer               locks: KeyedLocks (submission, credential)
//!
//! integration.rs   initiate, get, reset, set_default_provider, integrate,
//!                  list_repositories, bind_repository,
//!                  save_server_config, test_server_config
//! review.rs        create_branch, submit, approve, reject,
//!                  test_submission, fetch_submission
//! browse.rs        branch_tree, branch_file, add_to_tree
//!
//! per module:   NoReview --submit--> Submitted --approve/reject--> NoReview
//!                              ^   |                 (record deleted)
//!                              +---+ submit (append new versions)
//! ```
//!
//! The engine only ever talks to the [`ProviderGateway`] selected by the
//! default binding's provider; it never branches on the provider itself.

mod artifact;
mod browse;
mod integration;
mod review;

#[cfg(test)]
pub(crate) mod test_utils;

use bon::Builder;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ZeedasResult, bad_input};
use crate::locks::KeyedLocks;
use crate::model::{AppCredential, Provider, RepositoryBinding};
use crate::provider::{Gateways, ProviderGateway};
use crate::remote::Deployer;
use crate::store::{CredentialStore, ReviewStore};

pub use artifact::{ArtifactStore, LocalArtifactStore};

const NO_APP: &str = "This app does not exist for this team";
const NO_DEFAULT: &str = "No default config set for this app";

/// Dependency-injected workflow engine. One instance serves all apps.
#[derive(Builder)]
pub struct Engine {
    credentials: Arc<dyn CredentialStore>,
    reviews: Arc<dyn ReviewStore>,
    gateways: Gateways,
    artifacts: Arc<dyn ArtifactStore>,
    deployer: Arc<Deployer>,
    #[builder(default)]
    locks: KeyedLocks,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("gateways", &self.gateways)
            .field("deployer", &self.deployer)
            .finish_non_exhaustive()
    }
}

/// The default binding of `record`.
///
/// # Errors
///
/// Returns `BadInputFormat` when no binding is marked default.
fn default_binding(record: &AppCredential) -> ZeedasResult<&RepositoryBinding> {
    record.default_binding().ok_or_else(|| bad_input(NO_DEFAULT))
}

/// Lock key for one submission. The app id is length-prefixed so no
/// (app, module) pair can spell another's key.
fn module_key(app: &str, module: &str) -> String {
    format!("module:{}:{app}/{module}", app.len())
}

/// Lock key for read-modify-write of one credential record.
fn credential_key(app: &str) -> String {
    format!("credential:{app}")
}

impl Engine {
    /// Record for `app`, binding invariants restored in memory.
    async fn load(&self, app: &str) -> ZeedasResult<AppCredential> {
        let mut record = self
            .credentials
            .find_by_app(app)
            .await?
            .ok_or_else(|| bad_input(NO_APP))?;
        if record.normalize() {
            debug!(app, "repaired binding list on load");
        }
        Ok(record)
    }

    /// Record for `app` owned by `account`.
    async fn load_owned(&self, app: &str, account: &str) -> ZeedasResult<AppCredential> {
        let mut record = self
            .credentials
            .find_by_app_account(app, account)
            .await?
            .ok_or_else(|| bad_input("No apps matching this id"))?;
        record.normalize();
        Ok(record)
    }

    /// Record plus the gateway of its default provider, with expiring
    /// tokens refreshed first. Fails before any network call when no
    /// default binding exists.
    async fn load_default(
        &self,
        app: &str,
    ) -> ZeedasResult<(AppCredential, Arc<dyn ProviderGateway>)> {
        let record = self.load(app).await?;
        let provider = default_binding(&record)?.provider;
        let gateway = self.gateways.get(provider)?;
        let record = self.refresh_tokens(record, provider, gateway.as_ref()).await?;
        Ok((record, gateway))
    }

    /// Best-effort refresh for providers whose tokens expire. On success the
    /// new pair is written onto the current stored record, leaving fields
    /// changed since `record` was read intact. On failure the stale token
    /// stays in use.
    async fn refresh_tokens(
        &self,
        record: AppCredential,
        provider: Provider,
        gateway: &dyn ProviderGateway,
    ) -> ZeedasResult<AppCredential> {
        if !gateway.tokens_expire() {
            return Ok(record);
        }
        let Some(refresh) = record
            .binding(provider)
            .and_then(|b| b.refresh_token.clone())
            .filter(|t| !t.is_empty())
        else {
            return Ok(record);
        };

        match gateway.refresh_access_token(&refresh).await {
            Ok(pair) => {
                let _serial = self.locks.lock(&credential_key(&record.app)).await;
                let stored = self.credentials.find_by_app(&record.app).await?;
                let mut current = stored.unwrap_or(record);
                current.normalize();
                let binding = current.binding_mut(provider)?;
                binding.access_token = Some(pair.access_token);
                if pair.refresh_token.is_some() {
                    binding.refresh_token = pair.refresh_token;
                }
                self.credentials.save(&current).await?;
                debug!(app = %current.app, %provider, "refreshed access token");
                Ok(current)
            }
            Err(e) => {
                warn!(app = %record.app, %provider, error = %e, "token refresh failed, using stored token");
                Ok(record)
            }
        }
    }
}
