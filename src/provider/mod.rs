// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hosting provider gateways.
//!
//! ```text
//!                    dyn ProviderGateway
//!        +-----------------+-----------------+
//!        v                 v                 v
//!   GithubGateway     GitlabGateway    BitbucketGateway
//!   v3 REST, token    v4 REST, bearer  2.0 REST, bearer
//!                                      refresh-token grant
//!                                      raw diff -> diff.rs
//!
//! required:  exchange_auth_code, list_repositories, resolve_clone_url,
//!            head_commit, branch_head, branch_exists, create_branch,
//!            list_tree, write_empty_file, open_review, find_open_review,
//!            list_review_commits, diff_for_commit, merge_review
//! provided:  check_branch, ensure_baselines, create_feature_branch,
//!            read_file
//! ```
//!
//! Every failure leaving a gateway is `InvalidAccessCredentials` carrying
//! the provider's own message (see [`crate::error::ProviderError`]).

pub mod bitbucket;
pub mod diff;
pub mod github;
pub mod gitlab;
pub(crate) mod http;
pub mod types;


use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::types::ProvidersConfig;
use crate::error::{ZeedasResult, bad_input, not_found};
use crate::model::branch::{MAIN_BRANCH, QA_BRANCH, feature_branch};
use crate::model::{Provider, RepoAccess, ReviewId};

pub use bitbucket::BitbucketGateway;
pub use github::GithubGateway;
pub use gitlab::GitlabGateway;
pub use types::{CommitRef, EntryKind, FileDiff, Repository, TokenPair, TreeEntry};

/// Capability contract shared by all hosting providers.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    fn provider(&self) -> Provider;

    /// Whether access tokens expire and must be refreshed before use.
    fn tokens_expire(&self) -> bool {
        false
    }

    /// Complete the OAuth authorization-code flow.
    async fn exchange_auth_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> ZeedasResult<TokenPair>;

    /// Trade a refresh token for a new token pair.
    async fn refresh_access_token(&self, _refresh_token: &str) -> ZeedasResult<TokenPair> {
        Err(bad_input(format!(
            "{} does not support token refresh",
            self.provider()
        )))
    }

    /// Repositories the token's identity administers. Single page, at most 100.
    async fn list_repositories(&self, token: &str) -> ZeedasResult<Vec<Repository>>;

    /// Canonical clone URL for `repo.project`.
    async fn resolve_clone_url(&self, repo: RepoAccess<'_>) -> ZeedasResult<String>;

    /// Commit id the repository's default line currently points at.
    async fn head_commit(&self, repo: RepoAccess<'_>) -> ZeedasResult<String>;

    /// Commit id `branch` currently points at.
    async fn branch_head(&self, repo: RepoAccess<'_>, branch: &str) -> ZeedasResult<String>;

    async fn branch_exists(&self, repo: RepoAccess<'_>, name: &str) -> ZeedasResult<bool>;

    async fn create_branch(&self, repo: RepoAccess<'_>, name: &str, sha: &str)
    -> ZeedasResult<()>;

    /// Entries directly under `path` on `branch` (`""` is the root).
    async fn list_tree(
        &self,
        repo: RepoAccess<'_>,
        branch: &str,
        path: &str,
    ) -> ZeedasResult<Vec<TreeEntry>>;

    /// Commit a zero-byte file at `path` on `branch`.
    async fn write_empty_file(
        &self,
        repo: RepoAccess<'_>,
        branch: &str,
        path: &str,
    ) -> ZeedasResult<()>;

    async fn open_review(
        &self,
        repo: RepoAccess<'_>,
        source: &str,
        target: &str,
        title: &str,
    ) -> ZeedasResult<ReviewId>;

    /// An already open review from `source` into `target`, if any.
    async fn find_open_review(
        &self,
        repo: RepoAccess<'_>,
        source: &str,
        target: &str,
    ) -> ZeedasResult<Option<ReviewId>>;

    /// Commits of a review in provider enumeration order.
    async fn list_review_commits(
        &self,
        repo: RepoAccess<'_>,
        review: &ReviewId,
    ) -> ZeedasResult<Vec<CommitRef>>;

    async fn diff_for_commit(
        &self,
        repo: RepoAccess<'_>,
        commit: &CommitRef,
    ) -> ZeedasResult<Vec<FileDiff>>;

    async fn merge_review(&self, repo: RepoAccess<'_>, review: &ReviewId) -> ZeedasResult<()>;

    /// Like [`branch_exists`](Self::branch_exists), but a failed lookup counts
    /// as absent so callers can fall through to creation.
    async fn check_branch(&self, repo: RepoAccess<'_>, name: &str) -> bool {
        match self.branch_exists(repo, name).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(provider = %self.provider(), branch = name, error = %e, "branch lookup failed");
                false
            }
        }
    }

    /// Create QA and MAIN baselines from the head commit where missing.
    async fn ensure_baselines(&self, repo: RepoAccess<'_>) -> ZeedasResult<()> {
        let mut head: Option<String> = None;
        for branch in [QA_BRANCH, MAIN_BRANCH] {
            if self.check_branch(repo, branch).await {
                continue;
            }
            let sha = match &head {
                Some(sha) => sha.clone(),
                None => {
                    let sha = self.head_commit(repo).await?;
                    head = Some(sha.clone());
                    sha
                }
            };
            self.create_branch(repo, branch, &sha).await?;
            info!(provider = %self.provider(), project = repo.project, branch, "created baseline branch");
        }
        Ok(())
    }

    /// Best effort: create `<module>-zeedas` off QA if it does not exist.
    /// Returns whether a branch was created.
    async fn create_feature_branch(&self, repo: RepoAccess<'_>, module: &str) -> bool {
        let branch = feature_branch(module);
        if self.check_branch(repo, &branch).await {
            debug!(provider = %self.provider(), branch = %branch, "feature branch already exists");
            return false;
        }
        let created = async {
            let sha = self.branch_head(repo, QA_BRANCH).await?;
            self.create_branch(repo, &branch, &sha).await
        }
        .await;
        match created {
            Ok(()) => {
                info!(provider = %self.provider(), branch = %branch, "created feature branch");
                true
            }
            Err(e) => {
                warn!(provider = %self.provider(), branch = %branch, error = %e, "could not create feature branch");
                false
            }
        }
    }

    /// Single file entry at `path` on `branch`.
    async fn read_file(
        &self,
        repo: RepoAccess<'_>,
        branch: &str,
        path: &str,
    ) -> ZeedasResult<TreeEntry> {
        let wanted = path.trim_matches('/');
        let parent = wanted.rsplit_once('/').map_or("", |(dir, _)| dir);
        self.list_tree(repo, branch, parent)
            .await?
            .into_iter()
            .find(|e| e.kind == EntryKind::File && e.path.trim_matches('/') == wanted)
            .ok_or_else(|| not_found(format!("{wanted} not found on {branch}")))
    }
}

/// The gateway set the engine selects from, one per provider.
#[derive(Clone, Default)]
pub struct Gateways {
    inner: BTreeMap<Provider, Arc<dyn ProviderGateway>>,
}

impl Gateways {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the gateway for its provider.
    #[must_use]
    pub fn with(mut self, gateway: Arc<dyn ProviderGateway>) -> Self {
        self.inner.insert(gateway.provider(), gateway);
        self
    }

    /// Real REST gateways for all three providers.
    #[must_use]
    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self::new()
            .with(Arc::new(GithubGateway::new(&config.github)))
            .with(Arc::new(GitlabGateway::new(&config.gitlab)))
            .with(Arc::new(BitbucketGateway::new(&config.bitbucket)))
    }

    /// Gateway for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `BadInputFormat` if no gateway is registered for `provider`.
    pub fn get(&self, provider: Provider) -> ZeedasResult<Arc<dyn ProviderGateway>> {
        self.inner
            .get(&provider)
            .cloned()
            .ok_or_else(|| bad_input(format!("{provider} is not supported")))
    }
}

impl fmt::Debug for Gateways {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.keys()).finish()
    }
}
