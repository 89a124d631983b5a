// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bitbucket Cloud 2.0 gateway.
//!
//! ```text
//! POST {oauth_url}   basic(client_id, secret)  grant_type=authorization_code
//!                                              grant_type=refresh_token
//! GET  repositories?role=admin&pagelen=100
//! GET  repositories/{p}                        -> {web_url}/{full_name}.git
//! GET  repositories/{p}/commits?pagelen=1      head
//! GET  repositories/{p}/refs/branches/{b}      head / exists
//! POST repositories/{p}/refs/branches
//! GET  repositories/{p}/src/{b}/{path}/        commit_file | commit_directory
//! POST repositories/{p}/src                    form: message, branch, <path>=""
//! POST repositories/{p}/pullrequests
//! GET  repositories/{p}/pullrequests?state=OPEN&q=...
//! GET  repositories/{p}/pullrequests/{id}/commits
//! GET  repositories/{p}/diff/{hash}            raw text -> diff::split_unified_diff
//! POST repositories/{p}/pullrequests/{id}/merge
//! ```
//!
//! Access tokens expire, so the workflow refreshes them before each
//! operation (see [`ProviderGateway::tokens_expire`]).

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use super::ProviderGateway;
use super::diff::split_unified_diff;
use super::http::{self, OAuthTokenResponse};
use super::types::{CommitRef, FileDiff, Repository, TokenPair, TreeEntry};
use crate::config::types::BitbucketConfig;
use crate::error::{ProviderError, ZeedasResult};
use crate::model::branch::add_file_message;
use crate::model::{Provider, RepoAccess, ReviewId};
use crate::net::global_client;

#[derive(Debug, Clone)]
pub struct BitbucketGateway {
    client: Client,
    config: BitbucketConfig,
}

impl BitbucketGateway {
    #[must_use]
    pub fn new(config: &BitbucketConfig) -> Self {
        Self {
            client: global_client().clone(),
            config: config.clone(),
        }
    }

    fn api(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    fn repo_url(&self, project: &str, path: &str) -> String {
        if path.is_empty() {
            format!("{}/repositories/{project}", self.api())
        } else {
            format!("{}/repositories/{project}/{path}", self.api())
        }
    }

    fn repo_request(&self, method: Method, repo: RepoAccess<'_>, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.repo_url(repo.project, path))
            .bearer_auth(repo.token)
    }

    async fn token_grant(&self, form: &[(&str, &str)]) -> ZeedasResult<TokenPair> {
        let response: OAuthTokenResponse = http::send_json(
            self.client
                .post(&self.config.oauth_url)
                .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
                .form(form),
        )
        .await?;
        Ok(response.into_pair()?)
    }
}

#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

#[derive(Deserialize)]
struct RepoItem {
    full_name: String,
    name: String,
}

#[derive(Deserialize)]
struct CommitItem {
    hash: String,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Deserialize)]
struct BranchTarget {
    hash: String,
}

#[derive(Deserialize)]
struct BranchItem {
    target: BranchTarget,
}

#[derive(Deserialize)]
struct SourceItem {
    #[serde(rename = "type")]
    kind: String,
    path: String,
}

#[derive(Deserialize)]
struct PullItem {
    id: u64,
}

#[async_trait]
impl ProviderGateway for BitbucketGateway {
    fn provider(&self) -> Provider {
        Provider::Bitbucket
    }

    fn tokens_expire(&self) -> bool {
        true
    }

    async fn exchange_auth_code(
        &self,
        code: &str,
        _redirect_uri: Option<&str>,
    ) -> ZeedasResult<TokenPair> {
        self.token_grant(&[("grant_type", "authorization_code"), ("code", code)])
            .await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> ZeedasResult<TokenPair> {
        self.token_grant(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn list_repositories(&self, token: &str) -> ZeedasResult<Vec<Repository>> {
        let page: Page<RepoItem> = http::send_json(
            self.client
                .get(format!("{}/repositories", self.api()))
                .bearer_auth(token)
                .query(&[("role", "admin"), ("pagelen", "100")]),
        )
        .await?;
        Ok(page
            .values
            .into_iter()
            .map(|r| Repository {
                id: r.full_name,
                name: r.name,
            })
            .collect())
    }

    async fn resolve_clone_url(&self, repo: RepoAccess<'_>) -> ZeedasResult<String> {
        let info: RepoItem = http::send_json(self.repo_request(Method::GET, repo, "")).await?;
        Ok(format!(
            "{}/{}.git",
            self.config.web_url.trim_end_matches('/'),
            info.full_name
        ))
    }

    async fn head_commit(&self, repo: RepoAccess<'_>) -> ZeedasResult<String> {
        let page: Page<CommitItem> = http::send_json(
            self.repo_request(Method::GET, repo, "commits")
                .query(&[("pagelen", "1")]),
        )
        .await?;
        page.values.into_iter().next().map(|c| c.hash).ok_or_else(|| {
            ProviderError::Rejected(format!("{} has no commits", repo.project)).into()
        })
    }

    async fn branch_head(&self, repo: RepoAccess<'_>, branch: &str) -> ZeedasResult<String> {
        let found: BranchItem = http::send_json(self.repo_request(
            Method::GET,
            repo,
            &format!("refs/branches/{branch}"),
        ))
        .await?;
        Ok(found.target.hash)
    }

    async fn branch_exists(&self, repo: RepoAccess<'_>, name: &str) -> ZeedasResult<bool> {
        Ok(http::exists(self.repo_request(
            Method::GET,
            repo,
            &format!("refs/branches/{name}"),
        ))
        .await?)
    }

    async fn create_branch(
        &self,
        repo: RepoAccess<'_>,
        name: &str,
        sha: &str,
    ) -> ZeedasResult<()> {
        let body = json!({ "name": name, "target": { "hash": sha } });
        http::send_unit(
            self.repo_request(Method::POST, repo, "refs/branches")
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn list_tree(
        &self,
        repo: RepoAccess<'_>,
        branch: &str,
        path: &str,
    ) -> ZeedasResult<Vec<TreeEntry>> {
        let path = path.trim_matches('/');
        let location = if path.is_empty() {
            format!("src/{branch}/")
        } else {
            format!("src/{branch}/{path}/")
        };
        let page: Page<SourceItem> = http::send_json(
            self.repo_request(Method::GET, repo, &location)
                .query(&[("pagelen", "100")]),
        )
        .await?;
        Ok(page
            .values
            .into_iter()
            .filter_map(|item| match item.kind.as_str() {
                "commit_directory" => Some(TreeEntry::dir(item.path)),
                "commit_file" => {
                    let url = format!(
                        "{}?access_token={}",
                        self.repo_url(repo.project, &format!("src/{branch}/{}", item.path)),
                        urlencoding::encode(repo.token),
                    );
                    Some(TreeEntry::file(item.path, url))
                }
                _ => None,
            })
            .collect())
    }

    async fn write_empty_file(
        &self,
        repo: RepoAccess<'_>,
        branch: &str,
        path: &str,
    ) -> ZeedasResult<()> {
        let message = add_file_message(branch);
        let path = path.trim_matches('/');
        http::send_unit(self.repo_request(Method::POST, repo, "src").form(&[
            ("message", message.as_str()),
            ("branch", branch),
            (path, ""),
        ]))
        .await?;
        Ok(())
    }

    async fn open_review(
        &self,
        repo: RepoAccess<'_>,
        source: &str,
        target: &str,
        title: &str,
    ) -> ZeedasResult<ReviewId> {
        let body = json!({
            "title": title,
            "source": { "branch": { "name": source } },
            "destination": { "branch": { "name": target } },
        });
        let pull: PullItem = http::send_json(
            self.repo_request(Method::POST, repo, "pullrequests")
                .json(&body),
        )
        .await?;
        Ok(ReviewId::from(pull.id))
    }

    async fn find_open_review(
        &self,
        repo: RepoAccess<'_>,
        source: &str,
        target: &str,
    ) -> ZeedasResult<Option<ReviewId>> {
        let filter =
            format!(r#"source.branch.name="{source}" AND destination.branch.name="{target}""#);
        let page: Page<PullItem> = http::send_json(
            self.repo_request(Method::GET, repo, "pullrequests")
                .query(&[("state", "OPEN"), ("q", filter.as_str())]),
        )
        .await?;
        Ok(page.values.first().map(|p| ReviewId::from(p.id)))
    }

    async fn list_review_commits(
        &self,
        repo: RepoAccess<'_>,
        review: &ReviewId,
    ) -> ZeedasResult<Vec<CommitRef>> {
        let page: Page<CommitItem> = http::send_json(self.repo_request(
            Method::GET,
            repo,
            &format!("pullrequests/{review}/commits"),
        ))
        .await?;
        Ok(page
            .values
            .into_iter()
            .map(|c| CommitRef {
                id: c.hash,
                created_at: c.date,
            })
            .collect())
    }

    async fn diff_for_commit(
        &self,
        repo: RepoAccess<'_>,
        commit: &CommitRef,
    ) -> ZeedasResult<Vec<FileDiff>> {
        let text = http::send_text(self.repo_request(
            Method::GET,
            repo,
            &format!("diff/{}", commit.id),
        ))
        .await?;
        Ok(split_unified_diff(&text))
    }

    async fn merge_review(&self, repo: RepoAccess<'_>, review: &ReviewId) -> ZeedasResult<()> {
        http::send_unit(self.repo_request(
            Method::POST,
            repo,
            &format!("pullrequests/{review}/merge"),
        ))
        .await?;
        Ok(())
    }
}
