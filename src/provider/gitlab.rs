// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitLab REST v4 gateway. Projects are addressed by id or by their
//! url-encoded path.
//!
//! ```text
//! POST {oauth_url}                                   authorization_code grant
//! GET  projects?owned=true&per_page=100
//! GET  projects/{p}                                  http_url_to_repo
//! GET  projects/{p}/repository/commits?per_page=1    head
//! GET  projects/{p}/repository/branches/{b}          head / exists
//! POST projects/{p}/repository/branches?branch=&ref=
//! GET  projects/{p}/repository/tree?ref=&path=       blob | tree
//! POST projects/{p}/repository/files/{path}          empty file commit
//! POST projects/{p}/merge_requests                   squash = true
//! GET  projects/{p}/merge_requests?state=opened&...
//! GET  projects/{p}/merge_requests/{iid}/commits
//! GET  projects/{p}/repository/commits/{id}/diff
//! PUT  projects/{p}/merge_requests/{iid}/merge
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use super::ProviderGateway;
use super::http::{self, OAuthTokenResponse};
use super::types::{CommitRef, FileDiff, Repository, TokenPair, TreeEntry};
use crate::config::types::GitlabConfig;
use crate::error::{ProviderError, ZeedasResult};
use crate::model::branch::add_file_message;
use crate::model::{Provider, RepoAccess, ReviewId};
use crate::net::global_client;

#[derive(Debug, Clone)]
pub struct GitlabGateway {
    client: Client,
    config: GitlabConfig,
}

impl GitlabGateway {
    #[must_use]
    pub fn new(config: &GitlabConfig) -> Self {
        Self {
            client: global_client().clone(),
            config: config.clone(),
        }
    }

    fn api(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    fn project_url(&self, project: &str, path: &str) -> String {
        let project = urlencoding::encode(project);
        if path.is_empty() {
            format!("{}/projects/{project}", self.api())
        } else {
            format!("{}/projects/{project}/{path}", self.api())
        }
    }

    fn repo_request(&self, method: Method, repo: RepoAccess<'_>, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.project_url(repo.project, path))
            .bearer_auth(repo.token)
    }

    /// Raw blob URL that carries its own credentials, for artifact downloads.
    fn blob_url(&self, repo: RepoAccess<'_>, blob: &str, branch: &str) -> String {
        format!(
            "{}?access_token={}&ref={}",
            self.project_url(repo.project, &format!("repository/blobs/{blob}/raw")),
            urlencoding::encode(repo.token),
            urlencoding::encode(branch),
        )
    }
}

#[derive(Deserialize)]
struct ProjectItem {
    id: u64,
    name: String,
}

#[derive(Deserialize)]
struct ProjectInfo {
    http_url_to_repo: String,
}

#[derive(Deserialize)]
struct CommitItem {
    id: String,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct BranchItem {
    commit: CommitItem,
}

#[derive(Deserialize)]
struct TreeItem {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    path: String,
}

#[derive(Deserialize)]
struct MergeRequestItem {
    iid: u64,
}

#[derive(Deserialize)]
struct DiffItem {
    new_path: String,
    #[serde(default)]
    diff: String,
}

#[async_trait]
impl ProviderGateway for GitlabGateway {
    fn provider(&self) -> Provider {
        Provider::Gitlab
    }

    async fn exchange_auth_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> ZeedasResult<TokenPair> {
        let body = json!({
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "code": code,
            "grant_type": "authorization_code",
            "redirect_uri": redirect_uri,
        });
        let response: OAuthTokenResponse =
            http::send_json(self.client.post(&self.config.oauth_url).json(&body)).await?;
        Ok(response.into_pair()?)
    }

    async fn list_repositories(&self, token: &str) -> ZeedasResult<Vec<Repository>> {
        let items: Vec<ProjectItem> = http::send_json(
            self.client
                .get(format!("{}/projects", self.api()))
                .bearer_auth(token)
                .query(&[("owned", "true"), ("per_page", "100")]),
        )
        .await?;
        Ok(items
            .into_iter()
            .map(|p| Repository {
                id: p.id.to_string(),
                name: p.name,
            })
            .collect())
    }

    async fn resolve_clone_url(&self, repo: RepoAccess<'_>) -> ZeedasResult<String> {
        let info: ProjectInfo = http::send_json(self.repo_request(Method::GET, repo, "")).await?;
        Ok(info.http_url_to_repo)
    }

    async fn head_commit(&self, repo: RepoAccess<'_>) -> ZeedasResult<String> {
        let commits: Vec<CommitItem> = http::send_json(
            self.repo_request(Method::GET, repo, "repository/commits")
                .query(&[("per_page", "1")]),
        )
        .await?;
        commits.into_iter().next().map(|c| c.id).ok_or_else(|| {
            ProviderError::Rejected(format!("project {} has no commits", repo.project)).into()
        })
    }

    async fn branch_head(&self, repo: RepoAccess<'_>, branch: &str) -> ZeedasResult<String> {
        let found: BranchItem = http::send_json(self.repo_request(
            Method::GET,
            repo,
            &format!("repository/branches/{}", urlencoding::encode(branch)),
        ))
        .await?;
        Ok(found.commit.id)
    }

    async fn branch_exists(&self, repo: RepoAccess<'_>, name: &str) -> ZeedasResult<bool> {
        Ok(http::exists(self.repo_request(
            Method::GET,
            repo,
            &format!("repository/branches/{}", urlencoding::encode(name)),
        ))
        .await?)
    }

    async fn create_branch(
        &self,
        repo: RepoAccess<'_>,
        name: &str,
        sha: &str,
    ) -> ZeedasResult<()> {
        http::send_unit(
            self.repo_request(Method::POST, repo, "repository/branches")
                .query(&[("branch", name), ("ref", sha)]),
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
        let items: Vec<TreeItem> = http::send_json(
            self.repo_request(Method::GET, repo, "repository/tree").query(&[
                ("ref", branch),
                ("path", path.trim_matches('/')),
                ("per_page", "100"),
            ]),
        )
        .await?;
        Ok(items
            .into_iter()
            .filter_map(|item| match item.kind.as_str() {
                "tree" => Some(TreeEntry::dir(item.path)),
                "blob" => Some(TreeEntry::file(
                    item.path,
                    self.blob_url(repo, &item.id, branch),
                )),
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
        let body = json!({
            "branch": branch,
            "commit_message": add_file_message(branch),
            "content": "",
        });
        let file = urlencoding::encode(path.trim_matches('/'));
        http::send_unit(
            self.repo_request(Method::POST, repo, &format!("repository/files/{file}"))
                .json(&body),
        )
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
            "source_branch": source,
            "target_branch": target,
            "title": title,
            "squash": true,
        });
        let mr: MergeRequestItem = http::send_json(
            self.repo_request(Method::POST, repo, "merge_requests")
                .json(&body),
        )
        .await?;
        Ok(ReviewId::from(mr.iid))
    }

    async fn find_open_review(
        &self,
        repo: RepoAccess<'_>,
        source: &str,
        target: &str,
    ) -> ZeedasResult<Option<ReviewId>> {
        let mrs: Vec<MergeRequestItem> = http::send_json(
            self.repo_request(Method::GET, repo, "merge_requests").query(&[
                ("state", "opened"),
                ("source_branch", source),
                ("target_branch", target),
            ]),
        )
        .await?;
        Ok(mrs.first().map(|mr| ReviewId::from(mr.iid)))
    }

    async fn list_review_commits(
        &self,
        repo: RepoAccess<'_>,
        review: &ReviewId,
    ) -> ZeedasResult<Vec<CommitRef>> {
        let commits: Vec<CommitItem> = http::send_json(self.repo_request(
            Method::GET,
            repo,
            &format!("merge_requests/{review}/commits"),
        ))
        .await?;
        Ok(commits
            .into_iter()
            .map(|c| CommitRef {
                id: c.id,
                created_at: c.created_at,
            })
            .collect())
    }

    async fn diff_for_commit(
        &self,
        repo: RepoAccess<'_>,
        commit: &CommitRef,
    ) -> ZeedasResult<Vec<FileDiff>> {
        let diffs: Vec<DiffItem> = http::send_json(self.repo_request(
            Method::GET,
            repo,
            &format!("repository/commits/{}/diff", commit.id),
        ))
        .await?;
        Ok(diffs
            .into_iter()
            .map(|d| FileDiff {
                path: d.new_path,
                diff: d.diff,
            })
            .collect())
    }

    async fn merge_review(&self, repo: RepoAccess<'_>, review: &ReviewId) -> ZeedasResult<()> {
        http::send_unit(self.repo_request(
            Method::PUT,
            repo,
            &format!("merge_requests/{review}/merge"),
        ))
        .await?;
        Ok(())
    }
}
