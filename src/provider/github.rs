// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub REST v3 gateway.
//!
//! ```text
//! POST {oauth_url}                          code -> token (JSON, Accept json)
//! GET  user/repos?type=all&per_page=100     admin repos
//! GET  repos/{p}                            clone_url
//! GET  repos/{p}/git/refs/heads             head (master > main > first)
//! GET  repos/{p}/git/ref/heads/{b}          branch head
//! GET  repos/{p}/branches/{b}               exists (404 = no)
//! POST repos/{p}/git/refs                   create branch
//! GET  repos/{p}/contents/{path}?ref=       tree / file
//! PUT  repos/{p}/contents/{path}            empty file commit
//! POST repos/{p}/pulls                      open review
//! GET  repos/{p}/pulls?state=open&head=&base=
//! GET  repos/{p}/pulls/{n}/commits
//! GET  repos/{p}/commits/{sha}              files[].patch
//! PUT  repos/{p}/pulls/{n}/merge
//! ```

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use super::ProviderGateway;
use super::http::{self, OAuthTokenResponse};
use super::types::{CommitRef, FileDiff, Repository, TokenPair, TreeEntry};
use crate::config::types::GithubConfig;
use crate::error::{ProviderError, ZeedasResult};
use crate::model::branch::add_file_message;
use crate::model::{Provider, RepoAccess, ReviewId};
use crate::net::global_client;

const MEDIA_TYPE: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone)]
pub struct GithubGateway {
    client: Client,
    config: GithubConfig,
}

impl GithubGateway {
    #[must_use]
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            client: global_client().clone(),
            config: config.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, token: &str, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(AUTHORIZATION, format!("token {token}"))
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, MEDIA_TYPE)
    }

    fn repo_request(&self, method: Method, repo: RepoAccess<'_>, path: &str) -> RequestBuilder {
        let path = if path.is_empty() {
            format!("repos/{}", repo.project)
        } else {
            format!("repos/{}/{path}", repo.project)
        };
        self.request(method, repo.token, &path)
    }
}

#[derive(Deserialize)]
struct RepoItem {
    full_name: String,
    name: String,
}

#[derive(Deserialize)]
struct RepoInfo {
    clone_url: String,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    name: String,
    object: RefObject,
}

#[derive(Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    path: String,
    download_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Contents {
    Listing(Vec<ContentItem>),
    Single(ContentItem),
}

#[derive(Deserialize)]
struct PullItem {
    number: u64,
}

#[derive(Deserialize)]
struct CommitAuthor {
    date: Option<String>,
}

#[derive(Deserialize)]
struct CommitDetail {
    author: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct PullCommit {
    sha: String,
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitFile {
    filename: String,
    #[serde(default)]
    patch: Option<String>,
}

#[derive(Deserialize)]
struct CommitFiles {
    #[serde(default)]
    files: Vec<CommitFile>,
}

fn owner(project: &str) -> &str {
    project.split_once('/').map_or(project, |(owner, _)| owner)
}

#[async_trait]
impl ProviderGateway for GithubGateway {
    fn provider(&self) -> Provider {
        Provider::Github
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
            "redirect_uri": redirect_uri,
        });
        let response: OAuthTokenResponse = http::send_json(
            self.client
                .post(&self.config.oauth_url)
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, &self.config.user_agent)
                .json(&body),
        )
        .await?;
        Ok(response.into_pair()?)
    }

    async fn list_repositories(&self, token: &str) -> ZeedasResult<Vec<Repository>> {
        let items: Vec<RepoItem> = http::send_json(
            self.request(Method::GET, token, "user/repos")
                .query(&[("type", "all"), ("per_page", "100"), ("page", "1")]),
        )
        .await?;
        Ok(items
            .into_iter()
            .map(|r| Repository {
                id: r.full_name,
                name: r.name,
            })
            .collect())
    }

    async fn resolve_clone_url(&self, repo: RepoAccess<'_>) -> ZeedasResult<String> {
        let info: RepoInfo = http::send_json(self.repo_request(Method::GET, repo, "")).await?;
        Ok(info.clone_url)
    }

    async fn head_commit(&self, repo: RepoAccess<'_>) -> ZeedasResult<String> {
        let refs: Vec<GitRef> =
            http::send_json(self.repo_request(Method::GET, repo, "git/refs/heads")).await?;
        let pick = |name: &str| {
            refs.iter()
                .find(|r| r.name == format!("refs/heads/{name}"))
        };
        pick("master")
            .or_else(|| pick("main"))
            .or_else(|| refs.first())
            .map(|r| r.object.sha.clone())
            .ok_or_else(|| ProviderError::Rejected(format!("{} has no branches", repo.project)).into())
    }

    async fn branch_head(&self, repo: RepoAccess<'_>, branch: &str) -> ZeedasResult<String> {
        let found: GitRef = http::send_json(self.repo_request(
            Method::GET,
            repo,
            &format!("git/ref/heads/{branch}"),
        ))
        .await?;
        Ok(found.object.sha)
    }

    async fn branch_exists(&self, repo: RepoAccess<'_>, name: &str) -> ZeedasResult<bool> {
        Ok(http::exists(self.repo_request(Method::GET, repo, &format!("branches/{name}"))).await?)
    }

    async fn create_branch(
        &self,
        repo: RepoAccess<'_>,
        name: &str,
        sha: &str,
    ) -> ZeedasResult<()> {
        let body = json!({ "ref": format!("refs/heads/{name}"), "sha": sha });
        http::send_unit(self.repo_request(Method::POST, repo, "git/refs").json(&body)).await?;
        Ok(())
    }

    async fn list_tree(
        &self,
        repo: RepoAccess<'_>,
        branch: &str,
        path: &str,
    ) -> ZeedasResult<Vec<TreeEntry>> {
        let path = path.trim_matches('/');
        let contents: Contents = http::send_json(
            self.repo_request(Method::GET, repo, &format!("contents/{path}"))
                .query(&[("ref", branch)]),
        )
        .await?;
        let items = match contents {
            Contents::Listing(items) => items,
            Contents::Single(item) => vec![item],
        };
        Ok(items
            .into_iter()
            .filter_map(|item| match item.kind.as_str() {
                "dir" => Some(TreeEntry::dir(item.path)),
                "file" => Some(TreeEntry::file(
                    item.path,
                    item.download_url.unwrap_or_default(),
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
            "message": add_file_message(branch),
            "content": "",
            "branch": branch,
        });
        http::send_unit(
            self.repo_request(
                Method::PUT,
                repo,
                &format!("contents/{}", path.trim_matches('/')),
            )
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
        let body = json!({ "title": title, "head": source, "base": target });
        let pull: PullItem =
            http::send_json(self.repo_request(Method::POST, repo, "pulls").json(&body)).await?;
        Ok(ReviewId::from(pull.number))
    }

    async fn find_open_review(
        &self,
        repo: RepoAccess<'_>,
        source: &str,
        target: &str,
    ) -> ZeedasResult<Option<ReviewId>> {
        let head = format!("{}:{source}", owner(repo.project));
        let pulls: Vec<PullItem> = http::send_json(
            self.repo_request(Method::GET, repo, "pulls").query(&[
                ("state", "open"),
                ("head", head.as_str()),
                ("base", target),
            ]),
        )
        .await?;
        Ok(pulls.first().map(|p| ReviewId::from(p.number)))
    }

    async fn list_review_commits(
        &self,
        repo: RepoAccess<'_>,
        review: &ReviewId,
    ) -> ZeedasResult<Vec<CommitRef>> {
        let commits: Vec<PullCommit> = http::send_json(
            self.repo_request(Method::GET, repo, &format!("pulls/{review}/commits"))
                .query(&[("per_page", "100")]),
        )
        .await?;
        Ok(commits
            .into_iter()
            .map(|c| CommitRef {
                id: c.sha,
                created_at: c.commit.author.and_then(|a| a.date),
            })
            .collect())
    }

    async fn diff_for_commit(
        &self,
        repo: RepoAccess<'_>,
        commit: &CommitRef,
    ) -> ZeedasResult<Vec<FileDiff>> {
        let detail: CommitFiles = http::send_json(self.repo_request(
            Method::GET,
            repo,
            &format!("commits/{}", commit.id),
        ))
        .await?;
        Ok(detail
            .files
            .into_iter()
            .map(|f| FileDiff {
                path: f.filename,
                diff: f.patch.unwrap_or_default(),
            })
            .collect())
    }

    async fn merge_review(&self, repo: RepoAccess<'_>, review: &ReviewId) -> ZeedasResult<()> {
        http::send_unit(
            self.repo_request(Method::PUT, repo, &format!("pulls/{review}/merge"))
                .json(&json!({})),
        )
        .await?;
        Ok(())
    }
}
