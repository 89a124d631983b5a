// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the provider gateways using wiremock.
//!
//! Covers:
//! - Request shapes and authentication per provider
//! - Branch lookups, baselines and review lifecycle
//! - Upstream error messages surfacing as `InvalidAccessCredentials`
//! - A full Bitbucket submission driven through the engine

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zeedas_rs::config::types::{BitbucketConfig, GithubConfig, GitlabConfig};
use zeedas_rs::error::{ErrorKind, ZeedasError};
use zeedas_rs::model::{AppCredential, Provider, RepoAccess, ReviewId};
use zeedas_rs::provider::{
    BitbucketGateway, CommitRef, EntryKind, Gateways, GithubGateway, GitlabGateway,
    ProviderGateway,
};
use zeedas_rs::remote::{Connector, Deployer, PingProbe, ReachabilityProbe, SshConnector};
use zeedas_rs::store::{CredentialStore, LogSink, MemoryLogSink, MemoryStore, ReviewStore};
use zeedas_rs::workflow::{ArtifactStore, Engine, LocalArtifactStore};

const REPO: RepoAccess<'static> = RepoAccess {
    project: "team/shop",
    token: "tok",
};

fn github(server: &MockServer) -> GithubGateway {
    GithubGateway::new(&GithubConfig {
        api_url: server.uri(),
        oauth_url: format!("{}/login/oauth/access_token", server.uri()),
        client_id: "cid".to_string(),
        client_secret: "csecret".to_string(),
        ..GithubConfig::default()
    })
}

fn gitlab(server: &MockServer) -> GitlabGateway {
    GitlabGateway::new(&GitlabConfig {
        api_url: server.uri(),
        oauth_url: format!("{}/oauth/token", server.uri()),
        client_id: "cid".to_string(),
        client_secret: "csecret".to_string(),
    })
}

fn bitbucket(server: &MockServer) -> BitbucketGateway {
    BitbucketGateway::new(&BitbucketConfig {
        api_url: server.uri(),
        oauth_url: format!("{}/site/oauth2/access_token", server.uri()),
        web_url: "https://bitbucket.test".to_string(),
        client_id: "cid".to_string(),
        client_secret: "csecret".to_string(),
    })
}

fn message(err: &ZeedasError) -> String {
    assert_eq!(err.kind(), ErrorKind::InvalidAccessCredentials, "{err:?}");
    err.to_string()
}

// =============================================================================
// GitHub
// =============================================================================

#[tokio::test]
async fn github_exchange_returns_token_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({ "client_id": "cid", "code": "c0de" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_abc",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pair = github(&server).exchange_auth_code("c0de", None).await.unwrap();
    assert_eq!(pair.access_token, "gho_abc");
    assert_eq!(pair.refresh_token, None);
}

#[tokio::test]
async fn github_exchange_error_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        })))
        .mount(&server)
        .await;

    let err = github(&server).exchange_auth_code("old", None).await.unwrap_err();
    assert_eq!(message(&err), "The code passed is incorrect or expired.");
}

#[tokio::test]
async fn github_lists_repositories_with_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(header("authorization", "token tok"))
        .and(query_param("type", "all"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "full_name": "team/shop", "name": "shop", "private": true },
            { "full_name": "team/blog", "name": "blog", "private": false }
        ])))
        .mount(&server)
        .await;

    let repos = github(&server).list_repositories("tok").await.unwrap();
    let ids: Vec<&str> = repos.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["team/shop", "team/blog"]);
    assert_eq!(repos[0].name, "shop");
}

#[tokio::test]
async fn github_unauthorized_surfaces_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let err = github(&server).resolve_clone_url(REPO).await.unwrap_err();
    assert_eq!(message(&err), "Bad credentials");
}

#[tokio::test]
async fn github_ensure_baselines_creates_missing_branches_from_master() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop/branches/qa-zeedas"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Branch not found" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop/branches/master-zeedas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "master-zeedas" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop/git/refs/heads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "ref": "refs/heads/main", "object": { "sha": "m1" } },
            { "ref": "refs/heads/master", "object": { "sha": "m2" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/team/shop/git/refs"))
        .and(body_json(json!({ "ref": "refs/heads/qa-zeedas", "sha": "m2" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    github(&server).ensure_baselines(REPO).await.unwrap();
}

#[tokio::test]
async fn github_branch_lookup_error_counts_as_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop/branches/cart-zeedas"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = github(&server);
    assert!(gateway.branch_exists(REPO, "cart-zeedas").await.is_err());
    assert!(!gateway.check_branch(REPO, "cart-zeedas").await);
}

#[tokio::test]
async fn github_review_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop/pulls"))
        .and(query_param("state", "open"))
        .and(query_param("head", "team:qa-zeedas"))
        .and(query_param("base", "master-zeedas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/team/shop/pulls"))
        .and(body_json(json!({
            "title": "Submission for cart",
            "head": "cart-zeedas",
            "base": "qa-zeedas"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "number": 12 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop/pulls/12/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "sha": "a1", "commit": { "author": { "date": "2026-01-02T03:04:05Z" } } },
            { "sha": "b2", "commit": { "author": null } }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop/commits/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "a1",
            "files": [
                { "filename": "src/app.js", "patch": "@@ -1 +1 @@\n-a\n+b" },
                { "filename": "logo.png" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/team/shop/pulls/12/merge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "merged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = github(&server);
    assert_eq!(
        gateway.find_open_review(REPO, "qa-zeedas", "master-zeedas").await.unwrap(),
        None
    );

    let id = gateway
        .open_review(REPO, "cart-zeedas", "qa-zeedas", "Submission for cart")
        .await
        .unwrap();
    assert_eq!(id, ReviewId::from(12));

    let commits = gateway.list_review_commits(REPO, &id).await.unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].created_at.as_deref(), Some("2026-01-02T03:04:05Z"));
    assert_eq!(commits[1].created_at, None);

    let diffs = gateway.diff_for_commit(REPO, &commits[0]).await.unwrap();
    assert_eq!(diffs.len(), 2);
    assert_eq!(diffs[0].path, "src/app.js");
    assert!(diffs[0].diff.contains("+b"));
    assert_eq!(diffs[1].diff, "");

    gateway.merge_review(REPO, &id).await.unwrap();
}

#[tokio::test]
async fn github_merge_conflict_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/repos/team/shop/pulls/3/merge"))
        .respond_with(
            ResponseTemplate::new(405)
                .set_body_json(json!({ "message": "Pull Request is not mergeable" })),
        )
        .mount(&server)
        .await;

    let err = github(&server)
        .merge_review(REPO, &ReviewId::from(3))
        .await
        .unwrap_err();
    assert_eq!(message(&err), "Pull Request is not mergeable");
}

#[tokio::test]
async fn github_read_file_lists_parent_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/team/shop/contents/src"))
        .and(query_param("ref", "cart-zeedas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "type": "dir", "path": "src/lib", "download_url": null },
            { "type": "file", "path": "src/app.js", "download_url": "https://raw.test/src/app.js" },
            { "type": "symlink", "path": "src/link", "download_url": null }
        ])))
        .mount(&server)
        .await;

    let gateway = github(&server);
    let entries = gateway.list_tree(REPO, "cart-zeedas", "/src/").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, EntryKind::Dir);
    assert_eq!(entries[0].name, "lib");

    let file = gateway.read_file(REPO, "cart-zeedas", "src/app.js").await.unwrap();
    assert_eq!(file.download_url.as_deref(), Some("https://raw.test/src/app.js"));

    let missing = gateway.read_file(REPO, "cart-zeedas", "src/gone.js").await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::ResourceNotFound);
}

// =============================================================================
// GitLab
// =============================================================================

#[tokio::test]
async fn gitlab_encodes_project_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/team%2Fshop"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "http_url_to_repo": "https://gitlab.test/team/shop.git"
        })))
        .mount(&server)
        .await;

    let url = gitlab(&server).resolve_clone_url(REPO).await.unwrap();
    assert_eq!(url, "https://gitlab.test/team/shop.git");
}

#[tokio::test]
async fn gitlab_lists_owned_projects_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("owned", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 42, "name": "shop" }
        ])))
        .mount(&server)
        .await;

    let repos = gitlab(&server).list_repositories("tok").await.unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].id, "42");
}

#[tokio::test]
async fn gitlab_feature_branch_forks_from_qa() {
    let server = MockServer::start().await;
    let repo = RepoAccess {
        project: "42",
        token: "tok",
    };
    Mock::given(method("GET"))
        .and(path("/projects/42/repository/branches/cart-zeedas"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "404 Branch Not Found" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/42/repository/branches/qa-zeedas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "qa-zeedas",
            "commit": { "id": "qa111" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects/42/repository/branches"))
        .and(query_param("branch", "cart-zeedas"))
        .and(query_param("ref", "qa111"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "name": "cart-zeedas" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(gitlab(&server).create_feature_branch(repo, "cart").await);
}

#[tokio::test]
async fn gitlab_merge_request_round() {
    let server = MockServer::start().await;
    let repo = RepoAccess {
        project: "42",
        token: "tok",
    };
    Mock::given(method("POST"))
        .and(path("/projects/42/merge_requests"))
        .and(body_partial_json(json!({
            "source_branch": "cart-zeedas",
            "target_branch": "qa-zeedas",
            "squash": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9001, "iid": 5 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/42/repository/commits/c1/diff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "old_path": "a.txt", "new_path": "b.txt", "diff": "@@ -1 +1 @@\n-x\n+y\n" }
        ])))
        .mount(&server)
        .await;

    let gateway = gitlab(&server);
    let id = gateway
        .open_review(repo, "cart-zeedas", "qa-zeedas", "Submission for cart")
        .await
        .unwrap();
    assert_eq!(id, ReviewId::from(5));

    let commit = CommitRef {
        id: "c1".to_string(),
        created_at: None,
    };
    let diffs = gateway.diff_for_commit(repo, &commit).await.unwrap();
    assert_eq!(diffs[0].path, "b.txt");
}

#[tokio::test]
async fn gitlab_tree_builds_blob_urls() {
    let server = MockServer::start().await;
    let repo = RepoAccess {
        project: "42",
        token: "tok",
    };
    Mock::given(method("GET"))
        .and(path("/projects/42/repository/tree"))
        .and(query_param("ref", "cart-zeedas"))
        .and(query_param("path", "src"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "b10b", "type": "blob", "path": "src/app.js", "name": "app.js" },
            { "id": "7ree", "type": "tree", "path": "src/lib", "name": "lib" }
        ])))
        .mount(&server)
        .await;

    let entries = gitlab(&server).list_tree(repo, "cart-zeedas", "src").await.unwrap();
    let url = entries[0].download_url.as_deref().unwrap();
    assert!(url.contains("/projects/42/repository/blobs/b10b/raw"));
    assert!(url.contains("access_token=tok"));
    assert!(url.contains("ref=cart-zeedas"));
    assert_eq!(entries[1].kind, EntryKind::Dir);
}

// =============================================================================
// Bitbucket
// =============================================================================

#[tokio::test]
async fn bitbucket_refresh_uses_basic_auth_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/site/oauth2/access_token"))
        .and(header("authorization", "Basic Y2lkOmNzZWNyZXQ="))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=ref1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "ref2",
            "expires_in": 7200
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = bitbucket(&server);
    assert!(gateway.tokens_expire());
    let pair = gateway.refresh_access_token("ref1").await.unwrap();
    assert_eq!(pair.access_token, "fresh");
    assert_eq!(pair.refresh_token.as_deref(), Some("ref2"));
}

#[tokio::test]
async fn bitbucket_invalid_grant_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/site/oauth2/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid refresh_token"
        })))
        .mount(&server)
        .await;

    let err = bitbucket(&server).refresh_access_token("stale").await.unwrap_err();
    assert_eq!(message(&err), "Invalid refresh_token");
}

#[tokio::test]
async fn bitbucket_clone_url_uses_web_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repositories/team/shop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_name": "team/shop",
            "name": "shop"
        })))
        .mount(&server)
        .await;

    let url = bitbucket(&server).resolve_clone_url(REPO).await.unwrap();
    assert_eq!(url, "https://bitbucket.test/team/shop.git");
}

#[tokio::test]
async fn bitbucket_raw_diff_is_split_per_file() {
    let server = MockServer::start().await;
    let raw = "diff --git a/src/app.js b/src/app.js\n\
               index 1..2 100644\n\
               --- a/src/app.js\n\
               +++ b/src/app.js\n\
               @@ -1 +1 @@\n\
               -a\n\
               +b\n\
               diff --git a/logo.png b/logo.png\n\
               Binary files differ\n";
    Mock::given(method("GET"))
        .and(path("/repositories/team/shop/diff/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw))
        .mount(&server)
        .await;

    let commit = CommitRef {
        id: "abc".to_string(),
        created_at: None,
    };
    let diffs = bitbucket(&server).diff_for_commit(REPO, &commit).await.unwrap();
    assert_eq!(diffs.len(), 2);
    assert_eq!(diffs[0].path, "src/app.js");
    assert_eq!(diffs[0].diff, "@@ -1 +1 @@\n-a\n+b");
    assert_eq!(diffs[1].path, "logo.png");
    assert_eq!(diffs[1].diff, "");
}

#[tokio::test]
async fn bitbucket_finds_open_review_with_query_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repositories/team/shop/pullrequests"))
        .and(query_param("state", "OPEN"))
        .and(query_param(
            "q",
            r#"source.branch.name="qa-zeedas" AND destination.branch.name="master-zeedas""#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{ "id": 31 }, { "id": 30 }]
        })))
        .mount(&server)
        .await;

    let found = bitbucket(&server)
        .find_open_review(REPO, "qa-zeedas", "master-zeedas")
        .await
        .unwrap();
    assert_eq!(found, Some(ReviewId::from(31)));
}

#[tokio::test]
async fn bitbucket_add_empty_file_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repositories/team/shop/src"))
        .and(body_string_contains("branch=cart-zeedas"))
        .and(body_string_contains("docs%2Fnotes.md="))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    bitbucket(&server)
        .write_empty_file(REPO, "cart-zeedas", "/docs/notes.md")
        .await
        .unwrap();
}

// =============================================================================
// Engine over a real gateway
// =============================================================================

async fn seed_bitbucket(store: &MemoryStore) {
    let mut record = AppCredential::initiate("shop", "acct");
    let binding = record.binding_mut(Provider::Bitbucket).unwrap();
    binding.url = Some("https://bitbucket.test/team/shop.git".to_string());
    binding.project = Some("team/shop".to_string());
    binding.access_token = Some("stale".to_string());
    binding.refresh_token = Some("ref1".to_string());
    record.set_default_provider(Provider::Bitbucket).unwrap();
    CredentialStore::save(store, &record).await.unwrap();
}

fn engine(server: &MockServer, store: &Arc<MemoryStore>, dir: &TempDir) -> Engine {
    let deployer = Deployer::new(
        Arc::new(PingProbe::new(Duration::from_secs(1), 22)) as Arc<dyn ReachabilityProbe>,
        Arc::new(SshConnector::new(Duration::from_secs(1))) as Arc<dyn Connector>,
        Arc::new(MemoryLogSink::new()) as Arc<dyn LogSink>,
        dir.path().join("scratch"),
    );
    Engine::builder()
        .credentials(Arc::clone(store) as Arc<dyn CredentialStore>)
        .reviews(Arc::clone(store) as Arc<dyn ReviewStore>)
        .gateways(Gateways::new().with(Arc::new(bitbucket(server))))
        .artifacts(Arc::new(LocalArtifactStore::new(
            dir.path().join("public"),
            "https://cdn.test",
        )) as Arc<dyn ArtifactStore>)
        .deployer(Arc::new(deployer))
        .build()
}

#[tokio::test]
async fn bitbucket_submission_refreshes_then_snapshots() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/site/oauth2/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "ref2"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repositories/team/shop/pullrequests"))
        .and(header("authorization", "Bearer fresh"))
        .and(body_partial_json(json!({
            "source": { "branch": { "name": "cart-zeedas" } },
            "destination": { "branch": { "name": "qa-zeedas" } }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repositories/team/shop/pullrequests/7/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{ "hash": "abc", "date": "2026-03-01T10:00:00+00:00" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repositories/team/shop/diff/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "diff --git a/src/app.js b/src/app.js\n--- a/src/app.js\n+++ b/src/app.js\n@@ -0,0 +1 @@\n+ok\n",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repositories/team/shop/src/cart-zeedas/src/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{ "type": "commit_file", "path": "src/app.js" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repositories/team/shop/src/cart-zeedas/src/app.js"))
        .and(query_param("access_token", "fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok\n"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    seed_bitbucket(&store).await;
    let engine = engine(&server, &store, &dir);

    let review = engine.submit("shop", "cart").await.unwrap();
    assert_eq!(review.review_id, ReviewId::from(7));
    assert_eq!(review.submission_count, 1);
    assert_eq!(review.version_count(), 1);
    assert_eq!(
        review.changes[0].versions[0].download_url,
        "https://cdn.test/shop/cart/abc/src/app.js"
    );

    let saved = std::fs::read_to_string(dir.path().join("public/shop/cart/abc/src/app.js")).unwrap();
    assert_eq!(saved, "ok\n");

    let record = store.find_by_app("shop").await.unwrap().unwrap();
    let binding = record.binding(Provider::Bitbucket).unwrap();
    assert_eq!(binding.access_token.as_deref(), Some("fresh"));
    assert_eq!(binding.refresh_token.as_deref(), Some("ref2"));
    assert_eq!(store.review_count(), 1);
}
