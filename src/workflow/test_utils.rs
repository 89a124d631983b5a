// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory fakes for driving [`Engine`] without a network.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;

use super::{ArtifactStore, Engine};
use crate::error::{RemoteError, ZeedasResult, bad_input, invalid_credentials, not_found};
use crate::model::{AppCredential, Provider, RepoAccess, ReviewId};
use crate::provider::{
    CommitRef, EntryKind, FileDiff, Gateways, ProviderGateway, Repository, TokenPair, TreeEntry,
};
use crate::remote::{
    Connector, Deployer, ExecOutput, ReachabilityProbe, RemoteShell, SessionTarget,
};
use crate::store::{CredentialStore, LogSink, MemoryLogSink, MemoryStore, ReviewStore};

// =============================================================================
// Provider
// =============================================================================

#[derive(Debug, Default)]
pub(crate) struct GatewayState {
    pub head: String,
    /// branch name -> commit id
    pub branches: BTreeMap<String, String>,
    /// Commits reported for every review.
    pub commits: Vec<CommitRef>,
    /// commit id -> diffs
    pub diffs: HashMap<String, Vec<FileDiff>>,
    /// Flat file list shared by all branches.
    pub files: Vec<TreeEntry>,
    pub opened: Vec<(String, String, ReviewId)>,
    pub merged: Vec<ReviewId>,
    pub written: Vec<(String, String)>,
    pub created: Vec<(String, String)>,
    pub refresh: Option<Result<TokenPair, String>>,
    pub refreshed_with: Vec<String>,
    pub tokens_seen: Vec<String>,
    pub fail_merge: bool,
    pub fail_tree: bool,
    next_review: u64,
}

/// Scriptable [`ProviderGateway`] counting every network-shaped call.
#[derive(Debug)]
pub(crate) struct FakeGateway {
    provider: Provider,
    expiring: bool,
    state: Mutex<GatewayState>,
    calls: AtomicUsize,
    delay: Duration,
}

impl FakeGateway {
    pub fn new(provider: Provider) -> Self {
        let mut state = GatewayState {
            head: "c0ffee".to_string(),
            next_review: 1,
            ..GatewayState::default()
        };
        state.branches.insert("master".to_string(), "c0ffee".to_string());
        Self {
            provider,
            expiring: false,
            state: Mutex::new(state),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn expiring(mut self) -> Self {
        self.expiring = true;
        self
    }

    /// Slow down commit listing so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Register one commit touching `path` and make the file readable.
    pub fn add_commit(&self, id: &str, path: &str, diff: &str) {
        let mut state = self.state();
        state.commits.push(CommitRef {
            id: id.to_string(),
            created_at: Some("2026-01-02T03:04:05Z".to_string()),
        });
        state
            .diffs
            .entry(id.to_string())
            .or_default()
            .push(FileDiff {
                path: path.to_string(),
                diff: diff.to_string(),
            });
        if !state.files.iter().any(|f| f.path == path) {
            state
                .files
                .push(TreeEntry::file(path, format!("https://raw.test/{path}")));
        }
    }

    fn hit(&self, token: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.state().tokens_seen.push(token.to_string());
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

#[async_trait]
impl ProviderGateway for FakeGateway {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn tokens_expire(&self) -> bool {
        self.expiring
    }

    async fn exchange_auth_code(
        &self,
        code: &str,
        _redirect_uri: Option<&str>,
    ) -> ZeedasResult<TokenPair> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if code == "bad" {
            return Err(invalid_credentials("bad_verification_code"));
        }
        Ok(TokenPair {
            access_token: format!("access-{code}"),
            refresh_token: Some(format!("refresh-{code}")),
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> ZeedasResult<TokenPair> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut state = self.state();
        state.refreshed_with.push(refresh_token.to_string());
        match state.refresh.clone() {
            Some(Ok(pair)) => Ok(pair),
            Some(Err(message)) => Err(invalid_credentials(message)),
            None => Err(bad_input("refresh not scripted")),
        }
    }

    async fn list_repositories(&self, token: &str) -> ZeedasResult<Vec<Repository>> {
        self.hit(token);
        Ok(vec![Repository {
            id: "team/shop".to_string(),
            name: "shop".to_string(),
        }])
    }

    async fn resolve_clone_url(&self, repo: RepoAccess<'_>) -> ZeedasResult<String> {
        self.hit(repo.token);
        Ok(format!("https://git.test/{}.git", repo.project))
    }

    async fn head_commit(&self, repo: RepoAccess<'_>) -> ZeedasResult<String> {
        self.hit(repo.token);
        Ok(self.state().head.clone())
    }

    async fn branch_head(&self, repo: RepoAccess<'_>, branch: &str) -> ZeedasResult<String> {
        self.hit(repo.token);
        self.state()
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| invalid_credentials("Branch Not Found"))
    }

    async fn branch_exists(&self, repo: RepoAccess<'_>, name: &str) -> ZeedasResult<bool> {
        self.hit(repo.token);
        Ok(self.state().branches.contains_key(name))
    }

    async fn create_branch(
        &self,
        repo: RepoAccess<'_>,
        name: &str,
        sha: &str,
    ) -> ZeedasResult<()> {
        self.hit(repo.token);
        let mut state = self.state();
        state.branches.insert(name.to_string(), sha.to_string());
        state.created.push((name.to_string(), sha.to_string()));
        Ok(())
    }

    async fn list_tree(
        &self,
        repo: RepoAccess<'_>,
        _branch: &str,
        path: &str,
    ) -> ZeedasResult<Vec<TreeEntry>> {
        self.hit(repo.token);
        let state = self.state();
        if state.fail_tree {
            return Err(invalid_credentials("Not Found"));
        }
        let wanted = path.trim_matches('/');
        Ok(state
            .files
            .iter()
            .filter(|e| parent_of(&e.path) == wanted)
            .cloned()
            .collect())
    }

    async fn write_empty_file(
        &self,
        repo: RepoAccess<'_>,
        branch: &str,
        path: &str,
    ) -> ZeedasResult<()> {
        self.hit(repo.token);
        let mut state = self.state();
        if !state.branches.contains_key(branch) {
            return Err(not_found(format!("{branch} does not exist")));
        }
        state.written.push((branch.to_string(), path.to_string()));
        state.files.push(TreeEntry {
            kind: EntryKind::File,
            path: path.to_string(),
            name: crate::model::review::file_name(path).to_string(),
            download_url: Some(format!("https://raw.test/{path}")),
        });
        Ok(())
    }

    async fn open_review(
        &self,
        repo: RepoAccess<'_>,
        source: &str,
        target: &str,
        _title: &str,
    ) -> ZeedasResult<ReviewId> {
        self.hit(repo.token);
        let mut state = self.state();
        let id = ReviewId::from(state.next_review);
        state.next_review += 1;
        state
            .opened
            .push((source.to_string(), target.to_string(), id.clone()));
        Ok(id)
    }

    async fn find_open_review(
        &self,
        repo: RepoAccess<'_>,
        source: &str,
        target: &str,
    ) -> ZeedasResult<Option<ReviewId>> {
        self.hit(repo.token);
        let state = self.state();
        Ok(state
            .opened
            .iter()
            .find(|(s, t, id)| s == source && t == target && !state.merged.contains(id))
            .map(|(_, _, id)| id.clone()))
    }

    async fn list_review_commits(
        &self,
        repo: RepoAccess<'_>,
        _review: &ReviewId,
    ) -> ZeedasResult<Vec<CommitRef>> {
        self.hit(repo.token);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.state().commits.clone())
    }

    async fn diff_for_commit(
        &self,
        repo: RepoAccess<'_>,
        commit: &CommitRef,
    ) -> ZeedasResult<Vec<FileDiff>> {
        self.hit(repo.token);
        Ok(self
            .state()
            .diffs
            .get(&commit.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn merge_review(&self, repo: RepoAccess<'_>, review: &ReviewId) -> ZeedasResult<()> {
        self.hit(repo.token);
        let mut state = self.state();
        if state.fail_merge {
            return Err(invalid_credentials("Pull Request is not mergeable"));
        }
        state.merged.push(review.clone());
        Ok(())
    }
}

// =============================================================================
// Artifacts
// =============================================================================

/// Records saves; fails any path listed in `failing`.
#[derive(Debug, Default)]
pub(crate) struct FakeArtifacts {
    pub failing: Mutex<Vec<String>>,
    pub saved: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ArtifactStore for FakeArtifacts {
    async fn save_file(
        &self,
        app: &str,
        module: &str,
        version: &str,
        path: &str,
        source_url: &str,
    ) -> ZeedasResult<String> {
        if self.failing.lock().unwrap().iter().any(|p| p == path) {
            return Err(bad_input(format!("download of {source_url} failed")));
        }
        self.saved
            .lock()
            .unwrap()
            .push((path.to_string(), source_url.to_string()));
        Ok(format!("https://cdn.test/{app}/{module}/{version}/{path}"))
    }
}

// =============================================================================
// Server
// =============================================================================

pub(crate) struct Reachable;

#[async_trait]
impl ReachabilityProbe for Reachable {
    async fn is_reachable(&self, _host: &str) -> bool {
        true
    }
}

/// Accepts every connection and records every command.
#[derive(Debug, Default)]
pub(crate) struct RecordingConnector {
    pub commands: Arc<Mutex<Vec<String>>>,
}

struct RecordingShell(Arc<Mutex<Vec<String>>>);

#[async_trait]
impl RemoteShell for RecordingShell {
    async fn exec(&mut self, command: &str) -> Result<ExecOutput, RemoteError> {
        self.0.lock().unwrap().push(command.to_string());
        Ok(ExecOutput {
            status: Some(0),
            ..ExecOutput::default()
        })
    }

    async fn close(&mut self) {}
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn connect(
        &self,
        _target: SessionTarget<'_>,
    ) -> Result<Box<dyn RemoteShell>, RemoteError> {
        Ok(Box::new(RecordingShell(Arc::clone(&self.commands))))
    }
}

// =============================================================================
// Harness
// =============================================================================

pub(crate) struct Harness {
    pub engine: Arc<Engine>,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<FakeGateway>,
    pub artifacts: Arc<FakeArtifacts>,
    pub connector: Arc<RecordingConnector>,
    pub logs: Arc<MemoryLogSink>,
    _scratch: TempDir,
}

impl Harness {
    pub fn new(gateway: FakeGateway) -> Self {
        let scratch = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(gateway);
        let artifacts = Arc::new(FakeArtifacts::default());
        let connector = Arc::new(RecordingConnector::default());
        let logs = Arc::new(MemoryLogSink::new());
        let deployer = Deployer::new(
            Arc::new(Reachable),
            Arc::clone(&connector) as Arc<dyn Connector>,
            Arc::clone(&logs) as Arc<dyn LogSink>,
            scratch.path(),
        );
        let engine = Engine::builder()
            .credentials(Arc::clone(&store) as Arc<dyn CredentialStore>)
            .reviews(Arc::clone(&store) as Arc<dyn ReviewStore>)
            .gateways(Gateways::new().with(Arc::clone(&gateway) as Arc<dyn ProviderGateway>))
            .artifacts(Arc::clone(&artifacts) as Arc<dyn ArtifactStore>)
            .deployer(Arc::new(deployer))
            .build();
        Self {
            engine: Arc::new(engine),
            store,
            gateway,
            artifacts,
            connector,
            logs,
            _scratch: scratch,
        }
    }

    /// Store a record whose `provider` slot is integrated, bound and default.
    pub async fn seed_bound(&self, app: &str, provider: Provider) -> AppCredential {
        let mut record = AppCredential::initiate(app, "acct");
        let binding = record.binding_mut(provider).unwrap();
        binding.access_token = Some("tok".to_string());
        binding.refresh_token = Some("ref".to_string());
        binding.project = Some("team/shop".to_string());
        binding.url = Some("https://git.test/team/shop.git".to_string());
        record.set_default_provider(provider).unwrap();
        CredentialStore::save(self.store.as_ref(), &record).await.unwrap();
        record
    }

    pub async fn stored(&self, app: &str) -> AppCredential {
        self.store.find_by_app(app).await.unwrap().unwrap()
    }

    pub fn commands(&self) -> Vec<String> {
        self.connector.commands.lock().unwrap().clone()
    }
}
