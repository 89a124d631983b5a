// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote deployment executor.
//!
//! ```text
//! deploy(app, profile, mode)               revert(app, profile, commits, module)
//!        |                                         |
//!        +------------------+----------------------+
//!                           v
//!   [per-app lock]  log reset
//!   Reachability    probe host (bounded)      fail -> 1 line, no connect
//!   Credentials     ScratchKey (private key)  dropped on every exit
//!   Connect         Connector -> RemoteShell
//!   ChangeDirectory cd <path>
//!        |                                         |
//!   Pull            git pull origin qa-zeedas      Revert   git revert --no-commit <c>
//!   Checkout        git checkout qa-zeedas                  (each; failures noted,
//!   BuildAndRun     <build> && <run>  (Full only)            not fatal)
//!        |                                         Commit   git add . && git commit
//!        |                                                  -m '...' && git push
//!        +------------------+----------------------+
//!                           v
//!             close shell, drop key, DeployOutcome
//! ```
//!
//! Stage failures never surface as errors: they are written to the
//! [`LogSink`] with the `Process Terminated: ` prefix and reported in the
//! returned [`DeployOutcome`].

pub mod keyfile;
pub mod pem;
pub mod probe;
pub mod session;

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::RemoteError;
use crate::locks::KeyedLocks;
use crate::model::{ServerAuth, ServerProfile};
use crate::model::branch::{QA_BRANCH, revert_message};
use crate::store::LogSink;
use crate::store::log::FAILURE_PREFIX;

pub use keyfile::ScratchKey;
pub use probe::{PingProbe, ReachabilityProbe};
pub use session::{Connector, ExecOutput, RemoteShell, SessionAuth, SessionTarget, SshConnector};

/// Whether the deploy pipeline ends with the build and run commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    Full,
    /// Connectivity and checkout only.
    TestConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reachability,
    Credentials,
    Connect,
    ChangeDirectory,
    Pull,
    Checkout,
    BuildAndRun,
    Revert,
    Commit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reachability => "reachability",
            Self::Credentials => "credentials",
            Self::Connect => "connect",
            Self::ChangeDirectory => "cd",
            Self::Pull => "pull",
            Self::Checkout => "checkout",
            Self::BuildAndRun => "build-and-run",
            Self::Revert => "revert",
            Self::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Completed,
    Failed { stage: Stage, reason: String },
}

impl DeployOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

struct StageFailure {
    stage: Stage,
    error: RemoteError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, StageFailure>;
}

impl<T> AtStage<T> for Result<T, RemoteError> {
    fn at(self, stage: Stage) -> Result<T, StageFailure> {
        self.map_err(|error| StageFailure { stage, error })
    }
}

/// A shell command run inside the deploy path. An empty command only
/// announces.
struct Step {
    stage: Stage,
    announce: String,
    command: String,
    /// Log and continue instead of aborting.
    tolerate_failure: bool,
}

impl Step {
    fn new(stage: Stage, announce: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            stage,
            announce: announce.into(),
            command: command.into(),
            tolerate_failure: false,
        }
    }

    fn note(stage: Stage, announce: impl Into<String>) -> Self {
        Self::new(stage, announce, String::new())
    }

    fn tolerant(mut self) -> Self {
        self.tolerate_failure = true;
        self
    }
}

/// `cd '<path>' && <command>`; every remote command starts from the deploy path.
fn in_directory(path: &str, command: &str) -> String {
    let quoted = shell_escape::unix::escape(path.into());
    if command.is_empty() {
        format!("cd {quoted}")
    } else {
        format!("cd {quoted} && {command}")
    }
}

fn quote(value: &str) -> String {
    shell_escape::unix::escape(value.into()).into_owned()
}

/// Runs deploy and revert pipelines against a server profile.
pub struct Deployer {
    probe: Arc<dyn ReachabilityProbe>,
    connector: Arc<dyn Connector>,
    logs: Arc<dyn LogSink>,
    scratch_dir: PathBuf,
    port: u16,
    locks: KeyedLocks,
}

impl fmt::Debug for Deployer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployer")
            .field("scratch_dir", &self.scratch_dir)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl Deployer {
    #[must_use]
    pub fn new(
        probe: Arc<dyn ReachabilityProbe>,
        connector: Arc<dyn Connector>,
        logs: Arc<dyn LogSink>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            probe,
            connector,
            logs,
            scratch_dir: scratch_dir.into(),
            port: 22,
            locks: KeyedLocks::new(),
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Pull and check out QA on the server, then build and run in
    /// [`DeployMode::Full`].
    pub async fn deploy(&self, app: &str, profile: &ServerProfile, mode: DeployMode) -> DeployOutcome {
        let mut steps = vec![
            Step::new(
                Stage::Pull,
                format!("Pulling {QA_BRANCH}"),
                format!("git pull origin {QA_BRANCH}"),
            ),
            Step::new(
                Stage::Checkout,
                format!("Checking out {QA_BRANCH}"),
                format!("git checkout {QA_BRANCH}"),
            ),
        ];
        if mode == DeployMode::Full {
            match profile.commands.build_and_run() {
                Some(command) => steps.push(Step::new(Stage::BuildAndRun, "Running commands", command)),
                None => steps.push(Step::note(
                    Stage::BuildAndRun,
                    "No build or run commands configured",
                )),
            }
        }
        self.execute(app, profile, steps).await
    }

    /// Revert `commits` (each one best effort) and push one aggregate commit.
    pub async fn revert(
        &self,
        app: &str,
        profile: &ServerProfile,
        commits: &[String],
        module: &str,
    ) -> DeployOutcome {
        let mut steps: Vec<Step> = commits
            .iter()
            .map(|commit| {
                Step::new(
                    Stage::Revert,
                    format!("Reverting {commit}"),
                    format!("git revert --no-commit {}", quote(commit)),
                )
                .tolerant()
            })
            .collect();
        steps.push(Step::new(
            Stage::Commit,
            "Committing revert",
            format!(
                "git add . && git commit -m {} && git push",
                quote(&revert_message(module))
            ),
        ));
        self.execute(app, profile, steps).await
    }

    async fn note(&self, app: &str, message: &str) {
        self.logs.append(app, message).await;
    }

    async fn execute(&self, app: &str, profile: &ServerProfile, steps: Vec<Step>) -> DeployOutcome {
        let _serial = self.locks.lock(app).await;
        self.logs.reset(app).await;

        match self.run(app, profile, &steps).await {
            Ok(()) => {
                info!(app, host = %profile.host, "deployment pipeline completed");
                self.note(app, "Deployment completed").await;
                DeployOutcome::Completed
            }
            Err(StageFailure { stage, error }) => {
                warn!(app, host = %profile.host, %stage, error = %error, "deployment pipeline aborted");
                let reason = error.to_string();
                self.note(app, &format!("{FAILURE_PREFIX}{reason}")).await;
                DeployOutcome::Failed { stage, reason }
            }
        }
    }

    async fn run(&self, app: &str, profile: &ServerProfile, steps: &[Step]) -> Result<(), StageFailure> {
        let host = profile.host.as_str();

        self.note(app, &format!("Pinging server at {host}")).await;
        if !self.probe.is_reachable(host).await {
            return Err(RemoteError::Unreachable {
                host: host.to_string(),
            })
            .at(Stage::Reachability);
        }
        self.note(app, &format!("{host} is online")).await;

        // lives until this function returns, whichever stage ends it
        let key = match &profile.auth {
            ServerAuth::PrivateKey { key } => {
                Some(ScratchKey::write(&self.scratch_dir, app, key).at(Stage::Credentials)?)
            }
            ServerAuth::Password { .. } => None,
        };
        let auth = match (&profile.auth, &key) {
            (ServerAuth::Password { password }, _) => SessionAuth::Password(password),
            (ServerAuth::PrivateKey { .. }, Some(key)) => SessionAuth::KeyFile(key.path()),
            (ServerAuth::PrivateKey { .. }, None) => {
                return Err(RemoteError::Key("private key was not materialized".to_string()))
                    .at(Stage::Credentials);
            }
        };

        let target = SessionTarget {
            host,
            port: self.port,
            user: &profile.user,
            auth,
        };
        let mut shell = self.connector.connect(target).await.at(Stage::Connect)?;
        self.note(app, "Server connected successfully").await;

        let result = self.run_steps(app, &profile.path, shell.as_mut(), steps).await;
        shell.close().await;
        drop(key);
        result
    }

    async fn run_steps(
        &self,
        app: &str,
        path: &str,
        shell: &mut dyn RemoteShell,
        steps: &[Step],
    ) -> Result<(), StageFailure> {
        Self::exec(shell, &in_directory(path, ""))
            .await
            .at(Stage::ChangeDirectory)?;
        self.note(app, "Path found").await;

        for step in steps {
            self.note(app, &step.announce).await;
            if step.command.is_empty() {
                continue;
            }
            match Self::exec(shell, &in_directory(path, &step.command)).await {
                Ok(_) => {}
                Err(error) if step.tolerate_failure => {
                    warn!(app, stage = %step.stage, error = %error, "continuing past failed step");
                    self.note(app, &format!("Skipped: {error}")).await;
                }
                Err(error) => {
                    return Err(StageFailure {
                        stage: step.stage,
                        error,
                    });
                }
            }
        }
        Ok(())
    }

    async fn exec(shell: &mut dyn RemoteShell, command: &str) -> Result<ExecOutput, RemoteError> {
        let output = shell.exec(command).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(RemoteError::Exec {
                command: command.to_string(),
                status: output.status,
                message: output.message().to_string(),
            })
        }
    }
}
