// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote shell sessions.
//!
//! ```text
//! Connector::connect(SessionTarget) --> Box<dyn RemoteShell>
//!                                          exec(cmd) -> ExecOutput
//!                                          close()
//!
//! SshConnector (russh)
//!   connect (host, port) under connect_timeout
//!   auth: password | public key loaded from the scratch key file
//!   exec: one channel per command, stdout + stderr + exit status
//! ```

use async_trait::async_trait;
use russh::keys::{PrivateKeyWithHashAlg, load_secret_key, ssh_key};
use russh::{ChannelMsg, Disconnect, client};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::RemoteError;

/// How the session authenticates.
#[derive(Clone, Copy)]
pub enum SessionAuth<'a> {
    Password(&'a str),
    KeyFile(&'a Path),
}

/// Where and as whom to connect.
#[derive(Clone, Copy)]
pub struct SessionTarget<'a> {
    pub host: &'a str,
    pub port: u16,
    pub user: &'a str,
    pub auth: SessionAuth<'a>,
}

/// Captured result of one remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// `None` when the server closed the channel without reporting one.
    pub status: Option<u32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.status, Some(0))
    }

    /// Best message for a failure report: stderr, else stdout.
    #[must_use]
    pub fn message(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

#[async_trait]
pub trait RemoteShell: Send {
    async fn exec(&mut self, command: &str) -> Result<ExecOutput, RemoteError>;

    /// Best effort; errors are only logged.
    async fn close(&mut self);
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, target: SessionTarget<'_>) -> Result<Box<dyn RemoteShell>, RemoteError>;
}

struct AcceptingHandler;

// TODO: pin host keys per server profile instead of accepting any key.
impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// russh-backed [`Connector`].
#[derive(Debug, Clone)]
pub struct SshConnector {
    connect_timeout: Duration,
}

impl SshConnector {
    #[must_use]
    pub const fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    async fn open(&self, target: SessionTarget<'_>) -> Result<SshShell, RemoteError> {
        let connect_error = |message: String| RemoteError::Connect {
            host: target.host.to_string(),
            message,
        };

        let config = Arc::new(client::Config::default());
        let mut handle = tokio::time::timeout(
            self.connect_timeout,
            client::connect(config, (target.host, target.port), AcceptingHandler),
        )
        .await
        .map_err(|_| connect_error(format!("timed out after {:?}", self.connect_timeout)))?
        .map_err(|e| connect_error(e.to_string()))?;
        debug!(host = target.host, port = target.port, "ssh transport established");

        let accepted = match target.auth {
            SessionAuth::Password(password) => handle
                .authenticate_password(target.user, password)
                .await
                .map_err(|e| connect_error(e.to_string()))?
                .success(),
            SessionAuth::KeyFile(path) => {
                let key = load_secret_key(path, None)
                    .map_err(|e| RemoteError::Key(e.to_string()))?;
                let hash = handle
                    .best_supported_rsa_hash()
                    .await
                    .map_err(|e| connect_error(e.to_string()))?
                    .flatten();
                handle
                    .authenticate_publickey(
                        target.user,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash),
                    )
                    .await
                    .map_err(|e| connect_error(e.to_string()))?
                    .success()
            }
        };
        if !accepted {
            return Err(RemoteError::Auth {
                user: target.user.to_string(),
            });
        }

        Ok(SshShell { handle })
    }
}

#[async_trait]
impl Connector for SshConnector {
    async fn connect(&self, target: SessionTarget<'_>) -> Result<Box<dyn RemoteShell>, RemoteError> {
        Ok(Box::new(self.open(target).await?))
    }
}

struct SshShell {
    handle: client::Handle<AcceptingHandler>,
}

#[async_trait]
impl RemoteShell for SshShell {
    async fn exec(&mut self, command: &str) -> Result<ExecOutput, RemoteError> {
        let exec_error = |message: String| RemoteError::Exec {
            command: command.to_string(),
            status: None,
            message,
        };

        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| exec_error(e.to_string()))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| exec_error(e.to_string()))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut status = None;
        // keep reading after ExitStatus; output may still follow
        while let Some(message) = channel.wait().await {
            match message {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => stderr.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status } => status = Some(exit_status),
                _ => {}
            }
        }
        trace!(command, ?status, "remote command finished");

        Ok(ExecOutput {
            status,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }

    async fn close(&mut self) {
        if let Err(e) = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            debug!(error = %e, "ssh disconnect failed");
        }
    }
}
