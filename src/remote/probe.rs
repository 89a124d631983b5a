// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host reachability check run before any shell connection.
//!
//! ```text
//! PingProbe::is_reachable(host)
//!      |
//!      +-- `ping` on PATH? --yes--> ping -c 1 <host>  (exit 0 = up)
//!      |                                 | spawn failed
//!      +-- no ---------------------------+--> TCP connect host:port
//!
//! everything runs under one tokio timeout; elapsed = unreachable
//! ```

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::model::is_valid_host;

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self, host: &str) -> bool;
}

/// System `ping` with a TCP fallback, bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct PingProbe {
    timeout: Duration,
    fallback_port: u16,
    ping: Option<PathBuf>,
}

impl PingProbe {
    #[must_use]
    pub fn new(timeout: Duration, fallback_port: u16) -> Self {
        Self {
            timeout,
            fallback_port,
            ping: which::which("ping").ok(),
        }
    }

    /// Skip `ping` entirely and only try the TCP port.
    #[must_use]
    pub fn tcp_only(mut self) -> Self {
        self.ping = None;
        self
    }

    async fn probe(&self, host: &str) -> bool {
        if !is_valid_host(host) {
            debug!(host, "refusing to check malformed host");
            return false;
        }
        if let Some(ping) = &self.ping {
            let mut command = Command::new(ping);
            command
                .arg("-c")
                .arg("1")
                .arg("--")
                .arg(host)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true);
            match command.status().await {
                Ok(status) => return status.success(),
                Err(e) => debug!(host, error = %e, "ping could not be spawned, trying tcp"),
            }
        }
        TcpStream::connect((host, self.fallback_port)).await.is_ok()
    }
}

#[async_trait]
impl ReachabilityProbe for PingProbe {
    async fn is_reachable(&self, host: &str) -> bool {
        let reachable = tokio::time::timeout(self.timeout, self.probe(host))
            .await
            .unwrap_or(false);
        trace!(host, reachable, "reachability probe");
        reachable
    }
}
