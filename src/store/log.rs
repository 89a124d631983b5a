// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deployment log sinks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use super::LogSink;

/// Prefix of every line that ends a pipeline early.
pub const FAILURE_PREFIX: &str = "Process Terminated: ";

/// One line of deployment progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Keeps every line in memory, per application, in append order.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    entries: Mutex<HashMap<String, Vec<LogEntry>>>,
}

impl MemoryLogSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<LogEntry>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Messages recorded for `app`, oldest first.
    #[must_use]
    pub fn lines(&self, app: &str) -> Vec<String> {
        self.entries()
            .get(app)
            .map(|entries| entries.iter().map(|e| e.message.clone()).collect())
            .unwrap_or_default()
    }

    /// Lines for `app` that report a pipeline failure.
    #[must_use]
    pub fn failures(&self, app: &str) -> Vec<String> {
        self.lines(app)
            .into_iter()
            .filter(|line| line.starts_with(FAILURE_PREFIX))
            .collect()
    }
}

#[async_trait]
impl LogSink for MemoryLogSink {
    async fn append(&self, app: &str, message: &str) {
        self.entries()
            .entry(app.to_string())
            .or_default()
            .push(LogEntry {
                message: message.to_string(),
                timestamp: Utc::now(),
            });
    }

    async fn reset(&self, app: &str) {
        self.entries().remove(app);
    }
}

/// Forwards deployment lines to `tracing`, tagged with the application.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

#[async_trait]
impl LogSink for TracingLogSink {
    async fn append(&self, app: &str, message: &str) {
        if message.starts_with(FAILURE_PREFIX) {
            warn!(target: "deployment", app, "{message}");
        } else {
            info!(target: "deployment", app, "{message}");
        }
    }

    async fn reset(&self, app: &str) {
        info!(target: "deployment", app, "log reset");
    }
}
