// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! JSON-payload dispatcher for the module workflow operations.
//!
//! ```text
//! call("submit", r#"{"app":"a1","module":"m1"}"#)
//!        |                 |
//!   Method::from_str   Payload (serde_json)
//!        |                 |
//!        +--> ids present? --no--> BadInputFormat
//!                  |
//!                 yes --> Engine::{create_branch|submit|approve|reject}
//!                              --> {"done": true}
//! ```


use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ZeedasError, ZeedasResult, bad_input};
use crate::workflow::Engine;

const MISSING_IDS: &str = "Both module and app ids are required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    CreateBranch,
    Submit,
    Approve,
    Reject,
}

impl Method {
    pub const ALL: [Self; 4] = [Self::CreateBranch, Self::Submit, Self::Approve, Self::Reject];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateBranch => "createBranch",
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ZeedasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| bad_input(format!("unknown method '{s}'")))
    }
}

#[derive(Debug, Default, Deserialize)]
struct Payload {
    #[serde(default)]
    app: Option<String>,
    #[serde(default)]
    module: Option<String>,
}

impl Payload {
    fn parse(text: &str) -> ZeedasResult<Self> {
        serde_json::from_str(text).map_err(|e| bad_input(format!("invalid payload: {e}")))
    }

    fn ids(&self) -> ZeedasResult<(&str, &str)> {
        match (non_empty(self.app.as_deref()), non_empty(self.module.as_deref())) {
            (Some(app), Some(module)) => Ok((app, module)),
            _ => Err(bad_input(MISSING_IDS)),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    engine: Arc<Engine>,
}

impl Dispatcher {
    #[must_use]
    pub const fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Run `method` with the JSON `payload`.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` for unknown methods, malformed payloads or missing
    /// ids; otherwise whatever the engine operation returns.
    pub async fn call(&self, method: &str, payload: &str) -> ZeedasResult<Value> {
        let method: Method = method.parse()?;
        let payload = Payload::parse(payload)?;
        let (app, module) = payload.ids()?;
        debug!(%method, app, module, "rpc call");

        match method {
            Method::CreateBranch => self.engine.create_branch(app, module).await,
            Method::Submit => {
                self.engine.submit(app, module).await?;
            }
            Method::Approve => {
                self.engine.approve(app, module).await?;
            }
            Method::Reject => {
                self.engine.reject(app, module).await?;
            }
        }
        info!(%method, app, module, "rpc call done");
        Ok(json!({ "done": true }))
    }
}
