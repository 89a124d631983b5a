// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        app/provider/server/module
//!                |                     |
//!                |          rpc (JSON) + api (Reply)
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |     workflow::Engine      |
//!              |  submit/approve/reject,   |
//!              |  integration, browsing    |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!             provider      store    remote
//!          GitHub/GitLab/  records,  ping, SSH,
//!            Bitbucket     log sink  deploy/revert
//!                 |
//!                 v
//!                net (download)
//!
//!   +-----------------------------------------+
//!   |  model   credentials, reviews, branches |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, config,   |
//!   |               locks                     |
//!   +-----------------------------------------+
//! ```

pub mod api;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod locks;
pub mod logging;
pub mod model;
pub mod net;
pub mod provider;
pub mod remote;
pub mod rpc;
pub mod store;
pub mod workflow;
