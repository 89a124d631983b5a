// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the `rpc` command.
//!
//! ```text
//! zeedas rpc submit '{"app":"a1","module":"m1"}'
//!   -> {"code":200,"message":"success","data":{"done":true}}
//! ```

use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct RpcArgs {
    /// One of createBranch, submit, approve, reject.
    #[arg(value_name = "METHOD")]
    pub method: String,

    /// JSON payload, `-` reads it from stdin.
    #[arg(value_name = "PAYLOAD")]
    pub payload: String,
}
