// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! RPC command implementation for zeedas-rs.

use anyhow::{Context, bail};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use super::print_json;
use crate::api::Reply;
use crate::cli::rpc::RpcArgs;
use crate::error::Result;
use crate::rpc::Dispatcher;
use crate::workflow::Engine;

/// Run one dispatcher call and print its reply envelope.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the reply code is not a success.
pub async fn run_rpc_command(args: &RpcArgs, engine: Arc<Engine>) -> Result<()> {
    let payload = if args.payload == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read payload from stdin")?;
        buf
    } else {
        args.payload.clone()
    };

    let reply: Reply<serde_json::Value> = Dispatcher::new(engine)
        .call(&args.method, &payload)
        .await
        .into();
    print_json(&reply)?;
    if !reply.is_ok() {
        bail!("{} failed with {}", args.method, reply.code);
    }
    Ok(())
}
