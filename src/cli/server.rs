// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deployment server commands.
//!
//! ```text
//! server set  APP -a ACCOUNT --host H --user U --path P
//!             (--password-env VAR | --key-file FILE)
//!             [--build CMD] [--run CMD]
//! server test APP -a ACCOUNT          -> connect, pull, checkout
//! ```

use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::app::OwnedApp;

/// Arguments for the `server` command.
#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub subcommand: ServerSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ServerSubcommand {
    /// Stores the deployment server profile.
    Set(SetServerArgs),

    /// Runs a dry deployment (no build or run) against the stored profile.
    Test(OwnedApp),
}

#[derive(Debug, Clone, Args)]
pub struct SetServerArgs {
    #[command(flatten)]
    pub owner: OwnedApp,

    #[arg(long, value_name = "HOST")]
    pub host: String,

    #[arg(long, value_name = "USER")]
    pub user: String,

    /// Directory on the server holding the repository checkout.
    #[arg(long, value_name = "DIR")]
    pub path: String,

    /// Name of the environment variable holding the SSH password.
    #[arg(long = "password-env", value_name = "VAR", conflicts_with = "key_file", required_unless_present = "key_file")]
    pub password_env: Option<String>,

    /// Private key file (PEM).
    #[arg(long = "key-file", value_name = "FILE")]
    pub key_file: Option<PathBuf>,

    /// Build command run after checkout.
    #[arg(long, value_name = "CMD")]
    pub build: Option<String>,

    /// Run command executed after the build.
    #[arg(long, value_name = "CMD")]
    pub run: Option<String>,
}
