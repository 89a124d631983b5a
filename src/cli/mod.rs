// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for zeedas-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! zeedas [global options] <command>
//! version
//! options | inis
//! app      {init|show|reset|default}
//! provider {auth|repos|bind}
//! server   {set|test}
//! module   {branch|submit|approve|reject|test|show|tree|file|add-file}
//! rpc      <method> <payload>
//! ```

pub mod app;
pub mod global;
pub mod module;
pub mod provider;
pub mod rpc;
pub mod server;

#[cfg(test)]
mod tests;

use crate::cli::app::AppArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::module::ModuleArgs;
use crate::cli::provider::ProviderArgs;
use crate::cli::rpc::RpcArgs;
use crate::cli::server::ServerArgs;
use clap::{Parser, Subcommand};

/// Provider-unified review workflow and deployment engine.
#[derive(Debug, Parser)]
#[command(
    name = "zeedas",
    author,
    version,
    about = "Review workflow and deployment engine",
    long_about = "zeedas-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Drives module submissions through GitHub, GitLab or Bitbucket\n\
                  reviews and deploys approved work to a server over SSH.\n\n\
                  Typical flow: `zeedas app init`, `zeedas provider auth`,\n\
                  `zeedas provider bind`, `zeedas server set`, then\n\
                  `zeedas module submit|approve|reject` per module.",
    after_help = "CONFIG FILES:\n\n\
                  zeedas reads `zeedas.toml` from the current directory when it\n\
                  exists, then every file given with --ini, then ZEEDAS_* environment\n\
                  variables (ZEEDAS_PROVIDERS__GITHUB__CLIENT_ID=...), then --set.\n\
                  Use --no-default-inis to skip `zeedas.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Inis,

    /// Manages application credential records.
    App(AppArgs),

    /// Integrates hosting providers and binds repositories.
    Provider(ProviderArgs),

    /// Manages the deployment server profile.
    Server(ServerArgs),

    /// Drives module submissions.
    Module(ModuleArgs),

    /// Calls a workflow operation with a JSON payload.
    Rpc(RpcArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
