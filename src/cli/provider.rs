// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider integration commands.
//!
//! ```text
//! provider auth  APP -a ACCOUNT PROVIDER CODE [--redirect-uri URI]
//! provider repos APP -a ACCOUNT PROVIDER
//! provider bind  APP -a ACCOUNT PROVIDER PROJECT
//! ```

use clap::{Args, Subcommand};

use super::app::ProviderTarget;

/// Arguments for the `provider` command.
#[derive(Debug, Clone, Args)]
pub struct ProviderArgs {
    #[command(subcommand)]
    pub subcommand: ProviderSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProviderSubcommand {
    /// Exchanges an OAuth authorization code and stores the tokens.
    Auth(AuthArgs),

    /// Lists repositories visible to the stored token.
    Repos(ProviderTarget),

    /// Binds a repository and makes the provider the default.
    Bind(BindArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AuthArgs {
    #[command(flatten)]
    pub target: ProviderTarget,

    /// Authorization code returned by the provider.
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Redirect URI registered with the OAuth application.
    #[arg(long = "redirect-uri", value_name = "URI")]
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct BindArgs {
    #[command(flatten)]
    pub target: ProviderTarget,

    /// Repository id as listed by `provider repos`.
    #[arg(value_name = "PROJECT")]
    pub project: String,
}
