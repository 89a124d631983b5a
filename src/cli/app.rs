// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential record commands.
//!
//! ```text
//! app init    APP -a ACCOUNT          -> create (or repair) the record
//! app show    APP                     -> record, tokens refreshed
//! app reset   APP -a ACCOUNT PROVIDER -> clear one binding slot
//! app default APP -a ACCOUNT PROVIDER -> make PROVIDER the only default
//! ```

use clap::{Args, Subcommand, ValueEnum};

use crate::model::Provider;

/// Arguments for the `app` command.
#[derive(Debug, Clone, Args)]
pub struct AppArgs {
    #[command(subcommand)]
    pub subcommand: AppSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AppSubcommand {
    /// Creates the credential record for an application.
    Init(OwnedApp),

    /// Prints the credential record as JSON (secrets included).
    Show(AppId),

    /// Clears the url, project, tokens and default flag of one provider.
    Reset(ProviderTarget),

    /// Makes one provider the default.
    Default(ProviderTarget),
}

/// An application id.
#[derive(Debug, Clone, Args)]
pub struct AppId {
    #[arg(value_name = "APP")]
    pub app: String,
}

/// An application id plus the account owning it.
#[derive(Debug, Clone, Args)]
pub struct OwnedApp {
    #[arg(value_name = "APP")]
    pub app: String,

    /// Owning account (team) id.
    #[arg(short = 'a', long, value_name = "ACCOUNT")]
    pub account: String,
}

/// An owned application and one of its provider slots.
#[derive(Debug, Clone, Args)]
pub struct ProviderTarget {
    #[command(flatten)]
    pub owner: OwnedApp,

    #[arg(value_enum, value_name = "PROVIDER")]
    pub provider: ProviderName,
}

/// Hosting provider as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderName {
    Github,
    Gitlab,
    Bitbucket,
}

impl From<ProviderName> for Provider {
    fn from(name: ProviderName) -> Self {
        match name {
            ProviderName::Github => Self::Github,
            ProviderName::Gitlab => Self::Gitlab,
            ProviderName::Bitbucket => Self::Bitbucket,
        }
    }
}
