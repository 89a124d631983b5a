// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Module submission commands.
//!
//! ```text
//! module branch   APP MODULE         -> ensure <module>-zeedas off QA
//! module submit   APP MODULE         -> open/refresh review, record versions
//! module approve  APP MODULE         -> QA -> MAIN, deploy, close
//! module reject   APP MODULE         -> revert on server, close
//! module test     APP MODULE         -> merge into QA, dry deploy
//! module show     APP MODULE         -> review record
//! module tree     APP MODULE [PATH]  -> feature-branch listing
//! module file     APP MODULE PATH    -> one feature-branch file
//! module add-file APP MODULE PATH    -> commit an empty file
//! ```

use clap::{Args, Subcommand};

/// Arguments for the `module` command.
#[derive(Debug, Clone, Args)]
pub struct ModuleArgs {
    #[command(subcommand)]
    pub subcommand: ModuleSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ModuleSubcommand {
    /// Creates the module's feature branch off QA if missing.
    Branch(ModuleTarget),

    /// Submits the module for review.
    Submit(ModuleTarget),

    /// Approves the submission, promotes QA and deploys.
    Approve(ModuleTarget),

    /// Rejects the submission and reverts it on the server.
    Reject(ModuleTarget),

    /// Merges the submission into QA and runs a dry deployment.
    Test(ModuleTarget),

    /// Prints the open review record.
    Show(ModuleTarget),

    /// Lists a directory of the feature branch.
    Tree(TreeArgs),

    /// Shows one file entry of the feature branch.
    File(PathArgs),

    /// Commits an empty file to the feature branch.
    #[command(name = "add-file")]
    AddFile(PathArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ModuleTarget {
    #[arg(value_name = "APP")]
    pub app: String,

    #[arg(value_name = "MODULE")]
    pub module: String,
}

#[derive(Debug, Clone, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub target: ModuleTarget,

    /// Directory to list; the root when omitted.
    #[arg(value_name = "PATH", default_value = "")]
    pub path: String,
}

#[derive(Debug, Clone, Args)]
pub struct PathArgs {
    #[command(flatten)]
    pub target: ModuleTarget,

    #[arg(value_name = "PATH")]
    pub path: String,
}
