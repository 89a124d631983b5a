// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! App command implementation for zeedas-rs.

use anyhow::bail;

use super::print_json;
use crate::cli::app::{AppArgs, AppSubcommand};
use crate::error::Result;
use crate::model::Provider;
use crate::workflow::Engine;

/// Main handler for app command.
///
/// # Errors
///
/// Returns an error if the record does not exist or cannot be stored.
pub async fn run_app_command(args: &AppArgs, engine: &Engine) -> Result<()> {
    match &args.subcommand {
        AppSubcommand::Init(owner) => {
            let record = engine.initiate(&owner.app, &owner.account).await?;
            println!("Initialized {} for {}", record.app, record.account);
        }
        AppSubcommand::Show(id) => {
            let Some(record) = engine.get(&id.app).await? else {
                bail!("app '{}' not found", id.app);
            };
            print_json(&record)?;
        }
        AppSubcommand::Reset(target) => {
            let provider = Provider::from(target.provider);
            engine
                .reset(&target.owner.app, &target.owner.account, provider)
                .await?;
            println!("Reset {provider} binding of {}", target.owner.app);
        }
        AppSubcommand::Default(target) => {
            let provider = Provider::from(target.provider);
            engine
                .set_default_provider(&target.owner.app, &target.owner.account, provider)
                .await?;
            println!("{provider} is now the default for {}", target.owner.app);
        }
    }
    Ok(())
}
