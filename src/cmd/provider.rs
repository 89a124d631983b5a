// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider command implementation for zeedas-rs.

use anyhow::Context;
use tracing::info;

use crate::cli::provider::{ProviderArgs, ProviderSubcommand};
use crate::error::Result;
use crate::model::Provider;
use crate::workflow::Engine;

/// Main handler for provider command.
///
/// # Errors
///
/// Returns an error if the record is missing or the provider rejects the call.
pub async fn run_provider_command(args: &ProviderArgs, engine: &Engine) -> Result<()> {
    match &args.subcommand {
        ProviderSubcommand::Auth(auth) => {
            let provider = Provider::from(auth.target.provider);
            let owner = &auth.target.owner;
            engine
                .integrate(
                    &owner.app,
                    &owner.account,
                    provider,
                    &auth.code,
                    auth.redirect_uri.as_deref(),
                )
                .await
                .with_context(|| format!("failed to integrate {provider}"))?;
            println!("{provider} integrated for {}", owner.app);
        }
        ProviderSubcommand::Repos(target) => {
            let provider = Provider::from(target.provider);
            let repos = engine
                .list_repositories(&target.owner.app, &target.owner.account, provider)
                .await?;
            if repos.is_empty() {
                println!("No repositories found");
            }
            for repo in repos {
                println!("{:<40} {}", repo.id, repo.name);
            }
        }
        ProviderSubcommand::Bind(bind) => {
            let provider = Provider::from(bind.target.provider);
            let owner = &bind.target.owner;
            let record = engine
                .bind_repository(&owner.app, &owner.account, provider, &bind.project)
                .await
                .with_context(|| format!("failed to bind {}", bind.project))?;
            let url = record
                .binding(provider)
                .and_then(|b| b.url.clone())
                .unwrap_or_default();
            info!(app = %owner.app, %provider, url = %url, "bound");
            println!("Bound {} ({url})", bind.project);
        }
    }
    Ok(())
}
