// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Server command implementation for zeedas-rs.

use anyhow::{Context, bail};

use crate::cli::server::{ServerArgs, ServerSubcommand, SetServerArgs};
use crate::error::Result;
use crate::model::{Commands, ServerAuth, ServerProfile};
use crate::remote::DeployOutcome;
use crate::workflow::Engine;

/// Main handler for server command.
///
/// # Errors
///
/// Returns an error if the profile cannot be built or stored, or if the
/// test deployment fails.
pub async fn run_server_command(args: &ServerArgs, engine: &Engine) -> Result<()> {
    match &args.subcommand {
        ServerSubcommand::Set(set) => {
            let profile = build_profile(set).await?;
            engine
                .save_server_config(&set.owner.app, &set.owner.account, profile)
                .await?;
            println!("Server profile saved for {}", set.owner.app);
            Ok(())
        }
        ServerSubcommand::Test(owner) => {
            let outcome = engine.test_server_config(&owner.app, &owner.account).await?;
            report_outcome(&outcome)
        }
    }
}

/// Assemble a profile, reading the secret from the environment or a key file.
///
/// # Errors
///
/// Returns an error if the password variable is unset or the key file unreadable.
pub async fn build_profile(args: &SetServerArgs) -> Result<ServerProfile> {
    let auth = match (&args.password_env, &args.key_file) {
        (Some(var), _) => ServerAuth::Password {
            password: std::env::var(var)
                .with_context(|| format!("environment variable {var} is not set"))?,
        },
        (None, Some(path)) => ServerAuth::PrivateKey {
            key: tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read key file {}", path.display()))?,
        },
        (None, None) => bail!("either --password-env or --key-file is required"),
    };
    Ok(ServerProfile {
        host: args.host.clone(),
        user: args.user.clone(),
        auth,
        path: args.path.clone(),
        commands: Commands {
            build: args.build.clone(),
            run: args.run.clone(),
        },
    })
}

/// Print a deployment outcome; a failed pipeline is an error.
///
/// # Errors
///
/// Returns an error describing the failed stage.
pub fn report_outcome(outcome: &DeployOutcome) -> Result<()> {
    match outcome {
        DeployOutcome::Completed => {
            println!("Deployment completed");
            Ok(())
        }
        DeployOutcome::Failed { stage, reason } => bail!("deployment failed at {stage}: {reason}"),
    }
}
