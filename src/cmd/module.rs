// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Module command implementation for zeedas-rs.

use super::print_json;
use super::server::report_outcome;
use crate::cli::module::{ModuleArgs, ModuleSubcommand};
use crate::error::Result;
use crate::provider::EntryKind;
use crate::remote::DeployOutcome;
use crate::workflow::Engine;

/// Main handler for module command.
///
/// # Errors
///
/// Returns an error if the engine operation fails or a triggered deployment
/// does not complete.
pub async fn run_module_command(args: &ModuleArgs, engine: &Engine) -> Result<()> {
    match &args.subcommand {
        ModuleSubcommand::Branch(t) => {
            engine.create_branch(&t.app, &t.module).await;
            println!("Branch ensured for {}", t.module);
        }
        ModuleSubcommand::Submit(t) => {
            let record = engine.submit(&t.app, &t.module).await?;
            println!(
                "Submission {} of {} recorded ({} versions, review {})",
                record.submission_count,
                t.module,
                record.version_count(),
                record.review_id
            );
        }
        ModuleSubcommand::Approve(t) => {
            let outcome = engine.approve(&t.app, &t.module).await?;
            println!("Approved {}", t.module);
            deployed(outcome.as_ref())?;
        }
        ModuleSubcommand::Reject(t) => {
            let outcome = engine.reject(&t.app, &t.module).await?;
            println!("Rejected {}", t.module);
            deployed(outcome.as_ref())?;
        }
        ModuleSubcommand::Test(t) => {
            let outcome = engine.test_submission(&t.app, &t.module).await?;
            deployed(outcome.as_ref())?;
        }
        ModuleSubcommand::Show(t) => match engine.fetch_submission(&t.app, &t.module).await? {
            Some(record) => print_json(&record)?,
            None => println!("No open submission for {}", t.module),
        },
        ModuleSubcommand::Tree(args) => {
            let entries = engine
                .branch_tree(&args.target.app, &args.target.module, &args.path)
                .await?;
            for entry in entries {
                let marker = match entry.kind {
                    EntryKind::Dir => "dir ",
                    EntryKind::File => "file",
                };
                println!("{marker} {}", entry.path);
            }
        }
        ModuleSubcommand::File(args) => {
            let entry = engine
                .branch_file(&args.target.app, &args.target.module, &args.path)
                .await?;
            print_json(&entry)?;
        }
        ModuleSubcommand::AddFile(args) => {
            engine
                .add_to_tree(&args.target.app, &args.target.module, &args.path)
                .await?;
            println!("Added {}", args.path);
        }
    }
    Ok(())
}

fn deployed(outcome: Option<&DeployOutcome>) -> Result<()> {
    match outcome {
        Some(outcome) => report_outcome(outcome),
        None => {
            println!("No server configured, nothing deployed");
            Ok(())
        }
    }
}
