// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config --> Command Dispatch
//!   Version | Options | Inis | App | Provider | Server | Module | Rpc
//! ```

use std::process::ExitCode;

use zeedas_rs::cli::global::GlobalOptions;
use zeedas_rs::cli::{self, Command};
use zeedas_rs::cmd::app::run_app_command;
use zeedas_rs::cmd::build_engine;
use zeedas_rs::cmd::config::{run_inis_command, run_options_command};
use zeedas_rs::cmd::module::run_module_command;
use zeedas_rs::cmd::provider::run_provider_command;
use zeedas_rs::cmd::rpc::run_rpc_command;
use zeedas_rs::cmd::server::run_server_command;
use zeedas_rs::config::Config;
use zeedas_rs::config::loader::ConfigLoader;
use zeedas_rs::logging::init_logging;
use zeedas_rs::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            load_config(&cli.global).map(|config| run_options_command(&config))
        }
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(command) => run_engine_command(command, &cli.global).await,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_engine_command(command: &Command, global: &GlobalOptions) -> zeedas_rs::error::Result<()> {
    let config = load_config(global)?;
    let engine = build_engine(&config).await?;
    match command {
        Command::App(args) => run_app_command(args, &engine).await,
        Command::Provider(args) => run_provider_command(args, &engine).await,
        Command::Server(args) => run_server_command(args, &engine).await,
        Command::Module(args) => run_module_command(args, &engine).await,
        Command::Rpc(args) => run_rpc_command(args, engine).await,
        Command::Version | Command::Options | Command::Inis => Ok(()),
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_inis {
        loader = loader.add_toml_file_optional("zeedas.toml");
    }
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix("ZEEDAS")
}

fn load_config(global: &GlobalOptions) -> zeedas_rs::error::Result<Config> {
    let loader = build_config_loader(global).apply_overrides(global.to_config_overrides())?;
    loader.build().map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })
}
