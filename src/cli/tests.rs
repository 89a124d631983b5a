// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::app::{AppSubcommand, ProviderName};
use crate::cli::module::ModuleSubcommand;
use crate::cli::provider::ProviderSubcommand;
use crate::cli::server::ServerSubcommand;
use crate::cli::{Cli, Command};
use crate::model::Provider;
use clap::Parser;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["zeedas", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "zeedas",
        "-l",
        "5",
        "--store",
        "/tmp/records.json",
        "--set",
        "deploy.ssh_port=2222",
        "options",
    ])
    .unwrap();
    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(
        cli.global.to_config_overrides(),
        vec![
            "deploy.ssh_port=2222".to_string(),
            "global.output_log_level=5".to_string(),
            "global.file_log_level=5".to_string(),
            "store.path=/tmp/records.json".to_string(),
        ]
    );
}

#[test]
fn test_log_level_out_of_range_is_rejected() {
    assert!(Cli::try_parse_from(["zeedas", "-l", "9", "version"]).is_err());
}

#[test]
fn test_parse_app_default() {
    let cli =
        Cli::try_parse_from(["zeedas", "app", "default", "shop", "-a", "team1", "gitlab"]).unwrap();
    let Some(Command::App(args)) = cli.command else {
        panic!("expected app command");
    };
    let AppSubcommand::Default(target) = args.subcommand else {
        panic!("expected default subcommand");
    };
    assert_eq!(target.owner.app, "shop");
    assert_eq!(target.owner.account, "team1");
    assert_eq!(Provider::from(target.provider), Provider::Gitlab);
}

#[test]
fn test_parse_provider_auth_with_redirect() {
    let cli = Cli::try_parse_from([
        "zeedas",
        "provider",
        "auth",
        "shop",
        "--account",
        "team1",
        "bitbucket",
        "abc123",
        "--redirect-uri",
        "https://zeedas.test/cb",
    ])
    .unwrap();
    let Some(Command::Provider(args)) = cli.command else {
        panic!("expected provider command");
    };
    let ProviderSubcommand::Auth(auth) = args.subcommand else {
        panic!("expected auth subcommand");
    };
    assert_eq!(auth.target.provider, ProviderName::Bitbucket);
    assert_eq!(auth.code, "abc123");
    assert_eq!(auth.redirect_uri.as_deref(), Some("https://zeedas.test/cb"));
}

#[test]
fn test_unknown_provider_is_rejected() {
    let result =
        Cli::try_parse_from(["zeedas", "provider", "repos", "shop", "-a", "t", "sourceforge"]);
    assert!(result.is_err());
}

#[test]
fn test_server_set_requires_one_secret() {
    let base = [
        "zeedas", "server", "set", "shop", "-a", "team1", "--host", "10.0.0.5", "--user",
        "deploy", "--path", "/srv/shop",
    ];
    assert!(Cli::try_parse_from(base).is_err());

    let mut with_both = base.to_vec();
    with_both.extend(["--password-env", "PW", "--key-file", "id_rsa"]);
    assert!(Cli::try_parse_from(with_both).is_err());

    let mut with_key = base.to_vec();
    with_key.extend(["--key-file", "id_rsa", "--build", "make"]);
    let cli = Cli::try_parse_from(with_key).unwrap();
    let Some(Command::Server(args)) = cli.command else {
        panic!("expected server command");
    };
    let ServerSubcommand::Set(set) = args.subcommand else {
        panic!("expected set subcommand");
    };
    assert_eq!(set.build.as_deref(), Some("make"));
    assert!(set.password_env.is_none());
}

#[test]
fn test_parse_module_tree_defaults_to_root() {
    let cli = Cli::try_parse_from(["zeedas", "module", "tree", "shop", "cart"]).unwrap();
    let Some(Command::Module(args)) = cli.command else {
        panic!("expected module command");
    };
    let ModuleSubcommand::Tree(tree) = args.subcommand else {
        panic!("expected tree subcommand");
    };
    assert_eq!(tree.target.module, "cart");
    assert_eq!(tree.path, "");
}

#[test]
fn test_parse_module_add_file() {
    let cli =
        Cli::try_parse_from(["zeedas", "module", "add-file", "shop", "cart", "src/cart.js"])
            .unwrap();
    assert!(matches!(
        cli.command,
        Some(Command::Module(ref args)) if matches!(args.subcommand, ModuleSubcommand::AddFile(_))
    ));
}

#[test]
fn test_parse_rpc() {
    let cli =
        Cli::try_parse_from(["zeedas", "rpc", "submit", r#"{"app":"shop","module":"cart"}"#])
            .unwrap();
    let Some(Command::Rpc(args)) = cli.command else {
        panic!("expected rpc command");
    };
    assert_eq!(args.method, "submit");
}
