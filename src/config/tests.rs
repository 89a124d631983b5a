// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Config, ConfigLoader};
use crate::logging::LogLevel;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert_eq!(config.store.path, PathBuf::from("zeedas.json"));
    assert_eq!(config.providers.github.api_url, "https://api.github.com");
    assert_eq!(config.providers.github.user_agent, "Zeedas");
    assert_eq!(config.providers.gitlab.api_url, "https://gitlab.com/api/v4");
    assert_eq!(
        config.providers.bitbucket.oauth_url,
        "https://bitbucket.org/site/oauth2/access_token"
    );
    assert_eq!(config.deploy.ping_timeout_secs, 2);
    assert_eq!(config.deploy.ssh_port, 22);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_sections() {
    let config = Config::parse(
        r#"
[global]
output_log_level = 4
log_json = true

[store]
path = "/var/lib/zeedas/db.json"
artifacts_base_url = "https://files.example.com"

[providers.gitlab]
client_id = "gl-id"
client_secret = "gl-secret"
api_url = "http://127.0.0.1:9000/api/v4"

[deploy]
ping_timeout_secs = 5
ssh_port = 2222
"#,
    )
    .unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert!(config.global.log_json);
    assert_eq!(config.store.path, PathBuf::from("/var/lib/zeedas/db.json"));
    assert_eq!(config.providers.gitlab.client_secret, "gl-secret");
    assert_eq!(config.providers.gitlab.api_url, "http://127.0.0.1:9000/api/v4");
    // untouched sections keep defaults
    assert_eq!(config.providers.github.api_url, "https://api.github.com");
    assert_eq!(config.deploy.ping_timeout().as_secs(), 5);
    assert_eq!(config.deploy.ssh_port, 2222);
}

#[test]
fn test_unknown_key_rejected() {
    let result = Config::parse(
        r"
[deploy]
ping_timeout = 5
",
    );
    assert!(result.is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = Config::parse(
        r"
[global]
output_log_level = 9
",
    );
    assert!(result.is_err());
}

#[test]
fn test_zero_ping_timeout_rejected() {
    let err = Config::parse(
        r"
[deploy]
ping_timeout_secs = 0
",
    )
    .unwrap_err();
    assert!(err.to_string().contains("ping_timeout_secs"), "{err}");
}

#[test]
fn test_non_http_endpoint_rejected() {
    let err = Config::parse(
        r#"
[providers.bitbucket]
web_url = "bitbucket.org"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("web_url"), "{err}");
}

#[test]
fn test_overrides_win_over_files() {
    let config = ConfigLoader::new()
        .add_toml_str("[deploy]\nssh_port = 2200\n")
        .apply_overrides(["deploy.ssh_port=2201", "store/path=/tmp/db.json"])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.deploy.ssh_port, 2201);
    assert_eq!(config.store.path, PathBuf::from("/tmp/db.json"));
}

#[test]
fn test_malformed_override_rejected() {
    assert!(ConfigLoader::new().apply_overrides(["no-equals"]).is_err());
    assert!(ConfigLoader::new().apply_overrides(["=value"]).is_err());
}

#[test]
fn test_format_options_hides_secrets() {
    let mut config = Config::default();
    config.providers.github.client_secret = "super-secret".to_string();

    let options = config.format_options();
    let secret_line = options
        .iter()
        .find(|line| line.starts_with("providers.github.client_secret"))
        .unwrap();
    assert!(secret_line.ends_with("= [hidden]"), "{secret_line}");
    assert!(options.iter().all(|line| !line.contains("super-secret")));
}

#[test]
fn test_loaded_files_listing() {
    let loader = ConfigLoader::new()
        .add_toml_str("")
        .add_toml_file_optional("definitely-missing-zeedas.toml");
    insta::assert_snapshot!(loader.format_loaded_files().join("\n"), @"1. [string] <string>");
}
