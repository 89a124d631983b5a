// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers --> Engine
//!   app, provider, server, module, rpc, config
//!
//! build_engine(&Config):
//!   JsonFileStore (store.path)  --> credentials + reviews
//!   Gateways::from_config       --> GitHub / GitLab / Bitbucket
//!   LocalArtifactStore          --> store.artifacts_dir
//!   Deployer(PingProbe, SshConnector, TracingLogSink, deploy.scratch_dir)
//! ```

pub mod app;
pub mod config;
pub mod module;
pub mod provider;
pub mod rpc;
pub mod server;

use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::provider::Gateways;
use crate::remote::{Connector, Deployer, PingProbe, ReachabilityProbe, SshConnector};
use crate::store::{CredentialStore, JsonFileStore, LogSink, ReviewStore, TracingLogSink};
use crate::workflow::{ArtifactStore, Engine, LocalArtifactStore};

/// Wire the engine against the configured stores, providers and server access.
///
/// # Errors
///
/// Returns an error if the record store cannot be opened.
pub async fn build_engine(config: &Config) -> Result<Arc<Engine>> {
    let store = Arc::new(
        JsonFileStore::open(&config.store.path)
            .await
            .with_context(|| format!("failed to open store {}", config.store.path.display()))?,
    );

    let deploy = &config.deploy;
    let deployer = Deployer::new(
        Arc::new(PingProbe::new(deploy.ping_timeout(), deploy.ssh_port)) as Arc<dyn ReachabilityProbe>,
        Arc::new(SshConnector::new(deploy.connect_timeout())) as Arc<dyn Connector>,
        Arc::new(TracingLogSink) as Arc<dyn LogSink>,
        &deploy.scratch_dir,
    )
    .with_port(deploy.ssh_port);

    let artifacts = LocalArtifactStore::new(
        &config.store.artifacts_dir,
        config.store.artifacts_base_url.clone(),
    );

    debug!(store = %config.store.path.display(), "engine wired");
    Ok(Arc::new(
        Engine::builder()
            .credentials(Arc::clone(&store) as Arc<dyn CredentialStore>)
            .reviews(store as Arc<dyn ReviewStore>)
            .gateways(Gateways::from_config(&config.providers))
            .artifacts(Arc::new(artifacts) as Arc<dyn ArtifactStore>)
            .deployer(Arc::new(deployer))
            .build(),
    ))
}

/// Print `value` as indented JSON on stdout.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
