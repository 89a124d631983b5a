// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential record management, provider integration and server profiles.

use tracing::{debug, info};

use super::{Engine, NO_DEFAULT, credential_key};
use crate::error::{ZeedasResult, bad_input};
use crate::model::{AppCredential, Provider, RepoAccess, ServerProfile, is_valid_host};
use crate::provider::Repository;
use crate::remote::{DeployMode, DeployOutcome};

impl Engine {
    /// Create the record for `app` if it does not exist yet, repairing a
    /// malformed binding list otherwise.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn initiate(&self, app: &str, account: &str) -> ZeedasResult<AppCredential> {
        match self.credentials.find_by_app_account(app, account).await? {
            Some(mut record) => {
                if record.normalize() {
                    self.credentials.save(&record).await?;
                    info!(app, "repaired binding list");
                }
                Ok(record)
            }
            None => {
                let record = AppCredential::initiate(app, account);
                self.credentials.save(&record).await?;
                info!(app, account, "initiated credential record");
                Ok(record)
            }
        }
    }

    /// The record for `app`, with expiring default-provider tokens refreshed.
    ///
    /// # Errors
    ///
    /// Propagates store failures. Refresh failures are only logged.
    pub async fn get(&self, app: &str) -> ZeedasResult<Option<AppCredential>> {
        let Some(mut record) = self.credentials.find_by_app(app).await? else {
            return Ok(None);
        };
        record.normalize();
        let Some(provider) = record.default_binding().map(|b| b.provider) else {
            return Ok(Some(record));
        };
        let gateway = self.gateways.get(provider)?;
        Ok(Some(
            self.refresh_tokens(record, provider, gateway.as_ref()).await?,
        ))
    }

    /// Clear one provider slot.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn reset(
        &self,
        app: &str,
        account: &str,
        provider: Provider,
    ) -> ZeedasResult<AppCredential> {
        let mut record = self.initiate(app, account).await?;
        record.reset_binding(provider)?;
        self.credentials.save(&record).await?;
        info!(app, %provider, "reset binding");
        Ok(record)
    }

    /// Make `provider` the only default binding.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn set_default_provider(
        &self,
        app: &str,
        account: &str,
        provider: Provider,
    ) -> ZeedasResult<AppCredential> {
        let mut record = self.initiate(app, account).await?;
        record.set_default_provider(provider)?;
        self.credentials.save(&record).await?;
        info!(app, %provider, "default provider changed");
        Ok(record)
    }

    /// Exchange an OAuth code and store the resulting tokens.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` if the record does not exist, `InvalidAccessCredentials`
    /// if the exchange fails.
    pub async fn integrate(
        &self,
        app: &str,
        account: &str,
        provider: Provider,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> ZeedasResult<AppCredential> {
        let mut record = self.load_owned(app, account).await?;
        let gateway = self.gateways.get(provider)?;
        let pair = gateway.exchange_auth_code(code, redirect_uri).await?;

        let binding = record.binding_mut(provider)?;
        binding.access_token = Some(pair.access_token);
        if gateway.tokens_expire() {
            binding.refresh_token = pair.refresh_token;
        }
        self.credentials.save(&record).await?;
        info!(app, %provider, "provider integrated");
        Ok(record)
    }

    /// Repositories visible to the stored token for `provider`.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` if the record or token is missing,
    /// `InvalidAccessCredentials` if the provider call fails.
    pub async fn list_repositories(
        &self,
        app: &str,
        account: &str,
        provider: Provider,
    ) -> ZeedasResult<Vec<Repository>> {
        let record = self.load_owned(app, account).await?;
        let gateway = self.gateways.get(provider)?;
        let record = self.refresh_tokens(record, provider, gateway.as_ref()).await?;
        let binding = record
            .binding(provider)
            .ok_or_else(|| bad_input("No config for this provider"))?;
        gateway.list_repositories(binding.token()?).await
    }

    /// Bind `project` to the provider slot and make it the default.
    ///
    /// When the resolved clone URL is unchanged only the default flag is
    /// normalized. Otherwise the URL and project are stored and the baseline
    /// branches are created where missing.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` if the record or token is missing,
    /// `InvalidAccessCredentials` if a provider call fails.
    pub async fn bind_repository(
        &self,
        app: &str,
        account: &str,
        provider: Provider,
        project: &str,
    ) -> ZeedasResult<AppCredential> {
        let record = self.load_owned(app, account).await?;
        let gateway = self.gateways.get(provider)?;
        let mut record = self.refresh_tokens(record, provider, gateway.as_ref()).await?;

        let binding = record
            .binding(provider)
            .ok_or_else(|| bad_input("No config for this provider"))?;
        let token = binding.token()?.to_string();
        let access = RepoAccess {
            project,
            token: &token,
        };
        let url = gateway.resolve_clone_url(access).await?;

        if binding.url.as_deref() == Some(url.as_str()) && binding.project.as_deref() == Some(project)
        {
            if !binding.default {
                record.set_default_provider(provider)?;
                self.credentials.save(&record).await?;
            }
            debug!(app, %provider, project, "repository already bound");
            return Ok(record);
        }

        let binding = record.binding_mut(provider)?;
        binding.url = Some(url);
        binding.project = Some(project.to_string());
        record.set_default_provider(provider)?;
        self.credentials.save(&record).await?;

        gateway.ensure_baselines(access).await?;
        info!(app, %provider, project, "repository bound");
        Ok(record)
    }

    /// Store the deployment server profile.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` if the host is not a plain host name or the record
    /// does not exist.
    pub async fn save_server_config(
        &self,
        app: &str,
        account: &str,
        profile: ServerProfile,
    ) -> ZeedasResult<AppCredential> {
        if !is_valid_host(&profile.host) {
            return Err(bad_input(format!("Invalid server host: {:?}", profile.host)));
        }
        let _serial = self.locks.lock(&credential_key(app)).await;
        let mut record = self
            .credentials
            .find_by_app_account(app, account)
            .await?
            .ok_or_else(|| bad_input("Cannot find this app"))?;
        record.normalize();
        info!(app, host = %profile.host, mechanism = %profile.auth.mechanism(), "server profile saved");
        record.server = Some(profile);
        self.credentials.save(&record).await?;
        Ok(record)
    }

    /// Dry-run deployment against the stored server profile: connect, pull
    /// and check out, without build or run.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` if the app has no bound default repository or no
    /// server profile. Pipeline failures are reported in the outcome.
    pub async fn test_server_config(&self, app: &str, account: &str) -> ZeedasResult<DeployOutcome> {
        let record = self
            .credentials
            .find_by_app_account(app, account)
            .await?
            .ok_or_else(|| bad_input("Cannot find this app"))?;
        let binding = record.default_binding().ok_or_else(|| bad_input(NO_DEFAULT))?;
        if !binding.is_bound() || binding.token().is_err() {
            return Err(bad_input("Cannot add server without repository"));
        }
        let profile = record
            .server
            .as_ref()
            .ok_or_else(|| bad_input("No server configured for this app"))?;
        Ok(self.deployer.deploy(app, profile, DeployMode::TestConfig).await)
    }
}
