// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared HTTP client and file downloads.
//!
//! ```text
//! global_client()  OnceLock, connection pool, keep-alive
//!        |
//!        +--> provider gateways (REST)
//!        +--> Downloader
//!               .url() .file() .header()
//!                   |
//!          +--------+---------+
//!          v                  v
//!      download()      download_string()
//!          |
//!   PartialFileGuard: partial file removed on any error path
//! ```

use crate::error::{NetworkError, ZeedasResult};
use futures_util::StreamExt;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::OnceLock;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Removes a partially written file on drop unless [`keep`](Self::keep) was called.
struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Process-wide HTTP client, built once.
/// Falls back to a basic client if custom configuration fails.
pub fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("zeedas-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Async HTTP downloader with builder pattern.
///
/// # Example
/// ```ignore
/// use zeedas_rs::net::Downloader;
///
/// Downloader::new()
///     .url("https://gitlab.com/api/v4/projects/1/repository/blobs/abc/raw")
///     .file("/srv/public/app/mod1/main.rs")
///     .download()
///     .await?;
/// ```
pub struct Downloader {
    client: Client,
    url: Option<String>,
    output_file: Option<PathBuf>,
    headers: Vec<(String, String)>,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
            url: None,
            output_file: None,
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    async fn send(&self) -> ZeedasResult<(String, reqwest::Response)> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| NetworkError::InvalidUrl("no URL provided".to_string()))?;

        let mut request = self.client.get(&url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(NetworkError::Reqwest)?;
        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }
        Ok((url, response))
    }

    /// Stream the response body into the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No URL or output file is configured.
    /// - The request fails or returns a non-success status code.
    /// - The output file cannot be created or written.
    pub async fn download(&self) -> ZeedasResult<()> {
        let output = self.output_file.clone().ok_or_else(|| NetworkError::DownloadFailed {
            url: self.url.clone().unwrap_or_default(),
            message: "no output file specified".to_string(),
        })?;
        let (url, response) = self.send().await?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| NetworkError::DownloadFailed {
                    url: url.clone(),
                    message: format!("failed to create directory {}: {e}", parent.display()),
                })?;
        }

        let mut file =
            tokio::fs::File::create(&output)
                .await
                .map_err(|e| NetworkError::DownloadFailed {
                    url: url.clone(),
                    message: format!("failed to create {}: {e}", output.display()),
                })?;
        let mut guard = PartialFileGuard::new(output.clone());

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(NetworkError::Reqwest)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| NetworkError::DownloadFailed {
                    url: url.clone(),
                    message: format!("failed to write to {}: {e}", output.display()),
                })?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| NetworkError::DownloadFailed {
                url: url.clone(),
                message: format!("failed to flush {}: {e}", output.display()),
            })?;

        guard.keep();
        debug!(url = %url, path = %output.display(), bytes = written, "download complete");
        Ok(())
    }

    /// Fetch the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL is configured, the request fails, or the
    /// body is not valid text.
    pub async fn download_string(&self) -> ZeedasResult<String> {
        let (_, response) = self.send().await?;
        Ok(response.text().await.map_err(NetworkError::Reqwest)?)
    }
}
