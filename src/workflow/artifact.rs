// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Snapshot storage for submitted file versions.
//!
//! ```text
//! save_file(app, module, version, "src/lib.rs", source_url)
//!     Downloader --> <root>/<app>/<module>/<version>/src/lib.rs
//!     returns   --> <base_url>/<app>/<module>/<version>/src/lib.rs
//!                   (or the local path without a base URL)
//! ```
//!
//! `version` is the commit that produced the change, so every recorded
//! version of a file keeps its own snapshot.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::{ZeedasResult, bad_input};
use crate::net::Downloader;

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Copy the file at `source_url` into the store and return its public URL.
    /// Distinct `version`s of the same `path` never share a URL.
    async fn save_file(
        &self,
        app: &str,
        module: &str,
        version: &str,
        path: &str,
        source_url: &str,
    ) -> ZeedasResult<String>;
}

/// Filesystem-backed store, typically served as static files.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
    base_url: String,
}

/// Reject anything but plain names so a path cannot escape the store root.
fn relative(part: &str) -> ZeedasResult<PathBuf> {
    let candidate = Path::new(part.trim_matches('/'));
    let clean = candidate
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !clean || candidate.as_os_str().is_empty() {
        return Err(bad_input(format!("invalid artifact path: {part}")));
    }
    Ok(candidate.to_path_buf())
}

impl LocalArtifactStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination on disk and the URL it will be served under.
    ///
    /// # Errors
    ///
    /// Returns `BadInputFormat` if any part is empty or not a plain relative path.
    pub fn locate(
        &self,
        app: &str,
        module: &str,
        version: &str,
        path: &str,
    ) -> ZeedasResult<(PathBuf, String)> {
        let relative = relative(app)?
            .join(relative(module)?)
            .join(relative(version)?)
            .join(relative(path)?);
        let target = self.root.join(&relative);
        let url = if self.base_url.is_empty() {
            target.display().to_string()
        } else {
            let tail: Vec<String> = relative
                .components()
                .map(|c| urlencoding::encode(&c.as_os_str().to_string_lossy()).into_owned())
                .collect();
            format!("{}/{}", self.base_url.trim_end_matches('/'), tail.join("/"))
        };
        Ok((target, url))
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn save_file(
        &self,
        app: &str,
        module: &str,
        version: &str,
        path: &str,
        source_url: &str,
    ) -> ZeedasResult<String> {
        let (target, url) = self.locate(app, module, version, path)?;
        Downloader::new().url(source_url).file(&target).download().await?;
        debug!(app, module, version, path, target = %target.display(), "stored artifact");
        Ok(url)
    }
}
