// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scoped private-key file for one pipeline run.
//!
//! ```text
//! ScratchKey::write(scratch_dir, app, key)
//!     <scratch_dir>/<seg>/        created, <seg> = escaped app id
//!     <scratch_dir>/<seg>/<seg>.key   PEM, mode 0600
//!          |
//!        drop  -> remove key file, remove <seg>/ directory
//! ```

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::pem::normalize_private_key;
use crate::error::RemoteError;

/// Owns the scratch key file and its directory; both are removed on drop.
#[derive(Debug)]
pub struct ScratchKey {
    dir: PathBuf,
    file: PathBuf,
}

/// App ids become directory names. ASCII alphanumerics and `-` pass
/// through, every other byte becomes `_XX`, so distinct ids never share a
/// directory.
fn segment(app: &str) -> String {
    if app.is_empty() {
        return "_".to_string();
    }
    let mut out = String::with_capacity(app.len());
    for byte in app.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "_{byte:02X}");
        }
    }
    out
}

impl ScratchKey {
    /// Materialize `key` for `app` under `scratch_dir`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Key` if the directory or file cannot be
    /// written. Anything already created is removed again.
    pub fn write(scratch_dir: &Path, app: &str, key: &str) -> Result<Self, RemoteError> {
        let name = segment(app);
        let dir = scratch_dir.join(&name);
        std::fs::create_dir_all(&dir)
            .map_err(|e| RemoteError::Key(format!("cannot create {}: {e}", dir.display())))?;

        // guard exists before the first write so a failed write still cleans up
        let guard = Self {
            file: dir.join(format!("{name}.key")),
            dir,
        };

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt as _;
            options.mode(0o600);
        }
        let mut file = options
            .open(&guard.file)
            .map_err(|e| RemoteError::Key(format!("cannot create key file: {e}")))?;
        file.write_all(normalize_private_key(key).as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| RemoteError::Key(format!("cannot write key file: {e}")))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            std::fs::set_permissions(&guard.file, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| RemoteError::Key(format!("cannot restrict key file: {e}")))?;
        }

        debug!(path = %guard.file.display(), "materialized private key");
        Ok(guard)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for ScratchKey {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.file)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.file.display(), error = %e, "failed to remove scratch key");
        }
        if let Err(e) = std::fs::remove_dir_all(&self.dir)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.dir.display(), error = %e, "failed to remove scratch directory");
        }
    }
}
