// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fixed-shape reply envelope.
//!
//! ```text
//! Ok(data)   --> { "code": 200, "message": "success", "data": {...} }
//! Err(e)     --> { "code": e.status_code(), "message": "<text>" }
//!                  Database / DatabaseValidation -> generic message
//! ```


use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ZeedasError, ZeedasResult};

const DATABASE_MESSAGE: &str = "A database error has occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply<T> {
    pub code: u16,
    pub message: String,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Reply<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    /// Error reply. Store internals are never shown to callers.
    #[must_use]
    pub fn from_error(err: &ZeedasError) -> Self {
        let kind = err.kind();
        let message = match kind {
            ErrorKind::Database | ErrorKind::DatabaseValidation => DATABASE_MESSAGE.to_string(),
            _ => err.to_string(),
        };
        Self {
            code: kind.status_code(),
            message,
            data: None,
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code < 400
    }
}

impl<T> From<ZeedasResult<T>> for Reply<T> {
    fn from(result: ZeedasResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::from_error(&err),
        }
    }
}
