// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                  ZeedasError (~24 bytes)
//!                         |
//!   +--------+--------+---+----+-------+-------+-----+
//!   |        |        |        |       |       |     |
//!   v        v        v        v       v       v     v
//! BadInput InvalidCred NotFound Store  Cfg    Net  Io/Other
//! Box<str> Box<str>   Box<str> Box    Box    Box  Box
//!
//! Sub-errors (unboxed internally):
//!   Store    Io, Serialize, Validation
//!   Provider Transport, Status, Rejected, Decode  (-> InvalidCred)
//!   Config   ParseError, MissingKey, InvalidValue
//!   Network  HttpError, Reqwest, InvalidUrl
//!   Remote   Unreachable, Key, Connect, Auth, Exec (pipeline-local)
//!
//! kind()         status
//!   BadInputFormat            400
//!   InvalidAccessCredentials  403
//!   ResourceNotFound          404
//!   Database / Validation     500
//!   Exception                 500
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ZeedasError`].
pub type ZeedasResult<T> = std::result::Result<T, ZeedasError>;

/// Top-level error type for workflow and provider operations.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum ZeedasError {
    /// Missing or invalid caller input (no default binding, no open review, ...).
    #[error("{0}")]
    BadInputFormat(Box<str>),

    /// Upstream provider rejected the call or could not be reached.
    #[error("{0}")]
    InvalidAccessCredentials(Box<str>),

    /// A requested resource does not exist.
    #[error("{0}")]
    ResourceNotFound(Box<str>),

    /// Credential or review store failure.
    #[error("store error: {0}")]
    Store(#[from] Box<StoreError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Network operation failed outside of a provider gateway.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a [`ZeedasError::BadInputFormat`].
pub fn bad_input(message: impl Into<String>) -> ZeedasError {
    ZeedasError::BadInputFormat(message.into().into_boxed_str())
}

/// Create a [`ZeedasError::InvalidAccessCredentials`].
pub fn invalid_credentials(message: impl Into<String>) -> ZeedasError {
    ZeedasError::InvalidAccessCredentials(message.into().into_boxed_str())
}

/// Create a [`ZeedasError::ResourceNotFound`].
pub fn not_found(message: impl Into<String>) -> ZeedasError {
    ZeedasError::ResourceNotFound(message.into().into_boxed_str())
}

/// Error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadInputFormat,
    InvalidAccessCredentials,
    ResourceNotFound,
    Database,
    DatabaseValidation,
    Exception,
}

impl ErrorKind {
    /// HTTP-like status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::BadInputFormat => 400,
            Self::InvalidAccessCredentials => 403,
            Self::ResourceNotFound => 404,
            Self::Database | Self::DatabaseValidation | Self::Exception => 500,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadInputFormat => "BadInputFormatException",
            Self::InvalidAccessCredentials => "InvalidAccessCredentialsException",
            Self::ResourceNotFound => "ResourceNotFoundException",
            Self::Database => "DatabaseException",
            Self::DatabaseValidation => "DatabaseValidationException",
            Self::Exception => "Exception",
        }
    }
}

impl ZeedasError {
    /// Classify this error into the caller-facing taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadInputFormat(_) => ErrorKind::BadInputFormat,
            Self::InvalidAccessCredentials(_) => ErrorKind::InvalidAccessCredentials,
            Self::ResourceNotFound(_) => ErrorKind::ResourceNotFound,
            Self::Store(err) => match **err {
                StoreError::Validation(_) => ErrorKind::DatabaseValidation,
                _ => ErrorKind::Database,
            },
            Self::Config(_) | Self::Network(_) | Self::Io(_) | Self::Other(_) => {
                ErrorKind::Exception
            }
        }
    }

    /// Shorthand for `self.kind().status_code()`.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ZeedasError {
                fn from(err: $error) -> Self {
                    ZeedasError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    StoreError => Store,
    ConfigError => Config,
    NetworkError => Network,
    std::io::Error => Io,
}

/// Provider failures never cross the gateway boundary as-is: they become
/// `InvalidAccessCredentials` carrying the upstream message when one exists.
impl From<ProviderError> for ZeedasError {
    fn from(err: ProviderError) -> Self {
        invalid_credentials(err.upstream_message())
    }
}

// --- Store Errors ---

/// Credential / review store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or write the backing document.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A record violated a store-level constraint.
    #[error("validation error: {0}")]
    Validation(String),

    /// Background persistence task failed.
    #[error("store task failed: {0}")]
    Task(String),
}

// --- Provider Errors ---

/// Failures talking to a hosting provider's REST API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with a non-success status.
    #[error("{url} returned {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: u16,
        url: String,
        message: Option<String>,
    },

    /// Provider answered 2xx but refused the operation (OAuth error bodies).
    #[error("{0}")]
    Rejected(String),

    /// Response body did not match the expected shape.
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ProviderError {
    /// The provider's own explanation when it sent one, else the full description.
    #[must_use]
    pub fn upstream_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration sources.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Download failed.
    #[error("download failed: {url} - {message}")]
    DownloadFailed { url: String, message: String },

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

// --- Remote Errors ---

/// Deployment stage failures. These stay inside the executor and are
/// reported through the log sink rather than returned to callers.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Host did not answer the reachability probe.
    #[error("{host} is not online, please check the credential again")]
    Unreachable { host: String },

    /// Private key could not be materialized or loaded.
    #[error("private key error: {0}")]
    Key(String),

    /// Transport-level connection failure.
    #[error("failed to connect to {host}: {message}")]
    Connect { host: String, message: String },

    /// Server refused the supplied credentials.
    #[error("authentication failed for user '{user}'")]
    Auth { user: String },

    /// Remote command exited non-zero or the channel broke.
    #[error("'{command}' failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    Exec {
        command: String,
        status: Option<u32>,
        message: String,
    },

    /// Local filesystem failure while preparing the session.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
