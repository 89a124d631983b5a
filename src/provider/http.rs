// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Request execution shared by the provider gateways.
//!
//! ```text
//! RequestBuilder --send()--> 2xx --> Response / JSON / text / ()
//!                      \
//!                       +--> !2xx --> ProviderError::Status { message }
//!                                     message from body:
//!                                       message | error.message |
//!                                       error_description | error | text
//! ```

use reqwest::{RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::TokenPair;
use crate::error::ProviderError;

/// Longest raw body echoed back when no structured message exists.
const MAX_RAW_MESSAGE: usize = 200;

/// URL without its query string, for error messages (tokens may live there).
pub(crate) fn display_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Pull a human-readable message out of a provider error body.
pub(crate) fn upstream_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Some(body.chars().take(MAX_RAW_MESSAGE).collect());
    };

    let as_text = |v: &Value| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    };

    value
        .get("message")
        .and_then(as_text)
        .or_else(|| value.pointer("/error/message").and_then(as_text))
        .or_else(|| value.get("error_description").and_then(as_text))
        .or_else(|| value.get("error").filter(|e| e.is_string()).and_then(as_text))
}

/// Execute a request, turning non-2xx answers into [`ProviderError::Status`].
pub(crate) async fn send(builder: RequestBuilder) -> Result<Response, ProviderError> {
    let (client, request) = builder.build_split();
    let request = request.map_err(|source| ProviderError::Transport {
        url: "<invalid request>".to_string(),
        source,
    })?;
    let url = display_url(request.url());

    let response = client
        .execute(request)
        .await
        .map_err(|source| ProviderError::Transport {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        url,
        message: upstream_message(&body),
    })
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    builder: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = send(builder).await?;
    let url = display_url(response.url());
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ProviderError::Transport {
            url: url.clone(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode {
        url,
        message: e.to_string(),
    })
}

pub(crate) async fn send_text(builder: RequestBuilder) -> Result<String, ProviderError> {
    let response = send(builder).await?;
    let url = display_url(response.url());
    response
        .text()
        .await
        .map_err(|source| ProviderError::Transport { url, source })
}

pub(crate) async fn send_unit(builder: RequestBuilder) -> Result<(), ProviderError> {
    send(builder).await.map(drop)
}

/// `true` on 2xx, `false` on 404, error otherwise.
pub(crate) async fn exists(builder: RequestBuilder) -> Result<bool, ProviderError> {
    match send(builder).await {
        Ok(_) => Ok(true),
        Err(ProviderError::Status { status: 404, .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Token endpoint body. GitHub answers 200 with `error` fields on failure.
#[derive(Debug, Deserialize)]
pub(crate) struct OAuthTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl OAuthTokenResponse {
    pub(crate) fn into_pair(self) -> Result<TokenPair, ProviderError> {
        match self.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(TokenPair {
                access_token,
                refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            }),
            None => Err(ProviderError::Rejected(
                self.error_description
                    .or(self.error)
                    .unwrap_or_else(|| "token endpoint returned no access token".to_string()),
            )),
        }
    }
}
