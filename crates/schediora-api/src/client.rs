// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport for the Schediora backend.
//!
//! Provides [`ApiClient`] which handles URL construction, bearer
//! authentication, the per-request timeout, and error normalization.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use schediora_config::model::ApiConfig;
use schediora_core::SchedioraError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Message used when an error response carries no `detail` or `message`.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Per-call options for [`ApiClient::request`].
#[derive(Debug)]
pub struct RequestOptions<'a> {
    method: Method,
    token: Option<&'a str>,
    body: Option<serde_json::Result<Vec<u8>>>,
}

impl<'a> RequestOptions<'a> {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            token: None,
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    /// Attaches `Authorization: Bearer <token>`.
    pub fn bearer(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    /// Serializes `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_vec(body));
        self
    }
}

impl Default for RequestOptions<'_> {
    fn default() -> Self {
        Self::get()
    }
}

/// HTTP client for the versioned Schediora REST API.
///
/// Cheap to clone: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Creates a client from the `[api]` configuration section.
    pub fn new(config: &ApiConfig) -> Result<Self, SchedioraError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SchedioraError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues a request to `path` (relative to the base URL) and decodes the JSON reply.
    ///
    /// An empty response body decodes from JSON `null`, so callers expecting
    /// no payload can ask for `()` or `Option<_>`. The timeout covers both
    /// sending the request and reading the body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions<'_>,
    ) -> Result<T, SchedioraError> {
        let url = format!("{}{}", self.base_url, path);
        let method = options.method.clone();

        let mut builder = self.client.request(options.method, &url);
        if let Some(token) = options.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = options.body {
            let bytes = body.map_err(|e| {
                SchedioraError::Internal(format!("failed to encode request body: {e}"))
            })?;
            builder = builder.body(bytes);
        }

        let exchange = async {
            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status();
            let text = response.text().await.map_err(transport_error)?;
            Ok::<_, SchedioraError>((status, text))
        };

        let (status, text) = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(%method, path, timeout = ?self.timeout, "request timed out");
                return Err(SchedioraError::Timeout {
                    duration: self.timeout,
                });
            }
        };

        debug!(%method, path, status = %status, "response received");
        decode_response(status, &text)
    }
}

fn transport_error(e: reqwest::Error) -> SchedioraError {
    SchedioraError::Transport {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

/// Turns a status + body into either the decoded payload or an API error.
fn decode_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, SchedioraError> {
    let parsed = if text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(text)
    };

    if !status.is_success() {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        return Err(SchedioraError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let value = parsed.map_err(|e| SchedioraError::Decode {
        message: format!("response body is not JSON: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_value(value).map_err(|e| SchedioraError::Decode {
        message: e.to_string(),
        source: Some(Box::new(e)),
    })
}

/// Server-supplied error text: `detail` first, then `message`.
///
/// Non-string values (validation error lists) are rendered as compact JSON.
fn error_message(body: &Value) -> Option<String> {
    ["detail", "message"].iter().find_map(|key| match body.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}
