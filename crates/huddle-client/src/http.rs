//! Transport seam between the synchronization service and the remote API.
//!
//! [`ChatSync`](crate::sync::ChatSync) only ever talks to an
//! [`HttpAdapter`]; [`ReqwestAdapter`] is the production implementation.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use huddle_shared::ApiError;

use crate::config::ClientConfig;

/// One call to the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Endpoint path, appended to the adapter's base URL.
    pub path: String,
    pub body: Map<String, Value>,
    /// Send the body form-encoded instead of as JSON.
    pub form_data: bool,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: Map::new(),
            form_data: false,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    pub fn form(mut self) -> Self {
        self.form_data = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }
}

/// Executes API requests and returns the decoded JSON body.
#[async_trait]
pub trait HttpAdapter: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// [`HttpAdapter`] over a pooled `reqwest` client with bearer-token auth.
pub struct ReqwestAdapter {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ReqwestAdapter {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl HttpAdapter for ReqwestAdapter {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(path = %request.path, form = request.form_data, "API request");

        let mut builder = self.client.post(&url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder = if request.form_data {
            builder.form(&form_fields(&request.body))
        } else {
            builder.json(&request.body)
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let raw = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        parse_body(&raw)
    }
}

/// Flatten a JSON body into form fields. Strings are sent verbatim, every
/// other value as its JSON text.
fn form_fields(body: &Map<String, Value>) -> Vec<(String, String)> {
    body.iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Decode a response body and surface `ok: false` answers as errors.
fn parse_body(raw: &[u8]) -> Result<Value, ApiError> {
    let body: Value = serde_json::from_slice(raw)?;
    check_ok(body)
}

/// The service answers HTTP 200 with `"ok": false` on application errors.
fn check_ok(body: Value) -> Result<Value, ApiError> {
    if body.get("ok") == Some(&Value::Bool(false)) {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error");
        return Err(ApiError::Remote(code.to_string()));
    }
    Ok(body)
}
