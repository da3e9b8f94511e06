//! Authway HTTP request layer
//!
//! Builds URLs from a configured base origin plus a per-service path prefix,
//! attaches JSON headers and an optional bearer token, and normalizes every
//! failure into a single [`ApiError`] shape.

pub mod error;

pub use error::{ApiError, ApiResult};
pub use reqwest::Method;

use authway_core::{CoreError, CoreResult, TokenCell};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Successful response envelope: parsed body, HTTP status, response headers
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Parsed body: JSON when the response declared it, plain text otherwise
    pub data: Value,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
}

/// Authway API client.
///
/// One instance performs one HTTP call at a time and holds no state beyond
/// its configuration and the shared [`TokenCell`] it reads the bearer token
/// from. The cell is owned by the session layer; this layer never writes it.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    prefix: String,
    tokens: TokenCell,
}

impl ApiClient {
    /// Create a client with default configuration
    pub fn new(base_url: impl Into<String>) -> CoreResult<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the service prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Get the token cell this client reads bearer tokens from
    pub fn tokens(&self) -> &TokenCell {
        &self.tokens
    }

    /// Create a request builder, attaching the bearer token when one is held
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.public_request(method, path);
        if let Some(token) = self.tokens.access_token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }

    /// Create a request builder that never attaches a bearer token
    pub fn public_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}{}", self.base_url, self.prefix, path);
        self.client.request(method, url)
    }

    /// Execute a request and normalize the outcome.
    ///
    /// The default `Content-Type`/`Accept` JSON headers are filled in here,
    /// so a caller-supplied value for either replaces the default instead of
    /// standing next to it. The body is parsed according to the declared
    /// content type, for error responses as much as successful ones: servers
    /// return JSON error payloads with non-2xx statuses.
    pub async fn execute(&self, request: reqwest::RequestBuilder) -> ApiResult<ApiResponse> {
        let mut request = request.build().map_err(ApiError::network)?;
        let request_headers = request.headers_mut();
        if !request_headers.contains_key(header::CONTENT_TYPE) {
            request_headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        if !request_headers.contains_key(header::ACCEPT) {
            request_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        }

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ApiError::network)?;
        let status = response.status();
        let headers = response.headers().clone();

        let is_json = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        let body = response.text().await.map_err(ApiError::network)?;
        let data = if is_json {
            serde_json::from_str(&body).map_err(ApiError::network)?
        } else {
            Value::String(body)
        };

        if status.is_success() {
            Ok(ApiResponse {
                data,
                status: status.as_u16(),
                headers,
            })
        } else {
            let err = ApiError::from_response(status, data);
            debug!(status = err.status, "request rejected: {}", err.message);
            Err(err)
        }
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    prefix: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    tokens: Option<TokenCell>,
}

impl ApiClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the base URL taken from `AUTHWAY_API_URL`
    pub fn from_env() -> CoreResult<Self> {
        let base_url = std::env::var("AUTHWAY_API_URL")
            .map_err(|_| CoreError::invalid_config("AUTHWAY_API_URL is not set"))?;
        Ok(Self::new().base_url(base_url))
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the service prefix prepended to every endpoint path (e.g. `/auth`)
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the request timeout
    #[cfg(not(target_arch = "wasm32"))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Share an existing token cell with this client
    pub fn tokens(mut self, tokens: TokenCell) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Build the client
    pub fn build(self) -> CoreResult<ApiClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| CoreError::invalid_config("base_url is required"))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| "authway-client/0.1.0".to_string());

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = ClientBuilder::new().user_agent(user_agent);
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            builder
                .build()
                .map_err(|err| CoreError::invalid_config(err.to_string()))?
        };

        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = self.timeout; // Timeouts not supported on WASM
            ClientBuilder::new()
                .user_agent(user_agent)
                .build()
                .map_err(|err| CoreError::invalid_config(err.to_string()))?
        };

        Ok(ApiClient {
            client,
            base_url,
            prefix: self.prefix.unwrap_or_default(),
            tokens: self.tokens.unwrap_or_default(),
        })
    }
}
