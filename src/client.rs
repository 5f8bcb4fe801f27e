use std::time::Duration;

#[cfg(feature = "default-client")]
use std::sync::Arc;

#[cfg(feature = "default-client")]
use arc_swap::ArcSwap;
use log::{debug, warn};
#[cfg(feature = "default-client")]
use once_cell::sync::Lazy;
use reqwest::{Client as ReqwestClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::api::{ca, meta};
use crate::models::api_response::{BaseResponse, ErrorResponse};
use crate::models::ApiResponse;
use crate::{OpenVoxError, OpenVoxResult};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_USER_AGENT: &str = concat!("openvox-client/", env!("CARGO_PKG_VERSION"));

#[cfg(feature = "default-client")]
static OPENVOX_CLIENT: Lazy<ArcSwap<OpenVoxClient>> =
    Lazy::new(|| ArcSwap::new(Arc::new(OpenVoxClient::default())));

/// Initializes the static OpenVoxClient instance. This should be called once
/// at the beginning of your application.
#[cfg(feature = "default-client")]
pub fn initialize(client: OpenVoxClient) {
    OPENVOX_CLIENT.store(Arc::new(client));
}

/// Returns the static OpenVoxClient instance.
///
/// If it hasn't been initialized it returns a default instance pointing at
/// `http://localhost:5000`.
#[cfg(feature = "default-client")]
pub fn instance() -> Arc<OpenVoxClient> {
    OPENVOX_CLIENT.load_full()
}

/// Builder for the OpenVox client.
///
/// Validation happens in [`build`](Self::build); no network I/O is performed.
#[derive(Default)]
pub struct OpenVoxClientBuilder {
    base_url: Option<String>,
    accept_invalid_certs: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<ReqwestClient>,
}

impl OpenVoxClientBuilder {
    /// Sets the OpenVox View server URL, e.g. `https://openvox.example.com`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Accept certificates that fail verification. Only for testing setups.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sets the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a custom user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets a custom reqwest client. Timeout, user agent and certificate
    /// settings of the builder are ignored in that case.
    pub fn http_client(mut self, http_client: ReqwestClient) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn build(self) -> OpenVoxResult<OpenVoxClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| OpenVoxError::ConfigurationError("Base URL is required".into()))
            .and_then(|url_str| {
                Url::parse(&url_str).map_err(|e| {
                    OpenVoxError::ConfigurationError(format!("Invalid base URL: {e}"))
                })
            })?;

        if base_url.cannot_be_a_base() {
            return Err(OpenVoxError::ConfigurationError(format!(
                "Invalid base URL: {base_url} cannot carry a path"
            )));
        }

        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        let http_client = match self.http_client {
            Some(custom_client) => custom_client,
            None => ReqwestClient::builder()
                .timeout(timeout)
                .danger_accept_invalid_certs(self.accept_invalid_certs)
                .user_agent(user_agent)
                .build()
                .map_err(|e| {
                    OpenVoxError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
                })?,
        };

        Ok(OpenVoxClient {
            base_url,
            http_client,
        })
    }
}

/// Client for the OpenVox View HTTP API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct OpenVoxClient {
    base_url: Url,
    http_client: ReqwestClient,
}

impl Default for OpenVoxClient {
    fn default() -> Self {
        OpenVoxClient {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("Failed to parse default URL"),
            http_client: ReqwestClient::new(),
        }
    }
}

impl OpenVoxClient {
    pub fn builder() -> OpenVoxClientBuilder {
        OpenVoxClientBuilder::default()
    }

    /// The server URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Gets the meta/version API interface.
    pub fn meta(&self) -> meta::MetaHandler {
        meta::MetaHandler::new(self.clone())
    }

    /// Gets the certificate authority API interface.
    pub fn ca(&self) -> ca::CaHandler {
        ca::CaHandler::new(self.clone())
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    pub(crate) fn api_url(&self, segments: &[&str]) -> OpenVoxResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| OpenVoxError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Makes a raw request to the OpenVox View API and returns the `Data`
    /// payload as untyped JSON.
    ///
    /// `endpoint` is appended to the base URL, so a path prefix on the base
    /// URL is kept even when `endpoint` starts with `/`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `method` is not a valid HTTP method or `endpoint` contains `.` or `..`
    ///   segments.
    /// - The request fails due to network issues.
    /// - The server answers with an error envelope or a non-success status.
    /// - The body is not an envelope.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use openvox_client::{OpenVoxClient, OpenVoxError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), OpenVoxError> {
    /// let client = OpenVoxClient::builder()
    ///     .base_url("https://openvox.example.com")
    ///     .build()?;
    ///
    /// let meta = client.raw_request("GET", "/api/v1/meta", None::<()>).await?;
    /// println!("CA enabled: {}", meta["CaEnabled"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn raw_request<T>(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<T>,
    ) -> OpenVoxResult<Value>
    where
        T: Serialize,
    {
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| OpenVoxError::InvalidEndpoint(format!("Invalid HTTP method: {method}")))?;
        let (path, query) = match endpoint.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (endpoint, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.iter().any(|s| *s == "." || *s == "..") {
            return Err(OpenVoxError::InvalidEndpoint(endpoint.to_string()));
        }

        let mut url = self.api_url(&segments)?;
        url.set_query(query);

        self.request(method, url, body).await
    }

    /// Sends a request and unwraps the response envelope.
    ///
    /// Non-success statuses become `ApiError`, using the `Error` field when the
    /// body carries one. Success bodies must be a `Data` or `Error` envelope.
    pub(crate) async fn request<T, R>(
        &self,
        method: Method,
        url: Url,
        body: Option<T>,
    ) -> OpenVoxResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        debug!("HTTP {} {}", method, url);

        let mut request = self.http_client.request(method, url);
        if let Some(data) = body {
            request = request.json(&data);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&bytes)
                .map(|e| e.error)
                .unwrap_or_else(|_| {
                    status.canonical_reason().unwrap_or("Unknown API error").to_string()
                });
            warn!("API request failed with status {}: {}", status, message);
            return Err(OpenVoxError::ApiError { status, message });
        }

        // Decoding the matching envelope directly keeps serde's field-level error.
        let value: Value = serde_json::from_slice(&bytes)?;
        let envelope: ApiResponse<R> = if value.get("Data").is_some() {
            ApiResponse::Success(serde_json::from_value::<BaseResponse<R>>(value)?)
        } else if value.get("Error").is_some() {
            ApiResponse::Failure(serde_json::from_value::<ErrorResponse>(value)?)
        } else {
            return Err(OpenVoxError::MissingEnvelope);
        };
        envelope.into_result(status)
    }
}
