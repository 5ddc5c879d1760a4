//! HTTP connection management and shared API client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::response;

/// Value sent in `X-Requested-With`; the API rejects requests without it.
const REQUESTED_WITH: &str = "scanconf";

/// Errors from API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API call failed (CODE={code} : TEXT={text})")]
    Remote { code: String, text: String },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Client configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Snapshot(#[from] scanconf_core::CoreError),
}

/// Configuration for connecting to the management API.
#[derive(Debug)]
pub struct ApiConfig {
    /// Base URL of the API service, e.g. `https://qualysapi.qualys.com`.
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    /// Optional HTTPS proxy.
    pub proxy_url: Option<String>,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password,
            proxy_url: None,
            timeout: None,
        }
    }
}

/// Authenticated client for the appliance management API.
///
/// All calls are made one at a time; there is no retry logic. A transport
/// failure or an error envelope in the response is returned as [`ApiError`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: SecretString,
}

impl ApiClient {
    /// Build a client from the given configuration.
    pub fn connect(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static(REQUESTED_WITH));

        let mut builder = reqwest::Client::builder().default_headers(headers);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = config.proxy_url.as_deref().filter(|p| !p.is_empty()) {
            let proxy = reqwest::Proxy::https(proxy_url)
                .map_err(|e| ApiError::Config(format!("invalid proxy URL {proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
            tracing::info!(proxy = %proxy_url, "Using HTTPS proxy");
        }

        let http = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(
            http,
            &config.base_url,
            &config.username,
            config.password.clone(),
        ))
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        username: &str,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password,
        }
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from an API path and query parameters.
    ///
    /// Keys and values are form-encoded, so entry text containing `#`, `&`
    /// or `+` reaches the server unchanged.
    pub(crate) fn url<K, V>(
        &self,
        path: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Url, ApiError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key.as_ref(), value.as_ref());
            }
        }
        Ok(url)
    }

    /// Issue an authenticated call and return the body of a successful response.
    pub(crate) async fn call(&self, method: Method, url: Url) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(method = %method, url = %url, "API call");

        let resp = self
            .http
            .request(method, url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?.to_vec();

        // The error envelope can arrive with any status.
        if let Some(err) = response::remote_error(&body) {
            return Err(err);
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }
}
