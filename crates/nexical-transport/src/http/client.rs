//! HTTP transport client implementation
//!
//! Implements the Transport trait for HTTP requests over reqwest. Cookies are
//! kept in a jar owned by the transport and only attached to (or collected
//! from) requests whose credentials mode allows it.

use crate::error::{Result, TransportError};
use crate::traits::{CredentialsMode, HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use http::header::{COOKIE, SET_COOKIE};
use hyper::ext::ReasonPhrase;
use reqwest::Client as ReqwestClient;
use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP transport implementation
///
/// Handles HTTP requests with:
/// - A single attempt per request (no retries)
/// - Per-request cookie handling driven by [`CredentialsMode`]
/// - Timeouts taken from [`HttpTransportConfig`]
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
    cookies: Arc<Jar>,
    origin: Option<Url>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("origin", &self.origin.as_ref().map(Url::as_str))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Default::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            cookies: Arc::new(Jar::default()),
            origin: config.origin,
            timeout: config.timeout,
        })
    }

    /// Get a reference to the underlying reqwest client
    pub fn reqwest_client(&self) -> Arc<ReqwestClient> {
        self.client.clone()
    }

    /// Set the origin that `same-origin` requests are compared against
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }

    /// The configured origin, if any
    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    /// Current cookies the jar would send to `url`
    pub fn cookies_for(&self, url: &Url) -> Option<String> {
        self.cookies
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    fn shares_credentials(&self, mode: CredentialsMode, url: &Url) -> bool {
        match mode {
            CredentialsMode::Include => true,
            CredentialsMode::SameOrigin => self
                .origin
                .as_ref()
                .is_some_and(|origin| origin.origin() == url.origin()),
            CredentialsMode::Omit => false,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = Url::parse(&request.url).map_err(|e| {
            TransportError::InvalidRequest(format!("Invalid URL '{}': {}", request.url, e))
        })?;
        let share_credentials = self.shares_credentials(request.credentials, &url);

        debug!(
            method = %request.method,
            url = %url,
            credentials = %request.credentials,
            body_size = request.body.as_ref().map(Vec::len),
            "Sending HTTP request"
        );

        let mut headers = request.headers;
        if share_credentials
            && !headers.contains_key(COOKIE)
            && let Some(cookie) = self.cookies.cookies(&url)
        {
            headers.insert(COOKIE, cookie);
        }

        let mut req = self
            .client
            .request(request.method, url.clone())
            .headers(headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await?;

        let status = response.status();
        let status_text = reason_phrase(&response);
        let headers = response.headers().clone();

        if share_credentials {
            let mut set_cookies = headers.get_all(SET_COOKIE).iter();
            self.cookies.set_cookies(&mut set_cookies, &url);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?
            .to_vec();

        debug!(status = status.as_u16(), body_size = body.len(), "Received HTTP response");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}

/// The reason phrase the server sent, falling back to the standard one.
///
/// hyper only records the phrase when it differs from the canonical reason
/// for the status code.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Origin used to decide `same-origin` credentials
    pub origin: Option<Url>,

    /// Value for the `User-Agent` header
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            connect_timeout: Duration::from_secs(30),
            origin: None,
            user_agent: Some(concat!("nexical-sdk/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}
