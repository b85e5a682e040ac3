//! Request executor for the Nexical API
//!
//! [`ApiClient`] turns a method, path and optional JSON body into a single
//! HTTP request, and turns the response into either a deserialized value or
//! an [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use nexical_core::value::is_truthy;
use nexical_transport::{
    CredentialsMode, HttpRequest, HttpResponse, HttpTransport, HttpTransportConfig, Transport,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::{
    auth::{ApiKeyAuth, AuthStrategy, BearerAuth},
    config::{ClientConfig, normalize_base_url},
    error::{ApiError, Error, ErrorBody, Result},
    observability::RequestLog,
};

/// Request body accepted by [`ApiClient::request`].
pub type Body<'a> = &'a (dyn erased_serde::Serialize + Send + Sync);

/// Per-request overrides for the transport options.
///
/// # Example
///
/// ```rust
/// use nexical::{CredentialsMode, RequestOptions};
///
/// let options = RequestOptions::new()
///     .header("x-request-id", "req-42")
///     .unwrap()
///     .credentials(CredentialsMode::Omit);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers merged over the default `Content-Type`
    pub headers: HeaderMap,

    /// Credentials policy; `include` when unset
    pub credentials: Option<CredentialsMode>,

    /// Replaces the method passed to [`ApiClient::request`]
    pub method: Option<Method>,

    /// Raw payload sent when no JSON body is present
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header from strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let key_str = key.as_ref();
        let value_str = value.as_ref();

        let key: HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeader(format!("invalid name '{}'", key_str)))?;
        let value: HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeader(format!("invalid value for '{}'", key_str)))?;

        self.headers.insert(key, value);
        Ok(self)
    }

    /// Add an already-validated header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the credentials policy.
    pub fn credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the request method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Send a raw payload when the call has no JSON body.
    pub fn raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Client for the Nexical API.
///
/// Cloning is cheap: clones share the same configuration, auth strategy and
/// transport, and each request is independent of the others.
///
/// # Example
///
/// ```rust,no_run
/// use nexical::{ApiClient, BearerAuth};
/// use serde_json::Value;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .base_url("https://api.nexical.com/")
///     .auth_strategy(BearerAuth::new("my-secret-token"))
///     .build()?;
///
/// let profile: Value = client.get("/users/current-user").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// Base URL without a trailing slash
    base_url: String,
    /// Strategy consulted before every request
    auth_strategy: Option<Arc<dyn AuthStrategy>>,
    /// Transport used to send requests
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("auth_strategy", &self.inner.auth_strategy)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create an unauthenticated client for a base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP transport
    /// cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object using the default HTTP transport.
    ///
    /// When the transport config has no origin, the base URL's origin is used
    /// for `same-origin` credentials.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut transport_config = config.transport;
        if transport_config.origin.is_none() {
            transport_config.origin = Url::parse(&base_url).ok();
        }
        let transport = HttpTransport::with_config(transport_config)?;

        Ok(Self::assemble(base_url, config.auth_strategy, Arc::new(transport)))
    }

    /// Create a client that sends requests through a custom transport.
    ///
    /// The transport settings in `config` are ignored.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        Ok(Self::assemble(base_url, config.auth_strategy, transport))
    }

    fn assemble(
        base_url: String,
        auth_strategy: Option<Arc<dyn AuthStrategy>>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base_url,
                auth_strategy,
                transport,
            }),
        }
    }

    /// Base URL with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Whether an auth strategy is configured.
    pub fn has_auth_strategy(&self) -> bool {
        self.inner.auth_strategy.is_some()
    }

    /// Send a request and deserialize the response.
    ///
    /// `path` is appended verbatim to the base URL and should start with `/`.
    ///
    /// Headers are merged in this order, later entries winning:
    /// `Content-Type: application/json`, `options.headers`, then the auth
    /// strategy's headers. `body` is sent as JSON unless it serializes to
    /// `null`, `false`, `0` or `""`, in which case `options.body` (if any)
    /// is sent instead.
    ///
    /// A `204 No Content` response deserializes `T` from an empty object
    /// (`{}`), falling back to `null` for types such as `()`.
    ///
    /// # Errors
    ///
    /// - [`Error::Api`] for responses outside 200-299, carrying the parsed
    ///   JSON body or the raw text
    /// - [`Error::Transport`] when no response was received
    /// - [`Error::Auth`] when the auth strategy fails (nothing is sent)
    /// - [`Error::Serialization`] when the body cannot be serialized or a
    ///   success body does not match `T`
    #[tracing::instrument(level = "debug", skip_all, fields(method = %method, path = %path))]
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Body<'_>>,
        options: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let RequestOptions {
            headers: override_headers,
            credentials,
            method: method_override,
            body: raw_body,
        } = options;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(override_headers);

        if let Some(auth_strategy) = &self.inner.auth_strategy {
            headers.extend(auth_strategy.headers().await?);
        }

        let payload = match body {
            Some(body) => {
                let value = serde_json::to_value(body)?;
                if is_truthy(&value) {
                    Some(serde_json::to_vec(&value)?)
                } else {
                    None
                }
            }
            None => None,
        }
        .or(raw_body);

        let method = method_override.unwrap_or(method);
        let credentials = credentials.unwrap_or(CredentialsMode::Include);
        let log = RequestLog::new(&method, path, credentials)
            .authenticated(self.inner.auth_strategy.is_some())
            .payload(payload.as_ref().map(Vec::len));

        let mut request = HttpRequest::new(method, format!("{}{}", self.inner.base_url, path))
            .with_headers(headers)
            .with_credentials(credentials);
        if let Some(payload) = payload {
            request = request.with_body(payload);
        }

        log.dispatched();

        let response = match self.inner.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                log.failed(&err);
                return Err(err.into());
            }
        };

        let status = response.status;
        let response_bytes = response.body.len();

        match classify_response(response) {
            Ok(value) => {
                log.completed(status, response_bytes);
                Ok(value)
            }
            Err(err) => {
                log.rejected(status, &err.to_string());
                Err(err)
            }
        }
    }

    /// `GET` a path.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None, RequestOptions::default())
            .await
    }

    /// `POST` a JSON body to a path.
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Body<'_>) -> Result<T> {
        self.request(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    /// `PUT` a JSON body to a path.
    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: Body<'_>) -> Result<T> {
        self.request(Method::PUT, path, Some(body), RequestOptions::default())
            .await
    }

    /// `PATCH` a path with a JSON body.
    pub async fn patch<T: DeserializeOwned>(&self, path: &str, body: Body<'_>) -> Result<T> {
        self.request(Method::PATCH, path, Some(body), RequestOptions::default())
            .await
    }

    /// `DELETE` a path.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, None, RequestOptions::default())
            .await
    }
}

fn classify_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    if !response.is_success() {
        let body = ErrorBody::parse(&response.text());
        return Err(ApiError::new(response.status, response.status_text, body).into());
    }

    if response.status == 204 {
        return no_content();
    }

    Ok(serde_json::from_slice(&response.body)?)
}

fn no_content<T: DeserializeOwned>() -> Result<T> {
    serde_json::from_value(Value::Object(Map::new()))
        .or_else(|err| serde_json::from_value(Value::Null).map_err(|_| err))
        .map_err(Error::from)
}

/// Builder for creating a configured [`ApiClient`].
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    auth_strategy: Option<Arc<dyn AuthStrategy>>,
    transport_config: HttpTransportConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the authentication strategy.
    pub fn auth_strategy(mut self, strategy: impl AuthStrategy + 'static) -> Self {
        self.auth_strategy = Some(Arc::new(strategy));
        self
    }

    /// Set an authentication strategy shared with other clients.
    pub fn shared_auth_strategy(mut self, strategy: Arc<dyn AuthStrategy>) -> Self {
        self.auth_strategy = Some(strategy);
        self
    }

    /// Authenticate with a bearer token.
    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.auth_strategy(BearerAuth::new(token))
    }

    /// Authenticate with an API key in the `x-api-key` header.
    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.auth_strategy(ApiKeyAuth::new(key))
    }

    /// Set the request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.timeout = timeout;
        self
    }

    /// Set the connect timeout of the default transport.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.connect_timeout = timeout;
        self
    }

    /// Set the `User-Agent` of the default transport.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport_config.user_agent = Some(user_agent.into());
        self
    }

    /// Send requests through a custom transport instead of the default one.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client with the configured options.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was set, the base URL is invalid, or
    /// the default transport cannot be created.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::MissingConfig("base_url".to_string()))?;

        let config = ClientConfig {
            base_url,
            auth_strategy: self.auth_strategy,
            transport: self.transport_config,
        };

        match self.transport {
            Some(transport) => ApiClient::with_transport(config, transport),
            None => ApiClient::from_config(config),
        }
    }
}
