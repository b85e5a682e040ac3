//! Authentication strategies
//!
//! An [`AuthStrategy`] produces the headers that authenticate a request. The
//! client asks for them fresh on every request, so strategies can rotate
//! tokens or sign requests without the client knowing.
//!
//! Provided strategies:
//! - [`NoAuth`]: adds nothing
//! - [`BearerAuth`]: `Authorization: Bearer <token>`
//! - [`ApiKeyAuth`]: an API key in a header (`x-api-key` by default)
//! - [`StaticHeadersAuth`]: a fixed set of headers
//! - [`DynamicAuth`]: headers computed by an async closure per request

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while resolving authentication headers.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A header name was not a valid HTTP header name.
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value contained characters not allowed in HTTP headers.
    #[error("Invalid value for header '{0}'")]
    InvalidHeaderValue(String),

    /// The credential could not be obtained (expired, revoked, unreachable).
    #[error("Credential unavailable: {0}")]
    Unavailable(String),

    /// Any other failure raised by a custom strategy.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Capability that produces authentication headers for a request.
///
/// # Example
///
/// ```rust
/// use nexical::auth::{AuthError, AuthStrategy};
/// use nexical::async_trait;
/// use http::{HeaderMap, HeaderValue};
///
/// #[derive(Debug)]
/// struct TenantHeader(&'static str);
///
/// #[async_trait]
/// impl AuthStrategy for TenantHeader {
///     async fn headers(&self) -> Result<HeaderMap, AuthError> {
///         let mut headers = HeaderMap::new();
///         headers.insert("x-tenant", HeaderValue::from_static(self.0));
///         Ok(headers)
///     }
/// }
/// ```
#[async_trait]
pub trait AuthStrategy: Send + Sync + fmt::Debug {
    /// Resolve the headers to attach to the next request.
    async fn headers(&self) -> Result<HeaderMap, AuthError>;
}

/// Strategy that adds no headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl AuthStrategy for NoAuth {
    async fn headers(&self) -> Result<HeaderMap, AuthError> {
        Ok(HeaderMap::new())
    }
}

/// Bearer token authentication (`Authorization: Bearer <token>`).
#[derive(Debug, Clone)]
pub struct BearerAuth {
    token: SecretString,
}

impl BearerAuth {
    /// Create a bearer strategy for a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into().into_boxed_str()),
        }
    }
}

#[async_trait]
impl AuthStrategy for BearerAuth {
    async fn headers(&self) -> Result<HeaderMap, AuthError> {
        let value = format!("Bearer {}", self.token.expose_secret());
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, sensitive_value(AUTHORIZATION.as_str(), &value)?);
        Ok(headers)
    }
}

/// API key authentication in a single header.
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    header: HeaderName,
    key: SecretString,
}

impl ApiKeyAuth {
    /// Header used when none is specified.
    pub const DEFAULT_HEADER: &'static str = "x-api-key";

    /// Create an API key strategy using the `x-api-key` header.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            header: HeaderName::from_static(Self::DEFAULT_HEADER),
            key: SecretString::new(key.into().into_boxed_str()),
        }
    }

    /// Send the key in a different header.
    ///
    /// # Errors
    ///
    /// Returns an error if `header` is not a valid header name.
    pub fn with_header(mut self, header: &str) -> Result<Self, AuthError> {
        self.header = header
            .parse()
            .map_err(|_| AuthError::InvalidHeaderName(header.to_string()))?;
        Ok(self)
    }

    /// The header carrying the key.
    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

#[async_trait]
impl AuthStrategy for ApiKeyAuth {
    async fn headers(&self) -> Result<HeaderMap, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            self.header.clone(),
            sensitive_value(self.header.as_str(), self.key.expose_secret())?,
        );
        Ok(headers)
    }
}

/// A fixed set of headers added to every request.
#[derive(Debug, Clone, Default)]
pub struct StaticHeadersAuth {
    headers: HeaderMap,
}

impl StaticHeadersAuth {
    /// Wrap an existing header map.
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// Build from name/value pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any name or value is not valid in an HTTP header.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            let name_str = name.as_ref();
            let name: HeaderName = name_str
                .parse()
                .map_err(|_| AuthError::InvalidHeaderName(name_str.to_string()))?;
            let value = sensitive_value(name_str, value.as_ref())?;
            headers.insert(name, value);
        }
        Ok(Self { headers })
    }
}

#[async_trait]
impl AuthStrategy for StaticHeadersAuth {
    async fn headers(&self) -> Result<HeaderMap, AuthError> {
        Ok(self.headers.clone())
    }
}

/// Future returned by a [`DynamicAuth`] resolver.
pub type HeaderFuture = Pin<Box<dyn Future<Output = Result<HeaderMap, AuthError>> + Send>>;

/// Headers computed by an async closure on every request.
///
/// Suited to short-lived tokens fetched from a refresh endpoint, or request
/// signatures that change with the clock.
///
/// ```rust
/// use nexical::auth::DynamicAuth;
/// use http::{HeaderMap, HeaderValue};
///
/// let auth = DynamicAuth::new(|| async {
///     let mut headers = HeaderMap::new();
///     headers.insert("x-request-time", HeaderValue::from_static("1700000000"));
///     Ok(headers)
/// });
/// ```
#[derive(Clone)]
pub struct DynamicAuth {
    resolver: Arc<dyn Fn() -> HeaderFuture + Send + Sync>,
}

impl DynamicAuth {
    /// Create a strategy from an async closure.
    pub fn new<F, Fut>(resolver: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HeaderMap, AuthError>> + Send + 'static,
    {
        Self {
            resolver: Arc::new(move || -> HeaderFuture { Box::pin(resolver()) }),
        }
    }
}

impl fmt::Debug for DynamicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicAuth").finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthStrategy for DynamicAuth {
    async fn headers(&self) -> Result<HeaderMap, AuthError> {
        (self.resolver)().await
    }
}

fn sensitive_value(name: &str, value: &str) -> Result<HeaderValue, AuthError> {
    let mut value =
        HeaderValue::from_str(value).map_err(|_| AuthError::InvalidHeaderValue(name.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
