//! Transport trait and the request/response records it exchanges
//!
//! Defines the [`Transport`] trait that the request executor is polymorphic
//! over. Any type that can turn an [`HttpRequest`] into an [`HttpResponse`]
//! can stand in for the network.

use crate::error::Result;
use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};

/// Whether cookies and other site credentials travel with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialsMode {
    /// Send and store credentials for every URL, including cross-origin ones
    #[default]
    Include,

    /// Send and store credentials only for the transport's own origin
    SameOrigin,

    /// Never send or store credentials
    Omit,
}

impl CredentialsMode {
    /// The mode's wire name (`include`, `same-origin`, `omit`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::SameOrigin => "same-origin",
            Self::Omit => "omit",
        }
    }
}

impl std::fmt::Display for CredentialsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP request specification
///
/// Represents a fully-resolved request: absolute URL, final header set and
/// serialized payload.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,

    /// Absolute request URL
    pub url: String,

    /// Request headers
    pub headers: HeaderMap,

    /// Request body (optional)
    pub body: Option<Vec<u8>>,

    /// Credentials policy for this request
    pub credentials: CredentialsMode,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            credentials: CredentialsMode::default(),
        }
    }

    /// Add a header to the request, replacing any existing value
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace the full header set
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the request body from string
    pub fn with_text_body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(text.into().into_bytes());
        self
    }

    /// Set the credentials policy
    pub fn with_credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = credentials;
        self
    }
}

/// HTTP response
///
/// Represents an HTTP response received from the server, with the body
/// already read into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Reason phrase for the status (e.g. `Not Found`)
    pub status_text: String,

    /// Response headers
    pub headers: HeaderMap,

    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers,
            body,
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse response body as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the response body cannot be parsed as valid JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Capability for sending a single HTTP request.
///
/// Implementations perform exactly one attempt: no retries, no redirects
/// beyond what the underlying client does on its own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and receive the complete response
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{AUTHORIZATION, CONTENT_TYPE};

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::new(Method::POST, "https://api.example.com/users")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer t"))
            .with_text_body("{}")
            .with_credentials(CredentialsMode::Omit);

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.body.as_deref(), Some(b"{}".as_slice()));
        assert_eq!(request.credentials, CredentialsMode::Omit);
    }

    #[test]
    fn test_default_credentials_include() {
        let request = HttpRequest::new(Method::GET, "https://api.example.com");
        assert_eq!(request.credentials, CredentialsMode::Include);
    }

    #[test]
    fn test_credentials_wire_names() {
        assert_eq!(CredentialsMode::SameOrigin.to_string(), "same-origin");
        assert_eq!(
            serde_json::to_string(&CredentialsMode::Omit).unwrap(),
            r#""omit""#
        );
        let mode: CredentialsMode = serde_json::from_str(r#""same-origin""#).unwrap();
        assert_eq!(mode, CredentialsMode::SameOrigin);
    }

    #[test]
    fn test_response_success_range() {
        let ok = |status| HttpResponse::new(status, "", HeaderMap::new(), vec![]).is_success();
        assert!(ok(200));
        assert!(ok(204));
        assert!(ok(299));
        assert!(!ok(199));
        assert!(!ok(300));
        assert!(!ok(404));
        assert!(!ok(500));
    }

    #[test]
    fn test_response_body_helpers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let response = HttpResponse::new(200, "OK", headers, br#"{"id":7}"#.to_vec());

        assert_eq!(response.text(), r#"{"id":7}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(response.get_header("Content-Type"), Some("application/json"));
    }
}
