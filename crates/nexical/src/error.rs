//! Error types for the Nexical SDK
//!
//! Callers see two kinds of failure from a request: an [`ApiError`] when the
//! server answered with a non-success status, or a transport failure passed
//! through unchanged. The remaining variants cover local problems
//! (configuration, serialization, authentication).

use crate::auth::AuthError;
use nexical_core::query::QueryError;
use nexical_core::value::is_truthy;
use nexical_transport::TransportError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for operations that can fail with a Nexical SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Nexical SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered with a status outside 200-299.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request never produced a response (DNS, connect, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The auth strategy could not produce headers; no request was sent.
    #[error("Failed to resolve authentication headers: {0}")]
    Auth(#[from] AuthError),

    /// A request body could not be serialized or a success body could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query filters could not be turned into a query string.
    #[error("Invalid query filters: {0}")]
    Query(#[from] QueryError),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid HTTP header name or value.
    #[error("Invalid HTTP header: {0}")]
    InvalidHeader(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl Error {
    /// The API error, when this failure came from an HTTP error status.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status code, when this failure came from an HTTP error status.
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(ApiError::status_code)
    }

    /// Check if this is a network-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Body of an error response.
///
/// The body is parsed as JSON when possible; otherwise the raw text is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not valid JSON.
    Text(String),
}

impl ErrorBody {
    /// Parse a response body, falling back to the raw text.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text)
            .map(ErrorBody::Json)
            .unwrap_or_else(|_| ErrorBody::Text(text.to_string()))
    }

    /// The parsed JSON body, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ErrorBody::Json(value) => Some(value),
            ErrorBody::Text(_) => None,
        }
    }

    /// The raw text body, if the body was not JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorBody::Json(_) => None,
            ErrorBody::Text(text) => Some(text),
        }
    }

    /// Look up a top-level field of a JSON object body.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_json().and_then(|value| value.get(name))
    }
}

/// An HTTP error status returned by the API.
///
/// The display message is taken from the body's `error` field, then its
/// `message` field, then the status text.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    status_code: u16,
    status_text: String,
    body: ErrorBody,
    message: String,
}

impl ApiError {
    /// Create an API error and resolve its message.
    pub fn new(status_code: u16, status_text: impl Into<String>, body: ErrorBody) -> Self {
        let status_text = status_text.into();
        let message = resolve_message(&body, &status_text);
        Self {
            status_code,
            status_text,
            body,
            message,
        }
    }

    /// Create an API error from a response status and raw body text.
    pub fn from_response(status_code: u16, status_text: impl Into<String>, body: &str) -> Self {
        Self::new(status_code, status_text, ErrorBody::parse(body))
    }

    /// HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// HTTP reason phrase (e.g. `Bad Request`).
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Parsed or raw response body.
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if the status is a 4xx.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Check if the status is a 5xx.
    pub fn is_server_error(&self) -> bool {
        self.status_code >= 500
    }
}

fn resolve_message(body: &ErrorBody, status_text: &str) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|field| body.field(field))
        .find(|value| is_truthy(value))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| status_text.to_string())
}
