//! Transport error types

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur before a complete HTTP response is received.
///
/// A response with an error status is not a transport error; it is returned
/// as a normal [`HttpResponse`](crate::HttpResponse).
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP protocol error while sending or reading the body
    #[error("HTTP error: {0}")]
    Http(String),

    /// Connection error (DNS, refused, reset)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The transport's configured timeout elapsed
    #[error("Timeout")]
    Timeout,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be built (bad URL, unsupported method)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TransportError::Timeout.to_string(), "Timeout");
        assert_eq!(
            TransportError::Connection("refused".into()).to_string(),
            "Connection error: refused"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            TransportError::from(err),
            TransportError::Serialization(_)
        ));
    }
}
