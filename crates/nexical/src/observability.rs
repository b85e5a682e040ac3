//! Structured logging for calls made through [`ApiClient`](crate::ApiClient)
//!
//! Each call gets one [`RequestLog`] that carries the fields shared by all of
//! its events: method, path, the resolved credentials mode, and whether an
//! auth strategy contributed headers. The library emits events only; install
//! a subscriber yourself, or call `init_tracing` with the `trace` feature.

use std::time::{Duration, Instant};

use http::Method;
use nexical_transport::CredentialsMode;
use tracing::{debug, warn};

/// Filter used by `init_tracing` when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "nexical=debug,nexical_transport=debug";

/// Fields describing one call, plus the clock started at dispatch
#[derive(Debug, Clone)]
pub struct RequestLog {
    /// Effective method, after any override in the request options
    pub method: Method,
    /// Path relative to the base URL, query string included
    pub path: String,
    /// Credentials mode handed to the transport
    pub credentials: CredentialsMode,
    /// Whether auth headers were merged into the request
    pub authenticated: bool,
    /// Size of the payload sent, if any
    pub payload_bytes: Option<usize>,
    started: Instant,
}

impl RequestLog {
    /// Start logging a call.
    pub fn new(method: &Method, path: &str, credentials: CredentialsMode) -> Self {
        Self {
            method: method.clone(),
            path: path.to_string(),
            credentials,
            authenticated: false,
            payload_bytes: None,
            started: Instant::now(),
        }
    }

    /// Record whether an auth strategy supplied headers.
    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    /// Record the payload size.
    pub fn payload(mut self, bytes: Option<usize>) -> Self {
        self.payload_bytes = bytes;
        self
    }

    /// Time since the log was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// The request is about to be handed to the transport.
    pub fn dispatched(&self) {
        debug!(
            method = %self.method,
            path = %self.path,
            credentials = %self.credentials,
            authenticated = self.authenticated,
            payload_bytes = self.payload_bytes,
            "Dispatching API request"
        );
    }

    /// A 2xx response was decoded.
    pub fn completed(&self, status: u16, response_bytes: usize) {
        debug!(
            method = %self.method,
            path = %self.path,
            status,
            response_bytes,
            elapsed_ms = self.elapsed().as_millis(),
            "API request completed"
        );
    }

    /// The response was an error status or could not be decoded.
    pub fn rejected(&self, status: u16, reason: &str) {
        warn!(
            method = %self.method,
            path = %self.path,
            status,
            authenticated = self.authenticated,
            elapsed_ms = self.elapsed().as_millis(),
            reason = %reason,
            "API request rejected"
        );
    }

    /// No response was received.
    pub fn failed(&self, error: &dyn std::fmt::Display) {
        warn!(
            method = %self.method,
            path = %self.path,
            credentials = %self.credentials,
            elapsed_ms = self.elapsed().as_millis(),
            error = %error,
            "API request never reached the server"
        );
    }
}

/// Build the subscriber filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
#[cfg(feature = "trace")]
pub fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install a `tracing-subscriber` formatter filtered by [`env_filter`].
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "trace")]
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_log_defaults() {
        let log = RequestLog::new(&Method::GET, "/users?role=admin", CredentialsMode::Include);
        assert_eq!(log.method, Method::GET);
        assert_eq!(log.path, "/users?role=admin");
        assert_eq!(log.credentials, CredentialsMode::Include);
        assert!(!log.authenticated);
        assert_eq!(log.payload_bytes, None);
    }

    #[test]
    fn test_request_log_builders() {
        let log = RequestLog::new(&Method::POST, "/projects", CredentialsMode::Omit)
            .authenticated(true)
            .payload(Some(42));
        assert!(log.authenticated);
        assert_eq!(log.payload_bytes, Some(42));
        assert_eq!(log.credentials, CredentialsMode::Omit);
    }

    #[test]
    fn test_request_log_clock() {
        let log = RequestLog::new(&Method::GET, "/", CredentialsMode::SameOrigin);
        std::thread::sleep(Duration::from_millis(10));
        assert!(log.elapsed() >= Duration::from_millis(10));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn test_env_filter_reads_rust_log() {
        temp_env::with_var("RUST_LOG", Some("nexical=trace"), || {
            assert_eq!(env_filter().to_string(), "nexical=trace");
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn test_env_filter_default() {
        temp_env::with_var("RUST_LOG", None::<&str>, || {
            let filter = env_filter().to_string();
            assert!(filter.contains("nexical=debug"));
            assert!(filter.contains("nexical_transport=debug"));
        });
    }
}
