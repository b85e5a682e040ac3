//! Configuration for the Nexical client

use crate::auth::AuthStrategy;
use crate::error::{Error, Result};
use nexical_transport::HttpTransportConfig;
use std::sync::Arc;
use url::Url;

/// Configuration for the Nexical client.
///
/// The client normalizes `base_url` when it is built, so a configuration may
/// hold a URL with a trailing slash.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,

    /// Strategy producing authentication headers, if any
    pub auth_strategy: Option<Arc<dyn AuthStrategy>>,

    /// Settings for the default HTTP transport
    pub transport: HttpTransportConfig,
}

impl ClientConfig {
    /// Create a configuration for a base URL with no authentication.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_strategy: None,
            transport: HttpTransportConfig::default(),
        }
    }

    /// Attach an authentication strategy.
    pub fn with_auth(mut self, strategy: impl AuthStrategy + 'static) -> Self {
        self.auth_strategy = Some(Arc::new(strategy));
        self
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    /// This will look for:
    /// - `NEXICAL_BASE_URL` for the API base URL (required)
    /// - `NEXICAL_API_TOKEN` for bearer authentication, or
    /// - `NEXICAL_API_KEY` for API key authentication
    /// - `NEXICAL_TIMEOUT` for the request timeout (in seconds)
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use crate::auth::{ApiKeyAuth, BearerAuth};
        use std::env;
        use std::time::Duration;

        dotenvy::dotenv().ok();

        let base_url = env::var("NEXICAL_BASE_URL")
            .map_err(|_| Error::MissingConfig("NEXICAL_BASE_URL".to_string()))?;
        let mut config = Self::new(base_url);

        // Authentication
        if let Ok(token) = env::var("NEXICAL_API_TOKEN") {
            config = config.with_auth(BearerAuth::new(token));
        } else if let Ok(key) = env::var("NEXICAL_API_KEY") {
            config = config.with_auth(ApiKeyAuth::new(key));
        }

        // Timeout
        if let Ok(timeout_str) = env::var("NEXICAL_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            config.transport.timeout = Duration::from_secs(timeout_secs);
        }

        Ok(config)
    }
}

/// Validate a base URL and strip its trailing slashes.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] for empty input, unparseable URLs and
/// schemes other than `http`/`https`.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| Error::InvalidUrl(format!("Failed to parse '{}': {}", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "Unsupported scheme '{}', expected http or https",
            url.scheme()
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BearerAuth;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case("https://example.com/", "https://example.com")]
    #[case("https://example.com", "https://example.com")]
    #[case("https://api.example.com/v1/", "https://api.example.com/v1")]
    #[case("http://localhost:8080//", "http://localhost:8080")]
    #[case("  https://example.com/  ", "https://example.com")]
    fn test_normalize_base_url(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_base_url(raw).unwrap(), expected);
    }

    #[test]
    fn test_normalize_rejects_empty() {
        match normalize_base_url("   ") {
            Err(Error::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_rejects_scheme() {
        match normalize_base_url("ftp://files.example.com") {
            Err(Error::InvalidUrl(msg)) => {
                assert!(msg.contains("ftp"));
                assert!(msg.contains("http"));
            }
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_config_with_auth() {
        let config = ClientConfig::new("https://example.com").with_auth(BearerAuth::new("t"));
        assert!(config.auth_strategy.is_some());
        assert_eq!(config.transport.timeout, Duration::from_secs(600));
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_variables() {
        temp_env::with_vars(
            [
                ("NEXICAL_BASE_URL", Some("https://env.example.com/")),
                ("NEXICAL_API_TOKEN", Some("env-token")),
                ("NEXICAL_API_KEY", None),
                ("NEXICAL_TIMEOUT", Some("120")),
            ],
            || {
                let config = ClientConfig::from_env().expect("Should load config from environment");
                assert_eq!(config.base_url, "https://env.example.com/");
                assert!(config.auth_strategy.is_some());
                assert_eq!(config.transport.timeout, Duration::from_secs(120));
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_requires_base_url() {
        temp_env::with_vars([("NEXICAL_BASE_URL", None::<&str>)], || {
            match ClientConfig::from_env() {
                Err(Error::MissingConfig(name)) => assert_eq!(name, "NEXICAL_BASE_URL"),
                other => panic!("Expected MissingConfig error, got {other:?}"),
            }
        });
    }
}
