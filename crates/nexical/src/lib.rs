//! # Nexical SDK
//!
//! Foundation for clients of the Nexical HTTP API:
//! - A request executor with JSON bodies and structured API errors
//! - Pluggable authentication strategies
//! - Nested filter objects flattened into query strings
//! - Resource types composed into a typed SDK client
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nexical::{ApiClient, BearerAuth, Method, RequestOptions};
//! use serde_json::{Value, json};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::builder()
//!         .base_url("https://api.nexical.com")
//!         .auth_strategy(BearerAuth::new("your-token"))
//!         .build()?;
//!
//!     let query = nexical::build_query(&json!({"where": {"status": "active"}}))?;
//!     let projects: Value = client.get(&format!("/projects{query}")).await?;
//!
//!     let created: Value = client
//!         .request(
//!             Method::POST,
//!             "/projects",
//!             Some(&json!({"name": "demo"})),
//!             RequestOptions::default(),
//!         )
//!         .await?;
//!
//!     println!("{projects} {created}");
//!     Ok(())
//! }
//! ```
//!
//! Non-2xx responses surface as [`Error::Api`] carrying an [`ApiError`];
//! network failures surface as [`Error::Transport`].

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use auth::{
    ApiKeyAuth, AuthError, AuthStrategy, BearerAuth, DynamicAuth, NoAuth, StaticHeadersAuth,
};
pub use client::{ApiClient, Body, ClientBuilder, RequestOptions};
pub use config::ClientConfig;
pub use error::{ApiError, Error, ErrorBody, Result};
pub use registry::{ResourceRegistry, SdkClient};
pub use resource::Resource;

// Module declarations
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod registry;
pub mod resource;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use http::{HeaderMap, HeaderValue, Method};
pub use nexical_core::query::{QueryError, build_query};
pub use nexical_transport::{
    CredentialsMode, HttpRequest, HttpResponse, HttpTransport, HttpTransportConfig, Transport,
    TransportError,
};
pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use nexical::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiClient, ApiError, AuthStrategy, ClientConfig, CredentialsMode, Error, Method,
        RequestOptions, Resource, ResourceRegistry, Result, SdkClient, build_query,
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
