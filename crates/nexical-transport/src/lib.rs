//! Transport layer for the Nexical SDK
//!
//! The request executor in `nexical` talks to the network through a single
//! trait, [`Transport`], so the HTTP stack stays swappable (tests plug in a
//! recording mock, production uses [`HttpTransport`]).
//!
//! # Architecture
//!
//! - **Transport trait**: one async `send` taking an [`HttpRequest`] and
//!   returning an [`HttpResponse`]
//! - **HTTP transport**: reqwest client with a cookie jar that honours
//!   [`CredentialsMode`] per request
//! - **Error handling**: [`TransportError`] for network-level failures only;
//!   HTTP error statuses are successful transport results
//!
//! # Usage
//!
//! ```ignore
//! use nexical_transport::{HttpRequest, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::new(http::Method::GET, "https://api.nexical.com/users/me");
//! let response = transport.send(request).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use self::http::{HttpTransport, HttpTransportConfig};
pub use traits::{CredentialsMode, HttpRequest, HttpResponse, Transport};
