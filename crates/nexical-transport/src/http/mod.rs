//! HTTP transport implementation
//!
//! Provides a reqwest-backed client that implements the Transport trait.
//! Sends exactly one attempt per request and manages cookies per the
//! request's credentials mode.

pub mod client;

pub use client::{HttpTransport, HttpTransportConfig};
