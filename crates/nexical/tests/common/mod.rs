//! Common test utilities and helpers

pub mod mock_transport;

use nexical::{ApiClient, AuthStrategy, ClientConfig};
use std::sync::Arc;

pub use mock_transport::MockTransport;

/// Base URL used by tests that never hit the network
#[allow(dead_code)]
pub const TEST_BASE_URL: &str = "https://api.example.com";

/// Build a client that sends through `transport`
#[allow(dead_code)]
pub fn client_with(transport: &MockTransport, auth: Option<Arc<dyn AuthStrategy>>) -> ApiClient {
    let mut config = ClientConfig::new(TEST_BASE_URL);
    config.auth_strategy = auth;
    ApiClient::with_transport(config, Arc::new(transport.clone())).expect("Failed to build client")
}
