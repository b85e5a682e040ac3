//! Mock transport for testing without a network
//!
//! Captures every request for assertion and answers with queued responses.
//! Supports error injection and delay simulation.

use async_trait::async_trait;
use http::HeaderMap;
use nexical_transport::{HttpRequest, HttpResponse, Result as TransportResult, Transport, TransportError};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A recording transport
///
/// When the queue is empty it answers `200 OK` with `{}`.
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Requests sent through the transport (for assertion)
    sent_requests: Arc<Mutex<Vec<HttpRequest>>>,

    /// Queued responses returned in FIFO order
    queued_responses: Arc<Mutex<VecDeque<HttpResponse>>>,

    /// Optional error to return on next send
    next_error: Arc<Mutex<Option<TransportError>>>,

    /// Delay to simulate network time
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl MockTransport {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Set delay to simulate network time
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a raw response
    pub async fn queue_response(&self, response: HttpResponse) {
        self.queued_responses.lock().await.push_back(response);
    }

    /// Queue a response with a JSON body
    pub async fn queue_json(&self, status: u16, status_text: &str, body: JsonValue) {
        let body = serde_json::to_vec(&body).expect("Failed to encode body");
        self.queue_response(HttpResponse::new(status, status_text, HeaderMap::new(), body))
            .await;
    }

    /// Queue a response with a text body
    pub async fn queue_text(&self, status: u16, status_text: &str, body: &str) {
        self.queue_response(HttpResponse::new(
            status,
            status_text,
            HeaderMap::new(),
            body.as_bytes().to_vec(),
        ))
        .await;
    }

    /// Inject an error returned once on the next send
    pub async fn inject_error(&self, error: TransportError) {
        *self.next_error.lock().await = Some(error);
    }

    /// All requests sent so far
    pub async fn sent_requests(&self) -> Vec<HttpRequest> {
        self.sent_requests.lock().await.clone()
    }

    /// The only request sent so far
    pub async fn single_request(&self) -> HttpRequest {
        let sent = self.sent_requests().await;
        assert_eq!(sent.len(), 1, "Expected exactly one request, got {}", sent.len());
        sent.into_iter().next().expect("checked length")
    }

    /// Body of a request decoded as JSON
    pub fn json_body(request: &HttpRequest) -> JsonValue {
        let body = request.body.as_ref().expect("Request has no body");
        serde_json::from_slice(body).expect("Body is not JSON")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.sent_requests.lock().await.push(request);

        if let Some(error) = self.next_error.lock().await.take() {
            return Err(error);
        }

        Ok(self
            .queued_responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| HttpResponse::new(200, "OK", HeaderMap::new(), b"{}".to_vec())))
    }
}
