//! Mock transport implementation for testing.
//!
//! Provides [`MockTransport`] for exercising the client without a
//! Confluence server.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::client::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::ConfluenceError;

/// Mock transport for testing.
///
/// Responses are served in the order they were queued. Every request is
/// recorded for later assertions. When the queue is empty the transport
/// answers `500` with a Confluence style error body.
///
/// # Example
///
/// ```ignore
/// use git2sc_confluence::{ConfluenceClient, MockTransport};
///
/// let transport = MockTransport::new()
///     .with_json(200, serde_json::json!({"key": "TST", "_expandable": {"homepage": "/rest/api/content/1"}}));
/// let mut client = ConfluenceClient::with_transport("https://wiki/rest/api", transport);
/// assert_eq!(client.fetch_space_homepage("TST")?, "1");
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Create a new mock transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response.
    #[must_use]
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.push_response(status, body);
        self
    }

    /// Queue a JSON response.
    #[must_use]
    pub fn with_json(self, status: u16, body: Value) -> Self {
        self.push_response(status, body.to_string());
        self
    }

    /// Queue a raw response on an existing transport.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses.borrow_mut().push_back(HttpResponse {
            status,
            body: body.into(),
        });
    }

    /// All requests sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Requests sent with the given method.
    #[must_use]
    pub fn requests_with(&self, method: Method) -> Vec<HttpRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    /// JSON payload of the request at `index`.
    ///
    /// # Panics
    ///
    /// Panics if there is no such request or its body is not JSON.
    #[must_use]
    pub fn json_body(&self, index: usize) -> Value {
        let requests = self.requests.borrow();
        let body = requests[index]
            .body
            .as_deref()
            .expect("request has no body");
        serde_json::from_slice(body).expect("request body is not JSON")
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ConfluenceError> {
        self.requests.borrow_mut().push(request);
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| HttpResponse {
                status: 500,
                body: r#"{"statusCode": 500, "message": "no mock response queued"}"#.to_owned(),
            }))
    }
}
