//! HTTP transport for the Confluence REST API.

use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use git2sc_config::{Credentials, HttpConfig};
use ureq::Agent;

use crate::error::ConfluenceError;

/// HTTP method used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// Request sent to Confluence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including query string.
    pub url: String,
    /// JSON payload for POST and PUT.
    pub body: Option<Vec<u8>>,
}

/// Response received from Confluence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body (empty for 204).
    pub body: String,
}

/// Sends requests to Confluence.
///
/// Error statuses are returned as [`HttpResponse`]s; only failures to
/// obtain a response at all are errors.
pub trait Transport {
    /// Send a request and wait for the full response.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ConfluenceError>;
}

/// Blocking transport on `ureq` with basic authentication.
pub struct UreqTransport {
    agent: Agent,
    auth_header: String,
}

impl UreqTransport {
    /// Create transport with the given credentials and HTTP settings.
    #[must_use]
    pub fn new(credentials: &Credentials, http: &HttpConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(http.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            auth_header: basic_auth_header(credentials),
        }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ConfluenceError> {
        let HttpRequest { method, url, body } = request;
        let payload = body.unwrap_or_default();

        let response = match method {
            Method::Get => self
                .agent
                .get(&url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .call()?,
            Method::Delete => self
                .agent
                .delete(&url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .call()?,
            Method::Post => self
                .agent
                .post(&url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(&payload[..])?,
            Method::Put => self
                .agent
                .put(&url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(&payload[..])?,
        };

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read response body)".to_owned());

        Ok(HttpResponse { status, body })
    }
}

/// `Authorization` header value for basic authentication.
fn basic_auth_header(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.username, credentials.password);
    format!("Basic {}", STANDARD.encode(pair))
}
