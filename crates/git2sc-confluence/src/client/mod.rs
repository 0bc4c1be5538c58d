//! Confluence REST API client.
//!
//! Provides a blocking client for the Confluence content REST API with basic
//! authentication. The client owns a cache of the pages it has fetched or
//! written during its lifetime.

mod pages;
mod transport;

use std::collections::HashMap;
use std::path::Path;

use git2sc_config::{HttpConfig, RemoteConfig};
use serde_json::Value;

pub use transport::{HttpRequest, HttpResponse, Method, Transport, UreqTransport};

use crate::convert::ConverterRegistry;
use crate::error::{ConfluenceError, ConvertError};
use crate::types::Page;

/// Confluence REST API client.
pub struct ConfluenceClient<T: Transport = UreqTransport> {
    transport: T,
    api_url: String,
    pages: HashMap<String, Page>,
    converters: ConverterRegistry,
}

impl ConfluenceClient<UreqTransport> {
    /// Create client from configuration values.
    #[must_use]
    pub fn new(remote: &RemoteConfig, http: &HttpConfig) -> Self {
        Self::with_transport(
            &remote.api_url,
            UreqTransport::new(&remote.credentials, http),
        )
    }
}

impl<T: Transport> ConfluenceClient<T> {
    /// Create client on top of a custom transport.
    ///
    /// # Arguments
    /// * `api_url` - REST API base URL (e.g. `https://wiki.example.com/rest/api`)
    /// * `transport` - Sends the requests
    pub fn with_transport(api_url: &str, transport: T) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_owned(),
            pages: HashMap::new(),
            converters: ConverterRegistry::default(),
        }
    }

    /// Replace the document converters.
    #[must_use]
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// All cached pages keyed by page ID.
    pub fn pages(&self) -> &HashMap<String, Page> {
        &self.pages
    }

    /// Cached page, without contacting Confluence.
    pub fn cached_page(&self, page_id: &str) -> Option<&Page> {
        self.pages.get(page_id)
    }

    /// Document converters used by [`ConfluenceClient::convert_to_html`].
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Convert a local file to HTML based on its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedFormat`] for unknown extensions.
    pub fn convert_to_html(&self, path: &Path) -> Result<String, ConvertError> {
        self.converters.convert(path)
    }

    fn content_url(&self, page_id: &str) -> String {
        format!("{}/content/{}", self.api_url, page_id)
    }

    /// Send a request and return the body when the status matches `success`.
    fn call(
        &self,
        method: Method,
        url: String,
        payload: Option<&Value>,
        success: u16,
    ) -> Result<String, ConfluenceError> {
        let body = payload.map(serde_json::to_vec).transpose()?;
        let response = self.transport.send(HttpRequest { method, url, body })?;

        if response.status != success {
            return Err(ConfluenceError::from_response(
                response.status,
                &response.body,
            ));
        }

        Ok(response.body)
    }
}
