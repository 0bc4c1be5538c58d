//! Confluence integration for git2sc.
//!
//! This crate provides:
//! - [`ConfluenceClient`]: REST API client with basic authentication and a
//!   page cache
//! - [`ConverterRegistry`]: conversion of AsciiDoc, Markdown and HTML files
//! - [`ConfluenceClient::sync_directory`]: mirroring of a local directory tree
//!   into a space
//!
//! # API Client
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use git2sc_config::{HttpConfig, RemoteConfig};
//! use git2sc_confluence::ConfluenceClient;
//!
//! let remote = RemoteConfig::from_env()?;
//! let mut client = ConfluenceClient::new(&remote, &HttpConfig::default());
//!
//! let page = client.fetch_page("372274410")?;
//! println!("Page title: {}", page.title);
//!
//! client.update_page("372274410", "<p>Updated</p>", None)?;
//! # Ok(())
//! # }
//! ```

// API client
mod client;
pub use client::{
    ConfluenceClient, HttpRequest, HttpResponse, Method, Transport, UreqTransport,
};

// Document conversion
pub mod convert;
pub use convert::{Converter, ConverterRegistry};

// Directory sync
pub mod sync;
pub use sync::{SyncOptions, SyncReport};

// Types
pub mod types;
pub use types::Page;

// Errors
pub mod error;
pub use error::{ConfluenceError, ConvertError, SyncError};

// Test doubles
#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
