//! CLI command implementations.

mod article;
mod sync;

pub(crate) use article::ArticleArgs;
pub(crate) use sync::SyncArgs;

use git2sc_config::{HttpConfig, RemoteConfig};
use git2sc_confluence::ConfluenceClient;

use crate::error::CliError;

/// Build a client from the environment.
///
/// Fails before any request is made if `GIT2SC_API_URL` or `GIT2SC_AUTH`
/// is missing.
fn create_confluence_client(http: &HttpConfig) -> Result<ConfluenceClient, CliError> {
    let remote = RemoteConfig::from_env()?;
    Ok(ConfluenceClient::new(&remote, http))
}
