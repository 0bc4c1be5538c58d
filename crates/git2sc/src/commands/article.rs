//! `git2sc article` command implementation.

use std::path::Path;

use clap::Args;
use git2sc_config::{Config, HttpConfig, RemoteConfig};
use git2sc_confluence::ConfluenceClient;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the article command.
#[derive(Args)]
pub(crate) struct ArticleArgs {
    /// Confluence page ID to update.
    pub(crate) article_id: String,

    /// New page content in Confluence storage format (HTML).
    pub(crate) content: String,

    /// Replace the page title as well.
    #[arg(short, long)]
    pub(crate) title: Option<String>,
}

impl ArticleArgs {
    /// Execute the article command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the update fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (remote, http) = connection_settings(|name| std::env::var(name).ok(), None)?;
        let mut client = ConfluenceClient::new(&remote, &http);

        client.update_page(&self.article_id, &self.content, self.title.as_deref())?;

        output.success(&format!("Page {} updated", self.article_id));
        Ok(())
    }
}

/// Read the connection variables, then the HTTP settings from `git2sc.toml`.
///
/// A missing variable is reported before the config file is touched.
fn connection_settings<F>(
    lookup: F,
    config_path: Option<&Path>,
) -> Result<(RemoteConfig, HttpConfig), CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let remote = RemoteConfig::from_lookup(lookup)?;
    let config = Config::load(config_path)?;
    Ok((remote, config.http))
}
