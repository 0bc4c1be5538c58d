//! `git2sc sync` command implementation.

use std::path::PathBuf;

use clap::Args;
use git2sc_config::{CliSettings, Config};
use git2sc_confluence::{SyncOptions, SyncReport};

use super::create_confluence_client;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Documentation directory (default: from config or current directory).
    pub(crate) path: Option<PathBuf>,

    /// Target space key.
    #[arg(short, long)]
    pub(crate) space: Option<String>,

    /// Page under which the tree is mirrored (default: space homepage).
    #[arg(short, long)]
    pub(crate) parent_id: Option<String>,

    /// Directory name to skip (repeatable).
    #[arg(short, long = "exclude", value_name = "DIR")]
    pub(crate) excluded_dirs: Vec<String>,

    /// Stop at the first failed page.
    #[arg(long)]
    pub(crate) fail_fast: bool,

    /// Delete remote pages without a local source.
    #[arg(long)]
    pub(crate) prune: bool,

    /// Path to configuration file (default: auto-discover git2sc.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing, the space cannot be
    /// read, or any page fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let mut config = Config::load(self.config.as_deref())?;
        config.apply_cli_settings(&self.cli_settings());
        config.validate()?;

        let sync = &config.sync_resolved;
        let space = require_space(sync.space.as_deref())?;

        let mut client = create_confluence_client(&config.http)?;

        output.info(&format!(
            "Syncing {} to space {}...",
            sync.source_dir.display(),
            space
        ));
        let report = client.sync_directory(space, &sync.source_dir, &SyncOptions::from(sync))?;
        print_report(&output, &report);

        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{} page(s) failed to sync",
                report.failures.len()
            )))
        }
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            space: self.space.clone(),
            source_dir: self.path.clone(),
            excluded_dirs: self.excluded_dirs.clone(),
            parent_id: self.parent_id.clone(),
            fail_fast: self.fail_fast.then_some(true),
            prune: self.prune.then_some(true),
        }
    }
}

fn require_space(space: Option<&str>) -> Result<&str, CliError> {
    space.ok_or_else(|| {
        CliError::Validation(
            "space key required (via --space or [sync] space in git2sc.toml)".to_owned(),
        )
    })
}

fn print_report(output: &Output, report: &SyncReport) {
    for page in &report.created {
        output.info(&format!("  + {} ({})", page.title, page.id));
    }
    for page in &report.updated {
        output.info(&format!("  ~ {} ({})", page.title, page.id));
    }
    for page in &report.deleted {
        output.info(&format!("  - {} ({})", page.title, page.id));
    }

    let summary = format!(
        "\nCreated: {}, updated: {}, deleted: {}",
        report.created.len(),
        report.updated.len(),
        report.deleted.len()
    );

    if report.is_success() {
        output.success(&summary);
    } else {
        output.warning(&summary);
        for failure in &report.failures {
            output.error(&format!("  ! {}: {}", failure.target, failure.error));
        }
    }
}
