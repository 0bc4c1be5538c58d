//! git2sc CLI - sync a documentation directory to Confluence.
//!
//! Provides commands for:
//! - `article`: Replace the content of a single page
//! - `sync`: Mirror a local directory tree into a space
//!
//! Connection settings come from the `GIT2SC_API_URL` and `GIT2SC_AUTH`
//! environment variables.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ArticleArgs, SyncArgs};
use output::Output;

/// git2sc - Sync a documentation repository to Confluence.
#[derive(Parser)]
#[command(name = "git2sc", version, about)]
struct Cli {
    /// Enable informational logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the content of a Confluence page.
    Article(ArticleArgs),
    /// Mirror a documentation directory into a Confluence space.
    Sync(SyncArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Article(args) => args.execute(),
        Commands::Sync(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&err.to_string());
        std::process::exit(1);
    }
}
