//! Folio CLI binary.
//!
//! This binary provides command-line access to Folio's functionality:
//! - Upload files with automatic thumbnails
//! - Issue links to stored objects
//! - Delete originals together with their thumbnails

use clap::Parser;
use folio::{CancellationToken, Folio, FolioConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    use cli::{Cli, Commands};

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so command output stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = FolioConfig::load(cli.config.as_deref())?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling in-flight storage calls");
            on_interrupt.cancel();
        }
    });

    let folio = Folio::start(config, cancel).await?;

    match cli.command {
        Commands::Upload {
            path,
            content_type,
            name,
        } => cli::upload(&folio, &path, name.as_deref(), content_type.as_deref()).await,

        Commands::Link { key, ttl } => cli::link(&folio, &key, ttl).await,

        Commands::Delete {
            key,
            thumbnails,
            all_sizes,
        } => cli::delete(&folio, &key, &thumbnails, all_sizes).await,

        Commands::Backend => cli::backend(&folio),
    }
}
