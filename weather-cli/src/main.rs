//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering display updates to the terminal

use clap::Parser;
use std::path::Path;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod terminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&cmd.log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    load_env_file(None);

    cmd.run().await
}

/// Default directives. The binary target is `weather`, so its events log under `weather::*`.
fn log_filter(level: &str) -> String {
    format!("weather={level},weather_core={level}")
}

/// Load `.env` (from the working directory upward, or `path`) so `CWA_API_KEY`
/// can live there. Returns whether a file was loaded.
fn load_env_file(path: Option<&Path>) -> bool {
    let result = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match result {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            true
        }
        Err(e) if e.not_found() => {
            debug!("no .env file found");
            false
        }
        Err(e) => {
            warn!(error = %e, "failed to load .env");
            false
        }
    }
}
