use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use std::{future::Future, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::{info, warn};
use weather_core::{
    Config, DisplaySink, FetchCycle, Location, Region, Trigger, provider_from_config, style_for,
};

use crate::terminal::TerminalSink;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Regional weather widget")]
pub struct Cli {
    /// Log level for this tool (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default location.
    Configure,

    /// List supported locations by region.
    Locations,

    /// Fetch and show today's weather once.
    Show {
        /// Location name, e.g. "臺北市". Defaults to the configured location.
        #[arg(value_parser = Location::parse)]
        location: Option<Location>,
    },

    /// Keep refreshing until Ctrl-C. Type a location name and Enter to switch,
    /// or just Enter to refresh now.
    Watch {
        #[arg(value_parser = Location::parse)]
        location: Option<Location>,

        /// Refresh interval; defaults to the configured value (30).
        #[arg(long)]
        interval_minutes: Option<u64>,
    },

    /// Print the window style sheet for a theme.
    Style {
        #[arg(long)]
        dark: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Locations => {
                for region in Region::all() {
                    let names: Vec<&str> = region.locations().map(|l| l.as_str()).collect();
                    println!("{}: {}", region, names.join(" "));
                }
                Ok(())
            }
            Command::Show { location } => {
                let config = Config::load()?;
                let cycle = FetchCycle::new(provider_from_config(&config)?);
                let location = location.unwrap_or_else(|| config.location());

                let mut sink = TerminalSink::new(std::io::stdout(), false);
                if let Trigger::Completed(update) = cycle.trigger(&location).await {
                    sink.present(&update);
                }
                Ok(())
            }
            Command::Watch {
                location,
                interval_minutes,
            } => {
                let mut config = Config::load()?;
                if let Some(minutes) = interval_minutes {
                    config.refresh_interval_minutes = minutes;
                }
                watch_loop(config, location).await
            }
            Command::Style { dark } => {
                print!("{}", style_for(dark).stylesheet());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("CWA API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let options: Vec<Location> = Location::all().collect();
    let start = options
        .iter()
        .position(|l| *l == config.location())
        .unwrap_or(0);
    let location = Select::new("Default location:", options)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read default location")?;
    config.default_location = Some(location);

    config.require_api_key()?;
    config.save()?;
    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn watch_loop(config: Config, location: Option<Location>) -> anyhow::Result<()> {
    let cycle = FetchCycle::new(provider_from_config(&config)?);
    let initial = location.unwrap_or_else(|| config.location());
    let every: Duration = config.refresh_interval();
    let (tx, rx) = watch::channel(initial);

    info!(location = %initial, minutes = every.as_secs() / 60, "watching");
    tokio::spawn(read_selections(tx));

    let mut sink = TerminalSink::new(std::io::stdout(), true);
    cycle
        .run_periodic(rx, every, &mut sink, ctrl_c(tokio::signal::ctrl_c()))
        .await;
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves,
/// so the loop keeps running until the process is killed.
async fn ctrl_c<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Ctrl-C handler unavailable; stop the process with a kill signal");
        std::future::pending::<()>().await;
    }
}

/// Stdin acts as the location picker and refresh button.
async fn read_selections(tx: watch::Sender<Location>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let current = *tx.borrow();
        let next = if line.trim().is_empty() {
            current
        } else {
            match Location::parse(&line) {
                Ok(loc) => loc,
                Err(e) => {
                    warn!("{e}");
                    continue;
                }
            }
        };
        if tx.send(next).is_err() {
            break;
        }
    }
}
