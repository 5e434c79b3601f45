//! launchcache - list SpaceX launches from the terminal.
//!
//! Launches are served from a local SQLite cache when one exists and
//! fetched from the SpaceX API otherwise (or on `--reload`).

mod render;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use launchcache_core::{Config, LaunchFeed, PresentationState, RetrievalService};

/// Exit status after Ctrl-C, as shells report SIGINT
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "launchcache", version, about = "SpaceX launches, cached locally")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Cache database path (overrides config and LAUNCHCACHE_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// API base URL (overrides config and LAUNCHCACHE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List launches, from cache when available
    List {
        /// Skip the cache and fetch from the API
        #[arg(long)]
        reload: bool,

        /// Print launches as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Show what is cached
    Status,
    /// Remove all cached launches
    Clear,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    config.apply_env();
    config.apply_overrides(cli.api_url.clone(), cli.db.clone());
    config
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli);

    let service = RetrievalService::from_config(&config)?;
    info!(api = config.api_base_url(), "launchcache starting");

    match cli.command.unwrap_or(Command::List { reload: false, json: false }) {
        Command::List { reload, json } => run_list(service, reload, json).await,
        Command::Status => run_status(&service),
        Command::Clear => {
            let removed = service.clear_cache().await?;
            println!("Removed {} cached launches", removed);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Drive a feed through one retrieval, printing each state it passes through
async fn run_list(service: RetrievalService, reload: bool, json: bool) -> Result<ExitCode> {
    let feed = LaunchFeed::new(Arc::new(service));
    let mut states = feed.subscribe();
    feed.trigger(reload);

    loop {
        let state = states.borrow_and_update().clone();
        match state {
            PresentationState::Uninitialized => {}
            PresentationState::Loading => eprintln!("Loading..."),
            PresentationState::Content(launches) => {
                let output = if json {
                    render::launches_json(&launches)?
                } else {
                    render::launches_table(&launches)
                };
                println!("{}", output);
                return Ok(ExitCode::SUCCESS);
            }
            PresentationState::Error => {
                eprintln!("Failed to load launches");
                return Ok(ExitCode::FAILURE);
            }
        }

        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    anyhow::bail!("Presentation state channel closed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                feed.cancel();
                eprintln!("Cancelled");
                return Ok(ExitCode::from(EXIT_INTERRUPTED));
            }
        }
    }
}

fn run_status(service: &RetrievalService) -> Result<ExitCode> {
    println!("{}", render::store_status(service.store())?);
    Ok(ExitCode::SUCCESS)
}
