//! Autoclose Worker
//!
//! A service that closes overdue, unfinished tasks. Can run as a one-shot
//! sweep or as a recurring scheduled job whose metadata survives restarts.

use clap::{Parser, Subcommand};
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::Result;
use tracing::info;

mod config;
mod jobs;
mod scheduler;

use config::Config;

#[derive(Parser)]
#[command(name = "autoclose-worker")]
#[command(about = "Close overdue tasks, once or on a recurring schedule")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single autoclose sweep and exit
    Run,

    /// Run as a scheduled service until interrupted
    Schedule {
        /// Override the persisted interval in seconds (default: keep the
        /// stored value, or AUTOCLOSE_INTERVAL_SECS for a fresh job)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Show job metadata and the current overdue backlog
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();

    // Connect to database
    info!("Connecting to database...");
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("Database connection failed: {}", e))?;

    // Migrations are idempotent, so the worker can start before the API
    database::postgres::run_migrations::<migration::Migrator>(&db, "autoclose-worker")
        .await
        .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;

    match cli.command {
        Commands::Run => {
            info!("Starting one-shot autoclose sweep");

            let closed = scheduler::run_once(&db, &config).await?;

            info!("Sweep complete: {} task(s) closed", closed);
        }

        Commands::Schedule { interval } => {
            scheduler::run_scheduled(db, config, interval).await?;
        }

        Commands::Status => {
            let status = scheduler::status(&db, &config).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
