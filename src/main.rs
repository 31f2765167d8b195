//! # Academic ERP API Main Entry Point

use academicerp::{config::ConfigLoader, db, server::run_server, telemetry};
use anyhow::Context;
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};

#[derive(Debug, Parser)]
#[command(name = "academicerp", version, about = "Academic ERP API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve the API (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from layered env files and variables
    let config = ConfigLoader::new()
        .load()
        .context("Failed to load configuration")?;

    telemetry::init_tracing(&config).context("Failed to initialise tracing")?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let pool = db::init_pool(&config).await?;
    Migrator::up(&pool, None)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config, pool).await,
        Command::Migrate => Ok(()),
    }
}
