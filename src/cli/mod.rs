pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::database::Database;

#[derive(Parser)]
#[command(name = "budget-planner")]
#[command(about = "My Budget Planner - REST backend for personal budgets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Apply database migrations before serving")]
        migrate: bool,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve { migrate: false }) {
        Commands::Serve { migrate } => serve::serve(config, migrate).await,
        Commands::Migrate => {
            let db = Database::connect_lazy(&config.database)?;
            db.migrate().await.context("migration failed")?;
            db.close().await;
            Ok(())
        }
    }
}
