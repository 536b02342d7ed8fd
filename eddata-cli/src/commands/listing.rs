//! Catalog-wide listings and health.

use clap::Subcommand;
use serde::Serialize;

use eddata::bridge::BridgeStats;
use eddata::queries::CatalogHealth;

use crate::error::CliError;
use crate::runner::{print_json, CliRunner};

/// Top-N listing subcommands.
#[derive(Debug, Subcommand)]
pub enum TopCommands {
    /// Systems with the most stations
    Systems,
    /// Stations offering the most services (fleet carriers excluded)
    Stations,
    /// Commodities traded at the most markets
    Commodities {
        /// Ignore prices older than this many days
        #[arg(long)]
        max_days_ago: Option<u32>,
    },
}

#[derive(Debug, Serialize)]
struct HealthOutput {
    version: &'static str,
    catalog: CatalogHealth,
    bridge: BridgeStats,
}

/// Run a top-N listing.
pub fn run_top(runner: &CliRunner, command: TopCommands) -> Result<(), CliError> {
    runner.log_startup("top");
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let rows = match command {
            TopCommands::Systems => service.top_systems().await?,
            TopCommands::Stations => service.top_stations().await?,
            TopCommands::Commodities { max_days_ago } => {
                service.top_commodities(max_days_ago).await?
            }
        };
        print_json(&rows)
    })
}

/// Open the catalog, count rows, and report bridge state.
pub fn run_health(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("health");
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let catalog = service.health().await?;
        print_json(&HealthOutput {
            version: eddata::VERSION,
            catalog,
            bridge: service.bridge().stats(),
        })
    })
}
