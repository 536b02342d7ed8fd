//! System and station lookup commands.

use clap::Args;

use eddata::queries::{ServiceType, StationKind};

use crate::commands::common::parse_pad_size;
use crate::error::CliError;
use crate::runner::{print_json, require_system, CliRunner};

/// Arguments for `eddata nearest`.
#[derive(Debug, Args)]
pub struct NearestArgs {
    /// System name or address to search from
    pub system: String,

    /// Service to look for (e.g. material-trader, interstellar-factors)
    pub service: ServiceType,

    /// Minimum landing pad size: 1-3 or small/medium/large
    #[arg(long, value_parser = parse_pad_size)]
    pub min_pad_size: Option<u8>,
}

/// Show one system.
pub fn run_system(runner: &CliRunner, identifier: &str) -> Result<(), CliError> {
    runner.log_startup("system");
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let system = require_system(&service, identifier).await?;
        print_json(&system)
    })
}

/// List systems within a radius, nearest first.
pub fn run_nearby(
    runner: &CliRunner,
    identifier: &str,
    max_distance: Option<f64>,
) -> Result<(), CliError> {
    runner.log_startup("nearby");
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let system = require_system(&service, identifier).await?;
        let nearby = service.nearby_systems(&system, max_distance).await?;
        print_json(&nearby)
    })
}

/// List the closest stations offering a service.
pub fn run_nearest(runner: &CliRunner, args: NearestArgs) -> Result<(), CliError> {
    runner.log_startup("nearest");
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let system = require_system(&service, &args.system).await?;
        let stations = service
            .nearest_service(&system, args.service, args.min_pad_size)
            .await?;
        print_json(&stations)
    })
}

/// List stations in a system.
pub fn run_stations(
    runner: &CliRunner,
    identifier: &str,
    kind: StationKind,
) -> Result<(), CliError> {
    runner.log_startup("stations");
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let system = require_system(&service, identifier).await?;
        let stations = service.stations_in_system(&system, kind).await?;
        print_json(&stations)
    })
}

/// List markets in a system with their last update time.
pub fn run_markets(runner: &CliRunner, identifier: &str) -> Result<(), CliError> {
    runner.log_startup("markets");
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let system = require_system(&service, identifier).await?;
        let markets = service.markets_in_system(&system).await?;
        print_json(&markets)
    })
}

/// List commodity prices at a station, matched by name within a system.
pub fn run_market(runner: &CliRunner, identifier: &str, station: &str) -> Result<(), CliError> {
    runner.log_startup("market");
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let system = require_system(&service, identifier).await?;
        let commodities = service
            .market_commodities(&system, station)
            .await?
            .ok_or_else(|| {
                CliError::NotFound(format!("Market '{}' in {}", station, system.system_name))
            })?;
        print_json(&commodities)
    })
}
