//! EDData CLI - Command-line interface
//!
//! This binary provides a command-line interface to the EDData catalog core.
//! Query results are printed to stdout as JSON; logs go to the log file and,
//! with `--verbose`, to stderr.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::listing::TopCommands;
use commands::systems::NearestArgs;
use commands::trade::TradeArgs;
use eddata::queries::{StationKind, TradeDirection};
use error::CliError;
use runner::{CliRunner, GlobalOptions};

#[derive(Debug, Parser)]
#[command(name = "eddata")]
#[command(version = eddata::VERSION)]
#[command(about = "Query the EDData star-system catalog", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.eddata/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the catalog databases
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the sector id of a coordinate
    Sector {
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
        #[arg(allow_hyphen_values = true)]
        z: f64,
        /// Grid size in light-years (defaults to [sectors] grid_size)
        #[arg(long)]
        grid: Option<f64>,
    },

    /// Print the sector ids a radius search would scan
    Cells {
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
        #[arg(allow_hyphen_values = true)]
        z: f64,
        /// Search radius in light-years, clamped to [proximity] max_distance
        #[arg(long, default_value_t = 100.0)]
        radius: f64,
        /// Grid size in light-years (defaults to [sectors] grid_size)
        #[arg(long)]
        grid: Option<f64>,
    },

    /// Show a system by name or address
    System {
        /// System name (case-insensitive) or numeric address
        system: String,
    },

    /// List systems near a system, nearest first
    Nearby {
        /// System name or address
        system: String,
        /// Search radius in light-years
        #[arg(long)]
        max_distance: Option<f64>,
    },

    /// Find the closest stations offering a service
    Nearest(NearestArgs),

    /// List stations in a system
    Stations {
        /// System name or address
        system: String,
        /// Station kind: all, ports, outposts, settlements, megaships, carriers
        #[arg(long, default_value = "all")]
        kind: StationKind,
    },

    /// List markets in a system
    Markets {
        /// System name or address
        system: String,
    },

    /// Commodity prices at a station, found by name
    Market {
        /// System name or address
        system: String,
        /// Station name (case-insensitive)
        station: String,
    },

    /// Markets buying a commodity, best sell price first
    Imports(TradeArgs),

    /// Markets selling a commodity, best buy price first
    Exports(TradeArgs),

    /// Top-N listings
    Top {
        #[command(subcommand)]
        command: TopCommands,
    },

    /// Open the catalog and report row counts
    Health,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let options = GlobalOptions {
        config: cli.config,
        data_dir: cli.data_dir,
        verbose: cli.verbose,
    };

    if let Err(e) = run(cli.command, &options) {
        e.exit();
    }
}

fn run(command: Commands, options: &GlobalOptions) -> Result<(), CliError> {
    match command {
        Commands::Sector { x, y, z, grid } => commands::grid::run_sector(options, x, y, z, grid),
        Commands::Cells {
            x,
            y,
            z,
            radius,
            grid,
        } => commands::grid::run_cells(options, x, y, z, radius, grid),
        Commands::Config { command } => commands::config::run(command, options.config.as_deref()),
        Commands::System { system } => {
            with_runner(options, |r| commands::systems::run_system(r, &system))
        }
        Commands::Nearby {
            system,
            max_distance,
        } => with_runner(options, |r| {
            commands::systems::run_nearby(r, &system, max_distance)
        }),
        Commands::Nearest(args) => with_runner(options, |r| commands::systems::run_nearest(r, args)),
        Commands::Stations { system, kind } => {
            with_runner(options, |r| commands::systems::run_stations(r, &system, kind))
        }
        Commands::Markets { system } => {
            with_runner(options, |r| commands::systems::run_markets(r, &system))
        }
        Commands::Market { system, station } => {
            with_runner(options, |r| commands::systems::run_market(r, &system, &station))
        }
        Commands::Imports(args) => with_runner(options, |r| {
            commands::trade::run(r, TradeDirection::Imports, args)
        }),
        Commands::Exports(args) => with_runner(options, |r| {
            commands::trade::run(r, TradeDirection::Exports, args)
        }),
        Commands::Top { command } => {
            with_runner(options, |r| commands::listing::run_top(r, command))
        }
        Commands::Health => with_runner(options, commands::listing::run_health),
    }
}

/// Catalog commands need logging and a runtime; grid and config commands do not.
fn with_runner(
    options: &GlobalOptions,
    command: impl FnOnce(&CliRunner) -> Result<(), CliError>,
) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    command(&runner)
}
