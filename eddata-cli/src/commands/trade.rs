//! Commodity market commands (`imports` and `exports`).

use clap::Args;

use eddata::queries::{CommodityQuery, TradeDirection};

use crate::commands::common::SortOrder;
use crate::error::CliError;
use crate::runner::{print_json, require_system, CliRunner};

/// Arguments shared by `eddata imports` and `eddata exports`.
#[derive(Debug, Args)]
pub struct TradeArgs {
    /// Commodity name (case-insensitive)
    pub commodity: String,

    /// Measure distance from this system (name or address)
    #[arg(long)]
    pub system: Option<String>,

    /// Only markets within this many light-years of --system
    #[arg(long, requires = "system")]
    pub max_distance: Option<f64>,

    /// Minimum demand (imports) or stock (exports)
    #[arg(long, default_value_t = 1)]
    pub min_volume: i64,

    /// Minimum sell price (imports only)
    #[arg(long, default_value_t = 1)]
    pub min_price: i64,

    /// Maximum buy price (exports only)
    #[arg(long)]
    pub max_price: Option<i64>,

    /// Only fleet carriers
    #[arg(long, conflicts_with = "no_fleet_carriers")]
    pub fleet_carriers: bool,

    /// Leave fleet carriers out
    #[arg(long)]
    pub no_fleet_carriers: bool,

    /// Ignore prices older than this many days
    #[arg(long)]
    pub max_days_ago: Option<u32>,

    /// Result ordering
    #[arg(long, value_enum, default_value_t = SortOrder::Price)]
    pub sort: SortOrder,
}

impl TradeArgs {
    fn fleet_carriers(&self) -> Option<bool> {
        match (self.fleet_carriers, self.no_fleet_carriers) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Run `imports` or `exports`.
pub fn run(runner: &CliRunner, direction: TradeDirection, args: TradeArgs) -> Result<(), CliError> {
    if args.sort == SortOrder::Distance && args.system.is_none() {
        return Err(CliError::InvalidArgument(
            "--sort distance requires --system".to_string(),
        ));
    }

    runner.log_startup(match direction {
        TradeDirection::Imports => "imports",
        TradeDirection::Exports => "exports",
    });
    let service = runner.open_catalog()?;
    runner.block_on(async {
        let mut query = CommodityQuery {
            min_volume: args.min_volume,
            min_price: args.min_price,
            max_price: args.max_price,
            fleet_carriers: args.fleet_carriers(),
            max_days_ago: args.max_days_ago,
            sort: args.sort.into(),
            ..CommodityQuery::new(&args.commodity, direction)
        };
        if let Some(identifier) = &args.system {
            let system = require_system(&service, identifier).await?;
            query = query.near(system, args.max_distance);
        }
        let orders = service.commodity_orders(&query).await?;
        print_json(&orders)
    })
}
