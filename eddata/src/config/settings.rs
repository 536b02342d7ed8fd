//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::sector::GridSize;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Catalog file locations
    pub catalog: CatalogSettings,
    /// Sector grid settings
    pub sectors: SectorSettings,
    /// Radius search limits
    pub proximity: ProximitySettings,
    /// Commodity search limits
    pub trade: TradeSettings,
    /// Query bridge tuning
    pub bridge: BridgeSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    /// Directory holding systems.db, locations.db, stations.db and trade.db
    pub data_dir: PathBuf,
    /// Per-file overrides; `None` resolves inside `data_dir`
    pub systems_db: Option<PathBuf>,
    pub locations_db: Option<PathBuf>,
    pub stations_db: Option<PathBuf>,
    pub trade_db: Option<PathBuf>,
}

/// Sector grid configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSettings {
    /// Cell edge length the catalog was built with.
    /// Changing it without rebuilding the catalog breaks proximity searches.
    pub grid_size: GridSize,
}

/// Radius search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximitySettings {
    /// Radius used when a search gives none, in light-years
    pub default_distance: f64,
    /// Largest radius a search may use; larger requests are clamped
    pub max_distance: f64,
    /// Result ceiling for radius searches
    pub max_results: u32,
    /// Result ceiling for nearest-service searches
    pub max_nearest_results: u32,
}

/// Commodity search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSettings {
    /// Market data age used when a search gives none, in days
    pub default_max_age_days: u32,
    /// Hard ceiling on market data age, in days
    pub max_age_days: u32,
    /// Largest radius around a system, in light-years
    pub max_distance: f64,
    /// Result ceiling
    pub max_results: u32,
}

/// Query bridge configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeSettings {
    /// Tasks that may wait before submissions are rejected
    pub queue_capacity: usize,
    /// Per-task timeout in seconds; 0 disables the timeout
    pub task_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
