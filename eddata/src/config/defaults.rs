//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants, the clamping helpers used by the
//! parser, and the `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::bridge::{DEFAULT_QUEUE_CAPACITY, DEFAULT_TASK_TIMEOUT};
use crate::planner::{
    DEFAULT_NEARBY_DISTANCE, MAX_NEARBY_DISTANCE, MAX_NEARBY_RESULTS, MAX_NEAREST_RESULTS,
};
use crate::queries::{DEFAULT_MAX_AGE_DAYS, MAX_AGE_DAYS, MAX_COMMODITY_DISTANCE, MAX_COMMODITY_RESULTS};
use crate::sector::GridSize;

/// Environment variable overriding `[catalog] data_dir`.
pub const DATA_DIR_ENV: &str = "EDDATA_DATA_DIR";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "eddata.log";

// =============================================================================
// Bridge limits
// =============================================================================

/// Smallest accepted queue capacity.
pub const MIN_QUEUE_CAPACITY: usize = 1;

/// Largest accepted queue capacity.
pub const MAX_QUEUE_CAPACITY: usize = 65_536;

/// Clamps the bridge queue capacity and logs a warning if clamped.
pub(super) fn clamp_queue_capacity(value: usize) -> usize {
    if value < MIN_QUEUE_CAPACITY {
        tracing::warn!(
            requested = value,
            min = MIN_QUEUE_CAPACITY,
            "queue_capacity below minimum, clamping to {}",
            MIN_QUEUE_CAPACITY
        );
        MIN_QUEUE_CAPACITY
    } else if value > MAX_QUEUE_CAPACITY {
        tracing::warn!(
            requested = value,
            max = MAX_QUEUE_CAPACITY,
            "queue_capacity above maximum, clamping to {}",
            MAX_QUEUE_CAPACITY
        );
        MAX_QUEUE_CAPACITY
    } else {
        value
    }
}

/// Pulls a default down to its ceiling, logging a warning if it was above.
pub(super) fn clamp_default<T>(key: &str, default: T, max: T) -> T
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if default > max {
        tracing::warn!(
            key,
            requested = %default,
            max = %max,
            "{} exceeds its ceiling, clamping to {}",
            key,
            max
        );
        max
    } else {
        default
    }
}

// =============================================================================
// Paths
// =============================================================================

/// Default catalog directory (`~/.eddata/data`).
pub fn default_data_dir() -> PathBuf {
    config_directory().join("data")
}

/// Default log directory (`~/.eddata/logs`).
pub fn default_log_dir() -> PathBuf {
    config_directory().join("logs")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings {
                data_dir: default_data_dir(),
                systems_db: None,
                locations_db: None,
                stations_db: None,
                trade_db: None,
            },
            sectors: SectorSettings {
                grid_size: GridSize::default(),
            },
            proximity: ProximitySettings {
                default_distance: DEFAULT_NEARBY_DISTANCE,
                max_distance: MAX_NEARBY_DISTANCE,
                max_results: MAX_NEARBY_RESULTS,
                max_nearest_results: MAX_NEAREST_RESULTS,
            },
            trade: TradeSettings {
                default_max_age_days: DEFAULT_MAX_AGE_DAYS,
                max_age_days: MAX_AGE_DAYS,
                max_distance: MAX_COMMODITY_DISTANCE,
                max_results: MAX_COMMODITY_RESULTS,
            },
            bridge: BridgeSettings {
                queue_capacity: DEFAULT_QUEUE_CAPACITY,
                task_timeout_secs: DEFAULT_TASK_TIMEOUT.as_secs(),
            },
            logging: LoggingSettings {
                directory: default_log_dir(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
