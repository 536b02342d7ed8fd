//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::{Path, PathBuf};

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let optional = |p: &Option<PathBuf>| p.as_deref().map(path_to_string).unwrap_or_default();

    format!(
        r#"[catalog]
; Directory holding the catalog databases.
; The EDDATA_DATA_DIR environment variable overrides this value.
data_dir = {}
; Per-file overrides. Empty values resolve inside data_dir
; (systems.db, locations.db, stations.db, trade.db).
systems_db = {}
locations_db = {}
stations_db = {}
trade_db = {}

[sectors]
; Sector cell edge length in light-years (default: 100).
; Must match the grid the catalog's systemSector column was built with.
grid_size = {}

[proximity]
; Radius used when a search gives none, in light-years (default: 100)
default_distance = {}
; Largest radius a search may use; larger requests are clamped (default: 500)
max_distance = {}
; Result ceiling for radius searches (default: 1000)
max_results = {}
; Result ceiling for nearest-service searches (default: 20)
max_nearest_results = {}

[trade]
; Market data age used when a search gives none, in days (default: 7)
default_max_age_days = {}
; Hard ceiling on market data age, in days (default: 14)
max_age_days = {}
; Largest radius around a reference system, in light-years (default: 1000)
max_distance = {}
; Result ceiling for commodity searches (default: 100)
max_results = {}

[bridge]
; Tasks that may wait for the query worker before submissions are rejected (default: 1024)
queue_capacity = {}
; Per-query timeout in seconds; 0 disables the timeout (default: 30)
task_timeout_secs = {}

[logging]
; Directory for log files (default: ~/.eddata/logs)
directory = {}
; Log file name (default: eddata.log)
file = {}
"#,
        path_to_string(&config.catalog.data_dir),
        optional(&config.catalog.systems_db),
        optional(&config.catalog.locations_db),
        optional(&config.catalog.stations_db),
        optional(&config.catalog.trade_db),
        config.sectors.grid_size.light_years(),
        config.proximity.default_distance,
        config.proximity.max_distance,
        config.proximity.max_results,
        config.proximity.max_nearest_results,
        config.trade.default_max_age_days,
        config.trade.max_age_days,
        config.trade.max_distance,
        config.trade.max_results,
        config.bridge.queue_capacity,
        config.bridge.task_timeout_secs,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert a path to a string, using ~ for home directory.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
