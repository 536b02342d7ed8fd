//! Configuration file handling for ~/.eddata/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::defaults::DATA_DIR_ENV;
use super::settings::ConfigFile;

use crate::bridge::BridgeConfig;
use crate::catalog::{CatalogFile, CatalogPaths};
use crate::planner::ProximityConfig;
use crate::queries::TradeLimits;
use crate::sector::{check_covering_bound, search_radius, SectorError};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.eddata/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.eddata/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }

    /// Applies `EDDATA_DATA_DIR` from the process environment.
    pub fn with_environment(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    /// Applies environment-style overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            let dir = dir.trim();
            if !dir.is_empty() {
                tracing::debug!(data_dir = dir, "Data directory overridden by {}", DATA_DIR_ENV);
                self.catalog.data_dir = super::parser::expand_tilde(dir);
            }
        }
    }

    /// Resolved catalog file locations.
    pub fn catalog_paths(&self) -> CatalogPaths {
        let dir = &self.catalog.data_dir;
        let resolve = |file: CatalogFile, custom: &Option<PathBuf>| {
            custom
                .clone()
                .unwrap_or_else(|| dir.join(file.default_file_name()))
        };
        CatalogPaths {
            systems: resolve(CatalogFile::Systems, &self.catalog.systems_db),
            locations: resolve(CatalogFile::Locations, &self.catalog.locations_db),
            stations: resolve(CatalogFile::Stations, &self.catalog.stations_db),
            trade: resolve(CatalogFile::Trade, &self.catalog.trade_db),
        }
    }

    pub fn proximity_config(&self) -> ProximityConfig {
        ProximityConfig {
            grid_size: self.sectors.grid_size,
            default_distance: self.proximity.default_distance,
            max_distance: self.proximity.max_distance,
            max_results: self.proximity.max_results,
            max_nearest_results: self.proximity.max_nearest_results,
        }
    }

    /// Rejects a grid too fine for the radius ceiling.
    ///
    /// The largest radius search must not enumerate more than
    /// [`MAX_COVERING_CELLS`](crate::sector::MAX_COVERING_CELLS) sectors.
    pub fn check_search_bound(&self) -> Result<(), SectorError> {
        check_covering_bound(
            search_radius(self.proximity.max_distance),
            self.sectors.grid_size,
        )
    }

    pub fn trade_limits(&self) -> TradeLimits {
        TradeLimits {
            default_max_age_days: self.trade.default_max_age_days,
            max_age_days: self.trade.max_age_days,
            max_distance: self.trade.max_distance,
            max_results: self.trade.max_results,
        }
    }

    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            queue_capacity: self.bridge.queue_capacity,
            task_timeout: match self.bridge.task_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

/// Get the path to the config directory (~/.eddata).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".eddata")
}

/// Get the path to the config file (~/.eddata/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sector::DEFAULT_GRID_SIZE;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.sectors.grid_size.light_years(), DEFAULT_GRID_SIZE);
        assert_eq!(config.proximity.default_distance, 100.0);
        assert_eq!(config.proximity.max_distance, 500.0);
        assert_eq!(config.proximity.max_results, 1000);
        assert_eq!(config.proximity.max_nearest_results, 20);
        assert_eq!(config.trade.default_max_age_days, 7);
        assert_eq!(config.trade.max_age_days, 14);
        assert_eq!(config.bridge.queue_capacity, 1024);
        assert_eq!(config.bridge.task_timeout_secs, 30);
        assert!(config.catalog.data_dir.ends_with("data"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_catalog_paths_resolve_inside_data_dir() {
        let mut config = ConfigFile::default();
        config.catalog.data_dir = PathBuf::from("/srv/eddata");
        config.catalog.trade_db = Some(PathBuf::from("/mnt/fast/trade.db"));

        let paths = config.catalog_paths();
        assert_eq!(paths.systems, PathBuf::from("/srv/eddata/systems.db"));
        assert_eq!(paths.locations, PathBuf::from("/srv/eddata/locations.db"));
        assert_eq!(paths.stations, PathBuf::from("/srv/eddata/stations.db"));
        assert_eq!(paths.trade, PathBuf::from("/mnt/fast/trade.db"));
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = ConfigFile::default();
        config.apply_overrides(|key| {
            (key == DATA_DIR_ENV).then(|| "/app/data".to_string())
        });
        assert_eq!(config.catalog.data_dir, PathBuf::from("/app/data"));

        // Blank values are ignored
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.catalog.data_dir, PathBuf::from("/app/data"));
    }

    #[test]
    fn test_zero_timeout_disables_watchdog() {
        let mut config = ConfigFile::default();
        assert_eq!(
            config.bridge_config().task_timeout,
            Some(Duration::from_secs(30))
        );
        config.bridge.task_timeout_secs = 0;
        assert_eq!(config.bridge_config().task_timeout, None);
    }
}
