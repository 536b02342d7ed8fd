//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with validation via the Specification Pattern.

use std::str::FromStr;
use thiserror::Error;

use super::defaults::clamp_queue_capacity;
use super::settings::ConfigFile;
use super::parser::expand_tilde;
use super::writer::path_to_string;
use crate::sector::GridSize;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Catalog settings
    CatalogDataDir,
    CatalogSystemsDb,
    CatalogLocationsDb,
    CatalogStationsDb,
    CatalogTradeDb,

    // Sector settings
    SectorsGridSize,

    // Proximity settings
    ProximityDefaultDistance,
    ProximityMaxDistance,
    ProximityMaxResults,
    ProximityMaxNearestResults,

    // Trade settings
    TradeDefaultMaxAgeDays,
    TradeMaxAgeDays,
    TradeMaxDistance,
    TradeMaxResults,

    // Bridge settings
    BridgeQueueCapacity,
    BridgeTaskTimeoutSecs,

    // Logging settings
    LoggingDirectory,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == lowered)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (section.key format).
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::CatalogDataDir => "catalog.data_dir",
            ConfigKey::CatalogSystemsDb => "catalog.systems_db",
            ConfigKey::CatalogLocationsDb => "catalog.locations_db",
            ConfigKey::CatalogStationsDb => "catalog.stations_db",
            ConfigKey::CatalogTradeDb => "catalog.trade_db",
            ConfigKey::SectorsGridSize => "sectors.grid_size",
            ConfigKey::ProximityDefaultDistance => "proximity.default_distance",
            ConfigKey::ProximityMaxDistance => "proximity.max_distance",
            ConfigKey::ProximityMaxResults => "proximity.max_results",
            ConfigKey::ProximityMaxNearestResults => "proximity.max_nearest_results",
            ConfigKey::TradeDefaultMaxAgeDays => "trade.default_max_age_days",
            ConfigKey::TradeMaxAgeDays => "trade.max_age_days",
            ConfigKey::TradeMaxDistance => "trade.max_distance",
            ConfigKey::TradeMaxResults => "trade.max_results",
            ConfigKey::BridgeQueueCapacity => "bridge.queue_capacity",
            ConfigKey::BridgeTaskTimeoutSecs => "bridge.task_timeout_secs",
            ConfigKey::LoggingDirectory => "logging.directory",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name.
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section.
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or("")
    }

    /// Get the current value of this key from config.
    pub fn get(&self, config: &ConfigFile) -> String {
        let optional_path = |p: &Option<std::path::PathBuf>| {
            p.as_deref().map(path_to_string).unwrap_or_default()
        };
        match self {
            ConfigKey::CatalogDataDir => path_to_string(&config.catalog.data_dir),
            ConfigKey::CatalogSystemsDb => optional_path(&config.catalog.systems_db),
            ConfigKey::CatalogLocationsDb => optional_path(&config.catalog.locations_db),
            ConfigKey::CatalogStationsDb => optional_path(&config.catalog.stations_db),
            ConfigKey::CatalogTradeDb => optional_path(&config.catalog.trade_db),
            ConfigKey::SectorsGridSize => config.sectors.grid_size.light_years().to_string(),
            ConfigKey::ProximityDefaultDistance => config.proximity.default_distance.to_string(),
            ConfigKey::ProximityMaxDistance => config.proximity.max_distance.to_string(),
            ConfigKey::ProximityMaxResults => config.proximity.max_results.to_string(),
            ConfigKey::ProximityMaxNearestResults => {
                config.proximity.max_nearest_results.to_string()
            }
            ConfigKey::TradeDefaultMaxAgeDays => config.trade.default_max_age_days.to_string(),
            ConfigKey::TradeMaxAgeDays => config.trade.max_age_days.to_string(),
            ConfigKey::TradeMaxDistance => config.trade.max_distance.to_string(),
            ConfigKey::TradeMaxResults => config.trade.max_results.to_string(),
            ConfigKey::BridgeQueueCapacity => config.bridge.queue_capacity.to_string(),
            ConfigKey::BridgeTaskTimeoutSecs => config.bridge.task_timeout_secs.to_string(),
            ConfigKey::LoggingDirectory => path_to_string(&config.logging.directory),
            ConfigKey::LoggingFile => config.logging.file.clone(),
        }
    }

    /// Set the value of this key in config after validation.
    ///
    /// Grid size and radius ceiling are also checked together, so a set never
    /// leaves a config that would fail to load.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        let mut updated = config.clone();
        self.set_unchecked(&mut updated, value);
        updated
            .check_search_bound()
            .map_err(|e| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason: e.to_string(),
            })?;
        *config = updated;
        Ok(())
    }

    /// Set value without validation (internal use after validation).
    fn set_unchecked(&self, config: &mut ConfigFile, value: &str) {
        let value = value.trim();
        let optional_path = || (!value.is_empty()).then(|| expand_tilde(value));
        match self {
            ConfigKey::CatalogDataDir => config.catalog.data_dir = expand_tilde(value),
            ConfigKey::CatalogSystemsDb => config.catalog.systems_db = optional_path(),
            ConfigKey::CatalogLocationsDb => config.catalog.locations_db = optional_path(),
            ConfigKey::CatalogStationsDb => config.catalog.stations_db = optional_path(),
            ConfigKey::CatalogTradeDb => config.catalog.trade_db = optional_path(),
            ConfigKey::SectorsGridSize => {
                if let Some(grid) = value.parse().ok().and_then(|v| GridSize::new(v).ok()) {
                    config.sectors.grid_size = grid;
                }
            }
            ConfigKey::ProximityDefaultDistance => {
                set_parsed(&mut config.proximity.default_distance, value)
            }
            ConfigKey::ProximityMaxDistance => set_parsed(&mut config.proximity.max_distance, value),
            ConfigKey::ProximityMaxResults => set_parsed(&mut config.proximity.max_results, value),
            ConfigKey::ProximityMaxNearestResults => {
                set_parsed(&mut config.proximity.max_nearest_results, value)
            }
            ConfigKey::TradeDefaultMaxAgeDays => {
                set_parsed(&mut config.trade.default_max_age_days, value)
            }
            ConfigKey::TradeMaxAgeDays => set_parsed(&mut config.trade.max_age_days, value),
            ConfigKey::TradeMaxDistance => set_parsed(&mut config.trade.max_distance, value),
            ConfigKey::TradeMaxResults => set_parsed(&mut config.trade.max_results, value),
            ConfigKey::BridgeQueueCapacity => {
                if let Ok(capacity) = value.parse() {
                    config.bridge.queue_capacity = clamp_queue_capacity(capacity);
                }
            }
            ConfigKey::BridgeTaskTimeoutSecs => {
                set_parsed(&mut config.bridge.task_timeout_secs, value)
            }
            ConfigKey::LoggingDirectory => config.logging.directory = expand_tilde(value),
            ConfigKey::LoggingFile => config.logging.file = value.to_string(),
        }
    }

    /// Validate a value for this key.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the specification for validating this key's values.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::CatalogDataDir | ConfigKey::LoggingDirectory => Box::new(PathSpec),
            ConfigKey::CatalogSystemsDb
            | ConfigKey::CatalogLocationsDb
            | ConfigKey::CatalogStationsDb
            | ConfigKey::CatalogTradeDb => Box::new(OptionalPathSpec),
            ConfigKey::SectorsGridSize
            | ConfigKey::ProximityDefaultDistance
            | ConfigKey::ProximityMaxDistance
            | ConfigKey::TradeMaxDistance => Box::new(PositiveNumberSpec),
            ConfigKey::ProximityMaxResults
            | ConfigKey::ProximityMaxNearestResults
            | ConfigKey::TradeDefaultMaxAgeDays
            | ConfigKey::TradeMaxAgeDays
            | ConfigKey::TradeMaxResults
            | ConfigKey::BridgeQueueCapacity => Box::new(PositiveIntegerSpec),
            ConfigKey::BridgeTaskTimeoutSecs => Box::new(NonNegativeIntegerSpec),
            ConfigKey::LoggingFile => Box::new(FileNameSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::CatalogDataDir,
            ConfigKey::CatalogSystemsDb,
            ConfigKey::CatalogLocationsDb,
            ConfigKey::CatalogStationsDb,
            ConfigKey::CatalogTradeDb,
            ConfigKey::SectorsGridSize,
            ConfigKey::ProximityDefaultDistance,
            ConfigKey::ProximityMaxDistance,
            ConfigKey::ProximityMaxResults,
            ConfigKey::ProximityMaxNearestResults,
            ConfigKey::TradeDefaultMaxAgeDays,
            ConfigKey::TradeMaxAgeDays,
            ConfigKey::TradeMaxDistance,
            ConfigKey::TradeMaxResults,
            ConfigKey::BridgeQueueCapacity,
            ConfigKey::BridgeTaskTimeoutSecs,
            ConfigKey::LoggingDirectory,
            ConfigKey::LoggingFile,
        ]
    }
}

fn set_parsed<T: FromStr>(field: &mut T, value: &str) {
    if let Ok(parsed) = value.parse() {
        *field = parsed;
    }
}

// =============================================================================
// Value Specifications (Specification Pattern)
// =============================================================================

/// Specification for validating configuration values.
trait ValueSpecification {
    /// Check if the value satisfies this specification.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Positive integer.
struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be a positive integer".to_string()),
        }
    }
}

/// Zero or a positive integer.
struct NonNegativeIntegerSpec;

impl ValueSpecification for NonNegativeIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| "must be a whole number (0 disables)".to_string())
    }
}

/// Positive, finite number.
struct PositiveNumberSpec;

impl ValueSpecification for PositiveNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => Ok(()),
            _ => Err("must be a positive number".to_string()),
        }
    }
}

/// Non-empty path.
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("path cannot be empty".to_string())
        } else {
            Ok(())
        }
    }
}

/// Path or empty (use the default location).
struct OptionalPathSpec;

impl ValueSpecification for OptionalPathSpec {
    fn is_satisfied_by(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Bare file name without directory separators.
struct FileNameSpec;

impl ValueSpecification for FileNameSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("file name cannot be empty".to_string())
        } else if value.contains('/') || value.contains('\\') {
            Err("must be a file name, not a path (set logging.directory instead)".to_string())
        } else {
            Ok(())
        }
    }
}
