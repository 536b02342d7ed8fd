//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::{clamp_default, clamp_queue_capacity};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::sector::GridSize;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [catalog] section
    if let Some(section) = ini.section(Some("catalog")) {
        if let Some(v) = non_empty(section.get("data_dir")) {
            config.catalog.data_dir = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("systems_db")) {
            config.catalog.systems_db = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section.get("locations_db")) {
            config.catalog.locations_db = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section.get("stations_db")) {
            config.catalog.stations_db = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section.get("trade_db")) {
            config.catalog.trade_db = Some(expand_tilde(v));
        }
    }

    // [sectors] section
    if let Some(section) = ini.section(Some("sectors")) {
        if let Some(v) = section.get("grid_size") {
            let invalid = || ConfigFileError::InvalidValue {
                section: "sectors".to_string(),
                key: "grid_size".to_string(),
                value: v.to_string(),
                reason: "must be a finite number of light-years greater than 0".to_string(),
            };
            let size: f64 = v.trim().parse().map_err(|_| invalid())?;
            config.sectors.grid_size = GridSize::new(size).map_err(|_| invalid())?;
            if size != crate::sector::DEFAULT_GRID_SIZE {
                tracing::warn!(
                    grid_size = size,
                    "Non-default sector grid size; the catalog must have been built with it"
                );
            }
        }
    }

    // [proximity] section
    if let Some(section) = ini.section(Some("proximity")) {
        if let Some(v) = section.get("default_distance") {
            config.proximity.default_distance = parse_distance("proximity", "default_distance", v)?;
        }
        if let Some(v) = section.get("max_distance") {
            config.proximity.max_distance = parse_distance("proximity", "max_distance", v)?;
        }
        if let Some(v) = section.get("max_results") {
            config.proximity.max_results = parse_count("proximity", "max_results", v)?;
        }
        if let Some(v) = section.get("max_nearest_results") {
            config.proximity.max_nearest_results =
                parse_count("proximity", "max_nearest_results", v)?;
        }
    }
    config.proximity.default_distance = clamp_default(
        "default_distance",
        config.proximity.default_distance,
        config.proximity.max_distance,
    );
    config
        .check_search_bound()
        .map_err(|e| ConfigFileError::InvalidValue {
            section: "sectors".to_string(),
            key: "grid_size".to_string(),
            value: config.sectors.grid_size.light_years().to_string(),
            reason: e.to_string(),
        })?;

    // [trade] section
    if let Some(section) = ini.section(Some("trade")) {
        if let Some(v) = section.get("default_max_age_days") {
            config.trade.default_max_age_days = parse_count("trade", "default_max_age_days", v)?;
        }
        if let Some(v) = section.get("max_age_days") {
            config.trade.max_age_days = parse_count("trade", "max_age_days", v)?;
        }
        if let Some(v) = section.get("max_distance") {
            config.trade.max_distance = parse_distance("trade", "max_distance", v)?;
        }
        if let Some(v) = section.get("max_results") {
            config.trade.max_results = parse_count("trade", "max_results", v)?;
        }
    }
    config.trade.default_max_age_days = clamp_default(
        "default_max_age_days",
        config.trade.default_max_age_days,
        config.trade.max_age_days,
    );

    // [bridge] section
    if let Some(section) = ini.section(Some("bridge")) {
        if let Some(v) = section.get("queue_capacity") {
            let capacity: usize = parse_number("bridge", "queue_capacity", v, "must be a positive integer")?;
            config.bridge.queue_capacity = clamp_queue_capacity(capacity);
        }
        if let Some(v) = section.get("task_timeout_secs") {
            config.bridge.task_timeout_secs = parse_number(
                "bridge",
                "task_timeout_secs",
                v,
                "must be a whole number of seconds (0 disables the timeout)",
            )?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
}

/// Positive, finite light-year distance.
fn parse_distance(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    const REASON: &str = "must be a positive number of light-years";
    let distance: f64 = parse_number(section, key, value, REASON)?;
    if !distance.is_finite() || distance <= 0.0 {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: REASON.to_string(),
        });
    }
    Ok(distance)
}

/// Positive integer count.
fn parse_count(section: &str, key: &str, value: &str) -> Result<u32, ConfigFileError> {
    const REASON: &str = "must be a positive integer";
    let count: u32 = parse_number(section, key, value, REASON)?;
    if count == 0 {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: REASON.to_string(),
        });
    }
    Ok(count)
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::config::settings::ConfigFile;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_invalid_grid_size() {
        for value in ["0", "-100", "abc", "inf", "NaN"] {
            let err = load(&format!("[sectors]\ngrid_size = {}\n", value)).unwrap_err();
            assert!(
                matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "grid_size"),
                "grid_size = {} should be rejected",
                value
            );
            assert!(err.to_string().contains("greater than 0"));
        }
    }

    #[test]
    fn test_grid_too_fine_for_max_distance() {
        let err = load("[sectors]\ngrid_size = 0.01\n").unwrap_err();
        assert!(
            matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "grid_size")
        );
        assert!(err.to_string().contains("sectors"));

        // The same grid is fine once the ceiling is small enough
        let config = load("[sectors]\ngrid_size = 5\n\n[proximity]\nmax_distance = 200\n").unwrap();
        assert_eq!(config.sectors.grid_size.light_years(), 5.0);
        assert!(load("[sectors]\ngrid_size = 5\n").is_err());
    }

    #[test]
    fn test_custom_grid_size() {
        let config = load("[sectors]\ngrid_size = 250\n").unwrap();
        assert_eq!(config.sectors.grid_size.light_years(), 250.0);
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[catalog]
data_dir = /srv/eddata

[proximity]
max_distance = 250

[bridge]
task_timeout_secs = 0
"#,
        )
        .unwrap();

        // Specified values
        assert_eq!(config.catalog.data_dir, PathBuf::from("/srv/eddata"));
        assert_eq!(config.proximity.max_distance, 250.0);
        assert_eq!(config.bridge.task_timeout_secs, 0);

        // Default values
        assert_eq!(config.proximity.default_distance, 100.0);
        assert_eq!(config.bridge.queue_capacity, 1024);
        assert_eq!(config.logging.file, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_default_distance_clamped_to_max() {
        let config = load("[proximity]\nmax_distance = 50\n").unwrap();
        assert_eq!(config.proximity.max_distance, 50.0);
        assert_eq!(config.proximity.default_distance, 50.0);
    }

    #[test]
    fn test_default_age_clamped_to_max() {
        let config = load("[trade]\ndefault_max_age_days = 30\nmax_age_days = 10\n").unwrap();
        assert_eq!(config.trade.default_max_age_days, 10);
        assert_eq!(config.trade.max_age_days, 10);
    }

    #[test]
    fn test_invalid_counts_and_distances() {
        let err = load("[proximity]\nmax_results = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_results"));

        let err = load("[trade]\nmax_distance = -5\n").unwrap_err();
        assert!(err.to_string().contains("trade.max_distance"));

        let err = load("[bridge]\nqueue_capacity = lots\n").unwrap_err();
        assert!(err.to_string().contains("queue_capacity"));
    }

    #[test]
    fn test_queue_capacity_clamped() {
        let config = load("[bridge]\nqueue_capacity = 0\n").unwrap();
        assert_eq!(config.bridge.queue_capacity, MIN_QUEUE_CAPACITY);
    }

    #[test]
    fn test_blank_paths_keep_defaults() {
        let config = load("[catalog]\ndata_dir =\nsystems_db = \n").unwrap();
        assert_eq!(config.catalog.data_dir, default_data_dir());
        assert!(config.catalog.systems_db.is_none());
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
