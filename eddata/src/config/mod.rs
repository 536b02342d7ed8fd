//! Configuration for the catalog core.
//!
//! Settings live in `~/.eddata/config.ini`, one INI section per concern:
//!
//! - `[catalog]` where the four catalog databases are found
//! - `[sectors]` the sector grid the catalog was built with
//! - `[proximity]` / `[trade]` search limits
//! - `[bridge]` query queue and timeout tuning
//! - `[logging]` log file location
//!
//! A missing file yields defaults. `EDDATA_DATA_DIR` overrides the data
//! directory after the file is read.
//!
//! # Example
//!
//! ```
//! use eddata::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let paths = config.catalog_paths();
//! assert!(paths.systems.ends_with("systems.db"));
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_data_dir, default_log_dir, DATA_DIR_ENV, DEFAULT_LOG_FILE, MAX_QUEUE_CAPACITY,
    MIN_QUEUE_CAPACITY,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    BridgeSettings, CatalogSettings, ConfigFile, LoggingSettings, ProximitySettings,
    SectorSettings, TradeSettings,
};
