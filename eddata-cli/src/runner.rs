//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, catalog opening and
//! output rendering to reduce duplication across command handlers.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Runtime;
use tracing::info;

use eddata::bridge::QueryBridge;
use eddata::config::ConfigFile;
use eddata::logging::{init_logging, LoggingGuard};
use eddata::planner::ProximityPlanner;
use eddata::queries::{CatalogService, System, SystemLookup};

use crate::error::CliError;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file to read instead of ~/.eddata/config.ini
    pub config: Option<PathBuf>,
    /// Catalog directory, overriding config and environment
    pub data_dir: Option<PathBuf>,
    /// Mirror logs to stderr
    pub verbose: bool,
}

/// Loads configuration with overrides applied: file, then environment, then flags.
pub fn load_config(options: &GlobalOptions) -> Result<ConfigFile, CliError> {
    let config = match &options.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    let mut config = config.with_environment();
    if let Some(dir) = &options.data_dir {
        config.catalog.data_dir = dir.clone();
    }
    Ok(config)
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let config = load_config(options)?;

        let logging_guard = init_logging(
            &config.logging.directory,
            &config.logging.file,
            options.verbose,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("EDData v{}", eddata::VERSION);
        info!(
            data_dir = %self.config.catalog.data_dir.display(),
            "EDData CLI: {} command",
            command
        );
    }

    /// Opens the catalog and starts the query bridge.
    pub fn open_catalog(&self) -> Result<CatalogService, CliError> {
        let bridge =
            QueryBridge::start(&self.config.catalog_paths(), self.config.bridge_config())?;
        Ok(CatalogService::new(
            Arc::new(bridge),
            ProximityPlanner::new(self.config.proximity_config()),
            self.config.trade_limits(),
        ))
    }

    /// Runs `future` to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Resolves a system by address or name, failing if it does not exist.
pub async fn require_system(service: &CatalogService, identifier: &str) -> Result<System, CliError> {
    service
        .system(&SystemLookup::parse(identifier))
        .await?
        .ok_or_else(|| CliError::NotFound(format!("System '{}'", identifier)))
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
