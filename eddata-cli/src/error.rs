//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use eddata::bridge::{BridgeError, QueryError};
use eddata::catalog::CatalogError;
use eddata::config::{ConfigFileError, DATA_DIR_ENV};

/// Exit code for a lookup that found nothing.
pub const EXIT_NOT_FOUND: i32 = 2;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to open the catalog
    Catalog(BridgeError),
    /// A query failed
    Query(QueryError),
    /// A system or other named entity does not exist
    NotFound(String),
    /// Argument rejected after parsing
    InvalidArgument(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to render output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound(_) => EXIT_NOT_FOUND,
            _ => 1,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        if let CliError::Catalog(BridgeError::Catalog(CatalogError::MissingCatalogs(_))) = self {
            eprintln!();
            eprintln!("Catalog files are read from [catalog] data_dir in config.ini.");
            eprintln!("Point it elsewhere with:");
            eprintln!("  1. --data-dir <DIR>");
            eprintln!("  2. the {} environment variable", DATA_DIR_ENV);
            eprintln!("  3. eddata config set catalog.data_dir <DIR>");
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Catalog(e) => write!(f, "Failed to open catalog: {}", e),
            CliError::Query(e) => write!(f, "Query failed: {}", e),
            CliError::NotFound(what) => write!(f, "{} not found", what),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Catalog(e) => Some(e),
            CliError::Query(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<BridgeError> for CliError {
    fn from(e: BridgeError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        CliError::Query(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
