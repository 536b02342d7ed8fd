//! Catalog error types

use std::path::PathBuf;
use thiserror::Error;

use super::CatalogFile;

/// A catalog file that was expected but not found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCatalog {
    pub file: CatalogFile,
    pub path: PathBuf,
}

/// Errors raised while opening the catalog connection set.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// One or more catalog files do not exist. Every missing file is listed.
    #[error("catalog files not found: {}", describe_missing(.0))]
    MissingCatalogs(Vec<MissingCatalog>),

    #[error("failed to open catalog connection: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("failed to attach {schema} catalog {}: {source}", path.display())]
    Attach {
        schema: &'static str,
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to resolve catalog path {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl CatalogError {
    /// Missing files, if this is a [`CatalogError::MissingCatalogs`].
    pub fn missing(&self) -> &[MissingCatalog] {
        match self {
            CatalogError::MissingCatalogs(missing) => missing,
            _ => &[],
        }
    }
}

fn describe_missing(missing: &[MissingCatalog]) -> String {
    missing
        .iter()
        .map(|m| format!("{} ({})", m.file.schema(), m.path.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
