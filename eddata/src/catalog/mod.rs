//! Catalog storage: the read-only SQLite connection set and the values that
//! flow in and out of it.
//!
//! The catalog is four SQLite files (systems, locations, stations, trade)
//! produced by the ingestion process. [`ConnectionSet`] attaches all four to
//! one in-memory connection so statements can join across them using schema
//! qualified names such as `systems.systems` or `trade.commodities`.

mod connection;
mod error;
mod value;

pub use connection::{CatalogFile, CatalogPaths, ConnectionSet, DISTANCE_FUNCTION};
pub use error::{CatalogError, MissingCatalog};
pub use value::{Params, Row, Scalar};
