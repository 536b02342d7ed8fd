//! EDData - Star-system catalog core
//!
//! This library provides the pieces that sit between a read-only SQLite
//! catalog of Elite Dangerous star systems and whatever serves it:
//!
//! - [`sector`] maps coordinates to deterministic sector identifiers
//! - [`catalog`] opens the four catalog databases as one connection
//! - [`bridge`] serializes queries onto a single worker thread
//! - [`planner`] turns radius searches into sector-pruned SQL
//! - [`queries`] typed catalog lookups built on the above
//!
//! # High-Level API
//!
//! ```ignore
//! use eddata::config::ConfigFile;
//! use eddata::bridge::QueryBridge;
//! use eddata::planner::ProximityPlanner;
//! use eddata::queries::{CatalogService, SystemLookup};
//! use std::sync::Arc;
//!
//! let config = ConfigFile::load()?.with_environment();
//! let bridge = QueryBridge::start(&config.catalog_paths(), config.bridge_config())?;
//! let planner = ProximityPlanner::new(config.proximity_config());
//! let service = CatalogService::new(Arc::new(bridge), planner, config.trade_limits());
//!
//! let sol = service.system(&SystemLookup::parse("Sol")).await?;
//! ```

pub mod bridge;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod planner;
pub mod queries;
pub mod sector;

/// Version of the EDData library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
