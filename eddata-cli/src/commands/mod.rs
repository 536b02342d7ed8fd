//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path, init)
//! - [`grid`] - Sector ids and search coverage, no catalog needed
//! - [`listing`] - Top-N listings and catalog health
//! - [`systems`] - System, nearby, nearest-service, station, market and market-commodity lookups
//! - [`trade`] - Commodity imports and exports

pub mod common;
pub mod config;
pub mod grid;
pub mod listing;
pub mod systems;
pub mod trade;
