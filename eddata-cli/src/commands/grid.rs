//! Sector grid commands.
//!
//! These work from configuration alone and never open the catalog.

use serde::Serialize;

use eddata::planner::ProximityPlanner;
use eddata::sector::{
    cells_covering, check_covering_bound, hash_sector, search_radius, Coordinate, GridSize,
    SectorId,
};

use crate::error::CliError;
use crate::runner::{load_config, print_json, GlobalOptions};

#[derive(Debug, Serialize)]
struct SectorOutput {
    coordinate: Coordinate,
    grid_size: f64,
    sector: SectorId,
}

#[derive(Debug, Serialize)]
struct CellsOutput {
    center: Coordinate,
    /// Radius after clamping to `[proximity] max_distance`
    radius: f64,
    grid_size: f64,
    sectors: Vec<SectorId>,
}

fn coordinate(x: f64, y: f64, z: f64) -> Result<Coordinate, CliError> {
    let coordinate = Coordinate::new(x, y, z);
    if !coordinate.is_finite() {
        return Err(CliError::InvalidArgument(
            "coordinates must be finite numbers".to_string(),
        ));
    }
    Ok(coordinate)
}

fn grid_size(options: &GlobalOptions, requested: Option<f64>) -> Result<GridSize, CliError> {
    match requested {
        Some(size) => GridSize::new(size).map_err(|e| CliError::InvalidArgument(e.to_string())),
        None => Ok(load_config(options)?.sectors.grid_size),
    }
}

/// Print the sector id for a coordinate.
pub fn run_sector(
    options: &GlobalOptions,
    x: f64,
    y: f64,
    z: f64,
    grid: Option<f64>,
) -> Result<(), CliError> {
    let coordinate = coordinate(x, y, z)?;
    let grid = grid_size(options, grid)?;
    print_json(&SectorOutput {
        coordinate,
        grid_size: grid.light_years(),
        sector: hash_sector(&coordinate, grid),
    })
}

/// Print the sector ids a radius search around a coordinate would scan.
///
/// The radius is clamped to `[proximity] max_distance` exactly as a
/// `nearby` search would clamp it.
pub fn run_cells(
    options: &GlobalOptions,
    x: f64,
    y: f64,
    z: f64,
    radius: f64,
    grid: Option<f64>,
) -> Result<(), CliError> {
    let center = coordinate(x, y, z)?;
    if !radius.is_finite() || radius < 0.0 {
        return Err(CliError::InvalidArgument(
            "radius must be a non-negative number".to_string(),
        ));
    }
    let config = load_config(options)?;
    let grid = match grid {
        Some(size) => GridSize::new(size).map_err(|e| CliError::InvalidArgument(e.to_string()))?,
        None => config.sectors.grid_size,
    };
    let radius = ProximityPlanner::new(config.proximity_config()).clamp_distance(Some(radius));
    let scan_radius = search_radius(radius);
    check_covering_bound(scan_radius, grid)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    print_json(&CellsOutput {
        center,
        radius,
        grid_size: grid.light_years(),
        sectors: cells_covering(&center, scan_radius, grid),
    })
}
