//! Sector grid hashing and proximity cell coverage.
//!
//! Every star system in the catalog carries a `systemSector` column: the
//! [`SectorId`] of the cube of space it sits in. Proximity queries first
//! compute the sectors a search sphere can touch, then restrict the scan to
//! rows in those sectors before applying the exact distance filter.
//!
//! ```
//! use eddata::sector::{cells_covering, hash_sector, Coordinate, GridSize};
//!
//! let grid = GridSize::default();
//! let sol = Coordinate::new(0.0, 0.0, 0.0);
//!
//! let sector = hash_sector(&sol, grid);
//! assert_eq!(sector.as_str().len(), 8);
//!
//! let cells = cells_covering(&sol, 150.0, grid);
//! assert!(cells.contains(&sector));
//! ```

mod types;

pub use types::{
    CellCoord, Coordinate, GridSize, SectorError, SectorId, DEFAULT_GRID_SIZE, SECTOR_ID_LENGTH,
};

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Slack added to a search radius before computing covering cells.
///
/// The distance filter compares `round(d) <= r`, which admits points out to
/// `r + 0.5`. Widening the index by the same amount keeps every row the
/// filter would accept inside the scanned sectors.
pub const ROUNDING_SLACK: f64 = 0.5;

/// Hashes the cell containing `coordinate` into a [`SectorId`].
///
/// Pure function of the coordinate and grid size: the same inputs always
/// produce the same identifier, across processes and releases.
#[inline]
pub fn hash_sector(coordinate: &Coordinate, grid: GridSize) -> SectorId {
    hash_cell(&CellCoord::containing(coordinate, grid))
}

/// Convenience form of [`hash_sector`] taking raw axis values.
pub fn sector_id(x: f64, y: f64, z: f64, grid: GridSize) -> SectorId {
    hash_sector(&Coordinate::new(x, y, z), grid)
}

/// Hashes integer cell coordinates into a [`SectorId`].
///
/// SHA-256 of the canonical `"cx,cy,cz"` string, truncated to the first
/// [`SECTOR_ID_LENGTH`] hex characters.
pub fn hash_cell(cell: &CellCoord) -> SectorId {
    let digest = Sha256::digest(cell.canonical().as_bytes());
    let mut hex = String::with_capacity(SECTOR_ID_LENGTH);
    for byte in digest.iter().take(SECTOR_ID_LENGTH / 2) {
        // Writing to a String cannot fail
        let _ = write!(hex, "{:02x}", byte);
    }
    SectorId::from_digest_hex(hex)
}

/// Returns every cell that may hold a point within `radius` of `center`.
///
/// Every cell overlapping the bounding cube `center ± radius` is returned,
/// so the result is a superset of the cells the sphere touches and never
/// omits a cell that contains a qualifying point. A point at exactly
/// `radius` counts as qualifying.
///
/// Work grows with `(2 * radius / grid + 1)^3`. Callers cap the radius
/// before calling.
pub fn covering_cells(center: &Coordinate, radius: f64, grid: GridSize) -> Vec<CellCoord> {
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };

    let low = CellCoord::containing(
        &Coordinate::new(center.x - radius, center.y - radius, center.z - radius),
        grid,
    );
    let high = CellCoord::containing(
        &Coordinate::new(center.x + radius, center.y + radius, center.z + radius),
        grid,
    );

    let mut cells = Vec::new();
    for x in low.x..=high.x {
        for y in low.y..=high.y {
            for z in low.z..=high.z {
                cells.push(CellCoord::new(x, y, z));
            }
        }
    }
    cells
}

/// Sector identifiers for [`covering_cells`], de-duplicated and sorted.
///
/// Sorting keeps generated statements byte-for-byte reproducible.
pub fn cells_covering(center: &Coordinate, radius: f64, grid: GridSize) -> Vec<SectorId> {
    covering_cells(center, radius, grid)
        .iter()
        .map(hash_cell)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Radius to hand the indexer for a rounded-distance filter of `max_distance`.
#[inline]
pub fn search_radius(max_distance: f64) -> f64 {
    max_distance + ROUNDING_SLACK
}

/// Most cells a single covering may enumerate before callers refuse it.
pub const MAX_COVERING_CELLS: u64 = 1_000_000;

/// Upper bound on the number of cells [`covering_cells`] returns for `radius`.
///
/// Each axis spans at most `2 * radius / grid + 2` cells.
pub fn covering_cell_bound(radius: f64, grid: GridSize) -> f64 {
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    (2.0 * radius / grid.light_years() + 2.0).powi(3)
}

/// Checks that a search of `radius` on `grid` stays within [`MAX_COVERING_CELLS`].
pub fn check_covering_bound(radius: f64, grid: GridSize) -> Result<(), SectorError> {
    let bound = covering_cell_bound(radius, grid);
    if bound > MAX_COVERING_CELLS as f64 {
        return Err(SectorError::TooManyCells {
            radius,
            grid_size: grid.light_years(),
            cells: bound,
        });
    }
    Ok(())
}

/// Distance between two coordinates, rounded half away from zero.
///
/// This is the one distance formula used both in SQL (through the
/// `eddata_distance` function registered on every catalog connection) and
/// in Rust, so a displayed distance always agrees with the filter decision.
#[inline]
pub fn rounded_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    a.distance_to(b).round()
}

/// Returns true if `point` passes the rounded-distance filter.
#[inline]
pub fn within_distance(center: &Coordinate, point: &Coordinate, max_distance: f64) -> bool {
    rounded_distance(center, point) <= max_distance
}
