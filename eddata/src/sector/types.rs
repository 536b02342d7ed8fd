//! Sector type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Light-years per cell edge the stored catalog was built with.
///
/// Stored `systemSector` values only match runtime hashing while this value
/// is unchanged. Serving a dataset built with another grid requires
/// configuring the same value it was built with.
pub const DEFAULT_GRID_SIZE: f64 = 100.0;

/// Number of hex characters kept from the sector digest.
pub const SECTOR_ID_LENGTH: usize = 8;

/// A position in the galaxy, in light-years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns true if all three axes are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Straight-line distance to another coordinate.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Edge length of a sector cube, in light-years.
///
/// Always finite and strictly positive; the only way to build one is
/// through [`GridSize::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSize(f64);

impl GridSize {
    /// Validates a grid size.
    pub fn new(light_years: f64) -> Result<Self, SectorError> {
        if light_years.is_finite() && light_years > 0.0 {
            Ok(Self(light_years))
        } else {
            Err(SectorError::InvalidGridSize(light_years))
        }
    }

    #[inline]
    pub fn light_years(&self) -> f64 {
        self.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(DEFAULT_GRID_SIZE)
    }
}

/// Integer coordinates of a sector cube.
///
/// Cell `(cx, cy, cz)` spans `[cx * g, (cx + 1) * g)` on the x axis, and the
/// same on y and z, for grid size `g`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CellCoord {
    #[inline]
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Cell containing the given coordinate.
    ///
    /// Floors toward negative infinity so that, for example, `-0.5` lands in
    /// cell `-1` rather than cell `0`.
    #[inline]
    pub fn containing(coordinate: &Coordinate, grid: GridSize) -> Self {
        let g = grid.light_years();
        Self {
            x: (coordinate.x / g).floor() as i64,
            y: (coordinate.y / g).floor() as i64,
            z: (coordinate.z / g).floor() as i64,
        }
    }

    /// Canonical text form fed to the digest, e.g. `"-1,0,3"`.
    pub fn canonical(&self) -> String {
        format!("{},{},{}", self.x, self.y, self.z)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Compact sector identifier stored alongside every system row.
///
/// Always [`SECTOR_ID_LENGTH`] lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SectorId(String);

impl SectorId {
    pub(crate) fn from_digest_hex(hex: String) -> Self {
        debug_assert_eq!(hex.len(), SECTOR_ID_LENGTH);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while configuring the sector grid.
#[derive(Debug, Clone, PartialEq)]
pub enum SectorError {
    /// Grid size is zero, negative, or not a finite number
    InvalidGridSize(f64),
    /// A search radius would enumerate more cells than a covering allows
    TooManyCells {
        radius: f64,
        grid_size: f64,
        cells: f64,
    },
}

impl fmt::Display for SectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorError::InvalidGridSize(size) => {
                write!(
                    f,
                    "Invalid grid size: {} (must be a finite number of light-years greater than 0)",
                    size
                )
            }
            SectorError::TooManyCells {
                radius,
                grid_size,
                cells,
            } => write!(
                f,
                "A {} ly search on a {} ly grid could scan {:.0} sectors (limit {})",
                radius,
                grid_size,
                cells,
                super::MAX_COVERING_CELLS
            ),
        }
    }
}

impl std::error::Error for SectorError {}
