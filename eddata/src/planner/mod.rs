//! Proximity query planning.
//!
//! Turns a [`ProximityRequest`] into a [`QueryTask`] that the bridge can run:
//!
//! 1. The sector index restricts the scan to rows whose `systemSector` is one
//!    of the cells the search sphere can touch.
//! 2. `eddata_distance` projects the rounded distance to the center.
//! 3. The outer query keeps rows with `distance <= @maxDistance`, orders by
//!    distance and applies the result cap.
//!
//! Only fixed `&'static str` fragments and internally computed sector ids are
//! spliced into the statement. Every caller-supplied value is a named
//! parameter.

mod filter;

pub use filter::RowFilter;

use tracing::debug;

use crate::bridge::QueryTask;
use crate::catalog::{Params, DISTANCE_FUNCTION};
use crate::sector::{cells_covering, search_radius, Coordinate, GridSize};

/// Default radius for nearby searches, in light-years.
pub const DEFAULT_NEARBY_DISTANCE: f64 = 100.0;

/// Largest radius a nearby search may use.
pub const MAX_NEARBY_DISTANCE: f64 = 500.0;

/// Result ceiling for nearby searches.
pub const MAX_NEARBY_RESULTS: u32 = 1000;

/// Result ceiling for nearest-match searches.
pub const MAX_NEAREST_RESULTS: u32 = 20;

/// Limits applied to every proximity request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityConfig {
    pub grid_size: GridSize,
    /// Radius used when a request gives none
    pub default_distance: f64,
    /// Radius ceiling; larger requests are clamped
    pub max_distance: f64,
    /// Result ceiling for radius searches
    pub max_results: u32,
    /// Result ceiling for nearest-match searches
    pub max_nearest_results: u32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default(),
            default_distance: DEFAULT_NEARBY_DISTANCE,
            max_distance: MAX_NEARBY_DISTANCE,
            max_results: MAX_NEARBY_RESULTS,
            max_nearest_results: MAX_NEAREST_RESULTS,
        }
    }
}

/// One radius search.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityRequest {
    pub center: Coordinate,
    /// Search radius; `None` uses the configured default
    pub max_distance: Option<f64>,
    /// Result cap; `None` uses the configured ceiling
    pub limit: Option<u32>,
    /// Row id to leave out, usually the center system itself
    pub exclude: Option<i64>,
}

impl ProximityRequest {
    pub fn new(center: Coordinate) -> Self {
        Self {
            center,
            max_distance: None,
            limit: None,
            exclude: None,
        }
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn excluding(mut self, id: i64) -> Self {
        self.exclude = Some(id);
        self
    }
}

/// A catalog table with coordinate columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialTable {
    /// Schema-qualified table name
    pub table: &'static str,
    /// Select list for the inner query
    pub columns: &'static str,
    pub x: &'static str,
    pub y: &'static str,
    pub z: &'static str,
    /// Unique row id, used for exclusion and as the distance tie-break
    pub id: &'static str,
    /// Column holding the stored sector id, if the table has one
    pub sector: Option<&'static str>,
}

impl SpatialTable {
    /// `systems.systems`, indexed by `systemSector`.
    pub const SYSTEMS: SpatialTable = SpatialTable {
        table: "systems.systems",
        columns: "*",
        x: "systemX",
        y: "systemY",
        z: "systemZ",
        id: "systemAddress",
        sector: Some("systemSector"),
    };

    /// `stations.stations`, which carries its system's coordinates but no
    /// sector column.
    pub const STATIONS: SpatialTable = SpatialTable {
        table: "stations.stations",
        columns: "*",
        x: "systemX",
        y: "systemY",
        z: "systemZ",
        id: "marketId",
        sector: None,
    };
}

/// Builds proximity statements.
#[derive(Debug, Clone, Default)]
pub struct ProximityPlanner {
    config: ProximityConfig,
}

impl ProximityPlanner {
    pub fn new(config: ProximityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Radius actually searched for a requested radius.
    ///
    /// Missing or non-finite values take the default, negative values become
    /// zero and values over the ceiling are clamped to it.
    pub fn clamp_distance(&self, requested: Option<f64>) -> f64 {
        let distance = match requested {
            Some(d) if d.is_finite() => d.max(0.0),
            _ => self.config.default_distance,
        };
        if distance > self.config.max_distance {
            debug!(
                requested = distance,
                max = self.config.max_distance,
                "Clamping search radius"
            );
            self.config.max_distance
        } else {
            distance
        }
    }

    /// Result cap actually applied for a requested cap.
    pub fn clamp_limit(&self, requested: Option<u32>, ceiling: u32) -> u32 {
        match requested {
            Some(limit) if limit > ceiling => {
                debug!(requested = limit, max = ceiling, "Clamping result limit");
                ceiling
            }
            Some(limit) => limit,
            None => ceiling,
        }
    }

    /// Plans a radius search over `table`.
    ///
    /// Rows come back with an extra `distance` column, nearest first, never
    /// farther than the clamped radius, and never more than the clamped cap.
    pub fn plan(
        &self,
        table: &SpatialTable,
        request: &ProximityRequest,
        filter: &RowFilter,
    ) -> QueryTask {
        let max_distance = self.clamp_distance(request.max_distance);
        let limit = self.clamp_limit(request.limit, self.config.max_results);
        let radius = search_radius(max_distance);
        let center = &request.center;

        let mut clauses = Vec::new();
        let mut params = center_params(center);

        match table.sector {
            Some(column) => {
                let sectors = cells_covering(center, radius, self.config.grid_size);
                let list = sectors
                    .iter()
                    .map(|id| format!("'{}'", id))
                    .collect::<Vec<_>>()
                    .join(", ");
                clauses.push(format!("{} IN ({})", column, list));
                debug!(
                    table = table.table,
                    sectors = sectors.len(),
                    radius = max_distance,
                    "Planned sector scan"
                );
            }
            None => {
                // Bounding box on the raw columns
                for (axis, column, value) in [
                    ("X", table.x, center.x),
                    ("Y", table.y, center.y),
                    ("Z", table.z, center.z),
                ] {
                    clauses.push(format!(
                        "{column} BETWEEN @min{axis} AND @max{axis}",
                        column = column,
                        axis = axis
                    ));
                    params.insert(&format!("min{}", axis), value - radius);
                    params.insert(&format!("max{}", axis), value + radius);
                }
            }
        }

        if let Some(id) = request.exclude {
            clauses.push(format!("{} != @excludeId", table.id));
            params.insert("excludeId", id);
        }
        clauses.extend(filter.clauses().map(|c| format!("({})", c)));
        params.extend(filter.params().clone());
        params.insert("maxDistance", max_distance);
        params.insert("limit", limit);

        let statement = format!(
            "SELECT * FROM (SELECT {columns}, {distance} AS distance FROM {table} WHERE {clauses}) \
             WHERE distance <= @maxDistance ORDER BY distance, {id} LIMIT @limit",
            columns = table.columns,
            distance = distance_expression(table),
            table = table.table,
            clauses = clauses.join(" AND "),
            id = table.id,
        );
        QueryTask::new(statement, params)
    }

    /// Plans a nearest-match search: no sector restriction and no radius,
    /// just the closest rows matching `filter`.
    ///
    /// Rows with NULL coordinates are skipped.
    pub fn plan_nearest(
        &self,
        table: &SpatialTable,
        center: &Coordinate,
        filter: &RowFilter,
        limit: Option<u32>,
    ) -> QueryTask {
        let limit = self.clamp_limit(limit, self.config.max_nearest_results);
        let mut clauses = vec![
            format!("{} IS NOT NULL", table.x),
            format!("{} IS NOT NULL", table.y),
            format!("{} IS NOT NULL", table.z),
        ];
        clauses.extend(filter.clauses().map(|c| format!("({})", c)));

        let mut params = center_params(center);
        params.extend(filter.params().clone());
        params.insert("limit", limit);

        let statement = format!(
            "SELECT {columns}, {distance} AS distance FROM {table} WHERE {clauses} \
             ORDER BY distance, {id} LIMIT @limit",
            columns = table.columns,
            distance = distance_expression(table),
            table = table.table,
            clauses = clauses.join(" AND "),
            id = table.id,
        );
        QueryTask::new(statement, params)
    }
}

/// `eddata_distance(x, y, z, @centerX, @centerY, @centerZ)` for `table`.
pub fn distance_expression(table: &SpatialTable) -> String {
    format!(
        "{}({}, {}, {}, @centerX, @centerY, @centerZ)",
        DISTANCE_FUNCTION, table.x, table.y, table.z
    )
}

/// Parameters naming the search center.
pub fn center_params(center: &Coordinate) -> Params {
    Params::new()
        .with("centerX", center.x)
        .with("centerY", center.y)
        .with("centerZ", center.z)
}
