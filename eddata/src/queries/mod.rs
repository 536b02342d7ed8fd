//! Catalog queries served over the bridge.
//!
//! [`CatalogService`] is the typed front door used by the CLI and by any
//! embedding service: it resolves systems, plans proximity searches and runs
//! everything through the [`QueryBridge`]. Unknown systems come back as
//! `Ok(None)` rather than an error.

mod station;
mod trade;
mod types;

pub use station::{ServiceType, StationKind, PAD_LARGE, PAD_MEDIUM, PAD_SMALL};
pub use trade::{
    cutoff_day, CommodityQuery, CommoditySort, TradeDirection, TradeLimits, DEFAULT_MAX_AGE_DAYS,
    MAX_AGE_DAYS, MAX_COMMODITY_DISTANCE, MAX_COMMODITY_RESULTS,
};
pub use types::{CatalogHealth, NearbySystem, Station, System, SystemLookup};

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::bridge::{QueryBridge, QueryError};
use crate::catalog::{Params, Row};
use crate::planner::{ProximityPlanner, ProximityRequest, RowFilter, SpatialTable};

/// Rows returned by the top-N listings.
pub const TOP_LIST_LIMIT: u32 = 30;

const SYSTEM_BY_ADDRESS: &str =
    "SELECT * FROM systems.systems WHERE systemAddress = @systemAddress LIMIT 1";

const SYSTEM_BY_NAME: &str =
    "SELECT * FROM systems.systems WHERE systemName = @systemName COLLATE NOCASE LIMIT 1";

const STATIONS_IN_SYSTEM_PREFIX: &str =
    "SELECT * FROM stations.stations WHERE systemAddress = @systemAddress AND ";

const MARKETS_IN_SYSTEM: &str = "\
    SELECT s.systemAddress, s.systemName, s.marketId, s.stationName, s.stationType, \
        s.primaryEconomy, s.secondaryEconomy, s.distanceToArrival, s.maxLandingPadSize, \
        s.allegiance, s.government, s.controllingFaction, MAX(c.updatedAt) AS updatedAt \
    FROM stations.stations s \
        LEFT JOIN trade.commodities c ON s.marketId = c.marketId \
    WHERE s.systemAddress = @systemAddress \
    GROUP BY s.marketId ORDER BY s.stationName";

const MARKET_COMMODITIES: &str = "\
    SELECT c.commodityName, c.marketId, s.stationName, s.stationType, s.distanceToArrival, \
        s.maxLandingPadSize, s.bodyId, s.bodyName, s.systemAddress, s.systemName, \
        s.systemX, s.systemY, s.systemZ, c.buyPrice, c.demand, c.demandBracket, c.meanPrice, \
        c.sellPrice, c.stock, c.stockBracket, c.updatedAt \
    FROM stations.stations s \
        LEFT JOIN trade.commodities c ON s.marketId = c.marketId \
    WHERE s.systemAddress = @systemAddress \
        AND s.stationName = @stationName COLLATE NOCASE \
    ORDER BY c.commodityName ASC";

const COMMODITY_COLUMNS: &str = "\
    c.commodityName, c.marketId, s.stationName, s.stationType, s.distanceToArrival, \
    s.maxLandingPadSize, s.bodyId, s.bodyName, s.systemAddress, s.systemName, \
    s.systemX, s.systemY, s.systemZ, c.buyPrice, c.demand, c.demandBracket, c.meanPrice, \
    c.sellPrice, c.stock, c.stockBracket, c.updatedAt";

const COMMODITY_DISTANCE: &str =
    "eddata_distance(s.systemX, s.systemY, s.systemZ, @centerX, @centerY, @centerZ) AS distance";

const TOP_SYSTEMS: &str = "\
    SELECT sys.systemAddress, sys.systemName, sys.systemX, sys.systemY, sys.systemZ, \
        sys.primaryStar, sys.allegiance, sys.government, sys.population, \
        COUNT(sta.marketId) AS stationCount, \
        COUNT(CASE WHEN sta.stationType != 'FleetCarrier' THEN 1 END) AS permanentStationCount \
    FROM systems.systems sys \
        JOIN stations.stations sta ON sys.systemAddress = sta.systemAddress \
    WHERE sta.stationType IS NOT NULL \
    GROUP BY sys.systemAddress \
    ORDER BY permanentStationCount DESC, stationCount DESC, sys.systemAddress \
    LIMIT @limit";

const TOP_STATIONS: &str = "\
    SELECT s.marketId, s.stationName, s.stationType, s.systemAddress, s.systemName, \
        s.systemX, s.systemY, s.systemZ, s.distanceToArrival, s.maxLandingPadSize, \
        s.primaryEconomy, s.secondaryEconomy, s.allegiance, s.government, s.controllingFaction, \
        ( \
            (s.blackMarket IS 1) + (s.market IS 1) + (s.refuel IS 1) + (s.repair IS 1) + \
            (s.rearm IS 1) + (s.outfitting IS 1) + (s.shipyard IS 1) + (s.crew IS 1) + \
            (s.engineer IS 1) + (s.interstellarFactors IS 1) + (s.universalCartographics IS 1) + \
            (s.materialTrader IS 1) + (s.technologyBroker IS 1) + (s.searchAndRescue IS 1) \
        ) AS serviceCount, \
        s.blackMarket, s.market, s.refuel, s.repair, s.rearm, s.outfitting, s.shipyard, \
        s.crew, s.engineer, s.interstellarFactors, s.universalCartographics, \
        s.materialTrader, s.technologyBroker, s.searchAndRescue \
    FROM stations.stations s \
    WHERE s.stationType != 'FleetCarrier' AND s.stationType IS NOT NULL \
    ORDER BY serviceCount DESC, s.maxLandingPadSize DESC, s.marketId \
    LIMIT @limit";

const TOP_COMMODITIES: &str = "\
    SELECT c.commodityName, COUNT(DISTINCT c.marketId) AS marketCount, \
        AVG(c.buyPrice) AS avgBuyPrice, AVG(c.sellPrice) AS avgSellPrice, \
        AVG(c.meanPrice) AS avgMeanPrice, SUM(c.stock) AS totalStock, \
        SUM(c.demand) AS totalDemand, MAX(c.updatedAt) AS lastUpdate \
    FROM trade.commodities c \
    WHERE c.updatedAtDay > @since \
    GROUP BY c.commodityName \
    ORDER BY marketCount DESC, totalStock DESC, c.commodityName \
    LIMIT @limit";

const SYSTEMS_COUNT: &str = "SELECT COUNT(*) AS count FROM systems.systems";
const STATIONS_COUNT: &str = "SELECT COUNT(*) AS count FROM stations.stations";

/// Typed catalog lookups.
#[derive(Clone)]
pub struct CatalogService {
    bridge: Arc<QueryBridge>,
    planner: ProximityPlanner,
    trade: TradeLimits,
}

impl CatalogService {
    pub fn new(bridge: Arc<QueryBridge>, planner: ProximityPlanner, trade: TradeLimits) -> Self {
        Self {
            bridge,
            planner,
            trade,
        }
    }

    pub fn bridge(&self) -> &QueryBridge {
        &self.bridge
    }

    pub fn planner(&self) -> &ProximityPlanner {
        &self.planner
    }

    /// Finds a system by address or case-insensitive name.
    pub async fn system(&self, lookup: &SystemLookup) -> Result<Option<System>, QueryError> {
        let row = match lookup {
            SystemLookup::Address(address) => {
                self.bridge
                    .get(SYSTEM_BY_ADDRESS, Params::new().with("systemAddress", *address))
                    .await?
            }
            SystemLookup::Name(name) => {
                self.bridge
                    .get(SYSTEM_BY_NAME, Params::new().with("systemName", name.as_str()))
                    .await?
            }
        };
        row.as_ref().map(System::from_row).transpose()
    }

    /// Systems around `center`, nearest first, excluding `center` itself.
    pub async fn nearby_systems(
        &self,
        center: &System,
        max_distance: Option<f64>,
    ) -> Result<Vec<NearbySystem>, QueryError> {
        let request = ProximityRequest {
            center: center.coordinate(),
            max_distance,
            limit: None,
            exclude: Some(center.system_address),
        };
        self.nearby(&request, &RowFilter::new()).await
    }

    /// Runs a planned radius search over `systems.systems`.
    pub async fn nearby(
        &self,
        request: &ProximityRequest,
        filter: &RowFilter,
    ) -> Result<Vec<NearbySystem>, QueryError> {
        let task = self.planner.plan(&SpatialTable::SYSTEMS, request, filter);
        let rows = self.bridge.submit(task).await?;
        debug!(center = %request.center, results = rows.len(), "Nearby systems");
        rows.iter().map(NearbySystem::from_row).collect()
    }

    /// Stations offering `service`, nearest to `center` first.
    pub async fn nearest_service(
        &self,
        center: &System,
        service: ServiceType,
        min_pad_size: Option<u8>,
    ) -> Result<Vec<Station>, QueryError> {
        let filter = RowFilter::new()
            .and(service.clause())
            .and("maxLandingPadSize >= @minPadSize")
            .bind("minPadSize", min_pad_size.unwrap_or(PAD_SMALL).max(PAD_SMALL));
        let task = self.planner.plan_nearest(
            &SpatialTable::STATIONS,
            &center.coordinate(),
            &filter,
            None,
        );
        let rows = self.bridge.submit(task).await?;
        rows.into_iter().map(Station::from_row).collect()
    }

    /// Stations of `kind` in `system`, by name.
    pub async fn stations_in_system(
        &self,
        system: &System,
        kind: StationKind,
    ) -> Result<Vec<Station>, QueryError> {
        let statement = format!(
            "{}{} ORDER BY stationName",
            STATIONS_IN_SYSTEM_PREFIX,
            kind.clause()
        );
        let rows = self
            .bridge
            .all(
                &statement,
                Params::new().with("systemAddress", system.system_address),
            )
            .await?;
        rows.into_iter().map(Station::from_row).collect()
    }

    /// Markets in `system` with the time of their latest price update.
    pub async fn markets_in_system(&self, system: &System) -> Result<Vec<Row>, QueryError> {
        self.bridge
            .all(
                MARKETS_IN_SYSTEM,
                Params::new().with("systemAddress", system.system_address),
            )
            .await
    }

    /// Commodity prices at the station called `station_name` in `system`.
    ///
    /// The name matches case-insensitively. A station with no prices yields a
    /// single row with empty commodity columns; `None` means no such station.
    pub async fn market_commodities(
        &self,
        system: &System,
        station_name: &str,
    ) -> Result<Option<Vec<Row>>, QueryError> {
        let rows = self
            .bridge
            .all(
                MARKET_COMMODITIES,
                Params::new()
                    .with("systemAddress", system.system_address)
                    .with("stationName", station_name),
            )
            .await?;
        if rows.is_empty() {
            debug!(station = station_name, system = %system.system_name, "Market not found");
            return Ok(None);
        }
        Ok(Some(rows))
    }

    /// Markets importing or exporting a commodity.
    pub async fn commodity_orders(&self, query: &CommodityQuery) -> Result<Vec<Row>, QueryError> {
        self.commodity_orders_on(query, Utc::now().date_naive()).await
    }

    /// [`commodity_orders`](Self::commodity_orders) with the age cutoff
    /// measured from `today`.
    pub async fn commodity_orders_on(
        &self,
        query: &CommodityQuery,
        today: NaiveDate,
    ) -> Result<Vec<Row>, QueryError> {
        let days = self.trade.clamp_age(query.max_days_ago);
        let mut params = Params::new()
            .with("commodityName", query.normalized_commodity())
            .with("minVolume", query.min_volume)
            .with("since", cutoff_day(today, days))
            .with("limit", self.trade.max_results);

        let mut clauses = vec![
            "c.commodityName = @commodityName",
            "s.systemAddress IS NOT NULL",
            "c.updatedAtDay > @since",
        ];
        match query.direction {
            TradeDirection::Imports => {
                // Zero demand means unlimited
                clauses.push("(c.demand >= @minVolume OR c.demand = 0)");
                clauses.push("c.sellPrice >= @minPrice");
                params.insert("minPrice", query.min_price);
            }
            TradeDirection::Exports => {
                clauses.push("c.stock >= @minVolume");
                if let Some(max_price) = query.max_price {
                    clauses.push("c.buyPrice <= @maxPrice");
                    params.insert("maxPrice", max_price);
                }
            }
        }
        match query.fleet_carriers {
            Some(true) => clauses.push("s.stationType = 'FleetCarrier'"),
            Some(false) => clauses.push("s.stationType != 'FleetCarrier'"),
            None => {}
        }

        let mut columns = COMMODITY_COLUMNS.to_string();
        let mut order = query.direction.price_order();
        if let Some(system) = &query.near {
            columns.push_str(", ");
            columns.push_str(COMMODITY_DISTANCE);
            let center = system.coordinate();
            params.insert("centerX", center.x);
            params.insert("centerY", center.y);
            params.insert("centerZ", center.z);
            if let Some(max_distance) = self.trade.clamp_distance(query.max_distance) {
                clauses.push("distance <= @maxDistance");
                params.insert("maxDistance", max_distance);
            }
            if query.sort == CommoditySort::Distance {
                order = "distance ASC";
            }
        }

        let statement = format!(
            "SELECT {} FROM trade.commodities c \
             LEFT JOIN stations.stations s ON c.marketId = s.marketId \
             WHERE {} ORDER BY {}, c.marketId LIMIT @limit",
            columns,
            clauses.join(" AND "),
            order
        );
        self.bridge.all(&statement, params).await
    }

    /// Systems with the most stations.
    pub async fn top_systems(&self) -> Result<Vec<Row>, QueryError> {
        self.bridge
            .all(TOP_SYSTEMS, Params::new().with("limit", TOP_LIST_LIMIT))
            .await
    }

    /// Non-carrier stations offering the most services.
    pub async fn top_stations(&self) -> Result<Vec<Row>, QueryError> {
        self.bridge
            .all(TOP_STATIONS, Params::new().with("limit", TOP_LIST_LIMIT))
            .await
    }

    /// Commodities traded at the most markets within the age window.
    pub async fn top_commodities(&self, max_days_ago: Option<u32>) -> Result<Vec<Row>, QueryError> {
        let days = self.trade.clamp_age(max_days_ago);
        let params = Params::new()
            .with("since", cutoff_day(Utc::now().date_naive(), days))
            .with("limit", TOP_LIST_LIMIT);
        self.bridge.all(TOP_COMMODITIES, params).await
    }

    /// Row counts for the systems and stations catalogs.
    pub async fn health(&self) -> Result<CatalogHealth, QueryError> {
        let systems = self.count(SYSTEMS_COUNT).await?;
        let stations = self.count(STATIONS_COUNT).await?;
        Ok(CatalogHealth { systems, stations })
    }

    async fn count(&self, statement: &str) -> Result<i64, QueryError> {
        let row = self
            .bridge
            .get(statement, Params::new())
            .await?
            .ok_or_else(|| QueryError::decode("count", "no row returned"))?;
        types::required_i64(&row, "count")
    }
}
