//! Commodity import and export searches

use chrono::{Days, NaiveDate};
use tracing::debug;

use super::types::System;

/// Default age, in days, of the oldest market data returned.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 7;

/// Hard ceiling on market data age, in days.
pub const MAX_AGE_DAYS: u32 = 14;

/// Largest radius a commodity search may use around a system.
pub const MAX_COMMODITY_DISTANCE: f64 = 1000.0;

/// Result ceiling for commodity searches.
pub const MAX_COMMODITY_RESULTS: u32 = 100;

/// Which side of the market to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    /// Markets buying the commodity (where to sell it)
    Imports,
    /// Markets selling the commodity (where to buy it)
    Exports,
}

impl TradeDirection {
    /// Ordering for the price sort.
    pub(crate) fn price_order(self) -> &'static str {
        match self {
            TradeDirection::Imports => "c.sellPrice DESC",
            TradeDirection::Exports => "c.buyPrice ASC",
        }
    }
}

/// Result ordering for commodity searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommoditySort {
    /// Best price first
    #[default]
    Price,
    /// Nearest market first; only honoured when a system is given
    Distance,
}

/// Limits applied to commodity searches.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeLimits {
    pub default_max_age_days: u32,
    pub max_age_days: u32,
    pub max_distance: f64,
    pub max_results: u32,
}

impl Default for TradeLimits {
    fn default() -> Self {
        Self {
            default_max_age_days: DEFAULT_MAX_AGE_DAYS,
            max_age_days: MAX_AGE_DAYS,
            max_distance: MAX_COMMODITY_DISTANCE,
            max_results: MAX_COMMODITY_RESULTS,
        }
    }
}

impl TradeLimits {
    /// Data age actually used. Zero or missing falls back to the default.
    pub fn clamp_age(&self, requested: Option<u32>) -> u32 {
        let days = match requested {
            Some(0) | None => self.default_max_age_days,
            Some(days) => days,
        };
        if days > self.max_age_days {
            debug!(requested = days, max = self.max_age_days, "Clamping market data age");
            self.max_age_days
        } else {
            days
        }
    }

    /// Search radius actually used around a system.
    pub fn clamp_distance(&self, requested: Option<f64>) -> Option<f64> {
        match requested {
            Some(d) if d.is_finite() && d > 0.0 => {
                if d > self.max_distance {
                    debug!(requested = d, max = self.max_distance, "Clamping commodity radius");
                    Some(self.max_distance)
                } else {
                    Some(d)
                }
            }
            _ => None,
        }
    }
}

/// A commodity search.
#[derive(Debug, Clone, PartialEq)]
pub struct CommodityQuery {
    pub commodity: String,
    pub direction: TradeDirection,
    /// Minimum demand (imports) or stock (exports)
    pub min_volume: i64,
    /// Minimum sell price; imports only
    pub min_price: i64,
    /// Maximum buy price; exports only
    pub max_price: Option<i64>,
    /// `Some(true)` for carriers only, `Some(false)` to leave them out
    pub fleet_carriers: Option<bool>,
    pub max_days_ago: Option<u32>,
    /// System to measure distance from
    pub near: Option<System>,
    /// Radius around `near`; ignored without it
    pub max_distance: Option<f64>,
    pub sort: CommoditySort,
}

impl CommodityQuery {
    pub fn new(commodity: &str, direction: TradeDirection) -> Self {
        Self {
            commodity: commodity.to_string(),
            direction,
            min_volume: 1,
            min_price: 1,
            max_price: None,
            fleet_carriers: None,
            max_days_ago: None,
            near: None,
            max_distance: None,
            sort: CommoditySort::Price,
        }
    }

    pub fn imports(commodity: &str) -> Self {
        Self::new(commodity, TradeDirection::Imports)
    }

    pub fn exports(commodity: &str) -> Self {
        Self::new(commodity, TradeDirection::Exports)
    }

    pub fn near(mut self, system: System, max_distance: Option<f64>) -> Self {
        self.near = Some(system);
        self.max_distance = max_distance;
        self
    }

    /// Commodity names are stored lower-case.
    pub(crate) fn normalized_commodity(&self) -> String {
        self.commodity.trim().to_lowercase()
    }
}

/// `YYYY-MM-DD` date `days` before `today`, compared against `updatedAtDay`.
pub fn cutoff_day(today: NaiveDate, days: u32) -> String {
    today
        .checked_sub_days(Days::new(days.into()))
        .unwrap_or(NaiveDate::MIN)
        .format("%Y-%m-%d")
        .to_string()
}
