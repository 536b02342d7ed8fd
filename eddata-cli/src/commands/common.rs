//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use eddata::queries::CommoditySort;

/// Commodity result ordering for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Best price first (highest sell price for imports, lowest buy price for exports)
    #[default]
    Price,
    /// Nearest market first (requires --system)
    Distance,
}

impl From<SortOrder> for CommoditySort {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Price => CommoditySort::Price,
            SortOrder::Distance => CommoditySort::Distance,
        }
    }
}

/// Parses a landing pad size given as a number (1-3) or a letter (S/M/L).
pub fn parse_pad_size(value: &str) -> Result<u8, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "s" | "small" => Ok(1),
        "2" | "m" | "medium" => Ok(2),
        "3" | "l" | "large" => Ok(3),
        other => Err(format!(
            "invalid pad size '{}': expected 1-3 or small/medium/large",
            other
        )),
    }
}
