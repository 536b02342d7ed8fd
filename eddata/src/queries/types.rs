//! Typed catalog records

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::bridge::QueryError;
use crate::catalog::{Row, Scalar};
use crate::sector::Coordinate;

/// How a caller identifies a system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemLookup {
    /// 64-bit system address
    Address(i64),
    /// Display name, matched case-insensitively
    Name(String),
}

impl SystemLookup {
    /// Treats an all-digit identifier as an address and anything else as a
    /// name.
    pub fn parse(identifier: &str) -> Self {
        let trimmed = identifier.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(address) = trimmed.parse() {
                return SystemLookup::Address(address);
            }
        }
        SystemLookup::Name(trimmed.to_string())
    }
}

impl FromStr for SystemLookup {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SystemLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemLookup::Address(address) => write!(f, "address {}", address),
            SystemLookup::Name(name) => write!(f, "{}", name),
        }
    }
}

/// A star system record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    pub system_address: i64,
    pub system_name: String,
    pub system_x: f64,
    pub system_y: f64,
    pub system_z: f64,
    pub system_sector: Option<String>,
    pub primary_star: Option<String>,
    pub allegiance: Option<String>,
    pub government: Option<String>,
    pub population: Option<i64>,
}

impl System {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.system_x, self.system_y, self.system_z)
    }

    pub(crate) fn from_row(row: &Row) -> Result<Self, QueryError> {
        Ok(Self {
            system_address: required_i64(row, "systemAddress")?,
            system_name: required_str(row, "systemName")?,
            system_x: required_f64(row, "systemX")?,
            system_y: required_f64(row, "systemY")?,
            system_z: required_f64(row, "systemZ")?,
            system_sector: optional_str(row, "systemSector"),
            primary_star: optional_str(row, "primaryStar"),
            allegiance: optional_str(row, "allegiance"),
            government: optional_str(row, "government"),
            population: row.get_i64("population"),
        })
    }
}

/// A system returned by a radius search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbySystem {
    #[serde(flatten)]
    pub system: System,
    /// Rounded distance from the search center, in light-years
    pub distance: f64,
}

impl NearbySystem {
    pub(crate) fn from_row(row: &Row) -> Result<Self, QueryError> {
        Ok(Self {
            system: System::from_row(row)?,
            distance: required_f64(row, "distance")?,
        })
    }
}

/// A station row with its `prohibited` list decoded.
///
/// Every other column is passed through as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    #[serde(flatten)]
    pub columns: Row,
    pub prohibited: Option<Vec<String>>,
}

impl Station {
    pub(crate) fn from_row(mut row: Row) -> Result<Self, QueryError> {
        let prohibited = match row.remove("prohibited") {
            Some(Scalar::Text(text)) if !text.trim().is_empty() => Some(
                serde_json::from_str::<Vec<String>>(&text)
                    .map_err(|e| QueryError::decode("prohibited", e.to_string()))?,
            ),
            Some(Scalar::Null) | Some(Scalar::Text(_)) | None => None,
            Some(other) => {
                return Err(QueryError::decode(
                    "prohibited",
                    format!("expected JSON text, found {:?}", other),
                ))
            }
        };
        Ok(Self {
            columns: row,
            prohibited,
        })
    }

    pub fn market_id(&self) -> Option<i64> {
        self.columns.get_i64("marketId")
    }

    pub fn station_name(&self) -> Option<&str> {
        self.columns.get_str("stationName")
    }
}

/// Row counts reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogHealth {
    pub systems: i64,
    pub stations: i64,
}

pub(crate) fn required_i64(row: &Row, column: &str) -> Result<i64, QueryError> {
    row.get_i64(column)
        .ok_or_else(|| QueryError::decode(column, describe(row.get(column), "an integer")))
}

pub(crate) fn required_f64(row: &Row, column: &str) -> Result<f64, QueryError> {
    row.get_f64(column)
        .ok_or_else(|| QueryError::decode(column, describe(row.get(column), "a number")))
}

pub(crate) fn required_str(row: &Row, column: &str) -> Result<String, QueryError> {
    row.get_str(column)
        .map(str::to_string)
        .ok_or_else(|| QueryError::decode(column, describe(row.get(column), "text")))
}

fn optional_str(row: &Row, column: &str) -> Option<String> {
    row.get_str(column).map(str::to_string)
}

fn describe(found: Option<&Scalar>, expected: &str) -> String {
    match found {
        None => format!("column missing, expected {}", expected),
        Some(value) => format!("expected {}, found {:?}", expected, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol_row() -> Row {
        Row::new(vec![
            ("systemAddress".into(), Scalar::Integer(10477373803)),
            ("systemName".into(), Scalar::Text("Sol".into())),
            ("systemX".into(), Scalar::Integer(0)),
            ("systemY".into(), Scalar::Real(0.0)),
            ("systemZ".into(), Scalar::Real(0.0)),
            ("systemSector".into(), Scalar::Text("7c01691d".into())),
            ("allegiance".into(), Scalar::Text("Federation".into())),
            ("population".into(), Scalar::Integer(22_780_919_531)),
            ("distance".into(), Scalar::Real(0.0)),
        ])
    }

    #[test]
    fn test_system_lookup_parse() {
        assert_eq!(SystemLookup::parse("10477373803"), SystemLookup::Address(10477373803));
        assert_eq!(SystemLookup::parse(" Sol "), SystemLookup::Name("Sol".into()));
        assert_eq!(SystemLookup::parse("HIP 12345"), SystemLookup::Name("HIP 12345".into()));
        // Too large for an address, so it can only be a name
        assert_eq!(
            SystemLookup::parse("99999999999999999999999"),
            SystemLookup::Name("99999999999999999999999".into())
        );
    }

    #[test]
    fn test_system_from_row() {
        let system = System::from_row(&sol_row()).unwrap();
        assert_eq!(system.system_address, 10477373803);
        assert_eq!(system.system_name, "Sol");
        assert_eq!(system.coordinate(), Coordinate::new(0.0, 0.0, 0.0));
        assert_eq!(system.allegiance.as_deref(), Some("Federation"));
        assert_eq!(system.government, None);
        assert_eq!(system.population, Some(22_780_919_531));
    }

    #[test]
    fn test_system_from_row_reports_bad_column() {
        let mut row = sol_row();
        row.remove("systemX");
        let err = System::from_row(&row).unwrap_err();
        assert!(matches!(err, QueryError::Decode { ref column, .. } if column == "systemX"));
    }

    #[test]
    fn test_nearby_system_serializes_flat() {
        let nearby = NearbySystem::from_row(&sol_row()).unwrap();
        let json = serde_json::to_value(&nearby).unwrap();
        assert_eq!(json["systemName"], "Sol");
        assert_eq!(json["distance"], 0.0);
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_station_prohibited_decoding() {
        let row = Row::new(vec![
            ("marketId".into(), Scalar::Integer(128016640)),
            ("prohibited".into(), Scalar::Text(r#"["Slaves","Narcotics"]"#.into())),
        ]);
        let station = Station::from_row(row).unwrap();
        assert_eq!(station.market_id(), Some(128016640));
        assert_eq!(
            station.prohibited,
            Some(vec!["Slaves".to_string(), "Narcotics".to_string()])
        );

        let empty = Station::from_row(Row::new(vec![("prohibited".into(), Scalar::Null)])).unwrap();
        assert_eq!(empty.prohibited, None);

        let bad = Station::from_row(Row::new(vec![(
            "prohibited".into(),
            Scalar::Text("not json".into()),
        )]));
        assert!(matches!(bad, Err(QueryError::Decode { .. })));
    }
}
