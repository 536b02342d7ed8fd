//! Station kinds and services.
//!
//! Both are closed sets: each variant renders a fixed SQL fragment, so no
//! caller text is ever spliced into a statement.

use std::fmt;
use std::str::FromStr;

/// Groups of station types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StationKind {
    /// Every known dockable station type
    #[default]
    All,
    /// Large-pad orbital and surface ports
    Ports,
    Outposts,
    Settlements,
    Megaships,
    Carriers,
}

impl StationKind {
    pub const ALL: [StationKind; 6] = [
        StationKind::All,
        StationKind::Ports,
        StationKind::Outposts,
        StationKind::Settlements,
        StationKind::Megaships,
        StationKind::Carriers,
    ];

    /// Station type names included in this kind.
    pub fn station_types(self) -> &'static [&'static str] {
        match self {
            StationKind::All => &[
                "AsteroidBase",
                "Coriolis",
                "CraterPort",
                "CraterOutpost",
                "FleetCarrier",
                "MegaShip",
                "Ocellus",
                "OnFootSettlement",
                "Orbis",
                "Outpost",
                "PlanetaryConstructionDepot",
                "SpaceConstructionDepot",
                "StrongholdCarrier",
                "SurfaceStation",
            ],
            StationKind::Ports => &["AsteroidBase", "Coriolis", "CraterPort", "Ocellus", "Orbis"],
            StationKind::Outposts => &["Outpost", "CraterOutpost"],
            StationKind::Settlements => &["OnFootSettlement"],
            StationKind::Megaships => &["MegaShip"],
            StationKind::Carriers => &["FleetCarrier", "StrongholdCarrier"],
        }
    }

    /// Predicate selecting this kind.
    pub(crate) fn clause(self) -> &'static str {
        match self {
            StationKind::All => {
                "stationType IN ('AsteroidBase', 'Coriolis', 'CraterPort', 'CraterOutpost', \
                 'FleetCarrier', 'MegaShip', 'Ocellus', 'OnFootSettlement', 'Orbis', 'Outpost', \
                 'PlanetaryConstructionDepot', 'SpaceConstructionDepot', 'StrongholdCarrier', \
                 'SurfaceStation')"
            }
            StationKind::Ports => {
                "stationType IN ('AsteroidBase', 'Coriolis', 'CraterPort', 'Ocellus', 'Orbis')"
            }
            StationKind::Outposts => "stationType IN ('Outpost', 'CraterOutpost')",
            StationKind::Settlements => "stationType IN ('OnFootSettlement')",
            StationKind::Megaships => "stationType IN ('MegaShip')",
            StationKind::Carriers => "stationType IN ('FleetCarrier', 'StrongholdCarrier')",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StationKind::All => "all",
            StationKind::Ports => "ports",
            StationKind::Outposts => "outposts",
            StationKind::Settlements => "settlements",
            StationKind::Megaships => "megaships",
            StationKind::Carriers => "carriers",
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown station kind '{}' (expected one of: {})",
                    s,
                    StationKind::ALL.map(StationKind::as_str).join(", ")
                )
            })
    }
}

/// A station service with its own flag column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    InterstellarFactors,
    MaterialTrader,
    TechnologyBroker,
    BlackMarket,
    UniversalCartographics,
    Refuel,
    Repair,
    Shipyard,
    Outfitting,
    SearchAndRescue,
}

impl ServiceType {
    pub const ALL: [ServiceType; 10] = [
        ServiceType::InterstellarFactors,
        ServiceType::MaterialTrader,
        ServiceType::TechnologyBroker,
        ServiceType::BlackMarket,
        ServiceType::UniversalCartographics,
        ServiceType::Refuel,
        ServiceType::Repair,
        ServiceType::Shipyard,
        ServiceType::Outfitting,
        ServiceType::SearchAndRescue,
    ];

    /// URL-style name, e.g. `interstellar-factors`.
    pub fn slug(self) -> &'static str {
        match self {
            ServiceType::InterstellarFactors => "interstellar-factors",
            ServiceType::MaterialTrader => "material-trader",
            ServiceType::TechnologyBroker => "technology-broker",
            ServiceType::BlackMarket => "black-market",
            ServiceType::UniversalCartographics => "universal-cartographics",
            ServiceType::Refuel => "refuel",
            ServiceType::Repair => "repair",
            ServiceType::Shipyard => "shipyard",
            ServiceType::Outfitting => "outfitting",
            ServiceType::SearchAndRescue => "search-and-rescue",
        }
    }

    /// Flag column in `stations.stations`.
    pub fn column(self) -> &'static str {
        match self {
            ServiceType::InterstellarFactors => "interstellarFactors",
            ServiceType::MaterialTrader => "materialTrader",
            ServiceType::TechnologyBroker => "technologyBroker",
            ServiceType::BlackMarket => "blackMarket",
            ServiceType::UniversalCartographics => "universalCartographics",
            ServiceType::Refuel => "refuel",
            ServiceType::Repair => "repair",
            ServiceType::Shipyard => "shipyard",
            ServiceType::Outfitting => "outfitting",
            ServiceType::SearchAndRescue => "searchAndRescue",
        }
    }

    /// Predicate selecting stations offering the service.
    pub(crate) fn clause(self) -> &'static str {
        match self {
            ServiceType::InterstellarFactors => "interstellarFactors = 1",
            ServiceType::MaterialTrader => "materialTrader = 1",
            ServiceType::TechnologyBroker => "technologyBroker = 1",
            ServiceType::BlackMarket => "blackMarket = 1",
            ServiceType::UniversalCartographics => "universalCartographics = 1",
            ServiceType::Refuel => "refuel = 1",
            ServiceType::Repair => "repair = 1",
            ServiceType::Shipyard => "shipyard = 1",
            ServiceType::Outfitting => "outfitting = 1",
            ServiceType::SearchAndRescue => "searchAndRescue = 1",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ServiceType::ALL
            .into_iter()
            .find(|service| service.slug() == wanted || service.column().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown service '{}'", s))
    }
}

/// Landing pad sizes as stored in `maxLandingPadSize`.
pub const PAD_SMALL: u8 = 1;
pub const PAD_MEDIUM: u8 = 2;
pub const PAD_LARGE: u8 = 3;
