//! Shared catalog fixture for integration tests.
//!
//! Builds the four catalog databases in a temporary directory with the
//! column layout the query layer expects. Systems get their `systemSector`
//! computed with the default grid, exactly as the catalog build does.

#![allow(dead_code)]

use eddata::catalog::{CatalogFile, CatalogPaths};
use eddata::sector::{sector_id, GridSize};
use rusqlite::{params, Connection};
use tempfile::TempDir;

const SYSTEMS_SCHEMA: &str = "
    CREATE TABLE systems (
        systemAddress INTEGER PRIMARY KEY,
        systemName TEXT NOT NULL,
        systemX REAL NOT NULL,
        systemY REAL NOT NULL,
        systemZ REAL NOT NULL,
        systemSector TEXT NOT NULL,
        primaryStar TEXT,
        allegiance TEXT,
        government TEXT,
        population INTEGER
    );
    CREATE INDEX systems_sector ON systems (systemSector);";

const LOCATIONS_SCHEMA: &str = "
    CREATE TABLE locations (
        locationId INTEGER PRIMARY KEY,
        systemAddress INTEGER,
        locationName TEXT
    );";

const STATIONS_SCHEMA: &str = "
    CREATE TABLE stations (
        marketId INTEGER PRIMARY KEY,
        stationName TEXT,
        stationType TEXT,
        systemAddress INTEGER,
        systemName TEXT,
        systemX REAL,
        systemY REAL,
        systemZ REAL,
        distanceToArrival REAL,
        maxLandingPadSize INTEGER,
        bodyId INTEGER,
        bodyName TEXT,
        primaryEconomy TEXT,
        secondaryEconomy TEXT,
        allegiance TEXT,
        government TEXT,
        controllingFaction TEXT,
        prohibited TEXT,
        blackMarket INTEGER,
        market INTEGER,
        refuel INTEGER,
        repair INTEGER,
        rearm INTEGER,
        outfitting INTEGER,
        shipyard INTEGER,
        crew INTEGER,
        engineer INTEGER,
        interstellarFactors INTEGER,
        universalCartographics INTEGER,
        materialTrader INTEGER,
        technologyBroker INTEGER,
        searchAndRescue INTEGER
    );";

const TRADE_SCHEMA: &str = "
    CREATE TABLE commodities (
        commodityName TEXT NOT NULL,
        marketId INTEGER NOT NULL,
        buyPrice INTEGER,
        demand INTEGER,
        demandBracket INTEGER,
        meanPrice INTEGER,
        sellPrice INTEGER,
        stock INTEGER,
        stockBracket INTEGER,
        updatedAt TEXT,
        updatedAtDay TEXT,
        PRIMARY KEY (commodityName, marketId)
    );";

/// A system as stored in `systems.db`.
#[derive(Debug, Clone, Copy)]
pub struct SystemRow<'a> {
    pub address: i64,
    pub name: &'a str,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A station as stored in `stations.db`.
#[derive(Debug, Clone)]
pub struct StationRow<'a> {
    pub market_id: i64,
    pub name: &'a str,
    pub station_type: &'a str,
    pub system: SystemRow<'a>,
    pub pad: u8,
    pub services: &'a [&'a str],
    pub prohibited: Option<&'a str>,
}

/// A market order as stored in `trade.db`.
#[derive(Debug, Clone, Copy)]
pub struct OrderRow<'a> {
    pub commodity: &'a str,
    pub market_id: i64,
    pub buy_price: i64,
    pub sell_price: i64,
    pub stock: i64,
    pub demand: i64,
    pub day: &'a str,
}

/// Temporary catalog directory with all four databases.
pub struct Catalog {
    pub dir: TempDir,
    pub paths: CatalogPaths,
}

impl Catalog {
    /// Creates empty catalogs.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let paths = CatalogPaths::from_dir(dir.path());
        for (file, schema) in [
            (CatalogFile::Systems, SYSTEMS_SCHEMA),
            (CatalogFile::Locations, LOCATIONS_SCHEMA),
            (CatalogFile::Stations, STATIONS_SCHEMA),
            (CatalogFile::Trade, TRADE_SCHEMA),
        ] {
            Connection::open(paths.path(file))
                .unwrap()
                .execute_batch(schema)
                .unwrap();
        }
        Self { dir, paths }
    }

    fn open(&self, file: CatalogFile) -> Connection {
        Connection::open(self.paths.path(file)).unwrap()
    }

    pub fn add_system(&self, system: SystemRow<'_>) {
        let sector = sector_id(system.x, system.y, system.z, GridSize::default());
        self.open(CatalogFile::Systems)
            .execute(
                "INSERT INTO systems (systemAddress, systemName, systemX, systemY, systemZ, \
                 systemSector, primaryStar, allegiance, government, population) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'G', 'Federation', 'Democracy', 1000)",
                params![
                    system.address,
                    system.name,
                    system.x,
                    system.y,
                    system.z,
                    sector.as_str()
                ],
            )
            .unwrap();
    }

    pub fn add_systems(&self, systems: &[SystemRow<'_>]) {
        for system in systems {
            self.add_system(*system);
        }
    }

    pub fn add_station(&self, station: StationRow<'_>) {
        let conn = self.open(CatalogFile::Stations);
        conn.execute(
            "INSERT INTO stations (marketId, stationName, stationType, systemAddress, systemName, \
             systemX, systemY, systemZ, distanceToArrival, maxLandingPadSize, prohibited, \
             blackMarket, market, refuel, repair, rearm, outfitting, shipyard, crew, engineer, \
             interstellarFactors, universalCartographics, materialTrader, technologyBroker, \
             searchAndRescue) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 100.0, ?9, ?10, \
             0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0)",
            params![
                station.market_id,
                station.name,
                station.station_type,
                station.system.address,
                station.system.name,
                station.system.x,
                station.system.y,
                station.system.z,
                station.pad,
                station.prohibited,
            ],
        )
        .unwrap();
        for service in station.services {
            conn.execute(
                &format!("UPDATE stations SET {} = 1 WHERE marketId = ?1", service),
                params![station.market_id],
            )
            .unwrap();
        }
    }

    pub fn add_order(&self, order: OrderRow<'_>) {
        self.open(CatalogFile::Trade)
            .execute(
                "INSERT INTO commodities (commodityName, marketId, buyPrice, demand, \
                 demandBracket, meanPrice, sellPrice, stock, stockBracket, updatedAt, updatedAtDay) \
                 VALUES (?1, ?2, ?3, ?4, 2, ?5, ?6, ?7, 2, ?8 || 'T12:00:00Z', ?8)",
                params![
                    order.commodity,
                    order.market_id,
                    order.buy_price,
                    order.demand,
                    (order.buy_price + order.sell_price) / 2,
                    order.sell_price,
                    order.stock,
                    order.day,
                ],
            )
            .unwrap();
    }
}

pub const SOL: SystemRow<'static> = SystemRow {
    address: 10477373803,
    name: "Sol",
    x: 0.0,
    y: 0.0,
    z: 0.0,
};

pub const ALPHA_CENTAURI: SystemRow<'static> = SystemRow {
    address: 1178708478315,
    name: "Alpha Centauri",
    x: 3.03125,
    y: -0.09375,
    z: 3.15625,
};

pub const SHINRARTA: SystemRow<'static> = SystemRow {
    address: 3932277478106,
    name: "Shinrarta Dezhra",
    x: 55.71875,
    y: 17.59375,
    z: 27.15625,
};

pub const COLONIA: SystemRow<'static> = SystemRow {
    address: 3238296097059,
    name: "Colonia",
    x: -9530.5,
    y: -910.28125,
    z: 19808.125,
};

/// A small catalog with a few well-known systems.
pub fn known_systems() -> Catalog {
    let catalog = Catalog::new();
    catalog.add_systems(&[SOL, ALPHA_CENTAURI, SHINRARTA, COLONIA]);
    catalog
}
