//! Integration tests for the typed catalog queries.

mod common;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::{
    known_systems, Catalog, OrderRow, StationRow, SystemRow, ALPHA_CENTAURI, COLONIA, SHINRARTA,
    SOL,
};
use eddata::bridge::{BridgeConfig, QueryBridge};
use eddata::planner::{ProximityConfig, ProximityPlanner};
use eddata::queries::{
    CatalogService, CommodityQuery, CommoditySort, ServiceType, Station, StationKind, System,
    SystemLookup, TradeLimits, PAD_LARGE,
};

fn service(catalog: &Catalog) -> CatalogService {
    let bridge = QueryBridge::start(&catalog.paths, BridgeConfig::default()).unwrap();
    CatalogService::new(
        Arc::new(bridge),
        ProximityPlanner::new(ProximityConfig::default()),
        TradeLimits::default(),
    )
}

fn station<'a>(
    market_id: i64,
    name: &'a str,
    station_type: &'a str,
    system: SystemRow<'a>,
    pad: u8,
    services: &'a [&'a str],
) -> StationRow<'a> {
    StationRow {
        market_id,
        name,
        station_type,
        system,
        pad,
        services,
        prohibited: None,
    }
}

/// Six stations across the four known systems, plus gold orders.
fn populated_catalog() -> Catalog {
    let catalog = known_systems();
    catalog.add_station(StationRow {
        prohibited: Some(r#"["Slaves","Narcotics"]"#),
        ..station(
            1,
            "Abraham Lincoln",
            "Orbis",
            SOL,
            3,
            &["refuel", "repair", "shipyard", "market", "outfitting"],
        )
    });
    catalog.add_station(station(2, "Li Qing Jao", "Outpost", SOL, 2, &["refuel", "market"]));
    catalog.add_station(station(
        3,
        "X7Z-1AB",
        "FleetCarrier",
        SOL,
        3,
        &["refuel", "market", "blackMarket"],
    ));
    catalog.add_station(station(
        4,
        "Jameson Memorial",
        "Orbis",
        SHINRARTA,
        3,
        &[
            "refuel",
            "repair",
            "shipyard",
            "outfitting",
            "interstellarFactors",
            "materialTrader",
            "technologyBroker",
            "market",
        ],
    ));
    catalog.add_station(station(
        5,
        "Hutton Orbital",
        "Outpost",
        ALPHA_CENTAURI,
        2,
        &["refuel", "market", "materialTrader"],
    ));
    catalog.add_station(station(
        6,
        "Jaques Station",
        "Orbis",
        COLONIA,
        3,
        &["refuel", "repair", "materialTrader", "market"],
    ));

    for (market_id, buy, sell, stock, demand, day) in [
        (1, 9000, 9500, 0, 500, "2025-06-14"),
        (4, 8800, 9700, 1000, 0, "2025-06-13"),
        (5, 8700, 9100, 200, 100, "2025-06-01"),
        (3, 9100, 9900, 50, 10, "2025-06-14"),
        (6, 8500, 9300, 5000, 300, "2025-06-14"),
    ] {
        catalog.add_order(OrderRow {
            commodity: "gold",
            market_id,
            buy_price: buy,
            sell_price: sell,
            stock,
            demand,
            day,
        });
    }
    catalog
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn market_ids(rows: &[eddata::catalog::Row]) -> Vec<i64> {
    rows.iter().filter_map(|r| r.get_i64("marketId")).collect()
}

fn station_names(stations: &[Station]) -> Vec<&str> {
    stations.iter().filter_map(|s| s.station_name()).collect()
}

async fn system(service: &CatalogService, identifier: &str) -> System {
    service
        .system(&SystemLookup::parse(identifier))
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("system {} not found", identifier))
}

// =============================================================================
// Systems
// =============================================================================

#[tokio::test]
async fn test_system_lookup_by_name_and_address() {
    let catalog = known_systems();
    let service = service(&catalog);

    let by_name = system(&service, "SHINRARTA dezhra").await;
    assert_eq!(by_name.system_address, SHINRARTA.address);
    assert_eq!(by_name.system_name, "Shinrarta Dezhra");

    let by_address = system(&service, &SOL.address.to_string()).await;
    assert_eq!(by_address.system_name, "Sol");
    assert_eq!(by_address.coordinate().x, 0.0);
    assert!(by_address.system_sector.is_some());

    let missing = service
        .system(&SystemLookup::parse("Raxxla"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

// =============================================================================
// Stations
// =============================================================================

#[tokio::test]
async fn test_stations_in_system_by_kind() {
    let catalog = populated_catalog();
    let service = service(&catalog);
    let sol = system(&service, "Sol").await;

    let all = service
        .stations_in_system(&sol, StationKind::All)
        .await
        .unwrap();
    assert_eq!(
        station_names(&all),
        vec!["Abraham Lincoln", "Li Qing Jao", "X7Z-1AB"]
    );
    assert_eq!(
        all[0].prohibited,
        Some(vec!["Slaves".to_string(), "Narcotics".to_string()])
    );
    assert_eq!(all[1].prohibited, None);

    let ports = service
        .stations_in_system(&sol, StationKind::Ports)
        .await
        .unwrap();
    assert_eq!(station_names(&ports), vec!["Abraham Lincoln"]);

    let carriers = service
        .stations_in_system(&sol, StationKind::Carriers)
        .await
        .unwrap();
    assert_eq!(station_names(&carriers), vec!["X7Z-1AB"]);

    let megaships = service
        .stations_in_system(&sol, StationKind::Megaships)
        .await
        .unwrap();
    assert!(megaships.is_empty());
}

#[tokio::test]
async fn test_nearest_service_respects_pad_size() {
    let catalog = populated_catalog();
    let service = service(&catalog);
    let sol = system(&service, "Sol").await;

    let any_pad = service
        .nearest_service(&sol, ServiceType::MaterialTrader, None)
        .await
        .unwrap();
    assert_eq!(
        station_names(&any_pad),
        vec!["Hutton Orbital", "Jameson Memorial", "Jaques Station"]
    );
    assert_eq!(any_pad[0].columns.get_f64("distance"), Some(4.0));

    let large = service
        .nearest_service(&sol, ServiceType::MaterialTrader, Some(PAD_LARGE))
        .await
        .unwrap();
    assert_eq!(
        station_names(&large),
        vec!["Jameson Memorial", "Jaques Station"]
    );
}

#[tokio::test]
async fn test_markets_in_system_report_latest_update() {
    let catalog = populated_catalog();
    let service = service(&catalog);
    let sol = system(&service, "Sol").await;

    let markets = service.markets_in_system(&sol).await.unwrap();
    assert_eq!(market_ids(&markets), vec![1, 2, 3]);
    assert_eq!(markets[0].get_str("updatedAt"), Some("2025-06-14T12:00:00Z"));
    assert_eq!(markets[1].get_str("updatedAt"), None);
}

#[tokio::test]
async fn test_market_commodities_by_station_name() {
    let catalog = populated_catalog();
    catalog.add_order(OrderRow {
        commodity: "silver",
        market_id: 1,
        buy_price: 4000,
        sell_price: 4300,
        stock: 120,
        demand: 0,
        day: "2025-06-14",
    });
    let service = service(&catalog);
    let sol = system(&service, "Sol").await;

    let rows = service
        .market_commodities(&sol, "abraham LINCOLN")
        .await
        .unwrap()
        .unwrap();
    let names: Vec<_> = rows.iter().filter_map(|r| r.get_str("commodityName")).collect();
    assert_eq!(names, vec!["gold", "silver"]);
    assert!(rows.iter().all(|r| r.get_str("stationName") == Some("Abraham Lincoln")));
    assert_eq!(rows[1].get_i64("buyPrice"), Some(4000));

    // A station without prices still resolves, with empty commodity columns
    let empty = service
        .market_commodities(&sol, "Li Qing Jao")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].get_str("commodityName"), None);

    // Hutton Orbital exists, but not in Sol
    assert!(service
        .market_commodities(&sol, "Hutton Orbital")
        .await
        .unwrap()
        .is_none());
    assert!(service
        .market_commodities(&sol, "Nowhere")
        .await
        .unwrap()
        .is_none());
}

// =============================================================================
// Commodities
// =============================================================================

#[tokio::test]
async fn test_imports_sorted_by_sell_price() {
    let catalog = populated_catalog();
    let service = service(&catalog);

    let query = CommodityQuery::imports("Gold");
    let rows = service.commodity_orders_on(&query, today()).await.unwrap();
    // Market 5 is stale; market 4 has unlimited demand
    assert_eq!(market_ids(&rows), vec![3, 4, 1, 6]);

    let no_carriers = CommodityQuery {
        fleet_carriers: Some(false),
        ..CommodityQuery::imports("gold")
    };
    let rows = service
        .commodity_orders_on(&no_carriers, today())
        .await
        .unwrap();
    assert_eq!(market_ids(&rows), vec![4, 1, 6]);

    let high_demand = CommodityQuery {
        min_volume: 400,
        ..CommodityQuery::imports("gold")
    };
    let rows = service
        .commodity_orders_on(&high_demand, today())
        .await
        .unwrap();
    assert_eq!(market_ids(&rows), vec![4, 1]);
}

#[tokio::test]
async fn test_age_window_is_clamped() {
    let catalog = populated_catalog();
    let service = service(&catalog);

    // 30 days would reach market 5's order; the 14 day ceiling does not
    let query = CommodityQuery {
        max_days_ago: Some(30),
        ..CommodityQuery::imports("gold")
    };
    let rows = service.commodity_orders_on(&query, today()).await.unwrap();
    assert!(!market_ids(&rows).contains(&5));
}

#[tokio::test]
async fn test_exports_filtered_by_price_and_distance() {
    let catalog = populated_catalog();
    let service = service(&catalog);
    let sol = system(&service, "Sol").await;

    let query = CommodityQuery::exports("gold");
    let rows = service.commodity_orders_on(&query, today()).await.unwrap();
    assert_eq!(market_ids(&rows), vec![6, 4, 3]);

    let cheap = CommodityQuery {
        max_price: Some(9000),
        ..CommodityQuery::exports("gold")
    };
    let rows = service.commodity_orders_on(&cheap, today()).await.unwrap();
    assert_eq!(market_ids(&rows), vec![6, 4]);

    let nearby = CommodityQuery::exports("gold").near(sol.clone(), Some(100.0));
    let rows = service.commodity_orders_on(&nearby, today()).await.unwrap();
    assert_eq!(market_ids(&rows), vec![4, 3]);
    assert_eq!(rows[0].get_f64("distance"), Some(64.0));

    let by_distance = CommodityQuery {
        sort: CommoditySort::Distance,
        ..CommodityQuery::exports("gold").near(sol, Some(100.0))
    };
    let rows = service
        .commodity_orders_on(&by_distance, today())
        .await
        .unwrap();
    assert_eq!(market_ids(&rows), vec![3, 4]);
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn test_top_systems_and_stations() {
    let catalog = populated_catalog();
    let service = service(&catalog);

    let systems = service.top_systems().await.unwrap();
    let names: Vec<_> = systems
        .iter()
        .filter_map(|r| r.get_str("systemName"))
        .collect();
    assert_eq!(
        names,
        vec!["Sol", "Alpha Centauri", "Colonia", "Shinrarta Dezhra"]
    );
    assert_eq!(systems[0].get_i64("stationCount"), Some(3));
    assert_eq!(systems[0].get_i64("permanentStationCount"), Some(2));

    let stations = service.top_stations().await.unwrap();
    assert_eq!(stations.len(), 5, "fleet carriers are excluded");
    assert_eq!(stations[0].get_str("stationName"), Some("Jameson Memorial"));
    assert_eq!(stations[0].get_i64("serviceCount"), Some(8));
}

#[tokio::test]
async fn test_top_commodities_counts_markets() {
    let catalog = populated_catalog();
    let day = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    for (commodity, market_id) in [("silver", 1), ("silver", 2), ("silver", 4), ("tritium", 6)] {
        catalog.add_order(OrderRow {
            commodity,
            market_id,
            buy_price: 100,
            sell_price: 120,
            stock: 10,
            demand: 10,
            day: &day,
        });
    }
    let service = service(&catalog);

    let rows = service.top_commodities(None).await.unwrap();
    let names: Vec<_> = rows
        .iter()
        .filter_map(|r| r.get_str("commodityName"))
        .collect();
    assert_eq!(names, vec!["silver", "tritium"]);
    assert_eq!(rows[0].get_i64("marketCount"), Some(3));
}

#[tokio::test]
async fn test_health_counts() {
    let catalog = populated_catalog();
    let service = service(&catalog);

    let health = service.health().await.unwrap();
    assert_eq!(health.systems, 4);
    assert_eq!(health.stations, 6);
}
