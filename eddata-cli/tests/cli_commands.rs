//! End-to-end tests for the `eddata` binary.
//!
//! Each test gets its own config file and catalog directory, so nothing
//! touches ~/.eddata.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use eddata::sector::{sector_id, GridSize};
use rusqlite::{params, Connection};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = format!(
            "[catalog]\ndata_dir = {}\n\n[logging]\ndirectory = {}\n",
            dir.path().join("data").display(),
            dir.path().join("logs").display()
        );
        std::fs::write(dir.path().join("config.ini"), config).unwrap();
        Self { dir }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.ini")
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Creates the four catalogs with Sol and one station.
    fn with_catalog(self) -> Self {
        let data = self.data_dir();
        std::fs::create_dir_all(&data).unwrap();

        let systems = Connection::open(data.join("systems.db")).unwrap();
        systems
            .execute_batch(
                "CREATE TABLE systems (systemAddress INTEGER PRIMARY KEY, systemName TEXT, \
                 systemX REAL, systemY REAL, systemZ REAL, systemSector TEXT, primaryStar TEXT, \
                 allegiance TEXT, government TEXT, population INTEGER);",
            )
            .unwrap();
        for (address, name, x, y, z) in [
            (10477373803i64, "Sol", 0.0, 0.0, 0.0),
            (1178708478315, "Alpha Centauri", 3.03125, -0.09375, 3.15625),
        ] {
            let sector = sector_id(x, y, z, GridSize::default());
            systems
                .execute(
                    "INSERT INTO systems (systemAddress, systemName, systemX, systemY, systemZ, \
                     systemSector) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![address, name, x, y, z, sector.as_str()],
                )
                .unwrap();
        }

        Connection::open(data.join("locations.db"))
            .unwrap()
            .execute_batch("CREATE TABLE locations (locationId INTEGER PRIMARY KEY);")
            .unwrap();
        Connection::open(data.join("stations.db"))
            .unwrap()
            .execute_batch(
                "CREATE TABLE stations (marketId INTEGER PRIMARY KEY, stationName TEXT, \
                 stationType TEXT, distanceToArrival REAL, maxLandingPadSize INTEGER, \
                 bodyId INTEGER, bodyName TEXT, systemAddress INTEGER, systemName TEXT, \
                 systemX REAL, systemY REAL, systemZ REAL);
                 INSERT INTO stations VALUES (128016640, 'Abraham Lincoln', 'Orbis', 505.4, 3, \
                 4, 'Earth', 10477373803, 'Sol', 0, 0, 0);",
            )
            .unwrap();
        Connection::open(data.join("trade.db"))
            .unwrap()
            .execute_batch(
                "CREATE TABLE commodities (commodityName TEXT, marketId INTEGER, \
                 buyPrice INTEGER, demand INTEGER, demandBracket INTEGER, meanPrice INTEGER, \
                 sellPrice INTEGER, stock INTEGER, stockBracket INTEGER, updatedAt TEXT, \
                 updatedAtDay TEXT);
                 INSERT INTO commodities VALUES ('tritium', 128016640, 41000, 0, 0, 45000, \
                 40000, 900, 2, '2025-06-14T12:00:00Z', '2025-06-14');
                 INSERT INTO commodities VALUES ('gold', 128016640, 9000, 0, 0, 9400, \
                 8800, 200, 2, '2025-06-14T12:00:00Z', '2025-06-14');",
            )
            .unwrap();
        self
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_eddata"))
            .arg("--config")
            .arg(self.config_path())
            .args(args)
            .env_remove("EDDATA_DATA_DIR")
            .output()
            .unwrap()
    }
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_sector_matches_library() {
    let workspace = Workspace::new();
    let output = workspace.run(&["sector", "-9530.5", "-910.28125", "19808.125"]);
    let json = stdout_json(&output);

    let expected = sector_id(-9530.5, -910.28125, 19808.125, GridSize::default());
    assert_eq!(json["sector"], expected.as_str());
    assert_eq!(json["grid_size"], 100.0);
}

#[test]
fn test_cells_lists_covering_sectors() {
    let workspace = Workspace::new();
    let output = workspace.run(&["cells", "50", "50", "50", "--radius", "100"]);
    let json = stdout_json(&output);

    let sectors = json["sectors"].as_array().unwrap();
    assert_eq!(sectors.len(), 27);
    let own = sector_id(50.0, 50.0, 50.0, GridSize::default());
    assert!(sectors.iter().any(|s| s == own.as_str()));
}

#[test]
fn test_cells_radius_is_clamped_to_ceiling() {
    let workspace = Workspace::new();
    let output = workspace.run(&["cells", "50", "50", "50", "--radius", "100000"]);
    let json = stdout_json(&output);

    assert_eq!(json["radius"], 500.0);
    // 500.5 ly either side of the cell centre spans cells -5..=5 on each axis
    assert_eq!(json["sectors"].as_array().unwrap().len(), 11 * 11 * 11);
}

#[test]
fn test_cells_refuses_grid_too_fine() {
    let workspace = Workspace::new();
    let output = workspace.run(&["cells", "0", "0", "0", "--grid", "0.01"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("limit"), "stderr: {}", stderr(&output));
}

#[test]
fn test_system_lookup_prints_json() {
    let workspace = Workspace::new().with_catalog();
    let json = stdout_json(&workspace.run(&["system", "sol"]));

    assert_eq!(json["systemName"], "Sol");
    assert_eq!(json["systemAddress"], 10477373803i64);
}

#[test]
fn test_unknown_system_exits_with_not_found() {
    let workspace = Workspace::new().with_catalog();
    let output = workspace.run(&["system", "Raxxla"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("System 'Raxxla' not found"));
}

#[test]
fn test_market_lists_station_commodities() {
    let workspace = Workspace::new().with_catalog();
    let json = stdout_json(&workspace.run(&["market", "Sol", "abraham lincoln"]));

    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["commodityName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["gold", "tritium"]);
    assert_eq!(json[0]["stationName"], "Abraham Lincoln");
}

#[test]
fn test_unknown_market_exits_with_not_found() {
    let workspace = Workspace::new().with_catalog();
    let output = workspace.run(&["market", "Sol", "Hutton Orbital"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Market 'Hutton Orbital' in Sol not found"));
}

#[test]
fn test_nearby_excludes_center() {
    let workspace = Workspace::new().with_catalog();
    let json = stdout_json(&workspace.run(&["nearby", "Sol", "--max-distance", "10"]));

    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["systemName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Alpha Centauri"]);
}

#[test]
fn test_health_reports_counts() {
    let workspace = Workspace::new().with_catalog();
    let json = stdout_json(&workspace.run(&["health"]));

    assert_eq!(json["catalog"]["systems"], 2);
    assert_eq!(json["catalog"]["stations"], 1);
    assert_eq!(json["bridge"]["available"], true);
}

#[test]
fn test_missing_catalogs_are_named() {
    let workspace = Workspace::new();
    let output = workspace.run(&["health"]);

    assert_eq!(output.status.code(), Some(1));
    let message = stderr(&output);
    assert!(message.contains("systems.db"), "stderr: {}", message);
    assert!(message.contains("trade.db"), "stderr: {}", message);
}

#[test]
fn test_data_dir_flag_overrides_config() {
    let workspace = Workspace::new().with_catalog();
    let elsewhere = TempDir::new().unwrap();
    let output = workspace.run(&[
        "--data-dir",
        elsewhere.path().to_str().unwrap(),
        "system",
        "Sol",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("catalog files not found"));
}

#[test]
fn test_config_set_and_get() {
    let workspace = Workspace::new();

    let output = workspace.run(&["config", "set", "proximity.max_distance", "250"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = workspace.run(&["config", "get", "proximity.max_distance"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "250");

    let output = workspace.run(&["config", "set", "sectors.grid_size", "0"]);
    assert!(!output.status.success());

    let output = workspace.run(&["config", "get", "nonsense.key"]);
    assert!(stderr(&output).contains("Unknown configuration key"));
}

#[test]
fn test_config_init_respects_existing_file() {
    let workspace = Workspace::new();
    let path: &Path = &workspace.config_path();
    std::fs::remove_file(path).unwrap();

    let output = workspace.run(&["config", "init"]);
    assert!(output.status.success());
    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.contains("[bridge]"));

    std::fs::write(path, "[sectors]\ngrid_size = 200\n").unwrap();
    let output = workspace.run(&["config", "init"]);
    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "[sectors]\ngrid_size = 200\n"
    );
}
