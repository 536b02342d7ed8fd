//! Read-only connection over the attached catalog files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, InterruptHandle, OpenFlags};
use tracing::{debug, info};

use super::error::{CatalogError, MissingCatalog};
use crate::sector::{rounded_distance, Coordinate};

/// Name of the SQL distance function registered on every connection.
pub const DISTANCE_FUNCTION: &str = "eddata_distance";

/// How long a statement waits on a locked catalog file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Prepared statements kept per connection.
const STATEMENT_CACHE_CAPACITY: usize = 64;

/// One of the catalog database files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFile {
    Systems,
    Locations,
    Stations,
    Trade,
}

impl CatalogFile {
    /// All catalogs, in attach order.
    pub const ALL: [CatalogFile; 4] = [
        CatalogFile::Systems,
        CatalogFile::Locations,
        CatalogFile::Stations,
        CatalogFile::Trade,
    ];

    /// Schema name the file is attached under (`systems.systems`, ...).
    pub fn schema(self) -> &'static str {
        match self {
            CatalogFile::Systems => "systems",
            CatalogFile::Locations => "locations",
            CatalogFile::Stations => "stations",
            CatalogFile::Trade => "trade",
        }
    }

    /// File name used when resolving paths from a data directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            CatalogFile::Systems => "systems.db",
            CatalogFile::Locations => "locations.db",
            CatalogFile::Stations => "stations.db",
            CatalogFile::Trade => "trade.db",
        }
    }
}

impl fmt::Display for CatalogFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema())
    }
}

/// Locations of the four catalog files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub systems: PathBuf,
    pub locations: PathBuf,
    pub stations: PathBuf,
    pub trade: PathBuf,
}

impl CatalogPaths {
    /// Paths using the default file names inside `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            systems: dir.join(CatalogFile::Systems.default_file_name()),
            locations: dir.join(CatalogFile::Locations.default_file_name()),
            stations: dir.join(CatalogFile::Stations.default_file_name()),
            trade: dir.join(CatalogFile::Trade.default_file_name()),
        }
    }

    pub fn path(&self, file: CatalogFile) -> &Path {
        match file {
            CatalogFile::Systems => &self.systems,
            CatalogFile::Locations => &self.locations,
            CatalogFile::Stations => &self.stations,
            CatalogFile::Trade => &self.trade,
        }
    }

    /// Every catalog whose file does not exist.
    pub fn missing(&self) -> Vec<MissingCatalog> {
        CatalogFile::ALL
            .iter()
            .filter(|file| !self.path(**file).is_file())
            .map(|file| MissingCatalog {
                file: *file,
                path: self.path(*file).to_path_buf(),
            })
            .collect()
    }
}

/// The catalog files attached read-only to a single SQLite connection.
///
/// Not `Sync`: the query bridge worker is the only owner, and every
/// statement runs on that thread.
pub struct ConnectionSet {
    conn: Connection,
    paths: CatalogPaths,
}

impl ConnectionSet {
    /// Opens an in-memory connection and attaches every catalog read-only.
    ///
    /// Fails with [`CatalogError::MissingCatalogs`] naming every absent file
    /// before touching SQLite.
    pub fn open(paths: &CatalogPaths) -> Result<Self, CatalogError> {
        let missing = paths.missing();
        if !missing.is_empty() {
            return Err(CatalogError::MissingCatalogs(missing));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(":memory:", flags).map_err(CatalogError::Open)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);

        for file in CatalogFile::ALL {
            let path = paths.path(file);
            let uri = read_only_uri(path)?;
            conn.execute(
                &format!("ATTACH DATABASE ?1 AS {}", file.schema()),
                [uri.as_str()],
            )
            .map_err(|source| CatalogError::Attach {
                schema: file.schema(),
                path: path.to_path_buf(),
                source,
            })?;
            debug!(schema = file.schema(), path = %path.display(), "Attached catalog");
        }

        conn.pragma_update(None, "query_only", true)?;
        register_distance_function(&conn)?;

        info!(
            systems = %paths.systems.display(),
            stations = %paths.stations.display(),
            "Catalog connection set opened"
        );

        Ok(Self {
            conn,
            paths: paths.clone(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn paths(&self) -> &CatalogPaths {
        &self.paths
    }

    /// Handle that can abort the running statement from another thread.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.conn.get_interrupt_handle()
    }

    /// Closes the connection, reporting any error from SQLite.
    pub fn close(self) -> Result<(), CatalogError> {
        self.conn.close().map_err(|(_, e)| CatalogError::Sqlite(e))?;
        debug!("Catalog connection set closed");
        Ok(())
    }
}

impl fmt::Debug for ConnectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSet")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

/// Registers `eddata_distance(x, y, z, cx, cy, cz)`.
///
/// Returns the rounded straight-line distance, or NULL if any argument is
/// NULL.
fn register_distance_function(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        DISTANCE_FUNCTION,
        6,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let mut axes = [0.0f64; 6];
            for (i, axis) in axes.iter_mut().enumerate() {
                match ctx.get::<Option<f64>>(i)? {
                    Some(value) => *axis = value,
                    None => return Ok(None),
                }
            }
            let point = Coordinate::new(axes[0], axes[1], axes[2]);
            let center = Coordinate::new(axes[3], axes[4], axes[5]);
            Ok(Some(rounded_distance(&point, &center)))
        },
    )
}

/// `file:` URI opening `path` read-only.
fn read_only_uri(path: &Path) -> Result<String, CatalogError> {
    let absolute = std::fs::canonicalize(path).map_err(|source| CatalogError::Path {
        path: path.to_path_buf(),
        source,
    })?;
    let text = absolute.to_string_lossy().replace('\\', "/");

    let mut uri = String::with_capacity(text.len() + 16);
    uri.push_str("file:");
    if !text.starts_with('/') {
        uri.push('/');
    }
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' | b':' => {
                uri.push(byte as char)
            }
            other => uri.push_str(&format!("%{:02X}", other)),
        }
    }
    uri.push_str("?mode=ro");
    Ok(uri)
}
