use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::schema::{self, CREATE_PANTRY_TABLE, CREATE_SHOPPING_TABLE};
use crate::error::{StoreError, StoreResult};

/// Which tables `ensure_schema` had to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaStatus {
    pub pantry_created: bool,
    pub shopping_created: bool,
}

/// Owner of the single SQLite handle shared by every store.
///
/// The handle is acquired on construction and released by `close` or, at the
/// latest, when the holder is dropped. Stores only ever borrow it. The holder
/// is `Send` but not `Sync`, so statements on the one handle can never
/// interleave across threads.
#[derive(Debug)]
pub struct ConnectionHolder {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl ConnectionHolder {
    /// Open an existing database file. The file is never created here.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::connection(path, "database file not found"));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| StoreError::rejected(path, err))?;

        // SQLite opens lazily; touching the header makes a corrupt or
        // non-database file fail here instead of on the first query.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|err| StoreError::rejected(path, err))?;

        info!(path = %path.display(), "opened pantry database");
        Ok(Self {
            conn: Some(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the bundled database by logical name inside a resource directory.
    pub fn locate(resource_dir: impl AsRef<Path>, name: &str) -> StoreResult<Self> {
        Self::open(resource_dir.as_ref().join(name))
    }

    pub fn from_config(config: &Config) -> StoreResult<Self> {
        Self::locate(&config.resource_dir, &config.database_name)
    }

    /// Private in-memory database, used to give tests an isolated instance.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|err| StoreError::rejected(":memory:", err))?;
        Ok(Self {
            conn: Some(conn),
            path: None,
        })
    }

    /// Borrow the live handle.
    pub fn connection(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Path of the backing file, `None` for in-memory instances.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create both tables when they are missing, without seeding. A blank
    /// bundled file becomes usable this way while existing rows stay intact.
    pub fn ensure_schema(&self) -> StoreResult<SchemaStatus> {
        let conn = self.connection()?;
        let pantry_created = !table_exists(conn, "pantryitems")?;
        let shopping_created = !table_exists(conn, "ShoppingItems")?;

        conn.execute_batch(CREATE_PANTRY_TABLE)
            .map_err(|err| StoreError::exec("create pantry table", err))?;
        conn.execute_batch(CREATE_SHOPPING_TABLE)
            .map_err(|err| StoreError::exec("create shopping list table", err))?;

        debug!(pantry_created, shopping_created, "schema verified");
        Ok(SchemaStatus {
            pantry_created,
            shopping_created,
        })
    }

    /// Startup preparation: create missing tables and seed only the ones that
    /// were just created. Existing tables are never reseeded, even when empty.
    pub fn initialize(&self) -> StoreResult<SchemaStatus> {
        let status = self.ensure_schema()?;
        let conn = self.connection()?;
        if status.pantry_created {
            let seeded = schema::reset_pantry(conn)?;
            info!(seeded, "seeded new pantry table");
        }
        if status.shopping_created {
            let seeded = schema::reset_shopping_list(conn)?;
            info!(seeded, "seeded new shopping list table");
        }
        Ok(status)
    }

    /// Release the handle. Safe to call any number of times.
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };

        // On failure rusqlite hands the connection back; dropping it still
        // finalizes the handle.
        if let Err((_conn, err)) = conn.close() {
            warn!(error = %err, "closing database reported an error");
        } else {
            debug!("database connection closed");
        }
    }
}

fn table_exists(conn: &Connection, name: &str) -> StoreResult<bool> {
    let mut stmt = conn
        .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
        .map_err(|err| StoreError::prepare("table lookup", err))?;
    let count: i64 = stmt
        .query_row([name], |row| row.get(0))
        .map_err(|err| StoreError::exec("look up table", err))?;
    Ok(count > 0)
}

impl Drop for ConnectionHolder {
    fn drop(&mut self) {
        self.close();
    }
}
