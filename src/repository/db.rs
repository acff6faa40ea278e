//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema migrations.

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, ROOT_CATEGORY_ID};

/// Connection shared by every SQLite repository
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

impl From<rusqlite::Error> for DomainError {
    fn from(err: rusqlite::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub db_path: PathBuf,
}

impl DbState {
    /// State without an open connection
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            db_path,
        }
    }

    pub fn connection(&self) -> SharedConnection {
        self.conn.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

/// Borrow the open connection out of a lock guard
pub(crate) fn ready(guard: &Option<Connection>) -> DomainResult<&Connection> {
    guard
        .as_ref()
        .ok_or_else(|| DomainError::Storage("Database not initialized".to_string()))
}

pub(crate) fn ready_mut(guard: &mut Option<Connection>) -> DomainResult<&mut Connection> {
    guard
        .as_mut()
        .ok_or_else(|| DomainError::Storage("Database not initialized".to_string()))
}

/// Row id of the last insert on `conn`, as an entity id
pub(crate) fn inserted_id(conn: &Connection) -> DomainResult<u32> {
    let rowid = conn.last_insert_rowid();
    u32::try_from(rowid)
        .map_err(|_| DomainError::Storage(format!("Row id {} does not fit an entity id", rowid)))
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Open (or create) the database at `db_path` and run migrations.
///
/// `:memory:` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::Storage(format!("Failed to create data dir: {}", e)))?;
        }
    }

    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    run_migrations(&conn)?;

    log::info!("Database initialized at {}", db_path.display());

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            parent_id INTEGER REFERENCES categories(id),
            position INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER,
            updated_at INTEGER
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories(parent_id)",
        [],
    )?;

    // Every category tree hangs off the root
    conn.execute(
        "INSERT OR IGNORE INTO categories (id, name, parent_id, position, created_at, updated_at)
         VALUES (?, 'root', NULL, 0, ?, ?)",
        params![ROOT_CATEGORY_ID, now_millis(), now_millis()],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            category_id INTEGER NOT NULL REFERENCES categories(id),
            price INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER,
            updated_at INTEGER
        )",
        [],
    )?;

    if !column_exists(conn, "products", "is_active")? {
        conn.execute(
            "ALTER TABLE products ADD COLUMN is_active INTEGER NOT NULL DEFAULT 1",
            [],
        )?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id)",
        [],
    )?;

    Ok(())
}
