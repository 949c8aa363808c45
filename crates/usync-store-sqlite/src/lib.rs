// # SQLite User Store
//
// This crate provides a SQLite-backed UserStore implementation for the
// usync system.
//
// ## Schema
//
// One row per identity; the primary key is externally assigned and
// never regenerated:
//
// ```sql
// CREATE TABLE users (
//     id        INTEGER PRIMARY KEY,
//     username  TEXT NOT NULL,
//     full_name TEXT NOT NULL,
//     email     TEXT NOT NULL,
//     city      TEXT NOT NULL
// )
// ```
//
// ## Constraints
//
// - Stores own persistence and nothing else: no comparison logic, no
//   tally, no notification (owned by `SyncEngine`)
// - `create` on an existing identity and `update` on a missing one are
//   errors, surfaced to the engine as per-record failures
// - Rows that fail domain validation on load are rejected rather than
//   silently repaired

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;
use tracing::debug;

use usync_core::traits::UserStore;
use usync_core::{Error, Result, UserId, UserRecord};

/// SQLite-backed user store
///
/// The connection is serialized behind an async mutex; statements here
/// are single-row point queries, so holding the lock across a call is
/// cheap enough for the sequential engine loop.
#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    /// Open (or create) a store at the given filesystem path
    ///
    /// Creates parent directories and the schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::store(format!(
                    "failed to create store directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::store(format!("failed to open {}: {e}", path.display())))?;
        Self::init_schema(&conn)?;
        debug!(path = %path.display(), "sqlite user store opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory store (primarily for tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::store(format!("failed to open in-memory store: {e}")))?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id        INTEGER PRIMARY KEY,
                username  TEXT NOT NULL,
                full_name TEXT NOT NULL,
                email     TEXT NOT NULL,
                city      TEXT NOT NULL
            )",
        )
        .map_err(|e| Error::store(format!("failed to initialize schema: {e}")))
    }

    /// Number of persisted users
    pub async fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(store_err)?;
        Ok(count as usize)
    }

    /// Look up a single record by identity
    pub async fn get(&self, id: UserId) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, username, full_name, email, city FROM users WHERE id = ?1",
            params![id.0],
            row_to_record,
        )
        .optional()
        .map_err(store_err)?
        .transpose()
    }
}

/// Map a row onto a validated domain record
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<UserRecord>> {
    let id: i64 = row.get(0)?;
    let username: String = row.get(1)?;
    let full_name: String = row.get(2)?;
    let email: String = row.get(3)?;
    let city: String = row.get(4)?;

    Ok(UserRecord::new(UserId(id), username, full_name, email, city)
        .map_err(|e| Error::store(format!("corrupt row for user {id}: {e}"))))
}

fn store_err(e: rusqlite::Error) -> Error {
    Error::store(e.to_string())
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn fetch_all(&self) -> Result<Vec<UserRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, username, full_name, email, city FROM users ORDER BY id")
            .map_err(store_err)?;

        let rows = stmt.query_map([], row_to_record).map_err(store_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(store_err)??);
        }
        Ok(records)
    }

    async fn create(&self, record: &UserRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (id, username, full_name, email, city)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id().0,
                record.username(),
                record.full_name(),
                record.email().as_str(),
                record.city(),
            ],
        )
        .map_err(|e| Error::store(format!("failed to create user {}: {e}", record.id())))?;
        Ok(())
    }

    async fn update(&self, record: &UserRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE users SET username = ?2, full_name = ?3, email = ?4, city = ?5
                 WHERE id = ?1",
                params![
                    record.id().0,
                    record.username(),
                    record.full_name(),
                    record.email().as_str(),
                    record.city(),
                ],
            )
            .map_err(|e| Error::store(format!("failed to update user {}: {e}", record.id())))?;

        if changed == 0 {
            return Err(Error::store(format!(
                "user {} does not exist",
                record.id()
            )));
        }
        Ok(())
    }
}
