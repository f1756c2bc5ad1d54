//! Thread-safe SQLite connection wrapper.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::info;

use coinflow_core::errors::StorageError;

use crate::schema;

/// Shared handle to the transaction database.
///
/// Wraps a single connection in `parking_lot::Mutex` for synchronous
/// access; clones share the connection. Schema setup runs on open and is
/// idempotent, so opening the same path repeatedly is safe.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open or create a database at the given path, ensuring the schema.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Io(format!("create dir: {e}")))?;
        }

        let conn =
            Connection::open(path).map_err(|e| StorageError::Database(e.to_string()))?;
        Self::init_schema(&conn)?;

        info!(path = %path.display(), "transaction database opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_owned(),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::Database(e.to_string()))?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        })
    }

    /// Apply pragmas, create tables, and record the schema version.
    /// Safe to run against an already-initialized database.
    fn init_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(schema::PRAGMAS)
            .map_err(|e| StorageError::Database(format!("pragmas: {e}")))?;

        conn.execute_batch(schema::CREATE_TABLES)
            .map_err(|e| StorageError::Database(format!("schema: {e}")))?;

        let version: Option<u32> = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .ok();

        if version.is_none() {
            let _ = conn
                .execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    [schema::SCHEMA_VERSION],
                )
                .map_err(|e| StorageError::Database(format!("schema version: {e}")))?;
        }

        Ok(())
    }

    /// Execute a closure with the database connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Path this database was opened at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            path: self.path.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.path(), Path::new(":memory:"));
    }

    #[test]
    fn schema_version_set_once() {
        let db = Database::in_memory().unwrap();
        let versions: Vec<u32> = db
            .with_conn(|conn| {
                let mut stmt = conn
                    .prepare("SELECT version FROM schema_version")
                    .map_err(|e| StorageError::Database(e.to_string()))?;
                let rows = stmt
                    .query_map([], |row| row.get(0))
                    .map_err(|e| StorageError::Database(e.to_string()))?
                    .collect::<Result<_, _>>()
                    .map_err(|e| StorageError::Database(e.to_string()))?;
                Ok(rows)
            })
            .unwrap();
        assert_eq!(versions, vec![schema::SCHEMA_VERSION]);
    }

    #[test]
    fn transactions_table_created() {
        let db = Database::in_memory().unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='transactions'",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| StorageError::Database(e.to_string()))
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.db");

        let db1 = Database::open(&path).unwrap();
        assert!(path.exists());
        drop(db1);

        // Opening again must not duplicate the schema or error.
        let db2 = Database::open(&path).unwrap();
        let (tables, versions): (i64, i64) = db2
            .with_conn(|conn| {
                let tables = conn
                    .query_row(
                        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='transactions'",
                        [],
                        |row| row.get(0),
                    )
                    .map_err(|e| StorageError::Database(e.to_string()))?;
                let versions = conn
                    .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
                    .map_err(|e| StorageError::Database(e.to_string()))?;
                Ok((tables, versions))
            })
            .unwrap();
        assert_eq!(tables, 1);
        assert_eq!(versions, 1);
    }

    #[test]
    fn clones_share_the_connection() {
        let db = Database::in_memory().unwrap();
        let clone = db.clone();
        db.with_conn(|conn| {
            let _ = conn
                .execute("CREATE TABLE scratch (x INTEGER)", [])
                .map_err(|e| StorageError::Database(e.to_string()))?;
            Ok(())
        })
        .unwrap();
        let count: i64 = clone
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE name='scratch'",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| StorageError::Database(e.to_string()))
            })
            .unwrap();
        assert_eq!(count, 1);
    }
}
