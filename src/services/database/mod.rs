// Database service module
// SQLite store living in the shared container

mod connection;
mod container;
mod error;
pub mod migrations;
pub mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::Connection;

pub use connection::Database;
pub use container::SharedContainer;
pub use error::{is_transient, require_identifier, StoreError, StoreResult};

/// Handle shared by every store in one process. The mutex keeps this
/// process to a single writer at a time; other processes are kept apart by
/// SQLite's own locking.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Opens the shared database file and initializes its schema.
pub fn open_shared_database(path: &Path, busy_timeout: Duration) -> StoreResult<SharedDatabase> {
    let unavailable = |err: anyhow::Error| StoreError::StorageUnavailable {
        path: path.to_path_buf(),
        reason: format!("{:#}", err),
    };

    let db = Database::open_shared(path, busy_timeout).map_err(unavailable)?;
    db.initialize_schema().map_err(unavailable)?;
    log::info!("Opened shared store at {}", path.display());

    Ok(Arc::new(Mutex::new(db)))
}

/// In-memory database with the schema applied.
pub fn open_in_memory() -> StoreResult<SharedDatabase> {
    let unavailable = |err: anyhow::Error| StoreError::StorageUnavailable {
        path: ":memory:".into(),
        reason: format!("{:#}", err),
    };

    let db = Database::new(":memory:").map_err(unavailable)?;
    db.initialize_schema().map_err(unavailable)?;
    Ok(Arc::new(Mutex::new(db)))
}

/// Locks the handle. A panic in another thread leaves the connection usable,
/// so poisoning is ignored.
pub fn lock(db: &SharedDatabase) -> MutexGuard<'_, Database> {
    db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runs one atomic write, retrying once when another process held the lock.
pub fn commit_with_retry<T, F>(conn: &Connection, operation: &'static str, write: F) -> StoreResult<T>
where
    F: Fn(&Connection) -> rusqlite::Result<T>,
{
    match write(conn) {
        Ok(value) => Ok(value),
        Err(err) if is_transient(&err) => {
            log::warn!("Transient failure during {}: {}; retrying once", operation, err);
            write(conn).map_err(|source| StoreError::WriteFailed { operation, source })
        }
        Err(source) => Err(StoreError::WriteFailed { operation, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_new_database_in_memory() {
        let result = Database::new(":memory:");
        assert!(result.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_new_database_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_str().unwrap();

        let result = Database::new(db_path_str);
        assert!(result.is_ok(), "Should create file-based database");
        assert!(Path::new(db_path_str).exists(), "Database file should exist");
    }

    #[test]
    fn test_shared_database_uses_wal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = open_shared_database(&temp_dir.path().join("shared.db"), Duration::from_millis(50))
            .unwrap();

        let mode: String = lock(&db)
            .connection()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_tables_exist() {
        let db = open_in_memory().unwrap();
        let guard = lock(&db);

        for table in ["favorite_events", "enabled_calendars", "preferences"] {
            let count: i64 = guard
                .connection()
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "{} table should exist", table);
        }
    }

    #[test]
    fn test_schema_version_recorded() {
        let db = open_in_memory().unwrap();
        let version = migrations::user_version(lock(&db).connection()).unwrap();
        assert_eq!(version, schema::SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_schema_is_repeatable() {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        assert!(db.initialize_schema().is_ok());
    }

    #[test]
    fn test_migration_adds_created_at_to_old_store() {
        let db = Database::new(":memory:").unwrap();
        db.connection()
            .execute(
                "CREATE TABLE favorite_events (
                    event_id TEXT PRIMARY KEY NOT NULL,
                    occurrence_date TEXT NOT NULL
                )",
                [],
            )
            .unwrap();

        db.initialize_schema().unwrap();

        let has_column =
            migrations::column_exists(db.connection(), "favorite_events", "created_at").unwrap();
        assert!(has_column);
    }

    #[test]
    fn test_commit_retries_transient_failure_once() {
        let db = Database::new(":memory:").unwrap();
        let attempts = Cell::new(0);

        let result = commit_with_retry(db.connection(), "test write", |_| {
            attempts.set(attempts.get() + 1);
            if attempts.get() == 1 {
                Err(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
                    None,
                ))
            } else {
                Ok(7)
            }
        });

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_commit_does_not_retry_permanent_failure() {
        let db = Database::new(":memory:").unwrap();
        let attempts = Cell::new(0);

        let result: StoreResult<()> = commit_with_retry(db.connection(), "test write", |conn| {
            attempts.set(attempts.get() + 1);
            conn.execute("INSERT INTO missing_table VALUES (1)", []).map(|_| ())
        });

        assert!(result.unwrap_err().is_write_failure());
        assert_eq!(attempts.get(), 1);
    }
}
