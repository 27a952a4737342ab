// Calendar selection module
// Which calendars feed the countdown list, kept in the shared container

use rusqlite::OptionalExtension;

use crate::services::database::{
    commit_with_retry, lock, require_identifier, SharedDatabase, StoreError, StoreResult,
};

#[derive(Clone)]
pub struct CalendarSelectionStore {
    db: SharedDatabase,
}

impl CalendarSelectionStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub fn enable(&self, calendar_id: &str) -> StoreResult<()> {
        require_identifier("Calendar", calendar_id)?;
        let db = lock(&self.db);
        commit_with_retry(db.connection(), "enable calendar", |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO enabled_calendars (identifier) VALUES (?1)",
                [calendar_id],
            )
        })?;
        log::debug!("Enabled calendar {}", calendar_id);
        Ok(())
    }

    /// Idempotent; disabling an unknown calendar is not an error.
    pub fn disable(&self, calendar_id: &str) -> StoreResult<()> {
        let db = lock(&self.db);
        commit_with_retry(db.connection(), "disable calendar", |conn| {
            conn.execute(
                "DELETE FROM enabled_calendars WHERE identifier = ?1",
                [calendar_id],
            )
        })?;
        log::debug!("Disabled calendar {}", calendar_id);
        Ok(())
    }

    pub fn is_enabled(&self, calendar_id: &str) -> StoreResult<bool> {
        let db = lock(&self.db);
        let found: Option<i64> = db
            .connection()
            .query_row(
                "SELECT 1 FROM enabled_calendars WHERE identifier = ?1",
                [calendar_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| StoreError::ReadFailed {
                what: "enabled calendar",
                source,
            })?;
        Ok(found.is_some())
    }

    /// Enabled identifiers, sorted.
    pub fn all(&self) -> StoreResult<Vec<String>> {
        let db = lock(&self.db);
        let read_failed = |source| StoreError::ReadFailed {
            what: "enabled calendars",
            source,
        };

        let mut stmt = db
            .connection()
            .prepare("SELECT identifier FROM enabled_calendars ORDER BY identifier")
            .map_err(read_failed)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(read_failed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_failed)?;
        Ok(ids)
    }

    /// Replaces the whole selection in one transaction.
    pub fn replace_all(&self, calendar_ids: &[String]) -> StoreResult<()> {
        for id in calendar_ids {
            require_identifier("Calendar", id)?;
        }

        let db = lock(&self.db);
        commit_with_retry(db.connection(), "replace calendars", |conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute("DELETE FROM enabled_calendars", [])?;
            for id in calendar_ids {
                tx.execute(
                    "INSERT OR IGNORE INTO enabled_calendars (identifier) VALUES (?1)",
                    [id],
                )?;
            }
            tx.commit()
        })?;
        log::info!("Calendar selection replaced with {} calendar(s)", calendar_ids.len());
        Ok(())
    }
}

/// Summary shown on the calendar picker row. `first_title` is the title of
/// the single selected calendar when it is known.
pub fn selection_label(selected_count: usize, first_title: Option<&str>) -> String {
    match selected_count {
        0 => "No calendar".to_string(),
        1 => first_title.unwrap_or("1 Calendar").to_string(),
        n => format!("{} Calendars", n),
    }
}
