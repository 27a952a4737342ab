//! Favorite-event store over the shared database.
//!
//! Every process (app or widget) opens its own `FavoriteStore` on the same
//! container file. Within a process the handle is cloned, never copied into
//! private state.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::favorite::{format_occurrence, parse_occurrence, FavoriteRecord};
use crate::services::database::{
    commit_with_retry, lock, require_identifier, SharedDatabase, StoreError, StoreResult,
};

use super::reload::{NoopReloader, TimelineReloader};

#[derive(Clone)]
pub struct FavoriteStore {
    db: SharedDatabase,
    reloader: Arc<dyn TimelineReloader>,
    widget_kind: String,
}

impl FavoriteStore {
    pub fn new(
        db: SharedDatabase,
        reloader: Arc<dyn TimelineReloader>,
        widget_kind: impl Into<String>,
    ) -> Self {
        Self {
            db,
            reloader,
            widget_kind: widget_kind.into(),
        }
    }

    /// Store that signals nobody; widget processes use this for reads.
    pub fn without_reload(db: SharedDatabase) -> Self {
        Self::new(db, Arc::new(NoopReloader), crate::config::DEFAULT_WIDGET_KIND)
    }

    pub fn is_favorite(&self, event_id: &str) -> StoreResult<bool> {
        let db = lock(&self.db);
        let found: Option<i64> = db
            .connection()
            .query_row(
                "SELECT 1 FROM favorite_events WHERE event_id = ?1",
                [event_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| StoreError::ReadFailed {
                what: "favorite",
                source,
            })?;

        Ok(found.is_some())
    }

    /// Inserts or replaces the record for `event_id`.
    pub fn add_favorite(&self, event_id: &str, occurrence_date: DateTime<Utc>) -> StoreResult<()> {
        require_identifier("Event", event_id)?;
        let occurrence = format_occurrence(&occurrence_date);

        {
            let db = lock(&self.db);
            commit_with_retry(db.connection(), "add favorite", |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO favorite_events (event_id, occurrence_date, created_at)
                     VALUES (?1, ?2, CURRENT_TIMESTAMP)",
                    params![event_id, occurrence],
                )
            })?;
        }

        log::debug!("Favorited {} at {}", event_id, occurrence);
        self.reloader.reload_timelines(&self.widget_kind);
        Ok(())
    }

    /// Deletes the record for `event_id`; absent records are not an error.
    pub fn remove_favorite(&self, event_id: &str) -> StoreResult<()> {
        let removed = {
            let db = lock(&self.db);
            commit_with_retry(db.connection(), "remove favorite", |conn| {
                conn.execute("DELETE FROM favorite_events WHERE event_id = ?1", [event_id])
            })?
        };

        log::debug!("Unfavorited {} ({} row(s))", event_id, removed);
        self.reloader.reload_timelines(&self.widget_kind);
        Ok(())
    }

    /// Flips the favorite state and returns the new one.
    pub fn toggle_favorite(
        &self,
        event_id: &str,
        occurrence_date: DateTime<Utc>,
    ) -> StoreResult<bool> {
        if self.is_favorite(event_id)? {
            self.remove_favorite(event_id)?;
            Ok(false)
        } else {
            self.add_favorite(event_id, occurrence_date)?;
            Ok(true)
        }
    }

    /// All favorited identifiers, ordered by occurrence date then id.
    pub fn all_favorite_identifiers(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .all_favorites()?
            .into_iter()
            .map(|record| record.event_id)
            .collect())
    }

    pub fn all_favorites(&self) -> StoreResult<Vec<FavoriteRecord>> {
        let db = lock(&self.db);
        load_records(db.connection()).map_err(|source| StoreError::ReadFailed {
            what: "favorites",
            source,
        })
    }

    pub fn get_favorite(&self, event_id: &str) -> StoreResult<Option<FavoriteRecord>> {
        let db = lock(&self.db);
        db.connection()
            .query_row(
                "SELECT event_id, occurrence_date FROM favorite_events WHERE event_id = ?1",
                [event_id],
                row_to_record,
            )
            .optional()
            .map_err(|source| StoreError::ReadFailed {
                what: "favorite",
                source,
            })
    }

    pub fn count(&self) -> StoreResult<usize> {
        let db = lock(&self.db);
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM favorite_events", [], |row| row.get(0))
            .map_err(|source| StoreError::ReadFailed {
                what: "favorite count",
                source,
            })?;
        Ok(count.max(0) as usize)
    }

    /// Removes favorites whose events are no longer in `live_ids`, returning
    /// how many went away. Runs in one transaction.
    pub fn prune_missing(&self, live_ids: &HashSet<String>) -> StoreResult<usize> {
        let removed = {
            let db = lock(&self.db);
            commit_with_retry(db.connection(), "prune favorites", |conn| {
                let tx = conn.unchecked_transaction()?;
                let stale: Vec<String> = {
                    let mut stmt = tx.prepare("SELECT event_id FROM favorite_events")?;
                    let ids = stmt
                        .query_map([], |row| row.get::<_, String>(0))?
                        .collect::<Result<Vec<_>, _>>()?;
                    ids.into_iter().filter(|id| !live_ids.contains(id)).collect()
                };

                for id in &stale {
                    tx.execute("DELETE FROM favorite_events WHERE event_id = ?1", [id])?;
                }
                tx.commit()?;
                Ok(stale.len())
            })?
        };

        if removed > 0 {
            log::info!("Pruned {} favorite(s) for deleted events", removed);
            self.reloader.reload_timelines(&self.widget_kind);
        }
        Ok(removed)
    }

    /// Identifiers for display paths that must not fail; an unreadable store
    /// reads as empty.
    pub fn favorite_identifiers_or_empty(&self) -> Vec<String> {
        self.all_favorite_identifiers().unwrap_or_else(|err| {
            log::warn!("Treating favorites as empty: {}", err);
            Vec::new()
        })
    }

    pub fn is_favorite_or_false(&self, event_id: &str) -> bool {
        self.is_favorite(event_id).unwrap_or_else(|err| {
            log::warn!("Treating {} as not favorite: {}", event_id, err);
            false
        })
    }
}

fn load_records(conn: &Connection) -> rusqlite::Result<Vec<FavoriteRecord>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, occurrence_date FROM favorite_events
         ORDER BY occurrence_date, event_id",
    )?;
    let records = stmt
        .query_map([], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

fn row_to_record(row: &Row) -> rusqlite::Result<FavoriteRecord> {
    let event_id: String = row.get(0)?;
    let occurrence: String = row.get(1)?;
    let occurrence_date = parse_occurrence(&occurrence).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("invalid occurrence date {:?}", occurrence).into(),
        )
    })?;

    Ok(FavoriteRecord {
        event_id,
        occurrence_date,
    })
}
