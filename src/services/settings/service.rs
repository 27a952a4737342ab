use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::models::settings::{DisplayComponent, LegacyPreferences, Preferences};
use crate::services::database::{commit_with_retry, Database};

use super::mapper::{entries_to_preferences, preferences_to_entries, row_to_entry};

pub struct PreferencesService<'a> {
    db: &'a Database,
}

impl<'a> PreferencesService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the current preferences; unset keys take defaults relative to `now`.
    pub fn get(&self, now: DateTime<Utc>) -> Result<Preferences> {
        let entries = read_entries(self.db.connection()).context("Failed to load preferences")?;
        Ok(entries_to_preferences(&entries, now))
    }

    /// Writes every key in one transaction.
    pub fn update(&self, prefs: &Preferences) -> Result<()> {
        prefs
            .validate()
            .map_err(|e| anyhow!("Invalid preferences: {}", e))?;

        let entries = preferences_to_entries(prefs)?;
        commit_with_retry(self.db.connection(), "preferences", |conn| {
            let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
            write_entries(&tx, &entries)?;
            tx.commit()
        })
        .context("Failed to save preferences")?;
        Ok(())
    }

    /// Reset preferences to defaults
    pub fn reset(&self, now: DateTime<Utc>) -> Result<()> {
        self.update(&Preferences::defaults(now))
    }

    /// Copies the legacy per-process preferences into the shared store once.
    ///
    /// Skipped when the legacy scope never completed a launch or the copy
    /// already happened. The check and the copy share one write transaction,
    /// so concurrent launches migrate at most once. Returns whether anything
    /// was migrated.
    pub fn migrate_from_legacy(&self, legacy: &LegacyPreferences, now: DateTime<Utc>) -> Result<bool> {
        if legacy.is_first_launch {
            return Ok(false);
        }
        if legacy.selected_calendars.iter().any(|id| id.trim().is_empty()) {
            bail!("Invalid legacy preferences: calendar identifiers cannot be empty");
        }

        let migrated = commit_with_retry(self.db.connection(), "preferences migration", |conn| {
            let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
            let mut prefs = entries_to_preferences(&read_entries(&tx)?, now);
            if prefs.is_migrated_from_standard_defaults {
                return Ok(None);
            }

            if let Some(end_date) = legacy.end_date {
                prefs.end_date = end_date;
            }
            prefs.display_component = DisplayComponent::from_index(legacy.display_component)
                .unwrap_or(prefs.display_component);
            prefs.selected_calendar_ids = legacy.selected_calendars.clone();
            prefs.is_first_launch = legacy.is_first_launch;
            prefs.show_event_as_card = legacy.show_event_as_card;
            prefs.is_migrated_from_standard_defaults = true;

            let entries = preferences_to_entries(&prefs)
                .map_err(|err| rusqlite::Error::ToSqlConversionFailure(err.into()))?;
            write_entries(&tx, &entries)?;
            tx.commit()?;
            Ok(Some(prefs.selected_calendar_ids.len()))
        })
        .context("Failed to migrate legacy preferences")?;

        match migrated {
            Some(calendars) => {
                log::info!("Migrated legacy preferences ({} selected calendar(s))", calendars);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// On the very first launch every known calendar starts selected and the
    /// install date is stamped. Later calls leave preferences untouched.
    pub fn complete_first_launch(
        &self,
        calendar_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<Preferences> {
        let mut prefs = self.get(now)?;
        if !prefs.is_first_launch {
            return Ok(prefs);
        }

        prefs.selected_calendar_ids = calendar_ids.to_vec();
        prefs.installed_date = now;
        prefs.is_first_launch = false;
        self.update(&prefs)?;
        log::info!("First launch completed with {} calendar(s)", calendar_ids.len());
        Ok(prefs)
    }

    /// Falls back to `default_calendar` when nothing is selected.
    pub fn ensure_selection(&self, default_calendar: Option<&str>, now: DateTime<Utc>) -> Result<Preferences> {
        let mut prefs = self.get(now)?;
        if prefs.selected_calendar_ids.is_empty() {
            if let Some(id) = default_calendar {
                prefs.selected_calendar_ids = vec![id.to_string()];
                self.update(&prefs)?;
            }
        }
        Ok(prefs)
    }

    /// Applies the free-plan restrictions and persists them.
    pub fn handle_premium_features(&self, now: DateTime<Utc>) -> Result<Preferences> {
        let mut prefs = self.get(now)?;
        let before = prefs.show_heart_in_list;
        prefs.handle_premium_features();
        if prefs.show_heart_in_list != before {
            self.update(&prefs)?;
        }
        Ok(prefs)
    }
}

fn read_entries(conn: &Connection) -> rusqlite::Result<HashMap<String, String>> {
    let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
    let entries = stmt
        .query_map([], |row| row_to_entry(row))?
        .collect::<rusqlite::Result<HashMap<_, _>>>()?;
    Ok(entries)
}

fn write_entries(conn: &Connection, entries: &[(&'static str, String)]) -> rusqlite::Result<()> {
    for (key, value) in entries {
        conn.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            (key, value),
        )?;
    }
    Ok(())
}
