use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub const SCHEMA_VERSION: i64 = 2;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_favorite_events_table(conn)?;
    run_favorite_migrations(conn)?;
    create_enabled_calendars_table(conn)?;
    create_preferences_table(conn)?;

    if migrations::user_version(conn)? < SCHEMA_VERSION {
        migrations::set_user_version(conn, SCHEMA_VERSION)?;
    }
    Ok(())
}

fn create_favorite_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS favorite_events (
            event_id TEXT PRIMARY KEY NOT NULL,
            occurrence_date TEXT NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create favorite_events table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_favorite_events_occurrence
         ON favorite_events (occurrence_date)",
        [],
    )
    .context("Failed to create favorite_events index")?;

    Ok(())
}

/// Version 1 stores only kept the identifier and occurrence date.
fn run_favorite_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "favorite_events",
        "created_at",
        "ALTER TABLE favorite_events ADD COLUMN created_at TEXT",
    )
}

fn create_enabled_calendars_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS enabled_calendars (
            identifier TEXT PRIMARY KEY NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create enabled_calendars table")?;

    Ok(())
}

fn create_preferences_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create preferences table")?;

    Ok(())
}
