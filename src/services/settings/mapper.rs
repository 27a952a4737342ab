use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::de::DeserializeOwned;

use crate::models::settings::{DisplayComponent, Preferences, PREFERENCES_SCHEMA_VERSION};

pub const KEY_SCHEMA_VERSION: &str = "schemaVersion";
pub const KEY_END_DATE: &str = "endDate";
pub const KEY_INSTALLED_DATE: &str = "installedDate";
pub const KEY_DISPLAY_COMPONENT: &str = "displayComponent";
pub const KEY_SELECTED_CALENDARS: &str = "selectedCalendars";
pub const KEY_IS_FIRST_LAUNCH: &str = "isFirstLaunch";
pub const KEY_SHOW_EVENT_AS_CARD: &str = "showEventAsCard";
pub const KEY_SHOW_HEART_IN_LIST: &str = "showHeartInList";
pub const KEY_IS_PAID_USER: &str = "isPaidUser";
pub const KEY_IS_MIGRATED: &str = "isMigratedFromStandardDefaults";

pub fn row_to_entry(row: &Row) -> Result<(String, String), rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?))
}

/// Builds preferences from stored entries. Missing or unreadable values fall
/// back to their defaults instead of failing the whole load.
pub fn entries_to_preferences(entries: &HashMap<String, String>, now: DateTime<Utc>) -> Preferences {
    let defaults = Preferences::defaults(now);

    let stored_version: u32 = decode(entries, KEY_SCHEMA_VERSION, PREFERENCES_SCHEMA_VERSION);
    if stored_version > PREFERENCES_SCHEMA_VERSION {
        log::warn!(
            "Preferences were written by a newer release (version {}); reading known keys only",
            stored_version
        );
    }

    let component_index: u8 = decode(
        entries,
        KEY_DISPLAY_COMPONENT,
        defaults.display_component.index(),
    );

    Preferences {
        schema_version: PREFERENCES_SCHEMA_VERSION,
        end_date: decode(entries, KEY_END_DATE, defaults.end_date),
        installed_date: decode(entries, KEY_INSTALLED_DATE, defaults.installed_date),
        display_component: DisplayComponent::from_index(component_index)
            .unwrap_or(defaults.display_component),
        selected_calendar_ids: decode(
            entries,
            KEY_SELECTED_CALENDARS,
            defaults.selected_calendar_ids,
        ),
        is_first_launch: decode(entries, KEY_IS_FIRST_LAUNCH, defaults.is_first_launch),
        show_event_as_card: decode(entries, KEY_SHOW_EVENT_AS_CARD, defaults.show_event_as_card),
        show_heart_in_list: decode(entries, KEY_SHOW_HEART_IN_LIST, defaults.show_heart_in_list),
        is_paid_user: decode(entries, KEY_IS_PAID_USER, defaults.is_paid_user),
        is_migrated_from_standard_defaults: decode(
            entries,
            KEY_IS_MIGRATED,
            defaults.is_migrated_from_standard_defaults,
        ),
    }
}

pub fn preferences_to_entries(prefs: &Preferences) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        (KEY_SCHEMA_VERSION, encode(&PREFERENCES_SCHEMA_VERSION)?),
        (KEY_END_DATE, encode(&prefs.end_date)?),
        (KEY_INSTALLED_DATE, encode(&prefs.installed_date)?),
        (KEY_DISPLAY_COMPONENT, encode(&prefs.display_component.index())?),
        (KEY_SELECTED_CALENDARS, encode(&prefs.selected_calendar_ids)?),
        (KEY_IS_FIRST_LAUNCH, encode(&prefs.is_first_launch)?),
        (KEY_SHOW_EVENT_AS_CARD, encode(&prefs.show_event_as_card)?),
        (KEY_SHOW_HEART_IN_LIST, encode(&prefs.show_heart_in_list)?),
        (KEY_IS_PAID_USER, encode(&prefs.is_paid_user)?),
        (KEY_IS_MIGRATED, encode(&prefs.is_migrated_from_standard_defaults)?),
    ])
}

fn decode<T: DeserializeOwned>(entries: &HashMap<String, String>, key: &str, fallback: T) -> T {
    match entries.get(key) {
        None => fallback,
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|err| {
            log::warn!("Ignoring unreadable preference {}={}: {}", key, raw, err);
            fallback
        }),
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("Failed to encode preference value")
}
