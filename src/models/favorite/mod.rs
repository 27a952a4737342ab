// Favorite module
// A user's marking of one calendar event occurrence as a favorite

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One favorited event. At most one record exists per `event_id`; the
/// occurrence date pins which instance of a recurring event was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub event_id: String,
    pub occurrence_date: DateTime<Utc>,
}

impl FavoriteRecord {
    pub fn new(event_id: impl Into<String>, occurrence_date: DateTime<Utc>) -> Self {
        Self {
            event_id: event_id.into(),
            occurrence_date,
        }
    }

    /// Storage form of the occurrence date. Fixed precision keeps the column
    /// lexicographically sortable.
    pub fn occurrence_key(&self) -> String {
        format_occurrence(&self.occurrence_date)
    }
}

pub fn format_occurrence(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_occurrence(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
