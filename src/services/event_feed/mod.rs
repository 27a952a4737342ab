// Event feed module
// Shapes caller-supplied occurrences for lists and widgets

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::event::CalendarEvent;
use crate::models::settings::Preferences;

/// Rows a large widget shows.
pub const WIDGET_ROW_LIMIT: usize = 7;
/// Rows shown as cards at the top of a widget.
pub const WIDGET_HEADLINE_COUNT: usize = 2;

/// Upcoming occurrences, one per identifier, soonest first.
///
/// Recurring events repeat their identifier; only the earliest upcoming
/// occurrence is kept.
pub fn distinct_upcoming(events: &[CalendarEvent], now: DateTime<Utc>) -> Vec<CalendarEvent> {
    let mut upcoming: Vec<&CalendarEvent> =
        events.iter().filter(|event| event.is_upcoming(now)).collect();
    upcoming.sort_by(|a, b| {
        a.occurrence_date
            .cmp(&b.occurrence_date)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    let mut seen = HashSet::new();
    upcoming.retain(|event| seen.insert(event.identifier.clone()));
    upcoming.into_iter().cloned().collect()
}

/// The list the app shows: upcoming occurrences from the selected calendars
/// that start before the preferred end date. Nothing is listed while no
/// calendar is selected.
pub fn scoped_upcoming(
    events: &[CalendarEvent],
    prefs: &Preferences,
    now: DateTime<Utc>,
) -> Vec<CalendarEvent> {
    if prefs.selected_calendar_ids.is_empty() {
        return Vec::new();
    }

    let selected: HashSet<&str> = prefs
        .selected_calendar_ids
        .iter()
        .map(String::as_str)
        .collect();
    let in_scope: Vec<CalendarEvent> = events
        .iter()
        .filter(|event| event.occurrence_date < prefs.end_date)
        .filter(|event| {
            event
                .calendar_id
                .as_deref()
                .is_some_and(|id| selected.contains(id))
        })
        .cloned()
        .collect();

    distinct_upcoming(&in_scope, now)
}

/// Case-insensitive title search; a blank query matches everything.
pub fn filter_by_title(events: &[CalendarEvent], query: &str) -> Vec<CalendarEvent> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return events.to_vec();
    }

    events
        .iter()
        .filter(|event| event.title.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Events whose identifier is in `favorite_ids`, soonest first.
pub fn favorite_events(events: &[CalendarEvent], favorite_ids: &[String]) -> Vec<CalendarEvent> {
    let ids: HashSet<&str> = favorite_ids.iter().map(String::as_str).collect();
    let mut favorites: Vec<CalendarEvent> = events
        .iter()
        .filter(|event| ids.contains(event.identifier.as_str()))
        .cloned()
        .collect();
    favorites.sort_by(|a, b| a.occurrence_date.cmp(&b.occurrence_date));
    favorites
}

/// How a widget timeline entry splits its events.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetSlices {
    pub first_seven: Vec<CalendarEvent>,
    pub first_two: Vec<CalendarEvent>,
    /// The rows after the headline cards, up to five.
    pub next_five: Vec<CalendarEvent>,
    /// Events not shown as headline cards.
    pub remaining_count: usize,
}

impl WidgetSlices {
    pub fn from_events(events: &[CalendarEvent]) -> Self {
        let first_seven: Vec<CalendarEvent> =
            events.iter().take(WIDGET_ROW_LIMIT).cloned().collect();
        let first_two: Vec<CalendarEvent> =
            first_seven.iter().take(WIDGET_HEADLINE_COUNT).cloned().collect();
        let next_five = first_seven.iter().skip(first_two.len()).cloned().collect();

        Self {
            remaining_count: events.len() - first_two.len(),
            first_seven,
            first_two,
            next_five,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_seven.is_empty()
    }
}
