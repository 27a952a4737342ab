// Test fixtures - reusable test data
// Provides consistent dates and occurrences across test files
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use countdown_core::models::event::CalendarEvent;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Returns Jan 1, 2025 at midnight
    pub fn jan_1_2025() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    /// Returns Feb 14, 2025 at 14:00
    pub fn valentine_2025() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 14, 14, 0, 0).unwrap()
    }

    /// Returns Dec 31, 2025 at 23:59
    pub fn new_years_eve_2025() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 0).unwrap()
    }

    /// Returns Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
    }
}

/// Sample occurrences for testing
pub mod events {
    use super::*;

    pub fn valentine_dinner() -> CalendarEvent {
        CalendarEvent::builder()
            .identifier("evt-valentine")
            .title("Valentine Dinner")
            .occurrence_date(dates::valentine_2025())
            .calendar_id("personal")
            .build()
            .unwrap()
    }

    pub fn new_years_party() -> CalendarEvent {
        CalendarEvent::builder()
            .identifier("evt-nye")
            .title("New Year's Party")
            .occurrence_date(dates::new_years_eve_2025())
            .calendar_id("personal")
            .color("#FF5733")
            .build()
            .unwrap()
    }

    /// Three weekly occurrences of one recurring event
    pub fn weekly_standup() -> Vec<CalendarEvent> {
        (0..3)
            .map(|week| {
                CalendarEvent::builder()
                    .identifier("evt-standup")
                    .title("Weekly Standup")
                    .occurrence_date(dates::jan_1_2025() + Duration::weeks(week))
                    .calendar_id("work")
                    .build()
                    .unwrap()
            })
            .collect()
    }
}
