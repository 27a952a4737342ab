// Settings module
// User preferences shared between the app and its widgets

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Bumped whenever a stored preference changes meaning.
pub const PREFERENCES_SCHEMA_VERSION: u32 = 1;

/// Calendar unit used for the coarse "in N <unit>" countdown label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayComponent {
    #[default]
    Day,
    Week,
    Month,
}

impl DisplayComponent {
    pub const ALL: [DisplayComponent; 3] = [
        DisplayComponent::Day,
        DisplayComponent::Week,
        DisplayComponent::Month,
    ];

    /// Index used by older stores, which kept the picker position.
    pub fn index(self) -> u8 {
        match self {
            DisplayComponent::Day => 0,
            DisplayComponent::Week => 1,
            DisplayComponent::Month => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn plural_suffix(self) -> &'static str {
        match self {
            DisplayComponent::Day => "days",
            DisplayComponent::Week => "weeks",
            DisplayComponent::Month => "months",
        }
    }

    /// Whole units from `from` until `to`, truncated toward zero.
    /// Months count calendar months, clamping to the end of shorter months.
    pub fn whole_units_between<Tz: TimeZone>(self, to: &DateTime<Tz>, from: &DateTime<Tz>) -> i64 {
        match self {
            DisplayComponent::Day => to.clone().signed_duration_since(from.clone()).num_days(),
            DisplayComponent::Week => to.clone().signed_duration_since(from.clone()).num_weeks(),
            DisplayComponent::Month => whole_months_between(to, from),
        }
    }
}

impl fmt::Display for DisplayComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayComponent::Day => "Day",
            DisplayComponent::Week => "Week",
            DisplayComponent::Month => "Month",
        };
        write!(f, "{}", name)
    }
}

fn whole_months_between<Tz: TimeZone>(to: &DateTime<Tz>, from: &DateTime<Tz>) -> i64 {
    if to < from {
        return -whole_months_between(from, to);
    }

    let mut months =
        (to.year() as i64 - from.year() as i64) * 12 + to.month() as i64 - from.month() as i64;

    while months > 0 {
        match from.clone().checked_add_months(Months::new(months as u32)) {
            Some(shifted) if shifted <= *to => break,
            _ => months -= 1,
        }
    }

    months
}

/// Preferences stored in the shared container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub schema_version: u32,
    /// Events are listed up to this date.
    pub end_date: DateTime<Utc>,
    pub installed_date: DateTime<Utc>,
    pub display_component: DisplayComponent,
    pub selected_calendar_ids: Vec<String>,
    pub is_first_launch: bool,
    pub show_event_as_card: bool,
    pub show_heart_in_list: bool,
    pub is_paid_user: bool,
    pub is_migrated_from_standard_defaults: bool,
}

impl Preferences {
    /// Defaults relative to `now`; the end date lands one year out.
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            schema_version: PREFERENCES_SCHEMA_VERSION,
            end_date: default_end_date(now),
            installed_date: now,
            display_component: DisplayComponent::Day,
            selected_calendar_ids: Vec::new(),
            is_first_launch: true,
            show_event_as_card: true,
            show_heart_in_list: true,
            is_paid_user: false,
            is_migrated_from_standard_defaults: false,
        }
    }

    /// Validate the preferences
    pub fn validate(&self) -> Result<(), String> {
        if self
            .selected_calendar_ids
            .iter()
            .any(|id| id.trim().is_empty())
        {
            return Err("Calendar identifiers cannot be empty".to_string());
        }

        Ok(())
    }

    /// Free users lose the heart badge in lists.
    pub fn handle_premium_features(&mut self) {
        if !self.is_paid_user {
            self.show_heart_in_list = false;
        }
    }
}

pub fn default_end_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(12))
        .unwrap_or_else(|| now + chrono::Duration::seconds(31_556_952))
}

/// Preferences kept by older releases in a per-process file, before they
/// moved into the shared container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyPreferences {
    pub end_date: Option<DateTime<Utc>>,
    pub display_component: u8,
    pub selected_calendars: Vec<String>,
    pub is_first_launch: bool,
    pub show_event_as_card: bool,
}

impl Default for LegacyPreferences {
    fn default() -> Self {
        Self {
            end_date: None,
            display_component: 0,
            selected_calendars: Vec::new(),
            is_first_launch: true,
            show_event_as_card: true,
        }
    }
}

impl LegacyPreferences {
    /// Reads the legacy TOML file. A missing file means the legacy scope was
    /// never written, which reads as a first launch.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read legacy preferences at {}", path.display()))?;
        let prefs: LegacyPreferences = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse legacy preferences at {}", path.display()))?;
        Ok(prefs)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to encode legacy preferences")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write legacy preferences to {}", path.display()))?;
        Ok(())
    }
}
