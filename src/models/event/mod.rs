// Event module
// Calendar event occurrence as supplied by the platform calendar store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One occurrence of a (possibly recurring) calendar event.
///
/// Recurring events share a base `identifier`; `occurrence_date` tells the
/// instances apart. The crate never fetches these itself, callers hand them
/// in from whatever calendar source they use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub identifier: String,
    pub title: String,
    pub occurrence_date: DateTime<Utc>,
    pub calendar_id: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
}

impl CalendarEvent {
    /// Create an occurrence with required fields
    ///
    /// # Examples
    /// ```
    /// use countdown_core::models::event::CalendarEvent;
    /// use chrono::Utc;
    ///
    /// let event = CalendarEvent::new("evt-1", "Launch", Utc::now()).unwrap();
    /// assert_eq!(event.identifier, "evt-1");
    /// ```
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        occurrence_date: DateTime<Utc>,
    ) -> Result<Self, String> {
        let event = Self {
            identifier: identifier.into(),
            title: title.into(),
            occurrence_date,
            calendar_id: None,
            color: None,
            location: None,
            url: None,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn builder() -> CalendarEventBuilder {
        CalendarEventBuilder::new()
    }

    /// Validate the occurrence
    pub fn validate(&self) -> Result<(), String> {
        if self.identifier.trim().is_empty() {
            return Err("Event identifier cannot be empty".to_string());
        }

        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.occurrence_date > now
    }

    pub fn location_label(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    pub fn url_label(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }
}

/// Builder for occurrences with optional fields
#[derive(Default)]
pub struct CalendarEventBuilder {
    identifier: Option<String>,
    title: Option<String>,
    occurrence_date: Option<DateTime<Utc>>,
    calendar_id: Option<String>,
    color: Option<String>,
    location: Option<String>,
    url: Option<String>,
}

impl CalendarEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn occurrence_date(mut self, date: DateTime<Utc>) -> Self {
        self.occurrence_date = Some(date);
        self
    }

    pub fn calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    /// Set the calendar color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<CalendarEvent, String> {
        let identifier = self.identifier.ok_or("Event identifier is required")?;
        let occurrence_date = self
            .occurrence_date
            .ok_or("Event occurrence date is required")?;

        let event = CalendarEvent {
            identifier,
            title: self.title.unwrap_or_default(),
            occurrence_date,
            calendar_id: self.calendar_id,
            color: self.color,
            location: self.location,
            url: self.url,
        };
        event.validate()?;
        Ok(event)
    }
}
