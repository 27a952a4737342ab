use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::event::CalendarEvent;
use crate::models::settings::DisplayComponent;
use crate::models::time_gap::TimeGap;
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::date::difference_label;

/// What one countdown row shows on a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCountdown {
    pub identifier: String,
    pub title: String,
    pub occurrence_date: DateTime<Utc>,
    pub gap: TimeGap,
    pub label: String,
}

/// Computes countdowns against an injected clock. Holds no timer state, so
/// every surface can call it on its own cadence and still agree.
#[derive(Clone)]
pub struct CountdownService {
    clock: Arc<dyn Clock>,
}

impl Default for CountdownService {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl CountdownService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn time_gap_until(&self, target: DateTime<Utc>) -> TimeGap {
        TimeGap::between(&target, &self.clock.now())
    }

    /// Same as [`time_gap_until`](Self::time_gap_until) for a raw epoch
    /// timestamp in seconds.
    pub fn time_gap_until_timestamp(&self, target: f64) -> TimeGap {
        TimeGap::between_timestamps(target, epoch_seconds(&self.clock.now()))
    }

    pub fn has_started(&self, target: DateTime<Utc>) -> bool {
        target <= self.clock.now()
    }

    pub fn difference_label(&self, target: DateTime<Utc>, component: DisplayComponent) -> String {
        difference_label(&target, &self.clock.now(), component)
    }

    /// One tick for a whole list, all read against the same instant.
    pub fn countdowns(
        &self,
        events: &[CalendarEvent],
        component: DisplayComponent,
    ) -> Vec<EventCountdown> {
        let now = self.clock.now();
        events
            .iter()
            .map(|event| EventCountdown {
                identifier: event.identifier.clone(),
                title: event.title.clone(),
                occurrence_date: event.occurrence_date,
                gap: TimeGap::between(&event.occurrence_date, &now),
                label: difference_label(&event.occurrence_date, &now, component),
            })
            .collect()
    }
}

fn epoch_seconds(at: &DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + at.timestamp_subsec_nanos() as f64 / 1_000_000_000.0
}
