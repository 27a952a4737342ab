// Date utility functions
// Relative labels shown under countdowns

use chrono::{DateTime, TimeZone};

use crate::models::settings::DisplayComponent;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

/// Phrases a signed offset in seconds the way a full-style relative
/// formatter would: "in 3 hours", "5 minutes ago", "now".
pub fn relative_phrase(offset_seconds: i64) -> String {
    if offset_seconds == 0 {
        return "now".to_string();
    }

    let magnitude = offset_seconds.unsigned_abs();
    let (count, unit) = if magnitude >= YEAR {
        (magnitude / YEAR, "year")
    } else if magnitude >= MONTH {
        (magnitude / MONTH, "month")
    } else if magnitude >= WEEK {
        (magnitude / WEEK, "week")
    } else if magnitude >= DAY {
        (magnitude / DAY, "day")
    } else if magnitude >= HOUR {
        (magnitude / HOUR, "hour")
    } else if magnitude >= MINUTE {
        (magnitude / MINUTE, "minute")
    } else {
        (magnitude, "second")
    };

    let plural = if count == 1 { "" } else { "s" };
    if offset_seconds > 0 {
        format!("in {} {}{}", count, unit, plural)
    } else {
        format!("{} {}{} ago", count, unit, plural)
    }
}

/// Coarse countdown label: "in N days|weeks|months" once more than one whole
/// unit remains, otherwise the relative phrase for the exact offset.
pub fn difference_label<Tz: TimeZone>(
    target: &DateTime<Tz>,
    now: &DateTime<Tz>,
    component: DisplayComponent,
) -> String {
    let units = component.whole_units_between(target, now);
    if units > 1 {
        return format!("in {} {}", units, component.plural_suffix());
    }

    let offset = target.clone().signed_duration_since(now.clone()).num_seconds();
    relative_phrase(offset)
}

/// "Mar 07, 2025"
pub fn short_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use test_case::test_case;

    #[test_case(0, "now"; "zero")]
    #[test_case(1, "in 1 second"; "one second ahead")]
    #[test_case(-45, "45 seconds ago"; "seconds behind")]
    #[test_case(3 * 3_600 + 59, "in 3 hours"; "hours ahead")]
    #[test_case(-5 * 60, "5 minutes ago"; "minutes behind")]
    #[test_case(86_400, "in 1 day"; "exactly one day")]
    #[test_case(15 * 86_400, "in 2 weeks"; "weeks ahead")]
    #[test_case(400 * 86_400, "in 1 year"; "a year ahead")]
    #[test_case(i64::MIN, "292471208677 years ago"; "most negative offset")]
    #[test_case(i64::MAX, "in 292471208677 years"; "most positive offset")]
    fn test_relative_phrase(offset: i64, expected: &str) {
        assert_eq!(relative_phrase(offset), expected);
    }

    #[test]
    fn test_difference_label_uses_component_when_more_than_one() {
        let now = Utc::now();
        let target = now + Duration::days(10);

        assert_eq!(difference_label(&target, &now, DisplayComponent::Day), "in 10 days");
        assert_eq!(difference_label(&target, &now, DisplayComponent::Week), "in 1 week");
    }

    #[test]
    fn test_difference_label_falls_back_to_relative_phrase() {
        let now = Utc::now();
        let target = now + Duration::hours(30);
        assert_eq!(difference_label(&target, &now, DisplayComponent::Day), "in 1 day");

        let past = now - Duration::minutes(2);
        assert_eq!(difference_label(&past, &now, DisplayComponent::Month), "2 minutes ago");
    }

    #[test]
    fn test_short_date() {
        let date = Utc.with_ymd_and_hms(2025, 3, 7, 10, 0, 0).unwrap();
        assert_eq!(short_date(&date), "Mar 07, 2025");
    }
}
