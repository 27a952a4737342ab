// Unit tests for DisplayComponent
// Covers the stored index, labels and whole-unit counting

use chrono::{DateTime, Duration, TimeZone, Utc};
use countdown_core::models::settings::DisplayComponent;
use countdown_core::utils::date::difference_label;
use test_case::test_case;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
}

#[test_case(DisplayComponent::Day, 0; "day")]
#[test_case(DisplayComponent::Week, 1; "week")]
#[test_case(DisplayComponent::Month, 2; "month")]
fn test_index_matches_picker_position(component: DisplayComponent, index: u8) {
    assert_eq!(component.index(), index);
    assert_eq!(DisplayComponent::from_index(index), Some(component));
}

#[test]
fn test_unknown_index_is_rejected() {
    assert_eq!(DisplayComponent::from_index(3), None);
}

#[test_case(DisplayComponent::Day, 45, 45; "days")]
#[test_case(DisplayComponent::Week, 45, 6; "weeks truncate")]
#[test_case(DisplayComponent::Month, 45, 1; "months truncate")]
#[test_case(DisplayComponent::Month, 365, 12; "a year of months")]
#[test_case(DisplayComponent::Day, -3, -3; "days in the past")]
fn test_whole_units_between(component: DisplayComponent, days: i64, expected: i64) {
    let target = start() + Duration::days(days);
    assert_eq!(component.whole_units_between(&target, &start()), expected);
}

#[test_case(DisplayComponent::Day, 45, "in 45 days"; "days label")]
#[test_case(DisplayComponent::Week, 45, "in 6 weeks"; "weeks label")]
#[test_case(DisplayComponent::Month, 90, "in 3 months"; "months label")]
#[test_case(DisplayComponent::Month, 40, "in 1 month"; "single month falls back")]
fn test_difference_label(component: DisplayComponent, days: i64, expected: &str) {
    let target = start() + Duration::days(days);
    assert_eq!(difference_label(&target, &start(), component), expected);
}

#[test]
fn test_display_names() {
    let names: Vec<String> = DisplayComponent::ALL.iter().map(|c| c.to_string()).collect();
    assert_eq!(names, vec!["Day", "Week", "Month"]);
}
