// Property-based tests for time gaps
// Random offsets must always decompose into valid, reversible units

use chrono::{Duration, TimeZone, Utc};
use countdown_core::models::time_gap::TimeGap;
use proptest::prelude::*;

const TEN_THOUSAND_YEARS: i64 = 10_000 * 366 * 86_400;

proptest! {
    /// Property: the units always add back up to the signed offset
    #[test]
    fn prop_units_reconstruct_offset(offset in -TEN_THOUSAND_YEARS..TEN_THOUSAND_YEARS) {
        let gap = TimeGap::from_signed_seconds(offset);
        prop_assert_eq!(gap.total_seconds(), offset);
    }

    /// Property: a timestamp gap carries exactly the rounded difference
    #[test]
    fn prop_timestamp_gap_is_rounded_difference(
        target in -1.0e12f64..1.0e12,
        reference in -1.0e12f64..1.0e12,
    ) {
        let gap = TimeGap::between_timestamps(target, reference);
        prop_assert_eq!(gap.total_seconds() as f64, (target - reference).round());
    }

    /// Property: hours, minutes and seconds stay inside their ranges
    #[test]
    fn prop_fields_in_range(target in -1.0e12f64..1.0e12, reference in -1.0e12f64..1.0e12) {
        let gap = TimeGap::between_timestamps(target, reference);
        prop_assert!(gap.hours < 24);
        prop_assert!(gap.minutes < 60);
        prop_assert!(gap.seconds < 60);
        prop_assert!(gap.days >= 0);
    }

    /// Property: the sign only comes from the direction of the offset
    #[test]
    fn prop_past_iff_target_before_reference(offset in -1_000_000i64..1_000_000) {
        let reference = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let gap = TimeGap::between(&(reference + Duration::seconds(offset)), &reference);
        prop_assert_eq!(gap.is_past, offset < 0);
        prop_assert_eq!(gap.is_zero(), offset == 0);
    }

    /// Property: swapping target and reference only flips the sign
    #[test]
    fn prop_swap_is_antisymmetric(a in -1.0e9f64..1.0e9, b in -1.0e9f64..1.0e9) {
        let forward = TimeGap::between_timestamps(a, b);
        let backward = TimeGap::between_timestamps(b, a);
        prop_assert_eq!(forward.days, backward.days);
        prop_assert_eq!(forward.hours, backward.hours);
        prop_assert_eq!(forward.minutes, backward.minutes);
        prop_assert_eq!(forward.seconds, backward.seconds);
    }
}
