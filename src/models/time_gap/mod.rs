// Time gap module
// Remaining-time breakdown shown by every countdown surface

use std::fmt;

use chrono::{DateTime, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// A duration split into days, hours, minutes and seconds.
///
/// The fields are always unsigned magnitudes; `is_past` carries the sign and
/// is only set when the target lies strictly before the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimeGap {
    pub days: i64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub is_past: bool,
}

impl TimeGap {
    pub const ZERO: TimeGap = TimeGap {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        is_past: false,
    };

    /// Computes the gap between two epoch timestamps expressed in seconds.
    ///
    /// The difference is rounded to the nearest whole second. Non-finite
    /// input yields [`TimeGap::ZERO`]; differences beyond the `i64` range
    /// saturate.
    ///
    /// # Examples
    /// ```
    /// use countdown_core::models::time_gap::TimeGap;
    ///
    /// let gap = TimeGap::between_timestamps(1_000.0 + 90_061.0, 1_000.0);
    /// assert_eq!((gap.days, gap.hours, gap.minutes, gap.seconds), (1, 1, 1, 1));
    /// assert!(!gap.is_past);
    /// ```
    pub fn between_timestamps(target: f64, reference: f64) -> Self {
        if !target.is_finite() || !reference.is_finite() {
            return Self::ZERO;
        }

        // finite inputs can still overflow to an infinite difference
        let diff = (target - reference).round();
        if !diff.is_finite() {
            return Self::from_signed_seconds(if diff > 0.0 { i64::MAX } else { i64::MIN });
        }

        // `as` saturates at the i64 bounds
        Self::from_signed_seconds(diff as i64)
    }

    /// Computes the gap between two instants, rounding sub-second remainders
    /// half away from zero.
    pub fn between<Tz1: TimeZone, Tz2: TimeZone>(
        target: &DateTime<Tz1>,
        reference: &DateTime<Tz2>,
    ) -> Self {
        let delta = target
            .with_timezone(&chrono::Utc)
            .signed_duration_since(reference.with_timezone(&chrono::Utc));
        Self::from(delta)
    }

    /// Splits a signed number of seconds into calendar-like units.
    pub fn from_signed_seconds(total: i64) -> Self {
        let magnitude = total.unsigned_abs();

        Self {
            days: (magnitude / SECONDS_PER_DAY) as i64,
            hours: ((magnitude % SECONDS_PER_DAY) / SECONDS_PER_HOUR) as u8,
            minutes: ((magnitude % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u8,
            seconds: (magnitude % SECONDS_PER_MINUTE) as u8,
            is_past: total < 0,
        }
    }

    /// Reassembles the signed number of seconds this gap represents.
    pub fn total_seconds(&self) -> i64 {
        let magnitude = self.days as i128 * SECONDS_PER_DAY as i128
            + self.hours as i128 * SECONDS_PER_HOUR as i128
            + self.minutes as i128 * SECONDS_PER_MINUTE as i128
            + self.seconds as i128;

        let signed = if self.is_past { -magnitude } else { magnitude };
        signed.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

impl From<TimeDelta> for TimeGap {
    fn from(delta: TimeDelta) -> Self {
        let mut seconds = delta.num_seconds();
        let nanos = delta.subsec_nanos();

        if nanos >= 500_000_000 {
            seconds = seconds.saturating_add(1);
        } else if nanos <= -500_000_000 {
            seconds = seconds.saturating_sub(1);
        }

        Self::from_signed_seconds(seconds)
    }
}

impl fmt::Display for TimeGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_past {
            write!(f, "-")?;
        }
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_one_of_each_unit() {
        let reference = 1_700_000_000.0;
        let gap = TimeGap::between_timestamps(reference + 90_061.0, reference);

        assert_eq!(
            gap,
            TimeGap {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1,
                is_past: false,
            }
        );
    }

    #[test]
    fn test_past_target_keeps_magnitude() {
        let reference = 1_700_000_000.0;
        let gap = TimeGap::between_timestamps(reference - 5.0, reference);

        assert_eq!(
            gap,
            TimeGap {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 5,
                is_past: true,
            }
        );
        assert_eq!(gap.total_seconds(), -5);
    }

    #[test]
    fn test_equal_timestamps_are_zero() {
        let gap = TimeGap::between_timestamps(42.5, 42.5);
        assert_eq!(gap, TimeGap::ZERO);
        assert!(gap.is_zero());
    }

    #[test_case(f64::NAN, 0.0; "nan target")]
    #[test_case(0.0, f64::NAN; "nan reference")]
    #[test_case(f64::INFINITY, 0.0; "infinite target")]
    #[test_case(0.0, f64::NEG_INFINITY; "infinite reference")]
    fn test_non_finite_input_yields_zero(target: f64, reference: f64) {
        assert_eq!(TimeGap::between_timestamps(target, reference), TimeGap::ZERO);
    }

    #[test_case(0.4, 0, false; "rounds down below half")]
    #[test_case(0.5, 1, false; "rounds half away from zero")]
    #[test_case(-0.4, 0, false; "tiny negative rounds to zero without sign")]
    #[test_case(-0.6, 1, true; "negative rounds to one second past")]
    fn test_sub_second_rounding(diff: f64, seconds: u8, is_past: bool) {
        let gap = TimeGap::between_timestamps(100.0 + diff, 100.0);
        assert_eq!(gap.seconds, seconds);
        assert_eq!(gap.is_past, is_past);
    }

    #[test]
    fn test_huge_difference_saturates() {
        let gap = TimeGap::between_timestamps(f64::MAX / 2.0, -f64::MAX / 2.0);
        assert_eq!(gap.total_seconds(), i64::MAX);
        assert!(gap.hours < 24 && gap.minutes < 60 && gap.seconds < 60);
    }

    #[test]
    fn test_overflowing_difference_saturates() {
        let ahead = TimeGap::between_timestamps(f64::MAX, -f64::MAX);
        assert!(!ahead.is_past);
        assert_eq!(ahead.total_seconds(), i64::MAX);

        let behind = TimeGap::between_timestamps(-f64::MAX, f64::MAX);
        assert!(behind.is_past);
        assert_eq!(behind.total_seconds(), i64::MIN);
    }

    #[test]
    fn test_i64_min_reconstructs() {
        let gap = TimeGap::from_signed_seconds(i64::MIN);
        assert!(gap.is_past);
        assert_eq!(gap.total_seconds(), i64::MIN);
    }

    #[test]
    fn test_between_datetimes_matches_timestamps() {
        let reference = Utc::now();
        let target = reference + Duration::days(3) + Duration::minutes(7);
        let gap = TimeGap::between(&target, &reference);

        assert_eq!(gap.days, 3);
        assert_eq!(gap.hours, 0);
        assert_eq!(gap.minutes, 7);
        assert!(!gap.is_past);
    }

    #[test]
    fn test_time_delta_rounding() {
        let gap = TimeGap::from(Duration::milliseconds(-1_500));
        assert_eq!(gap.seconds, 2);
        assert!(gap.is_past);

        let gap = TimeGap::from(Duration::milliseconds(1_499));
        assert_eq!(gap.seconds, 1);
        assert!(!gap.is_past);
    }

    #[test]
    fn test_display() {
        let gap = TimeGap::from_signed_seconds(-(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5));
        assert_eq!(gap.to_string(), "-2d 03h 04m 05s");
    }
}
