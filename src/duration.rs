//! Duration values in the canonical fractional-days representation.
//!
//! Native duration types are normalized here, once, at the boundary. Everything
//! downstream only sees [`DurationValue`].

use std::time::Duration;

use ndarray::ArrayD;

use crate::error::{ensure_finite, Result};
use crate::units::{MICROSECONDS_PER_DAY, SECONDS_PER_DAY, US_PER_DAY};

/// Native "missing value" marker for integer nanosecond/microsecond counts.
pub const NAT_MARKER: i64 = i64::MIN;

/// A signed elapsed time in days, or the not-a-time sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DurationValue {
    /// Fractional days (1.0 == 24 hours).
    Days(f64),
    /// Undefined / missing duration.
    #[default]
    NotATime,
}

impl DurationValue {
    /// Wrap a number of days.
    pub fn from_days(days: f64) -> Self {
        Self::Days(days)
    }

    /// Convert a number of seconds.
    pub fn from_seconds(seconds: f64) -> Self {
        Self::Days(seconds / SECONDS_PER_DAY)
    }

    /// Convert an unsigned standard library duration.
    pub fn from_std(duration: Duration) -> Self {
        Self::from_signed(false, duration)
    }

    /// Convert a magnitude plus sign, for native types that store them apart.
    pub fn from_signed(negative: bool, duration: Duration) -> Self {
        // Whole seconds and the sub-second part are converted separately so
        // long durations keep microsecond precision.
        let whole = duration.as_secs() as f64 / SECONDS_PER_DAY;
        let sub = f64::from(duration.subsec_nanos()) / 1e9 / SECONDS_PER_DAY;
        let days = whole + sub;
        Self::Days(if negative { -days } else { days })
    }

    /// Convert an integer nanosecond count; [`NAT_MARKER`] maps to not-a-time.
    pub fn from_nanos(nanos: i64) -> Self {
        if nanos == NAT_MARKER {
            return Self::NotATime;
        }
        let seconds = nanos / 1_000_000_000;
        let rest = nanos % 1_000_000_000;
        Self::Days((seconds as f64 + rest as f64 / 1e9) / SECONDS_PER_DAY)
    }

    /// Convert an integer microsecond count; [`NAT_MARKER`] maps to not-a-time.
    pub fn from_micros(micros: i64) -> Self {
        if micros == NAT_MARKER {
            return Self::NotATime;
        }
        Self::Days(micros as f64 / MICROSECONDS_PER_DAY)
    }

    /// Whether this is the not-a-time sentinel.
    pub fn is_nat(&self) -> bool {
        matches!(self, Self::NotATime)
    }

    /// The day count, if any.
    pub fn days(&self) -> Option<f64> {
        match *self {
            Self::Days(days) => Some(days),
            Self::NotATime => None,
        }
    }

    /// The day count, failing on non-finite payloads. Not-a-time yields `None`.
    pub fn finite_days(&self) -> Result<Option<f64>> {
        self.days()
            .map(|days| ensure_finite("duration value", days))
            .transpose()
    }

    /// Absolute value as a standard library duration, rounded to microseconds.
    ///
    /// Returns `None` for not-a-time and for values that are not finite or do
    /// not fit a `Duration`.
    pub fn to_std(&self) -> Option<Duration> {
        let days = self.days()?.abs();
        if !days.is_finite() {
            return None;
        }
        let micros = (days * MICROSECONDS_PER_DAY).round();
        if micros >= u64::MAX as f64 {
            return None;
        }
        Some(Duration::from_micros(micros as u64))
    }

    /// Sign and magnitude in whole microseconds, rounded to nearest.
    ///
    /// Returns `None` when the magnitude is not finite or does not fit in
    /// `u128` (beyond about 3.9e27 days).
    pub(crate) fn split_micros(days: f64) -> Option<(bool, u128)> {
        let micros = (days.abs() * US_PER_DAY as f64).round();
        if !micros.is_finite() || micros >= u128::MAX as f64 {
            return None;
        }
        let micros = micros as u128;
        Some((days < 0.0 && micros != 0, micros))
    }
}

impl From<f64> for DurationValue {
    fn from(days: f64) -> Self {
        Self::Days(days)
    }
}

impl From<Duration> for DurationValue {
    fn from(duration: Duration) -> Self {
        Self::from_std(duration)
    }
}

impl From<Option<f64>> for DurationValue {
    fn from(days: Option<f64>) -> Self {
        days.map_or(Self::NotATime, Self::Days)
    }
}

/// Convert an array of integer nanosecond counts, keeping its shape.
pub fn days_from_nanos(nanos: &ArrayD<i64>) -> ArrayD<DurationValue> {
    nanos.mapv(DurationValue::from_nanos)
}

/// Smallest and largest finite day value, skipping not-a-time entries.
pub fn data_limits(values: &ArrayD<DurationValue>) -> Option<(f64, f64)> {
    values
        .iter()
        .filter_map(DurationValue::days)
        .filter(|days| days.is_finite())
        .fold(None, |acc, days| match acc {
            None => Some((days, days)),
            Some((lo, hi)) => Some((lo.min(days), hi.max(days))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn assert_days(value: DurationValue, expected: f64) {
        match value {
            DurationValue::Days(days) => assert!(
                (days - expected).abs() < 1e-12,
                "expected {expected} days, got {days}"
            ),
            DurationValue::NotATime => panic!("expected a day value, got not-a-time"),
        }
    }

    #[test]
    fn std_durations_become_days() {
        assert_days(DurationValue::from_std(Duration::from_secs(86_400)), 1.0);
        assert_days(DurationValue::from_std(Duration::from_secs(6 * 3600)), 0.25);
        assert_days(DurationValue::from_std(Duration::from_millis(3)), 3.0 / 86_400.0 / 1000.0);
        assert_days(DurationValue::from_signed(true, Duration::from_secs(43_200)), -0.5);
    }

    #[test]
    fn integer_counts_honor_nat_marker() {
        assert_days(DurationValue::from_nanos(2 * 86_400 * 1_000_000_000), 2.0);
        assert_days(DurationValue::from_micros(-6 * 3600 * 1_000_000), -0.25);
        assert!(DurationValue::from_nanos(NAT_MARKER).is_nat());
        assert!(DurationValue::from_micros(NAT_MARKER).is_nat());
    }

    #[test]
    fn finite_days_rejects_non_finite_payloads() {
        assert_eq!(DurationValue::from_days(1.5).finite_days(), Ok(Some(1.5)));
        assert_eq!(DurationValue::NotATime.finite_days(), Ok(None));
        assert!(DurationValue::from_days(f64::INFINITY).finite_days().is_err());
        assert!(DurationValue::from_days(f64::NAN).finite_days().is_err());
    }

    #[test]
    fn to_std_rounds_to_microseconds() {
        let value = DurationValue::from_days(1.5);
        assert_eq!(value.to_std(), Some(Duration::from_secs(129_600)));
        assert_eq!(DurationValue::from_days(-0.5).to_std(), Some(Duration::from_secs(43_200)));
        assert_eq!(DurationValue::NotATime.to_std(), None);
    }

    #[test]
    fn split_micros_never_reports_negative_zero() {
        assert_eq!(DurationValue::split_micros(-1e-13), Some((false, 0)));
        assert_eq!(DurationValue::split_micros(-0.5), Some((true, 43_200_000_000)));
        assert_eq!(DurationValue::split_micros(f64::MAX), None);
    }

    #[test]
    fn split_micros_handles_large_finite_values() {
        let (negative, micros) = DurationValue::split_micros(-3e8).unwrap_or_else(|| panic!("3e8 days"));
        assert!(negative);
        assert_eq!(micros, 300_000_000 * 86_400_000_000_u128);
        assert_eq!(DurationValue::split_micros(1e30), None);
    }

    #[test]
    fn arrays_convert_and_skip_nat_for_limits() {
        let day = 86_400 * 1_000_000_000;
        let nanos = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![NAT_MARKER, day, 3 * day, -day])
            .unwrap_or_else(|err| panic!("bad shape: {err}"));
        let values = days_from_nanos(&nanos);
        assert_eq!(values.shape(), &[2, 2]);
        assert!(values[IxDyn(&[0, 0])].is_nat());
        assert_eq!(data_limits(&values), Some((-1.0, 3.0)));

        let empty = ArrayD::from_elem(IxDyn(&[3]), DurationValue::NotATime);
        assert_eq!(data_limits(&empty), None);
    }
}
