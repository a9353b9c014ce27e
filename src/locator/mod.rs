//! Tick location for duration axes.
//!
//! A locator turns a view range (in days) into tick positions that fall on
//! round multiples of a time unit, together with the [`Interval`] it used so
//! a formatter can label them consistently.

mod auto;
mod fixed;

pub use auto::AutoLocator;
pub use fixed::FixedLocator;

use crate::error::{ensure_finite, Result};
use crate::units::{Interval, TimeUnit, MICROSECONDS_PER_DAY, US_PER_DAY};

/// Tolerance when snapping a range bound onto a multiple of the step.
const SNAP_EPSILON: f64 = 1e-9;

/// Largest multiple index that is still exact in an `f64`.
const MAX_EXACT_INDEX: f64 = 9_007_199_254_740_992.0;

/// Tick positions plus the interval that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    /// Strictly increasing tick positions in days.
    pub values: Vec<f64>,
    /// Interval between ticks; the formatting context for their labels.
    pub interval: Interval,
}

/// Something that can place ticks on a duration axis.
pub trait TickLocator: std::fmt::Debug + Send + Sync {
    /// Tick positions for the view range `[vmin, vmax]` in days.
    ///
    /// Reversed ranges are swapped; non-finite bounds fail.
    fn tick_values(&self, vmin: f64, vmax: f64) -> Result<Ticks>;

    /// Adjust proposed view limits so they are ordered and not singular.
    fn nonsingular(&self, vmin: f64, vmax: f64) -> Result<(f64, f64)>;
}

/// Validate and order a view range.
pub(crate) fn ordered_range(vmin: f64, vmax: f64) -> Result<(f64, f64)> {
    let vmin = ensure_finite("view range lower bound", vmin)?;
    let vmax = ensure_finite("view range upper bound", vmax)?;
    if vmax < vmin {
        Ok((vmax, vmin))
    } else {
        Ok((vmin, vmax))
    }
}

/// Whether a span is too small to hold even one microsecond step.
pub(crate) fn is_degenerate(span: f64) -> bool {
    span <= 0.0 || span * MICROSECONDS_PER_DAY < 1.0
}

/// Smallest step, in days, whose multiples near `low` and `high` are still
/// spaced evenly at `f64` resolution.
pub(crate) fn min_resolvable_step(low: f64, high: f64) -> f64 {
    low.abs().max(high.abs()) * f64::EPSILON * 4.0
}

/// Ticks for a zero-width range: one tick at `low`, with the coarsest unit
/// that represents it exactly as context.
pub(crate) fn single_tick(low: f64) -> Ticks {
    let micros = (low.abs() * US_PER_DAY as f64).round();
    let unit = if micros.is_finite() && micros < u128::MAX as f64 {
        let micros = micros as u128;
        TimeUnit::ALL
            .into_iter()
            .find(|unit| micros % u128::from(unit.micros()) == 0)
            .unwrap_or(TimeUnit::Microseconds)
    } else {
        TimeUnit::Days
    };
    Ticks {
        values: vec![low],
        interval: Interval::unit(unit),
    }
}

/// Index range `(first, last)` of step multiples covering `[low, high]`:
/// the first multiple at or above `low` through the first at or above `high`.
///
/// Returns `None` when the indices are not exactly representable.
pub(crate) fn multiple_range(low: f64, high: f64, step_days: f64) -> Option<(f64, f64)> {
    let first = (low / step_days - SNAP_EPSILON).ceil();
    let last = (high / step_days - SNAP_EPSILON).ceil();
    let exact = |i: f64| i.is_finite() && i.abs() < MAX_EXACT_INDEX;
    (exact(first) && exact(last)).then_some((first, last))
}

/// Number of ticks [`emit_multiples`] would produce.
pub(crate) fn multiple_count(low: f64, high: f64, step_days: f64) -> Option<usize> {
    let (first, last) = multiple_range(low, high, step_days)?;
    let count = (last - first + 1.0).max(2.0);
    (count < usize::MAX as f64).then_some(count as usize)
}

/// Consecutive multiples of `step_days` covering `[low, high]`.
///
/// At least two ticks are emitted for a non-degenerate range; when only one
/// multiple falls inside, the one just below `low` is added.
pub(crate) fn emit_multiples(low: f64, high: f64, step_days: f64) -> Option<Vec<f64>> {
    let (first, last) = multiple_range(low, high, step_days)?;
    let first = if last - first < 1.0 { last - 1.0 } else { first };

    let mut values = Vec::with_capacity((last - first + 1.0) as usize);
    let mut index = first;
    while index <= last {
        let value = index * step_days;
        if values.last().map_or(true, |&prev| value > prev) {
            values.push(value);
        }
        index += 1.0;
    }
    Some(values)
}
