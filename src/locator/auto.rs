//! Automatic unit and step selection.

use tracing::{debug, warn};

use super::{
    emit_multiples, is_degenerate, min_resolvable_step, multiple_count, ordered_range, single_tick,
    TickLocator, Ticks,
};
use crate::config::LocatorConfig;
use crate::error::{ensure_finite, Result};
use crate::units::{Interval, TimeUnit};

/// Picks the coarsest unit and the roundest step that give roughly
/// `target_ticks` ticks over the view range.
#[derive(Debug, Clone, Default)]
pub struct AutoLocator {
    config: LocatorConfig,
}

impl AutoLocator {
    /// Create a locator, validating the density settings.
    pub fn new(config: LocatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The locator configuration.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Coarsest unit in which `span` holds at least `target_ticks` units.
    fn base_unit(&self, span: f64) -> TimeUnit {
        let target = self.config.target_ticks as f64;
        TimeUnit::ALL
            .into_iter()
            .find(|unit| span * unit.per_day() >= target)
            .unwrap_or(TimeUnit::Microseconds)
    }

    /// Candidate intervals in increasing size: the palette of `unit`, then
    /// the palettes of every coarser unit.
    fn candidates(&self, unit: TimeUnit) -> impl Iterator<Item = Interval> + '_ {
        std::iter::successors(Some(unit), |u| u.coarser()).flat_map(move |u| {
            self.config
                .palette(u)
                .map(move |step| Interval { unit: u, step })
        })
    }

    /// Whether `interval` keeps the number of whole steps within the target.
    fn fits_target(&self, span: f64, interval: &Interval) -> bool {
        (span / interval.days()).floor() <= self.config.target_ticks as f64
    }

    /// The interval that would be used for a range of width `span` days.
    pub fn interval_for_span(&self, span: f64) -> Result<Interval> {
        let span = ensure_finite("view span", span)?.abs();
        if is_degenerate(span) {
            return Ok(Interval::unit(TimeUnit::Microseconds));
        }
        let interval = self
            .candidates(self.base_unit(span))
            .find(|interval| self.fits_target(span, interval))
            .unwrap_or(Interval::unit(TimeUnit::Days));
        Ok(interval.normalized())
    }

    fn select(&self, low: f64, high: f64) -> Option<(Interval, Vec<f64>)> {
        let span = high - low;
        // Finer steps than this collapse onto repeated values far from zero.
        let finest = min_resolvable_step(low, high);
        let interval = self.candidates(self.base_unit(span)).find(|interval| {
            let max_ticks = self.config.max_ticks_for(interval.unit);
            interval.days() >= finest
                && self.fits_target(span, interval)
                && multiple_count(low, high, interval.days()).is_some_and(|n| n <= max_ticks)
        })?;
        let values = emit_multiples(low, high, interval.days())?;
        Some((interval.normalized(), values))
    }
}

impl TickLocator for AutoLocator {
    fn tick_values(&self, vmin: f64, vmax: f64) -> Result<Ticks> {
        let (low, high) = ordered_range(vmin, vmax)?;
        if is_degenerate(high - low) {
            return Ok(single_tick(low));
        }

        match self.select(low, high) {
            Some((interval, values)) => {
                debug!(%interval, ticks = values.len(), low, high, "located duration ticks");
                Ok(Ticks { values, interval })
            },
            None => {
                warn!(low, high, "tick step overflow, falling back to range bounds");
                Ok(Ticks {
                    values: vec![low, high],
                    interval: Interval::unit(TimeUnit::Days),
                })
            },
        }
    }

    fn nonsingular(&self, vmin: f64, vmax: f64) -> Result<(f64, f64)> {
        let (low, high) = ordered_range(vmin, vmax)?;
        if low == high {
            // Zero-width views open up to a four day window.
            return Ok((low - 2.0, high + 2.0));
        }
        Ok((low, high))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{MICROSECONDS_PER_DAY, SECONDS_PER_DAY};

    fn locate(low: f64, high: f64) -> Ticks {
        AutoLocator::default()
            .tick_values(low, high)
            .unwrap_or_else(|err| panic!("locate({low}, {high}) failed: {err}"))
    }

    fn assert_well_formed(ticks: &Ticks, low: f64, high: f64) {
        let step = ticks.interval.days();
        assert!(!ticks.values.is_empty());
        assert!(ticks.values.len() <= 20, "too many ticks: {}", ticks.values.len());
        for pair in ticks.values.windows(2) {
            assert!(pair[0] < pair[1], "not strictly increasing: {:?}", ticks.values);
        }
        for &v in &ticks.values {
            assert!(v.is_finite());
            assert!(v >= low - step - 1e-12 && v <= high + step + 1e-12, "{v} outside range");
        }
    }

    #[test]
    fn ten_days_ticks_every_two_days() {
        let ticks = locate(0.0, 10.0);
        assert_eq!(ticks.interval, Interval { unit: TimeUnit::Days, step: 2.0 });
        assert_eq!(ticks.values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn three_minute_span_uses_seconds() {
        let ticks = locate(0.0, 0.002);
        assert_eq!(ticks.interval, Interval { unit: TimeUnit::Seconds, step: 20.0 });
        assert_eq!(ticks.values.first(), Some(&0.0));
        let last = ticks.values.last().copied().unwrap_or_default();
        assert!((last * SECONDS_PER_DAY - 180.0).abs() < 1e-6);
        assert_well_formed(&ticks, 0.0, 0.002);
    }

    #[test]
    fn ninety_minutes_ticks_every_quarter_hour() {
        let ticks = locate(0.0, 90.0 / 1440.0);
        assert_eq!(ticks.interval, Interval { unit: TimeUnit::Minutes, step: 15.0 });
        assert_eq!(ticks.values.len(), 7);
    }

    #[test]
    fn one_day_ticks_every_three_hours() {
        let ticks = locate(1.0, 2.0);
        assert_eq!(ticks.interval, Interval { unit: TimeUnit::Hours, step: 3.0 });
        assert_eq!(ticks.values.len(), 9);
    }

    #[test]
    fn hour_multiple_of_a_day_is_promoted() {
        // 7.5 days is too short for day ticks but 24 hours is the step chosen
        let ticks = locate(0.0, 7.5);
        assert_eq!(ticks.interval, Interval::unit(TimeUnit::Days));
        assert_eq!(ticks.values, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn zero_width_range_yields_single_tick() {
        let ticks = locate(5.0, 5.0);
        assert_eq!(ticks.values, vec![5.0]);
        assert_eq!(ticks.interval.unit, TimeUnit::Days);
    }

    #[test]
    fn reversed_range_is_swapped() {
        assert_eq!(locate(10.0, 0.0), locate(0.0, 10.0));
    }

    #[test]
    fn non_finite_bounds_fail() {
        let locator = AutoLocator::default();
        assert!(locator.tick_values(f64::NAN, 1.0).is_err());
        assert!(locator.tick_values(0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn repeated_queries_are_identical() {
        let locator = AutoLocator::default();
        let a = locator.tick_values(100.15, 100.17);
        let b = locator.tick_values(100.15, 100.17);
        assert_eq!(a, b);
    }

    #[test]
    fn ranges_across_scales_are_well_formed() {
        let ranges = [
            (0.0, 1e-9),
            (0.0, 3e-8),
            (100.0, 100.0 + 1500e-6 / SECONDS_PER_DAY),
            (100.0, 100.0 + 40.0 / SECONDS_PER_DAY),
            (100.0, 100.0 + 20.0 / 1440.0),
            (100.0, 100.0 + 40.0 / 24.0),
            (100.0, 241.0),
            (-3.3, 7.7),
            (-1e7, 1e7),
            (0.0, 1e15),
        ];
        for (low, high) in ranges {
            let ticks = locate(low, high);
            assert_well_formed(&ticks, low, high);
            if high - low > ticks.interval.days() {
                assert!(ticks.values.len() >= 2, "{low}..{high}: {:?}", ticks.values);
            }
        }
    }

    #[test]
    fn sub_microsecond_span_is_degenerate() {
        let ticks = locate(1.0, 1.0 + 1e-13);
        assert_eq!(ticks.values, vec![1.0]);
    }

    #[test]
    fn doubling_density_at_most_triples_tick_count() {
        let sparse = AutoLocator::new(LocatorConfig {
            target_ticks: 4,
            ..LocatorConfig::default()
        })
        .unwrap_or_else(|err| panic!("{err}"));
        let dense = AutoLocator::new(LocatorConfig::default()).unwrap_or_else(|err| panic!("{err}"));
        for (low, high) in [(0.0, 0.5), (0.0, 10.0), (0.0, 0.01)] {
            let a = sparse.tick_values(low, high).map(|t| t.values.len()).unwrap_or(0);
            let b = dense.tick_values(low, high).map(|t| t.values.len()).unwrap_or(0);
            assert!(b >= a && b <= 3 * a, "{low}..{high}: {a} -> {b}");
        }
    }

    #[test]
    fn interval_for_span_matches_located_interval() {
        let locator = AutoLocator::default();
        assert_eq!(locator.interval_for_span(10.0), Ok(Interval { unit: TimeUnit::Days, step: 2.0 }));
        assert_eq!(locator.interval_for_span(-10.0), locator.interval_for_span(10.0));
        assert!(locator.interval_for_span(f64::INFINITY).is_err());
    }

    #[test]
    fn nonsingular_widens_zero_width_range() {
        let locator = AutoLocator::default();
        assert_eq!(locator.nonsingular(3.0, 3.0), Ok((1.0, 5.0)));
        assert_eq!(locator.nonsingular(4.0, 1.0), Ok((1.0, 4.0)));
        assert!(locator.nonsingular(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn overflowing_range_falls_back_to_bounds() {
        let ticks = locate(-f64::MAX, f64::MAX);
        assert_eq!(ticks.values, vec![-f64::MAX, f64::MAX]);
        assert_eq!(ticks.interval, Interval::unit(TimeUnit::Days));
        assert!(ticks.values.iter().all(|v| (-f64::MAX..=f64::MAX).contains(v)));
    }

    #[test]
    fn exhausted_palette_falls_back_to_bounds() {
        let locator = AutoLocator::new(LocatorConfig::default().with_steps(TimeUnit::Days, [1.0]))
            .unwrap_or_else(|err| panic!("{err}"));
        let ticks = locator.tick_values(0.0, 1e12).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(ticks.values, vec![0.0, 1e12]);
        assert_eq!(ticks.interval, Interval::unit(TimeUnit::Days));
    }

    #[test]
    fn steps_stay_resolvable_far_from_zero() {
        let low = 63_627.1;
        let high = low + 10.0 / MICROSECONDS_PER_DAY;
        let ticks = locate(low, high);
        assert_eq!(ticks.interval, Interval { unit: TimeUnit::Microseconds, step: 5.0 });
        assert!(ticks.interval.days() >= min_resolvable_step(low, high));
        assert_well_formed(&ticks, low, high);
    }

    #[test]
    fn step_palette_can_be_overridden() {
        let config = LocatorConfig::default().with_steps(TimeUnit::Hours, [6.0, 12.0]);
        let locator = AutoLocator::new(config).unwrap_or_else(|err| panic!("{err}"));
        let ticks = locator.tick_values(1.0, 2.0).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(ticks.interval, Interval { unit: TimeUnit::Hours, step: 6.0 });
        assert_eq!(ticks.values.len(), 5);
    }

    #[test]
    fn per_unit_tick_cap_skips_dense_steps() {
        let config = LocatorConfig::default().with_unit_max_ticks(TimeUnit::Hours, 4);
        let locator = AutoLocator::new(config).unwrap_or_else(|err| panic!("{err}"));
        let ticks = locator.tick_values(1.0, 2.0).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(ticks.interval, Interval { unit: TimeUnit::Hours, step: 8.0 });
        assert_eq!(ticks.values.len(), 4);
    }
}
