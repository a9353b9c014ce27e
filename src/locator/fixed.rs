//! Ticks at a caller-chosen interval.

use tracing::{debug, warn};

use super::{
    emit_multiples, is_degenerate, min_resolvable_step, multiple_count, ordered_range, single_tick,
    TickLocator, Ticks,
};
use crate::config::LocatorConfig;
use crate::error::Result;
use crate::units::{Interval, TimeUnit};

/// Places ticks every `step` units, e.g. every 20 seconds or every 2 days.
///
/// When the view is so wide that the fixed step would exceed `max_ticks`, or
/// so far from zero that neighbouring ticks would round together, the step is
/// widened by the smallest integer factor that fits.
#[derive(Debug, Clone)]
pub struct FixedLocator {
    interval: Interval,
    max_ticks: usize,
}

impl FixedLocator {
    /// Create a locator ticking every `step` of `unit`.
    pub fn new(unit: TimeUnit, step: f64) -> Result<Self> {
        Ok(Self {
            interval: Interval::new(unit, step)?,
            max_ticks: LocatorConfig::default().max_ticks,
        })
    }

    /// Override the tick cap.
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks.max(2);
        self
    }

    /// The configured interval.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Smallest multiple of the configured interval that respects the cap.
    fn widened(&self, low: f64, high: f64) -> Option<Interval> {
        let base = self.interval;
        let usable = (self.max_ticks - 1) as f64;
        let capped = ((high - low) / base.days() / usable).ceil();
        let mut factor = (min_resolvable_step(low, high) / base.days()).ceil().max(1.0);
        loop {
            let candidate = Interval {
                unit: base.unit,
                step: base.step * factor,
            };
            if !candidate.days().is_finite() {
                return None;
            }
            match multiple_count(low, high, candidate.days()) {
                Some(n) if n <= self.max_ticks => return Some(candidate),
                Some(_) => factor = (factor + 1.0).max(capped),
                None => return None,
            }
        }
    }
}

impl TickLocator for FixedLocator {
    fn tick_values(&self, vmin: f64, vmax: f64) -> Result<Ticks> {
        let (low, high) = ordered_range(vmin, vmax)?;
        if is_degenerate(high - low) {
            let mut ticks = single_tick(low);
            ticks.interval = self.interval;
            return Ok(ticks);
        }

        let located = self
            .widened(low, high)
            .and_then(|interval| Some((interval, emit_multiples(low, high, interval.days())?)));
        match located {
            Some((interval, values)) => {
                if interval != self.interval {
                    debug!(%interval, configured = %self.interval, "widened fixed tick interval");
                }
                Ok(Ticks { values, interval })
            },
            None => {
                warn!(low, high, "tick step overflow, falling back to range bounds");
                Ok(Ticks {
                    values: vec![low, high],
                    interval: self.interval,
                })
            },
        }
    }

    fn nonsingular(&self, vmin: f64, vmax: f64) -> Result<(f64, f64)> {
        let (low, high) = ordered_range(vmin, vmax)?;
        if is_degenerate(high - low) {
            let pad = 2.0 * self.interval.days();
            return Ok((low - pad, high + pad));
        }
        Ok((low, high))
    }
}
