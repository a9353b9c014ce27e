//! Time unit conventions shared by locators and formatters.
//!
//! All duration values are fractional days: `1.0` is 24 hours, `0.25` is six
//! hours. Tick intervals are described in a [`TimeUnit`] plus a step size
//! within that unit.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TimpleError};

/// Hours in one day.
pub const HOURS_PER_DAY: f64 = 24.0;
/// Minutes in one hour.
pub const MINUTES_PER_HOUR: f64 = 60.0;
/// Seconds in one minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;
/// Minutes in one day.
pub const MINUTES_PER_DAY: f64 = MINUTES_PER_HOUR * HOURS_PER_DAY;
/// Seconds in one hour.
pub const SECONDS_PER_HOUR: f64 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR;
/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = SECONDS_PER_HOUR * HOURS_PER_DAY;
/// Microseconds in one day.
pub const MICROSECONDS_PER_DAY: f64 = 1e6 * SECONDS_PER_DAY;

pub(crate) const US_PER_SECOND: u64 = 1_000_000;
pub(crate) const US_PER_MINUTE: u64 = 60 * US_PER_SECOND;
pub(crate) const US_PER_HOUR: u64 = 60 * US_PER_MINUTE;
pub(crate) const US_PER_DAY: u64 = 24 * US_PER_HOUR;

/// Maximum number of fractional second digits (microsecond resolution).
pub const MAX_FRACTION_DIGITS: u8 = 6;

const HOUR_STEPS: &[f64] = &[1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 12.0, 24.0];
const SEXAGESIMAL_STEPS: &[f64] = &[1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 60.0];

/// Base unit of a tick interval, ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    /// Whole days.
    Days,
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    Seconds,
    /// Microseconds.
    Microseconds,
}

impl TimeUnit {
    /// Every supported unit, coarsest first.
    pub const ALL: [TimeUnit; 5] = [
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
        TimeUnit::Microseconds,
    ];

    /// How many of this unit fit in one day.
    pub fn per_day(self) -> f64 {
        match self {
            TimeUnit::Days => 1.0,
            TimeUnit::Hours => HOURS_PER_DAY,
            TimeUnit::Minutes => MINUTES_PER_DAY,
            TimeUnit::Seconds => SECONDS_PER_DAY,
            TimeUnit::Microseconds => MICROSECONDS_PER_DAY,
        }
    }

    /// Length of one unit in days.
    pub fn days(self) -> f64 {
        1.0 / self.per_day()
    }

    /// Length of one unit in microseconds.
    pub(crate) fn micros(self) -> u64 {
        match self {
            TimeUnit::Days => US_PER_DAY,
            TimeUnit::Hours => US_PER_HOUR,
            TimeUnit::Minutes => US_PER_MINUTE,
            TimeUnit::Seconds => US_PER_SECOND,
            TimeUnit::Microseconds => 1,
        }
    }

    /// Get the unit name.
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Days => "days",
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Microseconds => "microseconds",
        }
    }

    /// The next coarser unit, if any.
    pub fn coarser(self) -> Option<Self> {
        match self {
            TimeUnit::Days => None,
            TimeUnit::Hours => Some(TimeUnit::Days),
            TimeUnit::Minutes => Some(TimeUnit::Hours),
            TimeUnit::Seconds => Some(TimeUnit::Minutes),
            TimeUnit::Microseconds => Some(TimeUnit::Seconds),
        }
    }

    /// The "nice" step multipliers for this unit, smallest first.
    ///
    /// Days use an unbounded 1-2-5 decade sequence so that arbitrarily long
    /// spans still get a bounded number of ticks.
    pub fn steps(self) -> Steps {
        Steps {
            unit: self,
            index: 0,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = TimpleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            "hours" | "hour" | "h" => Ok(TimeUnit::Hours),
            "minutes" | "minute" | "min" => Ok(TimeUnit::Minutes),
            "seconds" | "second" | "s" => Ok(TimeUnit::Seconds),
            "microseconds" | "microsecond" | "us" => Ok(TimeUnit::Microseconds),
            _ => Err(TimpleError::unknown_unit(s)),
        }
    }
}

/// Iterator over the step palette of a [`TimeUnit`].
#[derive(Debug, Clone)]
pub struct Steps {
    unit: TimeUnit,
    index: usize,
}

impl Iterator for Steps {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let step = match self.unit {
            TimeUnit::Days => decade_step(self.index).filter(|s| s.is_finite()),
            TimeUnit::Hours => HOUR_STEPS.get(self.index).copied(),
            TimeUnit::Minutes | TimeUnit::Seconds => SEXAGESIMAL_STEPS.get(self.index).copied(),
            TimeUnit::Microseconds => decade_step(self.index).filter(|&s| s < 1e6),
        };
        self.index += 1;
        step
    }
}

/// 1, 2, 5, 10, 20, 50, ...
fn decade_step(index: usize) -> Option<f64> {
    let mantissa = [1.0, 2.0, 5.0][index % 3];
    let exponent = i32::try_from(index / 3).ok()?;
    Some(mantissa * 10f64.powi(exponent))
}

/// Spacing between consecutive ticks: a step size in a base unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Base unit.
    pub unit: TimeUnit,
    /// Number of base units between ticks.
    pub step: f64,
}

impl Interval {
    /// Create an interval, rejecting zero, negative and non-finite steps.
    pub fn new(unit: TimeUnit, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(TimpleError::InvalidInterval(format!(
                "step must be a positive finite number of {unit}, got {step}"
            )));
        }
        Ok(Self { unit, step })
    }

    /// A single base unit.
    pub fn unit(unit: TimeUnit) -> Self {
        Self { unit, step: 1.0 }
    }

    /// Interval length in days.
    pub fn days(&self) -> f64 {
        self.step / self.unit.per_day()
    }

    /// Interval length in microseconds.
    pub fn micros(&self) -> f64 {
        self.step * self.unit.micros() as f64
    }

    /// Promote an interval that is exactly one coarser unit (60 minutes, 24
    /// hours, ...) to that unit, repeatedly.
    pub fn normalized(self) -> Self {
        let mut current = self;
        while let Some(coarser) = current.unit.coarser() {
            let ratio = (coarser.micros() / current.unit.micros()) as f64;
            if (current.step - ratio).abs() > 1e-9 * ratio {
                break;
            }
            current = Interval::unit(coarser);
        }
        current
    }

    /// Step rounded to whole microseconds; `None` below one microsecond.
    /// Steps past the `u128` range saturate, which keeps them whole days.
    fn whole_micros(&self) -> Option<u128> {
        let micros = self.micros().round();
        (micros.is_finite() && micros >= 1.0).then(|| micros as u128)
    }

    /// Coarsest unit that divides the step exactly: 12 hours resolves to
    /// hours, 90 minutes to minutes, half a second to microseconds.
    pub fn resolution_unit(&self) -> TimeUnit {
        let Some(micros) = self.whole_micros() else {
            return TimeUnit::Microseconds;
        };
        if micros == u128::MAX {
            return TimeUnit::Days;
        }
        TimeUnit::ALL
            .into_iter()
            .find(|unit| micros % u128::from(unit.micros()) == 0)
            .unwrap_or(TimeUnit::Microseconds)
    }

    /// Number of decimal second digits needed to show the step exactly,
    /// capped at microseconds.
    pub fn fraction_digits(&self) -> u8 {
        let micros = self.micros();
        let Some(whole) = self.whole_micros() else {
            return MAX_FRACTION_DIGITS;
        };
        if (micros - micros.round()).abs() > 1e-6 {
            return MAX_FRACTION_DIGITS;
        }
        let mut frac = whole % u128::from(US_PER_SECOND);
        if frac == 0 || whole == u128::MAX {
            return 0;
        }
        let mut digits = MAX_FRACTION_DIGITS;
        while frac % 10 == 0 {
            frac /= 10;
            digits -= 1;
        }
        digits
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.step, self.unit)
    }
}
