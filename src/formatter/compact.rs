//! `[[[D:]HH:]MM:]SS[.ffffff]` labels.

use tracing::trace;

use super::TickFormatter;
use crate::config::FormatConfig;
use crate::duration::DurationValue;
use crate::error::{Result, TimpleError};
use crate::units::{Interval, TimeUnit, US_PER_DAY, US_PER_HOUR, US_PER_MINUTE, US_PER_SECOND};

/// Colon-separated fields, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    const ALL: [Field; 4] = [Field::Day, Field::Hour, Field::Minute, Field::Second];

    fn micros(self) -> u128 {
        u128::from(match self {
            Field::Day => US_PER_DAY,
            Field::Hour => US_PER_HOUR,
            Field::Minute => US_PER_MINUTE,
            Field::Second => US_PER_SECOND,
        })
    }

    /// Upper bound for the field when it is not the leading one.
    fn modulus(self) -> Option<u128> {
        match self {
            Field::Day => None,
            Field::Hour => Some(24),
            Field::Minute | Field::Second => Some(60),
        }
    }

    fn coarser(self) -> Self {
        match self {
            Field::Day | Field::Hour => Field::Day,
            Field::Minute => Field::Hour,
            Field::Second => Field::Minute,
        }
    }
}

/// What the context interval asks to be shown.
#[derive(Debug, Clone, Copy)]
struct Resolution {
    finest: Field,
    digits: u8,
}

impl Resolution {
    /// Rounding quantum in microseconds.
    fn quantum(&self) -> u128 {
        match self.finest {
            Field::Second => 10u128.pow(u32::from(6 - self.digits)),
            field => field.micros(),
        }
    }
}

/// Formats durations as `[[[D:]HH:]MM:]SS[.ffffff]`.
///
/// The interval sets the finest field and the fractional digits; leading
/// all-zero fields are dropped, but any sub-day label keeps at least two
/// fields. Values are rounded to the interval's resolution first.
#[derive(Debug, Clone, Default)]
pub struct CompactFormatter {
    config: FormatConfig,
}

impl CompactFormatter {
    /// Create a formatter, validating the precision cap.
    pub fn new(config: FormatConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn resolution(&self, interval: &Interval) -> Resolution {
        let finest = match interval.resolution_unit() {
            TimeUnit::Days => Field::Day,
            TimeUnit::Hours => Field::Hour,
            TimeUnit::Minutes => Field::Minute,
            TimeUnit::Seconds | TimeUnit::Microseconds => Field::Second,
        };
        let digits = if finest == Field::Second {
            interval.fraction_digits().min(self.config.precision)
        } else {
            0
        };
        Resolution { finest, digits }
    }

    fn render(&self, days: f64, resolution: Resolution) -> Result<String> {
        let (negative, micros) = DurationValue::split_micros(days)
            .ok_or_else(|| TimpleError::out_of_range("duration value", days))?;
        let quantum = resolution.quantum();
        let micros = (micros + quantum / 2) / quantum * quantum;

        let days_part = micros / US_PER_DAY as u128;
        let highest = Field::ALL
            .into_iter()
            .find(|field| micros >= field.micros())
            .unwrap_or(Field::Second);
        let leading = if resolution.finest == Field::Day {
            Field::Day
        } else {
            highest.min(resolution.finest.coarser())
        };

        let mut label = String::new();
        if negative && micros != 0 {
            label.push('-');
        }
        for field in Field::ALL {
            if field < leading || field > resolution.finest {
                continue;
            }
            let value = match field.modulus() {
                Some(modulus) => micros / field.micros() % modulus,
                None => days_part,
            };
            if field == leading {
                label.push_str(&value.to_string());
            } else {
                label.push_str(&format!(":{value:02}"));
            }
        }
        if resolution.finest == Field::Second && resolution.digits > 0 {
            let frac = micros % u128::from(US_PER_SECOND) / resolution.quantum();
            label.push_str(&format!(".{frac:0width$}", width = usize::from(resolution.digits)));
        }
        Ok(label)
    }

    /// Parse a label produced with the same interval back into a duration.
    ///
    /// Fields are aligned right, ending at the interval's finest field; the
    /// configured placeholder parses as not-a-time.
    pub fn parse(&self, label: &str, interval: &Interval) -> Result<DurationValue> {
        let text = label.trim();
        if text == self.config.placeholder.trim() {
            return Ok(DurationValue::NotATime);
        }
        let resolution = self.resolution(interval);
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (fields_text, fraction) = match body.split_once('.') {
            Some((fields, fraction)) => (fields, Some(fraction)),
            None => (body, None),
        };

        let parts: Vec<&str> = fields_text.split(':').collect();
        let finest_index = Field::ALL
            .iter()
            .position(|&f| f == resolution.finest)
            .unwrap_or(Field::ALL.len() - 1);
        if parts.len() > finest_index + 1 {
            return Err(TimpleError::parse(label, "too many fields for the interval"));
        }
        let first = finest_index + 1 - parts.len();

        let mut micros: u128 = 0;
        for (i, part) in parts.iter().enumerate() {
            let field = Field::ALL[first + i];
            let value: u128 = part
                .parse()
                .map_err(|_| TimpleError::parse(label, format!("'{part}' is not a number")))?;
            if i > 0 && field.modulus().is_some_and(|m| value >= m) {
                return Err(TimpleError::parse(label, format!("'{part}' is out of range")));
            }
            micros += value * field.micros();
        }

        if let Some(fraction) = fraction {
            if resolution.finest != Field::Second || fraction.is_empty() || fraction.len() > 6 {
                return Err(TimpleError::parse(label, "unexpected fractional seconds"));
            }
            let digits: u128 = fraction
                .parse()
                .map_err(|_| TimpleError::parse(label, format!("'{fraction}' is not a number")))?;
            micros += digits * 10u128.pow(6 - fraction.len() as u32);
        }

        let days = micros as f64 / US_PER_DAY as f64;
        Ok(DurationValue::Days(if negative { -days } else { days }))
    }
}

impl TickFormatter for CompactFormatter {
    fn format(&self, value: DurationValue, interval: &Interval) -> Result<String> {
        let Some(days) = value.finite_days()? else {
            return Ok(self.config.placeholder.clone());
        };
        let label = self.render(days, self.resolution(interval))?;
        trace!(days, %interval, %label, "formatted duration");
        Ok(label)
    }
}
