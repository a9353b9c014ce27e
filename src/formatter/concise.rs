//! Short labels with the shared part moved into an axis offset.

use super::{TemplateFormatter, TickFormatter, TickLabels};
use crate::duration::DurationValue;
use crate::error::{Result, TimpleError};
use crate::units::{Interval, TimeUnit};

const DEFAULT_FORMATS: [&str; 5] = ["%d %day", "%H:00", "%H:%m", "%M:%s.0", "%S.%ms%us"];

const DEFAULT_OFFSETS: [(Option<&str>, Option<TimeUnit>); 5] = [
    (None, None),
    (Some("%d %day"), Some(TimeUnit::Days)),
    (Some("%d %day"), Some(TimeUnit::Days)),
    (Some("%d %day, %h:00"), Some(TimeUnit::Hours)),
    (Some("%d %day, %h:%m"), Some(TimeUnit::Minutes)),
];

/// Picks a compact template per tick level (days, hours, minutes, seconds,
/// microseconds) and moves the common leading part into the offset label.
///
/// Ticks every 3 minutes starting at 100 days 3:39 read `3:39`, `3:42`, ...
/// with an offset of `100 days`.
#[derive(Debug, Clone)]
pub struct ConciseFormatter {
    levels: Vec<TemplateFormatter>,
    show_offset: bool,
}

impl Default for ConciseFormatter {
    fn default() -> Self {
        // The built-in tables always parse.
        Self::with_formats(&DEFAULT_FORMATS, &DEFAULT_OFFSETS)
            .unwrap_or_else(|_| unreachable!("default concise formats are valid"))
    }
}

impl ConciseFormatter {
    /// Create a formatter from five tick templates and five
    /// `(offset template, offset level)` pairs, one per level.
    pub fn with_formats(
        formats: &[&str],
        offsets: &[(Option<&str>, Option<TimeUnit>)],
    ) -> Result<Self> {
        if formats.len() != TimeUnit::ALL.len() {
            return Err(TimpleError::InvalidConfig(format!(
                "concise formats need {} entries, got {}",
                TimeUnit::ALL.len(),
                formats.len()
            )));
        }
        if offsets.len() != TimeUnit::ALL.len() {
            return Err(TimpleError::InvalidConfig(format!(
                "concise offset formats need {} entries, got {}",
                TimeUnit::ALL.len(),
                offsets.len()
            )));
        }
        let levels = formats
            .iter()
            .zip(offsets)
            .map(|(fmt, &(offset_fmt, offset_on))| {
                TemplateFormatter::from_parts(fmt, offset_on, offset_fmt)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            levels,
            show_offset: true,
        })
    }

    /// Whether the offset label is reported.
    pub fn show_offset(mut self, show: bool) -> Self {
        self.show_offset = show;
        self
    }

    /// Label used for not-a-time values.
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.levels = self
            .levels
            .into_iter()
            .map(|level| level.with_placeholder(placeholder))
            .collect();
        self
    }

    fn level(&self, interval: &Interval) -> &TemplateFormatter {
        let unit = interval.resolution_unit();
        let index = TimeUnit::ALL.iter().position(|&u| u == unit).unwrap_or(0);
        &self.levels[index]
    }
}

impl TickFormatter for ConciseFormatter {
    fn format(&self, value: DurationValue, interval: &Interval) -> Result<String> {
        self.level(interval).format(value, interval)
    }

    fn format_ticks(&self, values: &[f64], interval: &Interval) -> Result<TickLabels> {
        let mut labels = self.level(interval).format_ticks(values, interval)?;
        if !self.show_offset {
            labels.offset.clear();
        }
        Ok(labels)
    }
}
