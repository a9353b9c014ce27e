//! Full labels whose precision follows the tick interval.

use tracing::trace;

use super::template::snapped_micros;
use super::{Template, TickFormatter, TickLabels};
use crate::duration::DurationValue;
use crate::error::{Result, TimpleError};
use crate::units::{
    Interval, TimeUnit, HOURS_PER_DAY, MICROSECONDS_PER_DAY, MINUTES_PER_DAY, SECONDS_PER_DAY,
};

const DEFAULT_FALLBACK: &str = "%d %day, %h:%m";

/// Tick scale in days and the template used from that scale down.
const DEFAULT_SCALES: [(f64, &str); 6] = [
    (1.0, "%d %day"),
    (1.0 / HOURS_PER_DAY, "%d %day, %h:%m"),
    (1.0 / MINUTES_PER_DAY, "%d %day, %h:%m"),
    (1.0 / SECONDS_PER_DAY, "%d %day, %h:%m:%s"),
    (1e3 / MICROSECONDS_PER_DAY, "%d %day, %h:%m:%s.%ms"),
    (1.0 / MICROSECONDS_PER_DAY, "%d %day, %h:%m:%s.%ms%us"),
];

/// Picks a template from a scale table keyed by the tick resolution.
///
/// The scale of an interval is the length of its resolution unit in days,
/// or one millisecond for whole-millisecond steps. The first table entry at
/// or above that scale wins; past the largest entry the fallback template is
/// used. Ticks every 15 seconds read `1 day, 00:00:15`, ticks every day read
/// `1 day`.
#[derive(Debug, Clone)]
pub struct AutoFormatter {
    scaled: Vec<(f64, Template)>,
    fallback: Template,
    placeholder: String,
}

impl Default for AutoFormatter {
    fn default() -> Self {
        // The built-in table always parses.
        Self::from_table(&DEFAULT_SCALES, DEFAULT_FALLBACK)
            .unwrap_or_else(|_| unreachable!("default auto formats are valid"))
    }
}

impl AutoFormatter {
    /// Build from `(scale in days, template)` pairs and a fallback template.
    pub fn from_table(scales: &[(f64, &str)], fallback: &str) -> Result<Self> {
        let formatter = Self {
            scaled: Vec::with_capacity(scales.len()),
            fallback: Template::parse(fallback)?,
            placeholder: String::new(),
        };
        scales
            .iter()
            .try_fold(formatter, |formatter, &(scale, template)| {
                formatter.with_scale(scale, template)
            })
    }

    /// Add or replace the template used at `scale_days`.
    pub fn with_scale(mut self, scale_days: f64, template: &str) -> Result<Self> {
        if !scale_days.is_finite() || scale_days <= 0.0 {
            return Err(TimpleError::InvalidConfig(format!(
                "format scale must be a positive number of days, got {scale_days}"
            )));
        }
        let template = Template::parse(template)?;
        match self.scaled.iter_mut().find(|(scale, _)| same_scale(*scale, scale_days)) {
            Some(entry) => entry.1 = template,
            None => {
                self.scaled.push((scale_days, template));
                self.scaled.sort_by(|a, b| a.0.total_cmp(&b.0));
            },
        }
        Ok(self)
    }

    /// Label used for not-a-time values.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    fn interval_scale(interval: &Interval) -> f64 {
        match interval.resolution_unit() {
            TimeUnit::Microseconds if interval.fraction_digits() <= 3 => 1e3 / MICROSECONDS_PER_DAY,
            unit => unit.days(),
        }
    }

    fn template_for(&self, interval: &Interval) -> &Template {
        let scale = Self::interval_scale(interval);
        self.scaled
            .iter()
            .find(|(key, _)| *key >= scale || same_scale(*key, scale))
            .map_or(&self.fallback, |(_, template)| template)
    }
}

fn same_scale(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

impl TickFormatter for AutoFormatter {
    fn format(&self, value: DurationValue, interval: &Interval) -> Result<String> {
        match value.finite_days()? {
            Some(days) => self.template_for(interval).render(days),
            None => Ok(self.placeholder.clone()),
        }
    }

    fn format_ticks(&self, values: &[f64], interval: &Interval) -> Result<TickLabels> {
        let template = self.template_for(interval);
        let labels = values
            .iter()
            .map(|&days| snapped_micros(days, interval).map(|micros| template.render_signed(micros)))
            .collect::<Result<Vec<_>>>()?;
        trace!(%interval, template = template.as_str(), "auto tick labels");
        Ok(TickLabels {
            labels,
            offset: String::new(),
        })
    }
}
