//! A locator and formatter bundled for one duration axis.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::config::{AxisConfig, FormatConfig};
use crate::duration::DurationValue;
use crate::error::{Result, TimpleError};
use crate::formatter::{AutoFormatter, CompactFormatter, ConciseFormatter, TickFormatter};
use crate::locator::{AutoLocator, TickLocator};
use crate::units::Interval;

/// View limits, in days, for an axis that has no data yet.
pub const DEFAULT_LIMITS: (f64, f64) = (1.0, 2.0);

/// Formatter family used by [`DurationAxis::with_style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisStyle {
    /// `[[[D:]HH:]MM:]SS[.ffffff]` labels.
    #[default]
    Compact,
    /// Short per-level labels with an offset.
    Concise,
    /// Full `1 day, 02:03` labels whose precision follows the interval.
    Template,
}

impl AxisStyle {
    /// All styles, in the order they are listed to users.
    pub const ALL: [AxisStyle; 3] = [AxisStyle::Compact, AxisStyle::Concise, AxisStyle::Template];

    /// Lowercase name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            AxisStyle::Compact => "compact",
            AxisStyle::Concise => "concise",
            AxisStyle::Template => "template",
        }
    }

    /// Build a formatter of this family.
    pub fn formatter(self, config: &FormatConfig) -> Result<Box<dyn TickFormatter>> {
        let placeholder = config.placeholder.as_str();
        Ok(match self {
            AxisStyle::Compact => Box::new(CompactFormatter::new(config.clone())?),
            AxisStyle::Concise => Box::new(ConciseFormatter::default().with_placeholder(placeholder)),
            AxisStyle::Template => Box::new(AutoFormatter::default().with_placeholder(placeholder)),
        })
    }
}

impl fmt::Display for AxisStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisStyle {
    type Err = TimpleError;

    fn from_str(s: &str) -> Result<Self> {
        AxisStyle::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TimpleError::InvalidConfig(format!("unknown axis style '{s}'")))
    }
}

/// One labelled tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position in days.
    pub value: f64,
    /// Text drawn at the position.
    pub label: String,
}

/// Everything needed to draw a duration axis for one view range.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    /// Ticks in increasing order.
    pub ticks: Vec<Tick>,
    /// Offset label; empty when the formatter uses none.
    pub offset: String,
    /// Interval the ticks were placed on.
    pub interval: Interval,
}

/// Locator and formatter acting together on a duration axis.
#[derive(Debug)]
pub struct DurationAxis {
    locator: Box<dyn TickLocator>,
    formatter: Box<dyn TickFormatter>,
}

impl DurationAxis {
    /// Pair an arbitrary locator and formatter.
    pub fn new(locator: Box<dyn TickLocator>, formatter: Box<dyn TickFormatter>) -> Self {
        Self { locator, formatter }
    }

    /// Automatic ticks with a formatter from the given family.
    pub fn with_style(style: AxisStyle, config: &AxisConfig) -> Result<Self> {
        config.validate()?;
        let locator = AutoLocator::new(config.locator.clone())?;
        let formatter = style.formatter(&config.format)?;
        debug!(%style, "built duration axis");
        Ok(Self::new(Box::new(locator), formatter))
    }

    /// Ticks and labels for the view range `[low, high]` in days.
    pub fn labels(&self, low: f64, high: f64) -> Result<AxisLabels> {
        let ticks = self.locator.tick_values(low, high)?;
        let labels = self.formatter.format_ticks(&ticks.values, &ticks.interval)?;
        let ticks_out = ticks
            .values
            .iter()
            .zip(labels.labels)
            .map(|(&value, label)| Tick { value, label })
            .collect();
        Ok(AxisLabels {
            ticks: ticks_out,
            offset: labels.offset,
            interval: ticks.interval,
        })
    }

    /// Label for an arbitrary position, e.g. under the cursor, using the
    /// interval the ticks of `[low, high]` are placed on.
    pub fn hover_label(&self, value: DurationValue, low: f64, high: f64) -> Result<String> {
        let interval = self.locator.tick_values(low, high)?.interval;
        self.formatter.format(value, &interval)
    }

    /// Limits to show before any data: [`DEFAULT_LIMITS`] made non-singular.
    pub fn default_limits(&self) -> Result<(f64, f64)> {
        let (low, high) = DEFAULT_LIMITS;
        self.locator.nonsingular(low, high)
    }
}

impl Default for DurationAxis {
    fn default() -> Self {
        Self::new(Box::new(AutoLocator::default()), Box::new(CompactFormatter::default()))
    }
}
