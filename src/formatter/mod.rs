//! Tick label formatting for duration axes.
//!
//! Every formatter is a pure function of the value and the [`Interval`] the
//! locator chose; there is no state carried between calls.

mod auto;
mod compact;
mod concise;
mod template;

pub use auto::AutoFormatter;
pub use compact::CompactFormatter;
pub use concise::ConciseFormatter;
pub use template::{strfdelta, Template, TemplateFormatter};

use crate::duration::DurationValue;
use crate::error::Result;
use crate::units::Interval;

/// Labels for a set of ticks plus an axis offset label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickLabels {
    /// One label per tick, in tick order.
    pub labels: Vec<String>,
    /// Offset subtracted from every tick before labelling; empty if none.
    pub offset: String,
}

/// Something that can label positions on a duration axis.
pub trait TickFormatter: std::fmt::Debug + Send + Sync {
    /// Label a single value, e.g. a tick or a cursor position.
    fn format(&self, value: DurationValue, interval: &Interval) -> Result<String>;

    /// Label a full set of ticks.
    fn format_ticks(&self, values: &[f64], interval: &Interval) -> Result<TickLabels> {
        let labels = values
            .iter()
            .map(|&days| self.format(DurationValue::Days(days), interval))
            .collect::<Result<Vec<_>>>()?;
        Ok(TickLabels {
            labels,
            offset: String::new(),
        })
    }
}
