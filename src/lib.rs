//! Timple - tick placement and labels for duration axes.
//!
//! Timple picks tick positions for an axis whose values are elapsed times
//! (stored as fractional days) and turns them into readable labels such as
//! `3:05`, `1:12` or `2 days, 06:00`.
//!
//! # Features
//!
//! - Automatic tick intervals on round day, hour, minute, second and microsecond steps
//! - Fixed intervals with a tick cap
//! - Compact `[[[D:]HH:]MM:]SS[.ffffff]` labels that parse back to values
//! - `%`-code templates and concise labels with an axis offset
//! - Batch conversion of nanosecond arrays with not-a-time markers
//!
//! # Example
//!
//! ```
//! use timple::DurationAxis;
//!
//! let axis = DurationAxis::default();
//! let labels = axis.labels(0.0, 10.0)?;
//! let text: Vec<&str> = labels.ticks.iter().map(|tick| tick.label.as_str()).collect();
//! assert_eq!(text, ["0", "2", "4", "6", "8", "10"]);
//! # Ok::<(), timple::TimpleError>(())
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod axis;
pub mod config;
pub mod duration;
pub mod error;
pub mod formatter;
pub mod locator;
pub mod units;

pub use axis::{AxisLabels, AxisStyle, DurationAxis, Tick, DEFAULT_LIMITS};
pub use config::{AxisConfig, FormatConfig, LocatorConfig};
pub use duration::DurationValue;
pub use error::{Result, TimpleError};
pub use formatter::{
    AutoFormatter, CompactFormatter, ConciseFormatter, TemplateFormatter, TickFormatter, TickLabels,
};
pub use locator::{AutoLocator, FixedLocator, TickLocator, Ticks};
pub use units::{Interval, TimeUnit};
