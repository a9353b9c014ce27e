//! `%`-code templates for durations and the template-driven formatter.
//!
//! The codes resemble `strftime` but are not compatible with it:
//!
//! | code   | meaning                                   | example (1 day 2:03:04.005006) |
//! |--------|-------------------------------------------|--------------------------------|
//! | `%d`   | whole days                                | `1`                            |
//! | `%H`   | total hours                               | `26`                           |
//! | `%M`   | total minutes                             | `1563`                         |
//! | `%S`   | total seconds                             | `93784`                        |
//! | `%h`   | hours within the day, two digits          | `02`                           |
//! | `%m`   | minutes within the hour, two digits       | `03`                           |
//! | `%s`   | seconds within the minute, two digits     | `04`                           |
//! | `%ms`  | milliseconds, three digits                | `005`                          |
//! | `%us`  | microseconds after the millisecond        | `006`                          |
//! | `%day` | `day` or `days` matching `%d`             | `day`                          |
//! | `%%`   | a literal `%`                             |                                |
//!
//! Codes may be braced (`%{d}`) to separate them from following letters.
//! Negative durations get a leading `-` on the whole label.

use tracing::trace;

use super::{TickFormatter, TickLabels};
use crate::duration::DurationValue;
use crate::error::{ensure_finite, Result, TimpleError};
use crate::units::{Interval, TimeUnit, US_PER_DAY, US_PER_HOUR, US_PER_MINUTE, US_PER_SECOND};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Code {
    Days,
    TotalHours,
    TotalMinutes,
    TotalSeconds,
    Hour,
    Minute,
    Second,
    Millis,
    Micros,
    DayWord,
}

impl Code {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "d" => Code::Days,
            "H" => Code::TotalHours,
            "M" => Code::TotalMinutes,
            "S" => Code::TotalSeconds,
            "h" => Code::Hour,
            "m" => Code::Minute,
            "s" => Code::Second,
            "ms" => Code::Millis,
            "us" => Code::Micros,
            "day" => Code::DayWord,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Code(Code),
}

/// A parsed duration template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    /// Parse a template, rejecting unknown or malformed codes.
    pub fn parse(source: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let name = match chars.peek().copied() {
                Some((_, '%')) => {
                    chars.next();
                    literal.push('%');
                    continue;
                },
                Some((_, '{')) => {
                    chars.next();
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, ch)) => name.push(ch),
                            None => {
                                return Err(TimpleError::invalid_format(source, "unclosed '%{'"))
                            },
                        }
                    }
                    name
                },
                Some((_, ch)) if ch.is_ascii_alphabetic() || ch == '_' => {
                    // Identifiers are greedy: "%day" is one code, not "%d" + "ay".
                    let mut name = String::new();
                    while let Some(&(_, ch)) = chars.peek() {
                        if !(ch.is_ascii_alphanumeric() || ch == '_') {
                            break;
                        }
                        name.push(ch);
                        chars.next();
                    }
                    name
                },
                other => {
                    let at = other.map_or(source.len(), |(i, _)| i);
                    return Err(TimpleError::invalid_format(
                        source,
                        format!("invalid placeholder before byte {at}"),
                    ));
                },
            };

            let code = Code::from_name(&name)
                .ok_or_else(|| TimpleError::invalid_format(source, format!("unknown code '%{name}'")))?;
            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            }
            parts.push(Part::Code(code));
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// The template text as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render a day value, rounded to microseconds.
    pub fn render(&self, days: f64) -> Result<String> {
        let days = ensure_finite("duration value", days)?;
        let (negative, micros) = DurationValue::split_micros(days)
            .ok_or_else(|| TimpleError::out_of_range("duration value", days))?;
        Ok(self.render_micros(negative, micros))
    }

    /// Render a signed microsecond count.
    pub(super) fn render_signed(&self, micros: i128) -> String {
        self.render_micros(micros < 0, micros.unsigned_abs())
    }

    fn render_micros(&self, negative: bool, micros: u128) -> String {
        let [us_day, us_hour, us_minute, us_second] =
            [US_PER_DAY, US_PER_HOUR, US_PER_MINUTE, US_PER_SECOND].map(u128::from);
        let whole_days = micros / us_day;
        let frac = micros % us_second;
        let mut out = String::new();
        if negative && micros != 0 {
            out.push('-');
        }
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Code(code) => {
                    let text = match code {
                        Code::Days => whole_days.to_string(),
                        Code::TotalHours => (micros / us_hour).to_string(),
                        Code::TotalMinutes => (micros / us_minute).to_string(),
                        Code::TotalSeconds => (micros / us_second).to_string(),
                        Code::Hour => format!("{:02}", micros % us_day / us_hour),
                        Code::Minute => format!("{:02}", micros % us_hour / us_minute),
                        Code::Second => format!("{:02}", micros % us_minute / us_second),
                        Code::Millis => format!("{:03}", frac / 1000),
                        Code::Micros => format!("{:03}", frac % 1000),
                        Code::DayWord => String::from(if whole_days == 1 { "day" } else { "days" }),
                    };
                    out.push_str(&text);
                },
            }
        }
        out
    }
}

/// Render `days` with a template string in one go.
///
/// ```
/// assert_eq!(timple::formatter::strfdelta(2.25, "%d %day, %h:%m").unwrap(), "2 days, 06:00");
/// ```
pub fn strfdelta(days: f64, template: &str) -> Result<String> {
    Template::parse(template)?.render(days)
}

/// How tick values are offset before labelling.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Offset {
    on: TimeUnit,
    template: Option<Template>,
}

/// Labels ticks with a fixed [`Template`].
///
/// With an offset level (days, hours, minutes or seconds), `format_ticks`
/// subtracts the smallest tick floored to that level from every tick, so
/// `100 days, 03:40` and `100 days, 03:45` become `40` and `45` with an
/// offset label of `100 days, 03:00`.
#[derive(Debug, Clone)]
pub struct TemplateFormatter {
    template: Template,
    offset: Option<Offset>,
    placeholder: String,
}

impl TemplateFormatter {
    /// Create a formatter for `template` with no offset.
    pub fn new(template: &str) -> Result<Self> {
        Ok(Self {
            template: Template::parse(template)?,
            offset: None,
            placeholder: String::new(),
        })
    }

    /// Build from optional offset settings; an offset template without an
    /// offset level is rejected.
    pub fn from_parts(
        template: &str,
        offset_on: Option<TimeUnit>,
        offset_template: Option<&str>,
    ) -> Result<Self> {
        let formatter = Self::new(template)?;
        match (offset_on, offset_template) {
            (None, None) => Ok(formatter),
            (None, Some(_)) => Err(TimpleError::InvalidConfig(
                "an offset template requires an offset level".to_string(),
            )),
            (Some(on), offset_template) => formatter.with_offset(on, offset_template),
        }
    }

    /// Offset ticks on `on`; `template` formats the offset label, `None`
    /// applies the offset without showing it.
    pub fn with_offset(mut self, on: TimeUnit, template: Option<&str>) -> Result<Self> {
        if on == TimeUnit::Microseconds {
            return Err(TimpleError::InvalidConfig(
                "offsets apply on days, hours, minutes or seconds".to_string(),
            ));
        }
        self.offset = Some(Offset {
            on,
            template: template.map(Template::parse).transpose()?,
        });
        Ok(self)
    }

    /// Label used for not-a-time values.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Smallest tick floored to the offset level, in microseconds.
    fn offset_for(on: TimeUnit, ticks: &[i128]) -> Option<i128> {
        let level = i128::from(on.micros());
        let reference = ticks.iter().copied().min()?;
        Some(reference.div_euclid(level) * level)
    }
}

/// Tick position in microseconds, snapped to the interval resolution.
pub(super) fn snapped_micros(days: f64, interval: &Interval) -> Result<i128> {
    let days = ensure_finite("tick value", days)?;
    let out_of_range = || TimpleError::out_of_range("tick value", days);
    let (negative, micros) = DurationValue::split_micros(days).ok_or_else(out_of_range)?;
    let quantum = u128::from(interval.resolution_unit().micros());
    let snapped =
        i128::try_from((micros + quantum / 2) / quantum * quantum).map_err(|_| out_of_range())?;
    Ok(if negative { -snapped } else { snapped })
}

impl TickFormatter for TemplateFormatter {
    fn format(&self, value: DurationValue, _interval: &Interval) -> Result<String> {
        match value.finite_days()? {
            Some(days) => self.template.render(days),
            None => Ok(self.placeholder.clone()),
        }
    }

    fn format_ticks(&self, values: &[f64], interval: &Interval) -> Result<TickLabels> {
        let ticks = values
            .iter()
            .map(|&days| snapped_micros(days, interval))
            .collect::<Result<Vec<_>>>()?;
        let Some(offset) = &self.offset else {
            let labels = ticks
                .iter()
                .map(|&micros| self.template.render_signed(micros))
                .collect();
            return Ok(TickLabels {
                labels,
                offset: String::new(),
            });
        };

        let Some(shift) = Self::offset_for(offset.on, &ticks) else {
            return Ok(TickLabels::default());
        };
        let labels = ticks
            .iter()
            .map(|&micros| {
                micros
                    .checked_sub(shift)
                    .map(|shifted| self.template.render_signed(shifted))
                    .ok_or_else(|| {
                        TimpleError::out_of_range("tick value", micros as f64 / US_PER_DAY as f64)
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let offset_label = match &offset.template {
            Some(template) => template.render_signed(shift),
            None => String::new(),
        };
        trace!(%interval, shift = %shift, offset = %offset_label, "offset tick labels");
        Ok(TickLabels {
            labels,
            offset: offset_label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::SECONDS_PER_DAY;

    fn render(days: f64, template: &str) -> String {
        strfdelta(days, template).unwrap_or_else(|err| panic!("{template}: {err}"))
    }

    #[test]
    fn strfdelta_cases() {
        let cases = [
            (1.0, "%d %day, %h:%m", "1 day, 00:00"),
            (2.25, "%d %day, %h:%m", "2 days, 06:00"),
            (362.0 / SECONDS_PER_DAY, "%h:%m:%s.%ms", "00:06:02.000"),
            (1250e-6 / SECONDS_PER_DAY, "%s.%ms%us", "00.001250"),
            (-0.25, "%h:%m", "-06:00"),
            (-1.5, "%d %day, %h:%m", "-1 day, 12:00"),
            (2.0, "%H hours", "48 hours"),
            (0.25, "%M min", "360 min"),
            (362.13 / SECONDS_PER_DAY, "%S.%ms", "362.130"),
        ];
        for (days, template, expected) in cases {
            assert_eq!(render(days, template), expected, "{template}");
        }
    }

    #[test]
    fn totals_are_not_consumed_by_days() {
        assert_eq!(render(1.5, "%H|%M|%S"), "36|2160|129600");
    }

    #[test]
    fn escapes_and_braces() {
        assert_eq!(render(0.5, "100%% at %{H}h"), "100% at 12h");
        assert_eq!(render(3.0, "%{d}d"), "3d");
    }

    #[test]
    fn malformed_templates_are_rejected() {
        for bad in ["%days", "%x", "%", "%{d", "%1", "50% off"] {
            assert!(
                matches!(Template::parse(bad), Err(TimpleError::InvalidFormat { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn non_finite_values_fail() {
        assert!(strfdelta(f64::NAN, "%d").is_err());
        assert!(strfdelta(f64::INFINITY, "%d").is_err());
    }

    #[test]
    fn large_finite_values_render() {
        assert_eq!(render(3e8, "%d %day"), "300000000 days");
        assert_eq!(render(3e8, "%S"), "25920000000000");
        assert!(matches!(strfdelta(1e300, "%d"), Err(TimpleError::OutOfRange { .. })));

        let formatter = TemplateFormatter::new("%d").unwrap_or_else(|err| panic!("{err}"));
        let labels = formatter
            .format_ticks(&[0.0, 5e8, 1e9], &Interval { unit: TimeUnit::Days, step: 5e8 })
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(labels.labels, vec!["0", "500000000", "1000000000"]);
    }

    #[test]
    fn offset_on_days_strips_whole_days() {
        let formatter = TemplateFormatter::new("%H:%m")
            .and_then(|f| f.with_offset(TimeUnit::Days, Some("%d %day")))
            .unwrap_or_else(|err| panic!("{err}"));
        let values: Vec<f64> = (0..4).map(|i| 100.0 + f64::from(i) * 4.0 / 24.0).collect();
        let interval = Interval { unit: TimeUnit::Hours, step: 4.0 };
        let labels = formatter.format_ticks(&values, &interval).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(labels.labels, vec!["0:00", "4:00", "8:00", "12:00"]);
        assert_eq!(labels.offset, "100 days");
    }

    #[test]
    fn hidden_offset_still_shifts_values() {
        let formatter = TemplateFormatter::new("%M")
            .and_then(|f| f.with_offset(TimeUnit::Hours, None))
            .unwrap_or_else(|err| panic!("{err}"));
        let values = [1.0 + 1.0 / 24.0 + 5.0 / 1440.0, 1.0 + 1.0 / 24.0 + 10.0 / 1440.0];
        let labels = formatter
            .format_ticks(&values, &Interval::unit(TimeUnit::Minutes))
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(labels.labels, vec!["5", "10"]);
        assert_eq!(labels.offset, "");
    }

    #[test]
    fn offset_template_requires_offset_level() {
        assert!(TemplateFormatter::from_parts("%d", None, Some("%d")).is_err());
        assert!(TemplateFormatter::from_parts("%d", Some(TimeUnit::Microseconds), None).is_err());
        assert!(TemplateFormatter::from_parts("%d", Some(TimeUnit::Days), Some("%d")).is_ok());
    }

    #[test]
    fn not_a_time_uses_placeholder() {
        let formatter = TemplateFormatter::new("%d")
            .map(|f| f.with_placeholder("--"))
            .unwrap_or_else(|err| panic!("{err}"));
        let label = formatter.format(DurationValue::NotATime, &Interval::unit(TimeUnit::Days));
        assert_eq!(label, Ok("--".to_string()));
    }
}
