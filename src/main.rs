//! Timple - print tick positions and labels for a duration axis.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use timple::{
    AxisConfig, AxisStyle, DurationAxis, DurationValue, FormatConfig, Interval, LocatorConfig,
    TimeUnit,
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use unicode_width::UnicodeWidthStr;

#[derive(Parser, Debug)]
#[command(name = "timple")]
#[command(about = "Tick positions and labels for duration axes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable logging to specified file
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place and label ticks for a view range
    Ticks {
        /// Lower view limit
        #[arg(allow_negative_numbers = true)]
        low: f64,

        /// Upper view limit
        #[arg(allow_negative_numbers = true)]
        high: f64,

        /// Ticks the locator aims for
        #[arg(long, default_value_t = 8)]
        target_ticks: usize,

        /// Hard cap on the number of ticks
        #[arg(long, default_value_t = 20)]
        max_ticks: usize,

        #[command(flatten)]
        format: FormatArgs,
    },
    /// Label arbitrary values with a fixed tick interval as context
    Label {
        /// Values to label; `nat` for a missing value
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<String>,

        /// Tick step giving the label resolution
        #[arg(long, default_value_t = 1.0)]
        step: f64,

        /// Unit of the tick step
        #[arg(long, default_value = "days")]
        step_unit: TimeUnit,

        #[command(flatten)]
        format: FormatArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct FormatArgs {
    /// Unit of the input values
    #[arg(long, default_value = "days")]
    unit: TimeUnit,

    /// Label style: compact, concise or template
    #[arg(long, default_value = "compact")]
    style: AxisStyle,

    /// Maximum fractional second digits
    #[arg(long, default_value_t = 6)]
    precision: u8,

    /// Label for missing values
    #[arg(long)]
    placeholder: Option<String>,
}

impl FormatArgs {
    fn config(&self) -> FormatConfig {
        FormatConfig {
            precision: self.precision,
            placeholder: self.placeholder.clone().unwrap_or_default(),
        }
    }

    fn to_days(&self, value: f64) -> f64 {
        value / self.unit.per_day()
    }

    /// Position in the input unit, trimmed to microsecond-ish noise.
    fn display_value(&self, days: f64) -> String {
        let value = days * self.unit.per_day();
        let rounded = (value * 1e6).round() / 1e6;
        format!("{}", rounded + 0.0)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        Command::Ticks {
            low,
            high,
            target_ticks,
            max_ticks,
            format,
        } => run_ticks(&mut out, low, high, target_ticks, max_ticks, &format),
        Command::Label {
            values,
            step,
            step_unit,
            format,
        } => run_label(&mut out, &values, step, step_unit, &format),
    }
}

fn init_logging(log: Option<&Path>) -> Result<()> {
    match log {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(Level::DEBUG)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            tracing::info!("Starting timple");
        },
        None => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        },
    }
    Ok(())
}

fn run_ticks(
    out: &mut impl Write,
    low: f64,
    high: f64,
    target_ticks: usize,
    max_ticks: usize,
    format: &FormatArgs,
) -> Result<()> {
    let config = AxisConfig {
        locator: LocatorConfig {
            target_ticks,
            max_ticks,
            ..LocatorConfig::default()
        },
        format: format.config(),
    };
    let axis = DurationAxis::with_style(format.style, &config).context("invalid axis settings")?;
    let labels = axis
        .labels(format.to_days(low), format.to_days(high))
        .with_context(|| format!("cannot place ticks between {low} and {high}"))?;

    writeln!(out, "interval: {}", labels.interval)?;
    if !labels.offset.is_empty() {
        writeln!(out, "offset: {}", labels.offset)?;
    }
    let rows: Vec<(String, String)> = labels
        .ticks
        .into_iter()
        .map(|tick| (format.display_value(tick.value), tick.label))
        .collect();
    write_table(out, &rows)
}

fn run_label(
    out: &mut impl Write,
    values: &[String],
    step: f64,
    step_unit: TimeUnit,
    format: &FormatArgs,
) -> Result<()> {
    let interval = Interval::new(step_unit, step).context("invalid tick step")?;
    let formatter = format.style.formatter(&format.config()).context("invalid label settings")?;

    let mut rows = Vec::with_capacity(values.len());
    for raw in values {
        let value = parse_value(raw, format)?;
        let label = formatter
            .format(value, &interval)
            .with_context(|| format!("cannot label '{raw}'"))?;
        rows.push((raw.clone(), label));
    }
    write_table(out, &rows)
}

fn parse_value(raw: &str, format: &FormatArgs) -> Result<DurationValue> {
    if raw.trim().eq_ignore_ascii_case("nat") {
        return Ok(DurationValue::NotATime);
    }
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{raw}' is not a number or 'nat'"))?;
    Ok(DurationValue::from_days(format.to_days(value)))
}

/// Two right-aligned columns separated by two spaces.
fn write_table(out: &mut impl Write, rows: &[(String, String)]) -> Result<()> {
    let left = rows.iter().map(|(value, _)| value.width()).max().unwrap_or(0);
    let right = rows.iter().map(|(_, label)| label.width()).max().unwrap_or(0);
    for (value, label) in rows {
        let value_pad = " ".repeat(left - value.width());
        let label_pad = " ".repeat(right - label.width());
        writeln!(out, "{value_pad}{value}  {label_pad}{label}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_args(unit: TimeUnit) -> FormatArgs {
        FormatArgs {
            unit,
            style: AxisStyle::Compact,
            precision: 6,
            placeholder: None,
        }
    }

    #[test]
    fn values_convert_from_input_unit() {
        let format = format_args(TimeUnit::Hours);
        assert_eq!(format.to_days(12.0), 0.5);
        assert_eq!(format.display_value(0.25), "6");
    }

    #[test]
    fn nat_parses_as_missing() {
        let format = format_args(TimeUnit::Days);
        assert!(matches!(parse_value("NaT", &format), Ok(DurationValue::NotATime)));
        assert!(parse_value("soon", &format).is_err());
    }

    #[test]
    fn table_is_right_aligned() {
        let rows = vec![
            ("0".to_string(), "0".to_string()),
            ("10".to_string(), "10".to_string()),
        ];
        let mut buf = Vec::new();
        write_table(&mut buf, &rows).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(String::from_utf8_lossy(&buf), " 0   0\n10  10\n");
    }

    #[test]
    fn cli_arguments_parse() {
        let args = Args::try_parse_from(["timple", "ticks", "-1", "1", "--unit", "hours"])
            .unwrap_or_else(|err| panic!("{err}"));
        match args.command {
            Command::Ticks { low, high, format, .. } => {
                assert_eq!((low, high), (-1.0, 1.0));
                assert_eq!(format.unit, TimeUnit::Hours);
            },
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Args::try_parse_from(["timple", "ticks", "0", "1", "--unit", "weeks"]).is_err());
    }
}
