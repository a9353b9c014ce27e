//! Configuration for locators and formatters.
//!
//! Values are immutable once handed to a locator or formatter; there is no
//! process-wide configuration.

use std::collections::BTreeMap;

use crate::error::{Result, TimpleError};
use crate::units::{TimeUnit, MAX_FRACTION_DIGITS};

/// Configuration for automatic tick location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    /// Desired number of ticks across the view range.
    pub target_ticks: usize,
    /// Hard upper bound on emitted ticks.
    pub max_ticks: usize,
    /// Step palettes that replace the built-in ones for a unit.
    pub steps: BTreeMap<TimeUnit, Vec<f64>>,
    /// Tick caps that replace `max_ticks` for intervals in a unit.
    pub unit_max_ticks: BTreeMap<TimeUnit, usize>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            target_ticks: 8,
            max_ticks: 20,
            steps: BTreeMap::new(),
            unit_max_ticks: BTreeMap::new(),
        }
    }
}

impl LocatorConfig {
    /// Use `steps` (increasing, in `unit`) instead of the built-in palette.
    pub fn with_steps(mut self, unit: TimeUnit, steps: impl Into<Vec<f64>>) -> Self {
        self.steps.insert(unit, steps.into());
        self
    }

    /// Cap intervals in `unit` at `max_ticks` ticks.
    pub fn with_unit_max_ticks(mut self, unit: TimeUnit, max_ticks: usize) -> Self {
        self.unit_max_ticks.insert(unit, max_ticks);
        self
    }

    /// Tick cap for an interval in `unit`.
    pub fn max_ticks_for(&self, unit: TimeUnit) -> usize {
        self.unit_max_ticks.get(&unit).copied().unwrap_or(self.max_ticks)
    }

    /// Step palette for `unit`, smallest first.
    pub(crate) fn palette(&self, unit: TimeUnit) -> Box<dyn Iterator<Item = f64> + '_> {
        match self.steps.get(&unit) {
            Some(steps) => Box::new(steps.iter().copied()),
            None => Box::new(unit.steps()),
        }
    }

    /// Check that the density settings can be satisfied.
    pub fn validate(&self) -> Result<()> {
        if self.target_ticks == 0 {
            return Err(TimpleError::InvalidConfig(
                "target_ticks must be at least 1".to_string(),
            ));
        }
        if self.max_ticks < 2 {
            return Err(TimpleError::InvalidConfig(format!(
                "max_ticks must be at least 2, got {}",
                self.max_ticks
            )));
        }
        if self.target_ticks > self.max_ticks {
            return Err(TimpleError::InvalidConfig(format!(
                "target_ticks ({}) exceeds max_ticks ({})",
                self.target_ticks, self.max_ticks
            )));
        }
        for (unit, steps) in &self.steps {
            if steps.is_empty() {
                return Err(TimpleError::InvalidConfig(format!("no steps given for {unit}")));
            }
            if steps.iter().any(|step| !step.is_finite() || *step <= 0.0) {
                return Err(TimpleError::InvalidConfig(format!(
                    "steps for {unit} must be positive and finite, got {steps:?}"
                )));
            }
            if steps.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(TimpleError::InvalidConfig(format!(
                    "steps for {unit} must be strictly increasing, got {steps:?}"
                )));
            }
        }
        if let Some((unit, max)) = self.unit_max_ticks.iter().find(|(_, max)| **max < 2) {
            return Err(TimpleError::InvalidConfig(format!(
                "max ticks for {unit} must be at least 2, got {max}"
            )));
        }
        Ok(())
    }
}

/// Configuration for label formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Cap on fractional second digits.
    pub precision: u8,
    /// Label shown for not-a-time values.
    pub placeholder: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            precision: MAX_FRACTION_DIGITS,
            placeholder: String::new(),
        }
    }
}

impl FormatConfig {
    /// Check that the precision cap is within microsecond resolution.
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_FRACTION_DIGITS {
            return Err(TimpleError::InvalidConfig(format!(
                "precision must be at most {MAX_FRACTION_DIGITS} digits, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Combined configuration for a duration axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisConfig {
    /// Configuration for tick location.
    pub locator: LocatorConfig,
    /// Configuration for tick labels.
    pub format: FormatConfig,
}

impl AxisConfig {
    /// Validate both halves.
    pub fn validate(&self) -> Result<()> {
        self.locator.validate()?;
        self.format.validate()
    }
}
