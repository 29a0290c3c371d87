//! Form configuration
//!
//! A [`FormConfig`] lists field descriptors in fill order plus the
//! submission timings. It can be built in code or loaded from a TOML,
//! YAML or JSON file:
//!
//! ```toml
//! [[fields]]
//! id = "name"
//! rule = { kind = "letters", min = 2 }
//!
//! [[fields]]
//! id = "phone"
//! label = "Phone"
//! rule = { kind = "digits", exact = 7 }
//!
//! [submission]
//! step_percent = 10
//! tick_period_ms = 100
//! finalize_delay_ms = 500
//! ```

use crate::error::ConfigurationError;
use crate::registry::{FieldDescriptor, Registry};
use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timings of the simulated submission run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Percent added per tick, 1..=100
    pub step_percent: u8,
    /// Milliseconds between ticks
    pub tick_period_ms: u64,
    /// Milliseconds between reaching 100% and the reset
    pub finalize_delay_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            step_percent: 10,
            tick_period_ms: 100,
            finalize_delay_ms: 500,
        }
    }
}

impl SubmissionConfig {
    /// With a different step
    #[inline]
    #[must_use]
    pub fn with_step(mut self, step_percent: u8) -> Self {
        self.step_percent = step_percent;
        self
    }

    /// With a different tick period
    #[inline]
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With a different finalize delay
    #[inline]
    #[must_use]
    pub fn with_finalize_delay(mut self, delay: Duration) -> Self {
        self.finalize_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Tick period as a duration
    #[inline]
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Finalize delay as a duration
    #[inline]
    #[must_use]
    pub fn finalize_delay(&self) -> Duration {
        Duration::from_millis(self.finalize_delay_ms)
    }

    /// Ticks needed to go from 0 to 100
    #[inline]
    #[must_use]
    pub fn ticks_to_complete(&self) -> u32 {
        u32::from(100u8.div_ceil(self.step_percent.max(1)))
    }

    /// Check ranges
    ///
    /// # Errors
    /// `InvalidSubmission` when the step is outside 1..=100 or the tick
    /// period is zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(1..=100).contains(&self.step_percent) {
            return Err(ConfigurationError::InvalidSubmission(format!(
                "step_percent must be in 1..=100, got {}",
                self.step_percent
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigurationError::InvalidSubmission(
                "tick_period_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Full description of a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Fields in fill order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Submission timings
    #[serde(default)]
    pub submission: SubmissionConfig,
}

impl FormConfig {
    /// Empty configuration with default timings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    #[must_use]
    pub fn with_field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Replace the submission timings
    #[must_use]
    pub fn with_submission(mut self, submission: SubmissionConfig) -> Self {
        self.submission = submission;
        self
    }

    /// Five-field contact form: name, surname, email, phone, mobile
    #[must_use]
    pub fn contact_form() -> Self {
        Self::new()
            .with_field(FieldDescriptor::new("name", Rule::letters(2)))
            .with_field(FieldDescriptor::new("surname", Rule::letters(2)))
            .with_field(FieldDescriptor::new("email", Rule::email()))
            .with_field(FieldDescriptor::new("phone", Rule::digits(7)))
            .with_field(FieldDescriptor::new("mobile", Rule::digits(10)))
    }

    /// Load from a file; format chosen by extension
    ///
    /// # Errors
    /// `Io`, `Parse` or `UnsupportedFormat`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let text = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
            path: shown.clone(),
            reason: e.to_string(),
        })?;

        let parsed: Result<Self, String> = match extension.as_str() {
            "toml" => toml::from_str(&text).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str(&text).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(&text).map_err(|e| e.to_string()),
            other => return Err(ConfigurationError::UnsupportedFormat(other.to_string())),
        };
        let config = parsed.map_err(|reason| ConfigurationError::Parse {
            path: shown.clone(),
            reason,
        })?;
        tracing::debug!(path = %shown, fields = config.fields.len(), "loaded form config");
        Ok(config)
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// `Parse` on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(text).map_err(|e| ConfigurationError::Parse {
            path: "<inline>".into(),
            reason: e.to_string(),
        })
    }

    /// Validate everything and build the registry
    ///
    /// # Errors
    /// Any registry or submission configuration error.
    pub fn build(&self) -> Result<Registry, ConfigurationError> {
        self.submission.validate()?;
        Registry::register(self.fields.iter().cloned())
    }
}
