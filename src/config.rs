//! Configuration for generation and the scheduler lease.
//!
//! Every field has a default, so an empty document is a valid config.
//!
//! ```toml
//! [generator]
//! preference_bonus = 10
//! tiebreak_spread = 5
//! seed = 42
//!
//! [lease]
//! duration_secs = 1800
//! max_attempts = 5
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub generator: GeneratorConfig,
    pub lease: LeaseConfig,
}

/// Scoring knobs for the residual fill pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Score added to a candidate shift that matches the worker's approved preference.
    pub preference_bonus: u32,
    /// Random tiebreak is drawn from `0..tiebreak_spread`.
    pub tiebreak_spread: u32,
    /// Fixed seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            preference_bonus: 10,
            tiebreak_spread: 5,
            seed: None,
        }
    }
}

/// Scheduler lease settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaseConfig {
    /// Lease length granted on claim and renew.
    pub duration_secs: i64,
    /// Compare-and-swap attempts before a conflict is surfaced.
    pub max_attempts: u32,
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30 * 60,
            max_attempts: 5,
        }
    }
}

impl LeaseConfig {
    /// Lease length as a duration. `None` if out of range.
    pub fn duration(&self) -> Option<Duration> {
        Duration::try_seconds(self.duration_secs)
    }
}

impl RosterConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lease.duration_secs <= 0 {
            return Err(ConfigError::Invalid(format!(
                "lease.duration_secs must be positive, got {}",
                self.lease.duration_secs
            )));
        }
        if self.lease.duration().is_none() {
            return Err(ConfigError::Invalid(format!(
                "lease.duration_secs is out of range: {}",
                self.lease.duration_secs
            )));
        }
        if self.lease.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "lease.max_attempts must be at least 1".into(),
            ));
        }
        if self.generator.tiebreak_spread == 0 {
            return Err(ConfigError::Invalid(
                "generator.tiebreak_spread must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
