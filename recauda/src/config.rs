//! Configuration management.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::snackbar::SnackbarTimings;
use crate::validation::ValidationRules;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors from [`Config::try_from_env`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but does not parse
    #[error("Invalid value for {var}: {value:?}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// The closing animation would not fit in the shortest notice
    #[error("Close animation ({close_animation_ms} ms) must be shorter than every snackbar duration")]
    CloseAnimationTooLong {
        /// Configured animation length
        close_animation_ms: u64,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Success snackbar duration in milliseconds (default: 3000)
    pub snackbar_success_ms: u64,
    /// Error snackbar duration in milliseconds (default: 5000)
    pub snackbar_error_ms: u64,
    /// Snackbar closing animation in milliseconds (default: 300)
    pub close_animation_ms: u64,
    /// Simulated submit latency in milliseconds (default: 1500)
    pub submit_delay_ms: u64,
    /// Maximum prizes per raffle (default: 10)
    pub max_prizes: usize,
    /// Minimum digits in a phone number (default: 8)
    pub phone_min_digits: usize,
    /// Minimum characters in a name (default: 2)
    pub name_min_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snackbar_success_ms: 3000,
            snackbar_error_ms: 5000,
            close_animation_ms: 300,
            submit_delay_ms: 1500,
            max_prizes: 10,
            phone_min_digits: 8,
            name_min_length: 2,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or malformed values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            snackbar_success_ms: env::var("RECAUDA_SNACKBAR_SUCCESS_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.snackbar_success_ms),
            snackbar_error_ms: env::var("RECAUDA_SNACKBAR_ERROR_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.snackbar_error_ms),
            close_animation_ms: env::var("RECAUDA_SNACKBAR_CLOSE_ANIMATION_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.close_animation_ms),
            submit_delay_ms: env::var("RECAUDA_SUBMIT_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.submit_delay_ms),
            max_prizes: env::var("RECAUDA_MAX_PRIZES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_prizes),
            phone_min_digits: env::var("RECAUDA_PHONE_MIN_DIGITS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.phone_min_digits),
            name_min_length: env::var("RECAUDA_NAME_MIN_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.name_min_length),
        }
    }

    /// Load configuration from environment variables, rejecting malformed values.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for a value that does not parse and
    /// [`ConfigError::CloseAnimationTooLong`] for inconsistent timings.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Strict loading over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`Config::try_from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            snackbar_success_ms: parse_var(&lookup, "RECAUDA_SNACKBAR_SUCCESS_MS", defaults.snackbar_success_ms)?,
            snackbar_error_ms: parse_var(&lookup, "RECAUDA_SNACKBAR_ERROR_MS", defaults.snackbar_error_ms)?,
            close_animation_ms: parse_var(
                &lookup,
                "RECAUDA_SNACKBAR_CLOSE_ANIMATION_MS",
                defaults.close_animation_ms,
            )?,
            submit_delay_ms: parse_var(&lookup, "RECAUDA_SUBMIT_DELAY_MS", defaults.submit_delay_ms)?,
            max_prizes: parse_var(&lookup, "RECAUDA_MAX_PRIZES", defaults.max_prizes)?,
            phone_min_digits: parse_var(&lookup, "RECAUDA_PHONE_MIN_DIGITS", defaults.phone_min_digits)?,
            name_min_length: parse_var(&lookup, "RECAUDA_NAME_MIN_LENGTH", defaults.name_min_length)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// [`ConfigError::CloseAnimationTooLong`] when the closing animation is
    /// not shorter than both snackbar durations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.close_animation_ms >= self.snackbar_success_ms.min(self.snackbar_error_ms) {
            return Err(ConfigError::CloseAnimationTooLong {
                close_animation_ms: self.close_animation_ms,
            });
        }
        Ok(())
    }

    /// Snackbar durations
    #[must_use]
    pub const fn snackbar_timings(&self) -> SnackbarTimings {
        SnackbarTimings {
            success: Duration::from_millis(self.snackbar_success_ms),
            error: Duration::from_millis(self.snackbar_error_ms),
            close_animation: Duration::from_millis(self.close_animation_ms),
        }
    }

    /// Form thresholds
    #[must_use]
    pub const fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            name_min_length: self.name_min_length,
            phone_min_digits: self.phone_min_digits,
        }
    }

    /// Simulated submit latency
    #[must_use]
    pub const fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
