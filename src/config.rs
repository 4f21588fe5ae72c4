//! Machine configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use crate::core::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DISPENSE_DELAY_VAR: &str = "VENDING_DISPENSE_DELAY_MS";
pub const SLOT_CAPACITY_VAR: &str = "VENDING_SLOT_CAPACITY";
pub const HISTORY_LIMIT_VAR: &str = "VENDING_HISTORY_LIMIT";

/// Default physical dispensing latency.
pub const DEFAULT_DISPENSE_DELAY: Duration = Duration::from_millis(2000);

/// Tunables of a single machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// How long fulfilment takes once a purchase is paid for
    pub dispense_delay: Duration,

    /// Most units a single slot may hold
    pub slot_capacity: u32,

    /// Transitions kept in the audit trail
    pub history_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            dispense_delay: DEFAULT_DISPENSE_DELAY,
            slot_capacity: u32::MAX,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MachineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source, falling back to the
    /// defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let dispense_delay = match lookup(DISPENSE_DELAY_VAR) {
            Some(raw) => Duration::from_millis(parse_var(DISPENSE_DELAY_VAR, &raw)?),
            None => defaults.dispense_delay,
        };

        let slot_capacity = match lookup(SLOT_CAPACITY_VAR) {
            Some(raw) => parse_var(SLOT_CAPACITY_VAR, &raw)?,
            None => defaults.slot_capacity,
        };

        let history_limit = match lookup(HISTORY_LIMIT_VAR) {
            Some(raw) => parse_var(HISTORY_LIMIT_VAR, &raw)?,
            None => defaults.history_limit,
        };

        if history_limit == 0 {
            return Err(ConfigError::InvalidValue(HISTORY_LIMIT_VAR.to_string()));
        }

        Ok(Self {
            dispense_delay,
            slot_capacity,
            history_limit,
        })
    }

    pub fn with_dispense_delay(mut self, delay: Duration) -> Self {
        self.dispense_delay = delay;
        self
    }

    pub fn with_slot_capacity(mut self, capacity: u32) -> Self {
        self.slot_capacity = capacity;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
