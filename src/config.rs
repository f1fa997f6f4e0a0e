//! Controller configuration parameters
//!
//! Channel counts, filter tuning and the cycle period. Loaded once at
//! construction; the channel layout does not change afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};
use crate::filter::{DEFAULT_NOMINAL_FREQUENCY_HZ, DEFAULT_PERIOD_MS};
use crate::model::{MAX_INPUT_CHANNELS, MAX_OUTPUT_CHANNELS};

/// Input filter tuning, shared by every input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Classification window (milliseconds)
    pub period_ms: u32,
    /// Mains frequency the opto-couplers are driven from (Hz)
    pub nominal_frequency_hz: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            nominal_frequency_hz: DEFAULT_NOMINAL_FREQUENCY_HZ,
        }
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Channels ---
    pub input_channel_count: usize,
    pub output_channel_count: usize,

    // --- Inputs ---
    pub filter: FilterConfig,

    // --- Timing ---
    /// Delay between control cycles (milliseconds)
    pub cycle_period_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            input_channel_count: 16,
            output_channel_count: 8,
            filter: FilterConfig::default(),
            cycle_period_ms: 5,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| ControlError::Config("malformed json"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_channel_count > MAX_INPUT_CHANNELS
            || self.output_channel_count > MAX_OUTPUT_CHANNELS
        {
            return Err(ControlError::TooManyChannels);
        }
        if self.filter.period_ms == 0 {
            return Err(ControlError::Config("filter.period_ms must be > 0"));
        }
        if self.filter.nominal_frequency_hz == 0 {
            return Err(ControlError::Config("filter.nominal_frequency_hz must be > 0"));
        }
        if self.cycle_period_ms == 0 {
            return Err(ControlError::Config("cycle_period_ms must be > 0"));
        }
        Ok(())
    }
}
