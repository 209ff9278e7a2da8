//! Orchestrator configuration
//!
//! Both settings are fixed once the orchestrator is built. The update
//! interval here only seeds the shared default; `start_sensor_with_interval`
//! replaces it at runtime.
//!
//! ```rust
//! use motionkit_core::OrchestratorConfig;
//!
//! let config = OrchestratorConfig::default()
//!     .with_buffer_capacity(128)
//!     .with_default_interval(0.02);
//!
//! assert!(config.validate().is_ok());
//! ```
//!
//! With the `serde` feature the same settings load from JSON; missing fields
//! keep their defaults:
//!
//! ```rust
//! # #[cfg(feature = "serde")] {
//! use motionkit_core::OrchestratorConfig;
//!
//! let config = OrchestratorConfig::from_json(r#"{ "buffer_capacity": 32 }"#).unwrap();
//! assert_eq!(config.buffer_capacity, 32);
//! assert_eq!(config.default_interval_secs, 5.0);
//! # }
//! ```

use crate::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_UPDATE_INTERVAL_SECS};
use crate::errors::{MotionError, MotionResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings applied when an orchestrator is built
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrchestratorConfig {
    /// Samples kept per sensor stream
    pub buffer_capacity: usize,

    /// Seed for the shared update interval, in seconds
    ///
    /// Non-positive values are accepted and replaced by
    /// [`DEFAULT_UPDATE_INTERVAL_SECS`] when a sensor starts.
    pub default_interval_secs: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            default_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
        }
    }
}

impl OrchestratorConfig {
    /// Set samples kept per stream
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the initial shared update interval
    pub fn with_default_interval(mut self, secs: f64) -> Self {
        self.default_interval_secs = secs;
        self
    }

    /// Check settings that cannot be repaired later
    pub fn validate(&self) -> MotionResult<()> {
        if self.buffer_capacity == 0 {
            return Err(MotionError::ZeroCapacity);
        }
        Ok(())
    }

    /// Parse settings from a JSON document and validate them
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> MotionResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| MotionError::Config {
            line: e.line(),
            column: e.column(),
        })?;
        config.validate()?;
        Ok(config)
    }
}
