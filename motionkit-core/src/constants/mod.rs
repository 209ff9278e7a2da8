//! Constants for MotionKit Core
//!
//! Centralized defaults for the orchestrator and the simulated provider.
//! Values that mirror platform behaviour note where they come from.
//!
//! ## Organization
//!
//! - **Buffers**: History capacity and sensor table sizing
//! - **Time**: Default and simulated update intervals

/// Buffer sizes for per-sensor sample history.
pub mod buffers;

/// Default and simulated update intervals.
pub mod time;

pub use buffers::{DEFAULT_BUFFER_CAPACITY, SENSOR_KIND_COUNT, SENSOR_STREAM_COUNT};
pub use time::{
    DEFAULT_UPDATE_INTERVAL_SECS, MAX_SIMULATED_INTERVAL_SECS, MIN_SIMULATED_INTERVAL_SECS,
};
