//! Motion sensor orchestration for MotionKit
//!
//! Manages a fixed set of motion sensors (accelerometer, gyroscope,
//! magnetometer, altimeter/barometer) behind one activation interface, and
//! keeps a bounded history of recent samples for each.
//!
//! Key constraints:
//! - History never grows past the configured capacity (624 by default)
//! - Misuse (unavailable sensor, double start, bad interval) is a silent no-op
//! - Hardware access stays behind the [`MotionProvider`] trait
//!
//! ```no_run
//! use motionkit_core::{SensorKind, SensorOrchestrator, SimulatedProvider};
//!
//! let orchestrator = SensorOrchestrator::new(SimulatedProvider::new()).unwrap();
//! orchestrator.start_sensor_with_interval(SensorKind::Accelerometer, 0.01);
//!
//! std::thread::sleep(std::time::Duration::from_millis(100));
//! for sample in orchestrator.history(SensorKind::Accelerometer) {
//!     println!("{:.3}s {:?}", sample.timestamp, sample.payload);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;
mod sync;

pub mod buffer;
pub mod config;
pub mod constants;
pub mod errors;
pub mod orchestrator;
pub mod provider;
pub mod sensors;
pub mod time;

// Public API
pub use buffer::SampleRingBuffer;
pub use config::OrchestratorConfig;
pub use errors::{MotionError, MotionResult, ProviderError};
pub use orchestrator::{SensorOrchestrator, SensorSet};
pub use provider::{
    Delivery, MotionProvider, RecordingProvider, SampleCallback, SimulatedProvider,
};
pub use sensors::{
    Reading, Sample, SamplePayload, SensorKind, SensorStatus, SensorStream, Vector3,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
