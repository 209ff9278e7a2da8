//! Request-recording provider driven by the caller
//!
//! Nothing happens on its own here: start and stop requests are logged, and
//! readings reach the orchestrator only when the caller pushes them with
//! [`RecordingProvider::deliver`]. That makes it the provider of choice for
//! tests and for feeding the orchestrator from an external event loop.
//!
//! ```rust
//! use motionkit_core::provider::{ProviderRequest, RecordingProvider};
//! use motionkit_core::{SensorKind, SensorOrchestrator, SensorStream};
//!
//! let orchestrator = SensorOrchestrator::new(RecordingProvider::new()).unwrap();
//! orchestrator.start_sensor_with_interval(SensorKind::Gyroscope, 0.1);
//!
//! assert_eq!(
//!     orchestrator.provider().requests(),
//!     vec![ProviderRequest::Start { stream: SensorStream::Rotation, interval_secs: 0.1 }],
//! );
//! ```

use super::{Delivery, MotionProvider, SampleCallback};
use crate::constants::{SENSOR_KIND_COUNT, SENSOR_STREAM_COUNT};
use crate::sensors::{Reading, SensorKind, SensorStream};
use crate::sync::lock;
use std::sync::Mutex;

/// Request issued to a provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProviderRequest {
    /// `start_updates` was called
    Start {
        /// Stream asked to start
        stream: SensorStream,
        /// Interval passed with the request
        interval_secs: f64,
    },
    /// `stop_updates` was called
    Stop {
        /// Stream asked to stop
        stream: SensorStream,
    },
}

impl ProviderRequest {
    /// Stream the request addressed
    pub fn stream(&self) -> SensorStream {
        match self {
            ProviderRequest::Start { stream, .. } | ProviderRequest::Stop { stream } => *stream,
        }
    }
}

#[derive(Default)]
struct RecorderState {
    available: [bool; SENSOR_KIND_COUNT],
    requests: Vec<ProviderRequest>,
    availability_queries: usize,
    /// Most recent callback per stream; kept after stop to model in-flight deliveries
    callbacks: [Option<SampleCallback>; SENSOR_STREAM_COUNT],
    running: [bool; SENSOR_STREAM_COUNT],
}

/// Provider that records requests and delivers on demand
pub struct RecordingProvider {
    state: Mutex<RecorderState>,
}

impl RecordingProvider {
    /// Provider reporting every kind as available
    pub fn new() -> Self {
        Self::with_available(&SensorKind::ALL)
    }

    /// Provider reporting only `kinds` as available
    pub fn with_available(kinds: &[SensorKind]) -> Self {
        let mut state = RecorderState::default();
        for kind in kinds {
            state.available[kind.index()] = true;
        }
        Self { state: Mutex::new(state) }
    }

    /// Change what later discovery runs will see
    pub fn set_available(&self, kind: SensorKind, available: bool) {
        lock(&self.state).available[kind.index()] = available;
    }

    /// Every start/stop request so far, oldest first
    pub fn requests(&self) -> Vec<ProviderRequest> {
        lock(&self.state).requests.clone()
    }

    /// Forget recorded requests
    pub fn clear_requests(&self) {
        lock(&self.state).requests.clear();
    }

    /// Number of start requests issued for `stream`
    pub fn start_count(&self, stream: SensorStream) -> usize {
        self.count(|r| matches!(r, ProviderRequest::Start { stream: s, .. } if *s == stream))
    }

    /// Number of stop requests issued for `stream`
    pub fn stop_count(&self, stream: SensorStream) -> usize {
        self.count(|r| matches!(r, ProviderRequest::Stop { stream: s } if *s == stream))
    }

    /// Number of `is_available` calls answered
    pub fn availability_queries(&self) -> usize {
        lock(&self.state).availability_queries
    }

    /// Whether `stream` was started and not stopped since
    pub fn is_running(&self, stream: SensorStream) -> bool {
        lock(&self.state).running[stream.index()]
    }

    /// Deliver to a running stream's callback
    ///
    /// Returns `false` without delivering if the stream is not running.
    pub fn deliver(&self, stream: SensorStream, delivery: Delivery) -> bool {
        let callback = {
            let state = lock(&self.state);
            if !state.running[stream.index()] {
                return false;
            }
            state.callbacks[stream.index()].clone()
        };

        match callback {
            Some(callback) => {
                callback(delivery);
                true
            }
            None => false,
        }
    }

    /// Deliver a successful reading to a running stream
    pub fn deliver_reading(&self, stream: SensorStream, reading: Reading) -> bool {
        self.deliver(stream, Ok(reading))
    }

    /// Last callback registered for `stream`, even if it has been stopped
    ///
    /// Invoking it after a stop reproduces a delivery that was already in
    /// flight when the stop request went out.
    pub fn in_flight_callback(&self, stream: SensorStream) -> Option<SampleCallback> {
        lock(&self.state).callbacks[stream.index()].clone()
    }

    fn count(&self, predicate: impl Fn(&ProviderRequest) -> bool) -> usize {
        lock(&self.state).requests.iter().filter(|r| predicate(r)).count()
    }
}

impl Default for RecordingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionProvider for RecordingProvider {
    fn is_available(&self, kind: SensorKind) -> bool {
        let mut state = lock(&self.state);
        state.availability_queries += 1;
        state.available[kind.index()]
    }

    fn start_updates(&self, stream: SensorStream, interval_secs: f64, on_sample: SampleCallback) {
        let mut state = lock(&self.state);
        state.requests.push(ProviderRequest::Start { stream, interval_secs });
        state.callbacks[stream.index()] = Some(on_sample);
        state.running[stream.index()] = true;
    }

    fn stop_updates(&self, stream: SensorStream) {
        let mut state = lock(&self.state);
        state.requests.push(ProviderRequest::Stop { stream });
        state.running[stream.index()] = false;
    }
}
