//! Sensor Lifecycle and Sample Routing
//!
//! ## Overview
//!
//! [`SensorOrchestrator`] sits between consumers and a [`MotionProvider`].
//! It discovers which sensors exist, turns them on and off, and keeps the
//! latest sample plus a bounded history for each one.
//!
//! ```text
//!   consumer ──start/stop/clear──→ SensorOrchestrator ──requests──→ provider
//!   consumer ←──latest/history──── │  per-kind table  │ ←─callback── provider
//! ```
//!
//! ## Lifecycle
//!
//! Every kind moves through the same small state machine:
//!
//! ```text
//! Unavailable ──discover──→ Inactive ──start──→ Active
//!                              ↑                  │
//!                              └──────stop────────┘
//! ```
//!
//! Starting an Active or Unavailable kind is a silent no-op, as is any
//! operation on a kind the provider never reported. Dropping the orchestrator
//! stops whatever is still active.
//!
//! ## Concurrency
//!
//! State lives in a table with one mutex per kind. Caller operations and
//! provider callbacks lock only the kind they touch, so a burst of
//! accelerometer samples never waits on a gyroscope start.
//!
//! Start and stop also hold a request lock for the kind's stream from the
//! moment they change the active flag until the provider call returns. The
//! provider therefore sees requests for one stream in the same order as the
//! flag changes, and a stream never keeps running behind an inactive kind.
//! Callbacks never take the request lock, so a provider may invoke one from
//! inside `start_updates` without deadlocking.
//!
//! Callbacks keep a weak handle on the table. A delivery arriving after the
//! orchestrator is gone is discarded.
//!
//! ## Late Deliveries
//!
//! Stopping a sensor is best-effort cancellation. A reading the provider had
//! already dispatched can still arrive after the stop, and it is recorded like
//! any other: latest is updated and the sample is pushed into history.

use crate::buffer::SampleRingBuffer;
use crate::config::OrchestratorConfig;
use crate::constants::{DEFAULT_UPDATE_INTERVAL_SECS, SENSOR_KIND_COUNT, SENSOR_STREAM_COUNT};
use crate::errors::MotionResult;
use crate::provider::{Delivery, MotionProvider, SampleCallback};
use crate::sensors::{Sample, SensorKind, SensorStatus, SensorStream};
use crate::sync::lock;
use std::sync::{Arc, Mutex, Weak};

/// Set of sensor kinds, in `SensorKind::ALL` order
pub type SensorSet = heapless::Vec<SensorKind, SENSOR_KIND_COUNT>;

/// Everything tracked for one sensor kind
#[derive(Debug)]
struct SensorState {
    available: bool,
    active: bool,
    /// Effective interval of the most recent start
    interval_secs: Option<f64>,
    latest: Option<Sample>,
    history: SampleRingBuffer<Sample>,
}

impl SensorState {
    fn new(capacity: usize) -> MotionResult<Self> {
        Ok(Self {
            available: false,
            active: false,
            interval_secs: None,
            latest: None,
            history: SampleRingBuffer::new(capacity)?,
        })
    }

    fn status(&self) -> SensorStatus {
        match (self.available, self.active) {
            (false, _) => SensorStatus::Unavailable,
            (true, false) => SensorStatus::Inactive,
            (true, true) => SensorStatus::Active,
        }
    }
}

/// Per-kind state shared with provider callbacks
#[derive(Debug)]
struct SensorTable {
    slots: [Mutex<SensorState>; SENSOR_KIND_COUNT],
}

impl SensorTable {
    fn new(capacity: usize) -> MotionResult<Self> {
        Ok(Self {
            slots: [
                Mutex::new(SensorState::new(capacity)?),
                Mutex::new(SensorState::new(capacity)?),
                Mutex::new(SensorState::new(capacity)?),
                Mutex::new(SensorState::new(capacity)?),
                Mutex::new(SensorState::new(capacity)?),
            ],
        })
    }

    fn slot(&self, kind: SensorKind) -> &Mutex<SensorState> {
        &self.slots[kind.index()]
    }

    fn record(&self, kind: SensorKind, sample: Sample) {
        if sample.stream() != kind.stream() {
            log_warn!(
                "dropping {} sample delivered for {}",
                sample.stream(),
                kind
            );
            return;
        }

        let mut state = lock(self.slot(kind.buffer_owner()));
        state.latest = Some(sample);
        state.history.push(sample);
    }

    fn deliver(&self, kind: SensorKind, delivery: Delivery) {
        match delivery {
            Ok(reading) => self.record(kind, reading.into_sample(kind)),
            Err(_e) => {
                log_warn!("{} delivered no sample: {}", kind, _e);
            }
        }
    }

    fn collect(&self, predicate: impl Fn(&SensorState) -> bool) -> SensorSet {
        let mut set = SensorSet::new();
        for kind in SensorKind::ALL {
            let state = lock(self.slot(kind));
            if predicate(&state) {
                // Capacity equals the number of kinds
                let _ = set.push(kind);
            }
        }
        set
    }
}

/// Owner of sensor activation state and per-sensor sample history
///
/// One instance per provider is the usual arrangement; consumers that need
/// to share it wrap it in an `Arc`. The orchestrator is `Send + Sync`
/// whenever its provider is.
///
/// ## Example
///
/// ```rust
/// use motionkit_core::provider::RecordingProvider;
/// use motionkit_core::{
///     Reading, SamplePayload, SensorKind, SensorOrchestrator, SensorStatus, Vector3,
/// };
///
/// let orchestrator = SensorOrchestrator::new(RecordingProvider::new()).unwrap();
///
/// orchestrator.start_sensor_with_interval(SensorKind::Accelerometer, 0.0);
/// assert_eq!(orchestrator.status(SensorKind::Accelerometer), SensorStatus::Active);
/// assert_eq!(orchestrator.update_interval(), 5.0);
///
/// let reading = Reading::new(1.0, SamplePayload::Acceleration(Vector3::new(0.0, 0.0, -1.0)));
/// orchestrator.provider().deliver_reading(SensorKind::Accelerometer.stream(), reading);
///
/// assert!(orchestrator.latest(SensorKind::Accelerometer).is_some());
/// assert_eq!(orchestrator.history_len(SensorKind::Accelerometer), 1);
/// ```
pub struct SensorOrchestrator<P: MotionProvider> {
    provider: P,
    table: Arc<SensorTable>,
    /// Held across a flag change and the provider request it implies
    stream_requests: [Mutex<()>; SENSOR_STREAM_COUNT],
    /// Shared default interval in seconds; may hold a non-positive value
    update_interval: Mutex<f64>,
    capacity: usize,
}

impl<P: MotionProvider> SensorOrchestrator<P> {
    /// Build with default settings and run discovery
    pub fn new(provider: P) -> MotionResult<Self> {
        Self::with_config(provider, OrchestratorConfig::default())
    }

    /// Build with `config` and run discovery
    pub fn with_config(provider: P, config: OrchestratorConfig) -> MotionResult<Self> {
        config.validate()?;

        let orchestrator = Self {
            provider,
            table: Arc::new(SensorTable::new(config.buffer_capacity)?),
            stream_requests: Default::default(),
            update_interval: Mutex::new(config.default_interval_secs),
            capacity: config.buffer_capacity,
        };
        orchestrator.discover_available_sensors();
        Ok(orchestrator)
    }

    /// Ask the provider about every kind and replace the available set
    ///
    /// Each kind is queried exactly once per call. A kind that is active
    /// keeps its availability even if the provider now denies it, so an
    /// active sensor is always an available one.
    pub fn discover_available_sensors(&self) -> SensorSet {
        for kind in SensorKind::ALL {
            let present = self.provider.is_available(kind);
            let mut state = lock(self.table.slot(kind));
            state.available = present || state.active;
        }

        let available = self.available_sensors();
        log_info!("discovered {} motion sensors: {:?}", available.len(), available);
        available
    }

    /// Start `kind` at the shared default interval
    ///
    /// No-op if `kind` is unavailable or already active. A non-positive
    /// default is replaced by 5 s first.
    pub fn start_sensor(&self, kind: SensorKind) {
        self.start(kind, None);
    }

    /// Start `kind`, first making `interval_secs` the shared default
    ///
    /// No-op if `kind` is unavailable or already active, in which case the
    /// default is left alone too. A non-positive `interval_secs` keeps the
    /// current default (or 5 s if that is non-positive as well).
    pub fn start_sensor_with_interval(&self, kind: SensorKind, interval_secs: f64) {
        self.start(kind, Some(interval_secs));
    }

    /// Start every available kind
    pub fn start_all_sensors(&self) {
        for kind in self.available_sensors() {
            self.start_sensor(kind);
        }
    }

    /// Start every available kind except `excluded`
    pub fn start_all_except(&self, excluded: SensorKind) {
        for kind in self.available_sensors() {
            if kind != excluded {
                self.start_sensor(kind);
            }
        }
    }

    /// Record a sample for `kind`
    ///
    /// Sets the latest sample and appends to history. Accepted whether or not
    /// `kind` is active. Barometer samples land in the altimeter's slot.
    pub fn on_sample_delivered(&self, kind: SensorKind, sample: Sample) {
        self.table.record(kind, sample);
    }

    /// Handle one provider delivery for `kind`
    ///
    /// A provider error leaves latest and history untouched.
    pub fn on_delivery(&self, kind: SensorKind, delivery: Delivery) {
        self.table.deliver(kind, delivery);
    }

    /// Empty the history of `kind`
    ///
    /// The barometer reads through the altimeter's history, which it does not
    /// own, so clearing the barometer does nothing.
    pub fn clear_buffer(&self, kind: SensorKind) {
        if kind.is_alias() {
            return;
        }
        lock(self.table.slot(kind)).history.clear();
    }

    /// Deactivate `kind` and stop its hardware stream
    ///
    /// The stop request goes out even if `kind` was not active. Unavailable
    /// kinds are ignored entirely. Stopping the altimeter or the barometer
    /// stops the shared altitude stream, so both are marked inactive and
    /// either can be started again.
    pub fn stop_sensor(&self, kind: SensorKind) {
        let stream = kind.stream();
        let _issuing = lock(self.request_lock(stream));

        if !self.is_available(kind) {
            return;
        }
        for sharing in SensorKind::ALL.into_iter().filter(|k| k.stream() == stream) {
            lock(self.table.slot(sharing)).active = false;
        }

        log_debug!("stopping {} ({} stream)", kind, stream);
        self.provider.stop_updates(stream);
    }

    /// Stop every active kind
    pub fn stop_all_sensors(&self) {
        for kind in self.active_sensors() {
            // Already stopped along with a kind sharing its stream
            if self.is_active(kind) {
                self.stop_sensor(kind);
            }
        }
    }

    /// Stop every active kind except `excluded`
    ///
    /// Stopping the altimeter or barometer also stops the other one, even
    /// when the other one is `excluded`.
    pub fn stop_all_except(&self, excluded: SensorKind) {
        for kind in self.active_sensors() {
            if kind != excluded && self.is_active(kind) {
                self.stop_sensor(kind);
            }
        }
    }

    /// Kinds the provider reported at the last discovery
    pub fn available_sensors(&self) -> SensorSet {
        self.table.collect(|state| state.available)
    }

    /// Kinds currently started
    pub fn active_sensors(&self) -> SensorSet {
        self.table.collect(|state| state.active)
    }

    /// Whether the last discovery saw `kind`
    pub fn is_available(&self, kind: SensorKind) -> bool {
        lock(self.table.slot(kind)).available
    }

    /// Whether `kind` is started
    pub fn is_active(&self, kind: SensorKind) -> bool {
        lock(self.table.slot(kind)).active
    }

    /// Lifecycle position of `kind`
    pub fn status(&self, kind: SensorKind) -> SensorStatus {
        lock(self.table.slot(kind)).status()
    }

    /// Effective interval `kind` was last started with
    pub fn interval(&self, kind: SensorKind) -> Option<f64> {
        lock(self.table.slot(kind)).interval_secs
    }

    /// Most recent sample for `kind`, absent until the first delivery
    pub fn latest(&self, kind: SensorKind) -> Option<Sample> {
        lock(self.table.slot(kind.buffer_owner())).latest
    }

    /// Copy of the buffered history for `kind`, oldest first
    pub fn history(&self, kind: SensorKind) -> Vec<Sample> {
        lock(self.table.slot(kind.buffer_owner())).history.snapshot()
    }

    /// Number of buffered samples for `kind`
    pub fn history_len(&self, kind: SensorKind) -> usize {
        lock(self.table.slot(kind.buffer_owner())).history.len()
    }

    /// Shared default update interval, as last set
    pub fn update_interval(&self) -> f64 {
        *lock(&self.update_interval)
    }

    /// Replace the shared default used by [`start_sensor`](Self::start_sensor)
    ///
    /// Non-positive values are stored as given and replaced by 5 s at the
    /// next start.
    pub fn set_update_interval(&self, secs: f64) {
        *lock(&self.update_interval) = secs;
    }

    /// Samples kept per stream
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The provider this orchestrator drives
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn request_lock(&self, stream: SensorStream) -> &Mutex<()> {
        &self.stream_requests[stream.index()]
    }

    fn start(&self, kind: SensorKind, requested_secs: Option<f64>) {
        let _issuing = lock(self.request_lock(kind.stream()));
        let interval_secs = {
            let mut state = lock(self.table.slot(kind));
            if !state.available || state.active {
                return;
            }

            let interval_secs = self.resolve_interval(requested_secs);
            state.active = true;
            state.interval_secs = Some(interval_secs);
            interval_secs
        };

        log_debug!(
            "starting {} ({} stream) every {}s",
            kind,
            kind.stream(),
            interval_secs
        );
        self.provider
            .start_updates(kind.stream(), interval_secs, self.callback_for(kind));
    }

    /// Apply a requested interval to the shared default and return the one to use
    fn resolve_interval(&self, requested_secs: Option<f64>) -> f64 {
        let mut default = lock(&self.update_interval);
        if let Some(secs) = requested_secs.filter(|secs| *secs > 0.0) {
            *default = secs;
        }
        if default.is_nan() || *default <= 0.0 {
            *default = DEFAULT_UPDATE_INTERVAL_SECS;
        }
        *default
    }

    fn callback_for(&self, kind: SensorKind) -> SampleCallback {
        let table: Weak<SensorTable> = Arc::downgrade(&self.table);
        Arc::new(move |delivery: Delivery| {
            if let Some(table) = table.upgrade() {
                table.deliver(kind, delivery);
            }
        })
    }
}

impl<P: MotionProvider> Drop for SensorOrchestrator<P> {
    fn drop(&mut self) {
        self.stop_all_sensors();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{MotionError, ProviderError};
    use crate::provider::{ProviderRequest, RecordingProvider};
    use crate::sensors::{Reading, SamplePayload, SensorStream, Vector3};

    fn accel(t: f64) -> Reading {
        Reading::new(t, SamplePayload::Acceleration(Vector3::new(0.0, 0.0, -1.0)))
    }

    fn altitude(t: f64, meters: f64) -> Reading {
        Reading::new(
            t,
            SamplePayload::Altitude { relative_altitude_m: meters, pressure_kpa: 101.3 },
        )
    }

    fn orchestrator() -> SensorOrchestrator<RecordingProvider> {
        SensorOrchestrator::new(RecordingProvider::new()).unwrap()
    }

    #[test]
    fn zero_capacity_config_rejected() {
        let config = OrchestratorConfig::default().with_buffer_capacity(0);
        let result = SensorOrchestrator::with_config(RecordingProvider::new(), config);
        assert_eq!(result.err(), Some(MotionError::ZeroCapacity));
    }

    #[test]
    fn construction_discovers_each_kind_once() {
        let orchestrator = orchestrator();
        assert_eq!(orchestrator.provider().availability_queries(), SENSOR_KIND_COUNT);
        assert_eq!(orchestrator.available_sensors().as_slice(), &SensorKind::ALL);
        assert!(orchestrator.active_sensors().is_empty());
        assert_eq!(orchestrator.capacity(), 624);
    }

    #[test]
    fn rediscovery_replaces_available_set() {
        let orchestrator = orchestrator();
        orchestrator.provider().set_available(SensorKind::Magnetometer, false);

        let available = orchestrator.discover_available_sensors();
        assert!(!available.contains(&SensorKind::Magnetometer));
        assert_eq!(orchestrator.status(SensorKind::Magnetometer), SensorStatus::Unavailable);
    }

    #[test]
    fn rediscovery_keeps_active_kinds_available() {
        let orchestrator = orchestrator();
        orchestrator.start_sensor(SensorKind::Gyroscope);
        orchestrator.provider().set_available(SensorKind::Gyroscope, false);

        orchestrator.discover_available_sensors();
        assert_eq!(orchestrator.status(SensorKind::Gyroscope), SensorStatus::Active);
    }

    #[test]
    fn positive_interval_becomes_default() {
        let orchestrator = orchestrator();
        orchestrator.start_sensor_with_interval(SensorKind::Gyroscope, 0.25);

        assert_eq!(orchestrator.update_interval(), 0.25);
        assert_eq!(orchestrator.interval(SensorKind::Gyroscope), Some(0.25));

        orchestrator.start_sensor(SensorKind::Magnetometer);
        assert_eq!(orchestrator.interval(SensorKind::Magnetometer), Some(0.25));
    }

    #[test]
    fn non_positive_interval_keeps_configured_default() {
        let orchestrator = orchestrator();
        orchestrator.set_update_interval(2.0);
        orchestrator.start_sensor_with_interval(SensorKind::Gyroscope, -3.0);

        assert_eq!(orchestrator.interval(SensorKind::Gyroscope), Some(2.0));
        assert_eq!(orchestrator.update_interval(), 2.0);
    }

    #[test]
    fn non_positive_default_replaced_at_start() {
        let orchestrator = orchestrator();
        orchestrator.set_update_interval(0.0);
        assert_eq!(orchestrator.update_interval(), 0.0);

        orchestrator.start_sensor(SensorKind::Accelerometer);
        assert_eq!(orchestrator.interval(SensorKind::Accelerometer), Some(5.0));
        assert_eq!(orchestrator.update_interval(), 5.0);
    }

    #[test]
    fn nan_default_replaced_at_start() {
        let orchestrator = orchestrator();
        orchestrator.set_update_interval(f64::NAN);

        orchestrator.start_sensor_with_interval(SensorKind::Accelerometer, f64::NAN);
        assert_eq!(orchestrator.interval(SensorKind::Accelerometer), Some(5.0));
        assert_eq!(orchestrator.update_interval(), 5.0);
    }

    #[test]
    fn stopping_one_alias_deactivates_both() {
        let orchestrator = orchestrator();
        orchestrator.start_sensor(SensorKind::Altimeter);
        orchestrator.start_sensor(SensorKind::Barometer);

        orchestrator.stop_sensor(SensorKind::Barometer);
        assert_eq!(orchestrator.status(SensorKind::Altimeter), SensorStatus::Inactive);
        assert_eq!(orchestrator.status(SensorKind::Barometer), SensorStatus::Inactive);

        orchestrator.start_sensor(SensorKind::Altimeter);
        assert_eq!(orchestrator.provider().start_count(SensorStream::Altitude), 3);
        assert!(orchestrator.provider().is_running(SensorStream::Altitude));
    }

    #[test]
    fn redundant_start_leaves_default_alone() {
        let orchestrator = orchestrator();
        orchestrator.start_sensor_with_interval(SensorKind::Gyroscope, 1.0);
        orchestrator.start_sensor_with_interval(SensorKind::Gyroscope, 9.0);

        assert_eq!(orchestrator.update_interval(), 1.0);
        assert_eq!(orchestrator.provider().start_count(SensorStream::Rotation), 1);
    }

    #[test]
    fn provider_error_leaves_state_untouched() {
        let orchestrator = orchestrator();
        orchestrator.start_sensor(SensorKind::Accelerometer);
        orchestrator
            .provider()
            .deliver_reading(SensorStream::Acceleration, accel(1.0));

        orchestrator
            .provider()
            .deliver(SensorStream::Acceleration, Err(ProviderError::PermissionDenied));

        let latest = orchestrator.latest(SensorKind::Accelerometer).unwrap();
        assert_eq!(latest.timestamp, 1.0);
        assert_eq!(orchestrator.history_len(SensorKind::Accelerometer), 1);
    }

    #[test]
    fn mismatched_payload_dropped() {
        let orchestrator = orchestrator();
        orchestrator.on_delivery(SensorKind::Gyroscope, Ok(accel(1.0)));

        assert!(orchestrator.latest(SensorKind::Gyroscope).is_none());
        assert_eq!(orchestrator.history_len(SensorKind::Gyroscope), 0);
    }

    #[test]
    fn barometer_samples_land_in_altimeter_history() {
        let orchestrator = orchestrator();
        orchestrator.on_delivery(SensorKind::Barometer, Ok(altitude(1.0, 0.5)));

        let latest = orchestrator.latest(SensorKind::Altimeter).unwrap();
        assert_eq!(latest.kind, SensorKind::Barometer);
        assert_eq!(
            orchestrator.history(SensorKind::Barometer),
            orchestrator.history(SensorKind::Altimeter)
        );
    }

    #[test]
    fn clearing_altimeter_empties_shared_history() {
        let orchestrator = orchestrator();
        orchestrator.on_delivery(SensorKind::Altimeter, Ok(altitude(1.0, 0.5)));

        orchestrator.clear_buffer(SensorKind::Altimeter);
        assert_eq!(orchestrator.history_len(SensorKind::Barometer), 0);
        // Latest survives a clear
        assert!(orchestrator.latest(SensorKind::Altimeter).is_some());
    }

    #[test]
    fn callback_after_drop_is_ignored() {
        let provider = std::sync::Arc::new(RecordingProvider::new());
        let orchestrator = SensorOrchestrator::new(std::sync::Arc::clone(&provider)).unwrap();
        orchestrator.start_sensor(SensorKind::Accelerometer);
        drop(orchestrator);

        let late = provider.in_flight_callback(SensorStream::Acceleration).unwrap();
        late(Ok(accel(1.0)));

        let requests = provider.requests();
        assert_eq!(
            requests.last(),
            Some(&ProviderRequest::Stop { stream: SensorStream::Acceleration })
        );
    }

    #[test]
    fn status_walks_the_state_machine() {
        let provider = RecordingProvider::with_available(&[SensorKind::Gyroscope]);
        let orchestrator = SensorOrchestrator::new(provider).unwrap();

        assert_eq!(orchestrator.status(SensorKind::Accelerometer), SensorStatus::Unavailable);
        assert_eq!(orchestrator.status(SensorKind::Gyroscope), SensorStatus::Inactive);

        orchestrator.start_sensor(SensorKind::Gyroscope);
        assert_eq!(orchestrator.status(SensorKind::Gyroscope), SensorStatus::Active);

        orchestrator.stop_sensor(SensorKind::Gyroscope);
        assert_eq!(orchestrator.status(SensorKind::Gyroscope), SensorStatus::Inactive);
    }
}
