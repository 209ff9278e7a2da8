//! Common test utilities for integration tests
//!
//! This module provides:
//! - Orchestrator fixtures wired to a recording provider
//! - Reading generators shaped like each physical stream
//! - Helpers for reading provider request logs
//! - A provider that holds `start_updates` open until the test releases it

#![allow(dead_code)]

use std::sync::{mpsc, Mutex};
use std::time::Duration;

use motionkit_core::provider::{ProviderRequest, RecordingProvider};
use motionkit_core::{
    MotionProvider, OrchestratorConfig, Reading, SampleCallback, SamplePayload, SensorKind,
    SensorOrchestrator, SensorStream, Vector3,
};

/// Orchestrator over a provider reporting every kind
pub fn full_rig() -> SensorOrchestrator<RecordingProvider> {
    SensorOrchestrator::new(RecordingProvider::new()).expect("default config is valid")
}

/// Orchestrator over a provider reporting only `kinds`
pub fn rig_with(kinds: &[SensorKind]) -> SensorOrchestrator<RecordingProvider> {
    SensorOrchestrator::new(RecordingProvider::with_available(kinds))
        .expect("default config is valid")
}

/// Orchestrator with a small history so overflow is cheap to reach
pub fn small_rig(capacity: usize) -> SensorOrchestrator<RecordingProvider> {
    let config = OrchestratorConfig::default().with_buffer_capacity(capacity);
    SensorOrchestrator::with_config(RecordingProvider::new(), config)
        .expect("capacity is positive")
}

/// Reading shaped for `stream`, with `seq` encoded so order can be checked
pub fn reading_for(stream: SensorStream, seq: u32) -> Reading {
    let t = seq as f64 * 0.01;
    let v = seq as f64;
    let payload = match stream {
        SensorStream::Acceleration => SamplePayload::Acceleration(Vector3::new(v, 0.0, -1.0)),
        SensorStream::Rotation => SamplePayload::RotationRate(Vector3::new(0.0, v, 0.0)),
        SensorStream::MagneticField => SamplePayload::MagneticField(Vector3::new(20.0, -5.0, v)),
        SensorStream::Altitude => SamplePayload::Altitude {
            relative_altitude_m: v,
            pressure_kpa: 101.325 - 0.012 * v,
        },
    };
    Reading::new(t, payload)
}

/// Recover the `seq` a reading was generated with
pub fn seq_of(payload: &SamplePayload) -> u32 {
    let v = match payload {
        SamplePayload::Acceleration(a) => a.x,
        SamplePayload::RotationRate(r) => r.y,
        SamplePayload::MagneticField(m) => m.z,
        SamplePayload::Altitude { relative_altitude_m, .. } => *relative_altitude_m,
    };
    v as u32
}

/// Streams addressed by start requests, in order
pub fn started_streams(provider: &RecordingProvider) -> Vec<SensorStream> {
    provider
        .requests()
        .into_iter()
        .filter_map(|r| match r {
            ProviderRequest::Start { stream, .. } => Some(stream),
            ProviderRequest::Stop { .. } => None,
        })
        .collect()
}

/// Streams addressed by stop requests, in order
pub fn stopped_streams(provider: &RecordingProvider) -> Vec<SensorStream> {
    provider
        .requests()
        .into_iter()
        .filter_map(|r| match r {
            ProviderRequest::Stop { stream } => Some(stream),
            ProviderRequest::Start { .. } => None,
        })
        .collect()
}

/// Recording provider whose `start_updates` blocks until the gate opens
pub struct GatedProvider {
    pub inner: RecordingProvider,
    entered: Mutex<mpsc::Sender<SensorStream>>,
    release: Mutex<mpsc::Receiver<()>>,
}

/// Test-side handle of a [`GatedProvider`]
pub struct Gate {
    entered: mpsc::Receiver<SensorStream>,
    release: mpsc::Sender<()>,
}

impl GatedProvider {
    pub fn with_gate() -> (Self, Gate) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let provider = Self {
            inner: RecordingProvider::new(),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        (provider, Gate { entered: entered_rx, release: release_tx })
    }
}

impl Gate {
    /// Wait until a start request is parked inside the provider
    pub fn wait_entered(&self) -> SensorStream {
        self.entered
            .recv_timeout(Duration::from_secs(5))
            .expect("start request never reached the provider")
    }

    /// Let one parked start request through
    pub fn open(&self) {
        self.release.send(()).expect("provider dropped");
    }
}

impl MotionProvider for GatedProvider {
    fn is_available(&self, kind: SensorKind) -> bool {
        self.inner.is_available(kind)
    }

    fn start_updates(&self, stream: SensorStream, interval_secs: f64, on_sample: SampleCallback) {
        let _ = self.entered.lock().unwrap().send(stream);
        let _ = self.release.lock().unwrap().recv_timeout(Duration::from_secs(5));
        self.inner.start_updates(stream, interval_secs, on_sample);
    }

    fn stop_updates(&self, stream: SensorStream) {
        self.inner.stop_updates(stream);
    }
}
