//! Motion Provider Capability
//!
//! ## Overview
//!
//! The orchestrator never touches hardware. Everything it knows about the
//! sensors comes through a [`MotionProvider`]: whether a kind exists, a request
//! to start a stream at some interval, and a request to stop it. Samples come
//! back asynchronously through the [`SampleCallback`] handed over at start.
//!
//! ```text
//!  SensorOrchestrator                         MotionProvider
//!         │ is_available(kind) ─────────────────→ │
//!         │ start_updates(stream, secs, cb) ────→ │
//!         │                                       │ (hardware thread)
//!         │ ←──────────────── cb(Ok(reading)) ─── │
//!         │ ←──────────────── cb(Err(denied)) ─── │
//!         │ stop_updates(stream) ───────────────→ │
//!         │ ←─────────── cb(Ok(reading)) (late) ─ │
//! ```
//!
//! ## Contract
//!
//! - Start and stop return immediately; there is no confirmation.
//! - Callbacks may run on any thread, including the caller's.
//! - Readings for one stream arrive in production order. Nothing is promised
//!   across streams.
//! - A callback already in flight when `stop_updates` is called may still
//!   run afterwards.
//! - Starting a stream that is already running replaces its callback and
//!   interval.
//!
//! ## Bundled Providers
//!
//! - [`RecordingProvider`]: logs every request and lets the caller push
//!   readings by hand. Used by tests and by consumers driving the
//!   orchestrator from their own event source.
//! - [`SimulatedProvider`]: one background thread per running stream,
//!   producing synthetic readings at the requested interval.

use crate::errors::ProviderError;
use crate::sensors::{Reading, SensorKind, SensorStream};
use std::sync::Arc;

pub mod recording;
pub mod simulated;

pub use recording::{ProviderRequest, RecordingProvider};
pub use simulated::SimulatedProvider;

/// What a provider hands to a callback on each tick
pub type Delivery = Result<Reading, ProviderError>;

/// Sample delivery callback
///
/// Shared through `Arc` so providers can keep a copy per stream and clone it
/// into worker threads.
pub type SampleCallback = Arc<dyn Fn(Delivery) + Send + Sync>;

/// Source of motion samples
pub trait MotionProvider: Send + Sync {
    /// Whether the hardware behind `kind` exists on this device
    fn is_available(&self, kind: SensorKind) -> bool;

    /// Ask for continuous delivery of `stream` every `interval_secs`
    ///
    /// The cadence is a request; providers may deliver faster or slower.
    fn start_updates(&self, stream: SensorStream, interval_secs: f64, on_sample: SampleCallback);

    /// Ask for delivery of `stream` to cease
    fn stop_updates(&self, stream: SensorStream);
}

impl<P: MotionProvider + ?Sized> MotionProvider for Arc<P> {
    fn is_available(&self, kind: SensorKind) -> bool {
        (**self).is_available(kind)
    }

    fn start_updates(&self, stream: SensorStream, interval_secs: f64, on_sample: SampleCallback) {
        (**self).start_updates(stream, interval_secs, on_sample)
    }

    fn stop_updates(&self, stream: SensorStream) {
        (**self).stop_updates(stream)
    }
}
