//! Synthetic motion source for demos and soak testing
//!
//! Each started stream gets a worker thread that wakes every interval and
//! delivers one synthetic reading. The readings describe a device lying flat
//! and rocking gently:
//!
//! | Stream        | Reading                                            |
//! |---------------|----------------------------------------------------|
//! | Acceleration  | ~1 g on -z with a small sway on x/y                |
//! | Rotation      | slow oscillation around z                          |
//! | MagneticField | constant mid-latitude field plus jitter            |
//! | Altitude      | relative altitude drifting upward, matching kPa    |
//!
//! Stopping a stream signals its worker and returns without waiting, so a
//! reading that is mid-delivery can still land after the stop. Dropping the
//! provider signals every worker and joins them.

use super::{MotionProvider, SampleCallback};
use crate::constants::{
    MAX_SIMULATED_INTERVAL_SECS, MIN_SIMULATED_INTERVAL_SECS, SENSOR_KIND_COUNT,
    SENSOR_STREAM_COUNT,
};
use crate::errors::ProviderError;
use crate::sensors::{Reading, SamplePayload, SensorKind, SensorStream, Vector3};
use crate::sync::lock;
use crate::time::{MonotonicTime, TimeSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sea-level standard pressure in kPa
const SEA_LEVEL_KPA: f64 = 101.325;

/// Pressure drop per meter near sea level, in kPa
const KPA_PER_METER: f64 = 0.012;

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn signal(&self) {
        self.stop.store(true, Ordering::Release);
        self.handle.thread().unpark();
    }
}

/// Provider producing synthetic readings on background threads
pub struct SimulatedProvider {
    available: [bool; SENSOR_KIND_COUNT],
    clock: Arc<dyn TimeSource>,
    workers: Mutex<[Option<Worker>; SENSOR_STREAM_COUNT]>,
}

impl SimulatedProvider {
    /// Simulate every sensor kind, stamped with a monotonic clock
    pub fn new() -> Self {
        Self::with_available(&SensorKind::ALL)
    }

    /// Simulate only `kinds`
    pub fn with_available(kinds: &[SensorKind]) -> Self {
        let mut available = [false; SENSOR_KIND_COUNT];
        for kind in kinds {
            available[kind.index()] = true;
        }

        Self {
            available,
            clock: Arc::new(MonotonicTime::new()),
            workers: Mutex::new(Default::default()),
        }
    }

    /// Stamp readings with `clock` instead of the monotonic default
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Whether a worker is currently producing `stream`
    pub fn is_running(&self, stream: SensorStream) -> bool {
        lock(&self.workers)[stream.index()]
            .as_ref()
            .map_or(false, |worker| !worker.stop.load(Ordering::Acquire))
    }

    fn spawn_worker(
        &self,
        stream: SensorStream,
        interval: Duration,
        on_sample: SampleCallback,
    ) -> std::io::Result<Worker> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let clock = Arc::clone(&self.clock);

        let handle = thread::Builder::new()
            .name(format!("motionkit-{}", stream.name()))
            .spawn(move || {
                let mut tick: u64 = 0;
                loop {
                    thread::park_timeout(interval);
                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }
                    let reading = Reading::new(clock.now(), synthetic_payload(stream, tick));
                    on_sample(Ok(reading));
                    tick = tick.wrapping_add(1);
                }
            })?;

        Ok(Worker { stop, handle })
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionProvider for SimulatedProvider {
    fn is_available(&self, kind: SensorKind) -> bool {
        self.available[kind.index()]
    }

    fn start_updates(&self, stream: SensorStream, interval_secs: f64, on_sample: SampleCallback) {
        let clamped =
            interval_secs.clamp(MIN_SIMULATED_INTERVAL_SECS, MAX_SIMULATED_INTERVAL_SECS);
        let interval = match Duration::try_from_secs_f64(clamped) {
            Ok(interval) => interval,
            Err(_e) => {
                log_warn!("rejecting simulated {} interval {}: {}", stream, interval_secs, _e);
                on_sample(Err(ProviderError::HardwareUnavailable));
                return;
            }
        };
        let mut workers = lock(&self.workers);

        // A second start replaces the running worker
        if let Some(previous) = workers[stream.index()].take() {
            previous.signal();
        }

        match self.spawn_worker(stream, interval, Arc::clone(&on_sample)) {
            Ok(worker) => {
                log_debug!("simulated {} stream every {:?}", stream, interval);
                workers[stream.index()] = Some(worker);
            }
            Err(_e) => {
                log_warn!("could not spawn simulated {} worker: {}", stream, _e);
                drop(workers);
                on_sample(Err(ProviderError::HardwareUnavailable));
            }
        }
    }

    fn stop_updates(&self, stream: SensorStream) {
        if let Some(worker) = lock(&self.workers)[stream.index()].take() {
            worker.signal();
        }
    }
}

impl Drop for SimulatedProvider {
    fn drop(&mut self) {
        let workers = std::mem::take(&mut *lock(&self.workers));
        for worker in workers.into_iter().flatten() {
            worker.signal();
            let _ = worker.handle.join();
        }
    }
}

/// Deterministic reading for the `tick`-th delivery of `stream`
fn synthetic_payload(stream: SensorStream, tick: u64) -> SamplePayload {
    let phase = tick as f64 * 0.1;
    match stream {
        SensorStream::Acceleration => SamplePayload::Acceleration(Vector3::new(
            0.02 * phase.sin(),
            0.02 * phase.cos(),
            -1.0,
        )),
        SensorStream::Rotation => SamplePayload::RotationRate(Vector3::new(
            0.0,
            0.0,
            0.05 * phase.sin(),
        )),
        SensorStream::MagneticField => SamplePayload::MagneticField(Vector3::new(
            20.0 + 0.1 * phase.sin(),
            -5.0,
            -40.0 + 0.1 * phase.cos(),
        )),
        SensorStream::Altitude => {
            let relative_altitude_m = 0.01 * tick as f64;
            SamplePayload::Altitude {
                relative_altitude_m,
                pressure_kpa: SEA_LEVEL_KPA - KPA_PER_METER * relative_altitude_m,
            }
        }
    }
}
