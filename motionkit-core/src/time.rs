//! Time sources for sample timestamps
//!
//! Sample timestamps are seconds as `f64`, matching what motion platforms
//! report. Providers decide which clock they stamp with:
//! - Monotonic (seconds since the source was created)
//! - System clock (seconds since the Unix epoch)
//! - Fixed (tests and replays)

use std::time::Instant;

/// Timestamp in seconds
pub type Timestamp = f64;

/// Source of time for sample stamping
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in seconds
    fn now(&self) -> Timestamp;
}

/// Monotonic time source
///
/// Starts at 0 when created, always increases
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: Instant,
}

impl MonotonicTime {
    /// Start counting from now
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_secs_f64()
    }
}

/// Wall clock time source
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Always report `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}
