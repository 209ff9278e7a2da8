//! Time-Related Constants
//!
//! Update intervals are expressed in seconds as `f64`, matching the unit the
//! motion provider is asked for.

// ===== UPDATE INTERVALS =====

/// Update interval substituted whenever a non-positive one is configured.
pub const DEFAULT_UPDATE_INTERVAL_SECS: f64 = 5.0;

/// Fastest cadence the simulated provider will tick at (1 kHz).
///
/// Requests for shorter intervals are clamped so a test asking for
/// `f64::MIN_POSITIVE` does not spin a core.
pub const MIN_SIMULATED_INTERVAL_SECS: f64 = 0.001;

/// Slowest cadence the simulated provider will tick at (one hour).
///
/// Longer intervals, `f64::INFINITY` included, are clamped to this so the
/// worker's park timeout always fits in a `Duration`.
pub const MAX_SIMULATED_INTERVAL_SECS: f64 = 3_600.0;
