//! Error Types for Motion Sensor Orchestration
//!
//! ## Design Philosophy
//!
//! Almost nothing in the orchestrator is allowed to fail. Starting an
//! unavailable sensor, starting one twice, stopping one that is idle or
//! passing a non-positive interval are all absorbed as silent no-ops. What is
//! left falls into two groups:
//!
//! 1. **Construction**: a zero-capacity history buffer or a configuration
//!    document that does not parse. These are returned as [`MotionError`]
//!    from constructors and never occur once an orchestrator exists.
//!
//! 2. **Delivery**: a provider reporting that it could not produce a sample
//!    this tick ([`ProviderError`]). These travel through the sample callback
//!    and are absorbed by the orchestrator, which leaves the sensor's latest
//!    sample and history untouched.
//!
//! Both enums are `Copy` and carry only `&'static str` context so they can
//! cross thread boundaries inside callbacks without allocation.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use motionkit_core::{MotionError, OrchestratorConfig};
//!
//! match OrchestratorConfig::default().with_buffer_capacity(0).validate() {
//!     Ok(()) => {}
//!     Err(MotionError::ZeroCapacity) => {
//!         // Pick a real capacity before building the orchestrator
//!     }
//!     Err(e) => panic!("unexpected: {e}"),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for fallible construction and configuration
pub type MotionResult<T> = Result<T, MotionError>;

/// Errors raised while building buffers or orchestrators
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionError {
    /// A history buffer must hold at least one sample
    #[error("Buffer capacity must be greater than zero")]
    ZeroCapacity,

    /// Configuration document could not be parsed
    #[error("Invalid configuration at line {line}, column {column}")]
    Config {
        /// 1-based line of the offending token
        line: usize,
        /// 1-based column of the offending token
        column: usize,
    },
}

/// Failure reported by a motion provider in place of a sample
///
/// The orchestrator treats every variant the same way ("no sample this
/// tick"); the distinction is kept for logging and for consumers that wire
/// their own providers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderError {
    /// The platform denied access to motion data
    #[error("Motion data access denied")]
    PermissionDenied,

    /// The hardware stream went away after it was started
    #[error("Sensor hardware unavailable")]
    HardwareUnavailable,

    /// The provider dropped this update for its own reasons
    #[error("Update interrupted: {reason}")]
    Interrupted {
        /// Provider-supplied cause
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for MotionError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ZeroCapacity =>
                defmt::write!(fmt, "Zero buffer capacity"),
            Self::Config { line, column } =>
                defmt::write!(fmt, "Config error at {}:{}", line, column),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ProviderError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::PermissionDenied =>
                defmt::write!(fmt, "Permission denied"),
            Self::HardwareUnavailable =>
                defmt::write!(fmt, "Hardware unavailable"),
            Self::Interrupted { reason } =>
                defmt::write!(fmt, "Interrupted: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = MotionError::Config { line: 3, column: 14 };
        assert_eq!(err.to_string(), "Invalid configuration at line 3, column 14");

        let err = ProviderError::Interrupted { reason: "queue full" };
        assert_eq!(err.to_string(), "Update interrupted: queue full");
    }
}
