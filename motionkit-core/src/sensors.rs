//! Sensor Kinds, Physical Streams and Samples
//!
//! ## Logical Kinds vs Physical Streams
//!
//! Consumers address sensors by [`SensorKind`]. The hardware underneath is
//! addressed by [`SensorStream`]. The two are almost one-to-one, except that
//! the altimeter and the barometer are two views of a single altitude stream:
//!
//! ```text
//! SensorKind            SensorStream        buffer owner
//! ─────────────         ─────────────       ─────────────
//! Accelerometer   ───→  Acceleration        Accelerometer
//! Gyroscope       ───→  Rotation            Gyroscope
//! Magnetometer    ───→  MagneticField       Magnetometer
//! Altimeter       ──┬→  Altitude            Altimeter
//! Barometer       ──┘                       Altimeter
//! ```
//!
//! The sharing is expressed once, in [`SensorKind::stream`] and
//! [`SensorKind::buffer_owner`], instead of being repeated in every match
//! over the kinds. Stopping either alias stops the shared stream, and the
//! altitude history belongs to the altimeter.

use crate::constants::{SENSOR_KIND_COUNT, SENSOR_STREAM_COUNT};
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Logical motion sensor exposed to consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum SensorKind {
    /// Linear acceleration including gravity
    Accelerometer = 0,
    /// Rotation rate
    Gyroscope = 1,
    /// Raw magnetic field
    Magnetometer = 2,
    /// Relative altitude; owns the altitude history
    Altimeter = 3,
    /// Pressure view of the altitude stream
    Barometer = 4,
}

impl SensorKind {
    /// Every kind, in declaration order
    pub const ALL: [SensorKind; SENSOR_KIND_COUNT] = [
        SensorKind::Accelerometer,
        SensorKind::Gyroscope,
        SensorKind::Magnetometer,
        SensorKind::Altimeter,
        SensorKind::Barometer,
    ];

    /// Position of this kind in per-kind tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Physical stream backing this kind
    pub const fn stream(self) -> SensorStream {
        match self {
            SensorKind::Accelerometer => SensorStream::Acceleration,
            SensorKind::Gyroscope => SensorStream::Rotation,
            SensorKind::Magnetometer => SensorStream::MagneticField,
            SensorKind::Altimeter | SensorKind::Barometer => SensorStream::Altitude,
        }
    }

    /// Kind whose latest slot and history hold this kind's samples
    pub const fn buffer_owner(self) -> SensorKind {
        match self {
            SensorKind::Barometer => SensorKind::Altimeter,
            other => other,
        }
    }

    /// Whether this kind reads through another kind's buffer
    pub const fn is_alias(self) -> bool {
        self.buffer_owner() as u8 != self as u8
    }

    /// Get human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
            SensorKind::Magnetometer => "magnetometer",
            SensorKind::Altimeter => "altimeter",
            SensorKind::Barometer => "barometer",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hardware stream a provider starts and stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum SensorStream {
    /// Accelerometer output
    Acceleration = 0,
    /// Gyroscope output
    Rotation = 1,
    /// Magnetometer output
    MagneticField = 2,
    /// Altimeter output, shared by the altimeter and barometer kinds
    Altitude = 3,
}

impl SensorStream {
    /// Every stream, in declaration order
    pub const ALL: [SensorStream; SENSOR_STREAM_COUNT] = [
        SensorStream::Acceleration,
        SensorStream::Rotation,
        SensorStream::MagneticField,
        SensorStream::Altitude,
    ];

    /// Position of this stream in per-stream tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Get human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            SensorStream::Acceleration => "acceleration",
            SensorStream::Rotation => "rotation",
            SensorStream::MagneticField => "magnetic_field",
            SensorStream::Altitude => "altitude",
        }
    }

    /// Get expected unit of measurement
    pub const fn unit(self) -> &'static str {
        match self {
            SensorStream::Acceleration => "g",
            SensorStream::Rotation => "rad/s",
            SensorStream::MagneticField => "μT",
            SensorStream::Altitude => "m",
        }
    }
}

impl fmt::Display for SensorStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a sensor kind sits in its lifecycle
///
/// ```text
/// Unavailable ──discover──→ Inactive ──start──→ Active
///                              ↑                  │
///                              └──────stop────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorStatus {
    /// Hardware not present (or discovery has not seen it)
    Unavailable,
    /// Present but not delivering
    Inactive,
    /// Start request issued and its stream not stopped since
    Active,
}

/// Three-axis measurement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3 {
    /// X axis component
    pub x: f64,
    /// Y axis component
    pub y: f64,
    /// Z axis component
    pub z: f64,
}

impl Vector3 {
    /// Build from components
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Kind-specific measurement carried by a [`Sample`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SamplePayload {
    /// Acceleration including gravity, in g
    Acceleration(Vector3),
    /// Rotation rate around each axis, in rad/s
    RotationRate(Vector3),
    /// Raw magnetic field, in μT
    MagneticField(Vector3),
    /// Altitude change since updates started plus the pressure behind it
    Altitude {
        /// Meters relative to the first sample of this run
        relative_altitude_m: f64,
        /// Barometric pressure in kPa
        pressure_kpa: f64,
    },
}

impl SamplePayload {
    /// Stream that produces payloads of this shape
    pub const fn stream(&self) -> SensorStream {
        match self {
            SamplePayload::Acceleration(_) => SensorStream::Acceleration,
            SamplePayload::RotationRate(_) => SensorStream::Rotation,
            SamplePayload::MagneticField(_) => SensorStream::MagneticField,
            SamplePayload::Altitude { .. } => SensorStream::Altitude,
        }
    }
}

/// Single timestamped reading from one sensor kind
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Kind the reading was delivered for
    pub kind: SensorKind,
    /// Seconds on the provider's clock
    pub timestamp: f64,
    /// Measurement
    pub payload: SamplePayload,
}

impl Sample {
    /// Build a sample
    pub const fn new(kind: SensorKind, timestamp: f64, payload: SamplePayload) -> Self {
        Self { kind, timestamp, payload }
    }

    /// Stream that produced the payload
    pub const fn stream(&self) -> SensorStream {
        self.payload.stream()
    }
}

/// Provider-side reading, before it is bound to a sensor kind
///
/// Providers address hardware streams, not kinds, so they deliver readings;
/// the callback the orchestrator registers for a kind turns each one into a
/// [`Sample`] of that kind.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Seconds on the provider's clock
    pub timestamp: f64,
    /// Measurement
    pub payload: SamplePayload,
}

impl Reading {
    /// Build a reading
    pub const fn new(timestamp: f64, payload: SamplePayload) -> Self {
        Self { timestamp, payload }
    }

    /// Attach the kind this reading was delivered for
    pub const fn into_sample(self, kind: SensorKind) -> Sample {
        Sample::new(kind, self.timestamp, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn altitude_kinds_share_a_stream() {
        assert_eq!(SensorKind::Altimeter.stream(), SensorStream::Altitude);
        assert_eq!(SensorKind::Barometer.stream(), SensorStream::Altitude);
        assert_eq!(SensorKind::Barometer.buffer_owner(), SensorKind::Altimeter);
        assert!(SensorKind::Barometer.is_alias());
        assert!(!SensorKind::Altimeter.is_alias());
    }

    #[test]
    fn every_other_kind_owns_its_stream() {
        for kind in SensorKind::ALL {
            if kind == SensorKind::Barometer {
                continue;
            }
            assert_eq!(kind.buffer_owner(), kind);
            assert!(!kind.is_alias());
        }
    }

    #[test]
    fn indices_match_table_order() {
        for (i, kind) in SensorKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        for (i, stream) in SensorStream::ALL.iter().enumerate() {
            assert_eq!(stream.index(), i);
        }
    }

    #[test]
    fn payload_reports_its_stream() {
        let sample = Sample::new(
            SensorKind::Barometer,
            1.5,
            SamplePayload::Altitude { relative_altitude_m: 0.4, pressure_kpa: 101.2 },
        );
        assert_eq!(sample.stream(), SensorKind::Barometer.stream());

        let sample = Sample::new(
            SensorKind::Gyroscope,
            0.0,
            SamplePayload::RotationRate(Vector3::new(0.0, 0.1, 0.0)),
        );
        assert_eq!(sample.stream(), SensorStream::Rotation);
    }

    #[test]
    fn reading_binds_to_kind() {
        let field = Vector3::new(20.0, -5.0, -40.0);
        let reading = Reading::new(2.0, SamplePayload::MagneticField(field));
        let sample = reading.into_sample(SensorKind::Magnetometer);
        assert_eq!(sample.kind, SensorKind::Magnetometer);
        assert_eq!(sample.timestamp, 2.0);
        assert_eq!(sample.payload, reading.payload);
    }

    #[test]
    fn magnitude_of_gravity() {
        let v = Vector3::new(0.0, 0.0, -1.0);
        assert_eq!(v.magnitude(), 1.0);
    }
}
