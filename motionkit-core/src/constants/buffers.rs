//! Buffer Sizes and Sensor Table Dimensions

// ===== HISTORY BUFFER SIZES =====

/// Default number of samples kept per sensor.
///
/// At the 5 s default interval this is a little under an hour of history;
/// at 100 Hz it is ~6 s. Memory cost is capacity × sample size per stream:
/// - 624 samples × 40 bytes/sample ≈ 25KB per stream
/// - 4 physical streams ≈ 100KB worst case
pub const DEFAULT_BUFFER_CAPACITY: usize = 624;

// ===== SENSOR TABLE =====

/// Number of logical sensor kinds (`SensorKind::ALL`).
pub const SENSOR_KIND_COUNT: usize = 5;

/// Number of physical hardware streams (`SensorStream::ALL`).
///
/// One fewer than the kind count: altimeter and barometer share a stream.
pub const SENSOR_STREAM_COUNT: usize = 4;
