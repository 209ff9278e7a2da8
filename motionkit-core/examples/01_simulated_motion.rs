//! Simulated Motion Example
//!
//! Drives the orchestrator with the bundled simulated provider: discovers
//! the sensors, starts most of them, lets samples accumulate, then inspects
//! latest values and history before shutting everything down.
//!
//! ## What You'll Learn
//!
//! - Building an orchestrator from a configuration
//! - Starting sensors with and without an explicit interval
//! - Reading latest samples and buffered history
//! - How the altimeter and barometer share one stream
//! - Stamping samples with wall-clock time
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_motion
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use motionkit_core::time::SystemClock;
use motionkit_core::{
    OrchestratorConfig, SamplePayload, SensorKind, SensorOrchestrator, SimulatedProvider,
};

fn main() {
    println!("MotionKit Simulated Motion Example");
    println!("==================================\n");

    let config = OrchestratorConfig::default()
        .with_buffer_capacity(32)
        .with_default_interval(0.05);
    // Unix-epoch timestamps instead of seconds since start
    let provider = SimulatedProvider::new().with_clock(Arc::new(SystemClock));
    let orchestrator = match SensorOrchestrator::with_config(provider, config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("Could not build orchestrator: {e}");
            return;
        }
    };

    println!("Available sensors:");
    for kind in orchestrator.available_sensors() {
        println!("  {kind} ({} stream, {})", kind.stream(), kind.stream().unit());
    }
    println!();

    // Accelerometer at 100 Hz; everything else at the 20 Hz default
    orchestrator.start_sensor_with_interval(SensorKind::Accelerometer, 0.01);
    orchestrator.set_update_interval(0.05);
    orchestrator.start_all_except(SensorKind::Barometer);

    println!("Active sensors: {:?}\n", orchestrator.active_sensors());
    thread::sleep(Duration::from_millis(500));

    for kind in orchestrator.active_sensors() {
        let history = orchestrator.history(kind);
        println!("{kind}: {} buffered (capacity {})", history.len(), orchestrator.capacity());

        if let Some(latest) = orchestrator.latest(kind) {
            match latest.payload {
                SamplePayload::Acceleration(a) => {
                    println!("  latest: |a| = {:.3} g at t={:.3}s", a.magnitude(), latest.timestamp)
                }
                SamplePayload::RotationRate(r) => {
                    println!("  latest: ω_z = {:+.4} rad/s at t={:.3}s", r.z, latest.timestamp)
                }
                SamplePayload::MagneticField(m) => println!(
                    "  latest: |B| = {:.1} μT at t={:.3}s",
                    m.magnitude(),
                    latest.timestamp
                ),
                SamplePayload::Altitude { relative_altitude_m, pressure_kpa } => println!(
                    "  latest: {:+.2} m, {:.3} kPa at t={:.3}s",
                    relative_altitude_m, pressure_kpa, latest.timestamp
                ),
            }
        }
    }

    // The barometer reads the altimeter's stream
    println!(
        "\nBarometer sees {} altitude samples through the altimeter",
        orchestrator.history_len(SensorKind::Barometer)
    );

    orchestrator.clear_buffer(SensorKind::Accelerometer);
    println!(
        "Accelerometer history after clear: {}",
        orchestrator.history_len(SensorKind::Accelerometer)
    );

    orchestrator.stop_all_sensors();
    println!("Active after stop_all_sensors: {:?}", orchestrator.active_sensors());
}
