// TremorTrack — Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging and the shared I2C bus.
//   2. Probe the ADXL345 and configure its activity interrupt (self-test).
//   3. Route the activity interrupt to the motion trigger latch.
//   4. Spawn the classifier task.
//
// If the accelerometer fails its setup, the classifier task is never
// spawned: the rest of the system keeps running and the UI collaborator
// sees the default all-false result record.

// On the host only the tests reach into the core modules; keep the lint
// honest for the target build.
#![cfg_attr(not(target_os = "espidf"), allow(dead_code))]

mod capture;
mod classify;
mod config;
mod debounce;
mod events;
mod pipeline;
mod sampler;
mod spectrum;
mod trigger;

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod tasks;


// ---------------------------------------------------------------------------
// Utility: milliseconds since boot (monotonic, from the free-running timer)
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u64 {
    unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u64 }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{IOPin, InterruptType, PinDriver, Pull};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use crate::config::*;
    use crate::drivers::accel::Adxl345;
    use crate::events::ResultSink;
    use crate::trigger::TriggerLatch;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("TremorTrack firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // ---- I2C bus (shared with the display collaborator) -------------------
    let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA
        peripherals.pins.gpio7, // SCL
        &i2c_config,
    )?;
    // SAFETY: The I2C peripheral is a singleton obtained from `Peripherals::take()`.
    // It will live for the entire programme duration (embedded firmware never exits).
    let i2c_bus: &'static Mutex<I2cDriver<'static>> =
        Box::leak(Box::new(Mutex::new(unsafe { core::mem::transmute(i2c) })));

    // ---- Shared state -----------------------------------------------------
    let trigger = Arc::new(TriggerLatch::new());
    let sink = Arc::new(ResultSink::new());

    // ---- Accelerometer self-test and setup --------------------------------
    let accel = Adxl345::new(i2c_bus);
    let accel_ok = accel.is_connected();
    log::info!("Self-test — ADXL345: {}", if accel_ok { "OK" } else { "MISSING" });

    let sampling_enabled = accel_ok
        && match accel.begin() {
            Ok(()) => true,
            Err(e) => {
                log::error!("ADXL345 setup failed: {}", e);
                false
            }
        };

    // ---- Activity interrupt → trigger latch -------------------------------
    // The ISR does a single atomic store; clearing the sensor's latched
    // interrupt source happens in the classifier loop, which owns the bus.
    let mut int_pin = PinDriver::input(peripherals.pins.gpio3.downgrade())?;
    int_pin.set_pull(Pull::Down)?;
    int_pin.set_interrupt_type(InterruptType::PosEdge)?;
    let isr_trigger = Arc::clone(&trigger);
    unsafe {
        int_pin.subscribe(move || {
            isr_trigger.raise();
        })?;
    }
    int_pin.enable_interrupt()?;

    // ---- Spawn the classifier task ----------------------------------------
    if sampling_enabled {
        let task_trigger = Arc::clone(&trigger);
        let task_sink = Arc::clone(&sink);
        thread::Builder::new()
            .name("classifier".into())
            .stack_size(STACK_CLASSIFIER)
            .spawn(move || {
                tasks::classifier::classifier_task(accel, task_trigger, task_sink);
            })?;
        log::info!("Boot complete — classifier armed");
    } else {
        log::error!("Sampling disabled — classifier will not run this power cycle");
    }

    // Main thread has nothing left to do; surface the latest result on the
    // debug channel now and then while the tasks do the work.
    loop {
        thread::sleep(Duration::from_secs(60));
        let result = sink.snapshot();
        log::info!(
            "Status: magnitude {:.2} m/s² | tremor={} dyskinesia={} | t={} ms",
            result.magnitude,
            result.tremor_detected,
            result.dyskinesia_detected,
            result.timestamp_ms,
        );
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("tremortrack is firmware — build it for the espidf target.");
    eprintln!("Host builds exist so the classification core can run `cargo test`.");
}
