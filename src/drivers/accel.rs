// TremorTrack — ADXL345 Accelerometer Driver
//
// Custom register-level driver over the shared I2C bus. Configures the
// activity interrupt at setup; the classifier core only ever sees 3-axis
// readings in m/s² through the `Accelerometer` trait.

use std::sync::Mutex;

use esp_idf_hal::i2c::I2cDriver;

use crate::config::*;
use crate::events::AccelSample;
use crate::sampler::Accelerometer;

/// Thread-safe handle to a shared I2C bus.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

// ADXL345 register addresses
const REG_DEVID: u8 = 0x00;
const REG_THRESH_ACT: u8 = 0x24;
const REG_ACT_INACT_CTL: u8 = 0x27;
const REG_BW_RATE: u8 = 0x2C;
const REG_POWER_CTL: u8 = 0x2D;
const REG_INT_ENABLE: u8 = 0x2E;
const REG_INT_MAP: u8 = 0x2F;
const REG_INT_SOURCE: u8 = 0x30;
const REG_DATA_FORMAT: u8 = 0x31;
const REG_DATAX0: u8 = 0x32; // Start of 6-byte axis burst
const DEVID_EXPECTED: u8 = 0xE5;

const INT_ACTIVITY: u8 = 0x10;

pub struct Adxl345 {
    bus: SharedBus,
}

impl Adxl345 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let mut bus = self.bus.lock().unwrap();
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_ADXL345, &[REG_DEVID], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == DEVID_EXPECTED,
            Err(_) => false,
        }
    }

    /// Configure 50 Hz output, full-resolution ±16 g, and the AC-coupled
    /// activity interrupt routed to INT1. Called once at startup; the caller
    /// disables the whole classification subsystem if this fails.
    pub fn begin(&self) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().unwrap();

        // Output data rate 50 Hz
        bus.write(I2C_ADDR_ADXL345, &[REG_BW_RATE, 0x09], I2C_TIMEOUT_TICKS)?;

        // Full resolution, ±16 g
        bus.write(I2C_ADDR_ADXL345, &[REG_DATA_FORMAT, 0x0B], I2C_TIMEOUT_TICKS)?;

        // Activity threshold (62.5 mg/LSB), AC-coupled on all three axes
        bus.write(
            I2C_ADDR_ADXL345,
            &[REG_THRESH_ACT, ACCEL_ACTIVITY_THRESHOLD],
            I2C_TIMEOUT_TICKS,
        )?;
        bus.write(I2C_ADDR_ADXL345, &[REG_ACT_INACT_CTL, 0xF0], I2C_TIMEOUT_TICKS)?;

        // Route the activity interrupt to INT1 and enable it
        bus.write(I2C_ADDR_ADXL345, &[REG_INT_MAP, 0x00], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_ADXL345, &[REG_INT_ENABLE, INT_ACTIVITY], I2C_TIMEOUT_TICKS)?;

        // Measure mode
        bus.write(I2C_ADDR_ADXL345, &[REG_POWER_CTL, 0x08], I2C_TIMEOUT_TICKS)?;

        log::info!("ADXL345 initialised (±16g full-res, 50Hz, activity INT on INT1)");
        Ok(())
    }
}

impl Accelerometer for Adxl345 {
    /// Burst-read all 3 axes and convert to m/s².
    fn read(&mut self) -> anyhow::Result<AccelSample> {
        let mut bus = self.bus.lock().unwrap();
        let mut raw = [0u8; 6];
        bus.write_read(I2C_ADDR_ADXL345, &[REG_DATAX0], &mut raw, I2C_TIMEOUT_TICKS)?;

        Ok(AccelSample {
            x: i16::from_le_bytes([raw[0], raw[1]]) as f32 * ACCEL_MS2_PER_LSB,
            y: i16::from_le_bytes([raw[2], raw[3]]) as f32 * ACCEL_MS2_PER_LSB,
            z: i16::from_le_bytes([raw[4], raw[5]]) as f32 * ACCEL_MS2_PER_LSB,
        })
    }

    /// Reading INT_SOURCE clears the latched activity interrupt so it can
    /// re-fire for the next episode.
    fn acknowledge_motion(&mut self) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().unwrap();
        let mut buf = [0u8; 1];
        bus.write_read(I2C_ADDR_ADXL345, &[REG_INT_SOURCE], &mut buf, I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}
