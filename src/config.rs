// TremorTrack — Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_ACCEL_INT: i32 = 3;   // D1/A1 — ADXL345 INT1 (activity interrupt, rising edge)
pub const PIN_I2C_SDA: i32 = 6;     // D4    — I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5    — I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_ADXL345: u8 = 0x1D;   // ALT ADDRESS pin tied high
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_CLASSIFIER: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SAMPLE_PERIOD_MS: u64 = 20;           // 50 Hz capture cadence
pub const CLASSIFIER_POLL_INTERVAL_MS: u64 = 2; // task poll rate, well under the sample period

pub const SAMPLE_RATE_HZ: f32 = 1000.0 / SAMPLE_PERIOD_MS as f32;

// ---------------------------------------------------------------------------
// Capture Window / Spectrum
// ---------------------------------------------------------------------------
// Window length must be a power of two (forward FFT) and long enough for the
// band edges to land on distinct bins: 128 @ 50 Hz gives ~0.39 Hz per bin.
pub const WINDOW_SAMPLES: usize = 128;
pub const SPECTRUM_BINS: usize = WINDOW_SAMPLES / 2;

/// Fixed gravity subtraction applied to the 3-axis magnitude (m/s²).
pub const GRAVITY_MS2: f32 = 9.81;

/// Fraction of the window mean subtracted before windowing, suppressing the
/// spurious near-DC peak left by residual gravity miscalibration.
pub const DC_CORRECTION_FACTOR: f32 = 0.25;

// ---------------------------------------------------------------------------
// Classification Bands (Hz)
// ---------------------------------------------------------------------------
pub const TREMOR_BAND_LOW_HZ: f32 = 3.0;      // inclusive
pub const TREMOR_BAND_HIGH_HZ: f32 = 5.0;     // exclusive
pub const DYSKINESIA_BAND_LOW_HZ: f32 = 5.0;  // inclusive
pub const DYSKINESIA_BAND_HIGH_HZ: f32 = 7.0; // inclusive
pub const PEAK_SEARCH_MAX_HZ: f32 = 10.0;     // bins above this are noise/aliasing

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------
/// Consecutive capture windows that must agree before a detection is surfaced.
pub const DEBOUNCE_WINDOWS: usize = 3;

// ---------------------------------------------------------------------------
// ADXL345 Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_LSB_PER_G: f32 = 256.0; // full-resolution mode, 3.9 mg/LSB
pub const ACCEL_MS2_PER_LSB: f32 = GRAVITY_MS2 / ACCEL_LSB_PER_G;

/// Activity-interrupt threshold, 62.5 mg/LSB (0x20 ≈ 2 g of delta).
pub const ACCEL_ACTIVITY_THRESHOLD: u8 = 0x20;
