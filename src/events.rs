// TremorTrack — Shared Data Types & Result Sink

use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Sensor Data (3-axis accelerometer reading, m/s²)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

// ---------------------------------------------------------------------------
// Band Classification (one capture window's verdict)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandClassification {
    /// Frequency of the dominant spectral bin within the search range (Hz).
    /// 0.0 when the spectrum is flat zero.
    pub peak_frequency_hz: f32,
    /// Peak fell inside the tremor band [3.0, 5.0) Hz.
    pub tremor_band: bool,
    /// Peak fell inside the dyskinesia band [5.0, 7.0] Hz.
    pub dyskinesia_band: bool,
    /// Share of band energy in [3, 5) Hz, 0–100 %.
    pub tremor_energy_pct: f32,
    /// Share of band energy in [5, 7] Hz, 0–100 %.
    pub dyskinesia_energy_pct: f32,
}

// ---------------------------------------------------------------------------
// Classification Result — the hand-off record read by the UI task
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationResult {
    /// RMS magnitude of the capture window (m/s², gravity-compensated).
    pub magnitude: f32,
    /// Tremor confirmed across the debounce window.
    pub tremor_detected: bool,
    /// Dyskinesia confirmed across the debounce window.
    pub dyskinesia_detected: bool,
    /// Monotonic milliseconds at publish time.
    pub timestamp_ms: u64,
}

/// Single hand-off point between the classifier and the UI task.
///
/// All fields are written together under the lock, so a reader always
/// observes a self-consistent snapshot — never a new detection flag paired
/// with a stale magnitude. Overwritten in place each capture cycle; readers
/// poll at their own cadence.
pub struct ResultSink {
    inner: Mutex<ClassificationResult>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ClassificationResult::default()),
        }
    }

    /// Overwrite the shared record, stamping it with `now_ms`.
    pub fn publish(&self, magnitude: f32, tremor: bool, dyskinesia: bool, now_ms: u64) {
        let mut result = self.inner.lock().unwrap();
        *result = ClassificationResult {
            magnitude,
            tremor_detected: tremor,
            dyskinesia_detected: dyskinesia,
            timestamp_ms: now_ms,
        };
    }

    /// Copy out the latest record.
    pub fn snapshot(&self) -> ClassificationResult {
        *self.inner.lock().unwrap()
    }
}

impl Default for ResultSink {
    fn default() -> Self {
        Self::new()
    }
}
