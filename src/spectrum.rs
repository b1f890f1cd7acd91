// TremorTrack — Spectral Analyzer
//
// Pure transform from a full capture window to a one-sided magnitude
// spectrum: DC-bias correction, Hamming window, forward FFT, complex-to-
// magnitude. The FFT plan and scratch buffers are built once at startup; the
// per-window path does no allocation.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use crate::config::{DC_CORRECTION_FACTOR, SPECTRUM_BINS, WINDOW_SAMPLES};

pub struct SpectralAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
    coefficients: [f32; WINDOW_SAMPLES],
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(WINDOW_SAMPLES);
        let scratch = vec![Complex32::default(); fft.get_inplace_scratch_len()];

        let mut coefficients = [0.0f32; WINDOW_SAMPLES];
        for (i, c) in coefficients.iter_mut().enumerate() {
            *c = hamming(i);
        }

        Self {
            fft,
            buffer: vec![Complex32::default(); WINDOW_SAMPLES],
            scratch,
            coefficients,
        }
    }

    /// Transform one full capture window into `SPECTRUM_BINS` magnitudes.
    /// Bin `i` corresponds to `i × sample_rate / WINDOW_SAMPLES` Hz; the
    /// mirrored upper half of the transform is discarded.
    pub fn analyze(&mut self, window: &[f32; WINDOW_SAMPLES]) -> [f32; SPECTRUM_BINS] {
        // Residual gravity miscalibration leaves a near-DC ridge; subtracting
        // a quarter of the window mean knocks it down without disturbing the
        // oscillatory content.
        let mean = window.iter().sum::<f32>() / WINDOW_SAMPLES as f32;
        let dc_bias = mean * DC_CORRECTION_FACTOR;

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            *slot = Complex32::new((window[i] - dc_bias) * self.coefficients[i], 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let mut magnitudes = [0.0f32; SPECTRUM_BINS];
        for (bin, magnitude) in self.buffer[..SPECTRUM_BINS].iter().zip(magnitudes.iter_mut()) {
            *magnitude = bin.norm();
        }
        magnitudes
    }
}

fn hamming(i: usize) -> f32 {
    0.54 - 0.46 * (2.0 * PI * i as f32 / (WINDOW_SAMPLES - 1) as f32).cos()
}
