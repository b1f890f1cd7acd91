// TremorTrack — Band Classifier
//
// Scans a magnitude spectrum for the dominant low-frequency peak and
// integrates per-band energy. Classification is a pure function of the
// spectrum; the only policy knob is the bin weighting applied during the
// peak search, kept pluggable so the tremor bias can be tuned or disabled
// without touching the search loop.

use crate::config::{
    DYSKINESIA_BAND_HIGH_HZ, DYSKINESIA_BAND_LOW_HZ, PEAK_SEARCH_MAX_HZ, SPECTRUM_BINS,
    TREMOR_BAND_HIGH_HZ, TREMOR_BAND_LOW_HZ, WINDOW_SAMPLES,
};
use crate::events::BandClassification;

/// Weighting applied to each bin's magnitude before the peak comparison.
/// Affects which bin wins the search, never the reported energy split.
pub type BinWeighting = fn(freq_hz: f32, magnitude: f32) -> f32;

/// Identity weighting: the peak is simply the largest-magnitude bin.
pub fn neutral_weighting(_freq_hz: f32, magnitude: f32) -> f32 {
    magnitude
}

/// Heuristic bias toward tremor when amplitudes are close: boosts bins in
/// the tremor band and suppresses the very low end, where residual gravity
/// leakage tends to pile up.
pub fn tremor_bias_weighting(freq_hz: f32, magnitude: f32) -> f32 {
    if freq_hz < 1.5 {
        magnitude * 0.5
    } else if (TREMOR_BAND_LOW_HZ..TREMOR_BAND_HIGH_HZ).contains(&freq_hz) {
        magnitude * 1.25
    } else {
        magnitude
    }
}

pub struct BandClassifier {
    sample_rate_hz: f32,
    weighting: BinWeighting,
}

impl BandClassifier {
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            sample_rate_hz,
            weighting: neutral_weighting,
        }
    }

    pub fn with_weighting(sample_rate_hz: f32, weighting: BinWeighting) -> Self {
        Self {
            sample_rate_hz,
            weighting,
        }
    }

    fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate_hz / WINDOW_SAMPLES as f32
    }

    /// Classify one window's spectrum.
    ///
    /// The peak search covers bins 1..N/2 (the DC bin is always excluded)
    /// restricted to frequencies at or below the search ceiling. When no bin
    /// rises above zero the peak frequency stays 0 Hz and both energy
    /// percentages are 0 — never NaN.
    pub fn classify(&self, spectrum: &[f32; SPECTRUM_BINS]) -> BandClassification {
        let mut peak_frequency_hz = 0.0f32;
        let mut peak_weighted = 0.0f32;

        let mut tremor_energy = 0.0f32;
        let mut dyskinesia_energy = 0.0f32;

        for (bin, &magnitude) in spectrum.iter().enumerate().skip(1) {
            let freq = self.bin_frequency(bin);

            if freq <= PEAK_SEARCH_MAX_HZ {
                let weighted = (self.weighting)(freq, magnitude);
                if weighted > peak_weighted {
                    peak_weighted = weighted;
                    peak_frequency_hz = freq;
                }
            }

            let energy = magnitude * magnitude;
            if (TREMOR_BAND_LOW_HZ..TREMOR_BAND_HIGH_HZ).contains(&freq) {
                tremor_energy += energy;
            } else if (DYSKINESIA_BAND_LOW_HZ..=DYSKINESIA_BAND_HIGH_HZ).contains(&freq) {
                dyskinesia_energy += energy;
            }
        }

        let tremor_band = (TREMOR_BAND_LOW_HZ..TREMOR_BAND_HIGH_HZ).contains(&peak_frequency_hz);
        let dyskinesia_band =
            (DYSKINESIA_BAND_LOW_HZ..=DYSKINESIA_BAND_HIGH_HZ).contains(&peak_frequency_hz);

        // Percentages are relative to the two named bands, not the whole
        // spectrum; a dead spectrum reports 0/0 rather than dividing by zero.
        let band_total = tremor_energy + dyskinesia_energy;
        let (tremor_energy_pct, dyskinesia_energy_pct) = if band_total > 0.0 {
            (
                100.0 * tremor_energy / band_total,
                100.0 * dyskinesia_energy / band_total,
            )
        } else {
            (0.0, 0.0)
        };

        BandClassification {
            peak_frequency_hz,
            tremor_band,
            dyskinesia_band,
            tremor_energy_pct,
            dyskinesia_energy_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SAMPLE_RATE_HZ;

    const BIN_WIDTH_HZ: f32 = SAMPLE_RATE_HZ / WINDOW_SAMPLES as f32;

    fn spectrum_with(spikes: &[(usize, f32)]) -> [f32; SPECTRUM_BINS] {
        let mut spectrum = [0.0f32; SPECTRUM_BINS];
        for &(bin, magnitude) in spikes {
            spectrum[bin] = magnitude;
        }
        spectrum
    }

    #[test]
    fn zero_spectrum_reports_zero_everything() {
        let classifier = BandClassifier::new(SAMPLE_RATE_HZ);
        let result = classifier.classify(&[0.0; SPECTRUM_BINS]);
        assert_eq!(result.peak_frequency_hz, 0.0);
        assert!(!result.tremor_band);
        assert!(!result.dyskinesia_band);
        assert_eq!(result.tremor_energy_pct, 0.0);
        assert_eq!(result.dyskinesia_energy_pct, 0.0);
    }

    #[test]
    fn dc_bin_is_never_the_peak() {
        let classifier = BandClassifier::new(SAMPLE_RATE_HZ);
        // Huge DC component, modest tremor-band spike at bin 10 (~3.9 Hz).
        let result = classifier.classify(&spectrum_with(&[(0, 1000.0), (10, 5.0)]));
        assert!((result.peak_frequency_hz - 10.0 * BIN_WIDTH_HZ).abs() < 1e-4);
        assert!(result.tremor_band);
    }

    #[test]
    fn bins_above_search_ceiling_are_ignored() {
        let classifier = BandClassifier::new(SAMPLE_RATE_HZ);
        // Bin 30 is ~11.7 Hz — outside the 10 Hz search range despite the
        // larger magnitude.
        let result = classifier.classify(&spectrum_with(&[(30, 50.0), (10, 5.0)]));
        assert!((result.peak_frequency_hz - 10.0 * BIN_WIDTH_HZ).abs() < 1e-4);
    }

    #[test]
    fn tremor_band_membership_at_band_interior_bins() {
        let classifier = BandClassifier::new(SAMPLE_RATE_HZ);
        // Bin 12 = 4.6875 Hz, last bin inside [3, 5).
        let result = classifier.classify(&spectrum_with(&[(12, 5.0)]));
        assert!(result.tremor_band);
        assert!(!result.dyskinesia_band);

        // Bin 13 = 5.078 Hz, first bin inside [5, 7].
        let result = classifier.classify(&spectrum_with(&[(13, 5.0)]));
        assert!(!result.tremor_band);
        assert!(result.dyskinesia_band);
    }

    #[test]
    fn energy_percentages_split_across_named_bands() {
        let classifier = BandClassifier::new(SAMPLE_RATE_HZ);
        // Equal-energy spikes, one per band.
        let result = classifier.classify(&spectrum_with(&[(10, 3.0), (15, 3.0)]));
        assert!((result.tremor_energy_pct - 50.0).abs() < 1e-3);
        assert!((result.dyskinesia_energy_pct - 50.0).abs() < 1e-3);

        // 3:1 energy ratio (magnitudes are squared).
        let result = classifier.classify(&spectrum_with(&[(10, 3.0), (15, 1.0)]));
        assert!((result.tremor_energy_pct - 90.0).abs() < 1e-3);
        assert!((result.dyskinesia_energy_pct - 10.0).abs() < 1e-3);
    }

    #[test]
    fn energy_outside_named_bands_does_not_dilute_percentages() {
        let classifier = BandClassifier::new(SAMPLE_RATE_HZ);
        // Strong 8 Hz spike (bin 20) plus a tremor spike: percentages are
        // computed over the two named bands only.
        let result = classifier.classify(&spectrum_with(&[(10, 2.0), (20, 100.0)]));
        assert!((result.tremor_energy_pct - 100.0).abs() < 1e-3);
        assert_eq!(result.dyskinesia_energy_pct, 0.0);
    }

    #[test]
    fn tremor_bias_breaks_near_ties_toward_the_tremor_band() {
        // Bin 6 (~2.3 Hz, outside both bands) barely edges out bin 10.
        let spectrum = spectrum_with(&[(6, 5.2), (10, 5.0)]);

        let neutral = BandClassifier::new(SAMPLE_RATE_HZ);
        let result = neutral.classify(&spectrum);
        assert!((result.peak_frequency_hz - 6.0 * BIN_WIDTH_HZ).abs() < 1e-4);
        assert!(!result.tremor_band);

        let biased = BandClassifier::with_weighting(SAMPLE_RATE_HZ, tremor_bias_weighting);
        let result = biased.classify(&spectrum);
        assert!((result.peak_frequency_hz - 10.0 * BIN_WIDTH_HZ).abs() < 1e-4);
        assert!(result.tremor_band);
    }

    #[test]
    fn weighting_does_not_change_energy_percentages() {
        let spectrum = spectrum_with(&[(10, 4.0), (15, 2.0)]);
        let neutral = BandClassifier::new(SAMPLE_RATE_HZ).classify(&spectrum);
        let biased =
            BandClassifier::with_weighting(SAMPLE_RATE_HZ, tremor_bias_weighting).classify(&spectrum);
        assert_eq!(neutral.tremor_energy_pct, biased.tremor_energy_pct);
        assert_eq!(neutral.dyskinesia_energy_pct, biased.dyskinesia_energy_pct);
    }
}
