// TremorTrack — Classification Pipeline
//
// Owns all classifier state: trigger consumption, capture scheduling,
// spectral analysis, band classification, debounce, and result publication.
// Everything runs from a single cooperative loop; the only asynchronous
// input is the trigger latch, written from the activity ISR.

use std::sync::Arc;

use crate::capture::{CapturePoll, CaptureScheduler};
use crate::classify::{BandClassifier, BinWeighting};
use crate::config::{SAMPLE_RATE_HZ, WINDOW_SAMPLES};
use crate::debounce::DebounceConfirmer;
use crate::events::{BandClassification, ResultSink};
use crate::sampler::{Accelerometer, MagnitudeSampler};
use crate::spectrum::SpectralAnalyzer;
use crate::trigger::TriggerLatch;

pub struct ClassifierContext<A: Accelerometer> {
    sampler: MagnitudeSampler<A>,
    scheduler: CaptureScheduler,
    analyzer: SpectralAnalyzer,
    classifier: BandClassifier,
    tremor_debounce: DebounceConfirmer,
    dyskinesia_debounce: DebounceConfirmer,
    trigger: Arc<TriggerLatch>,
    sink: Arc<ResultSink>,
}

impl<A: Accelerometer> ClassifierContext<A> {
    pub fn new(accel: A, trigger: Arc<TriggerLatch>, sink: Arc<ResultSink>) -> Self {
        Self {
            sampler: MagnitudeSampler::new(accel),
            scheduler: CaptureScheduler::new(),
            analyzer: SpectralAnalyzer::new(),
            classifier: BandClassifier::new(SAMPLE_RATE_HZ),
            tremor_debounce: DebounceConfirmer::new(),
            dyskinesia_debounce: DebounceConfirmer::new(),
            trigger,
            sink,
        }
    }

    pub fn with_weighting(
        accel: A,
        trigger: Arc<TriggerLatch>,
        sink: Arc<ResultSink>,
        weighting: BinWeighting,
    ) -> Self {
        let mut ctx = Self::new(accel, trigger, sink);
        ctx.classifier = BandClassifier::with_weighting(SAMPLE_RATE_HZ, weighting);
        ctx
    }

    /// One iteration of the cooperative loop.
    ///
    /// Consumes the trigger latch only while idle — a trigger that fires
    /// during a capture stays latched and simply arms the next capture once
    /// the current window completes (single-in-flight policy, no queue).
    /// Returns the window classification on the poll that completes a
    /// capture cycle, `None` otherwise.
    pub fn poll(&mut self, now_ms: u64) -> Option<BandClassification> {
        if self.scheduler.is_idle() && self.trigger.take() {
            // Acknowledge at the hardware level so the interrupt can re-fire;
            // deferred here because the ISR must not touch the bus.
            self.sampler.acknowledge_motion();
            self.scheduler.arm(now_ms);
            log::debug!("Motion trigger consumed — capture armed");
        }

        let sampler = &mut self.sampler;
        let window = match self.scheduler.poll(now_ms, || sampler.sample()) {
            CapturePoll::Completed(window) => window,
            CapturePoll::Idle | CapturePoll::Sampling => return None,
        };

        let magnitude = rms(window);
        let spectrum = self.analyzer.analyze(window);
        let classification = self.classifier.classify(&spectrum);

        // Debounce is applied symmetrically: both conditions are sustained
        // phenomena, so both require agreement across consecutive windows.
        self.tremor_debounce.insert(classification.tremor_band);
        self.dyskinesia_debounce.insert(classification.dyskinesia_band);
        let tremor = self.tremor_debounce.confirmed();
        let dyskinesia = self.dyskinesia_debounce.confirmed();

        self.sink.publish(magnitude, tremor, dyskinesia, now_ms);

        log::info!(
            "Window done: peak {:.2} Hz | tremor {:.0}% / dyskinesia {:.0}% | tremor={} dyskinesia={}",
            classification.peak_frequency_hz,
            classification.tremor_energy_pct,
            classification.dyskinesia_energy_pct,
            tremor,
            dyskinesia,
        );

        Some(classification)
    }
}

fn rms(window: &[f32; WINDOW_SAMPLES]) -> f32 {
    let sum_sq: f32 = window.iter().map(|s| s * s).sum();
    (sum_sq / WINDOW_SAMPLES as f32).sqrt()
}
