// TremorTrack — Classifier Task
//
// The single cooperative loop driving the classification pipeline. All
// timing comes from the pipeline's deadline checks against the free-running
// timer; the sleep here only yields the CPU to FreeRTOS between polls and is
// several times shorter than the sampling period.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::classify::tremor_bias_weighting;
use crate::config::CLASSIFIER_POLL_INTERVAL_MS;
use crate::drivers::accel::Adxl345;
use crate::events::ResultSink;
use crate::pipeline::ClassifierContext;
use crate::trigger::TriggerLatch;

pub fn classifier_task(accel: Adxl345, trigger: Arc<TriggerLatch>, sink: Arc<ResultSink>) {
    log::info!("Classifier task started");

    let mut ctx = ClassifierContext::with_weighting(accel, trigger, sink, tremor_bias_weighting);
    let poll_interval = Duration::from_millis(CLASSIFIER_POLL_INTERVAL_MS);

    loop {
        ctx.poll(crate::now_ms());
        thread::sleep(poll_interval);
    }
}
