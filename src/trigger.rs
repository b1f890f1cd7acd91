// TremorTrack — Motion Trigger Latch
//
// Single-flag hand-off from the accelerometer's activity interrupt to the
// cooperative classifier loop. The ISR side does exactly one atomic store and
// nothing else — no allocation, no bus I/O, no floating point. Acknowledging
// the sensor's latched interrupt-source register is deferred to the main
// loop, which owns the I2C bus.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-producer (ISR) / single-consumer (classifier loop) latch.
pub struct TriggerLatch {
    raised: AtomicBool,
}

impl TriggerLatch {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// ISR side: record that a motion event fired. Safe to call from
    /// interrupt context; re-raising while already set is a no-op.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consumer side: take the flag if set, clearing it in the same step.
    /// Returns `true` at most once per raise.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Non-consuming check, for diagnostics only.
    #[allow(dead_code)]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
