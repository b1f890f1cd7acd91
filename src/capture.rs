// TremorTrack — Capture Window Scheduler
//
// Fixed-capacity window filled at a fixed sampling period, driven by a
// non-blocking cadence check against a free-running millisecond clock.
// There is no sleep anywhere in here: the owner polls, and a sample is taken
// only once the period deadline has passed.

use crate::config::{SAMPLE_PERIOD_MS, WINDOW_SAMPLES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Idle,
    Sampling,
}

/// Outcome of one scheduler poll.
pub enum CapturePoll<'a> {
    /// No capture armed.
    Idle,
    /// Capture in progress; the window is not full yet.
    Sampling,
    /// The window just filled. Valid until the next `arm`.
    Completed(&'a [f32; WINDOW_SAMPLES]),
}

pub struct CaptureScheduler {
    window: [f32; WINDOW_SAMPLES],
    filled: usize,
    state: CaptureState,
    /// Deadline for the next sample. Advanced by exactly one period per
    /// sample — never reset to "now" — so late polls cannot accumulate drift.
    next_sample_ms: u64,
}

impl CaptureScheduler {
    pub fn new() -> Self {
        Self {
            window: [0.0; WINDOW_SAMPLES],
            filled: 0,
            state: CaptureState::Idle,
            next_sample_ms: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    /// Arm a new capture. The first sample is due immediately.
    ///
    /// Only call while idle; a capture in progress always runs to completion
    /// (single-in-flight policy is enforced by the caller consuming the
    /// trigger latch only when idle).
    pub fn arm(&mut self, now_ms: u64) {
        debug_assert!(self.is_idle());
        self.filled = 0;
        self.next_sample_ms = now_ms;
        self.state = CaptureState::Sampling;
    }

    /// Cadence check: takes at most one sample per call, once `now_ms` has
    /// reached the period deadline. Returns `Completed` on the poll that
    /// fills the final slot; the scheduler is idle again afterwards.
    pub fn poll(&mut self, now_ms: u64, mut take_sample: impl FnMut() -> f32) -> CapturePoll<'_> {
        if self.state == CaptureState::Idle {
            return CapturePoll::Idle;
        }

        if now_ms < self.next_sample_ms {
            return CapturePoll::Sampling;
        }

        self.window[self.filled] = take_sample();
        self.filled += 1;
        self.next_sample_ms += SAMPLE_PERIOD_MS;

        if self.filled == WINDOW_SAMPLES {
            self.state = CaptureState::Idle;
            CapturePoll::Completed(&self.window)
        } else {
            CapturePoll::Sampling
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_completed(poll: &CapturePoll<'_>) -> bool {
        matches!(poll, CapturePoll::Completed(_))
    }

    #[test]
    fn idle_until_armed() {
        let mut sched = CaptureScheduler::new();
        assert!(matches!(sched.poll(1234, || 1.0), CapturePoll::Idle));
        assert!(sched.is_idle());
    }

    #[test]
    fn first_sample_taken_on_arm_deadline() {
        let mut sched = CaptureScheduler::new();
        let mut taken = 0;
        sched.arm(100);
        sched.poll(100, || {
            taken += 1;
            0.0
        });
        assert_eq!(taken, 1);
    }

    #[test]
    fn no_sample_before_period_elapses() {
        let mut sched = CaptureScheduler::new();
        let mut taken = 0;
        sched.arm(0);
        // First sample at t=0, then nothing until t=20.
        for now in [0u64, 5, 11, 17, 19] {
            sched.poll(now, || {
                taken += 1;
                0.0
            });
        }
        assert_eq!(taken, 1);
        sched.poll(20, || {
            taken += 1;
            0.0
        });
        assert_eq!(taken, 2);
    }

    #[test]
    fn window_completes_after_exactly_n_samples() {
        let mut sched = CaptureScheduler::new();
        sched.arm(0);
        let mut completed = false;
        let mut value = 0.0f32;
        for i in 0..WINDOW_SAMPLES as u64 {
            let poll = sched.poll(i * SAMPLE_PERIOD_MS, || {
                value += 1.0;
                value
            });
            if i < WINDOW_SAMPLES as u64 - 1 {
                assert!(matches!(poll, CapturePoll::Sampling));
            } else if let CapturePoll::Completed(window) = poll {
                completed = true;
                // Samples land in acquisition order.
                assert_eq!(window[0], 1.0);
                assert_eq!(window[WINDOW_SAMPLES - 1], WINDOW_SAMPLES as f32);
            }
        }
        assert!(completed);
        assert!(sched.is_idle());
    }

    #[test]
    fn cadence_does_not_drift_over_irregular_polls() {
        // Clock advances in irregular increments, all below the period, for
        // well over 1000 poll cycles. After every poll the number of samples
        // actually taken must equal the number of period boundaries crossed
        // since arming — the deadline advances by exactly one period per
        // sample, so lateness within a period never accumulates.
        let increments = [3u64, 7, 5, 11, 2, 13, 6, 9, 4, 8];
        let mut sched = CaptureScheduler::new();
        let mut now: u64 = 0;
        let mut armed_at: u64 = 0;
        let mut taken: u64 = 0;
        let mut windows_done = 0;
        let mut i = 0usize;

        sched.arm(now);
        while windows_done < 10 {
            let mut sampled = false;
            let completed = is_completed(&sched.poll(now, || {
                sampled = true;
                0.0
            }));
            if sampled {
                taken += 1;
            }

            let expected = ((now - armed_at) / SAMPLE_PERIOD_MS + 1).min(WINDOW_SAMPLES as u64);
            assert_eq!(taken, expected, "drift at t={} (window {})", now, windows_done);

            now += increments[i % increments.len()];
            i += 1;

            if completed {
                assert_eq!(taken, WINDOW_SAMPLES as u64);
                windows_done += 1;
                armed_at = now;
                taken = 0;
                sched.arm(now);
            }
        }
    }

    #[test]
    fn late_polls_catch_up_one_sample_per_poll() {
        let mut sched = CaptureScheduler::new();
        let mut taken = 0;
        sched.arm(0);
        sched.poll(0, || {
            taken += 1;
            0.0
        });
        // Poll arrives 3 periods late: deadlines at 20/40/60 are all due, but
        // each poll takes exactly one sample.
        for _ in 0..3 {
            sched.poll(65, || {
                taken += 1;
                0.0
            });
        }
        assert_eq!(taken, 4);
        // Deadline advanced by whole periods, so the next sample is due at 80.
        sched.poll(79, || {
            taken += 1;
            0.0
        });
        assert_eq!(taken, 4);
        sched.poll(80, || {
            taken += 1;
            0.0
        });
        assert_eq!(taken, 5);
    }
}
