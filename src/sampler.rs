// TremorTrack — Magnitude Sampler
//
// Reduces one 3-axis accelerometer reading to a gravity-compensated scalar
// magnitude. The trait seam keeps the classifier core independent of the
// ADXL345 driver so it can run against synthetic sources in tests.

use crate::config::GRAVITY_MS2;
use crate::events::AccelSample;

/// Sensor collaborator contract. `read` may block briefly on the bus
/// transaction but must not add artificial delay.
pub trait Accelerometer {
    /// One synchronous 3-axis read in m/s².
    fn read(&mut self) -> anyhow::Result<AccelSample>;

    /// Clear the sensor's latched interrupt-source register so the activity
    /// interrupt can re-fire. Called from the main loop, never from the ISR.
    fn acknowledge_motion(&mut self) -> anyhow::Result<()>;
}

pub struct MagnitudeSampler<A: Accelerometer> {
    accel: A,
}

impl<A: Accelerometer> MagnitudeSampler<A> {
    pub fn new(accel: A) -> Self {
        Self { accel }
    }

    /// One gravity-compensated magnitude reading.
    ///
    /// A failed bus read yields 0.0 for this slot rather than a retry or a
    /// window abort — the capture cycle always runs to completion.
    pub fn sample(&mut self) -> f32 {
        match self.accel.read() {
            Ok(s) => magnitude_of(s),
            Err(e) => {
                log::warn!("Accelerometer read failed, substituting 0: {}", e);
                0.0
            }
        }
    }

    pub fn acknowledge_motion(&mut self) {
        if let Err(e) = self.accel.acknowledge_motion() {
            log::warn!("Failed to clear activity interrupt source: {}", e);
        }
    }
}

/// `sqrt(x² + y² + z²) − g` with a fixed calibration constant for g.
pub fn magnitude_of(s: AccelSample) -> f32 {
    (s.x * s.x + s.y * s.y + s.z * s.z).sqrt() - GRAVITY_MS2
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlakyAccel {
        fail: bool,
    }

    impl Accelerometer for FlakyAccel {
        fn read(&mut self) -> anyhow::Result<AccelSample> {
            if self.fail {
                anyhow::bail!("bus timeout");
            }
            Ok(AccelSample {
                x: 3.0,
                y: 4.0,
                z: 12.0,
            })
        }

        fn acknowledge_motion(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn magnitude_is_gravity_compensated() {
        // 3-4-12 triple has magnitude 13.
        let mut sampler = MagnitudeSampler::new(FlakyAccel { fail: false });
        let m = sampler.sample();
        assert!((m - (13.0 - GRAVITY_MS2)).abs() < 1e-5);
    }

    #[test]
    fn failed_read_becomes_zero_sample() {
        let mut sampler = MagnitudeSampler::new(FlakyAccel { fail: true });
        assert_eq!(sampler.sample(), 0.0);
    }

    #[test]
    fn resting_device_reads_near_zero() {
        let m = magnitude_of(AccelSample {
            x: 0.0,
            y: 0.0,
            z: GRAVITY_MS2,
        });
        assert!(m.abs() < 1e-5);
    }
}
