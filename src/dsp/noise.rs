//! Breath noise for wind instruments.
//!
//! White Gaussian noise (σ = 0.1) softened by a 3-sample moving average,
//! which rolls off the top octave so the noise reads as air rather than hiss.
//! The generator is seeded, so the same seed renders the same audio.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::smoothing::moving_average;

/// Standard deviation of the raw noise.
pub const NOISE_STD: f32 = 0.1;
/// Width of the low-pass moving average.
const NOISE_SMOOTHING: usize = 3;

pub struct BreathNoise {
    rng: Pcg32,
    std_dev: f32,
}

impl BreathNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            std_dev: NOISE_STD,
        }
    }

    /// One Gaussian sample (Box-Muller).
    fn gaussian(&mut self) -> f32 {
        // 1 - [0, 1) keeps u1 away from zero so ln(u1) is finite
        let u1: f32 = 1.0 - self.rng.gen::<f32>();
        let u2: f32 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos() * self.std_dev
    }

    /// Add `mix · noise` into `out`.
    pub fn accumulate(&mut self, mix: f32, out: &mut [f32]) {
        let raw: Vec<f32> = (0..out.len()).map(|_| self.gaussian()).collect();
        for (sample, noise) in out.iter_mut().zip(moving_average(&raw, NOISE_SMOOTHING)) {
            *sample += mix * noise;
        }
    }
}
