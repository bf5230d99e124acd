//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through a StimulusRng seeded from a single
//! u64 supplied by the caller. Same seed, same stimuli, same ledgers.

use crate::types::Stimulus;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::f64::consts::TAU;

/// A seeded, reproducible RNG stream.
pub struct StimulusRng {
    inner: Pcg64Mcg,
}

impl StimulusRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Standard normal draw via Box-Muller. Consumes two uniforms per call.
    pub fn standard_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Normal draw with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.standard_normal()
    }
}

/// Source of one stimulus per simulation step.
///
/// The engine draws exactly once per step and shares the value
/// across every agent in that step.
pub trait StimulusSampler {
    fn sample(&mut self) -> Stimulus;
}

/// Scripted samplers for tests and tooling: any closure works.
impl<F> StimulusSampler for F
where
    F: FnMut() -> Stimulus,
{
    fn sample(&mut self) -> Stimulus {
        self()
    }
}

/// Normally distributed stimulus, zero-mean with spread 0.5 by default.
pub struct NormalStimulus {
    pub mean:   f64,
    pub spread: f64,
    rng:        StimulusRng,
}

pub const DEFAULT_STIMULUS_SPREAD: f64 = 0.5;

impl NormalStimulus {
    pub fn new(seed: u64, mean: f64, spread: f64) -> Self {
        Self {
            mean,
            spread,
            rng: StimulusRng::new(seed),
        }
    }

    /// Zero-mean sampler with the reference spread.
    pub fn standard(seed: u64) -> Self {
        Self::new(seed, 0.0, DEFAULT_STIMULUS_SPREAD)
    }
}

impl StimulusSampler for NormalStimulus {
    fn sample(&mut self) -> Stimulus {
        self.rng.normal(self.mean, self.spread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_same_stream() {
        let mut a = StimulusRng::new(12345);
        let mut b = StimulusRng::new(12345);

        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn uniform_draws_stay_in_unit_interval() {
        let mut rng = StimulusRng::new(7);
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "draw {x} outside [0, 1)");
        }
    }

    #[test]
    fn normal_draws_have_roughly_requested_moments() {
        let mut sampler = NormalStimulus::new(99, 0.0, 0.5);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| sampler.sample()).collect();

        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 0.02, "mean {mean} too far from 0");
        assert!((var.sqrt() - 0.5).abs() < 0.02, "std {} too far from 0.5", var.sqrt());
        assert!(draws.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn zero_spread_always_returns_mean() {
        let mut sampler = NormalStimulus::new(1, 0.3, 0.0);
        for _ in 0..10 {
            assert_eq!(sampler.sample(), 0.3);
        }
    }

    #[test]
    fn closures_are_samplers() {
        let mut script = vec![0.5, -0.25].into_iter();
        let mut sampler = move || script.next().unwrap_or(0.0);

        assert_eq!(StimulusSampler::sample(&mut sampler), 0.5);
        assert_eq!(StimulusSampler::sample(&mut sampler), -0.25);
        assert_eq!(StimulusSampler::sample(&mut sampler), 0.0);
    }
}
