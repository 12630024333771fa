//! Brown (Brownian, red) noise generator implementation.

use crate::{AudioSignal, Signal};
use rand::Rng;

/// Default leak applied to the integrator every sample.
pub const DEFAULT_LEAK: f64 = 0.998;

/// Steady-state RMS the integrator step is scaled for.
const TARGET_RMS: f64 = 0.25;

/// RMS of a uniform draw on [-1, 1].
const WHITE_RMS: f64 = 0.577_350_269_189_625_8;

/// A brown noise generator.
///
/// Brown noise is integrated white noise, with a -6 dB/octave slope. A pure
/// running sum drifts without bound, so this is a leaky integrator:
///
/// ```text
/// acc = clamp(acc * leak + white * step, -1, 1)
/// ```
///
/// The leak places a corner well below the audible band (about 14 Hz at
/// 44.1 kHz for the default leak) and `step` is derived from it so the
/// steady-state RMS is the same for every leak. The accumulator itself is
/// clamped every sample, so the output stays in [-1, 1] no matter how long
/// the generator runs.
pub struct BrownNoise<const SAMPLE_RATE: u32, R: Rng = rand::rngs::ThreadRng> {
    rng: R,
    leak: f64,
    step: f64,
    accumulator: f64,
}

impl<const SAMPLE_RATE: u32> Default for BrownNoise<SAMPLE_RATE, rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SAMPLE_RATE: u32> BrownNoise<SAMPLE_RATE, rand::rngs::ThreadRng> {
    /// Creates a new brown noise generator with the default ThreadRng.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinnitus_tamer::{Signal, BrownNoise};
    ///
    /// let mut noise = BrownNoise::<44100>::new();
    /// let sample = noise.next_sample();
    /// assert!((-1.0..=1.0).contains(&sample));
    /// ```
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> BrownNoise<SAMPLE_RATE, R> {
    /// Creates a new brown noise generator with a custom RNG.
    pub fn with_rng(rng: R) -> Self {
        Self::with_leak(rng, DEFAULT_LEAK)
    }

    /// Creates a brown noise generator with a custom leak coefficient.
    ///
    /// `leak` is clamped to [0.98, 0.999]: lower values thin out the bass,
    /// higher ones push the corner towards DC and slow recovery from the
    /// clamp.
    pub fn with_leak(rng: R, leak: f64) -> Self {
        let leak = leak.clamp(0.98, 0.999);
        // Stationary variance of the leaky sum is step^2 * var(white) / (1 - leak^2)
        let step = TARGET_RMS * (1.0 - leak * leak).sqrt() / WHITE_RMS;

        Self {
            rng,
            leak,
            step,
            accumulator: 0.0,
        }
    }

    /// The leak coefficient in use.
    pub fn leak(&self) -> f64 {
        self.leak
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> Signal for BrownNoise<SAMPLE_RATE, R> {
    fn next_sample(&mut self) -> f64 {
        let white: f64 = self.rng.gen_range(-1.0..=1.0);
        self.accumulator = (self.accumulator * self.leak + white * self.step).clamp(-1.0, 1.0);
        self.accumulator
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> AudioSignal<SAMPLE_RATE> for BrownNoise<SAMPLE_RATE, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_creation() {
        let noise = BrownNoise::<44100>::new();
        assert_eq!(noise.sample_rate(), 44100.0);
        assert_eq!(noise.leak(), DEFAULT_LEAK);
    }

    #[test]
    fn test_leak_clamping() {
        let rng = StdRng::seed_from_u64(1);
        assert_eq!(BrownNoise::<44100, _>::with_leak(rng, 1.0).leak(), 0.999);
        let rng = StdRng::seed_from_u64(1);
        assert_eq!(BrownNoise::<44100, _>::with_leak(rng, 0.5).leak(), 0.98);
    }

    #[test]
    fn test_steady_state_rms() {
        let mut noise = BrownNoise::<44100, _>::with_rng(StdRng::seed_from_u64(5));
        // Skip the start-up transient
        for _ in 0..10_000 {
            noise.next_sample();
        }
        let n = 500_000;
        let energy: f64 = (0..n).map(|_| noise.next_sample().powi(2)).sum();
        let rms = (energy / n as f64).sqrt();
        assert!((rms - TARGET_RMS).abs() < 0.05, "rms = {}", rms);
    }

    #[test]
    fn test_smoother_than_white() {
        let mut noise = BrownNoise::<44100, _>::with_rng(StdRng::seed_from_u64(9));
        let samples: Vec<f64> = (0..50_000).map(|_| noise.next_sample()).collect();
        let lag1: f64 = samples.windows(2).map(|w| w[0] * w[1]).sum();
        let energy: f64 = samples.iter().map(|s| s * s).sum();
        assert!(lag1 / energy > 0.95, "lag-1 correlation = {}", lag1 / energy);
    }

    #[test]
    fn test_long_run_stays_bounded() {
        let mut noise = BrownNoise::<44100, _>::with_leak(StdRng::seed_from_u64(2), 0.999);
        for _ in 0..1_000_000 {
            let sample = noise.next_sample();
            assert!(sample.is_finite() && (-1.0..=1.0).contains(&sample));
        }
    }
}
