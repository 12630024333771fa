//! Pink noise generator implementation.

use crate::{AudioSignal, Signal};
use rand::Rng;

/// Number of sample-and-hold rows in the Voss-McCartney bank.
const ROWS: usize = 16;

/// Rows plus the per-sample white component.
const SOURCES: f64 = (ROWS + 1) as f64;

/// A pink noise generator.
///
/// Pink noise (also called 1/f noise) has equal power per octave, a
/// -3 dB/octave slope relative to white noise. This implementation uses the
/// Voss-McCartney algorithm: 16 held random rows where row `k` is redrawn
/// whenever the sample counter has exactly `k` trailing zeros, so row `k`
/// changes every `2^(k+1)` samples, plus one fresh white value per sample.
///
/// The output is the mean of 17 values in [-1, 1], which keeps it inside the
/// same peak range as [`WhiteNoise`](super::WhiteNoise).
pub struct PinkNoise<const SAMPLE_RATE: u32, R: Rng = rand::rngs::ThreadRng> {
    rng: R,
    rows: [f64; ROWS],
    counter: u32,
}

impl<const SAMPLE_RATE: u32> Default for PinkNoise<SAMPLE_RATE, rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SAMPLE_RATE: u32> PinkNoise<SAMPLE_RATE, rand::rngs::ThreadRng> {
    /// Creates a new pink noise generator with the default ThreadRng.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinnitus_tamer::{Signal, PinkNoise};
    ///
    /// let mut noise = PinkNoise::<44100>::new();
    /// let sample = noise.next_sample();
    /// ```
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> PinkNoise<SAMPLE_RATE, R> {
    /// Creates a new pink noise generator with a custom RNG.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinnitus_tamer::{Signal, PinkNoise};
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let mut noise = PinkNoise::<44100, _>::with_rng(rng);
    /// let sample = noise.next_sample();
    /// ```
    pub fn with_rng(mut rng: R) -> Self {
        let rows = [0.0; ROWS].map(|_| rng.gen_range(-1.0..=1.0));

        Self {
            rng,
            rows,
            counter: 1,
        }
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> Signal for PinkNoise<SAMPLE_RATE, R> {
    fn next_sample(&mut self) -> f64 {
        // Counter values with 16 or more trailing zeros (including the wrap
        // to 0) touch no row.
        let row = self.counter.trailing_zeros() as usize;
        if row < ROWS {
            self.rows[row] = self.rng.gen_range(-1.0..=1.0);
        }
        self.counter = self.counter.wrapping_add(1);

        let white: f64 = self.rng.gen_range(-1.0..=1.0);
        let sum: f64 = self.rows.iter().sum::<f64>() + white;
        sum / SOURCES
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> AudioSignal<SAMPLE_RATE> for PinkNoise<SAMPLE_RATE, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_creation() {
        let noise = PinkNoise::<44100>::new();
        assert_eq!(noise.sample_rate(), 44100.0);
    }

    #[test]
    fn test_sample_range() {
        let mut noise = PinkNoise::<44100>::new();
        for _ in 0..100_000 {
            let sample = noise.next_sample();
            assert!((-1.0..=1.0).contains(&sample));
        }
    }

    #[test]
    fn test_randomness() {
        let mut noise = PinkNoise::<44100>::new();
        let samples: Vec<f64> = (0..100).map(|_| noise.next_sample()).collect();
        let first = samples[0];
        assert!(
            !samples.iter().all(|&s| s == first),
            "Pink noise should produce varying samples"
        );
    }

    #[test]
    fn test_more_correlated_than_white() {
        // Held rows make neighbouring samples strongly correlated
        let mut noise = PinkNoise::<44100, _>::with_rng(StdRng::seed_from_u64(3));
        let samples: Vec<f64> = (0..100_000).map(|_| noise.next_sample()).collect();
        let lag1: f64 = samples.windows(2).map(|w| w[0] * w[1]).sum();
        let energy: f64 = samples.iter().map(|s| s * s).sum();
        assert!(lag1 / energy > 0.5, "lag-1 correlation = {}", lag1 / energy);
    }

    #[test]
    fn test_counter_wrapping() {
        let mut noise = PinkNoise::<44100>::new();
        noise.counter = u32::MAX - 10;

        for _ in 0..20 {
            let sample = noise.next_sample();
            assert!((-1.0..=1.0).contains(&sample));
        }
        assert!(noise.counter < 20);
    }
}
