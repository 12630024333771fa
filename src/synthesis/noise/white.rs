//! White noise generator, the entropy source for every other sound.

use crate::{AudioSignal, Signal};
use rand::Rng;

/// A white noise generator.
///
/// White noise has equal power across all frequencies. Each sample is drawn
/// independently and uniformly from [-1.0, 1.0]. The stream is infinite and
/// cannot be restarted; only its distribution is fixed, not its values.
pub struct WhiteNoise<const SAMPLE_RATE: u32, R: Rng = rand::rngs::ThreadRng> {
    rng: R,
}

impl<const SAMPLE_RATE: u32> Default for WhiteNoise<SAMPLE_RATE, rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SAMPLE_RATE: u32> WhiteNoise<SAMPLE_RATE, rand::rngs::ThreadRng> {
    /// Creates a new white noise generator with the default ThreadRng.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinnitus_tamer::{Signal, WhiteNoise};
    ///
    /// let mut noise = WhiteNoise::<44100>::new();
    /// let sample = noise.next_sample();
    /// assert!((-1.0..=1.0).contains(&sample));
    /// ```
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> WhiteNoise<SAMPLE_RATE, R> {
    /// Creates a new white noise generator with a custom RNG.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinnitus_tamer::{Signal, WhiteNoise};
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let mut noise = WhiteNoise::<44100, _>::with_rng(rng);
    /// let sample = noise.next_sample();
    /// ```
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> Signal for WhiteNoise<SAMPLE_RATE, R> {
    fn next_sample(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> AudioSignal<SAMPLE_RATE> for WhiteNoise<SAMPLE_RATE, R> {}
