//! Low-frequency oscillator with per-cycle rate drift.

use super::Oscillator;
use crate::{AudioSignal, Signal};
use rand::Rng;
use rand::rngs::StdRng;
use std::f64::consts::PI;

/// A sine LFO whose rate is re-drawn at the start of every cycle.
///
/// A fixed-rate swell sounds mechanical once the listener picks up the
/// period. Here each cycle runs at `rate * (1 + jitter * u)` with `u`
/// uniform in [-1, 1]. The rate only changes at the cycle boundary, where
/// the phase wraps, so the waveform itself never jumps.
///
/// With `jitter == 0.0` this is a plain sine LFO, which is what layers that
/// must stay phase-locked to each other use.
pub struct DriftingLfo<const SAMPLE_RATE: u32, R: Rng = StdRng> {
    rng: R,
    rate: f64,
    jitter: f64,
    phase: f64,
    phase_increment: f64,
}

impl<const SAMPLE_RATE: u32, R: Rng> DriftingLfo<SAMPLE_RATE, R> {
    /// Creates an LFO centred on `rate` Hz, starting at `phase` cycles.
    ///
    /// `jitter` is the maximum relative deviation per cycle, clamped to
    /// [0.0, 0.9] so the rate stays positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinnitus_tamer::{DriftingLfo, Signal};
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(1);
    /// let mut gusts = DriftingLfo::<44100, _>::new(0.2, 0.4, 0.0, rng);
    /// assert!(gusts.next_sample().abs() <= 1.0);
    /// ```
    pub fn new(rate: f64, jitter: f64, phase: f64, rng: R) -> Self {
        let mut lfo = Self {
            rng,
            rate: rate.max(0.0),
            jitter: jitter.clamp(0.0, 0.9),
            phase: phase.rem_euclid(1.0),
            phase_increment: 0.0,
        };
        lfo.draw_rate();
        lfo
    }

    /// The centre rate in Hz.
    pub fn base_rate(&self) -> f64 {
        self.rate
    }

    fn draw_rate(&mut self) {
        let deviation = if self.jitter > 0.0 {
            self.rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        self.phase_increment = self.rate * (1.0 + deviation) / SAMPLE_RATE as f64;
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> Signal for DriftingLfo<SAMPLE_RATE, R> {
    fn next_sample(&mut self) -> f64 {
        let sample = (self.phase * 2.0 * PI).sin();

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
            self.draw_rate();
        }

        sample
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> AudioSignal<SAMPLE_RATE> for DriftingLfo<SAMPLE_RATE, R> {}

impl<const SAMPLE_RATE: u32, R: Rng> Oscillator for DriftingLfo<SAMPLE_RATE, R> {
    fn frequency(&self) -> f64 {
        self.phase_increment * SAMPLE_RATE as f64
    }

    fn phase(&self) -> f64 {
        self.phase
    }
}
