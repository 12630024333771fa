//! Sine wave oscillator implementation.

use super::Oscillator;
use crate::{AudioSignal, Signal};
use std::f64::consts::PI;

/// A sine oscillator, used as a steady LFO and as a test tone.
///
/// The oscillator keeps its phase across calls to `next_sample()`.
pub struct SineOscillator<const SAMPLE_RATE: u32> {
    /// Current phase of the oscillator (0.0 to 1.0)
    phase: f64,
    /// Phase increment per sample (frequency / sample_rate)
    phase_increment: f64,
}

impl<const SAMPLE_RATE: u32> SineOscillator<SAMPLE_RATE> {
    /// Creates a new sine oscillator starting at phase 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinnitus_tamer::{Signal, SineOscillator};
    ///
    /// let mut tone = SineOscillator::<44100>::new(1000.0);
    /// assert_eq!(tone.next_sample(), 0.0);
    /// ```
    pub fn new(frequency: f64) -> Self {
        Self::with_phase(frequency, 0.0)
    }

    /// Creates a sine oscillator starting at `phase` cycles.
    pub fn with_phase(frequency: f64, phase: f64) -> Self {
        Self {
            phase: phase.rem_euclid(1.0),
            phase_increment: frequency / SAMPLE_RATE as f64,
        }
    }
}

impl<const SAMPLE_RATE: u32> Signal for SineOscillator<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        let sample = (self.phase * 2.0 * PI).sin();

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for SineOscillator<SAMPLE_RATE> {}

impl<const SAMPLE_RATE: u32> Oscillator for SineOscillator<SAMPLE_RATE> {
    fn frequency(&self) -> f64 {
        self.phase_increment * SAMPLE_RATE as f64
    }

    fn phase(&self) -> f64 {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oscillator_creation() {
        let osc = SineOscillator::<44100>::new(440.0);
        assert_eq!(osc.frequency(), 440.0);
        assert_eq!(osc.phase(), 0.0);
    }

    #[test]
    fn test_sample_generation() {
        let mut osc = SineOscillator::<44100>::new(440.0);
        // First sample sits at phase 0
        assert!(osc.next_sample().abs() < 1e-12);
    }

    #[test]
    fn test_sample_range() {
        let mut osc = SineOscillator::<44100>::new(440.0);
        for _ in 0..44100 {
            let sample = osc.next_sample();
            assert!((-1.0..=1.0).contains(&sample));
        }
    }

    #[test]
    fn test_phase_wrapping() {
        let mut osc = SineOscillator::<44100>::new(1000.0);
        for _ in 0..100000 {
            osc.next_sample();
        }
        assert!(osc.phase() >= 0.0 && osc.phase() < 1.0);
    }

    #[test]
    fn test_with_phase_offset() {
        let mut osc = SineOscillator::<44100>::with_phase(1.0, 1.25);
        assert_eq!(osc.phase(), 0.25);
        assert!((osc.next_sample() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_frequency() {
        let mut osc = SineOscillator::<44100>::new(0.0);
        let sample1 = osc.next_sample();
        let sample2 = osc.next_sample();
        assert_eq!(sample1, sample2);
    }
}
