//! Runtime selection between the three noise colors.

use super::{BrownNoise, PinkNoise, WhiteNoise};
use crate::{AudioSignal, Signal};
use rand::Rng;
use rand::rngs::StdRng;

/// The spectral color of a noise stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    /// Flat spectrum
    White,
    /// -3 dB/octave
    Pink,
    /// -6 dB/octave
    Brown,
}

/// A noise generator whose color is chosen at runtime.
///
/// Texture layers pick their base color from data, so they hold one of
/// these instead of a concrete generator type.
pub enum ColoredNoise<const SAMPLE_RATE: u32, R: Rng = StdRng> {
    White(WhiteNoise<SAMPLE_RATE, R>),
    Pink(PinkNoise<SAMPLE_RATE, R>),
    Brown(BrownNoise<SAMPLE_RATE, R>),
}

impl<const SAMPLE_RATE: u32, R: Rng> ColoredNoise<SAMPLE_RATE, R> {
    /// Creates a generator of the given color.
    pub fn new(color: NoiseColor, rng: R) -> Self {
        match color {
            NoiseColor::White => ColoredNoise::White(WhiteNoise::with_rng(rng)),
            NoiseColor::Pink => ColoredNoise::Pink(PinkNoise::with_rng(rng)),
            NoiseColor::Brown => ColoredNoise::Brown(BrownNoise::with_rng(rng)),
        }
    }

    pub fn color(&self) -> NoiseColor {
        match self {
            ColoredNoise::White(_) => NoiseColor::White,
            ColoredNoise::Pink(_) => NoiseColor::Pink,
            ColoredNoise::Brown(_) => NoiseColor::Brown,
        }
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> Signal for ColoredNoise<SAMPLE_RATE, R> {
    fn next_sample(&mut self) -> f64 {
        match self {
            ColoredNoise::White(noise) => noise.next_sample(),
            ColoredNoise::Pink(noise) => noise.next_sample(),
            ColoredNoise::Brown(noise) => noise.next_sample(),
        }
    }
}

impl<const SAMPLE_RATE: u32, R: Rng> AudioSignal<SAMPLE_RATE> for ColoredNoise<SAMPLE_RATE, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_color_round_trip() {
        for color in [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown] {
            let noise = ColoredNoise::<44100>::new(color, StdRng::seed_from_u64(0));
            assert_eq!(noise.color(), color);
        }
    }

    #[test]
    fn test_all_colors_in_range() {
        for color in [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown] {
            let mut noise = ColoredNoise::<48000>::new(color, StdRng::seed_from_u64(4));
            let mut buffer = vec![0.0; 4096];
            noise.process(&mut buffer);
            assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)), "{:?}", color);
        }
    }
}
