//! Tremolo (amplitude modulation), the gust and swell stage of textures.

use crate::core::{AudioSignal, Param, Signal};

/// Modulates the amplitude of a signal with a bipolar modulator.
///
/// The modulator is expected in [-1, 1] and is mapped to a gain between
/// `1 - depth` (modulator at -1) and `1` (modulator at 1):
///
/// ```text
/// gain = 1 + depth / 2 * (modulator - 1)
/// ```
///
/// # Examples
///
/// ```
/// use tinnitus_tamer::{PinkNoise, SineOscillator, Tremolo};
///
/// let surf = PinkNoise::<44100>::new();
/// let swell = SineOscillator::<44100>::new(0.1);
/// let mut ocean = Tremolo::new(surf, swell, 0.8);
/// ```
pub struct Tremolo<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> {
    source: S,
    modulator: Param,
    depth: Param,
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> Tremolo<SAMPLE_RATE, S> {
    /// Creates a tremolo.
    ///
    /// # Arguments
    ///
    /// * `source` - Input audio signal to modulate
    /// * `modulator` - Modulation source, usually a sub-1 Hz LFO
    /// * `depth` - 0.0 leaves the input untouched, 1.0 swings fully to silence
    pub fn new(source: S, modulator: impl Into<Param>, depth: impl Into<Param>) -> Self {
        Self {
            source,
            modulator: modulator.into(),
            depth: depth.into(),
        }
    }
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> Signal for Tremolo<SAMPLE_RATE, S> {
    fn next_sample(&mut self) -> f64 {
        let input = self.source.next_sample();
        let depth = self.depth.value().clamp(0.0, 1.0);
        let modulation = self.modulator.value().clamp(-1.0, 1.0);

        input * (1.0 + depth / 2.0 * (modulation - 1.0))
    }
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> AudioSignal<SAMPLE_RATE>
    for Tremolo<SAMPLE_RATE, S>
{
}
