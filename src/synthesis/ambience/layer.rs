//! One band-limited, amplitude-modulated noise layer.

use crate::combinators::{Gain, SignalExt};
use crate::synthesis::effects::Tremolo;
use crate::synthesis::filters::{BiquadFilter, FilterType};
use crate::synthesis::noise::{ColoredNoise, NoiseColor};
use crate::synthesis::oscillators::DriftingLfo;
use crate::{AudioSignal, Signal};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Describes one layer of a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Base noise color fed into the band filter.
    pub color: NoiseColor,
    /// Band shape: low-pass, high-pass or band-pass.
    pub band: FilterType,
    /// Cutoff (low/high-pass) or centre (band-pass) in Hz.
    pub frequency: f64,
    /// Filter Q; band-pass width is roughly `frequency / q`.
    pub q: f64,
    /// Modulation rate in Hz, below 1.
    pub rate: f64,
    /// Per-cycle relative rate deviation, 0 for a steady LFO.
    pub jitter: f64,
    /// Modulation depth in [0, 1].
    pub depth: f64,
    /// Level of this layer in the blend.
    pub level: f64,
}

type Voice<const SAMPLE_RATE: u32> =
    Gain<Tremolo<SAMPLE_RATE, BiquadFilter<SAMPLE_RATE, ColoredNoise<SAMPLE_RATE, StdRng>>>>;

/// A running instance of a [`Layer`].
///
/// Noise, band filter and LFO each get their own RNG stream; all state
/// (filter delay line, LFO phase) lives here and carries over between calls.
pub struct LayerVoice<const SAMPLE_RATE: u32> {
    voice: Voice<SAMPLE_RATE>,
}

impl<const SAMPLE_RATE: u32> LayerVoice<SAMPLE_RATE> {
    /// Builds a voice for `layer`, starting its LFO at `phase` cycles.
    pub fn new<R: RngCore>(layer: &Layer, phase: f64, rng: &mut R) -> Self {
        let noise = ColoredNoise::new(layer.color, StdRng::seed_from_u64(rng.next_u64()));
        let shaped = BiquadFilter::new(noise, layer.frequency, layer.q, layer.band);
        let lfo = DriftingLfo::<SAMPLE_RATE, _>::new(
            layer.rate,
            layer.jitter,
            phase,
            StdRng::seed_from_u64(rng.next_u64()),
        );
        let voice = Tremolo::new(shaped, lfo, layer.depth).gain(layer.level);

        Self { voice }
    }
}

impl<const SAMPLE_RATE: u32> Signal for LayerVoice<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        self.voice.next_sample()
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for LayerVoice<SAMPLE_RATE> {}
