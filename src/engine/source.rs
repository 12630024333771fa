//! The six selectable sound sources and how each is rendered to a loop.

use super::loop_buffer::{FadeCurve, LoopBuffer, LoopLayout, normalize, render_extended};
use crate::error::EngineError;
use crate::synthesis::ambience::{Ambience, Texture};
use crate::synthesis::noise::{ColoredNoise, NoiseColor};
use crate::{AudioSignal, Signal};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

/// RMS every rendered loop is normalised to before mixing.
///
/// Leaves about 14 dB of headroom below full scale so that equal gains give
/// comparable loudness across colors and textures.
pub const LOOP_RMS: f64 = 0.2;

/// A selectable sound. The set is fixed; a source is "on" when its gain is
/// above zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SoundSource {
    White,
    Pink,
    Brown,
    Wind,
    Ocean,
    Waterfall,
}

impl SoundSource {
    /// Every source, in mixer order.
    pub const ALL: [SoundSource; 6] = [
        SoundSource::White,
        SoundSource::Pink,
        SoundSource::Brown,
        SoundSource::Wind,
        SoundSource::Ocean,
        SoundSource::Waterfall,
    ];

    /// Position in [`SoundSource::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SoundSource::White => "white",
            SoundSource::Pink => "pink",
            SoundSource::Brown => "brown",
            SoundSource::Wind => "wind",
            SoundSource::Ocean => "ocean",
            SoundSource::Waterfall => "waterfall",
        }
    }

    /// Builds the generator for this source, drawing its seeds from `rng`.
    pub fn signal<const SAMPLE_RATE: u32, R: RngCore>(self, rng: &mut R) -> SourceSignal<SAMPLE_RATE> {
        let noise = |color: NoiseColor, rng: &mut R| -> SourceSignal<SAMPLE_RATE> {
            SourceSignal::Noise(ColoredNoise::new(color, StdRng::seed_from_u64(rng.next_u64())))
        };
        match self {
            SoundSource::White => noise(NoiseColor::White, rng),
            SoundSource::Pink => noise(NoiseColor::Pink, rng),
            SoundSource::Brown => noise(NoiseColor::Brown, rng),
            SoundSource::Wind => SourceSignal::Texture(Texture::with_rng(Ambience::Wind, rng)),
            SoundSource::Ocean => SourceSignal::Texture(Texture::with_rng(Ambience::Ocean, rng)),
            SoundSource::Waterfall => {
                SourceSignal::Texture(Texture::with_rng(Ambience::Waterfall, rng))
            }
        }
    }

    /// Renders this source into a normalised, seamless loop.
    pub fn render<const SAMPLE_RATE: u32>(
        self,
        layout: LoopLayout,
        curve: FadeCurve,
    ) -> Result<LoopBuffer, EngineError> {
        self.render_with_rng::<SAMPLE_RATE, _>(layout, curve, &mut StdRng::from_entropy())
    }

    /// Like [`SoundSource::render`] with the noise drawn from `rng`.
    pub fn render_with_rng<const SAMPLE_RATE: u32, R: RngCore>(
        self,
        layout: LoopLayout,
        curve: FadeCurve,
        rng: &mut R,
    ) -> Result<LoopBuffer, EngineError> {
        let started = Instant::now();
        let mut signal = self.signal::<SAMPLE_RATE, R>(rng);

        let mut extended = render_extended(&mut signal, layout.rendered_length())
            .map_err(|failure| EngineError::Render {
                sound: self,
                failure,
            })?;
        let rms = normalize(&mut extended, LOOP_RMS);
        let buffer = LoopBuffer::from_extended(extended, layout, curve)?;

        debug!(
            source = %self,
            seconds = layout.length() as f64 / SAMPLE_RATE as f64,
            raw_rms = rms,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered loop"
        );
        Ok(buffer)
    }
}

impl fmt::Display for SoundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown source name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sound source `{0}`")]
pub struct UnknownSource(pub String);

impl FromStr for SoundSource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SoundSource::ALL
            .into_iter()
            .find(|source| source.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// The generator behind a [`SoundSource`].
pub enum SourceSignal<const SAMPLE_RATE: u32> {
    Noise(ColoredNoise<SAMPLE_RATE, StdRng>),
    Texture(Texture<SAMPLE_RATE>),
}

impl<const SAMPLE_RATE: u32> Signal for SourceSignal<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        match self {
            SourceSignal::Noise(noise) => noise.next_sample(),
            SourceSignal::Texture(texture) => texture.next_sample(),
        }
    }

    fn process(&mut self, buffer: &mut [f64]) {
        match self {
            SourceSignal::Noise(noise) => noise.process(buffer),
            SourceSignal::Texture(texture) => texture.process(buffer),
        }
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for SourceSignal<SAMPLE_RATE> {}
