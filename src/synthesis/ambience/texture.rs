//! Environmental textures: wind, ocean and waterfall.

use super::layer::{Layer, LayerVoice};
use crate::synthesis::filters::FilterType;
use crate::synthesis::noise::NoiseColor;
use crate::{AudioSignal, Signal};
use rand::{Rng, RngCore};

/// Broad band of brown noise around 500 Hz with irregular gusts.
pub const WIND: &[Layer] = &[Layer {
    color: NoiseColor::Brown,
    band: FilterType::BandPass,
    frequency: 500.0,
    q: 0.8,
    rate: 0.18,
    jitter: 0.4,
    depth: 0.65,
    level: 1.0,
}];

/// Low brown rumble under a slow deep swell, with a quieter pink surf
/// layer riding the same swell. Both layers use a steady LFO so the surf
/// stays on the crest of each wave.
pub const OCEAN: &[Layer] = &[
    Layer {
        color: NoiseColor::Brown,
        band: FilterType::LowPass,
        frequency: 600.0,
        q: 0.707,
        rate: 0.1,
        jitter: 0.0,
        depth: 0.85,
        level: 1.0,
    },
    Layer {
        color: NoiseColor::Pink,
        band: FilterType::HighPass,
        frequency: 2500.0,
        q: 0.707,
        rate: 0.1,
        jitter: 0.0,
        depth: 1.0,
        level: 0.25,
    },
];

/// Wideband pink and white blend above 200 Hz with only a faint drift.
pub const WATERFALL: &[Layer] = &[
    Layer {
        color: NoiseColor::Pink,
        band: FilterType::HighPass,
        frequency: 200.0,
        q: 0.707,
        rate: 0.05,
        jitter: 0.3,
        depth: 0.1,
        level: 0.7,
    },
    Layer {
        color: NoiseColor::White,
        band: FilterType::HighPass,
        frequency: 200.0,
        q: 0.707,
        rate: 0.05,
        jitter: 0.3,
        depth: 0.1,
        level: 0.3,
    },
];

/// Which environmental texture to synthesise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ambience {
    Wind,
    Ocean,
    Waterfall,
}

impl Ambience {
    /// The layer recipe for this texture.
    pub fn layers(self) -> &'static [Layer] {
        match self {
            Ambience::Wind => WIND,
            Ambience::Ocean => OCEAN,
            Ambience::Waterfall => WATERFALL,
        }
    }
}

/// The sum of a set of layer voices.
///
/// All layers start their LFO at one shared, randomly drawn phase; layers
/// with the same steady rate therefore swell together.
///
/// # Examples
///
/// ```
/// use tinnitus_tamer::{Ambience, Signal, Texture};
///
/// let mut wind = Texture::<44100>::new(Ambience::Wind);
/// let mut block = vec![0.0; 512];
/// wind.process(&mut block);
/// ```
pub struct Texture<const SAMPLE_RATE: u32> {
    voices: Vec<LayerVoice<SAMPLE_RATE>>,
}

impl<const SAMPLE_RATE: u32> Texture<SAMPLE_RATE> {
    /// Creates a texture seeded from the thread RNG.
    pub fn new(ambience: Ambience) -> Self {
        Self::with_rng(ambience, &mut rand::thread_rng())
    }

    /// Creates a texture drawing every seed from `rng`.
    pub fn with_rng<R: RngCore>(ambience: Ambience, rng: &mut R) -> Self {
        Self::from_layers(ambience.layers(), rng)
    }

    /// Creates a texture from an arbitrary layer recipe.
    pub fn from_layers<R: RngCore>(layers: &[Layer], rng: &mut R) -> Self {
        let phase: f64 = rng.gen_range(0.0..1.0);
        let voices = layers
            .iter()
            .map(|layer| LayerVoice::new(layer, phase, rng))
            .collect();
        Self { voices }
    }

    pub fn layer_count(&self) -> usize {
        self.voices.len()
    }
}

impl<const SAMPLE_RATE: u32> Signal for Texture<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        self.voices.iter_mut().map(|voice| voice.next_sample()).sum()
    }
}

impl<const SAMPLE_RATE: u32> AudioSignal<SAMPLE_RATE> for Texture<SAMPLE_RATE> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const RATE: u32 = 22050;

    fn render(ambience: Ambience, seconds: usize, seed: u64) -> Vec<f64> {
        let mut texture = Texture::<RATE>::with_rng(ambience, &mut StdRng::seed_from_u64(seed));
        let mut out = vec![0.0; seconds * RATE as usize];
        texture.process(&mut out);
        out
    }

    /// RMS over consecutive windows of `window` samples.
    fn envelope(samples: &[f64], window: usize) -> Vec<f64> {
        samples
            .chunks_exact(window)
            .map(|chunk| (chunk.iter().map(|s| s * s).sum::<f64>() / window as f64).sqrt())
            .collect()
    }

    fn swing(samples: &[f64]) -> f64 {
        // Quarter-second windows average out the noise but follow the LFO
        let env = envelope(samples, RATE as usize / 4);
        let max = env.iter().cloned().fold(f64::MIN, f64::max);
        let min = env.iter().cloned().fold(f64::MAX, f64::min);
        max / min
    }

    fn zero_crossing_rate(samples: &[f64]) -> f64 {
        let crossings = samples.windows(2).filter(|w| (w[0] < 0.0) != (w[1] < 0.0)).count();
        crossings as f64 / samples.len() as f64
    }

    #[test]
    fn test_layer_counts() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(Texture::<RATE>::with_rng(Ambience::Wind, &mut rng).layer_count(), 1);
        assert_eq!(Texture::<RATE>::with_rng(Ambience::Ocean, &mut rng).layer_count(), 2);
        assert_eq!(Texture::<RATE>::with_rng(Ambience::Waterfall, &mut rng).layer_count(), 2);
    }

    #[test]
    fn test_textures_are_finite_and_bounded() {
        for ambience in [Ambience::Wind, Ambience::Ocean, Ambience::Waterfall] {
            let out = render(ambience, 5, 1);
            assert!(out.iter().all(|s| s.is_finite() && s.abs() < 4.0), "{:?}", ambience);
            assert!(out.iter().any(|s| s.abs() > 1e-3), "{:?} is silent", ambience);
        }
    }

    #[test]
    fn test_ocean_swells_more_than_waterfall() {
        // 20 s covers two full 0.1 Hz swells
        let ocean = swing(&render(Ambience::Ocean, 20, 2));
        let waterfall = swing(&render(Ambience::Waterfall, 20, 2));
        assert!(ocean > 2.0, "ocean swing = {}", ocean);
        assert!(waterfall < ocean, "waterfall {} vs ocean {}", waterfall, ocean);
    }

    #[test]
    fn test_wind_gusts() {
        let wind = swing(&render(Ambience::Wind, 20, 3));
        assert!(wind > 1.5, "wind swing = {}", wind);
    }

    #[test]
    fn test_ocean_is_darker_than_waterfall() {
        let ocean = zero_crossing_rate(&render(Ambience::Ocean, 2, 4));
        let waterfall = zero_crossing_rate(&render(Ambience::Waterfall, 2, 4));
        assert!(ocean < waterfall, "ocean {} vs waterfall {}", ocean, waterfall);
    }

    #[test]
    fn test_state_carries_across_blocks() {
        // Same seed, one long block vs. many short ones: identical output
        let whole = render(Ambience::Wind, 1, 5);

        let mut texture = Texture::<RATE>::with_rng(Ambience::Wind, &mut StdRng::seed_from_u64(5));
        let mut pieces = Vec::with_capacity(whole.len());
        let mut block = vec![0.0; 441];
        while pieces.len() < whole.len() {
            texture.process(&mut block);
            pieces.extend_from_slice(&block);
        }
        pieces.truncate(whole.len());
        assert_eq!(whole, pieces);
    }
}
