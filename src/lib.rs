//! Tinnitus Tamer - a masking sound engine for tinnitus relief
//!
//! The crate generates white, pink and brown noise and environmental
//! textures (wind, ocean, waterfall), renders each into a seamless loop, and
//! mixes the loops through a tunable notch filter.
//!
//! Building blocks live in [`synthesis`] and follow one pattern: everything
//! is a [`Signal`] that yields one sample at a time. The [`engine`] puts them
//! together into a controller for the UI side and a mixer for the audio
//! callback.

pub mod combinators;
pub mod core;
pub mod engine;
pub mod error;
#[cfg(feature = "wav-export")]
pub mod export;
pub mod synthesis;

pub use synthesis::filters;

// Re-export commonly used types at the crate root
pub use crate::core::{AudioSignal, ConstantSignal, Param, Signal};
pub use combinators::{Gain, SignalExt};
pub use engine::{
    Controller, Engine, EngineConfig, EngineState, FadeCurve, FilterState, LoopBuffer,
    LoopLayout, Mixer, MixState, PlaybackCursor, RenderPolicy, SampleBuffer, SoundSource,
};
pub use error::{ConfigError, EngineError, RenderFailure, Result};
pub use synthesis::ambience::{Ambience, Layer, Texture};
pub use synthesis::effects::{Tremolo, hard_clip, soft_clip};
pub use synthesis::filters::{BiquadFilter, FilterType, NotchFilter};
pub use synthesis::noise::{BrownNoise, ColoredNoise, NoiseColor, PinkNoise, WhiteNoise};
pub use synthesis::oscillators::{DriftingLfo, Oscillator, SineOscillator};
