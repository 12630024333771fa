//! Environmental sound synthesis.
//!
//! A texture is a stack of noise layers. Each layer takes a base noise
//! color, band-limits it with a biquad, and swings its amplitude with a
//! slow drifting LFO (gusts, swell). The presets in [`texture`] are the
//! acoustic recipes for wind, ocean and waterfall.

mod layer;
mod texture;

pub use layer::{Layer, LayerVoice};
pub use texture::{Ambience, OCEAN, Texture, WATERFALL, WIND};
