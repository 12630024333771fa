//! Audio synthesis components.
//!
//! - Noise generators (white, pink, brown)
//! - Oscillators used as LFOs and test tones
//! - Filters (biquad band shaping, the tunable notch)
//! - Effects (tremolo, clipping)
//! - Environmental textures built from the above

pub mod ambience;
pub mod effects;
pub mod filters;
pub mod noise;
pub mod oscillators;
