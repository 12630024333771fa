//! Amplitude effects: texture modulation and output clipping.

mod clip;
mod tremolo;

pub use clip::{hard_clip, soft_clip};
pub use tremolo::Tremolo;
