//! Audio filters.
//!
//! [`BiquadFilter`] shapes noise layers into bands; [`NotchFilter`] is the
//! user-tunable band-reject stage on the final mix.

mod biquad;
mod notch;

pub use self::biquad::{BiquadCoefficients, BiquadFilter, BiquadState, FilterType};
pub use self::notch::{GLIDE_SECONDS, NotchFilter};
