//! Noise generators for audio synthesis.
//!
//! [`WhiteNoise`] is the raw entropy source; [`PinkNoise`] and [`BrownNoise`]
//! shape independent white draws into the -3 and -6 dB/octave colors.

mod brown;
mod colored;
mod pink;
mod white;

pub use brown::BrownNoise;
pub use colored::{ColoredNoise, NoiseColor};
pub use pink::PinkNoise;
pub use white::WhiteNoise;
