//! Oscillators used as modulation sources and test tones.

mod lfo;
mod sine;
mod traits;

pub use lfo::DriftingLfo;
pub use sine::SineOscillator;
pub use traits::Oscillator;
