//! Signal combinators for composing generators.

use crate::{AudioSignal, Param, Signal};

/// Scales a signal by a fixed or modulated factor.
///
/// Texture layers use this to set their level in the blend.
///
/// # Examples
///
/// ```
/// use tinnitus_tamer::{Signal, WhiteNoise, combinators::Gain};
///
/// let mut quieter = Gain { source: WhiteNoise::<44100>::new(), gain: 0.3.into() };
/// assert!(quieter.next_sample().abs() <= 0.3);
/// ```
pub struct Gain<S: Signal> {
    pub source: S,
    pub gain: Param,
}

impl<S: Signal> Signal for Gain<S> {
    fn next_sample(&mut self) -> f64 {
        self.source.next_sample() * self.gain.value()
    }
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> AudioSignal<SAMPLE_RATE> for Gain<S> {}

/// Extension trait providing combinator methods on any [`Signal`].
pub trait SignalExt: Signal + Sized {
    /// Applies a gain factor to this signal.
    fn gain(self, gain: impl Into<Param>) -> Gain<Self> {
        Gain {
            source: self,
            gain: gain.into(),
        }
    }
}

// Blanket implementation for all Signal types
impl<T: Signal> SignalExt for T {}
