//! Core signal trait and parameter types.

/// Common interface for all signal sources and processors.
///
/// Noise generators, LFOs, filters and texture voices all implement this
/// trait. Implementors keep whatever state they need (RNG, phase, delay
/// lines) between calls so consecutive samples form one continuous stream.
pub trait Signal {
    /// Generates the next sample, typically between -1.0 and 1.0.
    fn next_sample(&mut self) -> f64;

    /// Fills `buffer` with consecutive samples.
    ///
    /// The default implementation calls `next_sample()` for each element.
    fn process(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

/// A signal that always returns the same value.
///
/// Mostly useful as a DC input when probing filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSignal<const SAMPLE_RATE: u32>(pub f64);

impl<const SAMPLE_RATE: u32> Signal for ConstantSignal<SAMPLE_RATE> {
    fn next_sample(&mut self) -> f64 {
        self.0
    }

    fn process(&mut self, buffer: &mut [f64]) {
        buffer.fill(self.0);
    }
}

impl<const SAMPLE_RATE: u32> From<f64> for ConstantSignal<SAMPLE_RATE> {
    fn from(value: f64) -> Self {
        ConstantSignal::<SAMPLE_RATE>(value)
    }
}

impl<const SAMPLE_RATE: u32> crate::AudioSignal<SAMPLE_RATE> for ConstantSignal<SAMPLE_RATE> {}

/// A parameter that is either a fixed value or driven by another signal.
///
/// Texture layers use this for modulation: a tremolo depth is usually
/// fixed while its modulator is a drifting LFO.
///
/// # Examples
///
/// ```
/// use tinnitus_tamer::{Param, SineOscillator};
///
/// let mut depth: Param = 0.5.into();
/// assert_eq!(depth.value(), 0.5);
///
/// let mut swell = Param::modulated(SineOscillator::<44100>::new(0.1));
/// assert!(swell.value().abs() <= 1.0);
/// ```
pub enum Param {
    /// A fixed, constant value
    Fixed(f64),
    /// A value modulated by a signal source
    Signal(Box<dyn Signal + Send>),
}

impl Param {
    /// Current value. Modulated parameters advance their signal by one sample.
    pub fn value(&mut self) -> f64 {
        match self {
            Param::Fixed(v) => *v,
            Param::Signal(s) => s.next_sample(),
        }
    }

    /// Creates a fixed parameter.
    pub fn fixed(value: f64) -> Self {
        Param::Fixed(value)
    }

    /// Creates a parameter driven by `signal`.
    pub fn modulated(signal: impl Signal + Send + 'static) -> Self {
        Param::Signal(Box::new(signal))
    }

    /// Returns true if this parameter never changes.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Param::Fixed(_))
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Fixed(value)
    }
}

impl<S: Signal + Send + 'static> From<S> for Param {
    fn from(signal: S) -> Self {
        Param::Signal(Box::new(signal))
    }
}
