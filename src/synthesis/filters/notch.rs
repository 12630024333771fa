//! Live, retunable notch filter applied to the final mix.

use super::biquad::{BiquadCoefficients, BiquadState, FilterType};

/// Length of the coefficient glide after a retune, in seconds.
pub const GLIDE_SECONDS: f64 = 0.02;

/// A second-order band-reject filter with click-free retuning.
///
/// Unlike [`BiquadFilter`](super::BiquadFilter) this does not own a source:
/// the mixer pushes samples through [`process`](Self::process) and retunes
/// it from the control side between blocks.
///
/// - A frequency of `0.0` means bypass: samples come out unchanged and the
///   delay line is left exactly as it was.
/// - Retuning never clears the delay line. The coefficients glide linearly
///   from their current values to the new design over [`GLIDE_SECONDS`].
/// - Leaving bypass glides in from the identity coefficients.
///
/// # Examples
///
/// ```
/// use tinnitus_tamer::NotchFilter;
///
/// let mut notch = NotchFilter::<44100>::new(4000.0, 30.0);
/// let y = notch.process(0.25);
/// assert!(y.is_finite());
///
/// notch.set_params(0.0, 30.0);
/// assert_eq!(notch.process(0.25), 0.25);
/// ```
pub struct NotchFilter<const SAMPLE_RATE: u32> {
    frequency: f64,
    q: f64,
    state: BiquadState,
    /// Coefficients in effect for the next sample.
    current: BiquadCoefficients,
    /// Where the glide started.
    start: BiquadCoefficients,
    /// Where the glide ends.
    target: BiquadCoefficients,
    glide_position: usize,
    glide_length: usize,
}

impl<const SAMPLE_RATE: u32> NotchFilter<SAMPLE_RATE> {
    /// Creates a notch at `frequency` Hz (0 for bypass) with quality `q`.
    ///
    /// The first design is applied immediately, with no glide.
    pub fn new(frequency: f64, q: f64) -> Self {
        let glide_length = ((GLIDE_SECONDS * SAMPLE_RATE as f64).round() as usize).max(1);
        let coefficients = Self::design(frequency, q);

        Self {
            frequency,
            q,
            state: BiquadState::default(),
            current: coefficients,
            start: coefficients,
            target: coefficients,
            glide_position: glide_length,
            glide_length,
        }
    }

    fn design(frequency: f64, q: f64) -> BiquadCoefficients {
        if frequency > 0.0 {
            BiquadCoefficients::design(FilterType::Notch, frequency, q, SAMPLE_RATE as f64)
        } else {
            BiquadCoefficients::IDENTITY
        }
    }

    /// Retunes the filter. Does nothing if the parameters are unchanged.
    ///
    /// Callers validate the values; a non-positive `q` is clamped by the
    /// coefficient design.
    pub fn set_params(&mut self, frequency: f64, q: f64) {
        if frequency == self.frequency && q == self.q {
            return;
        }
        let was_bypassed = self.is_bypassed();
        self.frequency = frequency;
        self.q = q;

        if self.is_bypassed() {
            // Jump straight to identity so bypass is exact from the next sample.
            self.current = BiquadCoefficients::IDENTITY;
            self.start = self.current;
            self.target = self.current;
            self.glide_position = self.glide_length;
            return;
        }

        self.start = if was_bypassed {
            BiquadCoefficients::IDENTITY
        } else {
            self.current
        };
        self.target = Self::design(frequency, q);
        self.glide_position = 0;
    }

    /// Filters one sample.
    #[inline]
    pub fn process(&mut self, sample: f64) -> f64 {
        if self.is_bypassed() {
            return sample;
        }

        if self.glide_position < self.glide_length {
            self.glide_position += 1;
            let t = self.glide_position as f64 / self.glide_length as f64;
            self.current = self.start.lerp(&self.target, t);
        }

        self.state.process(&self.current, sample)
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn is_bypassed(&self) -> bool {
        self.frequency <= 0.0
    }

    /// True while coefficients are still moving towards the latest design.
    pub fn is_gliding(&self) -> bool {
        self.glide_position < self.glide_length
    }

    /// Coefficients that will be used for the next sample once any glide ends.
    pub fn target(&self) -> &BiquadCoefficients {
        &self.target
    }

    /// The delay line, for inspection.
    pub fn state(&self) -> &BiquadState {
        &self.state
    }
}
