//! Biquad filter implementations.
//!
//! Coefficients follow Robert Bristow-Johnson's Audio EQ Cookbook. The
//! coefficient design and the Direct Form I delay line are separate types so
//! that [`BiquadFilter`] (a fixed shaping stage wrapped around a source) and
//! [`NotchFilter`](super::NotchFilter) (a live, retunable stage on the mix)
//! share the same maths.

use crate::{AudioSignal, Param, Signal};
use std::f64::consts::PI;

/// The type of filter to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// Low-pass filter - attenuates frequencies above the cutoff
    LowPass,
    /// High-pass filter - attenuates frequencies below the cutoff
    HighPass,
    /// Band-pass filter - passes frequencies near the center, attenuates others
    BandPass,
    /// Notch/band-reject filter - attenuates frequencies near the center
    Notch,
}

/// Normalised biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Coefficients that pass the input through unchanged.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Designs coefficients for `filter_type` at `freq` Hz with quality `q`.
    ///
    /// The frequency is clamped to [1 Hz, 0.49 * sample_rate] and Q to at
    /// least 0.001, so every input yields a stable filter.
    pub fn design(filter_type: FilterType, freq: f64, q: f64, sample_rate: f64) -> Self {
        let q = q.max(0.001);
        let freq = freq.clamp(1.0, sample_rate * 0.49);

        let omega = 2.0 * PI * freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let (b0, b1, b2) = match filter_type {
            FilterType::LowPass => {
                let b = (1.0 - cos_omega) / 2.0;
                (b, 1.0 - cos_omega, b)
            }
            FilterType::HighPass => {
                let b = (1.0 + cos_omega) / 2.0;
                (b, -(1.0 + cos_omega), b)
            }
            // Constant 0 dB peak gain
            FilterType::BandPass => (alpha, 0.0, -alpha),
            FilterType::Notch => (1.0, -2.0 * cos_omega, 1.0),
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Linear interpolation towards `target`; `t` is clamped to [0, 1].
    ///
    /// The set of stable `(a1, a2)` pairs is a triangle, so any blend of two
    /// stable designs is itself stable.
    pub fn lerp(&self, target: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            b0: mix(self.b0, target.b0),
            b1: mix(self.b1, target.b1),
            b2: mix(self.b2, target.b2),
            a1: mix(self.a1, target.a1),
            a2: mix(self.a2, target.a2),
        }
    }

    /// Magnitude of the frequency response at `freq` Hz.
    pub fn magnitude_at(&self, freq: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * freq / sample_rate;
        let (s1, c1) = omega.sin_cos();
        let (s2, c2) = (2.0 * omega).sin_cos();

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        (num_re.hypot(num_im)) / (den_re.hypot(den_im))
    }
}

/// Direct Form I delay line: two past inputs and two past outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadState {
    /// Runs one sample through `coefficients`, updating the delay line.
    #[inline]
    pub fn process(&mut self, coefficients: &BiquadCoefficients, x0: f64) -> f64 {
        // y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
        let y0 = coefficients.b0 * x0 + coefficients.b1 * self.x1 + coefficients.b2 * self.x2
            - coefficients.a1 * self.y1
            - coefficients.a2 * self.y2;

        // Keep decaying tails out of the denormal range
        let y0 = if y0.abs() < 1e-15 { 0.0 } else { y0 };

        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;

        y0
    }

    /// True when every register is zero.
    pub fn is_silent(&self) -> bool {
        *self == Self::default()
    }
}

/// A biquad filter that processes an input signal.
///
/// Used to band-limit noise layers. Cutoff and Q may be fixed or modulated;
/// coefficients are only recomputed per sample when one of them is modulated.
///
/// # Examples
///
/// ```
/// use tinnitus_tamer::{BrownNoise, filters::BiquadFilter};
///
/// let rumble = BiquadFilter::lowpass(BrownNoise::<44100>::new(), 600.0, 0.707);
/// ```
pub struct BiquadFilter<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> {
    source: S,
    cutoff: Param,
    resonance: Param,
    filter_type: FilterType,
    coefficients: BiquadCoefficients,
    state: BiquadState,
    needs_coefficient_update: bool,
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> BiquadFilter<SAMPLE_RATE, S> {
    pub fn new(
        source: S,
        cutoff: impl Into<Param>,
        resonance: impl Into<Param>,
        filter_type: FilterType,
    ) -> Self {
        let cutoff = cutoff.into();
        let resonance = resonance.into();
        let needs_coefficient_update = !cutoff.is_fixed() || !resonance.is_fixed();

        let mut filter = Self {
            source,
            cutoff,
            resonance,
            filter_type,
            coefficients: BiquadCoefficients::IDENTITY,
            state: BiquadState::default(),
            needs_coefficient_update,
        };
        filter.update_coefficients();
        filter
    }

    fn update_coefficients(&mut self) {
        let freq = self.cutoff.value();
        let q = self.resonance.value();
        self.coefficients =
            BiquadCoefficients::design(self.filter_type, freq, q, SAMPLE_RATE as f64);
    }

    /// Creates a low-pass filter.
    pub fn lowpass(source: S, cutoff: impl Into<Param>, q: impl Into<Param>) -> Self {
        Self::new(source, cutoff, q, FilterType::LowPass)
    }

    /// Creates a high-pass filter.
    pub fn highpass(source: S, cutoff: impl Into<Param>, q: impl Into<Param>) -> Self {
        Self::new(source, cutoff, q, FilterType::HighPass)
    }

    /// Creates a band-pass filter. Bandwidth is roughly `center / q`.
    pub fn bandpass(source: S, center: impl Into<Param>, q: impl Into<Param>) -> Self {
        Self::new(source, center, q, FilterType::BandPass)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> Signal for BiquadFilter<SAMPLE_RATE, S> {
    fn next_sample(&mut self) -> f64 {
        if self.needs_coefficient_update {
            self.update_coefficients();
        }

        let x0 = self.source.next_sample();
        self.state.process(&self.coefficients, x0)
    }
}

impl<const SAMPLE_RATE: u32, S: AudioSignal<SAMPLE_RATE>> AudioSignal<SAMPLE_RATE>
    for BiquadFilter<SAMPLE_RATE, S>
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantSignal, SineOscillator};

    fn settle_peak<S: Signal>(filter: &mut S, settle: usize, window: usize) -> f64 {
        for _ in 0..settle {
            filter.next_sample();
        }
        (0..window).fold(0.0_f64, |peak, _| peak.max(filter.next_sample().abs()))
    }

    #[test]
    fn test_lowpass_creation() {
        let source = ConstantSignal::<44100>(0.5);
        let filter = BiquadFilter::lowpass(source, 1000.0, 0.707);
        assert_eq!(filter.filter_type(), FilterType::LowPass);
        assert_eq!(filter.sample_rate(), 44100.0);
    }

    #[test]
    fn test_lowpass_attenuates_high_frequencies() {
        let source = SineOscillator::<44100>::new(10000.0);
        let mut filter = BiquadFilter::lowpass(source, 100.0, 0.707);
        let peak = settle_peak(&mut filter, 1000, 441);
        assert!(peak < 0.01, "Expected attenuation, got {}", peak);
    }

    #[test]
    fn test_lowpass_passes_low_frequencies() {
        let source = SineOscillator::<44100>::new(100.0);
        let mut filter = BiquadFilter::lowpass(source, 5000.0, 0.707);
        let peak = settle_peak(&mut filter, 1000, 441);
        assert!(peak > 0.9, "Expected pass-through, got {}", peak);
    }

    #[test]
    fn test_constant_input_dc_blocking() {
        let source = ConstantSignal::<44100>(1.0);
        let mut filter = BiquadFilter::highpass(source, 100.0, 0.707);
        for _ in 0..5000 {
            filter.next_sample();
        }
        let sample = filter.next_sample();
        assert!(sample.abs() < 0.01, "Expected DC blocking, got {}", sample);
    }

    #[test]
    fn test_bandpass_attenuates_extremes() {
        let low = SineOscillator::<44100>::new(100.0);
        let mut bp_low = BiquadFilter::bandpass(low, 1000.0, 5.0);
        let high = SineOscillator::<44100>::new(10000.0);
        let mut bp_high = BiquadFilter::bandpass(high, 1000.0, 5.0);

        let low_peak = settle_peak(&mut bp_low, 2000, 441);
        let high_peak = settle_peak(&mut bp_high, 2000, 441);
        assert!(low_peak < 0.3, "Low freq not attenuated: {}", low_peak);
        assert!(high_peak < 0.3, "High freq not attenuated: {}", high_peak);
    }

    #[test]
    fn test_modulated_cutoff() {
        use crate::SignalExt;
        let source = SineOscillator::<44100>::new(440.0);
        let lfo = SineOscillator::<44100>::new(1.0);
        let mut filter = BiquadFilter::lowpass(source, lfo.gain(500.0), 0.707);

        assert!(filter.needs_coefficient_update);
        for _ in 0..1000 {
            assert!(filter.next_sample().is_finite());
        }
    }

    #[test]
    fn test_fixed_params_optimization() {
        let source = ConstantSignal::<44100>(1.0);
        let filter = BiquadFilter::lowpass(source, 1000.0, 0.707);
        assert!(!filter.needs_coefficient_update);
    }

    #[test]
    fn test_notch_design_response() {
        let c = BiquadCoefficients::design(FilterType::Notch, 1000.0, 10.0, 44100.0);
        assert!(c.magnitude_at(1000.0, 44100.0) < 1e-6);
        assert!((c.magnitude_at(200.0, 44100.0) - 1.0).abs() < 0.01);
        assert!((c.magnitude_at(10000.0, 44100.0) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_identity_coefficients() {
        let mut state = BiquadState::default();
        for x in [0.3, -0.7, 1.0, 0.0] {
            assert_eq!(state.process(&BiquadCoefficients::IDENTITY, x), x);
        }
        assert!((BiquadCoefficients::IDENTITY.magnitude_at(5000.0, 44100.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = BiquadCoefficients::design(FilterType::Notch, 500.0, 2.0, 48000.0);
        let b = BiquadCoefficients::design(FilterType::Notch, 8000.0, 20.0, 48000.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 3.0), b);
    }

    #[test]
    fn test_q_and_frequency_clamping() {
        let source = SineOscillator::<44100>::new(440.0);
        let mut filter = BiquadFilter::lowpass(source, 50000.0, 0.0);
        for _ in 0..100 {
            assert!(filter.next_sample().is_finite());
        }
    }

    #[test]
    fn test_state_silence_tracking() {
        let mut state = BiquadState::default();
        assert!(state.is_silent());
        let c = BiquadCoefficients::design(FilterType::LowPass, 1000.0, 0.707, 44100.0);
        state.process(&c, 1.0);
        assert!(!state.is_silent());
    }
}
