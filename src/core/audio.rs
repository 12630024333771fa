//! Audio signal trait for sample-rate-aware signals.

use crate::Signal;

/// A signal whose output is tied to a sample rate.
///
/// The sample rate is a const generic parameter so that generators and
/// filters built for different rates cannot be chained together by accident.
/// Rebuilding at another rate means constructing new values of a different
/// type, which is exactly when loop buffers have to be re-rendered.
///
/// # Examples
///
/// ```
/// use tinnitus_tamer::{AudioSignal, WhiteNoise};
///
/// let noise = WhiteNoise::<44100>::new();
/// assert_eq!(noise.sample_rate(), 44100.0);
/// ```
pub trait AudioSignal<const SAMPLE_RATE: u32>: Signal {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> f64 {
        SAMPLE_RATE as f64
    }
}
