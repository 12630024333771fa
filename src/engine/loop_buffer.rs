//! Pre-rendered loops that play back without an audible seam.
//!
//! A loop of `D` samples is made from `D + C` rendered samples. The first
//! `C` samples of the body are cross-faded with the `C` samples that follow
//! the body:
//!
//! ```text
//! out[t] = body[t] * fade_in(t) + tail[t] * fade_out(t)     t in [0, C)
//! out[t] = body[t]                                          t in [C, D)
//! ```
//!
//! At `t = 0` the output is `tail[0]`, which is the sample that originally
//! followed `body[D - 1]`, so playing `out` back to back continues the
//! rendered signal across the wrap.

use crate::Signal;
use crate::error::{ConfigError, RenderFailure};
use std::f64::consts::FRAC_PI_2;

/// Shape of the complementary fades used for the splice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FadeCurve {
    /// `fade_in + fade_out == 1`. Right for correlated material.
    Linear,
    /// `fade_in^2 + fade_out^2 == 1`. Keeps the power of uncorrelated noise
    /// constant through the splice.
    #[default]
    EqualPower,
}

impl FadeCurve {
    /// Gains `(fade_in, fade_out)` at position `t` of a fade `length` long.
    #[inline]
    pub fn gains(self, t: usize, length: usize) -> (f64, f64) {
        let x = t as f64 / length as f64;
        match self {
            FadeCurve::Linear => (x, 1.0 - x),
            FadeCurve::EqualPower => {
                let (sin, cos) = (x * FRAC_PI_2).sin_cos();
                (sin, cos)
            }
        }
    }
}

/// Validated loop and crossfade lengths, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopLayout {
    length: usize,
    crossfade: usize,
}

impl LoopLayout {
    /// The crossfade must be non-empty and shorter than the loop, and the
    /// rendered length `D + C` must fit in a `usize`.
    pub fn new(length: usize, crossfade: usize) -> Result<Self, ConfigError> {
        if crossfade == 0 || crossfade >= length || length.checked_add(crossfade).is_none() {
            return Err(ConfigError::LoopLength { length, crossfade });
        }
        Ok(Self { length, crossfade })
    }

    /// Layout for durations in seconds at `sample_rate`.
    pub fn from_seconds(
        loop_seconds: f64,
        crossfade_seconds: f64,
        sample_rate: u32,
    ) -> Result<Self, ConfigError> {
        let length = seconds_to_samples("loop duration", loop_seconds, sample_rate)?;
        let crossfade = seconds_to_samples("crossfade duration", crossfade_seconds, sample_rate)?;
        Self::new(length, crossfade)
    }

    /// Loop length `D`.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Crossfade length `C`.
    pub fn crossfade(&self) -> usize {
        self.crossfade
    }

    /// Samples that must be rendered: `D + C`.
    pub fn rendered_length(&self) -> usize {
        self.length + self.crossfade
    }
}

fn seconds_to_samples(name: &'static str, seconds: f64, sample_rate: u32) -> Result<usize, ConfigError> {
    if !seconds.is_finite() {
        return Err(ConfigError::NonFinite(name));
    }
    let samples = (seconds * sample_rate as f64).round();
    // usize::MAX as f64 rounds up, so equality is already out of range
    if seconds < 0.0 || samples >= usize::MAX as f64 {
        return Err(ConfigError::Duration { name, seconds });
    }
    Ok(samples as usize)
}

/// Renders `count` samples of `signal` into a freshly allocated vector.
///
/// Allocation failure is reported instead of aborting, since full-length
/// loops for every source are large.
pub fn render_extended<S: Signal>(signal: &mut S, count: usize) -> Result<Vec<f64>, RenderFailure> {
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(count)
        .map_err(|source| RenderFailure::Allocation {
            samples: count,
            source,
        })?;
    samples.resize(count, 0.0);
    signal.process(&mut samples);
    Ok(samples)
}

/// Removes DC and scales `samples` to `target_rms`, then clamps to [-1, 1].
///
/// Returns the RMS before scaling. Silent input is left as zeros.
pub fn normalize(samples: &mut [f64], target_rms: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    for sample in samples.iter_mut() {
        *sample -= mean;
    }
    let rms = (samples.iter().map(|s| s * s).sum::<f64>() / n).sqrt();
    let scale = if rms > 1e-12 { target_rms / rms } else { 0.0 };
    for sample in samples.iter_mut() {
        *sample = (*sample * scale).clamp(-1.0, 1.0);
    }
    rms
}

/// An immutable, seamlessly loopable block of mono samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopBuffer {
    samples: Box<[f64]>,
    crossfade: usize,
}

impl LoopBuffer {
    /// Renders `signal` and splices it into a loop.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinnitus_tamer::{FadeCurve, LoopBuffer, LoopLayout, PinkNoise};
    ///
    /// let layout = LoopLayout::from_seconds(1.0, 0.1, 8000).unwrap();
    /// let mut pink = PinkNoise::<8000>::new();
    /// let looped = LoopBuffer::render(&mut pink, layout, FadeCurve::EqualPower).unwrap();
    /// assert_eq!(looped.len(), 8000);
    /// ```
    pub fn render<S: Signal>(
        signal: &mut S,
        layout: LoopLayout,
        curve: FadeCurve,
    ) -> Result<Self, RenderFailure> {
        let extended = render_extended(signal, layout.rendered_length())?;
        // The vector is exactly D + C long, so the splice cannot fail.
        Ok(Self::splice(extended, layout, curve))
    }

    /// Splices an already rendered `D + C` stretch into a loop of `D`.
    pub fn from_extended(
        extended: Vec<f64>,
        layout: LoopLayout,
        curve: FadeCurve,
    ) -> Result<Self, ConfigError> {
        if extended.len() < layout.rendered_length() {
            return Err(ConfigError::LoopLength {
                length: extended.len(),
                crossfade: layout.crossfade(),
            });
        }
        Ok(Self::splice(extended, layout, curve))
    }

    fn splice(mut extended: Vec<f64>, layout: LoopLayout, curve: FadeCurve) -> Self {
        let length = layout.length();
        let crossfade = layout.crossfade();

        for t in 0..crossfade {
            let (fade_in, fade_out) = curve.gains(t, crossfade);
            extended[t] = extended[t] * fade_in + extended[length + t] * fade_out;
        }
        extended.truncate(length);

        Self {
            samples: extended.into_boxed_slice(),
            crossfade,
        }
    }

    /// Loop length in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn crossfade(&self) -> usize {
        self.crossfade
    }

    /// Sample at `index`, wrapping around the loop.
    #[inline]
    pub fn sample(&self, index: usize) -> f64 {
        self.samples[index % self.samples.len()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}

/// Read position into a loop, advancing by one per tick and wrapping at the
/// loop length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackCursor {
    position: usize,
    length: usize,
}

impl PlaybackCursor {
    /// A cursor over a loop of `length` samples (at least 1), starting at
    /// `start` modulo the length.
    pub fn new(length: usize, start: u64) -> Self {
        let length = length.max(1);
        Self {
            position: (start % length as u64) as usize,
            length,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the current position and steps forward.
    #[inline]
    pub fn advance(&mut self) -> usize {
        let current = self.position;
        self.position += 1;
        if self.position == self.length {
            self.position = 0;
        }
        current
    }
}

/// A loop buffer together with its cursor: an endless [`Signal`].
#[derive(Debug, Clone)]
pub struct LoopPlayer {
    buffer: LoopBuffer,
    cursor: PlaybackCursor,
}

impl LoopPlayer {
    /// Starts playing `buffer` at `tick` modulo its length, so players
    /// created at different times still line up.
    pub fn new(buffer: LoopBuffer, tick: u64) -> Self {
        let cursor = PlaybackCursor::new(buffer.len(), tick);
        Self { buffer, cursor }
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }
}

impl Signal for LoopPlayer {
    #[inline]
    fn next_sample(&mut self) -> f64 {
        self.buffer.sample(self.cursor.advance())
    }
}
