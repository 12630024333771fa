//! Error types for engine construction and control.

use crate::engine::SoundSource;
use std::collections::TryReserveError;
use thiserror::Error;

/// Invalid input from the configuration or control side.
///
/// Rejected values never reach the audio path; whatever was set before stays
/// in effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unsupported sample rate {0} Hz (expected 8000..=192000)")]
    SampleRate(u32),

    #[error("unsupported channel count {0} (expected 1 or 2)")]
    Channels(u16),

    #[error("gain must not be negative, got {0}")]
    NegativeGain(f64),

    #[error("{0} must be a finite number")]
    NonFinite(&'static str),

    #[error("notch frequency must be 0 (off) or positive, got {0} Hz")]
    Frequency(f64),

    #[error("notch Q must be greater than 0, got {0}")]
    Q(f64),

    #[error("{name} of {seconds} s is negative or too long")]
    Duration { name: &'static str, seconds: f64 },

    #[error("crossfade of {crossfade} samples does not fit a loop of {length} samples")]
    LoopLength { length: usize, crossfade: usize },
}

/// Failure to produce a loop buffer.
#[derive(Debug, Error)]
pub enum RenderFailure {
    #[error("could not allocate {samples} samples")]
    Allocation {
        samples: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to render the {sound} loop")]
    Render {
        sound: SoundSource,
        #[source]
        failure: RenderFailure,
    },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
