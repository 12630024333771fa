//! Mix and filter parameters, and the lock-free handoff between the control
//! context and the audio context.

use super::source::SoundSource;
use crate::error::ConfigError;
use std::sync::atomic::{AtomicU64, Ordering, fence};

/// Number of selectable sources.
pub const SOURCE_COUNT: usize = SoundSource::ALL.len();

/// Per-source gains plus the master gain, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixState {
    pub gains: [f64; SOURCE_COUNT],
    pub master: f64,
}

impl MixState {
    /// Every source and the master at zero.
    pub const SILENT: MixState = MixState {
        gains: [0.0; SOURCE_COUNT],
        master: 0.0,
    };

    pub fn gain(&self, source: SoundSource) -> f64 {
        self.gains[source.index()]
    }

    /// True when no source would be heard.
    pub fn is_silent(&self) -> bool {
        self.master == 0.0 || self.gains.iter().all(|&g| g == 0.0)
    }
}

impl Default for MixState {
    fn default() -> Self {
        let mut gains = [0.0; SOURCE_COUNT];
        gains[SoundSource::White.index()] = 0.5;
        Self { gains, master: 0.5 }
    }
}

/// Notch settings. A frequency of 0 bypasses the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterState {
    pub frequency: f64,
    pub q: f64,
}

impl FilterState {
    pub fn is_bypassed(&self) -> bool {
        self.frequency == 0.0
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            frequency: 4000.0,
            q: 30.0,
        }
    }
}

/// Everything the control side can set, as one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineState {
    pub mix: MixState,
    pub filter: FilterState,
    pub playing: bool,
}

impl EngineState {
    /// Checks and normalises every field.
    ///
    /// Gains above 1 are clamped. Negative or non-finite values are errors.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        for gain in self.mix.gains.iter_mut() {
            *gain = validate_gain(*gain)?;
        }
        self.mix.master = validate_gain(self.mix.master)?;
        self.filter.frequency = validate_frequency(self.filter.frequency)?;
        self.filter.q = validate_q(self.filter.q)?;
        Ok(self)
    }
}

/// Accepts a gain, clamping anything above 1.
pub fn validate_gain(gain: f64) -> Result<f64, ConfigError> {
    if !gain.is_finite() {
        return Err(ConfigError::NonFinite("gain"));
    }
    if gain < 0.0 {
        return Err(ConfigError::NegativeGain(gain));
    }
    Ok(gain.min(1.0))
}

pub fn validate_frequency(frequency: f64) -> Result<f64, ConfigError> {
    if !frequency.is_finite() {
        return Err(ConfigError::NonFinite("notch frequency"));
    }
    if frequency < 0.0 {
        return Err(ConfigError::Frequency(frequency));
    }
    Ok(frequency)
}

pub fn validate_q(q: f64) -> Result<f64, ConfigError> {
    if !q.is_finite() {
        return Err(ConfigError::NonFinite("notch Q"));
    }
    if q <= 0.0 {
        return Err(ConfigError::Q(q));
    }
    Ok(q)
}

// gains, master, frequency, q, playing
const FIELD_COUNT: usize = SOURCE_COUNT + 4;

/// Single-writer sequence lock over an [`EngineState`].
///
/// The writer bumps `version` to odd, stores the fields, then bumps it back
/// to even. A reader that sees an odd version, or a version that changed
/// while it was reading, discards what it read. Neither side ever blocks.
#[derive(Debug)]
pub struct SharedParams {
    version: AtomicU64,
    fields: [AtomicU64; FIELD_COUNT],
}

impl SharedParams {
    pub fn new(state: EngineState) -> Self {
        let fields = encode(&state).map(AtomicU64::new);
        Self {
            version: AtomicU64::new(0),
            fields,
        }
    }

    /// Publishes `state`. Must only be called from one thread at a time; the
    /// controller guarantees this by taking `&mut self`.
    pub fn store(&self, state: &EngineState) {
        let version = self.version.load(Ordering::Relaxed);
        self.version.store(version.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        for (field, bits) in self.fields.iter().zip(encode(state)) {
            field.store(bits, Ordering::Relaxed);
        }

        self.version.store(version.wrapping_add(2), Ordering::Release);
    }

    /// Reads a consistent snapshot, or `None` if a write was in progress.
    pub fn try_load(&self) -> Option<EngineState> {
        let before = self.version.load(Ordering::Acquire);
        if before % 2 == 1 {
            return None;
        }

        let mut bits = [0u64; FIELD_COUNT];
        for (slot, field) in bits.iter_mut().zip(self.fields.iter()) {
            *slot = field.load(Ordering::Relaxed);
        }

        fence(Ordering::Acquire);
        let after = self.version.load(Ordering::Relaxed);
        (before == after).then(|| decode(&bits))
    }

    /// Current version; changes on every store.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

fn encode(state: &EngineState) -> [u64; FIELD_COUNT] {
    let mut bits = [0u64; FIELD_COUNT];
    for (slot, gain) in bits.iter_mut().zip(state.mix.gains) {
        *slot = gain.to_bits();
    }
    bits[SOURCE_COUNT] = state.mix.master.to_bits();
    bits[SOURCE_COUNT + 1] = state.filter.frequency.to_bits();
    bits[SOURCE_COUNT + 2] = state.filter.q.to_bits();
    bits[SOURCE_COUNT + 3] = state.playing as u64;
    bits
}

fn decode(bits: &[u64; FIELD_COUNT]) -> EngineState {
    let mut gains = [0.0; SOURCE_COUNT];
    for (gain, slot) in gains.iter_mut().zip(bits) {
        *gain = f64::from_bits(*slot);
    }
    EngineState {
        mix: MixState {
            gains,
            master: f64::from_bits(bits[SOURCE_COUNT]),
        },
        filter: FilterState {
            frequency: f64::from_bits(bits[SOURCE_COUNT + 1]),
            q: f64::from_bits(bits[SOURCE_COUNT + 2]),
        },
        playing: bits[SOURCE_COUNT + 3] != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_defaults() {
        let state = EngineState::default();
        assert_eq!(state.mix.gain(SoundSource::White), 0.5);
        assert_eq!(state.mix.gain(SoundSource::Ocean), 0.0);
        assert_eq!(state.mix.master, 0.5);
        assert_eq!(state.filter.frequency, 4000.0);
        assert_eq!(state.filter.q, 30.0);
        assert!(!state.playing);
    }

    #[test]
    fn test_validate_gain() {
        assert_eq!(validate_gain(0.0), Ok(0.0));
        assert_eq!(validate_gain(0.7), Ok(0.7));
        assert_eq!(validate_gain(1.5), Ok(1.0));
        assert_eq!(validate_gain(-0.1), Err(ConfigError::NegativeGain(-0.1)));
        assert!(validate_gain(f64::NAN).is_err());
        assert!(validate_gain(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_filter() {
        assert_eq!(validate_frequency(0.0), Ok(0.0));
        assert_eq!(validate_frequency(-1.0), Err(ConfigError::Frequency(-1.0)));
        assert_eq!(validate_q(0.0), Err(ConfigError::Q(0.0)));
        assert!(validate_q(f64::NAN).is_err());
        assert_eq!(validate_q(0.5), Ok(0.5));
    }

    #[test]
    fn test_validated_state() {
        let mut state = EngineState::default();
        state.mix.gains[2] = 3.0;
        assert_eq!(state.validated().unwrap().mix.gains[2], 1.0);

        state.filter.q = -2.0;
        assert_eq!(state.validated(), Err(ConfigError::Q(-2.0)));
    }

    #[test]
    fn test_silent_mix() {
        assert!(MixState::SILENT.is_silent());
        assert!(!MixState::default().is_silent());
        let muted = MixState {
            master: 0.0,
            ..MixState::default()
        };
        assert!(muted.is_silent());
    }

    #[test]
    fn test_store_and_load() {
        let shared = SharedParams::new(EngineState::default());
        assert_eq!(shared.try_load(), Some(EngineState::default()));

        let mut state = EngineState::default();
        state.mix.gains[4] = 0.25;
        state.filter.frequency = 0.0;
        state.playing = true;
        shared.store(&state);

        assert_eq!(shared.version(), 2);
        assert_eq!(shared.try_load(), Some(state));
    }

    #[test]
    fn test_concurrent_reads_are_consistent() {
        // Every published state has all gains equal; a torn read would not.
        let shared = Arc::new(SharedParams::new(EngineState {
            mix: MixState::SILENT,
            ..EngineState::default()
        }));

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..20_000 {
                    let g = (i % 100) as f64 / 100.0;
                    let state = EngineState {
                        mix: MixState {
                            gains: [g; SOURCE_COUNT],
                            master: g,
                        },
                        ..EngineState::default()
                    };
                    shared.store(&state);
                }
            })
        };

        let mut seen = 0;
        while !writer.is_finished() || seen == 0 {
            if let Some(state) = shared.try_load() {
                let g = state.mix.master;
                assert!(state.mix.gains.iter().all(|&x| x == g));
                seen += 1;
            }
        }
        writer.join().unwrap();
        assert!(seen > 0);
    }
}
