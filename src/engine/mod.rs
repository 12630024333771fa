//! The mixing engine: pre-rendered loops, a control half and an audio half.
//!
//! [`Engine::new`] validates an [`EngineConfig`], renders the loops that are
//! audible from the start and wires a [`Controller`] to a [`Mixer`]. Use the
//! engine directly when one thread both controls and pulls audio, or
//! [`Engine::split`] it and move the mixer into the audio callback.
//!
//! ```
//! use tinnitus_tamer::engine::{Engine, EngineConfig, SoundSource};
//!
//! let config = EngineConfig {
//!     loop_seconds: 2.0,
//!     crossfade_seconds: 0.2,
//!     ..EngineConfig::default()
//! };
//! let mut engine = Engine::<8000>::new(config).unwrap();
//! engine.controller_mut().set_gain(SoundSource::Brown, 0.4).unwrap();
//! engine.controller_mut().start();
//!
//! let block = engine.pull_block(256);
//! assert_eq!(block.frames(), 256);
//! ```

mod buffer;
mod controller;
mod loop_buffer;
mod mixer;
mod params;
mod source;

pub use buffer::SampleBuffer;
pub use controller::Controller;
pub use loop_buffer::{
    FadeCurve, LoopBuffer, LoopLayout, LoopPlayer, PlaybackCursor, normalize, render_extended,
};
pub use mixer::{Installed, Mixer, TRANSPORT_FADE_SECONDS};
pub use params::{
    EngineState, FilterState, MixState, SOURCE_COUNT, SharedParams, validate_frequency,
    validate_gain, validate_q,
};
pub use source::{LOOP_RMS, SoundSource, SourceSignal, UnknownSource};

use crate::error::{ConfigError, Result};
use ringbuf::HeapRb;
use ringbuf::traits::Split;
use std::sync::Arc;
use tracing::info;

/// Lowest and highest supported sample rates.
pub const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 8000..=192_000;

/// When source loops are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderPolicy {
    /// At startup for audible sources, otherwise on first non-zero gain.
    #[default]
    OnDemand,
    /// Every source at startup.
    Eager,
}

/// Engine construction settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// 1 (mono) or 2 (the mono mix on both channels).
    pub channels: u16,
    pub loop_seconds: f64,
    pub crossfade_seconds: f64,
    pub fade_curve: FadeCurve,
    pub render_policy: RenderPolicy,
    /// Settings in effect from the first block.
    pub initial: EngineState,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channels: 1,
            loop_seconds: 60.0,
            crossfade_seconds: 3.0,
            fade_curve: FadeCurve::default(),
            render_policy: RenderPolicy::default(),
            initial: EngineState::default(),
        }
    }
}

/// A controller and mixer pair at a fixed sample rate.
pub struct Engine<const SAMPLE_RATE: u32> {
    config: EngineConfig,
    controller: Controller<SAMPLE_RATE>,
    mixer: Mixer<SAMPLE_RATE>,
}

impl<const SAMPLE_RATE: u32> Engine<SAMPLE_RATE> {
    /// Builds an engine, rendering the loops the initial settings need.
    ///
    /// A render failure here is returned; the engine never starts with a
    /// source silently missing.
    pub fn new(config: EngineConfig) -> Result<Self> {
        if !SAMPLE_RATE_RANGE.contains(&SAMPLE_RATE) {
            return Err(ConfigError::SampleRate(SAMPLE_RATE).into());
        }
        if !(1..=2).contains(&config.channels) {
            return Err(ConfigError::Channels(config.channels).into());
        }
        let layout =
            LoopLayout::from_seconds(config.loop_seconds, config.crossfade_seconds, SAMPLE_RATE)?;
        let initial = config.initial.validated()?;

        info!(
            sample_rate = SAMPLE_RATE,
            channels = config.channels,
            loop_seconds = config.loop_seconds,
            crossfade_seconds = config.crossfade_seconds,
            policy = ?config.render_policy,
            "starting engine"
        );

        let params = Arc::new(SharedParams::new(initial));
        let (installs, incoming) = HeapRb::<Installed>::new(SOURCE_COUNT).split();

        let mut controller = Controller::new(
            initial,
            Arc::clone(&params),
            installs,
            layout,
            config.fade_curve,
        );
        for source in SoundSource::ALL {
            if config.render_policy == RenderPolicy::Eager || initial.mix.gain(source) > 0.0 {
                controller.ensure_rendered(source)?;
            }
        }
        let mixer = Mixer::new(config.channels, params, incoming, initial);

        Ok(Self {
            config: EngineConfig { initial, ..config },
            controller,
            mixer,
        })
    }

    /// Pulls exactly `frames` frames of output.
    pub fn pull_block(&mut self, frames: usize) -> SampleBuffer {
        self.mixer.pull_block(frames)
    }

    pub fn controller(&self) -> &Controller<SAMPLE_RATE> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<SAMPLE_RATE> {
        &mut self.controller
    }

    pub fn mixer_mut(&mut self) -> &mut Mixer<SAMPLE_RATE> {
        &mut self.mixer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Separates the halves so the mixer can move to the audio thread.
    pub fn split(self) -> (Controller<SAMPLE_RATE>, Mixer<SAMPLE_RATE>) {
        (self.controller, self.mixer)
    }

    /// Rebuilds the engine at another sample rate, keeping the current
    /// settings. Every loop that was rendered is rendered again.
    pub fn with_sample_rate<const NEW_RATE: u32>(self) -> Result<Engine<NEW_RATE>> {
        let controller = &self.controller;
        info!(
            from = SAMPLE_RATE,
            to = NEW_RATE,
            "rebuilding engine at new sample rate"
        );
        let mut engine = Engine::<NEW_RATE>::new(EngineConfig {
            initial: controller.state(),
            ..self.config
        })?;
        for source in SoundSource::ALL {
            if controller.is_rendered(source) {
                engine.controller.ensure_rendered(source)?;
            }
        }
        Ok(engine)
    }
}
