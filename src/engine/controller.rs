//! The control-context half of the engine.

use super::loop_buffer::{FadeCurve, LoopLayout};
use super::mixer::Installed;
use super::params::{
    EngineState, SOURCE_COUNT, SharedParams, validate_frequency, validate_gain, validate_q,
};
use super::source::SoundSource;
use crate::error::{ConfigError, EngineError, Result};
use ringbuf::HeapProd;
use ringbuf::traits::Producer;
use std::sync::Arc;
use tracing::{debug, warn};

/// Applies user settings and ships rendered loops to the [`Mixer`].
///
/// Every setter validates first; a rejected value is logged and returned as
/// an error, and the previous settings stay in effect. Accepted changes are
/// heard from the mixer's next block.
///
/// [`Mixer`]: super::Mixer
pub struct Controller<const SAMPLE_RATE: u32> {
    state: EngineState,
    params: Arc<SharedParams>,
    installs: HeapProd<Installed>,
    rendered: [bool; SOURCE_COUNT],
    layout: LoopLayout,
    curve: FadeCurve,
}

impl<const SAMPLE_RATE: u32> Controller<SAMPLE_RATE> {
    pub(crate) fn new(
        state: EngineState,
        params: Arc<SharedParams>,
        installs: HeapProd<Installed>,
        layout: LoopLayout,
        curve: FadeCurve,
    ) -> Self {
        Self {
            state,
            params,
            installs,
            rendered: [false; SOURCE_COUNT],
            layout,
            curve,
        }
    }

    /// Sets one source's gain. Values above 1 are clamped.
    ///
    /// The first time a source gets a non-zero gain its loop is rendered
    /// here, before the call returns.
    pub fn set_gain(&mut self, source: SoundSource, gain: f64) -> Result<()> {
        let gain = validate_gain(gain).map_err(|err| rejected("gain", err))?;
        if gain > 0.0 {
            self.ensure_rendered(source)?;
        }
        self.state.mix.gains[source.index()] = gain;
        self.publish();
        Ok(())
    }

    /// Sets the master gain. Values above 1 are clamped.
    pub fn set_master_gain(&mut self, gain: f64) -> Result<()> {
        self.state.mix.master = validate_gain(gain).map_err(|err| rejected("master gain", err))?;
        self.publish();
        Ok(())
    }

    /// Moves the notch. 0 turns it off.
    pub fn set_notch_frequency(&mut self, frequency: f64) -> Result<()> {
        self.state.filter.frequency =
            validate_frequency(frequency).map_err(|err| rejected("notch frequency", err))?;
        self.publish();
        Ok(())
    }

    pub fn set_notch_q(&mut self, q: f64) -> Result<()> {
        self.state.filter.q = validate_q(q).map_err(|err| rejected("notch Q", err))?;
        self.publish();
        Ok(())
    }

    /// Starts playback with a short fade in.
    pub fn start(&mut self) {
        self.state.playing = true;
        self.publish();
    }

    /// Stops playback with a short fade out.
    pub fn stop(&mut self) {
        self.state.playing = false;
        self.publish();
    }

    /// The settings as last accepted.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Replaces every setting at once, e.g. to restore saved settings.
    ///
    /// Either the whole state is accepted or nothing changes.
    pub fn apply(&mut self, state: EngineState) -> Result<()> {
        let state = state
            .validated()
            .map_err(|err| rejected("engine state", err))?;
        for source in SoundSource::ALL {
            if state.mix.gain(source) > 0.0 {
                self.ensure_rendered(source)?;
            }
        }
        self.state = state;
        self.publish();
        Ok(())
    }

    /// Whether `source`'s loop has been rendered and sent to the mixer.
    pub fn is_rendered(&self, source: SoundSource) -> bool {
        self.rendered[source.index()]
    }

    /// Renders `source` now if it has not been rendered yet.
    pub fn ensure_rendered(&mut self, source: SoundSource) -> Result<()> {
        if self.is_rendered(source) {
            return Ok(());
        }
        let buffer = source
            .render::<SAMPLE_RATE>(self.layout, self.curve)
            .inspect_err(|err| warn!(%source, error = %err, "loop render failed"))?;

        match self.installs.try_push((source, buffer)) {
            Ok(()) => {
                self.rendered[source.index()] = true;
                debug!(%source, "loop sent to mixer");
            }
            // Each source is sent at most once, so the queue has room for
            // all of them; this only happens if the mixer was dropped early.
            Err(_) => warn!(%source, "mixer queue full, loop discarded"),
        }
        Ok(())
    }

    pub fn layout(&self) -> LoopLayout {
        self.layout
    }

    fn publish(&self) {
        self.params.store(&self.state);
    }
}

fn rejected(setting: &'static str, err: ConfigError) -> EngineError {
    warn!(setting, error = %err, "rejected setting");
    err.into()
}
