//! The audio-context half of the engine.

use super::buffer::SampleBuffer;
use super::loop_buffer::{LoopBuffer, LoopPlayer};
use super::params::{EngineState, SOURCE_COUNT, SharedParams};
use super::source::SoundSource;
use crate::Signal;
use crate::synthesis::effects::{hard_clip, soft_clip};
use crate::synthesis::filters::NotchFilter;
use ringbuf::HeapCons;
use ringbuf::traits::Consumer;
use std::sync::Arc;

/// Length of the fade applied on start and stop.
pub const TRANSPORT_FADE_SECONDS: f64 = 0.1;

/// A rendered loop on its way from the control context to the mixer.
pub type Installed = (SoundSource, LoopBuffer);

/// Sums the source loops, applies the notch and writes output frames.
///
/// Everything here runs on the audio thread: no locks, no logging, and no
/// allocation in [`Mixer::process`]. Parameter changes and new loops are
/// picked up once per block.
pub struct Mixer<const SAMPLE_RATE: u32> {
    channels: u16,
    params: Arc<SharedParams>,
    incoming: HeapCons<Installed>,
    voices: [Option<LoopPlayer>; SOURCE_COUNT],
    snapshot: EngineState,
    gains: [f64; SOURCE_COUNT],
    master: f64,
    notch: NotchFilter<SAMPLE_RATE>,
    transport: f64,
    transport_step: f64,
    tick: u64,
}

impl<const SAMPLE_RATE: u32> Mixer<SAMPLE_RATE> {
    pub(crate) fn new(
        channels: u16,
        params: Arc<SharedParams>,
        incoming: HeapCons<Installed>,
        initial: EngineState,
    ) -> Self {
        Self {
            channels,
            params,
            incoming,
            voices: Default::default(),
            snapshot: initial,
            gains: initial.mix.gains,
            master: initial.mix.master,
            notch: NotchFilter::new(initial.filter.frequency, initial.filter.q),
            transport: if initial.playing { 1.0 } else { 0.0 },
            transport_step: 1.0 / (TRANSPORT_FADE_SECONDS * SAMPLE_RATE as f64),
            tick: 0,
        }
    }

    /// Fills `out` with interleaved frames.
    ///
    /// Samples past the last whole frame are zeroed.
    pub fn process(&mut self, out: &mut [f64]) {
        let channels = self.channels as usize;
        let frames = out.len() / channels;
        out[frames * channels..].fill(0.0);
        if frames == 0 {
            return;
        }

        self.begin_block();

        let target = self.snapshot;
        let stopped = !target.playing && self.transport == 0.0;
        if stopped {
            self.gains = target.mix.gains;
            self.master = target.mix.master;
            out.fill(0.0);
            return;
        }

        let start_gains = self.gains;
        let start_master = self.master;
        let transport_target = if target.playing { 1.0 } else { 0.0 };

        let mut faded_out_at = None;
        for (n, frame) in out.chunks_exact_mut(channels).enumerate() {
            let t = (n + 1) as f64 / frames as f64;

            let mut sum = 0.0;
            for (i, voice) in self.voices.iter_mut().enumerate() {
                if let Some(voice) = voice {
                    let gain = start_gains[i] + (target.mix.gains[i] - start_gains[i]) * t;
                    sum += voice.next_sample() * gain;
                }
            }
            let master = start_master + (target.mix.master - start_master) * t;

            self.transport = approach(self.transport, transport_target, self.transport_step);
            let sample = hard_clip(self.notch.process(soft_clip(sum * master * self.transport)));

            frame.fill(sample);
            self.tick += 1;

            if self.transport == 0.0 && transport_target == 0.0 {
                faded_out_at = Some(n + 1);
                break;
            }
        }
        if let Some(frame) = faded_out_at {
            // Fully faded out: hold cursors, rest of the block is silence.
            out[frame * channels..].fill(0.0);
        }

        self.gains = target.mix.gains;
        self.master = target.mix.master;
    }

    /// Renders exactly `frames` frames into a new buffer.
    pub fn pull_block(&mut self, frames: usize) -> SampleBuffer {
        let mut samples = vec![0.0; frames * self.channels as usize];
        self.process(&mut samples);
        SampleBuffer::new(samples, self.channels, SAMPLE_RATE)
    }

    fn begin_block(&mut self) {
        while let Some((source, buffer)) = self.incoming.try_pop() {
            self.voices[source.index()] = Some(LoopPlayer::new(buffer, self.tick));
        }
        if let Some(snapshot) = self.params.try_load() {
            self.snapshot = snapshot;
        }
        self.notch
            .set_params(self.snapshot.filter.frequency, self.snapshot.filter.q);
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Frames produced while playing.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether `source` has a loop installed.
    pub fn is_installed(&self, source: SoundSource) -> bool {
        self.voices[source.index()].is_some()
    }

    /// Read position of `source`'s loop, if installed.
    pub fn position(&self, source: SoundSource) -> Option<usize> {
        self.voices[source.index()]
            .as_ref()
            .map(|voice| voice.cursor().position())
    }

    /// The parameters applied to the last block.
    pub fn state(&self) -> EngineState {
        self.snapshot
    }

    /// Current start/stop fade gain in [0, 1].
    pub fn transport_gain(&self) -> f64 {
        self.transport
    }
}

#[inline]
fn approach(current: f64, target: f64, step: f64) -> f64 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}
