//! Interactive masking-sound player.
//!
//! 1-6     select white, pink, brown, wind, ocean, waterfall
//! UP/DOWN raise or lower the selected source's gain
//! +/-     master gain
//! LEFT/RIGHT move the notch, [ ] change its Q, N toggles it
//! SPACE   start/stop
//! Q/ESC   quit
//!
//! Set RUST_LOG=debug to see loop rendering times on stderr.

use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::{Write, stdout};
use std::panic;
use std::time::Duration;
use tinnitus_tamer::{Controller, Engine, EngineConfig, Mixer, SoundSource};
use tracing_subscriber::EnvFilter;

const GAIN_STEP: f64 = 0.05;
const NOTCH_STEP: f64 = 1.0595; // one semitone
/// Frames mixed per pass inside the audio callback.
const CALLBACK_CHUNK: usize = 512;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No output device available"))?;
    let config = device.default_output_config()?;

    match config.sample_rate().0 {
        22050 => run::<22050>(&device, config),
        44100 => run::<44100>(&device, config),
        48000 => run::<48000>(&device, config),
        88200 => run::<88200>(&device, config),
        96000 => run::<96000>(&device, config),
        other => Err(anyhow!("Unsupported device sample rate: {} Hz", other)),
    }
}

fn run<const RATE: u32>(device: &cpal::Device, config: cpal::SupportedStreamConfig) -> Result<()> {
    println!("Rendering loops at {} Hz...", RATE);
    let engine = Engine::<RATE>::new(EngineConfig::default())?;
    let (mut controller, mixer) = engine.split();

    let _stream = match config.sample_format() {
        SampleFormat::F32 => create_audio_stream::<f32, RATE>(device, &config.into(), mixer)?,
        SampleFormat::I16 => create_audio_stream::<i16, RATE>(device, &config.into(), mixer)?,
        SampleFormat::U16 => create_audio_stream::<u16, RATE>(device, &config.into(), mixer)?,
        sample_format => {
            return Err(anyhow!("Unsupported sample format: {}", sample_format));
        }
    };

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(crossterm::cursor::Hide)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        original_hook(panic_info);
    }));

    let result = event_loop(&mut controller);
    cleanup_terminal();
    result
}

fn event_loop<const RATE: u32>(controller: &mut Controller<RATE>) -> Result<()> {
    let mut selected = SoundSource::White;
    let mut last_notch = controller.state().filter.frequency;
    let mut status = String::new();
    draw_ui(controller, selected, &status)?;

    loop {
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }

        let state = controller.state();
        let gain = state.mix.gain(selected);
        let outcome = match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
            KeyCode::Char(c @ '1'..='6') => {
                selected = SoundSource::ALL[c as usize - '1' as usize];
                Ok(())
            }
            KeyCode::Up => {
                if !controller.is_rendered(selected) {
                    draw_ui(controller, selected, &format!("rendering {}...", selected))?;
                }
                controller.set_gain(selected, (gain + GAIN_STEP).min(1.0))
            }
            KeyCode::Down => controller.set_gain(selected, (gain - GAIN_STEP).max(0.0)),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                controller.set_master_gain((state.mix.master + GAIN_STEP).min(1.0))
            }
            KeyCode::Char('-') => controller.set_master_gain((state.mix.master - GAIN_STEP).max(0.0)),
            KeyCode::Right if !state.filter.is_bypassed() => {
                controller.set_notch_frequency((state.filter.frequency * NOTCH_STEP).min(16000.0))
            }
            KeyCode::Left if !state.filter.is_bypassed() => {
                controller.set_notch_frequency((state.filter.frequency / NOTCH_STEP).max(50.0))
            }
            KeyCode::Char(']') => controller.set_notch_q(state.filter.q * 1.25),
            KeyCode::Char('[') => controller.set_notch_q(state.filter.q / 1.25),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                if state.filter.is_bypassed() {
                    controller.set_notch_frequency(last_notch)
                } else {
                    last_notch = state.filter.frequency;
                    controller.set_notch_frequency(0.0)
                }
            }
            KeyCode::Char(' ') => {
                if state.playing {
                    controller.stop();
                } else {
                    controller.start();
                }
                Ok(())
            }
            _ => Ok(()),
        };

        status = match outcome {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        };
        draw_ui(controller, selected, &status)?;
    }

    Ok(())
}

/// Moves the mixer into the audio callback. The mono mix goes to every
/// device channel.
fn create_audio_stream<T, const RATE: u32>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut mixer: Mixer<RATE>,
) -> Result<cpal::Stream>
where
    T: Sample + FromSample<f64> + cpal::SizedSample,
{
    let channels = config.channels as usize;
    let mut scratch = [0.0; CALLBACK_CHUNK];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            // Fixed-size chunks keep the callback allocation-free for any
            // device block size.
            for chunk in data.chunks_mut(CALLBACK_CHUNK * channels) {
                let frames = chunk.len() / channels;
                let mono = &mut scratch[..frames];
                mixer.process(mono);
                for (frame, &sample) in chunk.chunks_mut(channels).zip(mono.iter()) {
                    let value: T = T::from_sample(sample);
                    for s in frame.iter_mut() {
                        *s = value;
                    }
                }
            }
        },
        |err| eprintln!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

fn draw_ui<const RATE: u32>(
    controller: &Controller<RATE>,
    selected: SoundSource,
    status: &str,
) -> Result<()> {
    let state = controller.state();
    let mut stdout = stdout();
    stdout.execute(crossterm::terminal::Clear(
        crossterm::terminal::ClearType::All,
    ))?;
    stdout.execute(crossterm::cursor::MoveTo(0, 0))?;

    write!(
        stdout,
        "{} at {} Hz | SPACE=start/stop Q=quit\r\n\r\n",
        if state.playing { "Playing" } else { "Stopped" },
        RATE
    )?;
    for (i, source) in SoundSource::ALL.into_iter().enumerate() {
        let marker = if source == selected { '>' } else { ' ' };
        let gain = state.mix.gain(source);
        let bar = "#".repeat((gain * 20.0).round() as usize);
        write!(
            stdout,
            "{} {} {:<10} {:>4.2} {:<20}\r\n",
            marker,
            i + 1,
            source,
            gain,
            bar
        )?;
    }
    write!(stdout, "\r\n  master     {:>4.2}\r\n", state.mix.master)?;
    if state.filter.is_bypassed() {
        write!(stdout, "  notch      off\r\n")?;
    } else {
        write!(
            stdout,
            "  notch      {:.0} Hz, Q {:.1}\r\n",
            state.filter.frequency, state.filter.q
        )?;
    }
    write!(stdout, "\r\n{}", status)?;

    stdout.flush()?;
    Ok(())
}

fn cleanup_terminal() {
    let _ = stdout().execute(crossterm::cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = disable_raw_mode();
}
