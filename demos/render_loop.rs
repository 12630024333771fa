//! Renders one source's loop, or a stretch of the full mix, to a WAV file.
//!
//! cargo run --example render_loop --features wav-export -- ocean ocean.wav
//! cargo run --example render_loop --features wav-export -- mix mix.wav
//!
//! Playing the loop file on repeat in any audio player should give no
//! audible seam.

use anyhow::{Context, Result};
use tinnitus_tamer::export::{write_loop, write_wav};
use tinnitus_tamer::{Engine, EngineConfig, FadeCurve, LoopLayout, SoundSource};
use tracing_subscriber::EnvFilter;

const RATE: u32 = 44100;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let what = args.next().unwrap_or_else(|| "pink".to_string());
    let path = args.next().unwrap_or_else(|| format!("{}.wav", what));

    if what == "mix" {
        let mut engine = Engine::<RATE>::new(EngineConfig {
            channels: 2,
            ..EngineConfig::default()
        })?;
        let controller = engine.controller_mut();
        controller.set_gain(SoundSource::Pink, 0.4)?;
        controller.set_gain(SoundSource::Ocean, 0.6)?;
        controller.start();
        let block = engine.pull_block(RATE as usize * 20);
        write_wav(&path, &block).with_context(|| format!("writing {}", path))?;
    } else {
        let source: SoundSource = what.parse()?;
        let layout = LoopLayout::from_seconds(10.0, 1.0, RATE)?;
        let looped = source.render::<RATE>(layout, FadeCurve::EqualPower)?;
        write_loop(&path, &looped, RATE).with_context(|| format!("writing {}", path))?;
    }

    println!("wrote {}", path);
    Ok(())
}
