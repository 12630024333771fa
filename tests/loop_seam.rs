use rand::SeedableRng;
use rand::rngs::StdRng;
use tinnitus_tamer::engine::{LOOP_RMS, normalize, render_extended};
use tinnitus_tamer::{FadeCurve, LoopBuffer, LoopLayout, SineOscillator, SoundSource};

fn max_step(samples: &[f64]) -> f64 {
    samples
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .fold(0.0, f64::max)
}

/// Renders `source` both as a loop and as the plain stretch the loop was
/// spliced from, using the same seed.
fn loop_and_stretch<const RATE: u32>(source: SoundSource, curve: FadeCurve) -> (LoopBuffer, Vec<f64>) {
    let layout = LoopLayout::from_seconds(1.0, 0.1, RATE).unwrap();
    let looped = source
        .render_with_rng::<RATE, _>(layout, curve, &mut StdRng::seed_from_u64(11))
        .unwrap();

    let mut signal = source.signal::<RATE, _>(&mut StdRng::seed_from_u64(11));
    let mut stretch = render_extended(&mut signal, layout.rendered_length()).unwrap();
    normalize(&mut stretch, LOOP_RMS);
    (looped, stretch)
}

fn check_seam<const RATE: u32>() {
    for source in [SoundSource::Brown, SoundSource::Pink, SoundSource::Ocean] {
        for curve in [FadeCurve::EqualPower, FadeCurve::Linear] {
            let (looped, stretch) = loop_and_stretch::<RATE>(source, curve);
            let d = looped.len();

            // Wrapping from the last sample to the first is the same step the
            // rendered signal took from sample D-1 to sample D.
            assert_eq!(looped.sample(d - 1), stretch[d - 1]);
            assert_eq!(looped.sample(0), stretch[d]);

            let seam = (looped.sample(0) - looped.sample(d - 1)).abs();
            assert!(
                seam <= max_step(&stretch),
                "{} at {} Hz: seam {} larger than any rendered step",
                source,
                RATE,
                seam
            );
        }
    }
}

#[test]
fn test_seam_continuity_8k() {
    check_seam::<8000>();
}

#[test]
fn test_seam_continuity_22k() {
    check_seam::<22050>();
}

#[test]
fn test_seam_continuity_44k() {
    check_seam::<44100>();
}

#[test]
fn test_seam_continuity_48k() {
    check_seam::<48000>();
}

#[test]
fn test_seam_continuity_96k() {
    check_seam::<96000>();
}

#[test]
fn test_played_twice_has_no_jump() {
    // A slow tone makes any discontinuity obvious against its tiny step.
    const RATE: u32 = 44100;
    let layout = LoopLayout::from_seconds(1.0, 0.25, RATE).unwrap();
    let mut tone = SineOscillator::<RATE>::new(2.3);
    let looped = LoopBuffer::render(&mut tone, layout, FadeCurve::Linear).unwrap();

    let twice: Vec<f64> = looped
        .as_slice()
        .iter()
        .chain(looped.as_slice())
        .copied()
        .collect();
    let epsilon = 2.0 * std::f64::consts::PI * 2.3 / RATE as f64;
    let seam = (twice[looped.len()] - twice[looped.len() - 1]).abs();
    assert!(seam <= epsilon + 1e-12, "seam = {}", seam);
}
