use rand::SeedableRng;
use rand::rngs::StdRng;
use tinnitus_tamer::{NotchFilter, Signal, SineOscillator, WhiteNoise};

const RATE: u32 = 44100;

fn rms_through_notch(frequency: f64) -> f64 {
    let mut notch = NotchFilter::<RATE>::new(1000.0, 10.0);
    let mut tone = SineOscillator::<RATE>::new(frequency);
    let settle = RATE as usize;
    let measure = RATE as usize;

    for _ in 0..settle {
        notch.process(tone.next_sample());
    }
    let energy: f64 = (0..measure)
        .map(|_| notch.process(tone.next_sample()).powi(2))
        .sum();
    (energy / measure as f64).sqrt()
}

#[test]
fn test_notch_rejects_centre_by_twenty_db() {
    let centre = rms_through_notch(1000.0);
    let passband = rms_through_notch(200.0);
    let rejection_db = 20.0 * (passband / centre).log10();
    assert!(rejection_db >= 20.0, "rejection {} dB", rejection_db);
}

#[test]
fn test_bypass_is_identity() {
    let mut notch = NotchFilter::<RATE>::new(0.0, 10.0);
    let mut noise = WhiteNoise::<RATE, _>::with_rng(StdRng::seed_from_u64(9));
    for _ in 0..RATE {
        let x = noise.next_sample();
        assert_eq!(notch.process(x), x);
    }
    for x in [0.0, -0.0, 1.0, -1.0, 1e-300, f64::MAX] {
        assert_eq!(notch.process(x), x);
    }
}

#[test]
fn test_switching_to_bypass_mid_stream_is_identity() {
    let mut notch = NotchFilter::<RATE>::new(1000.0, 10.0);
    let mut noise = WhiteNoise::<RATE, _>::with_rng(StdRng::seed_from_u64(10));
    for _ in 0..1000 {
        notch.process(noise.next_sample());
    }
    notch.set_params(0.0, 10.0);
    for _ in 0..1000 {
        let x = noise.next_sample();
        assert_eq!(notch.process(x), x);
    }
}
