//! Offline export of rendered audio to WAV files.
//!
//! Useful for listening to a loop outside the engine or checking a seam in
//! an audio editor.

use crate::engine::{LoopBuffer, SampleBuffer};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::{Seek, Write};
use std::path::Path;
use tracing::debug;

/// Writes `buffer` to `path` as 16-bit PCM.
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &SampleBuffer) -> hound::Result<()> {
    let path = path.as_ref();
    let writer = WavWriter::create(path, spec(buffer.channels(), buffer.sample_rate()))?;
    write_samples(writer, buffer.samples())?;
    debug!(path = %path.display(), frames = buffer.frames(), "wrote wav");
    Ok(())
}

/// Writes `buffer` to any seekable sink as 16-bit PCM.
pub fn write_wav_to<W: Write + Seek>(sink: W, buffer: &SampleBuffer) -> hound::Result<()> {
    let writer = WavWriter::new(sink, spec(buffer.channels(), buffer.sample_rate()))?;
    write_samples(writer, buffer.samples())
}

/// Writes one pass of a mono loop, e.g. to inspect a seam.
pub fn write_loop<P: AsRef<Path>>(path: P, looped: &LoopBuffer, sample_rate: u32) -> hound::Result<()> {
    let writer = WavWriter::create(path, spec(1, sample_rate))?;
    write_samples(writer, looped.as_slice())
}

fn spec(channels: u16, sample_rate: u32) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn write_samples<W: Write + Seek>(mut writer: WavWriter<W>, samples: &[f64]) -> hound::Result<()> {
    for &sample in samples {
        writer.write_sample(to_i16(sample))?;
    }
    writer.finalize()
}

/// Converts a sample in [-1, 1] to 16-bit PCM, clamping anything outside.
pub fn to_i16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_to_i16() {
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(1.0), i16::MAX);
        assert_eq!(to_i16(-1.0), -i16::MAX);
        assert_eq!(to_i16(3.0), i16::MAX);
        assert_eq!(to_i16(0.5), 16384);
    }

    #[test]
    fn test_wav_round_trip_header() {
        let buffer = SampleBuffer::new(vec![0.0, 0.5, -0.5, 1.0], 2, 44100);
        let mut bytes = Cursor::new(Vec::new());
        write_wav_to(&mut bytes, &buffer).unwrap();

        bytes.set_position(0);
        let reader = hound::WavReader::new(bytes).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 16384, -16384, i16::MAX]);
    }
}
