//! Interleaved sample blocks handed to the playback side.

/// A block of finished audio: interleaved `f64` samples at a fixed rate and
/// channel count.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    channels: u16,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wraps interleaved samples. `samples.len()` must be a multiple of
    /// `channels`; a trailing partial frame is dropped.
    pub fn new(mut samples: Vec<f64>, channels: u16, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let whole = samples.len() - samples.len() % channels as usize;
        samples.truncate(whole);
        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// A silent buffer of `frames` frames.
    pub fn silence(frames: usize, channels: u16, sample_rate: u32) -> Self {
        Self::new(vec![0.0; frames * channels.max(1) as usize], channels, sample_rate)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Total number of interleaved samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |peak, s| peak.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_and_duration() {
        let buffer = SampleBuffer::silence(44100, 2, 44100);
        assert_eq!(buffer.frames(), 44100);
        assert_eq!(buffer.len(), 88200);
        assert_eq!(buffer.duration(), 1.0);
        assert_eq!(buffer.peak(), 0.0);
    }

    #[test]
    fn test_partial_frame_dropped() {
        let buffer = SampleBuffer::new(vec![0.1, 0.2, 0.3], 2, 48000);
        assert_eq!(buffer.samples(), &[0.1, 0.2]);
        assert_eq!(buffer.frames(), 1);
    }

    #[test]
    fn test_peak() {
        let buffer = SampleBuffer::new(vec![0.1, -0.7, 0.3], 1, 48000);
        assert_eq!(buffer.peak(), 0.7);
    }
}
