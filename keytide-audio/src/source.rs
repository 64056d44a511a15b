//! What the synth plays before filtering: noise or a user sample.
use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use tracing::debug;

use crate::{dsp::BrownNoise, error::AudioError};

/// A decoded mono sample which gets played in a loop.
#[derive(Debug, Clone)]
pub struct LoopedSample {
    samples: Box<[f32]>,
    sample_rate: u32,

    // playback position in samples of the file and the advance per output sample
    position: f64,
    step: f64,
}

impl LoopedSample {
    /// Decodes a WAV file. All channels are mixed down to one.
    pub fn decode(bytes: &[u8]) -> Result<Self, AudioError> {
        let mut reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        debug!("WAV spec: {:?}", spec);

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|sample| sample as f32 / max_value))
                    .collect::<Result<_, _>>()?
            }
        };

        let channels = usize::from(spec.channels.max(1));
        let samples: Box<[f32]> = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        if samples.is_empty() {
            return Err(AudioError::EmptySample);
        }

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            position: 0.,
            step: 1.,
        })
    }

    /// Lets the sample play at its original speed on an output with `output_rate`.
    pub fn play_at(&mut self, output_rate: u32) {
        self.step = self.sample_rate as f64 / output_rate as f64;
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Linear interpolation between the two neighbouring samples of the file.
    pub fn next_sample(&mut self) -> f32 {
        let len = self.samples.len();
        let index = self.position as usize;
        let frac = (self.position - index as f64) as f32;

        let current = self.samples[index % len];
        let next = self.samples[(index + 1) % len];

        self.position = (self.position + self.step) % len as f64;
        current + (next - current) * frac
    }
}

/// The signal which enters the filter.
#[derive(Debug, Clone)]
pub enum Generator {
    Noise(BrownNoise),
    Sample(LoopedSample),
}

impl Generator {
    pub fn next_sample(&mut self) -> f32 {
        match self {
            Generator::Noise(noise) => noise.next_sample(),
            Generator::Sample(sample) => sample.next_sample(),
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, Generator::Noise(_))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use hound::{WavSpec, WavWriter};

    use super::*;

    /// Encodes `frames` as a 32 bit float WAV file.
    pub fn wav(frames: &[f32], channels: u16, sample_rate: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
        for &sample in frames {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        bytes
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            LoopedSample::decode(b"definitely not a wav file"),
            Err(AudioError::Decode(_))
        ));
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            LoopedSample::decode(&wav(&[], 1, 8000)),
            Err(AudioError::EmptySample)
        ));
    }

    #[test]
    fn stereo_is_mixed_down() {
        let sample = LoopedSample::decode(&wav(&[1., 0., 0.5, 0.5], 2, 8000)).unwrap();

        assert_eq!(sample.samples(), &[0.5, 0.5]);
        assert_eq!(sample.sample_rate(), 8000);
    }

    #[test]
    fn int_samples_are_normalized() {
        let mut bytes = Vec::new();
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
        writer.write_sample(i16::MIN).unwrap();
        writer.write_sample(16384i16).unwrap();
        writer.finalize().unwrap();

        let sample = LoopedSample::decode(&bytes).unwrap();
        assert_eq!(sample.samples(), &[-1., 0.5]);
    }

    #[test]
    fn loops() {
        let mut sample = LoopedSample::decode(&wav(&[0., 1., 2.], 1, 8000)).unwrap();
        sample.play_at(8000);

        let played: Vec<f32> = (0..7).map(|_| sample.next_sample()).collect();
        assert_eq!(played, [0., 1., 2., 0., 1., 2., 0.]);
    }

    #[test]
    fn resamples_to_output_rate() {
        let mut sample = LoopedSample::decode(&wav(&[0., 1., 0., 1.], 1, 8000)).unwrap();
        sample.play_at(16_000);

        let played: Vec<f32> = (0..4).map(|_| sample.next_sample()).collect();
        assert_eq!(played, [0., 0.5, 1., 0.5]);
    }
}
