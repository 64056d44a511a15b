use keytide::{mapping::Ramp, AudioParams, AudioUpdate};
use tracing::{debug, info};

use crate::{
    analysis::SampleAnalysis,
    dsp::{self, Breath, BrownNoise, LowPass, Smoother},
    error::AudioError,
    source::{Generator, LoopedSample},
};

const FADE_IN_MS: f32 = 1_000.;
const BREATH_RAMP_MS: f32 = 2_000.;
const VISIBILITY_RAMP_MS: f32 = 250.;

/// The signal chain without any device attached:
/// generator → low-pass → gain → breath → visibility gain → limiter.
///
/// # Example
/// ```
/// use keytide::{AudioParams, AudioUpdate};
/// use keytide_audio::Synth;
///
/// let mut synth = Synth::with_seed(44_100, 42);
/// synth.set_params(&AudioUpdate::immediate(AudioParams::BASELINE));
///
/// // two channels
/// let mut buffer = vec![0.; 2 * 512];
/// synth.render(&mut buffer, 2);
///
/// assert!(buffer.iter().all(|sample| sample.abs() <= 0.5));
/// ```
#[derive(Debug, Clone)]
pub struct Synth {
    sample_rate: u32,
    generator: Generator,
    seed: Option<u64>,

    filter: LowPass,
    breath: Breath,

    gain: Smoother,
    cutoff_hz: Smoother,
    breath_hz: Smoother,
    visibility: Smoother,
}

impl Synth {
    /// Starts silent and fades into the baseline parameters.
    pub fn new(sample_rate: u32) -> Self {
        Self::build(sample_rate, None)
    }

    /// Like [Synth::new] but the noise is always the same for the same `seed`.
    pub fn with_seed(sample_rate: u32, seed: u64) -> Self {
        Self::build(sample_rate, Some(seed))
    }

    fn build(sample_rate: u32, seed: Option<u64>) -> Self {
        let baseline = AudioParams::BASELINE;

        let mut gain = Smoother::new(sample_rate, 0.);
        gain.set(baseline.gain, Ramp::Attack(FADE_IN_MS));

        Self {
            sample_rate,
            generator: Generator::Noise(noise(seed)),
            seed,
            filter: LowPass::new(sample_rate, baseline.cutoff_hz),
            breath: Breath::new(sample_rate),
            gain,
            cutoff_hz: Smoother::new(sample_rate, baseline.cutoff_hz),
            breath_hz: Smoother::new(sample_rate, baseline.breath_hz),
            visibility: Smoother::new(sample_rate, 1.),
        }
    }

    /// Applies the update with its ramp hints. Everything is clamped into the safety ranges first.
    pub fn set_params(&mut self, update: &AudioUpdate) {
        let update = update.clamped();

        self.gain.set(update.gain.target, update.gain.ramp);
        self.cutoff_hz
            .set(update.cutoff_hz.target, update.cutoff_hz.ramp);
        self.breath_hz
            .set(update.breath_hz, Ramp::Release(BREATH_RAMP_MS));
    }

    /// The scalar is clamped into `[0, 1]`.
    pub fn set_visibility_gain(&mut self, scalar: f32) {
        let scalar = if scalar.is_nan() { 1. } else { scalar.clamp(0., 1.) };
        self.visibility.set(scalar, Ramp::Release(VISIBILITY_RAMP_MS));
    }

    /// Plays the decoded WAV file instead of the current generator.
    ///
    /// The current generator keeps playing if decoding fails.
    pub fn load_source(&mut self, bytes: &[u8]) -> Result<SampleAnalysis, AudioError> {
        let prepared = PreparedSample::new(bytes, self.sample_rate)?;
        let analysis = *prepared.analysis();

        self.play(prepared);
        Ok(analysis)
    }

    /// Swaps the generator for an already decoded sample.
    pub fn play(&mut self, prepared: PreparedSample) {
        self.generator = Generator::Sample(prepared.sample);
        self.filter.reset();
    }

    /// Swaps back to the noise.
    pub fn reset_source(&mut self) {
        if self.generator.is_noise() {
            return;
        }

        debug!("Back to noise");
        self.generator = Generator::Noise(noise(self.seed));
        self.filter.reset();
    }

    pub fn plays_noise(&self) -> bool {
        self.generator.is_noise()
    }

    /// The values the parameters are currently moving to.
    pub fn targets(&self) -> AudioParams {
        AudioParams {
            gain: self.gain.target(),
            cutoff_hz: self.cutoff_hz.target(),
            breath_hz: self.breath_hz.target(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn next_sample(&mut self) -> f32 {
        self.filter.set_cutoff(self.cutoff_hz.next_value());

        let sample = self.filter.process(self.generator.next_sample())
            * self.gain.next_value()
            * self.breath.next_factor(self.breath_hz.next_value())
            * self.visibility.next_value();

        dsp::limit(sample)
    }

    /// Fills the interleaved `buffer` with the same signal on each of the `channels`.
    pub fn render(&mut self, buffer: &mut [f32], channels: usize) {
        for frame in buffer.chunks_mut(channels.max(1)) {
            frame.fill(self.next_sample());
        }
    }
}

/// A decoded and analysed WAV file which is ready for [Synth::play].
///
/// Decoding and analysing happen here so that a shared synth only has to be
/// locked for the swap.
#[derive(Debug, Clone)]
pub struct PreparedSample {
    sample: LoopedSample,
    analysis: SampleAnalysis,
}

impl PreparedSample {
    /// Decodes `bytes` for an output running at `output_rate`.
    pub fn new(bytes: &[u8], output_rate: u32) -> Result<Self, AudioError> {
        let mut sample = LoopedSample::decode(bytes)?;
        sample.play_at(output_rate);

        let analysis = SampleAnalysis::new(sample.samples(), sample.sample_rate());
        match analysis.tempo_bpm {
            Some(bpm) => info!(
                "Prepared sample: {} samples, rms {:.3}, ~{bpm:.0} BPM",
                sample.samples().len(),
                analysis.rms
            ),
            None => info!(
                "Prepared sample: {} samples, rms {:.3}, no clear tempo",
                sample.samples().len(),
                analysis.rms
            ),
        }

        Ok(Self { sample, analysis })
    }

    pub fn analysis(&self) -> &SampleAnalysis {
        &self.analysis
    }
}

fn noise(seed: Option<u64>) -> BrownNoise {
    match seed {
        Some(seed) => BrownNoise::with_seed(seed),
        None => BrownNoise::new(),
    }
}
