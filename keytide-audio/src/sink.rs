use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    StreamConfig, SupportedStreamConfigRange,
};
use keytide::{sink::AudioSink, AudioUpdate, Error};
use tracing::{debug, instrument, warn};

use crate::{
    error::AudioError,
    synth::{PreparedSample, Synth},
    DEFAULT_SAMPLE_RATE,
};

/// Plays the [Synth] on an output device.
///
/// The output stream only exists between [AudioSink::start] and [AudioSink::stop].
/// Parameters, the visibility gain and the source can be changed at any time.
///
/// It's recommended to use [NoiseSink::default_device] to create a new instance of this struct.
pub struct NoiseSink {
    device: cpal::Device,
    config: StreamConfig,
    synth: Arc<Mutex<Synth>>,

    stream: Option<cpal::Stream>,
}

impl NoiseSink {
    /// This exposes the API of [cpal] which you can use to use your own [cpal::Device] and
    /// [cpal::SupportedStreamConfigRange] if you want.
    #[instrument(name = "NoiseSink::new", skip_all)]
    pub fn new(device: cpal::Device, stream_config_range: &SupportedStreamConfigRange) -> Self {
        let config = stream_config_range
            .try_with_sample_rate(DEFAULT_SAMPLE_RATE)
            .unwrap_or(stream_config_range.with_max_sample_rate())
            .config();
        debug!("Stream config: {:?}", config);

        Self {
            synth: Arc::new(Mutex::new(Synth::new(config.sample_rate.0))),
            device,
            config,
            stream: None,
        }
    }

    /// Picks the default output device of the default host and its preferred config.
    pub fn default_device() -> Result<Self, AudioError> {
        let Some(device) = cpal::default_host().default_output_device() else {
            return Err(AudioError::NoDefaultDevice);
        };

        let config = default_output_config(&device)?;
        Ok(Self::new(device, &config))
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn synth(&self) -> MutexGuard<'_, Synth> {
        // a panic within the callback leaves the synth usable
        self.synth.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn build_stream(&self) -> Result<cpal::Stream, AudioError> {
        let channels = usize::from(self.config.channels);
        let synth = self.synth.clone();

        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| fill(&synth, data, channels),
            |err| warn!("Audio stream error: {err}"),
            None,
        )?;

        stream.play()?;
        Ok(stream)
    }
}

impl AudioSink for NoiseSink {
    fn start(&mut self) -> Result<(), Error> {
        if self.stream.is_some() {
            return Ok(());
        }

        self.stream = Some(self.build_stream()?);
        debug!("Output stream is playing");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                debug!("Couldn't pause output stream before dropping it: {err}");
            }
        }
    }

    fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    fn set_params(&mut self, update: &AudioUpdate) {
        self.synth().set_params(update);
    }

    fn set_visibility_gain(&mut self, scalar: f32) {
        self.synth().set_visibility_gain(scalar);
    }

    fn reset_source(&mut self) {
        self.synth().reset_source();
    }

    fn load_source(&mut self, bytes: &[u8]) -> Result<(), Error> {
        load(&self.synth, bytes, self.sample_rate())?;
        Ok(())
    }
}

impl Drop for NoiseSink {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Output callback. Writes silence instead of waiting if someone else holds the synth.
fn fill(synth: &Mutex<Synth>, data: &mut [f32], channels: usize) {
    match synth.try_lock() {
        Ok(mut synth) => synth.render(data, channels),
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().render(data, channels),
        Err(TryLockError::WouldBlock) => data.fill(0.),
    }
}

/// Decodes `bytes` without holding the lock. The synth is only locked for the swap.
fn load(synth: &Mutex<Synth>, bytes: &[u8], sample_rate: u32) -> Result<(), AudioError> {
    let prepared = PreparedSample::new(bytes, sample_rate)?;

    synth
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .play(prepared);
    Ok(())
}

#[instrument(skip_all)]
fn default_output_config(
    device: &cpal::Device,
) -> Result<SupportedStreamConfigRange, AudioError> {
    let mut matching_configs: Vec<_> = device.supported_output_configs()?.collect();

    matching_configs.sort_by(|a, b| a.cmp_default_heuristics(b));
    matching_configs
        .into_iter()
        .next()
        .ok_or(AudioError::NoAvailableOutputConfigs)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use keytide::AudioParams;

    use super::*;
    use crate::source::tests::wav;

    const RATE: u32 = 8000;

    fn shared() -> Mutex<Synth> {
        let mut synth = Synth::with_seed(RATE, 7);
        synth.set_params(&AudioUpdate::immediate(AudioParams::BASELINE));
        Mutex::new(synth)
    }

    #[test]
    fn busy_synth_gives_silence() {
        let synth = shared();
        let mut data = vec![1.; 64];

        let guard = synth.lock().unwrap();
        fill(&synth, &mut data, 2);
        assert!(data.iter().all(|&s| s == 0.));
        drop(guard);

        fill(&synth, &mut data, 2);
        assert!(data.iter().any(|&s| s != 0.));
    }

    #[test]
    fn broken_file_is_rejected_while_synth_is_busy() {
        let synth = shared();
        let _guard = synth.lock().unwrap();

        let result = thread::scope(|scope| {
            scope
                .spawn(|| load(&synth, b"RIFF", RATE))
                .join()
                .unwrap()
        });

        assert!(matches!(result, Err(AudioError::Decode(_))));
    }

    #[test]
    fn loaded_file_replaces_noise() {
        let synth = shared();

        load(&synth, &wav(&[0.; 800], 1, RATE), RATE).unwrap();
        assert!(!synth.lock().unwrap().plays_noise());
    }
}
