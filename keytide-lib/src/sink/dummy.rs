use super::{AudioSink, VisualSink};
use crate::{AudioUpdate, Error, VisualParams};

/// The generator a [DummyAudioSink] would currently play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayedSource {
    #[default]
    Noise,

    /// A loaded file of the given size in bytes.
    File(usize),
}

/// An audio sink which plays... nothing.
/// Mainly used for docs and tests: it only remembers what it got told.
#[derive(Debug, Clone)]
pub struct DummyAudioSink {
    running: bool,
    unavailable: bool,
    blocked_starts: usize,
    start_attempts: usize,

    last_update: Option<AudioUpdate>,
    updates: usize,
    visibility_gain: f32,
    source: PlayedSource,
}

impl DummyAudioSink {
    /// Creates a sink which starts without complaints.
    pub fn new() -> Self {
        Self {
            running: false,
            unavailable: false,
            blocked_starts: 0,
            start_attempts: 0,
            last_update: None,
            updates: 0,
            visibility_gain: 1.,
            source: PlayedSource::Noise,
        }
    }

    /// Creates a sink which rejects the first `amount` starts with [Error::AutoplayBlocked].
    pub fn blocking(amount: usize) -> Self {
        Self {
            blocked_starts: amount,
            ..Self::new()
        }
    }

    /// Creates a sink which can never start, like a host without audio output.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    pub fn last_update(&self) -> Option<&AudioUpdate> {
        self.last_update.as_ref()
    }

    /// How many updates got accepted.
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn start_attempts(&self) -> usize {
        self.start_attempts
    }

    pub fn visibility_gain(&self) -> f32 {
        self.visibility_gain
    }

    pub fn source(&self) -> PlayedSource {
        self.source
    }
}

impl Default for DummyAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for DummyAudioSink {
    fn start(&mut self) -> Result<(), Error> {
        self.start_attempts += 1;

        if self.unavailable {
            return Err(Error::SinkUnavailable("dummy sink without output".into()));
        }

        if self.blocked_starts > 0 {
            self.blocked_starts -= 1;
            return Err(Error::AutoplayBlocked);
        }

        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_params(&mut self, update: &AudioUpdate) {
        self.last_update = Some(update.clamped());
        self.updates += 1;
    }

    fn set_visibility_gain(&mut self, scalar: f32) {
        self.visibility_gain = scalar.clamp(0., 1.);
    }

    fn reset_source(&mut self) {
        self.source = PlayedSource::Noise;
    }

    fn load_source(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.is_empty() {
            return Err(Error::UnsupportedSource("empty file".into()));
        }

        self.source = PlayedSource::File(bytes.len());
        Ok(())
    }
}

/// A renderer which draws... nothing.
/// Mainly used for docs and tests: it only remembers what it got told.
#[derive(Debug, Clone, Default)]
pub struct DummyVisualSink {
    last_params: Option<VisualParams>,
    light: f32,
    updates: usize,
    disposals: usize,
}

impl DummyVisualSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_params(&self) -> Option<&VisualParams> {
        self.last_params.as_ref()
    }

    pub fn light(&self) -> f32 {
        self.light
    }

    pub fn updates(&self) -> usize {
        self.updates
    }

    /// How often [VisualSink::dispose] released something.
    pub fn disposals(&self) -> usize {
        self.disposals
    }
}

impl VisualSink for DummyVisualSink {
    fn set_params(&mut self, params: &VisualParams, light: f32) {
        self.last_params = Some(*params);
        self.light = light;
        self.updates += 1;
    }

    fn dispose(&mut self) {
        if self.last_params.take().is_some() {
            self.disposals += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioParams;

    #[test]
    fn blocking_sink_starts_eventually() {
        let mut sink = DummyAudioSink::blocking(1);

        assert_eq!(sink.start(), Err(Error::AutoplayBlocked));
        assert!(!sink.is_running());
        assert_eq!(sink.start(), Ok(()));
        assert!(sink.is_running());
        assert_eq!(sink.start_attempts(), 2);
    }

    #[test]
    fn clamps_what_it_receives() {
        let mut sink = DummyAudioSink::new();
        sink.set_params(&AudioUpdate::immediate(AudioParams {
            gain: 4.,
            ..AudioParams::BASELINE
        }));

        assert_eq!(sink.last_update().unwrap().gain.target, crate::MAX_GAIN);
    }

    #[test]
    fn sources() {
        let mut sink = DummyAudioSink::new();

        assert!(sink.load_source(&[]).is_err());
        assert_eq!(sink.source(), PlayedSource::Noise);

        sink.load_source(&[1, 2, 3]).unwrap();
        assert_eq!(sink.source(), PlayedSource::File(3));

        sink.reset_source();
        assert_eq!(sink.source(), PlayedSource::Noise);
    }

    #[test]
    fn dispose_twice() {
        let mut sink = DummyVisualSink::new();
        sink.set_params(&VisualParams::BASELINE, 1.);

        sink.dispose();
        sink.dispose();

        assert_eq!(sink.disposals(), 1);
        assert!(sink.last_params().is_none());
    }
}
