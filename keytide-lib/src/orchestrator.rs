use std::mem;

use tracing::{debug, info, instrument, warn};

use crate::{
    cadence::{CadenceSnapshot, CadenceTracker},
    mapping::{AudioMapper, VisualMapper},
    sink::{AudioSink, VisualSink},
    source::KeySource,
    AudioUpdate, Blender, Config, Error, Intensity, Millis, Palette, VisualParams,
};

/// The lifecycle of an [Orchestrator].
///
/// `Stopped` may be left again by calling [Orchestrator::start].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Whether the application is currently the visible or focused surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// User input which is allowed to unlock blocked audio playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserGesture {
    Key,
    Pointer,
    Touch,
}

/// Connects the cadence tracker, the mappers and the blender with the two sinks.
///
/// # Example
/// ```
/// use keytide::{
///     sink::{DummyAudioSink, DummyVisualSink},
///     Config, LifecycleState, Orchestrator,
/// };
///
/// let mut orchestrator =
///     Orchestrator::new(Config::default(), DummyAudioSink::new(), DummyVisualSink::new()).unwrap();
/// orchestrator.start().unwrap();
///
/// for ts in [0., 80., 160.] {
///     orchestrator.on_key_event(ts);
/// }
///
/// let update = orchestrator.audio_sink().last_update().unwrap();
/// assert_eq!(update.gain.target, 0.18);
///
/// orchestrator.stop();
/// assert_eq!(orchestrator.state(), LifecycleState::Stopped);
/// ```
#[derive(Debug)]
pub struct Orchestrator<A: AudioSink, V: VisualSink> {
    config: Config,

    tracker: CadenceTracker,
    audio_mapper: AudioMapper,
    visual_mapper: VisualMapper,
    blender: Blender,

    intensity: Intensity,
    palette: Palette,
    visibility: Visibility,
    state: LifecycleState,
    autoplay_retry: bool,

    mapped_audio: Option<AudioUpdate>,
    mapped_visual: Option<VisualParams>,
    forwarded_audio: Option<AudioUpdate>,
    keys: Vec<Millis>,

    audio: A,
    visual: V,
}

impl<A: AudioSink, V: VisualSink> Orchestrator<A, V> {
    pub fn new(config: Config, audio: A, visual: V) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            tracker: CadenceTracker::new(config.cadence.clone())?,
            audio_mapper: AudioMapper::new(config.audio.clone()),
            visual_mapper: VisualMapper::new(config.visual.clone()),
            blender: Blender::new(config.audio_baseline, config.visual_baseline),
            intensity: Intensity::default(),
            palette: Palette::default(),
            visibility: Visibility::default(),
            state: LifecycleState::Idle,
            autoplay_retry: false,
            mapped_audio: None,
            mapped_visual: None,
            forwarded_audio: None,
            keys: Vec::new(),
            audio,
            visual,
            config,
        })
    }

    /// Starts tracking and tries to start the audio playback.
    ///
    /// Audio which can't start doesn't fail this call: blocked playback is
    /// retried once on the next [UserGesture], missing audio output leaves
    /// the orchestrator running without sound.
    #[instrument(level = "debug", skip(self))]
    pub fn start(&mut self) -> Result<(), Error> {
        if self.state == LifecycleState::Running {
            debug!("Orchestrator is already running");
            return Err(Error::AlreadyRunning);
        }

        self.tracker.start()?;
        self.state = LifecycleState::Running;
        self.forward_visual();
        self.start_audio(true);

        Ok(())
    }

    /// Records a key press at `timestamp` which also counts as a [UserGesture::Key].
    pub fn on_key_event(&mut self, timestamp: Millis) {
        if self.state != LifecycleState::Running {
            return;
        }

        self.on_user_gesture(UserGesture::Key);

        if let Some(snapshot) = self.tracker.on_key_event(timestamp) {
            self.publish(snapshot, timestamp);
        }
    }

    /// Retries a blocked audio start. Happens at most once per [Orchestrator::start].
    pub fn on_user_gesture(&mut self, gesture: UserGesture) {
        if self.state != LifecycleState::Running || !self.autoplay_retry {
            return;
        }

        debug!("Retrying audio start after {gesture:?}");
        self.autoplay_retry = false;
        self.start_audio(false);
    }

    /// Fetches the pending key presses of `source` and processes them.
    pub fn pump(&mut self, source: &mut impl KeySource) {
        let mut keys = mem::take(&mut self.keys);
        source.fetch_keys(&mut keys);

        for &timestamp in &keys {
            self.on_key_event(timestamp);
        }

        self.keys = keys;
    }

    /// Sets how strongly the typing rhythm shapes the output.
    ///
    /// The sinks receive the new blend right away without waiting for the next key.
    /// The audio ramps towards it with attack or release. `value` gets clamped into `[0, 1]`.
    pub fn intensity_changed(&mut self, value: f32) {
        self.intensity = Intensity::new(value);
        debug!("Intensity: {}", self.intensity.get());

        if self.state == LifecycleState::Running {
            self.reblend_audio();
            self.forward_visual();
        }
    }

    pub fn palette_changed(&mut self, palette: Palette) {
        self.palette = palette;

        if let Some(mapped) = self.mapped_visual.as_mut() {
            mapped.palette = palette;
        }

        if self.state == LifecycleState::Running {
            self.forward_visual();
        }
    }

    /// Attenuates the audio while hidden. The mapped parameters stay untouched.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        if self.visibility == visibility {
            return;
        }

        self.visibility = visibility;
        debug!("Visibility: {visibility:?}");

        if self.state == LifecycleState::Running {
            self.apply_visibility();
        }
    }

    /// Swaps the audio generator back to the default noise.
    pub fn reset_to_default_source(&mut self) -> Result<(), Error> {
        if self.state != LifecycleState::Running {
            debug!("Ignoring source reset: not running");
            return Err(Error::NotRunning);
        }

        self.audio.reset_source();
        Ok(())
    }

    /// Hands an encoded audio file to the audio sink which plays it instead of the noise.
    ///
    /// The current generator is kept if the sink can't use the file.
    pub fn user_file_selected(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.audio.load_source(bytes).inspect_err(|err| {
            warn!("Keeping the current audio source: {err}");
        })
    }

    /// Stops tracking, stops the audio and releases the renderer.
    ///
    /// Calling it more than once is fine.
    #[instrument(level = "debug", skip(self))]
    pub fn stop(&mut self) {
        if self.state != LifecycleState::Running {
            return;
        }

        self.tracker.stop();
        self.audio.stop();
        self.visual.dispose();

        self.audio_mapper.reset();
        self.visual_mapper.reset();
        self.mapped_audio = None;
        self.mapped_visual = None;
        self.forwarded_audio = None;
        self.autoplay_retry = false;

        self.state = LifecycleState::Stopped;
        info!("Stopped");
    }

    /// The current typing metrics.
    pub fn snapshot(&self) -> CadenceSnapshot {
        self.tracker.snapshot()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether a blocked audio start is waiting for the next user gesture.
    pub fn awaits_gesture(&self) -> bool {
        self.autoplay_retry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn audio_sink(&self) -> &A {
        &self.audio
    }

    pub fn audio_sink_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn visual_sink(&self) -> &V {
        &self.visual
    }

    pub fn visual_sink_mut(&mut self) -> &mut V {
        &mut self.visual
    }

    fn start_audio(&mut self, allow_retry: bool) {
        match self.audio.start() {
            Ok(()) => {
                debug!("Audio started");
                self.autoplay_retry = false;
                self.apply_visibility();
                self.forward_audio();
            }
            Err(Error::AutoplayBlocked) if allow_retry => {
                info!("Audio is blocked, waiting for the next user gesture");
                self.autoplay_retry = true;
            }
            Err(err) => {
                warn!("Continuing without audio: {err}");
                self.autoplay_retry = false;
            }
        }
    }

    fn publish(&mut self, snapshot: CadenceSnapshot, now: Millis) {
        let iki_ms = snapshot.iki_ms();

        if let Some(mapped) = self.audio_mapper.map(iki_ms) {
            self.mapped_audio = Some(mapped);
            self.forward_audio();
        }

        if let Some(mapped) = self.visual_mapper.map(iki_ms, now, self.palette) {
            self.mapped_visual = Some(mapped);
            self.forward_visual();
        }
    }

    fn forward_audio(&mut self) {
        let Some(mapped) = self.mapped_audio.as_ref() else {
            return;
        };

        if !self.audio.is_running() {
            return;
        }

        let blended = self.blender.audio(mapped, self.intensity).clamped();
        self.send_audio(blended);
    }

    /// Forwards the last mapped update under the current intensity. The ramps are picked
    /// against the update the sink got last.
    fn reblend_audio(&mut self) {
        let Some(mapped) = self.mapped_audio.as_ref() else {
            return;
        };

        if !self.audio.is_running() {
            return;
        }

        let mut blended = self.blender.audio(mapped, self.intensity).clamped();
        if let Some(previous) = self.forwarded_audio {
            let times = self.config.audio.ramp;
            blended.gain.ramp = times.between(previous.gain.target, blended.gain.target);
            blended.cutoff_hz.ramp =
                times.between(previous.cutoff_hz.target, blended.cutoff_hz.target);
        }

        self.send_audio(blended);
    }

    fn send_audio(&mut self, update: AudioUpdate) {
        self.audio.set_params(&update);
        self.forwarded_audio = Some(update);
    }

    /// Without any mapped parameters the sink gets the baseline in the current palette.
    fn forward_visual(&mut self) {
        let blended = match self.mapped_visual.as_ref() {
            Some(mapped) => self.blender.visual(mapped, self.intensity).clamped(),
            None => VisualParams {
                palette: self.palette,
                ..*self.blender.visual_baseline()
            },
        };

        self.visual.set_params(&blended, self.intensity.get());
    }

    fn apply_visibility(&mut self) {
        let scalar = match self.visibility {
            Visibility::Visible => 1.,
            Visibility::Hidden => self.config.hidden_attenuation,
        };

        self.audio.set_visibility_gain(scalar);
    }
}

impl<A: AudioSink, V: VisualSink> Drop for Orchestrator<A, V> {
    fn drop(&mut self) {
        self.stop();
    }
}
