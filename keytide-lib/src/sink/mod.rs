//! The interfaces of the two outputs: the audio stage and the visual renderer.
mod dummy;

pub use dummy::{DummyAudioSink, DummyVisualSink, PlayedSource};

use crate::{AudioUpdate, Error, VisualParams};

/// Interface of the audio output stage.
///
/// Implementations must hard-clamp every update into the safety ranges of
/// [crate::AudioParams] themselves, regardless of what they receive.
pub trait AudioSink {
    /// Starts the playback.
    ///
    /// Returns [Error::AutoplayBlocked] if the platform wants a user gesture first and
    /// [Error::SinkUnavailable] if there's no way to play audio at all.
    fn start(&mut self) -> Result<(), Error>;

    /// Stops the playback. Calling it while stopped is fine.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    fn set_params(&mut self, update: &AudioUpdate);

    /// Extra volume factor within `[0, 1]` which is applied after the gain.
    fn set_visibility_gain(&mut self, scalar: f32);

    /// Swaps the generator back to the default noise.
    fn reset_source(&mut self);

    /// Replaces the generator with the given encoded audio file.
    fn load_source(&mut self, bytes: &[u8]) -> Result<(), Error>;
}

/// Interface of the visual renderer.
pub trait VisualSink {
    /// Hands over the newest parameters and the light intensity within `[0, 1]`.
    ///
    /// The renderer is expected to keep only the latest values.
    fn set_params(&mut self, params: &VisualParams, light: f32);

    /// Releases everything the renderer holds. Calling it twice is fine.
    fn dispose(&mut self);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn start(&mut self) -> Result<(), Error> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    fn set_params(&mut self, update: &AudioUpdate) {
        (**self).set_params(update)
    }

    fn set_visibility_gain(&mut self, scalar: f32) {
        (**self).set_visibility_gain(scalar)
    }

    fn reset_source(&mut self) {
        (**self).reset_source()
    }

    fn load_source(&mut self, bytes: &[u8]) -> Result<(), Error> {
        (**self).load_source(bytes)
    }
}

impl<S: VisualSink + ?Sized> VisualSink for Box<S> {
    fn set_params(&mut self, params: &VisualParams, light: f32) {
        (**self).set_params(params, light)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}
