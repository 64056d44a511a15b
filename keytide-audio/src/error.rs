use keytide::Error;

/// Errors which can occur while setting up the audio output or loading a file.
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    /// No default audio device could be found to play on.
    #[error("Couldn't retrieve default output device")]
    NoDefaultDevice,

    /// No configuration could be found for the output device.
    #[error("Couldn't retrieve any config of the output stream of the default device")]
    NoAvailableOutputConfigs,

    #[error(transparent)]
    OutputConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error(transparent)]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error(transparent)]
    PlayStream(#[from] cpal::PlayStreamError),

    /// The given bytes aren't a readable WAV file.
    #[error("Couldn't decode audio file: {0}")]
    Decode(#[from] hound::Error),

    /// The file decoded fine but doesn't contain a single sample.
    #[error("The audio file is empty")]
    EmptySample,
}

impl From<AudioError> for Error {
    fn from(err: AudioError) -> Self {
        match &err {
            // the backend refused to play for now, for example until the user interacted with it
            AudioError::PlayStream(cpal::PlayStreamError::BackendSpecific { .. }) => {
                Error::AutoplayBlocked
            }
            AudioError::Decode(_) | AudioError::EmptySample => {
                Error::UnsupportedSource(err.to_string())
            }
            _ => Error::SinkUnavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_are_unsupported_sources() {
        let err: Error = AudioError::EmptySample.into();
        assert!(matches!(err, Error::UnsupportedSource(_)));

        let err: Error = AudioError::Decode(hound::Error::FormatError("no riff")).into();
        assert!(matches!(err, Error::UnsupportedSource(_)));
    }

    #[test]
    fn missing_device_is_unavailable() {
        let err: Error = AudioError::NoDefaultDevice.into();
        assert!(matches!(err, Error::SinkUnavailable(_)));
    }

    #[test]
    fn refused_playback_is_blocked() {
        let err: Error = AudioError::PlayStream(cpal::PlayStreamError::BackendSpecific {
            err: cpal::BackendSpecificError {
                description: "suspended".into(),
            },
        })
        .into();

        assert_eq!(err, Error::AutoplayBlocked);
    }
}
