use crate::config::ConfigError;

/// All errors which can occur while driving keytide.
///
/// None of them is fatal: lifecycle misuse is logged and ignored, sink failures
/// degrade the output (silent or visual-only) instead of stopping cadence tracking.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// `start` was called while already running.
    #[error("Already running")]
    AlreadyRunning,

    /// An operation which needs a running instance was called while idle or stopped.
    #[error("Not running")]
    NotRunning,

    /// The platform refused to start audio playback.
    ///
    /// Playback is retried on the next qualifying user gesture.
    #[error("Audio playback got blocked, waiting for the next user gesture")]
    AutoplayBlocked,

    /// A required host capability (for example an audio device) is missing.
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),

    /// A parameter left its declared safety range and got clamped.
    #[error("Parameter `{name}` is outside of its safety range: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// The given config is invalid.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// A user supplied audio source couldn't be used.
    #[error("Unsupported audio source: {0}")]
    UnsupportedSource(String),
}
