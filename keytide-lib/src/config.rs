//! Module to configure the behaviour of [Orchestrator].
//!
//! [Orchestrator]: crate::Orchestrator
use crate::{
    cadence::CadenceConfig,
    mapping::{AudioMapping, VisualMapping, VisualPreset},
    AudioParams, VisualParams, MAX_BREATH_HZ, MAX_CUTOFF_HZ, MAX_GAIN, MIN_BREATH_HZ,
    MIN_CUTOFF_HZ,
};

/// All validation errors which can occur while checking a config.
///
/// # Example
/// ```rust
/// use keytide::{config::ConfigError, Config};
///
/// let config = Config {
///     hidden_attenuation: 2.,
///     ..Default::default()
/// };
///
/// assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The range of inter-key intervals is empty, inverted or not finite.
    #[error("The IKI range must be a non-empty range of finite values but you gave: {fastest_ms}..{slowest_ms}")]
    InvalidIkiRange { fastest_ms: f64, slowest_ms: f64 },

    /// The smoothing factor of the moving average isn't within `(0, 1]`.
    #[error("The smoothing factor must be within (0, 1] but you gave: {0}")]
    InvalidSmoothingFactor(f64),

    /// The key history can't hold two timestamps.
    #[error("The key history needs space for at least 2 timestamps but you gave: {0}")]
    HistoryTooSmall(usize),

    /// A duration or rate which must be positive isn't.
    #[error("`{name}` must be positive but you gave: {value}")]
    NotPositive { name: &'static str, value: f64 },

    /// A value is outside of its safety range.
    #[error("`{name}` must be within [{min}, {max}] but you gave: {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Configure the behaviour of [Orchestrator] by setting the appropriate values in this struct.
///
/// # Example
/// ```rust
/// use keytide::{Config, mapping::{VisualMapping, VisualPreset}};
///
/// let config = Config {
///     visual: VisualMapping::from_preset(VisualPreset::Desktop),
///     ..Default::default()
/// };
///
/// assert!(config.validate().is_ok());
/// ```
///
/// [Orchestrator]: crate::Orchestrator
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    pub cadence: CadenceConfig,
    pub audio: AudioMapping,
    pub visual: VisualMapping,

    /// The audio parameters at intensity `0`.
    pub audio_baseline: AudioParams,

    /// The visual parameters at intensity `0`.
    pub visual_baseline: VisualParams,

    /// Volume factor while the application isn't visible. Has to be within `[0, 1]`.
    pub hidden_attenuation: f32,
}

impl Config {
    /// The default config with the given speed preset for the animation.
    pub fn with_preset(preset: VisualPreset) -> Self {
        Self {
            visual: VisualMapping::from_preset(preset),
            ..Self::default()
        }
    }

    /// Checks if the current config is valid or contains any mistakes.
    ///
    /// See [`ConfigError`] to see all possible errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cadence.validate()?;
        self.audio.validate()?;
        self.visual.validate()?;

        let AudioParams {
            gain,
            cutoff_hz,
            breath_hz,
        } = self.audio_baseline;

        for (name, value, min, max) in [
            ("audio_baseline.gain", gain, 0., MAX_GAIN),
            (
                "audio_baseline.cutoff_hz",
                cutoff_hz,
                MIN_CUTOFF_HZ,
                MAX_CUTOFF_HZ,
            ),
            (
                "audio_baseline.breath_hz",
                breath_hz,
                MIN_BREATH_HZ,
                MAX_BREATH_HZ,
            ),
            ("visual_baseline.speed", self.visual_baseline.speed, 0., 1.),
            ("visual_baseline.detail", self.visual_baseline.detail, 0., 1.),
            (
                "visual_baseline.saturation",
                self.visual_baseline.saturation,
                0.,
                1.,
            ),
            ("hidden_attenuation", self.hidden_attenuation, 0., 1.),
        ] {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    name,
                    value: value as f64,
                    min: min as f64,
                    max: max as f64,
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cadence: CadenceConfig::default(),
            audio: AudioMapping::default(),
            visual: VisualMapping::default(),
            audio_baseline: AudioParams::BASELINE,
            visual_baseline: VisualParams::BASELINE,
            hidden_attenuation: 0.5,
        }
    }
}
