//! The parameter bags which are handed to the sinks.
use tracing::warn;

use crate::{mapping::Ramped, Error};

/// The loudest gain which is ever handed to an audio sink.
pub const MAX_GAIN: f32 = 0.3;

/// The lowest cutoff frequency of the tone-shaping filter.
pub const MIN_CUTOFF_HZ: f32 = 20.;

/// The highest cutoff frequency of the tone-shaping filter.
pub const MAX_CUTOFF_HZ: f32 = 20_000.;

/// The slowest breathing rate of the noise.
pub const MIN_BREATH_HZ: f32 = 0.05;

/// The fastest breathing rate of the noise.
pub const MAX_BREATH_HZ: f32 = 0.2;

/// The colour family of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Palette {
    #[default]
    Day,
    Night,
}

/// Parameters of the audio output stage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioParams {
    /// Output gain within `[0, 0.3]`.
    pub gain: f32,

    /// Cutoff of the low-pass filter within `[20, 20_000]` Hz.
    pub cutoff_hz: f32,

    /// Rate of the slow amplitude swell within `[0.05, 0.2]` Hz.
    pub breath_hz: f32,
}

impl AudioParams {
    /// What the noise sounds like when typing has no influence.
    pub const BASELINE: Self = Self {
        gain: 0.23,
        cutoff_hz: 1500.,
        breath_hz: 0.095,
    };

    /// Returns a copy where every field is forced into its safety range.
    ///
    /// Each field which had to be touched gets logged as [Error::InvalidParameter].
    pub fn clamped(self) -> Self {
        Self {
            gain: limit("gain", self.gain, 0., MAX_GAIN),
            cutoff_hz: limit("cutoff_hz", self.cutoff_hz, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ),
            breath_hz: limit("breath_hz", self.breath_hz, MIN_BREATH_HZ, MAX_BREATH_HZ),
        }
    }

    /// Returns `true` if every field is within its safety range.
    pub fn is_safe(&self) -> bool {
        (0.0..=MAX_GAIN).contains(&self.gain)
            && (MIN_CUTOFF_HZ..=MAX_CUTOFF_HZ).contains(&self.cutoff_hz)
            && (MIN_BREATH_HZ..=MAX_BREATH_HZ).contains(&self.breath_hz)
    }
}

impl Default for AudioParams {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Parameters of the animation.
///
/// Every numeric field is within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualParams {
    pub speed: f32,
    pub detail: f32,
    pub saturation: f32,
    pub palette: Palette,
}

impl VisualParams {
    /// What the animation looks like when typing has no influence.
    pub const BASELINE: Self = Self {
        speed: 0.095,
        detail: 0.8,
        saturation: 0.7,
        palette: Palette::Day,
    };

    /// Returns a copy where every numeric field is forced into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            speed: limit("speed", self.speed, 0., 1.),
            detail: limit("detail", self.detail, 0., 1.),
            saturation: limit("saturation", self.saturation, 0., 1.),
            palette: self.palette,
        }
    }
}

impl Default for VisualParams {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// The update which is given to [crate::sink::AudioSink::set_params].
///
/// `gain` and `cutoff_hz` carry a ramp hint, `breath_hz` is smoothed by the sink itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioUpdate {
    pub gain: Ramped,
    pub cutoff_hz: Ramped,
    pub breath_hz: f32,
}

impl AudioUpdate {
    /// An update which jumps to `params` without any ramp.
    pub fn immediate(params: AudioParams) -> Self {
        Self {
            gain: Ramped::immediate(params.gain),
            cutoff_hz: Ramped::immediate(params.cutoff_hz),
            breath_hz: params.breath_hz,
        }
    }

    /// The target values of this update.
    pub fn params(&self) -> AudioParams {
        AudioParams {
            gain: self.gain.target,
            cutoff_hz: self.cutoff_hz.target,
            breath_hz: self.breath_hz,
        }
    }

    /// Returns a copy whose targets are within their safety ranges. Ramp hints are kept.
    pub fn clamped(self) -> Self {
        let params = self.params().clamped();

        Self {
            gain: self.gain.with_target(params.gain),
            cutoff_hz: self.cutoff_hz.with_target(params.cutoff_hz),
            breath_hz: params.breath_hz,
        }
    }
}

fn limit(name: &'static str, value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        warn!("{}", Error::InvalidParameter { name, value });
        return min;
    }

    if value < min || value > max {
        warn!("{}", Error::InvalidParameter { name, value });
    }

    value.clamp(min, max)
}
