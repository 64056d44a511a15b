use tracing::debug;

use crate::{AudioParams, AudioUpdate, VisualParams};

/// How strongly the typing rhythm shapes the output. Always within `[0, 1]`.
///
/// At `0` the output is the baseline, at `1` it's the full mapped response.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intensity(f32);

impl Intensity {
    pub const OFF: Self = Self(0.);
    pub const FULL: Self = Self(1.);

    /// Clamps `value` into `[0, 1]`. `NaN` turns the intensity off.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            debug!("Intensity is NaN, turning it off");
            return Self::OFF;
        }

        Self(value.clamp(0., 1.))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::FULL
    }
}

impl From<f32> for Intensity {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

/// Mixes mapped parameters with a fixed baseline: `baseline + (mapped - baseline) * intensity`
/// for every numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct Blender {
    audio_baseline: AudioParams,
    visual_baseline: VisualParams,
}

impl Blender {
    pub fn new(audio_baseline: AudioParams, visual_baseline: VisualParams) -> Self {
        Self {
            audio_baseline,
            visual_baseline,
        }
    }

    /// Blends the targets of `mapped`. The ramp hints are kept.
    pub fn audio(&self, mapped: &AudioUpdate, intensity: Intensity) -> AudioUpdate {
        let base = &self.audio_baseline;
        let i = intensity.get();

        AudioUpdate {
            gain: mapped.gain.with_target(mix(base.gain, mapped.gain.target, i)),
            cutoff_hz: mapped
                .cutoff_hz
                .with_target(mix(base.cutoff_hz, mapped.cutoff_hz.target, i)),
            breath_hz: mix(base.breath_hz, mapped.breath_hz, i),
        }
    }

    /// Blends the numeric fields of `mapped`. The palette is taken from `mapped`.
    pub fn visual(&self, mapped: &VisualParams, intensity: Intensity) -> VisualParams {
        let base = &self.visual_baseline;
        let i = intensity.get();

        VisualParams {
            speed: mix(base.speed, mapped.speed, i),
            detail: mix(base.detail, mapped.detail, i),
            saturation: mix(base.saturation, mapped.saturation, i),
            palette: mapped.palette,
        }
    }

    pub fn audio_baseline(&self) -> &AudioParams {
        &self.audio_baseline
    }

    pub fn visual_baseline(&self) -> &VisualParams {
        &self.visual_baseline
    }
}

// Written as a weighted sum so that both ends are exact.
fn mix(baseline: f32, mapped: f32, intensity: f32) -> f32 {
    baseline * (1. - intensity) + mapped * intensity
}
