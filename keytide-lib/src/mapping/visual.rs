use super::{audio::validate_ramp, Approach, IkiRange, RampTimes, Span};
use crate::{config::ConfigError, Millis, Palette, VisualParams};

/// Named presets for the reaction of the animation speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VisualPreset {
    /// The animation slowly speeds up while typing slows down: `0.07 → 0.12`.
    #[default]
    Calm,

    /// Fast typing drives a fast animation, with twice the range: `0.14 → 0.06`.
    Desktop,
}

impl VisualPreset {
    pub fn speed(&self) -> Span {
        match self {
            VisualPreset::Calm => Span::new(0.07, 0.12),
            VisualPreset::Desktop => Span::new(0.14, 0.06),
        }
    }
}

/// The config options for [VisualMapper].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualMapping {
    pub iki_range: IkiRange,

    pub speed: Span,
    pub detail: Span,
    pub saturation: Span,

    /// Time constants of the exponential approach of every parameter.
    pub smoothing: RampTimes,
}

impl VisualMapping {
    pub fn from_preset(preset: VisualPreset) -> Self {
        Self {
            speed: preset.speed(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.iki_range.validate()?;
        self.speed.validate_within("speed", 0., 1.)?;
        self.detail.validate_within("detail", 0., 1.)?;
        self.saturation.validate_within("saturation", 0., 1.)?;
        validate_ramp(&self.smoothing)
    }
}

impl Default for VisualMapping {
    fn default() -> Self {
        Self {
            iki_range: IkiRange::default(),
            speed: VisualPreset::Calm.speed(),
            detail: Span::new(0.6, 1.0),
            saturation: Span::new(0.6, 0.8),
            smoothing: RampTimes::default(),
        }
    }
}

/// Maps an inter-key interval onto the parameters of the animation.
///
/// Every parameter approaches its target exponentially depending on the
/// wall-clock time since the previous call.
#[derive(Debug, Clone)]
pub struct VisualMapper {
    mapping: VisualMapping,

    speed: Approach,
    detail: Approach,
    saturation: Approach,
}

impl VisualMapper {
    pub fn new(mapping: VisualMapping) -> Self {
        Self {
            mapping,
            speed: Approach::default(),
            detail: Approach::default(),
            saturation: Approach::default(),
        }
    }

    /// Returns `None` if there's no interval yet.
    ///
    /// `now` is the time of the call in the same clock as the key events.
    pub fn map(
        &mut self,
        iki_ms: Option<Millis>,
        now: Millis,
        palette: Palette,
    ) -> Option<VisualParams> {
        let iki_ms = iki_ms.filter(|iki| !iki.is_nan())?;
        let t = self.mapping.iki_range.normalize(iki_ms);
        let times = self.mapping.smoothing;

        let params = VisualParams {
            speed: self.speed.step(self.mapping.speed.at(t), now, times),
            detail: self.detail.step(self.mapping.detail.at(t), now, times),
            saturation: self
                .saturation
                .step(self.mapping.saturation.at(t), now, times),
            palette,
        };

        Some(params.clamped())
    }

    /// Forgets all previous values. The next call returns the targets directly.
    pub fn reset(&mut self) {
        self.speed.reset();
        self.detail.reset();
        self.saturation.reset();
    }

    pub fn mapping(&self) -> &VisualMapping {
        &self.mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> VisualMapper {
        VisualMapper::new(VisualMapping::default())
    }

    #[test]
    fn nothing_without_interval() {
        assert_eq!(mapper().map(None, 0., Palette::Day), None);
    }

    #[test]
    fn first_call_hits_targets() {
        let fast = mapper().map(Some(80.), 0., Palette::Day).unwrap();
        assert_eq!(fast.speed, 0.07);
        assert_eq!(fast.detail, 0.6);
        assert_eq!(fast.saturation, 0.6);

        let slow = mapper().map(Some(500.), 0., Palette::Night).unwrap();
        assert_eq!(slow.speed, 0.12);
        assert_eq!(slow.detail, 1.0);
        assert_eq!(slow.saturation, 0.8);
        assert_eq!(slow.palette, Palette::Night);
    }

    #[test]
    fn rises_with_attack_time() {
        let mut mapper = mapper();
        mapper.map(Some(80.), 0., Palette::Day);

        // one attack time constant later: ~63% of the way from 0.6 to 1.0
        let params = mapper.map(Some(500.), 300., Palette::Day).unwrap();
        let expected = 0.6 + 0.4 * (1. - (-1f32).exp());
        assert!((params.detail - expected).abs() < 1e-5, "{}", params.detail);
    }

    #[test]
    fn falls_with_release_time() {
        let mut mapper = mapper();
        mapper.map(Some(500.), 0., Palette::Day);

        // 300ms with the release time constant of 1500ms
        let params = mapper.map(Some(80.), 300., Palette::Day).unwrap();
        let expected = 1.0 - 0.4 * (1. - (-0.2f32).exp());
        assert!((params.detail - expected).abs() < 1e-5, "{}", params.detail);
    }

    #[test]
    fn converges_to_target() {
        let mut mapper = mapper();
        mapper.map(Some(80.), 0., Palette::Day);

        let mut params = None;
        for step in 1..=100 {
            params = mapper.map(Some(500.), step as f64 * 100., Palette::Day);
        }

        let params = params.unwrap();
        assert!((params.speed - 0.12).abs() < 1e-4);
        assert!((params.detail - 1.0).abs() < 1e-4);
    }

    #[test]
    fn reset_hits_target_again() {
        let mut mapper = mapper();
        mapper.map(Some(80.), 0., Palette::Day);
        mapper.map(Some(500.), 50., Palette::Day);
        mapper.reset();

        let params = mapper.map(Some(500.), 100., Palette::Day).unwrap();
        assert_eq!(params.speed, 0.12);
        assert_eq!(params.detail, 1.0);
        assert_eq!(params.saturation, 0.8);
    }

    #[test]
    fn desktop_preset_inverts_speed() {
        let mut mapper = VisualMapper::new(VisualMapping::from_preset(VisualPreset::Desktop));

        assert_eq!(mapper.map(Some(80.), 0., Palette::Day).unwrap().speed, 0.14);
        mapper.reset();
        assert_eq!(mapper.map(Some(500.), 0., Palette::Day).unwrap().speed, 0.06);
    }

    #[test]
    fn presets_are_valid() {
        for preset in [VisualPreset::Calm, VisualPreset::Desktop] {
            assert!(VisualMapping::from_preset(preset).validate().is_ok());
        }
    }
}
