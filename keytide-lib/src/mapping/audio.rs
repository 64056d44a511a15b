use tracing::trace;

use super::{IkiRange, RampMemory, RampTimes, Span};
use crate::{
    config::ConfigError, AudioUpdate, Millis, MAX_BREATH_HZ, MAX_CUTOFF_HZ, MAX_GAIN,
    MIN_BREATH_HZ, MIN_CUTOFF_HZ,
};

/// The config options for [AudioMapper].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioMapping {
    pub iki_range: IkiRange,

    /// Output gain. Must stay within `[0, 0.3]`.
    pub gain: Span,

    /// Low-pass cutoff in Hz. Must stay within `[20, 20_000]`.
    pub cutoff_hz: Span,

    /// Breathing rate in Hz. Must stay within `[0.05, 0.2]`.
    pub breath_hz: Span,

    /// Ramp hints for `gain` and `cutoff_hz`.
    pub ramp: RampTimes,
}

impl AudioMapping {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.iki_range.validate()?;
        self.gain.validate_within("gain", 0., MAX_GAIN)?;
        self.cutoff_hz
            .validate_within("cutoff_hz", MIN_CUTOFF_HZ, MAX_CUTOFF_HZ)?;
        self.breath_hz
            .validate_within("breath_hz", MIN_BREATH_HZ, MAX_BREATH_HZ)?;
        validate_ramp(&self.ramp)
    }
}

impl Default for AudioMapping {
    fn default() -> Self {
        Self {
            iki_range: IkiRange::default(),
            gain: Span::new(0.18, 0.28),
            cutoff_hz: Span::new(800., 2200.),
            breath_hz: Span::new(0.07, 0.12),
            ramp: RampTimes::default(),
        }
    }
}

pub(super) fn validate_ramp(ramp: &RampTimes) -> Result<(), ConfigError> {
    for (name, value) in [("attack_ms", ramp.attack_ms), ("release_ms", ramp.release_ms)] {
        if !(value > 0.) {
            return Err(ConfigError::NotPositive {
                name,
                value: value as f64,
            });
        }
    }

    Ok(())
}

/// Maps an inter-key interval onto the parameters of the noise.
///
/// `gain` and `cutoff_hz` get a ramp hint (attack if the target rises, release
/// otherwise, nothing on the first call). `breath_hz` is passed through as the
/// audio stage ramps it on its own.
#[derive(Debug, Clone)]
pub struct AudioMapper {
    mapping: AudioMapping,

    gain: RampMemory,
    cutoff: RampMemory,
}

impl AudioMapper {
    pub fn new(mapping: AudioMapping) -> Self {
        Self {
            mapping,
            gain: RampMemory::default(),
            cutoff: RampMemory::default(),
        }
    }

    /// Returns `None` if there's no interval yet.
    pub fn map(&mut self, iki_ms: Option<Millis>) -> Option<AudioUpdate> {
        let iki_ms = iki_ms.filter(|iki| !iki.is_nan())?;
        let t = self.mapping.iki_range.normalize(iki_ms);

        let gain = self.mapping.gain.at(t);
        let cutoff_hz = self.mapping.cutoff_hz.at(t);
        let breath_hz = self.mapping.breath_hz.at(t);
        trace!("iki {iki_ms}ms (t = {t}) => gain {gain}, cutoff {cutoff_hz}Hz, breath {breath_hz}Hz");

        let update = AudioUpdate {
            gain: self.gain.hint(gain, self.mapping.ramp),
            cutoff_hz: self.cutoff.hint(cutoff_hz, self.mapping.ramp),
            breath_hz,
        };

        Some(update.clamped())
    }

    /// Forgets the previous targets. The next call won't produce a ramp.
    pub fn reset(&mut self) {
        self.gain.reset();
        self.cutoff.reset();
    }

    pub fn mapping(&self) -> &AudioMapping {
        &self.mapping
    }
}
