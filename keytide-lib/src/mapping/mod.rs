//! Maps the smoothed inter-key interval onto audio and visual parameters.
//!
//! Both mappers share the same first step: the interval is clamped into an
//! [IkiRange] and normalised to `t ∈ [0, 1]` where `0` means fast typing and
//! `1` means slow typing (or idle). Each parameter then interpolates linearly
//! within its [Span].
mod audio;
mod ramp;
mod visual;

pub use audio::{AudioMapper, AudioMapping};
pub use ramp::{Approach, Ramp, RampMemory, RampTimes, Ramped};
pub use visual::{VisualMapper, VisualMapping, VisualPreset};

use crate::{config::ConfigError, Millis};

/// The range of inter-key intervals which the mappers react to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IkiRange {
    /// Intervals at or below this count as the fastest typing.
    pub fastest_ms: Millis,

    /// Intervals at or above this count as slow typing.
    pub slowest_ms: Millis,
}

impl IkiRange {
    /// Clamps `iki_ms` into the range and maps it to `[0, 1]`.
    pub fn normalize(&self, iki_ms: Millis) -> f32 {
        let clamped = iki_ms.clamp(self.fastest_ms, self.slowest_ms);
        ((clamped - self.fastest_ms) / (self.slowest_ms - self.fastest_ms)) as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.fastest_ms.is_finite()
            && self.slowest_ms.is_finite()
            && self.fastest_ms >= 0.
            && self.fastest_ms < self.slowest_ms;

        if !valid {
            return Err(ConfigError::InvalidIkiRange {
                fastest_ms: self.fastest_ms,
                slowest_ms: self.slowest_ms,
            });
        }

        Ok(())
    }
}

impl Default for IkiRange {
    fn default() -> Self {
        Self {
            fastest_ms: 80.,
            slowest_ms: 500.,
        }
    }
}

/// The values a parameter takes for the fastest (`t = 0`) and the slowest (`t = 1`) typing.
///
/// `slow` may be smaller than `fast` which inverts the reaction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub fast: f32,
    pub slow: f32,
}

impl Span {
    pub const fn new(fast: f32, slow: f32) -> Self {
        Self { fast, slow }
    }

    /// Linear interpolation. Hits both ends exactly.
    pub fn at(&self, t: f32) -> f32 {
        debug_assert!((0.0..=1.0).contains(&t));

        if t >= 1. {
            self.slow
        } else {
            self.fast + (self.slow - self.fast) * t
        }
    }

    pub fn min(&self) -> f32 {
        self.fast.min(self.slow)
    }

    pub fn max(&self) -> f32 {
        self.fast.max(self.slow)
    }

    pub(crate) fn validate_within(
        &self,
        name: &'static str,
        min: f32,
        max: f32,
    ) -> Result<(), ConfigError> {
        for value in [self.fast, self.slow] {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps() {
        let range = IkiRange::default();

        assert_eq!(range.normalize(0.), 0.);
        assert_eq!(range.normalize(80.), 0.);
        assert_eq!(range.normalize(290.), 0.5);
        assert_eq!(range.normalize(500.), 1.);
        assert_eq!(range.normalize(10_000.), 1.);
        assert_eq!(range.normalize(f64::INFINITY), 1.);
    }

    #[test]
    fn empty_or_inverted_range_is_invalid() {
        let empty = IkiRange {
            fastest_ms: 200.,
            slowest_ms: 200.,
        };
        let inverted = IkiRange {
            fastest_ms: 500.,
            slowest_ms: 80.,
        };

        assert!(IkiRange::default().validate().is_ok());
        assert!(empty.validate().is_err());
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn span_hits_its_ends() {
        let span = Span::new(0.18, 0.28);

        assert_eq!(span.at(0.), 0.18);
        assert_eq!(span.at(1.), 0.28);
        assert!((span.at(0.5) - 0.23).abs() < 1e-6);
    }

    #[test]
    fn inverted_span() {
        let span = Span::new(0.14, 0.06);

        assert_eq!(span.at(0.), 0.14);
        assert_eq!(span.at(1.), 0.06);
        assert_eq!(span.min(), 0.06);
        assert_eq!(span.max(), 0.14);
    }

    #[test]
    fn span_outside_of_limits() {
        let span = Span::new(0.1, 0.5);

        assert!(span.validate_within("gain", 0., 0.3).is_err());
        assert!(span.validate_within("gain", 0., 1.).is_ok());
    }
}
