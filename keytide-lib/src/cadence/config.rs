use crate::{config::ConfigError, Millis};

/// The config options for [crate::cadence::CadenceTracker].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CadenceConfig {
    /// How many key timestamps are remembered. Needs to be at least `2`.
    pub history_capacity: usize,

    /// Smoothing factor of the moving average of the inter-key interval.
    /// It has to be within `(0, 1]`.
    ///
    /// The higher the value, the more a single keystroke moves the average.
    pub ema_alpha: f64,

    /// Length of the trailing window for the words-per-minute estimate.
    pub wpm_window_ms: Millis,

    /// How many keystrokes count as one word.
    pub chars_per_word: f64,

    /// Upper bound of snapshots per second which are handed downstream.
    pub publish_rate_hz: f64,
}

impl CadenceConfig {
    /// Checks if the current config is valid or contains any mistakes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity < 2 {
            return Err(ConfigError::HistoryTooSmall(self.history_capacity));
        }

        if !(self.ema_alpha > 0. && self.ema_alpha <= 1.) {
            return Err(ConfigError::InvalidSmoothingFactor(self.ema_alpha));
        }

        for (name, value) in [
            ("wpm_window_ms", self.wpm_window_ms),
            ("chars_per_word", self.chars_per_word),
            ("publish_rate_hz", self.publish_rate_hz),
        ] {
            if !(value > 0. && value.is_finite()) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        Ok(())
    }

    /// Converts the amount of keystrokes within the window into words per minute.
    pub(crate) fn words_per_minute(&self, keystrokes: usize) -> f64 {
        keystrokes as f64 / self.chars_per_word * (60_000. / self.wpm_window_ms)
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            history_capacity: 20,
            ema_alpha: 0.2,
            wpm_window_ms: 10_000.,
            chars_per_word: 5.,
            publish_rate_hz: 30.,
        }
    }
}
