//! Monotonic millisecond timestamps for key events.
use std::time::Instant;

use crate::Millis;

/// Converts [Instant]s into milliseconds since the creation of the clock.
///
/// Every key source of one [crate::Orchestrator] should share the same clock so
/// their timestamps are comparable.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// Creates a new clock which starts at `0` right now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds since the creation of the clock.
    pub fn now(&self) -> Millis {
        self.at(Instant::now())
    }

    /// Milliseconds between the creation of the clock and `instant`.
    ///
    /// Instants before the creation of the clock are mapped to `0`.
    pub fn at(&self, instant: Instant) -> Millis {
        instant.saturating_duration_since(self.origin).as_secs_f64() * 1000.
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn origin_is_zero() {
        let clock = Clock::new();
        assert_eq!(clock.at(clock.origin), 0.);
    }

    #[test]
    fn measures_milliseconds() {
        let clock = Clock::new();
        let later = clock.origin + Duration::from_millis(250);

        assert!((clock.at(later) - 250.).abs() < 1e-6);
    }

    #[test]
    fn earlier_instants_saturate() {
        let before = Instant::now();
        std::thread::sleep(Duration::from_millis(2));
        let clock = Clock::new();

        assert_eq!(clock.at(before), 0.);
    }
}
