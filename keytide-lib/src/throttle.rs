use crate::Millis;

/// Limits how often something may happen, measured in key event time.
#[derive(Debug, Clone)]
pub struct Throttle {
    min_interval: Millis,
    last_fired: Option<Millis>,
}

impl Throttle {
    pub fn new(rate_hz: f64) -> Self {
        debug_assert!(rate_hz > 0.);

        Self {
            min_interval: 1000. / rate_hz,
            last_fired: None,
        }
    }

    /// Returns `true` if at least one interval passed since the last time this returned `true`.
    pub fn try_fire(&mut self, now: Millis) -> bool {
        let ready = match self.last_fired {
            None => true,
            Some(last) => now - last >= self.min_interval,
        };

        if ready {
            self.last_fired = Some(now);
        }

        ready
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_fires() {
        let mut throttle = Throttle::new(30.);
        assert!(throttle.try_fire(1234.));
    }

    #[test]
    fn blocks_within_interval() {
        let mut throttle = Throttle::new(30.);

        assert!(throttle.try_fire(0.));
        assert!(!throttle.try_fire(10.));
        assert!(!throttle.try_fire(33.));
        assert!(throttle.try_fire(34.));
    }

    #[test]
    fn blocked_calls_dont_move_the_window() {
        let mut throttle = Throttle::new(10.);

        assert!(throttle.try_fire(0.));
        for now in [20., 40., 60., 80.] {
            assert!(!throttle.try_fire(now));
        }
        assert!(throttle.try_fire(100.));
    }

    #[test]
    fn reset_fires_again() {
        let mut throttle = Throttle::new(30.);

        assert!(throttle.try_fire(0.));
        throttle.reset();
        assert!(throttle.try_fire(1.));
    }

    #[test]
    fn time_going_backwards_doesnt_fire() {
        let mut throttle = Throttle::new(30.);

        assert!(throttle.try_fire(500.));
        assert!(!throttle.try_fire(100.));
    }
}
