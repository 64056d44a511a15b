use crate::Millis;

/// How a sink should move from its current value to a new target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ramp {
    /// Jump to the target.
    Immediate,

    /// The target is higher than the previous one. Ramp within the given milliseconds.
    Attack(f32),

    /// The target is lower than (or equal to) the previous one. Ramp within the given milliseconds.
    Release(f32),
}

impl Ramp {
    /// The ramp duration in milliseconds. `0` for [Ramp::Immediate].
    pub fn time_ms(&self) -> f32 {
        match *self {
            Ramp::Immediate => 0.,
            Ramp::Attack(ms) | Ramp::Release(ms) => ms,
        }
    }
}

/// A target value tagged with the ramp a sink should use to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ramped {
    pub target: f32,
    pub ramp: Ramp,
}

impl Ramped {
    pub fn immediate(target: f32) -> Self {
        Self {
            target,
            ramp: Ramp::Immediate,
        }
    }

    pub fn with_target(self, target: f32) -> Self {
        Self { target, ..self }
    }
}

/// Asymmetric time constants: fast when rising, slow when falling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RampTimes {
    pub attack_ms: f32,
    pub release_ms: f32,
}

impl RampTimes {
    /// Attack if `to` is above `from`, release otherwise.
    pub fn between(&self, from: f32, to: f32) -> Ramp {
        if to > from {
            Ramp::Attack(self.attack_ms)
        } else {
            Ramp::Release(self.release_ms)
        }
    }
}

impl Default for RampTimes {
    fn default() -> Self {
        Self {
            attack_ms: 300.,
            release_ms: 1500.,
        }
    }
}

/// Remembers the last target of one parameter to pick attack or release for the next one.
///
/// The choice compares targets only. It doesn't know how far the sink got with an
/// ongoing ramp.
#[derive(Debug, Clone, Default)]
pub struct RampMemory {
    last: Option<f32>,
}

impl RampMemory {
    pub fn hint(&mut self, target: f32, times: RampTimes) -> Ramped {
        let ramp = match self.last {
            None => Ramp::Immediate,
            Some(last) => times.between(last, target),
        };

        self.last = Some(target);
        Ramped { target, ramp }
    }

    pub fn last(&self) -> Option<f32> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Exponential approach towards a target, evaluated once per call from the
/// time which passed since the previous call.
///
/// `next = prev + (target - prev) * (1 - e^(-dt / tau))` where `tau` is the attack
/// time if the target is above `prev` and the release time otherwise.
#[derive(Debug, Clone, Default)]
pub struct Approach {
    last: Option<(f32, Millis)>,
}

impl Approach {
    pub fn step(&mut self, target: f32, now: Millis, times: RampTimes) -> f32 {
        let next = match self.last {
            None => target,
            Some((prev, at)) => {
                let tau = if target > prev {
                    times.attack_ms
                } else {
                    times.release_ms
                };
                let dt = (now - at).max(0.) as f32;
                let progress = 1. - (-dt / tau).exp();

                prev + (target - prev) * progress
            }
        };

        self.last = Some((next, now));
        next
    }

    pub fn value(&self) -> Option<f32> {
        self.last.map(|(value, _)| value)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
