use keytide::mapping::Ramp;

/// Moves a value towards its target, one sample at a time.
///
/// The ramp time of a [Ramp] is used as the time constant: after one ramp time
/// the value covered about 63% of the distance to its target.
#[derive(Debug, Clone)]
pub struct Smoother {
    sample_rate: f32,
    value: f32,
    target: f32,
    coefficient: f32,
}

impl Smoother {
    pub fn new(sample_rate: u32, value: f32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            value,
            target: value,
            coefficient: 1.,
        }
    }

    pub fn set(&mut self, target: f32, ramp: Ramp) {
        self.target = target;

        let time_ms = ramp.time_ms();
        if time_ms > 0. {
            let samples = time_ms / 1000. * self.sample_rate;
            self.coefficient = 1. - (-1. / samples).exp();
        } else {
            self.value = target;
            self.coefficient = 1.;
        }
    }

    pub fn next_value(&mut self) -> f32 {
        self.value += self.coefficient * (self.target - self.value);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}
