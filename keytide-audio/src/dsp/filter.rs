use std::f32::consts::TAU;

/// One-pole low-pass filter.
#[derive(Debug, Clone)]
pub struct LowPass {
    sample_rate: f32,
    cutoff_hz: f32,
    coefficient: f32,
    state: f32,
}

impl LowPass {
    pub fn new(sample_rate: u32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            sample_rate: sample_rate as f32,
            cutoff_hz: f32::NAN,
            coefficient: 1.,
            state: 0.,
        };

        filter.set_cutoff(cutoff_hz);
        filter
    }

    /// The cutoff is capped just below the Nyquist frequency.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if cutoff_hz == self.cutoff_hz {
            return;
        }

        let nyquist = self.sample_rate / 2.;
        let cutoff = cutoff_hz.clamp(1., nyquist * 0.99);

        self.cutoff_hz = cutoff_hz;
        self.coefficient = 1. - (-TAU * cutoff / self.sample_rate).exp();
    }

    pub fn process(&mut self, sample: f32) -> f32 {
        self.state += self.coefficient * (sample - self.state);
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.;
    }
}
