use std::f32::consts::TAU;

/// How far the breathing pulls the volume down at its lowest point.
pub const BREATH_DEPTH: f32 = 0.35;

/// Slow sine LFO which lets the noise "breathe".
///
/// Yields a volume factor within `[1 - BREATH_DEPTH, 1]` which starts at `1`.
#[derive(Debug, Clone)]
pub struct Breath {
    sample_rate: f32,
    phase: f32,
}

impl Breath {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            phase: 0.,
        }
    }

    pub fn next_factor(&mut self, rate_hz: f32) -> f32 {
        let factor = 1. - BREATH_DEPTH * 0.5 * (1. - (TAU * self.phase).cos());

        self.phase = (self.phase + rate_hz / self.sample_rate).fract();
        factor
    }
}
