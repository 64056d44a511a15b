use rand::{rngs::StdRng, Rng, SeedableRng};

// Brings the integrated noise back to roughly `[-1, 1]`.
const MAKEUP_GAIN: f32 = 3.5;
const LEAK: f32 = 1.02;

/// Brown (red) noise: leaky integrated white noise with most of its energy in the low end.
#[derive(Debug, Clone)]
pub struct BrownNoise {
    rng: StdRng,
    last: f32,
}

impl BrownNoise {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Always produces the same noise for the same `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self { rng, last: 0. }
    }

    pub fn next_sample(&mut self) -> f32 {
        let white: f32 = self.rng.gen_range(-1.0..1.0);

        self.last = (self.last + 0.02 * white) / LEAK;
        self.last * MAKEUP_GAIN
    }
}

impl Default for BrownNoise {
    fn default() -> Self {
        Self::new()
    }
}
