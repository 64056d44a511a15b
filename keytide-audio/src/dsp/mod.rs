//! The small building blocks of the signal chain.
mod filter;
mod lfo;
mod noise;
mod smoother;

pub use filter::LowPass;
pub use lfo::Breath;
pub use noise::BrownNoise;
pub use smoother::Smoother;

/// The highest absolute sample value which ever leaves the synth.
pub const LIMIT: f32 = 0.5;

/// Hard clips `sample` to [LIMIT].
pub fn limit(sample: f32) -> f32 {
    if sample.is_nan() {
        return 0.;
    }

    sample.clamp(-LIMIT, LIMIT)
}
