//! Rough loudness and tempo estimation of user samples.

// Length of one frame of the energy envelope.
const FRAME_MS: usize = 10;
const FRAMES_PER_MINUTE: f32 = (60_000 / FRAME_MS) as f32;

const MIN_BPM: f32 = 60.;
const MAX_BPM: f32 = 180.;

// Minimum autocorrelation (relative to lag 0) which counts as a beat.
const CLEAR_PEAK: f32 = 0.3;

/// What we could find out about a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleAnalysis {
    /// Root mean square over the whole sample.
    pub rms: f32,

    /// Beats per minute within `[60, 180]` if the sample has a clear beat.
    pub tempo_bpm: Option<f32>,
}

impl SampleAnalysis {
    pub fn new(samples: &[f32], sample_rate: u32) -> Self {
        Self {
            rms: rms(samples),
            tempo_bpm: tempo(samples, sample_rate),
        }
    }
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.;
    }

    let square_sum: f32 = samples.iter().map(|sample| sample * sample).sum();
    (square_sum / samples.len() as f32).sqrt()
}

/// Autocorrelation of the onsets of the energy envelope.
pub fn tempo(samples: &[f32], sample_rate: u32) -> Option<f32> {
    let frame_len = sample_rate as usize * FRAME_MS / 1000;
    if frame_len == 0 {
        return None;
    }

    let energy: Vec<f32> = samples
        .chunks_exact(frame_len)
        .map(|frame| frame.iter().map(|sample| sample * sample).sum::<f32>() / frame_len as f32)
        .collect();

    let min_lag = (FRAMES_PER_MINUTE / MAX_BPM).ceil() as usize;
    let max_lag = (FRAMES_PER_MINUTE / MIN_BPM).floor() as usize;
    if energy.len() < 2 * max_lag {
        return None;
    }

    // only rising energy counts as an onset
    let mut onsets: Vec<f32> = energy
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).max(0.))
        .collect();

    let mean = onsets.iter().sum::<f32>() / onsets.len() as f32;
    onsets.iter_mut().for_each(|onset| *onset -= mean);

    let correlation = |lag: usize| -> f32 {
        onsets
            .iter()
            .zip(&onsets[lag..])
            .map(|(a, b)| a * b)
            .sum()
    };

    let zero_lag = correlation(0);
    if zero_lag <= f32::EPSILON {
        return None;
    }

    let (best_lag, best) = (min_lag..=max_lag)
        .map(|lag| (lag, correlation(lag)))
        .fold((0, f32::MIN), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        });

    if best / zero_lag < CLEAR_PEAK {
        return None;
    }

    Some(FRAMES_PER_MINUTE / best_lag as f32)
}
