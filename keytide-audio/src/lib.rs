//! # Description
//! The audio output stage of [keytide]: brown noise (or a looped WAV file of your
//! choice) which gets shaped by the parameters of your typing rhythm.
//!
//! The signal chain lives in [Synth] which doesn't need any device, so it can be
//! rendered offline as well. [NoiseSink] plays it on an output device and
//! implements [keytide::sink::AudioSink] so it can be handed to a [keytide::Orchestrator].
//!
//! ### [cpal]
//!
//! This crate also re-exports [cpal] so there's no need to add [cpal] exclusively
//! to your dependency list.
//!
//! # Example
//!
//! ## Simple workflow
//! ```no_run
//! use keytide::{sink::DummyVisualSink, Config, Orchestrator};
//! use keytide_audio::NoiseSink;
//!
//! let audio = NoiseSink::default_device().unwrap();
//! let mut orchestrator = Orchestrator::new(Config::default(), audio, DummyVisualSink::new()).unwrap();
//!
//! orchestrator.start().unwrap();
//! orchestrator.on_key_event(0.);
//! orchestrator.on_key_event(240.);
//! ```
//!
//! ## Offline
//! ```
//! use keytide::{mapping::{AudioMapper, AudioMapping}};
//! use keytide_audio::Synth;
//!
//! let mut mapper = AudioMapper::new(AudioMapping::default());
//! let mut synth = Synth::with_seed(48_000, 1);
//!
//! synth.set_params(&mapper.map(Some(120.)).unwrap());
//!
//! let mut buffer = vec![0.; 48_000];
//! synth.render(&mut buffer, 1);
//! ```
pub mod dsp;

mod analysis;
mod error;
mod sink;
mod source;
mod synth;

pub use analysis::SampleAnalysis;
pub use cpal;
pub use error::AudioError;
pub use sink::NoiseSink;
pub use synth::{PreparedSample, Synth};

/// The sample rate which is used if the device supports it.
pub const DEFAULT_SAMPLE_RATE: cpal::SampleRate = cpal::SampleRate(44_100);
