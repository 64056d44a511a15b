//! # Description
//! A crate which turns the rhythm of your typing into parameters for an ambient
//! noise generator and a generative animation.
//!
//! Key presses are fed into a [cadence tracker](cadence::CadenceTracker) which
//! derives the inter-key interval and the words per minute. Two mappers turn the
//! interval into [AudioUpdate]s and [VisualParams] which are blended with a fixed
//! baseline depending on the [Intensity] and finally handed to an
//! [audio sink](sink::AudioSink) and a [visual sink](sink::VisualSink).
//!
//! The [Orchestrator] wires everything together.
//!
//! # Example
//!
//! ## Simple workflow
//! ```
//! use keytide::{
//!     sink::{DummyAudioSink, DummyVisualSink},
//!     source::DummyKeySource,
//!     Config, Orchestrator,
//! };
//!
//! let mut orchestrator =
//!     Orchestrator::new(Config::default(), DummyAudioSink::new(), DummyVisualSink::new()).unwrap();
//! // a global keyboard hook or the focused window would deliver these
//! let mut source = DummyKeySource::new([0., 500., 1000., 1500.]);
//!
//! orchestrator.start().unwrap();
//!
//! loop {
//!     orchestrator.pump(&mut source);
//!
//!     // slow typing gives the loudest and brightest noise
//!     let update = orchestrator.audio_sink().last_update().unwrap();
//!     assert_eq!(update.gain.target, 0.28);
//!     assert_eq!(update.cutoff_hz.target, 2200.);
//!
//!     break;
//! }
//! ```
//!
//! ## Turning the intensity down
//! At an intensity of `0` the typing has no influence anymore.
//!
//! ```
//! use keytide::{
//!     sink::{DummyAudioSink, DummyVisualSink},
//!     AudioParams, Config, Orchestrator,
//! };
//!
//! let mut orchestrator =
//!     Orchestrator::new(Config::default(), DummyAudioSink::new(), DummyVisualSink::new()).unwrap();
//! orchestrator.start().unwrap();
//! orchestrator.intensity_changed(0.);
//!
//! orchestrator.on_key_event(0.);
//! orchestrator.on_key_event(90.);
//!
//! let update = orchestrator.audio_sink().last_update().unwrap();
//! assert_eq!(update.params(), AudioParams::BASELINE);
//! ```
pub mod cadence;
pub mod clock;
pub mod config;
pub mod mapping;
pub mod sink;
pub mod source;

mod blend;
mod error;
mod orchestrator;
mod params;
mod throttle;

pub use blend::{Blender, Intensity};
pub use config::Config;
pub use error::Error;
pub use orchestrator::{LifecycleState, Orchestrator, UserGesture, Visibility};
pub use params::{
    AudioParams, AudioUpdate, Palette, VisualParams, MAX_BREATH_HZ, MAX_CUTOFF_HZ, MAX_GAIN,
    MIN_BREATH_HZ, MIN_CUTOFF_HZ,
};

/// Timestamps and durations in milliseconds.
pub type Millis = f64;
