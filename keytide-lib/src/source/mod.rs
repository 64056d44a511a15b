//! Each struct here delivers key presses from a different origin.
//! Pick the one which fits your platform.
mod dummy;
mod hook;

pub use dummy::DummyKeySource;
pub use hook::{HookHandle, HookSource};

use crate::Millis;

/// Interface for all key sources which are listed in the [source module](crate::source).
///
/// Whatever the origin is, the timestamps end up in [crate::Orchestrator::on_key_event].
pub trait KeySource {
    /// **Replaces** the content of `buf` with the timestamps of all key presses
    /// since the last call, oldest first.
    fn fetch_keys(&mut self, buf: &mut Vec<Millis>);
}

impl<S: KeySource + ?Sized> KeySource for Box<S> {
    fn fetch_keys(&mut self, buf: &mut Vec<Millis>) {
        (**self).fetch_keys(buf)
    }
}
