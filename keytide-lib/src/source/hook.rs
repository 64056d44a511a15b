use std::{
    sync::mpsc::{self, Receiver, Sender},
    time::Instant,
};

use tracing::debug;

use super::KeySource;
use crate::{clock::Clock, Millis};

/// Key source for global keyboard hooks.
///
/// The hook usually lives on its own thread and only gets a [HookHandle] which
/// it uses to report every key press. The source then collects them on the
/// thread which owns the [crate::Orchestrator].
///
/// # Example
/// ```
/// use keytide::{clock::Clock, source::{HookSource, KeySource}};
///
/// let (mut source, handle) = HookSource::new(Clock::new());
///
/// std::thread::spawn(move || {
///     handle.key_down();
/// })
/// .join()
/// .unwrap();
///
/// let mut buf = Vec::new();
/// source.fetch_keys(&mut buf);
/// assert_eq!(buf.len(), 1);
/// ```
#[derive(Debug)]
pub struct HookSource {
    rx: Receiver<Instant>,
    clock: Clock,
}

impl HookSource {
    /// Creates the source and the handle for the hook.
    ///
    /// Clone the handle if more than one hook should report to this source.
    pub fn new(clock: Clock) -> (Self, HookHandle) {
        let (tx, rx) = mpsc::channel();

        (Self { rx, clock }, HookHandle { tx })
    }
}

impl KeySource for HookSource {
    fn fetch_keys(&mut self, buf: &mut Vec<Millis>) {
        buf.clear();
        buf.extend(self.rx.try_iter().map(|instant| self.clock.at(instant)));
    }
}

/// The sending side of a [HookSource].
#[derive(Debug, Clone)]
pub struct HookHandle {
    tx: Sender<Instant>,
}

impl HookHandle {
    /// Reports a key press which happened right now.
    ///
    /// Returns `false` if the source got dropped. The hook can stop then.
    pub fn key_down(&self) -> bool {
        self.key_down_at(Instant::now())
    }

    /// Reports a key press which happened at `instant`.
    pub fn key_down_at(&self, instant: Instant) -> bool {
        let delivered = self.tx.send(instant).is_ok();
        if !delivered {
            debug!("Key source is gone, dropping key press");
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn keeps_order_and_spacing() {
        let clock = Clock::new();
        let (mut source, handle) = HookSource::new(clock);

        let first = Instant::now() + Duration::from_millis(10);
        handle.key_down_at(first);
        handle.key_down_at(first + Duration::from_millis(120));

        let mut buf = Vec::new();
        source.fetch_keys(&mut buf);

        assert_eq!(buf.len(), 2);
        assert!((buf[1] - buf[0] - 120.).abs() < 1e-6);
    }

    #[test]
    fn fetch_replaces_buffer() {
        let (mut source, handle) = HookSource::new(Clock::new());
        let mut buf = vec![1., 2., 3.];

        source.fetch_keys(&mut buf);
        assert!(buf.is_empty());

        handle.key_down();
        source.fetch_keys(&mut buf);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn dropped_source() {
        let (source, handle) = HookSource::new(Clock::new());
        drop(source);

        assert!(!handle.key_down());
    }
}
