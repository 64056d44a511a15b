use std::collections::VecDeque;

use super::KeySource;
use crate::Millis;

/// A key source which replays a fixed list of timestamps in batches.
/// Mainly used for docs and tests.
///
/// # Example
/// ```
/// use keytide::source::{DummyKeySource, KeySource};
///
/// let mut source = DummyKeySource::new([0., 80., 160.]).with_batch_size(2);
/// let mut buf = Vec::new();
///
/// source.fetch_keys(&mut buf);
/// assert_eq!(buf, [0., 80.]);
///
/// source.fetch_keys(&mut buf);
/// assert_eq!(buf, [160.]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DummyKeySource {
    pending: VecDeque<Millis>,
    batch_size: usize,
}

impl DummyKeySource {
    pub fn new(timestamps: impl IntoIterator<Item = Millis>) -> Self {
        Self {
            pending: timestamps.into_iter().collect(),
            batch_size: usize::MAX,
        }
    }

    /// Limits the amount of timestamps returned per fetch. `0` is treated as `1`.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Queues more timestamps.
    pub fn push(&mut self, timestamp: Millis) {
        self.pending.push_back(timestamp);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl KeySource for DummyKeySource {
    fn fetch_keys(&mut self, buf: &mut Vec<Millis>) {
        buf.clear();

        let amount = self.batch_size.min(self.pending.len());
        buf.extend(self.pending.drain(..amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_clears_buffer() {
        let mut source = DummyKeySource::default().with_batch_size(0);
        let mut buf = vec![1., 2.];

        source.fetch_keys(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn pushed_keys_come_last() {
        let mut source = DummyKeySource::new([10.]);
        source.push(20.);

        let mut buf = Vec::new();
        source.fetch_keys(&mut buf);

        assert_eq!(buf, [10., 20.]);
        assert!(source.is_empty());
    }
}
