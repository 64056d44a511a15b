use crate::Millis;

/// Fixed-capacity ring buffer of key timestamps. The oldest entry gets overwritten first.
#[derive(Debug, Clone)]
pub struct KeyHistory {
    buffer: Box<[Millis]>,
    // index of the next write
    head: usize,
    len: usize,
}

impl KeyHistory {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "key history needs a capacity");

        Self {
            buffer: vec![0.; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, timestamp: Millis) {
        self.buffer[self.head] = timestamp;
        self.head = (self.head + 1) % self.buffer.len();
        self.len = (self.len + 1).min(self.buffer.len());
    }

    /// The most recent timestamp.
    pub fn latest(&self) -> Option<Millis> {
        self.iter().next()
    }

    /// Iterates from the newest to the oldest timestamp.
    pub fn iter(&self) -> impl Iterator<Item = Millis> + '_ {
        let capacity = self.buffer.len();

        (1..=self.len).map(move |offset| self.buffer[(self.head + capacity - offset) % capacity])
    }

    /// Amount of timestamps strictly after `threshold`.
    pub fn count_after(&self, threshold: Millis) -> usize {
        self.iter().take_while(|&ts| ts > threshold).count()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
