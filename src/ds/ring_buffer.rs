#![allow(clippy::len_without_is_empty)]

/// A fixed-capacity window that overwrites its oldest element once full
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    ix: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// **Panics** if `capacity` is zero
    ///
    /// Storage grows on demand, so a huge window costs nothing until it fills.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be positive");
        Self {
            buffer: Vec::new(),
            ix: 0,
            capacity,
        }
    }

    /// Number of elements currently held
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Insert an element, overwriting the oldest one if full
    pub fn push(&mut self, item: T) {
        if self.ix >= self.len() {
            self.buffer.push(item);
        } else {
            self.buffer[self.ix] = item;
        }
        self.ix = (self.ix + 1) % self.capacity;
    }

    /// Elements in storage order, not insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }
}

impl RingBuffer<f64> {
    /// Mean of the held values, `0.0` when empty
    pub fn mean(&self) -> f64 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        self.iter().sum::<f64>() / self.len() as f64
    }
}
