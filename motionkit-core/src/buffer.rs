//! Fixed-Capacity Ring Buffer for Sensor Sample History
//!
//! ## Overview
//!
//! Each physical sensor stream keeps its most recent samples in a
//! [`SampleRingBuffer`]. The capacity is chosen once, at construction, from
//! the orchestrator configuration (624 samples unless overridden), and the
//! buffer never grows past it: when a push would exceed the capacity, exactly
//! one sample, the oldest, is evicted.
//!
//! A full buffer is the steady state for a running sensor, so `push` has no
//! error path.
//!
//! ### Memory Layout
//!
//! Storage grows lazily up to the capacity and is then reused in place:
//!
//! ```text
//! SampleRingBuffer (capacity 5) after 7 pushes:
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  F  │  G  │  C  │  D  │  E  │  ← storage indices 0..5
//! └─────┴─────┴─────┴─────┴─────┘
//!                ↑
//!                └── write_pos = 2 (oldest sample, next overwrite)
//!
//! Logical view: [C, D, E, F, G]
//! ```
//!
//! Nothing is allocated for a sensor that never delivers, and a busy sensor
//! allocates exactly once.
//!
//! ## Usage Example
//!
//! ```rust
//! use motionkit_core::buffer::SampleRingBuffer;
//!
//! let mut history = SampleRingBuffer::new(3).unwrap();
//! for reading in ["A", "B", "C", "D"] {
//!     history.push(reading);
//! }
//!
//! assert_eq!(history.snapshot(), vec!["B", "C", "D"]);
//! assert_eq!(history.last(), Some(&"D"));
//! ```

use crate::errors::{MotionError, MotionResult};

/// Bounded, insertion-ordered history of samples
///
/// ## Internal Invariants
///
/// - `data.len() <= capacity`
/// - `write_pos < capacity`, and is 0 until the buffer first fills
/// - once full, `data[write_pos]` is the oldest sample
///
/// ## Thread Safety
///
/// This type is not synchronized. The orchestrator keeps each buffer behind
/// the lock of the sensor that owns it.
#[derive(Debug, Clone)]
pub struct SampleRingBuffer<T> {
    /// Samples in storage order
    data: Vec<T>,

    /// Index of the next overwrite once the buffer is full
    write_pos: usize,

    /// Maximum number of samples retained
    capacity: usize,
}

impl<T> SampleRingBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` samples
    ///
    /// Returns [`MotionError::ZeroCapacity`] for a capacity of zero.
    pub fn new(capacity: usize) -> MotionResult<Self> {
        if capacity == 0 {
            return Err(MotionError::ZeroCapacity);
        }

        Ok(Self {
            data: Vec::new(),
            write_pos: 0,
            capacity,
        })
    }

    /// Appends a sample, evicting the oldest one if the buffer is full
    ///
    /// ## Example
    ///
    /// ```rust
    /// # use motionkit_core::buffer::SampleRingBuffer;
    /// let mut buf = SampleRingBuffer::new(3).unwrap();
    ///
    /// // First 3 pushes fill the buffer
    /// buf.push(1);
    /// buf.push(2);
    /// buf.push(3);
    ///
    /// // Fourth push evicts the first
    /// buf.push(4);
    ///
    /// assert_eq!(buf.snapshot(), vec![2, 3, 4]);
    /// ```
    pub fn push(&mut self, sample: T) {
        if self.data.len() < self.capacity {
            self.data.push(sample);
            return;
        }

        self.data[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.capacity;
    }

    /// Maximum number of samples retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get number of stored samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Get the most recent sample
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }

        self.get(self.len() - 1)
    }

    /// Iterate over samples from oldest to newest
    pub fn iter(&self) -> SampleRingBufferIter<'_, T> {
        SampleRingBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Drop every stored sample
    pub fn clear(&mut self) {
        self.data.clear();
        self.write_pos = 0;
    }

    /// Gets a sample by its logical index (0 = oldest, len-1 = newest)
    ///
    /// Before the buffer fills, logical and storage indices match. Once it is
    /// full the oldest sample sits at `write_pos`:
    ///
    /// ```text
    /// Storage:       [D, E, A, B, C]  (write_pos = 2)
    /// Logical view:  [A, B, C, D, E]
    ///
    /// Mapping: logical[i] = storage[(write_pos + i) % capacity]
    /// ```
    fn get(&self, index: usize) -> Option<&T> {
        if index >= self.data.len() {
            return None;
        }

        let actual_index = if self.is_full() {
            (self.write_pos + index) % self.capacity
        } else {
            index
        };

        self.data.get(actual_index)
    }
}

impl<T: Clone> SampleRingBuffer<T> {
    /// Copies the contents out, oldest to newest
    ///
    /// The returned vector is detached from the buffer; later pushes do not
    /// show up in it.
    pub fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

/// Iterator over ring buffer contents, oldest first
pub struct SampleRingBufferIter<'a, T> {
    buffer: &'a SampleRingBuffer<T>,
    index: usize,
}

impl<'a, T> Iterator for SampleRingBufferIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for SampleRingBufferIter<'a, T> {}

impl<'a, T> IntoIterator for &'a SampleRingBuffer<T> {
    type Item = &'a T;
    type IntoIter = SampleRingBufferIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
