/// Double-buffered value shared between a producer and a consumer.
///
/// Holds two slots. The producer mutates the write slot through `write()`;
/// `advance()` publishes the write slot as an immutable `Arc<T>` and seeds
/// the other slot with a copy, which becomes the new write slot.
///
/// A consumer holding a published `Arc<T>` never observes later writes:
/// the slot it points to is either left untouched or replaced by a fresh
/// allocation, and `write()` copies on write while a consumer still
/// shares the slot.
///
/// # Example
///
/// ```ignore
/// let mut buffer = DoubleBuffered::new(0u32);
/// *buffer.write() = 1;
/// let frame = buffer.advance();  // frame sees 1
/// *buffer.write() = 2;           // frame still sees 1
/// ```
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DoubleBuffered<T: Clone> {
    slots: [Arc<T>; 2],
    current: usize,
}

impl<T: Clone> DoubleBuffered<T> {
    /// Create a buffer with both slots set to `value`
    pub fn new(value: T) -> Self {
        Self {
            slots: [Arc::new(value.clone()), Arc::new(value)],
            current: 0,
        }
    }

    /// Read the write slot
    pub fn read(&self) -> &T {
        &self.slots[self.current]
    }

    /// Mutable access to the write slot
    pub fn write(&mut self) -> &mut T {
        Arc::make_mut(&mut self.slots[self.current])
    }

    /// Publish the write slot and switch to the other one
    ///
    /// Returns the published value; the new write slot starts as a copy of it.
    pub fn advance(&mut self) -> Arc<T> {
        let published = Arc::clone(&self.slots[self.current]);
        let next = 1 - self.current;
        self.slots[next] = Arc::new((*published).clone());
        self.current = next;
        published
    }

    /// Index of the write slot (0 or 1)
    pub fn current_index(&self) -> usize {
        self.current
    }
}

impl<T: Clone + Default> Default for DoubleBuffered<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
#[path = "double_buffered_tests.rs"]
mod tests;
