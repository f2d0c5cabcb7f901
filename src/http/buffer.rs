/// Smallest capacity allocated once the buffer first grows.
pub const MIN_CAPACITY: usize = 32;

/// Accumulation buffer for bytes that have been received but not yet framed.
///
/// Unconsumed bytes always occupy `[0, len)`. Appending doubles the capacity
/// until the new bytes fit; consuming shifts the remainder back to index 0.
#[derive(Debug, Default)]
pub struct GrowableBuffer {
    storage: Box<[u8]>,
    len: usize,
}

impl GrowableBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The occupied prefix.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    pub fn append(&mut self, bytes: &[u8]) {
        let needed = self.len + bytes.len();
        if needed > self.capacity() {
            self.grow(needed);
        }
        self.storage[self.len..needed].copy_from_slice(bytes);
        self.len = needed;
    }

    /// Drops the first `n` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the occupied length.
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.len, "consume({n}) past occupied length {}", self.len);
        self.storage.copy_within(n..self.len, 0);
        self.len -= n;
    }

    fn grow(&mut self, needed: usize) {
        let mut capacity = self.capacity().max(MIN_CAPACITY);
        while capacity < needed {
            capacity = capacity.saturating_mul(2);
        }

        let mut storage = vec![0; capacity].into_boxed_slice();
        storage[..self.len].copy_from_slice(&self.storage[..self.len]);
        self.storage = storage;
    }
}
