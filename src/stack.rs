//! LIFO stack over a contiguous byte buffer.
//!
//! Elements are stored as their raw bytes with no per-element allocation or
//! type tag. The reader must pop with the same type that was pushed; the
//! [`Pod`] bound guarantees any byte pattern read back is a valid value, so a
//! mismatched pop yields garbage but never undefined behaviour.

use std::mem::size_of;

use bytemuck::Pod;

use crate::error::StackError;
use crate::Sink;

/// Buffer size used by [`ByteStack::new`].
pub const DEFAULT_STACK_CAPACITY: usize = 256;

/// A stack of plain-old-data values packed into one byte buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteStack {
    buf: Vec<u8>,
}

impl ByteStack {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STACK_CAPACITY)
    }

    /// Create a stack whose buffer holds `bytes` without growing.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: Vec::with_capacity(bytes),
        }
    }

    /// Push `value` as `size_of::<T>()` bytes.
    ///
    /// The buffer grows if `value` does not fit.
    pub fn push<T: Pod>(&mut self, value: T) -> &mut Self {
        self.buf.extend_from_slice(bytemuck::bytes_of(&value));
        self
    }

    /// Pop the topmost `T`.
    pub fn pop<T: Pod>(&mut self) -> Result<T, StackError> {
        let value = self.peek()?;
        self.buf.truncate(self.buf.len() - size_of::<T>());
        Ok(value)
    }

    /// Read the topmost `T` without removing it.
    pub fn peek<T: Pod>(&self) -> Result<T, StackError> {
        let start = self.top_offset::<T>()?;
        Ok(bytemuck::pod_read_unaligned(&self.buf[start..]))
    }

    fn top_offset<T>(&self) -> Result<usize, StackError> {
        let requested = size_of::<T>();
        self.buf
            .len()
            .checked_sub(requested)
            .ok_or(StackError::Underflow {
                requested,
                available: self.buf.len(),
            })
    }

    /// Make sure the buffer can hold at least `bytes` in total.
    ///
    /// Stored bytes are preserved.
    pub fn reserve(&mut self, bytes: usize) {
        self.buf.reserve(bytes.saturating_sub(self.buf.len()));
    }

    /// Bytes currently stored.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// True when the next push would have to grow the buffer.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.buf.len() == self.buf.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Forget all stored bytes, keeping the buffer.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Default for ByteStack {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod> Sink<T> for ByteStack {
    fn append(&mut self, value: T) {
        self.push(value);
    }
}
