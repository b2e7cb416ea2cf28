//! Singly-linked FIFO queue.
//!
//! Cells live in a slab and link to their successor by index. Popped cells go
//! onto a free list and are reused by later appends, so a queue that is
//! drained and refilled does not grow its backing storage.

use std::fmt;
use std::ops::Index;

use crate::Sink;

#[derive(Clone, Debug)]
struct Cell<T> {
    /// `None` while the cell sits on the free list.
    value: Option<T>,
    next: Option<u32>,
}

/// An ordered sequence with append-at-back and pop-at-front.
#[derive(Clone)]
pub struct Queue<T> {
    cells: Vec<Cell<T>>,
    head: Option<u32>,
    tail: Option<u32>,
    /// Free list threaded through `Cell::next`.
    free: Option<u32>,
    len: usize,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            head: None,
            tail: None,
            free: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn alloc_cell(&mut self, value: T) -> u32 {
        match self.free {
            Some(idx) => {
                let cell = &mut self.cells[idx as usize];
                self.free = cell.next;
                cell.value = Some(value);
                cell.next = None;
                idx
            }
            None => {
                let idx = self.cells.len();
                assert!(idx < u32::MAX as usize, "queue is full");
                self.cells.push(Cell {
                    value: Some(value),
                    next: None,
                });
                idx as u32
            }
        }
    }

    /// Append `value` at the back.
    pub fn append(&mut self, value: T) -> &mut Self {
        let idx = self.alloc_cell(value);
        match self.tail {
            Some(tail) => self.cells[tail as usize].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        self
    }

    /// Remove and return the front element.
    pub fn pop_front(&mut self) -> Option<T> {
        let idx = self.head?;
        let cell = &mut self.cells[idx as usize];
        let value = cell.value.take();
        self.head = cell.next;
        cell.next = self.free;
        self.free = Some(idx);
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        value
    }

    pub fn front(&self) -> Option<&T> {
        self.head
            .and_then(|idx| self.cells[idx as usize].value.as_ref())
    }

    /// Element at position `index` counted from the front.
    ///
    /// Walks the links, so this is linear in `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    /// Drop every element and the backing storage.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            at: self.head,
            remaining: self.len,
        }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sink<T> for Queue<T> {
    fn append(&mut self, value: T) {
        Queue::append(self, value);
    }
}

impl<T> Index<usize> for Queue<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("queue index {index} out of range (len {})", self.len),
        }
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            Queue::append(self, value);
        }
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Queue<T> {}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders as `[a, b, c]`.
impl<T: fmt::Display> fmt::Display for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// Front-to-back iterator over a [`Queue`].
pub struct Iter<'a, T> {
    queue: &'a Queue<T>,
    at: Option<u32>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let idx = self.at?;
        let cell = &self.queue.cells[idx as usize];
        self.at = cell.next;
        self.remaining -= 1;
        cell.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
