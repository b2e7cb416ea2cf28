//! Error types.
//!
//! Lookups that miss are not errors: `has`, `remove` and `pop_front` report
//! absence through `bool`/`Option`. Only queries whose result would otherwise
//! be undefined surface here.

use thiserror::Error;

/// Errors reported by [`SearchTree`](crate::SearchTree).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The query has no meaningful answer on a tree without nodes.
    #[error("tree is empty")]
    Empty,
}

/// Errors reported by [`ByteStack`](crate::ByteStack).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// A pop or peek asked for more bytes than are stored.
    #[error("stack underflow: requested {requested} bytes, {available} available")]
    Underflow {
        /// Size of the element being read.
        requested: usize,
        /// Bytes currently on the stack.
        available: usize,
    },
}
