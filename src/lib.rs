//! # counted-avl
//!
//! An AVL search tree that counts duplicate values, plus the two small
//! containers commonly used to collect its traversal output.
//!
//! Nodes are owned by an arena for the whole life of the tree. Removing a
//! value only lowers its multiplicity; the node keeps its place in the shape
//! and is released together with every other node when the tree is dropped.
//!
//! ## Example
//!
//! ```rust
//! use counted_avl::{ByteStack, SearchTree};
//!
//! let mut tree: SearchTree<i32> = SearchTree::new();
//! tree.insert_all([1, 5, 3, 8, 7, 9, 2]);
//! tree.remove_all([1, 7, 8]);
//!
//! let mut stack = ByteStack::with_capacity(tree.len() * std::mem::size_of::<i32>());
//! tree.inorder_traversal(&mut stack);
//!
//! let mut popped = Vec::new();
//! while !stack.is_empty() {
//!     popped.push(stack.pop::<i32>()?);
//! }
//! assert_eq!(popped, [9, 5, 3, 2]);
//! # Ok::<(), counted_avl::StackError>(())
//! ```

#![deny(unsafe_code)]

mod arena;
pub mod error;
pub mod queue;
pub mod stack;
pub mod tree;

pub use error::{StackError, TreeError};
pub use queue::Queue;
pub use stack::ByteStack;
pub use tree::{Comparator, NaturalOrder, Order, SearchTree, Sink};

/// Construction options for [`SearchTree::with_config`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of nodes to reserve arena space for up front
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
        }
    }
}

#[cfg(test)]
mod proptests;
