//! AVL search tree with per-value multiplicity.
//!
//! Each distinct value owns one node in a [`NodeArena`]. Inserting a value
//! that is already present bumps its multiplicity; removing one lowers it.
//! Removal never unlinks a node, so the tree shape only ever grows and a value
//! removed down to zero is revived in place when inserted again.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::arena::{Height, Node, NodeArena, NodeId};
use crate::error::TreeError;
use crate::Config;

// =============================================================================
// Seams: ordering and output
// =============================================================================

/// Strict total order used to place values in the tree.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Receiver of traversal output.
pub trait Sink<T> {
    /// Accept the next visited element.
    fn append(&mut self, value: T);
}

impl<T> Sink<T> for Vec<T> {
    fn append(&mut self, value: T) {
        self.push(value);
    }
}

impl<T> Sink<T> for std::collections::VecDeque<T> {
    fn append(&mut self, value: T) {
        self.push_back(value);
    }
}

/// Visiting order for [`SearchTree::traverse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    Pre,
    /// Left subtree, node, right subtree. Yields ascending values.
    In,
    /// Left subtree, right subtree, then node.
    Post,
}

// =============================================================================
// SearchTree
// =============================================================================

/// A height-balanced binary search tree that counts duplicates.
///
/// ```
/// use counted_avl::SearchTree;
///
/// let mut tree: SearchTree<i32> = [4, 1, 4].into_iter().collect();
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.count(&4), 2);
///
/// tree.remove(&4);
/// tree.remove(&4);
/// assert!(!tree.has(&4));
///
/// let mut out = Vec::new();
/// tree.inorder_traversal(&mut out);
/// assert_eq!(out, vec![1]);
/// ```
#[derive(Clone)]
pub struct SearchTree<T, C = NaturalOrder> {
    pub(crate) nodes: NodeArena<T>,
    pub(crate) root: Option<NodeId>,
    /// Sum of all multiplicities.
    count: usize,
    cmp: C,
}

impl<T: Ord> SearchTree<T> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            nodes: NodeArena::with_capacity(config.initial_capacity),
            root: None,
            count: 0,
            cmp: NaturalOrder,
        }
    }
}

impl<T, C: Comparator<T>> SearchTree<T, C> {
    /// Create an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            count: 0,
            cmp,
        }
    }

    /// Number of logical elements: the sum of all multiplicities.
    #[inline]
    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Nodes allocated so far, including those whose multiplicity dropped
    /// to zero.
    #[inline]
    pub fn active_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Height of the root, counting a lone leaf as `0`.
    ///
    /// Values removed down to zero multiplicity keep their nodes, so this is
    /// only an error for a tree that never received an insert (or was
    /// cleared).
    pub fn height(&self) -> Result<usize, TreeError> {
        let root = self.root.ok_or(TreeError::Empty)?;
        Ok(self.nodes.get(root).height as usize)
    }

    /// Insert one occurrence of `value`.
    ///
    /// When an equal value is already stored, its multiplicity is bumped and
    /// `value` is dropped.
    pub fn insert(&mut self, value: T) {
        let root = self.insert_at(self.root, value);
        self.root = Some(root);
    }

    /// Insert every value in order, each as an independent insert.
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.insert(value);
        }
    }

    /// Remove one occurrence of `value`.
    ///
    /// Returns `false` when `value` is absent or already at multiplicity 0.
    /// The node stays in the tree either way.
    pub fn remove(&mut self, value: &T) -> bool {
        let Some(id) = self.find(value) else {
            return false;
        };
        self.nodes.get_mut(id).count -= 1;
        self.count -= 1;
        true
    }

    /// Remove one occurrence of each value in order. Returns how many
    /// removals took effect.
    pub fn remove_all<I, Q>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = Q>,
        Q: Borrow<T>,
    {
        let mut removed = 0;
        for value in values {
            if self.remove(value.borrow()) {
                removed += 1;
            }
        }
        removed
    }

    /// True when at least one occurrence of `value` is stored.
    pub fn has(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Multiplicity of `value`, `0` when absent.
    pub fn count(&self, value: &T) -> u32 {
        self.locate(value).map_or(0, |id| self.nodes.get(id).count)
    }

    /// The stored element equal to `value`, if logically present.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(value).map(|id| &self.nodes.get(id).value)
    }

    /// Release every node and reset to an empty tree.
    pub fn clear(&mut self) {
        self.nodes.release_all();
        self.root = None;
        self.count = 0;
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Node holding `value`, regardless of its multiplicity.
    fn locate(&self, value: &T) -> Option<NodeId> {
        let mut at = self.root;
        while let Some(id) = at {
            let node = self.nodes.get(id);
            at = match self.cmp.compare(value, &node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Node holding `value` with a nonzero multiplicity.
    fn find(&self, value: &T) -> Option<NodeId> {
        self.locate(value)
            .filter(|&id| self.nodes.get(id).count > 0)
    }

    // -------------------------------------------------------------------------
    // Insertion and rebalancing
    // -------------------------------------------------------------------------

    /// Insert into the subtree rooted at `at` and return its new root.
    fn insert_at(&mut self, at: Option<NodeId>, value: T) -> NodeId {
        let Some(id) = at else {
            let id = self.nodes.alloc(value);
            self.nodes.get_mut(id).count = 1;
            self.count += 1;
            return id;
        };

        let mut root = id;
        match self.cmp.compare(&value, &self.nodes.get(id).value) {
            Ordering::Equal => {
                self.nodes.get_mut(id).count += 1;
                self.count += 1;
                return id;
            }
            Ordering::Less => {
                let left = self.nodes.get(id).left;
                let left = self.insert_at(left, value);
                self.nodes.get_mut(id).left = Some(left);
                if self.balance_factor(id) == 2 {
                    // A right-leaning child means the value went into its
                    // right subtree.
                    root = if self.balance_factor(left) < 0 {
                        self.rotate_left_right(id)
                    } else {
                        self.rotate_right(id)
                    };
                }
            }
            Ordering::Greater => {
                let right = self.nodes.get(id).right;
                let right = self.insert_at(right, value);
                self.nodes.get_mut(id).right = Some(right);
                if self.balance_factor(id) == -2 {
                    root = if self.balance_factor(right) > 0 {
                        self.rotate_right_left(id)
                    } else {
                        self.rotate_left(id)
                    };
                }
            }
        }

        self.update_height(root);
        root
    }

    #[inline]
    fn height_of(&self, id: Option<NodeId>) -> Height {
        id.map_or(-1, |id| self.nodes.get(id).height)
    }

    /// `height(left) - height(right)`.
    #[inline]
    fn balance_factor(&self, id: NodeId) -> i16 {
        let node = self.nodes.get(id);
        i16::from(self.height_of(node.left)) - i16::from(self.height_of(node.right))
    }

    fn update_height(&mut self, id: NodeId) {
        let node = self.nodes.get(id);
        let height = self.height_of(node.left).max(self.height_of(node.right)) + 1;
        self.nodes.get_mut(id).height = height;
    }

    /// Lift the right child of `root` into its place.
    fn rotate_left(&mut self, root: NodeId) -> NodeId {
        let pivot = self
            .nodes
            .get(root)
            .right
            .expect("left rotation needs a right child");
        let inner = self.nodes.get(pivot).left;
        self.nodes.get_mut(root).right = inner;
        self.nodes.get_mut(pivot).left = Some(root);
        self.update_height(root);
        self.update_height(pivot);
        log::trace!("rotated left at node {}", root.index());
        pivot
    }

    /// Lift the left child of `root` into its place.
    fn rotate_right(&mut self, root: NodeId) -> NodeId {
        let pivot = self
            .nodes
            .get(root)
            .left
            .expect("right rotation needs a left child");
        let inner = self.nodes.get(pivot).right;
        self.nodes.get_mut(root).left = inner;
        self.nodes.get_mut(pivot).right = Some(root);
        self.update_height(root);
        self.update_height(pivot);
        log::trace!("rotated right at node {}", root.index());
        pivot
    }

    /// Left rotation on the left child, then right rotation on `root`.
    fn rotate_left_right(&mut self, root: NodeId) -> NodeId {
        let left = self
            .nodes
            .get(root)
            .left
            .expect("left-right rotation needs a left child");
        let left = self.rotate_left(left);
        self.nodes.get_mut(root).left = Some(left);
        self.rotate_right(root)
    }

    /// Right rotation on the right child, then left rotation on `root`.
    fn rotate_right_left(&mut self, root: NodeId) -> NodeId {
        let right = self
            .nodes
            .get(root)
            .right
            .expect("right-left rotation needs a right child");
        let right = self.rotate_right(right);
        self.nodes.get_mut(root).right = Some(right);
        self.rotate_left(root)
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// Call `visit` on every node with nonzero multiplicity, in `order`.
    ///
    /// Walks with an explicit stack bounded by the tree height.
    fn walk<'a>(&'a self, order: Order, mut visit: impl FnMut(&'a Node<T>)) {
        let mut emit = |id: NodeId| {
            let node = self.nodes.get(id);
            if node.count > 0 {
                visit(node);
            }
        };

        match order {
            Order::Pre => {
                let mut stack: Vec<NodeId> = self.root.into_iter().collect();
                while let Some(id) = stack.pop() {
                    emit(id);
                    let node = self.nodes.get(id);
                    stack.extend(node.right);
                    stack.extend(node.left);
                }
            }
            Order::In => {
                let mut stack: Vec<NodeId> = Vec::new();
                let mut at = self.root;
                loop {
                    while let Some(id) = at {
                        stack.push(id);
                        at = self.nodes.get(id).left;
                    }
                    let Some(id) = stack.pop() else {
                        break;
                    };
                    emit(id);
                    at = self.nodes.get(id).right;
                }
            }
            Order::Post => {
                // The flag marks nodes whose children are already queued.
                let mut stack: Vec<(NodeId, bool)> =
                    self.root.map(|id| (id, false)).into_iter().collect();
                while let Some((id, expanded)) = stack.pop() {
                    if expanded {
                        emit(id);
                        continue;
                    }
                    let node = self.nodes.get(id);
                    stack.push((id, true));
                    stack.extend(node.right.map(|r| (r, false)));
                    stack.extend(node.left.map(|l| (l, false)));
                }
            }
        }
    }

    /// Append each logically present value to `sink` once, in `order`.
    ///
    /// Duplicates are emitted a single time regardless of multiplicity.
    pub fn traverse<S>(&self, order: Order, sink: &mut S)
    where
        T: Clone,
        S: Sink<T> + ?Sized,
    {
        self.walk(order, |node| sink.append(node.value.clone()));
    }

    pub fn preorder_traversal<S>(&self, sink: &mut S)
    where
        T: Clone,
        S: Sink<T> + ?Sized,
    {
        self.traverse(Order::Pre, sink);
    }

    pub fn inorder_traversal<S>(&self, sink: &mut S)
    where
        T: Clone,
        S: Sink<T> + ?Sized,
    {
        self.traverse(Order::In, sink);
    }

    pub fn postorder_traversal<S>(&self, sink: &mut S)
    where
        T: Clone,
        S: Sink<T> + ?Sized,
    {
        self.traverse(Order::Post, sink);
    }
}

impl<T: Ord> Default for SearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Drop for SearchTree<T, C> {
    fn drop(&mut self) {
        self.nodes.release_all();
    }
}

impl<T: Ord> FromIterator<T> for SearchTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.insert_all(iter);
        tree
    }
}

impl<T, C: Comparator<T>> Extend<T> for SearchTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

/// Shows the logically present values in ascending order with their
/// multiplicities.
impl<T: fmt::Debug, C: Comparator<T>> fmt::Debug for SearchTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        self.walk(Order::In, |node| {
            map.entry(&node.value, &node.count);
        });
        map.finish()
    }
}
