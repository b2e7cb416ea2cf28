//! Node arena for the search tree.
//!
//! Every node the tree ever allocates is registered here and lives until the
//! whole arena is released. Nodes are never freed one at a time: removal from
//! the tree only lowers a multiplicity counter, so the arena is the single
//! owner responsible for reclaiming node memory.
//!
//! Children refer to each other through [`NodeId`] handles instead of
//! pointers, so restructuring the tree is a matter of storing indices.

/// Handle to a node stored in a [`NodeArena`].
///
/// A 32-bit index keeps nodes compact; an arena holds at most `u32::MAX`
/// nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    fn from_usize(index: usize) -> Self {
        assert!(index < u32::MAX as usize, "node arena is full");
        Self(index as u32)
    }

    /// Index of the node inside its arena.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Height type. Leaves are `0`, an absent subtree counts as `-1`.
pub(crate) type Height = i8;

/// Storage unit of the tree: one per distinct value ever inserted.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    /// Logical occurrences. `0` keeps the node in the shape but hides it.
    pub(crate) count: u32,
    pub(crate) height: Height,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            count: 0,
            height: 0,
            left: None,
            right: None,
        }
    }
}

/// Append-only registry owning every node of one tree.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<T> {
    nodes: Vec<Node<T>>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Register a freshly created node holding `value`.
    ///
    /// The node starts with multiplicity 0, height 0 and no children.
    pub(crate) fn alloc(&mut self, value: T) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(Node::new(value));
        log::trace!("registered node {}", id.index());
        id
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes registered since the last release.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drop every registered node, reachable or not.
    ///
    /// Returns the number of nodes released. Handles issued before the call
    /// are invalid afterwards.
    pub(crate) fn release_all(&mut self) -> usize {
        let released = self.nodes.len();
        self.nodes = Vec::new();
        if released != 0 {
            log::debug!("released {released} nodes");
        }
        released
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
