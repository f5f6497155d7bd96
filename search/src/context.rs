//! Per-search node arena and visited registry.
//!
//! A [`SearchContext`] is created when a driver is constructed and dropped
//! with it. It guarantees at most one [`AdStarNode`] per state; producers look
//! nodes up and register new ones through it instead of through shared state.

use std::collections::BTreeMap;

use adstar_kernel::cost::Cost;

use crate::node::{AdStarNode, NodeId};

/// Node arena plus `state → NodeId` registry.
#[derive(Debug, Clone)]
pub struct SearchContext<S, A, C> {
    nodes: Vec<AdStarNode<S, A, C>>,
    visited: BTreeMap<S, NodeId>,
    start: Option<NodeId>,
}

impl<S: Clone + Ord, A, C: Cost> SearchContext<S, A, C> {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            visited: BTreeMap::new(),
            start: None,
        }
    }

    /// The search start, once the driver has registered it.
    #[must_use]
    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    /// Mark `id` as the search start.
    pub fn set_start(&mut self, id: NodeId) {
        self.start = Some(id);
    }

    /// Look up the node registered for `state`.
    #[must_use]
    pub fn lookup(&self, state: &S) -> Option<NodeId> {
        self.visited.get(state).copied()
    }

    /// Register `node`, or return the existing node for its state.
    ///
    /// The second element is `true` when the node was newly inserted.
    pub fn insert(&mut self, node: AdStarNode<S, A, C>) -> (NodeId, bool) {
        if let Some(existing) = self.lookup(&node.state) {
            return (existing, false);
        }
        let id = NodeId(self.nodes.len());
        self.visited.insert(node.state.clone(), id);
        self.nodes.push(node);
        (id, true)
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this context.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &AdStarNode<S, A, C> {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this context.
    pub fn node_mut(&mut self, id: NodeId) -> &mut AdStarNode<S, A, C> {
        &mut self.nodes[id.0]
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if no node has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visited registry, ordered by state.
    #[must_use]
    pub fn visited(&self) -> &BTreeMap<S, NodeId> {
        &self.visited
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &AdStarNode<S, A, C>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Ancestry of `id`, start first.
    ///
    /// The walk is bounded by the arena size, so a corrupted parent chain
    /// cannot loop forever; it is simply cut.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// States along [`SearchContext::path_to`].
    #[must_use]
    pub fn states_to(&self, id: NodeId) -> Vec<S> {
        self.path_to(id)
            .into_iter()
            .map(|n| self.node(n).state.clone())
            .collect()
    }
}

impl<S: Clone + Ord, A, C: Cost> Default for SearchContext<S, A, C> {
    fn default() -> Self {
        Self::new()
    }
}
