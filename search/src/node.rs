//! Search node, priority key and arena index.

use std::cmp::Ordering;

use adstar_kernel::cost::Cost;

/// Index of a node in its [`crate::context::SearchContext`] arena.
///
/// Ancestry is expressed through these indices, so rebinding a parent during
/// repair is a single index write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Wrap a raw arena position.
    ///
    /// Only ids handed out by a context are meaningful to it; this exists
    /// for queues and tables built outside one.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The queue ordering key: `(primary, secondary)`.
///
/// `primary = min(g, v) ⊕ ε·h(state)`, `secondary = min(g, v)`. Ordered by
/// primary, then secondary, ascending: the smallest key is the most
/// promising node.
#[derive(Debug, Clone, Copy)]
pub struct Key<C> {
    pub primary: C,
    pub secondary: C,
}

impl<C: Cost> Key<C> {
    /// Compute the key from the node's values, its heuristic and `epsilon`.
    #[must_use]
    pub fn compute(g: C, v: C, heuristic: C, epsilon: f64) -> Self {
        let settled = g.min_cost(v);
        Self {
            primary: settled.combine(heuristic.scale(epsilon)),
            secondary: settled,
        }
    }

    /// Key of a node nothing is known about yet.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            primary: C::max_value(),
            secondary: C::max_value(),
        }
    }
}

impl<C: Cost> PartialEq for Key<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: Cost> Eq for Key<C> {}

impl<C: Cost> PartialOrd for Key<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Cost> Ord for Key<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary
            .cmp_cost(&other.primary)
            .then_with(|| self.secondary.cmp_cost(&other.secondary))
    }
}

/// Per-state search record.
///
/// One instance exists per distinct state for the lifetime of a search
/// context; `g`, `v` and `key` are revalued in place.
#[derive(Debug, Clone)]
pub struct AdStarNode<S, A, C> {
    /// The state this node stands for.
    pub state: S,
    /// Action of the incoming transition from `parent`.
    pub action: Option<A>,
    /// Current best predecessor (`None` for the start and for nodes with no
    /// finite-cost predecessor).
    pub parent: Option<NodeId>,
    /// Best known cost from the start.
    pub g: C,
    /// Value estimate; differs from `g` while the node is inconsistent.
    pub v: C,
    /// Priority key, recomputed by the producer.
    pub key: Key<C>,
    /// Set by the producer when OPEN/CLOSED/INCONS membership must change.
    pub needs_update: bool,
}

impl<S, A, C: Cost> AdStarNode<S, A, C> {
    /// The expansion-branch test: `v > g`.
    ///
    /// Over-consistent nodes (value estimate above the accumulated cost) are
    /// settled and closed when expanded; every other node is reset to
    /// `v = max` and re-queued.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.v.cmp_cost(&self.g) == Ordering::Greater
    }

    /// `v == g`.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.v.cmp_cost(&self.g) == Ordering::Equal
    }

    /// `v < g`.
    #[must_use]
    pub fn is_underconsistent(&self) -> bool {
        self.v.cmp_cost(&self.g) == Ordering::Less
    }

    /// Compare two nodes by key.
    #[must_use]
    pub fn cmp_key(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}
