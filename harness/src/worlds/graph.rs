//! `WeightedGraph`: explicit directed graph with integer edge costs.
//!
//! Nodes are `u32` labels, costs are `u64` and `u64::MAX` means impassable.
//! Edge costs can be changed at run time; [`WeightedGraph::set_edge_cost`]
//! returns the transition to report to the driver.

use std::collections::BTreeMap;

use adstar_kernel::transition::Transition;
use adstar_search::contract::SearchDomain;

/// Transition type of the graph (no action labels).
pub type GraphTransition = Transition<u32, ()>;

/// A directed graph keyed by `(from, to)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightedGraph {
    edges: BTreeMap<(u32, u32), u64>,
    heuristic: BTreeMap<u32, u64>,
}

impl WeightedGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(from, to, cost)` triples; later duplicates win.
    #[must_use]
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32, u64)>,
    {
        let mut graph = Self::new();
        for (from, to, cost) in edges {
            graph.add_edge(from, to, cost);
        }
        graph
    }

    /// Insert or overwrite an edge.
    pub fn add_edge(&mut self, from: u32, to: u32, cost: u64) {
        self.edges.insert((from, to), cost);
    }

    /// Set a per-node heuristic value (nodes without one use 0).
    pub fn set_heuristic(&mut self, node: u32, value: u64) {
        self.heuristic.insert(node, value);
    }

    /// Change an existing edge's cost.
    ///
    /// Returns the transition to report when the cost actually changed.
    pub fn set_edge_cost(&mut self, from: u32, to: u32, cost: u64) -> Option<GraphTransition> {
        let slot = self.edges.get_mut(&(from, to))?;
        if *slot == cost {
            return None;
        }
        *slot = cost;
        Some(Transition::new(from, to))
    }

    /// Current cost of an edge.
    #[must_use]
    pub fn edge_cost(&self, from: u32, to: u32) -> Option<u64> {
        self.edges.get(&(from, to)).copied()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl SearchDomain for WeightedGraph {
    type State = u32;
    type Action = ();
    type Cost = u64;

    fn successors(&self, state: &u32) -> Vec<GraphTransition> {
        self.edges
            .range((*state, 0)..=(*state, u32::MAX))
            .map(|(&(from, to), _)| Transition::new(from, to))
            .collect()
    }

    fn predecessors(&self, state: &u32) -> Vec<GraphTransition> {
        self.edges
            .keys()
            .filter(|(_, to)| to == state)
            .map(|&(from, to)| Transition::new(from, to))
            .collect()
    }

    fn cost(&self, transition: &GraphTransition) -> u64 {
        transition
            .from
            .and_then(|from| self.edge_cost(from, transition.to))
            .unwrap_or(u64::MAX)
    }

    fn heuristic(&self, state: &u32) -> u64 {
        self.heuristic.get(state).copied().unwrap_or(0)
    }
}
