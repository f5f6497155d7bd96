//! Search domain contract.

use adstar_kernel::cost::Cost;
use adstar_kernel::transition::Transition;

/// A graph the default expander can search.
///
/// # Contract
///
/// - `successors(s)` returns transitions with `from == Some(s)`.
/// - `predecessors(s)` returns transitions *into* `s` (`to == s`), i.e. the
///   reverse adjacency. It must agree with `successors`.
/// - `cost` is evaluated on demand and may change between replanning
///   passes; callers report such changes through
///   `AdStarForward::add_transitions_changed`.
/// - `heuristic` should be admissible for `epsilon = 1` to yield optimal
///   paths. Nothing here checks it.
/// - Enumeration must be deterministic: same state, same transitions, same
///   order.
pub trait SearchDomain {
    /// Caller-defined state.
    type State: Clone + Ord + std::fmt::Debug;
    /// Optional action label.
    type Action: Clone + Ord + std::fmt::Debug;
    /// Cost algebra.
    type Cost: Cost;

    /// Outgoing transitions of `state`.
    fn successors(&self, state: &Self::State) -> Vec<Transition<Self::State, Self::Action>>;

    /// Incoming transitions of `state`.
    fn predecessors(&self, state: &Self::State) -> Vec<Transition<Self::State, Self::Action>>;

    /// Cost of traversing `transition`.
    fn cost(&self, transition: &Transition<Self::State, Self::Action>) -> Self::Cost;

    /// Estimated cost from `state` to the nearest goal.
    fn heuristic(&self, state: &Self::State) -> Self::Cost;
}
