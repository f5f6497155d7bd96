//! Node producer contract used by the driver.

use adstar_kernel::cost::Cost;
use adstar_kernel::transition::Transition;

use crate::context::SearchContext;
use crate::node::NodeId;

/// Shorthand for a producer's context type.
pub type ContextOf<P> = SearchContext<
    <P as NodeProducer>::State,
    <P as NodeProducer>::Action,
    <P as NodeProducer>::Cost,
>;

/// Shorthand for a producer's transition type.
pub type TransitionOf<P> = Transition<<P as NodeProducer>::State, <P as NodeProducer>::Action>;

/// Creates, revalues and expands nodes for the driver.
///
/// The driver owns the [`SearchContext`] and hands it to every call; a
/// producer never keeps nodes of its own. Implementations must set
/// `needs_update` on every node whose OPEN/CLOSED/INCONS membership may have
/// to change; the driver trusts that flag and nothing else.
pub trait NodeProducer {
    /// Caller-defined state.
    type State: Clone + Ord + std::fmt::Debug;
    /// Optional action label.
    type Action: Clone + Ord + std::fmt::Debug;
    /// Cost algebra.
    type Cost: Cost;

    /// The unique node for `transition.to`, registered on first access.
    ///
    /// `predecessor == None` marks the search start.
    fn make_node(
        &self,
        ctx: &mut ContextOf<Self>,
        predecessor: Option<NodeId>,
        transition: &TransitionOf<Self>,
    ) -> NodeId;

    /// Generate or revalue the successors of `node`.
    ///
    /// Uses the consistency last reported through
    /// [`NodeProducer::set_node_consistent`] to choose between the
    /// over-consistent and under-consistent update rules.
    fn expand(&mut self, ctx: &mut ContextOf<Self>, node: NodeId) -> Vec<NodeId>;

    /// Revalue the destinations of `changed` (except `start`).
    fn expand_transitions_changed(
        &mut self,
        ctx: &mut ContextOf<Self>,
        start: NodeId,
        changed: &[TransitionOf<Self>],
    ) -> Vec<NodeId>;

    /// Set `v` to the maximal cost (full re-evaluation pending).
    fn set_max_v(&self, ctx: &mut ContextOf<Self>, node: NodeId);

    /// Recompute `key` from `g`, `v`, the heuristic and the current epsilon.
    fn update_key(&self, ctx: &mut ContextOf<Self>, node: NodeId);

    /// Change the heuristic inflation.
    fn set_epsilon(&mut self, epsilon: f64);

    /// Current heuristic inflation.
    fn epsilon(&self) -> f64;

    /// Record whether the node about to be expanded passed the `v > g` test.
    fn set_node_consistent(&mut self, consistent: bool);
}
