//! Default [`NodeProducer`] over a [`SearchDomain`].
//!
//! Update rules:
//!
//! - over-consistent expansion of `s`: every successor `s'` with
//!   `g(s') > g(s) ⊕ c(s, s')` adopts `s` as parent and the cheaper `g`;
//! - under-consistent expansion of `s`: every successor `s' != start` is
//!   revalued as `g(s') = min_p v(p) ⊕ c(p, s')` over its visited
//!   predecessors `p`;
//! - changed transitions: each destination (except the start) is revalued
//!   with the under-consistent rule.

use std::cmp::Ordering;

use adstar_kernel::cost::Cost;

use crate::contract::SearchDomain;
use crate::node::{AdStarNode, Key, NodeId};
use crate::producer::{ContextOf, NodeProducer, TransitionOf};

/// Expander wrapping a caller-supplied domain.
#[derive(Debug, Clone)]
pub struct AdStarExpander<D> {
    domain: D,
    epsilon: f64,
    node_consistent: bool,
}

impl<D: SearchDomain> AdStarExpander<D> {
    /// Expander with `epsilon = 1`.
    #[must_use]
    pub fn new(domain: D) -> Self {
        Self::with_epsilon(domain, 1.0)
    }

    /// Expander with an explicit initial epsilon.
    #[must_use]
    pub fn with_epsilon(domain: D, epsilon: f64) -> Self {
        Self {
            domain,
            epsilon,
            node_consistent: true,
        }
    }

    /// The wrapped domain.
    #[must_use]
    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// Mutable access to the domain, for cost changes between advances.
    ///
    /// Every transition whose cost changes must also be reported to the
    /// driver, or the next replan will not repair it.
    pub fn domain_mut(&mut self) -> &mut D {
        &mut self.domain
    }

    /// Consistency reported for the most recent expansion.
    #[must_use]
    pub fn node_consistent(&self) -> bool {
        self.node_consistent
    }

    fn key_for(&self, node: &AdStarNode<D::State, D::Action, D::Cost>) -> Key<D::Cost> {
        Key::compute(node.g, node.v, self.domain.heuristic(&node.state), self.epsilon)
    }

    /// Visited predecessors of `state` with the transitions leading from them.
    fn visited_predecessors(
        &self,
        ctx: &ContextOf<Self>,
        state: &D::State,
    ) -> Vec<(TransitionOf<Self>, NodeId)> {
        self.domain
            .predecessors(state)
            .into_iter()
            .filter_map(|t| {
                let from = t.from.as_ref()?;
                let id = ctx.lookup(from)?;
                Some((t, id))
            })
            .collect()
    }

    /// Adopt `parent` if reaching `node` through `transition` is cheaper.
    ///
    /// Returns `true` when `node` improved.
    fn update_consistent(
        &self,
        ctx: &mut ContextOf<Self>,
        node: NodeId,
        parent: NodeId,
        transition: &TransitionOf<Self>,
    ) -> bool {
        let candidate = ctx.node(parent).g.combine(self.domain.cost(transition));
        if ctx.node(node).g.cmp_cost(&candidate) != Ordering::Greater {
            return false;
        }
        let n = ctx.node_mut(node);
        n.parent = Some(parent);
        n.g = candidate;
        n.action.clone_from(&transition.action);
        let key = self.key_for(ctx.node(node));
        ctx.node_mut(node).key = key;
        true
    }

    /// Recompute `g` and parent of `node` from its visited predecessors'
    /// value estimates.
    fn update_inconsistent(&self, ctx: &mut ContextOf<Self>, node: NodeId) {
        let state = ctx.node(node).state.clone();
        let mut best = D::Cost::max_value();
        let mut best_parent = None;
        let mut best_action = None;
        for (transition, pred) in self.visited_predecessors(ctx, &state) {
            if pred == node {
                continue;
            }
            let value = ctx.node(pred).v.combine(self.domain.cost(&transition));
            if value.cmp_cost(&best) == Ordering::Less {
                best = value;
                best_parent = Some(pred);
                best_action = transition.action;
            }
        }
        let n = ctx.node_mut(node);
        n.parent = best_parent;
        n.g = best;
        n.action = best_action;
        let key = self.key_for(ctx.node(node));
        ctx.node_mut(node).key = key;
    }
}

impl<D: SearchDomain> NodeProducer for AdStarExpander<D> {
    type State = D::State;
    type Action = D::Action;
    type Cost = D::Cost;

    fn make_node(
        &self,
        ctx: &mut ContextOf<Self>,
        predecessor: Option<NodeId>,
        transition: &TransitionOf<Self>,
    ) -> NodeId {
        if let Some(existing) = ctx.lookup(&transition.to) {
            return existing;
        }
        let g = if predecessor.is_none() {
            D::Cost::identity()
        } else {
            D::Cost::max_value()
        };
        let v = D::Cost::max_value();
        let heuristic = self.domain.heuristic(&transition.to);
        let (id, _) = ctx.insert(AdStarNode {
            state: transition.to.clone(),
            action: transition.action.clone(),
            parent: None,
            g,
            v,
            key: Key::compute(g, v, heuristic, self.epsilon),
            needs_update: false,
        });
        id
    }

    fn expand(&mut self, ctx: &mut ContextOf<Self>, node: NodeId) -> Vec<NodeId> {
        let state = ctx.node(node).state.clone();
        let start = ctx.start();
        let mut successors = Vec::new();
        for transition in self.domain.successors(&state) {
            let successor = self.make_node(ctx, Some(node), &transition);
            if self.node_consistent {
                if self.update_consistent(ctx, successor, node, &transition) {
                    ctx.node_mut(successor).needs_update = true;
                }
            } else if Some(successor) != start {
                self.update_inconsistent(ctx, successor);
                ctx.node_mut(successor).needs_update = true;
            }
            successors.push(successor);
        }
        successors
    }

    fn expand_transitions_changed(
        &mut self,
        ctx: &mut ContextOf<Self>,
        start: NodeId,
        changed: &[TransitionOf<Self>],
    ) -> Vec<NodeId> {
        let start_state = ctx.node(start).state.clone();
        let mut revalued = Vec::new();
        for transition in changed {
            if transition.to == start_state {
                continue;
            }
            let node = self.make_node(ctx, Some(start), transition);
            self.update_inconsistent(ctx, node);
            ctx.node_mut(node).needs_update = true;
            revalued.push(node);
        }
        revalued
    }

    fn set_max_v(&self, ctx: &mut ContextOf<Self>, node: NodeId) {
        ctx.node_mut(node).v = D::Cost::max_value();
        let key = self.key_for(ctx.node(node));
        ctx.node_mut(node).key = key;
    }

    fn update_key(&self, ctx: &mut ContextOf<Self>, node: NodeId) {
        let key = self.key_for(ctx.node(node));
        ctx.node_mut(node).key = key;
    }

    fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn set_node_consistent(&mut self, consistent: bool) {
        self.node_consistent = consistent;
    }
}
