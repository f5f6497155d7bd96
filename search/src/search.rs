//! Forward AD* driver: OPEN/CLOSED/INCONS state machine and the pull-based
//! advance/replan protocol.
//!
//! The caller polls [`AdStarForward::has_more_work`] and calls
//! [`AdStarForward::advance`]; between advances it may change epsilon or
//! report changed transitions, which take effect on the next replanning
//! pass. Nothing runs in the background and nothing blocks.
//!
//! # Membership
//!
//! Every state is in at most one of OPEN, CLOSED and INCONS. A node that
//! becomes inconsistent after being closed in the current pass is *moved*
//! from CLOSED to INCONS; if it settles again before the next replan it goes
//! back to CLOSED. Either way it is not expanded twice in one pass.

use std::collections::{BTreeMap, BTreeSet};

use adstar_kernel::cost::Cost;
use adstar_kernel::transition::Transition;
use tracing::{debug, trace};

use crate::error::SearchError;
use crate::frontier::LazyQueue;
use crate::node::{AdStarNode, NodeId};
use crate::policy::{check_epsilon, AdStarPolicy, TraceModeV1};
use crate::producer::{ContextOf, NodeProducer, TransitionOf};
use crate::trace::{
    AdvanceEventV1, ExpandBranchV1, ExpandEventV1, KeyRecordV1, ReplanEventV1,
    SearchStatsV1, SearchTraceMetadataV1, SearchTraceV1,
};

/// Membership map from state to arena node.
pub type MembershipMap<S> = BTreeMap<S, NodeId>;

/// Anytime Dynamic A*, forward variant.
pub struct AdStarForward<P: NodeProducer> {
    producer: P,
    ctx: ContextOf<P>,
    open: MembershipMap<P::State>,
    closed: MembershipMap<P::State>,
    incons: MembershipMap<P::State>,
    transitions_changed: BTreeSet<TransitionOf<P>>,
    queue: LazyQueue<P::Cost>,
    replan: bool,
    start: NodeId,
    goals: Vec<NodeId>,
    stats: SearchStatsV1,
    events: Option<Vec<AdvanceEventV1>>,
    initial_epsilon: f64,
}

impl<P: NodeProducer> AdStarForward<P> {
    /// Create a driver for `start` and one or more `goals`.
    ///
    /// The producer keeps whatever epsilon it was built with.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyGoalSet`] if `goals` is empty.
    pub fn new<I>(start: P::State, goals: I, producer: P) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = P::State>,
    {
        let goals: Vec<P::State> = goals.into_iter().collect();
        if goals.is_empty() {
            return Err(SearchError::EmptyGoalSet);
        }
        Ok(Self::build(start, &goals, producer, TraceModeV1::Off))
    }

    /// Create a driver for a single goal.
    #[must_use]
    pub fn with_single_goal(start: P::State, goal: P::State, producer: P) -> Self {
        Self::build(start, &[goal], producer, TraceModeV1::Off)
    }

    /// Create a driver configured by `policy`.
    ///
    /// The policy's initial epsilon is forwarded to the producer.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidEpsilon`] if the policy is invalid and
    /// [`SearchError::EmptyGoalSet`] if `goals` is empty.
    pub fn with_policy<I>(
        start: P::State,
        goals: I,
        mut producer: P,
        policy: &AdStarPolicy,
    ) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = P::State>,
    {
        policy.validate()?;
        let goals: Vec<P::State> = goals.into_iter().collect();
        if goals.is_empty() {
            return Err(SearchError::EmptyGoalSet);
        }
        producer.set_epsilon(policy.initial_epsilon);
        Ok(Self::build(start, &goals, producer, policy.trace))
    }

    /// `goals` must be non-empty.
    fn build(start: P::State, goals: &[P::State], producer: P, trace: TraceModeV1) -> Self {
        // A fresh context per driver: this is the "clear visited" step.
        let mut ctx = ContextOf::<P>::new();
        let start_id = producer.make_node(&mut ctx, None, &Transition::root(start));
        ctx.set_start(start_id);
        let goal_ids = goals
            .iter()
            .map(|goal| producer.make_node(&mut ctx, Some(start_id), &Transition::root(goal.clone())))
            .collect();

        let initial_epsilon = producer.epsilon();
        let mut driver = Self {
            producer,
            ctx,
            open: BTreeMap::new(),
            closed: BTreeMap::new(),
            incons: BTreeMap::new(),
            transitions_changed: BTreeSet::new(),
            queue: LazyQueue::new(),
            replan: false,
            start: start_id,
            goals: goal_ids,
            stats: SearchStatsV1::default(),
            events: match trace {
                TraceModeV1::Off => None,
                TraceModeV1::Record => Some(Vec::new()),
            },
            initial_epsilon,
        };
        driver.insert_open(start_id);
        debug!(
            start = ?driver.ctx.node(start_id).state,
            goals = driver.goals.len(),
            epsilon = initial_epsilon,
            "search initialized"
        );
        driver
    }

    // -----------------------------------------------------------------------
    // Protocol
    // -----------------------------------------------------------------------

    /// `true` while a replan is pending or the current pass has not
    /// converged on the best goal.
    ///
    /// Polling only discards stale queue entries; it never changes
    /// membership or node values.
    pub fn has_more_work(&mut self) -> bool {
        if self.replan {
            return true;
        }
        let goal = self.best_goal();
        if self.open.get(&self.ctx.node(goal).state) == Some(&goal) {
            return true;
        }
        self.expansion_pending().is_some()
    }

    /// Process the next node.
    ///
    /// Expands the queue head while the best goal is not yet better than it
    /// (or not yet settled); otherwise runs a replanning pass and returns the
    /// new queue head. Returns `None` only when the replanning pass leaves
    /// OPEN empty.
    pub fn advance(&mut self) -> Option<NodeId> {
        let order = self.stats.total_advances;
        self.stats.total_advances += 1;
        match self.expansion_pending() {
            Some(current) => Some(self.expand_node(current, order)),
            None => self.replan_pass(order),
        }
    }

    /// Change the suboptimality bound.
    ///
    /// Takes effect on the next replanning pass, which recomputes every OPEN
    /// key. Decrease towards 1 to tighten the bound; values below 1 weaken
    /// the heuristic and are accepted as given.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidEpsilon`] for `NaN`, infinite, zero or
    /// negative values, leaving the driver unchanged.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<(), SearchError> {
        check_epsilon(epsilon)?;
        self.replan = true;
        self.producer.set_epsilon(epsilon);
        debug!(epsilon, "epsilon change scheduled");
        Ok(())
    }

    /// Current suboptimality bound.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.producer.epsilon()
    }

    /// Record transitions whose cost changed since the last replan.
    pub fn add_transitions_changed<I>(&mut self, transitions: I)
    where
        I: IntoIterator<Item = TransitionOf<P>>,
    {
        self.replan = true;
        let before = self.transitions_changed.len();
        self.transitions_changed.extend(transitions);
        debug!(
            added = self.transitions_changed.len() - before,
            pending = self.transitions_changed.len(),
            "transitions changed"
        );
    }

    /// Removing from the produced sequence is not part of the protocol.
    ///
    /// # Errors
    ///
    /// Always returns [`SearchError::UnsupportedOperation`].
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    pub fn remove(&mut self) -> Result<(), SearchError> {
        Err(SearchError::UnsupportedOperation { operation: "remove" })
    }

    // -----------------------------------------------------------------------
    // Branches
    // -----------------------------------------------------------------------

    /// The queue head, if the expansion branch applies.
    fn expansion_pending(&mut self) -> Option<NodeId> {
        let head = self.take_promising()?;
        let goal = self.ctx.node(self.best_goal());
        let head_node = self.ctx.node(head);
        if goal.key >= head_node.key || goal.is_underconsistent() {
            Some(head)
        } else {
            None
        }
    }

    fn expand_node(&mut self, current: NodeId, order: u64) -> NodeId {
        let state = self.ctx.node(current).state.clone();
        let key = self.ctx.node(current).key;
        self.open.remove(&state);
        // `current` is the live head `expansion_pending` just returned.
        self.queue.pop();

        let consistent = self.ctx.node(current).is_consistent();
        if consistent {
            let node = self.ctx.node_mut(current);
            node.v = node.g;
            self.closed.insert(state.clone(), current);
        } else {
            self.producer.set_max_v(&mut self.ctx, current);
            self.update_queues(current);
        }
        self.producer.set_node_consistent(consistent);

        let successors = self.producer.expand(&mut self.ctx, current);
        let mut requeued = 0u64;
        for &successor in &successors {
            if self.ctx.node(successor).needs_update {
                self.update_queues(successor);
                requeued += 1;
            }
        }
        self.stats.total_expansions += 1;

        let branch = if consistent {
            ExpandBranchV1::OverConsistent
        } else {
            ExpandBranchV1::UnderConsistent
        };
        trace!(
            state = ?state,
            primary = %key.primary.canonical_repr(),
            ?branch,
            successors = successors.len(),
            requeued,
            "expanded"
        );
        if let Some(events) = self.events.as_mut() {
            events.push(AdvanceEventV1::Expand(ExpandEventV1 {
                advance_order: order,
                state: format!("{state:?}"),
                key: KeyRecordV1 {
                    primary: key.primary.canonical_repr(),
                    secondary: key.secondary.canonical_repr(),
                },
                branch,
                successors: successors.len() as u64,
                requeued,
            }));
        }
        current
    }

    fn replan_pass(&mut self, order: u64) -> Option<NodeId> {
        self.replan = false;

        let changed: Vec<TransitionOf<P>> =
            std::mem::take(&mut self.transitions_changed).into_iter().collect();
        let repaired =
            self.producer
                .expand_transitions_changed(&mut self.ctx, self.start, &changed);
        for &node in &repaired {
            self.update_queues(node);
        }

        let incons = std::mem::take(&mut self.incons);
        let incons_merged = incons.len() as u64;
        self.open.extend(incons);

        for &node in self.open.values() {
            self.producer.update_key(&mut self.ctx, node);
        }
        let entries: Vec<_> = self
            .open
            .values()
            .map(|&node| (node, self.ctx.node(node).key))
            .collect();
        self.queue.rebuild(entries);
        self.closed.clear();
        self.stats.total_replans += 1;

        let head = self.take_promising();
        debug!(
            epsilon = self.producer.epsilon(),
            transitions_changed = changed.len(),
            repaired = repaired.len(),
            incons_merged,
            open = self.open.len(),
            "replanned"
        );
        if let Some(events) = self.events.as_mut() {
            events.push(AdvanceEventV1::Replan(ReplanEventV1 {
                advance_order: order,
                epsilon: format!("{:?}", self.producer.epsilon()),
                transitions_changed: changed.len() as u64,
                repaired: repaired.len() as u64,
                incons_merged,
                open_after: self.open.len() as u64,
                head_state: head.map(|h| format!("{:?}", self.ctx.node(h).state)),
            }));
        }
        head
    }

    // -----------------------------------------------------------------------
    // Membership bookkeeping
    // -----------------------------------------------------------------------

    fn insert_open(&mut self, node: NodeId) {
        let n = self.ctx.node(node);
        self.open.insert(n.state.clone(), node);
        self.queue.push(node, n.key);
    }

    /// Most promising live queue entry, discarding stale heads.
    fn take_promising(&mut self) -> Option<NodeId> {
        let before = self.queue.stale_skipped();
        let open = &self.open;
        let ctx = &self.ctx;
        let head = self
            .queue
            .peek_live(|id, key| {
                let node = ctx.node(id);
                open.get(&node.state) == Some(&id) && node.key == *key
            })
            .map(|(id, _)| id);
        let skipped = self.queue.stale_skipped() - before;
        if skipped > 0 {
            trace!(skipped, remaining = self.queue.len(), "stale queue entries discarded");
        }
        head
    }

    /// Reconcile `node`'s membership with its values, then clear its flag.
    fn update_queues(&mut self, node: NodeId) {
        let n = self.ctx.node(node);
        let state = n.state.clone();
        if n.is_settled() {
            self.open.remove(&state);
            if self.incons.remove(&state).is_some() {
                self.closed.insert(state, node);
            }
        } else if self.closed.remove(&state).is_some() || self.incons.contains_key(&state) {
            self.incons.insert(state, node);
        } else {
            self.insert_open(node);
        }
        self.ctx.node_mut(node).needs_update = false;
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// The goal with the smallest key (first listed on ties).
    #[must_use]
    pub fn best_goal(&self) -> NodeId {
        let mut best = self.goals[0];
        for &goal in &self.goals[1..] {
            if self.ctx.node(goal).key < self.ctx.node(best).key {
                best = goal;
            }
        }
        best
    }

    /// OPEN: nodes eligible for expansion in the current pass.
    #[must_use]
    pub fn open(&self) -> &MembershipMap<P::State> {
        &self.open
    }

    /// CLOSED: nodes expanded and settled in the current pass.
    #[must_use]
    pub fn closed(&self) -> &MembershipMap<P::State> {
        &self.closed
    }

    /// INCONS: nodes that became inconsistent after being closed.
    #[must_use]
    pub fn incons(&self) -> &MembershipMap<P::State> {
        &self.incons
    }

    /// Goal nodes in construction order.
    #[must_use]
    pub fn goal_nodes(&self) -> &[NodeId] {
        &self.goals
    }

    /// The start node.
    #[must_use]
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Node arena and visited registry.
    #[must_use]
    pub fn context(&self) -> &ContextOf<P> {
        &self.ctx
    }

    /// Borrow a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &AdStarNode<P::State, P::Action, P::Cost> {
        self.ctx.node(id)
    }

    /// Ancestry of `id`, start first.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        self.ctx.path_to(id)
    }

    /// `true` if an epsilon or transition change awaits a replan.
    #[must_use]
    pub fn is_replan_pending(&self) -> bool {
        self.replan
    }

    /// Transitions recorded for the next replan.
    #[must_use]
    pub fn pending_transitions(&self) -> &BTreeSet<TransitionOf<P>> {
        &self.transitions_changed
    }

    /// The producer.
    #[must_use]
    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Mutable access to the producer (e.g. to change domain costs).
    pub fn producer_mut(&mut self) -> &mut P {
        &mut self.producer
    }

    /// Counters, including the queue's.
    #[must_use]
    pub fn stats(&self) -> SearchStatsV1 {
        SearchStatsV1 {
            queue_high_water: self.queue.high_water(),
            stale_entries_skipped: self.queue.stale_skipped(),
            nodes_created: self.ctx.len() as u64,
            ..self.stats
        }
    }

    /// Snapshot of the audit trace, if recording was requested.
    #[must_use]
    pub fn trace(&self) -> Option<SearchTraceV1> {
        let events = self.events.as_ref()?;
        Some(SearchTraceV1 {
            events: events.clone(),
            metadata: SearchTraceMetadataV1 {
                start_state: format!("{:?}", self.ctx.node(self.start).state),
                goal_states: self
                    .goals
                    .iter()
                    .map(|&g| format!("{:?}", self.ctx.node(g).state))
                    .collect(),
                initial_epsilon: format!("{:?}", self.initial_epsilon),
                stats: self.stats(),
            },
        })
    }
}

impl<P: NodeProducer> Iterator for AdStarForward<P> {
    type Item = NodeId;

    /// `None` once [`AdStarForward::has_more_work`] is false.
    fn next(&mut self) -> Option<NodeId> {
        if self.has_more_work() {
            self.advance()
        } else {
            None
        }
    }
}

impl<P: NodeProducer> std::fmt::Debug for AdStarForward<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdStarForward")
            .field("open", &self.open.len())
            .field("closed", &self.closed.len())
            .field("incons", &self.incons.len())
            .field("replan", &self.replan)
            .field("epsilon", &self.producer.epsilon())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
