//! Uniform-cost reference solver.
//!
//! An independent oracle for the driver: plain Dijkstra over the same
//! [`SearchDomain`], ignoring the heuristic. Transitions at the maximal cost
//! are treated as absent.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use adstar_kernel::cost::Cost;
use adstar_search::contract::SearchDomain;

/// Cheapest path to any goal.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSolution<S, C> {
    /// Total cost.
    pub cost: C,
    /// States from start to goal inclusive.
    pub path: Vec<S>,
}

/// Heap entry ordered by cost, then insertion order.
struct Entry<S, C> {
    cost: C,
    seq: u64,
    state: S,
}

impl<S, C: Cost> PartialEq for Entry<S, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S, C: Cost> Eq for Entry<S, C> {}

impl<S, C: Cost> PartialOrd for Entry<S, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S, C: Cost> Ord for Entry<S, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp_cost(&other.cost)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Dijkstra from `start` to the nearest of `goals`.
///
/// Returns `None` when no goal is reachable.
pub fn uniform_cost<D: SearchDomain>(
    domain: &D,
    start: &D::State,
    goals: &[D::State],
) -> Option<ReferenceSolution<D::State, D::Cost>> {
    let goals: BTreeSet<&D::State> = goals.iter().collect();
    let mut best: BTreeMap<D::State, D::Cost> = BTreeMap::new();
    let mut parent: BTreeMap<D::State, D::State> = BTreeMap::new();
    let mut settled: BTreeSet<D::State> = BTreeSet::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    best.insert(start.clone(), D::Cost::identity());
    heap.push(Reverse(Entry {
        cost: D::Cost::identity(),
        seq,
        state: start.clone(),
    }));

    while let Some(Reverse(entry)) = heap.pop() {
        let state = entry.state;
        if !settled.insert(state.clone()) {
            continue;
        }
        if goals.contains(&state) {
            return Some(ReferenceSolution {
                cost: entry.cost,
                path: reconstruct(&parent, state),
            });
        }
        for transition in domain.successors(&state) {
            let step = domain.cost(&transition);
            if step.is_max() || settled.contains(&transition.to) {
                continue;
            }
            let candidate = entry.cost.combine(step);
            if candidate.is_max() {
                continue;
            }
            let improves = match best.get(&transition.to) {
                Some(known) => candidate.cmp_cost(known) == Ordering::Less,
                None => true,
            };
            if improves {
                best.insert(transition.to.clone(), candidate);
                parent.insert(transition.to.clone(), state.clone());
                seq += 1;
                heap.push(Reverse(Entry {
                    cost: candidate,
                    seq,
                    state: transition.to,
                }));
            }
        }
    }
    None
}

fn reconstruct<S: Clone + Ord>(parent: &BTreeMap<S, S>, goal: S) -> Vec<S> {
    let mut path = vec![goal];
    while let Some(previous) = path.last().and_then(|s| parent.get(s)) {
        path.push(previous.clone());
        if path.len() > parent.len() + 1 {
            break;
        }
    }
    path.reverse();
    path
}
