//! Lazily-cleaned priority queue over node keys.
//!
//! Nodes leave OPEN through membership updates that never touch the heap, and
//! their keys move on in place. Instead of removing arbitrary entries, every
//! read discards stale heads: entries whose node is no longer in OPEN, or
//! whose recorded key no longer matches the node's live key (a fresher entry
//! for the same node was pushed since). Push and pop stay `O(log n)`
//! amortised.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use adstar_kernel::cost::Cost;

use crate::node::{Key, NodeId};

/// A queue entry: the key at push time, a push sequence number, the node.
///
/// `BinaryHeap` is a max-heap, so entries are wrapped in `Reverse` to pop the
/// lowest key first. The sequence number breaks key ties in push order, which
/// keeps expansion order deterministic.
#[derive(Debug, Clone, Copy)]
struct QueueEntry<C> {
    key: Key<C>,
    seq: u64,
    node: NodeId,
}

impl<C: Cost> PartialEq for QueueEntry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl<C: Cost> Eq for QueueEntry<C> {}

impl<C: Cost> PartialOrd for QueueEntry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Cost> Ord for QueueEntry<C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key).then(self.seq.cmp(&other.seq))
    }
}

/// Min-priority queue with lazy deletion.
#[derive(Debug, Clone)]
pub struct LazyQueue<C> {
    heap: BinaryHeap<Reverse<QueueEntry<C>>>,
    next_seq: u64,
    high_water: u64,
    stale_skipped: u64,
}

impl<C: Cost> LazyQueue<C> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            high_water: 0,
            stale_skipped: 0,
        }
    }

    /// Push `node` with its current `key`.
    pub fn push(&mut self, node: NodeId, key: Key<C>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(QueueEntry { key, seq, node }));
        let size = self.heap.len() as u64;
        if size > self.high_water {
            self.high_water = size;
        }
    }

    /// Return the best live entry without removing it.
    ///
    /// `is_live(node, key)` decides whether an entry is still valid; invalid
    /// heads are popped and counted until a live one surfaces.
    pub fn peek_live<F>(&mut self, mut is_live: F) -> Option<(NodeId, Key<C>)>
    where
        F: FnMut(NodeId, &Key<C>) -> bool,
    {
        while let Some(&Reverse(head)) = self.heap.peek() {
            if is_live(head.node, &head.key) {
                return Some((head.node, head.key));
            }
            self.heap.pop();
            self.stale_skipped += 1;
        }
        None
    }

    /// Remove the head entry, live or not.
    ///
    /// Call right after [`LazyQueue::peek_live`] to consume the entry it
    /// returned.
    pub fn pop(&mut self) -> Option<(NodeId, Key<C>)> {
        self.heap.pop().map(|Reverse(e)| (e.node, e.key))
    }

    /// Replace the contents with `entries` in one heapify pass.
    pub fn rebuild<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (NodeId, Key<C>)>,
    {
        let mut items = Vec::new();
        for (node, key) in entries {
            let seq = self.next_seq;
            self.next_seq += 1;
            items.push(Reverse(QueueEntry { key, seq, node }));
        }
        self.heap = BinaryHeap::from(items);
        let size = self.heap.len() as u64;
        if size > self.high_water {
            self.high_water = size;
        }
    }

    /// Raw entry count, stale entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// `true` if there are no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest raw size ever reached.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    /// Number of stale entries discarded by reads.
    #[must_use]
    pub fn stale_skipped(&self) -> u64 {
        self.stale_skipped
    }
}

impl<C: Cost> Default for LazyQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
