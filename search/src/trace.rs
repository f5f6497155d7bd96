//! `SearchTraceV1`: advance-event audit log.
//!
//! The normative surface is the ordered list of [`AdvanceEventV1`] entries,
//! one per `advance()` call. States are recorded by their `Debug` form and
//! costs by `Cost::canonical_repr`, so the trace serialises to integer-only
//! canonical JSON and hashes reproducibly.

use adstar_kernel::proof::canon::{canonical_json_bytes, CanonError};
use adstar_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// The complete trace of one driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTraceV1 {
    /// Ordered advance events.
    pub events: Vec<AdvanceEventV1>,
    /// Problem echo and counters.
    pub metadata: SearchTraceMetadataV1,
}

/// One `advance()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceEventV1 {
    /// A node was taken from OPEN and expanded.
    Expand(ExpandEventV1),
    /// A replanning pass rebuilt the queue.
    Replan(ReplanEventV1),
}

/// An expansion-branch advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandEventV1 {
    /// Position in the sequence of advances.
    pub advance_order: u64,
    /// Expanded state.
    pub state: String,
    /// Key at the time the node was taken.
    pub key: KeyRecordV1,
    /// Which update rule the expansion used.
    pub branch: ExpandBranchV1,
    /// Successors generated.
    pub successors: u64,
    /// Successors whose membership was updated.
    pub requeued: u64,
}

/// A replanning-branch advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplanEventV1 {
    pub advance_order: u64,
    /// Epsilon the queue was rebuilt under.
    pub epsilon: String,
    /// Changed transitions consumed by this pass.
    pub transitions_changed: u64,
    /// Nodes revalued by the changed-transition repair.
    pub repaired: u64,
    /// INCONS members moved back into OPEN.
    pub incons_merged: u64,
    /// OPEN size after the rebuild.
    pub open_after: u64,
    /// Queue head after the rebuild, if any.
    pub head_state: Option<String>,
}

/// A key rendered with canonical cost strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecordV1 {
    pub primary: String,
    pub secondary: String,
}

/// Update rule chosen for an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandBranchV1 {
    /// `v > g`: the node was settled and closed.
    OverConsistent,
    /// `v <= g`: `v` was reset to the maximal cost and the node re-queued.
    UnderConsistent,
}

/// Driver counters, kept whether or not a trace is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStatsV1 {
    pub total_advances: u64,
    pub total_expansions: u64,
    pub total_replans: u64,
    pub queue_high_water: u64,
    pub stale_entries_skipped: u64,
    pub nodes_created: u64,
}

/// Problem echo plus final counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTraceMetadataV1 {
    pub start_state: String,
    pub goal_states: Vec<String>,
    pub initial_epsilon: String,
    pub stats: SearchStatsV1,
}

// ---------------------------------------------------------------------------
// Canonical JSON serialization
// ---------------------------------------------------------------------------

impl SearchTraceV1 {
    /// Serialize to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content hash of the canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::SearchTrace, &bytes))
    }

    /// Number of expansion events.
    #[must_use]
    pub fn expansion_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AdvanceEventV1::Expand(_)))
            .count()
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "events": self.events.iter().map(event_to_json).collect::<Vec<_>>(),
            "metadata": metadata_to_json(&self.metadata),
        })
    }
}

fn event_to_json(e: &AdvanceEventV1) -> serde_json::Value {
    match e {
        AdvanceEventV1::Expand(x) => serde_json::json!({
            "advance_order": x.advance_order,
            "branch": branch_str(x.branch),
            "key": {
                "primary": x.key.primary,
                "secondary": x.key.secondary,
            },
            "requeued": x.requeued,
            "state": x.state,
            "successors": x.successors,
            "type": "expand",
        }),
        AdvanceEventV1::Replan(r) => serde_json::json!({
            "advance_order": r.advance_order,
            "epsilon": r.epsilon,
            "head_state": r.head_state,
            "incons_merged": r.incons_merged,
            "open_after": r.open_after,
            "repaired": r.repaired,
            "transitions_changed": r.transitions_changed,
            "type": "replan",
        }),
    }
}

fn branch_str(b: ExpandBranchV1) -> &'static str {
    match b {
        ExpandBranchV1::OverConsistent => "over_consistent",
        ExpandBranchV1::UnderConsistent => "under_consistent",
    }
}

fn metadata_to_json(m: &SearchTraceMetadataV1) -> serde_json::Value {
    serde_json::json!({
        "goal_states": m.goal_states,
        "initial_epsilon": m.initial_epsilon,
        "nodes_created": m.stats.nodes_created,
        "queue_high_water": m.stats.queue_high_water,
        "stale_entries_skipped": m.stats.stale_entries_skipped,
        "start_state": m.start_state,
        "total_advances": m.stats.total_advances,
        "total_expansions": m.stats.total_expansions,
        "total_replans": m.stats.total_replans,
    })
}
