//! Anytime runner: drives an [`AdStarForward`] through an epsilon schedule
//! and packages one summary per pass into an auditable report.
//!
//! # Pipeline
//!
//! ```text
//! policy.validate()
//!   → for each epsilon: set_epsilon() → converge() → summarize()
//!   → trace digest (if recorded) → AnytimeReportV1 → canonical JSON → digest
//! ```
//!
//! The runner only uses the driver's public protocol. It does not touch
//! OPEN/CLOSED/INCONS and never evaluates costs itself.

use adstar_kernel::cost::Cost;
use adstar_kernel::proof::canon::{canonical_json_bytes, CanonError};
use adstar_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use adstar_search::error::SearchError;
use adstar_search::producer::NodeProducer;
use adstar_search::search::AdStarForward;
use adstar_search::trace::SearchStatsV1;
use tracing::{info, warn};

use crate::policy::{AnytimePolicy, PolicyError};

/// Error during an anytime run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerError {
    /// The policy failed validation.
    Policy(PolicyError),
    /// A pass did not converge within its advance budget.
    BudgetExhausted { epsilon: f64, advances: u64 },
    /// The driver rejected a schedule entry.
    Search(SearchError),
    /// Canonical JSON serialization failed.
    Canon(CanonError),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Policy(e) => write!(f, "invalid policy: {e}"),
            Self::BudgetExhausted { epsilon, advances } => write!(
                f,
                "pass at epsilon {epsilon} did not converge within {advances} advances"
            ),
            Self::Search(e) => write!(f, "driver rejected the schedule: {e}"),
            Self::Canon(e) => write!(f, "report serialization failed: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {}

impl From<PolicyError> for RunnerError {
    fn from(e: PolicyError) -> Self {
        Self::Policy(e)
    }
}

impl From<SearchError> for RunnerError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

impl From<CanonError> for RunnerError {
    fn from(e: CanonError) -> Self {
        Self::Canon(e)
    }
}

/// Result of one converged pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummaryV1<C> {
    pub pass_index: u64,
    pub epsilon: f64,
    /// Advances spent in this pass (the replan included).
    pub advances: u64,
    pub expansions: u64,
    /// Best goal at convergence.
    pub goal_state: String,
    /// Its g-value; maximal when no goal is reachable.
    pub cost: C,
    /// States from start to goal; empty when unreachable.
    pub path: Vec<String>,
}

impl<C: Cost> PassSummaryV1<C> {
    /// `true` if the best goal has a finite cost.
    #[must_use]
    pub fn reachable(&self) -> bool {
        !self.cost.is_max()
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "advances": self.advances,
            "cost": self.cost.canonical_repr(),
            "epsilon": format!("{:?}", self.epsilon),
            "expansions": self.expansions,
            "goal_state": self.goal_state,
            "pass_index": self.pass_index,
            "path": self.path,
            "reachable": self.reachable(),
        })
    }
}

/// Report of a full anytime run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnytimeReportV1<C> {
    /// Policy the run was produced under.
    pub policy: AnytimePolicy,
    /// One summary per schedule entry, in order.
    pub passes: Vec<PassSummaryV1<C>>,
    /// Driver counters at the end of the run.
    pub stats: SearchStatsV1,
    /// Digest of the driver's trace, if it recorded one.
    pub trace_digest: Option<ContentHash>,
}

impl<C: Cost> AnytimeReportV1<C> {
    /// Cost after the last pass.
    #[must_use]
    pub fn final_cost(&self) -> Option<C> {
        self.passes.last().map(|p| p.cost)
    }

    /// `true` if no pass ended with a higher cost than the one before.
    #[must_use]
    pub fn costs_non_increasing(&self) -> bool {
        self.passes
            .windows(2)
            .all(|w| w[1].cost.cmp_cost(&w[0].cost) != std::cmp::Ordering::Greater)
    }

    /// Serialize to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        let value = serde_json::json!({
            "passes": self.passes.iter().map(PassSummaryV1::to_json_value).collect::<Vec<_>>(),
            "policy": self.policy.to_json_value(),
            "stats": {
                "nodes_created": self.stats.nodes_created,
                "queue_high_water": self.stats.queue_high_water,
                "stale_entries_skipped": self.stats.stale_entries_skipped,
                "total_advances": self.stats.total_advances,
                "total_expansions": self.stats.total_expansions,
                "total_replans": self.stats.total_replans,
            },
            "trace_digest": self.trace_digest.as_ref().map(ContentHash::as_str),
        });
        canonical_json_bytes(&value)
    }

    /// Content hash of the canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::RunReport, &bytes))
    }
}

/// Advance until `has_more_work()` is false.
///
/// Returns the number of advances spent.
///
/// # Errors
///
/// Returns [`RunnerError::BudgetExhausted`] if work remains after
/// `max_advances` advances.
pub fn converge<P: NodeProducer>(
    driver: &mut AdStarForward<P>,
    max_advances: u64,
) -> Result<u64, RunnerError> {
    let mut advances = 0u64;
    while driver.has_more_work() {
        if advances == max_advances {
            return Err(RunnerError::BudgetExhausted {
                epsilon: driver.epsilon(),
                advances,
            });
        }
        driver.advance();
        advances += 1;
    }
    Ok(advances)
}

/// Snapshot the best goal after a pass.
#[must_use]
pub fn summarize<P: NodeProducer>(
    driver: &AdStarForward<P>,
    pass_index: u64,
    advances: u64,
    expansions: u64,
) -> PassSummaryV1<P::Cost> {
    let goal = driver.best_goal();
    let node = driver.node(goal);
    let path = if node.g.is_max() {
        Vec::new()
    } else {
        driver
            .context()
            .states_to(goal)
            .iter()
            .map(|s| format!("{s:?}"))
            .collect()
    };
    PassSummaryV1 {
        pass_index,
        epsilon: driver.epsilon(),
        advances,
        expansions,
        goal_state: format!("{:?}", node.state),
        cost: node.g,
        path,
    }
}

/// Run every pass of `policy` on `driver`.
///
/// The first pass only changes epsilon if the driver's current value
/// differs from the schedule's first entry.
///
/// # Errors
///
/// Returns [`RunnerError`] if the policy is invalid, a pass exhausts its
/// budget, or the trace digest cannot be computed.
pub fn run_anytime<P: NodeProducer>(
    driver: &mut AdStarForward<P>,
    policy: &AnytimePolicy,
) -> Result<AnytimeReportV1<P::Cost>, RunnerError> {
    policy.validate()?;

    let mut passes = Vec::with_capacity(policy.epsilon_schedule.len());
    for (index, &epsilon) in policy.epsilon_schedule.iter().enumerate() {
        let pass_index = index as u64;
        if index > 0 || driver.epsilon().to_bits() != epsilon.to_bits() {
            driver.set_epsilon(epsilon)?;
        }
        let expansions_before = driver.stats().total_expansions;
        let advances = match converge(driver, policy.max_advances_per_pass) {
            Ok(advances) => advances,
            Err(e) => {
                warn!(pass = pass_index, epsilon, "pass abandoned: {e}");
                return Err(e);
            }
        };
        let expansions = driver.stats().total_expansions - expansions_before;
        let summary = summarize(driver, pass_index, advances, expansions);
        info!(
            pass = pass_index,
            epsilon,
            advances,
            expansions,
            cost = %summary.cost.canonical_repr(),
            "pass converged"
        );
        passes.push(summary);
    }

    let trace_digest = driver.trace().map(|t| t.digest()).transpose()?;
    Ok(AnytimeReportV1 {
        policy: policy.clone(),
        passes,
        stats: driver.stats(),
        trace_digest,
    })
}
