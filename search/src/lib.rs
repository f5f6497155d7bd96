//! AD* search: anytime, dynamically repairable best-first search.
//!
//! This crate provides the search layer. It depends only on `adstar_kernel`
//! and does NOT depend on `adstar_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! adstar_kernel  ←  adstar_search  ←  adstar_harness
//! (cost, hashing)   (driver, nodes)    (worlds, runner)
//! ```
//!
//! # Key types
//!
//! - [`AdStarForward`] — the pull-based driver (`has_more_work` / `advance`)
//! - [`NodeProducer`] — creates, revalues and expands nodes for the driver
//! - [`AdStarExpander`] — default producer over any [`SearchDomain`]
//! - [`SearchContext`] — per-search node arena and visited registry
//! - [`SearchTraceV1`] — advance-event audit log with canonical digest
//! - [`AdStarPolicy`] — initial epsilon and trace mode

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod contract;
pub mod error;
pub mod expander;
pub mod frontier;
pub mod node;
pub mod policy;
pub mod producer;
pub mod search;
pub mod trace;

pub use context::SearchContext;
pub use contract::SearchDomain;
pub use error::SearchError;
pub use expander::AdStarExpander;
pub use node::{AdStarNode, Key, NodeId};
pub use policy::{AdStarPolicy, TraceModeV1};
pub use producer::NodeProducer;
pub use search::AdStarForward;
pub use trace::{SearchStatsV1, SearchTraceV1};
