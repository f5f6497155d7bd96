//! AD* harness: worlds, a reference oracle and the anytime runner.
//!
//! The harness drives `adstar_search` through its public protocol and
//! packages the outcome as an auditable report. It does NOT implement search
//! logic; worlds provide domain data only and the runner owns orchestration.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod policy;
pub mod reference;
pub mod runner;
pub mod worlds;
