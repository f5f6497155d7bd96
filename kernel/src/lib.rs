//! AD* kernel: the value model shared by the search core and the harness.
//!
//! # Modules
//!
//! - [`cost`] -- the cost algebra (`Cost`: combine, identity, maximal element)
//! - [`transition`] -- directed edges between caller-defined states
//! - [`proof`] -- canonical JSON and domain-separated SHA-256 digests for
//!   audit artifacts (search traces, run reports)
//!
//! The kernel knows nothing about OPEN/CLOSED/INCONS; that lives in
//! `adstar_search`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cost;
pub mod proof;
pub mod transition;
