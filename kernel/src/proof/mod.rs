//! Audit artifacts: canonical JSON bytes and content hashing.

pub mod canon;
pub mod hash;
