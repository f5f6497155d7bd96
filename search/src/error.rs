//! Typed search errors.
//!
//! Only misuse is reported. Domain-contract violations (inadmissible
//! heuristics, non-monotonic costs, a producer that forgets to flag a node)
//! are not detectable here and simply yield worse paths.

/// Misuse of the search driver or its configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The driver was constructed without any goal state.
    EmptyGoalSet,
    /// An operation outside the driver protocol was attempted.
    UnsupportedOperation { operation: &'static str },
    /// An epsilon is not finite and strictly positive.
    InvalidEpsilon { value: f64 },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyGoalSet => write!(f, "search requires at least one goal state"),
            Self::UnsupportedOperation { operation } => {
                write!(f, "unsupported operation on search sequence: {operation}")
            }
            Self::InvalidEpsilon { value } => {
                write!(f, "epsilon must be finite and > 0, got {value}")
            }
        }
    }
}

impl std::error::Error for SearchError {}
