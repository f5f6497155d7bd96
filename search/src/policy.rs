//! Search configuration.

use crate::error::SearchError;

/// Whether the driver records a [`crate::trace::SearchTraceV1`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceModeV1 {
    /// No trace is kept.
    #[default]
    Off,
    /// Every advance appends an event.
    Record,
}

/// Configuration for an expander/driver pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AdStarPolicy {
    /// Heuristic inflation for the first pass. Values below 1 are accepted
    /// (they weaken the heuristic) but must be finite and positive.
    pub initial_epsilon: f64,
    /// Audit trace recording.
    pub trace: TraceModeV1,
}

/// Accept only finite, strictly positive epsilons.
pub(crate) fn check_epsilon(value: f64) -> Result<(), SearchError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SearchError::InvalidEpsilon { value });
    }
    Ok(())
}

impl AdStarPolicy {
    /// Reject epsilons that would break key ordering.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidEpsilon`] for `NaN`, infinite, zero or
    /// negative values.
    pub fn validate(&self) -> Result<(), SearchError> {
        check_epsilon(self.initial_epsilon)
    }

    /// Same policy with a different initial epsilon.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.initial_epsilon = epsilon;
        self
    }

    /// Same policy with trace recording on.
    #[must_use]
    pub fn recording(mut self) -> Self {
        self.trace = TraceModeV1::Record;
        self
    }
}

impl Default for AdStarPolicy {
    fn default() -> Self {
        Self {
            initial_epsilon: 1.0,
            trace: TraceModeV1::Off,
        }
    }
}
