//! Anytime run policy: the epsilon schedule and per-pass advance budget.
//!
//! The runner echoes the policy into every report, so the report digest
//! commits to the conditions the run was produced under.

/// Default epsilon schedule: a coarse pass, a tighter pass, then optimal.
const DEFAULT_EPSILON_SCHEDULE: [f64; 3] = [2.5, 1.5, 1.0];
/// Default advance budget per pass.
const DEFAULT_MAX_ADVANCES_PER_PASS: u64 = 1_000_000;

/// Policy for [`crate::runner::run_anytime`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnytimePolicy {
    /// Epsilon values, one pass each, non-increasing.
    pub epsilon_schedule: Vec<f64>,
    /// Advances allowed before a pass is abandoned.
    pub max_advances_per_pass: u64,
}

impl Default for AnytimePolicy {
    fn default() -> Self {
        Self {
            epsilon_schedule: DEFAULT_EPSILON_SCHEDULE.to_vec(),
            max_advances_per_pass: DEFAULT_MAX_ADVANCES_PER_PASS,
        }
    }
}

/// Error validating an [`AnytimePolicy`].
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// The schedule has no passes.
    EmptySchedule,
    /// An epsilon is non-finite or not positive.
    InvalidEpsilon { index: usize, value: f64 },
    /// An epsilon is larger than the one before it.
    IncreasingEpsilon {
        index: usize,
        previous: f64,
        value: f64,
    },
    /// `max_advances_per_pass` is zero.
    ZeroBudget,
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySchedule => write!(f, "epsilon schedule is empty"),
            Self::InvalidEpsilon { index, value } => {
                write!(f, "epsilon[{index}] = {value} is not a positive finite number")
            }
            Self::IncreasingEpsilon {
                index,
                previous,
                value,
            } => write!(
                f,
                "epsilon[{index}] = {value} increases on the previous pass ({previous})"
            ),
            Self::ZeroBudget => write!(f, "max_advances_per_pass must be at least 1"),
        }
    }
}

impl std::error::Error for PolicyError {}

impl AnytimePolicy {
    /// Check the schedule and budget.
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyError`] found.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.epsilon_schedule.is_empty() {
            return Err(PolicyError::EmptySchedule);
        }
        if self.max_advances_per_pass == 0 {
            return Err(PolicyError::ZeroBudget);
        }
        let mut previous: Option<f64> = None;
        for (index, &value) in self.epsilon_schedule.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(PolicyError::InvalidEpsilon { index, value });
            }
            if let Some(previous) = previous {
                if value > previous {
                    return Err(PolicyError::IncreasingEpsilon {
                        index,
                        previous,
                        value,
                    });
                }
            }
            previous = Some(value);
        }
        Ok(())
    }

    /// JSON echo of the policy, epsilons as canonical strings.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "epsilon_schedule": self
                .epsilon_schedule
                .iter()
                .map(|e| format!("{e:?}"))
                .collect::<Vec<_>>(),
            "max_advances_per_pass": self.max_advances_per_pass,
        })
    }
}
