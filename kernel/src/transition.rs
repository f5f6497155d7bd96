//! Transitions between states.

/// A directed edge `from → to`, optionally labelled with an action.
///
/// `from` is `None` only for the synthetic transition that introduces a
/// search root. The cost of a transition is never stored here; it is
/// evaluated by the domain on demand, which is what lets costs change
/// between replanning passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition<S, A> {
    /// Originating state (`None` for a root).
    pub from: Option<S>,
    /// Destination state.
    pub to: S,
    /// Action label, if the domain has explicit actions.
    pub action: Option<A>,
}

impl<S, A> Transition<S, A> {
    /// Edge `from → to` without an action label.
    #[must_use]
    pub fn new(from: S, to: S) -> Self {
        Self {
            from: Some(from),
            to,
            action: None,
        }
    }

    /// Edge `from → to` labelled with `action`.
    #[must_use]
    pub fn with_action(from: S, to: S, action: A) -> Self {
        Self {
            from: Some(from),
            to,
            action: Some(action),
        }
    }

    /// Synthetic root transition introducing `state`.
    #[must_use]
    pub fn root(state: S) -> Self {
        Self {
            from: None,
            to: state,
            action: None,
        }
    }
}
