//! Results of transition attempts.

use crate::core::State;
use thiserror::Error;

/// Reasons a transition was rejected.
///
/// These are reported, never raised: the instance keeps its current state and
/// the caller receives [`EnterOutcome::Rejected`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot enter a null state")]
    NullTargetState,

    #[error("state '{state}' is controlled by machine '{owner}', not '{machine}'")]
    OwnershipMismatch {
        state: String,
        owner: String,
        machine: String,
    },
}

/// Result of asking an instance to enter a state.
#[derive(Debug, Clone, PartialEq)]
pub enum EnterOutcome {
    /// The transition was committed and listeners were notified
    Entered { from: Option<State>, to: State },

    /// The instance already was in the target state; nothing fired
    Unchanged,

    /// The transition was refused; the instance is unchanged
    Rejected(TransitionError),
}

impl EnterOutcome {
    pub fn is_entered(&self) -> bool {
        matches!(self, Self::Entered { .. })
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn error(&self) -> Option<&TransitionError> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }
}
