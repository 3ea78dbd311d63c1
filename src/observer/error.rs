//! Observer configuration errors.

use thiserror::Error;

/// Ways a [`StateObserver`](super::StateObserver) can be misconfigured.
///
/// A misconfigured observer disables itself instead of failing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObserverError {
    #[error("There are no active states defined")]
    NoActiveStates,

    #[error("State '{state}' belongs to machine '{found}', other states to '{expected}'")]
    MixedMachines {
        state: String,
        expected: String,
        found: String,
    },

    #[error("Active states belong to machine '{found}', but the observer is attached to '{expected}'")]
    ForeignMachine { expected: String, found: String },
}
