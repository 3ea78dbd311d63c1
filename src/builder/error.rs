//! Build errors for the state manager builder.

use thiserror::Error;

/// Errors that can occur when building a state manager.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state '{state}' belongs to machine '{owner}', not '{machine}'")]
    ForeignInitialState {
        state: String,
        owner: String,
        machine: String,
    },

    #[error("State '{state}' belongs to machine '{owner}', not '{machine}'")]
    ForeignState {
        state: String,
        owner: String,
        machine: String,
    },

    #[error("State name '{name}' is registered more than once")]
    DuplicateStateName { name: String },
}
