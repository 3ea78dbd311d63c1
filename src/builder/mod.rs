//! Builder API for configuring state managers.
//!
//! All configuration of a [`StateManager`](crate::StateManager) happens here:
//! initial state, registered states, debug logging, change sink and the
//! transition journal.

pub mod error;
pub mod manager;

pub use error::BuildError;
pub use manager::StateManagerBuilder;
