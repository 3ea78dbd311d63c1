//! Core value types of the state machine runtime.
//!
//! This module contains the plain data the runtime is built from:
//! - Machine identities and the states they own
//! - Instance keys selecting per-owner instances
//! - The transition journal
//!
//! Nothing in here holds runtime state or fires callbacks.

mod history;
mod key;
mod machine;
mod state;

pub(crate) use key::KeyLabel;

pub use history::{StateHistory, TransitionRecord};
pub use key::InstanceKey;
pub use machine::MachineId;
pub use state::State;
