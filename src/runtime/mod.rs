//! Runtime side of the state machine.
//!
//! Owns the mutable parts: per-key instances, their listeners, the
//! transition engine and the cross-instance queries.
//!
//! # Key Concepts
//!
//! - **Instances**: one current state per [`InstanceKey`](crate::InstanceKey),
//!   plus a shared default instance
//! - **Listeners**: enter/leave callbacks scoped to one instance
//! - **Sinks**: optional best-effort notification of committed changes

mod instance;
mod listener;
mod manager;
mod outcome;
mod query;
mod sink;

pub use listener::{EnterListener, LeaveListener};
pub use manager::StateManager;
pub use outcome::{EnterOutcome, TransitionError};
pub use sink::{ChangeSink, SinkError, StateChange};
