//! Best-effort change notification for external integrations.
//!
//! A sink is told about every committed transition, for example to replicate,
//! persist or count state changes. Sink failures never roll back a
//! transition.

use crate::core::InstanceKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A committed state change as seen by a [`ChangeSink`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub machine: String,
    pub state: String,
    pub key: Option<InstanceKey>,
}

/// Error reported by a [`ChangeSink`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("change sink failed: {0}")]
pub struct SinkError(pub String);

/// Receiver of committed state changes.
pub trait ChangeSink: Send + Sync {
    fn state_entered(&self, change: &StateChange) -> Result<(), SinkError>;
}
