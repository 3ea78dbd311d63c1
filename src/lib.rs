//! keyed-fsm: keyed, instanced finite state machines
//!
//! One [`StateManager`] holds a state machine definition and tracks an
//! independent current state for every owner [`InstanceKey`], plus a shared
//! default instance for callers without a key. Instances broadcast leave and
//! enter notifications to their own listeners, always leave before enter.
//!
//! # Core Concepts
//!
//! - **MachineId**: identity of a definition; it authors the states it owns
//! - **State**: identity-compared handle; only the owning machine accepts it
//! - **InstanceKey**: selects an instance, `None` selects the default one
//! - **Observers**: derived "active/inactive" tracking over a set of states
//! - **Checkpoints**: serializable snapshots of every instance's state
//!
//! Invalid requests are logged through `tracing` and reported as values, so a
//! misconfigured caller never brings down the rest of the system.
//!
//! # Example
//!
//! ```rust
//! use keyed_fsm::{EnterOutcome, InstanceKey, MachineId, State, StateManager};
//! use std::sync::{Arc, Mutex};
//!
//! let machine = MachineId::new("job");
//! let idle = machine.state("Idle");
//! let running = machine.state("Running");
//! let done = machine.state("Done");
//!
//! let manager = StateManager::builder(machine)
//!     .initial(idle.clone())
//!     .states([running.clone(), done.clone()])
//!     .build()
//!     .unwrap();
//!
//! let job = Some(InstanceKey::new());
//! manager.init(job);
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&log);
//! manager.add_enter_listener(
//!     Arc::new(move |s: &State| sink.lock().unwrap().push(s.name().to_string())),
//!     job,
//! );
//!
//! assert!(matches!(manager.enter(&running, job), EnterOutcome::Entered { .. }));
//! manager.enter_all(&done);
//!
//! assert!(manager.all_instances_in_either_state(&[done.clone()]));
//! assert_eq!(*log.lock().unwrap(), vec!["Running", "Done"]);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod observer;
pub mod runtime;

// Re-export commonly used types
pub use builder::{BuildError, StateManagerBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{InstanceKey, MachineId, State, StateHistory, TransitionRecord};
pub use runtime::{
    ChangeSink, EnterListener, EnterOutcome, LeaveListener, SinkError, StateChange, StateManager,
    TransitionError,
};
