//! State handles owned by a machine definition.
//!
//! States are authored once, cloned freely and compared by identity.

use super::machine::MachineId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// A named node of a state machine definition.
///
/// Cloning a `State` is cheap and yields the same state. Equality and hashing
/// use the identity assigned at creation, so two states that happen to share
/// a name are never interchangeable.
///
/// # Example
///
/// ```rust
/// use keyed_fsm::{MachineId, State};
///
/// let machine = MachineId::new("task");
/// let running = State::new("Running", &machine);
/// let impostor = State::new("Running", &machine);
///
/// assert_eq!(running, running.clone());
/// assert_ne!(running, impostor);
/// assert!(running.belongs_to(&machine));
/// ```
#[derive(Clone)]
pub struct State {
    inner: Arc<StateInner>,
}

struct StateInner {
    id: Uuid,
    name: String,
    machine: MachineId,
}

impl State {
    /// Create a new state owned by `machine`.
    ///
    /// The owner is fixed for the lifetime of the state.
    pub fn new(name: impl Into<String>, machine: &MachineId) -> Self {
        Self {
            inner: Arc::new(StateInner {
                id: Uuid::new_v4(),
                name: name.into(),
                machine: machine.clone(),
            }),
        }
    }

    /// Get the state's name for display/logging.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// The machine definition this state was authored for.
    pub fn machine(&self) -> &MachineId {
        &self.inner.machine
    }

    /// Check if this state is controlled by `machine`.
    pub fn belongs_to(&self, machine: &MachineId) -> bool {
        self.inner.machine == *machine
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({}::{})", self.inner.machine.name(), self.inner.name)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}
