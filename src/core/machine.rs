//! Identity of a state machine definition.

use super::state::State;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of one state machine definition.
///
/// Every [`State`] records the `MachineId` it was authored for, and a
/// [`StateManager`](crate::StateManager) only accepts states carrying its own
/// id. Equality is by the generated id, never by name: two machines called
/// `"door"` are still distinct.
///
/// # Example
///
/// ```rust
/// use keyed_fsm::MachineId;
///
/// let door = MachineId::new("door");
/// let open = door.state("Open");
///
/// assert!(open.belongs_to(&door));
/// assert_ne!(door, MachineId::new("door"));
/// ```
#[derive(Clone)]
pub struct MachineId {
    inner: Arc<MachineIdInner>,
}

struct MachineIdInner {
    id: Uuid,
    name: String,
}

impl MachineId {
    /// Create a fresh machine identity with a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MachineIdInner {
                id: Uuid::new_v4(),
                name: name.into(),
            }),
        }
    }

    /// Author a new state owned by this machine.
    pub fn state(&self, name: impl Into<String>) -> State {
        State::new(name, self)
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl PartialEq for MachineId {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for MachineId {}

impl std::hash::Hash for MachineId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineId")
            .field("name", &self.inner.name)
            .field("id", &self.inner.id)
            .finish()
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}
