//! Checkpoint and restore of instance states.
//!
//! A checkpoint captures which state every instance of a manager is in, so a
//! session can be resumed after a restart. Listeners are runtime wiring and
//! are not part of it.

use crate::core::{InstanceKey, State, StateHistory};
use crate::StateManager;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// State of one keyed instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceCheckpoint {
    pub key: InstanceKey,

    /// Name of the current state, `None` while uninitialized
    pub state: Option<String>,
}

/// Serializable checkpoint of a state manager.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Name of the machine the checkpoint was taken from
    pub machine: String,

    /// Current state of the default instance
    pub default_state: Option<String>,

    /// Keyed instances, sorted by key
    pub instances: Vec<InstanceCheckpoint>,

    /// Transition journal, when recording was enabled
    pub history: Option<StateHistory>,
}

impl Checkpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl StateManager {
    /// Capture the current state of every instance.
    pub fn checkpoint(&self) -> Checkpoint {
        let state_name = |state: Option<State>| state.map(|s| s.name().to_string());

        let instances = self
            .store
            .keys()
            .into_iter()
            .map(|key| InstanceCheckpoint {
                key,
                state: state_name(self.current_state(Some(key))),
            })
            .collect();

        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            machine: self.machine().name().to_string(),
            default_state: state_name(self.current_state(None)),
            instances,
            history: self.history(),
        }
    }

    /// Put every instance back into the state recorded in `checkpoint`.
    ///
    /// States are resolved by name among the registered states. Nothing is
    /// changed unless every name resolves. Listeners and the change sink are
    /// not notified. Instances that are not in the checkpoint keep their
    /// state. A recorded journal replaces this manager's journal, trimmed to
    /// this manager's limit. Returns the number of keyed instances restored.
    pub fn restore(&self, checkpoint: &Checkpoint) -> Result<usize, CheckpointError> {
        checkpoint.check_version()?;
        if checkpoint.machine != self.machine().name() {
            return Err(CheckpointError::MachineMismatch {
                expected: self.machine().name().to_string(),
                found: checkpoint.machine.clone(),
            });
        }

        let default_state = self.resolve_name(checkpoint.default_state.as_deref())?;
        let instances = checkpoint
            .instances
            .iter()
            .map(|i| -> Result<_, CheckpointError> {
                Ok((i.key, self.resolve_name(i.state.as_deref())?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.store.resolve(None).set_current(default_state);
        for (key, state) in &instances {
            self.store.resolve(Some(*key)).set_current(state.clone());
        }

        if let (Some(history), Some(saved)) = (&self.history, &checkpoint.history) {
            history.lock().replace_records(saved);
        }

        if self.is_debug_log() {
            tracing::debug!(
                machine = %self.machine(),
                "Restored {} instances from checkpoint {}",
                instances.len(),
                checkpoint.id
            );
        }
        Ok(instances.len())
    }

    fn resolve_name(&self, name: Option<&str>) -> Result<Option<State>, CheckpointError> {
        match name {
            None => Ok(None),
            Some(name) => self
                .state_named(name)
                .cloned()
                .map(Some)
                .ok_or_else(|| CheckpointError::UnknownState(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MachineId;

    fn manager(machine: &MachineId) -> StateManager {
        StateManager::builder(machine.clone())
            .initial(machine.state("Idle"))
            .state(machine.state("Busy"))
            .build()
            .unwrap()
    }

    #[test]
    fn checkpoint_captures_all_instances() {
        let machine = MachineId::new("worker");
        let manager = manager(&machine);
        let key = InstanceKey::new();
        manager.init(None);
        manager.init(Some(key));
        let busy = manager.state_named("Busy").cloned().unwrap();
        manager.enter(&busy, Some(key));

        let checkpoint = manager.checkpoint();

        assert_eq!(checkpoint.version, CHECKPOINT_VERSION);
        assert_eq!(checkpoint.machine, "worker");
        assert_eq!(checkpoint.default_state.as_deref(), Some("Idle"));
        assert_eq!(
            checkpoint.instances,
            vec![InstanceCheckpoint {
                key,
                state: Some("Busy".to_string())
            }]
        );
        assert!(checkpoint.history.is_none());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let machine = MachineId::new("worker");
        let mut checkpoint = manager(&machine).checkpoint();
        checkpoint.version = CHECKPOINT_VERSION + 1;

        let json = checkpoint.to_json().unwrap();
        let result = Checkpoint::from_json(&json);

        assert!(matches!(
            result,
            Err(CheckpointError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn restore_rejects_other_machine() {
        let source = manager(&MachineId::new("worker"));
        let target = manager(&MachineId::new("printer"));

        let result = target.restore(&source.checkpoint());

        assert!(matches!(result, Err(CheckpointError::MachineMismatch { .. })));
    }

    #[test]
    fn restore_rejects_unknown_state_without_changes() {
        let machine = MachineId::new("worker");
        let manager = manager(&machine);
        manager.init(None);
        let mut checkpoint = manager.checkpoint();
        checkpoint.default_state = Some("Busy".to_string());
        checkpoint.instances.push(InstanceCheckpoint {
            key: InstanceKey::new(),
            state: Some("Sleeping".to_string()),
        });

        let result = manager.restore(&checkpoint);

        assert!(matches!(result, Err(CheckpointError::UnknownState(name)) if name == "Sleeping"));
        assert_eq!(
            manager.current_state(None).map(|s| s.name().to_string()),
            Some("Idle".to_string())
        );
        assert_eq!(manager.instance_count(), 0);
    }

    #[test]
    fn restore_keeps_journal_limit() {
        let machine = MachineId::new("worker");
        let (idle, busy) = (machine.state("Idle"), machine.state("Busy"));
        let source = StateManager::builder(machine.clone())
            .initial(idle.clone())
            .state(busy.clone())
            .record_history(true)
            .build()
            .unwrap();
        for _ in 0..5 {
            source.enter(&busy, None);
            source.enter(&idle, None);
        }
        let target = StateManager::builder(machine)
            .initial(idle.clone())
            .state(busy.clone())
            .history_limit(2)
            .build()
            .unwrap();

        target.restore(&source.checkpoint()).unwrap();
        for _ in 0..3 {
            target.enter(&busy, None);
            target.enter(&idle, None);
        }

        let history = target.history().unwrap();
        assert_eq!(history.limit(), Some(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.get_path(None), vec!["Idle", "Busy", "Idle"]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = Checkpoint::from_bytes(&[0xff, 0x01]);
        assert!(matches!(result, Err(CheckpointError::DeserializationFailed(_))));
    }
}
