//! Per-key instance records and the resolver that hands them out.

use super::listener::{EnterListener, LeaveListener, ListenerList};
use crate::core::{InstanceKey, State};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Mutable runtime slot of one state machine instance.
pub(crate) struct InstanceRecord {
    key: Option<InstanceKey>,
    current: Mutex<Option<State>>,
    pub(crate) enter_listeners: Mutex<ListenerList<dyn Fn(&State) + Send + Sync>>,
    pub(crate) leave_listeners: Mutex<ListenerList<dyn Fn(Option<&State>) + Send + Sync>>,
}

impl InstanceRecord {
    fn new(key: Option<InstanceKey>) -> Self {
        Self {
            key,
            current: Mutex::new(None),
            enter_listeners: Mutex::new(ListenerList::new()),
            leave_listeners: Mutex::new(ListenerList::new()),
        }
    }

    pub(crate) fn key(&self) -> Option<InstanceKey> {
        self.key
    }

    pub(crate) fn current(&self) -> Option<State> {
        self.current.lock().clone()
    }

    pub(crate) fn set_current(&self, state: Option<State>) {
        *self.current.lock() = state;
    }

    pub(crate) fn is_in_any(&self, states: &[State]) -> bool {
        match self.current.lock().as_ref() {
            Some(current) => states.contains(current),
            None => false,
        }
    }

    pub(crate) fn enter_snapshot(&self) -> Vec<EnterListener> {
        self.enter_listeners.lock().snapshot()
    }

    pub(crate) fn leave_snapshot(&self) -> Vec<LeaveListener> {
        self.leave_listeners.lock().snapshot()
    }
}

/// Maps owner keys to instance records.
///
/// The default instance exists from the start; keyed instances are created
/// on first resolution and live as long as the store.
pub(crate) struct InstanceStore {
    default: Arc<InstanceRecord>,
    keyed: RwLock<HashMap<InstanceKey, Arc<InstanceRecord>>>,
}

impl InstanceStore {
    pub(crate) fn new() -> Self {
        Self {
            default: Arc::new(InstanceRecord::new(None)),
            keyed: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the instance for `key`, creating it if unseen.
    pub(crate) fn resolve(&self, key: Option<InstanceKey>) -> Arc<InstanceRecord> {
        let Some(key) = key else {
            return Arc::clone(&self.default);
        };

        if let Some(record) = self.keyed.read().get(&key) {
            debug_assert_eq!(record.key(), Some(key));
            return Arc::clone(record);
        }

        let mut keyed = self.keyed.write();
        let record = keyed
            .entry(key)
            .or_insert_with(|| Arc::new(InstanceRecord::new(Some(key))));
        debug_assert_eq!(record.key(), Some(key));
        Arc::clone(record)
    }

    pub(crate) fn default_instance(&self) -> &Arc<InstanceRecord> {
        &self.default
    }

    /// Snapshot of all keyed instances, in unspecified order.
    pub(crate) fn keyed_instances(&self) -> Vec<Arc<InstanceRecord>> {
        self.keyed.read().values().cloned().collect()
    }

    pub(crate) fn keys(&self) -> Vec<InstanceKey> {
        let mut keys: Vec<InstanceKey> = self.keyed.read().keys().copied().collect();
        keys.sort();
        keys
    }

    pub(crate) fn len(&self) -> usize {
        self.keyed.read().len()
    }

    pub(crate) fn is_instanced(&self) -> bool {
        !self.keyed.read().is_empty()
    }
}
