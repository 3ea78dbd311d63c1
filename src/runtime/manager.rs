//! The state manager: one machine definition, many keyed instances.

use super::instance::{InstanceRecord, InstanceStore};
use super::listener::{EnterListener, LeaveListener};
use super::outcome::{EnterOutcome, TransitionError};
use super::sink::{ChangeSink, StateChange};
use crate::builder::StateManagerBuilder;
use crate::core::{InstanceKey, KeyLabel, MachineId, State, StateHistory, TransitionRecord};
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Core of every state machine.
///
/// A `StateManager` owns one machine definition and tracks a current state
/// per [`InstanceKey`]. Passing `None` as key addresses the shared default
/// instance. Each instance has its own enter and leave listeners.
///
/// Invalid requests (entering a null state, entering a state of another
/// machine) are logged and reported through [`EnterOutcome`]; they never
/// panic and never change the instance.
///
/// # Example
///
/// ```rust
/// use keyed_fsm::{InstanceKey, MachineId, StateManager};
///
/// let machine = MachineId::new("task");
/// let idle = machine.state("Idle");
/// let running = machine.state("Running");
///
/// let manager = StateManager::builder(machine)
///     .initial(idle.clone())
///     .state(running.clone())
///     .build()
///     .unwrap();
///
/// let worker = Some(InstanceKey::new());
/// manager.init(worker);
/// assert_eq!(manager.current_state(worker), Some(idle));
///
/// assert!(manager.enter(&running, worker).is_entered());
/// assert!(manager.enter(&running, worker).is_unchanged());
/// assert_eq!(manager.current_state(None), None);
/// ```
pub struct StateManager {
    machine: MachineId,
    initial_state: Option<State>,
    catalogue: Vec<State>,
    debug_log: bool,
    pub(crate) store: InstanceStore,
    sink: Option<Arc<dyn ChangeSink>>,
    sink_muted: AtomicBool,
    pub(crate) history: Option<Mutex<StateHistory>>,
}

impl StateManager {
    /// Start configuring a manager for `machine`.
    pub fn builder(machine: MachineId) -> StateManagerBuilder {
        StateManagerBuilder::new(machine)
    }

    /// A manager without initial state, catalogue, sink or journal.
    pub fn new(machine: MachineId) -> Self {
        Self::from_parts(machine, None, Vec::new(), false, None, None)
    }

    pub(crate) fn from_parts(
        machine: MachineId,
        initial_state: Option<State>,
        catalogue: Vec<State>,
        debug_log: bool,
        sink: Option<Arc<dyn ChangeSink>>,
        history: Option<StateHistory>,
    ) -> Self {
        Self {
            machine,
            initial_state,
            catalogue,
            debug_log,
            store: InstanceStore::new(),
            sink,
            sink_muted: AtomicBool::new(false),
            history: history.map(Mutex::new),
        }
    }

    /// The machine definition this manager controls.
    pub fn machine(&self) -> &MachineId {
        &self.machine
    }

    /// State entered by `init`, if one was configured.
    pub fn initial_state(&self) -> Option<&State> {
        self.initial_state.as_ref()
    }

    /// Returns true if this machine has an initial state defined.
    pub fn has_initial_state(&self) -> bool {
        self.initial_state.is_some()
    }

    /// States registered with this manager, initial state included.
    pub fn states(&self) -> &[State] {
        &self.catalogue
    }

    /// Look up a registered state by name.
    pub fn state_named(&self, name: &str) -> Option<&State> {
        self.catalogue.iter().find(|s| s.name() == name)
    }

    /// Whether transitions are logged at debug level.
    pub fn is_debug_log(&self) -> bool {
        self.debug_log
    }

    /// Enter `target` on the instance selected by `key`.
    ///
    /// Entering the current state is a no-op. Otherwise the leave listeners
    /// run with the old state, the new state is committed and published to
    /// the sink, and then the enter listeners run with it. Listeners run
    /// synchronously on this thread with no lock held, so a listener may call
    /// `enter` again. Such nested calls take effect immediately, and a leave
    /// listener that re-enters the same instance is overwritten by the outer
    /// commit. Configurations where listeners trigger each other endlessly
    /// will recurse until the stack overflows.
    pub fn enter<'a>(
        &self,
        target: impl Into<Option<&'a State>>,
        key: Option<InstanceKey>,
    ) -> EnterOutcome {
        let instance = self.store.resolve(key);
        self.enter_instance(&instance, target.into())
    }

    /// Enter `target` on the default instance and on every keyed instance.
    ///
    /// Each instance is validated on its own. Returns how many instances
    /// actually transitioned.
    pub fn enter_all<'a>(&self, target: impl Into<Option<&'a State>>) -> usize {
        let target = target.into();
        let mut committed = 0;

        if self.enter_instance(self.store.default_instance(), target).is_entered() {
            committed += 1;
        }
        for instance in self.store.keyed_instances() {
            if self.enter_instance(&instance, target).is_entered() {
                committed += 1;
            }
        }
        committed
    }

    fn enter_instance(&self, instance: &InstanceRecord, target: Option<&State>) -> EnterOutcome {
        let previous = instance.current();
        if previous.as_ref() == target {
            return EnterOutcome::Unchanged;
        }

        let Some(target) = target else {
            tracing::error!(
                machine = %self.machine,
                "You are trying to set the state to null which is not supported"
            );
            return EnterOutcome::Rejected(TransitionError::NullTargetState);
        };

        if !target.belongs_to(&self.machine) {
            tracing::error!(
                machine = %self.machine,
                "The state {} you want to enter is not controlled by this state manager",
                target
            );
            return EnterOutcome::Rejected(TransitionError::OwnershipMismatch {
                state: target.name().to_string(),
                owner: target.machine().name().to_string(),
                machine: self.machine.name().to_string(),
            });
        }

        if self.debug_log {
            tracing::debug!(machine = %self.machine, "Change State to: {}", target);
        }

        for listener in instance.leave_snapshot() {
            listener(previous.as_ref());
        }
        instance.set_current(Some(target.clone()));

        tracing::trace!(
            machine = %self.machine,
            "{} ({}) was entered",
            target,
            KeyLabel(instance.key())
        );

        // Journal and sink before enter listeners so nested transitions land after this one.
        if let Some(history) = &self.history {
            history.lock().push(TransitionRecord {
                from: previous.as_ref().map(|s| s.name().to_string()),
                to: target.name().to_string(),
                key: instance.key(),
                timestamp: Utc::now(),
            });
        }
        self.notify_sink(target, instance.key());

        for listener in instance.enter_snapshot() {
            listener(target);
        }

        EnterOutcome::Entered {
            from: previous,
            to: target.clone(),
        }
    }

    fn notify_sink(&self, state: &State, key: Option<InstanceKey>) {
        let Some(sink) = &self.sink else {
            return;
        };
        if self.is_sink_muted() {
            return;
        }

        let change = StateChange {
            machine: self.machine.name().to_string(),
            state: state.name().to_string(),
            key,
        };
        if let Err(e) = sink.state_entered(&change) {
            tracing::warn!(
                machine = %self.machine,
                "Failed to publish change to {} ({}): {}",
                state,
                KeyLabel(key),
                e
            );
        }
    }

    /// Current state of the selected instance, `None` while uninitialized.
    pub fn current_state(&self, key: Option<InstanceKey>) -> Option<State> {
        self.store.resolve(key).current()
    }

    /// Check if the selected instance currently is in `state`.
    pub fn is_in(&self, state: &State, key: Option<InstanceKey>) -> bool {
        self.current_state(key).as_ref() == Some(state)
    }

    /// Enter the initial state unless the instance already has a state.
    ///
    /// Without an initial state the instance stays uninitialized.
    pub fn init(&self, key: Option<InstanceKey>) -> EnterOutcome {
        let instance = self.store.resolve(key);
        if instance.current().is_some() {
            return EnterOutcome::Unchanged;
        }

        if self.debug_log {
            match &self.initial_state {
                Some(initial) => tracing::debug!(
                    machine = %self.machine,
                    "Initializing {} with {}",
                    KeyLabel(key),
                    initial
                ),
                None => tracing::debug!(
                    machine = %self.machine,
                    "Initializing {} with null",
                    KeyLabel(key)
                ),
            }
        }

        self.enter_instance(&instance, self.initial_state.as_ref())
    }

    pub fn add_enter_listener(&self, listener: EnterListener, key: Option<InstanceKey>) {
        self.store.resolve(key).enter_listeners.lock().add(listener);
    }

    /// Remove one registration of `listener`; returns whether one was found.
    pub fn remove_enter_listener(&self, listener: &EnterListener, key: Option<InstanceKey>) -> bool {
        self.store.resolve(key).enter_listeners.lock().remove(listener)
    }

    pub fn add_leave_listener(&self, listener: LeaveListener, key: Option<InstanceKey>) {
        self.store.resolve(key).leave_listeners.lock().add(listener);
    }

    /// Remove one registration of `listener`; returns whether one was found.
    pub fn remove_leave_listener(&self, listener: &LeaveListener, key: Option<InstanceKey>) -> bool {
        self.store.resolve(key).leave_listeners.lock().remove(listener)
    }

    /// Number of keyed instances created so far. The default instance is not
    /// counted.
    pub fn instance_count(&self) -> usize {
        self.store.len()
    }

    /// Keys of all keyed instances, sorted.
    pub fn keys(&self) -> Vec<InstanceKey> {
        self.store.keys()
    }

    /// True once at least one keyed instance exists.
    pub fn is_instanced(&self) -> bool {
        self.store.is_instanced()
    }

    /// Suppress sink notifications, e.g. while applying changes that came in
    /// through the sink's own channel.
    pub fn set_sink_muted(&self, muted: bool) {
        self.sink_muted.store(muted, Ordering::SeqCst);
    }

    pub fn is_sink_muted(&self) -> bool {
        self.sink_muted.load(Ordering::SeqCst)
    }

    /// Copy of the transition journal, if recording is enabled.
    pub fn history(&self) -> Option<StateHistory> {
        self.history.as_ref().map(|h| h.lock().clone())
    }
}

impl fmt::Debug for StateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("machine", &self.machine)
            .field("initial_state", &self.initial_state)
            .field("instances", &self.store.len())
            .field("debug_log", &self.debug_log)
            .finish()
    }
}
