//! Observer that tracks whether an instance is in one of a set of states.

use super::error::ObserverError;
use super::validation::validate_active_states;
use crate::core::{InstanceKey, State};
use crate::runtime::{EnterListener, StateManager};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use stillwater::validation::Validation;

type ActivatedHook = Arc<dyn Fn() + Send + Sync>;
type DeactivatedHook = Arc<dyn Fn(bool) + Send + Sync>;

/// Builder for a [`StateObserver`].
pub struct StateObserverBuilder {
    active_states: Vec<State>,
    key: Option<InstanceKey>,
    name: String,
    debug: bool,
    on_activated: Option<ActivatedHook>,
    on_deactivated: Option<DeactivatedHook>,
}

impl StateObserverBuilder {
    /// Observe the instance selected by `key` instead of the default one.
    pub fn key(mut self, key: Option<InstanceKey>) -> Self {
        self.key = key;
        self
    }

    /// Name used in log messages.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Called when the observer becomes active.
    pub fn on_activated<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_activated = Some(Arc::new(hook));
        self
    }

    /// Called when the observer becomes inactive. The flag is true for the
    /// evaluation right after attaching.
    pub fn on_deactivated<F>(mut self, hook: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_deactivated = Some(Arc::new(hook));
        self
    }

    /// Validate the configuration and start observing `manager`.
    ///
    /// A misconfigured observer is returned disabled: it logs every problem,
    /// never touches the manager and never fires its hooks.
    pub fn attach(self, manager: &Arc<StateManager>) -> StateObserver {
        let shared = Arc::new(Shared {
            active_states: self.active_states,
            name: self.name,
            debug: self.debug,
            active: AtomicBool::new(false),
            on_activated: self.on_activated,
            on_deactivated: self.on_deactivated,
        });

        if let Validation::Failure(errors) =
            validate_active_states(manager.machine(), &shared.active_states)
        {
            let errors: Vec<ObserverError> = errors.iter().cloned().collect();
            for error in &errors {
                tracing::warn!(observer = %shared.name, "{}", error);
            }
            return StateObserver {
                manager: Arc::clone(manager),
                key: self.key,
                shared,
                listener: None,
                errors,
            };
        }

        manager.init(self.key);

        let handler = Arc::clone(&shared);
        let listener: EnterListener = Arc::new(move |state: &State| handler.on_state_enter(state));
        manager.add_enter_listener(Arc::clone(&listener), self.key);

        let current = manager.current_state(self.key);
        shared.evaluate_at_start(current.as_ref());

        StateObserver {
            manager: Arc::clone(manager),
            key: self.key,
            shared,
            listener: Some(listener),
            errors: Vec::new(),
        }
    }
}

struct Shared {
    active_states: Vec<State>,
    name: String,
    debug: bool,
    active: AtomicBool,
    on_activated: Option<ActivatedHook>,
    on_deactivated: Option<DeactivatedHook>,
}

impl Shared {
    fn is_active_state(&self, state: Option<&State>) -> bool {
        state.is_some_and(|s| self.active_states.contains(s))
    }

    fn evaluate_at_start(&self, current: Option<&State>) {
        if self.is_active_state(current) {
            self.active.store(true, Ordering::SeqCst);
            self.activated();
        } else {
            self.deactivated(true);
        }
    }

    fn on_state_enter(&self, state: &State) {
        let now_active = self.is_active_state(Some(state));
        let previously_active = self.active.swap(now_active, Ordering::SeqCst);

        if !previously_active && now_active {
            self.activated();
        }
        if previously_active && !now_active {
            self.deactivated(false);
        }
    }

    fn activated(&self) {
        if self.debug {
            tracing::debug!(observer = %self.name, "Activated");
        }
        if let Some(hook) = &self.on_activated {
            hook();
        }
    }

    fn deactivated(&self, at_start: bool) {
        if self.debug {
            tracing::debug!(observer = %self.name, at_start, "Deactivated");
        }
        if let Some(hook) = &self.on_deactivated {
            hook(at_start);
        }
    }
}

/// Follows one instance of a [`StateManager`] and reports when it enters or
/// leaves a set of active states.
///
/// The observer registers a single enter listener while attached and removes
/// it on [`detach`](Self::detach) or drop.
///
/// # Example
///
/// ```rust
/// use keyed_fsm::observer::StateObserver;
/// use keyed_fsm::{MachineId, StateManager};
/// use std::sync::Arc;
///
/// let machine = MachineId::new("menu");
/// let hidden = machine.state("Hidden");
/// let shown = machine.state("Shown");
/// let manager = Arc::new(
///     StateManager::builder(machine)
///         .initial(hidden.clone())
///         .state(shown.clone())
///         .build()
///         .unwrap(),
/// );
///
/// let panel = StateObserver::builder(vec![shown.clone()])
///     .name("panel")
///     .attach(&manager);
///
/// assert!(panel.is_enabled());
/// assert!(!panel.is_active());
/// manager.enter(&shown, None);
/// assert!(panel.is_active());
/// ```
pub struct StateObserver {
    manager: Arc<StateManager>,
    key: Option<InstanceKey>,
    shared: Arc<Shared>,
    listener: Option<EnterListener>,
    errors: Vec<ObserverError>,
}

impl StateObserver {
    /// Start configuring an observer for the given active states.
    pub fn builder(active_states: Vec<State>) -> StateObserverBuilder {
        StateObserverBuilder {
            active_states,
            key: None,
            name: "state-observer".to_string(),
            debug: false,
            on_activated: None,
            on_deactivated: None,
        }
    }

    /// True while the observed instance is in one of the active states.
    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// False if the configuration was rejected or the observer was detached.
    pub fn is_enabled(&self) -> bool {
        self.listener.is_some()
    }

    /// Configuration problems found on attach.
    pub fn errors(&self) -> &[ObserverError] {
        &self.errors
    }

    pub fn key(&self) -> Option<InstanceKey> {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Stop observing. Calling it again is a no-op.
    pub fn detach(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        if self.shared.debug {
            tracing::debug!(observer = %self.shared.name, "Removing Listener");
        }
        self.manager.remove_enter_listener(&listener, self.key);
    }
}

impl Drop for StateObserver {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for StateObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateObserver")
            .field("name", &self.shared.name)
            .field("key", &self.key)
            .field("active_states", &self.shared.active_states)
            .field("active", &self.is_active())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
