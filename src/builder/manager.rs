//! Builder for configuring state managers.

use crate::builder::error::BuildError;
use crate::core::{MachineId, State, StateHistory};
use crate::runtime::{ChangeSink, StateManager};
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for constructing a [`StateManager`] with a fluent API.
pub struct StateManagerBuilder {
    machine: MachineId,
    initial: Option<State>,
    states: Vec<State>,
    debug_log: bool,
    sink: Option<Arc<dyn ChangeSink>>,
    record_history: bool,
    history_limit: Option<usize>,
}

impl StateManagerBuilder {
    /// Create a new builder for `machine`.
    pub fn new(machine: MachineId) -> Self {
        Self {
            machine,
            initial: None,
            states: Vec::new(),
            debug_log: false,
            sink: None,
            record_history: false,
            history_limit: None,
        }
    }

    /// Set the state new instances start in. Also registers the state.
    pub fn initial(mut self, state: State) -> Self {
        self.initial = Some(state);
        self
    }

    /// Register a state so it can be looked up by name.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Register several states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Emit debug-level logs for initialization and state changes.
    pub fn debug_log(mut self, enabled: bool) -> Self {
        self.debug_log = enabled;
        self
    }

    /// Publish committed changes to `sink`.
    pub fn sink(mut self, sink: Arc<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Keep a journal of committed transitions.
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Keep at most `limit` journal records. Implies `record_history(true)`.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.record_history = true;
        self.history_limit = Some(limit);
        self
    }

    /// Build the state manager.
    /// Returns an error if a state belongs to another machine or a name is
    /// registered twice.
    pub fn build(self) -> Result<StateManager, BuildError> {
        if let Some(initial) = &self.initial {
            if !initial.belongs_to(&self.machine) {
                return Err(BuildError::ForeignInitialState {
                    state: initial.name().to_string(),
                    owner: initial.machine().name().to_string(),
                    machine: self.machine.name().to_string(),
                });
            }
        }

        let mut catalogue: Vec<State> = Vec::with_capacity(self.states.len() + 1);
        for state in self.initial.iter().chain(self.states.iter()) {
            if !state.belongs_to(&self.machine) {
                return Err(BuildError::ForeignState {
                    state: state.name().to_string(),
                    owner: state.machine().name().to_string(),
                    machine: self.machine.name().to_string(),
                });
            }
            if !catalogue.contains(state) {
                catalogue.push(state.clone());
            }
        }

        let mut names = HashSet::new();
        for state in &catalogue {
            if !names.insert(state.name()) {
                return Err(BuildError::DuplicateStateName {
                    name: state.name().to_string(),
                });
            }
        }

        let history = match (self.record_history, self.history_limit) {
            (false, _) => None,
            (true, Some(limit)) => Some(StateHistory::with_limit(limit)),
            (true, None) => Some(StateHistory::new()),
        };

        Ok(StateManager::from_parts(
            self.machine,
            self.initial,
            catalogue,
            self.debug_log,
            self.sink,
            history,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accepts_minimal_configuration() {
        let machine = MachineId::new("door");
        let manager = StateManagerBuilder::new(machine.clone()).build().unwrap();

        assert_eq!(manager.machine(), &machine);
        assert!(!manager.has_initial_state());
        assert!(manager.states().is_empty());
        assert!(manager.history().is_none());
    }

    #[test]
    fn initial_state_joins_catalogue_once() {
        let machine = MachineId::new("door");
        let closed = machine.state("Closed");
        let open = machine.state("Open");

        let manager = StateManagerBuilder::new(machine)
            .initial(closed.clone())
            .states([closed.clone(), open.clone()])
            .debug_log(true)
            .build()
            .unwrap();

        assert_eq!(manager.states(), &[closed.clone(), open.clone()]);
        assert_eq!(manager.initial_state(), Some(&closed));
        assert_eq!(manager.state_named("Open"), Some(&open));
        assert!(manager.state_named("Ajar").is_none());
        assert!(manager.is_debug_log());
    }

    #[test]
    fn builder_rejects_foreign_initial_state() {
        let machine = MachineId::new("door");
        let foreign = MachineId::new("window").state("Closed");

        let result = StateManagerBuilder::new(machine).initial(foreign).build();

        assert!(matches!(result, Err(BuildError::ForeignInitialState { .. })));
    }

    #[test]
    fn builder_rejects_foreign_catalogue_state() {
        let machine = MachineId::new("door");
        let foreign = MachineId::new("window").state("Open");

        let result = StateManagerBuilder::new(machine).state(foreign).build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::ForeignState {
                state: "Open".to_string(),
                owner: "window".to_string(),
                machine: "door".to_string(),
            }
        );
    }

    #[test]
    fn builder_rejects_duplicate_names() {
        let machine = MachineId::new("door");
        let a = machine.state("Open");
        let b = machine.state("Open");

        let result = StateManagerBuilder::new(machine).states([a, b]).build();

        assert!(matches!(result, Err(BuildError::DuplicateStateName { name }) if name == "Open"));
    }

    #[test]
    fn history_limit_enables_journal() {
        let machine = MachineId::new("door");
        let manager = StateManagerBuilder::new(machine)
            .history_limit(4)
            .build()
            .unwrap();

        let history = manager.history().unwrap();
        assert!(history.is_empty());
        assert_eq!(history.limit(), Some(4));
    }
}
