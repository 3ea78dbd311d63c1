//! Predicates over all instances of a machine.

use super::manager::StateManager;
use crate::core::State;

impl StateManager {
    /// Returns true if all instances are currently in one of `states`.
    ///
    /// Vacuously true for an empty slice; false (with a warning) if any state
    /// belongs to another machine. While no keyed instance exists, the
    /// default instance is the only one considered; afterwards only keyed
    /// instances are.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keyed_fsm::{InstanceKey, MachineId, StateManager};
    ///
    /// let machine = MachineId::new("lobby");
    /// let waiting = machine.state("Waiting");
    /// let ready = machine.state("Ready");
    /// let manager = StateManager::builder(machine)
    ///     .initial(waiting.clone())
    ///     .state(ready.clone())
    ///     .build()
    ///     .unwrap();
    ///
    /// let (alice, bob) = (Some(InstanceKey::new()), Some(InstanceKey::new()));
    /// manager.init(alice);
    /// manager.init(bob);
    /// manager.enter(&ready, alice);
    ///
    /// assert!(!manager.all_instances_in_either_state(&[ready.clone()]));
    /// manager.enter(&ready, bob);
    /// assert!(manager.all_instances_in_either_state(&[ready]));
    /// ```
    pub fn all_instances_in_either_state(&self, states: &[State]) -> bool {
        if states.is_empty() {
            return true;
        }
        if !self.owns_all(states) {
            return false;
        }

        let keyed = self.store.keyed_instances();
        if keyed.is_empty() {
            return self.store.default_instance().is_in_any(states);
        }
        keyed.iter().all(|instance| instance.is_in_any(states))
    }

    /// Returns true if any instance is in a state not listed in `states`.
    ///
    /// Follows the same rules as
    /// [`all_instances_in_either_state`](Self::all_instances_in_either_state):
    /// true for an empty slice, false for foreign states, default instance
    /// only while no keyed instance exists.
    pub fn any_instance_not_in_either_state(&self, states: &[State]) -> bool {
        if states.is_empty() {
            return true;
        }
        if !self.owns_all(states) {
            return false;
        }

        let keyed = self.store.keyed_instances();
        if keyed.is_empty() {
            return !self.store.default_instance().is_in_any(states);
        }
        keyed.iter().any(|instance| !instance.is_in_any(states))
    }

    fn owns_all(&self, states: &[State]) -> bool {
        if let Some(foreign) = states.iter().find(|s| !s.belongs_to(self.machine())) {
            tracing::warn!(
                machine = %self.machine(),
                "The states checked do not belong to this state machine (found {:?})",
                foreign
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{InstanceKey, MachineId, State};
    use crate::StateManager;

    fn setup() -> (StateManager, State, State, State) {
        let machine = MachineId::new("lobby");
        let waiting = machine.state("Waiting");
        let ready = machine.state("Ready");
        let gone = machine.state("Gone");
        let manager = StateManager::builder(machine)
            .initial(waiting.clone())
            .states([ready.clone(), gone.clone()])
            .build()
            .unwrap();
        (manager, waiting, ready, gone)
    }

    #[test]
    fn empty_state_set_is_vacuously_true() {
        let (manager, ..) = setup();
        manager.init(Some(InstanceKey::new()));

        assert!(manager.all_instances_in_either_state(&[]));
        assert!(manager.any_instance_not_in_either_state(&[]));
    }

    #[test]
    fn foreign_states_yield_false() {
        let (manager, waiting, ..) = setup();
        manager.init(None);
        let foreign = MachineId::new("lobby").state("Waiting");

        assert!(!manager.all_instances_in_either_state(&[waiting.clone(), foreign.clone()]));
        assert!(!manager.any_instance_not_in_either_state(&[waiting, foreign]));
    }

    #[test]
    fn default_instance_stands_in_without_keyed_instances() {
        let (manager, waiting, ready, _) = setup();

        assert!(!manager.all_instances_in_either_state(&[waiting.clone()]));
        assert!(manager.any_instance_not_in_either_state(&[waiting.clone()]));

        manager.init(None);
        assert!(manager.all_instances_in_either_state(&[waiting.clone()]));
        assert!(!manager.any_instance_not_in_either_state(&[waiting.clone()]));
        assert!(manager.any_instance_not_in_either_state(&[ready]));
    }

    #[test]
    fn keyed_instances_are_checked_once_present() {
        let (manager, waiting, ready, gone) = setup();
        let keys: Vec<_> = (0..3).map(|_| Some(InstanceKey::new())).collect();
        for key in &keys {
            manager.init(*key);
        }

        assert!(manager.all_instances_in_either_state(&[waiting.clone()]));

        manager.enter(&ready, keys[0]);
        manager.enter(&gone, keys[1]);

        assert!(!manager.all_instances_in_either_state(&[ready.clone(), gone.clone()]));
        assert!(manager.any_instance_not_in_either_state(&[ready.clone(), gone.clone()]));

        manager.enter(&gone, keys[2]);
        assert!(manager.all_instances_in_either_state(&[ready.clone(), gone.clone()]));
        assert!(!manager.any_instance_not_in_either_state(&[ready, gone]));
    }

    #[test]
    fn uninitialized_instances_are_never_in_a_state() {
        let (manager, waiting, ..) = setup();
        manager.init(Some(InstanceKey::new()));
        let _untouched = manager.current_state(Some(InstanceKey::new()));

        assert!(!manager.all_instances_in_either_state(&[waiting.clone()]));
        assert!(manager.any_instance_not_in_either_state(&[waiting]));
    }
}
