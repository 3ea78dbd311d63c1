//! Validation of observer configuration.
//!
//! Uses Stillwater's `Validation` to report every problem at once instead of
//! stopping at the first.

use super::error::ObserverError;
use crate::core::{MachineId, State};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check that `states` is a usable active-state set for `machine`.
///
/// Accumulates one error per state of another machine than the first one,
/// plus one if the set as a whole targets a machine other than `machine`.
pub fn validate_active_states(
    machine: &MachineId,
    states: &[State],
) -> Validation<(), NonEmptyVec<ObserverError>> {
    let Some(first) = states.first() else {
        return Validation::fail(ObserverError::NoActiveStates);
    };

    let mut checks: Vec<Validation<(), NonEmptyVec<ObserverError>>> = Vec::new();

    for state in &states[1..] {
        let check = if state.belongs_to(first.machine()) {
            Validation::success(())
        } else {
            Validation::fail(ObserverError::MixedMachines {
                state: state.name().to_string(),
                expected: first.machine().name().to_string(),
                found: state.machine().name().to_string(),
            })
        };
        checks.push(check);
    }

    let check = if first.belongs_to(machine) {
        Validation::success(())
    } else {
        Validation::fail(ObserverError::ForeignMachine {
            expected: machine.name().to_string(),
            found: first.machine().name().to_string(),
        })
    };
    checks.push(check);

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_rejected() {
        let machine = MachineId::new("door");

        match validate_active_states(&machine, &[]) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.iter().all(|e| *e == ObserverError::NoActiveStates));
            }
            Validation::Success(_) => panic!("Expected failure, got success"),
        }
    }

    #[test]
    fn states_of_one_machine_pass() {
        let machine = MachineId::new("door");
        let states = [machine.state("Open"), machine.state("Ajar")];

        assert!(validate_active_states(&machine, &states).is_success());
    }

    #[test]
    fn accumulates_all_violations() {
        let door = MachineId::new("door");
        let window = MachineId::new("window");
        let lift = MachineId::new("lift");
        let states = [
            window.state("Open"),
            door.state("Open"),
            lift.state("Moving"),
            window.state("Closed"),
        ];

        match validate_active_states(&door, &states) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                let mixed = errors
                    .iter()
                    .filter(|e| matches!(e, ObserverError::MixedMachines { .. }))
                    .count();
                let foreign = errors
                    .iter()
                    .any(|e| matches!(e, ObserverError::ForeignMachine { .. }));
                assert_eq!(mixed, 2);
                assert!(foreign);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }
}
