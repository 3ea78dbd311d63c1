//! Observers built on top of the enter notifications of a state manager.
//!
//! A [`StateObserver`] is given a set of "active" states and follows one
//! instance, reporting when the instance becomes active (enters one of the
//! states) or inactive (enters any other state).
//!
//! Misconfiguration (no states, states of several machines, states of a
//! machine other than the observed one) never reaches the manager: the
//! observer logs every problem and disables itself.
//!
//! # Example
//!
//! ```rust
//! use keyed_fsm::observer::{ObserverError, StateObserver};
//! use keyed_fsm::{MachineId, StateManager};
//! use std::sync::Arc;
//!
//! let manager = Arc::new(StateManager::new(MachineId::new("hud")));
//! let stray = MachineId::new("menu").state("Shown");
//!
//! let observer = StateObserver::builder(vec![stray]).attach(&manager);
//!
//! assert!(!observer.is_enabled());
//! assert!(matches!(observer.errors()[0], ObserverError::ForeignMachine { .. }));
//! ```

pub mod error;
mod state_observer;
pub mod validation;

pub use error::ObserverError;
pub use state_observer::{StateObserver, StateObserverBuilder};
pub use validation::validate_active_states;
