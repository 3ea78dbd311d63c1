//! Transition journal.
//!
//! Keeps an ordered, serializable record of committed transitions across all
//! instances of a machine.

use super::key::InstanceKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single committed transition.
///
/// States are stored by name so the record survives serialization.
///
/// # Example
///
/// ```rust
/// use keyed_fsm::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: None,
///     to: "Idle".to_string(),
///     key: None,
///     timestamp: Utc::now(),
/// };
/// assert!(record.is_initialization());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being left, `None` for the first transition of an instance
    pub from: Option<String>,
    /// The state being entered
    pub to: String,
    /// The instance the transition happened on, `None` for the default one
    pub key: Option<InstanceKey>,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// True when this transition initialized a previously empty instance.
    pub fn is_initialization(&self) -> bool {
        self.from.is_none()
    }
}

/// Ordered history of committed transitions.
///
/// `record` is pure and returns a new history; the optional limit drops the
/// oldest records once exceeded.
///
/// # Example
///
/// ```rust
/// use keyed_fsm::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = StateHistory::new();
///
/// let history = history.record(TransitionRecord {
///     from: None,
///     to: "Idle".to_string(),
///     key: None,
///     timestamp: Utc::now(),
/// });
/// let history = history.record(TransitionRecord {
///     from: Some("Idle".to_string()),
///     to: "Running".to_string(),
///     key: None,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(None), vec!["Idle", "Running"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<TransitionRecord>,
    limit: Option<usize>,
}

impl StateHistory {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
        }
    }

    /// Create an empty history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut next = self.clone();
        next.push(transition);
        next
    }

    pub(crate) fn push(&mut self, transition: TransitionRecord) {
        self.transitions.push_back(transition);
        if let Some(limit) = self.limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
            }
        }
    }

    /// Replace the retained transitions with those of `other`.
    ///
    /// This history keeps its own limit, trimming the oldest records to fit.
    pub(crate) fn replace_records(&mut self, other: &StateHistory) {
        self.transitions.clear();
        for transition in other.transitions() {
            self.push(transition.clone());
        }
    }

    /// All retained transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    /// Transitions of one instance, oldest first.
    pub fn for_key(&self, key: Option<InstanceKey>) -> Vec<&TransitionRecord> {
        self.transitions.iter().filter(|t| t.key == key).collect()
    }

    /// Names of the states one instance went through.
    ///
    /// Starts with the `from` state of the instance's first retained
    /// transition (when there was one), followed by every entered state.
    pub fn get_path(&self, key: Option<InstanceKey>) -> Vec<&str> {
        let records = self.for_key(key);
        let mut path = Vec::with_capacity(records.len() + 1);
        if let Some(from) = records.first().and_then(|t| t.from.as_deref()) {
            path.push(from);
        }
        path.extend(records.iter().map(|t| t.to.as_str()));
        path
    }

    /// Time between the first and last retained transition.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
