//! Opaque owner keys selecting a state machine instance.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of the owner of one state machine instance.
///
/// Operations take an `Option<InstanceKey>`: `Some(key)` selects (and lazily
/// creates) the instance of that owner, `None` selects the shared default
/// instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceKey(Uuid);

impl InstanceKey {
    /// Generate a fresh, never before seen key.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for InstanceKey {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for InstanceKey {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceKey({})", self.0)
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Display adapter for an optional key, rendering `None` as `default`.
pub(crate) struct KeyLabel(pub(crate) Option<InstanceKey>);

impl fmt::Display for KeyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(key) => fmt::Display::fmt(&key, f),
            None => f.write_str("default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_keys_are_distinct() {
        assert_ne!(InstanceKey::new(), InstanceKey::new());
    }

    #[test]
    fn key_round_trips_through_uuid() {
        let id = Uuid::new_v4();
        let key = InstanceKey::from(id);
        assert_eq!(key.as_uuid(), id);
        assert_eq!(key, InstanceKey::from_uuid(id));
    }

    #[test]
    fn label_renders_default_for_none() {
        let key = InstanceKey::new();
        assert_eq!(KeyLabel(None).to_string(), "default");
        assert_eq!(KeyLabel(Some(key)).to_string(), key.to_string());
    }
}
