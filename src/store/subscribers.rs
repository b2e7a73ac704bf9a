//! Ordered registry of state-change listeners.

use crate::core::StateMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Listener invoked with the latest state after each mutation.
pub type Subscriber = Arc<dyn Fn(&StateMap) + Send + Sync>;

/// Identity of a registered listener.
///
/// Returned by subscribe and used to unsubscribe; stands in for callback
/// reference identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Listeners in registration order.
#[derive(Default)]
pub(crate) struct Registry {
    entries: RwLock<Vec<(SubscriptionId, Subscriber)>>,
}

impl Registry {
    /// Append a listener.
    pub(crate) fn add(&self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, subscriber));
        id
    }

    /// Remove the listener registered as `id`. Returns whether one was removed.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Listeners as of now, in registration order.
    ///
    /// A broadcast pass iterates this copy, so listeners added or removed
    /// during the pass take effect from the next pass on.
    pub(crate) fn snapshot(&self) -> Vec<Subscriber> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Subscriber {
        let log = Arc::clone(log);
        Arc::new(move |_: &StateMap| log.lock().unwrap().push(name))
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = Registry::default();
        registry.add(recorder(&log, "first"));
        registry.add(recorder(&log, "second"));
        registry.add(recorder(&log, "third"));

        for subscriber in registry.snapshot() {
            subscriber(&StateMap::new());
        }
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn remove_drops_only_matching_entry() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = Registry::default();
        let a = registry.add(recorder(&log, "a"));
        registry.add(recorder(&log, "b"));

        assert!(registry.remove(a));
        assert_eq!(registry.len(), 1);
        assert!(!registry.remove(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let registry = Registry::default();
        let a = registry.add(Arc::new(|_: &StateMap| {}));
        let b = registry.add(Arc::new(|_: &StateMap| {}));
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }
}
