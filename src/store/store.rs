//! The state container: holds state, broadcasts changes, persists.

use crate::core::{as_state_map, kind_of, shallow_merge, StateMap};
use crate::persistence::Persistor;
use crate::store::error::StoreError;
use crate::store::options::StoreOptions;
use crate::store::subscribers::{Registry, SubscriptionId};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, Weak};

struct Inner {
    state: RwLock<StateMap>,
    subscribers: Registry,
    options: StoreOptions,
    persistor: Option<Persistor>,
}

/// Shared handle to a single mutable state blob.
///
/// Cloning a `Store` yields another handle to the same state and listeners.
/// All operations are expected to run on one logical thread of control;
/// concurrent mutations from independent threads are last-write-wins per
/// top-level key with no read-modify-write atomicity.
///
/// # Example
///
/// ```rust
/// use overhaul::store::Store;
/// use serde_json::json;
///
/// let store = Store::from_json(json!({ "count": 0, "name": "demo" })).unwrap();
/// store.mutate_json(json!({ "count": 1 })).unwrap();
///
/// assert_eq!(store.get("count"), Some(json!(1)));
/// assert_eq!(store.get("name"), Some(json!("demo")));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    /// Create a non-persisting store holding `initial`.
    pub fn new(initial: StateMap) -> Self {
        Self::with_options(initial, StoreOptions::default(), None)
    }

    /// Create a non-persisting store from a JSON object.
    pub fn from_json(initial: Value) -> Result<Self, StoreError> {
        let kind = kind_of(&initial);
        let initial = as_state_map(initial).ok_or(StoreError::NotAnObject(kind))?;
        Ok(Self::new(initial))
    }

    /// Create a store with explicit options.
    ///
    /// `persistor` is only written to when `options.persist` is set. No
    /// rehydration happens here; see [`crate::builder::StoreBuilder`].
    pub fn with_options(
        initial: StateMap,
        options: StoreOptions,
        persistor: Option<Persistor>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial),
                subscribers: Registry::default(),
                options,
                persistor,
            }),
        }
    }

    /// Clone of the current state.
    pub fn state(&self) -> StateMap {
        self.read(StateMap::clone)
    }

    /// Clone of the value under one top-level key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read(|state| state.get(key).cloned())
    }

    /// Read state without cloning it.
    ///
    /// Do not mutate the store from inside `f`.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StateMap) -> R,
    {
        let state = self.inner.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Options the store was built with.
    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    /// Persistor used after mutations, if configured.
    pub fn persistor(&self) -> Option<&Persistor> {
        self.inner.persistor.as_ref()
    }

    /// Shallow-merge `partial` into state, broadcast, then persist.
    ///
    /// Keys in `partial` replace same-named keys wholesale; all other keys are
    /// kept. Every listener registered when the broadcast starts is invoked
    /// once, in registration order, with the state right after this merge.
    /// When persistence is enabled the current state is written afterwards
    /// and a storage failure is returned to the caller; listeners have
    /// already run by then.
    pub fn mutate(&self, partial: StateMap) -> Result<(), StoreError> {
        let changed: Vec<String> = partial.keys().cloned().collect();

        let next = {
            let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = shallow_merge(&state, partial);
            state.clone()
        };

        let subscribers = self.inner.subscribers.snapshot();
        tracing::debug!(
            keys = ?changed,
            subscribers = subscribers.len(),
            "State mutated"
        );
        for subscriber in &subscribers {
            subscriber(&next);
        }

        if self.inner.options.persist {
            if let Some(persistor) = &self.inner.persistor {
                // A listener may have mutated again; persist what is current.
                persistor.persist(&self.state())?;
            }
        }

        Ok(())
    }

    /// [`mutate`](Self::mutate) with a JSON object patch.
    pub fn mutate_json(&self, partial: Value) -> Result<(), StoreError> {
        let kind = kind_of(&partial);
        let partial = as_state_map(partial).ok_or(StoreError::NotAnObject(kind))?;
        self.mutate(partial)
    }

    /// Replace a single top-level key.
    pub fn set(&self, key: impl Into<String>, value: Value) -> Result<(), StoreError> {
        let mut partial = StateMap::new();
        partial.insert(key.into(), value);
        self.mutate(partial)
    }

    /// Register a listener; it is called after every subsequent mutation.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateMap) + Send + Sync + 'static,
    {
        let id = self.inner.subscribers.add(Arc::new(callback));
        tracing::debug!(%id, "Subscribed");
        id
    }

    /// Register a listener that unsubscribes when the returned guard drops.
    pub fn subscribe_scoped<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StateMap) + Send + Sync + 'static,
    {
        let id = self.subscribe(callback);
        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a listener. Unknown ids are ignored; returns whether one was
    /// removed.
    ///
    /// Removing a listener while a broadcast is in progress does not affect
    /// that broadcast: it still reaches the removed listener.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.subscribers.remove(id);
        tracing::debug!(%id, removed, "Unsubscribed");
        removed
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state())
            .field("subscribers", &self.subscriber_count())
            .field("options", &self.inner.options)
            .finish()
    }
}

/// RAII guard for a store listener.
///
/// Dropping the guard unsubscribes. The guard does not keep the store alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriptionId,
    store: Weak<Inner>,
}

impl Subscription {
    /// Id of the guarded listener.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner.subscribers.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, PersistError, StorageError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn store(value: Value) -> Store {
        Store::from_json(value).unwrap()
    }

    #[test]
    fn mutate_shallow_merges() {
        let store = store(json!({ "a": 1, "b": { "x": 1, "y": 2 } }));
        store.mutate_json(json!({ "b": { "x": 9 }, "c": 3 })).unwrap();
        assert_eq!(
            Value::Object(store.state()),
            json!({ "a": 1, "b": { "x": 9 }, "c": 3 })
        );
    }

    #[test]
    fn mutate_json_rejects_non_objects() {
        let store = store(json!({}));
        assert!(matches!(
            store.mutate_json(json!([1])),
            Err(StoreError::NotAnObject("array"))
        ));
        assert!(matches!(
            Store::from_json(json!(3)),
            Err(StoreError::NotAnObject("number"))
        ));
    }

    #[test]
    fn set_replaces_one_key() {
        let store = store(json!({ "a": 1, "b": 2 }));
        store.set("a", json!("one")).unwrap();
        assert_eq!(store.get("a"), Some(json!("one")));
        assert_eq!(store.get("b"), Some(json!(2)));
    }

    #[test]
    fn subscribers_receive_new_state_in_order() {
        let store = store(json!({ "n": 0 }));
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let log = Arc::clone(&log);
            store.subscribe(move |state| {
                log.lock().unwrap().push((name, state["n"].clone()));
            });
        }

        store.mutate_json(json!({ "n": 1 })).unwrap();
        store.mutate_json(json!({ "n": 2 })).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("first", json!(1)),
                ("second", json!(1)),
                ("first", json!(2)),
                ("second", json!(2)),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = store(json!({}));
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let id = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.set("a", json!(1)).unwrap();
        assert!(store.unsubscribe(id));
        store.set("a", json!(2)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_unknown_is_noop() {
        let store = store(json!({}));
        let other = store.subscribe(|_| {});
        let fresh = Store::new(StateMap::new()).subscribe(|_| {});
        assert!(!store.unsubscribe(fresh));
        assert_eq!(store.subscriber_count(), 1);
        assert!(store.unsubscribe(other));
    }

    #[test]
    fn scoped_subscription_unsubscribes_on_drop() {
        let store = store(json!({}));
        let guard = store.subscribe_scoped(|_| {});
        assert_eq!(store.subscriber_count(), 1);
        drop(guard);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn scoped_subscription_outliving_store_is_harmless() {
        let guard = {
            let store = store(json!({}));
            store.subscribe_scoped(|_| {})
        };
        let _ = guard.id();
        drop(guard);
    }

    #[test]
    fn listener_removed_mid_broadcast_still_runs_this_pass() {
        let store = store(json!({}));
        let log = Arc::new(Mutex::new(Vec::new()));
        let victim: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        {
            let store_handle = store.clone();
            let victim = Arc::clone(&victim);
            let log = Arc::clone(&log);
            store.subscribe(move |_| {
                log.lock().unwrap().push("remover");
                if let Some(id) = victim.lock().unwrap().take() {
                    store_handle.unsubscribe(id);
                }
            });
        }
        let id = {
            let log = Arc::clone(&log);
            store.subscribe(move |_| log.lock().unwrap().push("victim"))
        };
        *victim.lock().unwrap() = Some(id);

        store.set("a", json!(1)).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["remover", "victim"]);

        log.lock().unwrap().clear();
        store.set("a", json!(2)).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["remover"]);
    }

    #[test]
    fn listener_added_mid_broadcast_waits_for_next_pass() {
        let store = store(json!({}));
        let late_calls = Arc::new(AtomicUsize::new(0));
        let added = Arc::new(AtomicUsize::new(0));

        {
            let store_handle = store.clone();
            let late_calls = Arc::clone(&late_calls);
            let added = Arc::clone(&added);
            store.subscribe(move |_| {
                if added.fetch_add(1, Ordering::SeqCst) == 0 {
                    let late_calls = Arc::clone(&late_calls);
                    store_handle.subscribe(move |_| {
                        late_calls.fetch_add(1, Ordering::SeqCst);
                    });
                }
            });
        }

        store.set("a", json!(1)).unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        store.set("a", json!(2)).unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_may_mutate_reentrantly() {
        let store = store(json!({ "n": 0, "echo": 0 }));
        {
            let store_handle = store.clone();
            store.subscribe(move |state| {
                if state["n"] != state["echo"] {
                    let n = state["n"].clone();
                    store_handle.set("echo", n).unwrap();
                }
            });
        }

        store.set("n", json!(5)).unwrap();
        assert_eq!(store.get("echo"), Some(json!(5)));
    }

    #[test]
    fn persisting_store_writes_after_each_mutation() {
        let storage = Arc::new(MemoryStorage::new());
        let options = StoreOptions {
            persist: true,
            ..StoreOptions::default()
        };
        let persistor = Persistor::new(storage.clone());
        let store = Store::with_options(StateMap::new(), options, Some(persistor.clone()));

        store.set("a", json!(1)).unwrap();
        let payload = persistor.load().unwrap().unwrap();
        assert_eq!(payload.state["a"], json!(1));
        assert!(payload.written_at.is_some());
        assert!(store.get(&persistor.timestamp_key()).is_none());
    }

    #[test]
    fn persistor_is_ignored_when_persist_is_off() {
        let storage = Arc::new(MemoryStorage::new());
        let persistor = Persistor::new(storage.clone());
        let store = Store::with_options(StateMap::new(), StoreOptions::default(), Some(persistor));

        store.set("a", json!(1)).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn storage_failure_surfaces_after_broadcast() {
        let storage = Arc::new(MemoryStorage::with_quota(4));
        let options = StoreOptions {
            persist: true,
            ..StoreOptions::default()
        };
        let store = Store::with_options(StateMap::new(), options, Some(Persistor::new(storage)));

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let err = store.set("a", json!(1)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Persist(PersistError::Storage(StorageError::QuotaExceeded { .. }))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get("a"), Some(json!(1)));
    }

    #[test]
    fn clones_share_state() {
        let store = store(json!({}));
        let other = store.clone();
        other.set("shared", json!(true)).unwrap();
        assert_eq!(store.get("shared"), Some(json!(true)));
    }
}
