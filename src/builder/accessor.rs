//! The composed store handle handed to UI adapters.

use crate::actions::BoundActions;
use crate::core::StateMap;
use crate::store::{Store, StoreError, Subscription, SubscriptionId};
use serde_json::Value;

/// A store together with its bound actions.
///
/// UI adapters call [`use_store`](Self::use_store) for the current state and
/// actions, and register a re-render callback with
/// [`subscribe`](Self::subscribe) or [`subscribe_scoped`](Self::subscribe_scoped).
#[derive(Clone, Debug)]
pub struct Accessor {
    store: Store,
    actions: BoundActions,
}

impl Accessor {
    pub(crate) fn new(store: Store, actions: BoundActions) -> Self {
        Self { store, actions }
    }

    /// Current state and the bound actions.
    pub fn use_store(&self) -> (StateMap, &BoundActions) {
        (self.store.state(), &self.actions)
    }

    /// Clone of the current state.
    pub fn state(&self) -> StateMap {
        self.store.state()
    }

    /// Actions bound to this store.
    pub fn actions(&self) -> &BoundActions {
        &self.actions
    }

    /// Underlying store handle.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Invoke the bound action at a dotted `path`.
    pub fn call(&self, path: &str, args: &[Value]) -> Result<Value, StoreError> {
        self.actions.call(path, args)
    }

    /// Register a re-render callback; see [`Store::subscribe`].
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateMap) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Register a callback removed when the guard drops.
    pub fn subscribe_scoped<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StateMap) + Send + Sync + 'static,
    {
        self.store.subscribe_scoped(callback)
    }

    /// Remove a callback by id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}
