//! Builder for constructing stores.

use crate::actions::{bind, ActionTree};
use crate::builder::accessor::Accessor;
use crate::builder::error::BuildError;
use crate::core::{as_state_map, kind_of, Clock, StateMap, SystemClock};
use crate::persistence::{Persistor, Storage};
use crate::store::{Store, StoreOptions};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Builder for constructing stores with a fluent API.
pub struct StoreBuilder {
    initial: Option<StateMap>,
    actions: ActionTree,
    options: StoreOptions,
    storage: Option<Arc<dyn Storage>>,
    clock: Arc<dyn Clock>,
}

impl StoreBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            actions: ActionTree::new(),
            options: StoreOptions::default(),
            storage: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: StateMap) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the initial state from a JSON object.
    /// Returns an error if the value is not an object.
    pub fn initial_json(mut self, state: Value) -> Result<Self, BuildError> {
        let kind = kind_of(&state);
        let state = as_state_map(state).ok_or(BuildError::InvalidInitialState(kind))?;
        self.initial = Some(state);
        Ok(self)
    }

    /// Set the action tree to bind.
    pub fn actions(mut self, actions: ActionTree) -> Self {
        self.actions = actions;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Enable or disable persistence.
    pub fn persist(mut self, persist: bool) -> Self {
        self.options.persist = persist;
        self
    }

    /// Set the staleness window for persisted state.
    pub fn staleness(mut self, staleness: Duration) -> Self {
        self.options.staleness = staleness;
        self
    }

    /// Set the storage key for persisted state.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.options.storage_key = key.into();
        self
    }

    /// Choose whether persisted state is merged in at build time.
    pub fn rehydrate(mut self, rehydrate: bool) -> Self {
        self.options.rehydrate = rehydrate;
        self
    }

    /// Set the durable storage backend (required when persisting).
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replace the clock used for persistence timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the store and bind its actions.
    ///
    /// When persisting with rehydration on, stored state is read and merged
    /// into the initial state before the store exists; a stale payload is
    /// flushed.
    pub fn build(self) -> Result<Accessor, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let persistor = if self.options.persist {
            let storage = self.storage.ok_or(BuildError::MissingStorage)?;
            Some(
                Persistor::new(storage)
                    .with_clock(self.clock)
                    .with_key(self.options.storage_key.clone())
                    .with_staleness(self.options.staleness),
            )
        } else {
            None
        };

        let initial = match &persistor {
            Some(persistor) if self.options.rehydrate => persistor.rehydrate(initial)?,
            _ => initial,
        };

        tracing::debug!(
            keys = initial.len(),
            persist = self.options.persist,
            actions = self.actions.len(),
            "Building store"
        );

        let store = Store::with_options(initial, self.options, persistor);
        let actions = bind(&store, &self.actions);
        Ok(Accessor::new(store, actions))
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
