//! Builder API for store construction.
//!
//! This module composes the pieces into the boundary API used by
//! applications: a store, its bound actions, and optional persistence.

pub mod accessor;
pub mod error;
pub mod store;

pub use accessor::Accessor;
pub use error::BuildError;
pub use store::StoreBuilder;

use crate::actions::ActionTree;
use crate::core::StateMap;
use crate::persistence::Storage;
use crate::store::StoreOptions;
use std::sync::Arc;

/// Create a store from initial state, an action tree, options, and an
/// optional durable backend.
///
/// `storage` is only used when `options.persist` is set, in which case it is
/// required: `persist: true` with `None` fails with
/// [`BuildError::MissingStorage`]. Persisted state is rehydrated before the
/// store is returned.
///
/// # Example
///
/// ```
/// use overhaul::builder::create_store;
/// use overhaul::actions::ActionTree;
/// use overhaul::lifecycle::generate_initial_state_for;
/// use overhaul::store::StoreOptions;
///
/// let accessor = create_store(
///     generate_initial_state_for(["questions"]),
///     ActionTree::new(),
///     StoreOptions::default(),
///     None,
/// )
/// .unwrap();
///
/// let (state, _actions) = accessor.use_store();
/// assert!(state.contains_key("questions"));
/// ```
pub fn create_store(
    initial: StateMap,
    actions: ActionTree,
    options: StoreOptions,
    storage: Option<Arc<dyn Storage>>,
) -> Result<Accessor, BuildError> {
    let builder = StoreBuilder::new()
        .initial(initial)
        .actions(actions)
        .options(options);

    match storage {
        Some(storage) => builder.storage(storage).build(),
        None => builder.build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::as_state_map;
    use crate::persistence::MemoryStorage;
    use crate::store::StoreError;
    use serde_json::{json, Value};

    #[test]
    fn create_store_binds_actions() {
        let actions = ActionTree::new().action("hello", |_, _| Ok(json!("world")));
        let accessor = create_store(StateMap::new(), actions, StoreOptions::default(), None).unwrap();
        assert_eq!(accessor.call("hello", &[]).unwrap(), json!("world"));
    }

    #[test]
    fn create_store_rejects_persist_without_storage() {
        let options = StoreOptions {
            persist: true,
            ..StoreOptions::default()
        };
        let result = create_store(StateMap::new(), ActionTree::new(), options, None);
        assert!(matches!(result, Err(BuildError::MissingStorage)));
    }

    #[test]
    fn create_store_persists_and_rehydrates_through_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let backend: Arc<dyn Storage> = storage.clone();
        let options = StoreOptions {
            persist: true,
            ..StoreOptions::default()
        };
        let initial = as_state_map(json!({ "theme": "light", "count": 0 })).unwrap();

        let first = create_store(
            initial.clone(),
            ActionTree::new(),
            options.clone(),
            Some(backend.clone()),
        )
        .unwrap();
        first.store().set("theme", json!("dark")).unwrap();
        assert_eq!(storage.len(), 1);

        let second = create_store(initial, ActionTree::new(), options, Some(backend)).unwrap();
        assert_eq!(second.state()["theme"], json!("dark"));
        assert_eq!(second.state()["count"], json!(0));
    }

    #[test]
    fn create_store_ignores_storage_when_not_persisting() {
        let storage = Arc::new(MemoryStorage::new());
        let backend: Arc<dyn Storage> = storage.clone();
        let accessor = create_store(
            StateMap::new(),
            ActionTree::new(),
            StoreOptions::default(),
            Some(backend),
        )
        .unwrap();

        accessor.store().set("a", json!(1)).unwrap();
        assert!(storage.is_empty());
        assert!(accessor.store().persistor().is_none());
    }

    #[test]
    fn action_failure_reaches_the_caller() {
        let actions = ActionTree::new().action("submit", |store, args| {
            if args.is_empty() {
                return Err(StoreError::ActionFailed("nothing to submit".to_string()));
            }
            store.set("submitted", json!(true))?;
            Ok(Value::Null)
        });
        let accessor = create_store(StateMap::new(), actions, StoreOptions::default(), None).unwrap();

        let err = accessor.call("submit", &[]).unwrap_err();
        assert!(matches!(&err, StoreError::ActionFailed(msg) if msg == "nothing to submit"));
        assert_eq!(err.to_string(), "Action failed: nothing to submit");
        assert!(accessor.state().get("submitted").is_none());

        accessor.call("submit", &[json!(1)]).unwrap();
        assert_eq!(accessor.state()["submitted"], json!(true));
    }

    #[test]
    fn accessor_subscription_sees_action_mutations() {
        let actions = ActionTree::new().action("set", |store, args| {
            store.set("v", args.first().cloned().unwrap_or(Value::Null))?;
            Ok(Value::Null)
        });
        let accessor = create_store(StateMap::new(), actions, StoreOptions::default(), None).unwrap();

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let id = accessor.subscribe(move |state| {
            seen_clone.lock().unwrap().push(state["v"].clone());
        });

        accessor.call("set", &[json!(1)]).unwrap();
        assert!(accessor.unsubscribe(id));
        accessor.call("set", &[json!(2)]).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![json!(1)]);
        assert_eq!(accessor.state()["v"], json!(2));
    }

    #[test]
    fn accessor_scoped_subscription() {
        let accessor =
            create_store(StateMap::new(), ActionTree::new(), StoreOptions::default(), None).unwrap();
        {
            let _guard = accessor.subscribe_scoped(|_| {});
            assert_eq!(accessor.store().subscriber_count(), 1);
        }
        assert_eq!(accessor.store().subscriber_count(), 0);
        assert!(accessor.actions().is_empty());
    }
}
