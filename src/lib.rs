//! Overhaul: a minimal global state container
//!
//! Overhaul keeps one mutable state blob per store, notifies registered
//! listeners synchronously after every change, binds application actions to
//! the store, and can persist state to a durable backend with time-based
//! staleness.
//!
//! # Core Concepts
//!
//! - **Store**: State plus options plus an ordered listener list; `mutate`
//!   shallow-merges a patch and broadcasts
//! - **Actions**: A tree of functions taking the store first, bound once so
//!   callers pass only their own arguments
//! - **Persistence**: Full state written with a timestamp after each mutation,
//!   rehydrated at startup unless older than the staleness window
//! - **Lifecycle**: `{ loading, data, error }` slices moved through
//!   loading/success/failure phases
//!
//! # Example
//!
//! ```rust
//! use overhaul::action_tree;
//! use overhaul::builder::StoreBuilder;
//! use overhaul::lifecycle::{generate_initial_state, settle, SliceHandle};
//! use overhaul::core::Phase;
//! use serde_json::{json, Value};
//!
//! let accessor = StoreBuilder::new()
//!     .initial_json(json!({ "questions": generate_initial_state() }))
//!     .unwrap()
//!     .actions(action_tree! {
//!         questions: {
//!             fetch => |store, _args| {
//!                 settle(store, "questions", Phase::Loading)?;
//!                 settle(store, "questions", Phase::Success(json!([{ "id": 1 }])))?;
//!                 Ok(Value::Null)
//!             },
//!         },
//!     })
//!     .build()
//!     .unwrap();
//!
//! let _guard = accessor.subscribe_scoped(|state| {
//!     // re-render with `state`
//!     let _ = state.get("questions");
//! });
//!
//! accessor.call("questions.fetch", &[]).unwrap();
//!
//! let slice = SliceHandle::new(accessor.store(), "questions").current().unwrap();
//! assert_eq!(slice.data, Some(json!([{ "id": 1 }])));
//! ```

pub mod actions;
pub mod builder;
pub mod core;
pub mod lifecycle;
pub mod persistence;
pub mod store;

// Re-export commonly used types
pub use actions::{bind, ActionTree, BoundActions};
pub use builder::{create_store, Accessor, StoreBuilder};
pub use crate::core::{AsyncSlice, Phase, StateMap};
pub use store::{Store, StoreError, StoreOptions, SubscriptionId};
