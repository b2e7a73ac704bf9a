//! Applying async phases to store slices.

use crate::core::{next_slice, preview_slice, AsyncSlice, Phase};
use crate::store::{Store, StoreError};
use serde_json::Value;

/// Result of [`settle_named`].
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The next slice was written to the store.
    Applied,
    /// Test mode: the computed value, store untouched.
    Preview(Value),
    /// Unknown phase name; nothing happened.
    Ignored,
}

impl Outcome {
    /// Whether the phase name was not recognised.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Compute the next slice for `key` under `phase` and write it to the store.
///
/// The slice currently stored under `key` is spread first, so only the
/// fields the phase touches change.
pub fn settle(store: &Store, key: &str, phase: Phase) -> Result<(), StoreError> {
    let next = store.read(|state| next_slice(state.get(key), &phase));
    tracing::debug!(key, phase = phase.name(), "Settling action state");
    store.set(key, next)
}

/// Compute what `phase` would report for `key` without touching the store.
///
/// `loading` yields exactly `{ "loading": true }`; `success` and `failure`
/// yield the full next slice.
pub fn preview(store: &Store, key: &str, phase: &Phase) -> Value {
    store.read(|state| preview_slice(state.get(key), phase))
}

/// Apply a phase given by name.
///
/// `data` is the success payload or the failure error. With `test_mode` set
/// the store is left alone and the preview is returned instead. Unknown
/// phase names are not an error and yield [`Outcome::Ignored`].
///
/// # Example
///
/// ```rust
/// use overhaul::lifecycle::{generate_initial_state, settle_named, Outcome};
/// use overhaul::store::Store;
/// use serde_json::json;
///
/// let store = Store::from_json(json!({ "questions": generate_initial_state() })).unwrap();
///
/// settle_named(&store, "questions", "loading", json!(null), false).unwrap();
/// assert_eq!(store.get("questions").unwrap()["loading"], json!(true));
///
/// let outcome = settle_named(&store, "questions", "retrying", json!(null), false).unwrap();
/// assert_eq!(outcome, Outcome::Ignored);
/// ```
pub fn settle_named(
    store: &Store,
    key: &str,
    phase: &str,
    data: Value,
    test_mode: bool,
) -> Result<Outcome, StoreError> {
    let Some(phase) = Phase::parse(phase, data) else {
        tracing::debug!(key, phase, "Ignoring unknown action phase");
        return Ok(Outcome::Ignored);
    };

    if test_mode {
        return Ok(Outcome::Preview(preview(store, key, &phase)));
    }

    settle(store, key, phase)?;
    Ok(Outcome::Applied)
}

/// Handle on one async slice of a store.
///
/// # Example
///
/// ```rust
/// use overhaul::lifecycle::{generate_initial_state, SliceHandle};
/// use overhaul::store::Store;
/// use serde_json::json;
///
/// let store = Store::from_json(json!({ "user": generate_initial_state() })).unwrap();
/// let user = SliceHandle::new(&store, "user");
///
/// user.track(|| Ok(json!({ "name": "ada" }))).unwrap();
///
/// let slice = user.current().unwrap();
/// assert!(!slice.loading);
/// assert_eq!(slice.data, Some(json!({ "name": "ada" })));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SliceHandle<'a> {
    store: &'a Store,
    key: &'a str,
}

impl<'a> SliceHandle<'a> {
    /// Handle on the slice stored under `key`.
    pub fn new(store: &'a Store, key: &'a str) -> Self {
        Self { store, key }
    }

    /// Mark the slice as loading.
    pub fn loading(&self) -> Result<(), StoreError> {
        settle(self.store, self.key, Phase::Loading)
    }

    /// Store `data` and clear loading.
    pub fn success(&self, data: Value) -> Result<(), StoreError> {
        settle(self.store, self.key, Phase::Success(data))
    }

    /// Store `error` and clear loading; prior data is kept.
    pub fn failure(&self, error: Value) -> Result<(), StoreError> {
        settle(self.store, self.key, Phase::Failure(error))
    }

    /// Current slice, if the stored value has the slice shape.
    pub fn current(&self) -> Option<AsyncSlice> {
        self.store.get(self.key).as_ref().and_then(AsyncSlice::from_value)
    }

    /// Mark loading, run `op`, then record its success or failure.
    ///
    /// The `Err` side of `op` is stored as the slice error; only store errors
    /// are returned.
    pub fn track<F>(&self, op: F) -> Result<(), StoreError>
    where
        F: FnOnce() -> Result<Value, Value>,
    {
        self.loading()?;
        match op() {
            Ok(data) => self.success(data),
            Err(error) => self.failure(error),
        }
    }
}
