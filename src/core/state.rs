//! Store state representation and the shallow merge law.
//!
//! State is an open mapping from string keys to JSON values. Top-level keys
//! are independent: a merge replaces or creates top-level keys wholesale and
//! never descends into nested objects.

use serde_json::{Map, Value};

/// The state blob held by a store.
///
/// Keys are application-defined; values are arbitrary serializable data.
pub type StateMap = Map<String, Value>;

/// Merge `partial` into `base` at the top level, returning the new state.
///
/// Keys in `partial` fully replace same-named keys in `base`; every other key
/// of `base` is carried over unchanged. Nested objects are never merged.
///
/// # Example
///
/// ```rust
/// use overhaul::core::{shallow_merge, StateMap};
/// use serde_json::json;
///
/// let base: StateMap = serde_json::from_value(json!({
///     "user": { "name": "ada", "age": 36 },
///     "theme": "dark",
/// })).unwrap();
/// let partial: StateMap = serde_json::from_value(json!({
///     "user": { "name": "grace" },
/// })).unwrap();
///
/// let merged = shallow_merge(&base, partial);
/// assert_eq!(merged["user"], json!({ "name": "grace" }));
/// assert_eq!(merged["theme"], json!("dark"));
/// ```
pub fn shallow_merge(base: &StateMap, partial: StateMap) -> StateMap {
    let mut merged = base.clone();
    merged.extend(partial);
    merged
}

/// Interpret a JSON value as a state map.
///
/// Returns `None` when the value is not an object, since only objects can
/// take part in a top-level merge.
pub fn as_state_map(value: Value) -> Option<StateMap> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Short human-readable label for a JSON value's kind, used in diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
