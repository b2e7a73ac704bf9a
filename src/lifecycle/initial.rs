//! Initial-state generation for async slices.

use crate::core::{AsyncSlice, StateMap};
use serde_json::Value;

/// Canonical empty async slice: `{ "loading": false, "data": null, "error": null }`.
pub fn generate_initial_state() -> Value {
    AsyncSlice::default().to_value()
}

/// State map with an empty async slice under each of `keys`.
///
/// # Example
///
/// ```rust
/// use overhaul::lifecycle::{generate_initial_state, generate_initial_state_for};
///
/// let state = generate_initial_state_for(["questions", "answers"]);
/// assert_eq!(state.len(), 2);
/// assert_eq!(state["answers"], generate_initial_state());
/// ```
pub fn generate_initial_state_for<I, K>(keys: I) -> StateMap
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    keys.into_iter()
        .map(|key| (key.into(), generate_initial_state()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initial_state_has_canonical_shape() {
        assert_eq!(
            generate_initial_state(),
            json!({ "loading": false, "data": null, "error": null })
        );
    }

    #[test]
    fn initial_state_for_keys() {
        let state = generate_initial_state_for(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(state.values().all(|slice| *slice == generate_initial_state()));
    }

    #[test]
    fn initial_state_for_no_keys_is_empty() {
        assert!(generate_initial_state_for(Vec::<String>::new()).is_empty());
    }
}
