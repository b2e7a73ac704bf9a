//! Store configuration.

use crate::persistence::{DEFAULT_STALENESS, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options fixed at store construction.
///
/// Deserializes from JSON with every field optional:
///
/// ```rust
/// use overhaul::store::StoreOptions;
///
/// let options: StoreOptions = serde_json::from_str(r#"{ "persist": true }"#).unwrap();
/// assert!(options.persist);
/// assert_eq!(options.staleness.as_millis(), 86_400_000);
/// assert_eq!(options.storage_key, "__OVERHAUL_MEMORIZE__");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Write state to durable storage after every mutation
    pub persist: bool,

    /// Age after which persisted state is discarded at startup
    #[serde(rename = "staleness_ms", with = "millis")]
    pub staleness: Duration,

    /// Storage key the persisted payload lives under
    pub storage_key: String,

    /// Merge persisted state into the initial state at construction
    pub rehydrate: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            persist: false,
            staleness: DEFAULT_STALENESS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            rehydrate: true,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_persistence() {
        let options = StoreOptions::default();
        assert!(!options.persist);
        assert!(options.rehydrate);
        assert_eq!(options.staleness, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let options: StoreOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, StoreOptions::default());
    }

    #[test]
    fn staleness_serializes_as_millis() {
        let options = StoreOptions {
            staleness: Duration::from_secs(2),
            ..StoreOptions::default()
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["staleness_ms"], 2000);

        let back: StoreOptions = serde_json::from_value(json).unwrap();
        assert_eq!(back, options);
    }
}
