//! Durable persistence of store state with time-based staleness.
//!
//! After every mutation of a persisting store the full state is written to a
//! [`Storage`] backend together with a write timestamp. At startup the payload
//! is either merged back into the initial state or, once older than the
//! staleness window, discarded.
//!
//! # Payload format
//!
//! The payload is one JSON object stored under the persistence key. It holds
//! every state field plus one reserved field, `"<key>_currentTimestamp"`,
//! carrying the write time in milliseconds since the Unix epoch. The reserved
//! field is namespaced by the persistence key; state that uses the same name
//! is refused on write.

use crate::core::{as_state_map, shallow_merge, Clock, StateMap, SystemClock};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub mod storage;

pub use error::{PersistError, StorageError};
pub use storage::{FileStorage, MemoryStorage, Storage};

/// Storage key the payload is written under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "__OVERHAUL_MEMORIZE__";

/// Age after which a persisted payload is discarded (24 hours)
pub const DEFAULT_STALENESS: Duration = Duration::from_millis(86_400_000);

/// Suffix appended to the storage key to name the reserved timestamp field
const TIMESTAMP_SUFFIX: &str = "_currentTimestamp";

/// Decoded persisted payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistedPayload {
    /// Persisted state fields, reserved timestamp field removed
    pub state: StateMap,

    /// Write time in milliseconds since the Unix epoch, if one was recorded
    pub written_at: Option<i64>,
}

impl PersistedPayload {
    /// Serialize the payload, adding the reserved timestamp field.
    ///
    /// Fails with [`PersistError::ReservedKey`] if the state already holds a
    /// field named `timestamp_key`; decoding would strip it.
    pub fn encode(&self, timestamp_key: &str) -> Result<String, PersistError> {
        if self.state.contains_key(timestamp_key) {
            tracing::warn!(key = timestamp_key, "State uses the reserved timestamp key");
            return Err(PersistError::ReservedKey(timestamp_key.to_string()));
        }

        let mut fields = self.state.clone();
        if let Some(written_at) = self.written_at {
            fields.insert(timestamp_key.to_string(), Value::from(written_at));
        }
        serde_json::to_string(&fields).map_err(PersistError::SerializationFailed)
    }

    /// Parse a raw payload, splitting off the reserved timestamp field.
    ///
    /// Fails if the payload is not a JSON object. A timestamp that is absent
    /// or not numeric decodes as `None`.
    pub fn decode(raw: &str, timestamp_key: &str) -> Result<Self, PersistError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| PersistError::MalformedPayload(e.to_string()))?;
        let mut state = as_state_map(value).ok_or_else(|| {
            PersistError::MalformedPayload("payload is not a JSON object".to_string())
        })?;

        let written_at = state.remove(timestamp_key).and_then(|ts| {
            ts.as_i64()
                .or_else(|| ts.as_f64().map(|millis| millis as i64))
        });

        Ok(Self { state, written_at })
    }
}

/// Reads and writes store state to a durable backend.
///
/// # Example
///
/// ```rust
/// use overhaul::persistence::{MemoryStorage, Persistor};
/// use overhaul::core::StateMap;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let persistor = Persistor::new(Arc::new(MemoryStorage::new()));
///
/// let mut state = StateMap::new();
/// state.insert("theme".into(), json!("dark"));
/// persistor.persist(&state).unwrap();
///
/// let restored = persistor.rehydrate(StateMap::new()).unwrap();
/// assert_eq!(restored["theme"], json!("dark"));
/// ```
#[derive(Clone)]
pub struct Persistor {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    key: String,
    staleness: Duration,
}

impl Persistor {
    /// Persist to `storage` under the default key with the system clock.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            key: DEFAULT_STORAGE_KEY.to_string(),
            staleness: DEFAULT_STALENESS,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Persist under `key` instead of the default.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Change the staleness window.
    pub fn with_staleness(mut self, staleness: Duration) -> Self {
        self.staleness = staleness;
        self
    }

    /// Storage key the payload lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name of the reserved timestamp field inside the payload.
    pub fn timestamp_key(&self) -> String {
        format!("{}{}", self.key, TIMESTAMP_SUFFIX)
    }

    /// Staleness window.
    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    /// Whether a payload written at `written_at` (epoch millis) is stale now.
    ///
    /// Stale means strictly older than the staleness window. Timestamps in the
    /// future are never stale.
    pub fn is_stale(&self, written_at: i64) -> bool {
        let age = i128::from(self.clock.now_millis()) - i128::from(written_at);
        age > self.staleness.as_millis() as i128
    }

    /// Read and decode the stored payload, if any.
    pub fn load(&self) -> Result<Option<PersistedPayload>, PersistError> {
        self.storage
            .get(&self.key)?
            .map(|raw| PersistedPayload::decode(&raw, &self.timestamp_key()))
            .transpose()
    }

    /// Produce the effective initial state.
    ///
    /// Without a payload, `initial` is returned unchanged. A stale payload is
    /// flushed and `initial` is returned unchanged. Otherwise the payload is
    /// merged over `initial`, payload fields winning. A payload without a
    /// readable timestamp has no age, so it is never stale and is merged.
    pub fn rehydrate(&self, initial: StateMap) -> Result<StateMap, PersistError> {
        let Some(payload) = self.load()? else {
            tracing::debug!(key = %self.key, "No persisted state found");
            return Ok(initial);
        };

        match payload.written_at {
            Some(written_at) if !self.is_stale(written_at) => {
                tracing::info!(
                    key = %self.key,
                    fields = payload.state.len(),
                    written_at,
                    "Rehydrated persisted state"
                );
                Ok(shallow_merge(&initial, payload.state))
            }
            Some(written_at) => {
                tracing::info!(key = %self.key, written_at, "Discarding stale persisted state");
                self.flush()?;
                Ok(initial)
            }
            None => {
                tracing::warn!(
                    key = %self.key,
                    fields = payload.state.len(),
                    "Persisted state has no timestamp, rehydrating without staleness check"
                );
                Ok(shallow_merge(&initial, payload.state))
            }
        }
    }

    /// Write `state` with a fresh timestamp, replacing any prior payload.
    pub fn persist(&self, state: &StateMap) -> Result<(), PersistError> {
        let payload = PersistedPayload {
            state: state.clone(),
            written_at: Some(self.clock.now_millis()),
        };
        let raw = payload.encode(&self.timestamp_key())?;
        self.storage.set(&self.key, &raw)?;
        tracing::debug!(key = %self.key, bytes = raw.len(), "Persisted state");
        Ok(())
    }

    /// Remove the whole persisted payload.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.storage.remove(&self.key)?;
        tracing::debug!(key = %self.key, "Flushed persisted state");
        Ok(())
    }
}

impl std::fmt::Debug for Persistor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistor")
            .field("key", &self.key)
            .field("staleness", &self.staleness)
            .finish_non_exhaustive()
    }
}
