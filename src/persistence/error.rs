//! Persistence error types.

use thiserror::Error;

/// Errors raised by a durable storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Backend refused the write because it would exceed its capacity
    #[error("Storage quota exceeded: limit {limit} bytes, needed {needed} bytes")]
    QuotaExceeded { limit: usize, needed: usize },

    /// Key cannot be represented by this backend
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// Backend-specific failure
    #[error("Storage backend failed: {0}")]
    Backend(String),
}

/// Errors that can occur while persisting or rehydrating state
#[derive(Debug, Error)]
pub enum PersistError {
    /// The storage backend failed on read, write, or remove
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// State could not be serialized to JSON
    #[error("Serialization failed: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// State holds a key that would be overwritten by the reserved timestamp field
    #[error("State key '{0}' is reserved for the persistence timestamp")]
    ReservedKey(String),

    /// Stored payload is not valid serialized state
    #[error("Malformed persisted payload: {0}")]
    MalformedPayload(String),
}
