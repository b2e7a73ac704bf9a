//! Build errors for store construction.

use crate::persistence::PersistError;
use thiserror::Error;

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    /// `build` was called before an initial state was set
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    /// Initial state given as JSON was not an object
    #[error("Initial state must be a JSON object, got {0}")]
    InvalidInitialState(&'static str),

    /// `persist` was set without a storage backend
    #[error("Persistence enabled but no storage given. Pass a storage backend")]
    MissingStorage,

    /// Reading persisted state at build time failed
    #[error("Failed to rehydrate persisted state: {0}")]
    Rehydrate(#[from] PersistError),
}
