//! Store error types.

use crate::persistence::PersistError;
use thiserror::Error;

/// Errors surfaced by store operations and bound actions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing state to durable storage failed after a mutation
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// A state patch was not a JSON object
    #[error("State patch must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// No bound action exists at the given path
    #[error("No action bound at '{0}'")]
    UnknownAction(String),

    /// An application action reported a failure
    #[error("Action failed: {0}")]
    ActionFailed(String),
}
