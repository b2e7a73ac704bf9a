//! State container and broadcast registry.
//!
//! A [`Store`] owns the state blob, its options, and an ordered list of
//! listeners. [`Store::mutate`] is the only state transition: it shallow-merges
//! a patch, notifies every listener synchronously, and optionally persists.

pub mod error;
pub mod options;
mod store;
mod subscribers;

pub use error::StoreError;
pub use options::StoreOptions;
pub use store::{Store, Subscription};
pub use subscribers::{Subscriber, SubscriptionId};
