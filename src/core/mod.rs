//! Core store types and logic.
//!
//! This module contains the pure functional core of the store:
//! - The state map and its shallow merge law
//! - Async slice shapes and phase arithmetic
//! - The clock abstraction used for persistence timestamps
//!
//! Nothing in this module touches a store or a storage backend.

mod clock;
mod slice;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use slice::{next_slice, preview_slice, AsyncSlice, Phase};
pub use state::{as_state_map, kind_of, shallow_merge, StateMap};
