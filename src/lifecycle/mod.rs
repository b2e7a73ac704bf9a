//! Uniform loading/success/failure state for asynchronous actions.
//!
//! Each async operation owns one slice of state shaped like
//! `{ loading, data, error }`. Actions move their slice through the phases
//! with [`settle`] (or [`settle_named`] when the phase arrives as a string);
//! no transition order is enforced, though the intended sequences are
//! `loading → success` and `loading → failure`.

mod initial;
mod settle;

pub use initial::{generate_initial_state, generate_initial_state_for};
pub use settle::{preview, settle, settle_named, Outcome, SliceHandle};
