//! Action trees and binding them to a store.
//!
//! Applications describe their actions as an [`ActionTree`]: callable leaves
//! that take the store as their first argument, nested groups, and plain data
//! leaves. [`bind`] walks the tree once and produces [`BoundActions`] of the
//! same shape in which every callable already carries the store, so callers
//! only pass their own arguments.

pub mod binder;
pub mod macros;
pub mod tree;

pub use binder::{bind, BoundAction, BoundActions, BoundNode};
pub use tree::{ActionFn, ActionNode, ActionTree};
