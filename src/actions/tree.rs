//! Unbound action trees as written by the application.

use crate::store::{Store, StoreError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Application action taking the store first, then call-time arguments.
pub type ActionFn = Arc<dyn Fn(&Store, &[Value]) -> Result<Value, StoreError> + Send + Sync>;

/// One entry of an action tree.
#[derive(Clone)]
pub enum ActionNode {
    /// Callable leaf
    Action(ActionFn),
    /// Nested group of actions
    Group(ActionTree),
    /// Plain data leaf; carried by the tree but dropped when binding
    Value(Value),
}

impl fmt::Debug for ActionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(_) => f.write_str("Action(..)"),
            Self::Group(tree) => f.debug_tuple("Group").field(tree).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Named, possibly nested collection of actions.
///
/// # Example
///
/// ```rust
/// use overhaul::actions::ActionTree;
/// use serde_json::{json, Value};
///
/// let tree = ActionTree::new()
///     .action("reset", |store, _args| {
///         store.set("count", json!(0))?;
///         Ok(Value::Null)
///     })
///     .group(
///         "profile",
///         ActionTree::new().action("rename", |store, args| {
///             store.set("name", args.first().cloned().unwrap_or(Value::Null))?;
///             Ok(Value::Null)
///         }),
///     );
///
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ActionTree {
    nodes: BTreeMap<String, ActionNode>,
}

impl ActionTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callable leaf.
    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Store, &[Value]) -> Result<Value, StoreError> + Send + Sync + 'static,
    {
        self.nodes
            .insert(name.into(), ActionNode::Action(Arc::new(action)));
        self
    }

    /// Add a nested group.
    pub fn group(mut self, name: impl Into<String>, tree: ActionTree) -> Self {
        self.nodes.insert(name.into(), ActionNode::Group(tree));
        self
    }

    /// Add a plain data leaf.
    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.nodes.insert(name.into(), ActionNode::Value(value));
        self
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, node: ActionNode) -> Option<ActionNode> {
        self.nodes.insert(name.into(), node)
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&ActionNode> {
        self.nodes.get(name)
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionNode)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }
}
