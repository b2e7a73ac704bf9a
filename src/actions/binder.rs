//! Binding action trees to a store.

use crate::actions::tree::{ActionFn, ActionNode, ActionTree};
use crate::store::{Store, StoreError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Action with its store pre-applied.
#[derive(Clone)]
pub struct BoundAction {
    store: Store,
    action: ActionFn,
}

impl BoundAction {
    /// Invoke the action; `args` follow the store.
    pub fn call(&self, args: &[Value]) -> Result<Value, StoreError> {
        (self.action)(&self.store, args)
    }

    /// Store this action is bound to.
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoundAction(..)")
    }
}

/// One entry of a bound tree.
#[derive(Clone, Debug)]
pub enum BoundNode {
    /// Callable leaf
    Action(BoundAction),
    /// Nested namespace
    Group(BoundActions),
}

/// Action tree with every callable leaf bound to a store.
///
/// Mirrors the shape of the [`ActionTree`] it was built from, minus plain
/// data leaves.
#[derive(Clone, Debug, Default)]
pub struct BoundActions {
    nodes: BTreeMap<String, BoundNode>,
}

impl BoundActions {
    /// Look up a direct entry.
    pub fn get(&self, name: &str) -> Option<&BoundNode> {
        self.nodes.get(name)
    }

    /// Look up a direct action entry.
    pub fn action(&self, name: &str) -> Option<&BoundAction> {
        match self.nodes.get(name) {
            Some(BoundNode::Action(action)) => Some(action),
            _ => None,
        }
    }

    /// Look up a direct group entry.
    pub fn group(&self, name: &str) -> Option<&BoundActions> {
        match self.nodes.get(name) {
            Some(BoundNode::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Resolve a dotted path such as `"questions.fetch"` to an action.
    pub fn resolve(&self, path: &str) -> Option<&BoundAction> {
        let (groups, leaf) = match path.rsplit_once('.') {
            Some((groups, leaf)) => (Some(groups), leaf),
            None => (None, path),
        };

        let mut current = self;
        for segment in groups.into_iter().flat_map(|groups| groups.split('.')) {
            current = current.group(segment)?;
        }
        current.action(leaf)
    }

    /// Resolve `path` and invoke the action with `args`.
    pub fn call(&self, path: &str, args: &[Value]) -> Result<Value, StoreError> {
        self.resolve(path)
            .ok_or_else(|| StoreError::UnknownAction(path.to_string()))?
            .call(args)
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Entry names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

/// Bind every callable leaf of `tree` to `store`.
///
/// Groups are bound recursively under the same name; data leaves are
/// omitted. `tree` is left untouched.
pub fn bind(store: &Store, tree: &ActionTree) -> BoundActions {
    let nodes = tree
        .iter()
        .filter_map(|(name, node)| {
            let bound = match node {
                ActionNode::Action(action) => BoundNode::Action(BoundAction {
                    store: store.clone(),
                    action: action.clone(),
                }),
                ActionNode::Group(group) => BoundNode::Group(bind(store, group)),
                ActionNode::Value(_) => return None,
            };
            Some((name.to_string(), bound))
        })
        .collect();

    BoundActions { nodes }
}

impl fmt::Display for BoundActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn walk(
            actions: &BoundActions,
            prefix: &str,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            for (name, node) in &actions.nodes {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                match node {
                    BoundNode::Action(_) => writeln!(f, "{path}")?,
                    BoundNode::Group(group) => walk(group, &path, f)?,
                }
            }
            Ok(())
        }
        walk(self, "", f)
    }
}
