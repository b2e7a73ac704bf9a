//! Macros for ergonomic action tree construction.

/// Build an [`ActionTree`](crate::actions::ActionTree) declaratively.
///
/// - `name => expr` adds a callable leaf
/// - `name: { ... }` adds a nested group
/// - `name = expr` adds a plain data leaf
///
/// # Example
///
/// ```
/// use overhaul::action_tree;
/// use serde_json::{json, Value};
///
/// let tree = action_tree! {
///     reset => |store, _args| {
///         store.set("count", json!(0))?;
///         Ok(Value::Null)
///     },
///     questions: {
///         clear => |store, _args| {
///             store.set("questions", Value::Null)?;
///             Ok(Value::Null)
///         },
///     },
///     version = json!("1.0"),
/// };
///
/// assert_eq!(tree.len(), 3);
/// ```
#[macro_export]
macro_rules! action_tree {
    (@entries $tree:ident; ) => {
        $tree
    };

    (@entries $tree:ident; $name:ident : { $($inner:tt)* } $(, $($rest:tt)*)?) => {{
        let $tree = $tree.group(stringify!($name), $crate::action_tree!($($inner)*));
        $crate::action_tree!(@entries $tree; $($($rest)*)?)
    }};

    (@entries $tree:ident; $name:ident => $action:expr $(, $($rest:tt)*)?) => {{
        let $tree = $tree.action(stringify!($name), $action);
        $crate::action_tree!(@entries $tree; $($($rest)*)?)
    }};

    (@entries $tree:ident; $name:ident = $value:expr $(, $($rest:tt)*)?) => {{
        let $tree = $tree.value(stringify!($name), $value);
        $crate::action_tree!(@entries $tree; $($($rest)*)?)
    }};

    () => {
        $crate::actions::ActionTree::new()
    };

    ($($body:tt)+) => {{
        let tree = $crate::actions::ActionTree::new();
        $crate::action_tree!(@entries tree; $($body)+)
    }};
}
