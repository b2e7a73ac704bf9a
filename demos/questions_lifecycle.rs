//! Questions Lifecycle
//!
//! This example drives an async slice through loading, success, and failure
//! from bound actions while a subscriber plays the role of a UI re-render.
//!
//! Key concepts:
//! - `action_tree!` with a nested group
//! - Bound actions called by dotted path
//! - Test-mode previews that leave the store untouched
//!
//! Run with: cargo run --example questions_lifecycle

use overhaul::action_tree;
use overhaul::builder::create_store;
use overhaul::core::Phase;
use overhaul::lifecycle::{generate_initial_state_for, settle, settle_named};
use overhaul::store::StoreOptions;
use serde_json::{json, Value};

fn main() {
    println!("=== Questions Lifecycle ===\n");

    let actions = action_tree! {
        questions: {
            fetch => |store, args| {
                settle(store, "questions", Phase::Loading)?;
                match args.first() {
                    Some(Value::String(reason)) => {
                        settle(store, "questions", Phase::Failure(json!(reason)))?;
                    }
                    _ => {
                        let data = json!([
                            { "id": 1, "text": "What is ownership?" },
                            { "id": 2, "text": "Why borrow?" },
                        ]);
                        settle(store, "questions", Phase::Success(data))?;
                    }
                }
                Ok(Value::Null)
            },
        },
        title = json!("Quiz"),
    };

    let accessor = create_store(
        generate_initial_state_for(["questions"]),
        actions,
        StoreOptions::default(),
        None,
    )
    .unwrap();

    println!("Bound actions: {}", accessor.actions());

    let _render = accessor.subscribe_scoped(|state| {
        println!("  render: {}", state["questions"]);
    });

    println!("\nFetching successfully:");
    accessor.call("questions.fetch", &[]).unwrap();

    println!("\nFetching with a network error:");
    accessor.call("questions.fetch", &[json!("timeout")]).unwrap();

    println!("\nPreviewing phases in test mode (no render expected):");
    for phase in ["loading", "success", "failure", "retrying"] {
        let outcome =
            settle_named(accessor.store(), "questions", phase, json!("preview"), true).unwrap();
        println!("  {phase:<9} -> {outcome:?}");
    }

    let (state, _) = accessor.use_store();
    println!("\nFinal slice: {}", state["questions"]);

    println!("\n=== Example Complete ===");
}
