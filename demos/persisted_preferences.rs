//! Persisted Preferences
//!
//! This example persists store state to a directory with `FileStorage`,
//! then builds a second store over the same directory to show rehydration
//! and the staleness window.
//!
//! Key concepts:
//! - Persist-after-mutate with a file backend
//! - Rehydration merging stored fields over new initial state
//! - Discarding stale state with a controllable clock
//!
//! Run with: cargo run --example persisted_preferences

use chrono::Duration;
use overhaul::builder::StoreBuilder;
use overhaul::core::{ManualClock, StateMap};
use overhaul::persistence::{FileStorage, Storage};
use serde_json::json;
use std::sync::Arc;

fn preferences() -> StateMap {
    let mut state = StateMap::new();
    state.insert("theme".into(), json!("light"));
    state.insert("font_size".into(), json!(14));
    state
}

fn main() {
    println!("=== Persisted Preferences ===\n");

    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(dir.path()).unwrap());
    let clock = Arc::new(ManualClock::from_millis(1_700_000_000_000));

    let build = || {
        StoreBuilder::new()
            .initial(preferences())
            .persist(true)
            .storage(storage.clone())
            .clock(clock.clone())
            .build()
            .unwrap()
    };

    let first = build();
    first.store().set("theme", json!("dark")).unwrap();
    println!("Session 1 state: {:?}", first.state());
    println!("Stored under:    {}", dir.path().display());

    clock.advance(Duration::hours(23));
    let second = build();
    println!("\nAfter 23 hours:  {:?}", second.state());

    clock.advance(Duration::hours(25));
    let third = build();
    println!("After 48 hours:  {:?}", third.state());

    println!("\n=== Example Complete ===");
}
