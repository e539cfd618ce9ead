#![forbid(unsafe_code)]

//! Integration tests: argument stores and saved state across a host
//! state save, through their serialized form.
//!
//! Run with: cargo test -p fnav-harness --test persistence

use fnav_core::{ArgStore, Host, SavedScreenState};
use fnav_harness::Fixture;
use fnav_runtime::StartRequest;

// ============================================================================
// Argument store
// ============================================================================

#[test]
fn pushed_args_serialize_under_stable_keys() {
    let mut fx = Fixture::new();
    let a = fx.root("A");
    let b = fx.screen("B");
    fx.host_mut()
        .args_mut(b)
        .expect("args")
        .extras
        .put("id", 42_i64);
    let _ = fx.nav
        .start(None, StartRequest::new(b).from(a).for_result(5))
        .expect("start");

    let args = fx.host().args(b).cloned().expect("args");
    let value = serde_json::to_value(&args).expect("json");
    assert!(value.get("fragmentation_arg_container").is_some());
    assert_eq!(value["fragmentation_arg_is_root"], false);
    assert_eq!(value["fragment_arg_result_record"]["request_code"], 5);
    assert_eq!(value["id"], 42);

    let back: ArgStore = serde_json::from_value(value).expect("parse");
    assert_eq!(back, args);
}

// ============================================================================
// Saved state
// ============================================================================

#[test]
fn hidden_status_survives_save_and_restore() {
    let mut fx = Fixture::new();
    let screens = fx.stack_of(&["A", "B"]);
    let saved = fx.host().save_state(screens[0]).expect("state");
    assert!(saved.is_hidden);

    let json = serde_json::to_string(&saved).expect("json");
    let restored: SavedScreenState = serde_json::from_str(&json).expect("parse");
    assert_eq!(restored, saved);

    fx.host_mut()
        .screen_info_mut(screens[0])
        .expect("info")
        .hidden = false;
    fx.host_mut().restore_state(screens[0], &restored);
    assert!(fx.host().screen(screens[0]).expect("info").hidden);
}
