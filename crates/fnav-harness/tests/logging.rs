#![forbid(unsafe_code)]

//! Integration tests: what the navigator logs when it refuses work.
//!
//! Run with: cargo test -p fnav-harness --test logging

use fnav_core::Host;
use fnav_debug::log_stack;
use fnav_harness::{Fixture, assert_stack};
use fnav_runtime::{NavConfig, Outcome, PopTo, Refusal, StackViewMode, StartRequest};
use tracing_test::traced_test;

// ============================================================================
// Refusals
// ============================================================================

#[traced_test]
#[test]
fn removed_origin_is_named() {
    let mut fx = Fixture::new();
    let screens = fx.stack_of(&["app.Home", "app.Detail"]);
    let _ = fx.nav.back(Some(fx.stack)).expect("back");

    let next = fx.screen("app.Next");
    let outcome = fx
        .nav
        .start(Some(fx.stack), StartRequest::new(next).from(screens[1]))
        .expect("start");
    assert_eq!(outcome, Outcome::Refused(Refusal::DetachedOrigin));
    assert!(logs_contain("Detail has been removed, start is refused"));
    assert_stack!(fx, ["app.Home"]);
}

#[traced_test]
#[test]
fn hidden_origin_refuses_push_with_pop() {
    let mut fx = Fixture::new();
    let screens = fx.stack_of(&["app.Home", "app.Detail"]);
    let next = fx.screen("app.Next");
    let _ = fx.nav
        .start(None, StartRequest::new(next).from(screens[0]).with_pop())
        .expect("start");
    assert!(logs_contain(
        "Home is hidden, the transaction of start_with_pop() is invalid"
    ));
}

#[traced_test]
#[test]
fn unknown_pop_tag_is_logged() {
    let mut fx = Fixture::new();
    fx.stack_of(&["A", "B"]);
    let outcome = fx
        .nav
        .pop_to(Some(fx.stack), PopTo::new("Settings"))
        .expect("pop_to");
    assert_eq!(outcome, Outcome::Refused(Refusal::MissingPopTarget));
    assert!(logs_contain("Can't find tag Settings in the stack"));
    assert_stack!(fx, ["A", "B"]);
}

#[traced_test]
#[test]
fn detached_screen_has_no_stack() {
    let mut fx = Fixture::new();
    let orphan = fx.screen("app.Orphan");
    let to = fx.screen("app.Target");
    let outcome = fx
        .nav
        .start(None, StartRequest::new(to).from(orphan))
        .expect("start");
    assert_eq!(outcome, Outcome::Refused(Refusal::MissingStack));
    assert!(logs_contain(
        "Orphan's stack is null, please check if Orphan is destroyed!"
    ));
}

// ============================================================================
// Commit policy and results
// ============================================================================

#[traced_test]
#[test]
fn state_loss_commit_is_logged() {
    let mut fx = Fixture::new();
    let a = fx.root("A");
    fx.host_mut().set_state_saved(true);
    fx.push(a, "B");
    assert!(logs_contain("committing with state loss"));
}

#[traced_test]
#[test]
fn result_without_record_warns() {
    let mut fx = Fixture::new();
    let screens = fx.stack_of(&["A", "B"]);
    assert!(!fx.nav.set_result(screens[1], 1, None));
    assert!(logs_contain("set_result on a screen not started for result"));
}

// ============================================================================
// Stack view
// ============================================================================

#[traced_test]
#[test]
fn debug_stack_view_logs_the_tree() {
    let mut fx = Fixture::with_config(NavConfig::new().debug(true));
    fx.stack_of(&["app.Home", "app.Detail"]);
    assert!(log_stack(fx.host(), fx.stack, fx.nav.config()));
    assert!(logs_contain("stack tree"));
    assert_eq!(fx.host().back_stack_entry_count(fx.stack), 2);
}

#[traced_test]
#[test]
fn disabled_stack_view_is_silent() {
    let config = NavConfig::new().stack_view_mode(StackViewMode::None);
    let mut fx = Fixture::with_config(config);
    fx.stack_of(&["A"]);
    assert!(!log_stack(fx.host(), fx.stack, fx.nav.config()));
    assert!(!logs_contain("stack tree"));
}
