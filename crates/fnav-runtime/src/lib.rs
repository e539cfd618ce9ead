#![forbid(unsafe_code)]

//! Navigation-stack controller.
//!
//! [`Navigator`] drives a [`Host`](fnav_core::Host): it pushes, pops and
//! replaces screens through atomic host transactions, resolves launch modes,
//! keeps popped screens' exit animations alive, routes results to the
//! screen below, and dispatches back actions through nested stacks.
//!
//! The navigator is single-threaded and cooperative. Deferred work is
//! queued on its own message loop; the embedder calls [`Navigator::tick`]
//! once per host loop iteration and reports animation ends through
//! [`Navigator::on_animation_end`].
//!
//! # Example
//!
//! ```ignore
//! let mut nav = Navigator::new(host);
//! nav.load_root(Some(stack), container, home)?;
//! nav.start(None, StartRequest::new(detail).from(home).for_result(7))?;
//! nav.tick();
//! ```

pub mod back;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod looper;
pub mod mock;
pub mod navigator;
pub mod pop;
pub mod request;
pub mod result;

pub use clock::MonotonicClock;
pub use config::{ConfigError, NavConfig, StackViewMode};
pub use error::{ExceptionHandler, NavError, Outcome, Refusal};
pub use looper::MessageLoop;
pub use mock::{AnimationMocker, MockOutcome, MockPhase};
pub use navigator::{MAX_IDLE_TICKS, Navigator};
pub use request::{AfterPop, PopTo, StartRequest};

#[cfg(test)]
mod tests {
    use super::*;
    use fnav_core::testing::MemoryHost;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn unresolved_stack_names_the_origin() {
        let mut host = MemoryHost::new();
        let b = host.create_screen("demo.Detail");
        let mut nav = Navigator::new(host);
        let outcome = nav.start(None, StartRequest::new(b)).expect("start");
        assert_eq!(outcome, Outcome::Refused(Refusal::MissingStack));
        assert!(logs_contain("Screen's stack is null"));
    }

    #[traced_test]
    #[test]
    fn missing_pop_target_is_logged() {
        let mut host = MemoryHost::new();
        let stack = host.create_stack();
        let mut nav = Navigator::new(host);
        let outcome = nav.pop_to(Some(stack), PopTo::new("Gone")).expect("pop_to");
        assert_eq!(outcome, Outcome::Refused(Refusal::MissingPopTarget));
        assert!(logs_contain("Can't find tag Gone"));
    }
}
