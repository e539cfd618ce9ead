#![forbid(unsafe_code)]

//! Test fixtures for fnav.
//!
//! [`Fixture`] wires a [`Navigator`] to a [`MemoryHost`] with one stack and
//! one container, and offers the few helpers every scenario repeats:
//! loading a root, pushing by class name, settling the message loop and
//! finishing running animations.
//!
//! ```
//! use fnav_harness::{Fixture, assert_stack};
//!
//! let mut fx = Fixture::new();
//! let home = fx.root("Home");
//! fx.push(home, "Detail");
//! assert_stack!(fx, ["Home", "Detail"]);
//! ```

pub use fnav_core::testing::{HostEvent, MemoryHost};

use fnav_core::{ContainerId, Host, ScreenId, StackId};
use fnav_runtime::{MonotonicClock, NavConfig, Navigator, Outcome, StartRequest};
use tracing::Level;

/// Assert the class names of a fixture's stack, bottom first.
#[macro_export]
macro_rules! assert_stack {
    ($fx:expr, [$($class:expr),* $(,)?]) => {{
        let expected: Vec<String> = vec![$(String::from($class)),*];
        assert_eq!($fx.classes(), expected, "stack mismatch");
    }};
}

/// Install a test-writer subscriber at `TRACE`.
/// Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::TRACE)
        .try_init();
}

/// Navigator over an in-memory host with one stack and container.
#[derive(Debug)]
pub struct Fixture {
    /// The navigator under test.
    pub nav: Navigator<MemoryHost>,
    /// The activity stack.
    pub stack: StackId,
    /// The display container roots are loaded into.
    pub container: ContainerId,
}

impl Fixture {
    /// Release-mode fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(NavConfig::default())
    }

    /// Fixture with an explicit configuration.
    #[must_use]
    pub fn with_config(config: NavConfig) -> Self {
        let mut host = MemoryHost::new();
        let stack = host.create_stack();
        let container = host.create_container();
        Self {
            nav: Navigator::with_config(host, config),
            stack,
            container,
        }
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &MemoryHost {
        self.nav.host()
    }

    /// Mutable host.
    pub fn host_mut(&mut self) -> &mut MemoryHost {
        self.nav.host_mut()
    }

    /// Create a detached screen.
    pub fn screen(&mut self, class: &str) -> ScreenId {
        self.nav.host_mut().create_screen(class)
    }

    /// Create and load a root screen.
    ///
    /// # Panics
    ///
    /// When the load does not commit.
    pub fn root(&mut self, class: &str) -> ScreenId {
        let screen = self.screen(class);
        let outcome = self
            .nav
            .load_root(Some(self.stack), self.container, screen)
            .expect("load_root");
        assert_eq!(outcome, Outcome::Committed, "load_root {class}");
        screen
    }

    /// Create a screen and push it over `from`.
    ///
    /// # Panics
    ///
    /// When the push does not commit.
    pub fn push(&mut self, from: ScreenId, class: &str) -> ScreenId {
        let screen = self.screen(class);
        let outcome = self
            .nav
            .start(None, StartRequest::new(screen).from(from))
            .expect("start");
        assert_eq!(outcome, Outcome::Committed, "push {class}");
        screen
    }

    /// Load `classes[0]` as root and push the rest in order.
    pub fn stack_of(&mut self, classes: &[&str]) -> Vec<ScreenId> {
        let mut screens: Vec<ScreenId> = Vec::with_capacity(classes.len());
        for class in classes {
            let screen = match screens.last() {
                None => self.root(class),
                Some(from) => self.push(*from, class),
            };
            screens.push(screen);
        }
        screens
    }

    /// Class names of the stack, bottom first.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.host().classes(self.stack)
    }

    /// Top framework screen.
    #[must_use]
    pub fn top(&self) -> Option<ScreenId> {
        self.nav.top_screen(self.stack)
    }

    /// Screens of the stack that are not hidden.
    #[must_use]
    pub fn visible(&self) -> Vec<ScreenId> {
        self.host()
            .screens(self.stack)
            .into_iter()
            .filter(|s| self.host().screen(*s).is_some_and(|i| !i.hidden))
            .collect()
    }

    /// Screens of the stack marked root.
    #[must_use]
    pub fn roots(&self) -> Vec<ScreenId> {
        self.host()
            .screens(self.stack)
            .into_iter()
            .filter(|s| self.host().args(*s).is_some_and(|a| a.is_root))
            .collect()
    }

    /// Set the host's manual clock to `clock`'s reading.
    pub fn sync_clock(&mut self, clock: &MonotonicClock) {
        let now = clock.now_millis();
        self.host_mut().set_now(now);
    }

    /// Drain the message loop. Returns the number of tasks run.
    pub fn settle(&mut self) -> usize {
        self.nav.run_until_idle()
    }

    /// Report every running animation finished, then settle.
    pub fn finish_animations(&mut self) {
        let tokens = self.host().running_animations();
        for token in tokens {
            self.nav.host_mut().finish_animation(token);
            self.nav.on_animation_end(token);
        }
        self.settle();
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
