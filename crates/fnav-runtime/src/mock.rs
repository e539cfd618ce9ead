#![forbid(unsafe_code)]

//! Exit-animation mocker.
//!
//! A host cancels a screen's exit animation once a pop removes its view.
//! The mocker detaches the view first, wraps it in a no-layout container
//! attached to the screen's display container, lets the pop proceed, and
//! plays the exit animation on the wrapper.
//!
//! # State machine
//!
//! One entry per origin screen:
//!
//! ```text
//! Idle --engage--> Mocking --animation end--> Finalizing --posted removal--> Idle
//! ```
//!
//! - `Mocking`: wrapper attached, `lock_anim` set, exit animation running.
//! - `Finalizing`: wrapper hidden, removal posted.
//! - `Idle`: wrapper removed, `lock_anim` cleared, entry dropped.
//!
//! # Invariants
//!
//! 1. The completion of an accepted engagement runs exactly once.
//! 2. `lock_anim` stays set from engagement until the wrapper is removed.
//! 3. Engaging a screen that is not `Idle` is refused and its completion
//!    is dropped.
//!
//! # Failure Modes
//!
//! - Missing container view or screen view: the engagement aborts silently
//!   and the completion does not run.

use std::fmt;

use ahash::AHashMap;
use fnav_core::{Animation, AnimationToken, ContainerId, Host, ScreenId, ViewId};
use tracing::debug;

use crate::navigator::Navigator;

/// Phase of one origin screen's mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockPhase {
    /// No mock in flight.
    Idle,
    /// Wrapper attached, animation running.
    Mocking,
    /// Animation ended, wrapper removal posted.
    Finalizing,
}

/// Result of an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    /// The completion ran.
    Ran,
    /// The origin already has a mock in flight; the completion was dropped.
    Busy,
    /// Views were unavailable; the completion was dropped.
    Aborted,
}

#[derive(Debug, Clone)]
struct MockEntry {
    wrapper: ViewId,
    container_view: ViewId,
    token: Option<AnimationToken>,
    phase: MockPhase,
}

/// Live mock entries, keyed by origin screen.
#[derive(Default)]
pub struct AnimationMocker {
    entries: AHashMap<ScreenId, MockEntry>,
}

impl AnimationMocker {
    /// No mocks in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase of `screen`'s mock.
    #[must_use]
    pub fn phase(&self, screen: ScreenId) -> MockPhase {
        self.entries
            .get(&screen)
            .map_or(MockPhase::Idle, |e| e.phase)
    }

    /// Number of mocks not yet back to idle.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether no mock is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wrapper view of `screen`'s mock.
    #[must_use]
    pub fn wrapper(&self, screen: ScreenId) -> Option<ViewId> {
        self.entries.get(&screen).map(|e| e.wrapper)
    }

    fn screen_for_token(&self, token: AnimationToken) -> Option<ScreenId> {
        self.entries
            .iter()
            .find(|(_, e)| e.token == Some(token))
            .map(|(s, _)| *s)
    }
}

impl fmt::Debug for AnimationMocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationMocker")
            .field("active", &self.entries.len())
            .finish()
    }
}

impl<H: Host> Navigator<H> {
    /// Play `exit` on `from` after its view leaves the stack, running `cb`
    /// (the pop) in between.
    ///
    /// `target` is the screen the pop lands on; mocking a screen onto itself
    /// just runs `cb`.
    pub(crate) fn mock_pop_anim(
        &mut self,
        from: ScreenId,
        target: Option<ScreenId>,
        exit: Animation,
        cb: impl FnOnce(&mut Self),
    ) -> MockOutcome {
        if target == Some(from) {
            cb(self);
            return MockOutcome::Ran;
        }
        if self.mocker.phase(from) != MockPhase::Idle {
            debug!(target: "fnav", screen = %from, "exit animation already mocked");
            return MockOutcome::Busy;
        }

        let container_view = self
            .host
            .args(from)
            .and_then(|a| a.container)
            .and_then(|c: ContainerId| self.host.container_view(c))
            .filter(|v| self.host.is_view_group(*v));
        let from_view = self.host.screen_view(from);
        let (Some(container_view), Some(from_view)) = (container_view, from_view) else {
            debug!(target: "fnav", screen = %from, "no view to mock");
            return MockOutcome::Aborted;
        };

        if self.host.legacy_view_reparent() {
            let pre = self.predecessor(from);
            let pre_view = pre
                .filter(|p| Some(*p) != target)
                .and_then(|p| self.host.screen_view(p))
                .filter(|v| self.host.is_view_group(*v));
            if let Some(pre_view) = pre_view {
                self.host.hide_children(pre_view);
                self.host.detach_view_in_layout(container_view, from_view);
                self.host.attach_view(pre_view, from_view);
                cb(self);
                self.host.detach_view_in_layout(pre_view, from_view);
                self.start_mock(from, exit, from_view, container_view);
                return MockOutcome::Ran;
            }
        }

        self.host.detach_view_in_layout(container_view, from_view);
        self.start_mock_with(from, exit, from_view, container_view, cb);
        MockOutcome::Ran
    }

    fn start_mock(
        &mut self,
        from: ScreenId,
        exit: Animation,
        from_view: ViewId,
        container_view: ViewId,
    ) {
        self.start_mock_with(from, exit, from_view, container_view, |_| {});
    }

    fn start_mock_with(
        &mut self,
        from: ScreenId,
        exit: Animation,
        from_view: ViewId,
        container_view: ViewId,
        cb: impl FnOnce(&mut Self),
    ) {
        let wrapper = self.host.create_mock_container();
        self.host.attach_view(wrapper, from_view);
        self.host.attach_view(container_view, wrapper);
        self.host.set_lock_anim(from, true);
        self.mocker.entries.insert(
            from,
            MockEntry {
                wrapper,
                container_view,
                token: None,
                phase: MockPhase::Mocking,
            },
        );
        debug!(
            target: "fnav",
            screen = %from,
            %wrapper,
            duration_ms = exit.duration_ms,
            "mock exit"
        );

        cb(self);

        let token = self.host.start_animation(wrapper, &exit);
        if let Some(entry) = self.mocker.entries.get_mut(&from) {
            entry.token = Some(token);
        }
    }

    /// Report that the animation started under `token` ended.
    ///
    /// Hides the wrapper and posts its removal. Returns `false` for unknown
    /// or already finished tokens.
    pub fn on_animation_end(&mut self, token: AnimationToken) -> bool {
        let Some(screen) = self.mocker.screen_for_token(token) else {
            return false;
        };
        let Some(entry) = self.mocker.entries.get_mut(&screen) else {
            return false;
        };
        if entry.phase != MockPhase::Mocking {
            return false;
        }
        entry.phase = MockPhase::Finalizing;
        let (wrapper, container_view) = (entry.wrapper, entry.container_view);
        self.host.set_view_visible(wrapper, false);
        self.post(move |nav| {
            nav.host.remove_view(container_view, wrapper);
            nav.host.set_lock_anim(screen, false);
            nav.mocker.entries.remove(&screen);
            debug!(target: "fnav", %screen, "mock released");
        });
        true
    }
}
