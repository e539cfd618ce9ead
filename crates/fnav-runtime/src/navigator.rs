#![forbid(unsafe_code)]

//! The navigation controller.
//!
//! A [`Navigator`] owns a [`Host`] and drives it. Dispatch intents live in
//! [`dispatch`](crate::dispatch), pops in [`pop`](crate::pop), the animation
//! mocker in [`mock`](crate::mock), result routing in
//! [`result`](crate::result) and back dispatch in [`back`](crate::back);
//! this module holds the shared state, the message loop, the commit wrapper
//! and the stack queries every intent uses.
//!
//! # Invariants
//!
//! 1. Every host commit goes through [`Navigator::commit`].
//! 2. Posted tasks run only from [`Navigator::tick`], in post order.
//! 3. The scoped fallback is set only while a `pop_to` after-task is queued
//!    or running.
//!
//! # Failure Modes
//!
//! - Unresolvable stack: logged under target `fnav`, returned as
//!   [`Refusal::MissingStack`](crate::Refusal::MissingStack).
//! - Commit after state save: returned in debug mode, forwarded to the
//!   [`ExceptionHandler`] and downgraded in release mode.

use std::fmt;

use fnav_core::{CommitMode, Host, ScreenId, StackId, Transaction};
use tracing::{debug, error};

use crate::config::NavConfig;
use crate::error::{ExceptionHandler, NavError};
use crate::looper::MessageLoop;
use crate::mock::AnimationMocker;

/// Upper bound on drains performed by [`Navigator::run_until_idle`].
pub const MAX_IDLE_TICKS: usize = 1024;

/// Navigation-stack controller over a host.
pub struct Navigator<H> {
    pub(crate) host: H,
    pub(crate) config: NavConfig,
    pub(crate) exception_handler: Option<Box<dyn ExceptionHandler>>,
    pub(crate) looper: MessageLoop<Navigator<H>>,
    pub(crate) mocker: AnimationMocker,
    pub(crate) debounce_deadline: u64,
    pub(crate) scoped_fallback: Option<StackId>,
}

impl<H: Host> Navigator<H> {
    /// Navigator with release-mode defaults.
    pub fn new(host: H) -> Self {
        Self::with_config(host, NavConfig::default())
    }

    /// Navigator with an explicit configuration.
    pub fn with_config(host: H, config: NavConfig) -> Self {
        Self {
            host,
            config,
            exception_handler: None,
            looper: MessageLoop::new(),
            mocker: AnimationMocker::new(),
            debounce_deadline: 0,
            scoped_fallback: None,
        }
    }

    /// Install the handler that receives errors swallowed in release mode.
    pub fn set_exception_handler(&mut self, handler: impl ExceptionHandler + 'static) {
        self.exception_handler = Some(Box::new(handler));
    }

    /// Builder form of [`Navigator::set_exception_handler`].
    #[must_use]
    pub fn exception_handler(mut self, handler: impl ExceptionHandler + 'static) -> Self {
        self.set_exception_handler(handler);
        self
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the navigator, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Active configuration.
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: NavConfig) {
        self.config = config;
    }

    /// Animation mocker state.
    pub fn mocker(&self) -> &AnimationMocker {
        &self.mocker
    }

    /// Stack published for `pop_to` after-tasks, if any.
    pub fn scoped_fallback(&self) -> Option<StackId> {
        self.scoped_fallback
    }

    /// Deadline before which a shared-element back is refused.
    pub fn debounce_deadline(&self) -> u64 {
        self.debounce_deadline
    }

    // --- Message loop ---

    /// Queue work for the next [`Navigator::tick`].
    pub fn post(&mut self, task: impl FnOnce(&mut Self) + 'static) {
        self.looper.post(task);
    }

    /// Number of queued tasks.
    pub fn pending_tasks(&self) -> usize {
        self.looper.len()
    }

    /// Run the tasks queued before this call. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        let batch = self.looper.take_batch();
        let ran = batch.len();
        for task in batch {
            task(self);
        }
        ran
    }

    /// Tick until the queue is empty or [`MAX_IDLE_TICKS`] drains ran.
    /// Returns the number of tasks run.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        for _ in 0..MAX_IDLE_TICKS {
            if self.looper.is_empty() {
                break;
            }
            ran += self.tick();
        }
        ran
    }

    // --- Commit policy ---

    /// Commit `tx` on `stack` under the configured policy.
    ///
    /// # Errors
    ///
    /// In debug mode, [`NavError::CommitAfterSaveState`] when the host has
    /// saved its state. In both modes, other host failures.
    pub fn commit(&mut self, stack: StackId, tx: Transaction) -> Result<(), NavError> {
        if self.config.debug {
            debug!(target: "fnav", %stack, ops = tx.ops().len(), "commit");
            return self
                .host
                .commit(stack, tx, CommitMode::Normal)
                .map_err(NavError::from_commit);
        }
        let mode = if self.host.is_state_saved(stack) {
            let err = NavError::CommitAfterSaveState;
            error!(target: "fnav", %stack, "{err}; committing with state loss");
            self.report(&err);
            CommitMode::AllowStateLoss
        } else {
            CommitMode::Normal
        };
        debug!(target: "fnav", %stack, ops = tx.ops().len(), ?mode, "commit");
        self.host.commit(stack, tx, mode).map_err(NavError::from_commit)
    }

    pub(crate) fn report(&self, err: &NavError) {
        if let Some(handler) = &self.exception_handler {
            handler.on_exception(err);
        }
    }

    /// Log and report an error raised inside a posted task.
    pub(crate) fn report_deferred(&self, err: &NavError) {
        error!(target: "fnav", "deferred navigation failed: {err}");
        self.report(err);
    }

    // --- Stack resolution ---

    /// Resolve the stack a request targets.
    ///
    /// `given`, else the stack `from` is attached through, else the scoped
    /// fallback. Logs an error naming `from` when nothing resolves.
    pub fn resolve_stack(&self, given: Option<StackId>, from: Option<ScreenId>) -> Option<StackId> {
        if let Some(stack) = given.or_else(|| from.and_then(|f| self.host.stack_of(f))) {
            return Some(stack);
        }
        if let Some(stack) = self.scoped_fallback {
            return Some(stack);
        }
        let name = from
            .and_then(|f| self.host.screen(f))
            .map_or("Screen", |info| info.simple_name());
        error!(target: "fnav", "{name}'s stack is null, please check if {name} is destroyed!");
        None
    }

    // --- Stack queries ---

    /// Top framework screen of `stack`.
    pub fn top_screen(&self, stack: StackId) -> Option<ScreenId> {
        self.host
            .screens(stack)
            .into_iter()
            .rev()
            .find(|s| self.is_framework(*s))
    }

    /// Nearest framework screen below `screen` in its stack.
    pub fn predecessor(&self, screen: ScreenId) -> Option<ScreenId> {
        let stack = self.host.stack_of(screen)?;
        let screens = self.host.screens(stack);
        let index = screens.iter().position(|s| *s == screen)?;
        self.predecessor_in(&screens[..index])
    }

    /// Nearest framework screen at the end of `below`.
    pub(crate) fn predecessor_in(&self, below: &[ScreenId]) -> Option<ScreenId> {
        below.iter().rev().copied().find(|s| self.is_framework(*s))
    }

    /// Find a screen by tag, or by class name scanning top-down.
    ///
    /// Class scanning covers screens a pager attached under host-generated
    /// tags.
    pub fn find_stack_screen(
        &self,
        stack: StackId,
        class_name: &str,
        tag: Option<&str>,
    ) -> Option<ScreenId> {
        match tag {
            Some(tag) => self.host.find_by_tag(stack, tag),
            None => self
                .host
                .screens(stack)
                .into_iter()
                .rev()
                .find(|s| {
                    self.host
                        .screen(*s)
                        .is_some_and(|info| info.class_name == class_name)
                }),
        }
    }

    /// Root screen of class `class_name` bound to `container`, if any.
    pub(crate) fn find_root(
        &self,
        stack: StackId,
        class_name: &str,
        container: fnav_core::ContainerId,
    ) -> Option<ScreenId> {
        self.host.screens(stack).into_iter().find(|s| {
            let class_matches = self
                .host
                .screen(*s)
                .is_some_and(|info| info.class_name == class_name);
            let args = self.host.args(*s);
            class_matches
                && args.is_some_and(|a| a.is_root && a.container == Some(container))
        })
    }

    /// Screens from the top of `stack` down through nested child stacks,
    /// following the top-most resumed, shown, user-visible screen at each
    /// level. Outermost first.
    pub fn active_path(&self, stack: StackId) -> Vec<ScreenId> {
        let mut path = Vec::new();
        let mut cursor = Some(stack);
        while let Some(stack) = cursor.take() {
            let active = self.host.screens(stack).into_iter().rev().find(|s| {
                self.host.screen(*s).is_some_and(|info| {
                    info.framework && info.resumed && !info.hidden && info.user_visible
                })
            });
            let Some(active) = active else { break };
            if path.contains(&active) {
                break;
            }
            path.push(active);
            cursor = self.host.screen(active).and_then(|info| info.child_stack);
        }
        path
    }

    /// Innermost active screen under `stack`, or `parent` when none is.
    pub fn active_screen(&self, parent: Option<ScreenId>, stack: StackId) -> Option<ScreenId> {
        self.active_path(stack).last().copied().or(parent)
    }

    pub(crate) fn is_framework(&self, screen: ScreenId) -> bool {
        self.host.screen(screen).is_some_and(|info| info.framework)
    }

    pub(crate) fn class_name(&self, screen: ScreenId) -> Option<String> {
        self.host.screen(screen).map(|info| info.class_name.clone())
    }

    pub(crate) fn simple_name(&self, screen: ScreenId) -> String {
        self.host
            .screen(screen)
            .map_or_else(|| screen.to_string(), |info| info.simple_name().to_owned())
    }
}

impl<H: fmt::Debug> fmt::Debug for Navigator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("pending_tasks", &self.looper.len())
            .field("mocker", &self.mocker)
            .field("debounce_deadline", &self.debounce_deadline)
            .field("scoped_fallback", &self.scoped_fallback)
            .finish_non_exhaustive()
    }
}
