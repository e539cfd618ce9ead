#![forbid(unsafe_code)]

//! Pops.
//!
//! `back` pops one frame, debouncing shared-element exits. `pop_to` pops
//! several frames behind a mocked exit animation of the current top, then
//! runs an optional after-task with the stack published as scoped
//! fallback.

use fnav_core::{Animation, Host, PopFlag, StackId};
use tracing::{debug, debug_span, error, warn};

use crate::error::{NavError, Outcome, Refusal};
use crate::mock::MockOutcome;
use crate::navigator::Navigator;
use crate::request::{AfterPop, PopTo};

impl<H: Host> Navigator<H> {
    /// Pop one frame.
    ///
    /// When the top screen was pushed with shared elements, a second back
    /// within its exit animation is refused as [`Refusal::Debounced`].
    pub fn back(&mut self, stack: Option<StackId>) -> Result<Outcome, NavError> {
        let Some(stack) = self.resolve_stack(stack, None) else {
            return Ok(Outcome::Refused(Refusal::MissingStack));
        };
        let count = self.host.back_stack_entry_count(stack);
        if count == 0 {
            return Ok(Outcome::NoOp);
        }

        let top = self
            .host
            .back_stack_entry_name(stack, count - 1)
            .and_then(|name| self.host.find_by_tag(stack, &name))
            .or_else(|| self.top_screen(stack));
        let shared_exit = top.and_then(|top| {
            let shared = self.host.args(top).is_some_and(|a| a.is_shared_element);
            let exit = self.host.screen(top).map(|i| i.animations.exit.duration_ms);
            shared.then(|| exit.unwrap_or(0))
        });

        if let Some(exit_ms) = shared_exit {
            let now = self.host.now_millis();
            let debounced = now < self.debounce_deadline;
            self.debounce_deadline = now.saturating_add(exit_ms);
            if debounced {
                warn!(target: "fnav", %stack, "back ignored while the shared-element exit runs");
                return Ok(Outcome::Refused(Refusal::Debounced));
            }
        }

        debug!(target: "fnav", %stack, entries = count, "pop");
        self.pop_routed(stack, |host| {
            host.pop_back_stack_immediate(stack);
        });
        Ok(Outcome::Committed)
    }

    /// Alias of [`Navigator::back`].
    pub fn pop(&mut self, stack: Option<StackId>) -> Result<Outcome, NavError> {
        self.back(stack)
    }

    /// Pop frames until `req.tag` is on top, or removed too with
    /// `include_self`.
    ///
    /// The current top plays its exit animation over the pop. The pop
    /// itself commits synchronously; the index fixup and the after-task run
    /// on the next tick.
    pub fn pop_to(&mut self, stack: Option<StackId>, req: PopTo<H>) -> Result<Outcome, NavError> {
        let _span = debug_span!(
            target: "fnav",
            "pop_to",
            tag = %req.tag,
            include_self = req.include_self
        )
        .entered();
        let PopTo {
            tag,
            include_self,
            after,
            pop_anim,
        } = req;

        let Some(stack) = self.resolve_stack(stack, None) else {
            return Ok(Outcome::Refused(Refusal::MissingStack));
        };
        self.host.execute_pending(stack);

        let Some(target) = self.host.find_by_tag(stack, &tag) else {
            error!(target: "fnav", "Pop failure! Can't find tag {tag} in the stack");
            return Ok(Outcome::Refused(Refusal::MissingPopTarget));
        };
        let (flag, anim_target) = if include_self {
            (PopFlag::Inclusive, self.predecessor(target))
        } else {
            (PopFlag::Exclusive, Some(target))
        };
        let Some(top) = self.top_screen(stack) else {
            return Ok(Outcome::NoOp);
        };

        let top_exit = self
            .host
            .screen(top)
            .map(|i| i.animations.exit)
            .unwrap_or_default();
        let exit = match (pop_anim, after.is_some()) {
            (None, false) => top_exit,
            (None, true) => Animation::none(top_exit.duration_ms),
            (Some(res), _) => self.host.load_animation(res),
        };

        let outcome = self.mock_pop_anim(top, anim_target, exit, move |nav| {
            nav.finish_pop_to(stack, &tag, flag, after);
        });
        Ok(match outcome {
            MockOutcome::Ran => Outcome::Committed,
            MockOutcome::Busy => Outcome::Refused(Refusal::MockBusy),
            MockOutcome::Aborted => Outcome::NoOp,
        })
    }

    fn finish_pop_to(
        &mut self,
        stack: StackId,
        tag: &str,
        flag: PopFlag,
        after: Option<AfterPop<H>>,
    ) {
        if self.host.screens(stack).is_empty() {
            return;
        }
        self.host.prepare_pop_multiple();
        self.pop_routed(stack, |host| {
            host.pop_back_stack(stack, tag, flag);
            host.execute_pending(stack);
        });
        self.host.pop_finish();

        self.post(move |nav| nav.host.reorder_indices(stack));
        if let Some(after) = after {
            self.post(move |nav| {
                nav.scoped_fallback = Some(stack);
                after(nav, stack);
            });
            self.post(|nav| nav.scoped_fallback = None);
        }
    }
}
