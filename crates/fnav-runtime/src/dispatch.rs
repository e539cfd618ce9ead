#![forbid(unsafe_code)]

//! Dispatch intents.
//!
//! Every intent resolves its stack, validates its screens, builds one
//! [`Transaction`] and commits it through the commit wrapper. `start` also
//! applies the caller's [`TransactionRecord`](fnav_core::TransactionRecord),
//! gives the launch mode a chance to absorb the push, and splits
//! push-with-pop into a mocked pop followed by a posted add.

use fnav_core::{
    Bundle, ContainerId, Host, LaunchMode, ResultRecord, ScreenId, SharedElement, StackId,
    StartKind, Transaction, Transition,
};
use tracing::{debug, debug_span, error};

use crate::error::{NavError, Outcome, Refusal};
use crate::mock::MockOutcome;
use crate::navigator::Navigator;
use crate::request::{PopTo, StartRequest};

impl<H: Host> Navigator<H> {
    /// Load `to` as the root of `container`.
    ///
    /// No-op when a root of the same class is already bound to `container`.
    ///
    /// # Errors
    ///
    /// [`NavError::NullTarget`] for an unknown `to`; commit errors.
    pub fn load_root(
        &mut self,
        stack: Option<StackId>,
        container: ContainerId,
        to: ScreenId,
    ) -> Result<Outcome, NavError> {
        let Some(stack) = self.resolve_stack(stack, None) else {
            return Ok(Outcome::Refused(Refusal::MissingStack));
        };
        let class = self.class_name(to).ok_or(NavError::NullTarget)?;
        if self.find_root(stack, &class, container).is_some() {
            debug!(target: "fnav", %stack, class = %class, "root already loaded");
            return Ok(Outcome::NoOp);
        }
        self.bind_container(to, container)?;
        self.start(Some(stack), StartRequest::new(to))
    }

    /// Replace the contents of `container` with `to` as its root.
    ///
    /// # Errors
    ///
    /// [`NavError::NullTarget`] for an unknown `to`; commit errors.
    pub fn replace_load_root(
        &mut self,
        stack: Option<StackId>,
        container: ContainerId,
        to: ScreenId,
        add_to_back: bool,
    ) -> Result<Outcome, NavError> {
        let Some(stack) = self.resolve_stack(stack, None) else {
            return Ok(Outcome::Refused(Refusal::MissingStack));
        };
        self.replace_in(stack, container, to, add_to_back)
    }

    /// Add every screen of `tos` to `container` in one transaction, showing
    /// only `tos[show_index]`. All of them are marked root.
    ///
    /// # Errors
    ///
    /// [`NavError::NullTarget`] for an unknown screen; commit errors.
    pub fn load_multiple_roots(
        &mut self,
        stack: Option<StackId>,
        container: ContainerId,
        show_index: usize,
        tos: &[ScreenId],
    ) -> Result<Outcome, NavError> {
        let Some(stack) = self.resolve_stack(stack, None) else {
            return Ok(Outcome::Refused(Refusal::MissingStack));
        };
        let mut tx = Transaction::new();
        for (index, to) in tos.iter().copied().enumerate() {
            let class = self.class_name(to).ok_or(NavError::NullTarget)?;
            self.bind_container(to, container)?;
            if let Some(args) = self.host.args_mut(to) {
                args.is_root = true;
            }
            tx = tx.add(container, to, class);
            if index != show_index {
                tx = tx.hide(to);
            }
        }
        if tx.is_empty() {
            return Ok(Outcome::NoOp);
        }
        self.commit(stack, tx)?;
        Ok(Outcome::Committed)
    }

    /// Replace `from` with `to` inside `from`'s container.
    ///
    /// # Errors
    ///
    /// [`NavError::NullTarget`] for an unknown `to`; commit errors.
    pub fn replace(
        &mut self,
        from: ScreenId,
        to: ScreenId,
        add_to_back: bool,
    ) -> Result<Outcome, NavError> {
        let Some(stack) = self.resolve_stack(None, Some(from)) else {
            return Ok(Outcome::Refused(Refusal::MissingStack));
        };
        let Some(container) = self.host.args(from).and_then(|a| a.container) else {
            error!(target: "fnav", "{} has no container", self.simple_name(from));
            return Ok(Outcome::Refused(Refusal::MissingContainer));
        };
        self.replace_in(stack, container, to, add_to_back)
    }

    fn replace_in(
        &mut self,
        stack: StackId,
        container: ContainerId,
        to: ScreenId,
        add_to_back: bool,
    ) -> Result<Outcome, NavError> {
        let class = self.class_name(to).ok_or(NavError::NullTarget)?;
        self.bind_container(to, container)?;
        let mut tx = Transaction::new().replace(container, to, class.clone());
        if add_to_back {
            tx = tx.add_to_back_stack(class);
        }
        if let Some(args) = self.host.args_mut(to) {
            args.is_root = true;
        }
        self.commit(stack, tx)?;
        Ok(Outcome::Committed)
    }

    /// Show `show` and hide `hide`, or every other screen of the stack.
    ///
    /// # Errors
    ///
    /// Commit errors.
    pub fn show_hide(
        &mut self,
        stack: Option<StackId>,
        show: ScreenId,
        hide: Option<ScreenId>,
    ) -> Result<Outcome, NavError> {
        if hide == Some(show) {
            return Ok(Outcome::NoOp);
        }
        let Some(stack) = self.resolve_stack(stack, Some(show)) else {
            return Ok(Outcome::Refused(Refusal::MissingStack));
        };
        let mut tx = Transaction::new().show(show);
        match hide {
            Some(hide) => tx = tx.hide(hide),
            None => {
                for screen in self.host.screens(stack) {
                    if screen != show {
                        tx = tx.hide(screen);
                    }
                }
            }
        }
        self.commit(stack, tx)?;
        Ok(Outcome::Committed)
    }

    /// Push a screen.
    ///
    /// # Errors
    ///
    /// [`NavError::NullTarget`] when the host does not know `req.to`;
    /// commit errors.
    pub fn start(
        &mut self,
        stack: Option<StackId>,
        req: StartRequest,
    ) -> Result<Outcome, NavError> {
        let _span = debug_span!(target: "fnav", "start", to = %req.to, kind = ?req.kind).entered();
        let StartRequest {
            from,
            to,
            request_code,
            launch_mode,
            kind,
            record,
            new_bundle,
        } = req;

        let Some(stack) = self.resolve_stack(stack, from) else {
            return Ok(Outcome::Refused(Refusal::MissingStack));
        };
        if let Some(from) = from
            && self.host.screen(from).is_none_or(|info| info.removing)
        {
            error!(target: "fnav", "{} has been removed, start is refused", self.simple_name(from));
            return Ok(Outcome::Refused(Refusal::DetachedOrigin));
        }
        let class = self.class_name(to).ok_or(NavError::NullTarget)?;

        if let Some(container) = from.and_then(|f| self.host.args(f)).and_then(|a| a.container) {
            self.bind_container(to, container)?;
        }

        let mut tag = class;
        let mut request_code = request_code;
        let mut launch_mode = launch_mode;
        let mut kind = kind;
        let mut shared = None;
        if let Some(record) = record {
            if let Some(t) = record.tag.clone() {
                tag = t;
            }
            if let Some(code) = record.result_request_code() {
                request_code = code;
                kind = StartKind::AddResult;
            }
            if let Some(mode) = record.launch_mode {
                launch_mode = mode;
            }
            if record.with_pop == Some(true) {
                kind = StartKind::AddWithPop;
            }
            if let Some(list) = record.shared_elements {
                self.host.reorder_indices(stack);
                shared = Some(list);
            }
        }

        if kind == StartKind::AddResult
            && let Some(args) = self.host.args_mut(to)
        {
            args.result_record = Some(ResultRecord::new(request_code));
        }

        if self.handle_launch_mode(stack, to, &tag, launch_mode, new_bundle) {
            return Ok(Outcome::Handled);
        }

        match kind {
            StartKind::Add | StartKind::AddResult => self.push(stack, from, to, tag, shared),
            StartKind::AddWithPop => match from {
                Some(from) => self.push_with_pop(stack, from, to, tag),
                None => Ok(Outcome::NoOp),
            },
        }
    }

    fn push(
        &mut self,
        stack: StackId,
        from: Option<ScreenId>,
        to: ScreenId,
        tag: String,
        shared: Option<Vec<SharedElement>>,
    ) -> Result<Outcome, NavError> {
        let mut tx = Transaction::new();
        match shared.filter(|list| !list.is_empty()) {
            None => tx = tx.set_transition(Transition::Open),
            Some(list) => {
                if let Some(args) = self.host.args_mut(to) {
                    args.is_shared_element = true;
                }
                for element in list {
                    tx = tx.add_shared_element(element.view, element.name);
                }
            }
        }

        let Some(container) = self.host.args(to).and_then(|a| a.container) else {
            error!(target: "fnav", "{} has no container", self.simple_name(to));
            return Ok(Outcome::Refused(Refusal::MissingContainer));
        };
        tx = tx.add(container, to, tag.clone());
        match from {
            None => {
                if let Some(args) = self.host.args_mut(to) {
                    args.is_root = true;
                }
            }
            Some(from) => {
                if self.host.screen(from).is_some_and(|info| info.tag.is_some()) {
                    tx = tx.hide(from);
                }
            }
        }
        tx = tx.add_to_back_stack(tag);
        self.commit(stack, tx)?;
        Ok(Outcome::Committed)
    }

    fn push_with_pop(
        &mut self,
        stack: StackId,
        from: ScreenId,
        to: ScreenId,
        tag: String,
    ) -> Result<Outcome, NavError> {
        self.host.execute_pending(stack);
        let Some(info) = self.host.screen(from) else {
            return Ok(Outcome::Refused(Refusal::DetachedOrigin));
        };
        if info.hidden {
            error!(
                target: "fnav",
                "{} is hidden, the transaction of start_with_pop() is invalid",
                info.simple_name()
            );
            return Ok(Outcome::Refused(Refusal::InvalidPopWithPop));
        }
        let exit = info.animations.pop_exit;
        let Some(container) = self.host.args(from).and_then(|a| a.container) else {
            error!(target: "fnav", "{} has no container", self.simple_name(from));
            return Ok(Outcome::Refused(Refusal::MissingContainer));
        };
        let from_is_root = self.host.args(from).is_some_and(|a| a.is_root);
        let pre = self.predecessor(from);

        let outcome = self.mock_pop_anim(from, pre, exit, move |nav| {
            nav.pop_routed(stack, |host| {
                host.pop_back_stack_immediate(stack);
            });
            nav.post(move |nav| {
                nav.host.reorder_indices(stack);
                if from_is_root && let Some(args) = nav.host.args_mut(to) {
                    args.is_root = true;
                }
                let mut tx = Transaction::new()
                    .set_transition(Transition::Open)
                    .add(container, to, tag.clone());
                if let Some(pre) = pre {
                    tx = tx.hide(pre);
                }
                tx = tx.add_to_back_stack(tag);
                if let Err(err) = nav.commit(stack, tx) {
                    nav.report_deferred(&err);
                }
                nav.host.execute_pending(stack);
            });
        });
        Ok(match outcome {
            MockOutcome::Ran => Outcome::Deferred,
            MockOutcome::Busy => Outcome::Refused(Refusal::MockBusy),
            MockOutcome::Aborted => Outcome::NoOp,
        })
    }

    /// Let `mode` absorb a push of `to`. Returns whether it did.
    fn handle_launch_mode(
        &mut self,
        stack: StackId,
        to: ScreenId,
        tag: &str,
        mode: LaunchMode,
        new_bundle: Option<Bundle>,
    ) -> bool {
        if mode == LaunchMode::Standard {
            return false;
        }
        let Some(top) = self.top_screen(stack) else {
            return false;
        };
        let Some(class) = self.class_name(to) else {
            return false;
        };
        let Some(existing) = self.find_stack_screen(stack, &class, Some(tag)) else {
            return false;
        };

        match mode {
            LaunchMode::Standard => false,
            LaunchMode::SingleTop => {
                let top_matches =
                    to == top || self.class_name(top).as_deref() == Some(class.as_str());
                if !top_matches {
                    return false;
                }
                let bundle = self.merged_new_bundle(top, to, new_bundle.as_ref());
                debug!(target: "fnav", screen = %top, "single-top reuse");
                self.host.deliver_new_bundle(top, bundle);
                true
            }
            LaunchMode::SingleTask => {
                debug!(target: "fnav", screen = %existing, "single-task reuse");
                if let Err(err) = self.pop_to(Some(stack), PopTo::new(tag)) {
                    self.report_deferred(&err);
                }
                self.post(move |nav| {
                    let bundle = nav.merged_new_bundle(existing, to, new_bundle.as_ref());
                    nav.host.deliver_new_bundle(existing, bundle);
                });
                true
            }
        }
    }

    /// Bundle for the new-bundle callback: `existing`'s arguments, overlaid
    /// with the caller's arguments for `to`, overlaid with `new_bundle`.
    fn merged_new_bundle(
        &self,
        existing: ScreenId,
        to: ScreenId,
        new_bundle: Option<&Bundle>,
    ) -> Bundle {
        let mut merged = self
            .host
            .args(existing)
            .map(|a| a.extras.clone())
            .unwrap_or_default();
        if to != existing
            && let Some(args) = self.host.args(to)
        {
            merged.put_all(&args.extras);
        }
        if let Some(bundle) = new_bundle {
            merged.put_all(bundle);
        }
        merged
    }

    fn bind_container(&mut self, screen: ScreenId, container: ContainerId) -> Result<(), NavError> {
        self.host
            .args_mut(screen)
            .ok_or(NavError::NullTarget)?
            .bind_container(container);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnav_core::testing::MemoryHost;
    use fnav_core::{TransactionRecord, ViewId};

    struct Setup {
        nav: Navigator<MemoryHost>,
        stack: StackId,
        container: ContainerId,
    }

    impl Setup {
        fn new() -> Self {
            let mut host = MemoryHost::new();
            let stack = host.create_stack();
            let container = host.create_container();
            Self {
                nav: Navigator::new(host),
                stack,
                container,
            }
        }

        fn screen(&mut self, class: &str) -> ScreenId {
            self.nav.host_mut().create_screen(class)
        }

        fn root(&mut self, class: &str) -> ScreenId {
            let screen = self.screen(class);
            let outcome = self
                .nav
                .load_root(Some(self.stack), self.container, screen)
                .expect("load root");
            assert_eq!(outcome, Outcome::Committed);
            screen
        }

        fn push(&mut self, from: ScreenId, class: &str) -> ScreenId {
            let screen = self.screen(class);
            let outcome = self
                .nav
                .start(None, StartRequest::new(screen).from(from))
                .expect("start");
            assert_eq!(outcome, Outcome::Committed);
            screen
        }

        fn classes(&self) -> Vec<String> {
            self.nav.host().classes(self.stack)
        }
    }

    #[test]
    fn load_root_binds_container_and_marks_root() {
        let mut s = Setup::new();
        let a = s.root("A");
        let args = s.nav.host().args(a).expect("args");
        assert!(args.is_root);
        assert_eq!(args.container, Some(s.container));
        assert_eq!(s.nav.host().entry_names(s.stack), vec!["A"]);

        let again = s.screen("A");
        let outcome = s
            .nav
            .load_root(Some(s.stack), s.container, again)
            .expect("load root");
        assert_eq!(outcome, Outcome::NoOp);
        assert_eq!(s.classes(), vec!["A"]);
    }

    #[test]
    fn push_hides_origin_and_inherits_container() {
        let mut s = Setup::new();
        let a = s.root("A");
        let b = s.push(a, "B");
        assert!(s.nav.host().screen(a).is_some_and(|i| i.hidden));
        let args = s.nav.host().args(b).expect("args");
        assert_eq!(args.container, Some(s.container));
        assert!(!args.is_root);
        assert_eq!(s.nav.host().entry_names(s.stack), vec!["A", "B"]);
    }

    #[test]
    fn record_overrides_tag_and_promotes_to_result() {
        let mut s = Setup::new();
        let a = s.root("A");
        let b = s.screen("B");
        let req = StartRequest::new(b)
            .from(a)
            .record(TransactionRecord::new().tag("custom").request_code(9));
        assert_eq!(s.nav.start(None, req).expect("start"), Outcome::Committed);
        assert_eq!(s.nav.host().find_by_tag(s.stack, "custom"), Some(b));
        let record = s
            .nav
            .host()
            .args(b)
            .and_then(|a| a.result_record.clone())
            .expect("record");
        assert_eq!(record.request_code, 9);
    }

    #[test]
    fn shared_elements_mark_target_and_fix_indices() {
        let mut s = Setup::new();
        let a = s.root("A");
        let b = s.screen("B");
        let req = StartRequest::new(b)
            .from(a)
            .record(TransactionRecord::new().shared_element(ViewId::new(77), "hero"));
        let _ = s.nav.start(None, req).expect("start");
        assert!(s.nav.host().args(b).is_some_and(|a| a.is_shared_element));
        assert_eq!(s.nav.host().reorder_count(s.stack), 1);
    }

    #[test]
    fn unknown_target_is_an_error() {
        let mut s = Setup::new();
        let a = s.root("A");
        let err = s
            .nav
            .start(None, StartRequest::new(ScreenId::new(9999)).from(a))
            .expect_err("null target");
        assert_eq!(err, NavError::NullTarget);
    }

    #[test]
    fn removing_origin_is_refused() {
        let mut s = Setup::new();
        let a = s.root("A");
        s.nav.host_mut().screen_info_mut(a).expect("a").removing = true;
        let b = s.screen("B");
        let outcome = s
            .nav
            .start(None, StartRequest::new(b).from(a))
            .expect("start");
        assert_eq!(outcome, Outcome::Refused(Refusal::DetachedOrigin));
        assert_eq!(s.classes(), vec!["A"]);
    }

    #[test]
    fn missing_stack_is_refused() {
        let mut s = Setup::new();
        let b = s.screen("B");
        let outcome = s.nav.start(None, StartRequest::new(b)).expect("start");
        assert_eq!(outcome, Outcome::Refused(Refusal::MissingStack));
    }

    #[test]
    fn single_top_delivers_merged_bundle() {
        let mut s = Setup::new();
        let a = s.root("A");
        let b = s.push(a, "B");
        s.nav
            .host_mut()
            .args_mut(b)
            .expect("args")
            .extras
            .put("keep", 1);
        let again = s.screen("B");
        s.nav.host_mut().args_mut(again).expect("args").extras.put("caller", "x");
        let req = StartRequest::new(again)
            .from(b)
            .launch_mode(LaunchMode::SingleTop)
            .new_bundle(Bundle::new().with("fresh", true));
        assert_eq!(s.nav.start(None, req).expect("start"), Outcome::Handled);
        assert_eq!(s.classes(), vec!["A", "B"]);

        let bundles = s.nav.host().new_bundles_for(b);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].get_int("keep"), Some(1));
        assert_eq!(bundles[0].get_str("caller"), Some("x"));
        assert!(bundles[0].contains_key("fresh"));
    }

    #[test]
    fn single_top_below_top_pushes() {
        let mut s = Setup::new();
        let a = s.root("A");
        let b = s.push(a, "B");
        let again = s.screen("A");
        let req = StartRequest::new(again)
            .from(b)
            .launch_mode(LaunchMode::SingleTop);
        assert_eq!(s.nav.start(None, req).expect("start"), Outcome::Committed);
        assert_eq!(s.classes(), vec!["A", "B", "A"]);
    }

    #[test]
    fn replace_swaps_container_contents() {
        let mut s = Setup::new();
        let a = s.root("A");
        let b = s.screen("B");
        let outcome = s.nav.replace(a, b, false).expect("replace");
        assert_eq!(outcome, Outcome::Committed);
        assert_eq!(s.classes(), vec!["B"]);
        assert!(s.nav.host().args(b).is_some_and(|a| a.is_root));
        assert!(s.nav.host().is_destroyed(a));
    }

    #[test]
    fn replace_load_root_can_be_reversed() {
        let mut s = Setup::new();
        let _a = s.root("A");
        let b = s.screen("B");
        let _ = s.nav
            .replace_load_root(Some(s.stack), s.container, b, true)
            .expect("replace");
        assert_eq!(s.classes(), vec!["B"]);
        assert_eq!(s.nav.host().entry_names(s.stack), vec!["A", "B"]);
    }

    #[test]
    fn show_hide_with_explicit_hide() {
        let mut s = Setup::new();
        let tabs: Vec<ScreenId> = ["T0", "T1"].iter().map(|c| s.screen(c)).collect();
        let _ = s.nav
            .load_multiple_roots(Some(s.stack), s.container, 0, &tabs)
            .expect("roots");
        let _ = s.nav
            .show_hide(Some(s.stack), tabs[1], Some(tabs[0]))
            .expect("show hide");
        assert!(s.nav.host().screen(tabs[0]).is_some_and(|i| i.hidden));
        assert!(s.nav.host().screen(tabs[1]).is_some_and(|i| !i.hidden));
        assert_eq!(
            s.nav.show_hide(Some(s.stack), tabs[0], Some(tabs[0])).expect("noop"),
            Outcome::NoOp
        );
    }

    #[test]
    fn push_with_pop_replaces_origin_after_tick() {
        let mut s = Setup::new();
        let a = s.root("A");
        let b = s.push(a, "B");
        let c = s.screen("C");
        let outcome = s
            .nav
            .start(None, StartRequest::new(c).from(b).with_pop())
            .expect("start");
        assert_eq!(outcome, Outcome::Deferred);
        assert_eq!(s.classes(), vec!["A"]);
        assert!(s.nav.host().screen(b).is_some_and(|i| i.lock_anim));

        s.nav.tick();
        assert_eq!(s.classes(), vec!["A", "C"]);
        assert!(s.nav.host().screen(a).is_some_and(|i| i.hidden));
        assert_eq!(s.nav.host().entry_names(s.stack), vec!["A", "C"]);
    }

    #[test]
    fn push_with_pop_from_root_keeps_a_root() {
        let mut s = Setup::new();
        let a = s.root("A");
        let b = s.screen("B");
        let _ = s.nav
            .start(None, StartRequest::new(b).from(a).with_pop())
            .expect("start");
        s.nav.run_until_idle();
        assert_eq!(s.classes(), vec!["B"]);
        assert!(s.nav.host().args(b).is_some_and(|a| a.is_root));
    }

    #[test]
    fn push_with_pop_from_hidden_is_refused() {
        let mut s = Setup::new();
        let a = s.root("A");
        let _b = s.push(a, "B");
        let c = s.screen("C");
        let outcome = s
            .nav
            .start(None, StartRequest::new(c).from(a).with_pop())
            .expect("start");
        assert_eq!(outcome, Outcome::Refused(Refusal::InvalidPopWithPop));
        assert_eq!(s.classes(), vec!["A", "B"]);
    }
}
