#![forbid(unsafe_code)]

//! Request descriptors for [`Navigator::start`](crate::Navigator::start) and
//! [`Navigator::pop_to`](crate::Navigator::pop_to).

use std::fmt;

use fnav_core::{AnimRes, Bundle, LaunchMode, ScreenId, StackId, StartKind, TransactionRecord};

use crate::navigator::Navigator;

/// One push.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct StartRequest {
    /// Caller screen; `None` loads a root.
    pub from: Option<ScreenId>,
    /// Screen to push.
    pub to: ScreenId,
    /// Request code for add-with-result.
    pub request_code: i32,
    /// Launch mode.
    pub launch_mode: LaunchMode,
    /// Push kind.
    pub kind: StartKind,
    /// Caller overrides applied before dispatch.
    pub record: Option<TransactionRecord>,
    /// Bundle merged into the new-bundle callback when a launch mode
    /// absorbs the push.
    pub new_bundle: Option<Bundle>,
}

impl StartRequest {
    /// Standard add of `to`.
    pub fn new(to: ScreenId) -> Self {
        Self {
            from: None,
            to,
            request_code: 0,
            launch_mode: LaunchMode::Standard,
            kind: StartKind::Add,
            record: None,
            new_bundle: None,
        }
    }

    /// Set the caller.
    pub fn from(mut self, from: ScreenId) -> Self {
        self.from = Some(from);
        self
    }

    /// Push for a result.
    pub fn for_result(mut self, request_code: i32) -> Self {
        self.request_code = request_code;
        self.kind = StartKind::AddResult;
        self
    }

    /// Replace the caller instead of stacking on it.
    pub fn with_pop(mut self) -> Self {
        self.kind = StartKind::AddWithPop;
        self
    }

    /// Set the launch mode.
    pub fn launch_mode(mut self, mode: LaunchMode) -> Self {
        self.launch_mode = mode;
        self
    }

    /// Attach caller overrides.
    pub fn record(mut self, record: TransactionRecord) -> Self {
        self.record = Some(record);
        self
    }

    /// Set the bundle delivered on launch-mode reuse.
    pub fn new_bundle(mut self, bundle: Bundle) -> Self {
        self.new_bundle = Some(bundle);
        self
    }
}

/// Work run after a `pop_to` completes, with the stack it popped.
pub type AfterPop<H> = Box<dyn FnOnce(&mut Navigator<H>, StackId)>;

/// One multi-frame pop.
#[must_use]
pub struct PopTo<H> {
    /// Back-stack entry name to stop at.
    pub tag: String,
    /// Pop the named entry too.
    pub include_self: bool,
    /// Run after the pop, with the stack published as scoped fallback.
    pub after: Option<AfterPop<H>>,
    /// Exit animation override; `None` picks one from the top screen.
    pub pop_anim: Option<AnimRes>,
}

impl<H> PopTo<H> {
    /// Pop down to `tag`, keeping it.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            include_self: false,
            after: None,
            pop_anim: None,
        }
    }

    /// Pop the tagged entry too.
    pub fn include_self(mut self, include: bool) -> Self {
        self.include_self = include;
        self
    }

    /// Run `after` once the pop has committed.
    pub fn after(mut self, after: impl FnOnce(&mut Navigator<H>, StackId) + 'static) -> Self {
        self.after = Some(Box::new(after));
        self
    }

    /// Play `res` as the exit animation.
    pub fn pop_anim(mut self, res: AnimRes) -> Self {
        self.pop_anim = Some(res);
        self
    }
}

impl<H> fmt::Debug for PopTo<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopTo")
            .field("tag", &self.tag)
            .field("include_self", &self.include_self)
            .field("after", &self.after.is_some())
            .field("pop_anim", &self.pop_anim)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnav_core::testing::MemoryHost;

    #[test]
    fn for_result_sets_kind_and_code() {
        let req = StartRequest::new(ScreenId::new(2))
            .from(ScreenId::new(1))
            .for_result(7);
        assert_eq!(req.kind, StartKind::AddResult);
        assert_eq!(req.request_code, 7);
        assert_eq!(req.from, Some(ScreenId::new(1)));
    }

    #[test]
    fn with_pop_overrides_kind() {
        let req = StartRequest::new(ScreenId::new(2)).for_result(3).with_pop();
        assert_eq!(req.kind, StartKind::AddWithPop);
    }

    #[test]
    fn pop_to_defaults_are_exclusive_without_override() {
        let req: PopTo<MemoryHost> = PopTo::new("B");
        assert!(!req.include_self);
        assert!(req.after.is_none());
        assert!(req.pop_anim.is_none());
        let dbg = format!("{req:?}");
        assert!(dbg.contains("\"B\""));
    }
}
