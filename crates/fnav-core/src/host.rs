#![forbid(unsafe_code)]

//! The host capability set.
//!
//! [`Host`] is everything the controller consumes from the UI platform:
//! ordered stack reads, tag lookup, atomic transactions, pops, the
//! index-reorder fixup, a monotonic clock, animation loading, and the few
//! view operations the animation mocker needs.
//!
//! # Contract
//!
//! - [`Host::screens`] lists the screens attached through one stack manager
//!   in attach order, bottom first. Hidden screens stay in the list.
//! - [`Host::commit`] applies a [`Transaction`] atomically. With a
//!   back-stack name it must be reversible by a later pop.
//! - Pops remove the screens the reversed transactions added and restore
//!   the visibility they changed.
//! - Every method is called from the host UI loop. No method may call back
//!   into the controller.

use crate::anim::{AnimRes, Animation, ScreenAnimations};
use crate::args::{ArgStore, Bundle};
use crate::error::HostError;
use crate::ids::{AnimationToken, ContainerId, ScreenId, StackId, ViewId};
use crate::transaction::{CommitMode, PopFlag, Transaction};

/// Host-managed attributes of a screen consumed by the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenInfo {
    /// Fully qualified class name; the default tag.
    pub class_name: String,
    /// Tag assigned when attached, if attached.
    pub tag: Option<String>,
    /// Whether this is a framework screen rather than a plain host unit.
    pub framework: bool,
    /// Hidden by a transaction.
    pub hidden: bool,
    /// Being removed by an in-flight pop.
    pub removing: bool,
    /// Resumed lifecycle state.
    pub resumed: bool,
    /// User-visible hint.
    pub user_visible: bool,
    /// Set while the animation mocker holds its detached view.
    pub lock_anim: bool,
    /// Parent screen when this screen lives in a child stack.
    pub parent: Option<ScreenId>,
    /// Nested child stack manager, if created.
    pub child_stack: Option<StackId>,
    /// Loaded transition animations.
    pub animations: ScreenAnimations,
}

impl ScreenInfo {
    /// Class name without its module path, for log messages.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        simple_name(&self.class_name)
    }
}

/// Last segment of a `.` or `::` separated class name.
#[must_use]
pub fn simple_name(class_name: &str) -> &str {
    let tail = class_name.rsplit("::").next().unwrap_or(class_name);
    tail.rsplit('.').next().unwrap_or(tail)
}

/// Capabilities the navigation controller consumes from the UI platform.
///
/// The navigator owns its host and queues tasks over it, so hosts are
/// `'static`.
pub trait Host: 'static {
    // --- Stack reads ---

    /// Screens attached through `stack`, bottom first.
    fn screens(&self, stack: StackId) -> Vec<ScreenId>;

    /// Most recently attached screen carrying `tag`.
    fn find_by_tag(&self, stack: StackId, tag: &str) -> Option<ScreenId>;

    /// Number of back-stack entries.
    fn back_stack_entry_count(&self, stack: StackId) -> usize;

    /// Name of back-stack entry `index` (0 is the oldest).
    fn back_stack_entry_name(&self, stack: StackId, index: usize) -> Option<String>;

    /// Stack manager `screen` is attached through; `None` once detached.
    fn stack_of(&self, screen: ScreenId) -> Option<StackId>;

    /// Whether the host has saved its state for `stack`.
    fn is_state_saved(&self, stack: StackId) -> bool;

    // --- Screens ---

    /// Attributes of `screen`.
    fn screen(&self, screen: ScreenId) -> Option<&ScreenInfo>;

    /// Argument store of `screen`.
    fn args(&self, screen: ScreenId) -> Option<&ArgStore>;

    /// Mutable argument store of `screen`.
    fn args_mut(&mut self, screen: ScreenId) -> Option<&mut ArgStore>;

    /// Set or clear the lock-anim flag.
    fn set_lock_anim(&mut self, screen: ScreenId, locked: bool);

    /// Invoke the screen's new-bundle callback.
    fn deliver_new_bundle(&mut self, screen: ScreenId, bundle: Bundle);

    /// Invoke the screen's result callback.
    fn deliver_result(
        &mut self,
        screen: ScreenId,
        request_code: i32,
        result_code: i32,
        bundle: Option<Bundle>,
    );

    /// Offer a back action to the screen; `true` when consumed.
    fn back_pressed(&mut self, screen: ScreenId) -> bool;

    // --- Transactions ---

    /// Commit a transaction.
    ///
    /// # Errors
    ///
    /// [`HostError::StateSaved`] when `mode` is [`CommitMode::Normal`] and the
    /// host already saved its state; other variants for unknown handles.
    fn commit(&mut self, stack: StackId, tx: Transaction, mode: CommitMode)
    -> Result<(), HostError>;

    /// Pop the newest back-stack entry now; `false` when nothing was popped.
    fn pop_back_stack_immediate(&mut self, stack: StackId) -> bool;

    /// Pop down to the newest entry named `name`.
    fn pop_back_stack(&mut self, stack: StackId, name: &str, flag: PopFlag);

    /// Run any transactions the host still has queued.
    fn execute_pending(&mut self, stack: StackId);

    /// Compact the host's internal index tables.
    fn reorder_indices(&mut self, stack: StackId);

    // --- Time and animation ---

    /// Monotonic clock in milliseconds.
    fn now_millis(&self) -> u64;

    /// Load an animation resource.
    fn load_animation(&self, res: AnimRes) -> Animation;

    // --- Views ---

    /// View of a display container.
    fn container_view(&self, container: ContainerId) -> Option<ViewId>;

    /// Root view of a screen.
    fn screen_view(&self, screen: ScreenId) -> Option<ViewId>;

    /// Whether `view` can hold children.
    fn is_view_group(&self, view: ViewId) -> bool;

    /// Detach `child` from `parent` without requesting layout.
    fn detach_view_in_layout(&mut self, parent: ViewId, child: ViewId);

    /// Attach `child` to `parent`.
    fn attach_view(&mut self, parent: ViewId, child: ViewId);

    /// Hide every child of `view`.
    fn hide_children(&mut self, view: ViewId);

    /// Create a view group that performs no layout on its children.
    fn create_mock_container(&mut self) -> ViewId;

    /// Change visibility of `view`.
    fn set_view_visible(&mut self, view: ViewId, visible: bool);

    /// Remove `child` from `parent` and release it.
    fn remove_view(&mut self, parent: ViewId, child: ViewId);

    /// Start `animation` on `view`. The embedder reports its end back to
    /// the controller with the returned token.
    fn start_animation(&mut self, view: ViewId, animation: &Animation) -> AnimationToken;

    /// Whether views lose state when removed before their exit animation
    /// ends, so the mocker must reparent instead of detaching.
    fn legacy_view_reparent(&self) -> bool {
        false
    }

    // --- Activity hooks ---

    /// Called before a multi-frame pop.
    fn prepare_pop_multiple(&mut self) {}

    /// Called after a multi-frame pop completes.
    fn pop_finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_strips_paths() {
        assert_eq!(simple_name("com.example.HomeScreen"), "HomeScreen");
        assert_eq!(simple_name("app::screens::Detail"), "Detail");
        assert_eq!(simple_name("Plain"), "Plain");
    }

    #[test]
    fn screen_info_simple_name_uses_class() {
        let info = ScreenInfo {
            class_name: "demo.Login".into(),
            ..ScreenInfo::default()
        };
        assert_eq!(info.simple_name(), "Login");
    }
}
