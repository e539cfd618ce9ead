#![forbid(unsafe_code)]

//! Deterministic in-memory [`Host`] for tests.
//!
//! `MemoryHost` models just enough of a UI platform to exercise the
//! controller end to end:
//!
//! - stacks with an ordered attach list and reversible named back-stack
//!   entries (add, replace, hide and show are all undone by a pop),
//! - a view tree with containers, screen root views and mock wrappers,
//! - a manual millisecond clock,
//! - a journal of every callback the controller triggers.
//!
//! Commits apply immediately, so `execute_pending` has nothing to flush.
//! Destroyed screens keep their attributes (with `removing` set) so tests
//! can inspect them after a pop.

use std::collections::BTreeMap;

use crate::anim::{AnimRes, Animation, ScreenAnimations, ScreenAnimator};
use crate::args::{ArgStore, Bundle, SavedScreenState};
use crate::error::HostError;
use crate::host::{Host, ScreenInfo};
use crate::ids::{AnimationToken, ContainerId, ScreenId, StackId, ViewId};
use crate::transaction::{CommitMode, PopFlag, Transaction, TxOp};

/// Default duration for every animation resource.
pub const DEFAULT_ANIM_MS: u64 = 300;

/// Animator every new screen starts with.
pub const DEFAULT_ANIMATOR: ScreenAnimator =
    ScreenAnimator::new(AnimRes(1), AnimRes(2), AnimRes(3), AnimRes(4));

/// Something the controller asked the host to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A transaction was committed.
    Committed {
        /// Target stack.
        stack: StackId,
        /// Commit mode used.
        mode: CommitMode,
    },
    /// A back-stack entry was popped.
    Popped {
        /// Target stack.
        stack: StackId,
        /// Entry name.
        name: String,
    },
    /// The new-bundle callback ran.
    NewBundle {
        /// Receiving screen.
        screen: ScreenId,
        /// Merged bundle.
        bundle: Bundle,
    },
    /// The result callback ran.
    Result {
        /// Receiving screen.
        screen: ScreenId,
        /// Request code.
        request_code: i32,
        /// Result code.
        result_code: i32,
        /// Payload.
        bundle: Option<Bundle>,
    },
    /// A back action was offered.
    BackPressed(ScreenId),
    /// A screen was destroyed.
    Destroyed(ScreenId),
    /// The index-reorder fixup ran.
    ReorderIndices(StackId),
    /// Multi-frame pop started.
    PreparePopMultiple,
    /// Multi-frame pop finished.
    PopFinish,
}

#[derive(Debug, Clone)]
enum Applied {
    Added(ScreenId),
    Removed {
        screen: ScreenId,
        index: usize,
        container: ContainerId,
        tag: String,
    },
    Hid(ScreenId),
    Showed(ScreenId),
}

#[derive(Debug, Clone)]
struct BackEntry {
    name: String,
    applied: Vec<Applied>,
}

#[derive(Debug, Default)]
struct MemStack {
    added: Vec<ScreenId>,
    entries: Vec<BackEntry>,
    owner: Option<ScreenId>,
}

#[derive(Debug)]
struct MemScreen {
    info: ScreenInfo,
    args: ArgStore,
    animator: ScreenAnimator,
    view: ViewId,
    stack: Option<StackId>,
    container: Option<ContainerId>,
    consumes_back: bool,
}

#[derive(Debug, Default)]
struct MemView {
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    group: bool,
    visible: bool,
}

/// In-memory host.
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_id: u64,
    now: u64,
    state_saved: bool,
    legacy_reparent: bool,
    screens: BTreeMap<ScreenId, MemScreen>,
    stacks: BTreeMap<StackId, MemStack>,
    views: BTreeMap<ViewId, MemView>,
    containers: BTreeMap<ContainerId, ViewId>,
    durations: BTreeMap<AnimRes, u64>,
    running: Vec<(AnimationToken, ViewId, Animation)>,
    journal: Vec<HostEvent>,
}

impl MemoryHost {
    /// Empty host with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn new_view(&mut self, group: bool) -> ViewId {
        let id = ViewId::new(self.next());
        self.views.insert(
            id,
            MemView {
                group,
                visible: true,
                ..MemView::default()
            },
        );
        id
    }

    // --- Setup ---

    /// Create a top-level stack manager.
    pub fn create_stack(&mut self) -> StackId {
        let id = StackId::new(self.next());
        self.stacks.insert(id, MemStack::default());
        id
    }

    /// Create the nested child stack of `parent`.
    pub fn create_child_stack(&mut self, parent: ScreenId) -> StackId {
        let id = StackId::new(self.next());
        self.stacks.insert(
            id,
            MemStack {
                owner: Some(parent),
                ..MemStack::default()
            },
        );
        if let Some(screen) = self.screens.get_mut(&parent) {
            screen.info.child_stack = Some(id);
        }
        id
    }

    /// Create a display container backed by a view group.
    pub fn create_container(&mut self) -> ContainerId {
        let id = ContainerId::new(self.next());
        let view = self.new_view(true);
        self.containers.insert(id, view);
        id
    }

    /// Create a detached, resumed, user-visible framework screen.
    pub fn create_screen(&mut self, class_name: &str) -> ScreenId {
        let id = ScreenId::new(self.next());
        let view = self.new_view(true);
        let animations = ScreenAnimations::load(&DEFAULT_ANIMATOR, |res| self.load_animation(res));
        self.screens.insert(
            id,
            MemScreen {
                info: ScreenInfo {
                    class_name: class_name.to_owned(),
                    framework: true,
                    resumed: true,
                    user_visible: true,
                    animations,
                    ..ScreenInfo::default()
                },
                args: ArgStore::new(),
                animator: DEFAULT_ANIMATOR,
                view,
                stack: None,
                container: None,
                consumes_back: false,
            },
        );
        id
    }

    /// Mutable attributes of a screen.
    pub fn screen_info_mut(&mut self, screen: ScreenId) -> Option<&mut ScreenInfo> {
        self.screens.get_mut(&screen).map(|s| &mut s.info)
    }

    /// Make `screen` consume back actions.
    pub fn set_consumes_back(&mut self, screen: ScreenId, consumes: bool) {
        if let Some(s) = self.screens.get_mut(&screen) {
            s.consumes_back = consumes;
        }
    }

    /// Set the duration of an animation resource. Affects later loads only.
    pub fn set_animation_duration(&mut self, res: AnimRes, duration_ms: u64) {
        self.durations.insert(res, duration_ms);
    }

    /// Set the exit animation duration of one screen.
    pub fn set_exit_duration(&mut self, screen: ScreenId, duration_ms: u64) {
        if let Some(s) = self.screens.get_mut(&screen) {
            s.info.animations.exit.duration_ms = duration_ms;
        }
    }

    /// Mark the host state as saved (or restored).
    pub fn set_state_saved(&mut self, saved: bool) {
        self.state_saved = saved;
    }

    /// Emulate a platform that needs view reparenting during mock pops.
    pub fn set_legacy_view_reparent(&mut self, legacy: bool) {
        self.legacy_reparent = legacy;
    }

    /// Remove the root view of a screen, as a host does before layout.
    pub fn drop_screen_view(&mut self, screen: ScreenId) {
        if let Some(s) = self.screens.get(&screen) {
            let view = s.view;
            if let Some(parent) = self.views.get(&view).and_then(|v| v.parent) {
                self.detach(parent, view);
            }
            self.views.remove(&view);
        }
    }

    // --- Clock ---

    /// Set the clock.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now = now_ms;
    }

    /// Advance the clock.
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    // --- Inspection ---

    /// Every recorded event, oldest first.
    #[must_use]
    pub fn journal(&self) -> &[HostEvent] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_journal(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.journal)
    }

    /// Results delivered to `screen`, as `(request, result, bundle)`.
    #[must_use]
    pub fn results_for(&self, screen: ScreenId) -> Vec<(i32, i32, Option<Bundle>)> {
        self.journal
            .iter()
            .filter_map(|e| match e {
                HostEvent::Result {
                    screen: s,
                    request_code,
                    result_code,
                    bundle,
                } if *s == screen => Some((*request_code, *result_code, bundle.clone())),
                _ => None,
            })
            .collect()
    }

    /// New bundles delivered to `screen`.
    #[must_use]
    pub fn new_bundles_for(&self, screen: ScreenId) -> Vec<Bundle> {
        self.journal
            .iter()
            .filter_map(|e| match e {
                HostEvent::NewBundle { screen: s, bundle } if *s == screen => Some(bundle.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of times the index fixup ran on `stack`.
    #[must_use]
    pub fn reorder_count(&self, stack: StackId) -> usize {
        self.journal
            .iter()
            .filter(|e| matches!(e, HostEvent::ReorderIndices(s) if *s == stack))
            .count()
    }

    /// Commit modes used so far.
    #[must_use]
    pub fn commit_modes(&self) -> Vec<CommitMode> {
        self.journal
            .iter()
            .filter_map(|e| match e {
                HostEvent::Committed { mode, .. } => Some(*mode),
                _ => None,
            })
            .collect()
    }

    /// Whether `screen` has been destroyed by a pop or replace.
    #[must_use]
    pub fn is_destroyed(&self, screen: ScreenId) -> bool {
        self.journal
            .iter()
            .any(|e| matches!(e, HostEvent::Destroyed(s) if *s == screen))
    }

    /// Class names attached to `stack`, bottom first.
    #[must_use]
    pub fn classes(&self, stack: StackId) -> Vec<String> {
        self.screens(stack)
            .into_iter()
            .filter_map(|id| self.screens.get(&id).map(|s| s.info.class_name.clone()))
            .collect()
    }

    /// Back-stack entry names of `stack`, oldest first.
    #[must_use]
    pub fn entry_names(&self, stack: StackId) -> Vec<String> {
        self.stacks
            .get(&stack)
            .map(|s| s.entries.iter().map(|e| e.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Container `screen` is attached to.
    #[must_use]
    pub fn attached_container(&self, screen: ScreenId) -> Option<ContainerId> {
        self.screens.get(&screen).and_then(|s| s.container)
    }

    /// Animations started and not yet reported finished.
    #[must_use]
    pub fn running_animations(&self) -> Vec<AnimationToken> {
        self.running.iter().map(|(t, _, _)| *t).collect()
    }

    /// Animation started under `token`.
    #[must_use]
    pub fn animation(&self, token: AnimationToken) -> Option<(ViewId, Animation)> {
        self.running
            .iter()
            .find(|(t, _, _)| *t == token)
            .map(|(_, v, a)| (*v, *a))
    }

    /// Forget a running animation, returning whether it was known.
    pub fn finish_animation(&mut self, token: AnimationToken) -> bool {
        let before = self.running.len();
        self.running.retain(|(t, _, _)| *t != token);
        before != self.running.len()
    }

    /// Parent of a view.
    #[must_use]
    pub fn view_parent(&self, view: ViewId) -> Option<ViewId> {
        self.views.get(&view).and_then(|v| v.parent)
    }

    /// Children of a view.
    #[must_use]
    pub fn view_children(&self, view: ViewId) -> Vec<ViewId> {
        self.views
            .get(&view)
            .map(|v| v.children.clone())
            .unwrap_or_default()
    }

    /// Whether a view is visible; `None` once released.
    #[must_use]
    pub fn view_visible(&self, view: ViewId) -> Option<bool> {
        self.views.get(&view).map(|v| v.visible)
    }

    // --- Saved state ---

    /// Capture the state a screen persists across host state save.
    #[must_use]
    pub fn save_state(&self, screen: ScreenId) -> Option<SavedScreenState> {
        self.screens.get(&screen).map(|s| SavedScreenState {
            animator: Some(s.animator),
            is_hidden: s.info.hidden,
        })
    }

    /// Restore saved state onto a screen, reloading its animations.
    pub fn restore_state(&mut self, screen: ScreenId, state: &SavedScreenState) {
        let Some(animator) = state
            .animator
            .or_else(|| self.screens.get(&screen).map(|s| s.animator))
        else {
            return;
        };
        let animations = ScreenAnimations::load(&animator, |res| self.load_animation(res));
        if let Some(s) = self.screens.get_mut(&screen) {
            s.animator = animator;
            s.info.animations = animations;
            s.info.hidden = state.is_hidden;
        }
    }

    // --- Internals ---

    fn detach(&mut self, parent: ViewId, child: ViewId) {
        if let Some(p) = self.views.get_mut(&parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.views.get_mut(&child)
            && c.parent == Some(parent)
        {
            c.parent = None;
        }
    }

    fn attach(&mut self, parent: ViewId, child: ViewId) {
        if let Some(old) = self.views.get(&child).and_then(|v| v.parent) {
            self.detach(old, child);
        }
        if let Some(p) = self.views.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.views.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    fn set_hidden(&mut self, screen: ScreenId, hidden: bool) {
        let view = match self.screens.get_mut(&screen) {
            Some(s) => {
                s.info.hidden = hidden;
                s.view
            }
            None => return,
        };
        if let Some(v) = self.views.get_mut(&view) {
            v.visible = !hidden;
        }
    }

    fn attach_screen(
        &mut self,
        stack: StackId,
        index: Option<usize>,
        screen: ScreenId,
        container: ContainerId,
        tag: String,
    ) {
        let owner = self.stacks.get(&stack).and_then(|s| s.owner);
        if let Some(st) = self.stacks.get_mut(&stack) {
            match index {
                Some(i) if i <= st.added.len() => st.added.insert(i, screen),
                _ => st.added.push(screen),
            }
        }
        let view = match self.screens.get_mut(&screen) {
            Some(s) => {
                s.info.tag = Some(tag);
                s.info.removing = false;
                s.info.parent = owner;
                s.stack = Some(stack);
                s.container = Some(container);
                s.view
            }
            None => return,
        };
        if let Some(container_view) = self.containers.get(&container).copied()
            && self.views.contains_key(&view)
        {
            self.attach(container_view, view);
        }
    }

    fn detach_screen(
        &mut self,
        stack: StackId,
        screen: ScreenId,
    ) -> Option<(usize, ContainerId, String)> {
        let index = self
            .stacks
            .get(&stack)
            .and_then(|s| s.added.iter().position(|x| *x == screen))?;
        if let Some(st) = self.stacks.get_mut(&stack) {
            st.added.remove(index);
        }
        let (view, container, tag) = {
            let s = self.screens.get_mut(&screen)?;
            s.stack = None;
            (s.view, s.container.take()?, s.info.tag.clone().unwrap_or_default())
        };
        if let Some(container_view) = self.containers.get(&container).copied()
            && self.view_parent(view) == Some(container_view)
        {
            self.detach(container_view, view);
        }
        Some((index, container, tag))
    }

    fn destroy(&mut self, screen: ScreenId) {
        if let Some(s) = self.screens.get_mut(&screen) {
            s.info.removing = true;
            s.info.resumed = false;
        }
        self.journal.push(HostEvent::Destroyed(screen));
    }

    fn pop_entry(&mut self, stack: StackId) -> bool {
        let Some(entry) = self.stacks.get_mut(&stack).and_then(|s| s.entries.pop()) else {
            return false;
        };
        for applied in entry.applied.into_iter().rev() {
            match applied {
                Applied::Added(screen) => {
                    self.detach_screen(stack, screen);
                    self.destroy(screen);
                }
                Applied::Removed {
                    screen,
                    index,
                    container,
                    tag,
                } => self.attach_screen(stack, Some(index), screen, container, tag),
                Applied::Hid(screen) => self.set_hidden(screen, false),
                Applied::Showed(screen) => self.set_hidden(screen, true),
            }
        }
        self.journal.push(HostEvent::Popped {
            stack,
            name: entry.name,
        });
        true
    }
}

impl Host for MemoryHost {
    fn screens(&self, stack: StackId) -> Vec<ScreenId> {
        self.stacks
            .get(&stack)
            .map(|s| s.added.clone())
            .unwrap_or_default()
    }

    fn find_by_tag(&self, stack: StackId, tag: &str) -> Option<ScreenId> {
        let st = self.stacks.get(&stack)?;
        st.added.iter().rev().copied().find(|id| {
            self.screens
                .get(id)
                .is_some_and(|s| s.info.tag.as_deref() == Some(tag))
        })
    }

    fn back_stack_entry_count(&self, stack: StackId) -> usize {
        self.stacks.get(&stack).map_or(0, |s| s.entries.len())
    }

    fn back_stack_entry_name(&self, stack: StackId, index: usize) -> Option<String> {
        self.stacks
            .get(&stack)
            .and_then(|s| s.entries.get(index))
            .map(|e| e.name.clone())
    }

    fn stack_of(&self, screen: ScreenId) -> Option<StackId> {
        self.screens.get(&screen).and_then(|s| s.stack)
    }

    fn is_state_saved(&self, _stack: StackId) -> bool {
        self.state_saved
    }

    fn screen(&self, screen: ScreenId) -> Option<&ScreenInfo> {
        self.screens.get(&screen).map(|s| &s.info)
    }

    fn args(&self, screen: ScreenId) -> Option<&ArgStore> {
        self.screens.get(&screen).map(|s| &s.args)
    }

    fn args_mut(&mut self, screen: ScreenId) -> Option<&mut ArgStore> {
        self.screens.get_mut(&screen).map(|s| &mut s.args)
    }

    fn set_lock_anim(&mut self, screen: ScreenId, locked: bool) {
        if let Some(s) = self.screens.get_mut(&screen) {
            s.info.lock_anim = locked;
        }
    }

    fn deliver_new_bundle(&mut self, screen: ScreenId, bundle: Bundle) {
        self.journal.push(HostEvent::NewBundle { screen, bundle });
    }

    fn deliver_result(
        &mut self,
        screen: ScreenId,
        request_code: i32,
        result_code: i32,
        bundle: Option<Bundle>,
    ) {
        self.journal.push(HostEvent::Result {
            screen,
            request_code,
            result_code,
            bundle,
        });
    }

    fn back_pressed(&mut self, screen: ScreenId) -> bool {
        self.journal.push(HostEvent::BackPressed(screen));
        self.screens.get(&screen).is_some_and(|s| s.consumes_back)
    }

    fn commit(
        &mut self,
        stack: StackId,
        tx: Transaction,
        mode: CommitMode,
    ) -> Result<(), HostError> {
        if !self.stacks.contains_key(&stack) {
            return Err(HostError::UnknownStack(stack));
        }
        if mode == CommitMode::Normal && self.state_saved {
            return Err(HostError::StateSaved);
        }
        for op in tx.ops() {
            let screen = match op {
                TxOp::Add { screen, .. } | TxOp::Replace { screen, .. } => *screen,
                TxOp::Hide(screen) | TxOp::Show(screen) => *screen,
            };
            if !self.screens.contains_key(&screen) {
                return Err(HostError::UnknownScreen(screen));
            }
        }

        let keep_removed = tx.back_stack_name().is_some();
        let mut applied = Vec::new();
        let mut destroyed = Vec::new();
        for op in tx.ops() {
            match op {
                TxOp::Add {
                    container,
                    screen,
                    tag,
                } => {
                    self.attach_screen(stack, None, *screen, *container, tag.clone());
                    applied.push(Applied::Added(*screen));
                }
                TxOp::Replace {
                    container,
                    screen,
                    tag,
                } => {
                    let victims: Vec<ScreenId> = self
                        .screens(stack)
                        .into_iter()
                        .filter(|id| {
                            self.screens.get(id).and_then(|s| s.container) == Some(*container)
                        })
                        .collect();
                    for victim in victims {
                        if let Some((index, container, tag)) = self.detach_screen(stack, victim) {
                            applied.push(Applied::Removed {
                                screen: victim,
                                index,
                                container,
                                tag,
                            });
                            destroyed.push(victim);
                        }
                    }
                    self.attach_screen(stack, None, *screen, *container, tag.clone());
                    applied.push(Applied::Added(*screen));
                }
                TxOp::Hide(screen) => {
                    self.set_hidden(*screen, true);
                    applied.push(Applied::Hid(*screen));
                }
                TxOp::Show(screen) => {
                    self.set_hidden(*screen, false);
                    applied.push(Applied::Showed(*screen));
                }
            }
        }

        if let Some(name) = tx.back_stack_name() {
            if let Some(st) = self.stacks.get_mut(&stack) {
                st.entries.push(BackEntry {
                    name: name.to_owned(),
                    applied,
                });
            }
        }
        if !keep_removed {
            for victim in destroyed {
                self.destroy(victim);
            }
        }
        self.journal.push(HostEvent::Committed { stack, mode });
        Ok(())
    }

    fn pop_back_stack_immediate(&mut self, stack: StackId) -> bool {
        self.pop_entry(stack)
    }

    fn pop_back_stack(&mut self, stack: StackId, name: &str, flag: PopFlag) {
        let Some(index) = self
            .stacks
            .get(&stack)
            .and_then(|s| s.entries.iter().rposition(|e| e.name == name))
        else {
            return;
        };
        let keep = match flag {
            PopFlag::Exclusive => index + 1,
            PopFlag::Inclusive => index,
        };
        while self.back_stack_entry_count(stack) > keep {
            if !self.pop_entry(stack) {
                break;
            }
        }
    }

    fn execute_pending(&mut self, _stack: StackId) {}

    fn reorder_indices(&mut self, stack: StackId) {
        self.journal.push(HostEvent::ReorderIndices(stack));
    }

    fn now_millis(&self) -> u64 {
        self.now
    }

    fn load_animation(&self, res: AnimRes) -> Animation {
        let duration = self.durations.get(&res).copied().unwrap_or(DEFAULT_ANIM_MS);
        Animation::resource(res, duration)
    }

    fn container_view(&self, container: ContainerId) -> Option<ViewId> {
        self.containers.get(&container).copied()
    }

    fn screen_view(&self, screen: ScreenId) -> Option<ViewId> {
        let view = self.screens.get(&screen)?.view;
        self.views.contains_key(&view).then_some(view)
    }

    fn is_view_group(&self, view: ViewId) -> bool {
        self.views.get(&view).is_some_and(|v| v.group)
    }

    fn detach_view_in_layout(&mut self, parent: ViewId, child: ViewId) {
        self.detach(parent, child);
    }

    fn attach_view(&mut self, parent: ViewId, child: ViewId) {
        self.attach(parent, child);
    }

    fn hide_children(&mut self, view: ViewId) {
        for child in self.view_children(view) {
            if let Some(v) = self.views.get_mut(&child) {
                v.visible = false;
            }
        }
    }

    fn create_mock_container(&mut self) -> ViewId {
        self.new_view(true)
    }

    fn set_view_visible(&mut self, view: ViewId, visible: bool) {
        if let Some(v) = self.views.get_mut(&view) {
            v.visible = visible;
        }
    }

    fn remove_view(&mut self, parent: ViewId, child: ViewId) {
        self.detach(parent, child);
        if let Some(released) = self.views.remove(&child) {
            for grandchild in released.children {
                if let Some(v) = self.views.get_mut(&grandchild) {
                    v.parent = None;
                }
            }
        }
    }

    fn start_animation(&mut self, view: ViewId, animation: &Animation) -> AnimationToken {
        let token = AnimationToken::new(self.next());
        self.running.push((token, view, *animation));
        token
    }

    fn legacy_view_reparent(&self) -> bool {
        self.legacy_reparent
    }

    fn prepare_pop_multiple(&mut self) {
        self.journal.push(HostEvent::PreparePopMultiple);
    }

    fn pop_finish(&mut self) {
        self.journal.push(HostEvent::PopFinish);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with_stack() -> (MemoryHost, StackId, ContainerId) {
        let mut host = MemoryHost::new();
        let stack = host.create_stack();
        let container = host.create_container();
        (host, stack, container)
    }

    #[test]
    fn pop_reverses_add_and_hide() {
        let (mut host, stack, container) = host_with_stack();
        let a = host.create_screen("A");
        let b = host.create_screen("B");
        host.commit(
            stack,
            Transaction::new().add(container, a, "A").add_to_back_stack("A"),
            CommitMode::Normal,
        )
        .expect("commit A");
        host.commit(
            stack,
            Transaction::new()
                .add(container, b, "B")
                .hide(a)
                .add_to_back_stack("B"),
            CommitMode::Normal,
        )
        .expect("commit B");
        assert!(host.screen(a).is_some_and(|i| i.hidden));

        assert!(host.pop_back_stack_immediate(stack));
        assert_eq!(host.screens(stack), vec![a]);
        assert!(host.screen(a).is_some_and(|i| !i.hidden));
        assert!(host.is_destroyed(b));
        assert_eq!(host.stack_of(b), None);
    }

    #[test]
    fn normal_commit_refused_after_state_save() {
        let (mut host, stack, container) = host_with_stack();
        let a = host.create_screen("A");
        host.set_state_saved(true);
        let err = host
            .commit(stack, Transaction::new().add(container, a, "A"), CommitMode::Normal)
            .expect_err("state saved");
        assert_eq!(err, HostError::StateSaved);
        host.commit(
            stack,
            Transaction::new().add(container, a, "A"),
            CommitMode::AllowStateLoss,
        )
        .expect("state loss allowed");
        assert_eq!(host.screens(stack), vec![a]);
    }

    #[test]
    fn named_pop_inclusive_and_exclusive() {
        let (mut host, stack, container) = host_with_stack();
        for name in ["A", "B", "C", "D"] {
            let s = host.create_screen(name);
            host.commit(
                stack,
                Transaction::new().add(container, s, name).add_to_back_stack(name),
                CommitMode::Normal,
            )
            .expect("commit");
        }
        host.pop_back_stack(stack, "C", PopFlag::Exclusive);
        assert_eq!(host.classes(stack), vec!["A", "B", "C"]);
        host.pop_back_stack(stack, "B", PopFlag::Inclusive);
        assert_eq!(host.classes(stack), vec!["A"]);
        host.pop_back_stack(stack, "missing", PopFlag::Inclusive);
        assert_eq!(host.classes(stack), vec!["A"]);
    }

    #[test]
    fn replace_is_reversible_on_back_stack() {
        let (mut host, stack, container) = host_with_stack();
        let a = host.create_screen("A");
        let b = host.create_screen("B");
        host.commit(stack, Transaction::new().add(container, a, "A"), CommitMode::Normal)
            .expect("commit A");
        host.commit(
            stack,
            Transaction::new().replace(container, b, "B").add_to_back_stack("B"),
            CommitMode::Normal,
        )
        .expect("replace");
        assert_eq!(host.screens(stack), vec![b]);
        assert!(host.pop_back_stack_immediate(stack));
        assert_eq!(host.screens(stack), vec![a]);
        assert!(!host.is_destroyed(a));
    }

    #[test]
    fn find_by_tag_prefers_newest() {
        let (mut host, stack, container) = host_with_stack();
        let first = host.create_screen("A");
        let second = host.create_screen("A");
        host.commit(
            stack,
            Transaction::new()
                .add(container, first, "A")
                .add(container, second, "A"),
            CommitMode::Normal,
        )
        .expect("commit");
        assert_eq!(host.find_by_tag(stack, "A"), Some(second));
        assert_eq!(host.find_by_tag(stack, "B"), None);
    }

    #[test]
    fn saved_state_restores_hidden_and_animator() {
        let (mut host, _stack, _container) = host_with_stack();
        let a = host.create_screen("A");
        host.set_animation_duration(AnimRes(2), 120);
        let state = SavedScreenState {
            animator: Some(DEFAULT_ANIMATOR),
            is_hidden: true,
        };
        host.restore_state(a, &state);
        let info = host.screen(a).expect("screen");
        assert!(info.hidden);
        assert_eq!(info.animations.exit.duration_ms, 120);
        assert_eq!(host.save_state(a), Some(state));
    }
}
