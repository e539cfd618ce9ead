#![forbid(unsafe_code)]

//! Back-action dispatch.
//!
//! A back action is offered to the active screen first, then to each
//! parent up the screen tree, until one consumes it. Unconsumed back
//! actions pop the stack, and the embedder finishes when only the root
//! entry is left.

use fnav_core::{Host, ScreenId, StackId};
use tracing::debug;

use crate::error::NavError;
use crate::navigator::Navigator;

impl<H: Host> Navigator<H> {
    /// Offer a back action to `active` and then to its ancestors.
    ///
    /// Returns whether a screen consumed it.
    pub fn dispatch_back(&mut self, active: Option<ScreenId>) -> bool {
        let mut cursor = active;
        let mut visited = Vec::new();
        while let Some(screen) = cursor {
            if visited.contains(&screen) {
                break;
            }
            visited.push(screen);
            if self.host.back_pressed(screen) {
                debug!(target: "fnav", %screen, "back consumed");
                return true;
            }
            cursor = self.host.screen(screen).and_then(|info| info.parent);
        }
        false
    }

    /// Handle a back action on `stack`.
    ///
    /// Returns `false` when nothing consumed it and the stack holds a
    /// single entry, so the embedder should finish.
    ///
    /// # Errors
    ///
    /// Errors from the pop.
    pub fn on_back_pressed(&mut self, stack: StackId) -> Result<bool, NavError> {
        let active = self.active_screen(None, stack);
        if self.dispatch_back(active) {
            return Ok(true);
        }
        if self.host.back_stack_entry_count(stack) > 1 {
            let _ = self.back(Some(stack))?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Outcome;
    use crate::request::StartRequest;
    use fnav_core::testing::{HostEvent, MemoryHost};

    #[test]
    fn inner_screen_is_asked_before_parent() {
        let mut host = MemoryHost::new();
        let stack = host.create_stack();
        let container = host.create_container();
        let outer = host.create_screen("Outer");
        let mut nav = Navigator::new(host);
        let outcome = nav.load_root(Some(stack), container, outer).expect("root");
        assert_eq!(outcome, Outcome::Committed);

        let child_stack = nav.host_mut().create_child_stack(outer);
        let inner_container = nav.host_mut().create_container();
        let inner = nav.host_mut().create_screen("Inner");
        let outcome = nav
            .load_root(Some(child_stack), inner_container, inner)
            .expect("child root");
        assert_eq!(outcome, Outcome::Committed);
        nav.host_mut().set_consumes_back(outer, true);

        assert!(nav.on_back_pressed(stack).expect("back"));
        let asked: Vec<_> = nav
            .host()
            .journal()
            .iter()
            .filter_map(|e| match e {
                HostEvent::BackPressed(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(asked, vec![inner, outer]);
    }

    #[test]
    fn unconsumed_back_pops_until_root() {
        let mut host = MemoryHost::new();
        let stack = host.create_stack();
        let container = host.create_container();
        let a = host.create_screen("A");
        let b = host.create_screen("B");
        let mut nav = Navigator::new(host);
        let _ = nav.load_root(Some(stack), container, a).expect("root");
        let _ = nav.start(None, StartRequest::new(b).from(a)).expect("push");

        assert!(nav.on_back_pressed(stack).expect("back"));
        assert_eq!(nav.host().classes(stack), vec!["A"]);
        assert!(!nav.on_back_pressed(stack).expect("back"));
        assert_eq!(nav.host().classes(stack), vec!["A"]);
    }

    #[test]
    fn no_active_screen_is_not_consumed() {
        let mut nav = Navigator::new(MemoryHost::new());
        assert!(!nav.dispatch_back(None));
    }
}
