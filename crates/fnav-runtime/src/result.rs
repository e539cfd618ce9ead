#![forbid(unsafe_code)]

//! Result routing.
//!
//! A screen pushed for a result carries a [`ResultRecord`]. When it is
//! popped, the record goes to its predecessor's result callback on the next
//! loop tick, after the host has finished its own pop bookkeeping.
//!
//! Pops the navigator performs route automatically: the stack is
//! snapshotted before the pop so each removed screen's predecessor and
//! record are known even once the host has destroyed it. Hosts that pop on
//! their own call [`Navigator::handle_result_record`].

use fnav_core::{Bundle, Host, ResultRecord, ScreenId, StackId};
use tracing::{debug, warn};

use crate::navigator::Navigator;

impl<H: Host> Navigator<H> {
    /// Set the result `screen` reports when popped.
    ///
    /// Returns `false`, with a warning, when `screen` was not pushed for a
    /// result.
    pub fn set_result(
        &mut self,
        screen: ScreenId,
        result_code: i32,
        bundle: Option<Bundle>,
    ) -> bool {
        match self.host.args_mut(screen).and_then(|a| a.result_record.as_mut()) {
            Some(record) => {
                record.result_code = result_code;
                record.result_bundle = bundle;
                true
            }
            None => {
                warn!(target: "fnav", %screen, "set_result on a screen not started for result");
                false
            }
        }
    }

    /// Route `screen`'s result to its predecessor in `stack` on the next
    /// tick.
    ///
    /// Works before and after the host pops `screen`: while it is still
    /// attached the predecessor is the framework screen below it; once it
    /// is gone, the pop has landed on the predecessor, so the current top
    /// of `stack` receives the result.
    ///
    /// The record is consumed, so a second call delivers nothing. Returns
    /// whether a delivery was posted.
    pub fn handle_result_record(&mut self, stack: StackId, screen: ScreenId) -> bool {
        let screens = self.host.screens(stack);
        let pre = match screens.iter().position(|s| *s == screen) {
            Some(index) => self.predecessor_in(&screens[..index]),
            None => self.predecessor_in(&screens),
        };
        let Some(pre) = pre else {
            debug!(target: "fnav", %screen, %stack, "no predecessor for result");
            return false;
        };
        let Some(record) = self
            .host
            .args_mut(screen)
            .and_then(|a| a.result_record.take())
        else {
            return false;
        };
        self.post_result(pre, record);
        true
    }

    /// Run `pop` against the host and route the result of every screen it
    /// removed from `stack`.
    pub(crate) fn pop_routed(&mut self, stack: StackId, pop: impl FnOnce(&mut H)) {
        let before = self.host.screens(stack);
        let pending: Vec<(usize, ResultRecord)> = before
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                self.host
                    .args(*s)
                    .and_then(|a| a.result_record.clone())
                    .map(|r| (i, r))
            })
            .collect();

        pop(&mut self.host);

        if pending.is_empty() {
            return;
        }
        let after = self.host.screens(stack);
        for (index, record) in pending.into_iter().rev() {
            let screen = before[index];
            if after.contains(&screen) {
                continue;
            }
            if let Some(args) = self.host.args_mut(screen) {
                args.result_record = None;
            }
            if let Some(pre) = self.predecessor_in(&before[..index]) {
                self.post_result(pre, record);
            }
        }
    }

    fn post_result(&mut self, pre: ScreenId, record: ResultRecord) {
        debug!(
            target: "fnav",
            screen = %pre,
            request_code = record.request_code,
            result_code = record.result_code,
            "result queued"
        );
        self.post(move |nav| {
            nav.host.deliver_result(
                pre,
                record.request_code,
                record.result_code,
                record.result_bundle,
            );
        });
    }
}
