#![forbid(unsafe_code)]

//! Result and transaction records.
//!
//! A [`ResultRecord`] is created when a screen is pushed for a result and
//! lives in the callee's [`ArgStore`](crate::args::ArgStore) until the callee
//! is popped, at which point it is delivered to the predecessor exactly once.
//!
//! A [`TransactionRecord`] is the caller's per-push override descriptor. It
//! lives only for the duration of one dispatch and is never stored on the
//! stack.

use crate::args::Bundle;
use crate::ids::ViewId;
use crate::launch::LaunchMode;

/// Result code reported when the callee never set one.
pub const RESULT_CANCELED: i32 = 0;

/// Conventional "ok" result code.
pub const RESULT_OK: i32 = -1;

/// Callee-side result awaiting delivery to the predecessor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultRecord {
    /// Request code fixed at push time.
    pub request_code: i32,
    /// Result code set by the callee; [`RESULT_CANCELED`] until set.
    pub result_code: i32,
    /// Optional payload set by the callee.
    pub result_bundle: Option<Bundle>,
}

impl ResultRecord {
    /// Fresh record for a push with `request_code`.
    #[must_use]
    pub fn new(request_code: i32) -> Self {
        Self {
            request_code,
            result_code: RESULT_CANCELED,
            result_bundle: None,
        }
    }
}

/// A view participating in a shared-element transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedElement {
    /// The caller-side view.
    pub view: ViewId,
    /// Transition name the callee's view is matched on.
    pub name: String,
}

impl SharedElement {
    /// Pair a view with its transition name.
    pub fn new(view: ViewId, name: impl Into<String>) -> Self {
        Self {
            view,
            name: name.into(),
        }
    }
}

/// Caller-supplied overrides for one push.
///
/// Every field is optional; absent fields leave the dispatcher's arguments
/// untouched. A `request_code` greater than zero promotes the push to
/// add-with-result; `with_pop` promotes it to add-with-pop and wins over a
/// request code.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct TransactionRecord {
    /// Tag override; defaults to the target's class name.
    pub tag: Option<String>,
    /// Request code override.
    pub request_code: Option<i32>,
    /// Launch mode override.
    pub launch_mode: Option<LaunchMode>,
    /// Replace the caller instead of stacking on it.
    pub with_pop: Option<bool>,
    /// Shared elements for the transition, if any.
    pub shared_elements: Option<Vec<SharedElement>>,
}

impl TransactionRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag override.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the request code.
    pub fn request_code(mut self, code: i32) -> Self {
        self.request_code = Some(code);
        self
    }

    /// Set the launch mode.
    pub fn launch_mode(mut self, mode: LaunchMode) -> Self {
        self.launch_mode = Some(mode);
        self
    }

    /// Set the with-pop flag.
    pub fn with_pop(mut self, with_pop: bool) -> Self {
        self.with_pop = Some(with_pop);
        self
    }

    /// Append a shared element, creating the list on first use.
    pub fn shared_element(mut self, view: ViewId, name: impl Into<String>) -> Self {
        self.shared_elements
            .get_or_insert_with(Vec::new)
            .push(SharedElement::new(view, name));
        self
    }

    /// Request code that promotes the push to add-with-result, if any.
    #[must_use]
    pub fn result_request_code(&self) -> Option<i32> {
        self.request_code.filter(|code| *code > 0)
    }
}
