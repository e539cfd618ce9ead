#![forbid(unsafe_code)]

//! Host transaction builder.
//!
//! A [`Transaction`] collects the operations of one atomic host commit. The
//! controller builds it and hands it to [`Host::commit`](crate::host::Host::commit);
//! the host applies the operations in order and, when a back-stack name is
//! set, records the transaction so a later pop reverses it.

use crate::ids::{ContainerId, ScreenId, ViewId};
use crate::record::SharedElement;

/// One operation inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOp {
    /// Attach `screen` to `container` under `tag`.
    Add {
        /// Target container.
        container: ContainerId,
        /// Screen to attach.
        screen: ScreenId,
        /// Lookup tag.
        tag: String,
    },
    /// Remove everything in `container`, then attach `screen` under `tag`.
    Replace {
        /// Target container.
        container: ContainerId,
        /// Screen to attach.
        screen: ScreenId,
        /// Lookup tag.
        tag: String,
    },
    /// Hide a screen.
    Hide(ScreenId),
    /// Show a screen.
    Show(ScreenId),
}

/// Standard host transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The host's standard "open" transition.
    Open,
}

/// How a transaction is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    /// Normal commit; the host refuses it after state save.
    Normal,
    /// Commit even if the host has already saved its state.
    AllowStateLoss,
}

/// Flag for named pops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopFlag {
    /// Pop down to the named entry, keeping it.
    #[default]
    Exclusive,
    /// Pop the named entry too.
    Inclusive,
}

/// Ordered operations committed atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Transaction {
    ops: Vec<TxOp>,
    transition: Option<Transition>,
    back_stack_name: Option<String>,
    shared_elements: Vec<SharedElement>,
}

impl Transaction {
    /// Begin an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `screen` to `container`.
    pub fn add(mut self, container: ContainerId, screen: ScreenId, tag: impl Into<String>) -> Self {
        self.ops.push(TxOp::Add {
            container,
            screen,
            tag: tag.into(),
        });
        self
    }

    /// Replace the contents of `container` with `screen`.
    pub fn replace(
        mut self,
        container: ContainerId,
        screen: ScreenId,
        tag: impl Into<String>,
    ) -> Self {
        self.ops.push(TxOp::Replace {
            container,
            screen,
            tag: tag.into(),
        });
        self
    }

    /// Hide `screen`.
    pub fn hide(mut self, screen: ScreenId) -> Self {
        self.ops.push(TxOp::Hide(screen));
        self
    }

    /// Show `screen`.
    pub fn show(mut self, screen: ScreenId) -> Self {
        self.ops.push(TxOp::Show(screen));
        self
    }

    /// Set the transition.
    pub fn set_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Register a shared element.
    pub fn add_shared_element(mut self, view: ViewId, name: impl Into<String>) -> Self {
        self.shared_elements.push(SharedElement::new(view, name));
        self
    }

    /// Record the transaction on the back stack under `name`.
    pub fn add_to_back_stack(mut self, name: impl Into<String>) -> Self {
        self.back_stack_name = Some(name.into());
        self
    }

    /// Operations in commit order.
    #[must_use]
    pub fn ops(&self) -> &[TxOp] {
        &self.ops
    }

    /// Transition, if one was set.
    #[must_use]
    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Back-stack name, if the transaction is reversible.
    #[must_use]
    pub fn back_stack_name(&self) -> Option<&str> {
        self.back_stack_name.as_deref()
    }

    /// Registered shared elements.
    #[must_use]
    pub fn shared_elements(&self) -> &[SharedElement] {
        &self.shared_elements
    }

    /// Whether the transaction has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_operation_order() {
        let tx = Transaction::new()
            .add(ContainerId::new(1), ScreenId::new(2), "B")
            .hide(ScreenId::new(1))
            .set_transition(Transition::Open)
            .add_to_back_stack("B");

        assert_eq!(
            tx.ops(),
            &[
                TxOp::Add {
                    container: ContainerId::new(1),
                    screen: ScreenId::new(2),
                    tag: "B".into(),
                },
                TxOp::Hide(ScreenId::new(1)),
            ]
        );
        assert_eq!(tx.transition(), Some(Transition::Open));
        assert_eq!(tx.back_stack_name(), Some("B"));
    }

    #[test]
    fn empty_transaction_has_no_side_data() {
        let tx = Transaction::new();
        assert!(tx.is_empty());
        assert!(tx.transition().is_none());
        assert!(tx.back_stack_name().is_none());
        assert!(tx.shared_elements().is_empty());
    }
}
