#![forbid(unsafe_code)]

//! Errors reported by hosts.

use crate::ids::{ScreenId, StackId};

/// Failure of a host capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// A normal commit was attempted after the host saved its state.
    #[error("can not perform this action after the host saved its state")]
    StateSaved,
    /// The screen handle is not known to the host.
    #[error("unknown screen {0}")]
    UnknownScreen(ScreenId),
    /// The stack handle is not known to the host.
    #[error("unknown stack {0}")]
    UnknownStack(StackId),
    /// The host refused the operation for its own reasons.
    #[error("host rejected the operation: {0}")]
    Rejected(String),
}
