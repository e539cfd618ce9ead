#![forbid(unsafe_code)]

//! Dispatch outcomes and errors.
//!
//! Every navigator operation returns `Result<Outcome, NavError>`:
//!
//! - `Err(NavError)` is a programmer or host error that must surface
//!   (a missing target, a commit after state save in debug mode).
//! - `Ok(Outcome::Refused(_))` is a logged, recoverable refusal: the
//!   request was dropped and the stack left unchanged.
//! - The remaining outcomes describe what was scheduled.

use std::fmt;

use fnav_core::HostError;

/// Errors that escape a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// The push target is not known to the host.
    #[error("target screen is null, please check your screen instance")]
    NullTarget,
    /// A commit was attempted after the host saved its state.
    #[error("can not perform this action after the host saved its state")]
    CommitAfterSaveState,
    /// Any other host failure.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl NavError {
    /// Map a host commit failure, folding state-save refusals into
    /// [`NavError::CommitAfterSaveState`].
    #[must_use]
    pub fn from_commit(err: HostError) -> Self {
        match err {
            HostError::StateSaved => Self::CommitAfterSaveState,
            other => Self::Host(other),
        }
    }
}

/// Why a request was dropped without touching the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// No stack given and no scoped fallback published.
    MissingStack,
    /// The origin screen is already being removed.
    DetachedOrigin,
    /// The screen has no bound container.
    MissingContainer,
    /// Push-with-pop from a hidden origin.
    InvalidPopWithPop,
    /// `pop_to` named a tag that is not on the stack.
    MissingPopTarget,
    /// A shared-element back arrived before the previous exit finished.
    Debounced,
    /// The origin already has a mocked exit in flight.
    MockBusy,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingStack => "stack is null",
            Self::DetachedOrigin => "origin screen is being removed",
            Self::MissingContainer => "screen has no container",
            Self::InvalidPopWithPop => "start_with_pop from a hidden screen",
            Self::MissingPopTarget => "pop target not found",
            Self::Debounced => "shared-element exit still running",
            Self::MockBusy => "exit animation already mocked",
        };
        f.write_str(msg)
    }
}

/// What a dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The stack changed synchronously.
    Committed,
    /// A launch mode resolved the request against an existing screen.
    Handled,
    /// Work was scheduled on the message loop.
    Deferred,
    /// Nothing to do.
    NoOp,
    /// Dropped; see [`Refusal`].
    Refused(Refusal),
}

impl Outcome {
    /// Whether the request was refused.
    #[must_use]
    pub const fn is_refused(&self) -> bool {
        matches!(self, Self::Refused(_))
    }
}

/// Receives errors the navigator swallows in release mode.
pub trait ExceptionHandler {
    /// Called with the error that would have been returned in debug mode.
    fn on_exception(&self, error: &NavError);
}

impl<F: Fn(&NavError)> ExceptionHandler for F {
    fn on_exception(&self, error: &NavError) {
        self(error);
    }
}
