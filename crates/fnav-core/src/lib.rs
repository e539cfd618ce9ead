#![forbid(unsafe_code)]

//! Core types for fnav, the navigation-stack controller.
//!
//! This crate holds the leaf types shared by the runtime, the debug reporter
//! and host implementations:
//!
//! - [`ids`]: opaque host handles ([`ScreenId`], [`StackId`], ...).
//! - [`args`]: the per-screen [`ArgStore`] and caller [`Bundle`].
//! - [`record`]: [`ResultRecord`] and the caller's [`TransactionRecord`].
//! - [`launch`]: [`LaunchMode`] and [`StartKind`].
//! - [`anim`]: animation descriptors.
//! - [`transaction`]: the atomic [`Transaction`] builder.
//! - [`host`]: the [`Host`] capability trait.
//!
//! With the `test-helpers` feature, [`testing`] provides `MemoryHost`, a
//! deterministic in-memory host.

pub mod anim;
pub mod args;
pub mod error;
pub mod host;
pub mod ids;
pub mod launch;
pub mod record;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
pub mod transaction;

pub use anim::{AnimRes, Animation, AnimationEffect, ScreenAnimations, ScreenAnimator};
pub use args::{ArgStore, ArgValue, Bundle, SavedScreenState};
pub use error::HostError;
pub use host::{Host, ScreenInfo};
pub use ids::{AnimationToken, ContainerId, ScreenId, StackId, ViewId};
pub use launch::{LaunchMode, StartKind};
pub use record::{RESULT_CANCELED, RESULT_OK, ResultRecord, SharedElement, TransactionRecord};
pub use transaction::{CommitMode, PopFlag, Transaction, Transition, TxOp};
