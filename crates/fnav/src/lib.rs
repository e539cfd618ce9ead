#![forbid(unsafe_code)]

//! fnav public facade.
//!
//! Re-exports the screen model from `fnav-core`, the navigator from
//! `fnav-runtime` and, with the default `debug` feature, the stack-tree
//! dumps from `fnav-debug`. Most embedders only need the [`prelude`].

pub use fnav_core as core;
#[cfg(feature = "debug")]
pub use fnav_debug as debug;
pub use fnav_runtime as runtime;

pub use fnav_core::{
    AnimRes, Animation, ArgStore, Bundle, ContainerId, Host, HostError, LaunchMode, RESULT_CANCELED,
    RESULT_OK, ScreenId, StackId, Transaction, TransactionRecord,
};
pub use fnav_runtime::{
    NavConfig, NavError, Navigator, Outcome, PopTo, Refusal, StackViewMode, StartRequest,
};

/// Common imports for embedders.
pub mod prelude {
    pub use fnav_core::{
        Bundle, ContainerId, Host, LaunchMode, ScreenId, StackId, TransactionRecord,
    };
    pub use fnav_runtime::{NavConfig, NavError, Navigator, Outcome, PopTo, StartRequest};

    #[cfg(feature = "debug")]
    pub use fnav_debug::log_stack;
}
