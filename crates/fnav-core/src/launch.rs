#![forbid(unsafe_code)]

//! Launch modes and push kinds.

use core::fmt;

/// Stack-collapse rule applied at push time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LaunchMode {
    /// Always push a new instance.
    #[default]
    Standard,
    /// Reuse the top screen when it is of the target class.
    SingleTop,
    /// Pop back to an existing instance of the target class.
    SingleTask,
}

impl LaunchMode {
    /// Numeric code of this mode.
    #[inline]
    pub const fn code(self) -> i32 {
        match self {
            Self::Standard => 0,
            Self::SingleTop => 1,
            Self::SingleTask => 2,
        }
    }
}

/// Error for an unknown launch-mode code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown launch mode code: {0}")]
pub struct UnknownLaunchMode(pub i32);

impl TryFrom<i32> for LaunchMode {
    type Error = UnknownLaunchMode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Standard),
            1 => Ok(Self::SingleTop),
            2 => Ok(Self::SingleTask),
            other => Err(UnknownLaunchMode(other)),
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::SingleTop => write!(f, "single-top"),
            Self::SingleTask => write!(f, "single-task"),
        }
    }
}

/// How a push composes with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StartKind {
    /// Stack on top of the caller.
    #[default]
    Add,
    /// Replace the caller: pop it, then push.
    AddWithPop,
    /// Stack on top of the caller and deliver a result back on pop.
    AddResult,
}
