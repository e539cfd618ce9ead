#![forbid(unsafe_code)]

//! Animation descriptors.
//!
//! The host owns the animation engine. The controller only needs to know
//! which animation to play and how long it lasts: exit durations drive the
//! shared-element back debounce, and the zero-effect animation used by
//! `pop_to` borrows the top screen's exit duration.

/// Host animation resource id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AnimRes(pub u32);

/// What an animation does to the view it runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEffect {
    /// Play the host resource.
    Resource(AnimRes),
    /// Leave the view untouched; only the duration matters.
    None,
}

/// A loaded animation with a known duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Visual effect.
    pub effect: AnimationEffect,
}

impl Animation {
    /// Animation playing `res` for `duration_ms`.
    #[must_use]
    pub const fn resource(res: AnimRes, duration_ms: u64) -> Self {
        Self {
            duration_ms,
            effect: AnimationEffect::Resource(res),
        }
    }

    /// Zero-effect animation lasting `duration_ms`.
    #[must_use]
    pub const fn none(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            effect: AnimationEffect::None,
        }
    }

    /// Whether this animation changes anything visually.
    #[must_use]
    pub const fn is_zero_effect(&self) -> bool {
        matches!(self.effect, AnimationEffect::None)
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::none(0)
    }
}

/// The four transition resources a screen plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenAnimator {
    /// Played when the screen is pushed.
    pub enter: AnimRes,
    /// Played on the screen being covered by a push.
    pub exit: AnimRes,
    /// Played on the screen being revealed by a pop.
    pub pop_enter: AnimRes,
    /// Played on the screen being popped.
    pub pop_exit: AnimRes,
}

impl ScreenAnimator {
    /// Build an animator from four resources.
    #[must_use]
    pub const fn new(enter: AnimRes, exit: AnimRes, pop_enter: AnimRes, pop_exit: AnimRes) -> Self {
        Self {
            enter,
            exit,
            pop_enter,
            pop_exit,
        }
    }
}

/// Loaded animations of one screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenAnimations {
    /// Enter animation.
    pub enter: Animation,
    /// Exit animation.
    pub exit: Animation,
    /// Pop-enter animation.
    pub pop_enter: Animation,
    /// Pop-exit animation.
    pub pop_exit: Animation,
}

impl ScreenAnimations {
    /// Load all four animations of `animator` through `load`.
    pub fn load(animator: &ScreenAnimator, mut load: impl FnMut(AnimRes) -> Animation) -> Self {
        Self {
            enter: load(animator.enter),
            exit: load(animator.exit),
            pop_enter: load(animator.pop_enter),
            pop_exit: load(animator.pop_exit),
        }
    }
}
