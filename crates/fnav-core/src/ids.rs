#![forbid(unsafe_code)]

//! Opaque handles issued by the host.
//!
//! The controller never owns screens, stacks or views. It addresses them
//! through these copyable handles and asks the [`Host`](crate::host::Host)
//! for everything else.

use core::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw host value.
            #[inline]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw host value.
            #[inline]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

handle!(
    /// A host-managed screen.
    ScreenId,
    "screen"
);
handle!(
    /// One back-stack manager: the activity's, or a screen's nested child manager.
    StackId,
    "stack"
);
handle!(
    /// A display container that screens are attached to.
    ContainerId,
    "container"
);
handle!(
    /// A host view. Only the animation mocker touches views.
    ViewId,
    "view"
);
handle!(
    /// A running animation started through
    /// [`Host::start_animation`](crate::host::Host::start_animation).
    AnimationToken,
    "anim"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_raw_value() {
        assert_eq!(ScreenId::new(7).to_string(), "screen#7");
        assert_eq!(StackId::new(1).to_string(), "stack#1");
        assert_eq!(ContainerId::new(42).to_string(), "container#42");
    }

    #[test]
    fn raw_value_round_trips() {
        let id = ViewId::new(99);
        assert_eq!(id.get(), 99);
        assert_eq!(ViewId::new(id.get()), id);
    }
}
