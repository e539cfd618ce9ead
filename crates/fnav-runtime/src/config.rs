#![forbid(unsafe_code)]

//! Navigator configuration.
//!
//! [`NavConfig`] selects the commit policy and how the embedder surfaces the
//! stack-tree report. Values come from code (builder methods), from the
//! `FNAV_DEBUG` environment variable, or, with the `policy-config` feature,
//! from a TOML document.
//!
//! # Example
//!
//! ```
//! use fnav_runtime::config::{NavConfig, StackViewMode};
//!
//! let config = NavConfig::new().debug(true).stack_view_mode(StackViewMode::None);
//! assert!(config.is_debug());
//! ```

use std::env;

/// Environment variable that forces debug mode on or off.
pub const DEBUG_ENV: &str = "FNAV_DEBUG";

/// How the embedder surfaces the stack-tree report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "policy-config", derive(serde::Deserialize))]
#[cfg_attr(feature = "policy-config", serde(rename_all = "snake_case"))]
pub enum StackViewMode {
    /// Never show it; also silences `log_stack`.
    None,
    /// Show it when the device is shaken.
    Shake,
    /// Show it from a floating bubble.
    #[default]
    Bubble,
}

/// Navigator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "policy-config", derive(serde::Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
#[must_use]
pub struct NavConfig {
    /// Propagate commit-after-save-state instead of downgrading the commit.
    pub debug: bool,
    /// Stack-tree report surface.
    pub stack_view_mode: StackViewMode,
}

impl NavConfig {
    /// Release-mode defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set debug mode.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the stack-tree report surface.
    pub fn stack_view_mode(mut self, mode: StackViewMode) -> Self {
        self.stack_view_mode = mode;
        self
    }

    /// Whether debug mode is on.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Defaults with the `FNAV_DEBUG` override applied.
    pub fn from_env() -> Self {
        Self::from_env_values(env::var(DEBUG_ENV).ok().as_deref())
    }

    /// Defaults with an explicit `FNAV_DEBUG` value applied.
    ///
    /// `1`, `true`, `yes` and `on` enable debug mode (case-insensitive);
    /// anything else, or no value, leaves release mode.
    pub fn from_env_values(debug: Option<&str>) -> Self {
        let debug = debug.is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        });
        Self::new().debug(debug)
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    ///
    /// ```toml
    /// debug = true
    /// stack_view_mode = "shake"
    /// ```
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] when the document is not valid TOML or a
    /// value has the wrong type.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Failure to load a [`NavConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The source could not be parsed.
    #[error("invalid navigator config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_release_with_bubble() {
        let config = NavConfig::default();
        assert!(!config.is_debug());
        assert_eq!(config.stack_view_mode, StackViewMode::Bubble);
    }

    proptest! {
        #[test]
        fn only_truthy_env_values_enable_debug(value in "[ a-zA-Z0-9]{0,8}") {
            let truthy = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
            let config = NavConfig::from_env_values(Some(&value));
            prop_assert_eq!(config.is_debug(), truthy);
            prop_assert_eq!(config.stack_view_mode, StackViewMode::Bubble);
        }
    }

    #[test]
    fn env_values_enable_debug() {
        for value in ["1", "true", "YES", " on "] {
            assert!(NavConfig::from_env_values(Some(value)).is_debug(), "{value}");
        }
        for value in ["0", "false", "", "debug"] {
            assert!(!NavConfig::from_env_values(Some(value)).is_debug(), "{value}");
        }
        assert!(!NavConfig::from_env_values(None).is_debug());
    }

    #[test]
    fn builder_sets_fields() {
        let config = NavConfig::new()
            .debug(true)
            .stack_view_mode(StackViewMode::Shake);
        assert_eq!(
            config,
            NavConfig {
                debug: true,
                stack_view_mode: StackViewMode::Shake,
            }
        );
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn toml_overrides_and_defaults() {
        let config = NavConfig::from_toml_str("stack_view_mode = \"none\"").expect("parse");
        assert!(!config.is_debug());
        assert_eq!(config.stack_view_mode, StackViewMode::None);

        let config = NavConfig::from_toml_str("debug = true").expect("parse");
        assert!(config.is_debug());
        assert_eq!(config.stack_view_mode, StackViewMode::Bubble);

        assert!(matches!(
            NavConfig::from_toml_str("debug = \"maybe\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
