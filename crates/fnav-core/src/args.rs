#![forbid(unsafe_code)]

//! Per-screen argument store.
//!
//! Every screen carries an [`ArgStore`]: a typed record holding the
//! container it was pushed into, its root and shared-element flags, the
//! pending [`ResultRecord`] when it was pushed for a result, and the caller's
//! own arguments in [`ArgStore::extras`].
//!
//! # Invariants
//!
//! 1. A screen pushed through the dispatcher always has `container` set.
//! 2. Only the bottom screen of a container's stack has `is_root` set.
//! 3. `result_record` is present iff the screen was pushed for a result.
//!
//! # Wire keys
//!
//! With the `serde` feature, the typed fields serialize under the stable
//! string keys in [`keys`], so stores written by an earlier key/value
//! representation read back unchanged.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::anim::ScreenAnimator;
use crate::ids::ContainerId;
use crate::record::ResultRecord;

/// Stable string keys for argument and saved-state fields.
pub mod keys {
    /// Pending result record.
    pub const RESULT_RECORD: &str = "fragment_arg_result_record";
    /// Root flag.
    pub const IS_ROOT: &str = "fragmentation_arg_is_root";
    /// Shared-element flag.
    pub const IS_SHARED_ELEMENT: &str = "fragmentation_arg_is_shared_element";
    /// Bound container id.
    pub const CONTAINER: &str = "fragmentation_arg_container";
    /// Saved animator resources.
    pub const SAVE_ANIMATOR: &str = "fragmentation_state_save_animator";
    /// Saved hidden status.
    pub const SAVE_IS_HIDDEN: &str = "fragmentation_state_save_status";
}

/// A single caller-supplied argument value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ArgValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Ordered string-keyed bag of caller arguments.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Bundle {
    entries: BTreeMap<String, ArgValue>,
}

impl Bundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.put(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries.get(key)
    }

    /// Look up a string value.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(ArgValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up an integer value.
    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(ArgValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Remove a value, returning it.
    pub fn remove(&mut self, key: &str) -> Option<ArgValue> {
        self.entries.remove(key)
    }

    /// Whether the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Overlay every entry of `other` onto `self`; `other` wins on conflicts.
    pub fn put_all(&mut self, other: &Self) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ArgValue> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for Bundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bundle = Self::new();
        for (k, v) in iter {
            bundle.put(k, v);
        }
        bundle
    }
}

/// Typed per-screen argument record.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArgStore {
    /// Container the screen is bound to.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "fragmentation_arg_container", default)
    )]
    pub container: Option<ContainerId>,
    /// Bottom of its container's stack.
    #[cfg_attr(feature = "serde", serde(rename = "fragmentation_arg_is_root", default))]
    pub is_root: bool,
    /// Pushed with a shared-element transition.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "fragmentation_arg_is_shared_element", default)
    )]
    pub is_shared_element: bool,
    /// Pending result for the predecessor.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "fragment_arg_result_record", default)
    )]
    pub result_record: Option<ResultRecord>,
    /// Caller-supplied arguments.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub extras: Bundle,
}

impl ArgStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store carrying caller arguments.
    #[must_use]
    pub fn with_extras(extras: Bundle) -> Self {
        Self {
            extras,
            ..Self::default()
        }
    }

    /// Bind the container, replacing any earlier binding.
    pub fn bind_container(&mut self, container: ContainerId) {
        self.container = Some(container);
    }
}

/// State a screen persists across host state save/restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedScreenState {
    /// Animation resources in effect when the state was saved.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "fragmentation_state_save_animator", default)
    )]
    pub animator: Option<ScreenAnimator>,
    /// Hidden status when the state was saved.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "fragmentation_state_save_status", default)
    )]
    pub is_hidden: bool,
}
