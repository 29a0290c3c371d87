//! Core identifiers and small value types shared across the gate.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier of a form field, unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Create a field id from any string-like value
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Per-field gate status, derived from activation and validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// Not yet interactable; a predecessor has never validated
    Locked,
    /// Interactable, current value not accepted (or never committed)
    Editable,
    /// Interactable and current value accepted
    Valid,
}

impl FieldStatus {
    /// Whether the field currently accepts input
    #[inline]
    #[must_use]
    pub fn is_interactable(self) -> bool {
        !matches!(self, Self::Locked)
    }
}

/// What caused a field commit.
///
/// Blur commits never block navigation. Forward-navigation commits can veto
/// the pending move when the value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitTrigger {
    /// The field lost focus
    Blur,
    /// The user attempted to advance past the field
    ForwardNavigation,
}

/// Visual flag a renderer draws on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMark {
    /// Never committed since the last reset
    #[default]
    None,
    /// Last commit was accepted
    Valid,
    /// Last commit was rejected
    Invalid,
}

/// Keys the form reacts to globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Confirmation key; dismisses a visible notification
    Enter,
    /// Escape key
    Escape,
    /// Any other key
    Other,
}

/// Navigation decision returned to the input adapter after a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// Blur commit; nothing to do with focus
    Stay,
    /// Forward navigation accepted; move focus to `focus` if present
    Advance {
        /// Field that should receive focus, `None` past the last field
        focus: Option<FieldId>,
    },
    /// Forward navigation rejected; cancel the pending move
    Vetoed,
}

impl Navigation {
    /// Whether the adapter must cancel the default navigation action
    #[inline]
    #[must_use]
    pub fn is_vetoed(&self) -> bool {
        matches!(self, Self::Vetoed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_id_borrows_as_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(FieldId::from("name"), 1);
        assert_eq!(map.get("name"), Some(&1));
    }

    #[test]
    fn locked_is_not_interactable() {
        assert!(!FieldStatus::Locked.is_interactable());
        assert!(FieldStatus::Editable.is_interactable());
        assert!(FieldStatus::Valid.is_interactable());
    }

    #[test]
    fn trigger_serializes_snake_case() {
        let json = serde_json::to_string(&CommitTrigger::ForwardNavigation).unwrap();
        assert_eq!(json, "\"forward_navigation\"");
    }
}
