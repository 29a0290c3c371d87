//! Form state
//!
//! [`FormState`] holds per-field validity, activation, current value and
//! visual mark. Only the gate controller mutates it; everyone else reads
//! derived views or a [`FormSnapshot`].

use crate::registry::Registry;
use crate::types::{FieldId, FieldMark, FieldStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mutable state of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldState {
    pub(crate) value: String,
    pub(crate) valid: bool,
    pub(crate) active: bool,
    pub(crate) mark: FieldMark,
}

impl FieldState {
    fn status(&self) -> FieldStatus {
        match (self.active, self.valid) {
            (false, _) => FieldStatus::Locked,
            (true, true) => FieldStatus::Valid,
            (true, false) => FieldStatus::Editable,
        }
    }
}

/// Validity and activation of every field, in fill order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    fields: IndexMap<FieldId, FieldState>,
}

impl FormState {
    /// Initial state: nothing valid, only the first field active
    #[must_use]
    pub fn new(registry: &Registry) -> Self {
        let fields = registry
            .ids()
            .enumerate()
            .map(|(i, id)| {
                (
                    id.clone(),
                    FieldState {
                        active: i == 0,
                        ..FieldState::default()
                    },
                )
            })
            .collect();
        Self { fields }
    }

    /// Validity of `id`
    #[inline]
    #[must_use]
    pub fn validity(&self, id: &str) -> Option<bool> {
        self.fields.get(id).map(|f| f.valid)
    }

    /// Activation of `id`
    #[inline]
    #[must_use]
    pub fn activation(&self, id: &str) -> Option<bool> {
        self.fields.get(id).map(|f| f.active)
    }

    /// Current (normalized) value of `id`
    #[inline]
    #[must_use]
    pub fn value(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(|f| f.value.as_str())
    }

    /// Derived status of `id`
    #[inline]
    #[must_use]
    pub fn status(&self, id: &str) -> Option<FieldStatus> {
        self.fields.get(id).map(FieldState::status)
    }

    /// Whether every field is valid
    #[must_use]
    pub fn all_valid(&self) -> bool {
        self.fields.values().all(|f| f.valid)
    }

    /// Ids whose validity is false, in fill order
    #[must_use]
    pub fn pending(&self) -> Vec<FieldId> {
        self.fields
            .iter()
            .filter(|(_, f)| !f.valid)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub(crate) fn field_mut(&mut self, id: &str) -> Option<&mut FieldState> {
        self.fields.get_mut(id)
    }

    /// Back to the initial state: values cleared, marks cleared
    pub(crate) fn reset(&mut self) {
        for (i, field) in self.fields.values_mut().enumerate() {
            *field = FieldState {
                active: i == 0,
                ..FieldState::default()
            };
        }
    }

    /// Read-only copy for renderers and tests
    #[must_use]
    pub fn snapshot(&self, registry: &Registry) -> FormSnapshot {
        let fields = self
            .fields
            .iter()
            .map(|(id, f)| FieldView {
                id: id.clone(),
                label: registry
                    .descriptor(id.as_str())
                    .map(|d| d.display_name().to_string())
                    .unwrap_or_else(|_| id.to_string()),
                value: f.value.clone(),
                status: f.status(),
                mark: f.mark,
                valid: f.valid,
                active: f.active,
            })
            .collect();
        FormSnapshot { fields }
    }
}

/// One field as seen by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    /// Field id
    pub id: FieldId,
    /// Display name
    pub label: String,
    /// Current normalized value
    pub value: String,
    /// Derived gate status
    pub status: FieldStatus,
    /// Visual flag
    pub mark: FieldMark,
    /// Validity flag
    pub valid: bool,
    /// Activation flag
    pub active: bool,
}

/// Immutable view of the whole form, in fill order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    /// Fields in fill order
    pub fields: Vec<FieldView>,
}

impl FormSnapshot {
    /// Field view by id
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.id.as_str() == id)
    }

    /// Whether the snapshot shows the initial state
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.fields.iter().enumerate().all(|(i, f)| {
            f.active == (i == 0) && !f.valid && f.value.is_empty() && f.mark == FieldMark::None
        })
    }
}
