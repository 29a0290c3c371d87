//! Field descriptor registry
//!
//! Provides [`Registry`], the read-only, ordered mapping from field id to
//! acceptance rule. Registration order is fill order.

use crate::error::{ConfigurationError, NotFoundError};
use crate::rule::{CompiledRule, Rule};
use crate::types::FieldId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Static identity and acceptance rule of one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Stable id, unique across the form
    pub id: FieldId,
    /// Name used in user-facing messages; defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Acceptance rule
    pub rule: Rule,
}

impl FieldDescriptor {
    /// Create a descriptor without a label
    #[must_use]
    pub fn new(id: impl Into<FieldId>, rule: Rule) -> Self {
        Self {
            id: id.into(),
            label: None,
            rule,
        }
    }

    /// Set the display label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label if set, id otherwise
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    descriptor: FieldDescriptor,
    compiled: CompiledRule,
}

/// Ordered, validated set of field descriptors
#[derive(Debug, Clone)]
pub struct Registry {
    fields: IndexMap<FieldId, Entry>,
}

impl Registry {
    /// Build a registry from descriptors in fill order
    ///
    /// # Errors
    /// - `EmptyRegistry` when `descriptors` is empty
    /// - `DuplicateField` when two descriptors share an id
    /// - rule compilation errors
    pub fn register(
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, ConfigurationError> {
        let mut fields = IndexMap::new();
        for descriptor in descriptors {
            if fields.contains_key(&descriptor.id) {
                return Err(ConfigurationError::DuplicateField(descriptor.id));
            }
            let compiled = descriptor.rule.compile(&descriptor.id)?;
            fields.insert(
                descriptor.id.clone(),
                Entry {
                    descriptor,
                    compiled,
                },
            );
        }
        if fields.is_empty() {
            return Err(ConfigurationError::EmptyRegistry);
        }
        Ok(Self { fields })
    }

    /// Descriptors in fill order
    pub fn ordered(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values().map(|e| &e.descriptor)
    }

    /// Field ids in fill order
    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.keys()
    }

    /// Compiled rule for `id`
    ///
    /// # Errors
    /// `NotFoundError` if `id` is not registered
    pub fn rule_for(&self, id: &str) -> Result<&CompiledRule, NotFoundError> {
        self.fields
            .get(id)
            .map(|e| &e.compiled)
            .ok_or_else(|| NotFoundError(FieldId::from(id)))
    }

    /// Descriptor for `id`
    ///
    /// # Errors
    /// `NotFoundError` if `id` is not registered
    pub fn descriptor(&self, id: &str) -> Result<&FieldDescriptor, NotFoundError> {
        self.fields
            .get(id)
            .map(|e| &e.descriptor)
            .ok_or_else(|| NotFoundError(FieldId::from(id)))
    }

    /// Zero-based fill position of `id`
    #[inline]
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.get_index_of(id)
    }

    /// Field that follows `id` in fill order
    #[must_use]
    pub fn next_after(&self, id: &str) -> Option<&FieldId> {
        let index = self.position(id)?;
        self.fields.get_index(index + 1).map(|(k, _)| k)
    }

    /// The first field; always initially interactable
    #[must_use]
    pub fn first(&self) -> &FieldId {
        // `register` rejects empty input, so index 0 always exists.
        self.fields
            .get_index(0)
            .map(|(k, _)| k)
            .unwrap_or_else(|| unreachable!("registry is never empty"))
    }

    /// Whether `id` is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed registry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
