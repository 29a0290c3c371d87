//! Validation engine
//!
//! Evaluates one field's raw value against its rule. Pure: no side effects,
//! no I/O, same input gives the same result.

use crate::error::ConfigurationError;
use crate::registry::Registry;
use crate::types::FieldId;
use std::sync::Arc;

/// Why a value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Nothing left after trimming
    Empty,
    /// Non-empty but fails the rule
    Malformed,
}

/// Outcome of validating one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Field that was validated
    pub field: FieldId,
    /// Value with leading and trailing whitespace removed
    pub normalized_value: String,
    /// Set when the value was rejected
    pub reason: Option<RejectReason>,
}

impl ValidationResult {
    /// Whether the value was accepted
    #[inline]
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.reason.is_none()
    }
}

/// Stateless evaluator bound to a registry
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: Arc<Registry>,
}

impl ValidationEngine {
    /// Create an engine over `registry`
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// The registry rules are read from
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Shared handle to the registry
    #[inline]
    #[must_use]
    pub fn registry_arc(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Validate `raw_value` for field `id`
    ///
    /// # Errors
    /// `ConfigurationError::UnknownField` when no rule exists for `id`.
    /// User errors are not `Err`; they are reported through
    /// [`ValidationResult::reason`].
    pub fn validate(&self, id: &str, raw_value: &str) -> Result<ValidationResult, ConfigurationError> {
        let rule = self.registry.rule_for(id)?;
        let normalized_value = raw_value.trim().to_string();

        let reason = if normalized_value.is_empty() {
            Some(RejectReason::Empty)
        } else if rule.accepts(&normalized_value) {
            None
        } else {
            Some(RejectReason::Malformed)
        };

        Ok(ValidationResult {
            field: FieldId::from(id),
            normalized_value,
            reason,
        })
    }
}
