//! Gate controller
//!
//! Owns [`FormState`] and the [`ErrorReporter`], turns validation outcomes
//! into activation changes and notifications, and answers whether the form
//! is ready to submit.
//!
//! # Commit semantics
//! - accepted: field becomes valid, its mark becomes `Valid`, the next field
//!   is activated; forward navigation also moves focus to it
//! - rejected: field becomes invalid, its mark becomes `Invalid`, the
//!   notification shows a field-specific message; forward navigation is
//!   vetoed
//!
//! Activation never moves backwards on a rejection. A field that was valid
//! and is later committed with a bad value stays editable with validity
//! `false`; fields after it keep their activation.

use crate::error::{
    EmptyFieldError, FieldLockedError, FormError, FormatError, NotFoundError, Rejection,
};
use crate::registry::Registry;
use crate::reporter::ErrorReporter;
use crate::state::{FormSnapshot, FormState};
use crate::state_machine::validate_transition;
use crate::types::{CommitTrigger, FieldId, FieldMark, FieldStatus, Key, Navigation};
use crate::validation::{RejectReason, ValidationEngine, ValidationResult};
use std::sync::Arc;

/// Result of processing one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Validation details
    pub result: ValidationResult,
    /// Status of the committed field afterwards
    pub status: FieldStatus,
    /// What the input adapter should do with focus
    pub navigation: Navigation,
    /// Set when the value was rejected; its text is what the reporter shows
    pub rejection: Option<Rejection>,
}

impl CommitOutcome {
    /// Whether the committed value was accepted
    #[inline]
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Ordering gate over a registry of fields
#[derive(Debug, Clone)]
pub struct GateController {
    engine: ValidationEngine,
    state: FormState,
    reporter: ErrorReporter,
}

impl GateController {
    /// Gate in its initial state over `registry`
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self::with_shared(Arc::new(registry))
    }

    /// Gate over an already shared registry
    #[must_use]
    pub fn with_shared(registry: Arc<Registry>) -> Self {
        let state = FormState::new(&registry);
        Self {
            engine: ValidationEngine::new(registry),
            state,
            reporter: ErrorReporter::new(),
        }
    }

    /// Handle a field commit (blur or forward navigation)
    ///
    /// Rejections are not errors: they are returned in the outcome and
    /// shown through the reporter.
    ///
    /// # Errors
    /// - `Configuration` if `id` is not registered
    /// - `Locked` if the field is not interactable yet
    /// - `StateMachine` on an internal transition defect
    pub fn on_field_commit(
        &mut self,
        id: &str,
        raw_value: &str,
        trigger: CommitTrigger,
    ) -> Result<CommitOutcome, FormError> {
        let result = self.engine.validate(id, raw_value)?;
        let before = self.status_of(id)?;
        if before == FieldStatus::Locked {
            return Err(FieldLockedError(FieldId::from(id)).into());
        }

        let next = self.engine.registry().next_after(id).cloned();
        let rejection = result.reason.map(|reason| self.rejection_for(id, reason));

        let after = if rejection.is_none() {
            FieldStatus::Valid
        } else {
            FieldStatus::Editable
        };
        validate_transition(before, after)?;
        if rejection.is_none() {
            if let Some(next_id) = &next {
                let next_before = self.status_of(next_id.as_str())?;
                if next_before == FieldStatus::Locked {
                    validate_transition(next_before, FieldStatus::Editable)?;
                }
            }
        }

        let accepted = rejection.is_none();
        if let Some(field) = self.state.field_mut(id) {
            field.value.clone_from(&result.normalized_value);
            field.valid = accepted;
            field.mark = if accepted {
                FieldMark::Valid
            } else {
                FieldMark::Invalid
            };
        }

        let navigation = match (&rejection, trigger) {
            (None, CommitTrigger::ForwardNavigation) => Navigation::Advance {
                focus: next.clone(),
            },
            (Some(_), CommitTrigger::ForwardNavigation) => Navigation::Vetoed,
            (_, CommitTrigger::Blur) => Navigation::Stay,
        };

        match &rejection {
            None => {
                if let Some(next_field) = next.as_ref().and_then(|n| self.state.field_mut(n.as_str())) {
                    next_field.active = true;
                }
                tracing::debug!(field = %id, ?trigger, "commit accepted");
            }
            Some(rejection) => {
                self.reporter.show(rejection.to_string());
                tracing::debug!(field = %id, ?trigger, reason = %rejection, "commit rejected");
            }
        }

        Ok(CommitOutcome {
            result,
            status: after,
            navigation,
            rejection,
        })
    }

    fn rejection_for(&self, id: &str, reason: RejectReason) -> Rejection {
        let field = FieldId::from(id);
        let label = self
            .engine
            .registry()
            .descriptor(id)
            .map(|d| d.display_name().to_string())
            .unwrap_or_else(|_| id.to_string());
        match reason {
            RejectReason::Empty => EmptyFieldError { field, label }.into(),
            RejectReason::Malformed => FormatError { field, label }.into(),
        }
    }

    fn status_of(&self, id: &str) -> Result<FieldStatus, NotFoundError> {
        self.state
            .status(id)
            .ok_or_else(|| NotFoundError(FieldId::from(id)))
    }

    /// True iff every field is valid
    #[inline]
    #[must_use]
    pub fn is_form_ready(&self) -> bool {
        self.state.all_valid()
    }

    /// Derived status of `id`
    ///
    /// # Errors
    /// `NotFoundError` if `id` is not registered
    pub fn field_status(&self, id: &str) -> Result<FieldStatus, NotFoundError> {
        self.status_of(id)
    }

    /// Whether `id` may currently receive input
    #[inline]
    #[must_use]
    pub fn is_interactable(&self, id: &str) -> bool {
        self.state.activation(id).unwrap_or(false)
    }

    /// Read-only form state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Snapshot for renderers
    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        self.state.snapshot(self.engine.registry())
    }

    /// Registered fields
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        self.engine.registry()
    }

    /// Notification channel
    #[inline]
    #[must_use]
    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Explicit close action on the notification
    pub fn dismiss_error(&mut self) -> bool {
        self.reporter.dismiss()
    }

    /// Global key press; never submits anything
    pub fn on_key(&mut self, key: Key) -> bool {
        self.reporter.on_key(key)
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>) {
        self.reporter.show(message);
    }

    /// Clear values and return to the initial activation. The notification
    /// slot is left alone.
    pub(crate) fn reset(&mut self) {
        self.state.reset();
        tracing::info!(fields = self.engine.registry().len(), "form reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldDescriptor;
    use crate::rule::Rule;

    fn gate() -> GateController {
        GateController::new(
            Registry::register([
                FieldDescriptor::new("name", Rule::letters(2)),
                FieldDescriptor::new("phone", Rule::digits(7)),
                FieldDescriptor::new("email", Rule::email()),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn accept_activates_next() {
        let mut gate = gate();
        let outcome = gate.on_field_commit("name", "Jo", CommitTrigger::Blur).unwrap();
        assert!(outcome.accepted());
        assert_eq!(outcome.navigation, Navigation::Stay);
        assert!(gate.is_interactable("phone"));
        assert!(!gate.is_interactable("email"));
        assert_eq!(gate.field_status("name").unwrap(), FieldStatus::Valid);
    }

    #[test]
    fn forward_navigation_moves_focus() {
        let mut gate = gate();
        let outcome = gate
            .on_field_commit("name", "Jo", CommitTrigger::ForwardNavigation)
            .unwrap();
        assert_eq!(
            outcome.navigation,
            Navigation::Advance {
                focus: Some(FieldId::from("phone"))
            }
        );
    }

    #[test]
    fn forward_navigation_past_last_field_has_no_focus() {
        let mut gate = gate();
        gate.on_field_commit("name", "Jo", CommitTrigger::Blur).unwrap();
        gate.on_field_commit("phone", "1234567", CommitTrigger::Blur).unwrap();
        let outcome = gate
            .on_field_commit("email", "a@b.co", CommitTrigger::ForwardNavigation)
            .unwrap();
        assert_eq!(outcome.navigation, Navigation::Advance { focus: None });
        assert!(gate.is_form_ready());
    }

    #[test]
    fn rejected_forward_navigation_is_vetoed() {
        let mut gate = gate();
        let outcome = gate
            .on_field_commit("name", "J", CommitTrigger::ForwardNavigation)
            .unwrap();
        assert!(outcome.navigation.is_vetoed());
        assert!(!gate.is_interactable("phone"));
        assert!(gate.reporter().is_visible());
        assert_eq!(gate.reporter().message(), "The field name is invalid. Check the format.");
    }

    #[test]
    fn empty_commit_reports_empty() {
        let mut gate = gate();
        let outcome = gate.on_field_commit("name", "   ", CommitTrigger::Blur).unwrap();
        assert!(matches!(outcome.rejection, Some(Rejection::Empty(_))));
        assert_eq!(gate.reporter().message(), "The field name cannot be empty.");
        assert_eq!(gate.state().activation("phone"), Some(false));
    }

    #[test]
    fn stores_trimmed_value() {
        let mut gate = gate();
        gate.on_field_commit("name", "  Jo  ", CommitTrigger::Blur).unwrap();
        assert_eq!(gate.state().value("name"), Some("Jo"));
    }

    #[test]
    fn locked_field_refuses_commit() {
        let mut gate = gate();
        let err = gate
            .on_field_commit("phone", "1234567", CommitTrigger::Blur)
            .unwrap_err();
        assert_eq!(err, FormError::Locked(FieldLockedError(FieldId::from("phone"))));
        assert_eq!(gate.state().validity("phone"), Some(false));
        assert!(!gate.reporter().is_visible());
    }

    #[test]
    fn unknown_field_is_configuration_error() {
        let mut gate = gate();
        let err = gate.on_field_commit("ghost", "x", CommitTrigger::Blur).unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn regression_keeps_later_fields_active() {
        let mut gate = gate();
        gate.on_field_commit("name", "Jo", CommitTrigger::Blur).unwrap();
        gate.on_field_commit("phone", "1234567", CommitTrigger::Blur).unwrap();
        gate.on_field_commit("name", "J", CommitTrigger::Blur).unwrap();

        assert_eq!(gate.field_status("name").unwrap(), FieldStatus::Editable);
        assert!(gate.is_interactable("phone"));
        assert!(gate.is_interactable("email"));
        assert!(!gate.is_form_ready());
    }

    #[test]
    fn reset_returns_to_initial() {
        let mut gate = gate();
        gate.on_field_commit("name", "Jo", CommitTrigger::Blur).unwrap();
        gate.reset();
        assert!(gate.snapshot().is_initial());
    }
}
