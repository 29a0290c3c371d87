//! Field status transitions
//!
//! A field moves `Locked -> Editable` when its predecessor validates,
//! between `Editable` and `Valid` on each commit, and back to `Locked` only
//! on reset.

use crate::error::StateMachineError;
use crate::types::FieldStatus;

/// Validates a field status transition.
///
/// Fields only move forward out of `Locked`; once interactable they flip
/// between `Editable` and `Valid` on every commit. The only way back to
/// `Locked` is a form reset.
pub fn validate_transition(from: FieldStatus, to: FieldStatus) -> Result<(), StateMachineError> {
    if from == to || allowed(from, to) {
        Ok(())
    } else {
        Err(StateMachineError { from, to })
    }
}

/// Statuses reachable from `from` by a commit or a reset
pub fn allowed_transitions(from: FieldStatus) -> Vec<FieldStatus> {
    use FieldStatus::*;
    match from {
        Locked => vec![Editable],
        Editable => vec![Valid, Locked],
        Valid => vec![Editable, Locked],
    }
}

fn allowed(from: FieldStatus, to: FieldStatus) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
