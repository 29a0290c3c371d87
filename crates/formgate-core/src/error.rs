//! Error types for the validation gate
//!
//! Two families live here:
//! - setup defects ([`ConfigurationError`]) that abort initialization
//! - user-facing, recoverable failures ([`Rejection`], [`NotReadyError`])
//!   that the gate converts into notifications instead of propagating

use crate::types::{FieldId, FieldStatus};

/// Message shown when submission is attempted before every field is valid.
pub const NOT_READY_MESSAGE: &str = "Please complete all fields correctly.";

/// Acknowledgement emitted once a submission run completes.
pub const SUCCESS_MESSAGE: &str = "Form submitted successfully.";

/// Lookup of a field id that is not registered
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct NotFoundError(pub FieldId);

/// Setup-time defects. Fatal: the form must not start with partial state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Registration received no descriptors
    #[error("form has no fields")]
    EmptyRegistry,

    /// Two descriptors share an id
    #[error("duplicate field id: {0}")]
    DuplicateField(FieldId),

    /// A field id has no registered rule
    #[error("no rule registered: {0}")]
    UnknownField(#[from] NotFoundError),

    /// A pattern rule failed to compile
    #[error("invalid pattern for field {field}: {reason}")]
    InvalidPattern {
        /// Field carrying the pattern
        field: FieldId,
        /// Compiler diagnostic
        reason: String,
    },

    /// A rule parameter is out of range
    #[error("invalid rule for field {field}: {reason}")]
    InvalidRule {
        /// Field carrying the rule
        field: FieldId,
        /// What is wrong with it
        reason: String,
    },

    /// Submission timing is unusable
    #[error("invalid submission settings: {0}")]
    InvalidSubmission(String),

    /// Config file could not be read
    #[error("cannot read {path}: {reason}")]
    Io {
        /// Path that was read
        path: String,
        /// I/O diagnostic
        reason: String,
    },

    /// Config file could not be parsed
    #[error("cannot parse {path}: {reason}")]
    Parse {
        /// Path (or `<inline>`) that was parsed
        path: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Config file extension is not toml, yaml or json
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Commit with a value that is empty after trimming
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("The field {label} cannot be empty.")]
pub struct EmptyFieldError {
    /// Rejected field
    pub field: FieldId,
    /// Name used in the message
    pub label: String,
}

/// Commit with a non-empty value that fails the field's rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("The field {label} is invalid. Check the format.")]
pub struct FormatError {
    /// Rejected field
    pub field: FieldId,
    /// Name used in the message
    pub label: String,
}

/// A user-facing commit rejection; its `Display` is the notification text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Empty after trimming
    #[error(transparent)]
    Empty(#[from] EmptyFieldError),
    /// Fails the acceptance rule
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl Rejection {
    /// Field the rejection refers to
    #[must_use]
    pub fn field(&self) -> &FieldId {
        match self {
            Self::Empty(e) => &e.field,
            Self::Format(e) => &e.field,
        }
    }
}

/// Submission requested while some field is not valid
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please complete all fields correctly.")]
pub struct NotReadyError {
    /// Fields whose validity is currently false, in registry order
    pub pending: Vec<FieldId>,
}

/// Commit aimed at a field that cannot receive input yet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field {0} is locked")]
pub struct FieldLockedError(pub FieldId);

/// Field status change outside the gate's state diagram
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal field transition {from:?} -> {to:?}")]
pub struct StateMachineError {
    /// Status before
    pub from: FieldStatus,
    /// Requested status
    pub to: FieldStatus,
}

/// The session task is gone
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Command channel closed
    #[error("form session closed")]
    Closed,
}

/// Umbrella error for gate operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Setup or programming defect
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Rejected commit
    #[error("{0}")]
    Rejected(#[from] Rejection),

    /// Submission before the form is ready
    #[error("{0}")]
    NotReady(#[from] NotReadyError),

    /// Input sent to a locked field
    #[error("{0}")]
    Locked(#[from] FieldLockedError),

    /// Internal transition defect
    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Session unavailable
    #[error("{0}")]
    Session(#[from] SessionError),
}

impl From<NotFoundError> for FormError {
    fn from(value: NotFoundError) -> Self {
        Self::Configuration(value.into())
    }
}

impl FormError {
    /// Whether the form can keep running after this error
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Configuration(_) | Self::StateMachine(_) => false,
            Self::Rejected(_) | Self::NotReady(_) | Self::Locked(_) | Self::Session(_) => true,
        }
    }

    /// Whether this error is surfaced to the user as a notification
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::NotReady(_))
    }
}
