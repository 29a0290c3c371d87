//! formgate core
//!
//! A sequential field-validation gate: fields must be filled in order, each
//! one unlocked only after its predecessor validates. Rejections surface
//! through a single-slot notification, and a fully valid form can run a
//! simulated, timer-driven submission that ends in a reset.
//!
//! # Layers
//! - [`registry`]: ordered field descriptors and their rules
//! - [`validation`]: trims and checks one value
//! - [`gate`]: activation order, validity, readiness
//! - [`reporter`]: one visible error at a time
//! - [`sequencer`]: progress steps, then reset
//! - [`session`]: tokio task owning all of the above behind a command handle
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use formgate_core::prelude::*;
//!
//! let registry = Registry::register([
//!     FieldDescriptor::new("name", Rule::letters(2)),
//!     FieldDescriptor::new("phone", Rule::digits(7)),
//! ])?;
//! let mut gate = GateController::new(registry);
//!
//! gate.on_field_commit("name", "Jo", CommitTrigger::Blur)?;
//! assert!(gate.is_interactable("phone"));
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod registry;
pub mod render;
pub mod reporter;
pub mod rule;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod state_machine;
pub mod types;
pub mod validation;

// Test harness
pub mod test_harness;

pub use error::*;
pub use types::*;

/// Common imports
pub mod prelude {
    pub use crate::config::{FormConfig, SubmissionConfig};
    pub use crate::error::{
        ConfigurationError, FormError, NotReadyError, Rejection, SessionError,
    };
    pub use crate::gate::{CommitOutcome, GateController};
    pub use crate::registry::{FieldDescriptor, Registry};
    pub use crate::render::{NullRenderer, Renderer, TracingRenderer};
    pub use crate::reporter::{ErrorNotification, ErrorReporter};
    pub use crate::rule::Rule;
    pub use crate::sequencer::{
        SequencerPhase, StartOutcome, SubmissionProgress, SubmissionSequencer, Tick,
    };
    pub use crate::session::{FormHandle, FormSession, SessionSnapshot};
    pub use crate::state::{FieldView, FormSnapshot, FormState};
    pub use crate::types::{CommitTrigger, FieldId, FieldMark, FieldStatus, Key, Navigation};
    pub use crate::validation::{RejectReason, ValidationEngine, ValidationResult};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
