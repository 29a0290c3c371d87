//! Presentation seam
//!
//! The gate never draws anything itself. A [`Renderer`] receives snapshots
//! and progress updates after every processed event.

use crate::state::FormSnapshot;

/// Receives everything the user should see
pub trait Renderer: Send + 'static {
    /// Draw field states (interactable, locked, valid, invalid)
    fn present(&mut self, snapshot: &FormSnapshot);

    /// Draw the submission progress bar
    fn present_progress(&mut self, percent: u8);

    /// Draw or hide the notification
    fn present_notification(&mut self, message: &str, visible: bool);

    /// Tell the user the submission went through
    fn acknowledge_success(&mut self, message: &str);

    /// Entry action enabled or disabled
    fn present_entry_action(&mut self, _enabled: bool) {}
}

/// Renderer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _snapshot: &FormSnapshot) {}
    fn present_progress(&mut self, _percent: u8) {}
    fn present_notification(&mut self, _message: &str, _visible: bool) {}
    fn acknowledge_success(&mut self, _message: &str) {}
}

/// Renderer that turns presentation calls into `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn present(&mut self, snapshot: &FormSnapshot) {
        for field in &snapshot.fields {
            tracing::debug!(
                field = %field.id,
                status = ?field.status,
                mark = ?field.mark,
                value = %field.value,
                "field"
            );
        }
    }

    fn present_progress(&mut self, percent: u8) {
        tracing::info!(percent, "progress");
    }

    fn present_notification(&mut self, message: &str, visible: bool) {
        if visible {
            tracing::warn!(%message, "notification shown");
        } else {
            tracing::debug!(%message, "notification dismissed");
        }
    }

    fn acknowledge_success(&mut self, message: &str) {
        tracing::info!(%message, "submission acknowledged");
    }

    fn present_entry_action(&mut self, enabled: bool) {
        tracing::debug!(enabled, "entry action");
    }
}
