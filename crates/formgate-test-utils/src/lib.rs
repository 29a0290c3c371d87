//! Testing utilities for formgate workspace
//!
//! Shared fixtures, a recording renderer and small commit helpers.

#![allow(missing_docs)]

use formgate_core::gate::GateController;
use formgate_core::registry::{FieldDescriptor, Registry};
use formgate_core::render::Renderer;
use formgate_core::rule::Rule;
use formgate_core::state::FormSnapshot;
use formgate_core::types::CommitTrigger;
use formgate_core::config::FormConfig;
use parking_lot::Mutex;
use std::sync::Arc;

/// `name: letters>=2`, `phone: exactly 7 digits`
pub fn two_field_registry() -> Registry {
    Registry::register([
        FieldDescriptor::new("name", Rule::letters(2)),
        FieldDescriptor::new("phone", Rule::digits(7)),
    ])
    .unwrap()
}

pub fn contact_registry() -> Registry {
    FormConfig::contact_form().build().unwrap()
}

/// Values that pass every rule of the contact form, in fill order
pub fn contact_values() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "María"),
        ("surname", "Pérez"),
        ("email", "maria@example.com"),
        ("phone", "5551234"),
        ("mobile", "3001234567"),
    ]
}

/// Commit each `(id, value)` on blur, panicking on gate errors
pub fn commit_all(gate: &mut GateController, values: &[(&str, &str)]) {
    for (id, value) in values {
        gate.on_field_commit(id, value, CommitTrigger::Blur).unwrap();
    }
}

/// A gate over [`two_field_registry`] with both fields valid
pub fn ready_two_field_gate() -> GateController {
    let mut gate = GateController::new(two_field_registry());
    commit_all(&mut gate, &[("name", "Jo"), ("phone", "1234567")]);
    gate
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Form(FormSnapshot),
    Progress(u8),
    Notification { message: String, visible: bool },
    Success(String),
    EntryAction(bool),
}

/// Renderer that records every call; clones share the log
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().clone()
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<(String, bool)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Notification { message, visible } => Some((message.clone(), *visible)),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Success(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_form(&self) -> Option<FormSnapshot> {
        self.events.lock().iter().rev().find_map(|e| match e {
            RenderEvent::Form(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: RenderEvent) {
        self.events.lock().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn present(&mut self, snapshot: &FormSnapshot) {
        self.push(RenderEvent::Form(snapshot.clone()));
    }

    fn present_progress(&mut self, percent: u8) {
        self.push(RenderEvent::Progress(percent));
    }

    fn present_notification(&mut self, message: &str, visible: bool) {
        self.push(RenderEvent::Notification {
            message: message.to_string(),
            visible,
        });
    }

    fn acknowledge_success(&mut self, message: &str) {
        self.push(RenderEvent::Success(message.to_string()));
    }

    fn present_entry_action(&mut self, enabled: bool) {
        self.push(RenderEvent::EntryAction(enabled));
    }
}
