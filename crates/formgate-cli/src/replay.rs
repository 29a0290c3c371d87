//! Scripted sessions: a JSON list of user events played against a live
//! form session.

use anyhow::{bail, Context, Result};
use formgate_core::prelude::*;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// One scripted user event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum ScriptStep {
    /// Commit a value to a field
    Commit {
        field: String,
        value: String,
        #[serde(default = "blur")]
        trigger: CommitTrigger,
    },
    /// Activate the entry action
    Submit,
    /// Let timers run
    Wait { ms: u64 },
    /// Global key press
    Key { key: Key },
    /// Close button on the notification
    Dismiss,
}

fn blur() -> CommitTrigger {
    CommitTrigger::Blur
}

pub(crate) fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing script {}", path.display()))
}

/// Play `steps` and return the final snapshot
pub(crate) async fn replay(config: &FormConfig, steps: &[ScriptStep]) -> Result<SessionSnapshot> {
    let (handle, task) = FormSession::spawn_from_config(config, TracingRenderer)?;

    for (index, step) in steps.iter().enumerate() {
        info!(step = index, ?step, "Replaying");
        match step {
            ScriptStep::Commit {
                field,
                value,
                trigger,
            } => match handle.commit(field.as_str(), value.as_str(), *trigger).await {
                Ok(outcome) => info!(
                    field = %field,
                    accepted = outcome.accepted(),
                    status = ?outcome.status,
                    navigation = ?outcome.navigation,
                    "Committed"
                ),
                Err(FormError::Session(err)) => bail!(err),
                Err(err) => warn!(field = %field, error = %err, "Commit refused"),
            },
            ScriptStep::Submit => match handle.start_submission().await {
                Ok(outcome) => info!(?outcome, "Submission"),
                Err(FormError::Session(err)) => bail!(err),
                Err(err) => warn!(error = %err, "Submission refused"),
            },
            ScriptStep::Wait { ms } => tokio::time::sleep(Duration::from_millis(*ms)).await,
            ScriptStep::Key { key } => {
                let dismissed = handle.key_press(*key).await?;
                info!(?key, dismissed, "Key");
            }
            ScriptStep::Dismiss => {
                let dismissed = handle.dismiss_error().await?;
                info!(dismissed, "Dismiss");
            }
        }
    }

    let snapshot = handle.snapshot().await?;
    handle.shutdown().await?;
    task.await.context("session task panicked")?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps() {
        let steps: Vec<ScriptStep> = serde_json::from_str(
            r#"[
                {"op": "commit", "field": "name", "value": "Ana"},
                {"op": "commit", "field": "surname", "value": "x", "trigger": "forward_navigation"},
                {"op": "key", "key": "enter"},
                {"op": "dismiss"},
                {"op": "submit"},
                {"op": "wait", "ms": 1600}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(
            steps[1],
            ScriptStep::Commit {
                field: "surname".into(),
                value: "x".into(),
                trigger: CommitTrigger::ForwardNavigation,
            }
        );
        assert_eq!(steps[5], ScriptStep::Wait { ms: 1600 });
    }

    #[tokio::test]
    async fn replays_partial_form() {
        let steps = vec![
            ScriptStep::Commit {
                field: "name".into(),
                value: " Ana ".into(),
                trigger: CommitTrigger::Blur,
            },
            ScriptStep::Commit {
                field: "email".into(),
                value: "a@b.co".into(),
                trigger: CommitTrigger::Blur,
            },
            ScriptStep::Submit,
        ];
        let snapshot = replay(&FormConfig::contact_form(), &steps).await.unwrap();
        assert_eq!(snapshot.form.field("name").unwrap().value, "Ana");
        assert!(snapshot.form.field("email").unwrap().value.is_empty());
        assert_eq!(snapshot.notification.message, formgate_core::NOT_READY_MESSAGE);
    }
}
