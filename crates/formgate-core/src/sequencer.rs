//! Submission sequencer
//!
//! Simulated multi-step submission. The sequencer is a plain state machine
//! driven by `start`, `tick` and `finalize`; the session runtime supplies
//! the timers (a periodic tick and a one-shot finalize delay).
//!
//! ```text
//! Idle --start (form ready)--> Running{0} --tick--> Running{10} ... --tick--> Finalizing
//!  ^                                                                             |
//!  +---------------------------------finalize (reset form)-----------------------+
//! ```

use crate::config::SubmissionConfig;
use crate::error::{ConfigurationError, NotReadyError, NOT_READY_MESSAGE};
use crate::gate::GateController;
use serde::{Deserialize, Serialize};

/// Progress of a submission run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionProgress {
    /// 0..=100, increases by the configured step
    pub percent: u8,
    /// Whether ticks are still being applied
    pub running: bool,
}

/// Where the sequencer is in its cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerPhase {
    /// Waiting for a start request
    #[default]
    Idle,
    /// Ticks advance the percentage
    Running,
    /// 100% reached; waiting for the finalize delay
    Finalizing,
}

/// Answer to a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new run began at 0%
    Started,
    /// A run is in progress; nothing changed
    AlreadyRunning,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Percentage advanced, still below 100
    Advanced(u8),
    /// Reached 100; the periodic timer must be cancelled now
    Completed,
    /// Not running; tick ignored
    Ignored,
}

/// Drives the progress-then-reset flow
#[derive(Debug, Clone)]
pub struct SubmissionSequencer {
    config: SubmissionConfig,
    phase: SequencerPhase,
    progress: SubmissionProgress,
}

impl SubmissionSequencer {
    /// Idle sequencer with the given timings
    ///
    /// # Errors
    /// `InvalidSubmission` when `config` fails [`SubmissionConfig::validate`].
    pub fn new(config: SubmissionConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: SequencerPhase::Idle,
            progress: SubmissionProgress::default(),
        })
    }

    /// Begin a run if the form is ready
    ///
    /// While a run is in progress this is a no-op returning
    /// `AlreadyRunning`, regardless of form state.
    ///
    /// # Errors
    /// `NotReadyError` when some field is invalid; the gate's reporter
    /// shows the generic message and nothing else changes.
    pub fn start(&mut self, gate: &mut GateController) -> Result<StartOutcome, NotReadyError> {
        if self.phase != SequencerPhase::Idle {
            tracing::debug!(phase = ?self.phase, "submission already in progress");
            return Ok(StartOutcome::AlreadyRunning);
        }
        if !gate.is_form_ready() {
            let pending = gate.state().pending();
            tracing::warn!(pending = pending.len(), "submission attempted before form is ready");
            gate.notify(NOT_READY_MESSAGE);
            return Err(NotReadyError { pending });
        }

        self.phase = SequencerPhase::Running;
        self.progress = SubmissionProgress {
            percent: 0,
            running: true,
        };
        tracing::info!(step = self.config.step_percent, "submission started");
        Ok(StartOutcome::Started)
    }

    /// Apply one periodic step
    pub fn tick(&mut self) -> Tick {
        if self.phase != SequencerPhase::Running {
            return Tick::Ignored;
        }
        let next = self.progress.percent.saturating_add(self.config.step_percent).min(100);
        self.progress.percent = next;
        tracing::debug!(percent = next, "submission progress");

        if next >= 100 {
            self.progress.running = false;
            self.phase = SequencerPhase::Finalizing;
            tracing::info!("submission reached 100%");
            Tick::Completed
        } else {
            Tick::Advanced(next)
        }
    }

    /// Complete the run: reset the form and return to idle
    ///
    /// Returns `false` (and does nothing) unless the run reached 100%.
    pub fn finalize(&mut self, gate: &mut GateController) -> bool {
        if self.phase != SequencerPhase::Finalizing {
            return false;
        }
        gate.reset();
        self.progress = SubmissionProgress::default();
        self.phase = SequencerPhase::Idle;
        tracing::info!("submission finalized");
        true
    }

    /// Whether the entry action should be enabled
    #[inline]
    #[must_use]
    pub fn is_entry_enabled(&self, gate: &GateController) -> bool {
        self.phase == SequencerPhase::Idle && gate.is_form_ready()
    }

    /// Current progress
    #[inline]
    #[must_use]
    pub fn progress(&self) -> SubmissionProgress {
        self.progress
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    /// Configured timings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FieldDescriptor, Registry};
    use crate::rule::Rule;
    use crate::types::CommitTrigger;
    use std::time::Duration;

    fn ready_gate() -> GateController {
        let mut gate = GateController::new(
            Registry::register([
                FieldDescriptor::new("name", Rule::letters(2)),
                FieldDescriptor::new("phone", Rule::digits(7)),
            ])
            .unwrap(),
        );
        gate.on_field_commit("name", "Jo", CommitTrigger::Blur).unwrap();
        gate.on_field_commit("phone", "1234567", CommitTrigger::Blur).unwrap();
        gate
    }

    #[test]
    fn not_ready_shows_generic_message() {
        let mut gate = GateController::new(
            Registry::register([FieldDescriptor::new("name", Rule::letters(2))]).unwrap(),
        );
        let mut sequencer = SubmissionSequencer::new(SubmissionConfig::default()).unwrap();
        let err = sequencer.start(&mut gate).unwrap_err();
        assert_eq!(err.pending.len(), 1);
        assert_eq!(gate.reporter().message(), NOT_READY_MESSAGE);
        assert_eq!(sequencer.progress().percent, 0);
        assert_eq!(sequencer.phase(), SequencerPhase::Idle);
    }

    #[test]
    fn runs_in_fixed_steps_to_one_hundred() {
        let mut gate = ready_gate();
        let mut sequencer = SubmissionSequencer::new(SubmissionConfig::default()).unwrap();
        assert_eq!(sequencer.start(&mut gate).unwrap(), StartOutcome::Started);
        assert!(!sequencer.is_entry_enabled(&gate));

        let mut seen = vec![sequencer.progress().percent];
        loop {
            match sequencer.tick() {
                Tick::Advanced(p) => seen.push(p),
                Tick::Completed => {
                    seen.push(sequencer.progress().percent);
                    break;
                }
                Tick::Ignored => panic!("tick ignored while running"),
            }
        }
        assert_eq!(seen, (0..=10).map(|i| i * 10).collect::<Vec<u8>>());
        assert!(!sequencer.progress().running);
        assert_eq!(sequencer.tick(), Tick::Ignored);
    }

    #[test]
    fn second_start_is_noop() {
        let mut gate = ready_gate();
        let mut sequencer = SubmissionSequencer::new(SubmissionConfig::default()).unwrap();
        sequencer.start(&mut gate).unwrap();
        sequencer.tick();
        assert_eq!(sequencer.start(&mut gate).unwrap(), StartOutcome::AlreadyRunning);
        assert_eq!(sequencer.progress().percent, 10);
    }

    #[test]
    fn finalize_resets_form() {
        let mut gate = ready_gate();
        let mut sequencer = SubmissionSequencer::new(SubmissionConfig::default().with_step(50)).unwrap();
        assert!(!sequencer.finalize(&mut gate));
        sequencer.start(&mut gate).unwrap();
        assert_eq!(sequencer.tick(), Tick::Advanced(50));
        assert!(!sequencer.finalize(&mut gate));
        assert_eq!(sequencer.tick(), Tick::Completed);
        assert_eq!(sequencer.start(&mut gate).unwrap(), StartOutcome::AlreadyRunning);
        assert!(sequencer.finalize(&mut gate));

        assert!(gate.snapshot().is_initial());
        assert_eq!(sequencer.progress(), SubmissionProgress::default());
        assert!(!sequencer.is_entry_enabled(&gate));
    }

    #[test]
    fn step_that_does_not_divide_hundred_clamps() {
        let mut gate = ready_gate();
        let mut sequencer = SubmissionSequencer::new(SubmissionConfig::default().with_step(30)).unwrap();
        sequencer.start(&mut gate).unwrap();
        assert_eq!(sequencer.tick(), Tick::Advanced(30));
        assert_eq!(sequencer.tick(), Tick::Advanced(60));
        assert_eq!(sequencer.tick(), Tick::Advanced(90));
        assert_eq!(sequencer.tick(), Tick::Completed);
        assert_eq!(sequencer.progress().percent, 100);
    }

    #[test]
    fn rejects_invalid_timings() {
        assert!(matches!(
            SubmissionSequencer::new(SubmissionConfig::default().with_step(0)),
            Err(ConfigurationError::InvalidSubmission(_))
        ));
        assert!(matches!(
            SubmissionSequencer::new(SubmissionConfig::default().with_step(101)),
            Err(ConfigurationError::InvalidSubmission(_))
        ));
        assert!(matches!(
            SubmissionSequencer::new(SubmissionConfig::default().with_tick_period(Duration::ZERO)),
            Err(ConfigurationError::InvalidSubmission(_))
        ));
    }
}
