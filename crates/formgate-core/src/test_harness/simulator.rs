//! Form gate simulator
//!
//! Drives a [`GateController`] and a [`SubmissionSequencer`] with seeded
//! random events and checks, after every event:
//! - activation: an active field has every predecessor valid, or (after a
//!   regression) every predecessor valid at some point since the last reset
//! - readiness: `is_form_ready()` equals "every field valid"
//! - idempotence: repeating a commit with the same value changes nothing
//! - refused submissions change nothing
//! - progress moves in fixed steps up to exactly 100
//! - a finalized run leaves the form in its initial state

use crate::config::FormConfig;
use crate::error::{ConfigurationError, FormError};
use crate::gate::GateController;
use crate::rule::Rule;
use crate::sequencer::{SequencerPhase, StartOutcome, SubmissionProgress, SubmissionSequencer, Tick};
use crate::types::{CommitTrigger, FieldId, Key};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of events to generate
    pub operations: u64,
    /// Stop at the first violation
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            operations: 10_000,
            stop_on_first_violation: true,
        }
    }
}

/// One generated event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOperation {
    /// Field commit
    Commit {
        /// Target field
        field: FieldId,
        /// Raw value
        value: String,
        /// Blur or forward navigation
        trigger: CommitTrigger,
    },
    /// Entry action
    StartSubmission,
    /// Periodic timer fired
    Tick,
    /// Finalize delay elapsed
    Finalize,
    /// Close button on the notification
    Dismiss,
    /// Global key press
    KeyPress(Key),
}

/// A broken invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A field is active although a predecessor never validated
    ActivationAhead {
        /// Offending field
        field: FieldId,
        /// Event index
        step: u64,
    },
    /// `is_form_ready` disagrees with the validity map
    ReadinessMismatch {
        /// Event index
        step: u64,
    },
    /// Repeating a commit changed state
    NotIdempotent {
        /// Field committed twice
        field: FieldId,
        /// Event index
        step: u64,
    },
    /// A submission started or mutated state while the form was not ready
    SubmissionNotGated {
        /// Event index
        step: u64,
    },
    /// Progress did not advance by exactly one step
    ProgressJump {
        /// Percent before
        from: u8,
        /// Percent after
        to: u8,
    },
    /// State after finalize differs from the initial state
    IncompleteReset {
        /// Event index
        step: u64,
    },
    /// An error that should never reach the caller
    UnexpectedError {
        /// Event that caused it
        operation: SimulatedOperation,
        /// Error text
        error: String,
    },
}

/// Counters collected during a run
#[derive(Debug, Clone, Default)]
pub struct SimulatorStats {
    /// Commits processed
    pub commits: u64,
    /// Commits accepted
    pub accepted: u64,
    /// Commits rejected
    pub rejected: u64,
    /// Forward navigations vetoed
    pub vetoed: u64,
    /// Commits refused on locked fields
    pub locked_refusals: u64,
    /// Runs started
    pub submissions_started: u64,
    /// Starts refused as not ready
    pub submissions_refused: u64,
    /// Runs that reached reset
    pub submissions_completed: u64,
    /// Timer ticks delivered
    pub ticks: u64,
    /// Notifications dismissed
    pub dismissals: u64,
}

/// Final report from the simulator
#[derive(Debug, Clone)]
pub struct SimulatorReport {
    /// Configuration the run used
    pub config: SimulatorConfig,
    /// Counters
    pub stats: SimulatorStats,
    /// Broken invariants, in order found
    pub violations: Vec<Violation>,
}

impl SimulatorReport {
    /// No invariant was broken
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        let s = &self.stats;

        report.push_str("=== Form Gate Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Operations: {}\n", self.config.operations));
        report.push_str(&format!("Commits: {} (accepted {}, rejected {}, vetoed {})\n",
            s.commits, s.accepted, s.rejected, s.vetoed));
        report.push_str(&format!("Locked refusals: {}\n", s.locked_refusals));
        report.push_str(&format!("Submissions: started {}, refused {}, completed {}\n",
            s.submissions_started, s.submissions_refused, s.submissions_completed));
        report.push_str(&format!("Ticks: {}\n", s.ticks));
        report.push_str(&format!("Dismissals: {}\n", s.dismissals));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {:?}\n", i + 1, v));
            }
        }

        report.push_str(&format!("\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));
        report
    }
}

#[derive(Debug, Clone, Copy)]
enum ValueKind {
    Valid,
    Malformed,
    Empty,
    Padded,
}

/// Run the simulator over `form`
///
/// # Errors
/// Configuration errors from building `form`.
pub fn run_simulator(
    form: &FormConfig,
    config: SimulatorConfig,
) -> Result<SimulatorReport, ConfigurationError> {
    let registry = form.build()?;
    let rules: Vec<(FieldId, Rule)> = registry
        .ordered()
        .map(|d| (d.id.clone(), d.rule.clone()))
        .collect();
    let step_percent = form.submission.step_percent;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut gate = GateController::new(registry);
    let mut sequencer = SubmissionSequencer::new(form.submission)?;
    let mut tracker = ReachTracker::new(rules.len());
    let mut stats = SimulatorStats::default();
    let mut violations = Vec::new();

    for step in 0..config.operations {
        let operation = generate_operation(&mut rng, &rules);
        let before = violations.len();

        match &operation {
            SimulatedOperation::Commit { field, value, trigger } => {
                stats.commits += 1;
                let was_valid = gate.state().validity(field.as_str()).unwrap_or(false);
                match gate.on_field_commit(field.as_str(), value, *trigger) {
                    Ok(outcome) => {
                        if outcome.accepted() {
                            stats.accepted += 1;
                        } else {
                            stats.rejected += 1;
                        }
                        if outcome.navigation.is_vetoed() {
                            stats.vetoed += 1;
                        }

                        let state_after = gate.state().clone();
                        let repeat = gate.on_field_commit(field.as_str(), value, *trigger);
                        if repeat.as_ref() != Ok(&outcome) || gate.state() != &state_after {
                            violations.push(Violation::NotIdempotent {
                                field: field.clone(),
                                step,
                            });
                        }

                        let index = gate.registry().position(field.as_str()).unwrap_or(0);
                        if outcome.accepted() {
                            tracker.reached(index);
                        } else if was_valid {
                            tracker.regressed();
                        }
                    }
                    Err(FormError::Locked(_)) => stats.locked_refusals += 1,
                    Err(e) => violations.push(Violation::UnexpectedError {
                        operation: operation.clone(),
                        error: e.to_string(),
                    }),
                }
            }
            SimulatedOperation::StartSubmission => {
                let ready = gate.is_form_ready();
                let phase = sequencer.phase();
                let state_before = gate.state().clone();
                match sequencer.start(&mut gate) {
                    Ok(StartOutcome::Started) => {
                        stats.submissions_started += 1;
                        if !ready {
                            violations.push(Violation::SubmissionNotGated { step });
                        }
                    }
                    Ok(StartOutcome::AlreadyRunning) => {
                        if phase == SequencerPhase::Idle {
                            violations.push(Violation::SubmissionNotGated { step });
                        }
                    }
                    Err(_) => {
                        stats.submissions_refused += 1;
                        if ready
                            || gate.state() != &state_before
                            || sequencer.progress() != SubmissionProgress::default()
                        {
                            violations.push(Violation::SubmissionNotGated { step });
                        }
                    }
                }
            }
            SimulatedOperation::Tick => {
                let from = sequencer.progress().percent;
                let tick = sequencer.tick();
                if tick != Tick::Ignored {
                    stats.ticks += 1;
                    let to = sequencer.progress().percent;
                    let expected = from.saturating_add(step_percent).min(100);
                    let consistent = match tick {
                        Tick::Advanced(p) => p == to && to < 100,
                        Tick::Completed => to == 100,
                        Tick::Ignored => true,
                    };
                    if to != expected || !consistent {
                        violations.push(Violation::ProgressJump { from, to });
                    }
                }
            }
            SimulatedOperation::Finalize => {
                if sequencer.finalize(&mut gate) {
                    stats.submissions_completed += 1;
                    tracker.reset();
                    if !gate.snapshot().is_initial()
                        || sequencer.progress() != SubmissionProgress::default()
                        || sequencer.is_entry_enabled(&gate)
                    {
                        violations.push(Violation::IncompleteReset { step });
                    }
                }
            }
            SimulatedOperation::Dismiss => {
                if gate.dismiss_error() {
                    stats.dismissals += 1;
                }
            }
            SimulatedOperation::KeyPress(key) => {
                if gate.on_key(*key) {
                    stats.dismissals += 1;
                }
            }
        }

        check_gate(&gate, &tracker, step, &mut violations);

        if config.stop_on_first_violation && violations.len() > before {
            break;
        }
    }

    Ok(SimulatorReport {
        config,
        stats,
        violations,
    })
}

/// Remembers which fields validated since the last reset
struct ReachTracker {
    reached: Vec<bool>,
    regressed: bool,
}

impl ReachTracker {
    fn new(len: usize) -> Self {
        Self {
            reached: vec![false; len],
            regressed: false,
        }
    }

    fn reached(&mut self, index: usize) {
        if let Some(r) = self.reached.get_mut(index) {
            *r = true;
        }
    }

    fn regressed(&mut self) {
        self.regressed = true;
    }

    fn reset(&mut self) {
        self.reached.iter_mut().for_each(|r| *r = false);
        self.regressed = false;
    }
}

fn check_gate(gate: &GateController, tracker: &ReachTracker, step: u64, violations: &mut Vec<Violation>) {
    let snapshot = gate.snapshot();

    for (i, field) in snapshot.fields.iter().enumerate() {
        if !field.active || i == 0 {
            continue;
        }
        let predecessors = &snapshot.fields[..i];
        let ok = if tracker.regressed {
            tracker.reached[..i].iter().all(|r| *r)
        } else {
            predecessors.iter().all(|p| p.valid)
        };
        if !ok {
            violations.push(Violation::ActivationAhead {
                field: field.id.clone(),
                step,
            });
        }
    }

    let all_valid = snapshot.fields.iter().all(|f| f.valid);
    if gate.is_form_ready() != all_valid {
        violations.push(Violation::ReadinessMismatch { step });
    }
}

fn generate_operation(rng: &mut StdRng, rules: &[(FieldId, Rule)]) -> SimulatedOperation {
    match rng.gen_range(0..100) {
        0..=59 => {
            let (field, rule) = &rules[rng.gen_range(0..rules.len())];
            let kind = match rng.gen_range(0..10) {
                0..=5 => ValueKind::Valid,
                6..=7 => ValueKind::Malformed,
                8 => ValueKind::Empty,
                _ => ValueKind::Padded,
            };
            let trigger = if rng.gen_bool(0.5) {
                CommitTrigger::Blur
            } else {
                CommitTrigger::ForwardNavigation
            };
            SimulatedOperation::Commit {
                field: field.clone(),
                value: sample_value(rng, rule, kind),
                trigger,
            }
        }
        60..=79 => SimulatedOperation::Tick,
        80..=87 => SimulatedOperation::StartSubmission,
        88..=93 => SimulatedOperation::Finalize,
        94..=96 => SimulatedOperation::Dismiss,
        _ => SimulatedOperation::KeyPress(
            *[Key::Enter, Key::Escape, Key::Other]
                .choose(rng)
                .unwrap_or(&Key::Enter),
        ),
    }
}

const LETTERS: &[char] = &['a', 'b', 'e', 'l', 'm', 'o', 'r', 'á', 'ñ', 'A', 'J', 'M'];

fn sample_value(rng: &mut StdRng, rule: &Rule, kind: ValueKind) -> String {
    match kind {
        ValueKind::Empty => " ".repeat(rng.gen_range(0..3)),
        ValueKind::Padded => format!("  {}\t", sample_value(rng, rule, ValueKind::Valid)),
        ValueKind::Valid => match rule {
            Rule::Letters { min } => {
                let len = min + rng.gen_range(0..4);
                (0..len).map(|_| LETTERS[rng.gen_range(0..LETTERS.len())]).collect()
            }
            Rule::Digits { exact } => digits(rng, *exact),
            Rule::Email => format!("user{}@example.com", rng.gen_range(0..1000)),
            Rule::Pattern { .. } => arbitrary(rng),
        },
        ValueKind::Malformed => match rule {
            Rule::Letters { min } => format!("{}7", "a".repeat(*min)),
            Rule::Digits { exact } => digits(rng, exact + 1),
            Rule::Email => format!("user{}.example.com", rng.gen_range(0..1000)),
            Rule::Pattern { .. } => arbitrary(rng),
        },
    }
}

fn digits(rng: &mut StdRng, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn arbitrary(rng: &mut StdRng) -> String {
    ["abc", "ABC-12", "123", "x y", "@", "Zz9"][rng.gen_range(0..6)].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_form_passes() {
        let report = run_simulator(
            &FormConfig::contact_form(),
            SimulatorConfig {
                operations: 2_000,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(report.passed(), "{}", report.generate_text());
        assert!(report.stats.accepted > 0);
        assert!(report.stats.rejected > 0);
    }

    #[test]
    fn same_seed_same_stats() {
        let run = |seed| {
            run_simulator(
                &FormConfig::contact_form(),
                SimulatorConfig {
                    seed,
                    operations: 500,
                    stop_on_first_violation: false,
                },
            )
            .unwrap()
            .stats
        };
        let a = run(7);
        let b = run(7);
        assert_eq!(a.commits, b.commits);
        assert_eq!(a.accepted, b.accepted);
        assert_eq!(a.ticks, b.ticks);
    }

    #[test]
    fn report_text_mentions_result() {
        let report = run_simulator(
            &FormConfig::contact_form(),
            SimulatorConfig {
                operations: 10,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(report.generate_text().contains("=== Result: PASS ==="));
    }

    #[test]
    fn bad_form_is_rejected_up_front() {
        assert!(run_simulator(&FormConfig::new(), SimulatorConfig::default()).is_err());
    }
}
