//! Form session runtime
//!
//! A [`FormSession`] is a single tokio task that exclusively owns the gate
//! controller, the error reporter and the submission sequencer. Adapters
//! talk to it through a cloneable [`FormHandle`]; commands are processed one
//! at a time in arrival order.
//!
//! Submission progress is driven from the same loop: a periodic interval
//! while running, then a one-shot delay before the success acknowledgement
//! and reset. Both are plain futures owned by the loop, so dismissing a
//! notification stays responsive during a run and the interval is dropped
//! exactly once, when 100% is reached.

use crate::config::{FormConfig, SubmissionConfig};
use crate::error::{ConfigurationError, FormError, SessionError, SUCCESS_MESSAGE};
use crate::gate::{CommitOutcome, GateController};
use crate::registry::Registry;
use crate::render::Renderer;
use crate::reporter::ErrorNotification;
use crate::sequencer::{SequencerPhase, StartOutcome, SubmissionProgress, SubmissionSequencer, Tick};
use crate::state::FormSnapshot;
use crate::types::{CommitTrigger, Key};
use serde::{Deserialize, Serialize};
use std::future::pending;
use std::pin::Pin;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};

const COMMAND_BUFFER: usize = 64;

/// Everything observable about a running session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Field states
    pub form: FormSnapshot,
    /// Submission progress
    pub progress: SubmissionProgress,
    /// Sequencer phase
    pub phase: SequencerPhase,
    /// Notification slot
    pub notification: ErrorNotification,
    /// Whether the entry action is enabled
    pub submit_enabled: bool,
}

/// Messages accepted by the session task
#[derive(Debug)]
pub enum Command {
    /// Field commit
    Commit {
        /// Field id
        id: String,
        /// Raw, untrimmed value
        raw_value: String,
        /// Blur or forward navigation
        trigger: CommitTrigger,
        /// Outcome
        reply: oneshot::Sender<Result<CommitOutcome, FormError>>,
    },
    /// Entry action activation
    StartSubmission {
        /// Outcome
        reply: oneshot::Sender<Result<StartOutcome, FormError>>,
    },
    /// Explicit close on the notification
    DismissError {
        /// Whether something was hidden
        reply: oneshot::Sender<bool>,
    },
    /// Global key press
    KeyPress {
        /// Key pressed
        key: Key,
        /// Whether the notification was dismissed
        reply: oneshot::Sender<bool>,
    },
    /// Read the current state
    Snapshot {
        /// Current state
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Stop the task
    Shutdown,
}

/// Cloneable command interface to a session
#[derive(Debug, Clone)]
pub struct FormHandle {
    sender: mpsc::Sender<Command>,
}

impl FormHandle {
    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.sender.send(command).await.map_err(|_| SessionError::Closed)
    }

    /// Commit a field value
    ///
    /// # Errors
    /// Gate errors (unknown or locked field) or `Session(Closed)`.
    pub async fn commit(
        &self,
        id: impl Into<String>,
        raw_value: impl Into<String>,
        trigger: CommitTrigger,
    ) -> Result<CommitOutcome, FormError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Commit {
            id: id.into(),
            raw_value: raw_value.into(),
            trigger,
            reply,
        })
        .await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Activate the entry action
    ///
    /// # Errors
    /// `NotReady` when some field is invalid, or `Session(Closed)`.
    pub async fn start_submission(&self) -> Result<StartOutcome, FormError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::StartSubmission { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Close the notification
    ///
    /// # Errors
    /// `Closed` if the session has stopped.
    pub async fn dismiss_error(&self) -> Result<bool, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::DismissError { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Deliver a global key press
    ///
    /// # Errors
    /// `Closed` if the session has stopped.
    pub async fn key_press(&self, key: Key) -> Result<bool, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::KeyPress { key, reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Current state of the session
    ///
    /// # Errors
    /// `Closed` if the session has stopped.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Ask the session to stop
    ///
    /// # Errors
    /// `Closed` if it already stopped.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(Command::Shutdown).await
    }
}

/// Event loop owning all form state
#[derive(Debug)]
pub struct FormSession<R: Renderer> {
    gate: GateController,
    sequencer: SubmissionSequencer,
    renderer: R,
    commands: mpsc::Receiver<Command>,
    ticker: Option<Interval>,
    finalize: Option<Pin<Box<Sleep>>>,
}

impl<R: Renderer> FormSession<R> {
    /// Create a session and its handle without spawning it
    ///
    /// # Errors
    /// `InvalidSubmission` when the timings fail validation.
    pub fn new(
        registry: Registry,
        submission: SubmissionConfig,
        renderer: R,
    ) -> Result<(Self, FormHandle), ConfigurationError> {
        let sequencer = SubmissionSequencer::new(submission)?;
        let (sender, commands) = mpsc::channel(COMMAND_BUFFER);
        let session = Self {
            gate: GateController::new(registry),
            sequencer,
            renderer,
            commands,
            ticker: None,
            finalize: None,
        };
        Ok((session, FormHandle { sender }))
    }

    /// Create and spawn a session on the current tokio runtime
    ///
    /// # Errors
    /// `InvalidSubmission` when the timings fail validation; nothing is
    /// spawned in that case.
    pub fn spawn(
        registry: Registry,
        submission: SubmissionConfig,
        renderer: R,
    ) -> Result<(FormHandle, JoinHandle<()>), ConfigurationError> {
        let (session, handle) = Self::new(registry, submission, renderer)?;
        Ok((handle, tokio::spawn(session.run())))
    }

    /// Build from a config and spawn
    ///
    /// # Errors
    /// Any configuration error; nothing is spawned in that case.
    pub fn spawn_from_config(
        config: &FormConfig,
        renderer: R,
    ) -> Result<(FormHandle, JoinHandle<()>), ConfigurationError> {
        let registry = config.build()?;
        Self::spawn(registry, config.submission, renderer)
    }

    /// Process commands and timers until shut down or every handle is dropped
    pub async fn run(mut self) {
        self.render_form();
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                () = next_tick(&mut self.ticker) => self.on_tick(),
                () = finalize_elapsed(&mut self.finalize) => self.on_finalize(),
            }
        }
        tracing::debug!("form session stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Commit {
                id,
                raw_value,
                trigger,
                reply,
            } => {
                let result = self.gate.on_field_commit(&id, &raw_value, trigger);
                if let Ok(outcome) = &result {
                    self.render_form();
                    if outcome.rejection.is_some() {
                        self.render_notification();
                    }
                }
                let _ = reply.send(result);
            }
            Command::StartSubmission { reply } => {
                let result = self.sequencer.start(&mut self.gate);
                match result {
                    Ok(StartOutcome::Started) => self.begin_ticking(),
                    Ok(StartOutcome::AlreadyRunning) => {}
                    Err(_) => self.render_notification(),
                }
                let _ = reply.send(result.map_err(FormError::from));
            }
            Command::DismissError { reply } => {
                let dismissed = self.gate.dismiss_error();
                if dismissed {
                    self.render_notification();
                }
                let _ = reply.send(dismissed);
            }
            Command::KeyPress { key, reply } => {
                let dismissed = self.gate.on_key(key);
                if dismissed {
                    self.render_notification();
                }
                let _ = reply.send(dismissed);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    fn begin_ticking(&mut self) {
        let period = self.sequencer.config().tick_period();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
        self.renderer.present_entry_action(false);
        self.renderer.present_progress(0);
    }

    fn on_tick(&mut self) {
        match self.sequencer.tick() {
            Tick::Advanced(percent) => self.renderer.present_progress(percent),
            Tick::Completed => {
                self.ticker = None;
                self.renderer.present_progress(100);
                let delay = self.sequencer.config().finalize_delay();
                self.finalize = Some(Box::pin(sleep(delay)));
            }
            Tick::Ignored => self.ticker = None,
        }
    }

    fn on_finalize(&mut self) {
        self.finalize = None;
        self.renderer.acknowledge_success(SUCCESS_MESSAGE);
        if self.sequencer.finalize(&mut self.gate) {
            self.renderer.present_progress(0);
            self.render_form();
        }
    }

    fn render_form(&mut self) {
        let snapshot = self.gate.snapshot();
        self.renderer.present(&snapshot);
        let enabled = self.sequencer.is_entry_enabled(&self.gate);
        self.renderer.present_entry_action(enabled);
    }

    fn render_notification(&mut self) {
        let notification = self.gate.reporter().notification();
        self.renderer
            .present_notification(&notification.message, notification.visible);
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            form: self.gate.snapshot(),
            progress: self.sequencer.progress(),
            phase: self.sequencer.phase(),
            notification: self.gate.reporter().notification().clone(),
            submit_enabled: self.sequencer.is_entry_enabled(&self.gate),
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending().await,
    }
}

async fn finalize_elapsed(delay: &mut Option<Pin<Box<Sleep>>>) {
    match delay {
        Some(delay) => delay.as_mut().await,
        None => pending().await,
    }
}
