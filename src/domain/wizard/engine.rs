//! The wizard engine - single entry point for one session.
//!
//! Combines the step queue with the validation pipeline and converts
//! internal faults into a small closed set of result codes. The engine
//! performs no locking: the hosting dispatcher serializes all operations
//! for a session, and distinct sessions are fully independent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use super::SessionPhase;
use crate::config::LocaleSettings;
use crate::domain::catalog::{BranchRuleTable, Step, StepCatalog, StepKey};
use crate::domain::foundation::{CountryCode, SessionId, WizardError};
use crate::domain::queue::{Answer, CanonicalValue, FileRef, QueueSnapshot, StepQueue};
use crate::domain::validation::{InputCheck, RawInput, ValidationPipeline, ValidatorRegistry};

/// Fixed per-session parameters, set at creation and never changed.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: SessionId,
    pub country: CountryCode,
    pub locale: LocaleSettings,
}

impl SessionContext {
    /// Creates a context with a fresh session id.
    pub fn new(country: CountryCode, locale: LocaleSettings) -> Self {
        Self {
            session_id: SessionId::new(),
            country,
            locale,
        }
    }
}

/// Result of [`WizardEngine::next`].
#[derive(Debug, PartialEq)]
pub enum NextOutcome<'a> {
    /// The cursor moved onto this step.
    Step(&'a Step),
    /// The cursor moved past the last step; the session is finished.
    Finished,
}

/// Rollback point: queue state plus the pending file buffers, so a
/// cancelled edit also discards half-uploaded replacements.
#[derive(Debug, Clone)]
struct EngineSnapshot {
    queue: QueueSnapshot,
    pending_files: HashMap<StepKey, Vec<FileRef>>,
}

/// One conversation session's wizard.
#[derive(Debug)]
pub struct WizardEngine {
    session_id: SessionId,
    country: CountryCode,
    created_at: DateTime<Utc>,
    catalog: Arc<StepCatalog>,
    rules: Arc<BranchRuleTable>,
    queue: StepQueue,
    pipeline: ValidationPipeline,
    pending_files: HashMap<StepKey, Vec<FileRef>>,
    snapshot: Option<EngineSnapshot>,
}

impl WizardEngine {
    /// Builds an engine for one session over shared static configuration.
    pub fn new(
        session: SessionContext,
        catalog: Arc<StepCatalog>,
        rules: Arc<BranchRuleTable>,
        registry: Arc<ValidatorRegistry>,
    ) -> Result<Self, WizardError> {
        let queue = StepQueue::new(Arc::clone(&catalog), Arc::clone(&rules), &session.country)?;
        let pipeline = ValidationPipeline::new(registry, session.locale);
        debug!(session_id = %session.session_id, country = %session.country, steps = queue.len(), "session created");
        Ok(Self {
            session_id: session.session_id,
            country: session.country,
            created_at: Utc::now(),
            catalog,
            rules,
            queue,
            pipeline,
            pending_files: HashMap::new(),
            snapshot: None,
        })
    }

    /// This session's id.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The step under the cursor, or `None` once finished.
    pub fn current(&self) -> Option<&Step> {
        self.queue.current()
    }

    /// Returns true once the cursor has moved past the last step.
    pub fn is_finished(&self) -> bool {
        self.queue.is_finished()
    }

    /// The session's current lifecycle phase, derived from queue state
    /// and the outstanding snapshot.
    pub fn phase(&self) -> SessionPhase {
        if self.snapshot.is_some() {
            SessionPhase::Editing
        } else if self.queue.is_finished() {
            SessionPhase::Finished
        } else {
            SessionPhase::Active
        }
    }

    /// Runs the validation pipeline for one raw input on an active step.
    ///
    /// File-accumulation steps buffer files inside the engine across
    /// calls; an `AwaitingFiles` result means the caller should prompt
    /// for the next file without advancing.
    pub async fn validate_input(
        &mut self,
        key: &StepKey,
        input: RawInput,
    ) -> Result<InputCheck, WizardError> {
        if self.queue.position_of(key).is_none() {
            return Err(WizardError::step_not_active(key.as_str()));
        }
        let step = self
            .catalog
            .get(key)
            .cloned()
            .ok_or_else(|| WizardError::step_not_active(key.as_str()))?;
        let rule = self.rules.rule_for(key).cloned();
        let received = self.pending_files.get(key).cloned().unwrap_or_default();

        let check = self
            .pipeline
            .check(&step, rule.as_ref(), &input, &received)
            .await
            .map_err(|err| self.log_fault(err))?;

        match &check {
            InputCheck::AwaitingFiles { .. } => {
                if let RawInput::File(file) = input {
                    self.pending_files.entry(key.clone()).or_default().push(file);
                }
            }
            InputCheck::Accepted { .. } if step.accepts_files() => {
                self.pending_files.remove(key);
            }
            _ => {}
        }
        Ok(check)
    }

    /// Records a validated answer, expanding or retracting branches.
    pub fn process_answer(
        &mut self,
        key: &StepKey,
        canonical: CanonicalValue,
        display: impl Into<String>,
    ) -> Result<(), WizardError> {
        let answer = Answer {
            canonical,
            display: display.into(),
        };
        let effect = self
            .queue
            .set_answer(key, answer)
            .map_err(|err| self.log_fault(err))?;
        for retracted in &effect.retracted {
            self.pending_files.remove(retracted);
        }
        Ok(())
    }

    /// Advances the cursor. The current step must hold an answer.
    pub fn next(&mut self) -> Result<NextOutcome<'_>, WizardError> {
        self.queue.advance()?;
        match self.queue.current() {
            Some(step) => Ok(NextOutcome::Step(step)),
            None => Ok(NextOutcome::Finished),
        }
    }

    /// Moves the cursor back one step and returns the step it lands on.
    pub fn previous(&mut self) -> Result<&Step, WizardError> {
        self.queue.retreat()?;
        self.queue
            .current()
            .ok_or_else(|| WizardError::invalid_navigation("cursor left the queue"))
    }

    /// Enters the edit sub-flow by capturing a rollback point.
    ///
    /// At most one snapshot is outstanding per session; nesting is
    /// rejected rather than silently overwriting the rollback point.
    pub fn take_snapshot(&mut self) -> Result<(), WizardError> {
        if self.snapshot.is_some() {
            return Err(WizardError::EditSessionActive);
        }
        self.snapshot = Some(EngineSnapshot {
            queue: self.queue.snapshot(),
            pending_files: self.pending_files.clone(),
        });
        debug!(session_id = %self.session_id, "snapshot taken");
        Ok(())
    }

    /// Cancels the edit sub-flow, reverting to the snapshot state.
    pub fn restore_snapshot(&mut self) -> Result<(), WizardError> {
        let snapshot = self.snapshot.take().ok_or(WizardError::NoEditSession)?;
        self.queue.restore(snapshot.queue);
        self.pending_files = snapshot.pending_files;
        debug!(session_id = %self.session_id, "snapshot restored");
        Ok(())
    }

    /// Commits the edit sub-flow, keeping the current state.
    pub fn discard_snapshot(&mut self) -> Result<(), WizardError> {
        self.snapshot.take().ok_or(WizardError::NoEditSession)?;
        debug!(session_id = %self.session_id, "snapshot discarded");
        Ok(())
    }

    /// Read-only diagnostic export of the full session state.
    pub fn debug_dump(&self) -> WizardDump {
        let steps = self
            .queue
            .active_keys()
            .iter()
            .map(|key| DumpStep {
                key: key.clone(),
                answer: self.queue.answer(key).cloned(),
                inserted_by: self.queue.inserted_by(key).cloned(),
                pending_files: self
                    .pending_files
                    .get(key)
                    .map(Vec::len)
                    .unwrap_or_default(),
            })
            .collect();
        WizardDump {
            session_id: self.session_id,
            created_at: self.created_at,
            country: self.country.clone(),
            locale: self.pipeline.locale().name.clone(),
            phase: self.phase(),
            cursor: self.queue.cursor(),
            finished: self.queue.is_finished(),
            snapshot_taken: self.snapshot.is_some(),
            steps,
        }
    }

    /// Configuration faults get logged with the session id before they
    /// surface as a generic code.
    fn log_fault(&self, err: WizardError) -> WizardError {
        if err.is_configuration_fault() {
            error!(session_id = %self.session_id, code = %err.code(), %err, "configuration fault in live session");
        }
        err
    }
}

/// Serializable diagnostic view of one session.
#[derive(Debug, Clone, Serialize)]
pub struct WizardDump {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub country: CountryCode,
    pub locale: String,
    pub phase: SessionPhase,
    pub cursor: usize,
    pub finished: bool,
    pub snapshot_taken: bool,
    pub steps: Vec<DumpStep>,
}

/// One active step as it appears in the dump.
#[derive(Debug, Clone, Serialize)]
pub struct DumpStep {
    pub key: StepKey,
    pub answer: Option<Answer>,
    pub inserted_by: Option<StepKey>,
    pub pending_files: usize,
}
