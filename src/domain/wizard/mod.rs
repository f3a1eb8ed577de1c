//! Wizard module - per-session orchestration.
//!
//! One [`WizardEngine`] exists per conversation session. It owns the step
//! queue and the validation pipeline, exposes navigation and answer
//! submission, and implements the speculative edit flow on top of queue
//! snapshots.

mod engine;
mod phase;

pub use engine::{NextOutcome, SessionContext, WizardDump, WizardEngine};
pub use phase::SessionPhase;
