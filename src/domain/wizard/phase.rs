//! Session phase machine.
//!
//! Defines the lifecycle of one wizard session and its valid transitions.
//! There is no terminal error phase: faults are reported as results and
//! the session stays where it was.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle phase of a wizard session.
///
/// - `Active`: walking the queue, cursor on a step
/// - `Editing`: a snapshot is outstanding; answers may be revisited and
///   either committed (discard snapshot) or rolled back (restore)
/// - `Finished`: cursor moved past the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Cursor on a step, collecting answers.
    #[default]
    Active,

    /// Snapshot outstanding, user revising earlier answers.
    Editing,

    /// Cursor past the last step; the form is complete.
    Finished,
}

impl SessionPhase {
    /// Returns true while answers can still be submitted.
    pub fn accepts_answers(&self) -> bool {
        !matches!(self, Self::Finished)
    }

    /// Returns true while a rollback point is held.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing)
    }
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            // Taking a snapshot enters the edit sub-flow, from either side
            // of completion.
            (Active, Editing) |
            (Finished, Editing) |
            // Restore and discard both leave the edit sub-flow.
            (Editing, Active) |
            (Editing, Finished) |
            // Walking off the last step finishes the session.
            (Active, Finished) |
            // Retreating from the end, or a re-branch pulling the cursor
            // back, reactivates it.
            (Finished, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            Active => vec![Editing, Finished],
            Editing => vec![Active, Finished],
            Finished => vec![Editing, Active],
        }
    }
}
