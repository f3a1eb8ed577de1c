//! Catalog module - static wizard configuration.
//!
//! Holds the read-only definition of every possible question (the step
//! catalog) and the declarative branch rules that splice follow-up steps
//! into a session. Both are loaded once at startup, validated, and shared
//! immutably across all sessions.

mod branch;
mod catalog;
mod step;

pub use branch::{BranchRule, BranchRuleTable, NO, YES};
pub use catalog::StepCatalog;
pub use step::{FileRequirement, QuickOption, QuickReplies, Step, StepKey};
