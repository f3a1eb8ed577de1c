//! Domain layer containing the wizard business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, country codes, errors, state machine)
//! - `catalog` - Static step catalog and branch rule table
//! - `queue` - Per-session mutable step queue with provenance and snapshots
//! - `validation` - Validator registry and the input validation pipeline
//! - `wizard` - The engine orchestrating queue + validation for one session

pub mod catalog;
pub mod foundation;
pub mod queue;
pub mod validation;
pub mod wizard;
