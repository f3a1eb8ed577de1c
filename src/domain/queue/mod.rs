//! Queue module - per-session mutable wizard state.
//!
//! The step queue tracks the active ordered subsequence of the catalog,
//! the answers collected so far, a cursor, and the provenance of every
//! branch-inserted step. Snapshots capture the whole thing for the
//! edit/rollback flow.

mod answer;
mod state;

pub use answer::{Answer, CanonicalValue, FileRef};
pub use state::{QueueSnapshot, StepQueue};
