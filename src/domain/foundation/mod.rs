//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, country scoping, error types, and the state
//! machine trait that form the vocabulary of the wizard domain.

mod country;
mod errors;
mod ids;
mod state_machine;

pub use country::{CountryCode, CountryScope};
pub use errors::{ErrorCode, WizardError};
pub use ids::SessionId;
pub use state_machine::StateMachine;
