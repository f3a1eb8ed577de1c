//! Error types for the wizard domain.

use std::fmt;
use thiserror::Error;

/// Faults raised by queue mutation, navigation, and engine orchestration.
///
/// Per-field validation failures are *not* errors: the validation pipeline
/// returns them as `InputCheck::Rejected` values so the transport layer can
/// display them without a catch boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Invalid navigation: {reason}")]
    InvalidNavigation { reason: String },

    #[error("Step '{key}' has no recorded answer; cannot advance past it")]
    UnansweredStep { key: String },

    #[error("Step '{key}' is not in the active queue")]
    StepNotActive { key: String },

    #[error("Branch configuration fault: {reason}")]
    BranchConfig { reason: String },

    #[error("No validator registered under key '{key}'")]
    MissingValidator { key: String },

    #[error("An edit session is already active; discard or restore it first")]
    EditSessionActive,

    #[error("No edit session is active")]
    NoEditSession,
}

impl WizardError {
    /// Creates an invalid navigation error.
    pub fn invalid_navigation(reason: impl Into<String>) -> Self {
        WizardError::InvalidNavigation { reason: reason.into() }
    }

    /// Creates an unanswered step error.
    pub fn unanswered_step(key: impl Into<String>) -> Self {
        WizardError::UnansweredStep { key: key.into() }
    }

    /// Creates a step-not-active error.
    pub fn step_not_active(key: impl Into<String>) -> Self {
        WizardError::StepNotActive { key: key.into() }
    }

    /// Creates a branch configuration fault.
    pub fn branch_config(reason: impl Into<String>) -> Self {
        WizardError::BranchConfig { reason: reason.into() }
    }

    /// Creates a missing validator fault.
    pub fn missing_validator(key: impl Into<String>) -> Self {
        WizardError::MissingValidator { key: key.into() }
    }

    /// Maps the fault to the closed set of caller-facing codes.
    ///
    /// Configuration faults collapse into a single generic code: the detail
    /// goes to the log, never to the session's user.
    pub fn code(&self) -> ErrorCode {
        match self {
            WizardError::InvalidNavigation { .. } => ErrorCode::InvalidNavigation,
            WizardError::UnansweredStep { .. } => ErrorCode::UnansweredStep,
            WizardError::StepNotActive { .. } => ErrorCode::StepNotActive,
            WizardError::BranchConfig { .. } => ErrorCode::ConfigurationFault,
            WizardError::MissingValidator { .. } => ErrorCode::ConfigurationFault,
            WizardError::EditSessionActive => ErrorCode::EditSessionActive,
            WizardError::NoEditSession => ErrorCode::NoEditSession,
        }
    }

    /// Returns true if the fault stems from catalog or rule configuration
    /// rather than caller behavior. Fatal for the session, never for the
    /// process.
    pub fn is_configuration_fault(&self) -> bool {
        self.code() == ErrorCode::ConfigurationFault
    }
}

/// Caller-facing error codes.
///
/// All codes except `ConfigurationFault` are recoverable: the caller
/// re-renders or re-prompts the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidNavigation,
    UnansweredStep,
    StepNotActive,
    ConfigurationFault,
    EditSessionActive,
    NoEditSession,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidNavigation => "INVALID_NAVIGATION",
            ErrorCode::UnansweredStep => "UNANSWERED_STEP",
            ErrorCode::StepNotActive => "STEP_NOT_ACTIVE",
            ErrorCode::ConfigurationFault => "CONFIGURATION_FAULT",
            ErrorCode::EditSessionActive => "EDIT_SESSION_ACTIVE",
            ErrorCode::NoEditSession => "NO_EDIT_SESSION",
        };
        write!(f, "{}", s)
    }
}
