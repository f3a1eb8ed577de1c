//! Step definitions - the immutable question units of the wizard.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{CountryScope, WizardError};

/// Stable identifier of a step in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepKey(String);

impl StepKey {
    /// Creates a step key; must be non-empty after trimming.
    pub fn new(key: impl Into<String>) -> Result<Self, WizardError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(WizardError::branch_config("step key cannot be empty"));
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A predefined selectable answer: stable canonical key plus the localized
/// label the transport renders on a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickOption {
    /// Canonical, locale-independent key stored and branched on.
    pub key: String,
    /// Human-readable label shown to the user.
    pub label: String,
}

impl QuickOption {
    /// Creates a quick option.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// The quick-reply affordance a step offers, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuickReplies {
    /// Free-text only.
    #[default]
    None,

    /// An ordered list of predefined options.
    Options(Vec<QuickOption>),

    /// Ask the transport to request the user's contact (phone share button).
    RequestContact,
}

impl QuickReplies {
    /// Resolves an exact label match to its canonical key.
    ///
    /// Free text that matches no label passes through untouched; the caller
    /// keeps the original value.
    pub fn resolve_label(&self, text: &str) -> Option<&str> {
        match self {
            QuickReplies::Options(options) => options
                .iter()
                .find(|o| o.label == text)
                .map(|o| o.key.as_str()),
            _ => None,
        }
    }

    /// Reverse lookup: the display label for a canonical key.
    pub fn label_for(&self, key: &str) -> Option<&str> {
        match self {
            QuickReplies::Options(options) => options
                .iter()
                .find(|o| o.key == key)
                .map(|o| o.label.as_str()),
            _ => None,
        }
    }

    /// The set of canonical keys offered, for Enumerated dispatch.
    pub fn canonical_keys(&self) -> Vec<&str> {
        match self {
            QuickReplies::Options(options) => options.iter().map(|o| o.key.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// How many files a file-accumulation step (documents, photos) requires
/// before its answer is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRequirement {
    pub count: usize,
}

impl FileRequirement {
    /// Creates a requirement; at least one file.
    pub fn new(count: usize) -> Result<Self, WizardError> {
        if count == 0 {
            return Err(WizardError::branch_config(
                "file requirement must be at least 1",
            ));
        }
        Ok(Self { count })
    }
}

/// One question unit of the form session. Immutable once the catalog loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique catalog key.
    pub key: StepKey,

    /// Countries this step is asked in.
    #[serde(default)]
    pub scope: CountryScope,

    /// Validator registry key, if input needs validation.
    #[serde(default)]
    pub validator: Option<String>,

    /// Quick-reply options or the request-contact sentinel.
    #[serde(default)]
    pub quick_replies: QuickReplies,

    /// Present on file-accumulation steps.
    #[serde(default)]
    pub file_requirement: Option<FileRequirement>,

    /// Step-specific error message key, overriding the validator's own.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Step {
    /// Creates a free-text step with no validator.
    pub fn text(key: impl Into<String>) -> Result<Self, WizardError> {
        Ok(Self {
            key: StepKey::new(key)?,
            scope: CountryScope::All,
            validator: None,
            quick_replies: QuickReplies::None,
            file_requirement: None,
            error_message: None,
        })
    }

    /// Attaches a validator key.
    pub fn with_validator(mut self, validator: impl Into<String>) -> Self {
        self.validator = Some(validator.into());
        self
    }

    /// Attaches quick-reply options.
    pub fn with_options(mut self, options: Vec<QuickOption>) -> Self {
        self.quick_replies = QuickReplies::Options(options);
        self
    }

    /// Marks the step as requesting the user's contact.
    pub fn with_contact_request(mut self) -> Self {
        self.quick_replies = QuickReplies::RequestContact;
        self
    }

    /// Restricts the step to specific countries.
    pub fn with_scope(mut self, scope: CountryScope) -> Self {
        self.scope = scope;
        self
    }

    /// Marks the step as accumulating `count` files.
    pub fn with_files(mut self, count: usize) -> Result<Self, WizardError> {
        self.file_requirement = Some(FileRequirement::new(count)?);
        Ok(self)
    }

    /// Overrides the validation error message key for this step.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Returns true if the step accumulates files instead of text.
    pub fn accepts_files(&self) -> bool {
        self.file_requirement.is_some()
    }
}
