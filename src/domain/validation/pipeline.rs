//! Input validation pipeline.
//!
//! Turns one raw transport event into an [`InputCheck`]: accepted with a
//! canonical + display pair, rejected with a message key, or awaiting more
//! files. The order is fixed: file accumulation, quick-option resolution,
//! locale Yes/No normalization, then the step's validator (if any).

use std::sync::Arc;

use super::ValidatorRegistry;
use crate::config::LocaleSettings;
use crate::domain::catalog::{BranchRule, Step};
use crate::domain::foundation::WizardError;
use crate::domain::queue::{CanonicalValue, FileRef};
use crate::ports::{ValidatorContext, ValidatorVerdict};

/// Raw input as received from the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// Typed text or a pressed quick-reply button (arrives as its label).
    Text(String),

    /// A shared contact, for request-contact steps.
    Contact { phone: String },

    /// One uploaded file.
    File(FileRef),
}

/// Result of running the pipeline on one input event.
///
/// `AwaitingFiles` is a status, not an error: the caller prompts for more
/// files without advancing. `Rejected` carries a localized message key the
/// transport resolves and renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCheck {
    Accepted {
        canonical: CanonicalValue,
        display: String,
    },
    Rejected {
        message: String,
    },
    AwaitingFiles {
        received: usize,
        required: usize,
    },
}

/// The validation pipeline bound to one session's locale.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    registry: Arc<ValidatorRegistry>,
    locale: LocaleSettings,
}

impl ValidationPipeline {
    /// Creates a pipeline over a shared registry and the session locale.
    pub fn new(registry: Arc<ValidatorRegistry>, locale: LocaleSettings) -> Self {
        Self { registry, locale }
    }

    /// The locale this pipeline normalizes against.
    pub fn locale(&self) -> &LocaleSettings {
        &self.locale
    }

    /// Runs the pipeline for `step` on one raw input.
    ///
    /// `rule` is the branch rule triggered by this step, if any; Enumerated
    /// dispatch passes the step's canonical option keys to the validator.
    /// `received_files` is the session's pending buffer for this step,
    /// excluding the file in `input`.
    pub async fn check(
        &self,
        step: &Step,
        rule: Option<&BranchRule>,
        input: &RawInput,
        received_files: &[FileRef],
    ) -> Result<InputCheck, WizardError> {
        if let Some(requirement) = step.file_requirement {
            return Ok(self.check_files(requirement.count, input, received_files));
        }

        let raw = match input {
            RawInput::Text(text) => text.as_str(),
            RawInput::Contact { phone } => phone.as_str(),
            RawInput::File(_) => {
                return Ok(InputCheck::Rejected {
                    message: "error.text_expected".to_string(),
                })
            }
        };

        // Button presses arrive as labels; exact matches become canonical
        // keys before any validator runs. Unmatched free text passes
        // through unchanged.
        let resolved = step.quick_replies.resolve_label(raw).unwrap_or(raw);

        let normalized = self.locale.normalize_yes_no(resolved).unwrap_or(resolved);

        let validator_key = match &step.validator {
            Some(key) => key.as_str(),
            None => {
                return Ok(self.accept(step, normalized.to_string()));
            }
        };
        let validator = self.registry.get(validator_key)?;

        let ctx = if rule.map(BranchRule::is_enumerated).unwrap_or(false) {
            ValidatorContext::restricted_to(step.quick_replies.canonical_keys())
        } else {
            ValidatorContext::unrestricted()
        };

        match validator.validate(normalized, &ctx).await {
            ValidatorVerdict::Ok { canonical } => {
                // Membership on enumerated triggers holds regardless of
                // which validator the catalog wired to the step.
                if let Some(allowed) = &ctx.allowed {
                    if !allowed.contains(&canonical) {
                        return Ok(InputCheck::Rejected {
                            message: step
                                .error_message
                                .clone()
                                .unwrap_or_else(|| "error.invalid_option".to_string()),
                        });
                    }
                }
                Ok(self.accept(step, canonical))
            }
            ValidatorVerdict::Fail { message } => Ok(InputCheck::Rejected {
                message: step.error_message.clone().unwrap_or(message),
            }),
        }
    }

    fn check_files(
        &self,
        required: usize,
        input: &RawInput,
        received: &[FileRef],
    ) -> InputCheck {
        let file = match input {
            RawInput::File(file) => file.clone(),
            _ => {
                return InputCheck::Rejected {
                    message: "error.file_expected".to_string(),
                }
            }
        };
        let total = received.len() + 1;
        if total < required {
            return InputCheck::AwaitingFiles {
                received: total,
                required,
            };
        }
        let mut files: Vec<FileRef> = received.to_vec();
        files.push(file);
        let display = format!("{} file(s)", files.len());
        let canonical = if required == 1 {
            CanonicalValue::File(files.into_iter().next().expect("one file present"))
        } else {
            CanonicalValue::Files(files)
        };
        InputCheck::Accepted { canonical, display }
    }

    /// Display via reverse quick-option lookup, else display = canonical.
    fn accept(&self, step: &Step, canonical: String) -> InputCheck {
        let display = step
            .quick_replies
            .label_for(&canonical)
            .map(str::to_string)
            .unwrap_or_else(|| canonical.clone());
        InputCheck::Accepted {
            canonical: CanonicalValue::Text(canonical),
            display,
        }
    }
}
