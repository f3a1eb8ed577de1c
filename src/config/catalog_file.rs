//! Catalog file loading.
//!
//! One YAML or JSON document declares the full step catalog and every
//! branch rule. `build()` validates the whole thing - duplicate keys,
//! referential integrity, dispatch consistency - and fails fast with
//! [`ConfigError`] before any engine can be constructed over bad data.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use super::ConfigError;
use crate::domain::catalog::{
    BranchRule, BranchRuleTable, QuickOption, Step, StepCatalog, StepKey,
};
use crate::domain::foundation::CountryScope;

/// Declarative step record as it appears in the config document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    pub key: String,

    /// Country codes the step applies to; omitted means all countries.
    #[serde(default)]
    pub countries: Option<Vec<String>>,

    #[serde(default)]
    pub validator: Option<String>,

    #[serde(default)]
    pub options: Option<Vec<OptionSpec>>,

    /// Ask the transport for the user's contact instead of options.
    #[serde(default)]
    pub request_contact: bool,

    /// Number of files for a file-accumulation step.
    #[serde(default)]
    pub files: Option<usize>,

    #[serde(default)]
    pub error_message: Option<String>,
}

/// Quick option record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionSpec {
    pub key: String,
    pub label: String,
}

/// Declarative branch rule record.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum RuleSpec {
    Enumerated {
        trigger: String,
        arms: BTreeMap<String, Vec<String>>,
    },
    Boolean {
        trigger: String,
        on_yes: Vec<String>,
    },
}

/// The full catalog + rules document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    pub steps: Vec<StepSpec>,

    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl StepSpec {
    fn into_step(self) -> Result<Step, ConfigError> {
        if self.request_contact && self.options.is_some() {
            return Err(ConfigError::Invalid(format!(
                "step '{}' declares both options and request_contact",
                self.key
            )));
        }
        let mut step = Step::text(self.key)?;
        if let Some(countries) = self.countries {
            step = step.with_scope(CountryScope::only(countries)?);
        }
        if let Some(validator) = self.validator {
            step = step.with_validator(validator);
        }
        if let Some(options) = self.options {
            step = step.with_options(
                options
                    .into_iter()
                    .map(|o| QuickOption::new(o.key, o.label))
                    .collect(),
            );
        }
        if self.request_contact {
            step = step.with_contact_request();
        }
        if let Some(count) = self.files {
            step = step.with_files(count)?;
        }
        if let Some(message) = self.error_message {
            step = step.with_error_message(message);
        }
        Ok(step)
    }
}

impl RuleSpec {
    fn into_rule(self) -> Result<BranchRule, ConfigError> {
        Ok(match self {
            RuleSpec::Enumerated { trigger, arms } => BranchRule::Enumerated {
                trigger: StepKey::new(trigger)?,
                arms: arms
                    .into_iter()
                    .map(|(value, steps)| {
                        let keys = steps
                            .into_iter()
                            .map(StepKey::new)
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok((value, keys))
                    })
                    .collect::<Result<BTreeMap<_, _>, ConfigError>>()?,
            },
            RuleSpec::Boolean { trigger, on_yes } => BranchRule::Boolean {
                trigger: StepKey::new(trigger)?,
                on_yes: on_yes
                    .into_iter()
                    .map(StepKey::new)
                    .collect::<Result<Vec<_>, _>>()?,
            },
        })
    }
}

impl CatalogFile {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a YAML file.
    pub fn load_yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Validates the document and builds the shared catalog and rule table.
    pub fn build(self) -> Result<(Arc<StepCatalog>, Arc<BranchRuleTable>), ConfigError> {
        let steps = self
            .steps
            .into_iter()
            .map(StepSpec::into_step)
            .collect::<Result<Vec<_>, _>>()?;
        let catalog = StepCatalog::new(steps)?;

        let rules = self
            .rules
            .into_iter()
            .map(RuleSpec::into_rule)
            .collect::<Result<Vec<_>, _>>()?;

        // Free-text triggers are legal, but an arm keyed by a value the
        // trigger's buttons can never produce is usually a typo.
        for rule in &rules {
            if let BranchRule::Enumerated { trigger, arms } = rule {
                if let Some(step) = catalog.get(trigger) {
                    let keys = step.quick_replies.canonical_keys();
                    if !keys.is_empty() {
                        for value in arms.keys() {
                            if !keys.contains(&value.as_str()) {
                                warn!(
                                    trigger = %trigger,
                                    value = %value,
                                    "enumerated arm not reachable via quick options"
                                );
                            }
                        }
                    }
                }
            }
        }

        let table = BranchRuleTable::new(rules, &catalog)?;
        Ok((Arc::new(catalog), Arc::new(table)))
    }
}
