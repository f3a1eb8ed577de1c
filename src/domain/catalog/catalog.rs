//! Step catalog - the immutable arena of step records.
//!
//! Steps live once in the catalog and are addressed everywhere else by
//! [`StepKey`]; the active queue and branch rules hold keys, never copies.

use serde::Serialize;
use std::collections::HashMap;

use super::{BranchRuleTable, Step, StepKey};
use crate::domain::foundation::{CountryCode, WizardError};

/// Ordered, key-unique collection of every step the wizard can ask.
///
/// Deserialization goes through [`StepCatalog::new`] (see the config
/// loader) so the key index is always consistent with the step list.
#[derive(Debug, Clone, Serialize)]
pub struct StepCatalog {
    steps: Vec<Step>,
    #[serde(skip)]
    index: HashMap<StepKey, usize>,
}

impl StepCatalog {
    /// Builds a catalog, rejecting duplicate step keys.
    pub fn new(steps: Vec<Step>) -> Result<Self, WizardError> {
        let mut index = HashMap::with_capacity(steps.len());
        for (pos, step) in steps.iter().enumerate() {
            if index.insert(step.key.clone(), pos).is_some() {
                return Err(WizardError::branch_config(format!(
                    "duplicate step key '{}' in catalog",
                    step.key
                )));
            }
        }
        Ok(Self { steps, index })
    }

    /// Looks up a step by key.
    pub fn get(&self, key: &StepKey) -> Option<&Step> {
        self.index.get(key).map(|&pos| &self.steps[pos])
    }

    /// Returns true if the key exists in the catalog.
    pub fn contains(&self, key: &StepKey) -> bool {
        self.index.contains_key(key)
    }

    /// All steps in catalog order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps in the catalog.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the catalog holds no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Derives a session's initial queue: every step applicable to the
    /// country, minus steps that only enter by branch insertion.
    pub fn base_queue(&self, country: &CountryCode, rules: &BranchRuleTable) -> Vec<StepKey> {
        let branch_children = rules.branch_children();
        self.steps
            .iter()
            .filter(|step| step.scope.covers(country) && !branch_children.contains(&step.key))
            .map(|step| step.key.clone())
            .collect()
    }
}
