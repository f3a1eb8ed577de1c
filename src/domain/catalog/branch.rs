//! Branch rules - declarative queue expansion.
//!
//! A branch rule maps a canonical answer on its trigger step to an ordered
//! list of steps spliced in immediately after the trigger. Rules are a
//! tagged union rather than string-keyed dictionaries so dispatch kinds
//! cannot be mixed and referential integrity is checkable at load time.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::{StepCatalog, StepKey};
use crate::domain::foundation::WizardError;

/// Canonical token a boolean rule fires on.
pub const YES: &str = "Yes";
/// Canonical negative token produced by locale normalization.
pub const NO: &str = "No";

/// A declarative rule expanding the active queue based on an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchRule {
    /// Each canonical value selects its own list of follow-up steps.
    Enumerated {
        trigger: StepKey,
        arms: BTreeMap<String, Vec<StepKey>>,
    },

    /// Follow-up steps inserted only when the answer is `"Yes"`.
    Boolean {
        trigger: StepKey,
        on_yes: Vec<StepKey>,
    },
}

impl BranchRule {
    /// The step whose answer this rule dispatches on.
    pub fn trigger(&self) -> &StepKey {
        match self {
            BranchRule::Enumerated { trigger, .. } => trigger,
            BranchRule::Boolean { trigger, .. } => trigger,
        }
    }

    /// Returns true for Enumerated dispatch (validators receive the
    /// allowed key set for such steps).
    pub fn is_enumerated(&self) -> bool {
        matches!(self, BranchRule::Enumerated { .. })
    }

    /// The steps to insert for a canonical answer value. An unmatched
    /// value selects nothing, which is legal: not every answer branches.
    pub fn steps_for(&self, canonical: &str) -> &[StepKey] {
        match self {
            BranchRule::Enumerated { arms, .. } => {
                arms.get(canonical).map(Vec::as_slice).unwrap_or(&[])
            }
            BranchRule::Boolean { on_yes, .. } => {
                if canonical == YES {
                    on_yes.as_slice()
                } else {
                    &[]
                }
            }
        }
    }

    /// Every step key this rule can insert, across all arms.
    pub fn all_children(&self) -> Vec<&StepKey> {
        match self {
            BranchRule::Enumerated { arms, .. } => arms.values().flatten().collect(),
            BranchRule::Boolean { on_yes, .. } => on_yes.iter().collect(),
        }
    }
}

/// All branch rules for a catalog, indexed by trigger step.
///
/// Construction validates referential integrity against the catalog so a
/// broken rule fails at load time, not inside a live session.
/// Deserialization goes through [`BranchRuleTable::new`] in the config
/// loader so the checks cannot be bypassed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BranchRuleTable {
    rules: HashMap<StepKey, BranchRule>,
}

impl BranchRuleTable {
    /// Builds and validates the table.
    ///
    /// Rejected configurations: a trigger or child key missing from the
    /// catalog, two rules sharing a trigger, a step inserted twice within
    /// one arm, and a rule whose trigger is itself one of its children.
    pub fn new(rules: Vec<BranchRule>, catalog: &StepCatalog) -> Result<Self, WizardError> {
        let mut table = HashMap::with_capacity(rules.len());
        for rule in rules {
            let trigger = rule.trigger().clone();
            if !catalog.contains(&trigger) {
                return Err(WizardError::branch_config(format!(
                    "rule trigger '{}' is not in the catalog",
                    trigger
                )));
            }
            for child in rule.all_children() {
                if !catalog.contains(child) {
                    return Err(WizardError::branch_config(format!(
                        "rule on '{}' inserts unknown step '{}'",
                        trigger, child
                    )));
                }
                if child == &trigger {
                    return Err(WizardError::branch_config(format!(
                        "rule on '{}' inserts its own trigger",
                        trigger
                    )));
                }
            }
            match &rule {
                BranchRule::Enumerated { arms, .. } => {
                    for (value, steps) in arms {
                        let mut seen = HashSet::new();
                        for step in steps {
                            if !seen.insert(step) {
                                return Err(WizardError::branch_config(format!(
                                    "rule on '{}' inserts '{}' twice for value '{}'",
                                    trigger, step, value
                                )));
                            }
                        }
                    }
                }
                BranchRule::Boolean { on_yes, .. } => {
                    let mut seen = HashSet::new();
                    for step in on_yes {
                        if !seen.insert(step) {
                            return Err(WizardError::branch_config(format!(
                                "rule on '{}' inserts '{}' twice",
                                trigger, step
                            )));
                        }
                    }
                }
            }
            if table.insert(trigger.clone(), rule).is_some() {
                return Err(WizardError::branch_config(format!(
                    "duplicate rule for trigger '{}'",
                    trigger
                )));
            }
        }
        Ok(Self { rules: table })
    }

    /// An empty table (catalog with no branching).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rule triggered by a step, if any.
    pub fn rule_for(&self, key: &StepKey) -> Option<&BranchRule> {
        self.rules.get(key)
    }

    /// Every key that appears as a branch child of some rule. These steps
    /// enter the queue only by insertion, never in the base queue.
    pub fn branch_children(&self) -> HashSet<&StepKey> {
        self.rules
            .values()
            .flat_map(|rule| rule.all_children())
            .collect()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
