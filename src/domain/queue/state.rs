//! The active step queue for one session.
//!
//! Maintains the ordered subsequence of catalog steps this session walks
//! through, answers keyed by step, the cursor, and provenance for every
//! branch-inserted step. Step records themselves live once in the shared
//! catalog arena; the queue holds keys only, so snapshots copy small
//! index structures and never step data.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::Answer;
use crate::domain::catalog::{BranchRuleTable, Step, StepCatalog, StepKey};
use crate::domain::foundation::{CountryCode, WizardError};

/// Value-semantics copy of queue state, held for rollback.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    steps: Vec<StepKey>,
    cursor: usize,
    answers: HashMap<StepKey, Answer>,
    inserted_by: HashMap<StepKey, StepKey>,
}

/// What a `set_answer` call did to the queue shape, for logging and for
/// purging per-step buffers owned by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchEffect {
    /// Steps removed by cascade retraction, in former queue order.
    pub retracted: Vec<StepKey>,
    /// Steps inserted for the new answer, in queue order.
    pub inserted: Vec<StepKey>,
}

impl BranchEffect {
    /// Returns true if the queue shape did not change.
    pub fn is_noop(&self) -> bool {
        self.retracted.is_empty() && self.inserted.is_empty()
    }
}

/// Per-session mutable wizard state.
#[derive(Debug, Clone)]
pub struct StepQueue {
    catalog: Arc<StepCatalog>,
    rules: Arc<BranchRuleTable>,
    steps: Vec<StepKey>,
    cursor: usize,
    answers: HashMap<StepKey, Answer>,
    inserted_by: HashMap<StepKey, StepKey>,
}

impl StepQueue {
    /// Builds the initial queue for a country: applicable base steps in
    /// catalog order, branch children excluded until inserted.
    pub fn new(
        catalog: Arc<StepCatalog>,
        rules: Arc<BranchRuleTable>,
        country: &CountryCode,
    ) -> Result<Self, WizardError> {
        let steps = catalog.base_queue(country, &rules);
        if steps.is_empty() {
            return Err(WizardError::branch_config(format!(
                "no catalog steps applicable to country '{}'",
                country
            )));
        }
        Ok(Self {
            catalog,
            rules,
            steps,
            cursor: 0,
            answers: HashMap::new(),
            inserted_by: HashMap::new(),
        })
    }

    /// The step under the cursor, or `None` once the session is finished.
    pub fn current(&self) -> Option<&Step> {
        self.steps.get(self.cursor).and_then(|key| self.catalog.get(key))
    }

    /// Returns true once the cursor has moved past the last step.
    pub fn is_finished(&self) -> bool {
        self.cursor == self.steps.len()
    }

    /// Current cursor position (`0 ..= len`).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of active steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the queue has no steps. Never the case for a queue
    /// built by [`StepQueue::new`].
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Active step keys in order.
    pub fn active_keys(&self) -> &[StepKey] {
        &self.steps
    }

    /// Queue position of a step, if active.
    pub fn position_of(&self, key: &StepKey) -> Option<usize> {
        self.steps.iter().position(|k| k == key)
    }

    /// The recorded answer for a step, if any.
    pub fn answer(&self, key: &StepKey) -> Option<&Answer> {
        self.answers.get(key)
    }

    /// The step that caused `key` to be inserted, if it was branch-inserted.
    pub fn inserted_by(&self, key: &StepKey) -> Option<&StepKey> {
        self.inserted_by.get(key)
    }

    /// Looks a step up in the shared catalog.
    pub fn step(&self, key: &StepKey) -> Option<&Step> {
        self.catalog.get(key)
    }

    /// Records an answer, recomputing the branch region if `key` triggers
    /// a rule.
    ///
    /// Re-branching is atomic: every step whose provenance chain roots at
    /// the trigger is retracted (transitively, answers purged), then the
    /// steps selected by the new value are inserted right after the
    /// trigger. The cursor then points at the trigger itself; the caller
    /// advances explicitly. Re-submitting an unchanged canonical value
    /// refreshes the stored display only and moves nothing.
    pub fn set_answer(&mut self, key: &StepKey, answer: Answer) -> Result<BranchEffect, WizardError> {
        let position = self
            .position_of(key)
            .ok_or_else(|| WizardError::step_not_active(key.as_str()))?;

        let rule = match self.rules.rule_for(key) {
            Some(rule) => rule,
            None => {
                self.answers.insert(key.clone(), answer);
                return Ok(BranchEffect::default());
            }
        };

        let unchanged = self
            .answers
            .get(key)
            .map(|prev| prev.canonical == answer.canonical)
            .unwrap_or(false);
        if unchanged {
            self.answers.insert(key.clone(), answer);
            return Ok(BranchEffect::default());
        }

        // File answers never select an arm; only text dispatches.
        let canonical_text = answer.canonical.as_text().unwrap_or("");
        let to_insert: Vec<StepKey> = rule.steps_for(canonical_text).to_vec();

        let to_retract = self.descendants_of(key);
        let retracted_set: HashSet<&StepKey> = to_retract.iter().collect();

        // Validate the insertion against the post-retraction queue before
        // mutating anything, so a bad rule leaves the state untouched.
        for child in &to_insert {
            if !self.catalog.contains(child) {
                return Err(WizardError::branch_config(format!(
                    "rule on '{}' inserts unknown step '{}'",
                    key, child
                )));
            }
            let already_active = self
                .steps
                .iter()
                .any(|k| k == child && !retracted_set.contains(k));
            if already_active {
                return Err(WizardError::branch_config(format!(
                    "rule on '{}' would duplicate active step '{}'",
                    key, child
                )));
            }
        }

        for gone in &to_retract {
            self.answers.remove(gone);
            self.inserted_by.remove(gone);
        }
        self.steps.retain(|k| !retracted_set.contains(k));

        // Retraction only removes steps after the trigger, so `position`
        // still addresses it.
        debug_assert_eq!(self.steps.get(position), Some(key));
        for (offset, child) in to_insert.iter().enumerate() {
            self.steps.insert(position + 1 + offset, child.clone());
            self.inserted_by.insert(child.clone(), key.clone());
        }

        self.answers.insert(key.clone(), answer);
        self.cursor = position;

        if !to_retract.is_empty() || !to_insert.is_empty() {
            debug!(
                trigger = %key,
                retracted = to_retract.len(),
                inserted = to_insert.len(),
                "branch region recomputed"
            );
        }

        Ok(BranchEffect {
            retracted: to_retract,
            inserted: to_insert,
        })
    }

    /// Moves the cursor forward past the current step.
    ///
    /// The current step must already hold an answer; advancing past an
    /// unanswered step is a distinct, recoverable error.
    pub fn advance(&mut self) -> Result<(), WizardError> {
        let key = match self.steps.get(self.cursor) {
            Some(key) => key,
            None => {
                return Err(WizardError::invalid_navigation(
                    "cannot advance past the end of the queue",
                ))
            }
        };
        if !self.answers.contains_key(key) {
            return Err(WizardError::unanswered_step(key.as_str()));
        }
        self.cursor += 1;
        Ok(())
    }

    /// Moves the cursor back one step.
    pub fn retreat(&mut self) -> Result<(), WizardError> {
        if self.cursor == 0 {
            return Err(WizardError::invalid_navigation(
                "cannot move before the first step",
            ));
        }
        self.cursor -= 1;
        Ok(())
    }

    /// Captures the full queue state for rollback.
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            steps: self.steps.clone(),
            cursor: self.cursor,
            answers: self.answers.clone(),
            inserted_by: self.inserted_by.clone(),
        }
    }

    /// Replaces the queue state wholesale with a snapshot.
    pub fn restore(&mut self, snapshot: QueueSnapshot) {
        self.steps = snapshot.steps;
        self.cursor = snapshot.cursor;
        self.answers = snapshot.answers;
        self.inserted_by = snapshot.inserted_by;
    }

    /// All answers keyed by step, for the debug dump.
    pub fn answers(&self) -> &HashMap<StepKey, Answer> {
        &self.answers
    }

    /// The provenance map, for the debug dump.
    pub fn provenance(&self) -> &HashMap<StepKey, StepKey> {
        &self.inserted_by
    }

    /// Steps whose provenance chain roots at `root`, transitively, in
    /// queue order. Stops only when no provenance edges remain.
    fn descendants_of(&self, root: &StepKey) -> Vec<StepKey> {
        let mut members: HashSet<&StepKey> = HashSet::new();
        members.insert(root);
        loop {
            let before = members.len();
            for (child, parent) in &self.inserted_by {
                if members.contains(parent) {
                    members.insert(child);
                }
            }
            if members.len() == before {
                break;
            }
        }
        members.remove(root);
        self.steps
            .iter()
            .filter(|k| members.contains(k))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{BranchRule, Step};
    use crate::domain::queue::CanonicalValue;
    use std::collections::BTreeMap;

    fn key(s: &str) -> StepKey {
        StepKey::new(s).unwrap()
    }

    fn catalog() -> Arc<StepCatalog> {
        Arc::new(
            StepCatalog::new(vec![
                Step::text("full_name").unwrap(),
                Step::text("phone").unwrap(),
                Step::text("employment_status").unwrap(),
                Step::text("employer_name").unwrap(),
                Step::text("income").unwrap(),
                Step::text("institution").unwrap(),
                Step::text("has_income").unwrap(),
                Step::text("income_source").unwrap(),
            ])
            .unwrap(),
        )
    }

    fn rules(catalog: &StepCatalog) -> Arc<BranchRuleTable> {
        Arc::new(
            BranchRuleTable::new(
                vec![
                    BranchRule::Enumerated {
                        trigger: key("employment_status"),
                        arms: BTreeMap::from([
                            (
                                "Employed".to_string(),
                                vec![key("employer_name"), key("income")],
                            ),
                            (
                                "Student".to_string(),
                                vec![key("institution"), key("has_income")],
                            ),
                        ]),
                    },
                    BranchRule::Boolean {
                        trigger: key("has_income"),
                        on_yes: vec![key("income_source")],
                    },
                ],
                catalog,
            )
            .unwrap(),
        )
    }

    fn queue() -> StepQueue {
        let catalog = catalog();
        let rules = rules(&catalog);
        StepQueue::new(catalog, rules, &CountryCode::new("KZ").unwrap()).unwrap()
    }

    fn answered(q: &mut StepQueue, k: &str, v: &str) {
        q.set_answer(&key(k), Answer::text(v)).unwrap();
    }

    mod construction {
        use super::*;

        #[test]
        fn base_queue_excludes_branch_children() {
            let q = queue();
            assert_eq!(
                q.active_keys(),
                &[key("full_name"), key("phone"), key("employment_status")]
            );
        }

        #[test]
        fn starts_at_first_step_unfinished() {
            let q = queue();
            assert_eq!(q.cursor(), 0);
            assert!(!q.is_finished());
            assert_eq!(q.current().unwrap().key, key("full_name"));
        }

        #[test]
        fn fails_when_nothing_applies() {
            let catalog = Arc::new(
                StepCatalog::new(vec![Step::text("kz_only")
                    .unwrap()
                    .with_scope(crate::domain::foundation::CountryScope::only(["KZ"]).unwrap())])
                .unwrap(),
            );
            let result = StepQueue::new(
                catalog,
                Arc::new(BranchRuleTable::empty()),
                &CountryCode::new("GE").unwrap(),
            );
            assert!(result.is_err());
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn advance_requires_an_answer() {
            let mut q = queue();
            let err = q.advance().unwrap_err();
            assert_eq!(err, WizardError::unanswered_step("full_name"));
        }

        #[test]
        fn advance_moves_past_answered_step() {
            let mut q = queue();
            answered(&mut q, "full_name", "Jane Doe");
            q.advance().unwrap();
            assert_eq!(q.current().unwrap().key, key("phone"));
        }

        #[test]
        fn retreat_from_start_fails() {
            let mut q = queue();
            assert!(matches!(
                q.retreat(),
                Err(WizardError::InvalidNavigation { .. })
            ));
        }

        #[test]
        fn finishing_and_coming_back() {
            let mut q = queue();
            answered(&mut q, "full_name", "Jane Doe");
            q.advance().unwrap();
            answered(&mut q, "phone", "+77001234567");
            q.advance().unwrap();
            answered(&mut q, "employment_status", "Unemployed");
            q.advance().unwrap();

            assert!(q.is_finished());
            assert!(q.current().is_none());
            assert!(matches!(
                q.advance(),
                Err(WizardError::InvalidNavigation { .. })
            ));

            q.retreat().unwrap();
            assert!(!q.is_finished());
            assert_eq!(q.current().unwrap().key, key("employment_status"));
        }
    }

    mod answers {
        use super::*;

        #[test]
        fn set_answer_on_inactive_step_fails() {
            let mut q = queue();
            let err = q.set_answer(&key("employer_name"), Answer::text("ACME"));
            assert_eq!(err, Err(WizardError::step_not_active("employer_name")));
        }

        #[test]
        fn non_branching_answer_leaves_queue_alone() {
            let mut q = queue();
            let effect = q.set_answer(&key("full_name"), Answer::text("Jane Doe")).unwrap();
            assert!(effect.is_noop());
            assert_eq!(q.len(), 3);
            assert_eq!(q.answer(&key("full_name")).unwrap().display, "Jane Doe");
        }
    }

    mod branching {
        use super::*;

        fn at_employment(q: &mut StepQueue) {
            answered(q, "full_name", "Jane Doe");
            q.advance().unwrap();
            answered(q, "phone", "+77001234567");
            q.advance().unwrap();
        }

        #[test]
        fn enumerated_answer_splices_branch_after_trigger() {
            let mut q = queue();
            at_employment(&mut q);
            let effect = q
                .set_answer(&key("employment_status"), Answer::text("Employed"))
                .unwrap();

            assert_eq!(effect.inserted, vec![key("employer_name"), key("income")]);
            assert_eq!(
                q.active_keys(),
                &[
                    key("full_name"),
                    key("phone"),
                    key("employment_status"),
                    key("employer_name"),
                    key("income"),
                ]
            );
            assert_eq!(q.inserted_by(&key("income")), Some(&key("employment_status")));
            // cursor stays on the trigger; caller advances explicitly
            assert_eq!(q.current().unwrap().key, key("employment_status"));
        }

        #[test]
        fn switching_arms_retracts_old_branch_and_answers() {
            let mut q = queue();
            at_employment(&mut q);
            answered(&mut q, "employment_status", "Employed");
            q.advance().unwrap();
            answered(&mut q, "employer_name", "ACME");
            q.advance().unwrap();
            answered(&mut q, "income", "250000");

            let effect = q
                .set_answer(&key("employment_status"), Answer::text("Student"))
                .unwrap();

            assert_eq!(effect.retracted, vec![key("employer_name"), key("income")]);
            assert_eq!(
                q.active_keys(),
                &[
                    key("full_name"),
                    key("phone"),
                    key("employment_status"),
                    key("institution"),
                    key("has_income"),
                ]
            );
            assert!(q.answer(&key("employer_name")).is_none());
            assert!(q.answer(&key("income")).is_none());
            assert!(q.inserted_by(&key("employer_name")).is_none());
            assert_eq!(q.current().unwrap().key, key("employment_status"));
        }

        #[test]
        fn cascade_retraction_is_transitive() {
            let mut q = queue();
            at_employment(&mut q);
            answered(&mut q, "employment_status", "Student");
            q.advance().unwrap();
            answered(&mut q, "institution", "KBTU");
            q.advance().unwrap();
            // nested branch: has_income = Yes inserts income_source
            answered(&mut q, "has_income", "Yes");
            assert!(q.position_of(&key("income_source")).is_some());

            let effect = q
                .set_answer(&key("employment_status"), Answer::text("Unemployed"))
                .unwrap();

            assert_eq!(
                effect.retracted,
                vec![key("institution"), key("has_income"), key("income_source")]
            );
            assert_eq!(
                q.active_keys(),
                &[key("full_name"), key("phone"), key("employment_status")]
            );
            assert!(q.answer(&key("institution")).is_none());
            assert!(q.answer(&key("has_income")).is_none());
            assert!(q.provenance().is_empty());
        }

        #[test]
        fn resubmitting_same_value_is_a_noop() {
            let mut q = queue();
            at_employment(&mut q);
            answered(&mut q, "employment_status", "Employed");
            q.advance().unwrap();
            answered(&mut q, "employer_name", "ACME");

            // same canonical again, from a cursor inside the branch
            let effect = q
                .set_answer(&key("employment_status"), Answer::text("Employed"))
                .unwrap();
            assert!(effect.is_noop());
            assert_eq!(q.answer(&key("employer_name")).unwrap().display, "ACME");
            assert_eq!(q.current().unwrap().key, key("employer_name"));
        }

        #[test]
        fn boolean_rule_fires_on_yes_and_retracts_on_no() {
            let mut q = queue();
            at_employment(&mut q);
            answered(&mut q, "employment_status", "Student");
            q.advance().unwrap();
            answered(&mut q, "institution", "KBTU");
            q.advance().unwrap();

            answered(&mut q, "has_income", "Yes");
            assert!(q.position_of(&key("income_source")).is_some());

            answered(&mut q, "has_income", "No");
            assert!(q.position_of(&key("income_source")).is_none());
        }

        #[test]
        fn unmatched_enumerated_value_inserts_nothing() {
            let mut q = queue();
            at_employment(&mut q);
            let effect = q
                .set_answer(&key("employment_status"), Answer::text("Retired"))
                .unwrap();
            assert!(effect.is_noop());
            assert_eq!(q.len(), 3);
        }

        #[test]
        fn cursor_inside_retracted_region_returns_to_trigger() {
            let mut q = queue();
            at_employment(&mut q);
            answered(&mut q, "employment_status", "Employed");
            q.advance().unwrap();
            answered(&mut q, "employer_name", "ACME");
            q.advance().unwrap();
            assert_eq!(q.current().unwrap().key, key("income"));

            answered(&mut q, "employment_status", "Student");
            assert_eq!(q.current().unwrap().key, key("employment_status"));
            assert_eq!(q.cursor(), 2);
        }
    }

    mod snapshots {
        use super::*;

        #[test]
        fn restore_returns_to_exact_snapshot_state() {
            let mut q = queue();
            answered(&mut q, "full_name", "Jane Doe");
            q.advance().unwrap();
            answered(&mut q, "phone", "+77001234567");
            q.advance().unwrap();
            answered(&mut q, "employment_status", "Employed");

            let snapshot = q.snapshot();
            let reference = q.snapshot();

            // arbitrary mutations
            q.advance().unwrap();
            answered(&mut q, "employer_name", "ACME");
            answered(&mut q, "employment_status", "Student");
            q.retreat().unwrap();

            q.restore(snapshot);
            assert_eq!(q.snapshot(), reference);
            assert_eq!(q.current().unwrap().key, key("employment_status"));
            assert_eq!(
                q.answer(&key("employment_status")).unwrap().canonical,
                CanonicalValue::Text("Employed".to_string())
            );
        }
    }
}
