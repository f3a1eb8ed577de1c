//! End-to-end wizard session flows over a realistic catalog.

use std::io::Write;
use std::sync::Arc;

use formwizard::config::{CatalogFile, LocaleSettings};
use formwizard::domain::catalog::{StepCatalog, StepKey};
use formwizard::domain::catalog::BranchRuleTable;
use formwizard::domain::foundation::CountryCode;
use formwizard::domain::queue::CanonicalValue;
use formwizard::domain::validation::{InputCheck, RawInput, ValidatorRegistry};
use formwizard::domain::wizard::{NextOutcome, SessionContext, WizardEngine};

const CATALOG: &str = r#"
steps:
  - key: full_name
    validator: full_name
  - key: phone
    request_contact: true
    validator: phone
  - key: employment_status
    validator: choice
    options:
      - { key: Employed, label: "I am employed" }
      - { key: Student, label: "I am a student" }
  - key: employer_name
    validator: non_empty
  - key: income
    validator: amount
  - key: institution
    validator: non_empty
  - key: has_income
rules:
  - kind: enumerated
    trigger: employment_status
    arms:
      Employed: [employer_name, income]
      Student: [institution, has_income]
"#;

fn load() -> (Arc<StepCatalog>, Arc<BranchRuleTable>) {
    CatalogFile::from_yaml_str(CATALOG).unwrap().build().unwrap()
}

fn engine() -> WizardEngine {
    let (catalog, rules) = load();
    WizardEngine::new(
        SessionContext::new(
            CountryCode::new("KZ").unwrap(),
            LocaleSettings::builtin("en").unwrap(),
        ),
        catalog,
        rules,
        Arc::new(ValidatorRegistry::with_builtins()),
    )
    .unwrap()
}

fn key(s: &str) -> StepKey {
    StepKey::new(s).unwrap()
}

/// Validate raw text for the current step and submit the accepted answer.
async fn submit(engine: &mut WizardEngine, raw: &str) {
    let step_key = engine.current().expect("session not finished").key.clone();
    let check = engine
        .validate_input(&step_key, RawInput::Text(raw.to_string()))
        .await
        .unwrap();
    match check {
        InputCheck::Accepted { canonical, display } => {
            engine.process_answer(&step_key, canonical, display).unwrap();
        }
        other => panic!("input '{}' not accepted: {:?}", raw, other),
    }
}

#[tokio::test]
async fn employed_branch_then_student_rebranch() {
    let mut engine = engine();

    submit(&mut engine, "Jane Doe").await;
    engine.next().unwrap();
    submit(&mut engine, "+7 700 123 45 67").await;
    engine.next().unwrap();

    // answering via the button label expands the Employed branch
    submit(&mut engine, "I am employed").await;
    match engine.next().unwrap() {
        NextOutcome::Step(step) => assert_eq!(step.key, key("employer_name")),
        NextOutcome::Finished => panic!("expected employer_name"),
    }

    let dump = engine.debug_dump();
    let keys: Vec<&str> = dump.steps.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["full_name", "phone", "employment_status", "employer_name", "income"]
    );

    submit(&mut engine, "ACME Industries").await;
    engine.next().unwrap();
    submit(&mut engine, "250000").await;

    // navigate back to the trigger and flip the answer
    engine.previous().unwrap();
    engine.previous().unwrap();
    assert_eq!(engine.current().unwrap().key, key("employment_status"));
    submit(&mut engine, "I am a student").await;

    let dump = engine.debug_dump();
    let keys: Vec<&str> = dump.steps.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["full_name", "phone", "employment_status", "institution", "has_income"]
    );
    // prior branch answers are purged with their steps
    assert!(dump.steps.iter().all(|s| s.key.as_str() != "employer_name"));
    assert_eq!(engine.current().unwrap().key, key("employment_status"));

    // finish the student branch; locale "yeah" normalizes to canonical Yes
    engine.next().unwrap();
    submit(&mut engine, "KBTU").await;
    engine.next().unwrap();
    submit(&mut engine, "yeah").await;
    let dump = engine.debug_dump();
    let has_income = dump
        .steps
        .iter()
        .find(|s| s.key.as_str() == "has_income")
        .and_then(|s| s.answer.as_ref())
        .unwrap();
    assert_eq!(has_income.canonical, CanonicalValue::Text("Yes".to_string()));

    assert!(matches!(engine.next().unwrap(), NextOutcome::Finished));
    assert!(engine.is_finished());
}

#[tokio::test]
async fn edit_mode_rolls_back_branch_changes() {
    let mut engine = engine();

    submit(&mut engine, "Jane Doe").await;
    engine.next().unwrap();
    submit(&mut engine, "+77001234567").await;
    engine.next().unwrap();
    submit(&mut engine, "I am employed").await;
    engine.next().unwrap();
    submit(&mut engine, "ACME Industries").await;
    engine.next().unwrap();
    submit(&mut engine, "250000").await;
    assert!(matches!(engine.next().unwrap(), NextOutcome::Finished));

    // review: enter edit mode, change the branching answer, then cancel
    engine.take_snapshot().unwrap();
    engine.previous().unwrap();
    engine.previous().unwrap();
    engine.previous().unwrap();
    submit(&mut engine, "I am a student").await;
    engine.restore_snapshot().unwrap();

    // back to the finished Employed state, answers intact
    assert!(engine.is_finished());
    let dump = engine.debug_dump();
    let keys: Vec<&str> = dump.steps.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["full_name", "phone", "employment_status", "employer_name", "income"]
    );
    let income = dump
        .steps
        .iter()
        .find(|s| s.key.as_str() == "income")
        .and_then(|s| s.answer.as_ref())
        .unwrap();
    assert_eq!(income.display, "250000");
}

#[tokio::test]
async fn rejected_input_leaves_the_session_in_place() {
    let mut engine = engine();

    let check = engine
        .validate_input(&key("full_name"), RawInput::Text("Jane".to_string()))
        .await
        .unwrap();
    assert_eq!(check, InputCheck::Rejected { message: "error.full_name".to_string() });

    // nothing recorded, nothing moved
    assert_eq!(engine.current().unwrap().key, key("full_name"));
    assert!(engine.next().is_err());
}

#[test]
fn catalog_loads_from_a_file_on_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();

    let loaded = CatalogFile::load_yaml(file.path()).unwrap();
    let (catalog, rules) = loaded.build().unwrap();
    assert_eq!(catalog.len(), 7);
    assert_eq!(rules.len(), 1);
}
