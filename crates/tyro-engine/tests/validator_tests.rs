//! Validation pipeline tests: the orchestrator's observable contract.

use pretty_assertions::assert_eq;
use tyro_engine::{
    ChallengeSpec, Curriculum, Difficulty, TestSpec, Validator, WorkspaceStore,
    MISSING_SOURCE_MESSAGE,
};

const GAS: u64 = 1_000_000;

fn add_challenge(tests: Vec<TestSpec>) -> ChallengeSpec {
    ChallengeSpec {
        id: "T1-C1".into(),
        level: 1,
        number: 1,
        title: "adder".into(),
        description: "d".into(),
        mission: "m".into(),
        difficulty: Difficulty::Easy,
        xp: 10,
        scaffold: "// TODO\n".into(),
        solution: "fn add(a: number, b: number) -> number {\n  return a + b\n}\n".into(),
        hints: vec![],
        tests,
    }
}

fn spec(description: &str, test: &str, hint: &str) -> TestSpec {
    TestSpec {
        description: description.into(),
        test: test.into(),
        error_hint: hint.into(),
    }
}

// ── Reference solutions ──────────────────────────────────────────────────────

#[test]
fn test_every_builtin_reference_solution_validates_clean() {
    let curriculum = Curriculum::builtin();
    let validator = Validator::new(GAS);

    for level in curriculum.levels() {
        for challenge in &level.challenges {
            let result = validator.validate_source(challenge, &challenge.solution);
            assert!(
                result.compilation_errors.is_empty(),
                "{} solution does not compile: {:?}",
                challenge.id,
                result.compilation_errors
            );
            let failed: Vec<_> = result.test_results.iter().filter(|t| !t.passed).collect();
            assert!(
                failed.is_empty(),
                "{} solution fails tests: {:?}",
                challenge.id,
                failed
            );
            assert!(result.success, "{} solution not successful", challenge.id);
        }
    }
}

#[test]
fn test_scaffolds_never_panic_and_never_succeed() {
    let curriculum = Curriculum::builtin();
    let validator = Validator::new(GAS);

    for level in curriculum.levels() {
        for challenge in &level.challenges {
            let result = validator.validate_source(challenge, &challenge.scaffold);
            assert!(
                !result.success,
                "{} scaffold should not pass as-is",
                challenge.id
            );
        }
    }
}

// ── Compile failure short-circuits ───────────────────────────────────────────

#[test]
fn test_type_error_skips_tests() {
    let challenge = add_challenge(vec![spec("add", "add(1, 1) == 2", "h")]);
    let validator = Validator::new(GAS);

    let result = validator.validate_source(&challenge, "let x: number = \"hi\"\n");
    assert!(!result.success);
    assert!(!result.compilation_errors.is_empty());
    assert!(result.test_results.is_empty(), "tests must never run");
    assert_eq!(result.compilation_errors[0].code, 201);
}

#[test]
fn test_syntax_error_skips_tests() {
    let challenge = add_challenge(vec![spec("add", "add(1, 1) == 2", "h")]);
    let validator = Validator::new(GAS);

    let result = validator.validate_source(&challenge, "fn broken(((\n");
    assert!(!result.success);
    assert!(!result.compilation_errors.is_empty());
    assert!(result.test_results.is_empty());
}

// ── Test execution semantics ─────────────────────────────────────────────────

#[test]
fn test_single_failing_test_carries_its_hint() {
    let challenge = add_challenge(vec![
        spec("2+3", "add(2, 3) == 5", "sum hint"),
        spec("off by one", "add(2, 3) == 6", "this one fails"),
        spec("0+0", "add(0, 0) == 0", "zero hint"),
    ]);
    let validator = Validator::new(GAS);
    let result = validator.validate_source(&challenge, &challenge.solution);

    assert!(!result.success);
    assert_eq!(result.test_results.len(), 3);
    assert!(result.test_results[0].passed);
    assert!(!result.test_results[1].passed);
    assert_eq!(
        result.test_results[1].error_hint.as_deref(),
        Some("this one fails")
    );
    assert!(result.test_results[2].passed);
    assert!(result.test_results[0].error_hint.is_none());
}

#[test]
fn test_throwing_test_fails_without_hurting_siblings() {
    let challenge = add_challenge(vec![
        spec("boom", "no_such_fn(1) == 1", "boom hint"),
        spec("fine", "add(1, 1) == 2", "fine hint"),
    ]);
    let validator = Validator::new(GAS);
    let result = validator.validate_source(&challenge, &challenge.solution);

    assert!(!result.test_results[0].passed);
    assert!(result.test_results[1].passed);
}

#[test]
fn test_truthy_non_boolean_is_a_failure() {
    let challenge = add_challenge(vec![spec("bare number", "add(2, 3)", "must be == true")]);
    let validator = Validator::new(GAS);
    let result = validator.validate_source(&challenge, &challenge.solution);

    assert!(!result.test_results[0].passed);
    assert!(!result.success);
}

#[test]
fn test_results_preserve_spec_order() {
    let challenge = add_challenge(vec![
        spec("first", "add(1, 0) == 1", "h1"),
        spec("second", "add(2, 0) == 2", "h2"),
        spec("third", "add(3, 0) == 3", "h3"),
    ]);
    let validator = Validator::new(GAS);
    let result = validator.validate_source(&challenge, &challenge.solution);

    let order: Vec<&str> = result
        .test_results
        .iter()
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(order, vec!["first", "second", "third"]);
}

#[test]
fn test_infinite_recursion_fails_only_its_test() {
    let challenge = ChallengeSpec {
        solution: "fn spin(n: number) -> number {\n  return spin(n + 1)\n}\nfn add(a: number, b: number) -> number {\n  return a + b\n}\n".into(),
        ..add_challenge(vec![
            spec("runaway", "spin(0) == 1", "never finishes"),
            spec("fine", "add(1, 1) == 2", "fine"),
        ])
    };
    let validator = Validator::new(50_000);
    let result = validator.validate_source(&challenge, &challenge.solution);

    assert!(!result.test_results[0].passed);
    assert!(result.test_results[1].passed);
}

// ── Idempotence ──────────────────────────────────────────────────────────────

#[test]
fn test_validate_twice_is_identical() {
    let challenge = add_challenge(vec![
        spec("pass", "add(1, 1) == 2", "h"),
        spec("fail", "add(1, 1) == 3", "h2"),
    ]);
    let validator = Validator::new(GAS);

    let first = validator.validate_source(&challenge, &challenge.solution);
    let second = validator.validate_source(&challenge, &challenge.solution);
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

// ── Missing workspace file ───────────────────────────────────────────────────

#[test]
fn test_missing_file_yields_synthetic_error() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceStore::new(dir.path());
    let challenge = add_challenge(vec![spec("add", "add(1, 1) == 2", "h")]);
    let validator = Validator::new(GAS);

    let result = validator.validate_solution(&challenge, &workspace).unwrap();
    assert!(!result.success);
    assert_eq!(result.compilation_errors.len(), 1);
    let err = &result.compilation_errors[0];
    assert_eq!((err.line, err.column, err.code), (0, 0, 0));
    assert_eq!(err.message, MISSING_SOURCE_MESSAGE);
    assert_eq!(err.friendly_message, MISSING_SOURCE_MESSAGE);
    assert!(result.test_results.is_empty());
}

#[test]
fn test_workspace_file_round_trip_validates() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = WorkspaceStore::new(dir.path());
    let challenge = add_challenge(vec![spec("add", "add(2, 2) == 4", "h")]);
    let validator = Validator::new(GAS);

    workspace.ensure(&challenge).unwrap();
    let path = workspace.path_for(&challenge);
    std::fs::write(&path, &challenge.solution).unwrap();

    let result = validator.validate_solution(&challenge, &workspace).unwrap();
    assert!(result.success);
}

// ── Concrete spec scenarios ──────────────────────────────────────────────────

#[test]
fn test_concrete_type_error_scenario() {
    let challenge = add_challenge(vec![spec("never runs", "true == true", "h")]);
    let validator = Validator::new(GAS);
    let result = validator.validate_source(&challenge, "let x: number = \"hi\"");
    assert!(!result.success);
    assert!(!result.compilation_errors.is_empty());
    assert!(result.test_results.is_empty());
}

#[test]
fn test_concrete_add_scenario() {
    let challenge = add_challenge(vec![spec("adds", "add(2, 3) == 5", "h")]);
    let validator = Validator::new(GAS);
    let result = validator.validate_source(
        &challenge,
        "fn add(a: number, b: number) -> number {\n  return a + b\n}",
    );
    assert!(result.success);
    assert_eq!(result.test_results.len(), 1);
    assert!(result.test_results[0].passed);
}
