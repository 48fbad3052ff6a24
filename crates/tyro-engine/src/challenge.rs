//! Core data model: challenges, test specs, and validation results.
//!
//! [`ValidationResult`]'s serialized shape is the wire contract consumed
//! by every caller (CLI report, IPC): `{ success, compilationErrors:
//! [{line, column, message, friendlyMessage, code}], testResults:
//! [{description, passed, errorHint?}] }`; no additional fields.

use serde::{Deserialize, Serialize};

/// Challenge difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Boss,
}

/// One declarative test case belonging to a challenge.
///
/// The expression is trusted content authored by curriculum maintainers;
/// but it executes the learner's code, so the executor still isolates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSpec {
    pub description: String,
    /// Expression evaluated in a scope containing the learner's top-level
    /// declarations; the test passes iff it comes out strictly `true`.
    pub test: String,
    /// Friendly hint shown when this specific test fails.
    pub error_hint: String,
}

/// The immutable, authored definition of one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSpec {
    pub id: String,
    pub level: u32,
    pub number: u32,
    pub title: String,
    /// Lesson content explaining the concept.
    pub description: String,
    /// What the learner needs to do.
    pub mission: String,
    pub difficulty: Difficulty,
    pub xp: u32,
    /// Initial workspace file content with TODO markers.
    pub scaffold: String,
    /// Reference solution (revealed after repeated failures).
    pub solution: String,
    /// Progressive hints, revealed one at a time.
    pub hints: Vec<String>,
    /// Validation tests, run in order.
    pub tests: Vec<TestSpec>,
}

/// One compiler diagnostic, positioned 1-based (line 0 / column 0 marks a
/// file-level condition such as a missing workspace file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationError {
    pub line: u32,
    pub column: u32,
    /// The raw compiler message (multi-part messages newline-joined).
    pub message: String,
    /// The beginner-oriented translation of `message`.
    pub friendly_message: String,
    /// Numeric diagnostic code; 0 for synthetic errors.
    pub code: u16,
}

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub description: String,
    pub passed: bool,
    /// Present only when the test failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_hint: Option<String>,
}

impl TestResult {
    /// Build a result for `spec` from its pass/fail outcome, attaching the
    /// authored hint only on failure.
    pub fn for_spec(spec: &TestSpec, passed: bool) -> Self {
        Self {
            description: spec.description.clone(),
            passed,
            error_hint: if passed {
                None
            } else {
                Some(spec.error_hint.clone())
            },
        }
    }
}

/// The complete result of validating one solution attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff zero compilation errors and every test passed.
    pub success: bool,
    /// Empty unless compilation failed.
    pub compilation_errors: Vec<CompilationError>,
    /// Empty if compilation failed; otherwise one entry per test spec,
    /// in the original order.
    pub test_results: Vec<TestResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_contract_field_names() {
        let result = ValidationResult {
            success: false,
            compilation_errors: vec![CompilationError {
                line: 3,
                column: 5,
                message: "type mismatch: expected number, found string".into(),
                friendly_message: "Type mismatch!".into(),
                code: 201,
            }],
            test_results: vec![TestResult {
                description: "add(2, 3) == 5".into(),
                passed: false,
                error_hint: Some("check the sum".into()),
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("success").is_some());
        assert!(json.get("compilationErrors").is_some());
        assert!(json.get("testResults").is_some());
        let err = &json["compilationErrors"][0];
        assert!(err.get("friendlyMessage").is_some());
        assert!(err.get("line").is_some());
        let test = &json["testResults"][0];
        assert!(test.get("errorHint").is_some());
    }

    #[test]
    fn test_error_hint_omitted_when_passed() {
        let result = TestResult {
            description: "d".into(),
            passed: true,
            error_hint: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("errorHint"));
    }

    #[test]
    fn test_for_spec_copies_hint_only_on_failure() {
        let spec = TestSpec {
            description: "add works".into(),
            test: "add(1, 2) == 3".into(),
            error_hint: "check the sum".into(),
        };
        assert_eq!(TestResult::for_spec(&spec, true).error_hint, None);
        assert_eq!(
            TestResult::for_spec(&spec, false).error_hint.as_deref(),
            Some("check the sum")
        );
    }
}
