//! Test executor: runs declarative test expressions against the learner's
//! declarations, one fresh sandbox per test.
//!
//! Called only after the compilation checker reported zero errors for the
//! same source. The second parse here is deliberately relaxed; parse
//! only, no type re-validation; because type correctness was already
//! verified, and test expressions themselves are never type-checked.

use tracing::debug;
use tyro_eval::{Evaluator, Value};
use tyro_types::SourceFile;

use crate::challenge::{TestResult, TestSpec};

/// Runs each test spec in an isolated evaluation context.
pub struct TestExecutor {
    gas_limit: u64,
}

impl TestExecutor {
    pub fn new(gas_limit: u64) -> Self {
        Self { gas_limit }
    }

    /// Evaluate every test independently, in order.
    ///
    /// One test's failure; a thrown trap, an unknown name, even gas
    /// exhaustion; never aborts or corrupts any sibling test: every test
    /// gets a fresh evaluator and re-runs the learner's declarations.
    pub fn run(&self, source_text: &str, tests: &[TestSpec]) -> Vec<TestResult> {
        let source = SourceFile::new("solution.tyro", source_text);
        let (program, errors) = tyro_parser::parse_program(&source);

        let program = match program {
            Some(program) if !errors.has_errors() => program,
            // Unreachable when callers respect the contract (run only
            // after a clean check); degrade to all-failed rather than
            // panicking.
            _ => {
                return tests
                    .iter()
                    .map(|spec| TestResult::for_spec(spec, false))
                    .collect();
            }
        };

        tests
            .iter()
            .map(|spec| {
                let passed = self.evaluates_to_true(&program, spec);
                debug!(test = %spec.description, passed, "test evaluated");
                TestResult::for_spec(spec, passed)
            })
            .collect()
    }

    /// A test passes iff its expression evaluates to strictly the boolean
    /// `true`. Truthy non-booleans, nil, and every error path count as
    /// not passed.
    fn evaluates_to_true(&self, program: &tyro_types::ast::Program, spec: &TestSpec) -> bool {
        let expr_source = SourceFile::new("test-expression.tyro", spec.test.as_str());
        let (expr, errors) = tyro_parser::parse_expression_source(&expr_source);
        let expr = match expr {
            Some(expr) if !errors.has_errors() => expr,
            _ => return false,
        };

        // Fresh sandbox per test: fresh globals, fresh scopes, fresh gas.
        let mut evaluator = Evaluator::new(self.gas_limit);
        if evaluator.load_program(program).is_err() {
            return false;
        }

        match evaluator.eval_expr(&expr) {
            Ok(value) => matches!(value, Value::Bool(true)),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyro_eval::DEFAULT_GAS_LIMIT;

    fn spec(test: &str) -> TestSpec {
        TestSpec {
            description: format!("evaluates {test}"),
            test: test.to_string(),
            error_hint: "hint".into(),
        }
    }

    const ADD_SOURCE: &str = "fn add(a: number, b: number) -> number {\n  return a + b\n}\n";

    #[test]
    fn test_strict_true_passes() {
        let executor = TestExecutor::new(DEFAULT_GAS_LIMIT);
        let results = executor.run(ADD_SOURCE, &[spec("add(2, 3) == 5")]);
        assert!(results[0].passed);
        assert!(results[0].error_hint.is_none());
    }

    #[test]
    fn test_truthy_non_boolean_fails() {
        let executor = TestExecutor::new(DEFAULT_GAS_LIMIT);
        let results = executor.run(ADD_SOURCE, &[spec("add(2, 3)")]);
        assert!(!results[0].passed, "a bare number must not pass");
        assert_eq!(results[0].error_hint.as_deref(), Some("hint"));
    }

    #[test]
    fn test_throwing_expression_fails_alone() {
        let executor = TestExecutor::new(DEFAULT_GAS_LIMIT);
        let results = executor.run(
            ADD_SOURCE,
            &[
                spec("no_such_function(1) == 1"),
                spec("add(1, 1) == 2"),
            ],
        );
        assert!(!results[0].passed);
        assert!(results[1].passed, "sibling test must be unaffected");
    }

    #[test]
    fn test_results_keep_input_order() {
        let executor = TestExecutor::new(DEFAULT_GAS_LIMIT);
        let specs = [spec("add(0, 0) == 0"), spec("add(1, 0) == 1")];
        let results = executor.run(ADD_SOURCE, &specs);
        assert_eq!(results[0].description, specs[0].description);
        assert_eq!(results[1].description, specs[1].description);
    }
}
