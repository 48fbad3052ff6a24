//! Validation orchestrator: compilation check, then tests, then one
//! assembled [`ValidationResult`].
//!
//! Stateless and side-effect free: what to do with a result (award XP,
//! mark completion) is entirely the caller's business.

use tracing::debug;

use crate::challenge::{ChallengeSpec, CompilationError, ValidationResult};
use crate::check::CompilationChecker;
use crate::error::EngineError;
use crate::executor::TestExecutor;
use crate::workspace::WorkspaceStore;

/// Message carried by the synthetic missing-file error.
pub const MISSING_SOURCE_MESSAGE: &str =
    "Solution file not found. Make sure you start the challenge first!";

/// Sequences the compilation checker and the test executor.
pub struct Validator {
    checker: CompilationChecker,
    executor: TestExecutor,
}

impl Validator {
    /// Build a validator with the given evaluation gas limit.
    pub fn new(gas_limit: u64) -> Self {
        Self {
            checker: CompilationChecker::new(),
            executor: TestExecutor::new(gas_limit),
        }
    }

    /// Validate the learner's current workspace copy of `challenge`.
    ///
    /// A missing workspace file is a configuration/state problem, not a
    /// code-correctness problem: it comes back as a normal failed result
    /// with one synthetic compilation error (line 0, column 0, code 0),
    /// distinguishable from a real compile failure only by its message.
    /// Any other I/O failure is environmental and propagates.
    pub fn validate_solution(
        &self,
        challenge: &ChallengeSpec,
        workspace: &WorkspaceStore,
    ) -> Result<ValidationResult, EngineError> {
        let path = workspace.path_for(challenge);
        if !path.exists() {
            debug!(challenge = %challenge.id, "workspace file missing");
            return Ok(missing_source_result());
        }

        let source_text = workspace.read(&path)?;
        Ok(self.validate_source(challenge, &source_text))
    }

    /// Validate source text the caller already holds in memory (e.g. an
    /// editor buffer not yet flushed to disk).
    pub fn validate_source(
        &self,
        challenge: &ChallengeSpec,
        source_text: &str,
    ) -> ValidationResult {
        let file_name = format!("challenge-{:02}.tyro", challenge.number);

        // Step 1: strict compilation. Tests never run against code that
        // doesn't type-check; their expressions assume the learner's
        // declarations exist and are well-typed.
        let compilation_errors = self.checker.check(source_text, &file_name);
        if !compilation_errors.is_empty() {
            debug!(
                challenge = %challenge.id,
                errors = compilation_errors.len(),
                "validation stopped at compilation"
            );
            return ValidationResult {
                success: false,
                compilation_errors,
                test_results: Vec::new(),
            };
        }

        // Step 2: run the tests.
        let test_results = self.executor.run(source_text, &challenge.tests);
        let success = test_results.iter().all(|t| t.passed);
        debug!(
            challenge = %challenge.id,
            passed = test_results.iter().filter(|t| t.passed).count(),
            total = test_results.len(),
            success,
            "validation finished"
        );

        ValidationResult {
            success,
            compilation_errors: Vec::new(),
            test_results,
        }
    }
}

/// The synthetic result for a missing workspace file.
fn missing_source_result() -> ValidationResult {
    ValidationResult {
        success: false,
        compilation_errors: vec![CompilationError {
            line: 0,
            column: 0,
            message: MISSING_SOURCE_MESSAGE.to_string(),
            friendly_message: MISSING_SOURCE_MESSAGE.to_string(),
            code: 0,
        }],
        test_results: Vec::new(),
    }
}
