//! Compilation checker: strict in-memory compilation of one source unit.
//!
//! No filesystem access; the learner's source text becomes a virtual
//! [`SourceFile`] tagged with the workspace file name, and the full strict
//! pipeline (lex → parse → type-check) runs against it. Only
//! error-severity diagnostics are kept; warnings never block progress.

use tracing::debug;
use tyro_types::{Severity, SourceFile};

use crate::challenge::CompilationError;
use crate::translate::Translator;

/// Checks a single in-memory source unit under strict settings.
///
/// Holds the diagnostic translator so its compiled regexes are reused
/// across validation calls (an internal cache, never observable).
pub struct CompilationChecker {
    translator: Translator,
}

impl CompilationChecker {
    pub fn new() -> Self {
        Self {
            translator: Translator::new(),
        }
    }

    /// Compile `source_text` and collect error diagnostics.
    ///
    /// Diagnostics come back in the order the compiler emitted them, each
    /// with 1-based line/column, the raw message (suggestion lines
    /// newline-joined), its friendly translation, and the numeric code.
    /// Syntactically invalid input yields diagnostics, never a panic.
    pub fn check(&self, source_text: &str, virtual_file_name: &str) -> Vec<CompilationError> {
        let source = SourceFile::new(virtual_file_name, source_text);
        let outcome = tyro_compiler::check(&source);

        let errors: Vec<CompilationError> = outcome
            .errors
            .errors
            .iter()
            .filter(|e| e.severity == Severity::Error)
            .map(|e| {
                // Flatten message + suggestion into one newline-joined string
                let mut message = e.message.clone();
                if let Some(suggestion) = &e.suggestion {
                    message.push('\n');
                    message.push_str(suggestion);
                }
                let friendly_message = self.translator.translate(e.code.0, &message);
                CompilationError {
                    line: e.span.start_line,
                    column: e.span.start_col,
                    message,
                    friendly_message,
                    code: e.code.0,
                }
            })
            .collect();

        debug!(
            file = virtual_file_name,
            error_count = errors.len(),
            "compilation check finished"
        );
        errors
    }
}

impl Default for CompilationChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_source_has_no_errors() {
        let checker = CompilationChecker::new();
        let errors = checker.check(
            "fn add(a: number, b: number) -> number {\n  return a + b\n}\n",
            "challenge-01.tyro",
        );
        assert!(errors.is_empty(), "unexpected: {errors:?}");
    }

    #[test]
    fn test_type_error_is_reported_with_position() {
        let checker = CompilationChecker::new();
        let errors = checker.check("let x: number = \"hi\"\n", "challenge-01.tyro");
        assert!(!errors.is_empty());
        assert_eq!(errors[0].code, 201);
        assert_eq!(errors[0].line, 1);
        assert!(errors[0].column >= 1);
        assert_ne!(errors[0].friendly_message, errors[0].message);
    }

    #[test]
    fn test_syntax_error_is_a_diagnostic_not_a_panic() {
        let checker = CompilationChecker::new();
        let errors = checker.check("let let let ((((", "challenge-01.tyro");
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_errors_keep_emission_order() {
        let checker = CompilationChecker::new();
        let errors = checker.check(
            "let a: number = \"one\"\nlet b: number = \"two\"\n",
            "challenge-01.tyro",
        );
        assert_eq!(errors.len(), 2);
        assert!(errors[0].line < errors[1].line);
    }
}
