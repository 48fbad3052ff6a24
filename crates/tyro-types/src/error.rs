use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors reported before fail-fast.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic severity.
///
/// Only `Error` blocks a learner's progress; warnings are informational
/// and must never fail a validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Type,
    Scope,
}

/// Numeric error code (E100–E599).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);
    pub const INVALID_ESCAPE: Self = Self(102);
    pub const BLOCK_COMMENT_USED: Self = Self(103);
    pub const NESTING_TOO_DEEP: Self = Self(104);

    // ── Type errors (E200–E299) ──
    pub const UNKNOWN_TYPE: Self = Self(200);
    pub const TYPE_MISMATCH: Self = Self(201);
    pub const WRONG_ARG_COUNT: Self = Self(202);
    pub const UNKNOWN_NAME: Self = Self(203);
    pub const NOT_CALLABLE: Self = Self(204);
    pub const UNKNOWN_FIELD: Self = Self(205);
    pub const UNKNOWN_FUNCTION: Self = Self(206);
    pub const MISSING_RETURN: Self = Self(207);
    pub const CONDITION_NOT_BOOL: Self = Self(208);
    pub const NON_EXHAUSTIVE_MATCH: Self = Self(210);
    pub const NOT_ITERABLE: Self = Self(211);

    // ── Scope errors (E500–E599) ──
    pub const VARIABLE_ALREADY_DECLARED: Self = Self(500);
    pub const ASSIGN_UNDECLARED: Self = Self(501);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Type,
            500..=599 => ErrorCategory::Scope,
            _ => ErrorCategory::Syntax, // fallback
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured Tyro compiler diagnostic.
///
/// The validation layer renders these; it must not parse free-form strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TyroError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E201).
    pub code: ErrorCode,
    /// Error severity.
    pub severity: Severity,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl TyroError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for TyroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for TyroError {}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Type => write!(f, "type"),
            Self::Scope => write!(f, "scope"),
        }
    }
}

/// Collected diagnostics for one compilation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<TyroError>,
    pub warnings: Vec<TyroError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            total_errors: 0,
            total_warnings: 0,
        }
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: TyroError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Add a warning.
    pub fn push_warning(&mut self, warning: TyroError) {
        self.warnings.push(warning);
        self.total_warnings += 1;
    }

    /// Absorb another collection, preserving emission order.
    ///
    /// Overflow counts (errors past the storage cap) carry over too.
    pub fn extend(&mut self, other: CompileErrors) {
        let error_overflow = other.total_errors.saturating_sub(other.errors.len());
        for err in other.errors {
            self.push_error(err);
        }
        self.total_errors += error_overflow;

        let warning_overflow = other.total_warnings.saturating_sub(other.warnings.len());
        for warn in other.warnings {
            self.push_warning(warn);
        }
        self.total_warnings += warning_overflow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(
            ErrorCode::UNEXPECTED_TOKEN.category(),
            ErrorCategory::Syntax
        );
        assert_eq!(ErrorCode::TYPE_MISMATCH.category(), ErrorCategory::Type);
        assert_eq!(
            ErrorCode::VARIABLE_ALREADY_DECLARED.category(),
            ErrorCategory::Scope
        );
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::TYPE_MISMATCH), "E201");
        assert_eq!(format!("{}", ErrorCode::UNEXPECTED_TOKEN), "E100");
    }

    #[test]
    fn test_tyro_error_creation() {
        let err = TyroError::new(
            "test.tyro",
            ErrorCode::TYPE_MISMATCH,
            "type mismatch: expected number, found string",
            Span::new(3, 5, 3, 22),
            "let count: number = \"hello\"",
        );
        assert_eq!(err.code, ErrorCode::TYPE_MISMATCH);
        assert_eq!(err.severity, Severity::Error);
        assert_eq!(err.category, ErrorCategory::Type);
    }

    #[test]
    fn test_tyro_error_with_suggestion() {
        let err = TyroError::new(
            "test.tyro",
            ErrorCode::BLOCK_COMMENT_USED,
            "Only single-line comments (//) are supported",
            Span::new(1, 1, 1, 10),
            "/* nope */",
        )
        .with_suggestion("Replace /* ... */ with // on each line");
        assert_eq!(
            err.suggestion.as_deref(),
            Some("Replace /* ... */ with // on each line")
        );
    }

    #[test]
    fn test_tyro_error_json_serialization() {
        let err = TyroError::new(
            "challenge-01.tyro",
            ErrorCode::TYPE_MISMATCH,
            "type mismatch: expected number, found string",
            Span::new(3, 5, 3, 22),
            "let count: number = \"hello\"",
        );

        let json = serde_json::to_string_pretty(&err).unwrap();
        assert!(json.contains("\"code\""));
        assert!(json.contains("\"message\""));
        assert!(json.contains("\"source_line\""));
        assert!(json.contains("\"start_line\""));

        // Round-trip
        let deserialized: TyroError = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.code, err.code);
        assert_eq!(deserialized.message, err.message);
    }

    #[test]
    fn test_compile_errors_max_limit() {
        let mut errs = CompileErrors::empty();
        for i in 0..25 {
            errs.push_error(TyroError::new(
                "test.tyro",
                ErrorCode::UNEXPECTED_TOKEN,
                format!("Error {i}"),
                Span::point(i as u32 + 1, 1),
                "",
            ));
        }
        // Only 20 stored, but total count is 25
        assert_eq!(errs.errors.len(), 20);
        assert_eq!(errs.total_errors, 25);
        assert!(errs.has_errors());
    }

    #[test]
    fn test_compile_errors_empty() {
        let errs = CompileErrors::empty();
        assert!(!errs.has_errors());
        assert_eq!(errs.total_errors, 0);
        assert_eq!(errs.total_warnings, 0);
    }

    #[test]
    fn test_error_determinism_100_iterations() {
        let first = TyroError::new(
            "test.tyro",
            ErrorCode::TYPE_MISMATCH,
            "type mismatch",
            Span::new(3, 5, 3, 22),
            "let count: number = \"hello\"",
        );
        let first_json = serde_json::to_string(&first).unwrap();

        for i in 0..100 {
            let err = TyroError::new(
                "test.tyro",
                ErrorCode::TYPE_MISMATCH,
                "type mismatch",
                Span::new(3, 5, 3, 22),
                "let count: number = \"hello\"",
            );
            let json = serde_json::to_string(&err).unwrap();
            assert_eq!(first_json, json, "Determinism failure at iteration {i}");
        }
    }
}
