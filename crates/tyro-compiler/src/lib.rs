//! Tyro compiler: orchestrates the strict checking pipeline.
//!
//! ```text
//! Tyro Source → Lexer → Parser → Type Checker → diagnostics
//! ```
//!
//! The pipeline is fully in-memory: callers hand in a [`SourceFile`] built
//! from a string, and get back the parsed program (when one could be built)
//! plus every diagnostic in emission order.

mod checker;
mod env;
mod stdlib;
mod ty;

pub use checker::TypeChecker;
pub use stdlib::StdlibRegistry;
pub use ty::{FnSig, RecordField, SumVariant, Type};

use tyro_types::{ast::Program, CompileErrors, SourceFile};

/// Result of running the full checking pipeline.
pub struct CheckOutcome {
    /// The parsed program, when parsing produced one.
    pub program: Option<Program>,
    /// Every diagnostic collected, in emission order.
    pub errors: CompileErrors,
}

impl CheckOutcome {
    /// True when the source is clean: parsed and no error diagnostics.
    pub fn is_clean(&self) -> bool {
        self.program.is_some() && !self.errors.has_errors()
    }
}

/// Run the strict pipeline: lex, parse, and (when the source parsed
/// cleanly) type-check.
///
/// Syntactically invalid input never panics or errors out of band;
/// syntax problems surface as diagnostics with their own codes.
pub fn check(source: &SourceFile) -> CheckOutcome {
    let (program, mut errors) = tyro_parser::parse_program(source);

    if let Some(program) = &program {
        if !errors.has_errors() {
            let mut checker = TypeChecker::new(&mut errors, source);
            checker.check(program);
        }
    }

    CheckOutcome { program, errors }
}

/// Type-check an already-parsed program.
pub fn type_check(program: &Program, source: &SourceFile) -> CompileErrors {
    let mut errors = CompileErrors::empty();
    let mut checker = TypeChecker::new(&mut errors, source);
    checker.check(program);
    errors
}
