//! Shared types for the Tyro compiler.
//!
//! This crate defines the AST node types, source spans, diagnostic types,
//! and other shared data structures used across all compiler stages.

mod error;
mod span;
pub mod ast;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, Severity, TyroError, MAX_ERRORS};
pub use span::{SourceFile, Span};

/// Result type used throughout the Tyro compiler.
pub type Result<T> = std::result::Result<T, TyroError>;
