//! Runtime error types for the Tyro evaluator.

use std::fmt;

use crate::value::Value;

/// Evaluation error; runtime traps and internal control flow.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Division by zero, sqrt of negative, overflow, etc.
    ArithmeticTrap(String),
    /// Unknown variable
    UndefinedVariable(String),
    /// Type mismatch at runtime
    TypeMismatch(String),
    /// Unknown module or function
    UnknownFunction(String),
    /// List index outside the valid range
    IndexOutOfBounds(String),
    /// Stdlib call error
    StdlibError(String),
    /// Gas exhaustion; the evaluation step budget ran out
    GasExhausted,
    /// `return` statement (used internally for control flow)
    Return(Value),
    /// Generic runtime error
    Runtime(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArithmeticTrap(msg) => write!(f, "arithmetic trap: {msg}"),
            Self::UndefinedVariable(name) => write!(f, "undefined variable: {name}"),
            Self::TypeMismatch(msg) => write!(f, "type mismatch: {msg}"),
            Self::UnknownFunction(msg) => write!(f, "unknown function: {msg}"),
            Self::IndexOutOfBounds(msg) => write!(f, "index out of bounds: {msg}"),
            Self::StdlibError(msg) => write!(f, "stdlib error: {msg}"),
            Self::GasExhausted => write!(f, "evaluation step budget exhausted"),
            Self::Return(_) => write!(f, "return"),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
