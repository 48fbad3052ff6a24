//! Tyro tree-walking evaluator: the reference implementation for
//! execution semantics.
//!
//! Executes Tyro programs directly from the AST. Each [`Evaluator`] is a
//! fully isolated context: fresh globals, fresh scopes, fresh gas budget.

mod env;
mod error;
mod evaluator;
mod stdlib;
mod value;

pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::{Evaluator, DEFAULT_GAS_LIMIT};
pub use value::{Closure, FunctionValue, Value};
