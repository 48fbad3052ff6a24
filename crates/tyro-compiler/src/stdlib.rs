//! Stdlib function signatures for the Tyro type checker.
//!
//! The runtime implementations live in `tyro-eval`; this registry only
//! describes the types the checker validates calls against. Polymorphic
//! parameters use [`Type::Any`].

use std::collections::HashMap;

use crate::ty::{FnSig, Type};

/// Registry of stdlib function signatures, keyed by (module, function).
pub struct StdlibRegistry {
    functions: HashMap<(&'static str, &'static str), FnSig>,
}

impl StdlibRegistry {
    /// Build the registry with every stdlib signature.
    pub fn new() -> Self {
        let mut functions = HashMap::new();

        let mut sig = |module: &'static str, name: &'static str, params: Vec<Type>, ret: Type| {
            functions.insert((module, name), FnSig { params, ret });
        };

        // ── math ──
        sig("math", "abs", vec![Type::Number], Type::Number);
        sig("math", "max", vec![Type::Number, Type::Number], Type::Number);
        sig("math", "min", vec![Type::Number, Type::Number], Type::Number);
        sig("math", "floor", vec![Type::Number], Type::Number);
        sig("math", "ceil", vec![Type::Number], Type::Number);
        sig("math", "round", vec![Type::Number], Type::Number);
        sig("math", "sqrt", vec![Type::Number], Type::Number);
        sig("math", "pow", vec![Type::Number, Type::Number], Type::Number);

        // ── string ──
        sig("string", "length", vec![Type::String], Type::Number);
        sig("string", "upper", vec![Type::String], Type::String);
        sig("string", "lower", vec![Type::String], Type::String);
        sig("string", "trim", vec![Type::String], Type::String);
        sig(
            "string",
            "contains",
            vec![Type::String, Type::String],
            Type::Bool,
        );
        sig(
            "string",
            "starts_with",
            vec![Type::String, Type::String],
            Type::Bool,
        );
        sig(
            "string",
            "ends_with",
            vec![Type::String, Type::String],
            Type::Bool,
        );
        sig(
            "string",
            "split",
            vec![Type::String, Type::String],
            Type::List(Box::new(Type::String)),
        );

        // ── list ──
        let any_list = || Type::List(Box::new(Type::Any));
        sig("list", "length", vec![any_list()], Type::Number);
        sig("list", "append", vec![any_list(), Type::Any], any_list());
        sig("list", "get", vec![any_list(), Type::Number], Type::Any);
        sig("list", "contains", vec![any_list(), Type::Any], Type::Bool);
        sig("list", "reverse", vec![any_list()], any_list());
        sig(
            "list",
            "range",
            vec![Type::Number, Type::Number],
            Type::List(Box::new(Type::Number)),
        );
        sig(
            "list",
            "sum",
            vec![Type::List(Box::new(Type::Number))],
            Type::Number,
        );
        sig(
            "list",
            "filter",
            vec![
                any_list(),
                Type::Function(vec![Type::Any], Box::new(Type::Bool)),
            ],
            any_list(),
        );
        sig(
            "list",
            "map",
            vec![
                any_list(),
                Type::Function(vec![Type::Any], Box::new(Type::Any)),
            ],
            any_list(),
        );

        // ── convert ──
        sig("convert", "to_string", vec![Type::Any], Type::String);

        Self { functions }
    }

    /// Look up a signature by module and function name.
    pub fn lookup<'a>(&'a self, module: &'a str, function: &'a str) -> Option<&'a FnSig> {
        self.functions.get(&(module, function))
    }
}

impl Default for StdlibRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures_resolve() {
        let registry = StdlibRegistry::new();
        assert!(registry.lookup("math", "max").is_some());
        assert!(registry.lookup("string", "upper").is_some());
        assert!(registry.lookup("list", "filter").is_some());
        assert!(registry.lookup("convert", "to_string").is_some());
    }

    #[test]
    fn test_unknown_signature_is_none() {
        let registry = StdlibRegistry::new();
        assert!(registry.lookup("math", "nope").is_none());
        assert!(registry.lookup("widgets", "max").is_none());
    }

    #[test]
    fn test_range_returns_number_list() {
        let registry = StdlibRegistry::new();
        let sig = registry.lookup("list", "range").unwrap();
        assert_eq!(sig.ret, Type::List(Box::new(Type::Number)));
    }
}
