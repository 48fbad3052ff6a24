//! Type environment with lexically scoped bindings.
//!
//! [`TypeEnv`] manages a stack of scopes, each carrying variable bindings.

use std::collections::HashMap;

use crate::ty::Type;

/// A single scope level.
#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, Type>,
}

/// A stack of scopes for name resolution and type tracking.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<Scope>,
}

impl TypeEnv {
    /// Create a new type environment with an initial top-level scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Push a new scope onto the stack.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the top scope off the stack.
    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot pop the root scope");
        self.scopes.pop();
    }

    /// Define a binding in the current (top) scope.
    /// Returns `false` if the name is already defined in the current scope
    /// (variable shadowing check).
    pub fn define(&mut self, name: &str, ty: Type) -> bool {
        let scope = self.scopes.last_mut().expect("no scope");
        if scope.bindings.contains_key(name) {
            return false;
        }
        scope.bindings.insert(name.to_string(), ty);
        true
    }

    /// Overwrite a binding in the scope where it is defined (used to patch
    /// an inferred function signature after its body was checked).
    pub fn redefine(&mut self, name: &str, ty: Type) {
        for scope in self.scopes.iter_mut().rev() {
            if scope.bindings.contains_key(name) {
                scope.bindings.insert(name.to_string(), ty);
                return;
            }
        }
    }

    /// Look up a binding by name, searching from innermost to outermost scope.
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        for scope in self.scopes.iter().rev() {
            if let Some(ty) = scope.bindings.get(name) {
                return Some(ty);
            }
        }
        None
    }

    /// Check if a name is defined in the **current** (innermost) scope only.
    pub fn defined_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|s| s.bindings.contains_key(name))
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
