//! Internal type representation for the Tyro type checker.
//!
//! [`Type`] is the semantic type used during type checking.
//! It is distinct from [`tyro_types::ast::TypeAnnotation`], which is the
//! syntactic representation produced by the parser.

use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Type
// ══════════════════════════════════════════════════════════════════════════════

/// A semantic type in Tyro.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    // ── Primitives ──
    Number,
    String,
    Bool,
    Nil,

    // ── Special ──
    /// Internal type for polymorphic stdlib parameters. Not writable in
    /// user code.
    Any,
    /// Type could not be determined (error recovery).
    Unknown,

    // ── Composites ──
    /// `list<T>`
    List(Box<Type>),
    /// `{ field: Type, ... }`; structural record.
    Record(Vec<RecordField>),
    /// `(T1, T2, ...) -> R`
    Function(Vec<Type>, Box<Type>),

    // ── User-Defined ──
    /// A sum type declared with `type Name = | Variant1 | Variant2(...)`.
    SumType {
        name: std::string::String,
        variants: Vec<SumVariant>,
    },
    /// A reference to a user-defined type name (resolved during checking).
    Named(std::string::String),
}

/// A field in a structural record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: std::string::String,
    pub ty: Type,
}

/// A variant in a sum type.
#[derive(Debug, Clone, PartialEq)]
pub struct SumVariant {
    pub name: std::string::String,
    pub params: Vec<(std::string::String, Type)>,
}

/// A function signature entry (for stdlib and user calls).
#[derive(Debug, Clone)]
pub struct FnSig {
    pub params: Vec<Type>,
    pub ret: Type,
}

impl Type {
    /// Check if this type is assignable to `target`.
    ///
    /// Rules:
    /// - Same type → yes
    /// - `Any` accepts and provides everything (stdlib polymorphism)
    /// - `Unknown` is compatible with anything (error recovery)
    /// - Lists are covariant (simplified)
    /// - Records use structural subtyping
    /// - Functions are contravariant in parameters, covariant in return
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        // Unknown (from error recovery) is compatible with anything
        if matches!(self, Type::Unknown) || matches!(target, Type::Unknown) {
            return true;
        }
        // Any accepts/provides anything
        if matches!(target, Type::Any) || matches!(self, Type::Any) {
            return true;
        }
        // List covariance (simplified)
        if let (Type::List(a), Type::List(b)) = (self, target) {
            return a.is_assignable_to(b);
        }
        // Named types resolve to the same name
        if let (Type::Named(a), Type::Named(b)) = (self, target) {
            return a == b;
        }
        // SumType matches Named
        if let (Type::SumType { name, .. }, Type::Named(n)) = (self, target) {
            return name == n;
        }
        if let (Type::Named(n), Type::SumType { name, .. }) = (self, target) {
            return n == name;
        }
        // Record structural subtyping: source has all fields of target
        if let (Type::Record(src_fields), Type::Record(tgt_fields)) = (self, target) {
            return tgt_fields.iter().all(|tf| {
                src_fields
                    .iter()
                    .find(|sf| sf.name == tf.name)
                    .is_some_and(|sf| sf.ty.is_assignable_to(&tf.ty))
            });
        }
        // Function types: covariant return, contravariant parameters
        if let (Type::Function(self_params, self_ret), Type::Function(tgt_params, tgt_ret)) =
            (self, target)
        {
            if self_params.len() != tgt_params.len() {
                return false;
            }
            // Contravariant: target params must be assignable to self params
            let params_ok = self_params
                .iter()
                .zip(tgt_params.iter())
                .all(|(sp, tp)| tp.is_assignable_to(sp));
            return params_ok && self_ret.is_assignable_to(tgt_ret);
        }
        false
    }

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Number | Type::Any | Type::Unknown)
    }

    /// Returns true if this type is boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool | Type::Any | Type::Unknown)
    }

    /// Returns true if this type is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, Type::String | Type::Any | Type::Unknown)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Display
// ══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Number => write!(f, "number"),
            Type::String => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Nil => write!(f, "nil"),
            Type::Any => write!(f, "any"),
            Type::Unknown => write!(f, "unknown"),
            Type::List(inner) => write!(f, "list<{}>", inner),
            Type::Record(fields) => {
                write!(f, "{{ ")?;
                for (i, rf) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", rf.name, rf.ty)?;
                }
                write!(f, " }}")
            }
            Type::Function(params, ret) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", ret)
            }
            Type::SumType { name, .. } => write!(f, "{}", name),
            Type::Named(name) => write!(f, "{}", name),
        }
    }
}
