//! Tyro type checker; walks a parsed AST and validates types.
//!
//! Entry point: [`TypeChecker::check`].
//!
//! Error codes emitted:
//! - E200: unknown type
//! - E201: type mismatch
//! - E202: wrong argument count
//! - E203: unknown name
//! - E204: not callable
//! - E205: unknown field
//! - E206: unknown stdlib function
//! - E207: missing return
//! - E208: non-bool condition
//! - E210: non-exhaustive match
//! - E211: not iterable
//! - E500: variable already declared
//! - E501: assignment to undeclared name

use std::collections::{HashMap, HashSet};

use tyro_types::ast::*;
use tyro_types::{CompileErrors, ErrorCode, SourceFile, Span, TyroError};

use crate::env::TypeEnv;
use crate::stdlib::StdlibRegistry;
use crate::ty::{SumVariant, Type};

// ══════════════════════════════════════════════════════════════════════════════
// TypeChecker
// ══════════════════════════════════════════════════════════════════════════════

/// Per-function checking context for return statements.
struct FnCtx {
    /// The declared return type, if the source annotated one.
    declared_ret: Option<Type>,
    /// Observed `return` value types (collected only when inferring).
    ret_types: Vec<(Type, Span)>,
}

/// Walks a parsed [`Program`] and validates all types.
pub struct TypeChecker<'a> {
    env: TypeEnv,
    errors: &'a mut CompileErrors,
    source: &'a SourceFile,
    stdlib: StdlibRegistry,
    /// User-defined sum types: name → variants.
    sum_types: HashMap<String, Vec<SumVariant>>,
    /// User-defined type aliases: name → resolved type.
    aliases: HashMap<String, Type>,
    /// Pre-registered function signatures: name → (params, ret).
    fn_sigs: HashMap<String, (Vec<Type>, Type)>,
    /// Stack of enclosing function/lambda contexts.
    fn_stack: Vec<FnCtx>,
}

impl<'a> TypeChecker<'a> {
    /// Create a new type checker.
    pub fn new(errors: &'a mut CompileErrors, source: &'a SourceFile) -> Self {
        Self {
            env: TypeEnv::new(),
            errors,
            source,
            stdlib: StdlibRegistry::new(),
            sum_types: HashMap::new(),
            aliases: HashMap::new(),
            fn_sigs: HashMap::new(),
            fn_stack: Vec::new(),
        }
    }

    /// Type-check a complete program.
    pub fn check(&mut self, program: &Program) {
        // 1. Register user-defined types
        for decl in &program.decls {
            if let Decl::Type(td) = decl {
                self.register_type_decl(td);
            }
        }

        // 2. Register function signatures; functions are hoisted, so a
        //    declaration may call one defined further down the file.
        for decl in &program.decls {
            if let Decl::Fn(fd) = decl {
                self.register_fn_decl(fd);
            }
        }

        // 3. Check declarations in source order
        for decl in &program.decls {
            match decl {
                Decl::Let(binding) => self.check_top_level_let(binding),
                Decl::Fn(fd) => self.check_fn_decl(fd),
                Decl::Type(_) => {}
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Registration
    // ══════════════════════════════════════════════════════════════════════

    fn register_type_decl(&mut self, td: &TypeDecl) {
        match &td.body {
            TypeDeclBody::SumType(variants) => {
                let sum_variants: Vec<SumVariant> = variants
                    .iter()
                    .map(|v| SumVariant {
                        name: v.name.name.clone(),
                        params: v
                            .params
                            .iter()
                            .map(|p| {
                                (
                                    p.name.name.clone(),
                                    self.resolve_type_annotation(&p.type_ann),
                                )
                            })
                            .collect(),
                    })
                    .collect();

                if self
                    .sum_types
                    .insert(td.name.name.clone(), sum_variants.clone())
                    .is_some()
                {
                    self.error(
                        ErrorCode::VARIABLE_ALREADY_DECLARED,
                        format!("type '{}' is already declared", td.name.name),
                        td.name.span,
                    );
                }

                let named_ty = Type::Named(td.name.name.clone());

                // Register each variant constructor as an identifier
                for variant in &sum_variants {
                    if variant.params.is_empty() {
                        // Unit variant: a value of the named type
                        self.env.define(&variant.name, named_ty.clone());
                    } else {
                        // Parameterised variant: constructor function
                        let param_types: Vec<Type> =
                            variant.params.iter().map(|(_, ty)| ty.clone()).collect();
                        self.env.define(
                            &variant.name,
                            Type::Function(param_types, Box::new(named_ty.clone())),
                        );
                    }
                }
            }
            TypeDeclBody::Alias(type_ann) => {
                let aliased = self.resolve_type_annotation(type_ann);
                self.aliases.insert(td.name.name.clone(), aliased);
            }
        }
    }

    fn register_fn_decl(&mut self, fd: &FnDecl) {
        let params: Vec<Type> = fd
            .params
            .iter()
            .map(|p| self.resolve_type_annotation(&p.type_ann))
            .collect();
        // No annotation → Unknown until the body is checked (declarations
        // are checked in order, so later callers see the inferred type).
        let ret = fd
            .ret
            .as_ref()
            .map(|ann| self.resolve_type_annotation(ann))
            .unwrap_or(Type::Unknown);

        self.fn_sigs
            .insert(fd.name.name.clone(), (params.clone(), ret.clone()));

        if !self
            .env
            .define(&fd.name.name, Type::Function(params, Box::new(ret)))
        {
            self.error(
                ErrorCode::VARIABLE_ALREADY_DECLARED,
                format!("'{}' is already declared", fd.name.name),
                fd.name.span,
            );
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Declarations
    // ══════════════════════════════════════════════════════════════════════

    fn check_top_level_let(&mut self, binding: &LetBinding) {
        let value_ty = self.check_expr(&binding.value);
        let ty = match &binding.type_ann {
            Some(ann) => {
                let declared = self.resolve_type_annotation(ann);
                if !value_ty.is_assignable_to(&declared) {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!("type mismatch: expected {declared}, found {value_ty}"),
                        binding.value.span,
                    );
                }
                declared
            }
            None => value_ty,
        };

        if !self.env.define(&binding.name.name, ty) {
            self.error(
                ErrorCode::VARIABLE_ALREADY_DECLARED,
                format!("'{}' is already declared", binding.name.name),
                binding.name.span,
            );
        }
    }

    fn check_fn_decl(&mut self, fd: &FnDecl) {
        let (param_tys, registered_ret) = self
            .fn_sigs
            .get(&fd.name.name)
            .cloned()
            .unwrap_or((Vec::new(), Type::Unknown));
        let declared_ret = fd.ret.as_ref().map(|_| registered_ret.clone());

        self.env.push_scope();
        for (param, ty) in fd.params.iter().zip(param_tys.iter()) {
            if !self.env.define(&param.name.name, ty.clone()) {
                self.error(
                    ErrorCode::VARIABLE_ALREADY_DECLARED,
                    format!("parameter '{}' already declared", param.name.name),
                    param.span,
                );
            }
        }

        self.fn_stack.push(FnCtx {
            declared_ret: declared_ret.clone(),
            ret_types: Vec::new(),
        });
        let trailing_ty = self.check_block_value(&fd.body);
        let ctx = self.fn_stack.pop().expect("fn context");
        self.env.pop_scope();

        let ret_ty = match declared_ret {
            Some(declared) => {
                let guaranteed = block_always_returns(&fd.body)
                    || trailing_ty.is_assignable_to(&declared);
                if declared != Type::Nil && !guaranteed {
                    self.error(
                        ErrorCode::MISSING_RETURN,
                        format!(
                            "not every path in '{}' returns a value of type {declared}",
                            fd.name.name
                        ),
                        fd.name.span,
                    );
                }
                declared
            }
            None => {
                // Infer from the first return statement, else the trailing value
                let inferred = ctx
                    .ret_types
                    .first()
                    .map(|(t, _)| t.clone())
                    .unwrap_or(trailing_ty);
                for (t, span) in ctx.ret_types.iter().skip(1) {
                    if !t.is_assignable_to(&inferred) && !inferred.is_assignable_to(t) {
                        self.error(
                            ErrorCode::TYPE_MISMATCH,
                            format!("inconsistent return types: {inferred} and {t}"),
                            *span,
                        );
                    }
                }
                inferred
            }
        };

        // Patch the signature so later declarations see the final type
        self.fn_sigs
            .insert(fd.name.name.clone(), (param_tys.clone(), ret_ty.clone()));
        self.env
            .redefine(&fd.name.name, Type::Function(param_tys, Box::new(ret_ty)));
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements & Blocks
    // ══════════════════════════════════════════════════════════════════════

    /// Check every statement in a block and return the block's value;
    /// the trailing expression statement's type, or `nil`.
    ///
    /// The caller manages the surrounding scope.
    fn check_block_value(&mut self, block: &Block) -> Type {
        let mut last = Type::Nil;
        for stmt in &block.stmts {
            last = self.check_stmt(stmt);
        }
        last
    }

    /// Check one statement; returns its value contribution to the block
    /// (non-expression statements contribute `nil`).
    fn check_stmt(&mut self, stmt: &Stmt) -> Type {
        match stmt {
            Stmt::Let(binding) => {
                let value_ty = self.check_expr(&binding.value);
                let ty = match &binding.type_ann {
                    Some(ann) => {
                        let declared = self.resolve_type_annotation(ann);
                        if !value_ty.is_assignable_to(&declared) {
                            self.error(
                                ErrorCode::TYPE_MISMATCH,
                                format!("type mismatch: expected {declared}, found {value_ty}"),
                                binding.value.span,
                            );
                        }
                        declared
                    }
                    None => value_ty,
                };
                if self.env.defined_in_current_scope(&binding.name.name) {
                    self.error(
                        ErrorCode::VARIABLE_ALREADY_DECLARED,
                        format!("'{}' is already declared", binding.name.name),
                        binding.name.span,
                    );
                } else {
                    self.env.define(&binding.name.name, ty);
                }
                Type::Nil
            }

            Stmt::Assign(assign) => {
                let value_ty = self.check_expr(&assign.value);
                match self.env.lookup(&assign.target.name).cloned() {
                    Some(target_ty) => {
                        if !value_ty.is_assignable_to(&target_ty) {
                            self.error(
                                ErrorCode::TYPE_MISMATCH,
                                format!("type mismatch: expected {target_ty}, found {value_ty}"),
                                assign.value.span,
                            );
                        }
                    }
                    None => {
                        self.error(
                            ErrorCode::ASSIGN_UNDECLARED,
                            format!("cannot assign to undeclared name '{}'", assign.target.name),
                            assign.target.span,
                        );
                    }
                }
                Type::Nil
            }

            Stmt::If(if_expr) => {
                self.check_if_branches(if_expr);
                Type::Nil
            }

            Stmt::For(for_stmt) => {
                let iter_ty = self.check_expr(&for_stmt.iterable);
                let item_ty = match iter_ty {
                    Type::List(inner) => *inner,
                    Type::Any | Type::Unknown => Type::Unknown,
                    other => {
                        self.error(
                            ErrorCode::NOT_ITERABLE,
                            format!("cannot loop over {other}; expected a list"),
                            for_stmt.iterable.span,
                        );
                        Type::Unknown
                    }
                };
                self.env.push_scope();
                self.env.define(&for_stmt.item.name, item_ty);
                self.check_block_value(&for_stmt.body);
                self.env.pop_scope();
                Type::Nil
            }

            Stmt::Match(match_expr) => {
                self.check_match(match_expr, false);
                Type::Nil
            }

            Stmt::Return(ret) => {
                let value_ty = ret
                    .value
                    .as_ref()
                    .map(|v| self.check_expr(v))
                    .unwrap_or(Type::Nil);
                let declared = self.fn_stack.last().map(|ctx| ctx.declared_ret.clone());
                match declared {
                    Some(Some(declared)) => {
                        if !value_ty.is_assignable_to(&declared) {
                            self.error(
                                ErrorCode::TYPE_MISMATCH,
                                format!("type mismatch: expected {declared}, found {value_ty}"),
                                ret.span,
                            );
                        }
                    }
                    Some(None) => {
                        self.fn_stack
                            .last_mut()
                            .expect("fn context")
                            .ret_types
                            .push((value_ty, ret.span));
                    }
                    None => {
                        self.error(
                            ErrorCode::UNEXPECTED_TOKEN,
                            "'return' outside of a function",
                            ret.span,
                        );
                    }
                }
                Type::Nil
            }

            Stmt::Expr(es) => self.check_expr(&es.expr),
        }
    }

    /// Check an if statement's condition and branch blocks (values unused).
    fn check_if_branches(&mut self, if_expr: &IfExpr) {
        let cond_ty = self.check_expr(&if_expr.condition);
        if !cond_ty.is_bool() {
            self.error(
                ErrorCode::CONDITION_NOT_BOOL,
                format!("the condition of 'if' must be bool, got {cond_ty}"),
                if_expr.condition.span,
            );
        }

        self.env.push_scope();
        self.check_block_value(&if_expr.then_block);
        self.env.pop_scope();

        match &if_expr.else_branch {
            Some(ElseBranch::ElseIf(elif)) => self.check_if_branches(elif),
            Some(ElseBranch::Block(block)) => {
                self.env.push_scope();
                self.check_block_value(block);
                self.env.pop_scope();
            }
            None => {}
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    fn check_expr(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::NumberLit(_) => Type::Number,
            ExprKind::StringLit(_) => Type::String,
            ExprKind::BoolLit(_) => Type::Bool,
            ExprKind::NilLit => Type::Nil,

            ExprKind::StringInterpolation(parts) => {
                // Any value can be interpolated; it is rendered via its
                // display form.
                for part in parts {
                    if let StringPart::Expr(e) = part {
                        self.check_expr(e);
                    }
                }
                Type::String
            }

            ExprKind::ListLit(elems) => {
                if elems.is_empty() {
                    return Type::List(Box::new(Type::Any));
                }
                let first_ty = self.check_expr(&elems[0]);
                for elem in elems.iter().skip(1) {
                    let ty = self.check_expr(elem);
                    if !ty.is_assignable_to(&first_ty) {
                        self.error(
                            ErrorCode::TYPE_MISMATCH,
                            format!("list elements must all be {first_ty}, found {ty}"),
                            elem.span,
                        );
                    }
                }
                Type::List(Box::new(first_ty))
            }

            ExprKind::RecordLit(fields) => {
                let record_fields = fields
                    .iter()
                    .map(|f| crate::ty::RecordField {
                        name: f.name.name.clone(),
                        ty: self.check_expr(&f.value),
                    })
                    .collect();
                Type::Record(record_fields)
            }

            ExprKind::Identifier(name) => match self.env.lookup(name) {
                Some(ty) => ty.clone(),
                None => {
                    self.error(
                        ErrorCode::UNKNOWN_NAME,
                        format!("unknown name '{name}'"),
                        expr.span,
                    );
                    Type::Unknown
                }
            },

            ExprKind::Call { name, args } => self.check_call(name, args, expr.span),

            ExprKind::QualifiedCall {
                module,
                function,
                args,
            } => self.check_qualified_call(module, function, args, expr.span),

            ExprKind::FieldAccess { object, field } => {
                let obj_ty = self.check_expr(object);
                match obj_ty {
                    Type::Record(fields) => fields
                        .iter()
                        .find(|f| f.name == field.name)
                        .map(|f| f.ty.clone())
                        .unwrap_or_else(|| {
                            self.error(
                                ErrorCode::UNKNOWN_FIELD,
                                format!("the record has no field '{}'", field.name),
                                field.span,
                            );
                            Type::Unknown
                        }),
                    Type::Any | Type::Unknown => Type::Unknown,
                    other => {
                        self.error(
                            ErrorCode::UNKNOWN_FIELD,
                            format!("cannot access field '{}' on {other}", field.name),
                            field.span,
                        );
                        Type::Unknown
                    }
                }
            }

            ExprKind::Binary { left, op, right } => self.check_binary(left, *op, right),

            ExprKind::Unary { op, operand } => {
                let ty = self.check_expr(operand);
                match op {
                    UnaryOp::Neg => {
                        if !ty.is_numeric() {
                            self.error(
                                ErrorCode::TYPE_MISMATCH,
                                format!("cannot apply '-' to {ty}"),
                                operand.span,
                            );
                        }
                        Type::Number
                    }
                    UnaryOp::Not => {
                        if !ty.is_bool() {
                            self.error(
                                ErrorCode::TYPE_MISMATCH,
                                format!("cannot apply 'not' to {ty}"),
                                operand.span,
                            );
                        }
                        Type::Bool
                    }
                }
            }

            ExprKind::If(if_expr) => self.check_if_value(if_expr),

            ExprKind::Match(match_expr) => self.check_match(match_expr, true),

            ExprKind::Lambda(lambda) => self.check_lambda(lambda),

            ExprKind::Paren(inner) => self.check_expr(inner),
        }
    }

    fn check_call(&mut self, name: &Ident, args: &[Expr], span: Span) -> Type {
        let callee = self.env.lookup(&name.name).cloned();
        match callee {
            Some(Type::Function(params, ret)) => {
                if args.len() != params.len() {
                    self.error(
                        ErrorCode::WRONG_ARG_COUNT,
                        format!(
                            "wrong argument count: '{}' expects {} arguments, got {}",
                            name.name,
                            params.len(),
                            args.len()
                        ),
                        span,
                    );
                }
                for (arg, pty) in args.iter().zip(params.iter()) {
                    let aty = self.check_expr(arg);
                    if !aty.is_assignable_to(pty) {
                        self.error(
                            ErrorCode::TYPE_MISMATCH,
                            format!("type mismatch: expected {pty}, found {aty}"),
                            arg.span,
                        );
                    }
                }
                for arg in args.iter().skip(params.len()) {
                    self.check_expr(arg);
                }
                *ret
            }
            Some(Type::Any) | Some(Type::Unknown) => {
                for arg in args {
                    self.check_expr(arg);
                }
                Type::Unknown
            }
            Some(other) => {
                for arg in args {
                    self.check_expr(arg);
                }
                self.error(
                    ErrorCode::NOT_CALLABLE,
                    format!("'{}' is not callable; it has type {other}", name.name),
                    name.span,
                );
                Type::Unknown
            }
            None => {
                for arg in args {
                    self.check_expr(arg);
                }
                self.error(
                    ErrorCode::UNKNOWN_NAME,
                    format!("unknown name '{}'", name.name),
                    name.span,
                );
                Type::Unknown
            }
        }
    }

    fn check_qualified_call(
        &mut self,
        module: &Ident,
        function: &Ident,
        args: &[Expr],
        span: Span,
    ) -> Type {
        match self.stdlib.lookup(&module.name, &function.name).cloned() {
            Some(sig) => {
                if args.len() != sig.params.len() {
                    self.error(
                        ErrorCode::WRONG_ARG_COUNT,
                        format!(
                            "wrong argument count: '{}.{}' expects {} arguments, got {}",
                            module.name,
                            function.name,
                            sig.params.len(),
                            args.len()
                        ),
                        span,
                    );
                }
                for (arg, pty) in args.iter().zip(sig.params.iter()) {
                    let aty = self.check_expr(arg);
                    if !aty.is_assignable_to(pty) {
                        self.error(
                            ErrorCode::TYPE_MISMATCH,
                            format!("type mismatch: expected {pty}, found {aty}"),
                            arg.span,
                        );
                    }
                }
                for arg in args.iter().skip(sig.params.len()) {
                    self.check_expr(arg);
                }
                sig.ret
            }
            None => {
                for arg in args {
                    self.check_expr(arg);
                }
                self.error(
                    ErrorCode::UNKNOWN_FUNCTION,
                    format!("unknown function '{}.{}'", module.name, function.name),
                    span,
                );
                Type::Unknown
            }
        }
    }

    fn check_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> Type {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        let span = left.span.merge(right.span);

        match op {
            BinOp::Add => {
                if lt.is_numeric() && rt.is_numeric() {
                    Type::Number
                } else if lt.is_string() && rt.is_string() {
                    Type::String
                } else {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!("cannot apply '+' to {lt} and {rt}"),
                        span,
                    );
                    Type::Unknown
                }
            }
            BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                if !(lt.is_numeric() && rt.is_numeric()) {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!("cannot apply '{}' to {lt} and {rt}", op.as_str()),
                        span,
                    );
                }
                Type::Number
            }
            BinOp::Less | BinOp::Greater | BinOp::LessEq | BinOp::GreaterEq => {
                let ok = (lt.is_numeric() && rt.is_numeric())
                    || (lt.is_string() && rt.is_string());
                if !ok {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!("cannot apply '{}' to {lt} and {rt}", op.as_str()),
                        span,
                    );
                }
                Type::Bool
            }
            BinOp::Eq | BinOp::NotEq => {
                if !lt.is_assignable_to(&rt) && !rt.is_assignable_to(&lt) {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!("cannot compare {lt} with {rt}"),
                        span,
                    );
                }
                Type::Bool
            }
            BinOp::And | BinOp::Or => {
                if !(lt.is_bool() && rt.is_bool()) {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!(
                            "operands of '{}' must be bool, got {lt} and {rt}",
                            op.as_str()
                        ),
                        span,
                    );
                }
                Type::Bool
            }
        }
    }

    /// Check an `if` used as a value: both branches must agree on a type.
    fn check_if_value(&mut self, if_expr: &IfExpr) -> Type {
        let cond_ty = self.check_expr(&if_expr.condition);
        if !cond_ty.is_bool() {
            self.error(
                ErrorCode::CONDITION_NOT_BOOL,
                format!("the condition of 'if' must be bool, got {cond_ty}"),
                if_expr.condition.span,
            );
        }

        self.env.push_scope();
        let then_ty = self.check_block_value(&if_expr.then_block);
        self.env.pop_scope();

        let else_ty = match &if_expr.else_branch {
            Some(ElseBranch::ElseIf(elif)) => Some(self.check_if_value(elif)),
            Some(ElseBranch::Block(block)) => {
                self.env.push_scope();
                let ty = self.check_block_value(block);
                self.env.pop_scope();
                Some(ty)
            }
            None => None,
        };

        match else_ty {
            Some(else_ty) => {
                if !else_ty.is_assignable_to(&then_ty) && !then_ty.is_assignable_to(&else_ty) {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!("if branches have different types: {then_ty} and {else_ty}"),
                        if_expr.span,
                    );
                }
                then_ty
            }
            None => {
                self.error(
                    ErrorCode::TYPE_MISMATCH,
                    "an if used as a value needs an else branch",
                    if_expr.span,
                );
                then_ty
            }
        }
    }

    /// Check a match; when `as_value` is true the arm types must unify.
    fn check_match(&mut self, m: &MatchExpr, as_value: bool) -> Type {
        let subject_ty = self.check_expr(&m.subject);
        let resolved = self.resolve_to_sum(&subject_ty);

        if resolved.is_none() && !matches!(subject_ty, Type::Unknown | Type::Any) {
            self.error(
                ErrorCode::TYPE_MISMATCH,
                format!("match subject must be a sum type value, got {subject_ty}"),
                m.subject.span,
            );
        }

        let mut covered: HashSet<String> = HashSet::new();
        let mut has_wildcard = false;
        let mut arm_tys: Vec<(Type, Span)> = Vec::new();

        for arm in &m.arms {
            self.env.push_scope();

            match &arm.pattern {
                Pattern::Wildcard(_) => has_wildcard = true,
                Pattern::Variant { name, bindings } => {
                    let variant = resolved
                        .as_ref()
                        .and_then(|(_, vs)| vs.iter().find(|v| v.name == name.name).cloned());
                    match variant {
                        Some(v) => {
                            covered.insert(v.name.clone());
                            if bindings.len() != v.params.len() {
                                self.error(
                                    ErrorCode::WRONG_ARG_COUNT,
                                    format!(
                                        "variant '{}' has {} fields, pattern binds {}",
                                        v.name,
                                        v.params.len(),
                                        bindings.len()
                                    ),
                                    name.span,
                                );
                            }
                            for (binding, (_, pty)) in bindings.iter().zip(v.params.iter()) {
                                self.env.define(&binding.name, pty.clone());
                            }
                            for binding in bindings.iter().skip(v.params.len()) {
                                self.env.define(&binding.name, Type::Unknown);
                            }
                        }
                        None => {
                            if let Some((type_name, _)) = &resolved {
                                self.error(
                                    ErrorCode::UNKNOWN_NAME,
                                    format!(
                                        "unknown variant '{}' of type {type_name}",
                                        name.name
                                    ),
                                    name.span,
                                );
                            }
                            for binding in bindings {
                                self.env.define(&binding.name, Type::Unknown);
                            }
                        }
                    }
                }
            }

            let arm_ty = match &arm.body {
                MatchArmBody::Expr(e) => self.check_expr(e),
                MatchArmBody::Block(b) => self.check_block_value(b),
            };
            arm_tys.push((arm_ty, arm.span));
            self.env.pop_scope();
        }

        if let Some((type_name, variants)) = &resolved {
            if !has_wildcard {
                let missing: Vec<String> = variants
                    .iter()
                    .filter(|v| !covered.contains(&v.name))
                    .map(|v| v.name.clone())
                    .collect();
                if !missing.is_empty() {
                    self.error(
                        ErrorCode::NON_EXHAUSTIVE_MATCH,
                        format!(
                            "match on {type_name} doesn't cover: {}",
                            missing.join(", ")
                        ),
                        m.span,
                    );
                }
            }
        }

        if as_value {
            let first = arm_tys
                .first()
                .map(|(t, _)| t.clone())
                .unwrap_or(Type::Unknown);
            for (t, span) in arm_tys.iter().skip(1) {
                if !t.is_assignable_to(&first) && !first.is_assignable_to(t) {
                    self.error(
                        ErrorCode::TYPE_MISMATCH,
                        format!("match arms have different types: {first} and {t}"),
                        *span,
                    );
                }
            }
            first
        } else {
            Type::Nil
        }
    }

    fn check_lambda(&mut self, lambda: &LambdaExpr) -> Type {
        let param_tys: Vec<Type> = lambda
            .params
            .iter()
            .map(|p| self.resolve_type_annotation(&p.type_ann))
            .collect();

        self.env.push_scope();
        for (param, ty) in lambda.params.iter().zip(param_tys.iter()) {
            if !self.env.define(&param.name.name, ty.clone()) {
                self.error(
                    ErrorCode::VARIABLE_ALREADY_DECLARED,
                    format!("parameter '{}' already declared", param.name.name),
                    param.span,
                );
            }
        }

        self.fn_stack.push(FnCtx {
            declared_ret: None,
            ret_types: Vec::new(),
        });
        let trailing = self.check_block_value(&lambda.body);
        let ctx = self.fn_stack.pop().expect("fn context");
        self.env.pop_scope();

        let ret = ctx
            .ret_types
            .first()
            .map(|(t, _)| t.clone())
            .unwrap_or(trailing);
        Type::Function(param_tys, Box::new(ret))
    }

    // ══════════════════════════════════════════════════════════════════════
    // Type resolution & helpers
    // ══════════════════════════════════════════════════════════════════════

    /// Convert a syntactic annotation into a semantic type.
    fn resolve_type_annotation(&mut self, ann: &TypeAnnotation) -> Type {
        match &ann.kind {
            TypeKind::Number => Type::Number,
            TypeKind::String => Type::String,
            TypeKind::Bool => Type::Bool,
            TypeKind::Nil => Type::Nil,
            TypeKind::List(inner) => {
                Type::List(Box::new(self.resolve_type_annotation(inner)))
            }
            TypeKind::Record(fields) => Type::Record(
                fields
                    .iter()
                    .map(|f| crate::ty::RecordField {
                        name: f.name.name.clone(),
                        ty: self.resolve_type_annotation(&f.type_ann),
                    })
                    .collect(),
            ),
            TypeKind::Function { params, ret } => Type::Function(
                params
                    .iter()
                    .map(|p| self.resolve_type_annotation(p))
                    .collect(),
                Box::new(self.resolve_type_annotation(ret)),
            ),
            TypeKind::Named(name) => {
                if self.sum_types.contains_key(name) {
                    Type::Named(name.clone())
                } else if let Some(aliased) = self.aliases.get(name) {
                    aliased.clone()
                } else {
                    self.error(
                        ErrorCode::UNKNOWN_TYPE,
                        format!("unknown type '{name}'"),
                        ann.span,
                    );
                    Type::Unknown
                }
            }
        }
    }

    /// Resolve a semantic type to a sum type definition, if it is one.
    fn resolve_to_sum(&self, ty: &Type) -> Option<(String, Vec<SumVariant>)> {
        match ty {
            Type::SumType { name, variants } => Some((name.clone(), variants.clone())),
            Type::Named(name) => self
                .sum_types
                .get(name)
                .map(|vs| (name.clone(), vs.clone())),
            _ => None,
        }
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self
            .source
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        self.errors.push_error(TyroError::new(
            &self.source.name,
            code,
            message,
            span,
            source_line,
        ));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Return-path analysis
// ══════════════════════════════════════════════════════════════════════════════

/// Does this block unconditionally return on every path?
fn block_always_returns(block: &Block) -> bool {
    block.stmts.iter().any(stmt_always_returns)
}

fn stmt_always_returns(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) => true,
        Stmt::If(if_expr) => if_always_returns(if_expr),
        Stmt::Match(m) => m.arms.iter().all(|arm| match &arm.body {
            MatchArmBody::Block(b) => block_always_returns(b),
            MatchArmBody::Expr(_) => false,
        }),
        _ => false,
    }
}

fn if_always_returns(if_expr: &IfExpr) -> bool {
    if !block_always_returns(&if_expr.then_block) {
        return false;
    }
    match &if_expr.else_branch {
        Some(ElseBranch::ElseIf(elif)) => if_always_returns(elif),
        Some(ElseBranch::Block(block)) => block_always_returns(block),
        None => false,
    }
}
