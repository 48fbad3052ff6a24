//! Core expression and statement evaluator.

use std::collections::BTreeMap;
use std::rc::Rc;

use tyro_types::ast::*;

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::value::{Closure, FunctionValue, Value};

/// Default evaluation step budget.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

/// Maximum function call depth; keeps runaway recursion from exhausting
/// the host stack before the gas budget does.
const MAX_CALL_DEPTH: u32 = 256;

/// The core evaluator; walks AST nodes and produces Values.
///
/// Each instance is a fully isolated evaluation context.
pub struct Evaluator {
    /// Top-level bindings (`let`, `fn`, variant constructors).
    globals: BTreeMap<String, Value>,
    /// Local variable environment (scoped).
    env: Environment,
    /// Gas counter; limits total steps to prevent runaway evaluation.
    gas: u64,
    /// Gas limit.
    gas_limit: u64,
    /// Current function call depth.
    call_depth: u32,
}

impl Evaluator {
    /// Create a new evaluator with the given gas limit.
    pub fn new(gas_limit: u64) -> Self {
        Self {
            globals: BTreeMap::new(),
            env: Environment::new(),
            gas: 0,
            gas_limit,
            call_depth: 0,
        }
    }

    /// Consume one unit of gas. Returns error if exhausted.
    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        if self.gas > self.gas_limit {
            Err(EvalError::GasExhausted)
        } else {
            Ok(())
        }
    }

    /// Look up a global binding.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program loading
    // ══════════════════════════════════════════════════════════════════════

    /// Load a program's top-level declarations into the global scope.
    ///
    /// Functions and type constructors are registered first (they are
    /// hoisted, so a `let` initializer may call a function declared later
    /// in the file); `let` initializers then run in source order.
    pub fn load_program(&mut self, program: &Program) -> EvalResult<()> {
        for decl in &program.decls {
            match decl {
                Decl::Fn(fd) => {
                    let closure = Closure {
                        name: Some(fd.name.name.clone()),
                        params: fd.params.iter().map(|p| p.name.name.clone()).collect(),
                        body: fd.body.clone(),
                        captured: Environment::new(),
                    };
                    self.globals.insert(
                        fd.name.name.clone(),
                        Value::Function(FunctionValue::Closure(Rc::new(closure))),
                    );
                }
                Decl::Type(td) => self.register_type(td),
                Decl::Let(_) => {}
            }
        }

        for decl in &program.decls {
            if let Decl::Let(binding) = decl {
                let value = self.eval_expr(&binding.value)?;
                self.globals.insert(binding.name.name.clone(), value);
            }
        }

        Ok(())
    }

    /// Register a sum type's variant constructors as global values.
    fn register_type(&mut self, td: &TypeDecl) {
        if let TypeDeclBody::SumType(variants) = &td.body {
            for variant in variants {
                let value = if variant.params.is_empty() {
                    Value::Variant {
                        type_name: td.name.name.clone(),
                        variant: variant.name.name.clone(),
                        fields: Vec::new(),
                    }
                } else {
                    Value::Function(FunctionValue::Constructor {
                        type_name: td.name.name.clone(),
                        variant: variant.name.name.clone(),
                        arity: variant.params.len(),
                    })
                };
                self.globals.insert(variant.name.name.clone(), value);
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.tick()?;
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(s) => Ok(Value::String(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NilLit => Ok(Value::Nil),

            ExprKind::StringInterpolation(parts) => self.eval_string_interpolation(parts),
            ExprKind::ListLit(elems) => self.eval_list_literal(elems),
            ExprKind::RecordLit(fields) => self.eval_record_literal(fields),

            ExprKind::Identifier(name) => self.eval_identifier(name),

            ExprKind::Call { name, args } => self.eval_call(&name.name, args),
            ExprKind::QualifiedCall {
                module,
                function,
                args,
            } => {
                let mut arg_vals = Vec::with_capacity(args.len());
                for arg in args {
                    arg_vals.push(self.eval_expr(arg)?);
                }
                self.call_stdlib(&module.name, &function.name, arg_vals)
            }
            ExprKind::FieldAccess { object, field } => {
                self.eval_field_access(object, &field.name)
            }

            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),

            ExprKind::If(if_expr) => self.eval_if(if_expr),
            ExprKind::Match(match_expr) => self.eval_match(match_expr),
            ExprKind::Lambda(lambda) => self.eval_lambda(lambda),
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    // ── Literals ──────────────────────────────────────────────────────────

    fn eval_string_interpolation(&mut self, parts: &[StringPart]) -> EvalResult<Value> {
        let mut result = String::new();
        for part in parts {
            match part {
                StringPart::Literal(s) => result.push_str(s),
                StringPart::Expr(expr) => {
                    let val = self.eval_expr(expr)?;
                    result.push_str(&val.display_string());
                }
            }
        }
        Ok(Value::String(result))
    }

    fn eval_list_literal(&mut self, elems: &[Expr]) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(elems.len());
        for elem in elems {
            values.push(self.eval_expr(elem)?);
        }
        Ok(Value::List(values))
    }

    fn eval_record_literal(&mut self, fields: &[RecordFieldInit]) -> EvalResult<Value> {
        let mut record = BTreeMap::new();
        for field in fields {
            let value = self.eval_expr(&field.value)?;
            record.insert(field.name.name.clone(), value);
        }
        Ok(Value::Record(record))
    }

    // ── Identifiers & Calls ──────────────────────────────────────────────

    fn eval_identifier(&self, name: &str) -> EvalResult<Value> {
        self.env
            .get(name)
            .or_else(|| self.globals.get(name))
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    /// Evaluate an unqualified call: `func(args)`.
    fn eval_call(&mut self, name: &str, args: &[Expr]) -> EvalResult<Value> {
        let callee = self
            .env
            .get(name)
            .or_else(|| self.globals.get(name))
            .cloned()
            .ok_or_else(|| {
                EvalError::UnknownFunction(format!("unknown function '{name}'"))
            })?;

        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.eval_expr(arg)?);
        }
        self.call_function(&callee, arg_vals)
    }

    /// Call any callable value with already-evaluated arguments.
    pub fn call_function(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        match callee {
            Value::Function(FunctionValue::Closure(closure)) => {
                let closure = Rc::clone(closure);
                self.call_closure(&closure, args)
            }
            Value::Function(FunctionValue::Constructor {
                type_name,
                variant,
                arity,
            }) => {
                if args.len() != *arity {
                    return Err(EvalError::TypeMismatch(format!(
                        "variant '{variant}' expects {arity} arguments, got {}",
                        args.len()
                    )));
                }
                Ok(Value::Variant {
                    type_name: type_name.clone(),
                    variant: variant.clone(),
                    fields: args,
                })
            }
            other => Err(EvalError::TypeMismatch(format!(
                "cannot call a value of type {}",
                other.type_name()
            ))),
        }
    }

    fn call_closure(&mut self, closure: &Rc<Closure>, args: Vec<Value>) -> EvalResult<Value> {
        self.tick()?;
        if args.len() != closure.params.len() {
            let name = closure.name.as_deref().unwrap_or("function");
            return Err(EvalError::TypeMismatch(format!(
                "'{name}' expects {} arguments, got {}",
                closure.params.len(),
                args.len()
            )));
        }

        self.call_depth += 1;
        if self.call_depth > MAX_CALL_DEPTH {
            self.call_depth -= 1;
            return Err(EvalError::Runtime(
                "maximum call depth exceeded".to_string(),
            ));
        }

        // Fresh local environment: the closure's captured scopes plus a
        // parameter scope. Globals stay reachable through the fallback in
        // identifier lookup, which is what makes recursion work.
        let saved = std::mem::replace(&mut self.env, closure.captured.clone());
        self.env.push_scope();
        for (param, arg) in closure.params.iter().zip(args) {
            self.env.define(param, arg);
        }

        let result = match self.eval_block(&closure.body) {
            Ok(value) => Ok(value),
            Err(EvalError::Return(value)) => Ok(value),
            Err(e) => Err(e),
        };

        self.env = saved;
        self.call_depth -= 1;
        result
    }

    fn eval_field_access(&mut self, object: &Expr, field: &str) -> EvalResult<Value> {
        let obj = self.eval_expr(object)?;
        match &obj {
            Value::Record(fields) => fields.get(field).cloned().ok_or_else(|| {
                EvalError::Runtime(format!("record has no field '{field}'"))
            }),
            Value::Nil => Err(EvalError::Runtime(format!(
                "cannot access field '{field}' on nil"
            ))),
            _ => Err(EvalError::TypeMismatch(format!(
                "cannot access field '{field}' on {}",
                obj.type_name()
            ))),
        }
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        // Short-circuit for logical operators
        if op == BinOp::And {
            let lv = self.eval_expr(left)?;
            return if !lv.is_truthy() {
                Ok(Value::Bool(false))
            } else {
                let rv = self.eval_expr(right)?;
                Ok(Value::Bool(rv.is_truthy()))
            };
        }
        if op == BinOp::Or {
            let lv = self.eval_expr(left)?;
            return if lv.is_truthy() {
                Ok(Value::Bool(true))
            } else {
                let rv = self.eval_expr(right)?;
                Ok(Value::Bool(rv.is_truthy()))
            };
        }

        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        match op {
            BinOp::Add => self.eval_add(&lv, &rv),
            BinOp::Sub => self.eval_arith(&lv, &rv, |a, b| a - b, "-"),
            BinOp::Mul => self.eval_arith(&lv, &rv, |a, b| a * b, "*"),
            BinOp::Div => {
                if let (Value::Number(a), Value::Number(b)) = (&lv, &rv) {
                    if *b == 0.0 {
                        return Err(EvalError::ArithmeticTrap("division by zero".into()));
                    }
                    let result = a / b;
                    if result.is_nan() || result.is_infinite() {
                        return Err(EvalError::ArithmeticTrap(
                            "division produced NaN/Infinity".into(),
                        ));
                    }
                    Ok(Value::Number(result))
                } else {
                    Err(EvalError::TypeMismatch(format!(
                        "cannot divide {} by {}",
                        lv.type_name(),
                        rv.type_name()
                    )))
                }
            }
            BinOp::Mod => {
                if let (Value::Number(a), Value::Number(b)) = (&lv, &rv) {
                    if *b == 0.0 {
                        return Err(EvalError::ArithmeticTrap("modulo by zero".into()));
                    }
                    Ok(Value::Number(a % b))
                } else {
                    Err(EvalError::TypeMismatch(format!(
                        "cannot modulo {} by {}",
                        lv.type_name(),
                        rv.type_name()
                    )))
                }
            }
            BinOp::Eq => Ok(Value::Bool(lv.structural_eq(&rv))),
            BinOp::NotEq => Ok(Value::Bool(!lv.structural_eq(&rv))),
            BinOp::Less => self.eval_comparison(&lv, &rv, |o| o.is_lt(), "<"),
            BinOp::Greater => self.eval_comparison(&lv, &rv, |o| o.is_gt(), ">"),
            BinOp::LessEq => self.eval_comparison(&lv, &rv, |o| o.is_le(), "<="),
            BinOp::GreaterEq => self.eval_comparison(&lv, &rv, |o| o.is_ge(), ">="),
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn eval_add(&self, lv: &Value, rv: &Value) -> EvalResult<Value> {
        match (lv, rv) {
            (Value::Number(a), Value::Number(b)) => {
                let result = a + b;
                if result.is_nan() || result.is_infinite() {
                    Err(EvalError::ArithmeticTrap("addition overflowed".into()))
                } else {
                    Ok(Value::Number(result))
                }
            }
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
            _ => Err(EvalError::TypeMismatch(format!(
                "cannot add {} and {}",
                lv.type_name(),
                rv.type_name()
            ))),
        }
    }

    fn eval_arith(
        &self,
        lv: &Value,
        rv: &Value,
        f: impl Fn(f64, f64) -> f64,
        op: &str,
    ) -> EvalResult<Value> {
        if let (Value::Number(a), Value::Number(b)) = (lv, rv) {
            let result = f(*a, *b);
            if result.is_nan() || result.is_infinite() {
                Err(EvalError::ArithmeticTrap(format!(
                    "'{op}' produced NaN/Infinity"
                )))
            } else {
                Ok(Value::Number(result))
            }
        } else {
            Err(EvalError::TypeMismatch(format!(
                "cannot apply '{op}' to {} and {}",
                lv.type_name(),
                rv.type_name()
            )))
        }
    }

    fn eval_comparison(
        &self,
        lv: &Value,
        rv: &Value,
        f: impl Fn(std::cmp::Ordering) -> bool,
        op: &str,
    ) -> EvalResult<Value> {
        match (lv, rv) {
            (Value::Number(a), Value::Number(b)) => {
                let ordering = a.partial_cmp(b).ok_or_else(|| {
                    EvalError::ArithmeticTrap("comparison with NaN".into())
                })?;
                Ok(Value::Bool(f(ordering)))
            }
            (Value::String(a), Value::String(b)) => Ok(Value::Bool(f(a.cmp(b)))),
            _ => Err(EvalError::TypeMismatch(format!(
                "cannot apply '{op}' to {} and {}",
                lv.type_name(),
                rv.type_name()
            ))),
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> EvalResult<Value> {
        let value = self.eval_expr(operand)?;
        match op {
            UnaryOp::Neg => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(EvalError::TypeMismatch(format!(
                    "cannot negate {}",
                    other.type_name()
                ))),
            },
            UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
        }
    }

    // ── Control Flow ─────────────────────────────────────────────────────

    fn eval_if(&mut self, if_expr: &IfExpr) -> EvalResult<Value> {
        let cond = self.eval_expr(&if_expr.condition)?;
        if cond.is_truthy() {
            self.env.push_scope();
            let result = self.eval_block(&if_expr.then_block);
            self.env.pop_scope();
            result
        } else {
            match &if_expr.else_branch {
                Some(ElseBranch::ElseIf(elif)) => self.eval_if(elif),
                Some(ElseBranch::Block(block)) => {
                    self.env.push_scope();
                    let result = self.eval_block(block);
                    self.env.pop_scope();
                    result
                }
                None => Ok(Value::Nil),
            }
        }
    }

    fn eval_match(&mut self, m: &MatchExpr) -> EvalResult<Value> {
        let subject = self.eval_expr(&m.subject)?;

        for arm in &m.arms {
            match &arm.pattern {
                Pattern::Wildcard(_) => {
                    return self.eval_arm_body(&arm.body, Vec::new());
                }
                Pattern::Variant { name, bindings } => {
                    if let Value::Variant {
                        variant, fields, ..
                    } = &subject
                    {
                        if *variant == name.name {
                            let bound: Vec<(String, Value)> = bindings
                                .iter()
                                .map(|b| b.name.clone())
                                .zip(fields.iter().cloned())
                                .collect();
                            return self.eval_arm_body(&arm.body, bound);
                        }
                    }
                }
            }
        }

        Err(EvalError::Runtime(format!(
            "no match arm matched {}",
            subject.display_string()
        )))
    }

    fn eval_arm_body(
        &mut self,
        body: &MatchArmBody,
        bindings: Vec<(String, Value)>,
    ) -> EvalResult<Value> {
        self.env.push_scope();
        for (name, value) in bindings {
            self.env.define(&name, value);
        }
        let result = match body {
            MatchArmBody::Expr(e) => self.eval_expr(e),
            MatchArmBody::Block(b) => self.eval_block(b),
        };
        self.env.pop_scope();
        result
    }

    fn eval_lambda(&mut self, lambda: &LambdaExpr) -> EvalResult<Value> {
        let closure = Closure {
            name: None,
            params: lambda.params.iter().map(|p| p.name.name.clone()).collect(),
            body: lambda.body.clone(),
            captured: self.env.clone(),
        };
        Ok(Value::Function(FunctionValue::Closure(Rc::new(closure))))
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate a block; its value is the trailing expression statement's
    /// value, or nil.
    pub fn eval_block(&mut self, block: &Block) -> EvalResult<Value> {
        let mut last = Value::Nil;
        for stmt in &block.stmts {
            last = self.eval_stmt(stmt)?;
        }
        Ok(last)
    }

    /// Evaluate one statement; non-expression statements contribute nil.
    fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<Value> {
        self.tick()?;
        match stmt {
            Stmt::Let(binding) => {
                let value = self.eval_expr(&binding.value)?;
                self.env.define(&binding.name.name, value);
                Ok(Value::Nil)
            }

            Stmt::Assign(assign) => {
                let value = self.eval_expr(&assign.value)?;
                if self.env.set(&assign.target.name, value.clone()) {
                    return Ok(Value::Nil);
                }
                if self.globals.contains_key(&assign.target.name) {
                    self.globals.insert(assign.target.name.clone(), value);
                    return Ok(Value::Nil);
                }
                Err(EvalError::UndefinedVariable(assign.target.name.clone()))
            }

            Stmt::If(if_expr) => {
                self.eval_if(if_expr)?;
                Ok(Value::Nil)
            }

            Stmt::For(for_stmt) => {
                let iterable = self.eval_expr(&for_stmt.iterable)?;
                let items = match iterable {
                    Value::List(items) => items,
                    other => {
                        return Err(EvalError::TypeMismatch(format!(
                            "cannot loop over {}",
                            other.type_name()
                        )));
                    }
                };
                for item in items {
                    self.tick()?;
                    self.env.push_scope();
                    self.env.define(&for_stmt.item.name, item);
                    let result = self.eval_block(&for_stmt.body);
                    self.env.pop_scope();
                    result?;
                }
                Ok(Value::Nil)
            }

            Stmt::Match(m) => {
                self.eval_match(m)?;
                Ok(Value::Nil)
            }

            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Err(EvalError::Return(value))
            }

            Stmt::Expr(es) => self.eval_expr(&es.expr),
        }
    }
}
