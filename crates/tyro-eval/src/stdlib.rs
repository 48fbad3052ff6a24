//! Native stdlib implementations, dispatched by (module, function).
//!
//! Signatures live in `tyro-compiler`'s registry; the evaluator only sees
//! already-evaluated argument values. `list.filter` and `list.map` call
//! back into the evaluator to run the supplied function value.

use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::value::Value;

/// Upper bound for `list.range`, so a bad call can't eat all memory.
const MAX_RANGE_LEN: usize = 100_000;

impl Evaluator {
    /// Dispatch a qualified stdlib call.
    pub(crate) fn call_stdlib(
        &mut self,
        module: &str,
        function: &str,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        match (module, function) {
            // ── math ──
            ("math", "abs") => Ok(Value::Number(number_arg(&args, 0, "math.abs")?.abs())),
            ("math", "max") => Ok(Value::Number(
                number_arg(&args, 0, "math.max")?.max(number_arg(&args, 1, "math.max")?),
            )),
            ("math", "min") => Ok(Value::Number(
                number_arg(&args, 0, "math.min")?.min(number_arg(&args, 1, "math.min")?),
            )),
            ("math", "floor") => Ok(Value::Number(number_arg(&args, 0, "math.floor")?.floor())),
            ("math", "ceil") => Ok(Value::Number(number_arg(&args, 0, "math.ceil")?.ceil())),
            ("math", "round") => Ok(Value::Number(number_arg(&args, 0, "math.round")?.round())),
            ("math", "sqrt") => {
                let n = number_arg(&args, 0, "math.sqrt")?;
                if n < 0.0 {
                    return Err(EvalError::ArithmeticTrap(
                        "sqrt of a negative number".into(),
                    ));
                }
                Ok(Value::Number(n.sqrt()))
            }
            ("math", "pow") => {
                let base = number_arg(&args, 0, "math.pow")?;
                let exp = number_arg(&args, 1, "math.pow")?;
                let result = base.powf(exp);
                if result.is_nan() || result.is_infinite() {
                    return Err(EvalError::ArithmeticTrap(
                        "pow produced NaN/Infinity".into(),
                    ));
                }
                Ok(Value::Number(result))
            }

            // ── string ──
            ("string", "length") => Ok(Value::Number(
                string_arg(&args, 0, "string.length")?.chars().count() as f64,
            )),
            ("string", "upper") => Ok(Value::String(
                string_arg(&args, 0, "string.upper")?.to_uppercase(),
            )),
            ("string", "lower") => Ok(Value::String(
                string_arg(&args, 0, "string.lower")?.to_lowercase(),
            )),
            ("string", "trim") => Ok(Value::String(
                string_arg(&args, 0, "string.trim")?.trim().to_string(),
            )),
            ("string", "contains") => {
                let haystack = string_arg(&args, 0, "string.contains")?;
                let needle = string_arg(&args, 1, "string.contains")?;
                Ok(Value::Bool(haystack.contains(&needle)))
            }
            ("string", "starts_with") => {
                let haystack = string_arg(&args, 0, "string.starts_with")?;
                let prefix = string_arg(&args, 1, "string.starts_with")?;
                Ok(Value::Bool(haystack.starts_with(&prefix)))
            }
            ("string", "ends_with") => {
                let haystack = string_arg(&args, 0, "string.ends_with")?;
                let suffix = string_arg(&args, 1, "string.ends_with")?;
                Ok(Value::Bool(haystack.ends_with(&suffix)))
            }
            ("string", "split") => {
                let text = string_arg(&args, 0, "string.split")?;
                let sep = string_arg(&args, 1, "string.split")?;
                let parts: Vec<Value> = if sep.is_empty() {
                    text.chars()
                        .map(|c| Value::String(c.to_string()))
                        .collect()
                } else {
                    text.split(&sep)
                        .map(|s| Value::String(s.to_string()))
                        .collect()
                };
                Ok(Value::List(parts))
            }

            // ── list ──
            ("list", "length") => Ok(Value::Number(
                list_arg(&args, 0, "list.length")?.len() as f64,
            )),
            ("list", "append") => {
                let mut items = list_arg(&args, 0, "list.append")?;
                let item = arg(&args, 1, "list.append")?;
                items.push(item);
                Ok(Value::List(items))
            }
            ("list", "get") => {
                let items = list_arg(&args, 0, "list.get")?;
                let index = number_arg(&args, 1, "list.get")?;
                if index < 0.0 || index.fract() != 0.0 || index as usize >= items.len() {
                    return Err(EvalError::IndexOutOfBounds(format!(
                        "index {} is outside a list of {} elements",
                        Value::Number(index).display_string(),
                        items.len()
                    )));
                }
                Ok(items[index as usize].clone())
            }
            ("list", "contains") => {
                let items = list_arg(&args, 0, "list.contains")?;
                let needle = arg(&args, 1, "list.contains")?;
                Ok(Value::Bool(items.iter().any(|v| v.structural_eq(&needle))))
            }
            ("list", "reverse") => {
                let mut items = list_arg(&args, 0, "list.reverse")?;
                items.reverse();
                Ok(Value::List(items))
            }
            ("list", "range") => {
                let start = number_arg(&args, 0, "list.range")?;
                let end = number_arg(&args, 1, "list.range")?;
                if !start.is_finite() || !end.is_finite() {
                    return Err(EvalError::ArithmeticTrap(
                        "range bounds must be finite".into(),
                    ));
                }
                let len = (end - start).max(0.0);
                if len as usize > MAX_RANGE_LEN {
                    return Err(EvalError::StdlibError(format!(
                        "list.range is limited to {MAX_RANGE_LEN} elements"
                    )));
                }
                let mut items = Vec::new();
                let mut n = start;
                while n < end {
                    items.push(Value::Number(n));
                    n += 1.0;
                }
                Ok(Value::List(items))
            }
            ("list", "sum") => {
                let items = list_arg(&args, 0, "list.sum")?;
                let mut total = 0.0;
                for item in &items {
                    match item {
                        Value::Number(n) => total += n,
                        other => {
                            return Err(EvalError::TypeMismatch(format!(
                                "list.sum needs numbers, found {}",
                                other.type_name()
                            )));
                        }
                    }
                }
                Ok(Value::Number(total))
            }
            ("list", "filter") => {
                let items = list_arg(&args, 0, "list.filter")?;
                let predicate = arg(&args, 1, "list.filter")?;
                let mut kept = Vec::new();
                for item in items {
                    let keep = self.call_function(&predicate, vec![item.clone()])?;
                    if keep.is_truthy() {
                        kept.push(item);
                    }
                }
                Ok(Value::List(kept))
            }
            ("list", "map") => {
                let items = list_arg(&args, 0, "list.map")?;
                let transform = arg(&args, 1, "list.map")?;
                let mut mapped = Vec::with_capacity(items.len());
                for item in items {
                    mapped.push(self.call_function(&transform, vec![item])?);
                }
                Ok(Value::List(mapped))
            }

            // ── convert ──
            ("convert", "to_string") => {
                let value = arg(&args, 0, "convert.to_string")?;
                Ok(Value::String(value.display_string()))
            }

            _ => Err(EvalError::UnknownFunction(format!(
                "unknown function '{module}.{function}'"
            ))),
        }
    }
}

// ── Argument helpers ─────────────────────────────────────────────────────────

fn arg(args: &[Value], index: usize, name: &str) -> EvalResult<Value> {
    args.get(index).cloned().ok_or_else(|| {
        EvalError::StdlibError(format!("{name} is missing argument {}", index + 1))
    })
}

fn number_arg(args: &[Value], index: usize, name: &str) -> EvalResult<f64> {
    match arg(args, index, name)? {
        Value::Number(n) => Ok(n),
        other => Err(EvalError::TypeMismatch(format!(
            "{name} expects a number, got {}",
            other.type_name()
        ))),
    }
}

fn string_arg(args: &[Value], index: usize, name: &str) -> EvalResult<String> {
    match arg(args, index, name)? {
        Value::String(s) => Ok(s),
        other => Err(EvalError::TypeMismatch(format!(
            "{name} expects a string, got {}",
            other.type_name()
        ))),
    }
}

fn list_arg(args: &[Value], index: usize, name: &str) -> EvalResult<Vec<Value>> {
    match arg(args, index, name)? {
        Value::List(items) => Ok(items),
        other => Err(EvalError::TypeMismatch(format!(
            "{name} expects a list, got {}",
            other.type_name()
        ))),
    }
}
