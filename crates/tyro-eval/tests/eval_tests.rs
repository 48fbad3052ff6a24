//! Evaluator integration tests: declarations, expressions, stdlib, traps.

use tyro_eval::{EvalError, Evaluator, Value, DEFAULT_GAS_LIMIT};
use tyro_types::SourceFile;

/// Load `program` into a fresh evaluator and evaluate `expr` against it.
fn eval(program: &str, expr: &str) -> Result<Value, EvalError> {
    eval_with_gas(program, expr, DEFAULT_GAS_LIMIT)
}

fn eval_with_gas(program: &str, expr: &str, gas: u64) -> Result<Value, EvalError> {
    let program_file = SourceFile::new("program.tyro", program);
    let (program, errors) = tyro_parser::parse_program(&program_file);
    assert!(!errors.has_errors(), "program parse errors: {:?}", errors.errors);

    let expr_file = SourceFile::new("expr.tyro", expr);
    let (expr, errors) = tyro_parser::parse_expression_source(&expr_file);
    assert!(!errors.has_errors(), "expr parse errors: {:?}", errors.errors);

    let mut evaluator = Evaluator::new(gas);
    evaluator.load_program(&program.unwrap())?;
    evaluator.eval_expr(&expr.unwrap())
}

fn eval_number(program: &str, expr: &str) -> f64 {
    match eval(program, expr).unwrap() {
        Value::Number(n) => n,
        other => panic!("expected number, got {other:?}"),
    }
}

fn eval_bool(program: &str, expr: &str) -> bool {
    match eval(program, expr).unwrap() {
        Value::Bool(b) => b,
        other => panic!("expected bool, got {other:?}"),
    }
}

// ── Declarations & arithmetic ────────────────────────────────────────────────

#[test]
fn test_let_bindings_in_order() {
    let program = "let a = 60 * 60\nlet b = a * 24";
    assert_eq!(eval_number(program, "b"), 86400.0);
}

#[test]
fn test_function_call() {
    let program = "fn add(a: number, b: number) -> number {\n  return a + b\n}";
    assert_eq!(eval_number(program, "add(2, 3)"), 5.0);
    assert_eq!(eval_number(program, "add(-1, 1)"), 0.0);
}

#[test]
fn test_hoisted_function_visible_to_let() {
    let program = "let ten = double(5)\nfn double(n: number) -> number {\n  return n * 2\n}";
    assert_eq!(eval_number(program, "ten"), 10.0);
}

#[test]
fn test_recursion() {
    let program =
        "fn factorial(n: number) -> number {\n  if n <= 1 {\n    return 1\n  }\n  return n * factorial(n - 1)\n}";
    assert_eq!(eval_number(program, "factorial(5)"), 120.0);
    assert_eq!(eval_number(program, "factorial(0)"), 1.0);
}

#[test]
fn test_string_concat_and_interpolation() {
    let program = "let name = \"Ada\"\nlet greeting = \"Hello, \" + name\nlet welcome = \"Welcome, ${name}!\"";
    assert_eq!(
        eval(program, "greeting").unwrap().display_string(),
        "Hello, Ada"
    );
    assert!(eval_bool(program, "welcome == \"Welcome, Ada!\""));
}

#[test]
fn test_interpolation_renders_whole_numbers_plainly() {
    let program = "let level = 99\nlet text = \"level ${level}\"";
    assert!(eval_bool(program, "text == \"level 99\""));
}

// ── Control flow ─────────────────────────────────────────────────────────────

#[test]
fn test_if_else_in_function() {
    let program = "fn grade(score: number) -> string {\n  if score >= 50 {\n    return \"pass\"\n  }\n  return \"fail\"\n}";
    assert!(eval_bool(program, "grade(75) == \"pass\""));
    assert!(eval_bool(program, "grade(30) == \"fail\""));
}

#[test]
fn test_for_loop_accumulates() {
    let program = "fn total(xs: list<number>) -> number {\n  let sum = 0\n  for x in xs {\n    sum = sum + x\n  }\n  return sum\n}";
    assert_eq!(eval_number(program, "total([1, 2, 3, 4])"), 10.0);
    assert_eq!(eval_number(program, "total([])"), 0.0);
}

#[test]
fn test_match_on_variants() {
    let program = "type Light = | Red | Yellow | Green\nfn next_light(l: Light) -> Light {\n  return match l {\n    Red -> Green\n    Green -> Yellow\n    Yellow -> Red\n  }\n}";
    assert!(eval_bool(program, "next_light(Red) == Green"));
    assert!(eval_bool(program, "next_light(Yellow) == Red"));
}

#[test]
fn test_match_binds_payload() {
    let program = "type Shape = | Square(side: number) | Rect(width: number, height: number)\nfn area(s: Shape) -> number {\n  return match s {\n    Square(side) -> side * side\n    Rect(w, h) -> w * h\n  }\n}";
    assert_eq!(eval_number(program, "area(Square(3))"), 9.0);
    assert_eq!(eval_number(program, "area(Rect(2, 5))"), 10.0);
}

// ── Records & lambdas ────────────────────────────────────────────────────────

#[test]
fn test_record_field_access() {
    let program = "let admin = { name: \"Root\", level: 99 }";
    assert!(eval_bool(program, "admin.name == \"Root\""));
    assert_eq!(eval_number(program, "admin.level"), 99.0);
}

#[test]
fn test_lambda_captures_locals() {
    let program = "fn make_adder(n: number) -> (number) -> number {\n  return fn(x: number) { x + n }\n}\nlet add_ten = make_adder(10)";
    assert_eq!(eval_number(program, "add_ten(5)"), 15.0);
}

// ── Stdlib ───────────────────────────────────────────────────────────────────

#[test]
fn test_stdlib_math_and_string() {
    assert_eq!(eval_number("", "math.max(3, 7)"), 7.0);
    assert_eq!(eval_number("", "math.abs(-4)"), 4.0);
    assert!(eval_bool("", "string.upper(\"hi\") == \"HI\""));
    assert_eq!(eval_number("", "string.length(\"hello\")"), 5.0);
}

#[test]
fn test_stdlib_list_operations() {
    assert_eq!(eval_number("", "list.length([1, 2, 3])"), 3.0);
    assert_eq!(eval_number("", "list.sum([2, 3, 5, 7])"), 17.0);
    assert!(eval_bool("", "list.reverse([1, 2]) == [2, 1]"));
    assert!(eval_bool("", "list.range(1, 4) == [1, 2, 3]"));
    assert!(eval_bool("", "list.contains([1, 2], 2)"));
    assert!(eval_bool("", "list.append([1], 2) == [1, 2]"));
}

#[test]
fn test_stdlib_filter_and_map_with_lambdas() {
    assert!(eval_bool(
        "",
        "list.filter([1, 2, 3, 4], fn(n: number) { n % 2 == 0 }) == [2, 4]"
    ));
    assert!(eval_bool(
        "",
        "list.map([1, 2, 3], fn(n: number) { n * 2 }) == [2, 4, 6]"
    ));
}

// ── Traps & isolation ────────────────────────────────────────────────────────

#[test]
fn test_division_by_zero_traps() {
    let err = eval("", "1 / 0").unwrap_err();
    assert!(matches!(err, EvalError::ArithmeticTrap(_)));
}

#[test]
fn test_list_get_out_of_bounds_traps() {
    let err = eval("", "list.get([1, 2], 5)").unwrap_err();
    assert!(matches!(err, EvalError::IndexOutOfBounds(_)));
}

#[test]
fn test_unknown_function_errors() {
    let err = eval("", "no_such_function(1)").unwrap_err();
    assert!(matches!(err, EvalError::UnknownFunction(_)));
}

#[test]
fn test_gas_limit_stops_runaway_evaluation() {
    let program =
        "fn spin(n: number) -> number {\n  return spin(n + 1)\n}";
    let err = eval_with_gas(program, "spin(0)", 200).unwrap_err();
    assert!(
        matches!(err, EvalError::GasExhausted | EvalError::Runtime(_)),
        "got {err:?}"
    );
}

#[test]
fn test_strict_boolean_result_shape() {
    // The executor's strict-true rule depends on == producing a real Bool
    let value = eval("", "1 == 1").unwrap();
    assert!(matches!(value, Value::Bool(true)));
    let value = eval("", "[1] == [1]").unwrap();
    assert!(matches!(value, Value::Bool(true)));
}

#[test]
fn test_evaluators_are_isolated() {
    let program = "let counter = 0";
    // Two separate evaluators must not share state
    assert_eq!(eval_number(program, "counter"), 0.0);
    assert_eq!(eval_number(program, "counter"), 0.0);
}
