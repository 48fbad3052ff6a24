//! Type checker tests: one scenario per error code, plus programs that
//! must be accepted.

use tyro_compiler::check;
use tyro_types::{ErrorCode, SourceFile};

fn check_source(source: &str) -> tyro_types::CompileErrors {
    let file = SourceFile::new("test.tyro", source);
    check(&file).errors
}

fn assert_clean(source: &str) {
    let errors = check_source(source);
    assert!(
        !errors.has_errors(),
        "expected clean, got: {:?}",
        errors.errors
    );
}

fn assert_code(source: &str, code: ErrorCode) {
    let errors = check_source(source);
    assert!(
        errors.errors.iter().any(|e| e.code == code),
        "expected {code}, got: {:?}",
        errors.errors
    );
}

// ── Accepted programs ────────────────────────────────────────────────────────

#[test]
fn test_accepts_typed_bindings() {
    assert_clean("let x: number = 42\nlet s: string = \"hi\"\nlet b: bool = true");
}

#[test]
fn test_accepts_functions_with_inference() {
    // No return annotation: inferred from the return statement
    assert_clean("fn add(a: number, b: number) {\n  return a + b\n}\nlet r: number = add(1, 2)");
}

#[test]
fn test_accepts_forward_function_reference() {
    // Functions are hoisted: a binding may call one declared later
    assert_clean("let ten: number = double(5)\nfn double(n: number) -> number {\n  return n * 2\n}");
}

#[test]
fn test_accepts_recursion() {
    assert_clean(
        "fn factorial(n: number) -> number {\n  if n <= 1 {\n    return 1\n  }\n  return n * factorial(n - 1)\n}",
    );
}

#[test]
fn test_accepts_lambda_with_stdlib() {
    assert_clean(
        "fn evens(xs: list<number>) -> list<number> {\n  return list.filter(xs, fn(n: number) { n % 2 == 0 })\n}",
    );
}

#[test]
fn test_accepts_exhaustive_match() {
    assert_clean(
        "type Light = | Red | Green\nfn go(l: Light) -> bool {\n  return match l {\n    Green -> true\n    Red -> false\n  }\n}",
    );
}

#[test]
fn test_accepts_wildcard_match() {
    assert_clean(
        "type Light = | Red | Yellow | Green\nfn go(l: Light) -> bool {\n  return match l {\n    Green -> true\n    _ -> false\n  }\n}",
    );
}

#[test]
fn test_accepts_record_structural_use() {
    assert_clean(
        "fn describe(user: { name: string, level: number }) -> string {\n  return \"${user.name} is level ${user.level}\"\n}\nlet text: string = describe({ name: \"Ada\", level: 3 })",
    );
}

// ── Rejected programs, by code ───────────────────────────────────────────────

#[test]
fn test_e200_unknown_type() {
    assert_code("let x: Widget = 1", ErrorCode::UNKNOWN_TYPE);
}

#[test]
fn test_e201_type_mismatch_on_binding() {
    assert_code("let x: number = \"hi\"", ErrorCode::TYPE_MISMATCH);
}

#[test]
fn test_e201_type_mismatch_on_return() {
    assert_code(
        "fn f() -> number {\n  return \"nope\"\n}",
        ErrorCode::TYPE_MISMATCH,
    );
}

#[test]
fn test_e201_operator_mismatch() {
    assert_code("let x = 1 + \"two\"", ErrorCode::TYPE_MISMATCH);
}

#[test]
fn test_e202_wrong_arg_count() {
    assert_code(
        "fn add(a: number, b: number) -> number {\n  return a + b\n}\nlet r = add(1)",
        ErrorCode::WRONG_ARG_COUNT,
    );
}

#[test]
fn test_e203_unknown_name() {
    assert_code("let x = missing", ErrorCode::UNKNOWN_NAME);
}

#[test]
fn test_e204_not_callable() {
    assert_code("let x = 1\nlet y = x(2)", ErrorCode::NOT_CALLABLE);
}

#[test]
fn test_e205_unknown_field() {
    assert_code(
        "let user = { name: \"Ada\" }\nlet x = user.age",
        ErrorCode::UNKNOWN_FIELD,
    );
}

#[test]
fn test_e206_unknown_stdlib_function() {
    assert_code("let x = math.cube(2)", ErrorCode::UNKNOWN_FUNCTION);
}

#[test]
fn test_e207_missing_return() {
    assert_code(
        "fn f(n: number) -> number {\n  if n > 0 {\n    return 1\n  }\n}",
        ErrorCode::MISSING_RETURN,
    );
}

#[test]
fn test_e208_condition_not_bool() {
    assert_code(
        "fn f(n: number) -> number {\n  if n {\n    return 1\n  }\n  return 0\n}",
        ErrorCode::CONDITION_NOT_BOOL,
    );
}

#[test]
fn test_e210_non_exhaustive_match() {
    assert_code(
        "type Light = | Red | Yellow | Green\nfn go(l: Light) -> bool {\n  return match l {\n    Green -> true\n    Red -> false\n  }\n}",
        ErrorCode::NON_EXHAUSTIVE_MATCH,
    );
}

#[test]
fn test_e211_not_iterable() {
    assert_code(
        "fn f() {\n  for item in 42 {\n    item\n  }\n}",
        ErrorCode::NOT_ITERABLE,
    );
}

#[test]
fn test_e500_duplicate_declaration() {
    assert_code("let x = 1\nlet x = 2", ErrorCode::VARIABLE_ALREADY_DECLARED);
}

#[test]
fn test_e501_assign_undeclared() {
    assert_code(
        "fn f() {\n  total = 1\n}",
        ErrorCode::ASSIGN_UNDECLARED,
    );
}

#[test]
fn test_shadowing_in_inner_scope_is_allowed() {
    assert_clean(
        "let x = 1\nfn f() -> number {\n  let x = 2\n  return x\n}",
    );
}
