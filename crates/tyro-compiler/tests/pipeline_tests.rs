//! End-to-end pipeline tests: source → lex → parse → type-check.

use pretty_assertions::assert_eq;
use tyro_compiler::{check, type_check};
use tyro_types::{ErrorCategory, SourceFile};

const CALCULATOR: &str = r#"// simple helpers
fn add(a: number, b: number) -> number {
  return a + b
}

fn is_even(n: number) -> bool {
  return n % 2 == 0
}

let answer: number = add(40, 2)
"#;

const SHAPES: &str = r#"type Shape =
  | Square(side: number)
  | Rect(width: number, height: number)

fn area(s: Shape) -> number {
  return match s {
    Square(side) -> side * side
    Rect(width, height) -> width * height
  }
}
"#;

const GREETER: &str = r#"let name: string = "Ada"
let welcome: string = "Welcome, ${name}!"

fn shout(text: string) -> string {
  return string.upper(text)
}
"#;

#[test]
fn test_canonical_sources_are_clean() {
    for (label, source) in [
        ("calculator", CALCULATOR),
        ("shapes", SHAPES),
        ("greeter", GREETER),
    ] {
        let file = SourceFile::new(format!("{label}.tyro"), source);
        let outcome = check(&file);
        assert!(
            outcome.is_clean(),
            "{label} should be clean, got: {:?}",
            outcome.errors.errors
        );
    }
}

#[test]
fn test_syntax_error_is_a_syntax_diagnostic() {
    let file = SourceFile::new("bad.tyro", "fn incomplete(");
    let outcome = check(&file);
    assert!(outcome.errors.has_errors());
    assert_eq!(outcome.errors.errors[0].category, ErrorCategory::Syntax);
}

#[test]
fn test_type_checking_skipped_on_parse_failure() {
    // `missing` would be an E203 if checking ran; only syntax errors
    // should surface for an unparseable file.
    let file = SourceFile::new("bad.tyro", "let = missing\n((((");
    let outcome = check(&file);
    assert!(outcome.errors.has_errors());
    assert!(outcome
        .errors
        .errors
        .iter()
        .all(|e| e.category == ErrorCategory::Syntax));
}

#[test]
fn test_diagnostics_carry_position_and_source_line() {
    let file = SourceFile::new("bad.tyro", "let good = 1\nlet bad: number = \"oops\"");
    let outcome = check(&file);
    let err = &outcome.errors.errors[0];
    assert_eq!(err.span.start_line, 2);
    assert!(err.source_line.contains("oops"));
    assert_eq!(err.file, "bad.tyro");
}

#[test]
fn test_type_check_entry_point_matches_pipeline() {
    let file = SourceFile::new("calc.tyro", CALCULATOR);
    let (program, parse_errors) = tyro_parser::parse_program(&file);
    assert!(!parse_errors.has_errors());
    let errors = type_check(&program.unwrap(), &file);
    assert!(!errors.has_errors());
}

#[test]
fn test_pipeline_determinism_100_iterations() {
    let source = "let bad: number = \"oops\"\nlet worse = missing";
    let file = SourceFile::new("bad.tyro", source);
    let first: Vec<(u16, String)> = check(&file)
        .errors
        .errors
        .iter()
        .map(|e| (e.code.0, e.message.clone()))
        .collect();

    for i in 0..100 {
        let file = SourceFile::new("bad.tyro", source);
        let errors: Vec<(u16, String)> = check(&file)
            .errors
            .errors
            .iter()
            .map(|e| (e.code.0, e.message.clone()))
            .collect();
        assert_eq!(first, errors, "Determinism failure at iteration {i}");
    }
}
