//! Tyro parser: converts a token stream into an AST.

mod parse_decl;
mod parse_expr;
mod parse_stmt;
mod parse_type;
mod parser;

pub use parser::{ExprParseResult, ParseResult, Parser};

use tyro_types::{ast, CompileErrors, SourceFile};

/// Lex and parse a complete program from a source file.
pub fn parse_program(source: &SourceFile) -> (Option<ast::Program>, CompileErrors) {
    let lexed = tyro_lexer::Lexer::new(source).lex();
    let mut errors = lexed.errors;
    let result = Parser::new(lexed.tokens, source).parse();
    errors.extend(result.errors);
    (result.program, errors)
}

/// Lex and parse a standalone expression (used for declarative test
/// expressions, which must be a single expression and nothing else).
pub fn parse_expression_source(source: &SourceFile) -> (Option<ast::Expr>, CompileErrors) {
    let lexed = tyro_lexer::Lexer::new(source).lex();
    let mut errors = lexed.errors;
    let result = Parser::new(lexed.tokens, source).parse_expr_only();
    errors.extend(result.errors);
    (result.expr, errors)
}
