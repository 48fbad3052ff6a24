//! Core parser infrastructure: token cursor, error reporting, helpers.

use tyro_lexer::token::{Token, TokenKind};
use tyro_types::{CompileErrors, ErrorCode, SourceFile, Span, TyroError};

/// The Tyro parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// Collects errors and attempts recovery when possible.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// File name for error messages.
    file_name: String,
    /// Collected errors.
    errors: CompileErrors,
    /// Current lambda nesting depth (max 3).
    pub(crate) lambda_depth: u32,
    /// Current expression nesting depth (max 16).
    pub(crate) expr_depth: u32,
}

/// Result of parsing a complete program.
pub struct ParseResult {
    pub program: Option<tyro_types::ast::Program>,
    pub errors: CompileErrors,
}

/// Result of parsing a standalone expression.
pub struct ExprParseResult {
    pub expr: Option<tyro_types::ast::Expr>,
    pub errors: CompileErrors,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            file_name: source_file.name.clone(),
            source_file,
            errors: CompileErrors::empty(),
            lambda_depth: 0,
            expr_depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream should end with Eof")
        })
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(1, 1)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        let idx = self.pos + n;
        self.tokens
            .get(idx)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Newline Handling ──────────────────────────────────────────────────────

    /// Skip all consecutive newline tokens.
    pub(crate) fn skip_newlines(&mut self) {
        while self.check_exact(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Expect a newline or end of file. Reports error if neither.
    pub(crate) fn expect_newline_or_eof(&mut self) {
        if self.at_end() {
            return;
        }
        if self.check_exact(&TokenKind::Newline) {
            self.advance();
            self.skip_newlines();
        } else if !self.check_exact(&TokenKind::RBrace) {
            // RBrace is acceptable; the closing brace ends the block
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected newline, got '{}'", self.peek_kind()),
            );
        }
    }

    /// Check whether the next non-newline token matches `kind`, without
    /// consuming anything. Used for multi-line constructs like sum type
    /// variant lists.
    pub(crate) fn newlines_then(&self, kind: &TokenKind) -> bool {
        let mut n = 0;
        while matches!(self.look_ahead(n), TokenKind::Newline) {
            n += 1;
        }
        self.look_ahead(n) == kind
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched, or emits an error.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check_exact(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    /// Expect an identifier token. Returns the name and span.
    pub(crate) fn expect_identifier(&mut self) -> Option<tyro_types::ast::Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(tyro_types::ast::Ident::new(name, span))
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected identifier, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// Expect an upper-case identifier (type or variant name).
    pub(crate) fn expect_upper_identifier(&mut self) -> Option<tyro_types::ast::Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(ref name)
                if name.starts_with(|c: char| c.is_ascii_uppercase()) =>
            {
                let name = name.clone();
                let span = self.advance().span;
                Some(tyro_types::ast::Ident::new(name, span))
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected PascalCase identifier, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// Eat an optional trailing comma.
    pub(crate) fn eat_comma(&mut self) -> bool {
        self.eat(&TokenKind::Comma)
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self
            .source_file
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        let error = TyroError::new(&self.file_name, code, message, span, source_line);
        self.errors.push_error(error);
    }

    /// Returns `true` if we've hit the error limit and should stop.
    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.has_errors() && self.errors.total_errors >= tyro_types::MAX_ERRORS
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Current cursor position, for loop-progress checks after recovery.
    pub(crate) fn cursor(&self) -> usize {
        self.pos
    }

    /// Recover after an error: synchronize, and when that leaves the
    /// cursor exactly where it was (the offending token IS a sync point),
    /// consume one token so the enclosing loop always makes progress.
    pub(crate) fn recover(&mut self, before: usize) {
        self.synchronize();
        if self.cursor() == before && !self.at_end() {
            self.advance();
        }
    }

    /// Skip tokens until we reach a synchronization point.
    /// Used after an error to resume at a known-good position.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_end() {
            // Stop at newline; each statement starts on a new line
            if self.check_exact(&TokenKind::Newline) {
                self.advance();
                self.skip_newlines();
                return;
            }
            // Stop at block-level keywords
            match self.peek_kind() {
                TokenKind::Let
                | TokenKind::Fn
                | TokenKind::Type
                | TokenKind::If
                | TokenKind::For
                | TokenKind::Match
                | TokenKind::Return
                | TokenKind::RBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a `Program` AST.
    pub fn parse(mut self) -> ParseResult {
        self.skip_newlines();
        let program = self.parse_program();
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    /// Parse the token stream as a single standalone expression.
    ///
    /// Anything other than newlines after the expression is an error.
    pub fn parse_expr_only(mut self) -> ExprParseResult {
        self.skip_newlines();
        let expr = self.parse_expression();
        self.skip_newlines();
        if !self.at_end() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected end of expression, got '{}'", self.peek_kind()),
            );
        }
        let expr = if self.errors.has_errors() { None } else { expr };
        ExprParseResult {
            expr,
            errors: self.errors,
        }
    }
}
