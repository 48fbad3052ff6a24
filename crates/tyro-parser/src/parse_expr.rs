//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 7. `or`
//! 6. `and`
//! 5. `==`, `!=`, `<`, `>`, `<=`, `>=` (no chaining)
//! 4. `+`, `-`
//! 3. `*`, `/`, `%`
//! 2. unary `-`, `not`
//! 1. `.` (field access), `()` (call)

use tyro_lexer::token::TokenKind;
use tyro_types::ast::*;
use tyro_types::ErrorCode;

use crate::parser::Parser;

/// Maximum expression nesting depth.
const MAX_EXPR_DEPTH: u32 = 16;

/// Maximum lambda nesting depth.
const MAX_LAMBDA_DEPTH: u32 = 3;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("maximum expression nesting depth is {MAX_EXPR_DEPTH}"),
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_or();
        self.expr_depth -= 1;
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "or" AndExpr }`
    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::Or,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `AndExpr = CompExpr { "and" CompExpr }`
    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_comparison()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_comparison()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::And,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `CompExpr = AddExpr [ CompOp AddExpr ]`
    ///
    /// Comparison operators do NOT chain: `a < b < c` is a parse error.
    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut left = self.parse_add()?;
        if let Some(op) = self.match_comparison_op() {
            self.advance(); // consume operator
            let right = self.parse_add()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
            // Reject chaining
            if self.match_comparison_op().is_some() {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "comparison operators cannot be chained; use 'and' to combine: a < b and b < c",
                );
            }
        }
        Some(left)
    }

    /// Check if current token is a comparison operator, return corresponding BinOp.
    fn match_comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::NotEq),
            TokenKind::Less => Some(BinOp::Less),
            TokenKind::Greater => Some(BinOp::Greater),
            TokenKind::LessEq => Some(BinOp::LessEq),
            TokenKind::GreaterEq => Some(BinOp::GreaterEq),
            _ => None,
        }
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Option<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/" | "%") UnaryExpr }`
    fn parse_mul(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `UnaryExpr = [ "not" | "-" ] PostfixExpr`
    fn parse_unary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Not => {
                self.advance();
                Some(UnaryOp::Not)
            }
            TokenKind::Minus => {
                self.advance();
                Some(UnaryOp::Neg)
            }
            _ => None,
        };
        let operand = self.parse_postfix()?;
        if let Some(op) = op {
            let span = start.merge(operand.span);
            Some(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ))
        } else {
            Some(operand)
        }
    }

    /// `PostfixExpr = PrimaryExpr { "." Identifier }`
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(&TokenKind::Dot) {
            let field = self.expect_identifier()?;
            let span = expr.span.merge(field.span);
            expr = Expr::new(
                ExprKind::FieldAccess {
                    object: Box::new(expr),
                    field,
                },
                span,
            );
        }
        Some(expr)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Option<Expr> {
        match self.peek_kind().clone() {
            TokenKind::NumberLit(n) => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::NumberLit(n), span))
            }
            TokenKind::StringLiteral(s) => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::StringLit(s), span))
            }
            TokenKind::StringStart(_) => self.parse_interpolated_string(),
            TokenKind::True => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::BoolLit(true), span))
            }
            TokenKind::False => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::BoolLit(false), span))
            }
            TokenKind::Nil => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::NilLit, span))
            }

            TokenKind::Identifier(name) => {
                // `name(args)` is a call; bare `name` is an identifier
                if self.look_ahead(1) == &TokenKind::LParen {
                    let ident_span = self.advance().span;
                    let name = Ident::new(name, ident_span);
                    self.expect(&TokenKind::LParen)?;
                    let args = self.parse_arg_list()?;
                    self.expect(&TokenKind::RParen)?;
                    let span = ident_span.merge(self.previous_span());
                    Some(Expr::new(ExprKind::Call { name, args }, span))
                } else {
                    let span = self.advance().span;
                    Some(Expr::new(ExprKind::Identifier(name), span))
                }
            }

            // Stdlib module prefixes: `math.max(...)`, `string.upper(...)`,
            // `list.length(...)`, `convert.to_string(...)`
            kind @ (TokenKind::Math
            | TokenKind::Convert
            | TokenKind::KwString
            | TokenKind::KwList) => {
                let module_span = self.advance().span;
                let module = Ident::new(kind.to_string(), module_span);
                self.expect(&TokenKind::Dot)?;
                let function = self.expect_identifier()?;
                self.expect(&TokenKind::LParen)?;
                let args = self.parse_arg_list()?;
                self.expect(&TokenKind::RParen)?;
                let span = module_span.merge(self.previous_span());
                Some(Expr::new(
                    ExprKind::QualifiedCall {
                        module,
                        function,
                        args,
                    },
                    span,
                ))
            }

            TokenKind::LParen => {
                let start = self.advance().span;
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Some(Expr::new(ExprKind::Paren(Box::new(inner)), span))
            }

            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_record_literal(),

            TokenKind::If => {
                let if_expr = self.parse_if()?;
                let span = if_expr.span;
                Some(Expr::new(ExprKind::If(Box::new(if_expr)), span))
            }
            TokenKind::Match => {
                let match_expr = self.parse_match()?;
                let span = match_expr.span;
                Some(Expr::new(ExprKind::Match(Box::new(match_expr)), span))
            }
            TokenKind::Fn => self.parse_lambda(),

            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// `"text ${expr} more ${expr} tail"`
    ///
    /// The lexer delivers: StringStart, then (InterpolationStart expr
    /// InterpolationEnd, StringPart?)* ending with StringEnd.
    fn parse_interpolated_string(&mut self) -> Option<Expr> {
        let start_token = self.advance();
        let start_span = start_token.span;
        let mut parts = Vec::new();

        if let TokenKind::StringStart(text) = start_token.kind {
            if !text.is_empty() {
                parts.push(StringPart::Literal(text));
            }
        }

        loop {
            self.expect(&TokenKind::InterpolationStart)?;
            let expr = self.parse_expression()?;
            parts.push(StringPart::Expr(expr));
            self.expect(&TokenKind::InterpolationEnd)?;

            match self.peek_kind().clone() {
                TokenKind::StringPart(text) => {
                    self.advance();
                    if !text.is_empty() {
                        parts.push(StringPart::Literal(text));
                    }
                    // Next token must open another interpolation
                }
                TokenKind::StringEnd(text) => {
                    self.advance();
                    if !text.is_empty() {
                        parts.push(StringPart::Literal(text));
                    }
                    break;
                }
                other => {
                    self.error_at_current(
                        ErrorCode::UNTERMINATED_STRING,
                        format!("expected string continuation, got '{other}'"),
                    );
                    return None;
                }
            }
        }

        let span = start_span.merge(self.previous_span());
        Some(Expr::new(ExprKind::StringInterpolation(parts), span))
    }

    /// `[expr, expr, ...]`
    fn parse_list_literal(&mut self) -> Option<Expr> {
        let start = self.advance().span; // consume '['
        self.skip_newlines();

        let mut elems = Vec::new();
        if !self.check_exact(&TokenKind::RBracket) {
            loop {
                let elem = self.parse_expression()?;
                elems.push(elem);
                if !self.eat_comma() {
                    break;
                }
                self.skip_newlines();
            }
        }

        self.skip_newlines();
        self.expect(&TokenKind::RBracket)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::ListLit(elems), span))
    }

    /// `{ field: expr, ... }`
    fn parse_record_literal(&mut self) -> Option<Expr> {
        let start = self.advance().span; // consume '{'
        self.skip_newlines();

        let mut fields = Vec::new();
        if !self.check_exact(&TokenKind::RBrace) {
            loop {
                let name = self.expect_identifier()?;
                self.expect(&TokenKind::Colon)?;
                let value = self.parse_expression()?;
                let span = name.span.merge(value.span);
                fields.push(RecordFieldInit { name, value, span });
                if !self.eat_comma() {
                    break;
                }
                self.skip_newlines();
            }
        }

        self.skip_newlines();
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::RecordLit(fields), span))
    }

    /// `fn(params) { body }`; block-body only.
    fn parse_lambda(&mut self) -> Option<Expr> {
        self.lambda_depth += 1;
        if self.lambda_depth > MAX_LAMBDA_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("maximum lambda nesting depth is {MAX_LAMBDA_DEPTH}"),
            );
            self.lambda_depth -= 1;
            return None;
        }

        let start = self.advance().span; // consume 'fn'
        let result = (|| {
            self.expect(&TokenKind::LParen)?;
            let params = self.parse_param_list()?;
            self.expect(&TokenKind::RParen)?;
            let body = self.parse_block()?;
            let span = start.merge(body.span);
            Some(Expr::new(
                ExprKind::Lambda(Box::new(LambdaExpr { params, body, span })),
                span,
            ))
        })();

        self.lambda_depth -= 1;
        result
    }

    /// Comma-separated argument list; the caller consumes the parens.
    pub(crate) fn parse_arg_list(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();

        self.skip_newlines();
        if self.check_exact(&TokenKind::RParen) {
            return Some(args);
        }

        loop {
            let arg = self.parse_expression()?;
            args.push(arg);
            if !self.eat_comma() {
                break;
            }
            self.skip_newlines();
        }
        self.skip_newlines();

        Some(args)
    }
}
