//! Statement and block parsing.

use tyro_lexer::token::TokenKind;
use tyro_types::ast::*;
use tyro_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// `{ statements... }`; statements are newline-separated.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        self.skip_newlines();

        let mut stmts = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            let before = self.cursor();
            match self.parse_stmt() {
                Some(stmt) => {
                    stmts.push(stmt);
                    self.expect_newline_or_eof();
                }
                None => self.recover(before),
            }
            self.skip_newlines();
        }

        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Block { stmts, span })
    }

    /// Parse one statement.
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_let_binding().map(Stmt::Let),
            TokenKind::Return => self.parse_return_stmt().map(Stmt::Return),
            TokenKind::If => self.parse_if().map(Stmt::If),
            TokenKind::For => self.parse_for_stmt().map(Stmt::For),
            TokenKind::Match => self.parse_match().map(Stmt::Match),
            // `name = expr`; assignment to an existing binding
            TokenKind::Identifier(_) if self.look_ahead(1) == &TokenKind::Eq => {
                self.parse_assign_stmt().map(Stmt::Assign)
            }
            _ => {
                let expr = self.parse_expression()?;
                let span = expr.span;
                Some(Stmt::Expr(ExprStmt { expr, span }))
            }
        }
    }

    /// `return [expr]`
    fn parse_return_stmt(&mut self) -> Option<ReturnStmt> {
        let start = self.current_span();
        self.expect(&TokenKind::Return)?;

        let value = match self.peek_kind() {
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(self.parse_expression()?),
        };

        let span = value
            .as_ref()
            .map(|v| start.merge(v.span))
            .unwrap_or(start);
        Some(ReturnStmt { value, span })
    }

    /// `name = expr`
    fn parse_assign_stmt(&mut self) -> Option<AssignStmt> {
        let target = self.expect_identifier()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        let span = target.span.merge(value.span);
        Some(AssignStmt {
            target,
            value,
            span,
        })
    }

    /// `for item in iterable { body }`
    fn parse_for_stmt(&mut self) -> Option<ForStmt> {
        let start = self.current_span();
        self.expect(&TokenKind::For)?;
        let item = self.expect_identifier()?;
        self.expect(&TokenKind::In)?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(ForStmt {
            item,
            iterable,
            body,
            span,
        })
    }

    /// `if cond { ... } [else if ... | else { ... }]`
    ///
    /// Shared by statement and expression positions.
    pub(crate) fn parse_if(&mut self) -> Option<IfExpr> {
        let start = self.current_span();
        self.expect(&TokenKind::If)?;
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;

        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check_exact(&TokenKind::If) {
                Some(ElseBranch::ElseIf(Box::new(self.parse_if()?)))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };

        let span = start.merge(self.previous_span());
        Some(IfExpr {
            condition,
            then_block,
            else_branch,
            span,
        })
    }

    /// `match subject { Pattern -> body ... }`
    ///
    /// Arms are newline-separated; bodies are an expression or a block.
    pub(crate) fn parse_match(&mut self) -> Option<MatchExpr> {
        let start = self.current_span();
        self.expect(&TokenKind::Match)?;
        let subject = self.parse_expression()?;

        self.expect(&TokenKind::LBrace)?;
        self.skip_newlines();

        let mut arms = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            let before = self.cursor();
            match self.parse_match_arm() {
                Some(arm) => {
                    arms.push(arm);
                    self.expect_newline_or_eof();
                }
                None => self.recover(before),
            }
            self.skip_newlines();
        }

        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());

        if arms.is_empty() {
            self.error_at(
                ErrorCode::NON_EXHAUSTIVE_MATCH,
                "match needs at least one arm",
                span,
            );
            return None;
        }

        Some(MatchExpr {
            subject,
            arms,
            span,
        })
    }

    /// `Pattern -> expr` or `Pattern -> { stmts }`
    fn parse_match_arm(&mut self) -> Option<MatchArm> {
        let pattern = self.parse_pattern()?;
        self.expect(&TokenKind::Arrow)?;

        let body = if self.check_exact(&TokenKind::LBrace) {
            MatchArmBody::Block(self.parse_block()?)
        } else {
            MatchArmBody::Expr(self.parse_expression()?)
        };

        let span = match (&pattern, &body) {
            (Pattern::Variant { name, .. }, MatchArmBody::Expr(e)) => name.span.merge(e.span),
            (Pattern::Variant { name, .. }, MatchArmBody::Block(b)) => name.span.merge(b.span),
            (Pattern::Wildcard(s), MatchArmBody::Expr(e)) => s.merge(e.span),
            (Pattern::Wildcard(s), MatchArmBody::Block(b)) => s.merge(b.span),
        };

        Some(MatchArm {
            pattern,
            body,
            span,
        })
    }

    /// `_`, `VariantName`, or `VariantName(a, b)`
    fn parse_pattern(&mut self) -> Option<Pattern> {
        if self.check_exact(&TokenKind::Underscore) {
            let span = self.advance().span;
            return Some(Pattern::Wildcard(span));
        }

        let name = self.expect_upper_identifier()?;
        let mut bindings = Vec::new();

        if self.eat(&TokenKind::LParen) {
            if !self.check_exact(&TokenKind::RParen) {
                loop {
                    let binding = self.expect_identifier()?;
                    bindings.push(binding);
                    if !self.eat_comma() {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::RParen)?;
        }

        Some(Pattern::Variant { name, bindings })
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_program;
    use tyro_types::ast::*;
    use tyro_types::SourceFile;

    fn parse_fn_body(body: &str) -> Block {
        let source = format!("fn test_subject() {{\n{body}\n}}");
        let file = SourceFile::new("test.tyro", source);
        let (program, errors) = parse_program(&file);
        assert!(!errors.has_errors(), "unexpected errors: {:?}", errors.errors);
        match program.unwrap().decls.remove(0) {
            Decl::Fn(f) => f.body,
            other => panic!("expected fn, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_return_with_value() {
        let body = parse_fn_body("return 1 + 2");
        assert!(matches!(
            &body.stmts[0],
            Stmt::Return(ReturnStmt { value: Some(_), .. })
        ));
    }

    #[test]
    fn test_parse_bare_return() {
        let body = parse_fn_body("return");
        assert!(matches!(
            &body.stmts[0],
            Stmt::Return(ReturnStmt { value: None, .. })
        ));
    }

    #[test]
    fn test_parse_assignment() {
        let body = parse_fn_body("let total = 0\ntotal = total + 1");
        assert_eq!(body.stmts.len(), 2);
        assert!(matches!(&body.stmts[1], Stmt::Assign(_)));
    }

    #[test]
    fn test_parse_if_else_chain() {
        let body = parse_fn_body("if x > 0 {\n  return 1\n} else if x < 0 {\n  return 2\n} else {\n  return 3\n}");
        match &body.stmts[0] {
            Stmt::If(if_expr) => {
                assert!(matches!(
                    if_expr.else_branch,
                    Some(ElseBranch::ElseIf(_))
                ));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_for_loop() {
        let body = parse_fn_body("for item in xs {\n  total = total + item\n}");
        match &body.stmts[0] {
            Stmt::For(f) => assert_eq!(f.item.name, "item"),
            other => panic!("expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_match_arms() {
        let body = parse_fn_body("match light {\n  Red -> 1\n  Green -> 2\n  _ -> 0\n}");
        match &body.stmts[0] {
            Stmt::Match(m) => {
                assert_eq!(m.arms.len(), 3);
                assert!(matches!(m.arms[2].pattern, Pattern::Wildcard(_)));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_match_with_bindings() {
        let body = parse_fn_body("match shape {\n  Circle(r) -> r * r\n  Square(side) -> side * side\n}");
        match &body.stmts[0] {
            Stmt::Match(m) => match &m.arms[0].pattern {
                Pattern::Variant { name, bindings } => {
                    assert_eq!(name.name, "Circle");
                    assert_eq!(bindings.len(), 1);
                }
                other => panic!("expected variant pattern, got {other:?}"),
            },
            other => panic!("expected match, got {other:?}"),
        }
    }
}
