//! Top-level declaration parsing: `let`, `fn`, and `type` declarations.

use tyro_lexer::token::TokenKind;
use tyro_types::ast::*;
use tyro_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a complete program: an ordered list of top-level declarations.
    pub(crate) fn parse_program(&mut self) -> Option<Program> {
        let start = self.current_span();
        let mut decls = Vec::new();

        self.skip_newlines();
        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            let before = self.cursor();
            match self.parse_decl() {
                Some(decl) => {
                    decls.push(decl);
                    self.expect_newline_or_eof();
                }
                None => {
                    self.recover(before);
                }
            }
            self.skip_newlines();
        }

        let span = decls
            .last()
            .map(|d| start.merge(d.span()))
            .unwrap_or(start);
        Some(Program { decls, span })
    }

    /// Parse one top-level declaration.
    fn parse_decl(&mut self) -> Option<Decl> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_let_binding().map(Decl::Let),
            TokenKind::Fn => self.parse_fn_decl().map(Decl::Fn),
            TokenKind::Type => self.parse_type_decl().map(Decl::Type),
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!(
                        "expected 'let', 'fn' or 'type' declaration, got '{}'",
                        self.peek_kind()
                    ),
                );
                None
            }
        }
    }

    /// `let name [: Type] = expr`
    ///
    /// Shared between top-level declarations and block statements.
    pub(crate) fn parse_let_binding(&mut self) -> Option<LetBinding> {
        let start = self.current_span();
        self.expect(&TokenKind::Let)?;
        let name = self.expect_identifier()?;

        let type_ann = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        let span = start.merge(value.span);

        Some(LetBinding {
            name,
            type_ann,
            value,
            span,
        })
    }

    /// `fn name(params) [-> Type] { body }`
    fn parse_fn_decl(&mut self) -> Option<FnDecl> {
        let start = self.current_span();
        self.expect(&TokenKind::Fn)?;
        let name = self.expect_identifier()?;

        self.expect(&TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(&TokenKind::RParen)?;

        let ret = if self.eat(&TokenKind::Arrow) {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        let body = self.parse_block()?;
        let span = start.merge(body.span);

        Some(FnDecl {
            name,
            params,
            ret,
            body,
            span,
        })
    }

    /// `type Name = Type` or `type Name = | A | B(x: Type)`
    ///
    /// Variants may continue on following lines, each starting with `|`.
    fn parse_type_decl(&mut self) -> Option<TypeDecl> {
        let start = self.current_span();
        self.expect(&TokenKind::Type)?;
        let name = self.expect_upper_identifier()?;
        self.expect(&TokenKind::Eq)?;

        let body = if self.newlines_then(&TokenKind::Pipe) {
            self.skip_newlines();
            TypeDeclBody::SumType(self.parse_variant_list()?)
        } else {
            TypeDeclBody::Alias(self.parse_type_annotation()?)
        };

        let span = start.merge(self.previous_span());
        Some(TypeDecl { name, body, span })
    }

    /// `| A | B(x: Type) | ...`; pipes may be newline-separated.
    fn parse_variant_list(&mut self) -> Option<Vec<VariantDef>> {
        let mut variants = Vec::new();

        while self.eat(&TokenKind::Pipe) {
            let variant = self.parse_variant_def()?;
            variants.push(variant);
            if self.newlines_then(&TokenKind::Pipe) {
                self.skip_newlines();
            }
        }

        if variants.is_empty() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "a sum type needs at least one variant",
            );
            return None;
        }
        Some(variants)
    }

    /// `Circle(radius: number)` or a unit variant `Red`.
    fn parse_variant_def(&mut self) -> Option<VariantDef> {
        let name = self.expect_upper_identifier()?;
        let mut span = name.span;

        let params = if self.eat(&TokenKind::LParen) {
            let params = self.parse_param_list()?;
            self.expect(&TokenKind::RParen)?;
            span = span.merge(self.previous_span());
            params
        } else {
            Vec::new()
        };

        Some(VariantDef { name, params, span })
    }

    /// `name: Type, name: Type, ...`; caller handles the surrounding parens.
    pub(crate) fn parse_param_list(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();

        if self.check_exact(&TokenKind::RParen) {
            return Some(params);
        }

        loop {
            let name = self.expect_identifier()?;
            self.expect(&TokenKind::Colon)?;
            let type_ann = self.parse_type_annotation()?;
            let span = name.span.merge(type_ann.span);
            params.push(Param {
                name,
                type_ann,
                span,
            });

            if !self.eat_comma() {
                break;
            }
        }

        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_program;
    use tyro_types::ast::*;
    use tyro_types::SourceFile;

    fn parse_clean(source: &str) -> Program {
        let file = SourceFile::new("test.tyro", source);
        let (program, errors) = parse_program(&file);
        assert!(!errors.has_errors(), "unexpected errors: {:?}", errors.errors);
        program.expect("program should parse")
    }

    #[test]
    fn test_parse_let_decl() {
        let program = parse_clean("let answer: number = 42");
        assert_eq!(program.decls.len(), 1);
        match &program.decls[0] {
            Decl::Let(l) => {
                assert_eq!(l.name.name, "answer");
                assert!(l.type_ann.is_some());
            }
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_fn_decl_with_return_type() {
        let program = parse_clean("fn add(a: number, b: number) -> number {\n  return a + b\n}");
        match &program.decls[0] {
            Decl::Fn(f) => {
                assert_eq!(f.name.name, "add");
                assert_eq!(f.params.len(), 2);
                assert!(f.ret.is_some());
                assert_eq!(f.body.stmts.len(), 1);
            }
            other => panic!("expected fn, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_sum_type_multiline() {
        let program = parse_clean("type Light =\n  | Red\n  | Yellow\n  | Green");
        match &program.decls[0] {
            Decl::Type(t) => {
                assert_eq!(t.name.name, "Light");
                match &t.body {
                    TypeDeclBody::SumType(variants) => {
                        assert_eq!(variants.len(), 3);
                        assert_eq!(variants[0].name.name, "Red");
                        assert!(variants[0].params.is_empty());
                    }
                    other => panic!("expected sum type, got {other:?}"),
                }
            }
            other => panic!("expected type decl, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_sum_type_with_payload() {
        let program = parse_clean("type Shape = | Circle(radius: number) | Square(side: number)");
        match &program.decls[0] {
            Decl::Type(t) => match &t.body {
                TypeDeclBody::SumType(variants) => {
                    assert_eq!(variants[0].params.len(), 1);
                    assert_eq!(variants[0].params[0].name.name, "radius");
                }
                other => panic!("expected sum type, got {other:?}"),
            },
            other => panic!("expected type decl, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_type_alias() {
        let program = parse_clean("type Score = number");
        match &program.decls[0] {
            Decl::Type(t) => assert!(matches!(t.body, TypeDeclBody::Alias(_))),
            other => panic!("expected type decl, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_top_level_is_error() {
        let file = SourceFile::new("test.tyro", "42 + 1");
        let (_, errors) = parse_program(&file);
        assert!(errors.has_errors());
    }
}
