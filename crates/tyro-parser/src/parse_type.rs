//! Type annotation parsing.

use tyro_lexer::token::TokenKind;
use tyro_types::ast::*;
use tyro_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a type annotation.
    ///
    /// `number | string | bool | nil | list<T> | { f: T, ... } |
    ///  (T1, T2) -> R | Named`
    pub(crate) fn parse_type_annotation(&mut self) -> Option<TypeAnnotation> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::KwNumber => {
                self.advance();
                Some(TypeAnnotation::new(TypeKind::Number, start))
            }
            TokenKind::KwString => {
                self.advance();
                Some(TypeAnnotation::new(TypeKind::String, start))
            }
            TokenKind::KwBool => {
                self.advance();
                Some(TypeAnnotation::new(TypeKind::Bool, start))
            }
            TokenKind::Nil => {
                self.advance();
                Some(TypeAnnotation::new(TypeKind::Nil, start))
            }

            TokenKind::KwList => {
                self.advance();
                self.expect(&TokenKind::Less)?;
                let inner = self.parse_type_annotation()?;
                self.expect(&TokenKind::Greater)?;
                let span = start.merge(self.previous_span());
                Some(TypeAnnotation::new(TypeKind::List(Box::new(inner)), span))
            }

            // `{ name: string, age: number }`
            TokenKind::LBrace => {
                self.advance();
                self.skip_newlines();
                let mut fields = Vec::new();
                if !self.check_exact(&TokenKind::RBrace) {
                    loop {
                        let name = self.expect_identifier()?;
                        self.expect(&TokenKind::Colon)?;
                        let type_ann = self.parse_type_annotation()?;
                        let span = name.span.merge(type_ann.span);
                        fields.push(RecordTypeField {
                            name,
                            type_ann,
                            span,
                        });
                        if !self.eat_comma() {
                            break;
                        }
                        self.skip_newlines();
                    }
                }
                self.skip_newlines();
                self.expect(&TokenKind::RBrace)?;
                let span = start.merge(self.previous_span());
                Some(TypeAnnotation::new(TypeKind::Record(fields), span))
            }

            // `(T1, T2) -> R`
            TokenKind::LParen => {
                self.advance();
                let mut params = Vec::new();
                if !self.check_exact(&TokenKind::RParen) {
                    loop {
                        let param = self.parse_type_annotation()?;
                        params.push(param);
                        if !self.eat_comma() {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RParen)?;
                self.expect(&TokenKind::Arrow)?;
                let ret = self.parse_type_annotation()?;
                let span = start.merge(ret.span);
                Some(TypeAnnotation::new(
                    TypeKind::Function {
                        params,
                        ret: Box::new(ret),
                    },
                    span,
                ))
            }

            TokenKind::Identifier(name) => {
                if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                    self.advance();
                    Some(TypeAnnotation::new(TypeKind::Named(name), start))
                } else {
                    self.error_at_current(
                        ErrorCode::UNKNOWN_TYPE,
                        format!("unknown type '{name}' (type names are PascalCase)"),
                    );
                    None
                }
            }

            other => {
                self.error_at_current(
                    ErrorCode::UNKNOWN_TYPE,
                    format!("expected a type, got '{other}'"),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_program;
    use tyro_types::ast::*;
    use tyro_types::SourceFile;

    fn parse_let_type(source: &str) -> TypeAnnotation {
        let file = SourceFile::new("test.tyro", source);
        let (program, errors) = parse_program(&file);
        assert!(!errors.has_errors(), "unexpected errors: {:?}", errors.errors);
        match program.unwrap().decls.remove(0) {
            Decl::Let(l) => l.type_ann.expect("annotation"),
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_primitive_types() {
        assert!(matches!(
            parse_let_type("let x: number = 1").kind,
            TypeKind::Number
        ));
        assert!(matches!(
            parse_let_type("let x: string = \"s\"").kind,
            TypeKind::String
        ));
        assert!(matches!(
            parse_let_type("let x: bool = true").kind,
            TypeKind::Bool
        ));
    }

    #[test]
    fn test_parse_list_type() {
        let ann = parse_let_type("let xs: list<number> = [1]");
        match ann.kind {
            TypeKind::List(inner) => assert!(matches!(inner.kind, TypeKind::Number)),
            other => panic!("expected list type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_record_type() {
        let ann = parse_let_type("let u: { name: string, age: number } = { name: \"a\", age: 1 }");
        match ann.kind {
            TypeKind::Record(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].name.name, "name");
            }
            other => panic!("expected record type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_type() {
        let ann = parse_let_type("let f: (number) -> bool = fn(n: number) { n > 0 }");
        match ann.kind {
            TypeKind::Function { params, ret } => {
                assert_eq!(params.len(), 1);
                assert!(matches!(ret.kind, TypeKind::Bool));
            }
            other => panic!("expected function type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_named_type() {
        let file = SourceFile::new(
            "test.tyro",
            "type Light = | Red | Green\nfn go(l: Light) -> bool {\n  return true\n}",
        );
        let (program, errors) = parse_program(&file);
        assert!(!errors.has_errors());
        match &program.unwrap().decls[1] {
            Decl::Fn(f) => {
                assert!(matches!(&f.params[0].type_ann.kind, TypeKind::Named(n) if n == "Light"));
            }
            other => panic!("expected fn, got {other:?}"),
        }
    }

    #[test]
    fn test_lowercase_named_type_rejected() {
        let file = SourceFile::new("test.tyro", "let x: widget = 1");
        let (_, errors) = parse_program(&file);
        assert!(errors.has_errors());
    }
}
