//! Interface list and declaration parsing.
//!
//! Covers generic clauses, port clauses, subprogram parameter lists, and the
//! constant declarations kept from architecture declarative parts. Type
//! marks are reduced to their last simple name; constraints and default
//! expressions are skipped at token level, with only the default's span
//! retained.

use crate::ast::{ConstantRecord, InterfaceDecl, Mode, SubprogramKind, SubprogramSignature};
use crate::error::ParseError;
use crate::parser::Parser;
use crate::token::{Kw, TokenKind};
use vcomply_common::Name;
use vcomply_source::Span;

impl<'src> Parser<'src> {
    /// Parses a generic clause: `generic (<interface list>);`.
    pub(crate) fn parse_generic_clause(&mut self) -> Result<Vec<InterfaceDecl>, ParseError> {
        self.expect_kw(Kw::Generic, "'generic'")?;
        self.expect(TokenKind::LeftParen, "'('")?;
        let list = self.parse_interface_list()?;
        self.expect(TokenKind::RightParen, "')'")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(list)
    }

    /// Parses a port clause: `port (<interface list>);`.
    pub(crate) fn parse_port_clause(&mut self) -> Result<Vec<InterfaceDecl>, ParseError> {
        self.expect_kw(Kw::Port, "'port'")?;
        self.expect(TokenKind::LeftParen, "'('")?;
        let list = self.parse_interface_list()?;
        self.expect(TokenKind::RightParen, "')'")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(list)
    }

    /// Parses a semicolon-separated interface list.
    pub(crate) fn parse_interface_list(&mut self) -> Result<Vec<InterfaceDecl>, ParseError> {
        let mut decls = vec![self.parse_interface_decl()?];
        while self.eat(TokenKind::Semicolon) {
            decls.push(self.parse_interface_decl()?);
        }
        Ok(decls)
    }

    /// Parses one interface element: `[class] name {, name} : [mode] type
    /// [constraint] [:= default]`.
    fn parse_interface_decl(&mut self) -> Result<InterfaceDecl, ParseError> {
        let start = self.current_span();
        // Optional object class prefix.
        if matches!(
            self.current().kw(),
            Some(Kw::Constant | Kw::Signal | Kw::Variable | Kw::File)
        ) {
            self.advance();
        }
        let mut names = vec![self.expect_name()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_name()?);
        }
        self.expect(TokenKind::Colon, "':'")?;
        let mode = self.parse_mode();
        let ty = self.parse_type_mark()?;
        self.skip_constraint();
        let default = if self.eat(TokenKind::ColonEquals) {
            Some(self.skip_default_expr())
        } else {
            None
        };
        Ok(InterfaceDecl {
            names,
            mode,
            ty,
            default,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_mode(&mut self) -> Option<Mode> {
        let mode = match self.current().kw()? {
            Kw::In => Mode::In,
            Kw::Out => Mode::Out,
            Kw::Inout => Mode::Inout,
            Kw::Buffer => Mode::Buffer,
            Kw::Linkage => Mode::Linkage,
            _ => return None,
        };
        self.advance();
        Some(mode)
    }

    /// Parses a type mark, returning its last simple name. `lib.pkg.t`
    /// reduces to `t`.
    pub(crate) fn parse_type_mark(&mut self) -> Result<Name, ParseError> {
        let mut name = self.expect_name()?;
        while self.at(TokenKind::Dot)
            && matches!(
                self.nth_kind(1),
                TokenKind::Identifier | TokenKind::ExtendedIdentifier
            )
        {
            self.advance();
            name = self.expect_name()?;
        }
        Ok(name)
    }

    /// Skips an index or range constraint after a type mark. Stops before a
    /// depth-0 `;`, `)`, or `:=`.
    fn skip_constraint(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.current() {
                TokenKind::LeftParen => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightParen => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.advance();
                }
                TokenKind::Semicolon | TokenKind::ColonEquals if depth == 0 => return,
                TokenKind::Eof => return,
                _ => self.advance(),
            }
        }
    }

    /// Skips a default expression after `:=`, returning its span. Stops
    /// before a depth-0 `;` or `)`.
    fn skip_default_expr(&mut self) -> Span {
        let start = self.current_span();
        let mut depth = 0u32;
        loop {
            match self.current() {
                TokenKind::LeftParen => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightParen => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    self.advance();
                }
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::Eof => break,
                _ => self.advance(),
            }
        }
        start.merge(self.prev_span())
    }

    /// Parses a subprogram declaration up to (but not including) the
    /// terminating `;` or the `is` of a body.
    pub(crate) fn parse_subprogram_signature(&mut self) -> Result<SubprogramSignature, ParseError> {
        let start = self.current_span();
        if matches!(self.current().kw(), Some(Kw::Pure | Kw::Impure)) {
            self.advance();
        }
        let kind = match self.current().kw() {
            Some(Kw::Function) => SubprogramKind::Function,
            Some(Kw::Procedure) => SubprogramKind::Procedure,
            _ => return Err(self.expected("'function' or 'procedure'")),
        };
        self.advance();
        let name = self.expect_designator()?;
        let params = if self.eat(TokenKind::LeftParen) {
            let list = self.parse_interface_list()?;
            self.expect(TokenKind::RightParen, "')'")?;
            list
        } else {
            Vec::new()
        };
        let return_type = if kind == SubprogramKind::Function {
            self.expect_kw(Kw::Return, "'return'")?;
            Some(self.parse_type_mark()?)
        } else {
            None
        };
        Ok(SubprogramSignature {
            kind,
            name,
            params,
            return_type,
            span: start.merge(self.prev_span()),
        })
    }

    /// A subprogram designator: an identifier or an operator symbol.
    fn expect_designator(&mut self) -> Result<Name, ParseError> {
        match self.current() {
            TokenKind::Identifier | TokenKind::ExtendedIdentifier | TokenKind::StringLiteral => {
                let name = self.interner.intern_name(self.current_text());
                self.advance();
                Ok(name)
            }
            _ => Err(self.expected("a subprogram designator")),
        }
    }

    /// Parses a constant declaration, recording names and type mark. The
    /// value expression is skipped; a `;` cannot occur inside it at token
    /// level, so the declaration ends at the next semicolon.
    pub(crate) fn parse_constant_decl(&mut self) -> Result<ConstantRecord, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Constant, "'constant'")?;
        let mut names = vec![self.expect_name()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_name()?);
        }
        self.expect(TokenKind::Colon, "':'")?;
        let type_mark = self.parse_type_mark()?;
        self.skip_to_semicolon();
        Ok(ConstantRecord {
            names,
            type_mark,
            span: start.merge(self.prev_span()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::UnitPayload;
    use crate::parse_file;
    use vcomply_common::Interner;
    use vcomply_source::FileId;

    fn parse_entity_decls(interner: &Interner, source: &str) -> Vec<InterfaceDecl> {
        let file = parse_file(source, FileId::from_raw(0), interner).expect("parse failed");
        match &file.units[0].payload {
            UnitPayload::Entity(e) => e.generics.clone(),
            other => panic!("expected entity, got {other:?}"),
        }
    }

    #[test]
    fn shared_names_in_one_element() {
        let interner = Interner::new();
        let decls = parse_entity_decls(
            &interner,
            "entity e is generic (a, b : natural := 0); end;",
        );
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].names.len(), 2);
        assert_eq!(decls[0].names[1], interner.intern_name("b"));
        assert!(decls[0].has_default());
    }

    #[test]
    fn dotted_type_mark_keeps_last_name() {
        let interner = Interner::new();
        let decls = parse_entity_decls(
            &interner,
            "entity e is generic (uart : vunit_lib.vc_pkg.vc_handle_t); end;",
        );
        assert_eq!(decls[0].ty, interner.intern_name("vc_handle_t"));
    }

    #[test]
    fn constrained_type_with_default() {
        let interner = Interner::new();
        let decls = parse_entity_decls(
            &interner,
            "entity e is generic (data : std_logic_vector(7 downto 0) := (others => '0')); end;",
        );
        assert_eq!(decls[0].ty, interner.intern_name("std_logic_vector"));
        assert!(decls[0].has_default());
    }

    #[test]
    fn range_constraint_is_skipped() {
        let interner = Interner::new();
        let decls = parse_entity_decls(
            &interner,
            "entity e is generic (n : natural range 0 to 7); end;",
        );
        assert_eq!(decls[0].ty, interner.intern_name("natural"));
        assert!(!decls[0].has_default());
    }

    #[test]
    fn default_span_covers_expression() {
        let interner = Interner::new();
        let source = "entity e is generic (g : natural := 3 + 4); end;";
        let file = parse_file(source, FileId::from_raw(0), &interner).expect("parse failed");
        let entity = match &file.units[0].payload {
            UnitPayload::Entity(e) => e,
            other => panic!("expected entity, got {other:?}"),
        };
        let default = entity.generics[0].default.expect("default missing");
        assert_eq!(
            &source[default.start as usize..default.end as usize],
            "3 + 4"
        );
    }

    #[test]
    fn class_prefix_and_modes() {
        let interner = Interner::new();
        let source = "entity e is
                        port (signal clk : in std_logic;
                              signal data : inout std_logic;
                              q : buffer std_logic);
                      end;";
        let file = parse_file(source, FileId::from_raw(0), &interner).expect("parse failed");
        let entity = match &file.units[0].payload {
            UnitPayload::Entity(e) => e,
            other => panic!("expected entity, got {other:?}"),
        };
        assert_eq!(entity.ports[0].mode, Some(Mode::In));
        assert_eq!(entity.ports[1].mode, Some(Mode::Inout));
        assert_eq!(entity.ports[2].mode, Some(Mode::Buffer));
    }

    #[test]
    fn operator_designator() {
        let interner = Interner::new();
        let source = "package p is function \"+\" (l, r : fixed_t) return fixed_t; end;";
        let file = parse_file(source, FileId::from_raw(0), &interner).expect("parse failed");
        let pkg = match &file.units[0].payload {
            UnitPayload::Package(p) => p,
            other => panic!("expected package, got {other:?}"),
        };
        assert_eq!(pkg.subprograms[0].name, interner.intern_name("\"+\""));
    }

    #[test]
    fn function_without_parameters() {
        let interner = Interner::new();
        let source = "package p is impure function new_vc return vc_handle_t; end;";
        let file = parse_file(source, FileId::from_raw(0), &interner).expect("parse failed");
        let pkg = match &file.units[0].payload {
            UnitPayload::Package(p) => p,
            other => panic!("expected package, got {other:?}"),
        };
        assert!(pkg.subprograms[0].params.is_empty());
        assert_eq!(
            pkg.subprograms[0].return_type,
            Some(interner.intern_name("vc_handle_t"))
        );
    }

    #[test]
    fn missing_colon_in_interface() {
        let interner = Interner::new();
        let err = parse_file(
            "entity e is generic (g natural); end;",
            FileId::from_raw(0),
            &interner,
        )
        .expect_err("expected a parse error");
        assert_eq!(format!("{err}"), "expected ':', found 'natural'");
    }
}
