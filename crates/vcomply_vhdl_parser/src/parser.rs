//! Core parser infrastructure and top-level VHDL-2008 parsing rules.
//!
//! The [`Parser`] struct provides primitive operations (advance, expect, eat)
//! while top-level methods parse design files, entities, packages, context
//! declarations, and configurations. Parsing is structural: declarative
//! interfaces are extracted, statement bodies are skipped with a region
//! tracker rather than descended into.

use crate::ast::*;
use crate::error::ParseError;
use crate::reference;
use crate::token::{Kw, Token, TokenKind};
use vcomply_common::{Interner, Name};
use vcomply_source::{FileId, Span};

/// A structural parser for VHDL-2008 source text.
///
/// The parser consumes a token stream produced by the lexer and builds a
/// [`DesignFile`]. The first grammar violation aborts the file with a
/// [`ParseError`].
pub struct Parser<'src> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    source: &'src str,
    #[allow(dead_code)]
    file: FileId,
    pub(crate) interner: &'src Interner,
}

impl<'src> Parser<'src> {
    /// Creates a new parser from a token stream.
    pub fn new(tokens: Vec<Token>, source: &'src str, file: FileId, interner: &'src Interner) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            file,
            interner,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    /// Returns the kind of the current token.
    pub(crate) fn current(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Returns the source text of the current token.
    pub(crate) fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    /// Returns `true` if the current token matches the given kind.
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    /// Returns `true` if the current token is the given reserved word.
    pub(crate) fn at_kw(&self, kw: Kw) -> bool {
        self.current() == TokenKind::Keyword(kw)
    }

    /// Returns `true` if the parser is at end of file.
    pub(crate) fn at_eof(&self) -> bool {
        self.current() == TokenKind::Eof
    }

    /// Returns the span of the previous token.
    pub(crate) fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    /// Advances past the current token.
    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches. Returns `true` if consumed.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is the given reserved word.
    pub(crate) fn eat_kw(&mut self, kw: Kw) -> bool {
        self.eat(TokenKind::Keyword(kw))
    }

    /// Requires the current token to match the given kind.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    /// Requires the current token to be the given reserved word.
    pub(crate) fn expect_kw(&mut self, kw: Kw, what: &str) -> Result<(), ParseError> {
        if self.eat_kw(kw) {
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    /// Requires and interns an identifier (regular or extended).
    pub(crate) fn expect_name(&mut self) -> Result<Name, ParseError> {
        if self.at(TokenKind::Identifier) || self.at(TokenKind::ExtendedIdentifier) {
            let name = self.interner.intern_name(self.current_text());
            self.advance();
            Ok(name)
        } else {
            Err(self.expected("identifier"))
        }
    }

    /// Returns the kind of the token `n` positions ahead of the current one.
    pub(crate) fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Returns `true` if the next token matches the given kind.
    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.nth_kind(1) == kind
    }

    /// Returns `true` if the next token is the given reserved word.
    pub(crate) fn peek_is_kw(&self, kw: Kw) -> bool {
        self.nth_kind(1) == TokenKind::Keyword(kw)
    }

    /// Builds an "expected X, found Y" error at the current position.
    pub(crate) fn expected(&self, what: &str) -> ParseError {
        let found = if self.at_eof() {
            "end of file".to_string()
        } else {
            format!("'{}'", self.current_text())
        };
        ParseError::Expected {
            expected: what.to_string(),
            found,
            span: self.current_span(),
        }
    }

    // ========================================================================
    // Top-level parsing
    // ========================================================================

    /// Parses a complete VHDL design file.
    pub fn parse_design_file(&mut self) -> Result<DesignFile, ParseError> {
        let start = self.current_span();
        let mut units = Vec::new();
        while !self.at_eof() {
            units.push(self.parse_design_unit()?);
        }
        let span = if units.is_empty() {
            start
        } else {
            start.merge(self.prev_span())
        };
        Ok(DesignFile { units, span })
    }

    /// Parses a single design unit with its context clause.
    fn parse_design_unit(&mut self) -> Result<DesignUnit, ParseError> {
        let start = self.current_span();
        let context = self.parse_context_items()?;
        let payload = match self.current() {
            TokenKind::Keyword(Kw::Entity) => UnitPayload::Entity(self.parse_entity()?),
            TokenKind::Keyword(Kw::Architecture) => {
                UnitPayload::Architecture(self.parse_architecture()?)
            }
            TokenKind::Keyword(Kw::Package) => {
                if self.peek_is_kw(Kw::Body) {
                    UnitPayload::PackageBody(self.parse_package_body()?)
                } else {
                    UnitPayload::Package(self.parse_package()?)
                }
            }
            TokenKind::Keyword(Kw::Context) => UnitPayload::Context(self.parse_context_decl()?),
            TokenKind::Keyword(Kw::Configuration) => {
                UnitPayload::Configuration(self.parse_configuration()?)
            }
            _ => return Err(self.expected("a design unit")),
        };
        let refs = reference::extract(&context, &payload);
        let span = start.merge(self.prev_span());
        Ok(DesignUnit {
            context,
            payload,
            refs,
            span,
        })
    }

    // ========================================================================
    // Context clauses
    // ========================================================================

    /// Parses the context items preceding a design unit (or the items inside
    /// a context declaration).
    pub(crate) fn parse_context_items(&mut self) -> Result<Vec<ContextItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.current() {
                TokenKind::Keyword(Kw::Library) => items.push(self.parse_library_clause()?),
                TokenKind::Keyword(Kw::Use) => self.parse_use_clause(&mut items)?,
                TokenKind::Keyword(Kw::Context) if !self.context_decl_ahead() => {
                    self.parse_context_reference(&mut items)?
                }
                _ => break,
            }
        }
        Ok(items)
    }

    /// `context name is` starts a context declaration; `context lib.name;`
    /// is a reference clause.
    fn context_decl_ahead(&self) -> bool {
        self.nth_kind(2) == TokenKind::Keyword(Kw::Is)
    }

    /// Parses a library clause: `library name {, name};`.
    fn parse_library_clause(&mut self) -> Result<ContextItem, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Library, "'library'")?;
        let mut names = vec![self.expect_name()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_name()?);
        }
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(ContextItem::Library {
            names,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses a use clause: `use sel_name {, sel_name};`. Each selected name
    /// becomes its own item.
    fn parse_use_clause(&mut self, items: &mut Vec<ContextItem>) -> Result<(), ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Use, "'use'")?;
        loop {
            let name = self.parse_selected_name()?;
            if name.parts.len() < 2 && !name.all {
                return Err(self.expected("a selected name"));
            }
            items.push(ContextItem::Use {
                name,
                span: start.merge(self.prev_span()),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    /// Parses a context reference: `context sel_name {, sel_name};`.
    fn parse_context_reference(&mut self, items: &mut Vec<ContextItem>) -> Result<(), ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Context, "'context'")?;
        loop {
            let name = self.parse_selected_name()?;
            if name.parts.len() < 2 {
                return Err(self.expected("a selected name"));
            }
            items.push(ContextItem::Context {
                name,
                span: start.merge(self.prev_span()),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    /// Parses a dotted name, stripping a trailing `.all` into a flag.
    pub(crate) fn parse_selected_name(&mut self) -> Result<SelectedName, ParseError> {
        let start = self.current_span();
        let mut parts = vec![self.expect_name()?];
        let mut all = false;
        while self.eat(TokenKind::Dot) {
            if self.at_kw(Kw::All) {
                self.advance();
                all = true;
                break;
            }
            parts.push(self.expect_suffix_name()?);
        }
        Ok(SelectedName {
            parts,
            all,
            span: start.merge(self.prev_span()),
        })
    }

    /// A selected-name suffix: an identifier, an operator symbol like `"+"`,
    /// or a character literal like `'0'`.
    fn expect_suffix_name(&mut self) -> Result<Name, ParseError> {
        match self.current() {
            TokenKind::Identifier
            | TokenKind::ExtendedIdentifier
            | TokenKind::StringLiteral
            | TokenKind::CharLiteral => {
                let name = self.interner.intern_name(self.current_text());
                self.advance();
                Ok(name)
            }
            _ => Err(self.expected("a name suffix")),
        }
    }

    // ========================================================================
    // Library units
    // ========================================================================

    /// Parses an entity declaration, keeping its generic and port clauses.
    fn parse_entity(&mut self) -> Result<EntityUnit, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Entity, "'entity'")?;
        let name = self.expect_name()?;
        self.expect_kw(Kw::Is, "'is'")?;
        let generics = if self.at_kw(Kw::Generic) {
            self.parse_generic_clause()?
        } else {
            Vec::new()
        };
        let ports = if self.at_kw(Kw::Port) {
            self.parse_port_clause()?
        } else {
            Vec::new()
        };
        // Remaining declarative items and any passive statement part.
        self.skip_region("entity declaration", start)?;
        Ok(EntityUnit {
            name,
            generics,
            ports,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses an architecture body, scanning for constants, process labels,
    /// and entity instantiations.
    fn parse_architecture(&mut self) -> Result<ArchitectureUnit, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Architecture, "'architecture'")?;
        let name = self.expect_name()?;
        self.expect_kw(Kw::Of, "'of'")?;
        let mut entity_name = self.expect_name()?;
        while self.eat(TokenKind::Dot) {
            entity_name = self.expect_name()?;
        }
        self.expect_kw(Kw::Is, "'is'")?;
        let body = self.scan_architecture_body(start)?;
        Ok(ArchitectureUnit {
            name,
            entity_name,
            constants: body.constants,
            process_labels: body.process_labels,
            instantiations: body.instantiations,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses a package declaration, keeping subprogram signatures.
    fn parse_package(&mut self) -> Result<PackageUnit, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Package, "'package'")?;
        let name = self.expect_name()?;
        self.expect_kw(Kw::Is, "'is'")?;

        // Package instantiation: `package p is new lib.pkg generic map (...);`
        if self.at_kw(Kw::New) {
            self.skip_to_semicolon();
            return Ok(PackageUnit {
                name,
                subprograms: Vec::new(),
                span: start.merge(self.prev_span()),
            });
        }

        let mut subprograms = Vec::new();
        let mut depth = 1u32;
        while depth > 0 {
            if self.at_eof() {
                return Err(ParseError::UnclosedRegion {
                    region: "package declaration",
                    span: start,
                });
            }
            if depth == 1 {
                match self.current() {
                    TokenKind::Keyword(Kw::End) => {
                        self.advance();
                        self.skip_to_semicolon();
                        depth = 0;
                    }
                    TokenKind::Keyword(Kw::Function | Kw::Procedure | Kw::Pure | Kw::Impure) => {
                        let sig = self.parse_subprogram_signature()?;
                        self.expect(TokenKind::Semicolon, "';'")?;
                        subprograms.push(sig);
                    }
                    _ => self.region_step(&mut depth, false),
                }
            } else {
                self.region_step(&mut depth, false);
            }
        }
        Ok(PackageUnit {
            name,
            subprograms,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses a package body, skipping its contents.
    fn parse_package_body(&mut self) -> Result<PackageBodyUnit, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Package, "'package'")?;
        self.expect_kw(Kw::Body, "'body'")?;
        let name = self.expect_name()?;
        self.expect_kw(Kw::Is, "'is'")?;
        self.skip_region("package body", start)?;
        Ok(PackageBodyUnit {
            name,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses a context declaration: `context name is <clauses> end;`.
    fn parse_context_decl(&mut self) -> Result<ContextDeclUnit, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Context, "'context'")?;
        let name = self.expect_name()?;
        self.expect_kw(Kw::Is, "'is'")?;
        let items = self.parse_context_items()?;
        if self.at_eof() {
            return Err(ParseError::UnclosedRegion {
                region: "context declaration",
                span: start,
            });
        }
        self.expect_kw(Kw::End, "'end'")?;
        self.skip_to_semicolon();
        Ok(ContextDeclUnit {
            name,
            items,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses a configuration declaration, skipping its block configuration.
    ///
    /// Inside configurations `for ... end for;` regions are counted, unlike
    /// the loop-parameter `for` everywhere else.
    fn parse_configuration(&mut self) -> Result<ConfigurationUnit, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Configuration, "'configuration'")?;
        let name = self.expect_name()?;
        self.expect_kw(Kw::Of, "'of'")?;
        let mut entity_name = self.expect_name()?;
        while self.eat(TokenKind::Dot) {
            entity_name = self.expect_name()?;
        }
        self.expect_kw(Kw::Is, "'is'")?;
        self.skip_region_with("configuration declaration", start, true)?;
        Ok(ConfigurationUnit {
            name,
            entity_name,
            span: start.merge(self.prev_span()),
        })
    }
}
