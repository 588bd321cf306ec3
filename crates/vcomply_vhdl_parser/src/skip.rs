//! Region tracking for skipped statement bodies.
//!
//! Structural parsing never descends into statement bodies. Instead, an
//! explicit depth counter tracks `end`-terminated regions: every token that
//! opens such a region increments the depth, every `end` decrements it, and
//! a region is fully skipped when the depth returns to zero.
//!
//! The counting rules handle the VHDL keywords that open regions only in
//! some positions: `if`/`case` open one unless they belong to a generate
//! statement (the `generate` keyword is counted instead), `component` opens
//! one only for declarations, `function`/`procedure` only for bodies, and
//! `for` only inside configuration declarations.

use crate::ast::{ConstantRecord, EntityInstantiation};
use crate::error::ParseError;
use crate::parser::Parser;
use crate::token::{Kw, TokenKind};
use vcomply_common::Name;
use vcomply_source::Span;

/// The items collected while scanning an architecture body.
pub(crate) struct ArchBody {
    pub(crate) constants: Vec<ConstantRecord>,
    pub(crate) process_labels: Vec<Name>,
    pub(crate) instantiations: Vec<EntityInstantiation>,
}

impl<'src> Parser<'src> {
    /// Consumes tokens up to and including the next semicolon.
    pub(crate) fn skip_to_semicolon(&mut self) {
        while !self.at_eof() && !self.at(TokenKind::Semicolon) {
            self.advance();
        }
        self.eat(TokenKind::Semicolon);
    }

    /// Skips an already-opened region until its closing `end ...;`.
    ///
    /// The caller must have consumed the opener; the depth starts at one.
    pub(crate) fn skip_region(&mut self, region: &'static str, opened_at: Span) -> Result<(), ParseError> {
        self.skip_region_with(region, opened_at, false)
    }

    /// Like [`Parser::skip_region`], with `for` counted as a region opener.
    pub(crate) fn skip_region_with(
        &mut self,
        region: &'static str,
        opened_at: Span,
        count_for: bool,
    ) -> Result<(), ParseError> {
        let mut depth = 1u32;
        while depth > 0 {
            if self.at_eof() {
                return Err(ParseError::UnclosedRegion {
                    region,
                    span: opened_at,
                });
            }
            self.region_step(&mut depth, count_for);
        }
        Ok(())
    }

    /// Processes one token (or one small lookahead-bound group) while
    /// skipping, adjusting the region depth.
    pub(crate) fn region_step(&mut self, depth: &mut u32, count_for: bool) {
        match self.current() {
            TokenKind::Keyword(Kw::End) => {
                self.advance();
                self.skip_to_semicolon();
                *depth -= 1;
            }
            TokenKind::Keyword(
                Kw::Process | Kw::Block | Kw::Generate | Kw::Loop | Kw::Record | Kw::Units,
            ) => {
                *depth += 1;
                self.advance();
            }
            TokenKind::Keyword(Kw::Protected) => {
                self.advance();
                self.eat_kw(Kw::Body);
                *depth += 1;
            }
            TokenKind::Keyword(Kw::If) => {
                // `if ... then` opens a region; `if ... generate` does not,
                // the generate keyword is counted when reached.
                if self.then_opens_region() {
                    *depth += 1;
                }
                self.advance();
            }
            TokenKind::Keyword(Kw::Case) => {
                if self.case_opens_region() {
                    *depth += 1;
                }
                self.advance();
            }
            TokenKind::Keyword(Kw::For) => {
                // Loop-parameter `for` is not a region, the `loop` keyword
                // is. Block and component configurations end with `end for;`.
                if count_for {
                    *depth += 1;
                }
                self.advance();
            }
            TokenKind::Keyword(Kw::Function | Kw::Procedure) => {
                if self.subprogram_body_ahead() {
                    *depth += 1;
                }
                self.advance();
            }
            TokenKind::Keyword(Kw::Component) => self.component_step(depth),
            TokenKind::Keyword(Kw::Package) => self.nested_package_step(depth),
            _ => self.advance(),
        }
    }

    /// Scans ahead from an `if` for its `then`, without consuming.
    fn then_opens_region(&self) -> bool {
        let mut i = self.pos + 1;
        while let Some(t) = self.tokens.get(i) {
            match t.kind {
                TokenKind::Keyword(Kw::Then) => return true,
                TokenKind::Keyword(Kw::Generate) => return false,
                TokenKind::Semicolon | TokenKind::Eof => return false,
                _ => i += 1,
            }
        }
        false
    }

    /// Scans ahead from a `case` for its `is`, without consuming.
    fn case_opens_region(&self) -> bool {
        let mut i = self.pos + 1;
        while let Some(t) = self.tokens.get(i) {
            match t.kind {
                TokenKind::Keyword(Kw::Is) => return true,
                TokenKind::Keyword(Kw::Generate) => return false,
                TokenKind::Semicolon | TokenKind::Eof => return false,
                _ => i += 1,
            }
        }
        false
    }

    /// Scans ahead from `function`/`procedure` for a depth-0 `is` (a body)
    /// before a depth-0 `;` (a declaration), without consuming.
    fn subprogram_body_ahead(&self) -> bool {
        let mut i = self.pos + 1;
        let mut parens = 0u32;
        while let Some(t) = self.tokens.get(i) {
            match t.kind {
                TokenKind::LeftParen => parens += 1,
                TokenKind::RightParen => parens = parens.saturating_sub(1),
                TokenKind::Keyword(Kw::Is) if parens == 0 => return true,
                TokenKind::Semicolon if parens == 0 => return false,
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    /// A component declaration opens a region; a VHDL-2008 explicit
    /// component instantiation (`label : component name generic map ...`)
    /// does not. Disambiguated by the token after the component name.
    fn component_step(&mut self, depth: &mut u32) {
        self.advance(); // component
        if matches!(
            self.current(),
            TokenKind::Identifier | TokenKind::ExtendedIdentifier
        ) {
            self.advance(); // name
        }
        match self.current() {
            TokenKind::Keyword(Kw::Is | Kw::End) => *depth += 1,
            TokenKind::Keyword(Kw::Generic | Kw::Port) => {
                if !self.peek_is_kw(Kw::Map) {
                    *depth += 1;
                }
            }
            _ => {}
        }
    }

    /// A nested package declaration opens a region; a package instantiation
    /// (`package p is new ...;`) does not.
    fn nested_package_step(&mut self, depth: &mut u32) {
        self.advance(); // package
        self.eat_kw(Kw::Body);
        if matches!(
            self.current(),
            TokenKind::Identifier | TokenKind::ExtendedIdentifier
        ) {
            self.advance(); // name
        }
        if self.at_kw(Kw::Is) {
            if self.peek_is_kw(Kw::New) {
                self.advance();
            } else {
                self.advance();
                *depth += 1;
            }
        }
    }

    /// Scans an architecture body, collecting top-level constants, process
    /// labels, and direct entity instantiations while skipping everything
    /// else. The caller has consumed the header through `is`.
    pub(crate) fn scan_architecture_body(&mut self, opened_at: Span) -> Result<ArchBody, ParseError> {
        let mut body = ArchBody {
            constants: Vec::new(),
            process_labels: Vec::new(),
            instantiations: Vec::new(),
        };
        let mut in_stmt_part = false;
        let mut depth = 1u32;
        while depth > 0 {
            if self.at_eof() {
                return Err(ParseError::UnclosedRegion {
                    region: "architecture body",
                    span: opened_at,
                });
            }
            if depth > 1 {
                self.region_step(&mut depth, false);
                continue;
            }
            match self.current() {
                TokenKind::Keyword(Kw::End) => {
                    self.advance();
                    self.skip_to_semicolon();
                    depth = 0;
                }
                TokenKind::Keyword(Kw::Begin) => {
                    in_stmt_part = true;
                    self.advance();
                }
                TokenKind::Keyword(Kw::Constant) if !in_stmt_part => {
                    body.constants.push(self.parse_constant_decl()?);
                }
                TokenKind::Identifier | TokenKind::ExtendedIdentifier
                    if in_stmt_part && self.peek_is(TokenKind::Colon) =>
                {
                    let label = self.expect_name()?;
                    self.advance(); // colon
                    if self.at_kw(Kw::Postponed) && self.peek_is_kw(Kw::Process) {
                        self.advance();
                    }
                    if self.at_kw(Kw::Process) {
                        body.process_labels.push(label);
                        // The process region itself is counted on the next
                        // step.
                    } else if self.at_kw(Kw::Entity) {
                        body.instantiations
                            .push(self.parse_entity_instantiation(label)?);
                    }
                    // Anything else (component instantiation, block,
                    // generate) is left to the regular region stepping.
                }
                _ => self.region_step(&mut depth, false),
            }
        }
        Ok(body)
    }

    /// Parses the head of `label : entity lib.ent ...;` and skips the rest
    /// of the statement.
    fn parse_entity_instantiation(&mut self, label: Name) -> Result<EntityInstantiation, ParseError> {
        let start = self.current_span();
        self.expect_kw(Kw::Entity, "'entity'")?;
        let library = self.expect_name()?;
        self.expect(TokenKind::Dot, "'.'")?;
        let entity = self.expect_name()?;
        let span = start.merge(self.prev_span());
        self.skip_to_semicolon();
        Ok(EntityInstantiation {
            label: Some(label),
            library,
            entity,
            span,
        })
    }
}
