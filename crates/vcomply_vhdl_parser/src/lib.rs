//! Structural VHDL parser for verification component compliance checking.
//!
//! This crate extracts the declarative surface of a VHDL source file: entity
//! generics and ports, package subprogram signatures, context clauses, and
//! the architecture-level facts a compliance testbench cares about (constants,
//! process labels, entity instantiations). Statement bodies and expressions
//! are skipped at token level and never represented in the AST.
//!
//! The main entry point is [`parse_file`], which lexes and parses a source
//! string into a [`DesignFile`]. Parsing is fail-fast: the first error aborts
//! the file with a [`ParseError`] carrying the offending span.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): Converts source text to tokens, handling
//!   case-insensitive keywords, based literals, and block comments.
//! - **Parser** ([`parser`]): Structural parser over the token stream.
//!   Skipped regions are balanced with a keyword-driven depth counter rather
//!   than parsed recursively.
//! - **AST** ([`ast`]): Declarative AST node types with spans and serde
//!   support.
//! - **References** ([`reference`]): Typed library, package, context, and
//!   entity references extracted per design unit.

#![warn(missing_docs)]

pub mod ast;
pub mod error;
mod interface;
pub mod lexer;
pub mod parser;
pub mod reference;
mod skip;
pub mod token;

pub use ast::{DesignFile, DesignUnit, UnitKind, UnitPayload};
pub use error::ParseError;
pub use reference::{RefKind, Reference, Suffix};
pub use token::{Kw, Token, TokenKind};

use vcomply_common::Interner;
use vcomply_source::FileId;

/// Parses a VHDL source file into a structural AST.
///
/// Lexes the source text and parses the resulting token stream into a
/// [`DesignFile`]. Names are interned through `interner` with case-folded
/// identity. The first lexical or syntactic error aborts the whole file.
pub fn parse_file(
    source: &str,
    file: FileId,
    interner: &Interner,
) -> Result<DesignFile, ParseError> {
    let tokens = lexer::lex(source, file)?;
    let mut parser = parser::Parser::new(tokens, source, file, interner);
    parser.parse_design_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcomply_source::FileId;

    fn parse_ok(source: &str) -> DesignFile {
        let interner = Interner::new();
        parse_file(source, FileId::from_raw(0), &interner).expect("parse failed")
    }

    #[test]
    fn integration_verification_component_pair() {
        let file = parse_ok(
            "library ieee;
            library vunit_lib;
            use ieee.std_logic_1164.all;
            use vunit_lib.uart_pkg.all;
            context vunit_lib.com_context;

            entity uart_vc is
                generic (
                    uart : uart_handle_t
                );
                port (
                    tx : out std_logic;
                    rx : in std_logic
                );
            end entity uart_vc;

            architecture bfm of uart_vc is
                constant baud_period : time := 8680 ns;
            begin
                tx_proc : process
                begin
                    wait;
                end process;

                rx_proc : process
                begin
                    wait;
                end process;
            end architecture bfm;",
        );
        assert_eq!(file.units.len(), 2);
        assert_eq!(file.units[0].kind(), UnitKind::Entity);
        assert_eq!(file.units[1].kind(), UnitKind::Architecture);
        let arch = match &file.units[1].payload {
            UnitPayload::Architecture(a) => a,
            other => panic!("expected architecture, got {other:?}"),
        };
        assert_eq!(arch.constants.len(), 1);
        assert_eq!(arch.process_labels.len(), 2);
    }

    #[test]
    fn integration_package_with_constructor() {
        let interner = Interner::new();
        let file = parse_file(
            "library vunit_lib;
            context vunit_lib.vunit_context;

            package uart_pkg is
                type uart_handle_t is record
                    p_actor : actor_t;
                end record;

                impure function new_uart_master (
                    baud_rate : natural := 115200;
                    logger : logger_t := uart_logger
                ) return uart_handle_t;

                procedure send (
                    signal net : inout network_t;
                    uart : uart_handle_t;
                    data : std_logic_vector(7 downto 0)
                );
            end package uart_pkg;",
            FileId::from_raw(0),
            &interner,
        )
        .expect("parse failed");
        let pkg = match &file.units[0].payload {
            UnitPayload::Package(p) => p,
            other => panic!("expected package, got {other:?}"),
        };
        assert_eq!(pkg.subprograms.len(), 2);
        assert_eq!(
            pkg.subprograms[0].return_type,
            Some(interner.intern_name("uart_handle_t"))
        );
        assert_eq!(pkg.subprograms[1].params.len(), 3);
        assert_eq!(file.units[0].refs.len(), 2);
    }

    #[test]
    fn integration_testbench_file() {
        let interner = Interner::new();
        let file = parse_file(
            "library vunit_lib;
            context vunit_lib.vunit_context;
            context vunit_lib.com_context;
            use vunit_lib.sync_pkg.all;
            library work;
            use work.uart_pkg.all;

            entity tb_uart_vc_compliance is
                generic (
                    runner_cfg : string
                );
            end entity;

            architecture tb of tb_uart_vc_compliance is
                constant uart : uart_handle_t := new_uart_master;
            begin
                test_runner : process
                begin
                    test_runner_setup(runner, runner_cfg);
                    test_runner_cleanup(runner);
                end process test_runner;

                vc_inst : entity work.uart_vc
                    generic map (uart => uart);
            end architecture;",
            FileId::from_raw(0),
            &interner,
        )
        .expect("parse failed");
        assert_eq!(file.units.len(), 2);
        let entity = match &file.units[0].payload {
            UnitPayload::Entity(e) => e,
            other => panic!("expected entity, got {other:?}"),
        };
        assert_eq!(entity.generics.len(), 1);
        assert_eq!(entity.generics[0].ty, interner.intern_name("string"));
        let arch = match &file.units[1].payload {
            UnitPayload::Architecture(a) => a,
            other => panic!("expected architecture, got {other:?}"),
        };
        assert_eq!(
            arch.process_labels,
            vec![interner.intern_name("test_runner")]
        );
        assert_eq!(arch.instantiations.len(), 1);
        let entity_ref = file.units[1]
            .refs
            .iter()
            .find(|r| r.kind == RefKind::Entity)
            .expect("entity reference missing");
        assert_eq!(entity_ref.primary, Some(interner.intern_name("uart_vc")));
    }

    #[test]
    fn integration_error_carries_span() {
        let interner = Interner::new();
        let source = "entity e is generic (g : ); end;";
        let err = parse_file(source, FileId::from_raw(0), &interner)
            .expect_err("expected a parse error");
        let span = err.span();
        assert_eq!(&source[span.start as usize..span.end as usize], ")");
    }

    #[test]
    fn integration_serde_roundtrip() {
        let file = parse_ok(
            "entity top is
                port (clk : in std_logic);
            end entity top;",
        );
        let json = serde_json::to_string(&file).unwrap();
        let back: DesignFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, file);
    }
}
