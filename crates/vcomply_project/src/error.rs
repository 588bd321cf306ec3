//! Error types for project loading and unit lookup.

use std::path::PathBuf;

use vcomply_source::Span;
use vcomply_vhdl_parser::{ParseError, UnitKind};

/// Errors that can occur while registering source files or looking up
/// design units.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// A source file could not be read.
    #[error("failed to read '{path}': {source}")]
    FileIO {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A source file failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Two design units share the same (library, kind, name) identity.
    #[error("duplicate {kind} '{name}' in library '{library}'")]
    DuplicateUnit {
        /// The library both units were registered under.
        library: String,
        /// The kind of the colliding units.
        kind: UnitKind,
        /// The colliding name, in the spelling of the second unit.
        name: String,
        /// The span of the unit registered first.
        first: Span,
        /// The span of the unit whose registration failed.
        second: Span,
    },

    /// A lookup named a unit that is not in the registry.
    #[error("no {kind} '{name}' in library '{library}'")]
    NotFound {
        /// The library that was searched.
        library: String,
        /// The kind that was looked up.
        kind: UnitKind,
        /// The name that was looked up.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate_unit() {
        let err = ProjectError::DuplicateUnit {
            library: "work".to_string(),
            kind: UnitKind::Entity,
            name: "uart_vc".to_string(),
            first: Span::DUMMY,
            second: Span::DUMMY,
        };
        assert_eq!(format!("{err}"), "duplicate entity 'uart_vc' in library 'work'");
    }

    #[test]
    fn display_not_found() {
        let err = ProjectError::NotFound {
            library: "vc_lib".to_string(),
            kind: UnitKind::Package,
            name: "uart_pkg".to_string(),
        };
        assert_eq!(format!("{err}"), "no package 'uart_pkg' in library 'vc_lib'");
    }

    #[test]
    fn display_file_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ProjectError::FileIO {
            path: PathBuf::from("missing.vhd"),
            source: io_err,
        };
        let display = format!("{err}");
        assert!(display.starts_with("failed to read 'missing.vhd':"));
    }

    #[test]
    fn parse_error_is_transparent() {
        let parse = ParseError::UnclosedRegion {
            region: "entity declaration",
            span: Span::DUMMY,
        };
        let err = ProjectError::from(parse);
        assert_eq!(
            format!("{err}"),
            "unexpected end of file inside entity declaration"
        );
    }
}
