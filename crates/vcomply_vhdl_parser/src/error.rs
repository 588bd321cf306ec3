//! Parse errors for structural VHDL analysis.

use vcomply_source::Span;

/// An error raised while lexing or parsing VHDL source text.
///
/// Parse errors are fatal for the file being parsed. They carry a [`Span`]
/// so callers can resolve the offending location through a
/// [`SourceDb`](vcomply_source::SourceDb).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A string, comment, bit-string, or extended identifier was opened but
    /// never closed.
    #[error("unterminated {construct}")]
    Unterminated {
        /// Which construct was left open.
        construct: &'static str,
        /// Location of the opening delimiter.
        span: Span,
    },

    /// A byte that cannot start any VHDL token.
    #[error("unrecognized character '{ch}'")]
    UnrecognizedChar {
        /// The offending character.
        ch: char,
        /// Location of the character.
        span: Span,
    },

    /// The parser found a different token than the grammar requires.
    #[error("expected {expected}, found {found}")]
    Expected {
        /// What the grammar required at this point.
        expected: String,
        /// What was actually present.
        found: String,
        /// Location of the unexpected token.
        span: Span,
    },

    /// A declarative region (entity, package, process, loop, ...) reached
    /// end of file before its closing `end`.
    #[error("unexpected end of file inside {region}")]
    UnclosedRegion {
        /// The region that was still open.
        region: &'static str,
        /// Location where the region started.
        span: Span,
    },
}

impl ParseError {
    /// Returns the source span the error points at.
    pub fn span(&self) -> Span {
        match self {
            ParseError::Unterminated { span, .. }
            | ParseError::UnrecognizedChar { span, .. }
            | ParseError::Expected { span, .. }
            | ParseError::UnclosedRegion { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unterminated() {
        let err = ParseError::Unterminated {
            construct: "string literal",
            span: Span::DUMMY,
        };
        assert_eq!(format!("{err}"), "unterminated string literal");
    }

    #[test]
    fn display_expected() {
        let err = ParseError::Expected {
            expected: "identifier".to_string(),
            found: "';'".to_string(),
            span: Span::DUMMY,
        };
        assert_eq!(format!("{err}"), "expected identifier, found ';'");
    }

    #[test]
    fn display_unclosed_region() {
        let err = ParseError::UnclosedRegion {
            region: "entity declaration",
            span: Span::DUMMY,
        };
        assert_eq!(
            format!("{err}"),
            "unexpected end of file inside entity declaration"
        );
    }

    #[test]
    fn span_accessor() {
        let span = Span::new(vcomply_source::FileId::from_raw(0), 3, 9);
        let err = ParseError::UnrecognizedChar { ch: '~', span };
        assert_eq!(err.span(), span);
    }
}
