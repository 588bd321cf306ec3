//! Lexical analyzer for VHDL-2008 source text.
//!
//! Converts source text into a sequence of [`Token`]s, handling case-insensitive
//! reserved words, based literals, string/character/bit-string literals, block
//! and line comments, and extended identifiers. The first lexical error aborts
//! the file with a [`ParseError`].

use crate::error::ParseError;
use crate::token::{Kw, Token, TokenKind};
use vcomply_source::{FileId, Span};

/// Lexes the given source text into a vector of tokens.
///
/// Whitespace and comments are skipped. On success the returned vector always
/// ends with a [`TokenKind::Eof`] token.
pub fn lex(source: &str, file: FileId) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
}

impl<'a> Lexer<'a> {
    fn lex_all(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(self.file, self.pos as u32, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token()?);
        }
        Ok(tokens)
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn advance(&mut self) -> u8 {
        let b = self.source[self.pos];
        self.pos += 1;
        b
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            // Skip whitespace
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return Ok(());
            }
            // Line comment: --
            if self.peek() == b'-' && self.peek_at(1) == b'-' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            // Block comment: /* ... */ (VHDL-2008)
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                let mut depth = 1;
                while self.pos < self.source.len() && depth > 0 {
                    if self.source[self.pos] == b'/' && self.peek_at(1) == b'*' {
                        depth += 1;
                        self.pos += 2;
                    } else if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        depth -= 1;
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                    }
                }
                if depth > 0 {
                    return Err(ParseError::Unterminated {
                        construct: "block comment",
                        span: self.span_from(start),
                    });
                }
                continue;
            }
            return Ok(());
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        let b = self.peek();

        // Character literal: exactly '<char>'. Must be checked before the
        // operator path since tick is also used for attribute access; the
        // char after the closing quote must not continue an identifier,
        // otherwise this is a tick inside a name like clk'event.
        if b == b'\'' && self.pos + 2 < self.source.len() && self.source[self.pos + 2] == b'\'' {
            let after = if self.pos + 3 < self.source.len() {
                self.source[self.pos + 3]
            } else {
                0
            };
            if !is_ident_char(after) {
                self.pos += 3;
                return Ok(Token {
                    kind: TokenKind::CharLiteral,
                    span: self.span_from(start),
                });
            }
        }

        // Identifiers, reserved words, and bit string prefixes
        if is_ident_start(b) {
            return self.lex_identifier_or_keyword(start);
        }

        // Extended identifier: \...\
        if b == b'\\' {
            return self.lex_extended_identifier(start);
        }

        // Numeric literals
        if b.is_ascii_digit() {
            return self.lex_number(start);
        }

        // String literal
        if b == b'"' {
            return self.lex_string(start);
        }

        // Operators and punctuation
        self.lex_operator(start)
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> Result<Token, ParseError> {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }

        let text = &self.source[start..self.pos];

        // Bit string literal prefix: B"...", O"...", X"...", etc.
        if self.pos < self.source.len() && self.source[self.pos] == b'"' && text.len() <= 2 {
            let lower: Vec<u8> = text.iter().map(|b| b.to_ascii_lowercase()).collect();
            let is_bit_prefix = matches!(
                lower.as_slice(),
                b"b" | b"o" | b"x" | b"ub" | b"uo" | b"ux" | b"sb" | b"so" | b"sx" | b"d"
            );
            if is_bit_prefix {
                self.pos += 1; // skip opening "
                while self.pos < self.source.len() && self.source[self.pos] != b'"' {
                    if self.source[self.pos] == b'\n' {
                        return Err(ParseError::Unterminated {
                            construct: "bit string literal",
                            span: self.span_from(start),
                        });
                    }
                    self.pos += 1;
                }
                if self.pos >= self.source.len() {
                    return Err(ParseError::Unterminated {
                        construct: "bit string literal",
                        span: self.span_from(start),
                    });
                }
                self.pos += 1; // skip closing "
                return Ok(Token {
                    kind: TokenKind::BitStringLiteral,
                    span: self.span_from(start),
                });
            }
        }

        // Lowercase for reserved word lookup
        let mut lower_buf = [0u8; 64];
        let len = text.len().min(64);
        for (i, &ch) in text[..len].iter().enumerate() {
            lower_buf[i] = ch.to_ascii_lowercase();
        }
        let lower = std::str::from_utf8(&lower_buf[..len]).unwrap_or("");

        let kind = match Kw::from_folded(lower) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier,
        };

        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn lex_extended_identifier(&mut self, start: usize) -> Result<Token, ParseError> {
        self.pos += 1; // skip opening backslash
        while self.pos < self.source.len() {
            if self.source[self.pos] == b'\\' {
                // Escaped backslash: \\
                if self.peek_at(1) == b'\\' {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1; // skip closing backslash
                return Ok(Token {
                    kind: TokenKind::ExtendedIdentifier,
                    span: self.span_from(start),
                });
            }
            if self.source[self.pos] == b'\n' {
                break;
            }
            self.pos += 1;
        }
        Err(ParseError::Unterminated {
            construct: "extended identifier",
            span: self.span_from(start),
        })
    }

    fn lex_number(&mut self, start: usize) -> Result<Token, ParseError> {
        self.eat_digits();

        // Based literal: digits#...#
        if self.pos < self.source.len() && self.source[self.pos] == b'#' {
            self.pos += 1; // skip #
            while self.pos < self.source.len() {
                let ch = self.source[self.pos];
                if ch.is_ascii_hexdigit() || ch == b'_' || ch == b'.' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            if self.pos < self.source.len() && self.source[self.pos] == b'#' {
                self.pos += 1;
            } else {
                return Err(ParseError::Unterminated {
                    construct: "based literal",
                    span: self.span_from(start),
                });
            }
            self.eat_exponent();
            let text = &self.source[start..self.pos];
            let kind = if text.contains(&b'.') {
                TokenKind::RealLiteral
            } else {
                TokenKind::IntLiteral
            };
            return Ok(Token {
                kind,
                span: self.span_from(start),
            });
        }

        // Real literal: digits.digits
        if self.pos < self.source.len()
            && self.source[self.pos] == b'.'
            && self.peek_at(1).is_ascii_digit()
        {
            self.pos += 1; // skip .
            self.eat_digits();
            self.eat_exponent();
            return Ok(Token {
                kind: TokenKind::RealLiteral,
                span: self.span_from(start),
            });
        }

        // Optional exponent for integer
        self.eat_exponent();

        Ok(Token {
            kind: TokenKind::IntLiteral,
            span: self.span_from(start),
        })
    }

    fn eat_digits(&mut self) {
        while self.pos < self.source.len() {
            let ch = self.source[self.pos];
            if ch.is_ascii_digit() || ch == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn eat_exponent(&mut self) {
        if self.pos < self.source.len()
            && (self.source[self.pos] == b'e' || self.source[self.pos] == b'E')
        {
            self.pos += 1;
            if self.pos < self.source.len()
                && (self.source[self.pos] == b'+' || self.source[self.pos] == b'-')
            {
                self.pos += 1;
            }
            self.eat_digits();
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<Token, ParseError> {
        self.pos += 1; // skip opening "
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                return Err(ParseError::Unterminated {
                    construct: "string literal",
                    span: self.span_from(start),
                });
            }
            if self.source[self.pos] == b'"' {
                // Escaped quote: ""
                if self.peek_at(1) == b'"' {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1; // skip closing "
                return Ok(Token {
                    kind: TokenKind::StringLiteral,
                    span: self.span_from(start),
                });
            }
            self.pos += 1;
        }
    }

    fn lex_operator(&mut self, start: usize) -> Result<Token, ParseError> {
        let b = self.advance();
        let kind = match b {
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b':' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    TokenKind::ColonEquals
                } else {
                    TokenKind::Colon
                }
            }
            b'<' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    TokenKind::LessEquals
                } else if self.peek() == b'<' {
                    self.pos += 1;
                    TokenKind::DoubleLess
                } else {
                    TokenKind::LessThan
                }
            }
            b'>' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    TokenKind::GreaterEquals
                } else if self.peek() == b'>' {
                    self.pos += 1;
                    TokenKind::DoubleGreater
                } else {
                    TokenKind::GreaterThan
                }
            }
            b'=' => {
                if self.peek() == b'>' {
                    self.pos += 1;
                    TokenKind::Arrow
                } else {
                    TokenKind::Equals
                }
            }
            b'/' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    TokenKind::SlashEquals
                } else {
                    TokenKind::Slash
                }
            }
            b'*' => {
                if self.peek() == b'*' {
                    self.pos += 1;
                    TokenKind::DoubleStar
                } else {
                    TokenKind::Star
                }
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'&' => TokenKind::Ampersand,
            b'|' => TokenKind::Bar,
            b'\'' => TokenKind::Tick,
            b'.' => TokenKind::Dot,
            b'^' => TokenKind::Caret,
            b'@' => TokenKind::At,
            b'?' => match self.peek() {
                b'=' => {
                    self.pos += 1;
                    TokenKind::MatchEquals
                }
                b'/' => {
                    if self.peek_at(1) == b'=' {
                        self.pos += 2;
                        TokenKind::MatchSlashEquals
                    } else {
                        return Err(ParseError::UnrecognizedChar {
                            ch: '?',
                            span: self.span_from(start),
                        });
                    }
                }
                b'<' => {
                    self.pos += 1;
                    if self.peek() == b'=' {
                        self.pos += 1;
                        TokenKind::MatchLessEquals
                    } else {
                        TokenKind::MatchLess
                    }
                }
                b'>' => {
                    self.pos += 1;
                    if self.peek() == b'=' {
                        self.pos += 1;
                        TokenKind::MatchGreaterEquals
                    } else {
                        TokenKind::MatchGreater
                    }
                }
                b'?' => {
                    self.pos += 1;
                    TokenKind::ConditionOp
                }
                _ => {
                    return Err(ParseError::UnrecognizedChar {
                        ch: '?',
                        span: self.span_from(start),
                    });
                }
            },
            _ => {
                return Err(ParseError::UnrecognizedChar {
                    ch: b as char,
                    span: self.span_from(start),
                });
            }
        };
        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_tokens(source: &str) -> Vec<Token> {
        lex(source, FileId::from_raw(0)).expect("lexing failed")
    }

    fn lex_err(source: &str) -> ParseError {
        lex(source, FileId::from_raw(0)).expect_err("expected a lex error")
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        let tokens = lex_tokens("");
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    }

    #[test]
    fn whitespace_only() {
        let tokens = lex_tokens("  \t\n  ");
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_case_insensitive() {
        let tokens = lex_tokens("ENTITY entity Entity eNtItY");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword(Kw::Entity),
                TokenKind::Keyword(Kw::Entity),
                TokenKind::Keyword(Kw::Entity),
                TokenKind::Keyword(Kw::Entity),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn structural_keywords() {
        let tokens = lex_tokens(
            "entity architecture package body context configuration generic port constant function procedure process begin end is",
        );
        let k = kinds(&tokens);
        assert_eq!(k[0], TokenKind::Keyword(Kw::Entity));
        assert_eq!(k[1], TokenKind::Keyword(Kw::Architecture));
        assert_eq!(k[2], TokenKind::Keyword(Kw::Package));
        assert_eq!(k[3], TokenKind::Keyword(Kw::Body));
        assert_eq!(k[4], TokenKind::Keyword(Kw::Context));
        assert_eq!(k[5], TokenKind::Keyword(Kw::Configuration));
        assert_eq!(*k.last().unwrap(), TokenKind::Eof);
    }

    #[test]
    fn identifiers() {
        let tokens = lex_tokens("uart_vc CLK data_in_0");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn extended_identifier() {
        let tokens = lex_tokens("\\my signal\\");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::ExtendedIdentifier, TokenKind::Eof]
        );
    }

    #[test]
    fn extended_identifier_escaped_backslash() {
        let tokens = lex_tokens("\\my\\\\sig\\");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::ExtendedIdentifier, TokenKind::Eof]
        );
    }

    #[test]
    fn integer_literals() {
        let tokens = lex_tokens("0 42 1_000_000");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn real_literals() {
        let tokens = lex_tokens("1.5 0.0 1.0e3 2.5E-2");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::RealLiteral,
                TokenKind::RealLiteral,
                TokenKind::RealLiteral,
                TokenKind::RealLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn based_integer_literal() {
        let tokens = lex_tokens("16#FF# 2#1010_0110# 8#77#");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn based_real_literal() {
        let tokens = lex_tokens("16#F.F#");
        assert_eq!(kinds(&tokens), vec![TokenKind::RealLiteral, TokenKind::Eof]);
    }

    #[test]
    fn character_literal() {
        let tokens = lex_tokens("'0' '1' 'Z'");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::CharLiteral,
                TokenKind::CharLiteral,
                TokenKind::CharLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal() {
        let tokens = lex_tokens("\"hello\" \"world\"");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal_escaped_quote() {
        let tokens = lex_tokens("\"say \"\"hi\"\"\"");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::StringLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn bit_string_literals() {
        let tokens = lex_tokens("X\"FF\" B\"1010\" O\"77\"");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::BitStringLiteral,
                TokenKind::BitStringLiteral,
                TokenKind::BitStringLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operators_and_punctuation() {
        let tokens = lex_tokens("( ) , ; : := <= => & * ** + - / = /= < > >= | .");
        let k = kinds(&tokens);
        assert_eq!(k[0], TokenKind::LeftParen);
        assert_eq!(k[1], TokenKind::RightParen);
        assert_eq!(k[2], TokenKind::Comma);
        assert_eq!(k[3], TokenKind::Semicolon);
        assert_eq!(k[4], TokenKind::Colon);
        assert_eq!(k[5], TokenKind::ColonEquals);
        assert_eq!(k[6], TokenKind::LessEquals);
        assert_eq!(k[7], TokenKind::Arrow);
        assert_eq!(k[8], TokenKind::Ampersand);
        assert_eq!(k[9], TokenKind::Star);
        assert_eq!(k[10], TokenKind::DoubleStar);
        assert_eq!(k[11], TokenKind::Plus);
        assert_eq!(k[12], TokenKind::Minus);
        assert_eq!(k[13], TokenKind::Slash);
        assert_eq!(k[14], TokenKind::Equals);
        assert_eq!(k[15], TokenKind::SlashEquals);
        assert_eq!(k[16], TokenKind::LessThan);
        assert_eq!(k[17], TokenKind::GreaterThan);
        assert_eq!(k[18], TokenKind::GreaterEquals);
        assert_eq!(k[19], TokenKind::Bar);
        assert_eq!(k[20], TokenKind::Dot);
        assert_eq!(k[21], TokenKind::Eof);
    }

    #[test]
    fn matching_operators() {
        let tokens = lex_tokens("?= ?/= ?< ?<= ?> ?>= ??");
        let k = kinds(&tokens);
        assert_eq!(k[0], TokenKind::MatchEquals);
        assert_eq!(k[1], TokenKind::MatchSlashEquals);
        assert_eq!(k[2], TokenKind::MatchLess);
        assert_eq!(k[3], TokenKind::MatchLessEquals);
        assert_eq!(k[4], TokenKind::MatchGreater);
        assert_eq!(k[5], TokenKind::MatchGreaterEquals);
        assert_eq!(k[6], TokenKind::ConditionOp);
    }

    #[test]
    fn double_angle_brackets() {
        let tokens = lex_tokens("<< >>");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::DoubleLess, TokenKind::DoubleGreater, TokenKind::Eof]
        );
    }

    #[test]
    fn line_comment() {
        let tokens = lex_tokens("signal -- this is a comment\nclk");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword(Kw::Signal),
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn block_comment() {
        let tokens = lex_tokens("signal /* block\ncomment */ clk");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword(Kw::Signal),
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn nested_block_comment() {
        let tokens = lex_tokens("signal /* outer /* inner */ still comment */ clk");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword(Kw::Signal),
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let err = lex_err("\"unterminated\n");
        assert!(matches!(
            err,
            ParseError::Unterminated {
                construct: "string literal",
                ..
            }
        ));
    }

    #[test]
    fn unterminated_extended_identifier_is_fatal() {
        let err = lex_err("\\no_end\n");
        assert!(matches!(
            err,
            ParseError::Unterminated {
                construct: "extended identifier",
                ..
            }
        ));
    }

    #[test]
    fn unterminated_block_comment_is_fatal() {
        let err = lex_err("entity /* never closed");
        assert!(matches!(
            err,
            ParseError::Unterminated {
                construct: "block comment",
                ..
            }
        ));
    }

    #[test]
    fn unterminated_based_literal_is_fatal() {
        let err = lex_err("16#FF");
        assert!(matches!(
            err,
            ParseError::Unterminated {
                construct: "based literal",
                ..
            }
        ));
    }

    #[test]
    fn unrecognized_char_is_fatal() {
        let err = lex_err("~");
        assert!(matches!(err, ParseError::UnrecognizedChar { ch: '~', .. }));
    }

    #[test]
    fn error_span_points_at_offender() {
        let err = lex_err("entity e ~");
        assert_eq!(err.span().start, 9);
    }

    #[test]
    fn spans_are_correct() {
        let tokens = lex_tokens("entity top");
        // "entity" is bytes 0..6, "top" is bytes 7..10
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!(tokens[0].span.end, 6);
        assert_eq!(tokens[1].span.start, 7);
        assert_eq!(tokens[1].span.end, 10);
    }

    #[test]
    fn eof_always_present() {
        let tokens = lex_tokens("entity");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn tick_as_attribute_access() {
        let tokens = lex_tokens("clk'event");
        let k = kinds(&tokens);
        assert_eq!(k[0], TokenKind::Identifier); // clk
        assert_eq!(k[1], TokenKind::Tick);
        assert_eq!(k[2], TokenKind::Identifier); // event
    }

    #[test]
    fn integer_with_exponent() {
        let tokens = lex_tokens("1E3 2e+5");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::IntLiteral, TokenKind::IntLiteral, TokenKind::Eof]
        );
    }
}
