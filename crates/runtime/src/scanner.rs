//! Token scanner: lexes raw JSON bytes into [`Token`]s.
//!
//! The scanner never allocates on the happy path for structural tokens; it
//! reports byte ranges into the caller's input slice and lets the parser
//! decide how to materialize string/number content. Whitespace (space,
//! tab, LF, CR) is skipped silently between tokens.

use crate::error::{ErrorKind, JsonkError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Colon,
    Comma,
    String,
    Number,
    True,
    False,
    Null,
    Eof,
}

/// A lexed token. `start`/`end` bound the token's content: for `String`
/// this excludes the surrounding quotes; for everything else it is the
/// token's own bytes.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.input.get(self.pos) {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(b) = self.peek_byte() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
                end: start,
            });
        };
        match b {
            b'{' => {
                self.pos += 1;
                Ok(self.tok(TokenKind::ObjectStart, start))
            }
            b'}' => {
                self.pos += 1;
                Ok(self.tok(TokenKind::ObjectEnd, start))
            }
            b'[' => {
                self.pos += 1;
                Ok(self.tok(TokenKind::ArrayStart, start))
            }
            b']' => {
                self.pos += 1;
                Ok(self.tok(TokenKind::ArrayEnd, start))
            }
            b':' => {
                self.pos += 1;
                Ok(self.tok(TokenKind::Colon, start))
            }
            b',' => {
                self.pos += 1;
                Ok(self.tok(TokenKind::Comma, start))
            }
            b'"' => self.scan_string(),
            b'-' | b'0'..=b'9' => self.scan_number(),
            b't' => self.scan_literal(b"true", TokenKind::True),
            b'f' => self.scan_literal(b"false", TokenKind::False),
            b'n' => self.scan_literal(b"null", TokenKind::Null),
            other => Err(JsonkError::at(
                ErrorKind::Lexical,
                format!("unexpected byte 0x{other:02x}"),
                start,
            )),
        }
    }

    fn tok(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.pos,
        }
    }

    fn scan_literal(&mut self, literal: &'static [u8], kind: TokenKind) -> Result<Token> {
        let start = self.pos;
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(self.tok(kind, start))
        } else {
            Err(JsonkError::at(
                ErrorKind::Lexical,
                format!("expected literal `{}`", String::from_utf8_lossy(literal)),
                start,
            ))
        }
    }

    fn scan_string(&mut self) -> Result<Token> {
        let quote_start = self.pos;
        self.pos += 1; // consume opening quote
        let content_start = self.pos;
        loop {
            let b = *self.input.get(self.pos).ok_or_else(|| {
                JsonkError::at(ErrorKind::Lexical, "unterminated string", quote_start)
            })?;
            match b {
                b'"' => {
                    let content_end = self.pos;
                    self.pos += 1;
                    return Ok(Token {
                        kind: TokenKind::String,
                        start: content_start,
                        end: content_end,
                    });
                }
                b'\\' => {
                    self.pos += 1;
                    let esc = *self.input.get(self.pos).ok_or_else(|| {
                        JsonkError::at(ErrorKind::Lexical, "unterminated escape", self.pos)
                    })?;
                    match esc {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                            self.pos += 1;
                        }
                        b'u' => {
                            self.pos += 1;
                            for _ in 0..4 {
                                let hex = *self.input.get(self.pos).ok_or_else(|| {
                                    JsonkError::at(
                                        ErrorKind::Lexical,
                                        "incomplete \\u escape",
                                        self.pos,
                                    )
                                })?;
                                if !hex.is_ascii_hexdigit() {
                                    return Err(JsonkError::at(
                                        ErrorKind::Lexical,
                                        "invalid hex digit in \\u escape",
                                        self.pos,
                                    ));
                                }
                                self.pos += 1;
                            }
                        }
                        other => {
                            return Err(JsonkError::at(
                                ErrorKind::Lexical,
                                format!("invalid escape `\\{}`", other as char),
                                self.pos,
                            ));
                        }
                    }
                }
                0x00..=0x1f => {
                    return Err(JsonkError::at(
                        ErrorKind::Lexical,
                        "raw control byte in string",
                        self.pos,
                    ));
                }
                _ => self.pos += 1,
            }
        }
    }

    fn scan_number(&mut self) -> Result<Token> {
        let start = self.pos;
        if self.peek_byte() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek_byte() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                self.pos += 1;
                while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            }
            _ => {
                return Err(JsonkError::at(
                    ErrorKind::Lexical,
                    "invalid number: expected digit",
                    start,
                ));
            }
        }
        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            let frac_start = self.pos;
            while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
            if self.pos == frac_start {
                return Err(JsonkError::at(
                    ErrorKind::Lexical,
                    "invalid number: digit required after '.'",
                    frac_start,
                ));
            }
        }
        if matches!(self.peek_byte(), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.peek_byte(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
            if self.pos == exp_start {
                return Err(JsonkError::at(
                    ErrorKind::Lexical,
                    "invalid number: digit required in exponent",
                    exp_start,
                ));
            }
        }
        Ok(self.tok(TokenKind::Number, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(input.as_bytes());
        let mut out = Vec::new();
        loop {
            let t = scanner.next_token().unwrap();
            if t.kind == TokenKind::Eof {
                break;
            }
            out.push(t.kind);
        }
        out
    }

    #[test]
    fn scans_structural_tokens() {
        assert_eq!(
            kinds("{ } [ ] : ,"),
            vec![
                TokenKind::ObjectStart,
                TokenKind::ObjectEnd,
                TokenKind::ArrayStart,
                TokenKind::ArrayEnd,
                TokenKind::Colon,
                TokenKind::Comma,
            ]
        );
    }

    #[test]
    fn scans_string_content_bounds_exclude_quotes() {
        let mut scanner = Scanner::new(br#""hello""#);
        let t = scanner.next_token().unwrap();
        assert_eq!(t.kind, TokenKind::String);
        assert_eq!(&scanner.input()[t.start..t.end], b"hello");
    }

    #[test]
    fn rejects_unterminated_string() {
        let mut scanner = Scanner::new(br#""hello"#);
        assert!(scanner.next_token().is_err());
    }

    #[test]
    fn rejects_invalid_escape() {
        let mut scanner = Scanner::new(br#""bad\q""#);
        assert!(scanner.next_token().is_err());
    }

    #[test]
    fn accepts_all_single_char_escapes() {
        let mut scanner = Scanner::new(br#""\"\\\/\b\f\n\r\t""#);
        let t = scanner.next_token().unwrap();
        assert_eq!(t.kind, TokenKind::String);
    }

    #[test]
    fn rejects_short_unicode_escape() {
        let mut scanner = Scanner::new(br#""\u12""#);
        assert!(scanner.next_token().is_err());
    }

    #[test]
    fn rejects_raw_control_byte_in_string() {
        let mut scanner = Scanner::new(b"\"a\nb\"");
        assert!(scanner.next_token().is_err());
    }

    #[test]
    fn rejects_leading_zero_followed_by_digit() {
        let mut scanner = Scanner::new(b"012");
        // "0" lexes as a complete number token; the trailing "12" is left
        // for the caller, which is how a parser would detect the error
        // (two adjacent numeric tokens with no separator).
        let t = scanner.next_token().unwrap();
        assert_eq!(&scanner.input()[t.start..t.end], b"0");
    }

    #[test]
    fn rejects_lone_minus() {
        let mut scanner = Scanner::new(b"-");
        assert!(scanner.next_token().is_err());
    }

    #[test]
    fn scans_number_with_fraction_and_exponent() {
        let mut scanner = Scanner::new(b"-12.345e+6");
        let t = scanner.next_token().unwrap();
        assert_eq!(t.kind, TokenKind::Number);
        assert_eq!(&scanner.input()[t.start..t.end], b"-12.345e+6");
    }

    #[test]
    fn scans_literals() {
        assert_eq!(
            kinds("true false null"),
            vec![TokenKind::True, TokenKind::False, TokenKind::Null]
        );
    }

    #[test]
    fn skips_whitespace_between_tokens() {
        assert_eq!(kinds("  {\t}\r\n"), vec![TokenKind::ObjectStart, TokenKind::ObjectEnd]);
    }
}
