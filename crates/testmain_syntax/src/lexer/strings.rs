//! String and rune scanning for the Go lexer
//!
//! Interpreted strings are decoded to bytes (Go strings are byte sequences, and `\x`/octal escapes may produce
//! invalid UTF-8). Raw strings drop carriage returns. Rune literals are validated and kept verbatim.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Span;
use crate::diagnostics::CompileError;

// ============================================================================
// Escape sequence handling
// ============================================================================

/// Result of processing an escape sequence
enum EscapeResult {
    /// Decoded bytes (one for byte escapes, UTF-8 encoding for Unicode escapes)
    Bytes(Vec<u8>),
    /// Malformed escape; the message describes the problem
    Invalid(String),
    /// End of input during escape
    Eof,
}

impl<'a> Lexer<'a> {
    /// Process an escape sequence. Called after consuming the backslash.
    fn scan_escape(&mut self, quote: char) -> EscapeResult {
        let Some(c) = self.advance() else {
            return EscapeResult::Eof;
        };
        let simple = match c {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            q if q == quote => Some(q as u8),
            _ => None,
        };
        if let Some(byte) = simple {
            return EscapeResult::Bytes(vec![byte]);
        }

        match c {
            '0'..='7' => {
                let mut digits = String::from(c);
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(d);
                            self.advance();
                        }
                        _ => return EscapeResult::Invalid("octal escape needs three digits".to_string()),
                    }
                }
                match u8::from_str_radix(&digits, 8) {
                    Ok(byte) => EscapeResult::Bytes(vec![byte]),
                    Err(_) => EscapeResult::Invalid(format!("octal escape value \\{} > 255", digits)),
                }
            }
            'x' => match self.scan_hex_digits(2) {
                Some(value) => EscapeResult::Bytes(vec![value as u8]),
                None => EscapeResult::Invalid("\\x escape needs two hex digits".to_string()),
            },
            'u' | 'U' => {
                let count = if c == 'u' { 4 } else { 8 };
                let Some(value) = self.scan_hex_digits(count) else {
                    return EscapeResult::Invalid(format!("\\{} escape needs {} hex digits", c, count));
                };
                match char::from_u32(value) {
                    Some(ch) => {
                        let mut buf = [0u8; 4];
                        EscapeResult::Bytes(ch.encode_utf8(&mut buf).as_bytes().to_vec())
                    }
                    None => EscapeResult::Invalid("escape is an invalid Unicode code point".to_string()),
                }
            }
            other => EscapeResult::Invalid(format!("unknown escape sequence \\{}", other)),
        }
    }

    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value: u32 = 0;
        for _ in 0..count {
            let digit = self.peek()?.to_digit(16)?;
            self.advance();
            value = value.checked_mul(16)?.checked_add(digit)?;
        }
        Some(value)
    }

    // ========================================================================
    // String scanning
    // ========================================================================

    /// Scan an interpreted string literal. The opening quote is already consumed.
    pub(super) fn scan_interpreted_string(&mut self, start: usize, start_line: usize) {
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.errors.push(CompileError::syntax(
                        "string literal not terminated".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                    self.insert_semi = false;
                    return;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.current_pos;
                    self.advance();
                    match self.scan_escape('"') {
                        EscapeResult::Bytes(b) => bytes.extend(b),
                        EscapeResult::Invalid(msg) => self
                            .errors
                            .push(CompileError::syntax(msg, Span::new(escape_start, self.current_pos))),
                        EscapeResult::Eof => continue,
                    }
                }
                Some(c) => {
                    self.advance();
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        self.add_token(TokenKind::String(bytes), start, start_line);
    }

    /// Scan a raw (backquoted) string literal. The opening backquote is already consumed.
    pub(super) fn scan_raw_string(&mut self, start: usize, start_line: usize) {
        let mut text = String::new();
        loop {
            match self.advance() {
                None => {
                    self.errors.push(CompileError::syntax(
                        "raw string literal not terminated".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                    self.insert_semi = false;
                    return;
                }
                Some('`') => break,
                Some('\r') => {}
                Some(c) => text.push(c),
            }
        }
        self.add_token(TokenKind::String(text.into_bytes()), start, start_line);
    }

    /// Scan a rune literal. The opening quote is already consumed.
    pub(super) fn scan_rune(&mut self, start: usize, start_line: usize) {
        let mut count = 0;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.errors.push(CompileError::syntax(
                        "rune literal not terminated".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                    self.insert_semi = false;
                    return;
                }
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.current_pos;
                    self.advance();
                    if let EscapeResult::Invalid(msg) = self.scan_escape('\'') {
                        self.errors
                            .push(CompileError::syntax(msg, Span::new(escape_start, self.current_pos)));
                    }
                    count += 1;
                }
                Some(_) => {
                    self.advance();
                    count += 1;
                }
            }
        }
        if count != 1 {
            self.errors.push(CompileError::syntax(
                "rune literal must contain exactly one character".to_string(),
                Span::new(start, self.current_pos),
            ));
        }
        let text = self.source[start..self.current_pos].to_string();
        self.add_token(TokenKind::Char(text), start, start_line);
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn string_value(source: &str) -> Vec<u8> {
        let tokens = lex(source).unwrap();
        match &tokens[0].kind {
            TokenKind::String(bytes) => bytes.clone(),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(string_value(r#""a\tb\n\"q\"\\""#), b"a\tb\n\"q\"\\".to_vec());
        assert_eq!(string_value(r#""\a\b\f\v\r""#), vec![7, 8, 12, 11, 13]);
    }

    #[test]
    fn test_numeric_escapes() {
        assert_eq!(string_value(r#""\x41\101é\U0001F600""#), "AAé😀".as_bytes().to_vec());
    }

    #[test]
    fn test_byte_escape_may_be_invalid_utf8() {
        assert_eq!(string_value(r#""\xff\000""#), vec![0xff, 0x00]);
    }

    #[test]
    fn test_raw_string_drops_carriage_returns() {
        assert_eq!(string_value("`a\r\nb\\n`"), b"a\nb\\n".to_vec());
    }

    #[test]
    fn test_unknown_escape_is_error() {
        let errs = lex(r#""\q""#).unwrap_err();
        assert!(errs[0].message.contains("unknown escape"));
    }

    #[test]
    fn test_single_quote_escape_not_allowed_in_string() {
        assert!(lex(r#""\'""#).is_err());
    }

    #[test]
    fn test_unterminated_string() {
        let errs = lex("\"abc\nx").unwrap_err();
        assert!(errs[0].message.contains("string literal not terminated"));
    }

    #[test]
    fn test_rune_literals() {
        let tokens = lex(r"'a' '\n' '\'' 'é'").unwrap();
        let runes: Vec<_> = tokens
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::Char(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(runes, vec!["'a'", r"'\n'", r"'\''", "'é'"]);
    }

    #[test]
    fn test_empty_rune_is_error() {
        assert!(lex("''").is_err());
    }
}
