//! Numeric literal scanning for the Go lexer
//!
//! Literals are kept as raw spellings; only their kind (int, float, imaginary) matters downstream.

use super::Lexer;
use super::tokens::TokenKind;

impl<'a> Lexer<'a> {
    /// Scan a numeric literal whose first character (`first`, a digit or `.`) is already consumed.
    pub(super) fn scan_number(&mut self, start: usize, start_line: usize, first: char) {
        let hex = first == '0' && matches!(self.peek(), Some('x' | 'X'));
        if hex {
            self.advance();
        }

        while let Some(c) = self.peek() {
            let is_exponent = if hex { matches!(c, 'p' | 'P') } else { matches!(c, 'e' | 'E') };
            if is_exponent {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
            } else if c.is_ascii_alphanumeric() || c == '_' || (c == '.' && self.peek_next() != Some('.')) {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.source[start..self.current_pos].to_string();
        let kind = classify(&text, hex);
        self.add_token(kind, start, start_line);
    }
}

fn classify(text: &str, hex: bool) -> TokenKind {
    if text.ends_with('i') {
        return TokenKind::Imag(text.to_string());
    }
    let is_float = if hex {
        text.contains(|c: char| matches!(c, '.' | 'p' | 'P'))
    } else {
        let prefixed = text.len() > 1 && text.starts_with('0') && text[1..].starts_with(|c: char| matches!(c, 'b' | 'B' | 'o' | 'O'));
        !prefixed && text.contains(|c: char| matches!(c, '.' | 'e' | 'E'))
    };
    if is_float {
        TokenKind::Float(text.to_string())
    } else {
        TokenKind::Int(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn first(source: &str) -> TokenKind {
        lex(source).unwrap().remove(0).kind
    }

    #[test]
    fn test_integers() {
        assert_eq!(first("42"), TokenKind::Int("42".into()));
        assert_eq!(first("0x_FF"), TokenKind::Int("0x_FF".into()));
        assert_eq!(first("0b1010"), TokenKind::Int("0b1010".into()));
        assert_eq!(first("1_000_000"), TokenKind::Int("1_000_000".into()));
    }

    #[test]
    fn test_hex_e_is_a_digit() {
        let tokens = lex("0xe-1").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Int("0xe".into()));
    }

    #[test]
    fn test_floats() {
        assert_eq!(first("1.5"), TokenKind::Float("1.5".into()));
        assert_eq!(first(".25"), TokenKind::Float(".25".into()));
        assert_eq!(first("1e-9"), TokenKind::Float("1e-9".into()));
        assert_eq!(first("0x1p-2"), TokenKind::Float("0x1p-2".into()));
    }

    #[test]
    fn test_imaginary() {
        assert_eq!(first("3i"), TokenKind::Imag("3i".into()));
        assert_eq!(first("2.5e3i"), TokenKind::Imag("2.5e3i".into()));
    }
}
