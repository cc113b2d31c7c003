//! Lexer for Go source files
//!
//! Handles tokenization including:
//! - Keywords, identifiers (Unicode letters allowed) and operators (maximal munch)
//! - Integer, floating-point, imaginary, rune and string literals
//! - Comments, which are kept as tokens so examples can read their expected output
//! - Automatic semicolon insertion, emitted as `Newline` tokens
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, vocabulary ids)
//! - `strings` - Interpreted/raw string and rune scanning, escape decoding
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{KeywordId, OperatorId, PunctuationId, Symbol, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use tokens::SYMBOLS;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Semicolon insertion (simplified):
//
// [token] --ident/literal/`)`/`]`/`}`/`++`/`--`/return...--> insert_semi = true
//    |                                                          |
//    |                                      '\n' or EOF or `//` or multi-line `/* */`
//    |                                                          v
//    +--------------------------------------------------> emit Newline, insert_semi = false
// ============================================================================

/// Lexer for Go source code.
///
/// Converts source text into a stream of tokens, including comment tokens and automatically inserted semicolons.
/// Errors are collected and lexing continues, so a single pass reports every bad literal in the file.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// 1-based current line
    line: usize,
    /// Whether a line end at this point terminates a statement
    insert_semi: bool,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            insert_semi: false,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        // A leading byte order mark is not part of the source text.
        if self.peek() == Some('\u{feff}') {
            self.advance();
        }

        while !self.is_at_end() {
            self.scan_token();
        }

        if self.insert_semi {
            let pos = self.current_pos;
            self.tokens
                .push(Token::new(TokenKind::Newline, Span::new(pos, pos), self.line, self.line));
            self.insert_semi = false;
        }

        let pos = self.current_pos;
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::new(pos, pos), self.line, self.line));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next(); // skip current
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            if c == '\n' {
                self.line += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        // Skip whitespace; a newline only matters when it terminates a statement.
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' || (c == '\n' && !self.insert_semi) {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;
        let start_line = self.line;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '\n' => {
                self.tokens.push(Token::new(
                    TokenKind::Newline,
                    Span::new(start, self.current_pos),
                    start_line,
                    start_line,
                ));
                self.insert_semi = false;
            }

            '/' if self.peek() == Some('/') => {
                self.terminate_statement(start, start_line);
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
                self.add_comment(start, start_line);
            }

            '/' if self.peek() == Some('*') => {
                self.advance();
                let mut terminated = false;
                while let Some(c) = self.advance() {
                    if c == '*' && self.match_char('/') {
                        terminated = true;
                        break;
                    }
                }
                if !terminated {
                    self.errors.push(CompileError::syntax(
                        "comment not terminated".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                    return;
                }
                if self.line > start_line {
                    self.terminate_statement(start, start_line);
                }
                self.add_comment(start, start_line);
            }

            // Strings and runes
            '"' => self.scan_interpreted_string(start, start_line),
            '`' => self.scan_raw_string(start, start_line),
            '\'' => self.scan_rune(start, start_line),

            // Numbers
            '0'..='9' => self.scan_number(start, start_line, c),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start, start_line, c),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start, start_line),

            _ => self.scan_symbol(start, start_line, c),
        }
    }

    /// Emit a pending automatic semicolon ahead of a comment.
    fn terminate_statement(&mut self, pos: usize, line: usize) {
        if self.insert_semi {
            self.tokens
                .push(Token::new(TokenKind::Newline, Span::new(pos, pos), line, line));
            self.insert_semi = false;
        }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    /// Push a code token and update semicolon insertion state.
    fn add_token(&mut self, kind: TokenKind, start: usize, start_line: usize) {
        self.insert_semi = ends_statement(&kind);
        self.tokens.push(Token::new(
            kind,
            Span::new(start, self.current_pos),
            start_line,
            self.line,
        ));
    }

    fn add_comment(&mut self, start: usize, start_line: usize) {
        let text = self.source[start..self.current_pos].to_string();
        self.tokens.push(Token::new(
            TokenKind::Comment(text),
            Span::new(start, self.current_pos),
            start_line,
            self.line,
        ));
    }

    /// Scan an operator or punctuation symbol, taking the longest spelling that matches.
    fn scan_symbol(&mut self, start: usize, start_line: usize, c: char) {
        let rest = &self.source[start..];
        let Some((spelling, symbol)) = SYMBOLS.iter().find(|(s, _)| rest.starts_with(s)).copied() else {
            self.errors.push(CompileError::syntax(
                format!("invalid character {:?}", c),
                Span::new(start, self.current_pos),
            ));
            self.insert_semi = false;
            return;
        };
        // The first character is already consumed; every symbol spelling is ASCII.
        for _ in 1..spelling.len() {
            self.advance();
        }
        let kind = match symbol {
            Symbol::Op(id) => TokenKind::Operator(id),
            Symbol::Punct(id) => TokenKind::Punctuation(id),
        };
        self.add_token(kind, start, start_line);
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize, start_line: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start, start_line);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start, start_line);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (Unicode letters and `_`).
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a line break directly after a token of this kind inserts a semicolon.
fn ends_statement(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Ident(_)
        | TokenKind::Int(_)
        | TokenKind::Float(_)
        | TokenKind::Imag(_)
        | TokenKind::Char(_)
        | TokenKind::String(_) => true,
        TokenKind::Keyword(id) => matches!(
            id,
            KeywordId::Break | KeywordId::Continue | KeywordId::Fallthrough | KeywordId::Return
        ),
        TokenKind::Operator(id) => matches!(id, OperatorId::Inc | OperatorId::Dec),
        TokenKind::Punctuation(id) => matches!(
            id,
            PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace
        ),
        TokenKind::Newline | TokenKind::Comment(_) | TokenKind::Eof => false,
    }
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_string())
    }

    #[test]
    fn test_package_clause() {
        assert_eq!(
            kinds("package lib\n"),
            vec![
                TokenKind::Keyword(KeywordId::Package),
                ident("lib"),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_semicolon_inserted_at_eof() {
        let k = kinds("package lib");
        assert_eq!(k[2], TokenKind::Newline);
        assert_eq!(k[3], TokenKind::Eof);
    }

    #[test]
    fn test_no_semicolon_after_open_brace() {
        let k = kinds("func F() {\n}\n");
        let newlines = k.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newlines, 1, "only the closing brace ends a statement: {:?}", k);
    }

    #[test]
    fn test_semicolon_precedes_trailing_comment() {
        let k = kinds("x := 1 // note\n");
        assert_eq!(
            k,
            vec![
                ident("x"),
                TokenKind::Operator(OperatorId::Define),
                TokenKind::Int("1".to_string()),
                TokenKind::Newline,
                TokenKind::Comment("// note".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_multiline_block_comment_terminates_statement() {
        let k = kinds("return /* a\nb */ x");
        assert_eq!(k[0], TokenKind::Keyword(KeywordId::Return));
        assert_eq!(k[1], TokenKind::Newline);
        assert!(matches!(k[2], TokenKind::Comment(_)));
    }

    #[test]
    fn test_single_line_block_comment_is_transparent() {
        let k = kinds("x /* a */ + y");
        assert_eq!(k[1], TokenKind::Comment("/* a */".to_string()));
        assert_eq!(k[2], TokenKind::Operator(OperatorId::Plus));
    }

    #[test]
    fn test_maximal_munch_operators() {
        let k = kinds("a &^= b <<= c ... <- d");
        assert_eq!(k[1], TokenKind::Operator(OperatorId::AndNotEq));
        assert_eq!(k[3], TokenKind::Operator(OperatorId::ShlEq));
        assert_eq!(k[5], TokenKind::Punctuation(PunctuationId::Ellipsis));
        assert_eq!(k[6], TokenKind::Operator(OperatorId::Arrow));
    }

    #[test]
    fn test_increment_ends_statement() {
        let k = kinds("i++\nj--\n");
        assert_eq!(k[2], TokenKind::Newline);
        assert_eq!(k[5], TokenKind::Newline);
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(kinds("größe")[0], ident("größe"));
    }

    #[test]
    fn test_token_lines() {
        let tokens = lex("package a\n\nfunc F() {}\n").unwrap();
        let func = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Keyword(KeywordId::Func))
            .unwrap();
        assert_eq!(func.line, 3);
    }

    #[test]
    fn test_raw_string_spans_lines() {
        let tokens = lex("x = `a\nb`\n").unwrap();
        let s = &tokens[2];
        assert_eq!(s.kind, TokenKind::String(b"a\nb".to_vec()));
        assert_eq!(s.line, 1);
        assert_eq!(s.end_line, 2);
    }

    #[test]
    fn test_byte_order_mark_skipped() {
        assert_eq!(kinds("\u{feff}package a")[0], TokenKind::Keyword(KeywordId::Package));
    }

    #[test]
    fn test_invalid_character_reported() {
        let errs = lex("package a\nx := 1 @ 2\n").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("invalid character"));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let errs = lex("package a /* open").unwrap_err();
        assert!(errs[0].message.contains("comment not terminated"));
    }
}
