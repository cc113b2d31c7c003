//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to give the parser readable
//! descriptions of tokens for error messages.

use crate::lexer::tokens::SYMBOLS;
use crate::lexer::{KeywordId, OperatorId, PunctuationId, Symbol, TokenKind};

impl OperatorId {
    pub fn as_str(self) -> &'static str {
        SYMBOLS
            .iter()
            .find(|(_, sym)| *sym == Symbol::Op(self))
            .map(|(s, _)| *s)
            .unwrap_or("<operator>")
    }
}

impl PunctuationId {
    pub fn as_str(self) -> &'static str {
        SYMBOLS
            .iter()
            .find(|(_, sym)| *sym == Symbol::Punct(self))
            .map(|(s, _)| *s)
            .unwrap_or("<punctuation>")
    }
}

impl TokenKind {
    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return the identifier name, if this is an identifier token.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Return `true` for statement terminators: explicit `;` or an inserted one.
    pub fn is_terminator(&self) -> bool {
        matches!(self, TokenKind::Newline) || self.is_punctuation(PunctuationId::Semicolon)
    }

    /// Human-readable description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(id) => format!("keyword {}", id.as_str()),
            TokenKind::Operator(id) => id.as_str().to_string(),
            TokenKind::Punctuation(id) => id.as_str().to_string(),
            TokenKind::Ident(name) => format!("name {}", name),
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Imag(_) | TokenKind::Char(_) => {
                "literal".to_string()
            }
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::Comment(_) => "comment".to_string(),
            TokenKind::Eof => "EOF".to_string(),
        }
    }
}
