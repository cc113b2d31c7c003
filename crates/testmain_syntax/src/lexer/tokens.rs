//! Token types for the Go lexer.
//!
//! Vocabulary is ID-based:
//! - `Keyword(KeywordId)` for the 25 reserved words
//! - `Operator(OperatorId)` for arithmetic/logic/assignment operators
//! - `Punctuation(PunctuationId)` for delimiters
//!
//! Comments are tokens too; the parser pulls them out of the stream and groups them.

use crate::ast::Span;

// ============================================================================
// VOCABULARY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

const KEYWORDS: &[(&str, KeywordId)] = &[
    ("break", KeywordId::Break),
    ("case", KeywordId::Case),
    ("chan", KeywordId::Chan),
    ("const", KeywordId::Const),
    ("continue", KeywordId::Continue),
    ("default", KeywordId::Default),
    ("defer", KeywordId::Defer),
    ("else", KeywordId::Else),
    ("fallthrough", KeywordId::Fallthrough),
    ("for", KeywordId::For),
    ("func", KeywordId::Func),
    ("go", KeywordId::Go),
    ("goto", KeywordId::Goto),
    ("if", KeywordId::If),
    ("import", KeywordId::Import),
    ("interface", KeywordId::Interface),
    ("map", KeywordId::Map),
    ("package", KeywordId::Package),
    ("range", KeywordId::Range),
    ("return", KeywordId::Return),
    ("select", KeywordId::Select),
    ("struct", KeywordId::Struct),
    ("switch", KeywordId::Switch),
    ("type", KeywordId::Type),
    ("var", KeywordId::Var),
];

impl KeywordId {
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, id)| *id == self)
            .map(|(s, _)| *s)
            .unwrap_or("<keyword>")
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|(s, _)| *s == name).map(|(_, id)| *id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AndNot,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    AndNotEq,
    AndAnd,
    OrOr,
    Arrow,
    Inc,
    Dec,
    EqEq,
    Lt,
    Gt,
    Assign,
    Not,
    Tilde,
    NotEq,
    LtEq,
    GtEq,
    Define,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Ellipsis,
    Semicolon,
    Colon,
}

/// Operator or punctuation spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Op(OperatorId),
    Punct(PunctuationId),
}

/// All operator and punctuation spellings, longest first so the scanner can take the maximal munch.
pub(crate) const SYMBOLS: &[(&str, Symbol)] = &[
    ("&^=", Symbol::Op(OperatorId::AndNotEq)),
    ("<<=", Symbol::Op(OperatorId::ShlEq)),
    (">>=", Symbol::Op(OperatorId::ShrEq)),
    ("...", Symbol::Punct(PunctuationId::Ellipsis)),
    ("+=", Symbol::Op(OperatorId::PlusEq)),
    ("-=", Symbol::Op(OperatorId::MinusEq)),
    ("*=", Symbol::Op(OperatorId::StarEq)),
    ("/=", Symbol::Op(OperatorId::SlashEq)),
    ("%=", Symbol::Op(OperatorId::PercentEq)),
    ("&=", Symbol::Op(OperatorId::AmpEq)),
    ("|=", Symbol::Op(OperatorId::PipeEq)),
    ("^=", Symbol::Op(OperatorId::CaretEq)),
    ("<<", Symbol::Op(OperatorId::Shl)),
    (">>", Symbol::Op(OperatorId::Shr)),
    ("&^", Symbol::Op(OperatorId::AndNot)),
    ("&&", Symbol::Op(OperatorId::AndAnd)),
    ("||", Symbol::Op(OperatorId::OrOr)),
    ("<-", Symbol::Op(OperatorId::Arrow)),
    ("++", Symbol::Op(OperatorId::Inc)),
    ("--", Symbol::Op(OperatorId::Dec)),
    ("==", Symbol::Op(OperatorId::EqEq)),
    ("!=", Symbol::Op(OperatorId::NotEq)),
    ("<=", Symbol::Op(OperatorId::LtEq)),
    (">=", Symbol::Op(OperatorId::GtEq)),
    (":=", Symbol::Op(OperatorId::Define)),
    ("+", Symbol::Op(OperatorId::Plus)),
    ("-", Symbol::Op(OperatorId::Minus)),
    ("*", Symbol::Op(OperatorId::Star)),
    ("/", Symbol::Op(OperatorId::Slash)),
    ("%", Symbol::Op(OperatorId::Percent)),
    ("&", Symbol::Op(OperatorId::Amp)),
    ("|", Symbol::Op(OperatorId::Pipe)),
    ("^", Symbol::Op(OperatorId::Caret)),
    ("<", Symbol::Op(OperatorId::Lt)),
    (">", Symbol::Op(OperatorId::Gt)),
    ("=", Symbol::Op(OperatorId::Assign)),
    ("!", Symbol::Op(OperatorId::Not)),
    ("~", Symbol::Op(OperatorId::Tilde)),
    ("(", Symbol::Punct(PunctuationId::LParen)),
    (")", Symbol::Punct(PunctuationId::RParen)),
    ("[", Symbol::Punct(PunctuationId::LBracket)),
    ("]", Symbol::Punct(PunctuationId::RBracket)),
    ("{", Symbol::Punct(PunctuationId::LBrace)),
    ("}", Symbol::Punct(PunctuationId::RBrace)),
    (",", Symbol::Punct(PunctuationId::Comma)),
    (".", Symbol::Punct(PunctuationId::Dot)),
    (";", Symbol::Punct(PunctuationId::Semicolon)),
    (":", Symbol::Punct(PunctuationId::Colon)),
];

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    /// Integer literal, raw spelling
    Int(String),
    /// Floating-point literal, raw spelling
    Float(String),
    /// Imaginary literal, raw spelling
    Imag(String),
    /// Rune literal, raw spelling including quotes
    Char(String),
    /// String literal (interpreted or raw), decoded bytes
    String(Vec<u8>),

    // ========== Layout ==========
    /// Automatically inserted semicolon at a line end or EOF
    Newline,
    /// `//` or `/* */` comment, markers included
    Comment(String),

    // ========== Special ==========
    Eof,
}

/// A token with its kind, source span, and the lines it starts and ends on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of the first byte
    pub line: usize,
    /// 1-based line of the last byte (differs from `line` for raw strings and block comments)
    pub end_line: usize,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span, line: usize, end_line: usize) -> Self {
        Self {
            kind,
            span,
            line,
            end_line,
        }
    }
}
