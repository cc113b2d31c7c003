//! Abstract Syntax Tree definitions for Go source files
//!
//! The tree is declaration-level: it records the package clause, imports, and the full signature of every top-level
//! function. Function bodies and `var`/`const`/`type` declarations are kept only as spans, since nothing downstream
//! needs to look inside them except through comments.

use std::fmt;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Return `true` if `other` lies entirely within this span.
    pub fn contains(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Identifier
pub type Ident = String;

/// A parsed Go source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Name from the `package` clause.
    pub package: Spanned<Ident>,
    pub imports: Vec<Spanned<ImportSpec>>,
    pub declarations: Vec<Spanned<Declaration>>,
    /// All comment groups of the file, in source order.
    pub comments: Vec<CommentGroup>,
}

impl SourceFile {
    /// Iterate over the top-level function declarations (methods included).
    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.declarations.iter().filter_map(|decl| match &decl.node {
            Declaration::Func(func) => Some(func),
            Declaration::Gen(_) => None,
        })
    }
}

/// One entry of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name (`foo`, `.` or `_`), if any.
    pub name: Option<Ident>,
    pub path: String,
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Func(FuncDecl),
    Gen(GenKind),
}

/// Kind of a generic (non-function) declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
    Var,
    Const,
    Type,
}

impl fmt::Display for GenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenKind::Var => write!(f, "var"),
            GenKind::Const => write!(f, "const"),
            GenKind::Type => write!(f, "type"),
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// A top-level `func` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    /// Receiver list; `Some` for methods.
    pub recv: Option<FieldList>,
    pub name: Spanned<Ident>,
    pub type_params: Option<FieldList>,
    pub params: FieldList,
    /// Result list; `None` when the signature has no result clause at all.
    pub results: Option<FieldList>,
    /// Span of the body braces, `None` for body-less declarations.
    pub body: Option<Span>,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.recv.is_some()
    }

    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }
}

/// A parenthesized (or bracketed, for type parameters) list of fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldList {
    pub fields: Vec<Field>,
    pub span: Span,
}

impl FieldList {
    /// Number of declared entries: each name counts once, and an unnamed field counts as one.
    pub fn param_count(&self) -> usize {
        self.fields.iter().map(|f| f.names.len().max(1)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A group of names sharing one type (`a, b int`), or a single unnamed type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Spanned<TypeExpr>,
}

// ============================================================================
// Types
// ============================================================================

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Type expressions, parsed structurally.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `T`
    Name(Ident),
    /// `pkg.T`
    Selector { qualifier: Ident, name: Ident },
    /// `*T`
    Pointer(Box<Spanned<TypeExpr>>),
    /// `List[int]`, `pkg.Map[K, V]`
    Instance {
        base: Box<Spanned<TypeExpr>>,
        args: Vec<Spanned<TypeExpr>>,
    },
    /// `[]T` (`len: None`) or `[N]T` / `[...]T` (`len` covers the bracketed length)
    Array {
        len: Option<Span>,
        elem: Box<Spanned<TypeExpr>>,
    },
    Map {
        key: Box<Spanned<TypeExpr>>,
        value: Box<Spanned<TypeExpr>>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<Spanned<TypeExpr>>,
    },
    Func {
        params: FieldList,
        results: Option<FieldList>,
    },
    /// `struct { ... }`, body kept as a span
    Struct(Span),
    /// `interface { ... }`, body kept as a span
    Interface(Span),
    /// `(T)`
    Paren(Box<Spanned<TypeExpr>>),
    /// `...T`, only valid as the last parameter
    Ellipsis(Box<Spanned<TypeExpr>>),
    /// Type-parameter constraint (`any`, `~int | string`), kept as a span
    Constraint(Span),
}

impl TypeExpr {
    /// If this is `*<qualifier>.<name>`, return the selected name.
    ///
    /// The qualifier is deliberately ignored: `*testing.T` and `*tt.T` both yield `T`.
    pub fn pointer_to_selector_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Pointer(inner) => match &inner.node {
                TypeExpr::Selector { name, .. } => Some(name.as_str()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => write!(f, "{}", name),
            TypeExpr::Selector { qualifier, name } => write!(f, "{}.{}", qualifier, name),
            TypeExpr::Pointer(inner) => write!(f, "*{}", inner.node),
            TypeExpr::Instance { base, args } => {
                write!(f, "{}[", base.node)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg.node)?;
                }
                write!(f, "]")
            }
            TypeExpr::Array { len: None, elem } => write!(f, "[]{}", elem.node),
            TypeExpr::Array { len: Some(_), elem } => write!(f, "[N]{}", elem.node),
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key.node, value.node),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {}", elem.node),
                ChanDir::Send => write!(f, "chan<- {}", elem.node),
                ChanDir::Recv => write!(f, "<-chan {}", elem.node),
            },
            TypeExpr::Func { .. } => write!(f, "func(...)"),
            TypeExpr::Struct(_) => write!(f, "struct{{...}}"),
            TypeExpr::Interface(_) => write!(f, "interface{{...}}"),
            TypeExpr::Paren(inner) => write!(f, "({})", inner.node),
            TypeExpr::Ellipsis(inner) => write!(f, "...{}", inner.node),
            TypeExpr::Constraint(_) => write!(f, "<constraint>"),
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

/// A single `//` or `/* */` comment, markers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// A run of adjacent comments with no tokens or blank lines between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    pub fn span(&self) -> Span {
        match (self.comments.first(), self.comments.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::default(),
        }
    }

    /// Return the text of the group with comment markers removed.
    ///
    /// Follows the Go documentation convention: `//` loses one following space, `/* */` loses its delimiters,
    /// trailing whitespace is stripped from every line, tool directives (`//go:build`, `//line ...`) are dropped,
    /// runs of blank lines collapse to one, leading and trailing blank lines are removed, and non-empty text ends
    /// with a newline.
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for comment in &self.comments {
            let raw = comment.text.as_str();
            let body = if let Some(rest) = raw.strip_prefix("//") {
                if let Some(rest) = rest.strip_prefix(' ') {
                    rest
                } else if is_directive(rest) {
                    continue;
                } else {
                    rest
                }
            } else if let Some(rest) = raw.strip_prefix("/*") {
                rest.strip_suffix("*/").unwrap_or(rest)
            } else {
                raw
            };
            for line in body.split('\n') {
                lines.push(line.trim_end_matches([' ', '\t', '\n', '\r']).to_string());
            }
        }

        let mut kept: Vec<String> = Vec::with_capacity(lines.len());
        for line in lines {
            let previous_blank = kept.last().is_none_or(|l: &String| l.is_empty());
            if !line.is_empty() || !previous_blank {
                kept.push(line);
            }
        }
        while kept.last().is_some_and(|l| l.is_empty()) {
            kept.pop();
        }
        if kept.is_empty() {
            return String::new();
        }
        kept.push(String::new());
        kept.join("\n")
    }
}

/// Return `true` for `//`-comment bodies that are tool directives rather than prose.
fn is_directive(body: &str) -> bool {
    if body.starts_with("line ") || body.starts_with("extern ") || body.starts_with("export ") {
        return true;
    }
    // `[a-z0-9]+:[a-z0-9]`, e.g. `go:build`, `nolint:errcheck`
    let Some(colon) = body.find(':') else {
        return false;
    };
    let is_word = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    colon > 0
        && body[..colon].chars().all(is_word)
        && body[colon + 1..].chars().next().is_some_and(is_word)
}
