//! Diagnostics and error reporting for Go sources
//!
//! Errors carry byte spans; rendering converts them to `file:line:col` the way Go tools report positions, with an
//! optional `miette` snippet underneath.

use std::fmt;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, Report};

use crate::ast::Span;

/// A syntax-level error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Syntax,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CompileError {}

impl Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() {
            None
        } else {
            Some(Box::new(self.hints.join("\n")))
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::at(self.span.start..self.span.end, self.kind.to_string());
        Some(Box::new(std::iter::once(label)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// Format an error as a single `file:line:col: message` line, followed by any notes and hints.
pub fn format_error(file_name: &str, source: &str, error: &CompileError) -> String {
    let (line, col) = line_col(source, error.span.start);
    let mut out = format!("{}:{}:{}: {}", file_name, line, col, error.message);
    for note in &error.notes {
        out.push_str(&format!("\n  = note: {}", note));
    }
    for hint in &error.hints {
        out.push_str(&format!("\n  = hint: {}", hint));
    }
    out
}

/// Render an error as a `miette` report with the offending source line underlined (no colors).
pub fn render_snippet(file_name: &str, source: &str, error: &CompileError) -> String {
    let report =
        Report::new(error.clone()).with_source_code(NamedSource::new(file_name, source.to_string()));
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    if handler.render_report(&mut out, &*report).is_err() {
        return format_error(file_name, source, error);
    }
    out
}

/// Get 1-based line and column (in bytes) for a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before.iter().rposition(|&b| b == b'\n').map(|i| i + 1).unwrap_or(0);
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_first_line() {
        assert_eq!(line_col("package x\n", 0), (1, 1));
        assert_eq!(line_col("package x\n", 8), (1, 9));
    }

    #[test]
    fn test_line_col_later_line() {
        let src = "package x\n\nfunc F() {}\n";
        assert_eq!(line_col(src, 11), (3, 1));
        assert_eq!(line_col(src, 16), (3, 6));
    }

    #[test]
    fn test_line_col_clamps_offset() {
        assert_eq!(line_col("ab", 100), (1, 3));
    }

    #[test]
    fn test_format_error_with_hint() {
        let src = "package x\nfunc (\n";
        let err = CompileError::syntax("expected ')'".to_string(), Span::new(16, 17)).with_hint("close the list");
        let msg = format_error("x.go", src, &err);
        assert!(msg.starts_with("x.go:2:7: expected ')'"), "got: {}", msg);
        assert!(msg.contains("= hint: close the list"));
    }

    #[test]
    fn test_render_snippet_mentions_message() {
        let src = "package x\nfunc {\n";
        let err = CompileError::syntax("expected function name".to_string(), Span::new(15, 16));
        let out = render_snippet("x.go", src, &err);
        assert!(out.contains("expected function name"), "got: {}", out);
        assert!(out.contains("x.go"), "got: {}", out);
    }
}
