//! Syntax frontend for Go source files: lexer, parser, AST, diagnostics.
//!
//! This crate is dependency-light and only goes as deep as test discovery needs: the package clause, imports,
//! top-level function signatures, and every comment group with its position.
//!
//! ## Notes
//! - Function bodies and `var`/`const`/`type` declarations are recorded as spans, never parsed.
//! - Comments survive lexing as tokens and are grouped by the parser, so callers can find the comment groups that lie
//!   inside a function body.
//!
//! ## Examples
//! ```rust
//! use testmain_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("package lib\n\nimport \"testing\"\n").unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! assert_eq!(file.imports[0].node.path, "testing");
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
