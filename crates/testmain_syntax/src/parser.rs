//! Parser for Go source files
//!
//! Converts a token stream into a declaration-level [`SourceFile`]: package clause, imports, top-level function
//! signatures (with receivers, type parameters, parameters and results), and the spans of everything else.
//!
//! ## Examples
//!
//! ```rust
//! use testmain_syntax::{lexer, parser};
//!
//! let source = "package lib\n\nfunc TestAdd(t *testing.T) {}\n";
//! let tokens = lexer::lex(source).unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! assert_eq!(file.package.node, "lib");
//! assert_eq!(file.functions().count(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{KeywordId, OperatorId, PunctuationId, Token, TokenKind};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
