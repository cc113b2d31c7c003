//! Test discovery frontend
//!
//! This module contains all frontend components:
//! - `lexer`, `parser`, `ast`, `diagnostics`: the Go syntax frontend
//! - `constraints`: build-constraint filtering of candidate files
//! - `analyzer`: classification of one parsed file's declarations
//! - `examples`: documentation example extraction

// Syntax components are provided by the shared testmain_syntax crate.
pub use testmain_syntax::{ast, diagnostics, lexer, parser};

pub mod analyzer;
pub mod constraints;
pub mod examples;
