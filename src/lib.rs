#![forbid(unsafe_code)]
//! Go test harness generator
//!
//! Reads the Go test sources of one package, finds its tests, benchmarks and documentation examples purely from their
//! declarations, and writes the `main` program of the test binary. The generated program follows the environment
//! protocol of Bazel-style test runners (working directory, test filter, sharding, coverage output).
//!
//! ```
//! use testmain::backend::{CaseModelBuilder, render};
//! use testmain::backend::cases::parse_import;
//! use testmain::frontend::{analyzer, parser};
//!
//! let file = parser::parse_source("package lib\n\nimport \"testing\"\n\nfunc TestAdd(t *testing.T) {}\n").unwrap();
//! let mut builder = CaseModelBuilder::new(".", false);
//! builder.add_import(parse_import("lib=example.com/lib").unwrap());
//! builder.record(analyzer::analyze_file(&file, "lib"));
//! let harness = render(&builder.finalize().unwrap());
//! assert!(harness.contains("{\"TestAdd\", lib.TestAdd},"));
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod backend;
pub mod cli;
pub mod config;
pub mod frontend;
pub mod runtime;
pub mod version;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;

pub use backend::{CaseModelBuilder, Cases, render};
pub use config::GeneratorConfig;
