//! Harness generation backend
//!
//! The pipeline is:
//! 1. Per-file analyses from the frontend → [`CaseModelBuilder`] → finalized [`Cases`]
//! 2. [`Cases`] → [`render`] → Go source of the harness program
//!
//! ## Module Organization
//!
//! - `cases` - Argument pairs, alias mapping, the used-set and the finalized aggregate
//! - `emitter` - Rendering of the harness program
//! - `writer` - Indentation-tracking source writer
//! - `quote` - Go string-literal quoting

pub mod cases;
pub mod emitter;
pub mod quote;
pub mod writer;

pub use cases::{CaseError, CaseModelBuilder, Cases};
pub use emitter::render;
