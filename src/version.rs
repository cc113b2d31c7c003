//! Generator version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time so the CLI and any diagnostics agree
//! on it.

/// The generator version string (for example, `0.3.0`).
pub const TESTMAIN_VERSION: &str = env!("CARGO_PKG_VERSION");
