//! CLI module for the test harness generator
//!
//! ## Usage
//!
//! ```text
//! generate-test-main --rundir pkg/dir --output testmain.go \
//!     --import x=example.com/lib --src x=pkg/dir/lib_test.go
//! ```
//!
//! Go-style single-dash long flags (`-rundir`, `-import x=...`) are accepted as well, so existing build rules can call
//! the generator unchanged.
//!
//! ## Modules
//!
//! - `commands` - The generate pipeline and output sinks
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::process;

use clap::{ArgAction, Parser};

use crate::config::GeneratorConfig;
use crate::frontend::constraints::BuildContext;
use crate::version::TESTMAIN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate the main program of a Go test binary
#[derive(Parser, Debug)]
#[command(name = "generate-test-main")]
#[command(version = TESTMAIN_VERSION)]
#[command(about = "Generate the main program of a Go test binary", long_about = None)]
pub struct Cli {
    /// Directory the tests run in when launched by a test runner
    #[arg(long = "rundir", value_name = "DIR", default_value = ".")]
    pub run_dir: String,

    /// Output file to write (default: stdout)
    #[arg(long, value_name = "PATH", default_value = "")]
    pub output: String,

    /// Wire coverage collection into the harness
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub coverage: bool,

    /// Package to import, as alias=importpath (repeatable)
    #[arg(long = "import", value_name = "ALIAS=PATH")]
    pub imports: Vec<String>,

    /// Source file to scan for tests, as alias=file (repeatable)
    #[arg(long = "src", value_name = "ALIAS=FILE")]
    pub sources: Vec<String>,

    /// Target operating system for build constraints (default: host)
    #[arg(long, env = "GOOS", value_name = "OS")]
    pub goos: Option<String>,

    /// Target architecture for build constraints (default: host)
    #[arg(long, env = "GOARCH", value_name = "ARCH")]
    pub goarch: Option<String>,

    /// Extra build tags, comma-separated
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Treat cgo as enabled when evaluating build constraints
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub cgo: bool,

    /// Print the discovered cases as JSON instead of the harness (debug)
    #[arg(long = "dump-cases")]
    pub dump_cases: bool,
}

impl Cli {
    /// Assemble the run configuration.
    pub fn into_config(self) -> GeneratorConfig {
        let mut build = BuildContext::new().with_cgo(self.cgo).with_tags(self.tags);
        if let Some(goos) = self.goos.filter(|v| !v.is_empty()) {
            build = build.with_goos(goos);
        }
        if let Some(goarch) = self.goarch.filter(|v| !v.is_empty()) {
            build = build.with_goarch(goarch);
        }

        let mut config = GeneratorConfig::new()
            .with_run_dir(self.run_dir)
            .with_output(self.output)
            .with_coverage(self.coverage)
            .with_build_context(build)
            .with_dump_cases(self.dump_cases);
        config.imports = self.imports;
        config.sources = self.sources;
        config
    }
}

/// Rewrite Go-style `-flag` arguments to `--flag`.
///
/// The first argument (program name) and everything after a bare `--` are left alone, as are short flags like `-h`.
pub fn normalize_go_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (position, arg) in args.into_iter().enumerate() {
        if position == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        match arg.to_str() {
            Some(text) if text.len() > 2 && text.starts_with('-') && !text.starts_with("--") => {
                out.push(OsString::from(format!("-{}", text)));
            }
            _ => out.push(arg),
        }
    }
    out
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse_from(normalize_go_flags(env::args_os()));

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the parsed command line and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    commands::generate(cli.into_config())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_go_flags(os_args(args))).unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = parse(&["generate-test-main"]);
        assert_eq!(cli.run_dir, ".");
        assert_eq!(cli.output, "");
        assert!(!cli.coverage);
        assert!(cli.imports.is_empty());
        assert!(cli.sources.is_empty());
        assert!(!cli.dump_cases);
    }

    #[test]
    fn test_cli_repeated_pairs() {
        let cli = parse(&[
            "generate-test-main",
            "--import",
            "x=example.com/lib",
            "--import=y=example.com/other",
            "--src",
            "x=lib_test.go",
        ]);
        assert_eq!(cli.imports, vec!["x=example.com/lib", "y=example.com/other"]);
        assert_eq!(cli.sources, vec!["x=lib_test.go"]);
    }

    #[test]
    fn test_cli_go_style_flags() {
        let cli = parse(&[
            "generate-test-main",
            "-rundir",
            "pkg/dir",
            "-output=out.go",
            "-coverage",
            "-import",
            "x=example.com/lib",
            "-src=x=lib_test.go",
        ]);
        assert_eq!(cli.run_dir, "pkg/dir");
        assert_eq!(cli.output, "out.go");
        assert!(cli.coverage);
        assert_eq!(cli.imports, vec!["x=example.com/lib"]);
        assert_eq!(cli.sources, vec!["x=lib_test.go"]);
    }

    #[test]
    fn test_cli_explicit_bool_values() {
        assert!(parse(&["generate-test-main", "-coverage=true"]).coverage);
        assert!(!parse(&["generate-test-main", "--coverage=false"]).coverage);
        assert!(parse(&["generate-test-main", "--cgo"]).cgo);
    }

    #[test]
    fn test_cli_tags_split_on_commas() {
        let cli = parse(&["generate-test-main", "--tags", "integration,purego"]);
        assert_eq!(cli.tags, vec!["integration", "purego"]);
    }

    #[test]
    fn test_normalize_leaves_short_flags_and_passthrough() {
        let out = normalize_go_flags(os_args(&["prog", "-h", "-rundir", "--", "-x-y"]));
        assert_eq!(out, os_args(&["prog", "-h", "--rundir", "--", "-x-y"]));
    }

    #[test]
    fn test_into_config() {
        let cli = parse(&[
            "generate-test-main",
            "--goos",
            "windows",
            "--goarch",
            "arm64",
            "--tags",
            "foo",
            "--output",
            "main.go",
            "--import",
            "x=p",
        ]);
        let config = cli.into_config();
        assert_eq!(config.build.goos, "windows");
        assert_eq!(config.build.goarch, "arm64");
        assert_eq!(config.build.tags, vec!["foo"]);
        assert_eq!(config.output, Some(PathBuf::from("main.go")));
        assert_eq!(config.imports, vec!["x=p"]);
    }
}
