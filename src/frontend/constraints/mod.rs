//! Build-constraint filtering of candidate source files
//!
//! Only files the Go toolchain would compile for the target take part in test discovery. A file is kept when:
//! - it has a `.go` extension and its name does not start with `_` or `.`
//! - its `_GOOS`, `_GOARCH` or `_GOOS_GOARCH` name suffix (before an optional `_test`) matches the target
//! - its header constraints match: a `//go:build` line if present, otherwise every legacy `// +build` line
//!
//! The target is described by an immutable [`BuildContext`] built once per run.

mod expr;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use expr::Expr;

/// Operating systems the toolchain knows, used to recognise file name suffixes.
const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux", "nacl", "netbsd",
    "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures the toolchain knows, used to recognise file name suffixes.
const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle", "mips64", "mips64le",
    "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv", "riscv64", "s390", "s390x", "sparc", "sparc64",
    "wasm",
];

/// Systems satisfying the `unix` tag.
const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux", "netbsd", "openbsd",
    "solaris",
];

/// Highest `go1.N` release tag satisfied by default.
const LATEST_GO_MINOR: u32 = 22;

/// Errors raised while filtering files.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: {message}", path.display())]
    Syntax { path: PathBuf, line: usize, message: String },
    #[error("{}:{line}: multiple //go:build comments", path.display())]
    MultipleGoBuild { path: PathBuf, line: usize },
}

/// Target description used to evaluate build constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
    pub compiler: String,
    pub cgo_enabled: bool,
    /// User-supplied tags (`--tags a,b`).
    pub tags: Vec<String>,
    /// `go1.1` through the latest supported release.
    pub release_tags: Vec<String>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            goos: host_goos().to_string(),
            goarch: host_goarch().to_string(),
            compiler: "gc".to_string(),
            cgo_enabled: false,
            tags: Vec::new(),
            release_tags: (1..=LATEST_GO_MINOR).map(|minor| format!("go1.{}", minor)).collect(),
        }
    }
}

impl BuildContext {
    /// Create a context for the host platform.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_goos(mut self, goos: impl Into<String>) -> Self {
        self.goos = goos.into();
        self
    }

    pub fn with_goarch(mut self, goarch: impl Into<String>) -> Self {
        self.goarch = goarch.into();
        self
    }

    pub fn with_cgo(mut self, enabled: bool) -> Self {
        self.cgo_enabled = enabled;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .extend(tags.into_iter().map(Into::into).filter(|t: &String| !t.is_empty()));
        self
    }

    /// Return `true` if a single build tag is satisfied by this context.
    pub fn match_tag(&self, name: &str) -> bool {
        if self.cgo_enabled && name == "cgo" {
            return true;
        }
        if name == self.goos || name == self.goarch || name == self.compiler {
            return true;
        }
        let implied = match self.goos.as_str() {
            "android" => name == "linux",
            "illumos" => name == "solaris",
            "ios" => name == "darwin",
            _ => false,
        };
        if implied {
            return true;
        }
        if name == "unix" && UNIX_OS.contains(&self.goos.as_str()) {
            return true;
        }
        self.tags.iter().chain(&self.release_tags).any(|tag| tag == name)
    }

    /// Return `true` if the file name's OS/architecture suffixes fit this context.
    pub fn match_file_name(&self, name: &str) -> bool {
        let stem = name.split('.').next().unwrap_or(name);
        let Some(first) = stem.find('_') else {
            return true;
        };
        let mut parts: Vec<&str> = stem[first..].split('_').collect();
        if parts.last() == Some(&"test") {
            parts.pop();
        }
        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.match_tag(parts[n - 2]) && self.match_tag(parts[n - 1]);
        }
        if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
            return self.match_tag(parts[n - 1]);
        }
        true
    }

    /// Evaluate the header constraints of a file's contents.
    pub fn match_header(&self, content: &str) -> Result<bool, HeaderError> {
        let header = scan_header(content)?;
        let is_set = |tag: &str| self.match_tag(tag);

        if let Some((line, text)) = header.go_build {
            let expr = expr::parse_go_build(text).map_err(|message| HeaderError::Syntax { line, message })?;
            return Ok(expr.eval(&is_set));
        }

        let mut matched = true;
        for (line, text) in header.plus_build {
            let expr = expr::parse_plus_build(text).map_err(|message| HeaderError::Syntax { line, message })?;
            matched &= expr.eval(&is_set);
        }
        Ok(matched)
    }
}

/// Malformed constraint lines in a file header, located by 1-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    MultipleGoBuild { line: usize },
    Syntax { line: usize, message: String },
}

/// Constraint lines found in the comment block that precedes the package clause.
struct Header<'c> {
    go_build: Option<(usize, &'c str)>,
    plus_build: Vec<(usize, &'c str)>,
}

/// Collect constraint lines from the leading run of comments and blank lines.
///
/// Legacy `// +build` lines only count when a blank line follows them somewhere in that run, so a `// +build` in a
/// package doc comment is ignored.
fn scan_header(content: &str) -> Result<Header<'_>, HeaderError> {
    let mut go_build = None;
    let mut candidates = Vec::new();
    let mut last_blank = 0;
    let mut in_block = false;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if in_block {
            if let Some(end) = line.find("*/") {
                in_block = false;
                if !line[end + 2..].trim().is_empty() {
                    break;
                }
            }
            continue;
        }
        if line.is_empty() {
            last_blank = line_no;
            continue;
        }
        if let Some(rest) = line.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) if rest[end + 2..].trim().is_empty() => {}
                Some(_) => break,
                None => in_block = true,
            }
            continue;
        }
        if !line.starts_with("//") {
            break;
        }
        if expr::is_go_build(line) {
            if go_build.is_some() {
                return Err(HeaderError::MultipleGoBuild { line: line_no });
            }
            go_build = Some((line_no, line));
        } else if expr::is_plus_build(line) {
            candidates.push((line_no, line));
        }
    }

    let plus_build = candidates.into_iter().filter(|(line, _)| *line < last_blank).collect();
    Ok(Header { go_build, plus_build })
}

/// Decide whether one file takes part in the build.
pub fn match_file(ctx: &BuildContext, path: &Path) -> Result<bool, ConstraintError> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(false);
    };
    if !name.ends_with(".go") || name.starts_with('_') || name.starts_with('.') {
        tracing::debug!(path = %path.display(), "excluded by name");
        return Ok(false);
    }
    if !ctx.match_file_name(name) {
        tracing::debug!(path = %path.display(), goos = %ctx.goos, goarch = %ctx.goarch, "excluded by OS/arch suffix");
        return Ok(false);
    }

    let content = fs::read_to_string(path).map_err(|source| ConstraintError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let matched = ctx.match_header(&content).map_err(|err| match err {
        HeaderError::MultipleGoBuild { line } => ConstraintError::MultipleGoBuild {
            path: path.to_path_buf(),
            line,
        },
        HeaderError::Syntax { line, message } => ConstraintError::Syntax {
            path: path.to_path_buf(),
            line,
            message,
        },
    })?;
    if !matched {
        tracing::debug!(path = %path.display(), "excluded by build constraints");
    }
    Ok(matched)
}

/// Keep the files that match `ctx`, preserving order.
#[tracing::instrument(skip_all, fields(candidates = paths.len(), goos = %ctx.goos, goarch = %ctx.goarch))]
pub fn filter_files(ctx: &BuildContext, paths: &[PathBuf]) -> Result<Vec<PathBuf>, ConstraintError> {
    let mut kept = Vec::with_capacity(paths.len());
    for path in paths {
        if match_file(ctx, path)? {
            kept.push(path.clone());
        }
    }
    tracing::debug!(kept = kept.len(), "filtered source files");
    Ok(kept)
}

/// Host operating system in Go's spelling.
fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Host architecture in Go's spelling.
fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "loongarch64" => "loong64",
        "powerpc" => "ppc",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "wasm32" => "wasm",
        other => other,
    }
}
