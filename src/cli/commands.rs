//! Generator command implementation
//!
//! [`generate`] returns `CliResult<ExitCode>` instead of calling `process::exit`. Error handling and exits happen in
//! the top-level `run()`.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use thiserror::Error;

use crate::backend::cases::{self, CaseError, CaseModelBuilder, Cases};
use crate::backend::emitter;
use crate::config::GeneratorConfig;
use crate::frontend::analyzer;
use crate::frontend::constraints::{self, ConstraintError};
use crate::frontend::{diagnostics, parser};

use super::{CliError, CliResult, ExitCode};

/// Anything that stops a generator run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Case(#[from] CaseError),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    /// Already formatted as `file:line:col: message`, one line per error.
    #[error("{0}")]
    Parse(String),
    #[error("could not encode cases: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("could not write to stdout: {0}")]
    Stdout(#[source] io::Error),
}

impl From<GenerateError> for CliError {
    fn from(err: GenerateError) -> Self {
        CliError::failure(format!("error: {}", err))
    }
}

/// Run the generator end to end.
pub fn generate(config: GeneratorConfig) -> CliResult<ExitCode> {
    let cases = build_cases(&config)?;
    let contents = if config.dump_cases {
        let mut json = serde_json::to_string_pretty(&cases.to_json()).map_err(GenerateError::from)?;
        json.push('\n');
        json
    } else {
        emitter::render(&cases)
    };
    write_output(config.output.as_deref(), &contents)?;
    tracing::info!(
        tests = cases.tests.len(),
        benchmarks = cases.benchmarks.len(),
        examples = cases.examples.len(),
        "harness generated"
    );
    Ok(ExitCode::SUCCESS)
}

/// Validate the argument pairs, filter and analyze every source, and finalize the cases.
///
/// A source path given more than once is analyzed once per occurrence, always under the alias of its last
/// occurrence.
pub fn build_cases(config: &GeneratorConfig) -> Result<Cases, GenerateError> {
    let mut builder = CaseModelBuilder::new(config.run_dir.clone(), config.coverage);
    for pair in &config.imports {
        builder.add_import(cases::parse_import(pair)?);
    }

    let mut paths = Vec::with_capacity(config.sources.len());
    let mut aliases: HashMap<PathBuf, String> = HashMap::new();
    for pair in &config.sources {
        let source = cases::parse_source(pair)?;
        paths.push(source.path.clone());
        aliases.insert(source.path, source.alias);
    }

    let kept = constraints::filter_files(&config.build, &paths)?;
    for path in kept {
        let Some(alias) = aliases.get(&path) else {
            continue;
        };
        let source = fs::read_to_string(&path).map_err(|source| GenerateError::Read {
            path: path.clone(),
            source,
        })?;
        let file = parser::parse_source(&source).map_err(|errors| {
            let name = path.display().to_string();
            let lines: Vec<String> = errors
                .iter()
                .map(|err| diagnostics::format_error(&name, &source, err))
                .collect();
            GenerateError::Parse(lines.join("\n"))
        })?;
        builder.record(analyzer::analyze_file(&file, alias));
    }

    Ok(builder.finalize()?)
}

/// Write the generated text to `output`, or stdout when `None`.
///
/// A file is written next to its destination first and renamed into place, so the destination never holds partial
/// output.
pub fn write_output(output: Option<&Path>, contents: &str) -> Result<(), GenerateError> {
    match output {
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(GenerateError::Stdout)
        }
        Some(path) => write_atomic(path, contents).map_err(|source| GenerateError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"))?;
    let tmp = path.with_file_name(format!(".{}.{}.tmp", name.to_string_lossy(), process::id()));
    if let Err(err) = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frontend::constraints::BuildContext;

    fn linux() -> BuildContext {
        BuildContext::new().with_goos("linux").with_goarch("amd64")
    }

    fn write(dir: &Path, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_build_cases_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let lib = write(
            dir.path(),
            "lib_test.go",
            "package lib\n\nimport \"testing\"\n\nfunc TestFoo(t *testing.T) {}\n",
        );
        let config = GeneratorConfig::new()
            .with_build_context(linux())
            .with_import("x=example.com/lib")
            .with_source(format!("x={}", lib));

        let cases = build_cases(&config).unwrap();
        assert_eq!(cases.tests.len(), 1);
        assert_eq!(cases.tests[0].package, "x");
        assert_eq!(cases.imports[0].path, "example.com/lib");
    }

    #[test]
    fn test_filtered_file_is_not_analyzed() {
        let dir = tempfile::tempdir().unwrap();
        let windows = write(
            dir.path(),
            "lib_windows_test.go",
            "package lib\n\nimport \"testing\"\n\nfunc TestWin(t *testing.T) {}\n",
        );
        let config = GeneratorConfig::new()
            .with_build_context(linux())
            .with_import("x=example.com/lib")
            .with_source(format!("x={}", windows));

        let cases = build_cases(&config).unwrap();
        assert!(cases.tests.is_empty());
        assert!(cases.imports.is_empty());
    }

    #[test]
    fn test_invalid_pairs_abort() {
        let config = GeneratorConfig::new().with_import("nopair");
        assert!(matches!(
            build_cases(&config),
            Err(GenerateError::Case(CaseError::InvalidImport(_)))
        ));

        let config = GeneratorConfig::new().with_source("a=b=c");
        assert!(matches!(
            build_cases(&config),
            Err(GenerateError::Case(CaseError::InvalidSource(_)))
        ));
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing_test.go");
        let config = GeneratorConfig::new()
            .with_build_context(linux())
            .with_source(format!("x={}", missing.display()));

        let err = build_cases(&config).unwrap_err();
        assert!(err.to_string().contains("missing_test.go"), "{}", err);
    }

    #[test]
    fn test_parse_error_reports_location() {
        let dir = tempfile::tempdir().unwrap();
        let broken = write(dir.path(), "broken_test.go", "package lib\n\n+\n");
        let config = GeneratorConfig::new()
            .with_build_context(linux())
            .with_source(format!("x={}", broken));

        let err = build_cases(&config).unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
        assert!(err.to_string().contains("broken_test.go:3:1:"), "{}", err);
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("main.go");
        fs::write(&out, "old").unwrap();
        write_output(Some(&out), "new").unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_write_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no/such/dir/main.go");
        let err = write_output(Some(&out), "x").unwrap_err();
        assert!(matches!(err, GenerateError::Write { .. }));
        assert!(err.to_string().contains("main.go"));
        assert!(!out.exists());
    }

    #[test]
    fn test_generate_writes_harness() {
        let dir = tempfile::tempdir().unwrap();
        let src = write(
            dir.path(),
            "lib_test.go",
            "package lib\n\nimport \"testing\"\n\nfunc BenchmarkFoo(b *testing.B) {}\n",
        );
        let out = dir.path().join("testmain.go");
        let config = GeneratorConfig::new()
            .with_build_context(linux())
            .with_import("x=example.com/lib")
            .with_source(format!("x={}", src))
            .with_output(&out);

        assert_eq!(generate(config).unwrap(), ExitCode::SUCCESS);
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("{\"BenchmarkFoo\", x.BenchmarkFoo},"));
    }

    #[test]
    fn test_generate_error_converts_to_failure() {
        let err = generate(GeneratorConfig::new().with_import("bad")).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.starts_with("error: invalid import \"bad\""));
    }
}
