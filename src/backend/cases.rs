//! Case model: everything the harness references, collected across files
//!
//! The [`CaseModelBuilder`] is created empty, fed one [`FileAnalysis`] per source file in order, and finalized once
//! into [`Cases`]. Finalizing keeps only the imports that some test, benchmark, example or `TestMain` is referenced
//! through, sorted by alias.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;

use super::quote::quote_str;
use crate::frontend::analyzer::FileAnalysis;

const EXTERNAL_SUFFIX: &str = "_test";

/// Errors in the caller-supplied package mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseError {
    #[error("invalid import {} specified, expected alias=path", quote_str(.0))]
    InvalidImport(String),
    #[error("invalid source {} specified, expected alias=file", quote_str(.0))]
    InvalidSource(String),
    #[error("no import path for package alias {}", quote_str(.0))]
    UnresolvedAlias(String),
}

/// A package the harness imports under `alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub alias: String,
    pub path: String,
}

/// A test or benchmark function, referenced as `package.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub package: String,
    pub name: String,
}

/// A documentation example with its expected output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub package: String,
    pub name: String,
    pub output: String,
    pub unordered: bool,
}

/// Finalized harness data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cases {
    pub run_dir: String,
    /// Referenced packages only, strictly ascending by alias.
    pub imports: Vec<Import>,
    pub tests: Vec<TestCase>,
    pub benchmarks: Vec<TestCase>,
    pub examples: Vec<Example>,
    /// `package.TestMain` of the entry-point override, if any.
    pub test_main: Option<String>,
    pub coverage: bool,
}

impl Cases {
    /// JSON view of the aggregate, for `--dump-cases`.
    pub fn to_json(&self) -> Value {
        let case = |c: &TestCase| json!({ "package": c.package, "name": c.name });
        json!({
            "run_dir": self.run_dir,
            "coverage": self.coverage,
            "imports": self.imports.iter().map(|i| json!({ "alias": i.alias, "path": i.path })).collect::<Vec<_>>(),
            "tests": self.tests.iter().map(case).collect::<Vec<_>>(),
            "benchmarks": self.benchmarks.iter().map(case).collect::<Vec<_>>(),
            "examples": self.examples.iter().map(|e| json!({
                "package": e.package,
                "name": e.name,
                "output": e.output,
                "unordered": e.unordered,
            })).collect::<Vec<_>>(),
            "test_main": self.test_main,
        })
    }
}

/// A `--src alias=file` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArg {
    pub alias: String,
    pub path: PathBuf,
}

/// Split `value` into exactly two parts around a single `=`.
fn split_pair(value: &str) -> Option<(&str, &str)> {
    let mut parts = value.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lhs), Some(rhs), None) => Some((lhs, rhs)),
        _ => None,
    }
}

/// Parse an `alias=path` import argument.
pub fn parse_import(value: &str) -> Result<Import, CaseError> {
    let (alias, path) = split_pair(value).ok_or_else(|| CaseError::InvalidImport(value.to_string()))?;
    Ok(Import {
        alias: alias.to_string(),
        path: path.to_string(),
    })
}

/// Parse an `alias=file` source argument.
pub fn parse_source(value: &str) -> Result<SourceArg, CaseError> {
    let (alias, path) = split_pair(value).ok_or_else(|| CaseError::InvalidSource(value.to_string()))?;
    Ok(SourceArg {
        alias: alias.to_string(),
        path: PathBuf::from(path),
    })
}

/// Accumulates cases file by file.
#[derive(Debug, Clone, Default)]
pub struct CaseModelBuilder {
    run_dir: String,
    coverage: bool,
    /// alias -> import path; a later mapping for the same alias replaces the earlier one.
    imports: BTreeMap<String, String>,
    used: BTreeSet<String>,
    tests: Vec<TestCase>,
    benchmarks: Vec<TestCase>,
    examples: Vec<Example>,
    test_main: Option<String>,
}

impl CaseModelBuilder {
    pub fn new(run_dir: impl Into<String>, coverage: bool) -> Self {
        Self {
            run_dir: run_dir.into(),
            coverage,
            ..Self::default()
        }
    }

    pub fn add_import(&mut self, import: Import) {
        if let Some(previous) = self.imports.insert(import.alias.clone(), import.path) {
            tracing::debug!(alias = %import.alias, %previous, "import mapping replaced");
        }
    }

    /// Append one file's cases and mark its reference used if it contributed anything.
    pub fn record(&mut self, analysis: FileAnalysis) {
        let contributes = analysis.contributes();
        let FileAnalysis {
            reference,
            tests,
            benchmarks,
            examples,
            test_main,
        } = analysis;

        self.tests.extend(tests.into_iter().map(|name| TestCase {
            package: reference.clone(),
            name,
        }));
        self.benchmarks.extend(benchmarks.into_iter().map(|name| TestCase {
            package: reference.clone(),
            name,
        }));
        self.examples.extend(examples.into_iter().map(|e| Example {
            package: reference.clone(),
            name: e.name,
            output: e.output,
            unordered: e.unordered,
        }));
        if let Some(name) = test_main {
            let target = format!("{}.{}", reference, name);
            if let Some(previous) = self.test_main.replace(target) {
                tracing::debug!(%previous, "entry-point override replaced");
            }
        }
        if contributes {
            self.used.insert(reference);
        }
    }

    /// Resolve the used aliases to imports and produce the final aggregate.
    ///
    /// An external test alias (`x_test`) without its own mapping shares the path of `x`.
    pub fn finalize(self) -> Result<Cases, CaseError> {
        let mut imports = Vec::with_capacity(self.used.len());
        for alias in self.used {
            let path = self
                .imports
                .get(&alias)
                .or_else(|| {
                    alias
                        .strip_suffix(EXTERNAL_SUFFIX)
                        .and_then(|base| self.imports.get(base))
                })
                .cloned()
                .ok_or_else(|| CaseError::UnresolvedAlias(alias.clone()))?;
            imports.push(Import { alias, path });
        }

        Ok(Cases {
            run_dir: self.run_dir,
            imports,
            tests: self.tests,
            benchmarks: self.benchmarks,
            examples: self.examples,
            test_main: self.test_main,
            coverage: self.coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::examples::DocExample;

    fn analysis(reference: &str, tests: &[&str]) -> FileAnalysis {
        FileAnalysis {
            reference: reference.to_string(),
            tests: tests.iter().map(|t| t.to_string()).collect(),
            benchmarks: Vec::new(),
            examples: Vec::new(),
            test_main: None,
        }
    }

    fn import(alias: &str, path: &str) -> Import {
        Import {
            alias: alias.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_parse_import_pairs() {
        assert_eq!(parse_import("x=example.com/lib"), Ok(import("x", "example.com/lib")));
        assert_eq!(parse_import("x="), Ok(import("x", "")));
        assert_eq!(
            parse_import("example.com/lib"),
            Err(CaseError::InvalidImport("example.com/lib".to_string()))
        );
        assert_eq!(parse_import("a=b=c"), Err(CaseError::InvalidImport("a=b=c".to_string())));
    }

    #[test]
    fn test_parse_source_pairs() {
        let arg = parse_source("x=pkg/lib_test.go").unwrap();
        assert_eq!(arg.alias, "x");
        assert_eq!(arg.path, PathBuf::from("pkg/lib_test.go"));
        assert!(parse_source("pkg/lib_test.go").is_err());
    }

    #[test]
    fn test_error_messages_quote_the_value() {
        let err = parse_import("bad\"value").unwrap_err();
        assert_eq!(err.to_string(), r#"invalid import "bad\"value" specified, expected alias=path"#);
        let err = parse_source("a=b=c").unwrap_err();
        assert!(err.to_string().starts_with(r#"invalid source "a=b=c""#));
    }

    #[test]
    fn test_only_used_imports_sorted() {
        let mut builder = CaseModelBuilder::new(".", false);
        builder.add_import(import("zeta", "z"));
        builder.add_import(import("alpha", "a"));
        builder.add_import(import("unused", "u"));
        builder.record(analysis("zeta", &["TestZ"]));
        builder.record(analysis("alpha", &["TestA"]));
        builder.record(analysis("unused", &[]));

        let cases = builder.finalize().unwrap();
        let aliases: Vec<_> = cases.imports.iter().map(|i| i.alias.as_str()).collect();
        assert_eq!(aliases, vec!["alpha", "zeta"]);
        let tests: Vec<_> = cases.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tests, vec!["TestZ", "TestA"]);
    }

    #[test]
    fn test_later_import_mapping_wins() {
        let mut builder = CaseModelBuilder::new(".", false);
        builder.add_import(import("x", "old"));
        builder.add_import(import("x", "new"));
        builder.record(analysis("x", &["TestX"]));
        assert_eq!(builder.finalize().unwrap().imports, vec![import("x", "new")]);
    }

    #[test]
    fn test_external_alias_falls_back_to_library_path() {
        let mut builder = CaseModelBuilder::new(".", false);
        builder.add_import(import("x", "example.com/lib"));
        builder.record(analysis("x", &["TestFoo"]));
        builder.record(analysis("x_test", &["TestBar"]));

        let cases = builder.finalize().unwrap();
        assert_eq!(
            cases.imports,
            vec![import("x", "example.com/lib"), import("x_test", "example.com/lib")]
        );
        assert_eq!(cases.tests[1].package, "x_test");
    }

    #[test]
    fn test_explicit_external_mapping_preferred() {
        let mut builder = CaseModelBuilder::new(".", false);
        builder.add_import(import("x", "example.com/lib"));
        builder.add_import(import("x_test", "example.com/lib_test"));
        builder.record(analysis("x_test", &["TestBar"]));
        assert_eq!(
            builder.finalize().unwrap().imports,
            vec![import("x_test", "example.com/lib_test")]
        );
    }

    #[test]
    fn test_unresolved_alias_is_error() {
        let mut builder = CaseModelBuilder::new(".", false);
        builder.record(analysis("ghost", &["TestX"]));
        assert_eq!(builder.finalize(), Err(CaseError::UnresolvedAlias("ghost".to_string())));
    }

    #[test]
    fn test_last_test_main_wins() {
        let mut builder = CaseModelBuilder::new(".", false);
        builder.add_import(import("a", "pa"));
        builder.add_import(import("b", "pb"));
        let mut first = analysis("a", &[]);
        first.test_main = Some("TestMain".to_string());
        let mut second = analysis("b", &[]);
        second.test_main = Some("TestMain".to_string());
        builder.record(first);
        builder.record(second);

        let cases = builder.finalize().unwrap();
        assert_eq!(cases.test_main.as_deref(), Some("b.TestMain"));
        // Both files contributed an override, so both stay imported.
        assert_eq!(cases.imports.len(), 2);
    }

    #[test]
    fn test_examples_mark_used_and_keep_reference() {
        let mut builder = CaseModelBuilder::new(".", false);
        builder.add_import(import("x", "p"));
        let mut file = analysis("x_test", &[]);
        file.examples.push(DocExample {
            name: "ExampleHello".to_string(),
            output: "hello\n".to_string(),
            unordered: true,
        });
        builder.record(file);

        let cases = builder.finalize().unwrap();
        assert_eq!(cases.imports, vec![import("x_test", "p")]);
        assert_eq!(
            cases.examples,
            vec![Example {
                package: "x_test".to_string(),
                name: "ExampleHello".to_string(),
                output: "hello\n".to_string(),
                unordered: true,
            }]
        );
    }

    #[test]
    fn test_to_json_shape() {
        let mut builder = CaseModelBuilder::new("pkg/dir", true);
        builder.add_import(import("x", "p"));
        builder.record(analysis("x", &["TestA"]));
        let value = builder.finalize().unwrap().to_json();
        assert_eq!(value["run_dir"], "pkg/dir");
        assert_eq!(value["coverage"], true);
        assert_eq!(value["imports"][0]["path"], "p");
        assert_eq!(value["tests"][0]["name"], "TestA");
        assert!(value["test_main"].is_null());
    }
}
