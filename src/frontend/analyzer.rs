//! Source analysis: classify the top-level functions of one Go file
//!
//! Classification is purely syntactic. A function is a test case when its name starts with `Test`, it takes exactly
//! one parameter of type `*<pkg>.T` and declares no results; benchmarks are the same with `Benchmark` and `*<pkg>.B`.
//! The qualifier is not checked because the `testing` import may be aliased. Shapes that do not fit are skipped
//! silently, matching `go test`.
//!
//! `TestMain` is the entry-point override. When several files declare one, the last one analyzed wins.

use crate::frontend::ast::{FuncDecl, SourceFile};
use crate::frontend::examples::{DocExample, extract_examples};

const TEST_MAIN: &str = "TestMain";
const TEST_PREFIX: &str = "Test";
const BENCHMARK_PREFIX: &str = "Benchmark";
const EXTERNAL_SUFFIX: &str = "_test";

/// What a single top-level function is to the test harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    TestMain,
    Test,
    Benchmark,
    /// Named like a test or benchmark but with the wrong signature.
    Skipped(&'static str),
    /// Not a candidate at all (methods, helpers).
    Ignored,
}

/// Everything one file contributes to the harness, referenced through its effective alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysis {
    /// `alias`, or `alias_test` for an external test package.
    pub reference: String,
    pub tests: Vec<String>,
    pub benchmarks: Vec<String>,
    pub examples: Vec<DocExample>,
    /// Name of the `TestMain` function, if the file declares one.
    pub test_main: Option<String>,
}

impl FileAnalysis {
    /// Return `true` if anything in this file has to be referenced from the harness.
    pub fn contributes(&self) -> bool {
        !self.tests.is_empty() || !self.benchmarks.is_empty() || !self.examples.is_empty() || self.test_main.is_some()
    }
}

/// Alias through which a file's cases are referenced.
///
/// Files whose package clause ends in `_test` belong to the external test package, which is imported under its own
/// name next to the library.
pub fn effective_reference(alias: &str, package: &str) -> String {
    if package.ends_with(EXTERNAL_SUFFIX) {
        format!("{}{}", alias, EXTERNAL_SUFFIX)
    } else {
        alias.to_string()
    }
}

/// Classify one top-level function declaration.
pub fn classify(func: &FuncDecl) -> Classification {
    if func.is_method() {
        return Classification::Ignored;
    }
    let name = func.name.node.as_str();
    if name == TEST_MAIN {
        return Classification::TestMain;
    }
    let (kind, selected) = if name.starts_with(TEST_PREFIX) {
        (Classification::Test, "T")
    } else if name.starts_with(BENCHMARK_PREFIX) {
        (Classification::Benchmark, "B")
    } else {
        return Classification::Ignored;
    };

    if func.params.param_count() != 1 {
        return Classification::Skipped("expected exactly one parameter");
    }
    if func.has_results() {
        return Classification::Skipped("declares results");
    }
    let param = func.params.fields.first().map(|field| &field.ty.node);
    match param.and_then(|ty| ty.pointer_to_selector_name()) {
        Some(sel) if sel == selected => kind,
        Some(_) => Classification::Skipped("parameter points to the wrong type"),
        None => Classification::Skipped("parameter is not a pointer to a qualified type"),
    }
}

/// Analyze one parsed file whose package the caller maps to `alias`.
#[tracing::instrument(skip_all, fields(alias = alias, package = %file.package.node))]
pub fn analyze_file(file: &SourceFile, alias: &str) -> FileAnalysis {
    let reference = effective_reference(alias, &file.package.node);

    let examples = extract_examples(file);
    for example in &examples {
        tracing::debug!(name = %example.name, unordered = example.unordered, "example");
    }

    let mut analysis = FileAnalysis {
        reference,
        tests: Vec::new(),
        benchmarks: Vec::new(),
        examples,
        test_main: None,
    };

    for func in file.functions() {
        let name = &func.name.node;
        match classify(func) {
            Classification::TestMain => {
                tracing::debug!(name = %name, "entry-point override");
                analysis.test_main = Some(name.clone());
            }
            Classification::Test => {
                tracing::debug!(name = %name, "test");
                analysis.tests.push(name.clone());
            }
            Classification::Benchmark => {
                tracing::debug!(name = %name, "benchmark");
                analysis.benchmarks.push(name.clone());
            }
            Classification::Skipped(reason) => {
                tracing::debug!(name = %name, reason, "skipped: signature does not match");
            }
            Classification::Ignored => {}
        }
    }

    analysis
}
