//! Integration tests for the harness generator
//!
//! Each test writes a small Go package into a scratch directory and runs the generator over it.

use std::fs;
use std::path::Path;

use testmain::backend::Cases;
use testmain::cli::commands::{self, GenerateError};
use testmain::frontend::constraints::BuildContext;
use testmain::{GeneratorConfig, render};

/// Helper to write one fixture file and return its `alias=path` source argument
fn source(dir: &Path, alias: &str, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    format!("{}={}", alias, path.display())
}

fn config() -> GeneratorConfig {
    GeneratorConfig::new().with_build_context(BuildContext::new().with_goos("linux").with_goarch("amd64"))
}

fn names(cases: &[testmain::backend::cases::TestCase]) -> Vec<String> {
    cases.iter().map(|c| format!("{}.{}", c.package, c.name)).collect()
}

fn aliases(cases: &Cases) -> Vec<&str> {
    cases.imports.iter().map(|i| i.alias.as_str()).collect()
}

#[test]
fn test_internal_and_external_test_files() {
    let dir = tempfile::tempdir().unwrap();
    let lib = source(
        dir.path(),
        "x",
        "lib.go",
        "package lib\n\nimport \"testing\"\n\nfunc TestFoo(t *testing.T) {}\n",
    );
    let external = source(
        dir.path(),
        "x",
        "lib_external_test.go",
        "package lib_test\n\nimport \"testing\"\n\nfunc TestBar(t *testing.T) {}\n",
    );
    let config = config()
        .with_import("x=example.com/lib")
        .with_source(lib)
        .with_source(external);

    let cases = commands::build_cases(&config).unwrap();
    assert_eq!(names(&cases.tests), vec!["x.TestFoo", "x_test.TestBar"]);
    assert_eq!(aliases(&cases), vec!["x", "x_test"]);
    assert!(cases.imports.iter().all(|i| i.path == "example.com/lib"));

    let harness = render(&cases);
    assert!(harness.contains("\tx \"example.com/lib\"\n\tx_test \"example.com/lib\"\n"));
}

#[test]
fn test_signature_mismatches_excluded() {
    let dir = tempfile::tempdir().unwrap();
    let src = source(
        dir.path(),
        "x",
        "shapes_test.go",
        r#"package lib

import (
	"errors"
	check "testing"
)

func Testify() {}

func TestAliased(t *check.T) {}

func TestTwo(t *check.T, extra int) {}

func TestNotPointer(t check.T) {}

func TestWrongType(b *check.B) {}

func BenchmarkFoo(b *check.B) error { return errors.New("no") }

func BenchmarkOk(b *check.B) {}

type suite struct{}

func (s *suite) TestMethod(t *check.T) {}
"#,
    );
    let cases = commands::build_cases(&config().with_import("x=p").with_source(src)).unwrap();
    assert_eq!(names(&cases.tests), vec!["x.TestAliased"]);
    assert_eq!(names(&cases.benchmarks), vec!["x.BenchmarkOk"]);
}

#[test]
fn test_examples_need_output_assertion() {
    let dir = tempfile::tempdir().unwrap();
    let src = source(
        dir.path(),
        "x",
        "example_test.go",
        r#"package lib_test

import "fmt"

func ExampleHello() {
	fmt.Println("hello")
	// Output: hello
}

func ExampleSilent() {
	fmt.Println("nothing checked")
}

func ExampleEmpty() {
	// Output:
}

func ExampleShuffle() {
	fmt.Println("b")
	fmt.Println("a")
	// Unordered output:
	// a
	// b
}
"#,
    );
    let cases = commands::build_cases(&config().with_import("x=p").with_source(src)).unwrap();
    let found: Vec<_> = cases
        .examples
        .iter()
        .map(|e| (e.name.as_str(), e.output.as_str(), e.unordered))
        .collect();
    assert_eq!(
        found,
        vec![
            ("ExampleHello", "hello\n", false),
            ("ExampleEmpty", "", false),
            ("ExampleShuffle", "a\nb\n", true),
        ]
    );
    assert_eq!(aliases(&cases), vec!["x_test"]);
    assert!(cases.tests.is_empty());
}

#[test]
fn test_unused_imports_dropped_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let b = source(
        dir.path(),
        "beta",
        "b_test.go",
        "package b\n\nimport \"testing\"\n\nfunc TestB(t *testing.T) {}\n",
    );
    let a = source(
        dir.path(),
        "alpha",
        "a_test.go",
        "package a\n\nimport \"testing\"\n\nfunc TestA(t *testing.T) {}\n",
    );
    let helper = source(dir.path(), "gamma", "helper.go", "package c\n\nfunc helper() {}\n");
    let config = config()
        .with_import("gamma=example.com/c")
        .with_import("beta=example.com/b")
        .with_import("alpha=example.com/a")
        .with_source(b)
        .with_source(a)
        .with_source(helper);

    let cases = commands::build_cases(&config).unwrap();
    assert_eq!(aliases(&cases), vec!["alpha", "beta"]);
    // Discovery order is file order, not alias order.
    assert_eq!(names(&cases.tests), vec!["beta.TestB", "alpha.TestA"]);
}

#[test]
fn test_last_test_main_wins() {
    let dir = tempfile::tempdir().unwrap();
    let first = source(
        dir.path(),
        "x",
        "main_test.go",
        "package lib\n\nimport \"testing\"\n\nfunc TestMain(m *testing.M) {}\n",
    );
    let second = source(
        dir.path(),
        "x",
        "main_external_test.go",
        "package lib_test\n\nimport \"testing\"\n\nfunc TestMain(m *testing.M) {}\n",
    );
    let config = config().with_import("x=p").with_source(first).with_source(second);

    let cases = commands::build_cases(&config).unwrap();
    assert_eq!(cases.test_main.as_deref(), Some("x_test.TestMain"));
    assert_eq!(aliases(&cases), vec!["x", "x_test"]);
    assert!(render(&cases).contains("\tx_test.TestMain(m)\n"));
}

#[test]
fn test_build_constraints_filter_sources() {
    let dir = tempfile::tempdir().unwrap();
    let ignored = source(
        dir.path(),
        "x",
        "ignored_test.go",
        "//go:build ignore\n\npackage lib\n\nimport \"testing\"\n\nfunc TestIgnored(t *testing.T) {}\n",
    );
    let tagged = source(
        dir.path(),
        "x",
        "tagged_test.go",
        "//go:build integration\n\npackage lib\n\nimport \"testing\"\n\nfunc TestTagged(t *testing.T) {}\n",
    );
    let darwin = source(
        dir.path(),
        "x",
        "lib_darwin_test.go",
        "package lib\n\nimport \"testing\"\n\nfunc TestDarwin(t *testing.T) {}\n",
    );

    let untagged = config()
        .with_import("x=p")
        .with_source(ignored.clone())
        .with_source(tagged.clone())
        .with_source(darwin.clone());
    let cases = commands::build_cases(&untagged).unwrap();
    assert!(cases.tests.is_empty());

    let with_tag = config()
        .with_build_context(
            BuildContext::new()
                .with_goos("linux")
                .with_goarch("amd64")
                .with_tags(["integration"]),
        )
        .with_import("x=p")
        .with_source(ignored)
        .with_source(tagged)
        .with_source(darwin);
    let cases = commands::build_cases(&with_tag).unwrap();
    assert_eq!(names(&cases.tests), vec!["x.TestTagged"]);
}

#[test]
fn test_parse_error_aborts_with_location() {
    let dir = tempfile::tempdir().unwrap();
    let good = source(
        dir.path(),
        "x",
        "good_test.go",
        "package lib\n\nimport \"testing\"\n\nfunc TestGood(t *testing.T) {}\n",
    );
    let bad = source(dir.path(), "x", "bad_test.go", "package lib\n\nfunc TestBad(t *testing.T) {\n\ts := \"open\n}\n");
    let config = config().with_import("x=p").with_source(good).with_source(bad);

    let err = commands::build_cases(&config).unwrap_err();
    assert!(matches!(err, GenerateError::Parse(_)));
    assert!(err.to_string().contains("bad_test.go:4:"), "{}", err);
}

#[test]
fn test_unresolved_alias_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let src = source(
        dir.path(),
        "ghost",
        "lib_test.go",
        "package lib\n\nimport \"testing\"\n\nfunc TestX(t *testing.T) {}\n",
    );
    let err = commands::build_cases(&config().with_source(src)).unwrap_err();
    assert_eq!(err.to_string(), "no import path for package alias \"ghost\"");
}

#[test]
fn test_generate_dump_cases_json() {
    let dir = tempfile::tempdir().unwrap();
    let src = source(
        dir.path(),
        "x",
        "lib_test.go",
        "package lib\n\nimport \"testing\"\n\nfunc TestX(t *testing.T) {}\n",
    );
    let out = dir.path().join("cases.json");
    let config = config()
        .with_import("x=example.com/lib")
        .with_source(src)
        .with_output(&out)
        .with_dump_cases(true);

    commands::generate(config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["tests"][0]["name"], "TestX");
    assert_eq!(value["imports"][0]["alias"], "x");
}

#[test]
fn test_example_output_round_trips_through_go_literal() {
    let dir = tempfile::tempdir().unwrap();
    let src = source(
        dir.path(),
        "x",
        "quote_test.go",
        "package lib_test\n\nimport \"fmt\"\n\nfunc ExampleQuote() {\n\tfmt.Println(`say \"hi\"`)\n\tfmt.Println(\"bye\")\n\t// Output:\n\t// say \"hi\"\n\t// bye\n}\n",
    );
    let cases = commands::build_cases(&config().with_import("x=p").with_source(src)).unwrap();
    assert_eq!(cases.examples[0].output, "say \"hi\"\nbye\n");

    let harness = render(&cases);
    let tokens = testmain::lexer::lex(&harness).unwrap();
    let literal = tokens
        .iter()
        .filter_map(|t| match &t.kind {
            testmain::lexer::TokenKind::String(bytes) => Some(bytes.clone()),
            _ => None,
        })
        .find(|bytes| bytes.starts_with(b"say"))
        .unwrap();
    assert_eq!(literal, b"say \"hi\"\nbye\n".to_vec());
}
