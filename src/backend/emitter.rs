//! Harness emitter
//!
//! Renders finalized [`Cases`] as the Go source of the harness program. The output is laid out the way `gofmt` would
//! leave it. The substitution points are the import list, the three case tables, the coverage wiring, the run
//! directory and the `TestMain` hook; everything else is fixed text.

use std::path::MAIN_SEPARATOR;

use super::cases::{Cases, Example, TestCase};
use super::quote::quote_str;
use super::writer::CodeWriter;
use crate::runtime::{
    COVERAGE_OUTPUT_FILE, COVERDATA_IMPORT, COVERPROFILE_FLAG, RUN_FLAG, STD_IMPORTS, TESTBRIDGE_TEST_ONLY,
    TEST_SHARD_INDEX, TEST_SRCDIR, TEST_TOTAL_SHARDS,
};

pub const GENERATED_HEADER: &str = "// Code generated by generate-test-main. DO NOT EDIT.";

/// Render the harness program.
#[tracing::instrument(skip_all, fields(
    imports = cases.imports.len(),
    tests = cases.tests.len(),
    benchmarks = cases.benchmarks.len(),
    examples = cases.examples.len(),
))]
pub fn render(cases: &Cases) -> String {
    let mut w = CodeWriter::new();
    w.writeln(GENERATED_HEADER);
    w.newline();
    w.writeln("package main");
    w.newline();
    emit_imports(&mut w, cases);
    w.newline();
    emit_case_table(&mut w, "allTests", "InternalTest", &cases.tests);
    w.newline();
    emit_case_table(&mut w, "benchmarks", "InternalBenchmark", &cases.benchmarks);
    w.newline();
    emit_examples(&mut w, &cases.examples);
    w.newline();
    emit_tests_in_shard(&mut w);
    w.newline();
    emit_main(&mut w, cases);
    w.finish()
}

fn emit_imports(w: &mut CodeWriter, cases: &Cases) {
    w.block("import (", ")", |w| {
        for package in STD_IMPORTS {
            w.writeln(&quote_str(package));
        }
        if cases.coverage {
            w.newline();
            w.writeln(&quote_str(COVERDATA_IMPORT));
        }
        if !cases.imports.is_empty() {
            w.newline();
            for import in &cases.imports {
                w.writeln(&format!("{} {}", import.alias, quote_str(&import.path)));
            }
        }
    });
}

fn emit_case_table(w: &mut CodeWriter, var: &str, kind: &str, cases: &[TestCase]) {
    w.block(&format!("var {} = []testing.{}{{", var, kind), "}", |w| {
        for case in cases {
            w.writeln(&format!("{{{}, {}.{}}},", quote_str(&case.name), case.package, case.name));
        }
    });
}

fn emit_examples(w: &mut CodeWriter, examples: &[Example]) {
    w.block("var examples = []testing.InternalExample{", "}", |w| {
        for example in examples {
            w.writeln(&format!(
                "{{Name: {}, F: {}.{}, Output: {}, Unordered: {}}},",
                quote_str(&example.name),
                example.package,
                example.name,
                quote_str(&example.output),
                example.unordered,
            ));
        }
    });
}

fn emit_tests_in_shard(w: &mut CodeWriter) {
    w.block("func testsInShard() []testing.InternalTest {", "}", |w| {
        w.writeln(&format!(
            "totalShards, err := strconv.Atoi(os.Getenv({}))",
            quote_str(TEST_TOTAL_SHARDS)
        ));
        w.block("if err != nil || totalShards <= 1 {", "}", |w| w.writeln("return allTests"));
        w.writeln(&format!(
            "shardIndex, err := strconv.Atoi(os.Getenv({}))",
            quote_str(TEST_SHARD_INDEX)
        ));
        w.block("if err != nil || shardIndex < 0 {", "}", |w| w.writeln("return allTests"));
        w.writeln("tests := []testing.InternalTest{}");
        w.block("for i, t := range allTests {", "}", |w| {
            w.block("if i%totalShards == shardIndex {", "}", |w| {
                w.writeln("tests = append(tests, t)");
            });
        });
        w.writeln("return tests");
    });
}

fn emit_main(w: &mut CodeWriter, cases: &Cases) {
    w.block("func main() {", "}", |w| {
        w.writeln(&format!(
            "// Relocate to the package directory when {} marks a test-runner launch.",
            TEST_SRCDIR
        ));
        w.block(&format!("if _, ok := os.LookupEnv({}); ok {{", quote_str(TEST_SRCDIR)), "}", |w| {
            w.block(&format!("if err := os.Chdir({}); err != nil {{", run_dir_literal(&cases.run_dir)), "}", |w| {
                w.writeln("log.Fatalf(\"could not change to test directory: %v\", err)");
            });
        });
        w.newline();
        w.block(
            &format!("if filter := os.Getenv({}); filter != \"\" {{", quote_str(TESTBRIDGE_TEST_ONLY)),
            "}",
            |w| {
                w.block(&format!("if f := flag.Lookup({}); f != nil {{", quote_str(RUN_FLAG)), "}", |w| {
                    w.writeln("f.Value.Set(filter)");
                });
            },
        );
        w.newline();

        if cases.coverage {
            w.block("if len(coverdata.Cover.Counters) > 0 {", "}", |w| {
                w.writeln("testing.RegisterCover(coverdata.Cover)");
            });
            w.block(
                &format!("if coverageDat, ok := os.LookupEnv({}); ok {{", quote_str(COVERAGE_OUTPUT_FILE)),
                "}",
                |w| {
                    w.block("if testing.CoverMode() != \"\" {", "}", |w| {
                        w.writeln(&format!(
                            "flag.Lookup({}).Value.Set(coverageDat)",
                            quote_str(COVERPROFILE_FLAG)
                        ));
                    });
                },
            );
            w.newline();
        }

        w.writeln("m := testing.MainStart(testdeps.TestDeps{}, testsInShard(), benchmarks, examples)");
        match &cases.test_main {
            Some(target) => w.writeln(&format!("{}(m)", target)),
            None => w.writeln("os.Exit(m.Run())"),
        }
    });
}

/// The run directory as a Go literal, with separators native to the generating host.
fn run_dir_literal(run_dir: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        quote_str(run_dir)
    } else {
        quote_str(&run_dir.replace('/', &MAIN_SEPARATOR.to_string()))
    }
}
