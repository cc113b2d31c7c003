//! Runtime contract of the generated harness
//!
//! The harness is a Go program, so nothing here runs inside it. This module holds the fixed names the emitter
//! writes into the program, and a pure model of what the program does with its environment. The model is what the
//! contract is tested against; the emitter renders the same decisions as Go code.
//!
//! The harness moves through five phases in order:
//!
//! | Phase     | Effect                                                                        |
//! |-----------|-------------------------------------------------------------------------------|
//! | Startup   | `TEST_SRCDIR` present: change to the run directory, fatal on failure          |
//! | Configure | `TESTBRIDGE_TEST_ONLY` overrides `test.run`; coverage registration and output |
//! | Select    | `TEST_TOTAL_SHARDS` / `TEST_SHARD_INDEX` pick the tests of this shard         |
//! | Execute   | the engine starts with the selected tests, all benchmarks, all examples       |
//! | Exit      | `TestMain(m)` if overridden, otherwise `os.Exit(m.Run())`                     |

use std::collections::BTreeMap;

use crate::backend::cases::{Cases, TestCase};

/// Presence triggers working-directory relocation.
pub const TEST_SRCDIR: &str = "TEST_SRCDIR";
/// Non-empty value overrides `test.run`.
pub const TESTBRIDGE_TEST_ONLY: &str = "TESTBRIDGE_TEST_ONLY";
pub const TEST_TOTAL_SHARDS: &str = "TEST_TOTAL_SHARDS";
pub const TEST_SHARD_INDEX: &str = "TEST_SHARD_INDEX";
/// Overrides `test.coverprofile` when a coverage mode is active.
pub const COVERAGE_OUTPUT_FILE: &str = "COVERAGE_OUTPUT_FILE";

pub const RUN_FLAG: &str = "test.run";
pub const COVERPROFILE_FLAG: &str = "test.coverprofile";

/// Package holding the coverage counters registered by instrumented builds.
pub const COVERDATA_IMPORT: &str = "github.com/bazelbuild/rules_go/go/tools/coverdata";

/// Standard-library packages every harness imports.
pub const STD_IMPORTS: [&str; 6] = ["flag", "log", "os", "strconv", "testing", "testing/internal/testdeps"];

/// Harness phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Startup,
    Configure,
    Select,
    Execute,
    Exit,
}

impl Phase {
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Startup => Some(Phase::Configure),
            Phase::Configure => Some(Phase::Select),
            Phase::Select => Some(Phase::Execute),
            Phase::Execute => Some(Phase::Exit),
            Phase::Exit => None,
        }
    }
}

/// Snapshot of the environment the harness reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessEnv {
    vars: BTreeMap<String, String>,
}

impl HarnessEnv {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// `os.LookupEnv`
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// `os.Getenv`: unset reads as empty.
    pub fn get(&self, name: &str) -> &str {
        self.lookup(name).unwrap_or("")
    }
}

/// Engine-side coverage state at Configure time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageState {
    /// Instrumented counters exist.
    pub has_counters: bool,
    /// Active coverage mode, empty when coverage is off.
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStrategy {
    /// `os.Exit(m.Run())`
    RunAndExit,
    /// Hand the engine to `package.TestMain`, which owns the exit.
    TestMain(String),
}

/// Decisions the harness takes for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePlan {
    pub chdir: Option<String>,
    pub run_filter: Option<String>,
    pub register_cover: bool,
    pub coverprofile: Option<String>,
    pub selected_tests: Vec<TestCase>,
    pub benchmarks: usize,
    pub examples: usize,
    pub exit: ExitStrategy,
}

impl RuntimePlan {
    /// Walk the phases against `env`.
    pub fn resolve(cases: &Cases, env: &HarnessEnv, coverage: &CoverageState) -> Self {
        let mut plan = RuntimePlan {
            chdir: None,
            run_filter: None,
            register_cover: false,
            coverprofile: None,
            selected_tests: Vec::new(),
            benchmarks: 0,
            examples: 0,
            exit: ExitStrategy::RunAndExit,
        };

        let mut phase = Some(Phase::Startup);
        while let Some(current) = phase {
            match current {
                Phase::Startup => {
                    if env.lookup(TEST_SRCDIR).is_some() {
                        plan.chdir = Some(cases.run_dir.clone());
                    }
                }
                Phase::Configure => {
                    let filter = env.get(TESTBRIDGE_TEST_ONLY);
                    if !filter.is_empty() {
                        plan.run_filter = Some(filter.to_string());
                    }
                    if cases.coverage {
                        plan.register_cover = coverage.has_counters;
                        if !coverage.mode.is_empty() {
                            plan.coverprofile = env.lookup(COVERAGE_OUTPUT_FILE).map(str::to_string);
                        }
                    }
                }
                Phase::Select => {
                    plan.selected_tests = tests_in_shard(&cases.tests, env.get(TEST_TOTAL_SHARDS), env.get(TEST_SHARD_INDEX))
                        .into_iter()
                        .cloned()
                        .collect();
                }
                Phase::Execute => {
                    plan.benchmarks = cases.benchmarks.len();
                    plan.examples = cases.examples.len();
                }
                Phase::Exit => {
                    if let Some(target) = &cases.test_main {
                        plan.exit = ExitStrategy::TestMain(target.clone());
                    }
                }
            }
            phase = current.next();
        }
        plan
    }
}

/// `strconv.Atoi`: optional sign then decimal digits, nothing else.
fn atoi(value: &str) -> Option<i64> {
    value.parse().ok()
}

/// Tests of one shard.
///
/// Sharding applies only when `total` parses above 1 and `index` parses to a non-negative number; otherwise every
/// test is selected. An index at or beyond `total` selects nothing.
pub fn tests_in_shard<'a, T>(tests: &'a [T], total: &str, index: &str) -> Vec<&'a T> {
    let all = || tests.iter().collect();
    let total = match atoi(total) {
        Some(total) if total > 1 => total,
        _ => return all(),
    };
    let index = match atoi(index) {
        Some(index) if index >= 0 => index,
        _ => return all(),
    };
    tests
        .iter()
        .enumerate()
        .filter(|(position, _)| (*position as i64) % total == index)
        .map(|(_, test)| test)
        .collect()
}
