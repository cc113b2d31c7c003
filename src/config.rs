//! Generator configuration

use std::path::PathBuf;

use crate::frontend::constraints::BuildContext;

/// Everything one generator run needs, assembled once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory the harness changes into under a test runner
    pub run_dir: String,
    /// Output file; `None` writes to stdout
    pub output: Option<PathBuf>,
    /// Whether the harness wires up coverage collection
    pub coverage: bool,
    /// Raw `alias=path` import pairs, in command-line order
    pub imports: Vec<String>,
    /// Raw `alias=file` source pairs, in command-line order
    pub sources: Vec<String>,
    /// Target used to filter sources by build constraints
    pub build: BuildContext,
    /// Print the discovered cases as JSON instead of rendering
    pub dump_cases: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            run_dir: ".".to_string(),
            output: None,
            coverage: false,
            imports: Vec::new(),
            sources: Vec::new(),
            build: BuildContext::default(),
            dump_cases: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_dir(mut self, run_dir: impl Into<String>) -> Self {
        self.run_dir = run_dir.into();
        self
    }

    /// Set the output file. An empty path means stdout.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        self.output = if output.as_os_str().is_empty() { None } else { Some(output) };
        self
    }

    pub fn with_coverage(mut self, coverage: bool) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_import(mut self, pair: impl Into<String>) -> Self {
        self.imports.push(pair.into());
        self
    }

    pub fn with_source(mut self, pair: impl Into<String>) -> Self {
        self.sources.push(pair.into());
        self
    }

    pub fn with_build_context(mut self, build: BuildContext) -> Self {
        self.build = build;
        self
    }

    pub fn with_dump_cases(mut self, dump: bool) -> Self {
        self.dump_cases = dump;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.run_dir, ".");
        assert_eq!(config.output, None);
        assert!(!config.coverage);
        assert!(config.imports.is_empty());
        assert!(!config.dump_cases);
    }

    #[test]
    fn test_empty_output_means_stdout() {
        assert_eq!(GeneratorConfig::new().with_output("").output, None);
        assert_eq!(
            GeneratorConfig::new().with_output("out/main.go").output,
            Some(PathBuf::from("out/main.go"))
        );
    }

    #[test]
    fn test_pairs_keep_order() {
        let config = GeneratorConfig::new()
            .with_import("b=pb")
            .with_import("a=pa")
            .with_source("a=a_test.go");
        assert_eq!(config.imports, vec!["b=pb", "a=pa"]);
        assert_eq!(config.sources, vec!["a=a_test.go"]);
    }
}
