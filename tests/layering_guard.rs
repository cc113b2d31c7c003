//! Layering guardrails for the workspace manifests.
//!
//! The syntax crate is a leaf: it must not pull in the generator's CLI, logging backend or serialization stack.
//! The generator itself keeps test-only crates out of `[dependencies]`.

/// Collect the crate names listed in the `[dependencies]` table of a manifest.
fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn syntax_crate_stays_a_leaf() {
    let manifest = include_str!("../crates/testmain_syntax/Cargo.toml");
    for name in dependencies(manifest) {
        for forbidden in ["clap", "tracing-subscriber", "serde_json", "testmain"] {
            assert_ne!(
                name, forbidden,
                "`{}` must not appear in the syntax crate's [dependencies]",
                forbidden
            );
        }
    }
}

#[test]
fn generator_keeps_test_tooling_in_dev_dependencies() {
    let manifest = include_str!("../Cargo.toml");
    let deps = dependencies(manifest);
    assert!(deps.iter().any(|d| d == "testmain_syntax"), "generator must depend on the syntax crate");
    for dev_only in ["insta", "proptest", "tempfile"] {
        assert!(
            !deps.iter().any(|d| d == dev_only),
            "`{}` must not appear in [dependencies]; use [dev-dependencies] instead",
            dev_only
        );
    }
}
