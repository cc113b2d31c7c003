#![no_main]

use libfuzzer_sys::fuzz_target;
use testmain::backend::cases::{Import, parse_import};
use testmain::frontend::{analyzer, parser};
use testmain::{CaseModelBuilder, render};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(file) = parser::parse_source(source) else {
        return;
    };

    let mut builder = CaseModelBuilder::new(".", true);
    if let Ok(import) = parse_import("x=example.com/fuzz") {
        builder.add_import(import);
    }
    builder.add_import(Import {
        alias: "x_test".to_string(),
        path: "example.com/fuzz_test".to_string(),
    });
    builder.record(analyzer::analyze_file(&file, "x"));

    // Every used alias has a mapping, so finalizing cannot fail
    let cases = builder.finalize().unwrap();
    let harness = render(&cases);
    assert!(parser::parse_source(&harness).is_ok());
});
