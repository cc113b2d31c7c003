//! Documentation example extraction
//!
//! An example is a top-level function named `Example` or `Example` followed by a non-lowercase character, taking no
//! parameters and returning nothing. Its expected output is read from the last comment group inside its body:
//!
//! ```go
//! func ExampleHello() {
//!     fmt.Println("hello")
//!     // Output: hello
//! }
//! ```
//!
//! Examples without an output assertion compile but never run, so they are not reported here.

use crate::frontend::ast::{FuncDecl, SourceFile};

const EXAMPLE_PREFIX: &str = "Example";

/// An example function together with its expected-output assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocExample {
    /// Full function name, prefix included.
    pub name: String,
    pub output: String,
    pub unordered: bool,
}

/// Return `true` for `Example` and `Example` followed by a character that is not lowercase.
pub fn is_example_name(name: &str) -> bool {
    match name.strip_prefix(EXAMPLE_PREFIX) {
        Some(rest) => rest.chars().next().is_none_or(|c| !c.is_lowercase()),
        None => false,
    }
}

/// Collect the examples of a file that carry an output assertion, in declaration order.
pub fn extract_examples(file: &SourceFile) -> Vec<DocExample> {
    file.functions()
        .filter(|func| is_example_shape(func))
        .filter_map(|func| {
            let body = func.body?;
            let last = file
                .comments
                .iter()
                .filter(|group| body.contains(group.span()))
                .last()?;
            let (output, unordered) = expected_output(&last.text())?;
            Some(DocExample {
                name: func.name.node.clone(),
                output,
                unordered,
            })
        })
        .collect()
}

fn is_example_shape(func: &FuncDecl) -> bool {
    !func.is_method()
        && is_example_name(&func.name.node)
        && func.params.is_empty()
        && func.results.as_ref().is_none_or(|r| r.is_empty())
        && func.body.is_some()
}

/// Parse an `Output:` or `Unordered output:` assertion out of comment text.
///
/// The prefix is matched case-insensitively after optional leading whitespace. The remaining text loses its leading
/// spaces and at most one newline. Returns `None` when the text carries no assertion; an assertion with nothing after
/// it yields an empty output.
pub fn expected_output(text: &str) -> Option<(String, bool)> {
    let trimmed = text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\u{0B}');
    let (rest, unordered) = if let Some(rest) = strip_prefix_ignore_case(trimmed, "unordered output:") {
        (rest, true)
    } else {
        (strip_prefix_ignore_case(trimmed, "output:")?, false)
    };
    let rest = rest.trim_start_matches(' ');
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    Some((rest.to_string(), unordered))
}

fn strip_prefix_ignore_case<'s>(text: &'s str, prefix: &str) -> Option<&'s str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}
