/// Parse a token stream into a [`SourceFile`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `testmain_syntax::lexer`, comments included.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<SourceFile, Vec<CompileError>> {
    Parser::new(tokens).parse()
}

/// Lex and parse a source string in one step.
pub fn parse_source(source: &str) -> Result<SourceFile, Vec<CompileError>> {
    let tokens = crate::lexer::lex(source)?;
    parse(&tokens)
}
