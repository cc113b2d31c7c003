/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type, its top-level `parse()` entrypoint, and comment grouping.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Parser state.
///
/// ## Notes
/// - Comment tokens are removed from the stream up front and grouped; the parser itself only sees code.
/// - The parser recovers from errors by synchronizing at the next top-level declaration keyword.
pub struct Parser<'a> {
    tokens: Vec<&'a Token>,
    comments: Vec<CommentGroup>,
    pos: usize,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `testmain_syntax::lexer`, ending in `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        let comments = group_comments(tokens);
        let code: Vec<&'a Token> = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Comment(_)))
            .collect();
        Self {
            tokens: code,
            comments,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`SourceFile`].
    ///
    /// ## Errors
    /// Returns a list of [`CompileError`]s if parsing fails. A missing package clause stops parsing immediately;
    /// any other error is recorded and parsing resumes at the next declaration.
    pub fn parse(mut self) -> Result<SourceFile, Vec<CompileError>> {
        if self.tokens.is_empty() {
            return Err(vec![CompileError::syntax(
                "empty token stream".to_string(),
                Span::default(),
            )]);
        }

        let package = match self.package_clause() {
            Ok(package) => package,
            Err(e) => {
                self.errors.push(e);
                return Err(self.errors);
            }
        };

        let mut imports = Vec::new();
        let mut declarations = Vec::new();

        self.skip_terminators();
        while !self.is_at_end() {
            if self.check_keyword(KeywordId::Import) {
                if !declarations.is_empty() {
                    self.errors.push(CompileError::syntax(
                        "imports must appear before other declarations".to_string(),
                        self.current_span(),
                    ));
                }
                match self.import_decl() {
                    Ok(specs) => imports.extend(specs),
                    Err(e) => {
                        self.errors.push(e);
                        self.synchronize();
                    }
                }
            } else {
                match self.declaration() {
                    Ok(decl) => declarations.push(decl),
                    Err(e) => {
                        self.errors.push(e);
                        self.synchronize();
                    }
                }
            }
            self.skip_terminators();
        }

        if self.errors.is_empty() {
            Ok(SourceFile {
                package,
                imports,
                declarations,
                comments: self.comments,
            })
        } else {
            Err(self.errors)
        }
    }
}

/// Group comment tokens the way Go tooling does.
///
/// A group is a run of comments with no code token between them, each starting at most one line after the previous
/// one ended. A group that starts on the same line as preceding code (a trailing comment) only extends along that
/// line, so the comment block on the following lines starts a group of its own.
fn group_comments(tokens: &[Token]) -> Vec<CommentGroup> {
    let mut groups = Vec::new();
    let mut current: Vec<Comment> = Vec::new();
    let mut line_limit = 1;
    let mut last_end_line = 0;
    let mut code_between = false;
    let mut prev_code_end_line: Option<usize> = None;

    for token in tokens {
        match &token.kind {
            TokenKind::Comment(text) => {
                let starts_group = current.is_empty() || code_between || token.line > last_end_line + line_limit;
                if starts_group {
                    if !current.is_empty() {
                        groups.push(CommentGroup {
                            comments: std::mem::take(&mut current),
                        });
                    }
                    line_limit = if prev_code_end_line == Some(token.line) { 0 } else { 1 };
                }
                current.push(Comment {
                    text: text.clone(),
                    span: token.span,
                });
                last_end_line = token.end_line;
                code_between = false;
            }
            TokenKind::Newline | TokenKind::Eof => {}
            _ => {
                code_between = true;
                prev_code_end_line = Some(token.end_line);
            }
        }
    }

    if !current.is_empty() {
        groups.push(CommentGroup { comments: current });
    }
    groups
}
