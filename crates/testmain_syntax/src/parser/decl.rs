/// Declaration parsing methods.
///
/// This chunk is responsible for parsing the package clause, import declarations, and top-level declarations.
/// Functions are parsed down to their full signature; `var`/`const`/`type` declarations are skipped over as a unit.
///
/// ## Notes
/// - Most entrypoints in this file return [`Spanned<T>`] to preserve source locations.
/// - Error recovery is handled by `Parser::synchronize()` (in `helpers.rs`).
impl<'a> Parser<'a> {
    // ========================================================================
    // Package clause and imports
    // ========================================================================

    fn package_clause(&mut self) -> Result<Spanned<Ident>, CompileError> {
        if !self.check_keyword(KeywordId::Package) {
            return Err(self
                .unexpected("keyword package")
                .with_hint("every Go source file starts with a `package` clause"));
        }
        self.advance();
        let name = self.identifier_spanned()?;
        self.expect_terminator()?;
        Ok(name)
    }

    /// Parse `import "path"`, `import name "path"` or a parenthesized group of specs.
    fn import_decl(&mut self) -> Result<Vec<Spanned<ImportSpec>>, CompileError> {
        self.expect_keyword(KeywordId::Import)?;

        if !self.match_punct(PunctuationId::LParen) {
            let spec = self.import_spec()?;
            self.expect_terminator()?;
            return Ok(vec![spec]);
        }

        let mut specs = Vec::new();
        loop {
            self.skip_terminators();
            if self.match_punct(PunctuationId::RParen) {
                break;
            }
            specs.push(self.import_spec()?);
            if !self.check_punct(PunctuationId::RParen) {
                self.expect_terminator()?;
            }
        }
        self.expect_terminator()?;
        Ok(specs)
    }

    fn import_spec(&mut self) -> Result<Spanned<ImportSpec>, CompileError> {
        let start = self.current_span();
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            TokenKind::Punctuation(PunctuationId::Dot) => {
                self.advance();
                Some(".".to_string())
            }
            _ => None,
        };

        let TokenKind::String(bytes) = &self.peek().kind else {
            return Err(self.unexpected("import path"));
        };
        let path_span = self.current_span();
        let path = String::from_utf8(bytes.clone())
            .map_err(|_| CompileError::syntax("invalid import path: not valid UTF-8".to_string(), path_span))?;
        if path.is_empty() {
            return Err(CompileError::syntax("empty import path".to_string(), path_span));
        }
        self.advance();

        Ok(Spanned::new(ImportSpec { name, path }, start.merge(path_span)))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let start = self.current_span().start;

        let decl = match self.peek().kind {
            TokenKind::Keyword(KeywordId::Func) => Declaration::Func(self.func_decl()?),
            TokenKind::Keyword(KeywordId::Var) => Declaration::Gen(self.gen_decl(GenKind::Var)?),
            TokenKind::Keyword(KeywordId::Const) => Declaration::Gen(self.gen_decl(GenKind::Const)?),
            TokenKind::Keyword(KeywordId::Type) => Declaration::Gen(self.gen_decl(GenKind::Type)?),
            _ => {
                return Err(CompileError::syntax(
                    format!(
                        "non-declaration statement outside function body, found {}",
                        self.peek().kind.describe()
                    ),
                    self.current_span(),
                ));
            }
        };

        let span = Span::new(start, self.prev_end());
        self.expect_terminator()?;
        Ok(Spanned::new(decl, span))
    }

    fn func_decl(&mut self) -> Result<FuncDecl, CompileError> {
        self.expect_keyword(KeywordId::Func)?;

        let recv = if self.check_punct(PunctuationId::LParen) {
            Some(self.field_list(PunctuationId::LParen, PunctuationId::RParen)?)
        } else {
            None
        };

        let name = self.identifier_spanned()?;

        let type_params = if self.check_punct(PunctuationId::LBracket) {
            Some(self.type_param_list()?)
        } else {
            None
        };

        let params = self.field_list(PunctuationId::LParen, PunctuationId::RParen)?;
        let results = self.results()?;

        let body = if self.check_punct(PunctuationId::LBrace) {
            Some(self.skip_balanced()?)
        } else {
            None
        };

        Ok(FuncDecl {
            recv,
            name,
            type_params,
            params,
            results,
            body,
        })
    }

    /// Skip a `var`, `const` or `type` declaration up to its terminating `;`.
    fn gen_decl(&mut self, kind: GenKind) -> Result<GenKind, CompileError> {
        let start = self.current_span();
        self.advance();

        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::Eof if depth > 0 => {
                    return Err(CompileError::syntax(
                        format!("unexpected EOF in {} declaration", kind),
                        start,
                    ));
                }
                TokenKind::Eof => break,
                other if depth == 0 && other.is_terminator() => break,
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => {
                    depth += 1;
                }
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    if depth == 0 {
                        return Err(self.unexpected("';' or newline"));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
        Ok(kind)
    }
}
