/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Statement terminators (`skip_terminators`, `expect_terminator`)
/// - Balanced skipping of bodies (`skip_balanced`)
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &'a Token {
        let last = self.tokens.len() - 1;
        self.tokens[self.pos.min(last)]
    }

    /// Return the token `n` positions ahead without consuming anything.
    fn peek_at(&self, n: usize) -> &'a Token {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::syntax(
            format!("expected {}, found {}", expected, self.peek().kind.describe()),
            self.current_span(),
        )
    }

    fn expect_keyword(&mut self, id: KeywordId) -> Result<Span, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(id.as_str()))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId) -> Result<Span, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&format!("'{}'", id.as_str())))
        }
    }

    fn identifier_spanned(&mut self) -> Result<Spanned<Ident>, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(name.clone(), span))
            }
            _ => Err(self.unexpected("name")),
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    fn skip_terminators(&mut self) {
        while self.peek().kind.is_terminator() {
            self.advance();
        }
    }

    /// Consume the `;` (explicit or inserted) that ends a declaration. EOF also ends one.
    fn expect_terminator(&mut self) -> Result<(), CompileError> {
        if self.peek().kind.is_terminator() {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("';' or newline"))
        }
    }

    /// Consume a bracketed region starting at the current opener, returning its span.
    ///
    /// Nested `()`, `[]` and `{}` are tracked together; tokens inside are not interpreted.
    fn skip_balanced(&mut self) -> Result<Span, CompileError> {
        let start = self.current_span();
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => {
                    depth += 1;
                }
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return Ok(start.merge(token.span));
                    }
                }
                TokenKind::Eof => {
                    return Err(CompileError::syntax(
                        "unexpected EOF, unbalanced brackets".to_string(),
                        start,
                    )
                    .with_note("the region opened here is never closed"));
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Return `true` if the current token begins a top-level declaration on a fresh statement.
    fn at_declaration_start(&self) -> bool {
        let is_decl_keyword = matches!(
            self.peek().kind,
            TokenKind::Keyword(
                KeywordId::Func | KeywordId::Var | KeywordId::Const | KeywordId::Type | KeywordId::Import
            )
        );
        let after_terminator = self.pos == 0 || self.tokens[self.pos - 1].kind.is_terminator();
        is_decl_keyword && after_terminator
    }

    /// Skip tokens until the next top-level declaration, always making progress.
    fn synchronize(&mut self) {
        let start = self.pos;
        while !self.is_at_end() {
            if self.pos > start && self.at_declaration_start() {
                return;
            }
            self.advance();
        }
    }
}
