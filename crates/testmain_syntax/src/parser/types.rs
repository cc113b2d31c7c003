/// Parameter lists and type expressions.
///
/// Go parameter lists are either all named (`a, b int, c string`) or all unnamed (`int, string`), and a lone
/// identifier is ambiguous until the whole list has been seen. Entries are therefore parsed first and grouped
/// afterwards.
impl<'a> Parser<'a> {
    // ========================================================================
    // Field lists
    // ========================================================================

    /// Parse a delimited list of parameters (or receivers, or results).
    fn field_list(&mut self, open: PunctuationId, close: PunctuationId) -> Result<FieldList, CompileError> {
        let start = self.expect_punct(open)?;

        let mut entries = Vec::new();
        while !self.check_punct(close) {
            entries.push(self.param_entry(close)?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        let end = self.expect_punct(close)?;

        let fields = group_entries(entries)?;
        Ok(FieldList {
            fields,
            span: start.merge(end),
        })
    }

    fn param_entry(&mut self, close: PunctuationId) -> Result<ParamEntry, CompileError> {
        if self.check_punct(PunctuationId::Ellipsis) {
            return Ok(ParamEntry::Type(self.param_type()?));
        }

        let TokenKind::Ident(_) = &self.peek().kind else {
            return Ok(ParamEntry::Type(self.parse_type()?));
        };

        let next = &self.peek_at(1).kind;
        let ends_entry = |kind: &TokenKind| kind.is_punctuation(PunctuationId::Comma) || kind.is_punctuation(close);

        if ends_entry(next) {
            return Ok(ParamEntry::Ident(self.identifier_spanned()?));
        }
        if next.is_punctuation(PunctuationId::Dot) {
            return Ok(ParamEntry::Type(self.parse_type()?));
        }
        if next.is_punctuation(PunctuationId::LBracket) {
            // `List[int]` is a type; `buf [4]byte` names a parameter.
            let after = self.matching_close(1).map(|offset| &self.peek_at(offset + 1).kind);
            if after.is_some_and(ends_entry) {
                return Ok(ParamEntry::Type(self.parse_type()?));
            }
        }

        let name = self.identifier_spanned()?;
        let ty = self.param_type()?;
        Ok(ParamEntry::Named(name, ty))
    }

    /// A parameter type, which may be variadic.
    fn param_type(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let start = self.current_span();
        if self.match_punct(PunctuationId::Ellipsis) {
            let elem = self.parse_type()?;
            let span = start.merge(elem.span);
            return Ok(Spanned::new(TypeExpr::Ellipsis(Box::new(elem)), span));
        }
        self.parse_type()
    }

    /// Offset (relative to the current token) of the bracket closing the opener at `open_offset`.
    fn matching_close(&self, open_offset: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut offset = open_offset;
        loop {
            match &self.peek_at(offset).kind {
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => {
                    depth += 1;
                }
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(offset);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
            offset += 1;
        }
    }

    /// Parse `[T any, K comparable]` or `[K, V any]`. Constraints are kept as spans.
    fn type_param_list(&mut self) -> Result<FieldList, CompileError> {
        let start = self.expect_punct(PunctuationId::LBracket)?;

        let mut fields = Vec::new();
        while !self.check_punct(PunctuationId::RBracket) {
            let mut names = vec![self.identifier_spanned()?.node];
            while self.match_punct(PunctuationId::Comma) {
                names.push(self.identifier_spanned()?.node);
            }
            let constraint = self.constraint_span()?;
            fields.push(Field {
                names,
                ty: Spanned::new(TypeExpr::Constraint(constraint), constraint),
            });
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        let end = self.expect_punct(PunctuationId::RBracket)?;

        if fields.is_empty() {
            return Err(CompileError::syntax("empty type parameter list".to_string(), start.merge(end)));
        }
        Ok(FieldList {
            fields,
            span: start.merge(end),
        })
    }

    /// Skip a constraint expression up to the next `,` or `]` at nesting depth zero.
    fn constraint_span(&mut self) -> Result<Span, CompileError> {
        let start = self.current_span();
        let mut depth = 0usize;
        loop {
            match &self.peek().kind {
                TokenKind::Punctuation(PunctuationId::Comma | PunctuationId::RBracket) if depth == 0 => break,
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => {
                    depth += 1;
                }
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Eof => return Err(self.unexpected("']'")),
                _ => {}
            }
            self.advance();
        }
        if self.prev_end() <= start.start {
            return Err(self.unexpected("type constraint"));
        }
        Ok(Span::new(start.start, self.prev_end()))
    }

    /// Parse an optional result clause: a parenthesized list or a single unnamed type.
    fn results(&mut self) -> Result<Option<FieldList>, CompileError> {
        if self.check_punct(PunctuationId::LParen) {
            return self.field_list(PunctuationId::LParen, PunctuationId::RParen).map(Some);
        }
        if !self.at_type_start() {
            return Ok(None);
        }
        let ty = self.parse_type()?;
        let span = ty.span;
        Ok(Some(FieldList {
            fields: vec![Field { names: Vec::new(), ty }],
            span,
        }))
    }

    fn at_type_start(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(id) => matches!(
                id,
                KeywordId::Map | KeywordId::Chan | KeywordId::Func | KeywordId::Struct | KeywordId::Interface
            ),
            TokenKind::Operator(id) => matches!(id, OperatorId::Star | OperatorId::Arrow),
            TokenKind::Punctuation(id) => matches!(id, PunctuationId::LBracket),
            _ => false,
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let start = self.current_span();

        let ty = match &self.peek().kind {
            TokenKind::Ident(_) => return self.type_name(),
            TokenKind::Operator(OperatorId::Star) => {
                self.advance();
                TypeExpr::Pointer(Box::new(self.parse_type()?))
            }
            TokenKind::Operator(OperatorId::Arrow) => {
                self.advance();
                self.expect_keyword(KeywordId::Chan)?;
                TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                }
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                let len = if self.peek_at(1).kind.is_punctuation(PunctuationId::RBracket) {
                    self.advance();
                    self.advance();
                    None
                } else {
                    Some(self.skip_balanced()?)
                };
                TypeExpr::Array {
                    len,
                    elem: Box::new(self.parse_type()?),
                }
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect_punct(PunctuationId::RParen)?;
                TypeExpr::Paren(Box::new(inner))
            }
            TokenKind::Keyword(KeywordId::Map) => {
                self.advance();
                self.expect_punct(PunctuationId::LBracket)?;
                let key = self.parse_type()?;
                self.expect_punct(PunctuationId::RBracket)?;
                TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(self.parse_type()?),
                }
            }
            TokenKind::Keyword(KeywordId::Chan) => {
                self.advance();
                let dir = if self.match_op(OperatorId::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                }
            }
            TokenKind::Keyword(KeywordId::Func) => {
                self.advance();
                let params = self.field_list(PunctuationId::LParen, PunctuationId::RParen)?;
                let results = self.results()?;
                TypeExpr::Func { params, results }
            }
            TokenKind::Keyword(KeywordId::Struct) => {
                self.advance();
                TypeExpr::Struct(self.braced_body()?)
            }
            TokenKind::Keyword(KeywordId::Interface) => {
                self.advance();
                TypeExpr::Interface(self.braced_body()?)
            }
            _ => return Err(self.unexpected("type")),
        };

        Ok(Spanned::new(ty, Span::new(start.start, self.prev_end())))
    }

    /// `T`, `pkg.T`, optionally instantiated with `[args]`.
    fn type_name(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let first = self.identifier_spanned()?;
        let mut base = if self.match_punct(PunctuationId::Dot) {
            let name = self.identifier_spanned()?;
            Spanned::new(
                TypeExpr::Selector {
                    qualifier: first.node,
                    name: name.node,
                },
                first.span.merge(name.span),
            )
        } else {
            Spanned::new(TypeExpr::Name(first.node), first.span)
        };

        if self.match_punct(PunctuationId::LBracket) {
            let mut args = Vec::new();
            while !self.check_punct(PunctuationId::RBracket) {
                args.push(self.parse_type()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            let end = self.expect_punct(PunctuationId::RBracket)?;
            let span = base.span.merge(end);
            base = Spanned::new(
                TypeExpr::Instance {
                    base: Box::new(base),
                    args,
                },
                span,
            );
        }
        Ok(base)
    }

    fn braced_body(&mut self) -> Result<Span, CompileError> {
        if !self.check_punct(PunctuationId::LBrace) {
            return Err(self.unexpected("'{'"));
        }
        self.skip_balanced()
    }
}

/// One comma-separated entry of a parameter list, before grouping.
enum ParamEntry {
    /// A lone identifier: a parameter name or a type name, decided by the rest of the list.
    Ident(Spanned<Ident>),
    /// `name T`
    Named(Spanned<Ident>, Spanned<TypeExpr>),
    /// A type that cannot be a name.
    Type(Spanned<TypeExpr>),
}

/// Group parsed entries into fields: names followed by a type share that type.
fn group_entries(entries: Vec<ParamEntry>) -> Result<Vec<Field>, CompileError> {
    let any_named = entries.iter().any(|e| matches!(e, ParamEntry::Named(..)));

    if !any_named {
        return Ok(entries
            .into_iter()
            .map(|entry| {
                let ty = match entry {
                    ParamEntry::Ident(name) => Spanned::new(TypeExpr::Name(name.node), name.span),
                    ParamEntry::Named(_, ty) | ParamEntry::Type(ty) => ty,
                };
                Field { names: Vec::new(), ty }
            })
            .collect());
    }

    let mut fields = Vec::new();
    let mut pending: Vec<Spanned<Ident>> = Vec::new();
    for entry in entries {
        match entry {
            ParamEntry::Ident(name) => pending.push(name),
            ParamEntry::Named(name, ty) => {
                pending.push(name);
                fields.push(Field {
                    names: pending.drain(..).map(|n| n.node).collect(),
                    ty,
                });
            }
            ParamEntry::Type(ty) => return Err(mixed_parameters(ty.span)),
        }
    }
    if let Some(name) = pending.first() {
        return Err(mixed_parameters(name.span));
    }
    Ok(fields)
}

fn mixed_parameters(span: Span) -> CompileError {
    CompileError::syntax("mixed named and unnamed parameters".to_string(), span)
        .with_hint("either name every parameter or none of them")
}
