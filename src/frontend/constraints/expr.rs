//! Build-constraint expressions
//!
//! Two syntaxes are understood:
//! - `//go:build` lines carry a boolean expression over tags with `||`, `&&`, `!` and parentheses.
//! - Legacy `// +build` lines list space-separated alternatives of comma-separated terms, each optionally negated.
//!   Several such lines must all be satisfied.

/// A parsed constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate with `is_set` deciding whether a single tag is satisfied.
    pub fn eval(&self, is_set: &impl Fn(&str) -> bool) -> bool {
        match self {
            Expr::Tag(tag) => is_set(tag),
            Expr::Not(inner) => !inner.eval(is_set),
            Expr::And(lhs, rhs) => lhs.eval(is_set) && rhs.eval(is_set),
            Expr::Or(lhs, rhs) => lhs.eval(is_set) || rhs.eval(is_set),
        }
    }
}

/// Return `true` if the line is a `//go:build` constraint.
pub fn is_go_build(line: &str) -> bool {
    line.strip_prefix("//go:build")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
}

/// Return `true` if the line is a legacy `// +build` constraint.
pub fn is_plus_build(line: &str) -> bool {
    line.strip_prefix("//")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix("+build"))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
}

/// Parse the expression of a `//go:build` line.
pub fn parse_go_build(line: &str) -> Result<Expr, String> {
    let text = line
        .strip_prefix("//go:build")
        .ok_or_else(|| "not a //go:build line".to_string())?;
    let mut parser = ExprParser::new(text);
    let expr = parser.or_expr()?;
    parser.skip_space();
    if let Some(c) = parser.peek() {
        return Err(format!("unexpected {:?} in //go:build expression", c));
    }
    Ok(expr)
}

/// Parse a `// +build` line into an expression.
///
/// `// +build linux,386 darwin,!cgo` means `(linux && 386) || (darwin && !cgo)`.
pub fn parse_plus_build(line: &str) -> Result<Expr, String> {
    let text = line
        .strip_prefix("//")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix("+build"))
        .ok_or_else(|| "not a // +build line".to_string())?;

    let mut alternatives = Vec::new();
    for field in text.split_whitespace() {
        let mut terms = Vec::new();
        for term in field.split(',') {
            let (negated, tag) = match term.strip_prefix('!') {
                Some(tag) => (true, tag),
                None => (false, term),
            };
            if tag.is_empty() || tag.starts_with('!') || !tag.chars().all(is_tag_char) {
                return Err(format!("invalid term {:?} in // +build line", term));
            }
            let expr = Expr::Tag(tag.to_string());
            terms.push(if negated { Expr::Not(Box::new(expr)) } else { expr });
        }
        alternatives.push(fold(terms, Expr::And));
    }
    if alternatives.is_empty() {
        return Err("empty // +build line".to_string());
    }
    Ok(fold(alternatives, Expr::Or))
}

fn fold(exprs: Vec<Expr>, join: fn(Box<Expr>, Box<Expr>) -> Expr) -> Expr {
    let mut iter = exprs.into_iter();
    let first = iter.next().unwrap_or_else(|| Expr::Tag(String::new()));
    iter.fold(first, |acc, next| join(Box::new(acc), Box::new(next)))
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Recursive-descent parser; precedence from loosest: `||`, `&&`, `!`.
struct ExprParser<'s> {
    text: &'s str,
    pos: usize,
}

impl<'s> ExprParser<'s> {
    fn new(text: &'s str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(|c| c == ' ' || c == '\t') {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_space();
        if self.text[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> Result<Expr, String> {
        let mut lhs = self.and_expr()?;
        while self.eat("||") {
            let rhs = self.and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, String> {
        let mut lhs = self.not_expr()?;
        while self.eat("&&") {
            let rhs = self.not_expr()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, String> {
        if self.eat("!") {
            return Ok(Expr::Not(Box::new(self.not_expr()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, String> {
        if self.eat("(") {
            let inner = self.or_expr()?;
            if !self.eat(")") {
                return Err("missing ) in //go:build expression".to_string());
            }
            return Ok(inner);
        }
        self.skip_space();
        let start = self.pos;
        while self.peek().is_some_and(is_tag_char) {
            self.pos += self.peek().map_or(1, char::len_utf8);
        }
        if start == self.pos {
            return match self.peek() {
                Some(c) => Err(format!("unexpected {:?} in //go:build expression", c)),
                None => Err("unexpected end of //go:build expression".to_string()),
            };
        }
        Ok(Expr::Tag(self.text[start..self.pos].to_string()))
    }
}
