use crate::ast::Node;
use crate::syntax::error::ParseError;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Result of parsing: the root node, or a diagnostic. Never a partial tree.
pub type ParseOutcome = Result<Node, ParseError>;

/// Parser configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum nesting of calls and accesses along any path of the tree. Each call and each
    /// `[..]` / `.member` link counts as one level. Deeper input fails to parse instead of
    /// exhausting the stack later.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// Expression parser.
///
/// Holds only its options; every call to [`Parser::parse`] works on a fresh cursor, so one
/// parser can be shared freely between threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct Parser {
    opts: ParseOptions,
}

impl Parser {
    /// Parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with explicit options.
    pub fn with_opts(opts: ParseOptions) -> Self {
        Self { opts }
    }

    /// Options this parser was built with.
    pub fn opts(&self) -> ParseOptions {
        self.opts
    }

    /// Parse a complete `@name(...)` expression.
    pub fn parse(&self, src: &str) -> ParseOutcome {
        let mut c = Cursor::new(src, self.opts.max_depth);
        match c.expression() {
            Ok(node) => Ok(node),
            Err(Fail::Fatal(e)) => Err(e),
            Err(Fail::Backtrack) => Err(c.into_error()),
        }
    }
}

/// Parse `src` with default options.
pub fn parse(src: &str) -> ParseOutcome {
    Parser::new().parse(src)
}

impl FromStr for Node {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

enum Fail {
    /// The current alternative did not match; expectations were recorded on the cursor.
    Backtrack,
    /// Unrecoverable; no alternative may retry.
    Fatal(ParseError),
}

type PResult<T> = Result<T, Fail>;

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
    furthest: usize,
    expected: BTreeSet<&'static str>,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, max_depth: usize) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            max_depth,
            furthest: 0,
            expected: BTreeSet::new(),
        }
    }

    fn into_error(self) -> ParseError {
        let found = self.src[self.furthest..].chars().next();
        let expected = self.expected.iter().map(|s| (*s).to_owned()).collect();
        ParseError::new(self.furthest, expected, found)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut it = self.src[self.pos..].chars();
        it.next();
        it.next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Record that `label` would have allowed progress at the current position.
    fn expected(&mut self, label: &'static str) -> Fail {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest {
            self.expected.insert(label);
        }
        Fail::Backtrack
    }

    fn fatal(&self, note: String) -> Fail {
        let found = self.peek();
        Fail::Fatal(ParseError::new(self.pos, Vec::new(), found).with_note(note))
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Consume `c` and any whitespace after it.
    fn tok(&mut self, c: char, label: &'static str) -> PResult<()> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            self.skip_ws();
            Ok(())
        } else {
            Err(self.expected(label))
        }
    }

    fn try_tok(&mut self, c: char, label: &'static str) -> bool {
        self.tok(c, label).is_ok()
    }

    /// Run `f`, rewinding to the starting position if it backtracks.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<Option<T>> {
        let save = self.pos;
        match f(self) {
            Ok(v) => Ok(Some(v)),
            Err(Fail::Backtrack) => {
                self.pos = save;
                Ok(None)
            }
            Err(fatal) => Err(fatal),
        }
    }

    fn expression(&mut self) -> PResult<Node> {
        self.tok('@', "'@'")?;
        let (node, _) = self.function()?;
        if !self.at_end() {
            return Err(self.expected("end of input"));
        }
        Ok(node)
    }

    fn too_deep(&self) -> Fail {
        self.fatal(format!(
            "expression nesting exceeds {} levels",
            self.max_depth
        ))
    }

    /// A call plus its access chain, with the height of the resulting subtree.
    fn function(&mut self) -> PResult<(Node, usize)> {
        if self.depth >= self.max_depth {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let out = self.function_inner();
        self.depth -= 1;
        out
    }

    fn function_inner(&mut self) -> PResult<(Node, usize)> {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            // ',' and ')' end an argument, so they can never be part of a nested call's name.
            if matches!(c, '(' | '[' | ']' | ',' | ')') {
                break;
            }
            self.pos += c.len_utf8();
        }
        let name = src[start..self.pos].trim_end();
        if name.is_empty() {
            self.pos = start;
            return Err(self.expected("function name"));
        }
        if self.peek() != Some('(') {
            // A name runs up to the first '('; without one this was never a call. Report it
            // where the name started rather than wherever the scan stopped.
            self.pos = start;
            return Err(self.expected("function call"));
        }
        self.tok('(', "'('")?;

        let mut args = Vec::new();
        let mut height = 1;
        loop {
            if let Some((arg, h)) = self.argument()? {
                height = height.max(h + 1);
                args.push(arg);
            }
            if self.try_tok(',', "','") {
                continue;
            }
            self.tok(')', "')'")?;
            break;
        }

        if height > self.max_depth {
            self.pos = start;
            return Err(self.too_deep());
        }
        let call = Node::function(name, args);
        self.access_chain(call, height)
    }

    /// `term | function | <empty>`; `None` for an empty entry.
    fn argument(&mut self) -> PResult<Option<(Node, usize)>> {
        self.skip_ws();
        if let Some(n) = self.attempt(Self::term)? {
            return Ok(Some((n, 0)));
        }
        self.attempt(Self::function)
    }

    /// `term | function`, used between brackets.
    fn index(&mut self) -> PResult<(Node, usize)> {
        if let Some(n) = self.attempt(Self::term)? {
            return Ok((n, 0));
        }
        self.function()
    }

    /// Fold `[..]` and `.member` links onto `node`. Every link wraps the tree one level deeper,
    /// so links share the nesting budget with calls.
    fn access_chain(&mut self, mut node: Node, mut height: usize) -> PResult<(Node, usize)> {
        loop {
            let nulled = match self.peek() {
                Some('?') => {
                    self.tok('?', "'?'")?;
                    true
                }
                Some('[' | '.') => false,
                _ => {
                    // Only recorded for diagnostics; an empty chain is valid.
                    let _ = self.expected("'['");
                    let _ = self.expected("'.'");
                    let _ = self.expected("'?'");
                    return Ok((node, height));
                }
            };

            let link_start = self.pos;
            if self.try_tok('[', "'['") {
                let (index, h) = self.index()?;
                self.tok(']', "']'")?;
                height = height.max(h) + 1;
                node = Node::access_with(node, index, nulled);
            } else if self.try_tok('.', "'.'") {
                let member = self.identifier()?;
                height += 1;
                node = Node::access_with(node, Node::string(member), nulled);
            } else {
                return Err(Fail::Backtrack);
            }
            if height > self.max_depth {
                self.pos = link_start;
                return Err(self.too_deep());
            }
        }
    }

    fn identifier(&mut self) -> PResult<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '.' | ',' | '?' | '\'') {
                break;
            }
            self.pos += c.len_utf8();
        }
        if self.pos == start {
            return Err(self.expected("identifier"));
        }
        let ident = self.src[start..self.pos].to_owned();
        self.skip_ws();
        Ok(ident)
    }

    fn term(&mut self) -> PResult<Node> {
        if let Some(n) = self.attempt(Self::number)? {
            return Ok(n);
        }
        if let Some(n) = self.attempt(Self::boolean)? {
            return Ok(n);
        }
        self.string()
    }

    fn eat_digits(&mut self) -> usize {
        let mut n = 0;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.pos += 1;
            n += 1;
        }
        n
    }

    fn number(&mut self) -> PResult<Node> {
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.pos += 1;
        }

        let int_digits = self.eat_digits();
        let mut integral = true;
        let has_fraction =
            self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit());
        if has_fraction {
            self.pos += 1;
            self.eat_digits();
            integral = false;
        } else if int_digits == 0 {
            self.pos = start;
            return Err(self.expected("number"));
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let save = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                self.pos = save;
            } else {
                integral = false;
            }
        }

        let src = self.src;
        let lexeme = &src[start..self.pos];
        let node = if integral {
            match lexeme.parse::<i32>() {
                Ok(v) => Node::int(v),
                // Integer literals outside i32 fall back to the decimal kind.
                Err(_) => self.decimal_literal(start, lexeme)?,
            }
        } else {
            self.decimal_literal(start, lexeme)?
        };
        self.skip_ws();
        Ok(node)
    }

    fn decimal_literal(&mut self, start: usize, lexeme: &str) -> PResult<Node> {
        match parse_decimal_lexeme(lexeme) {
            Some(d) => Ok(Node::decimal(d)),
            None => {
                self.pos = start;
                Err(self.fatal(format!(
                    "number literal '{lexeme}' is out of range for a decimal"
                )))
            }
        }
    }

    fn boolean(&mut self) -> PResult<Node> {
        let src = self.src;
        let rest = &src[self.pos..];
        let (v, len) = if rest.starts_with("true") {
            (true, 4)
        } else if rest.starts_with("false") {
            (false, 5)
        } else {
            return Err(self.expected("boolean"));
        };
        // `trueish(...)` is a function call, not a boolean followed by garbage.
        if rest[len..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '(')
        {
            return Err(self.expected("boolean"));
        }
        self.pos += len;
        self.skip_ws();
        Ok(Node::bool(v))
    }

    fn string(&mut self) -> PResult<Node> {
        if self.peek() != Some('\'') {
            return Err(self.expected("string"));
        }
        self.pos += 1;
        let start = self.pos;
        let Some(len) = self.src[start..].find('\'') else {
            self.pos = self.src.len();
            return Err(self.expected("closing quote"));
        };
        let text = self.src[start..start + len].to_owned();
        self.pos = start + len + 1;
        self.skip_ws();
        Ok(Node::string(text))
    }
}

/// Parse a number lexeme accepted by the grammar into a decimal without going through binary
/// floating point. `None` when the value does not fit.
pub(crate) fn parse_decimal_lexeme(lexeme: &str) -> Option<Decimal> {
    let (neg, digits) = match lexeme.as_bytes().first() {
        Some(b'-') => (true, &lexeme[1..]),
        Some(b'+') => (false, &lexeme[1..]),
        _ => (false, lexeme),
    };
    let mut norm = String::with_capacity(digits.len() + 2);
    if neg {
        norm.push('-');
    }
    if digits.starts_with('.') {
        norm.push('0');
    }
    norm.push_str(digits);

    if norm.contains(['e', 'E']) {
        Decimal::from_scientific(&norm).ok()
    } else {
        Decimal::from_str_exact(&norm).ok()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/syntax/parser.rs"]
mod tests;
