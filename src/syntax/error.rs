use std::fmt;

/// Structured parse failure.
///
/// `offset` is the byte offset of the furthest position the parser reached; `expected` lists the
/// tokens that would have allowed it to make progress there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the source text.
    pub offset: usize,
    /// Sorted, de-duplicated token descriptions.
    pub expected: Vec<String>,
    /// Character found at `offset`, `None` at end of input.
    pub found: Option<char>,
    /// Extra detail for failures that are not a missing token (nesting limit, number range).
    pub note: Option<String>,
}

impl ParseError {
    pub(crate) fn new(offset: usize, expected: Vec<String>, found: Option<char>) -> Self {
        Self {
            offset,
            expected,
            found,
            note: None,
        }
    }

    pub(crate) fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// 1-based `(line, column)` of the error within `src`, counted in characters.
    pub fn line_col(&self, src: &str) -> (usize, usize) {
        let upto = src.get(..self.offset).unwrap_or(src);
        let line = upto.matches('\n').count() + 1;
        let col = match upto.rfind('\n') {
            Some(nl) => upto[nl + 1..].chars().count() + 1,
            None => upto.chars().count() + 1,
        };
        (line, col)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid expression at byte {}", self.offset)?;
        if let Some(note) = &self.note {
            write!(f, ": {note}")?;
        }
        match self.expected.len() {
            0 => {}
            1 => write!(f, ": expected {}", self.expected[0])?,
            _ => write!(f, ": expected one of {}", self.expected.join(", "))?,
        }
        match self.found {
            Some(c) => write!(f, ", found '{c}'"),
            None => f.write_str(", found end of input"),
        }
    }
}

impl std::error::Error for ParseError {}
