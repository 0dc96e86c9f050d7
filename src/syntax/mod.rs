//! Expression grammar.
//!
//! ```text
//! expression  := '@' function END
//! function    := name '(' argList ')' accessChain
//! argList     := (term | function | <empty>) separated by ','
//! term        := number | boolean | 'quoted string'
//! accessChain := ( '?'? '[' (term | function) ']' | '?'? '.' identifier )*
//! ```
//!
//! Whitespace is skipped after every token and kept verbatim inside quotes.

mod error;
mod parser;

pub use error::ParseError;
pub use parser::{ParseOptions, ParseOutcome, Parser, parse};

pub(crate) use parser::parse_decimal_lexeme;
