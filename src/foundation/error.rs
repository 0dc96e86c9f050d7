use crate::runtime::EvalError;
use crate::serialize::FormatError;
use crate::syntax::ParseError;

/// Crate-wide result alias.
pub type CompoResult<T> = Result<T, CompoError>;

/// Any failure surfaced by the crate's top-level entry points.
#[derive(thiserror::Error, Debug)]
pub enum CompoError {
    /// Expression text did not parse.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Evaluation failed.
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// Serialized tree was malformed.
    #[error("serialization error: {0}")]
    Format(#[from] FormatError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Opaque failure from host code or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompoError {
    /// Build a [`CompoError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap a message as [`CompoError::Other`].
    pub fn other(msg: impl std::fmt::Display) -> Self {
        Self::Other(anyhow::anyhow!("{msg}"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
