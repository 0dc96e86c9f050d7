//! Tagged JSON form of expression trees.
//!
//! Every node is a JSON object whose `$type` field names its kind:
//!
//! | `$type`         | fields                                 |
//! |-----------------|----------------------------------------|
//! | `function`      | `function`, `arguments`                |
//! | `access`        | `node`, `index`, `nulled`              |
//! | `value_string`  | `value` (string)                       |
//! | `value_int`     | `value` (integer within 32 bits)       |
//! | `value_decimal` | `value` (number, exact digits)         |
//! | `value_bool`    | `value` (bool)                         |

mod codec;

use crate::ast::Node;

pub use codec::{decode, encode};

use serde::Deserialize;

/// Malformed serialized tree. `path` locates the offending node (`$.arguments[1].node`).
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    /// Input is not valid JSON, or output could not be written.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// A node position holds something other than an object.
    #[error("{path}: expected a node object")]
    NotAnObject {
        /// JSON path of the node.
        path: String,
    },

    /// `$type` names no known node kind.
    #[error("{path}: unknown node type '{tag}'")]
    UnknownDiscriminator {
        /// JSON path of the node.
        path: String,
        /// Discriminator found.
        tag: String,
    },

    /// A required field is absent.
    #[error("{path}: missing field '{field}'")]
    MissingField {
        /// JSON path of the node.
        path: String,
        /// Field name.
        field: String,
    },

    /// Calls and accesses nest deeper than the configured limit.
    #[error("{path}: tree nests deeper than {limit} levels")]
    TooDeep {
        /// JSON path of the first node past the limit.
        path: String,
        /// Limit in effect.
        limit: usize,
    },

    /// A field has the wrong JSON type or an unrepresentable value.
    #[error("{path}: field '{field}' must be {expected}")]
    InvalidField {
        /// JSON path of the node.
        path: String,
        /// Field name.
        field: String,
        /// Accepted shape.
        expected: &'static str,
    },
}

/// Serializer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SerializerOpts {
    /// Indent the output.
    pub pretty: bool,
    /// Deepest nesting of calls and accesses accepted when decoding. Matches the parser's
    /// default, so every tree it accepts round-trips.
    pub max_depth: usize,
}

impl Default for SerializerOpts {
    fn default() -> Self {
        Self {
            pretty: true,
            max_depth: 128,
        }
    }
}

/// Converts trees to and from JSON text.
#[derive(Clone, Copy, Debug, Default)]
pub struct AstSerializer {
    opts: SerializerOpts,
}

impl AstSerializer {
    /// Serializer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer with explicit options.
    pub fn with_opts(opts: SerializerOpts) -> Self {
        Self { opts }
    }

    /// Options in effect.
    pub fn opts(&self) -> SerializerOpts {
        self.opts
    }

    /// Encode `node` as JSON text.
    pub fn serialize(&self, node: &Node) -> Result<String, FormatError> {
        let json = encode(node);
        let text = if self.opts.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        Ok(text)
    }

    /// Decode JSON text. Fails without a partial tree.
    pub fn deserialize(&self, text: &str) -> Result<Node, FormatError> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let json = serde_json::Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;

        // A tree of height n encodes to at most 2n + 1 nested containers. One level of slack
        // lets the decoder name the first node past the limit.
        let limit = self.opts.max_depth;
        if codec::nesting(&json) > limit.saturating_add(1).saturating_mul(2).saturating_add(1) {
            codec::dispose(json);
            return Err(FormatError::TooDeep {
                path: "$".to_owned(),
                limit,
            });
        }
        de.end()?;
        codec::decode_bounded(&json, limit)
    }
}
