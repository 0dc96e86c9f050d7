//! Expression syntax tree.
//!
//! A parsed expression is a tree of [`Node`]s. Nodes are immutable: they expose read-only
//! accessors and are only produced by the parser, the serializer, or the constructors below.
//! Equality and hashing are structural, so trees can be compared and used as cache keys.

use rust_decimal::Decimal;
use std::fmt;

mod fingerprint;

pub use fingerprint::AstFingerprint;

/// One node of an expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    /// A literal value.
    Value(Literal),
    /// A call to a registered function.
    Function(FunctionNode),
    /// An indexed or member access on another node.
    Access(AccessNode),
}

/// Literal kinds recognized by the grammar.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    /// 32-bit signed integer.
    Int(i32),
    /// Arbitrary-precision decimal. Equality is numeric (`2.1 == 2.10`).
    Decimal(Decimal),
    /// Boolean.
    Bool(bool),
    /// Text, stored exactly as written between the quotes.
    String(String),
}

/// `name(arg, ...)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionNode {
    name: String,
    arguments: Vec<Node>,
}

/// `target[index]`, `target?[index]`, `target.member`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccessNode {
    target: Box<Node>,
    index: Box<Node>,
    nulled: bool,
}

impl FunctionNode {
    /// Function name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments in call order.
    pub fn arguments(&self) -> &[Node] {
        &self.arguments
    }
}

impl AccessNode {
    /// Node being accessed.
    pub fn target(&self) -> &Node {
        &self.target
    }

    /// Key or position used for the access.
    pub fn index(&self) -> &Node {
        &self.index
    }

    /// `true` for a null-conditional access (`?[..]` / `?.member`).
    pub fn nulled(&self) -> bool {
        self.nulled
    }
}

impl Node {
    /// Build a function call node.
    pub fn function(name: impl Into<String>, arguments: Vec<Node>) -> Self {
        Self::Function(FunctionNode {
            name: name.into(),
            arguments,
        })
    }

    /// Build a plain access node.
    pub fn access(target: Node, index: Node) -> Self {
        Self::Access(AccessNode {
            target: Box::new(target),
            index: Box::new(index),
            nulled: false,
        })
    }

    /// Build a null-conditional access node.
    pub fn null_access(target: Node, index: Node) -> Self {
        Self::Access(AccessNode {
            target: Box::new(target),
            index: Box::new(index),
            nulled: true,
        })
    }

    /// Build an access node with an explicit `nulled` flag.
    pub fn access_with(target: Node, index: Node, nulled: bool) -> Self {
        Self::Access(AccessNode {
            target: Box::new(target),
            index: Box::new(index),
            nulled,
        })
    }

    /// Integer literal.
    pub fn int(v: i32) -> Self {
        Self::Value(Literal::Int(v))
    }

    /// Decimal literal.
    pub fn decimal(v: Decimal) -> Self {
        Self::Value(Literal::Decimal(v))
    }

    /// Boolean literal.
    pub fn bool(v: bool) -> Self {
        Self::Value(Literal::Bool(v))
    }

    /// String literal.
    pub fn string(v: impl Into<String>) -> Self {
        Self::Value(Literal::String(v.into()))
    }

    /// Render the node as a complete expression, including the leading `@`.
    pub fn to_expression(&self) -> String {
        format!("@{self}")
    }

    /// Stable digest of the tree, equal for structurally equal trees.
    pub fn fingerprint(&self) -> AstFingerprint {
        fingerprint::fingerprint_node(self)
    }

    /// Number of nodes in the tree, including `self`.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Value(_) => 1,
            Self::Function(f) => 1 + f.arguments.iter().map(Node::node_count).sum::<usize>(),
            Self::Access(a) => 1 + a.target.node_count() + a.index.node_count(),
        }
    }
}

impl From<Literal> for Node {
    fn from(v: Literal) -> Self {
        Self::Value(v)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            // Integral decimals keep a fractional part so they reparse as decimals.
            Self::Decimal(v) if v.scale() == 0 => write!(f, "{v}.0"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "'{v}'"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Function(func) => {
                write!(f, "{}(", func.name)?;
                for (i, arg) in func.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::Access(a) => {
                let q = if a.nulled { "?" } else { "" };
                write!(f, "{}{q}[{}]", a.target, a.index)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ast/node.rs"]
mod tests;
