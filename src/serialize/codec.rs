use crate::ast::{Literal, Node};
use crate::serialize::{FormatError, SerializerOpts};
use serde_json::{Map, Number, Value as Json};
use std::str::FromStr;

const TYPE_KEY: &str = "$type";

const TAG_FUNCTION: &str = "function";
const TAG_ACCESS: &str = "access";
const TAG_STRING: &str = "value_string";
const TAG_INT: &str = "value_int";
const TAG_DECIMAL: &str = "value_decimal";
const TAG_BOOL: &str = "value_bool";

/// Encode a tree as a JSON value. `$type` is always the first key.
pub fn encode(node: &Node) -> Json {
    let mut obj = Map::new();
    match node {
        Node::Function(f) => {
            obj.insert(TYPE_KEY.into(), TAG_FUNCTION.into());
            obj.insert("function".into(), f.name().into());
            obj.insert(
                "arguments".into(),
                Json::Array(f.arguments().iter().map(encode).collect()),
            );
        }
        Node::Access(a) => {
            obj.insert(TYPE_KEY.into(), TAG_ACCESS.into());
            obj.insert("node".into(), encode(a.target()));
            obj.insert("index".into(), encode(a.index()));
            obj.insert("nulled".into(), a.nulled().into());
        }
        Node::Value(lit) => {
            let (tag, value) = match lit {
                Literal::String(v) => (TAG_STRING, Json::String(v.clone())),
                Literal::Int(v) => (TAG_INT, Json::from(*v)),
                Literal::Decimal(v) => {
                    let digits = v.to_string();
                    let value = match Number::from_str(&digits) {
                        Ok(n) => Json::Number(n),
                        Err(_) => Json::String(digits),
                    };
                    (TAG_DECIMAL, value)
                }
                Literal::Bool(v) => (TAG_BOOL, Json::Bool(*v)),
            };
            obj.insert(TYPE_KEY.into(), tag.into());
            obj.insert("value".into(), value);
        }
    }
    Json::Object(obj)
}

/// Decode a JSON value produced by [`encode`].
///
/// Trees nesting calls and accesses deeper than the default
/// [`SerializerOpts::max_depth`](crate::SerializerOpts::max_depth) are rejected.
pub fn decode(json: &Json) -> Result<Node, FormatError> {
    decode_bounded(json, SerializerOpts::default().max_depth)
}

pub(crate) fn decode_bounded(json: &Json, max_depth: usize) -> Result<Node, FormatError> {
    decode_at(json, "$", 0, max_depth)
}

/// Deepest container nesting in `json`, counted without recursion.
pub(crate) fn nesting(json: &Json) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(json, 1)];
    while let Some((v, depth)) = stack.pop() {
        match v {
            Json::Array(items) => stack.extend(items.iter().map(|i| (i, depth + 1))),
            Json::Object(obj) => stack.extend(obj.values().map(|i| (i, depth + 1))),
            _ => continue,
        }
        deepest = deepest.max(depth);
    }
    deepest
}

/// Drop `json` one container at a time; a deep document would overflow the recursive drop.
pub(crate) fn dispose(json: Json) {
    let mut stack = vec![json];
    while let Some(v) = stack.pop() {
        match v {
            Json::Array(items) => stack.extend(items),
            Json::Object(obj) => stack.extend(obj.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

fn decode_at(json: &Json, path: &str, depth: usize, limit: usize) -> Result<Node, FormatError> {
    let Json::Object(obj) = json else {
        return Err(FormatError::NotAnObject {
            path: path.to_owned(),
        });
    };
    let tag = field(obj, path, TYPE_KEY)?
        .as_str()
        .ok_or_else(|| invalid(path, TYPE_KEY, "a string"))?;

    if matches!(tag, TAG_FUNCTION | TAG_ACCESS) && depth >= limit {
        return Err(FormatError::TooDeep {
            path: path.to_owned(),
            limit,
        });
    }

    match tag {
        TAG_FUNCTION => {
            let name = field(obj, path, "function")?
                .as_str()
                .ok_or_else(|| invalid(path, "function", "a string"))?;
            let args = field(obj, path, "arguments")?
                .as_array()
                .ok_or_else(|| invalid(path, "arguments", "an array"))?;
            let arguments = args
                .iter()
                .enumerate()
                .map(|(i, a)| decode_at(a, &format!("{path}.arguments[{i}]"), depth + 1, limit))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Node::function(name, arguments))
        }
        TAG_ACCESS => {
            let target = decode_at(
                field(obj, path, "node")?,
                &format!("{path}.node"),
                depth + 1,
                limit,
            )?;
            let index = decode_at(
                field(obj, path, "index")?,
                &format!("{path}.index"),
                depth + 1,
                limit,
            )?;
            let nulled = field(obj, path, "nulled")?
                .as_bool()
                .ok_or_else(|| invalid(path, "nulled", "a boolean"))?;
            Ok(Node::access_with(target, index, nulled))
        }
        TAG_STRING => {
            let v = field(obj, path, "value")?
                .as_str()
                .ok_or_else(|| invalid(path, "value", "a string"))?;
            Ok(Node::string(v))
        }
        TAG_INT => {
            let v = field(obj, path, "value")?
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| invalid(path, "value", "an integer within 32 bits"))?;
            Ok(Node::int(v))
        }
        TAG_DECIMAL => {
            let digits = match field(obj, path, "value")? {
                Json::Number(n) => n.to_string(),
                Json::String(s) => s.clone(),
                _ => return Err(invalid(path, "value", "a number")),
            };
            let v = crate::syntax::parse_decimal_lexeme(&digits)
                .ok_or_else(|| invalid(path, "value", "a number representable as a decimal"))?;
            Ok(Node::decimal(v))
        }
        TAG_BOOL => {
            let v = field(obj, path, "value")?
                .as_bool()
                .ok_or_else(|| invalid(path, "value", "a boolean"))?;
            Ok(Node::bool(v))
        }
        other => Err(FormatError::UnknownDiscriminator {
            path: path.to_owned(),
            tag: other.to_owned(),
        }),
    }
}

fn field<'a>(obj: &'a Map<String, Json>, path: &str, name: &str) -> Result<&'a Json, FormatError> {
    obj.get(name).ok_or_else(|| FormatError::MissingField {
        path: path.to_owned(),
        field: name.to_owned(),
    })
}

fn invalid(path: &str, field: &str, expected: &'static str) -> FormatError {
    FormatError::InvalidField {
        path: path.to_owned(),
        field: field.to_owned(),
        expected,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/serialize/codec.rs"]
mod tests;
