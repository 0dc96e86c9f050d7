use crate::ast::Literal;
use crate::serialize::FormatError;
use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Runtime value produced by evaluation.
///
/// Lists and maps never come from literals; only callables produce them.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// 32-bit signed integer.
    Int(i32),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
    /// Boolean.
    Bool(bool),
    /// Text.
    String(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// String-keyed mapping, in insertion order.
    Map(IndexMap<String, Value>),
}

/// Declared parameter type of a callable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// [`Value::Int`].
    Int,
    /// [`Value::Decimal`].
    Decimal,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::String`].
    String,
    /// [`Value::List`].
    List,
    /// [`Value::Map`].
    Map,
    /// Any value, including null.
    Any,
}

/// How well a value fits a declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fit {
    /// Not assignable without a conversion.
    None,
    /// Assignable by a lossless widening (`Int` to `Decimal`).
    Widening,
    /// Already of the declared type.
    Exact,
}

impl ValueType {
    /// Lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
            Self::Any => "any",
        }
    }

    /// Classify how `value` fits this type.
    pub fn fit(self, value: &Value) -> Fit {
        match (self, value) {
            (Self::Int, Value::Int(_))
            | (Self::Decimal, Value::Decimal(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::String, Value::String(_))
            | (Self::List, Value::List(_))
            | (Self::Map, Value::Map(_)) => Fit::Exact,
            (Self::Decimal, Value::Int(_)) | (Self::Any, _) => Fit::Widening,
            _ => Fit::None,
        }
    }

    /// `true` when `value` is assignable, exactly or by widening.
    pub fn accepts(self, value: &Value) -> bool {
        self.fit(value) != Fit::None
    }

    /// Specificity rank for choosing between variadic overloads; lower is narrower.
    pub(crate) fn variadic_rank(self) -> u8 {
        match self {
            Self::Int => 1,
            Self::Decimal => 2,
            Self::String => 3,
            _ => 4,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Lowercase kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Decimal(_) => "decimal",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Declared type matching this value exactly, `None` for null.
    pub fn value_type(&self) -> Option<ValueType> {
        Some(match self {
            Self::Null => return None,
            Self::Int(_) => ValueType::Int,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Bool(_) => ValueType::Bool,
            Self::String(_) => ValueType::String,
            Self::List(_) => ValueType::List,
            Self::Map(_) => ValueType::Map,
        })
    }

    /// `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value as a decimal, for `Int` and `Decimal`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(v) => Some(Decimal::from(*v)),
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to `ty` using the standard conversions.
    ///
    /// Numeric narrowing rounds half to even and fails on overflow; strings parse into
    /// primitives and primitives format into strings. On failure the original value is handed
    /// back unchanged.
    pub fn convert(self, ty: ValueType) -> Result<Value, Value> {
        if ty == ValueType::Any || ty.fit(&self) == Fit::Exact {
            return Ok(self);
        }
        let converted = match (&self, ty) {
            (Self::Int(v), ValueType::Decimal) => Some(Self::Decimal(Decimal::from(*v))),
            (Self::Int(v), ValueType::Bool) => Some(Self::Bool(*v != 0)),
            (Self::Int(v), ValueType::String) => Some(Self::String(v.to_string())),

            (Self::Decimal(v), ValueType::Int) => v
                .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                .to_i32()
                .map(Self::Int),
            (Self::Decimal(v), ValueType::Bool) => Some(Self::Bool(!v.is_zero())),
            (Self::Decimal(v), ValueType::String) => Some(Self::String(v.to_string())),

            (Self::Bool(v), ValueType::Int) => Some(Self::Int(i32::from(*v))),
            (Self::Bool(v), ValueType::Decimal) => Some(Self::Decimal(Decimal::from(i32::from(*v)))),
            (Self::Bool(v), ValueType::String) => Some(Self::String(v.to_string())),

            (Self::String(s), ValueType::Int) => s.trim().parse::<i32>().ok().map(Self::Int),
            (Self::String(s), ValueType::Decimal) => {
                crate::syntax::parse_decimal_lexeme(s.trim()).map(Self::Decimal)
            }
            (Self::String(s), ValueType::Bool) => {
                let t = s.trim();
                if t.eq_ignore_ascii_case("true") {
                    Some(Self::Bool(true))
                } else if t.eq_ignore_ascii_case("false") {
                    Some(Self::Bool(false))
                } else {
                    None
                }
            }
            _ => None,
        };
        converted.ok_or(self)
    }

    /// Convert to a JSON value. Decimals keep their exact digits.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Decimal(v) => match serde_json::Number::from_str(&v.to_string()) {
                Ok(n) => serde_json::Value::Number(n),
                Err(_) => serde_json::Value::String(v.to_string()),
            },
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::String(v) => serde_json::Value::String(v.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Build a value from JSON. Integral numbers that fit `i32` become `Int`; every other
    /// number becomes `Decimal`.
    pub fn from_json(json: serde_json::Value) -> Result<Value, FormatError> {
        json_to_value(json, "$")
    }
}

fn json_to_value(json: serde_json::Value, path: &str) -> Result<Value, FormatError> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Bool(v),
        serde_json::Value::String(v) => Value::String(v),
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_i64().and_then(|v| i32::try_from(v).ok()) {
                Value::Int(v)
            } else {
                let text = n.to_string();
                let d = crate::syntax::parse_decimal_lexeme(&text).ok_or_else(|| {
                    FormatError::InvalidField {
                        path: path.to_owned(),
                        field: "value".to_owned(),
                        expected: "number representable as a decimal",
                    }
                })?;
                Value::Decimal(d)
            }
        }
        serde_json::Value::Array(items) => Value::List(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| json_to_value(v, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| {
                    let child = json_to_value(v, &format!("{path}.{k}"))?;
                    Ok((k, child))
                })
                .collect::<Result<_, FormatError>>()?,
        ),
    })
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Int(v) => Self::Int(*v),
            Literal::Decimal(v) => Self::Decimal(*v),
            Literal::Bool(v) => Self::Bool(*v),
            Literal::String(v) => Self::String(v.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::List(_) | Self::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/value.rs"]
mod tests;
