//! Conversions between runtime [`Value`]s and the Rust types host callables are written in.

use crate::runtime::value::{Value, ValueType};
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// Failure raised by a callable during invocation.
#[derive(thiserror::Error, Debug)]
pub enum CallError {
    /// The callable was invoked with the wrong number of arguments.
    #[error("expected {expected} argument(s), got {found}")]
    Arity {
        /// Arity the callable declares.
        expected: usize,
        /// Number of arguments passed.
        found: usize,
    },

    /// An argument could not be cast to the parameter type.
    #[error("argument {index}: expected {expected}, found {found}")]
    Argument {
        /// Zero-based argument position.
        index: usize,
        /// Declared parameter type.
        expected: &'static str,
        /// Kind of the value actually passed.
        found: &'static str,
    },

    /// The callable rejected its input.
    #[error("{0}")]
    Failed(String),

    /// Opaque host failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CallError {
    /// Build a [`CallError::Failed`] value.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Value could not be cast to a Rust type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastError {
    /// Type that was requested.
    pub expected: &'static str,
    /// Kind of the value found.
    pub found: &'static str,
}

impl CastError {
    fn new(expected: ValueType, found: &Value) -> Self {
        Self {
            expected: expected.name(),
            found: found.kind(),
        }
    }

    pub(crate) fn at(self, index: usize) -> CallError {
        CallError::Argument {
            index,
            expected: self.expected,
            found: self.found,
        }
    }
}

/// Rust types a callable parameter can be declared as.
pub trait FromValue: Sized {
    /// Parameter type advertised to overload resolution.
    const TYPE: ValueType;

    /// Take the value apart, failing when it has the wrong shape.
    fn from_value(value: Value) -> Result<Self, CastError>;
}

/// Rust types a callable can return.
pub trait IntoValue {
    /// Wrap `self` as a runtime value.
    fn into_value(self) -> Value;
}

/// Return types of callables: a plain value or a fallible one.
pub trait IntoCallResult {
    /// Normalize into the invocation result.
    fn into_call_result(self) -> Result<Value, CallError>;
}

impl<T: IntoValue> IntoCallResult for T {
    fn into_call_result(self) -> Result<Value, CallError> {
        Ok(self.into_value())
    }
}

impl<T: IntoValue> IntoCallResult for Result<T, CallError> {
    fn into_call_result(self) -> Result<Value, CallError> {
        self.map(IntoValue::into_value)
    }
}

impl FromValue for Value {
    const TYPE: ValueType = ValueType::Any;

    fn from_value(value: Value) -> Result<Self, CastError> {
        Ok(value)
    }
}

impl FromValue for i32 {
    const TYPE: ValueType = ValueType::Int;

    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(CastError::new(Self::TYPE, &other)),
        }
    }
}

impl FromValue for Decimal {
    const TYPE: ValueType = ValueType::Decimal;

    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::Int(v) => Ok(Decimal::from(v)),
            other => Err(CastError::new(Self::TYPE, &other)),
        }
    }
}

impl FromValue for bool {
    const TYPE: ValueType = ValueType::Bool;

    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(CastError::new(Self::TYPE, &other)),
        }
    }
}

impl FromValue for String {
    const TYPE: ValueType = ValueType::String;

    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(CastError::new(Self::TYPE, &other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const TYPE: ValueType = ValueType::List;

    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(CastError::new(Self::TYPE, &other)),
        }
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    const TYPE: ValueType = ValueType::Map;

    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Map(map) => map
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_value(v)?)))
                .collect(),
            other => Err(CastError::new(Self::TYPE, &other)),
        }
    }
}

/// Null maps to `None`; the declared type is that of `T`.
impl<T: FromValue> FromValue for Option<T> {
    const TYPE: ValueType = T::TYPE;

    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for Decimal {
    fn into_value(self) -> Value {
        Value::Decimal(self)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for IndexMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

/// Parameter wrapper marking a uniform-variadic callable: every argument is collected, in
/// order, as one `T`.
#[derive(Clone, Debug, PartialEq)]
pub struct Variadic<T>(pub Vec<T>);
