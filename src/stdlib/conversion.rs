use crate::runtime::{CallError, Registry, Value, ValueType};
use rust_decimal::Decimal;

/// Run the standard conversion, turning a refusal into a callable failure.
fn convert(value: Value, ty: ValueType) -> Result<Value, CallError> {
    value
        .convert(ty)
        .map_err(|raw| CallError::failed(format!("cannot convert '{raw}' to {ty}")))
}

fn to_bool(s: String) -> Result<bool, CallError> {
    let t = s.trim().to_lowercase();
    if let Ok(n) = t.parse::<i32>() {
        return Ok(n != 0);
    }
    match t.as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(CallError::failed(format!("cannot convert '{s}' to boolean"))),
    }
}

pub(super) fn register(r: &mut Registry) {
    r.register("int", |v: i32| v)
        .register("int", |v: Decimal| convert(Value::Decimal(v), ValueType::Int))
        .register("int", |v: bool| i32::from(v))
        .register("int", |v: String| convert(Value::String(v), ValueType::Int))
        .register("decimal", |v: Decimal| v)
        .register("decimal", |v: bool| Decimal::from(i32::from(v)))
        .register("decimal", |v: String| {
            convert(Value::String(v), ValueType::Decimal)
        })
        .register("string", |v: String| v)
        .register("string", |v: i32| v.to_string())
        .register("string", |v: Decimal| v.to_string())
        .register("string", |v: bool| v.to_string())
        .register("boolean", |v: bool| v)
        .register("boolean", |v: i32| v != 0)
        .register("boolean", |v: Decimal| !v.is_zero())
        .register("boolean", to_bool);
}

#[cfg(test)]
#[path = "../../tests/unit/stdlib/conversion.rs"]
mod tests;
