use super::*;
use crate::{EvalError, Value};
use std::str::FromStr;

fn eval(src: &str) -> Result<Value, EvalError> {
    let mut reg = Registry::new();
    register(&mut reg);
    crate::evaluate(&crate::parse(src).unwrap(), &reg)
}

fn dec(s: &str) -> Value {
    Value::Decimal(Decimal::from_str(s).unwrap())
}

#[test]
fn add_keeps_integers_integral() {
    assert_eq!(eval("@add(1,2)").unwrap(), Value::Int(3));
    assert_eq!(eval("@add(1, 0.5)").unwrap(), dec("1.5"));
    assert_eq!(eval("@sub(1, 3)").unwrap(), Value::Int(-2));
}

#[test]
fn mult_is_exact_for_decimals() {
    assert_eq!(eval("@mult(2.1,2.3)").unwrap(), dec("4.83"));
    assert_eq!(eval("@mult(6, 7)").unwrap(), Value::Int(42));
}

#[test]
fn integer_overflow_is_a_failure() {
    assert!(matches!(
        eval("@add(2147483647, 1)").unwrap_err(),
        EvalError::Invocation { .. }
    ));
    assert!(eval("@abs(-2147483648)").is_err());
}

#[test]
fn div_rejects_zero() {
    assert_eq!(eval("@div(7, 2)").unwrap(), Value::Int(3));
    assert_eq!(eval("@div(7.0, 2)").unwrap(), dec("3.5"));
    let err = eval("@div(1, 0)").unwrap_err();
    let EvalError::Invocation { source, .. } = err else {
        panic!("expected invocation error");
    };
    assert_eq!(source.to_string(), "division by zero");
    assert!(eval("@div(1.0, 0.0)").is_err());
}

#[test]
fn abs_per_numeric_kind() {
    assert_eq!(eval("@abs(-4)").unwrap(), Value::Int(4));
    assert_eq!(eval("@abs(-4.25)").unwrap(), dec("4.25"));
}

#[test]
fn max_and_min_are_variadic() {
    assert_eq!(eval("@max(1, 2, 3)").unwrap(), Value::Int(3));
    assert_eq!(eval("@max(1, 2.5)").unwrap(), dec("2.5"));
    assert_eq!(eval("@min(4, -1, 2)").unwrap(), Value::Int(-1));
    assert!(eval("@max()").is_err());
}
