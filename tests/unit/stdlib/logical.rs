use super::*;
use crate::{EvalError, Value};

fn eval(src: &str) -> Result<Value, EvalError> {
    let mut reg = Registry::new();
    register(&mut reg);
    crate::evaluate(&crate::parse(src).unwrap(), &reg)
}

fn truth(src: &str) -> bool {
    match eval(src).unwrap() {
        Value::Bool(v) => v,
        other => panic!("{src}: expected bool, got {other:?}"),
    }
}

#[test]
fn equals_per_kind() {
    assert!(truth("@equals('a', 'a')"));
    assert!(!truth("@equals('a', 'A')"));
    assert!(truth("@equals(2, 2)"));
    assert!(truth("@equals(2, 2.0)"));
    assert!(truth("@equals(2.10, 2.1)"));
    assert!(truth("@equals(false, false)"));
}

#[test]
fn boolean_connectives() {
    assert!(truth("@not(false)"));
    assert!(truth("@and(true, true)"));
    assert!(!truth("@and(true, true, false)"));
    assert!(truth("@or(false, true)"));
    assert!(!truth("@or(false, false, false)"));
}

#[test]
fn comparisons_on_ints_and_decimals() {
    assert!(truth("@greater(3, 2)"));
    assert!(!truth("@less(3, 2)"));
    assert!(truth("@greaterorequals(2, 2.0)"));
    assert!(truth("@lessorequals(1.5, 2)"));
}

#[test]
fn if_selects_branch_of_matching_kind() {
    assert_eq!(eval("@if(true, 'a', 'b')").unwrap(), Value::String("a".into()));
    assert_eq!(eval("@if(false, 1, 2)").unwrap(), Value::Int(2));
    assert_eq!(
        eval("@if(equals(1, 1), 1, 2.5)").unwrap(),
        Value::Decimal(Decimal::ONE)
    );
}
