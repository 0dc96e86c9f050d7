use super::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn fit_classifies_exact_widening_and_none() {
    assert_eq!(ValueType::Int.fit(&Value::Int(1)), Fit::Exact);
    assert_eq!(ValueType::Decimal.fit(&Value::Int(1)), Fit::Widening);
    assert_eq!(ValueType::Int.fit(&Value::Decimal(dec("1"))), Fit::None);
    assert_eq!(ValueType::Any.fit(&Value::Null), Fit::Widening);
    assert_eq!(ValueType::Any.fit(&Value::Int(1)), Fit::Widening);
    assert_eq!(Value::Int(1).convert(ValueType::Any), Ok(Value::Int(1)));
    assert_eq!(ValueType::String.fit(&Value::Null), Fit::None);
    assert!(ValueType::Decimal.accepts(&Value::Int(3)));
    assert!(!ValueType::Bool.accepts(&Value::Int(3)));
}

#[test]
fn variadic_rank_prefers_narrow_numbers() {
    assert!(ValueType::Int.variadic_rank() < ValueType::Decimal.variadic_rank());
    assert!(ValueType::Decimal.variadic_rank() < ValueType::String.variadic_rank());
    assert!(ValueType::String.variadic_rank() < ValueType::Any.variadic_rank());
}

#[test]
fn narrowing_rounds_half_to_even() {
    assert_eq!(Value::Decimal(dec("2.5")).convert(ValueType::Int), Ok(Value::Int(2)));
    assert_eq!(Value::Decimal(dec("3.5")).convert(ValueType::Int), Ok(Value::Int(4)));
    assert_eq!(Value::Decimal(dec("-2.5")).convert(ValueType::Int), Ok(Value::Int(-2)));
}

#[test]
fn narrowing_overflow_returns_original() {
    let big = Value::Decimal(dec("3000000000"));
    assert_eq!(big.clone().convert(ValueType::Int), Err(big));
}

#[test]
fn strings_parse_into_primitives() {
    let s = |v: &str| Value::String(v.to_owned());
    assert_eq!(s(" 42 ").convert(ValueType::Int), Ok(Value::Int(42)));
    assert_eq!(s("1.50").convert(ValueType::Decimal), Ok(Value::Decimal(dec("1.5"))));
    assert_eq!(s("TRUE").convert(ValueType::Bool), Ok(Value::Bool(true)));
    assert_eq!(s("nope").convert(ValueType::Bool), Err(s("nope")));
}

#[test]
fn primitives_format_into_strings() {
    assert_eq!(
        Value::Int(7).convert(ValueType::String),
        Ok(Value::String("7".into()))
    );
    assert_eq!(
        Value::Bool(false).convert(ValueType::String),
        Ok(Value::String("false".into()))
    );
    assert_eq!(Value::Bool(true).convert(ValueType::Int), Ok(Value::Int(1)));
    assert_eq!(Value::Int(0).convert(ValueType::Bool), Ok(Value::Bool(false)));
}

#[test]
fn null_and_containers_do_not_convert() {
    assert_eq!(Value::Null.convert(ValueType::Int), Err(Value::Null));
    let list = Value::List(vec![Value::Int(1)]);
    assert_eq!(list.clone().convert(ValueType::String), Err(list));
}

#[test]
fn json_bridge_keeps_kinds_and_order() {
    let json: serde_json::Value = serde_json::from_str(
        r#"{"name":"John","age":41,"score":2.50,"big":3000000000,"tags":["a",null],"ok":true}"#,
    )
    .unwrap();
    let v = Value::from_json(json).unwrap();
    let Value::Map(map) = &v else {
        panic!("expected map");
    };
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, ["name", "age", "score", "big", "tags", "ok"]);
    assert_eq!(map["age"], Value::Int(41));
    assert_eq!(map["score"], Value::Decimal(dec("2.5")));
    assert_eq!(map["big"], Value::Decimal(dec("3000000000")));
    assert_eq!(
        map["tags"],
        Value::List(vec![Value::String("a".into()), Value::Null])
    );

    let back = v.to_json();
    assert_eq!(back["score"].to_string(), "2.50");
    assert_eq!(back["age"], serde_json::json!(41));
}

#[test]
fn display_is_plain_for_scalars() {
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::String("a b".into()).to_string(), "a b");
    assert_eq!(Value::Decimal(dec("4.83")).to_string(), "4.83");
    assert_eq!(
        Value::List(vec![Value::Int(1), Value::Bool(true)]).to_string(),
        "[1,true]"
    );
}

#[test]
fn literal_maps_to_matching_value() {
    assert_eq!(Value::from(&Literal::Int(3)), Value::Int(3));
    assert_eq!(
        Value::from(&Literal::String("x".into())),
        Value::String("x".into())
    );
}
