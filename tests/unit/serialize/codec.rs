use super::*;
use rust_decimal::Decimal;
use serde_json::json;

fn dec(s: &str) -> Node {
    Node::decimal(Decimal::from_str(s).unwrap())
}

#[test]
fn encodes_every_variant_with_discriminator_first() {
    let node = Node::null_access(
        Node::function(
            "f",
            vec![
                Node::int(1),
                dec("2.5"),
                Node::bool(true),
                Node::string("x"),
            ],
        ),
        Node::string("k"),
    );
    let json = encode(&node);
    assert_eq!(
        json,
        json!({
            "$type": "access",
            "node": {
                "$type": "function",
                "function": "f",
                "arguments": [
                    {"$type": "value_int", "value": 1},
                    {"$type": "value_decimal", "value": 2.5},
                    {"$type": "value_bool", "value": true},
                    {"$type": "value_string", "value": "x"}
                ]
            },
            "index": {"$type": "value_string", "value": "k"},
            "nulled": true
        })
    );
    let first_key = json.as_object().unwrap().keys().next().unwrap().clone();
    assert_eq!(first_key, "$type");
}

#[test]
fn decimals_keep_every_digit() {
    let n = dec("1234567890123456789.123456789");
    let text = serde_json::to_string(&encode(&n)).unwrap();
    assert!(text.contains("1234567890123456789.123456789"));
    assert_eq!(decode(&serde_json::from_str(&text).unwrap()).unwrap(), n);
}

#[test]
fn decodes_decimal_written_as_string() {
    let json = json!({"$type": "value_decimal", "value": "4.83"});
    assert_eq!(decode(&json).unwrap(), dec("4.83"));
}

#[test]
fn unknown_discriminator_names_path() {
    let json = json!({
        "$type": "function",
        "function": "f",
        "arguments": [{"$type": "value_float", "value": 1.0}]
    });
    let err = decode(&json).unwrap_err();
    assert!(matches!(
        err,
        FormatError::UnknownDiscriminator { ref path, ref tag }
            if path == "$.arguments[0]" && tag == "value_float"
    ));
}

#[test]
fn missing_field_names_path() {
    let json = json!({
        "$type": "access",
        "node": {"$type": "function", "function": "f", "arguments": []},
        "index": {"$type": "value_int"},
        "nulled": false
    });
    let err = decode(&json).unwrap_err();
    assert!(matches!(
        err,
        FormatError::MissingField { ref path, ref field } if path == "$.index" && field == "value"
    ));
    assert_eq!(err.to_string(), "$.index: missing field 'value'");

    let err = decode(&json!({"value": 1})).unwrap_err();
    assert!(matches!(err, FormatError::MissingField { ref field, .. } if field == "$type"));
}

#[test]
fn invalid_fields_are_rejected() {
    let cases = [
        json!({"$type": "value_int", "value": 2.5}),
        json!({"$type": "value_int", "value": 3000000000i64}),
        json!({"$type": "value_bool", "value": "true"}),
        json!({"$type": "value_string", "value": 1}),
        json!({"$type": "value_decimal", "value": "abc"}),
        json!({"$type": "function", "function": "f", "arguments": {}}),
        json!({"$type": "access", "node": {"$type": "value_int", "value": 1},
               "index": {"$type": "value_int", "value": 1}, "nulled": "no"}),
        json!({"$type": 7}),
    ];
    for json in cases {
        let err = decode(&json).unwrap_err();
        assert!(matches!(err, FormatError::InvalidField { .. }), "{json}: {err}");
    }
}

#[test]
fn non_object_node_is_rejected() {
    let json = json!({"$type": "function", "function": "f", "arguments": [1]});
    let err = decode(&json).unwrap_err();
    assert!(matches!(err, FormatError::NotAnObject { ref path } if path == "$.arguments[0]"));
}

#[test]
fn decode_limits_nesting() {
    let limit = SerializerOpts::default().max_depth;
    let mut node = Node::int(1);
    for _ in 0..limit {
        node = Node::function("f", vec![node]);
    }
    assert_eq!(decode(&encode(&node)).unwrap(), node);

    let deeper = Node::access(node, Node::int(0));
    let err = decode(&encode(&deeper)).unwrap_err();
    let expected = format!("$.node{}", ".arguments[0]".repeat(limit - 1));
    assert!(matches!(err, FormatError::TooDeep { ref path, .. } if *path == expected), "{err}");
}

#[test]
fn nesting_counts_containers() {
    assert_eq!(nesting(&json!(1)), 0);
    assert_eq!(nesting(&json!({"a": [1, {"b": []}]})), 4);
    let node = Node::function("f", vec![Node::function("g", vec![Node::int(1)])]);
    assert_eq!(nesting(&encode(&node)), 5);
}
