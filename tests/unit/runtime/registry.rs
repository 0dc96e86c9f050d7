use super::*;
use rust_decimal::Decimal;

struct Greeter {
    greeting: String,
}

impl Callable for Greeter {
    fn params(&self) -> Params {
        Params::Fixed(vec![ValueType::String])
    }

    fn invoke(&self, args: Vec<Value>) -> Result<Value, CallError> {
        let name = args.first().and_then(Value::as_str).unwrap_or("nobody");
        Ok(Value::String(format!("{} {name}", self.greeting)))
    }
}

#[test]
fn params_come_from_closure_signature() {
    let mut reg = Registry::new();
    reg.register("none", || 1)
        .register("two", |_: i32, _: Decimal| true)
        .register("four", |_: String, _: bool, _: Value, _: Option<i32>| ())
        .register_variadic("many", |Variadic(xs): Variadic<String>| xs.len() as i32);

    assert_eq!(reg.lookup("none")[0].params(), &Params::Fixed(vec![]));
    assert_eq!(
        reg.lookup("two")[0].params(),
        &Params::Fixed(vec![ValueType::Int, ValueType::Decimal])
    );
    assert_eq!(
        reg.lookup("four")[0].params(),
        &Params::Fixed(vec![
            ValueType::String,
            ValueType::Bool,
            ValueType::Any,
            ValueType::Int
        ])
    );
    assert_eq!(reg.lookup("many")[0].params(), &Params::Variadic(ValueType::String));
    assert_eq!(reg.lookup("many")[0].arity(), None);
}

#[test]
fn lookup_keeps_registration_order() {
    let mut reg = Registry::new();
    reg.register("f", |a: i32| a).register("f", |a: i32, b: i32| a + b);
    let found = reg.lookup("f");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].arity(), Some(1));
    assert_eq!(found[1].arity(), Some(2));
    assert!(reg.lookup("missing").is_empty());
    assert!(reg.contains("f"));
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.names(), ["f"]);
}

#[test]
fn typed_closures_cast_their_arguments() {
    let mut reg = Registry::new();
    reg.register("add", |a: i32, b: i32| a + b);
    let add = &reg.lookup("add")[0];
    assert_eq!(add.invoke(vec![Value::Int(2), Value::Int(3)]).unwrap(), Value::Int(5));

    let err = add
        .invoke(vec![Value::Int(2), Value::String("x".into())])
        .unwrap_err();
    assert!(matches!(
        err,
        CallError::Argument {
            index: 1,
            expected: "int",
            found: "string"
        }
    ));

    let err = add.invoke(vec![Value::Int(2)]).unwrap_err();
    assert!(matches!(err, CallError::Arity { expected: 2, found: 1 }));
}

#[test]
fn fallible_closures_report_failure() {
    let mut reg = Registry::new();
    reg.register("fail", |_: i32| -> Result<i32, CallError> {
        Err(CallError::failed("nope"))
    });
    let err = reg.lookup("fail")[0].invoke(vec![Value::Int(1)]).unwrap_err();
    assert_eq!(err.to_string(), "nope");
}

#[test]
fn variadic_collects_every_argument() {
    let mut reg = Registry::new();
    reg.register_variadic("sum", |Variadic(xs): Variadic<i32>| xs.iter().sum::<i32>());
    let sum = &reg.lookup("sum")[0];
    assert_eq!(sum.invoke(vec![]).unwrap(), Value::Int(0));
    assert_eq!(
        sum.invoke(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
            .unwrap(),
        Value::Int(6)
    );
    let err = sum
        .invoke(vec![Value::Int(1), Value::Bool(true)])
        .unwrap_err();
    assert!(matches!(err, CallError::Argument { index: 1, .. }));
}

#[test]
fn host_callables_keep_their_state() {
    let mut reg = Registry::new();
    reg.register_callable(
        "greet",
        Greeter {
            greeting: "hello".into(),
        },
    );
    let out = reg.lookup("greet")[0]
        .invoke(vec![Value::String("ada".into())])
        .unwrap();
    assert_eq!(out, Value::String("hello ada".into()));
}

#[test]
fn params_render_for_diagnostics() {
    assert_eq!(
        Params::Fixed(vec![ValueType::Int, ValueType::Decimal]).to_string(),
        "(int, decimal)"
    );
    assert_eq!(Params::Variadic(ValueType::Int).to_string(), "(int...)");
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
    assert_send_sync::<Descriptor>();
}
