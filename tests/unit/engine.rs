use super::*;

#[test]
fn eval_str_runs_the_whole_pipeline() {
    let engine = Engine::with_std();
    assert_eq!(engine.eval_str("@add(1, 2)").unwrap(), Value::Int(3));

    let err = engine.eval_str("@add(1").unwrap_err();
    assert!(matches!(err, CompoError::Parse(_)));
    assert!(err.to_string().starts_with("parse error:"));

    let err = engine.eval_str("@nope()").unwrap_err();
    assert!(matches!(err, CompoError::Eval(_)));
}

#[test]
fn registry_mut_extends_the_engine() {
    let mut engine = Engine::new(Registry::new());
    engine.registry_mut().register("answer", || 42);
    assert_eq!(engine.eval_str("@answer()").unwrap(), Value::Int(42));
    assert!(engine.registry().contains("answer"));
}

#[test]
fn config_loads_with_defaults_for_absent_fields() {
    let config = EngineConfig::from_json_str(
        r#"{"parse": {"max_depth": 4}, "eval": {"null_conditional": "target_only"}}"#,
    )
    .unwrap();
    assert_eq!(config.parse.max_depth, 4);
    assert_eq!(config.eval.null_conditional, crate::NullConditional::TargetOnly);
    assert!(!config.eval.parallel);
    assert!(config.serializer.pretty);
    assert_eq!(config.serializer.max_depth, 128);

    assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
}

#[test]
fn bad_config_is_a_config_error() {
    let err = EngineConfig::from_json_str(r#"{"parse": {"max_depth": "deep"}}"#).unwrap_err();
    assert!(matches!(err, CompoError::Config(_)));
    assert!(err.to_string().starts_with("configuration error:"));
}

#[test]
fn parse_honours_configured_depth() {
    let config = EngineConfig {
        parse: ParseOptions { max_depth: 1 },
        ..EngineConfig::default()
    };
    let engine = Engine::with_config(Registry::new(), config);
    assert!(engine.parse("@f()").is_ok());
    assert!(engine.parse("@f(g())").is_err());
}

#[test]
fn encode_follows_serializer_style() {
    let compact = EngineConfig {
        serializer: SerializerOpts {
            pretty: false,
            ..SerializerOpts::default()
        },
        ..EngineConfig::default()
    };
    let node = Node::function("f", vec![Node::int(1)]);
    let pretty_text = Engine::default().encode(&node).unwrap();
    let compact_text = Engine::with_config(Registry::new(), compact)
        .encode(&node)
        .unwrap();
    assert!(pretty_text.contains('\n'));
    assert!(!compact_text.contains('\n'));
    assert_eq!(Engine::default().decode(&pretty_text).unwrap(), node);
    assert_eq!(Engine::default().decode(&compact_text).unwrap(), node);
}

#[test]
fn eval_batch_reports_per_expression() {
    let engine = Engine::with_std();
    let out = engine.eval_batch(&["@add(1, 2)", "@nope()"]).unwrap();
    assert_eq!(out[0].as_ref().unwrap(), &Value::Int(3));
    assert!(out[1].is_err());
    assert!(engine.eval_batch(&["@add(1"]).is_err());
}

#[test]
fn dedicated_pool_is_built_once() {
    let mut config = EngineConfig::default();
    config.eval.parallel = true;
    config.eval.threads = Some(3);
    let mut engine = Engine::with_config(Registry::new(), config);
    engine
        .registry_mut()
        .register("workers", || rayon::current_num_threads() as i32);

    let first = engine.pool().unwrap() as *const rayon::ThreadPool;
    let second = engine.pool().unwrap() as *const rayon::ThreadPool;
    assert_eq!(first, second);
    assert_eq!(engine.pool().unwrap().current_num_threads(), 3);

    for _ in 0..2 {
        let out = engine.eval_batch(&["@workers()", "@workers()"]).unwrap();
        assert!(out.into_iter().all(|r| r.unwrap() == Value::Int(3)));
    }
    assert_eq!(engine.pool().unwrap() as *const rayon::ThreadPool, first);
}

#[test]
fn no_pool_without_a_thread_count() {
    let mut config = EngineConfig::default();
    config.eval.parallel = true;
    assert!(Engine::with_config(Registry::new(), config).pool().is_none());

    config.eval.parallel = false;
    config.eval.threads = Some(2);
    assert!(Engine::with_config(Registry::new(), config).pool().is_none());
}
