use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CompoError::config("x")
            .to_string()
            .starts_with("configuration error:")
    );

    let parse = crate::parse("@f(").unwrap_err();
    assert!(CompoError::from(parse).to_string().starts_with("parse error:"));

    let eval = EvalError::UnknownFunction { name: "f".into() };
    assert!(
        CompoError::from(eval)
            .to_string()
            .starts_with("evaluation error:")
    );

    let format = FormatError::NotAnObject { path: "$".into() };
    assert!(
        CompoError::from(format)
            .to_string()
            .starts_with("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CompoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(CompoError::other("bang").to_string().contains("bang"));
}
