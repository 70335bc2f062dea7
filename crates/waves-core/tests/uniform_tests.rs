use glam::Vec2;
use waves_core::*;

#[test]
fn get_returns_declared_values() {
    let s = UniformStore::builder()
        .float("u_time", 0.0, UniformRole::Time)
        .vec2("u_resolution", Vec2::new(640.0, 480.0), UniformRole::Resolution)
        .build()
        .unwrap();
    assert!(s.has("u_time"));
    assert!(!s.has("u_mouse"));
    assert_eq!(s.len(), 2);
    assert_eq!(s.float("u_time"), Some(0.0));
    assert_eq!(s.vec2("u_resolution"), Some(Vec2::new(640.0, 480.0)));
    assert_eq!(s.float("u_resolution"), None);
    assert_eq!(s.get("missing"), None);
}

#[test]
fn set_unknown_key_is_an_error() {
    let mut s = UniformStore::builder()
        .float("amp", 0.2, UniformRole::Param)
        .build()
        .unwrap();
    let err = s.set("amq", UniformValue::Float(1.0)).unwrap_err();
    assert_eq!(err, UniformError::InvalidKey("amq".into()));
    assert_eq!(s.len(), 1, "no implicit insertion");
    assert_eq!(err.to_string(), "unknown uniform `amq`");
}

#[test]
fn set_keeps_declared_kind() {
    let mut s = UniformStore::builder()
        .vec2("u_mouse", Vec2::ZERO, UniformRole::Pointer)
        .build()
        .unwrap();
    let err = s.set("u_mouse", UniformValue::Float(1.0)).unwrap_err();
    assert_eq!(
        err,
        UniformError::TypeMismatch {
            key: "u_mouse".into(),
            expected: ValueKind::Vec2,
            found: ValueKind::Float,
        }
    );
    s.set("u_mouse", Vec2::new(0.5, 0.5).into()).unwrap();
    assert_eq!(s.vec2("u_mouse"), Some(Vec2::splat(0.5)));
}

#[test]
fn duplicate_declarations_are_rejected() {
    let err = UniformStore::builder()
        .float("amp", 0.0, UniformRole::Param)
        .float("amp", 1.0, UniformRole::Param)
        .build()
        .unwrap_err();
    assert_eq!(err, UniformError::DuplicateKey("amp".into()));
}

#[test]
fn set_role_writes_every_matching_uniform() {
    let mut s = wave_uniforms(Viewport::default()).unwrap();
    let n = s.set_role(UniformRole::Time, UniformValue::Float(3.5));
    assert_eq!(n, 2);
    assert_eq!(s.float("back.u_time"), Some(3.5));
    assert_eq!(s.float("front.u_time"), Some(3.5));
    // wrong kind for the role touches nothing
    assert_eq!(s.set_role(UniformRole::Resolution, UniformValue::Float(1.0)), 0);
    let keys: Vec<&str> = s.keys_with_role(UniformRole::Pointer).collect();
    assert_eq!(keys, vec!["back.u_mouse", "front.u_mouse"]);
}
