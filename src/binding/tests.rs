#[cfg(test)]
use super::*;
use std::collections::HashMap;

#[derive(Debug, Default, PartialEq)]
struct Inner {
    label: String,
    value: Option<i32>,
}

crate::record!(Inner {
    label: ".param",
    value: "value",
});

#[derive(Debug, Default, PartialEq)]
struct Outer {
    name: String,
    ratio: f32,
    hidden: bool,
    tags: Vec<String>,
    limits: HashMap<String, u16>,
    inner: Option<Inner>,
    many: Vec<Inner>,
    nested: Vec<Vec<u8>>,
}

crate::record!(Outer {
    name: "name,env(APP_NAME)",
    ratio: "ratio.2",
    hidden,
    tags: "tags",
    limits: "limits",
    inner: "inner",
    many: "many",
    nested: "nested",
});

#[derive(Debug, Default)]
struct Broken {
    a: f64,
}

crate::record!(Broken { a: "a.x" });

#[test]
fn test_parse_descriptor_forms() {
    assert_eq!(
        parse_descriptor("port").unwrap(),
        FieldDescriptor {
            key: "port".into(),
            ..Default::default()
        }
    );

    let param = parse_descriptor(".param").unwrap();
    assert!(param.is_param);
    assert!(param.key.is_empty());

    let float = parse_descriptor("ratio.3").unwrap();
    assert_eq!(float.key, "ratio");
    assert_eq!(float.float_precision, Some(3));

    let env = parse_descriptor("home,env(HOME)").unwrap();
    assert_eq!(env.key, "home");
    assert_eq!(env.env_default.as_deref(), Some("HOME"));

    let ignored = parse_descriptor("k,omitempty,env(X_1)").unwrap();
    assert_eq!(ignored.env_default.as_deref(), Some("X_1"));
}

#[test]
fn test_parse_descriptor_rejects_bad_precision() {
    for raw in ["ratio.0", "ratio.x", "ratio.", "a.b.c", ".2", ""] {
        assert!(
            matches!(parse_descriptor(raw), Err(IclError::InvalidKey { .. })),
            "annotation {:?} should be rejected",
            raw
        );
    }
}

#[test]
fn test_schema_resolution() {
    let outer = Outer::default();
    let schema = outer.schema().unwrap();

    assert_eq!(schema.record(), "Outer");
    assert_eq!(schema.fields().len(), 8);
    assert_eq!(schema.tagged().count(), 7);
    assert_eq!(schema.param_count(), 0);
    assert_eq!(schema.lookup("ratio").map(|(name, _)| name), Some("ratio"));
    assert!(schema.lookup("hidden").is_none());

    let inner = Inner::default();
    let schema = inner.schema().unwrap();
    let params: Vec<&str> = schema.params().map(|f| f.name).collect();
    assert_eq!(params, vec!["label"]);
    assert!(schema.lookup("").is_none());
}

#[test]
fn test_schema_error_is_cached_and_reported() {
    let broken = Broken::default();
    assert_eq!(
        broken.schema().unwrap_err(),
        IclError::InvalidKey { key: "a.x".into() }
    );
    assert!(broken.schema().is_err());
}

#[test]
fn test_slots_by_shape() {
    let mut outer = Outer::default();

    assert!(matches!(outer.slot_mut("name"), Some(SlotMut::Scalar(_))));
    assert!(matches!(outer.slot_mut("tags"), Some(SlotMut::Sequence(_))));
    assert!(matches!(outer.slot_mut("limits"), Some(SlotMut::Mapping(_))));
    assert!(matches!(outer.slot_mut("inner"), Some(SlotMut::OptionalRecord(_))));
    assert!(matches!(outer.slot_mut("many"), Some(SlotMut::Records(_))));
    assert!(matches!(outer.slot_mut("nested"), Some(SlotMut::Unsupported("sequence of sequences"))));
    assert!(outer.slot_mut("missing").is_none());
}

#[test]
fn test_slot_writes_reach_the_struct() {
    let mut outer = Outer::default();

    if let Some(SlotMut::Scalar(slot)) = outer.slot_mut("name") {
        assert!(slot.set(Scalar::String("svc".into())));
        assert!(!slot.set(Scalar::Bool(true)));
    }
    if let Some(SlotMut::Sequence(slot)) = outer.slot_mut("tags") {
        assert!(slot.push(Scalar::String("a".into())));
        assert!(slot.push(Scalar::String("b".into())));
    }
    if let Some(SlotMut::Mapping(slot)) = outer.slot_mut("limits") {
        assert!(slot.insert("mem".into(), Scalar::Uint(512)));
        assert!(!slot.insert("big".into(), Scalar::Uint(70_000)));
    }
    if let Some(SlotMut::OptionalRecord(slot)) = outer.slot_mut("inner") {
        let record = slot.ensure();
        if let Some(SlotMut::Scalar(value)) = record.slot_mut("value") {
            assert!(value.is_optional());
            assert!(value.set(Scalar::Int(7)));
        }
    }
    if let Some(SlotMut::Records(slot)) = outer.slot_mut("many") {
        slot.append_with(&mut |_| Ok(())).unwrap();
        let failed = slot.append_with(&mut |_| Err(IclError::MapKeyType));
        assert!(failed.is_err());
    }

    assert_eq!(outer.name, "svc");
    assert_eq!(outer.tags, vec!["a", "b"]);
    assert_eq!(outer.limits.get("mem"), Some(&512));
    assert!(!outer.limits.contains_key("big"));
    assert_eq!(outer.inner.as_ref().and_then(|i| i.value), Some(7));
    assert_eq!(outer.many.len(), 1);
}

#[test]
fn test_optional_scalar_clear() {
    let mut inner = Inner {
        label: "x".into(),
        value: Some(3),
    };
    if let Some(SlotMut::Scalar(slot)) = inner.slot_mut("value") {
        assert_eq!(slot.get(), Some(Scalar::Int(3)));
        slot.clear();
        assert_eq!(slot.get(), None);
    }
    assert_eq!(inner.value, None);
}

#[test]
fn test_parse_number_ranges() {
    assert_eq!(ScalarKind::I8.parse_number("127").unwrap(), Scalar::Int(127));
    assert_eq!(ScalarKind::I8.parse_number("-128").unwrap(), Scalar::Int(-128));
    assert!(matches!(
        ScalarKind::I8.parse_number("129"),
        Err(IclError::NumericOutOfRange { .. })
    ));
    assert!(matches!(
        ScalarKind::U8.parse_number("-1"),
        Err(IclError::NumericOutOfRange { .. })
    ));
    assert!(matches!(
        ScalarKind::U64.parse_number("1.5"),
        Err(IclError::InvalidNumber { .. })
    ));
    assert_eq!(
        ScalarKind::U64.parse_number("18446744073709551615").unwrap(),
        Scalar::Uint(u64::MAX)
    );
    assert!(matches!(
        ScalarKind::F32.parse_number("1e39"),
        Err(IclError::NumericOutOfRange { .. })
    ));
    assert_eq!(ScalarKind::F64.parse_number("2.5").unwrap(), Scalar::Float(2.5));
}

#[test]
fn test_parse_text_coercion() {
    assert_eq!(
        ScalarKind::String.parse_text("/home/u").unwrap(),
        Scalar::String("/home/u".into())
    );
    assert_eq!(ScalarKind::Bool.parse_text("true").unwrap(), Scalar::Bool(true));
    assert_eq!(ScalarKind::Bool.parse_text("TRUE").unwrap(), Scalar::Bool(false));
    assert!(matches!(
        ScalarKind::I32.parse_text("abc"),
        Err(IclError::InvalidNumber { .. })
    ));
}

#[test]
fn test_scalar_to_node_precision() {
    let node = ScalarKind::F64.to_node(&Scalar::Float(120.0), Some(2)).unwrap();
    assert_eq!(node, crate::ast::Node::number("120.00"));

    let node = ScalarKind::F32.to_node(&Scalar::Float(f64::from(0.1f32)), None).unwrap();
    assert_eq!(node, crate::ast::Node::number("0.1"));
}

#[test]
fn test_non_finite_float_has_no_literal() {
    for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let err = ScalarKind::F64.to_node(&Scalar::Float(value), None).unwrap_err();
        assert!(matches!(err, IclError::NumericOutOfRange { kind, .. } if kind == "f64"));
    }
}
