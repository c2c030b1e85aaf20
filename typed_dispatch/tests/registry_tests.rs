//! Tests for the type catalog: detection, subtypes and registration errors.

mod common;

use std::collections::BTreeMap;

use nalgebra::{Complex, DMatrix};
use pretty_assertions::assert_eq;
use typed_dispatch::value::{Fraction, RegexValue, SparseMatrix, Unit};
use typed_dispatch::{ConfigError, Conversion, TypeDescriptor, Typed, Value};

#[test]
fn test_subtype_detected_before_wider_supertype() {
    let typed = Typed::default();
    typed
        .add_type(TypeDescriptor::new("B", |v| matches!(v, Value::Number(_))))
        .unwrap();
    typed
        .add_type(
            TypeDescriptor::new("A", |v| matches!(v, Value::Number(x) if *x > 0.0)).subtype_of("B"),
        )
        .unwrap();
    assert_eq!(typed.type_of(&Value::from(5)), "A");
    assert_eq!(typed.type_of(&Value::from(-5)), "B");
    assert!(typed.test_type("B", &Value::from(5)).unwrap());
}

#[test]
fn test_default_catalog_type_of_every_variant() {
    let typed = common::default_catalog();
    let function = typed.create("f", &[("any", common::tag("x"))]).unwrap();
    let cases = vec![
        (Value::from(1), "number"),
        (Value::BigNumber(typed_dispatch::value::parse_big_number("1").unwrap()), "BigNumber"),
        (Value::Complex(Complex::new(1.0, 2.0)), "Complex"),
        (Value::Fraction(Fraction::new(1, 2).unwrap()), "Fraction"),
        (Value::Unit(Unit::new(5.0, "cm")), "Unit"),
        (Value::from("s"), "string"),
        (Value::from(false), "boolean"),
        (Value::Array(vec![]), "Array"),
        (Value::DenseMatrix(DMatrix::zeros(1, 1)), "DenseMatrix"),
        (Value::SparseMatrix(SparseMatrix::zeros(2, 2)), "SparseMatrix"),
        (Value::Function(function), "function"),
        (Value::RegExp(RegexValue::new("a+", "i").unwrap()), "RegExp"),
        (Value::Null, "null"),
        (Value::Undefined, "undefined"),
        (Value::Object(BTreeMap::new()), "Object"),
    ];
    for (value, expected) in cases {
        assert_eq!(typed.type_of(&value), expected, "type of {}", value);
    }
    assert!(typed
        .test_type("Matrix", &Value::SparseMatrix(SparseMatrix::zeros(1, 1)))
        .unwrap());
}

#[test]
fn test_duplicate_type_rules() {
    let typed = Typed::default();
    let number = TypeDescriptor::new("number", |v| matches!(v, Value::Number(_)));
    typed.add_type(number.clone()).unwrap();
    // Same descriptor again: no-op
    typed.add_type(number).unwrap();
    assert_eq!(typed.catalog().types.len(), 1);
    // Same name, different test
    assert_eq!(
        typed.add_type(TypeDescriptor::new("number", |_| true)),
        Err(ConfigError::DuplicateType {
            name: "number".to_string()
        })
    );
    assert!(matches!(
        typed.add_type(TypeDescriptor::new("any", |_| true)),
        Err(ConfigError::DuplicateType { .. })
    ));
}

#[test]
fn test_unknown_supertype_rejected() {
    let typed = Typed::default();
    assert_eq!(
        typed.add_type(TypeDescriptor::new("DenseMatrix", |_| true).subtype_of("Matrix")),
        Err(ConfigError::UnknownSupertype {
            name: "DenseMatrix".to_string(),
            supertype: "Matrix".to_string(),
        })
    );
}

#[test]
fn test_test_type_unknown_name() {
    let typed = common::types_only();
    assert!(matches!(
        typed.test_type("Quaternion", &Value::from(1)),
        Err(ConfigError::UnknownType { .. })
    ));
    assert!(typed.test_type("any", &Value::from(1)).unwrap());
}

#[test]
fn test_conversion_registration_rules() {
    let typed = common::types_only();
    let convert = Conversion::new("number", "string", 1, |v| Ok(Value::from(v.to_string())));
    typed.add_conversion(convert.clone()).unwrap();
    typed.add_conversion(convert).unwrap();
    assert_eq!(typed.catalog().conversions.len(), 1);
    assert_eq!(
        typed.add_conversion(Conversion::new("number", "string", 1, |v| Ok(v.clone()))),
        Err(ConfigError::DuplicateConversion {
            from: "number".to_string(),
            to: "string".to_string(),
        })
    );
    assert!(matches!(
        typed.add_conversion(Conversion::new("string", "string", 1, |v| Ok(v.clone()))),
        Err(ConfigError::SelfConversion { .. })
    ));
}

#[test]
fn test_malformed_signature_rejected_at_creation() {
    let typed = common::types_only();
    let err = typed
        .create("f", &[("...number, string", common::tag("x"))])
        .unwrap_err();
    assert!(matches!(err, ConfigError::MalformedSignature { .. }));
}

#[test]
fn test_catalog_snapshot_json() {
    let typed = Typed::default();
    typed
        .add_type(TypeDescriptor::new("Matrix", |_| false))
        .unwrap();
    typed
        .add_type(TypeDescriptor::new("DenseMatrix", |_| false).subtype_of("Matrix"))
        .unwrap();
    typed
        .add_conversion(Conversion::new("DenseMatrix", "Matrix", 3, |v| Ok(v.clone())))
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&typed.catalog().to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "types": [
                { "name": "Matrix" },
                { "name": "DenseMatrix", "supertype": "Matrix" }
            ],
            "conversions": [
                { "from": "DenseMatrix", "to": "Matrix", "cost": 3 }
            ],
            "generation": 3
        })
    );
}
