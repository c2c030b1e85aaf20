//! Tests for the type registry.

use std::rc::Rc;

use super::*;
use crate::error::ConfigError;
use crate::value::{SparseMatrix, Value};

fn default_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for descriptor in default_types() {
        registry.add_type(descriptor).unwrap();
    }
    registry
}

#[test]
fn test_type_of_builtin_values() {
    let registry = default_registry();
    assert_eq!(registry.type_of(&Value::from(1.5)), "number");
    assert_eq!(registry.type_of(&Value::from("x")), "string");
    assert_eq!(registry.type_of(&Value::from(true)), "boolean");
    assert_eq!(registry.type_of(&Value::Array(vec![])), "Array");
    assert_eq!(registry.type_of(&Value::Null), "null");
    assert_eq!(registry.type_of(&Value::Undefined), "undefined");
}

#[test]
fn test_matrix_subtypes_detected_before_matrix() {
    let registry = default_registry();
    let sparse = Value::SparseMatrix(SparseMatrix::zeros(2, 2));
    assert_eq!(registry.type_of(&sparse), "SparseMatrix");
    assert!(registry.test_type("Matrix", &sparse).unwrap());
    let order: Vec<_> = registry.detection_order().collect();
    let pos = |n: &str| order.iter().position(|x| *x == n).unwrap();
    assert!(pos("DenseMatrix") < pos("Matrix"));
    assert!(pos("SparseMatrix") < pos("Matrix"));
    // Unrelated types keep registration order
    assert!(pos("number") < pos("string"));
}

#[test]
fn test_type_of_falls_back_to_any() {
    let mut registry = TypeRegistry::new();
    registry
        .add_type(TypeDescriptor::new("number", |v| matches!(v, Value::Number(_))))
        .unwrap();
    assert_eq!(registry.type_of(&Value::from("x")), ANY);
}

#[test]
fn test_subtype_declared_later_is_still_detected_first() {
    // "B" accepts everything "A" accepts; "A" is registered after "B" as its subtype.
    let mut registry = TypeRegistry::new();
    registry
        .add_type(TypeDescriptor::new("B", |v| matches!(v, Value::Number(_))))
        .unwrap();
    registry
        .add_type(
            TypeDescriptor::new("A", |v| matches!(v, Value::Number(n) if n.fract() == 0.0))
                .subtype_of("B"),
        )
        .unwrap();
    assert_eq!(registry.type_of(&Value::from(4)), "A");
    assert_eq!(registry.type_of(&Value::from(4.5)), "B");
}

#[test]
fn test_duplicate_registration() {
    let mut registry = TypeRegistry::new();
    let test: TypeTest = Rc::new(|v| matches!(v, Value::Bool(_)));
    assert!(registry
        .add_type(TypeDescriptor::with_test("boolean", Rc::clone(&test)))
        .unwrap());
    // Identical descriptor: idempotent
    assert!(!registry
        .add_type(TypeDescriptor::with_test("boolean", test))
        .unwrap());
    // Same name, different test: rejected
    assert!(matches!(
        registry.add_type(TypeDescriptor::new("boolean", |_| true)),
        Err(ConfigError::DuplicateType { .. })
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_reserved_and_invalid_names_rejected() {
    let mut registry = TypeRegistry::new();
    assert!(registry.add_type(TypeDescriptor::new("any", |_| true)).is_err());
    assert!(registry.add_type(TypeDescriptor::new("a|b", |_| true)).is_err());
    assert!(registry.add_type(TypeDescriptor::new("", |_| true)).is_err());
}

#[test]
fn test_unknown_supertype_rejected() {
    let mut registry = TypeRegistry::new();
    assert!(matches!(
        registry.add_type(TypeDescriptor::new("integer", |_| true).subtype_of("number")),
        Err(ConfigError::UnknownSupertype { .. })
    ));
}

#[test]
fn test_subtype_distance_and_ancestors() {
    let mut registry = TypeRegistry::new();
    registry.add_type(TypeDescriptor::new("Collection", |_| false)).unwrap();
    registry
        .add_type(TypeDescriptor::new("Matrix", |_| false).subtype_of("Collection"))
        .unwrap();
    registry
        .add_type(TypeDescriptor::new("DenseMatrix", |_| false).subtype_of("Matrix"))
        .unwrap();
    assert_eq!(registry.subtype_distance("DenseMatrix", "DenseMatrix"), Some(0));
    assert_eq!(registry.subtype_distance("DenseMatrix", "Matrix"), Some(1));
    assert_eq!(registry.subtype_distance("DenseMatrix", "Collection"), Some(2));
    assert_eq!(registry.subtype_distance("Matrix", "DenseMatrix"), None);
    assert_eq!(registry.subtype_distance("Matrix", ANY), Some(ANY_DISTANCE));
    assert_eq!(
        registry.ancestors("DenseMatrix"),
        vec!["DenseMatrix", "Matrix", "Collection"]
    );
    assert_eq!(registry.supertype("Matrix"), Some("Collection"));
}

#[test]
fn test_test_type_unknown_name() {
    let registry = default_registry();
    assert!(registry.test_type(ANY, &Value::Null).unwrap());
    assert!(matches!(
        registry.test_type("Quaternion", &Value::Null),
        Err(ConfigError::UnknownType { .. })
    ));
}
