//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use typed_dispatch::types::default_types;
use typed_dispatch::{implementation, Conversion, Implementation, Typed, Value};

/// Implementation that ignores its arguments and returns `label`.
pub fn tag(label: &'static str) -> Implementation {
    implementation(move |_, _| Ok(Value::from(label)))
}

/// Implementation that returns its (converted) arguments as an `Array`.
pub fn echo() -> Implementation {
    implementation(|_, args| Ok(Value::Array(args.to_vec())))
}

/// Default types, no conversions.
pub fn types_only() -> Typed {
    let typed = Typed::default();
    for descriptor in default_types() {
        typed.add_type(descriptor).unwrap();
    }
    typed
}

/// Default types plus the full default conversion table.
pub fn default_catalog() -> Typed {
    Typed::with_default_catalog().unwrap()
}

/// A conversion that wraps a number into `target` with the given constructor.
pub fn number_into(
    target: &str,
    cost: u32,
    wrap: impl Fn(f64) -> Value + 'static,
) -> Conversion {
    Conversion::new("number", target, cost, move |v| match v {
        Value::Number(x) => Ok(wrap(*x)),
        other => Ok(other.clone()),
    })
}

pub fn numbers(xs: &[f64]) -> Value {
    Value::Array(xs.iter().map(|&x| Value::Number(x)).collect())
}
