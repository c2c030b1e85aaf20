//! Tests for the library functions built on the default catalog.

mod common;

use nalgebra::{Complex, DMatrix};
use pretty_assertions::assert_eq;
use typed_dispatch::library::Library;
use typed_dispatch::value::{parse_big_number, Fraction};
use typed_dispatch::{implementation, Error, Mismatch, TypeError, Value};

fn library() -> (typed_dispatch::Typed, Library) {
    let typed = common::default_catalog();
    let lib = Library::new(&typed).unwrap();
    (typed, lib)
}

#[test]
fn test_add_mixed_number_types() {
    let (_, lib) = library();
    assert_eq!(
        lib.add.call(&[Value::from(1), Value::Complex(Complex::new(0.0, 2.0))]).unwrap(),
        Value::Complex(Complex::new(1.0, 2.0))
    );
    let big = Value::BigNumber(parse_big_number("1").unwrap());
    assert_eq!(
        lib.add.call(&[Value::from(2), big]).unwrap(),
        Value::BigNumber(parse_big_number("3").unwrap())
    );
    assert_eq!(lib.add.call(&[Value::from(true), Value::from(true)]).unwrap(), Value::from(2));
}

#[test]
fn test_add_fraction_and_big_number_is_refused() {
    let (_, lib) = library();
    let err = lib
        .add
        .call(&[
            Value::Fraction(Fraction::new(1, 2).unwrap()),
            Value::BigNumber(parse_big_number("1").unwrap()),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::Raised(_)));
    assert!(err
        .to_string()
        .starts_with("Cannot implicitly convert a Fraction to BigNumber"));
}

#[test]
fn test_add_fraction_and_number_stays_exact() {
    let (_, lib) = library();
    let third = Value::Fraction(Fraction::new(1, 3).unwrap());
    let expected = Value::Fraction(Fraction::new(7, 3).unwrap());
    assert_eq!(lib.add.call(&[third.clone(), Value::from(2)]).unwrap(), expected);
    assert_eq!(lib.add.call(&[Value::from(2), third]).unwrap(), expected);
}

#[test]
fn test_sum_of_fractions() {
    let (_, lib) = library();
    let third = Value::Fraction(Fraction::new(1, 3).unwrap());
    assert_eq!(
        lib.sum.call(&[Value::Array(vec![third.clone()])]).unwrap(),
        third
    );
    assert_eq!(
        lib.sum.call(&[Value::Array(vec![third, Value::from(2)])]).unwrap(),
        Value::Fraction(Fraction::new(7, 3).unwrap())
    );
}

#[test]
fn test_add_broadcasts_over_collections() {
    let (_, lib) = library();
    let xs = common::numbers(&[1.0, 2.0]);
    assert_eq!(
        lib.add.call(&[xs.clone(), Value::from(10)]).unwrap(),
        common::numbers(&[11.0, 12.0])
    );
    assert_eq!(
        lib.add.call(&[Value::from(10), xs.clone()]).unwrap(),
        common::numbers(&[11.0, 12.0])
    );
    assert_eq!(
        lib.add.call(&[xs.clone(), common::numbers(&[3.0, 4.0])]).unwrap(),
        common::numbers(&[4.0, 6.0])
    );
    let m = Value::DenseMatrix(DMatrix::from_row_slice(1, 2, &[1.0, 2.0]));
    assert_eq!(
        lib.add.call(&[m, Value::from(1)]).unwrap(),
        Value::DenseMatrix(DMatrix::from_row_slice(1, 2, &[2.0, 3.0]))
    );
    assert!(lib
        .add
        .call(&[xs, common::numbers(&[1.0])])
        .unwrap_err()
        .to_string()
        .contains("dimension mismatch"));
}

#[test]
fn test_abs_reports_unusable_argument() {
    let (_, lib) = library();
    let err = lib.abs.call(&[Value::Undefined]).unwrap_err();
    match err {
        Error::Type(TypeError::NoMatchingSignature {
            function,
            arg_types,
            mismatch,
            ..
        }) => {
            assert_eq!(function, "abs");
            assert_eq!(arg_types, vec!["undefined"]);
            assert_eq!(
                mismatch,
                Mismatch::UnexpectedType {
                    index: 0,
                    expected: ["number", "BigNumber", "Fraction", "Complex", "Array", "Matrix"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                    actual: "undefined".to_string(),
                }
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_add_with_too_few_arguments_for_any_fold() {
    let (_, lib) = library();
    // Both arguments fit the variadic fold's leading `any` parameters, so the
    // furthest failure is its missing third argument.
    let err = lib.add.call(&[Value::from(1), Value::Undefined]).unwrap_err();
    assert!(matches!(
        err,
        Error::Type(TypeError::NoMatchingSignature {
            mismatch: Mismatch::TooFewArguments { index: 2, .. },
            ..
        })
    ));
}

#[test]
fn test_abs_of_each_type() {
    let (_, lib) = library();
    assert_eq!(lib.abs.call(&[Value::from(-3)]).unwrap(), Value::from(3));
    assert_eq!(
        lib.abs.call(&[Value::Complex(Complex::new(3.0, 4.0))]).unwrap(),
        Value::from(5)
    );
    assert_eq!(
        lib.abs.call(&[Value::Fraction(Fraction::new(-1, 2).unwrap())]).unwrap(),
        Value::Fraction(Fraction::new(1, 2).unwrap())
    );
    // string -> number is the cheapest route into abs
    assert_eq!(lib.abs.call(&[Value::from("-2")]).unwrap(), Value::from(2));
}

#[test]
fn test_sum_uses_add_for_mixed_items() {
    let (_, lib) = library();
    let items = Value::Array(vec![
        Value::from(1),
        Value::Complex(Complex::new(0.0, 1.0)),
        Value::from(2),
    ]);
    assert_eq!(
        lib.sum.call(&[items]).unwrap(),
        Value::Complex(Complex::new(3.0, 1.0))
    );
    let m = Value::DenseMatrix(DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]));
    assert_eq!(lib.sum.call(&[m]).unwrap(), Value::from(10));
}

#[test]
fn test_map_with_library_callback() {
    let (_, lib) = library();
    let m = Value::DenseMatrix(DMatrix::from_row_slice(1, 3, &[-1.0, 2.0, -3.0]));
    assert_eq!(
        lib.map.call(&[m, Value::Function(lib.abs.clone())]).unwrap(),
        Value::DenseMatrix(DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]))
    );
}

#[test]
fn test_map_callback_with_three_parameters() {
    let (typed, lib) = library();
    let describe = typed
        .create(
            "describe",
            &[(
                "number, Array, Array",
                implementation(|_, args| {
                    let index = match &args[1] {
                        Value::Array(path) => path[0].as_number().unwrap_or_default(),
                        _ => -1.0,
                    };
                    let len = match &args[2] {
                        Value::Array(items) => items.len() as f64,
                        _ => -1.0,
                    };
                    Ok(Value::Number(args[0].as_number().unwrap_or_default() * index + len))
                }),
            )],
        )
        .unwrap();
    let xs = common::numbers(&[5.0, 5.0, 5.0]);
    assert_eq!(
        lib.map.call(&[xs, Value::Function(describe)]).unwrap(),
        common::numbers(&[3.0, 8.0, 13.0])
    );
}

#[test]
fn test_map_rejects_non_function_callback() {
    let (_, lib) = library();
    let err = lib
        .map
        .call(&[common::numbers(&[1.0]), Value::from(1)])
        .unwrap_err();
    assert!(err.is_type_error());
}
