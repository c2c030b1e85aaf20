use std::rc::Rc;

use astro_float::RoundingMode;

use super::{arg, mismatched};
use crate::collection::{deep_map, flatten};
use crate::error::{ConfigError, Error, Result};
use crate::function::{implementation, Implementation, TypedFunction};
use crate::typed::Typed;
use crate::value::{Value, BIGNUMBER_PRECISION};

fn add_scalars(a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(Value::Number(x + y)),
        (Value::BigNumber(x), Value::BigNumber(y)) => Ok(Value::BigNumber(x.add(
            y,
            BIGNUMBER_PRECISION,
            RoundingMode::ToEven,
        ))),
        (Value::Fraction(x), Value::Fraction(y)) => Ok(Value::Fraction(x.add(y))),
        (Value::Complex(x), Value::Complex(y)) => Ok(Value::Complex(x + y)),
        (other, _) => Err(mismatched("add", other)),
    }
}

/// `add(x, y)` for every numeric type, element-wise over collections and
/// folded for three or more arguments.
///
/// Built by merging a scalar function with a collection function.
pub fn add(typed: &Typed) -> std::result::Result<TypedFunction, ConfigError> {
    let scalar = implementation(|_, args| add_scalars(arg(args, 0)?, arg(args, 1)?));
    let scalars = typed.create(
        "add",
        &[
            ("number, number", scalar.clone()),
            ("BigNumber, BigNumber", scalar.clone()),
            ("Fraction, Fraction", scalar.clone()),
            ("Complex, Complex", scalar),
        ],
    )?;

    let collections = typed.create(
        "add",
        &[
            (
                "Array, Array",
                implementation(|add, args| {
                    let (Value::Array(xs), Value::Array(ys)) = (arg(args, 0)?, arg(args, 1)?)
                    else {
                        return Err(mismatched("add", arg(args, 0)?));
                    };
                    if xs.len() != ys.len() {
                        return Err(Error::raised(format!(
                            "add: dimension mismatch ({} != {})",
                            xs.len(),
                            ys.len()
                        )));
                    }
                    xs.iter()
                        .zip(ys)
                        .map(|(x, y)| add.call(&[x.clone(), y.clone()]))
                        .collect::<Result<Vec<_>>>()
                        .map(Value::Array)
                }),
            ),
            (
                "Array | Matrix, any",
                implementation(|add, args| {
                    let y = arg(args, 1)?;
                    deep_map(arg(args, 0)?, &mut |x| add.call(&[x.clone(), y.clone()]))
                }),
            ),
            (
                "any, Array | Matrix",
                implementation(|add, args| {
                    let x = arg(args, 0)?;
                    deep_map(arg(args, 1)?, &mut |y| add.call(&[x.clone(), y.clone()]))
                }),
            ),
            (
                "any, any, any, ...any",
                implementation(|add, args| {
                    let mut acc = add.call(&args[..2])?;
                    for next in &args[2..] {
                        acc = add.call(&[acc, next.clone()])?;
                    }
                    Ok(acc)
                }),
            ),
        ],
    )?;

    typed.merge("add", &[&scalars, &collections])
}

/// `abs(x)`; complex numbers give their modulus.
pub fn abs(typed: &Typed) -> std::result::Result<TypedFunction, ConfigError> {
    let scalar: Implementation = implementation(|_, args| match arg(args, 0)? {
        Value::Number(x) => Ok(Value::Number(x.abs())),
        Value::BigNumber(x) => Ok(Value::BigNumber(x.abs())),
        Value::Fraction(x) => Ok(Value::Fraction(x.abs())),
        Value::Complex(z) => Ok(Value::Number(z.norm())),
        other => Err(mismatched("abs", other)),
    });
    typed.create(
        "abs",
        &[
            ("number", scalar.clone()),
            ("BigNumber", scalar.clone()),
            ("Fraction", scalar.clone()),
            ("Complex", scalar),
            (
                "Array | Matrix",
                implementation(|abs, args| {
                    deep_map(arg(args, 0)?, &mut |x| abs.call(std::slice::from_ref(x)))
                }),
            ),
        ],
    )
}

/// `sum(collection)` or `sum(a, b, ...)`, folding with `add`.
///
/// Pairs of plain numbers skip dispatch through the `number, number`
/// implementation of `add`.
pub fn sum(typed: &Typed, add: &TypedFunction) -> std::result::Result<TypedFunction, ConfigError> {
    let add_numbers = typed.find(add, &["number", "number"]).map_err(|e| {
        ConfigError::InvalidConfig(format!("sum requires add(number, number): {}", e))
    })?;
    let fold = move |add: &TypedFunction, items: &[Value]| -> Result<Value> {
        let mut acc = Value::Number(0.0);
        for item in items {
            let numbers = matches!((&acc, item), (Value::Number(_), Value::Number(_)));
            let pair = [acc, item.clone()];
            acc = if numbers {
                add_numbers(add, &pair)?
            } else {
                add.call(&pair)?
            };
        }
        Ok(acc)
    };
    let fold = Rc::new(fold);
    let over_collection = {
        let add = add.clone();
        let fold = fold.clone();
        implementation(move |_, args| fold(&add, &flatten(arg(args, 0)?)))
    };
    let over_args = {
        let add = add.clone();
        implementation(move |_, args| fold(&add, args))
    };
    typed.create(
        "sum",
        &[("Array | Matrix", over_collection), ("...any", over_args)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Fraction;
    use pretty_assertions::assert_eq;

    fn typed() -> Typed {
        Typed::with_default_catalog().unwrap()
    }

    #[test]
    fn test_add_numbers_and_strings() {
        let typed = typed();
        let add = add(&typed).unwrap();
        assert_eq!(add.call(&[Value::from(1), Value::from(2)]).unwrap(), Value::from(3));
        // string -> number is the cheapest conversion into any add signature
        assert_eq!(add.call(&[Value::from(1), Value::from("2")]).unwrap(), Value::from(3));
    }

    #[test]
    fn test_add_fractions_stays_exact() {
        let typed = typed();
        let add = add(&typed).unwrap();
        let third = Value::Fraction(Fraction::new(1, 3).unwrap());
        let sixth = Value::Fraction(Fraction::new(1, 6).unwrap());
        assert_eq!(
            add.call(&[third, sixth]).unwrap(),
            Value::Fraction(Fraction::new(1, 2).unwrap())
        );
    }

    #[test]
    fn test_add_folds_many_arguments() {
        let typed = typed();
        let add = add(&typed).unwrap();
        let args: Vec<Value> = (1..=4).map(Value::from).collect();
        assert_eq!(add.call(&args).unwrap(), Value::from(10));
    }

    #[test]
    fn test_abs_recurses_into_arrays() {
        let typed = typed();
        let abs = abs(&typed).unwrap();
        let nested = Value::Array(vec![Value::from(-1), Value::Array(vec![Value::from(-2)])]);
        assert_eq!(
            abs.call(&[nested]).unwrap(),
            Value::Array(vec![Value::from(1), Value::Array(vec![Value::from(2)])])
        );
    }

    #[test]
    fn test_sum_collection_and_varargs() {
        let typed = typed();
        let add = add(&typed).unwrap();
        let sum = sum(&typed, &add).unwrap();
        let array = Value::Array(vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(sum.call(&[array]).unwrap(), Value::from(6));
        assert_eq!(sum.call(&[Value::from(4), Value::from(5)]).unwrap(), Value::from(9));
        assert_eq!(sum.call(&[]).unwrap(), Value::from(0));
    }
}
