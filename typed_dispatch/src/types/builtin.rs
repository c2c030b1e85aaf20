//! The library's default type catalog and conversion edges.
//!
//! Conversion costs follow registration order, so a cheaper edge is one the
//! library prefers: `number -> BigNumber` (lossless for short decimals) is
//! tried before `number -> Complex`.

use nalgebra::{Complex, DMatrix};

use super::registry::TypeDescriptor;
use crate::conversion::Conversion;
use crate::error::{Error, Result};
use crate::value::{
    big_number_to_f64, parse_big_number, significant_digits, Fraction, RustBigFloat, Value,
    BIGNUMBER_PRECISION,
};

/// Plain numbers with more significant digits than this are not implicitly
/// converted into exact types.
const MAX_IMPLICIT_DIGITS: usize = 15;

pub fn default_types() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::new("number", |v| matches!(v, Value::Number(_))),
        TypeDescriptor::new("BigNumber", |v| matches!(v, Value::BigNumber(_))),
        TypeDescriptor::new("Complex", |v| matches!(v, Value::Complex(_))),
        TypeDescriptor::new("Fraction", |v| matches!(v, Value::Fraction(_))),
        TypeDescriptor::new("Unit", |v| matches!(v, Value::Unit(_))),
        TypeDescriptor::new("string", |v| matches!(v, Value::Str(_))),
        TypeDescriptor::new("boolean", |v| matches!(v, Value::Bool(_))),
        TypeDescriptor::new("Array", |v| matches!(v, Value::Array(_))),
        TypeDescriptor::new("Matrix", |v| {
            matches!(v, Value::DenseMatrix(_) | Value::SparseMatrix(_))
        }),
        TypeDescriptor::new("DenseMatrix", |v| matches!(v, Value::DenseMatrix(_)))
            .subtype_of("Matrix"),
        TypeDescriptor::new("SparseMatrix", |v| matches!(v, Value::SparseMatrix(_)))
            .subtype_of("Matrix"),
        TypeDescriptor::new("function", |v| matches!(v, Value::Function(_))),
        TypeDescriptor::new("RegExp", |v| matches!(v, Value::RegExp(_))),
        TypeDescriptor::new("null", |v| matches!(v, Value::Null)),
        TypeDescriptor::new("undefined", |v| matches!(v, Value::Undefined)),
        TypeDescriptor::new("Object", |v| matches!(v, Value::Object(_))),
    ]
}

fn unexpected(expected: &str, value: &Value) -> Error {
    Error::raised(format!(
        "conversion expected a {} but received {}",
        expected,
        value.kind_name()
    ))
}

fn number_arg(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(unexpected("number", other)),
    }
}

fn string_arg(value: &Value) -> Result<&str> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(unexpected("string", other)),
    }
}

fn bool_arg(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(unexpected("boolean", other)),
    }
}

fn check_implicit_digits(x: f64, target: &str) -> Result<()> {
    if significant_digits(x) > MAX_IMPLICIT_DIGITS {
        return Err(Error::raised(format!(
            "Cannot implicitly convert a number with >{} significant digits to {} (value: {})",
            MAX_IMPLICIT_DIGITS, target, x
        )));
    }
    Ok(())
}

fn number_to_big(x: f64) -> Result<RustBigFloat> {
    if !x.is_finite() {
        return Ok(RustBigFloat::from_f64(x, BIGNUMBER_PRECISION));
    }
    parse_big_number(&x.to_string())
        .ok_or_else(|| Error::raised(format!("Cannot convert {} to BigNumber", x)))
}

/// Parse `"3"`, `"2i"`, `"-i"`, `"1.5 - 2i"` and similar forms.
pub fn parse_complex(text: &str) -> Option<Complex<f64>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let Some(body) = compact.strip_suffix('i') else {
        return compact.parse::<f64>().ok().map(|re| Complex::new(re, 0.0));
    };
    let imaginary = |s: &str| -> Option<f64> {
        match s {
            "" | "+" => Some(1.0),
            "-" => Some(-1.0),
            _ => s.parse::<f64>().ok(),
        }
    };
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));
    match split {
        Some(pos) => {
            let re = body[..pos].parse::<f64>().ok()?;
            Some(Complex::new(re, imaginary(&body[pos..])?))
        }
        None => Some(Complex::new(0.0, imaginary(body)?)),
    }
}

fn array_to_matrix(value: &Value) -> Result<Value> {
    let Value::Array(items) = value else {
        return Err(unexpected("Array", value));
    };
    let scalar = |v: &Value| -> Result<f64> {
        v.as_number()
            .ok_or_else(|| Error::raised(format!("Cannot convert {} to a matrix entry", v)))
    };
    if items.is_empty() {
        return Ok(Value::DenseMatrix(DMatrix::zeros(0, 0)));
    }
    if items.iter().all(|v| matches!(v, Value::Array(_))) {
        let rows: Vec<&Vec<Value>> = items
            .iter()
            .filter_map(|v| match v {
                Value::Array(row) => Some(row),
                _ => None,
            })
            .collect();
        let ncols = rows[0].len();
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(Error::raised("Cannot convert a jagged Array to a Matrix"));
        }
        let mut data = Vec::with_capacity(rows.len() * ncols);
        for row in &rows {
            for entry in row.iter() {
                data.push(scalar(entry)?);
            }
        }
        return Ok(Value::DenseMatrix(DMatrix::from_row_slice(
            rows.len(),
            ncols,
            &data,
        )));
    }
    let column = items.iter().map(scalar).collect::<Result<Vec<f64>>>()?;
    Ok(Value::DenseMatrix(DMatrix::from_column_slice(
        column.len(),
        1,
        &column,
    )))
}

fn matrix_to_array(value: &Value) -> Result<Value> {
    let dense = match value {
        Value::DenseMatrix(m) => m.clone(),
        Value::SparseMatrix(s) => s.to_dense(),
        other => return Err(unexpected("Matrix", other)),
    };
    if dense.ncols() == 1 {
        return Ok(Value::Array(dense.iter().map(|&x| Value::Number(x)).collect()));
    }
    let rows = (0..dense.nrows())
        .map(|r| {
            Value::Array(
                (0..dense.ncols())
                    .map(|c| Value::Number(dense[(r, c)]))
                    .collect(),
            )
        })
        .collect();
    Ok(Value::Array(rows))
}

/// The default conversion edges.
///
/// Costs are explicit. number->Fraction stays below every route through the
/// refusing Fraction->BigNumber edge, so mixing Fraction with number converts
/// the number, while Fraction with BigNumber still reaches the refusal.
pub fn default_conversions() -> Vec<Conversion> {
    let edges: Vec<(&str, &str, u32, fn(&Value) -> Result<Value>)> = vec![
        ("number", "BigNumber", 1, |v| {
            let x = number_arg(v)?;
            check_implicit_digits(x, "BigNumber")?;
            Ok(Value::BigNumber(number_to_big(x)?))
        }),
        ("number", "Complex", 2, |v| {
            Ok(Value::Complex(Complex::new(number_arg(v)?, 0.0)))
        }),
        ("number", "Fraction", 3, |v| {
            let x = number_arg(v)?;
            check_implicit_digits(x, "Fraction")?;
            Ok(Value::Fraction(Fraction::from_f64(x)?))
        }),
        ("BigNumber", "Complex", 4, |v| match v {
            Value::BigNumber(b) => Ok(Value::Complex(Complex::new(big_number_to_f64(b), 0.0))),
            other => Err(unexpected("BigNumber", other)),
        }),
        ("Fraction", "Complex", 5, |v| match v {
            Value::Fraction(f) => Ok(Value::Complex(Complex::new(f.to_f64(), 0.0))),
            other => Err(unexpected("Fraction", other)),
        }),
        ("Fraction", "BigNumber", 6, |_| {
            Err(Error::raised(
                "Cannot implicitly convert a Fraction to BigNumber or vice versa. \
                 Use function bignumber(x) to convert to BigNumber or fraction(x) to convert to Fraction.",
            ))
        }),
        ("string", "number", 7, |v| {
            let s = string_arg(v)?;
            s.trim()
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| Error::raised(format!("Cannot convert \"{}\" to a number", s)))
        }),
        ("string", "BigNumber", 8, |v| {
            let s = string_arg(v)?;
            parse_big_number(s)
                .map(Value::BigNumber)
                .ok_or_else(|| Error::raised(format!("Cannot convert \"{}\" to BigNumber", s)))
        }),
        ("string", "Fraction", 9, |v| {
            let s = string_arg(v)?;
            Fraction::parse(s)
                .map(Value::Fraction)
                .map_err(|_| Error::raised(format!("Cannot convert \"{}\" to Fraction", s)))
        }),
        ("string", "Complex", 10, |v| {
            let s = string_arg(v)?;
            parse_complex(s)
                .map(Value::Complex)
                .ok_or_else(|| Error::raised(format!("Cannot convert \"{}\" to Complex", s)))
        }),
        ("boolean", "number", 11, |v| {
            Ok(Value::Number(if bool_arg(v)? { 1.0 } else { 0.0 }))
        }),
        ("boolean", "BigNumber", 12, |v| {
            let x = if bool_arg(v)? { 1.0 } else { 0.0 };
            Ok(Value::BigNumber(RustBigFloat::from_f64(x, BIGNUMBER_PRECISION)))
        }),
        ("boolean", "Fraction", 13, |v| {
            Ok(Value::Fraction(Fraction::from_integer(i32::from(bool_arg(v)?))))
        }),
        ("boolean", "string", 14, |v| Ok(Value::Str(bool_arg(v)?.to_string()))),
        ("null", "number", 15, |_| Ok(Value::Number(0.0))),
        ("Array", "Matrix", 16, array_to_matrix),
        ("Matrix", "Array", 17, matrix_to_array),
    ];
    edges
        .into_iter()
        .map(|(from, to, cost, convert)| Conversion::new(from, to, cost, convert))
        .collect()
}
