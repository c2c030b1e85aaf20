//! Structural recursion over collection values.
//!
//! Collection signatures of library functions hand every element back to
//! their own typed function through these helpers; the dispatch core itself
//! never looks inside a collection.

use nalgebra::DMatrix;

use crate::error::{Error, Result};
use crate::value::{SparseMatrix, Value};

/// Apply `f` to every non-collection element, keeping the shape.
///
/// `Array`s are rebuilt element by element. Matrix entries are passed as
/// `Value::Number` and must map back to numbers.
pub fn deep_map(value: &Value, f: &mut impl FnMut(&Value) -> Result<Value>) -> Result<Value> {
    deep_map_indexed(value, &mut |element, _| f(element))
}

/// Like [`deep_map`], also passing the element's index path.
pub fn deep_map_indexed(
    value: &Value,
    f: &mut impl FnMut(&Value, &[usize]) -> Result<Value>,
) -> Result<Value> {
    let mut path = Vec::new();
    map_at(value, &mut path, f)
}

fn map_at(
    value: &Value,
    path: &mut Vec<usize>,
    f: &mut impl FnMut(&Value, &[usize]) -> Result<Value>,
) -> Result<Value> {
    match value {
        Value::Array(items) => {
            let mut mapped = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                path.push(i);
                let result = map_at(item, path, f);
                path.pop();
                mapped.push(result?);
            }
            Ok(Value::Array(mapped))
        }
        Value::DenseMatrix(m) => Ok(Value::DenseMatrix(map_matrix(m, path, f)?)),
        Value::SparseMatrix(s) => Ok(Value::SparseMatrix(SparseMatrix::from_dense(
            &map_matrix(&s.to_dense(), path, f)?,
        ))),
        scalar => f(scalar, path),
    }
}

fn map_matrix(
    m: &DMatrix<f64>,
    path: &mut Vec<usize>,
    f: &mut impl FnMut(&Value, &[usize]) -> Result<Value>,
) -> Result<DMatrix<f64>> {
    let mut out = DMatrix::zeros(m.nrows(), m.ncols());
    for r in 0..m.nrows() {
        for c in 0..m.ncols() {
            path.extend([r, c]);
            let result = f(&Value::Number(m[(r, c)]), path);
            path.truncate(path.len() - 2);
            out[(r, c)] = match result? {
                Value::Number(x) => x,
                other => {
                    return Err(Error::raised(format!(
                        "matrix entries must map to numbers, got {}",
                        other.kind_name()
                    )))
                }
            };
        }
    }
    Ok(out)
}

/// Every non-collection element in row-major order.
pub fn flatten(value: &Value) -> Vec<Value> {
    fn collect(value: &Value, out: &mut Vec<Value>) {
        match value {
            Value::Array(items) => items.iter().for_each(|item| collect(item, out)),
            Value::DenseMatrix(m) => {
                for r in 0..m.nrows() {
                    for c in 0..m.ncols() {
                        out.push(Value::Number(m[(r, c)]));
                    }
                }
            }
            Value::SparseMatrix(s) => collect(&Value::DenseMatrix(s.to_dense()), out),
            scalar => out.push(scalar.clone()),
        }
    }
    let mut out = Vec::new();
    collect(value, &mut out);
    out
}

/// The first non-collection element and its index path, if any.
pub fn first_element(value: &Value) -> Option<(Value, Vec<usize>)> {
    match value {
        Value::Array(items) => {
            let (inner, mut path) = first_element(items.first()?)?;
            path.insert(0, 0);
            Some((inner, path))
        }
        Value::DenseMatrix(m) if m.nrows() > 0 && m.ncols() > 0 => {
            Some((Value::Number(m[(0, 0)]), vec![0, 0]))
        }
        Value::SparseMatrix(s) if s.shape().0 > 0 && s.shape().1 > 0 => {
            Some((Value::Number(s.get(0, 0)), vec![0, 0]))
        }
        Value::DenseMatrix(_) | Value::SparseMatrix(_) => None,
        scalar => Some((scalar.clone(), Vec::new())),
    }
}

/// Index path as a value, the form callbacks receive.
pub fn index_value(path: &[usize]) -> Value {
    Value::Array(path.iter().map(|&i| Value::Number(i as f64)).collect())
}
