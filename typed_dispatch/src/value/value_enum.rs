//! Value - the dynamic value passed through typed functions.
//!
//! This module contains:
//! - `Value`: one variant per library domain type
//! - constructors (`From` impls) and `Display`

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::{Complex, DMatrix};

use super::fraction::Fraction;
use super::matrix::SparseMatrix;
use super::regex::RegexValue;
use super::unit::Unit;
use super::RustBigFloat;
use crate::function::TypedFunction;

#[derive(Debug, Clone)]
pub enum Value {
    // Scalars
    Number(f64),
    BigNumber(RustBigFloat), // Arbitrary precision decimal
    Fraction(Fraction),
    Complex(Complex<f64>),
    Unit(Unit),
    // Collections
    Array(Vec<Value>),
    DenseMatrix(DMatrix<f64>),
    SparseMatrix(SparseMatrix),
    // Everything else a library function may receive
    Str(String),
    Bool(bool),
    Function(TypedFunction),
    RegExp(RegexValue),
    Null,
    Undefined,
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Name of the enum variant, independent of any type registry.
    /// Only used in diagnostics; dispatch goes through the registry.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::BigNumber(_) => "BigNumber",
            Value::Fraction(_) => "Fraction",
            Value::Complex(_) => "Complex",
            Value::Unit(_) => "Unit",
            Value::Array(_) => "Array",
            Value::DenseMatrix(_) => "DenseMatrix",
            Value::SparseMatrix(_) => "SparseMatrix",
            Value::Str(_) => "Str",
            Value::Bool(_) => "Bool",
            Value::Function(_) => "Function",
            Value::RegExp(_) => "RegExp",
            Value::Null => "Null",
            Value::Undefined => "Undefined",
            Value::Object(_) => "Object",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&TypedFunction> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::DenseMatrix(_) | Value::SparseMatrix(_)
        )
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigNumber(a), Value::BigNumber(b)) => a == b,
            (Value::Fraction(a), Value::Fraction(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Unit(a), Value::Unit(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::DenseMatrix(a), Value::DenseMatrix(b)) => a == b,
            (Value::SparseMatrix(a), Value::SparseMatrix(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::RegExp(a), Value::RegExp(b)) => a == b,
            (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Fraction> for Value {
    fn from(f: Fraction) -> Self {
        Value::Fraction(f)
    }
}

impl From<Complex<f64>> for Value {
    fn from(c: Complex<f64>) -> Self {
        Value::Complex(c)
    }
}

impl From<DMatrix<f64>> for Value {
    fn from(m: DMatrix<f64>) -> Self {
        Value::DenseMatrix(m)
    }
}

impl From<RustBigFloat> for Value {
    fn from(b: RustBigFloat) -> Self {
        Value::BigNumber(b)
    }
}

impl From<TypedFunction> for Value {
    fn from(f: TypedFunction) -> Self {
        Value::Function(f)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::BigNumber(b) => write!(f, "{}", b),
            Value::Fraction(fr) => write!(f, "{}", fr),
            Value::Complex(c) => {
                if c.im < 0.0 {
                    write!(f, "{} - {}i", c.re, -c.im)
                } else {
                    write!(f, "{} + {}i", c.re, c.im)
                }
            }
            Value::Unit(u) => write!(f, "{}", u),
            Value::Array(items) => write_list(f, items),
            Value::DenseMatrix(m) => {
                write!(f, "[")?;
                for r in 0..m.nrows() {
                    if r > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[")?;
                    for c in 0..m.ncols() {
                        if c > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", m[(r, c)])?;
                    }
                    write!(f, "]")?;
                }
                write!(f, "]")
            }
            Value::SparseMatrix(s) => write!(f, "{}", s),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Function(func) => write!(f, "function {}", func.name()),
            Value::RegExp(r) => write!(f, "{}", r),
            Value::Null => write!(f, "null"),
            Value::Undefined => write!(f, "undefined"),
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}
