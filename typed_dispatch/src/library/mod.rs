//! A few library functions built on the default catalog.
//!
//! They exercise the registration API end to end: scalar signatures per
//! numeric type, collection signatures that dispatch back into their own
//! function, variadic folding, merging and callback specialisation.
//!
//! # Module Organization
//!
//! - `arithmetic.rs`: `add`, `abs`, `sum`
//! - `map.rs`: `map` over arrays and matrices with a typed callback

mod arithmetic;
mod map;

pub use arithmetic::{abs, add, sum};
pub use map::map;

use crate::error::{ConfigError, Error, Result};
use crate::function::TypedFunction;
use crate::typed::Typed;
use crate::value::Value;

/// The library functions, created together on one context.
#[derive(Debug, Clone)]
pub struct Library {
    pub add: TypedFunction,
    pub abs: TypedFunction,
    pub sum: TypedFunction,
    pub map: TypedFunction,
}

impl Library {
    pub fn new(typed: &Typed) -> std::result::Result<Self, ConfigError> {
        let add = add(typed)?;
        Ok(Self {
            abs: abs(typed)?,
            sum: sum(typed, &add)?,
            map: map(typed)?,
            add,
        })
    }
}

/// Argument `index` of a resolved call; signatures guarantee it exists.
fn arg(args: &[Value], index: usize) -> Result<&Value> {
    args.get(index)
        .ok_or_else(|| Error::raised(format!("missing argument {}", index)))
}

fn mismatched(function: &str, value: &Value) -> Error {
    Error::raised(format!(
        "{}: unexpected {} after dispatch",
        function,
        value.kind_name()
    ))
}
