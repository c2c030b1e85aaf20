//! Parsed signatures.
//!
//! A signature is written as a comma-separated parameter list:
//! `"number, Array|Matrix, ...string"`. Parameters are unions of type names
//! joined by `|`; a `...` prefix makes the last parameter variadic (zero or
//! more arguments) and a `?` suffix makes a trailing parameter optional.
//!
//! # Module Organization
//!
//! - `parsing.rs`: `parse_signature` and its validation rules

mod parsing;

pub use parsing::parse_signature;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ANY;

/// One parameter position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    /// Accepted type names, in declaration order, without duplicates.
    pub types: Vec<String>,
    /// Matches zero or more trailing arguments.
    pub rest: bool,
    /// May be omitted when trailing.
    pub optional: bool,
}

impl Param {
    pub fn is_any(&self) -> bool {
        self.types.iter().any(|t| t == ANY)
    }

    /// Number of union alternatives.
    pub fn width(&self) -> usize {
        self.types.len()
    }

    fn key(&self) -> String {
        let mut types: Vec<&str> = self.types.iter().map(String::as_str).collect();
        types.sort_unstable();
        format!(
            "{}{}{}",
            if self.rest { "..." } else { "" },
            types.join("|"),
            if self.optional { "?" } else { "" }
        )
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rest {
            write!(f, "...")?;
        }
        write!(f, "{}", self.types.join("|"))?;
        if self.optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A validated signature. Equal strings always parse to equal values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedSignature {
    pub params: Vec<Param>,
}

impl ParsedSignature {
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn has_rest(&self) -> bool {
        self.params.last().is_some_and(|p| p.rest)
    }

    pub fn rest_param(&self) -> Option<&Param> {
        self.params.last().filter(|p| p.rest)
    }

    /// Parameters that consume exactly one argument each.
    pub fn fixed_params(&self) -> &[Param] {
        if self.has_rest() {
            &self.params[..self.params.len() - 1]
        } else {
            &self.params
        }
    }

    /// Fewest arguments this signature accepts.
    pub fn min_arity(&self) -> usize {
        self.params.iter().filter(|p| !p.optional && !p.rest).count()
    }

    /// Most arguments this signature accepts, `None` when variadic.
    pub fn max_arity(&self) -> Option<usize> {
        if self.has_rest() {
            None
        } else {
            Some(self.params.len())
        }
    }

    /// Identity used to detect duplicate declarations: union order does not
    /// matter, so `"number|string"` and `"string|number"` collide.
    pub fn key(&self) -> String {
        self.params
            .iter()
            .map(Param::key)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Split optional parameters into one signature per accepted arity.
    /// `"number, string?"` expands to `"number"` and `"number, string"`.
    pub fn expand(&self) -> Vec<ParsedSignature> {
        let required = self.params.iter().take_while(|p| !p.optional).count();
        if required == self.params.len() {
            return vec![self.clone()];
        }
        (required..=self.params.len())
            .map(|len| ParsedSignature {
                params: self.params[..len]
                    .iter()
                    .map(|p| Param {
                        optional: false,
                        ..p.clone()
                    })
                    .collect(),
            })
            .collect()
    }
}

impl fmt::Display for ParsedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        Ok(())
    }
}
