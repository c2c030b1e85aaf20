//! Physical unit values.

use std::fmt;

/// A physical quantity: an optional magnitude and a unit name such as `cm`.
///
/// A unit without a magnitude (`Unit::named("cm")`) denotes the unit itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub value: Option<f64>,
    pub name: String,
}

impl Unit {
    pub fn new(value: f64, name: &str) -> Self {
        Self {
            value: Some(value),
            name: name.to_string(),
        }
    }

    pub fn named(name: &str) -> Self {
        Self {
            value: None,
            name: name.to_string(),
        }
    }

    /// Same unit with a new magnitude.
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value: Some(value),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{} {}", v, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
