//! Conversion graph: registered, costed, one-directional value conversions.
//!
//! A conversion lets a call reach a signature whose parameter type the
//! argument does not have. Lookups return candidate paths sorted by total cost
//! and then by declaration order, so the cheapest choice is deterministic.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{ConfigError, Result};
use crate::types::TypeRegistry;
use crate::value::Value;

pub type ConvertFn = Rc<dyn Fn(&Value) -> Result<Value>>;

/// A directed, weighted conversion edge.
#[derive(Clone)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub convert: ConvertFn,
    pub cost: u32,
}

impl Conversion {
    pub fn new(
        from: &str,
        to: &str,
        cost: u32,
        convert: impl Fn(&Value) -> Result<Value> + 'static,
    ) -> Self {
        Self::with_fn(from, to, cost, Rc::new(convert))
    }

    pub fn with_fn(from: &str, to: &str, cost: u32, convert: ConvertFn) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            convert,
            cost,
        }
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

/// A chain of conversion edges applied to one argument.
#[derive(Debug, Clone)]
pub struct ConversionPath {
    steps: Vec<Rc<Conversion>>,
    /// Declaration index of each step, the tiebreak between equal-cost paths.
    order: Vec<usize>,
    cost: u32,
}

impl ConversionPath {
    fn empty() -> Self {
        Self {
            steps: Vec::new(),
            order: Vec::new(),
            cost: 0,
        }
    }

    fn extended(&self, edge: &Rc<Conversion>, index: usize) -> Self {
        let mut next = self.clone();
        next.steps.push(Rc::clone(edge));
        next.order.push(index);
        next.cost = next.cost.saturating_add(edge.cost);
        next
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hops(&self) -> usize {
        self.steps.len()
    }

    pub fn source(&self) -> Option<&str> {
        self.steps.first().map(|c| c.from.as_str())
    }

    pub fn target(&self) -> Option<&str> {
        self.steps.last().map(|c| c.to.as_str())
    }

    fn visits(&self, type_name: &str) -> bool {
        self.steps.iter().any(|c| c.from == type_name || c.to == type_name)
    }

    /// Rank: cheaper first, then earlier-declared edges first.
    pub fn compare(&self, other: &ConversionPath) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.order.cmp(&other.order))
    }

    /// Run every step in order.
    pub fn apply(&self, value: &Value) -> Result<Value> {
        let mut current = value.clone();
        for step in &self.steps {
            current = (step.convert)(&current)?;
        }
        Ok(current)
    }
}

impl fmt::Display for ConversionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.steps.first() {
            Some(first) => {
                write!(f, "{}", first.from)?;
                for step in &self.steps {
                    write!(f, " -> {}", step.to)?;
                }
                write!(f, " (cost {})", self.cost)
            }
            None => write!(f, "(identity)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConversionGraph {
    edges: Vec<Rc<Conversion>>,
}

impl ConversionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an edge. Returns `Ok(false)` when the identical edge exists.
    pub fn add_conversion(
        &mut self,
        conversion: Conversion,
    ) -> std::result::Result<bool, ConfigError> {
        if conversion.from == conversion.to {
            return Err(ConfigError::SelfConversion {
                type_name: conversion.from,
            });
        }
        if let Some(existing) = self
            .edges
            .iter()
            .find(|c| c.from == conversion.from && c.to == conversion.to)
        {
            if Rc::ptr_eq(&existing.convert, &conversion.convert)
                && existing.cost == conversion.cost
            {
                return Ok(false);
            }
            return Err(ConfigError::DuplicateConversion {
                from: conversion.from,
                to: conversion.to,
            });
        }
        tracing::debug!(
            from = %conversion.from,
            to = %conversion.to,
            cost = conversion.cost,
            "registered conversion"
        );
        self.edges.push(Rc::new(conversion));
        Ok(true)
    }

    pub fn edges(&self) -> &[Rc<Conversion>] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every cheapest conversion path from `available` into one of `targets`.
    ///
    /// An edge applies when the current type is its source or a subtype of it;
    /// a path ends in a target when its last type equals a target or is a
    /// subtype of one. At most `max_hops` edges are chained and no type is
    /// visited twice. The result is sorted by cost, then declaration order.
    pub fn find_conversions(
        &self,
        targets: &[String],
        available: &str,
        registry: &TypeRegistry,
        max_hops: usize,
    ) -> Vec<ConversionPath> {
        let mut best: HashMap<&str, ConversionPath> = HashMap::new();
        let mut frontier = vec![ConversionPath::empty()];

        for _ in 0..max_hops {
            let mut next = Vec::new();
            for path in &frontier {
                let current = path.target().unwrap_or(available);
                for (index, edge) in self.edges.iter().enumerate() {
                    if edge.to == available
                        || path.visits(&edge.to)
                        || !registry.is_subtype(current, &edge.from)
                    {
                        continue;
                    }
                    let candidate = path.extended(edge, index);
                    let improves = best
                        .get(edge.to.as_str())
                        .map_or(true, |known| candidate.compare(known) == Ordering::Less);
                    if improves {
                        best.insert(edge.to.as_str(), candidate.clone());
                        next.push(candidate);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        let mut found: Vec<ConversionPath> = best
            .into_iter()
            .filter(|(reached, _)| targets.iter().any(|t| registry.is_subtype(reached, t)))
            .map(|(_, path)| path)
            .collect();
        found.sort_by(|a, b| a.compare(b));
        found
    }
}
