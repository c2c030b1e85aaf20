//! The type registry: named runtime predicates plus a subtype forest.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::ConfigError;
use crate::value::Value;

/// The catch-all pseudo-type. Every value is an `any`; it is never registered.
pub const ANY: &str = "any";

/// Distance reported for a match against `any`, wider than any subtype chain.
pub const ANY_DISTANCE: u32 = 1_000;

/// Runtime type test. Must be pure.
pub type TypeTest = Rc<dyn Fn(&Value) -> bool>;

/// A registrable runtime type.
#[derive(Clone)]
pub struct TypeDescriptor {
    pub name: String,
    pub test: TypeTest,
    /// Direct supertype, which must already be registered.
    pub is_subtype_of: Option<String>,
}

impl TypeDescriptor {
    pub fn new(name: &str, test: impl Fn(&Value) -> bool + 'static) -> Self {
        Self::with_test(name, Rc::new(test))
    }

    /// Build from a shared test, so the same descriptor can be registered twice.
    pub fn with_test(name: &str, test: TypeTest) -> Self {
        Self {
            name: name.to_string(),
            test,
            is_subtype_of: None,
        }
    }

    pub fn subtype_of(mut self, parent: &str) -> Self {
        self.is_subtype_of = Some(parent.to_string());
        self
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("is_subtype_of", &self.is_subtype_of)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct TypeEntry {
    descriptor: TypeDescriptor,
    parent: Option<usize>,
}

/// Catalog of runtime-testable types.
///
/// Types are detected in an order where every type comes before its
/// supertypes; unrelated types keep registration order.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    index: HashMap<String, usize>,
    detection_order: Vec<usize>,
}

fn is_valid_type_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. Returns `Ok(false)` when the identical descriptor was
    /// already registered.
    pub fn add_type(&mut self, descriptor: TypeDescriptor) -> Result<bool, ConfigError> {
        if descriptor.name == ANY || descriptor.name == "*" {
            return Err(ConfigError::DuplicateType {
                name: descriptor.name,
            });
        }
        if !is_valid_type_name(&descriptor.name) {
            return Err(ConfigError::InvalidConfig(format!(
                "invalid type name \"{}\"",
                descriptor.name
            )));
        }
        if let Some(&existing) = self.index.get(&descriptor.name) {
            let entry = &self.entries[existing].descriptor;
            if Rc::ptr_eq(&entry.test, &descriptor.test)
                && entry.is_subtype_of == descriptor.is_subtype_of
            {
                return Ok(false);
            }
            return Err(ConfigError::DuplicateType {
                name: descriptor.name,
            });
        }
        let parent = match &descriptor.is_subtype_of {
            Some(parent_name) => match self.index.get(parent_name) {
                Some(&p) => Some(p),
                None => {
                    return Err(ConfigError::UnknownSupertype {
                        name: descriptor.name.clone(),
                        supertype: parent_name.clone(),
                    })
                }
            },
            None => None,
        };
        tracing::debug!(
            name = %descriptor.name,
            supertype = ?descriptor.is_subtype_of,
            "registered type"
        );
        self.index
            .insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(TypeEntry { descriptor, parent });
        self.rebuild_detection_order();
        Ok(true)
    }

    fn rebuild_detection_order(&mut self) {
        let n = self.entries.len();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, entry) in self.entries.iter().enumerate() {
            if let Some(p) = entry.parent {
                children[p].push(i);
            }
        }
        let mut emitted = vec![false; n];
        let mut order = Vec::with_capacity(n);
        for i in 0..n {
            emit_subtypes_first(i, &children, &mut emitted, &mut order);
        }
        self.detection_order = order;
    }

    pub fn contains(&self, name: &str) -> bool {
        name == ANY || self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.descriptor.name.as_str())
    }

    /// Registered names in detection order (subtypes before supertypes).
    pub fn detection_order(&self) -> impl Iterator<Item = &str> {
        self.detection_order
            .iter()
            .map(|&i| self.entries[i].descriptor.name.as_str())
    }

    pub fn supertype(&self, name: &str) -> Option<&str> {
        let &i = self.index.get(name)?;
        self.entries[i].descriptor.is_subtype_of.as_deref()
    }

    /// Apply the named type's test to `value`.
    pub fn test_type(&self, name: &str, value: &Value) -> Result<bool, ConfigError> {
        if name == ANY {
            return Ok(true);
        }
        match self.index.get(name) {
            Some(&i) => Ok((self.entries[i].descriptor.test)(value)),
            None => Err(ConfigError::UnknownType {
                name: name.to_string(),
                context: "test_type".to_string(),
            }),
        }
    }

    /// The most specific registered type of `value`, or `any`.
    pub fn type_of(&self, value: &Value) -> &str {
        self.detection_order
            .iter()
            .map(|&i| &self.entries[i].descriptor)
            .find(|d| (d.test)(value))
            .map_or(ANY, |d| d.name.as_str())
    }

    /// Number of supertype steps from `sub` up to `sup`, if `sub <: sup`.
    pub fn subtype_distance(&self, sub: &str, sup: &str) -> Option<u32> {
        if sub == sup {
            return Some(0);
        }
        if sup == ANY {
            return Some(ANY_DISTANCE);
        }
        let mut current = self.index.get(sub).copied();
        let mut steps = 0;
        while let Some(i) = current {
            if self.entries[i].descriptor.name == sup {
                return Some(steps);
            }
            steps += 1;
            current = self.entries[i].parent;
        }
        None
    }

    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        self.subtype_distance(sub, sup).is_some()
    }

    /// `name` followed by its supertypes, nearest first.
    pub fn ancestors<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        let mut chain = vec![name];
        let mut current = self.index.get(name).and_then(|&i| self.entries[i].parent);
        while let Some(i) = current {
            chain.push(self.entries[i].descriptor.name.as_str());
            current = self.entries[i].parent;
        }
        chain
    }
}

fn emit_subtypes_first(
    i: usize,
    children: &[Vec<usize>],
    emitted: &mut [bool],
    order: &mut Vec<usize>,
) {
    if emitted[i] {
        return;
    }
    emitted[i] = true;
    for &child in &children[i] {
        emit_subtypes_first(child, children, emitted, order);
    }
    order.push(i);
}
