//! Runtime type system for dispatch.
//!
//! # Module Organization
//!
//! - `registry.rs`: TypeDescriptor, TypeRegistry (predicates + subtype forest)
//! - `builtin.rs`: the library's default types and conversion edges

pub(crate) mod builtin;
mod registry;

#[cfg(test)]
mod tests;

pub use builtin::{default_conversions, default_types, parse_complex};
pub use registry::{TypeDescriptor, TypeRegistry, TypeTest, ANY, ANY_DISTANCE};
