//! Dispatch machinery behind a typed function.
//!
//! # Module Organization
//!
//! - `table.rs`: prefix tree over argument positions, built once per function
//! - `resolver.rs`: matching walk, candidate ranking and mismatch diagnosis
//! - `cache.rs`: per-function memo of resolutions by argument type tuple

mod cache;
mod resolver;
mod table;

pub(crate) use cache::ResolutionCache;
pub use resolver::Resolution;
pub(crate) use resolver::{diagnose, resolve, ResolveContext};
pub(crate) use table::DispatchTable;
