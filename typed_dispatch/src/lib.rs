//! Runtime multiple dispatch over dynamically typed values.
//!
//! A [`Typed`] context holds a catalog of named runtime types (predicates in a
//! subtype forest) and costed conversions between them. Typed functions are
//! created from `(signature, implementation)` pairs; every call picks the most
//! specific signature for the argument types, converting arguments when no
//! signature accepts them directly.
//!
//! ```
//! use typed_dispatch::{implementation, Typed, Value};
//!
//! let typed = Typed::with_default_catalog().unwrap();
//! let describe = typed
//!     .create(
//!         "describe",
//!         &[
//!             ("number", implementation(|_, _| Ok(Value::from("number")))),
//!             ("BigNumber", implementation(|_, _| Ok(Value::from("BigNumber")))),
//!         ],
//!     )
//!     .unwrap();
//! assert_eq!(describe.call(&[Value::from(1)]).unwrap(), Value::from("number"));
//! ```

// Library code reports through `tracing`, never straight to the terminal.
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]

pub mod collection;
pub mod config;
pub mod conversion;
mod dispatch;
pub mod error;
pub mod function;
pub mod library;
pub mod signature;
pub mod specialize;
pub mod typed;
pub mod types;
pub mod value;

pub use config::{AmbiguityPolicy, DispatchConfig};
pub use conversion::{Conversion, ConversionGraph, ConversionPath};
pub use dispatch::Resolution;
pub use error::{ConfigError, DomainError, Error, Mismatch, Result, TypeError};
pub use function::{implementation, Implementation, ResolvedCall, TypedFunction};
pub use signature::{parse_signature, Param, ParsedSignature};
pub use specialize::{specialize_callback, SpecializedCallback};
pub use typed::{Catalog, CatalogSnapshot, Typed};
pub use types::{TypeDescriptor, TypeRegistry, ANY};
pub use value::Value;
