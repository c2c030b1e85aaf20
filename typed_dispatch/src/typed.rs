//! The typed context: one catalog of types and conversions plus the
//! configuration every typed function created from it uses.
//!
//! Build the catalog first, then create functions. Types and conversions added
//! later are seen by existing functions; each addition bumps the catalog
//! generation, which retires cached resolutions.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;
use crate::conversion::{Conversion, ConversionGraph};
use crate::error::{ConfigError, Result};
use crate::function::{Implementation, ResolvedCall, SignatureEntry, TypedFunction};
use crate::signature::{parse_signature, ParsedSignature};
use crate::types::{default_conversions, default_types, TypeDescriptor, TypeRegistry};
use crate::value::Value;

/// Types and conversions shared by every function of one context.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) registry: TypeRegistry,
    pub(crate) conversions: ConversionGraph,
    /// Incremented on every effective addition.
    pub(crate) generation: u64,
}

impl Catalog {
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn conversions(&self) -> &ConversionGraph {
        &self.conversions
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn check_known(
        &self,
        name: &str,
        context: impl FnOnce() -> String,
    ) -> std::result::Result<(), ConfigError> {
        if self.registry.contains(name) {
            Ok(())
        } else {
            Err(ConfigError::UnknownType {
                name: name.to_string(),
                context: context(),
            })
        }
    }

    fn check_signature(
        &self,
        function: &str,
        signature: &ParsedSignature,
    ) -> std::result::Result<(), ConfigError> {
        for param in &signature.params {
            for name in &param.types {
                self.check_known(name, || {
                    format!("signature \"{}\" of {}", signature, function)
                })?;
            }
        }
        Ok(())
    }
}

/// Serializable view of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub types: Vec<TypeInfo>,
    pub conversions: Vec<ConversionInfo>,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionInfo {
    pub from: String,
    pub to: String,
    pub cost: u32,
}

impl CatalogSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Default)]
pub struct Typed {
    catalog: Rc<RefCell<Catalog>>,
    config: DispatchConfig,
}

impl Typed {
    /// An empty catalog. Only `any` is known.
    pub fn new(config: DispatchConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog: Rc::default(),
            config,
        })
    }

    /// The library's default types and conversions with the default config.
    pub fn with_default_catalog() -> std::result::Result<Self, ConfigError> {
        let typed = Self::default();
        typed.install_default_catalog()?;
        Ok(typed)
    }

    /// Register the default types and conversions into this catalog.
    pub fn install_default_catalog(&self) -> std::result::Result<(), ConfigError> {
        for descriptor in default_types() {
            self.add_type(descriptor)?;
        }
        for conversion in default_conversions() {
            self.add_conversion(conversion)?;
        }
        Ok(())
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn add_type(&self, descriptor: TypeDescriptor) -> std::result::Result<(), ConfigError> {
        let mut catalog = self.catalog.borrow_mut();
        if catalog.registry.add_type(descriptor)? {
            catalog.generation += 1;
        }
        Ok(())
    }

    /// Register a conversion. Both endpoints must be registered types.
    pub fn add_conversion(&self, conversion: Conversion) -> std::result::Result<(), ConfigError> {
        let mut catalog = self.catalog.borrow_mut();
        for endpoint in [&conversion.from, &conversion.to] {
            catalog.check_known(endpoint, || {
                format!("conversion {} -> {}", conversion.from, conversion.to)
            })?;
        }
        if catalog.conversions.add_conversion(conversion)? {
            catalog.generation += 1;
        }
        Ok(())
    }

    /// Create a typed function from `(signature, implementation)` pairs.
    ///
    /// Every signature is parsed once here and its type names checked against
    /// the catalog.
    pub fn create(
        &self,
        name: &str,
        signatures: &[(&str, Implementation)],
    ) -> std::result::Result<TypedFunction, ConfigError> {
        let catalog = self.catalog.borrow();
        let mut entries = Vec::with_capacity(signatures.len());
        for (text, implementation) in signatures {
            let signature = parse_signature(text)?;
            catalog.check_signature(name, &signature)?;
            entries.push(SignatureEntry::new(signature, Rc::clone(implementation)));
        }
        drop(catalog);
        TypedFunction::build(name, entries, Rc::clone(&self.catalog), self.config.clone())
    }

    /// Union the signatures of `functions` into a new function with its own
    /// table and an empty cache. The sources are left untouched.
    pub fn merge(
        &self,
        name: &str,
        functions: &[&TypedFunction],
    ) -> std::result::Result<TypedFunction, ConfigError> {
        let catalog = self.catalog.borrow();
        let mut entries = Vec::new();
        for function in functions {
            for entry in function.entries() {
                if !function.shares_catalog(&self.catalog) {
                    catalog.check_signature(name, &entry.signature)?;
                }
                entries.push(entry.clone());
            }
        }
        drop(catalog);
        TypedFunction::build(name, entries, Rc::clone(&self.catalog), self.config.clone())
    }

    pub fn find(&self, function: &TypedFunction, types: &[&str]) -> Result<Implementation> {
        function.find(types)
    }

    pub fn resolve(&self, function: &TypedFunction, args: &[Value]) -> Option<ResolvedCall> {
        function.resolve(args)
    }

    pub fn is_typed_function(value: &Value) -> bool {
        matches!(value, Value::Function(_))
    }

    /// Most specific registered type of `value`, or `any`.
    pub fn type_of(&self, value: &Value) -> String {
        self.catalog.borrow().registry.type_of(value).to_string()
    }

    pub fn test_type(&self, name: &str, value: &Value) -> std::result::Result<bool, ConfigError> {
        self.catalog.borrow().registry.test_type(name, value)
    }

    pub fn catalog(&self) -> CatalogSnapshot {
        let catalog = self.catalog.borrow();
        CatalogSnapshot {
            types: catalog
                .registry
                .names()
                .map(|name| TypeInfo {
                    name: name.to_string(),
                    supertype: catalog.registry.supertype(name).map(str::to_string),
                })
                .collect(),
            conversions: catalog
                .conversions
                .edges()
                .iter()
                .map(|c| ConversionInfo {
                    from: c.from.clone(),
                    to: c.to.clone(),
                    cost: c.cost,
                })
                .collect(),
            generation: catalog.generation,
        }
    }

    /// Run `f` with read access to the live catalog.
    pub fn with_catalog<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        f(&self.catalog.borrow())
    }
}
