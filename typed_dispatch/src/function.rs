//! The typed-function object.
//!
//! A `TypedFunction` owns its parsed signatures, the dispatch table built from
//! them and a resolution cache. It shares the catalog (types and conversions)
//! with the `Typed` context that created it, so types registered later are
//! visible to existing functions.
//!
//! Implementations receive the function itself as their first argument, which
//! is how an implementation dispatches back into its own function (for
//! example a collection signature calling the scalar signature per element).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::{AmbiguityPolicy, DispatchConfig};
use crate::conversion::ConversionGraph;
use crate::dispatch::{
    diagnose, resolve, DispatchTable, Resolution, ResolutionCache, ResolveContext,
};
use crate::error::{ConfigError, Error, Result, TypeError};
use crate::signature::{parse_signature, ParsedSignature};
use crate::typed::Catalog;
use crate::value::Value;

/// A signature's implementation. Variadic arguments arrive as the trailing
/// part of the slice.
pub type Implementation = Rc<dyn Fn(&TypedFunction, &[Value]) -> Result<Value>>;

/// Wrap a closure as an [`Implementation`].
pub fn implementation(
    f: impl Fn(&TypedFunction, &[Value]) -> Result<Value> + 'static,
) -> Implementation {
    Rc::new(f)
}

#[derive(Clone)]
pub(crate) struct SignatureEntry {
    pub(crate) signature: ParsedSignature,
    /// Canonical text of `signature`.
    pub(crate) text: String,
    pub(crate) implementation: Implementation,
}

impl SignatureEntry {
    pub(crate) fn new(signature: ParsedSignature, implementation: Implementation) -> Self {
        Self {
            text: signature.to_string(),
            signature,
            implementation,
        }
    }
}

struct Inner {
    name: String,
    entries: Vec<SignatureEntry>,
    table: DispatchTable,
    catalog: Rc<RefCell<Catalog>>,
    config: DispatchConfig,
    cache: ResolutionCache,
}

/// A callable set of signatures. Cloning is cheap and keeps the identity.
#[derive(Clone)]
pub struct TypedFunction {
    inner: Rc<Inner>,
}

impl TypedFunction {
    /// Build from already parsed and validated entries. Entries with the same
    /// signature key must share one implementation; those are collapsed.
    /// Optional parameters are compared per accepted arity, so
    /// `"number, string?"` and `"number"` collide on `(number)`.
    pub(crate) fn build(
        name: &str,
        entries: Vec<SignatureEntry>,
        catalog: Rc<RefCell<Catalog>>,
        config: DispatchConfig,
    ) -> std::result::Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::NoSignatures {
                function: name.to_string(),
            });
        }
        let mut unique: Vec<SignatureEntry> = Vec::with_capacity(entries.len());
        // Expanded key -> index into `unique`.
        let mut accepted: Vec<(String, usize)> = Vec::new();
        for entry in entries {
            let key = entry.signature.key();
            let same_entry = |e: &SignatureEntry| {
                e.signature.key() == key && Rc::ptr_eq(&e.implementation, &entry.implementation)
            };
            if unique.iter().any(same_entry) {
                continue;
            }
            let expanded: Vec<String> =
                entry.signature.expand().iter().map(ParsedSignature::key).collect();
            let conflict = accepted.iter().any(|(k, i)| {
                expanded.contains(k)
                    && !Rc::ptr_eq(&unique[*i].implementation, &entry.implementation)
            });
            if conflict {
                return Err(ConfigError::ConflictingSignature {
                    function: name.to_string(),
                    signature: entry.text,
                });
            }
            accepted.extend(expanded.into_iter().map(|k| (k, unique.len())));
            unique.push(entry);
        }

        let signatures: Vec<&ParsedSignature> = unique.iter().map(|e| &e.signature).collect();
        let table = DispatchTable::build(&signatures);
        tracing::debug!(
            function = name,
            signatures = unique.len(),
            nodes = table.node_count(),
            "built typed function"
        );
        Ok(Self {
            inner: Rc::new(Inner {
                name: name.to_string(),
                entries: unique,
                table,
                cache: ResolutionCache::new(config.cache_enabled()),
                catalog,
                config,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether both handles refer to the same function.
    pub fn ptr_eq(&self, other: &TypedFunction) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn entries(&self) -> &[SignatureEntry] {
        &self.inner.entries
    }

    pub(crate) fn shares_catalog(&self, catalog: &Rc<RefCell<Catalog>>) -> bool {
        Rc::ptr_eq(&self.inner.catalog, catalog)
    }

    /// `(signature, implementation)` pairs in declaration order.
    pub fn signatures(&self) -> impl Iterator<Item = (&str, &Implementation)> {
        self.inner
            .entries
            .iter()
            .map(|e| (e.text.as_str(), &e.implementation))
    }

    pub fn signature_strings(&self) -> Vec<String> {
        self.inner.entries.iter().map(|e| e.text.clone()).collect()
    }

    /// Dispatch on the runtime types of `args` and invoke the selected
    /// implementation. Errors raised by the implementation pass through.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        let resolution = self.resolution_for(args)?;
        self.invoke(&resolution, args)
    }

    fn invoke(&self, resolution: &Resolution, args: &[Value]) -> Result<Value> {
        let entry = &self.inner.entries[resolution.entry];
        let converted = resolution.apply(args)?;
        (entry.implementation)(self, &converted)
    }

    /// The matching step of [`call`](Self::call) without invoking anything.
    /// Returns `None` when no signature accepts `args`.
    pub fn resolve(&self, args: &[Value]) -> Option<ResolvedCall> {
        self.resolve_call(args).ok()
    }

    /// Like [`resolve`](Self::resolve), keeping the dispatch error.
    pub fn resolve_call(&self, args: &[Value]) -> Result<ResolvedCall> {
        let resolution = self.resolution_for(args)?;
        Ok(ResolvedCall {
            function: self.clone(),
            resolution,
        })
    }

    fn resolution_for(&self, args: &[Value]) -> Result<Rc<Resolution>> {
        let inner = &*self.inner;
        let catalog = inner.catalog.borrow();
        let arg_types: Vec<&str> = args.iter().map(|a| catalog.registry.type_of(a)).collect();
        let key: Vec<String> = arg_types.iter().map(|t| t.to_string()).collect();

        if let Some(hit) = inner.cache.get(&key, catalog.generation) {
            tracing::trace!(function = %inner.name, types = ?key, "resolution cache hit");
            return Ok(hit);
        }

        let ctx = ResolveContext {
            registry: &catalog.registry,
            conversions: &catalog.conversions,
            max_hops: inner.config.max_conversion_hops,
        };
        let Some(selection) = resolve(&inner.table, &arg_types, &ctx) else {
            let signatures: Vec<&ParsedSignature> =
                inner.entries.iter().map(|e| &e.signature).collect();
            let mismatch = diagnose(&signatures, &arg_types, &ctx);
            return Err(Error::Type(TypeError::NoMatchingSignature {
                function: inner.name.clone(),
                arg_types: key,
                signatures: self.signature_strings(),
                mismatch,
            }));
        };

        let chosen = selection.resolution.entry;
        if !selection.tied.is_empty() {
            let mut candidates = vec![inner.entries[chosen].text.clone()];
            candidates.extend(selection.tied.iter().map(|&i| inner.entries[i].text.clone()));
            match inner.config.ambiguity {
                AmbiguityPolicy::Error => {
                    return Err(Error::Type(TypeError::Ambiguous {
                        function: inner.name.clone(),
                        arg_types: key,
                        candidates,
                    }));
                }
                AmbiguityPolicy::FirstRegistered => tracing::warn!(
                    function = %inner.name,
                    types = ?key,
                    ?candidates,
                    "ambiguous call settled by registration order"
                ),
            }
        }

        tracing::trace!(
            function = %inner.name,
            types = ?key,
            signature = %inner.entries[chosen].text,
            cost = selection.resolution.cost(),
            "resolved"
        );
        let resolution = Rc::new(selection.resolution);
        inner
            .cache
            .insert(key, Rc::clone(&resolution), catalog.generation);
        Ok(resolution)
    }

    /// Look up one declared implementation by parameter types, bypassing
    /// dispatch. An exactly declared signature wins; otherwise the most
    /// specific signature accepting the types directly (no conversions).
    pub fn find(&self, types: &[&str]) -> Result<Implementation> {
        let requested = types.join(", ");
        let not_found = || {
            Error::Type(TypeError::SignatureNotFound {
                function: self.name().to_string(),
                signature: requested.clone(),
                signatures: self.signature_strings(),
            })
        };
        let Ok(wanted) = parse_signature(&requested) else {
            return Err(not_found());
        };

        let key = wanted.key();
        let exact = self
            .inner
            .entries
            .iter()
            .find(|e| e.signature.expand().iter().any(|s| s.key() == key));
        if let Some(entry) = exact {
            return Ok(Rc::clone(&entry.implementation));
        }

        if wanted.has_rest() || wanted.params.iter().any(|p| p.width() != 1) {
            return Err(not_found());
        }
        let arg_types: Vec<&str> = wanted.params.iter().map(|p| p.types[0].as_str()).collect();
        let catalog = self.inner.catalog.borrow();
        let no_conversions = ConversionGraph::new();
        let ctx = ResolveContext {
            registry: &catalog.registry,
            conversions: &no_conversions,
            max_hops: 1,
        };
        match resolve(&self.inner.table, &arg_types, &ctx) {
            Some(selection) => Ok(Rc::clone(
                &self.inner.entries[selection.resolution.entry].implementation,
            )),
            None => Err(not_found()),
        }
    }

    /// Number of cached resolutions.
    pub fn cache_len(&self) -> usize {
        self.inner.cache.len()
    }

    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// `(hits, misses)` of the resolution cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        self.inner.cache.stats()
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }
}

impl fmt::Debug for TypedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedFunction")
            .field("name", &self.inner.name)
            .field("signatures", &self.signature_strings())
            .field("cache", &self.inner.cache.is_enabled())
            .finish()
    }
}

/// A resolved call that has not run yet.
pub struct ResolvedCall {
    function: TypedFunction,
    resolution: Rc<Resolution>,
}

impl ResolvedCall {
    pub fn function(&self) -> &TypedFunction {
        &self.function
    }

    /// Canonical text of the selected signature.
    pub fn signature(&self) -> &str {
        &self.function.entries()[self.resolution.entry].text
    }

    pub fn implementation(&self) -> &Implementation {
        &self.function.entries()[self.resolution.entry].implementation
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Apply the resolved conversions to `args` and run the implementation.
    /// `args` are assumed to have the types the call was resolved for.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.function.invoke(&self.resolution, args)
    }
}

impl fmt::Debug for ResolvedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCall")
            .field("function", &self.function.name())
            .field("signature", &self.signature())
            .field("conversions", &self.resolution.conversions().count())
            .finish()
    }
}
