//! One-time specialisation of a user callback for a collection traversal.
//!
//! Collection functions call a callback with `(value, index, collection)`.
//! The callback may declare fewer parameters, so the traversal resolves it
//! once against the first element, keeps the widest arity that matches and
//! then calls the selected implementation directly for every element.
//! This is keyed by callback identity and element shape, which is why it is
//! kept apart from the per-function resolution cache.

use std::fmt;

use crate::error::Result;
use crate::function::{ResolvedCall, TypedFunction};
use crate::value::Value;

/// A callback bound to one signature. Calling it never dispatches.
pub struct SpecializedCallback {
    resolved: ResolvedCall,
    arity: usize,
}

impl SpecializedCallback {
    /// How many of `(value, index, collection)` the callback receives.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn signature(&self) -> &str {
        self.resolved.signature()
    }

    /// Run the bound implementation. Elements are assumed to have the shape
    /// of the sample the callback was specialised for.
    pub fn call(&self, value: &Value, index: &Value, collection: &Value) -> Result<Value> {
        match self.arity {
            1 => self.resolved.invoke(std::slice::from_ref(value)),
            2 => self.resolved.invoke(&[value.clone(), index.clone()]),
            _ => self
                .resolved
                .invoke(&[value.clone(), index.clone(), collection.clone()]),
        }
    }
}

impl fmt::Debug for SpecializedCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecializedCallback")
            .field("callback", &self.resolved.function().name())
            .field("signature", &self.signature())
            .field("arity", &self.arity)
            .finish()
    }
}

/// Resolve `callback` once for a sample element.
///
/// Tries `(value, index, collection)`, then `(value, index)`, then `(value)`.
/// When none resolves, the error is the one a plain call with the element
/// alone would raise.
pub fn specialize_callback(
    callback: &TypedFunction,
    value: &Value,
    index: &Value,
    collection: &Value,
) -> Result<SpecializedCallback> {
    let sample = [value.clone(), index.clone(), collection.clone()];
    let (resolved, arity) = match [3, 2]
        .into_iter()
        .find_map(|arity| callback.resolve(&sample[..arity]).map(|r| (r, arity)))
    {
        Some(found) => found,
        None => (callback.resolve_call(&sample[..1])?, 1),
    };
    tracing::trace!(
        callback = %callback.name(),
        signature = %resolved.signature(),
        arity,
        "specialized callback"
    );
    Ok(SpecializedCallback { resolved, arity })
}
