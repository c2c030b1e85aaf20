use super::arg;
use crate::collection::{deep_map_indexed, first_element, index_value};
use crate::error::{ConfigError, Error};
use crate::function::{implementation, TypedFunction};
use crate::specialize::specialize_callback;
use crate::typed::Typed;

/// `map(collection, callback)`.
///
/// The callback is resolved once against the first element and may take
/// `(value)`, `(value, index)` or `(value, index, collection)`; the index is
/// the element's path as an `Array` of numbers.
pub fn map(typed: &Typed) -> Result<TypedFunction, ConfigError> {
    typed.create(
        "map",
        &[(
            "Array | Matrix, function",
            implementation(|_, args| {
                let collection = arg(args, 0)?;
                let callback = arg(args, 1)?
                    .as_function()
                    .ok_or_else(|| Error::raised("map: callback must be a function"))?;
                let Some((first, path)) = first_element(collection) else {
                    return Ok(collection.clone());
                };
                let specialized =
                    specialize_callback(callback, &first, &index_value(&path), collection)?;
                deep_map_indexed(collection, &mut |value, path| {
                    specialized.call(value, &index_value(path), collection)
                })
            }),
        )],
    )
}
