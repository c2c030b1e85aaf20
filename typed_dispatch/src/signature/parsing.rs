//! Signature string parsing.

use super::{Param, ParsedSignature};
use crate::error::ConfigError;
use crate::types::ANY;

fn malformed(signature: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::MalformedSignature {
        signature: signature.to_string(),
        reason: reason.into(),
    }
}

fn is_type_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Split on commas, trimming each parameter. Unions never contain a comma,
/// so every comma separates two parameters.
fn split_params(signature: &str) -> Vec<&str> {
    if signature.trim().is_empty() {
        return Vec::new();
    }
    signature.split(',').map(str::trim).collect()
}

fn parse_param(signature: &str, text: &str) -> Result<Param, ConfigError> {
    if text.is_empty() {
        return Err(malformed(signature, "empty parameter"));
    }
    let (rest, text) = match text.strip_prefix("...") {
        Some(stripped) => (true, stripped.trim_start()),
        None => (false, text),
    };
    let (optional, text) = match text.strip_suffix('?') {
        Some(stripped) => (true, stripped.trim_end()),
        None => (false, text),
    };
    if rest && optional {
        return Err(malformed(signature, "a rest parameter cannot be optional"));
    }

    let mut types: Vec<String> = Vec::new();
    for alternative in text.split('|').map(str::trim) {
        let name = if alternative == "*" { ANY } else { alternative };
        if !is_type_name(name) {
            return Err(malformed(
                signature,
                format!("invalid type name \"{}\"", alternative),
            ));
        }
        if !types.iter().any(|t| t == name) {
            types.push(name.to_string());
        }
    }
    Ok(Param {
        types,
        rest,
        optional,
    })
}

/// Parse a signature string such as `"number, ...Array|Matrix"`.
///
/// The empty string is the zero-argument signature. Fails when a rest
/// parameter is not last, appears twice, follows an optional parameter, or
/// when an optional parameter precedes a required one.
///
/// # Examples
/// ```
/// use typed_dispatch::signature::parse_signature;
///
/// let sig = parse_signature("number, ...string|boolean").unwrap();
/// assert_eq!(sig.len(), 2);
/// assert!(sig.has_rest());
/// assert_eq!(sig.to_string(), "number, ...string|boolean");
/// ```
pub fn parse_signature(signature: &str) -> Result<ParsedSignature, ConfigError> {
    let params = split_params(signature)
        .into_iter()
        .map(|text| parse_param(signature, text))
        .collect::<Result<Vec<_>, _>>()?;

    let rest_count = params.iter().filter(|p| p.rest).count();
    if rest_count > 1 {
        return Err(malformed(signature, "more than one rest parameter"));
    }
    if rest_count == 1 && !params.last().is_some_and(|p| p.rest) {
        return Err(malformed(signature, "the rest parameter must be last"));
    }
    let mut seen_optional = false;
    for param in &params {
        if param.optional {
            seen_optional = true;
        } else if seen_optional {
            if param.rest {
                return Err(malformed(
                    signature,
                    "a rest parameter cannot follow an optional parameter",
                ));
            }
            return Err(malformed(
                signature,
                "an optional parameter cannot precede a required parameter",
            ));
        }
    }
    Ok(ParsedSignature { params })
}
