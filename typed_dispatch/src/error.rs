//! Error types for registration and dispatch.
//!
//! The dispatch core originates exactly two kinds of error:
//! - [`ConfigError`] while building the catalog or a typed function
//! - [`TypeError`] when a call matches no signature
//!
//! Anything an implementation or a conversion function raises travels as
//! [`Error::Raised`] (a message) or [`Error::Domain`] (a typed error) and is
//! passed through untouched.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// Registration-time errors. These are programmer errors in the library that
/// builds the catalog, not user input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("type \"{name}\" is already registered with a different test or supertype")]
    DuplicateType { name: String },

    #[error("type \"{name}\" declares unknown supertype \"{supertype}\"")]
    UnknownSupertype { name: String, supertype: String },

    #[error("unknown type \"{name}\" in {context}")]
    UnknownType { name: String, context: String },

    #[error("conversion from \"{type_name}\" to itself")]
    SelfConversion { type_name: String },

    #[error(
        "conversion from \"{from}\" to \"{to}\" is already registered with a different function or cost"
    )]
    DuplicateConversion { from: String, to: String },

    #[error("malformed signature \"{signature}\": {reason}")]
    MalformedSignature { signature: String, reason: String },

    #[error("conflicting implementations for signature \"{signature}\" in function {function}")]
    ConflictingSignature { function: String, signature: String },

    #[error("no signatures provided for function {function}")]
    NoSignatures { function: String },

    #[error("invalid dispatch configuration: {0}")]
    InvalidConfig(String),
}

/// Why the closest signature did not accept the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    UnexpectedType {
        index: usize,
        expected: Vec<String>,
        actual: String,
    },
    TooFewArguments {
        index: usize,
        expected: Vec<String>,
    },
    TooManyArguments {
        max: usize,
        actual: usize,
    },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::UnexpectedType {
                index,
                expected,
                actual,
            } => write!(
                f,
                "unexpected type of argument (expected: {}, actual: {}, index: {})",
                expected.join(" or "),
                actual,
                index
            ),
            Mismatch::TooFewArguments { index, expected } => write!(
                f,
                "too few arguments (expected: {}, index: {})",
                expected.join(" or "),
                index
            ),
            Mismatch::TooManyArguments { max, actual } => write!(
                f,
                "too many arguments (expected: {}, actual: {})",
                max, actual
            ),
        }
    }
}

fn call_text(function: &str, types: &[String]) -> String {
    format!("{}({})", function, types.join(", "))
}

fn signature_list(function: &str, signatures: &[String]) -> String {
    signatures
        .iter()
        .map(|s| format!("{}({})", function, s))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Dispatch errors raised while calling a typed function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// No signature accepts the arguments, directly or through conversions.
    #[error(
        "no signature of {function} matches {call}: {mismatch}; declared signatures: {declared}",
        call = call_text(.function, .arg_types),
        declared = signature_list(.function, .signatures)
    )]
    NoMatchingSignature {
        function: String,
        arg_types: Vec<String>,
        signatures: Vec<String>,
        mismatch: Mismatch,
    },

    /// Several signatures match with the same rank and the configuration
    /// asks for ambiguity to be reported.
    #[error(
        "ambiguous call {call}; equally specific signatures: {listed}",
        call = call_text(.function, .arg_types),
        listed = signature_list(.function, .candidates)
    )]
    Ambiguous {
        function: String,
        arg_types: Vec<String>,
        candidates: Vec<String>,
    },

    /// `find` was asked for a signature the function does not declare.
    #[error(
        "signature ({signature}) not found in {function}; declared signatures: {declared}",
        declared = signature_list(.function, .signatures)
    )]
    SignatureNotFound {
        function: String,
        signature: String,
        signatures: Vec<String>,
    },
}

/// Call-level error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raised by an implementation or a conversion function.
    #[error("{0}")]
    Raised(String),

    /// A typed error raised by an implementation, kept intact for the caller.
    #[error(transparent)]
    Domain(DomainError),
}

impl Error {
    pub fn raised(message: impl Into<String>) -> Self {
        Error::Raised(message.into())
    }

    pub fn domain(error: impl std::error::Error + 'static) -> Self {
        Error::Domain(DomainError(Rc::new(error)))
    }

    /// The typed error behind [`Error::Domain`], if it is an `E`.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Error::Domain(DomainError(inner)) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, Error::Type(_))
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Shared handle to an implementation's own error type. Two handles are equal
/// when they point at the same error.
#[derive(Clone)]
pub struct DomainError(Rc<dyn std::error::Error>);

impl fmt::Debug for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl std::error::Error for DomainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl PartialEq for DomainError {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_signature_message_lists_everything() {
        let err = TypeError::NoMatchingSignature {
            function: "add".to_string(),
            arg_types: vec!["string".to_string(), "number".to_string()],
            signatures: vec!["number, number".to_string(), "Complex, Complex".to_string()],
            mismatch: Mismatch::UnexpectedType {
                index: 0,
                expected: vec!["number".to_string(), "Complex".to_string()],
                actual: "string".to_string(),
            },
        };
        insta::assert_snapshot!(err.to_string(), @"no signature of add matches add(string, number): unexpected type of argument (expected: number or Complex, actual: string, index: 0); declared signatures: add(number, number), add(Complex, Complex)");
    }

    #[test]
    fn test_too_many_arguments_message() {
        let m = Mismatch::TooManyArguments { max: 2, actual: 3 };
        assert_eq!(m.to_string(), "too many arguments (expected: 2, actual: 3)");
    }

    #[test]
    fn test_raised_error_is_transparent() {
        let err = Error::raised("division by zero");
        assert_eq!(err.to_string(), "division by zero");
        assert!(!err.is_type_error());
        let err: Error = ConfigError::NoSignatures {
            function: "f".to_string(),
        }
        .into();
        assert!(err.is_config_error());
        assert_eq!(err.to_string(), "no signatures provided for function f");
    }
}
