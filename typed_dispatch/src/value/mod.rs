//! Value module - runtime values the dispatch core operates over.
//!
//! Every library domain type is one variant of [`Value`]; the type registry
//! decides at call time which registered type name a value carries.
//!
//! # Module Organization
//!
//! - `value_enum.rs`: Value enum, constructors and Display
//! - `fraction.rs`: Fraction (normalised big rational)
//! - `unit.rs`: Unit (magnitude with a physical unit name)
//! - `matrix.rs`: SparseMatrix (compressed-column storage)
//! - `regex.rs`: RegexValue (compiled pattern plus its source)

mod fraction;
mod matrix;
mod regex;
mod unit;
mod value_enum;

pub use fraction::{significant_digits, Fraction};
pub use matrix::SparseMatrix;
pub use regex::RegexValue;
pub use unit::Unit;
pub use value_enum::Value;

// Re-export the numeric backends so callers can build values without naming the crates.
pub use astro_float::BigFloat as RustBigFloat;
pub use astro_float::RoundingMode as BigNumberRoundingMode;
pub use nalgebra::{Complex, DMatrix};

/// Precision of BigNumber values created by conversions (in bits).
pub const BIGNUMBER_PRECISION: usize = 256;

/// Parse a decimal string into a BigNumber at [`BIGNUMBER_PRECISION`].
///
/// Returns `None` when the text is not a decimal number.
pub fn parse_big_number(text: &str) -> Option<RustBigFloat> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut consts = astro_float::Consts::new().ok()?;
    let parsed = RustBigFloat::parse(
        trimmed,
        astro_float::Radix::Dec,
        BIGNUMBER_PRECISION,
        BigNumberRoundingMode::ToEven,
        &mut consts,
    );
    if parsed.is_nan() && !trimmed.to_lowercase().contains("nan") {
        return None;
    }
    Some(parsed)
}

/// Lossy BigNumber to f64, going through the decimal text.
pub fn big_number_to_f64(value: &RustBigFloat) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(f64::NAN)
}
