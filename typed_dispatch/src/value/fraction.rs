//! Exact rational numbers.
//!
//! A `Fraction` is always stored normalised: the denominator is positive and
//! shares no factor with the numerator, so structural equality is numeric
//! equality.

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fraction {
    numer: BigInt,
    denom: BigInt,
}

impl Fraction {
    /// Create a normalised fraction. Fails on a zero denominator.
    pub fn new(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Result<Self> {
        let numer = numer.into();
        let denom = denom.into();
        if denom.is_zero() {
            return Err(Error::Raised("Fraction: division by zero".to_string()));
        }
        Ok(Self::normalized(numer, denom))
    }

    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self {
            numer: n.into(),
            denom: BigInt::one(),
        }
    }

    fn normalized(numer: BigInt, denom: BigInt) -> Self {
        if numer.is_zero() {
            return Self::from_integer(0);
        }
        let g = numer.gcd(&denom);
        let (mut numer, mut denom) = (numer / &g, denom / &g);
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        Self { numer, denom }
    }

    /// Exact conversion of a finite float through its shortest decimal form,
    /// so `0.1` becomes `1/10` rather than the binary expansion.
    pub fn from_f64(x: f64) -> Result<Self> {
        if !x.is_finite() {
            return Err(Error::Raised(format!(
                "Fraction: cannot represent {} as a fraction",
                x
            )));
        }
        Self::parse(&x.to_string())
    }

    /// Parse `"3/4"`, `"-2"` or a plain decimal like `"0.125"`.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::Raised(format!("Fraction: cannot parse \"{}\"", text));
        let text = text.trim();
        if let Some((n, d)) = text.split_once('/') {
            let numer: BigInt = n.trim().parse().map_err(|_| invalid())?;
            let denom: BigInt = d.trim().parse().map_err(|_| invalid())?;
            return Self::new(numer, denom);
        }
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let joined = format!("{}{}", int_part, frac_part);
        let mut numer: BigInt = joined.parse().map_err(|_| invalid())?;
        if negative {
            numer = -numer;
        }
        let denom = num_traits::pow(BigInt::from(10), frac_part.len());
        Self::new(numer, denom)
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    pub fn to_f64(&self) -> f64 {
        match (self.numer.to_f64(), self.denom.to_f64()) {
            (Some(n), Some(d)) => n / d,
            _ => f64::NAN,
        }
    }

    pub fn add(&self, other: &Fraction) -> Fraction {
        Self::normalized(
            &self.numer * &other.denom + &other.numer * &self.denom,
            &self.denom * &other.denom,
        )
    }

    pub fn abs(&self) -> Fraction {
        Self {
            numer: self.numer.abs(),
            denom: self.denom.clone(),
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// Number of significant decimal digits in the shortest representation of `x`.
///
/// Implicit conversions of plain numbers into exact types refuse inputs with
/// more than 15 significant digits, since those digits are float noise.
pub fn significant_digits(x: f64) -> usize {
    let sci = format!("{:e}", x.abs());
    let mantissa = sci.split('e').next().unwrap_or("");
    mantissa
        .chars()
        .filter(|c| c.is_ascii_digit())
        .skip_while(|c| *c == '0')
        .count()
}
