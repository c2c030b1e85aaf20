//! RegExp values.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Error, Result};

/// A compiled regular expression with its source pattern and flags.
#[derive(Debug, Clone)]
pub struct RegexValue {
    pub regex: Arc<Regex>,
    pub pattern: String,
    pub flags: String,
}

impl RegexValue {
    /// Create a RegexValue from a pattern and flags.
    ///
    /// Flags: `i` case-insensitive, `m` multiline, `s` dot matches newline,
    /// `x` free-spacing. They map onto the regex crate's inline flags.
    pub fn new(pattern: &str, flags: &str) -> Result<Self> {
        let mut prefix = String::new();
        for c in flags.chars() {
            match c {
                'i' => prefix.push_str("(?i)"),
                'm' => prefix.push_str("(?m)"),
                's' => prefix.push_str("(?s)"),
                'x' => prefix.push_str("(?x)"),
                _ => return Err(Error::Raised(format!("Unknown regex flag: {}", c))),
            }
        }
        let regex = Regex::new(&format!("{}{}", prefix, pattern))
            .map_err(|e| Error::Raised(format!("Invalid regex pattern: {}", e)))?;
        Ok(RegexValue {
            regex: Arc::new(regex),
            pattern: pattern.to_string(),
            flags: flags.to_string(),
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.flags == other.flags
    }
}

impl fmt::Display for RegexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.flags)
    }
}
