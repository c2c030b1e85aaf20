//! Dispatch configuration.
//!
//! A `DispatchConfig` can be built in code or loaded from TOML:
//!
//! ```toml
//! max_conversion_hops = 2
//! resolution_cache = true
//! ambiguity = "error"
//! ```
//!
//! Set `TYPED_DISPATCH_DISABLE_CACHE=1` to turn the resolution cache off for
//! every typed function regardless of the configured value.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

static CACHE_DISABLED_BY_ENV: Lazy<bool> =
    Lazy::new(|| std::env::var("TYPED_DISPATCH_DISABLE_CACHE").is_ok());

/// What to do when two candidate signatures rank equally and neither is more
/// specific than the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// The signature registered first wins.
    #[default]
    FirstRegistered,
    /// The call fails with `TypeError::Ambiguous`.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Maximum number of conversion edges applied to a single argument.
    pub max_conversion_hops: usize,
    /// Memoise resolutions per argument type tuple.
    pub resolution_cache: bool,
    pub ambiguity: AmbiguityPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_conversion_hops: 1,
            resolution_cache: true,
            ambiguity: AmbiguityPolicy::FirstRegistered,
        }
    }
}

impl DispatchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: DispatchConfig =
            toml::from_str(text).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_conversion_hops == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_conversion_hops must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether resolutions should be cached, after the environment override.
    pub fn cache_enabled(&self) -> bool {
        self.resolution_cache && !*CACHE_DISABLED_BY_ENV
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_gives_defaults() {
        assert_eq!(DispatchConfig::from_toml_str("").unwrap(), DispatchConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = DispatchConfig::from_toml_str(
            "max_conversion_hops = 3\nresolution_cache = false\nambiguity = \"error\"\n",
        )
        .unwrap();
        assert_eq!(
            config,
            DispatchConfig {
                max_conversion_hops: 3,
                resolution_cache: false,
                ambiguity: AmbiguityPolicy::Error,
            }
        );
        assert!(!config.cache_enabled());
    }

    #[test]
    fn test_unknown_key_and_zero_hops_rejected() {
        assert!(matches!(
            DispatchConfig::from_toml_str("cache = true"),
            Err(ConfigError::InvalidConfig(_))
        ));
        assert!(matches!(
            DispatchConfig::from_toml_str("max_conversion_hops = 0"),
            Err(ConfigError::InvalidConfig(_))
        ));
    }
}
