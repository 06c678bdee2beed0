//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TIERSTORE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::cache::CacheErrorPolicy;
use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_RUNTIME_CAPACITY};

/// Object store configuration.
///
/// Use [`StoreConfig::from_env`] to read `TIERSTORE_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// TTL for Tier 1 entries; zero disables expiry. Default: one hour.
    pub cache_ttl: Duration,

    /// Handling of Tier 1 backend errors. Default: [`CacheErrorPolicy::Log`].
    pub cache_error_policy: CacheErrorPolicy,

    /// Max objects held in Tier 0. Default: `10_000`.
    pub runtime_capacity: u64,

    /// Default for [`crate::store::GetOptions::use_cache`]. Default: `true`.
    pub use_cache: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_error_policy: CacheErrorPolicy::default(),
            runtime_capacity: DEFAULT_RUNTIME_CAPACITY,
            use_cache: true,
        }
    }
}

impl StoreConfig {
    const ENV_CACHE_TTL_SECS: &'static str = "TIERSTORE_CACHE_TTL_SECS";
    const ENV_CACHE_ERROR_POLICY: &'static str = "TIERSTORE_CACHE_ERROR_POLICY";
    const ENV_RUNTIME_CAPACITY: &'static str = "TIERSTORE_RUNTIME_CAPACITY";
    const ENV_USE_CACHE: &'static str = "TIERSTORE_USE_CACHE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_ttl = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_CACHE_TTL_SECS,
            defaults.cache_ttl.as_secs(),
        )?);
        let cache_error_policy = Self::parse_policy_from_env(defaults.cache_error_policy)?;
        let runtime_capacity =
            Self::parse_u64_from_env(Self::ENV_RUNTIME_CAPACITY, defaults.runtime_capacity)?;
        let use_cache = Self::parse_bool_from_env(Self::ENV_USE_CACHE, defaults.use_cache)?;

        let config = Self {
            cache_ttl,
            cache_error_policy,
            runtime_capacity,
            use_cache,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runtime_capacity == 0 {
            return Err(ConfigError::ZeroRuntimeCapacity);
        }
        Ok(())
    }

    fn parse_u64_from_env(name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(name) {
            Ok(value) => match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidBool { name, value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_policy_from_env(default: CacheErrorPolicy) -> Result<CacheErrorPolicy, ConfigError> {
        match env::var(Self::ENV_CACHE_ERROR_POLICY) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPolicy { value }),
            Err(_) => Ok(default),
        }
    }
}
