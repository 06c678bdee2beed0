//! What to do when the distributed cache fails mid-lookup.

use tracing::{debug, warn};

use super::error::CacheBackendError;

/// Handling of Tier 1 backend errors. Table and cryptographic errors are never subject to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheErrorPolicy {
    /// Propagate the error to the caller.
    Throw,
    /// Log a warning and continue as if the cache missed.
    #[default]
    Log,
    /// Continue silently as if the cache missed.
    Ignore,
}

impl CacheErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheErrorPolicy::Throw => "throw",
            CacheErrorPolicy::Log => "log",
            CacheErrorPolicy::Ignore => "ignore",
        }
    }

    /// Applies the policy: `Err` means the caller must fail, `Ok` means degrade and continue.
    pub fn handle(self, error: CacheBackendError) -> Result<(), CacheBackendError> {
        match self {
            CacheErrorPolicy::Throw => Err(error),
            CacheErrorPolicy::Log => {
                warn!(error = %error, "Cache backend error, continuing without cache");
                Ok(())
            }
            CacheErrorPolicy::Ignore => {
                debug!(error = %error, "Cache backend error ignored");
                Ok(())
            }
        }
    }
}

impl std::str::FromStr for CacheErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "throw" => Ok(Self::Throw),
            "log" => Ok(Self::Log),
            "ignore" => Ok(Self::Ignore),
            _ => Err(format!("Unknown cache error policy: {}", s)),
        }
    }
}

impl std::fmt::Display for CacheErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
