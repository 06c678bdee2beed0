//! Tier 0 runtime memory, Tier 1 distributed cache contract and cache error policy.

pub mod backend;
pub mod entry;
pub mod error;
pub mod policy;
pub mod runtime;
pub mod types;


#[cfg(any(test, feature = "mock"))]
pub use backend::MockCache;
pub use backend::{DistributedCache, MemoryCache};
pub use entry::{CachedEntry, CachedPayload};
pub use error::{CacheBackendError, CacheResult};
pub use policy::CacheErrorPolicy;
pub use runtime::RuntimeMemory;
pub use types::Tier;
