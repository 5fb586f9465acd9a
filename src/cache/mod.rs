//! Cache Module
//!
//! Expiring, namespaced key-value cache over a durable backing store.

mod clock;
mod entry;
mod expiring;
mod fetch;
mod keys;
mod stats;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use expiring::{CacheConfig, ExpiringCache, DEFAULT_PREFIX, DEFAULT_TTL};
pub use fetch::Sourced;
pub use keys::CacheKey;
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
