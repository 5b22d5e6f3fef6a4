//! Cache generations and per-request caching strategies.
//!
//! A generation is a named, versioned directory of stored response
//! snapshots; at most one generation per purpose (application shell, API
//! data) is live at a time. Install populates the shell generation,
//! activation evicts everything not matching the two current names, and
//! bumping the configured cache version is the only full-eviction
//! mechanism.

pub mod lifecycle;
pub mod store;
pub mod strategy;

pub use lifecycle::{evict_stale, populate_shell};
pub use store::{CacheError, CacheStore, CachedResponse, Generation};
pub use strategy::{cache_first, network_first, FetchStrategy, ResponseSource};
