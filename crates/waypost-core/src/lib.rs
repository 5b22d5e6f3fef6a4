//! Core library for Waypost, an offline-first client for sharing short
//! location-tagged posts ("stories").
//!
//! The crate implements the offline-resilience subsystem:
//!
//! - `cache`: versioned cache generations and the per-request caching
//!   strategies (Cache-First for assets, Network-First for API data)
//! - `store`: the durable local database holding the offline submission
//!   queue and the favorites collection
//! - `worker`: the background process - install/activate lifecycle, fetch
//!   interception, queue draining on reconnect, push notification delivery
//! - `api`: the consumed remote story API client
//! - `service`: the page-facing submit flow that falls back to the queue
//!   when the network is unreachable
//!
//! Everything outside this subsystem (rendering, routing, token storage)
//! is an external collaborator; the bearer token is consumed as an opaque
//! string.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod net;
pub mod service;
pub mod store;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, StoryApi, StorySubmitter};
pub use cache::{CacheError, CacheStore, FetchStrategy, ResponseSource};
pub use config::Config;
pub use net::{Destination, FetchError, FetchedResponse, Fetcher, HttpFetcher, PageRequest};
pub use service::{StoryService, Submission};
pub use store::{Database, FavoriteStore, PendingStore, StoreError};
pub use worker::{ClientMessage, ClientRegistry, NotificationSink, SyncScheduler, Worker};
