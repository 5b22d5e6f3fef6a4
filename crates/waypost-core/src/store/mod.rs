//! Durable local store for offline data.
//!
//! One fixed SQLite database holds two independent collections:
//! `pending_stories` (the offline submission queue) and
//! `favorite_stories` (the favorites feature's records, sharing the
//! schema lifecycle). Schema upgrades are additive-only; collections and
//! rows are never dropped when the version increases.
//!
//! Store handles are scoped per call: each operation opens a connection,
//! performs one logical operation, and releases it on every exit path.
//! A connection is never held across a network round trip.

pub mod database;
pub mod favorites;
pub mod pending;

pub use database::{Database, StoreError};
pub use favorites::{FavoriteStore, FavoriteStory};
pub use pending::PendingStore;
