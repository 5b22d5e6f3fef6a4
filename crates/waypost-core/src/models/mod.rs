//! Data models for Waypost entities.
//!
//! This module contains the data structures shared across the subsystem:
//!
//! - `Story`, `NewStory`: published and to-be-published posts
//! - Wire response envelopes: `StoryListResponse`, `StoryDetailResponse`,
//!   `ApiStatus`, `LoginResponse`
//! - `PendingStory`, `NewPendingStory`: the offline submission queue record
//! - `PushSubscription`: the push endpoint registration payload

pub mod pending;
pub mod push;
pub mod story;

pub use pending::{NewPendingStory, PendingStory};
pub use push::{PushSubscription, SubscriptionKeys};
pub use story::{
    ApiStatus, LoginResponse, LoginResult, NewStory, Story, StoryDetailResponse,
    StoryListResponse,
};
