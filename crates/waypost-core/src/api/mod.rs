//! REST API client module for the remote story service.
//!
//! The API is consumed, not owned: JSON endpoints for auth and reads,
//! multipart for creation, bearer token auth throughout.
//!
//! `StorySubmitter` is the seam the sync coordinator and the submit flow
//! depend on, so tests can script acceptance and failure per story.

use async_trait::async_trait;

use crate::models::NewStory;

pub mod client;
pub mod error;

pub use client::StoryApi;
pub use error::ApiError;

/// The one call the offline queue needs from the remote API.
#[async_trait]
pub trait StorySubmitter: Send + Sync {
    /// Deliver one story. `Err(e)` with `e.is_network()` means the server
    /// was never reached and the submission is safe to retry.
    async fn submit_story(&self, token: &str, story: &NewStory) -> Result<(), ApiError>;
}
