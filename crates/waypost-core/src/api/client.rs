//! API client for communicating with the remote story REST API.
//!
//! This module provides the `StoryApi` struct for registration, login,
//! story reads, multipart story creation, and push subscription
//! management. Every authenticated call takes the bearer token as an
//! opaque argument; the client never stores or refreshes it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{
    ApiStatus, LoginResponse, NewStory, PushSubscription, StoryDetailResponse, StoryListResponse,
};

use super::{ApiError, StorySubmitter};

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// File name sent for the multipart photo part; the server only inspects
/// the bytes.
const PHOTO_FILE_NAME: &str = "photo.jpg";

/// API client for the remote story service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct StoryApi {
    client: Client,
    base_url: String,
}

impl StoryApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Register a new account
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<ApiStatus, ApiError> {
        let url = format!("{}/register", self.base_url);
        let body = serde_json::json!({ "name": name, "email": email, "password": password });

        let response = self.client.post(&url).json(&body).send().await?;
        Self::parse_json(response).await
    }

    /// Log in and obtain the bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/login", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self.client.post(&url).json(&body).send().await?;
        Self::parse_json(response).await
    }

    /// Fetch a page of stories, optionally with their coordinates
    pub async fn list_stories(
        &self,
        token: &str,
        page: u32,
        size: u32,
        location: bool,
    ) -> Result<StoryListResponse, ApiError> {
        let url = format!("{}/stories", self.base_url);
        let location = if location { "1" } else { "0" };

        let response = self
            .client
            .get(&url)
            .query(&[
                ("page", page.to_string()),
                ("size", size.to_string()),
                ("location", location.to_string()),
            ])
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse_json(response).await
    }

    /// Fetch a single story
    pub async fn story_detail(&self, token: &str, id: &str) -> Result<StoryDetailResponse, ApiError> {
        let url = format!("{}/stories/{}", self.base_url, id);

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        Self::parse_json(response).await
    }

    /// Multipart form shared by the authenticated and guest create endpoints
    fn story_form(story: &NewStory) -> Form {
        let mut form = Form::new()
            .text("description", story.description.clone())
            .part(
                "photo",
                Part::bytes(story.photo.clone()).file_name(PHOTO_FILE_NAME),
            );
        // Decimal-string coordinates, appended only when present
        if let Some(lat) = story.lat {
            form = form.text("lat", lat.to_string());
        }
        if let Some(lon) = story.lon {
            form = form.text("lon", lon.to_string());
        }
        form
    }

    /// Create a story for the authenticated user
    pub async fn create_story(&self, token: &str, story: &NewStory) -> Result<ApiStatus, ApiError> {
        let url = format!("{}/stories", self.base_url);
        debug!(bytes = story.photo.len(), "Posting story");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(Self::story_form(story))
            .send()
            .await?;
        Self::parse_json(response).await
    }

    /// Create a story without an account
    pub async fn create_guest_story(&self, story: &NewStory) -> Result<ApiStatus, ApiError> {
        let url = format!("{}/stories/guest", self.base_url);

        let response = self
            .client
            .post(&url)
            .multipart(Self::story_form(story))
            .send()
            .await?;
        Self::parse_json(response).await
    }

    /// Register a push subscription with the server
    pub async fn subscribe_push(
        &self,
        token: &str,
        subscription: &PushSubscription,
    ) -> Result<ApiStatus, ApiError> {
        let url = format!("{}/notifications/subscribe", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(subscription)
            .send()
            .await?;
        Self::parse_json(response).await
    }

    /// Remove a push subscription from the server
    pub async fn unsubscribe_push(&self, token: &str, endpoint: &str) -> Result<ApiStatus, ApiError> {
        let url = format!("{}/notifications/subscribe", self.base_url);
        let body = serde_json::json!({ "endpoint": endpoint });

        let response = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::parse_json(response).await
    }
}

#[async_trait]
impl StorySubmitter for StoryApi {
    async fn submit_story(&self, token: &str, story: &NewStory) -> Result<(), ApiError> {
        self.create_story(token, story).await.map(|_| ())
    }
}
