//! Per-request caching policies.
//!
//! Requests to the remote data-API origin use Network-First with a cache
//! fallback and a synthetic offline response as the last resort. Every
//! other HTTP(S) request uses Cache-First with a network fallback.
//! Non-HTTP(S) schemes pass through untouched.

use tracing::warn;

use crate::config::Config;
use crate::net::{Destination, FetchError, FetchedResponse, Fetcher, PageRequest};

use super::Generation;

/// Status of the synthetic response returned when both network and cache
/// miss on the API path.
const OFFLINE_STATUS: u16 = 503;

/// Status of the placeholder returned for images when both cache and
/// network miss.
const IMAGE_MISS_STATUS: u16 = 404;

/// Where a strategy's response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    Synthetic,
}

/// The policy chosen for an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    NetworkFirst,
    CacheFirst,
    Passthrough,
}

impl FetchStrategy {
    pub fn select(request: &PageRequest, config: &Config) -> Self {
        if !request.is_http() {
            return FetchStrategy::Passthrough;
        }
        if config.is_api_origin(&request.url) {
            FetchStrategy::NetworkFirst
        } else {
            FetchStrategy::CacheFirst
        }
    }
}

/// The offline JSON envelope pages already know how to render: an error
/// flag, a reason, and an empty story list.
fn synthetic_offline_response(reason: &str) -> FetchedResponse {
    let body = serde_json::json!({
        "error": true,
        "message": reason,
        "listStory": [],
    });
    FetchedResponse {
        status: OFFLINE_STATUS,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: body.to_string().into_bytes(),
    }
}

/// Network-First-with-Cache-Fallback, for API data.
pub async fn network_first(
    generation: &Generation,
    fetcher: &dyn Fetcher,
    request: &PageRequest,
) -> Result<(FetchedResponse, ResponseSource), FetchError> {
    match fetcher.fetch(request).await {
        Ok(response) => {
            // Only successful GETs are cached; the snapshot and the
            // returned response share the one body read off the wire
            if request.is_get() && response.ok() {
                if let Err(e) = generation.store(&request.method, &request.url, &response) {
                    warn!(url = %request.url, error = %e, "Failed to cache API response");
                }
            }
            Ok((response, ResponseSource::Network))
        }
        Err(e) => {
            if !request.is_get() {
                // Mutations are never served from cache; the page layer
                // reacts to this failure by queueing the submission
                return Err(e);
            }
            match generation.lookup(&request.method, &request.url) {
                Ok(Some(cached)) => Ok((cached.into_response(), ResponseSource::Cache)),
                Ok(None) => Ok((
                    synthetic_offline_response(&e.to_string()),
                    ResponseSource::Synthetic,
                )),
                Err(cache_err) => {
                    warn!(url = %request.url, error = %cache_err, "Cache fallback unreadable");
                    Ok((
                        synthetic_offline_response(&e.to_string()),
                        ResponseSource::Synthetic,
                    ))
                }
            }
        }
    }
}

/// Cache-First-with-Network-Fallback, for application assets.
pub async fn cache_first(
    generation: &Generation,
    fetcher: &dyn Fetcher,
    request: &PageRequest,
) -> Result<(FetchedResponse, ResponseSource), FetchError> {
    match generation.lookup(&request.method, &request.url) {
        Ok(Some(cached)) => return Ok((cached.into_response(), ResponseSource::Cache)),
        Ok(None) => {}
        Err(e) => {
            warn!(url = %request.url, error = %e, "Cache lookup failed, trying network")
        }
    }

    match fetcher.fetch(request).await {
        Ok(response) => {
            if request.is_get() && response.ok() {
                if let Err(e) = generation.store(&request.method, &request.url, &response) {
                    warn!(url = %request.url, error = %e, "Failed to cache asset");
                }
            }
            Ok((response, ResponseSource::Network))
        }
        Err(e) => {
            if request.destination == Destination::Image {
                // Pages render a placeholder for missing images
                let placeholder = FetchedResponse {
                    status: IMAGE_MISS_STATUS,
                    headers: Vec::new(),
                    body: Vec::new(),
                };
                Ok((placeholder, ResponseSource::Synthetic))
            } else {
                Err(e)
            }
        }
    }
}
