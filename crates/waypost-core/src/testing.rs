//! Shared test doubles: a scripted network, a scripted story submitter,
//! and a recording notification sink.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, StorySubmitter};
use crate::models::NewStory;
use crate::net::{FetchError, FetchedResponse, Fetcher, PageRequest};
use crate::worker::push::{Notification, NotificationSink, NotifyError};

pub(crate) fn ok_response(body: &[u8]) -> FetchedResponse {
    FetchedResponse {
        status: 200,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: body.to_vec(),
    }
}

/// Fetcher that serves canned responses per URL and can be switched
/// offline; records every fetch it sees.
pub(crate) struct ScriptedFetcher {
    responses: Mutex<HashMap<String, FetchedResponse>>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn respond(&self, url: &str, response: FetchedResponse) {
        self.responses.lock().unwrap().insert(url.to_string(), response);
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<FetchedResponse, FetchError> {
        self.calls.lock().unwrap().push(request.url.to_string());
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Network("offline".to_string()));
        }
        self.responses
            .lock()
            .unwrap()
            .get(request.url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Network(format!("no route to {}", request.url)))
    }
}

/// Submitter that accepts everything except descriptions it was told to
/// fail, and records accepted submissions.
pub(crate) struct ScriptedSubmitter {
    failing: Mutex<HashSet<String>>,
    rejecting: Mutex<HashSet<String>>,
    accepted: Mutex<Vec<(String, NewStory)>>,
    offline: AtomicBool,
}

impl ScriptedSubmitter {
    pub(crate) fn new() -> Self {
        Self {
            failing: Mutex::new(HashSet::new()),
            rejecting: Mutex::new(HashSet::new()),
            accepted: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Fail submissions with this description with a network-class error
    pub(crate) fn fail_on(&self, description: &str) {
        self.failing.lock().unwrap().insert(description.to_string());
    }

    /// Reject submissions with this description with a server error
    pub(crate) fn reject_on(&self, description: &str) {
        self.rejecting.lock().unwrap().insert(description.to_string());
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn accepted(&self) -> Vec<(String, NewStory)> {
        self.accepted.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorySubmitter for ScriptedSubmitter {
    async fn submit_story(&self, token: &str, story: &NewStory) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Network("offline".to_string()));
        }
        if self.failing.lock().unwrap().contains(&story.description) {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        if self.rejecting.lock().unwrap().contains(&story.description) {
            return Err(ApiError::ServerError("photo too large".to_string()));
        }
        self.accepted
            .lock()
            .unwrap()
            .push((token.to_string(), story.clone()));
        Ok(())
    }
}

/// Notification sink that records what was shown, optionally rejecting
/// every display call.
pub(crate) struct RecordingSink {
    shown: Mutex<Vec<Notification>>,
    reject: AtomicBool,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            reject: AtomicBool::new(false),
        }
    }

    pub(crate) fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    pub(crate) fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn show(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected("permission revoked".to_string()));
        }
        self.shown.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
