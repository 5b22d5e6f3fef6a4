use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::story::NewStory;

/// A queued create-story submission awaiting network availability.
///
/// Created when a submission cannot reach the network, deleted only after
/// the server accepts it during a sync pass. Records are never mutated in
/// place; `synced` stays false for as long as the record exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingStory {
    /// Store-assigned, monotonically unique identity
    pub id: i64,
    pub description: String,
    pub photo: Vec<u8>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Bearer token captured at submission time, replayed during sync
    pub token: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub synced: bool,
}

impl PendingStory {
    /// Rebuild the submission payload for the sync pass
    pub fn to_new_story(&self) -> NewStory {
        NewStory {
            description: self.description.clone(),
            photo: self.photo.clone(),
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// A pending story before the store assigns its identity and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPendingStory {
    pub description: String,
    pub photo: Vec<u8>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub token: String,
}

impl NewPendingStory {
    pub fn from_story(story: &NewStory, token: &str) -> Self {
        Self {
            description: story.description.clone(),
            photo: story.photo.clone(),
            lat: story.lat,
            lon: story.lon,
            token: token.to_string(),
        }
    }
}
