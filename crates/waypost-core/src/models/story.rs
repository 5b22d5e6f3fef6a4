use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published story as returned by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Story {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "photoUrl")]
    pub photo_url: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Story {
    /// Coordinates when the story is location-tagged
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A story submission before it reaches the server.
/// `photo` is the raw image bytes (JPEG/PNG, size-checked by the pages).
#[derive(Debug, Clone, PartialEq)]
pub struct NewStory {
    pub description: String,
    pub photo: Vec<u8>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Envelope of `GET /stories`. `listStory` is also the shape of the
/// synthetic offline response, with `error: true` and an empty list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryListResponse {
    pub error: bool,
    pub message: String,
    #[serde(rename = "listStory", default)]
    pub list_story: Vec<Story>,
}

/// Envelope of `GET /stories/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDetailResponse {
    pub error: bool,
    pub message: String,
    pub story: Story,
}

/// Plain status envelope returned by mutating endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    pub error: bool,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub error: bool,
    pub message: String,
    #[serde(rename = "loginResult")]
    pub login_result: LoginResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_story_list_response() {
        let json = r#"{
            "error": false,
            "message": "Stories fetched successfully",
            "listStory": [{
                "id": "story-FvU4u0Vp2S3PMsFg",
                "name": "Dimas",
                "description": "Lorem Ipsum",
                "photoUrl": "https://story-api.dicoding.dev/images/stories/photos-1.jpg",
                "createdAt": "2022-01-08T06:34:18.598Z",
                "lat": -10.212,
                "lon": -16.002
            }]
        }"#;

        let parsed: StoryListResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.error);
        assert_eq!(parsed.list_story.len(), 1);
        let story = &parsed.list_story[0];
        assert_eq!(story.id, "story-FvU4u0Vp2S3PMsFg");
        assert_eq!(story.coordinates(), Some((-10.212, -16.002)));
    }

    #[test]
    fn test_list_story_defaults_to_empty() {
        let json = r#"{"error": true, "message": "Offline & no cached data"}"#;
        let parsed: StoryListResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.error);
        assert!(parsed.list_story.is_empty());
    }

    #[test]
    fn test_story_without_location_has_no_coordinates() {
        let json = r#"{
            "id": "story-x", "name": "n", "description": "d",
            "photoUrl": "https://example.test/p.jpg",
            "createdAt": "2022-01-08T06:34:18.598Z",
            "lat": null, "lon": null
        }"#;
        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.coordinates(), None);
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{
            "error": false,
            "message": "success",
            "loginResult": {"userId": "user-yj5pc_LARC_AgK61", "name": "Arif", "token": "eyJhbGci"}
        }"#;
        let parsed: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.login_result.user_id, "user-yj5pc_LARC_AgK61");
        assert_eq!(parsed.login_result.token, "eyJhbGci");
    }
}
