//! Push payload parsing and notification construction.
//!
//! Inbound push payloads come from outside the app and cannot be
//! trusted: the parser chain is total. Structured JSON is tried first,
//! then a plain-text read, then defaults; nothing thrown by a payload
//! escapes this module.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Defaults used for any notification field the payload does not supply
pub const DEFAULT_TITLE: &str = "Waypost";
pub const DEFAULT_BODY: &str = "New story available!";
pub const DEFAULT_ICON: &str = "/images/icon-512x512.png";
pub const DEFAULT_CLICK_URL: &str = "/";

/// A parsed inbound push payload. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum PushPayload {
    Parsed(PushContent),
    PlainText(String),
    Empty,
}

/// Recognized fields of a structured push payload; everything is
/// optional and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushContent {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub data: Option<PushTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushTarget {
    pub url: Option<String>,
    #[serde(rename = "storyId")]
    pub story_id: Option<String>,
}

/// Total parser chain: structured JSON, then non-empty plain text, then
/// `Empty`. Never fails, whatever the bytes are.
pub fn parse_push_payload(data: Option<&[u8]>) -> PushPayload {
    let Some(bytes) = data else {
        return PushPayload::Empty;
    };
    if let Ok(content) = serde_json::from_slice::<PushContent>(bytes) {
        return PushPayload::Parsed(content);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.trim().is_empty() => PushPayload::PlainText(text.to_string()),
        _ => PushPayload::Empty,
    }
}

/// What gets displayed and where a click goes.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub click_url: String,
    pub story_id: Option<String>,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body: DEFAULT_BODY.to_string(),
            icon: DEFAULT_ICON.to_string(),
            click_url: DEFAULT_CLICK_URL.to_string(),
            story_id: None,
        }
    }
}

impl Notification {
    /// Map a payload onto a notification, filling absent fields from the
    /// defaults.
    pub fn from_payload(payload: PushPayload) -> Self {
        let defaults = Self::default();
        match payload {
            PushPayload::Empty => defaults,
            PushPayload::PlainText(text) => Self {
                body: text,
                ..defaults
            },
            PushPayload::Parsed(content) => {
                let target = content.data.unwrap_or_default();
                Self {
                    title: content.title.unwrap_or(defaults.title),
                    body: content.body.unwrap_or(defaults.body),
                    icon: content.icon.unwrap_or(defaults.icon),
                    click_url: target.url.unwrap_or(defaults.click_url),
                    story_id: target.story_id,
                }
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification display rejected: {0}")]
    Rejected(String),
}

/// Platform notification display, abstracted for testability. Display is
/// best-effort; callers swallow rejections.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn show(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// How the user interacted with a displayed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Clicked the notification body - route to the target URL
    Open,
    /// Used an explicit dismiss action - no routing
    Dismiss,
}

#[derive(Debug, Clone)]
pub struct NotificationClick {
    pub notification: Notification,
    pub action: ClickAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_payload_yields_defaults() {
        let notification = Notification::from_payload(parse_push_payload(None));
        assert_eq!(notification.title, DEFAULT_TITLE);
        assert_eq!(notification.body, DEFAULT_BODY);
        assert_eq!(notification.click_url, DEFAULT_CLICK_URL);
    }

    #[test]
    fn test_structured_payload_maps_fields() {
        let payload = parse_push_payload(Some(br#"{"title":"Hi","body":"There"}"#));
        let notification = Notification::from_payload(payload);
        assert_eq!(notification.title, "Hi");
        assert_eq!(notification.body, "There");
        // Absent fields fall back to defaults
        assert_eq!(notification.icon, DEFAULT_ICON);
        assert_eq!(notification.click_url, DEFAULT_CLICK_URL);
    }

    #[test]
    fn test_structured_payload_with_target() {
        let payload = parse_push_payload(Some(
            br#"{"title":"New story","data":{"url":"/stories/s-9","storyId":"s-9"}}"#,
        ));
        let notification = Notification::from_payload(payload);
        assert_eq!(notification.click_url, "/stories/s-9");
        assert_eq!(notification.story_id.as_deref(), Some("s-9"));
    }

    #[test]
    fn test_plain_text_becomes_body_verbatim() {
        let payload = parse_push_payload(Some(b"Hello"));
        assert_eq!(payload, PushPayload::PlainText("Hello".to_string()));

        let notification = Notification::from_payload(payload);
        assert_eq!(notification.body, "Hello");
        assert_eq!(notification.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_unparseable_bytes_fall_back_to_defaults() {
        // Invalid UTF-8 fails both the JSON and the text read
        let payload = parse_push_payload(Some(&[0xFF, 0xFE, 0x00]));
        assert_eq!(payload, PushPayload::Empty);

        // Whitespace-only text is treated as absent
        assert_eq!(parse_push_payload(Some(b"   \n")), PushPayload::Empty);
    }

    #[test]
    fn test_unknown_json_fields_are_ignored() {
        let payload = parse_push_payload(Some(br#"{"body":"b","badge":"/x.png"}"#));
        let PushPayload::Parsed(content) = payload else {
            panic!("expected structured parse");
        };
        assert_eq!(content.body.as_deref(), Some("b"));
    }
}
