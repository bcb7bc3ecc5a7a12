//! Archived message record and the client-supplied draft.
//!
//! The backend stores one entity: an archived Telegram channel post. The
//! wire format is JSON with `message_date` as an RFC 3339 UTC timestamp.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation failure for client-supplied field values.
///
/// Raised before any request is constructed; invalid input never reaches
/// the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("message_id must be an integer, got {0:?}")]
    InvalidMessageId(String),
    #[error("unrecognized date {0:?} (expected YYYY-MM-DDTHH:MM[:SS] or RFC 3339)")]
    InvalidDate(String),
}

/// A stored message record as returned by the backend.
///
/// `id` is server-assigned and never sent on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedMessage {
    pub id: i64,
    pub channel_title: String,
    pub channel_username: String,
    pub message_id: i64,
    pub message: String,
    pub message_date: DateTime<Utc>,
    pub media_path: String,
    pub emoji_used: String,
    pub youtube_links: String,
}

impl ArchivedMessage {
    /// The eight client-supplied fields of this record, without `id`.
    pub fn to_draft(&self) -> MessageDraft {
        MessageDraft {
            channel_title: self.channel_title.clone(),
            channel_username: self.channel_username.clone(),
            message_id: self.message_id,
            message: self.message.clone(),
            message_date: self.message_date,
            media_path: self.media_path.clone(),
            emoji_used: self.emoji_used.clone(),
            youtube_links: self.youtube_links.clone(),
        }
    }
}

/// Request body for create and update: the full record minus `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub channel_title: String,
    pub channel_username: String,
    pub message_id: i64,
    pub message: String,
    pub message_date: DateTime<Utc>,
    pub media_path: String,
    pub emoji_used: String,
    pub youtube_links: String,
}

/// Raw field values as typed by the user (CLI arguments or TUI form).
///
/// `message_id` and `message_date` are kept as text until [`validate`]
/// coerces them, so a bad value produces a [`ValidationError`] instead of
/// a silently transmitted garbage number.
///
/// [`validate`]: DraftInput::validate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftInput {
    pub channel_title: String,
    pub channel_username: String,
    pub message_id: String,
    pub message: String,
    pub message_date: String,
    pub media_path: String,
    pub emoji_used: String,
    pub youtube_links: String,
}

impl DraftInput {
    /// Coerce the typed fields and build a request-ready draft.
    pub fn validate(&self) -> Result<MessageDraft, ValidationError> {
        let message_id: i64 = self
            .message_id
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidMessageId(self.message_id.clone()))?;
        let message_date = parse_input_date(&self.message_date)?;

        Ok(MessageDraft {
            channel_title: self.channel_title.clone(),
            channel_username: self.channel_username.clone(),
            message_id,
            message: self.message.clone(),
            message_date,
            media_path: self.media_path.clone(),
            emoji_used: self.emoji_used.clone(),
            youtube_links: self.youtube_links.clone(),
        })
    }
}

/// Fixed display format for rendered cards (always UTC, no locale).
pub fn format_display_date(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a timestamp the way the form's date field expects it back.
pub fn format_input_date(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse a user-typed date.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]`, and the card display format
/// `YYYY-MM-DD HH:MM:SS`. Naive inputs are interpreted as UTC, matching
/// how they are displayed.
pub fn parse_input_date(s: &str) -> Result<DateTime<Utc>, ValidationError> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    Err(ValidationError::InvalidDate(s.to_string()))
}
