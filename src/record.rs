//! The saved-bookmark record model.
//!
//! Records are serialized in camelCase to stay byte-compatible with the
//! `savedTimestamps` collection the browser extension wrote. They are never
//! mutated after creation; edits are delete-and-recreate.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::page::VideoInfo;

/// A single saved timestamp, tied to one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampRecord {
    /// Unique, creation-time-derived identifier (epoch milliseconds).
    pub id: String,
    /// Canonical video identifier extracted from the URL.
    ///
    /// Legacy records predate this field; the store back-fills it from
    /// `video_url` on load.
    #[serde(default)]
    pub video_id: String,
    /// Formatted position, `MM:SS` or `HH:MM:SS`.
    pub timestamp: String,
    /// Display title captured at save time.
    pub video_title: String,
    /// Full URL captured at save time.
    pub video_url: String,
    /// Human-readable save time.
    pub saved_at: String,
}

impl TimestampRecord {
    /// Build a new record from extracted video info, stamped with the
    /// current time.
    pub fn from_video_info(info: &VideoInfo) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            video_id: info.video_id.clone(),
            timestamp: info.timestamp_text.clone(),
            video_title: info.video_title.clone(),
            video_url: info.video_url.clone(),
            saved_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// True once the record carries a canonical video id.
    pub fn has_video_id(&self) -> bool {
        !self.video_id.is_empty()
    }
}

/// Extract the canonical video identifier (the `v` query parameter) from a
/// watch-page URL. Returns `None` when the URL carries no `v` parameter;
/// such pages are invalid for storage.
pub fn extract_video_id(url: &str) -> Option<String> {
    let query = url.split_once('?').map(|(_, q)| q)?;
    // Fragment is not part of the query
    let query = query.split('#').next().unwrap_or(query);

    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("v=") {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Build a direct link that opens the video at the record's saved position
/// (`&t=<seconds>s`). Fails when the stored timestamp text is malformed.
pub fn deep_link(record: &TimestampRecord) -> Result<String, crate::timecode::FormatError> {
    let seconds = crate::timecode::parse(&record.timestamp)?;
    let separator = if record.video_url.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}t={}s", record.video_url, separator, seconds))
}
