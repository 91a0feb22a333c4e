//! Request/response protocol between the popup surface and the page
//! endpoint.
//!
//! Messages travel as JSON objects tagged with an `action` field, the same
//! wire shape the extension used over its runtime message channel. Unknown
//! actions deserialize into `Request::Unknown` and are ignored by the
//! endpoint; the channel stays open.

use serde::{Deserialize, Serialize};

use crate::page::VideoInfo;

/// A request to the page endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Ask for the current playhead position as formatted text.
    GetTimestamp,
    /// Ask for the full extracted video info.
    GetVideoInfo,
    /// Jump the playhead to a formatted position.
    SeekToTime { timestamp: String },
    /// Rebuild the marker overlay from storage.
    RefreshMarkers,
    /// Persist a new record for the given video info.
    #[serde(rename_all = "camelCase")]
    SaveTimestamp { video_info: VideoInfo },
    /// Any action this version does not know. Ignored.
    #[serde(other)]
    Unknown,
}

impl Request {
    /// Parse a request from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        // Infallible for these variants
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A response from the page endpoint. Requests without a meaningful
/// answer get no response at all (`None` at the dispatch layer).
///
/// Serialize-only: the untagged wire shape is not self-describing (a
/// missing optional field makes distinct variants collide), so consumers
/// read the typed value, never re-parse the JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Timestamp {
        timestamp: Option<String>,
    },
    VideoInfo {
        #[serde(rename = "videoInfo")]
        video_info: Option<VideoInfo>,
    },
    Success {
        success: bool,
    },
}
