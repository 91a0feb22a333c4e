//! The video-page collaborator contract.
//!
//! The core never touches a real DOM; everything it needs from the page
//! goes through the `VideoPage` trait. `ScriptedPage` is the in-process
//! double used by tests and the CLI demo paths.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::record::extract_video_id;
use crate::timecode;

/// Everything the core needs to know about the currently open video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub video_id: String,
    pub video_url: String,
    pub video_title: String,
    pub current_time_seconds: f64,
    /// The current position pre-formatted as `MM:SS` / `HH:MM:SS`.
    pub timestamp_text: String,
}

/// Contract the content-script side consumes from the page.
///
/// `video_info` answers `None` when there is no active video or the page
/// is not a watch page (no `v` parameter in the URL).
pub trait VideoPage {
    fn video_info(&self) -> Option<VideoInfo>;

    /// Jump the playhead. Returns false when there is no video to seek.
    fn seek(&mut self, seconds: u32) -> bool;

    /// Video duration in seconds, once metadata has loaded.
    fn duration(&self) -> Option<f64>;
}

/// Poll `cond` up to `max_attempts` times, sleeping `interval` between
/// attempts. Returns whether the condition became true within the bound.
///
/// This replaces the open-ended readiness polling the browser extension
/// did; every wait in the crate has a bounded retry count.
pub fn wait_until(interval: Duration, max_attempts: u32, mut cond: impl FnMut() -> bool) -> bool {
    for attempt in 0..max_attempts {
        if cond() {
            return true;
        }
        if attempt + 1 < max_attempts {
            std::thread::sleep(interval);
        }
    }
    false
}

/// A scripted stand-in for a real watch page.
///
/// Tests drive it directly: set the URL and playhead, flip metadata
/// readiness, and observe seeks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    pub url: String,
    pub title: String,
    pub current_time: f64,
    pub duration: Option<f64>,
    /// When false the page behaves as if no `<video>` element exists.
    pub has_video: bool,
}

impl ScriptedPage {
    pub fn watching(url: &str, title: &str, current_time: f64, duration: f64) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            current_time,
            duration: Some(duration),
            has_video: true,
        }
    }

    /// A page with no active video (e.g. the site's home page).
    pub fn blank() -> Self {
        Self::default()
    }

    /// Simulate in-page navigation to another video. Metadata is not
    /// loaded until `finish_loading` is called.
    pub fn navigate(&mut self, url: &str, title: &str) {
        self.url = url.to_string();
        self.title = title.to_string();
        self.current_time = 0.0;
        self.duration = None;
        self.has_video = true;
    }

    pub fn finish_loading(&mut self, duration: f64) {
        self.duration = Some(duration);
    }
}

impl VideoPage for ScriptedPage {
    fn video_info(&self) -> Option<VideoInfo> {
        if !self.has_video {
            return None;
        }
        let video_id = extract_video_id(&self.url)?;
        Some(VideoInfo {
            video_id,
            video_url: self.url.clone(),
            video_title: self.title.clone(),
            current_time_seconds: self.current_time,
            timestamp_text: timecode::format_position(self.current_time),
        })
    }

    fn seek(&mut self, seconds: u32) -> bool {
        if !self.has_video {
            return false;
        }
        self.current_time = seconds as f64;
        true
    }

    fn duration(&self) -> Option<f64> {
        if self.has_video {
            self.duration
        } else {
            None
        }
    }
}
