//! The page-side endpoint: protocol handler, marker overlay state and
//! video-change detection.
//!
//! This is the content-script half of the system. It owns the page
//! collaborator and the rendered marker state, answers protocol requests,
//! and refreshes markers whenever the store changes or the page moves to
//! a different video.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::debug;

use crate::markers::{self, Marker};
use crate::page::{wait_until, VideoPage};
use crate::protocol::{Request, Response};
use crate::record::TimestampRecord;
use crate::store::{SharedStore, StoreEvent};
use crate::timecode;

/// How long to wait for video metadata after a video change.
const METADATA_POLL_INTERVAL: Duration = Duration::from_millis(100);
const METADATA_MAX_ATTEMPTS: u32 = 20;

/// The content-script endpoint over one page.
pub struct ContentScript<P: VideoPage> {
    page: P,
    store: SharedStore,
    events: Receiver<StoreEvent>,
    /// Video id the overlay was last rendered for.
    current_video: Option<String>,
    /// Rendered overlay state, replaced wholesale on each refresh.
    overlay: Vec<Marker>,
}

impl<P: VideoPage> ContentScript<P> {
    /// Attach to a page, subscribe to store changes and render the
    /// initial overlay if a video is already open.
    pub fn new(page: P, store: SharedStore) -> Self {
        let events = store.borrow_mut().subscribe();
        let mut content = Self {
            page,
            store,
            events,
            current_video: None,
            overlay: Vec::new(),
        };
        content.on_page_update();
        content
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// The currently rendered overlay markers.
    pub fn overlay(&self) -> &[Marker] {
        &self.overlay
    }

    /// Handle one protocol request. Unknown actions get no response and
    /// leave the endpoint ready for the next request.
    pub fn handle(&mut self, request: Request) -> Option<Response> {
        match request {
            Request::GetTimestamp => {
                let timestamp = self
                    .page
                    .video_info()
                    .map(|info| info.timestamp_text);
                Some(Response::Timestamp { timestamp })
            }
            Request::GetVideoInfo => Some(Response::VideoInfo {
                video_info: self.page.video_info(),
            }),
            Request::SeekToTime { timestamp } => {
                let success = match timecode::parse(&timestamp) {
                    Ok(seconds) => self.page.seek(seconds),
                    Err(e) => {
                        debug!("refusing seek to malformed timestamp: {e}");
                        false
                    }
                };
                Some(Response::Success { success })
            }
            Request::RefreshMarkers => {
                self.refresh_markers();
                Some(Response::Success { success: true })
            }
            Request::SaveTimestamp { video_info } => {
                let record = TimestampRecord::from_video_info(&video_info);
                let success = self.store.borrow_mut().save(record);
                Some(Response::Success { success })
            }
            Request::Unknown => None,
        }
    }

    /// Save the current playhead position (the page-side keybinding flow).
    /// Returns the confirmation timestamp text, or `None` when there is no
    /// active video.
    pub fn save_current(&mut self) -> Option<String> {
        let info = self.page.video_info()?;
        let timestamp = info.timestamp_text.clone();
        self.handle(Request::SaveTimestamp { video_info: info });
        Some(timestamp)
    }

    /// Drain pending store-change notifications; on any, re-render the
    /// overlay from storage. Returns whether a refresh happened.
    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;
        while self.events.try_recv().is_ok() {
            changed = true;
        }
        if changed {
            self.refresh_markers();
        }
        changed
    }

    /// Detect video changes, the mutation-observer analog. When the page
    /// has moved to a different video, wait (bounded) for its metadata,
    /// then rebuild the overlay.
    pub fn on_page_update(&mut self) {
        let video_id = self.page.video_info().map(|info| info.video_id);
        if video_id == self.current_video {
            return;
        }
        self.current_video = video_id;

        if self.current_video.is_some() {
            let page = &self.page;
            wait_until(METADATA_POLL_INTERVAL, METADATA_MAX_ATTEMPTS, || {
                page.duration().is_some()
            });
        }
        self.refresh_markers();
    }

    /// Full clear-then-redraw of the overlay from the store's per-video
    /// query.
    fn refresh_markers(&mut self) {
        // Resolve the video id straight from the page URL; markers must
        // track what is actually open, not a stale cached id.
        let video_id = self
            .page
            .video_info()
            .map(|info| info.video_id)
            .or_else(|| self.current_video.clone());

        let (records, duration) = match (video_id, self.page.duration()) {
            (Some(video_id), Some(duration)) => {
                (self.store.borrow().query_by_video(&video_id), duration)
            }
            _ => {
                self.overlay.clear();
                return;
            }
        };

        self.overlay = markers::layout(&records, duration);
        debug!("overlay rebuilt with {} markers", self.overlay.len());
    }
}

/// Convenience wrapper used by dispatch tests: feed a raw JSON message to
/// the endpoint, swallowing malformed frames the way the extension's
/// listener did.
pub fn dispatch_json<P: VideoPage>(
    content: &mut ContentScript<P>,
    json: &str,
) -> Option<Response> {
    match Request::from_json(json) {
        Ok(request) => content.handle(request),
        Err(e) => {
            debug!("ignoring malformed message: {e}");
            None
        }
    }
}
