//! The synchronization controller: mediates between a UI surface and the
//! store.
//!
//! One controller instance exists per popup/session. It owns its session
//! state explicitly (no module-level globals): the current phase, the
//! active video id, and a cached read-derived view of that video's
//! records. All side effects go through the store and through explicit
//! commands to the tab collaborator.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::page::wait_until;
use crate::protocol::{Request, Response};
use crate::record::TimestampRecord;
use crate::store::{SharedStore, StoreEvent};
use crate::timecode;

/// Session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    SavePending,
    NavigatePending,
}

/// Errors surfaced to the UI. All of them are recovered locally into a
/// status message; none are fatal.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("No active tab")]
    NoActiveTab,

    #[error("No active video on the current page")]
    NoActiveVideo,

    #[error("Message delivery failed: {0}")]
    MessageDelivery(String),

    #[error("Could not persist the timestamp")]
    StorageWrite,
}

/// The active-tab collaborator.
///
/// `request` carries a protocol message to the page endpoint; `navigate`
/// points the tab at a new URL. `resume_at` names the position the caller
/// will seek to once the page settles, so transports without a live page
/// endpoint (e.g. a deep-link opener) can fold it into the URL.
pub trait Tab {
    fn request(&mut self, request: Request) -> Result<Option<Response>, SyncError>;
    fn navigate(&mut self, url: &str, resume_at: u32) -> Result<(), SyncError>;
}

/// Settle parameters for the navigate-then-seek flow.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Poll interval while waiting for a navigated page to settle.
    pub settle_interval: Duration,
    /// Maximum settle polls before the seek is sent best-effort anyway.
    pub settle_max_attempts: u32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        // ~2s total, matching the settle delay the extension used
        Self {
            settle_interval: Duration::from_millis(100),
            settle_max_attempts: 20,
        }
    }
}

/// Mediator between the UI surface and the timestamp store.
pub struct Controller<T: Tab> {
    store: SharedStore,
    tab: Option<T>,
    options: SyncOptions,
    events: Receiver<StoreEvent>,
    phase: Phase,
    active_video: Option<String>,
    visible: Vec<TimestampRecord>,
}

impl<T: Tab> Controller<T> {
    /// Create a controller, subscribing to store change notifications.
    /// `tab` is `None` when no tab is open (every tab-bound operation
    /// then reports `NoActiveTab`).
    pub fn new(store: SharedStore, tab: Option<T>, options: SyncOptions) -> Self {
        let events = store.borrow_mut().subscribe();
        let mut controller = Self {
            store,
            tab,
            options,
            events,
            phase: Phase::Idle,
            active_video: None,
            visible: Vec::new(),
        };
        controller.detect_active_video();
        controller
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_video(&self) -> Option<&str> {
        self.active_video.as_deref()
    }

    /// The cached, filtered, newest-first record list for the active
    /// video. Empty when no video is active.
    pub fn visible_records(&self) -> &[TimestampRecord] {
        &self.visible
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Save the current playhead position of the active tab.
    /// Returns the saved timestamp text.
    pub fn save_current(&mut self) -> Result<String, SyncError> {
        self.phase = Phase::SavePending;
        let result = self.do_save();
        self.phase = Phase::Idle;
        result
    }

    fn do_save(&mut self) -> Result<String, SyncError> {
        let info = match self.fetch_video_info()? {
            Some(info) => info,
            None => return Err(SyncError::NoActiveVideo),
        };

        let record = TimestampRecord::from_video_info(&info);
        let timestamp = record.timestamp.clone();

        if !self.store.borrow_mut().save(record) {
            return Err(SyncError::StorageWrite);
        }

        self.set_active_video(Some(info.video_id));
        Ok(timestamp)
    }

    /// Jump to a saved record. When the tab already shows the record's
    /// video, this is a direct seek; otherwise the tab is navigated first
    /// and the seek follows once the page settles (bounded wait), as a
    /// best-effort operation.
    pub fn navigate(&mut self, record: &TimestampRecord) -> Result<(), SyncError> {
        self.phase = Phase::NavigatePending;
        let result = self.do_navigate(record);
        self.phase = Phase::Idle;
        result
    }

    fn do_navigate(&mut self, record: &TimestampRecord) -> Result<(), SyncError> {
        if self.tab.is_none() {
            return Err(SyncError::NoActiveTab);
        }

        let showing = self
            .current_tab_video()
            .map(|id| id == record.video_id)
            .unwrap_or(false);

        if !showing {
            let resume_at = timecode::parse(&record.timestamp).unwrap_or(0);
            self.tab_mut()?.navigate(&record.video_url, resume_at)?;
            self.wait_for_video(&record.video_id);
        }

        // Best effort: a page that settled late may still miss the seek.
        let seek = Request::SeekToTime {
            timestamp: record.timestamp.clone(),
        };
        match self.tab_mut()?.request(seek) {
            Ok(Some(Response::Success { success: false })) => {
                debug!("seek refused by page for record {}", record.id);
            }
            Ok(_) => {}
            Err(e) => warn!("seek delivery failed: {e}"),
        }

        self.set_active_video(Some(record.video_id.clone()));
        Ok(())
    }

    /// Delete a record, then fire-and-forget a marker refresh at the tab.
    pub fn delete(&mut self, id: &str) {
        self.store.borrow_mut().delete(id);

        if let Some(tab) = self.tab.as_mut() {
            if let Err(e) = tab.request(Request::RefreshMarkers) {
                debug!("marker refresh not delivered: {e}");
            }
        }
        self.refresh_visible();
    }

    /// Drain store change notifications; recompute the visible list when
    /// any arrived. Returns whether the view changed.
    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;
        while self.events.try_recv().is_ok() {
            changed = true;
        }
        if changed {
            self.refresh_visible();
        }
        changed
    }

    /// Point the cached view at a different video.
    pub fn set_active_video(&mut self, video_id: Option<String>) {
        self.active_video = video_id;
        self.refresh_visible();
    }

    /// Ask the tab what video is open and align the cached view with it.
    pub fn detect_active_video(&mut self) {
        let video_id = self.current_tab_video();
        self.set_active_video(video_id);
    }

    fn refresh_visible(&mut self) {
        self.visible = match &self.active_video {
            Some(video_id) => self.store.borrow().query_by_video(video_id),
            None => Vec::new(),
        };
    }

    /// Current video id according to the tab, if reachable. Delivery
    /// failures read as "no video"; the popup cannot tell the difference.
    fn current_tab_video(&mut self) -> Option<String> {
        let tab = self.tab.as_mut()?;
        match tab.request(Request::GetVideoInfo) {
            Ok(Some(Response::VideoInfo { video_info })) => video_info.map(|i| i.video_id),
            Ok(_) => None,
            Err(e) => {
                debug!("video info not available: {e}");
                None
            }
        }
    }

    fn fetch_video_info(&mut self) -> Result<Option<crate::page::VideoInfo>, SyncError> {
        let tab = self.tab.as_mut().ok_or(SyncError::NoActiveTab)?;
        match tab.request(Request::GetVideoInfo)? {
            Some(Response::VideoInfo { video_info }) => Ok(video_info),
            _ => Ok(None),
        }
    }

    /// Bounded settle wait after navigation: poll until the tab reports
    /// the target video. Exhausting the bound is not an error.
    fn wait_for_video(&mut self, video_id: &str) {
        let options = self.options;
        let settled = wait_until(options.settle_interval, options.settle_max_attempts, || {
            self.current_tab_video().as_deref() == Some(video_id)
        });
        if !settled {
            warn!("page did not settle on video {video_id}; seeking anyway");
        }
    }

    fn tab_mut(&mut self) -> Result<&mut T, SyncError> {
        self.tab.as_mut().ok_or(SyncError::NoActiveTab)
    }
}

/// A tab backed by an in-process content endpoint, the full loop used by
/// tests and demos.
pub struct ContentTab<P: crate::page::VideoPage> {
    pub content: crate::content::ContentScript<P>,
}

impl<P: crate::page::VideoPage> ContentTab<P> {
    pub fn new(content: crate::content::ContentScript<P>) -> Self {
        Self { content }
    }
}

impl Tab for ContentTab<crate::page::ScriptedPage> {
    fn request(&mut self, request: Request) -> Result<Option<Response>, SyncError> {
        Ok(self.content.handle(request))
    }

    fn navigate(&mut self, url: &str, _resume_at: u32) -> Result<(), SyncError> {
        // In-page navigation: the scripted page loads instantly and the
        // endpoint notices the change, like the mutation observer would.
        let title = format!("Video at {url}");
        self.content.page_mut().navigate(url, &title);
        self.content.page_mut().finish_loading(600.0);
        self.content.on_page_update();
        Ok(())
    }
}
