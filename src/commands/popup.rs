//! The interactive popup subcommand.

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::config::Config;
use crate::controller::{Controller, SyncError, SyncOptions, Tab};
use crate::protocol::{Request, Response};
use crate::store::SharedStore;
use crate::tui::run_popup;

/// A tab without a live page endpoint: navigation opens a deep link in
/// the browser, and protocol requests fail as undeliverable (which the
/// controller logs and moves past).
pub struct DeepLinkTab {
    browser: String,
}

impl DeepLinkTab {
    pub fn new(browser: String) -> Self {
        Self { browser }
    }
}

impl Tab for DeepLinkTab {
    fn request(&mut self, request: Request) -> Result<Option<Response>, SyncError> {
        debug!("no page endpoint for {:?}", request);
        Err(SyncError::MessageDelivery(
            "no page endpoint in CLI context".to_string(),
        ))
    }

    fn navigate(&mut self, url: &str, resume_at: u32) -> Result<(), SyncError> {
        // No live page to seek later, so fold the position into the URL
        let separator = if url.contains('?') { '&' } else { '?' };
        let link = format!("{url}{separator}t={resume_at}s");
        super::open_in_browser(&self.browser, &link)
            .map_err(|e| SyncError::MessageDelivery(e.to_string()))
    }
}

/// Launch the popup TUI over the store, scoped to one video when given.
pub fn handle_popup(store: SharedStore, config: &Config, video: Option<&str>) -> Result<()> {
    let tab = DeepLinkTab::new(config.browser_command());

    // A deep-link tab never reports a settled page; a single settle poll
    // keeps navigation snappy.
    let options = SyncOptions {
        settle_interval: Duration::from_millis(0),
        settle_max_attempts: 1,
    };

    let mut controller = Controller::new(store, Some(tab), options);
    controller.set_active_video(video.map(|v| v.to_string()));

    run_popup(controller)
}
