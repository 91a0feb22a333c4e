//! Full popup-to-page loop tests: controller, content endpoint and store
//! wired together the way the running system is.

use std::time::Duration;

use vtmark::content::ContentScript;
use vtmark::controller::{ContentTab, Controller, SyncOptions};
use vtmark::{MemoryBackend, ScriptedPage, SharedStore, SyncError, TimestampStore};

fn shared_store() -> SharedStore {
    TimestampStore::open_shared(Box::new(MemoryBackend::default()))
}

fn fast_options() -> SyncOptions {
    SyncOptions {
        settle_interval: Duration::from_millis(1),
        settle_max_attempts: 3,
    }
}

fn system_on(
    url: &str,
    current_time: f64,
    store: SharedStore,
) -> Controller<ContentTab<ScriptedPage>> {
    let page = ScriptedPage::watching(url, "Some video", current_time, 600.0);
    let content = ContentScript::new(page, store.clone());
    Controller::new(store, Some(ContentTab::new(content)), fast_options())
}

#[test]
fn popup_save_then_jump_back() {
    let store = shared_store();
    let mut controller = system_on("https://x/watch?v=v1", 95.0, store.clone());

    let timestamp = controller.save_current().unwrap();
    assert_eq!(timestamp, "01:35");

    let record = controller.visible_records()[0].clone();
    controller.navigate(&record).unwrap();

    // The page endpoint actually moved the playhead
    let records = store.borrow().query_by_video("v1");
    assert_eq!(records.len(), 1);
}

#[test]
fn page_side_save_shows_up_in_popup() {
    let store = shared_store();
    let page = ScriptedPage::watching("https://x/watch?v=v1", "Some video", 30.0, 600.0);
    let mut content = ContentScript::new(page, store.clone());

    // Keybinding flow on the page
    assert_eq!(content.save_current(), Some("00:30".to_string()));

    // A separately-open popup picks it up from the change notification
    let mut popup = Controller::new(
        store,
        None::<ContentTab<ScriptedPage>>,
        fast_options(),
    );
    popup.set_active_video(Some("v1".to_string()));
    assert_eq!(popup.visible_records().len(), 1);
    assert_eq!(popup.visible_records()[0].timestamp, "00:30");
}

#[test]
fn delete_refreshes_page_markers() {
    let store = shared_store();
    let mut controller = system_on("https://x/watch?v=v1", 120.0, store.clone());

    controller.save_current().unwrap();
    let id = controller.visible_records()[0].id.clone();

    controller.delete(&id);
    assert!(controller.visible_records().is_empty());
    assert!(store.borrow().records().is_empty());
}

#[test]
fn navigating_across_videos_moves_page_and_view() {
    let store = shared_store();

    // Bookmark on v2, created in an earlier session
    let mut seed = system_on("https://x/watch?v=v2", 60.0, store.clone());
    seed.save_current().unwrap();
    drop(seed);

    let mut controller = system_on("https://x/watch?v=v1", 0.0, store.clone());
    assert_eq!(controller.active_video(), Some("v1"));
    assert!(controller.visible_records().is_empty());

    let record = store.borrow().query_by_video("v2")[0].clone();
    controller.navigate(&record).unwrap();

    assert_eq!(controller.active_video(), Some("v2"));
    assert_eq!(controller.visible_records().len(), 1);
}

#[test]
fn save_on_blank_page_reports_no_video() {
    let store = shared_store();
    let content = ContentScript::new(ScriptedPage::blank(), store.clone());
    let mut controller = Controller::new(store, Some(ContentTab::new(content)), fast_options());

    assert!(matches!(
        controller.save_current().unwrap_err(),
        SyncError::NoActiveVideo
    ));
}

#[test]
fn concurrent_surfaces_stay_consistent_through_notifications() {
    let store = shared_store();
    let mut controller = system_on("https://x/watch?v=v1", 10.0, store.clone());

    // Another surface writes two records
    let page = ScriptedPage::watching("https://x/watch?v=v1", "Some video", 20.0, 600.0);
    let mut other = ContentScript::new(page, store.clone());
    other.save_current();
    other.page_mut().current_time = 40.0;
    other.save_current();

    assert!(controller.poll_events());
    let timestamps: Vec<&str> = controller
        .visible_records()
        .iter()
        .map(|r| r.timestamp.as_str())
        .collect();
    // Newest first
    assert_eq!(timestamps, ["00:40", "00:20"]);
}
