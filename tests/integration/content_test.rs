//! Wire-level tests: raw JSON frames through the page endpoint, checking
//! the serialized shapes the popup surface reads back.

use vtmark::content::{dispatch_json, ContentScript};
use vtmark::{MemoryBackend, Response, ScriptedPage, SharedStore, TimestampStore, VideoPage};

fn shared_store() -> SharedStore {
    TimestampStore::open_shared(Box::new(MemoryBackend::default()))
}

fn endpoint(time: f64) -> ContentScript<ScriptedPage> {
    let page = ScriptedPage::watching("https://x/watch?v=v1", "A talk", time, 600.0);
    ContentScript::new(page, shared_store())
}

#[test]
fn get_timestamp_frame_answers_formatted_text() {
    let mut content = endpoint(95.0);
    let response = dispatch_json(&mut content, r#"{"action":"getTimestamp"}"#).unwrap();
    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(json, r#"{"timestamp":"01:35"}"#);
}

#[test]
fn get_video_info_frame_carries_camel_case_fields() {
    let mut content = endpoint(90.0);
    let response = dispatch_json(&mut content, r#"{"action":"getVideoInfo"}"#).unwrap();
    let json = serde_json::to_string(&response).unwrap();
    for key in ["videoInfo", "videoId", "videoUrl", "videoTitle", "currentTimeSeconds"] {
        assert!(json.contains(&format!("\"{key}\"")), "missing key {key}");
    }
    assert!(json.contains("\"01:30\""));
}

#[test]
fn seek_frame_moves_the_playhead() {
    let mut content = endpoint(0.0);
    let response = dispatch_json(
        &mut content,
        r#"{"action":"seekToTime","timestamp":"1:02:03"}"#,
    );
    assert_eq!(response, Some(Response::Success { success: true }));
    assert_eq!(content.page().current_time, 3723.0);
}

#[test]
fn save_timestamp_frame_persists_and_refreshes_overlay() {
    let mut content = endpoint(30.0);
    let frame = r#"{
        "action": "saveTimestamp",
        "videoInfo": {
            "videoId": "v1",
            "videoUrl": "https://x/watch?v=v1",
            "videoTitle": "A talk",
            "currentTimeSeconds": 30.0,
            "timestampText": "00:30"
        }
    }"#;
    let response = dispatch_json(&mut content, frame);
    assert_eq!(response, Some(Response::Success { success: true }));

    assert!(content.poll_events());
    assert_eq!(content.overlay().len(), 1);
    assert_eq!(content.overlay()[0].seconds, 30);
}

#[test]
fn refresh_markers_frame_redraws_from_storage() {
    let store = shared_store();
    let page = ScriptedPage::watching("https://x/watch?v=v1", "A talk", 10.0, 600.0);
    let mut content = ContentScript::new(page, store.clone());

    let info = content.page().video_info().unwrap();
    store
        .borrow_mut()
        .save(vtmark::TimestampRecord::from_video_info(&info));

    let response = dispatch_json(&mut content, r#"{"action":"refreshMarkers"}"#);
    assert_eq!(response, Some(Response::Success { success: true }));
    assert_eq!(content.overlay().len(), 1);
}

#[test]
fn unknown_and_malformed_frames_are_dropped() {
    let mut content = endpoint(0.0);
    assert_eq!(dispatch_json(&mut content, r#"{"action":"openSettings"}"#), None);
    assert_eq!(dispatch_json(&mut content, r#"{"timestamp":"01:00"}"#), None);
    assert_eq!(dispatch_json(&mut content, "{nope"), None);
    // Endpoint still answers after the bad frames
    assert!(dispatch_json(&mut content, r#"{"action":"getTimestamp"}"#).is_some());
}

#[test]
fn video_info_on_blank_page_serializes_null() {
    let mut content = ContentScript::new(ScriptedPage::blank(), shared_store());
    let response = dispatch_json(&mut content, r#"{"action":"getVideoInfo"}"#).unwrap();
    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(json, r#"{"videoInfo":null}"#);
}
