//! Store persistence tests over the file backend.

use std::fs;

use vtmark::{FileBackend, TimestampRecord, TimestampStore};

fn record(id: &str, video_id: &str, timestamp: &str) -> TimestampRecord {
    TimestampRecord {
        id: id.to_string(),
        video_id: video_id.to_string(),
        timestamp: timestamp.to_string(),
        video_title: "T".to_string(),
        video_url: format!("https://x/watch?v={video_id}"),
        saved_at: "now".to_string(),
    }
}

#[test]
fn saved_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timestamps.json");

    {
        let mut store = TimestampStore::open(Box::new(FileBackend::new(&path)));
        store.save(record("1", "v1", "01:30"));
        store.save(record("2", "v2", "00:45"));
    }

    let store = TimestampStore::open(Box::new(FileBackend::new(&path)));
    let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["2", "1"]);
    assert_eq!(store.query_by_video("v1").len(), 1);
}

#[test]
fn save_for_second_video_leaves_first_query_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timestamps.json");
    let mut store = TimestampStore::open(Box::new(FileBackend::new(&path)));

    store.save(TimestampRecord {
        id: "a".to_string(),
        video_id: "v1".to_string(),
        timestamp: "01:30".to_string(),
        video_title: "T".to_string(),
        video_url: "https://x/watch?v=v1".to_string(),
        saved_at: "now".to_string(),
    });
    assert_eq!(store.records().len(), 1);

    store.save(record("b", "v2", "00:10"));

    let v1 = store.query_by_video("v1");
    assert_eq!(v1.len(), 1);
    assert_eq!(v1[0].id, "a");
    assert_eq!(v1[0].timestamp, "01:30");
}

#[test]
fn legacy_collection_migrates_and_persists_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timestamps.json");

    // A collection written before video ids existed
    fs::write(
        &path,
        r#"{"savedTimestamps":[
            {"id":"1","timestamp":"00:42","videoTitle":"Old","videoUrl":"https://x/watch?v=old1","savedAt":"earlier"},
            {"id":"2","timestamp":"01:00","videoTitle":"Older","videoUrl":"https://x/watch?v=old2","savedAt":"much earlier"}
        ]}"#,
    )
    .unwrap();

    let store = TimestampStore::open(Box::new(FileBackend::new(&path)));
    assert_eq!(store.query_by_video("old1").len(), 1);
    assert_eq!(store.query_by_video("old2").len(), 1);

    // The migrated form was written back
    let migrated = fs::read_to_string(&path).unwrap();
    assert!(migrated.contains("\"videoId\": \"old1\""));

    // Reloading the migrated collection does not rewrite the file
    drop(store);
    let _store = TimestampStore::open(Box::new(FileBackend::new(&path)));
    let after_reload = fs::read_to_string(&path).unwrap();
    assert_eq!(migrated, after_reload);
}

#[test]
fn corrupt_store_file_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timestamps.json");
    fs::write(&path, "definitely not json").unwrap();

    let mut store = TimestampStore::open(Box::new(FileBackend::new(&path)));
    assert!(store.records().is_empty());

    // The store stays usable and the next save repairs the file
    store.save(record("1", "v1", "00:10"));
    let repaired = fs::read_to_string(&path).unwrap();
    assert!(repaired.contains("\"savedTimestamps\""));
}

#[test]
fn wire_format_matches_extension_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timestamps.json");
    let mut store = TimestampStore::open(Box::new(FileBackend::new(&path)));
    store.save(record("1", "v1", "01:30"));

    let raw = fs::read_to_string(&path).unwrap();
    for key in ["savedTimestamps", "videoId", "videoTitle", "videoUrl", "savedAt"] {
        assert!(raw.contains(&format!("\"{key}\"")), "missing key {key}");
    }
}
