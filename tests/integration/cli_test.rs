//! End-to-end CLI tests over a temporary store file.

use assert_cmd::Command;
use predicates::prelude::*;

fn vtmark() -> Command {
    Command::cargo_bin("vtmark").unwrap()
}

fn store_arg(dir: &tempfile::TempDir) -> String {
    dir.path().join("timestamps.json").display().to_string()
}

/// Read a record id back out of the store file.
fn first_record_id(dir: &tempfile::TempDir) -> String {
    let raw = std::fs::read_to_string(dir.path().join("timestamps.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["savedTimestamps"][0]["id"].as_str().unwrap().to_string()
}

#[test]
fn save_then_list_roundtrip() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["save", "--url", "https://x/watch?v=abc", "--title", "A talk", "--at", "01:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timestamp saved: 01:30"));

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("01:30").and(predicate::str::contains("A talk")));
}

#[test]
fn save_accepts_bare_seconds() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["save", "--url", "https://x/watch?v=abc", "--at", "3723"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:02:03"));
}

#[test]
fn save_rejects_url_without_video_id() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["save", "--url", "https://x/feed", "--at", "00:10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no video id"));
}

#[test]
fn list_empty_store_says_so() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved timestamps."));
}

#[test]
fn list_filters_by_video() {
    let dir = tempfile::tempdir().unwrap();

    for (video, at, title) in [("v1", "00:10", "First"), ("v2", "00:20", "Second")] {
        vtmark()
            .args(["--store", &store_arg(&dir)])
            .args([
                "save",
                "--url",
                &format!("https://x/watch?v={video}"),
                "--title",
                title,
                "--at",
                at,
            ])
            .assert()
            .success();
    }

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["list", "--video", "v1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First").and(predicate::str::contains("Second").not()));
}

#[test]
fn delete_with_yes_removes_the_record() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["save", "--url", "https://x/watch?v=abc", "--at", "00:30"])
        .assert()
        .success();

    let id = first_record_id(&dir);
    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["delete", &id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 00:30"));

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved timestamps."));
}

#[test]
fn delete_without_yes_is_refused_when_not_interactive() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["save", "--url", "https://x/watch?v=abc", "--at", "00:30"])
        .assert()
        .success();

    let id = first_record_id(&dir);
    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing deleted."));

    // Record is still there
    vtmark()
        .args(["--store", &store_arg(&dir)])
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("00:30"));
}

#[test]
fn delete_missing_id_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["delete", "does-not-exist", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No timestamp with id does-not-exist."));
}

#[test]
fn markers_renders_track_and_legend() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["save", "--url", "https://x/watch?v=abc", "--at", "05:00"])
        .assert()
        .success();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["markers", "--video", "abc", "--duration", "10:00"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("◆")
                .and(predicate::str::contains("Saved: 05:00"))
                .and(predicate::str::contains("50.0%")),
        );
}

#[test]
fn markers_without_records_reports_none() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["markers", "--video", "abc", "--duration", "600"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No markers for video abc."));
}

#[test]
fn open_missing_id_fails() {
    let dir = tempfile::tempdir().unwrap();

    vtmark()
        .args(["--store", &store_arg(&dir)])
        .args(["open", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No timestamp with id nope"));
}
