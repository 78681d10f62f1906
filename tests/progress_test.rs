//! Progress store tests
//!
//! Tests the upsert-by-id contract and recency ordering of the resume
//! history file.

use reelstream::models::{MediaKind, ProgressEntry, ResolvedTitle, SeasonEpisode};
use reelstream::progress::ProgressStore;
use std::time::Duration;

fn movie(id: u64, name: &str) -> ResolvedTitle {
    ResolvedTitle {
        search_id: id,
        external_id: format!("tt{:07}", id),
        title: name.to_string(),
        year: Some(2021),
        kind: MediaKind::Movie,
    }
}

fn series(id: u64, name: &str) -> ResolvedTitle {
    ResolvedTitle {
        search_id: id,
        external_id: format!("tt{:07}", id),
        title: name.to_string(),
        year: Some(2008),
        kind: MediaKind::Series,
    }
}

#[test]
fn test_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::with_path(dir.path().join("progress.json"));
    assert!(store.load_all().is_empty());
}

#[test]
fn test_most_recent_entry_comes_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::with_path(dir.path().join("progress.json"));

    store
        .record(ProgressEntry::from_session(&movie(1, "Dune"), None))
        .unwrap();
    // Distinct timestamps between the two records.
    std::thread::sleep(Duration::from_millis(10));
    store
        .record(ProgressEntry::from_session(&movie(2, "Arrival"), None))
        .unwrap();

    let entries = store.load_all();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "Arrival");
    assert_eq!(entries[1].title, "Dune");
    assert!(entries[0].played_at > entries[1].played_at);
}

#[test]
fn test_record_upserts_by_title_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::with_path(dir.path().join("progress.json"));

    let title = series(1396, "Breaking Bad");
    let first = SeasonEpisode {
        season: 1,
        episode: 1,
        name: Some("Pilot".to_string()),
    };
    let second = SeasonEpisode {
        season: 1,
        episode: 2,
        name: Some("Cat's in the Bag...".to_string()),
    };

    store
        .record(ProgressEntry::from_session(&title, Some(&first)))
        .unwrap();
    store
        .record(ProgressEntry::from_session(&title, Some(&second)))
        .unwrap();

    let entries = store.load_all();
    assert_eq!(entries.len(), 1, "same title must not duplicate");
    assert_eq!(entries[0].episode.as_ref().unwrap().episode, 2);
}

#[test]
fn test_file_is_rewritten_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    let store = ProgressStore::with_path(&path);

    store
        .record(ProgressEntry::from_session(&movie(1, "Dune"), None))
        .unwrap();
    store
        .record(ProgressEntry::from_session(&movie(2, "Arrival"), None))
        .unwrap();

    // The document is one JSON map keyed by title id.
    let text = std::fs::read_to_string(&path).unwrap();
    let map: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(map.get("1").is_some());
    assert!(map.get("2").is_some());
    assert_eq!(map["1"]["kind"], "movie");
}

#[test]
fn test_entries_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    {
        let store = ProgressStore::with_path(&path);
        store
            .record(ProgressEntry::from_session(&movie(7, "Stalker"), None))
            .unwrap();
    }

    let reopened = ProgressStore::with_path(&path);
    let entries = reopened.load_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Stalker");
    assert_eq!(entries[0].id, 7);
}
