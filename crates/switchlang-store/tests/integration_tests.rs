//! Integration tests for switchlang-store
//!
//! These tests verify appending, ordering and persistence of history records.

use switchlang_domain::traits::HistoryStore;
use switchlang_domain::NewHistoryRecord;
use switchlang_store::SqliteHistoryStore;

fn record(source_text: &str, user_input: &str) -> NewHistoryRecord {
    NewHistoryRecord {
        source_language: "Korean".to_string(),
        target_language: "English".to_string(),
        source_text: source_text.to_string(),
        user_input: user_input.to_string(),
        feedback: r#"{"is_correct":true,"corrected":"x","better_expression":"y","explanation":"z"}"#
            .to_string(),
    }
}

#[test]
fn test_store_initialization() {
    let store = SqliteHistoryStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert!(store.unwrap().query_all().unwrap().is_empty());
}

#[test]
fn test_append_and_query() {
    let mut store = SqliteHistoryStore::new(":memory:").unwrap();

    let id = store.append(record("안녕하세요", "Hello")).unwrap();
    assert!(id > 0);

    let records = store.query_all().unwrap();
    assert_eq!(records.len(), 1);

    let stored = &records[0];
    assert_eq!(stored.id, id);
    assert_eq!(stored.source_language, "Korean");
    assert_eq!(stored.target_language, "English");
    assert_eq!(stored.source_text, "안녕하세요");
    assert_eq!(stored.user_input, "Hello");
    assert!(stored.feedback.contains("better_expression"));
    assert!(stored.timestamp > 0);
}

#[test]
fn test_query_all_most_recent_first() {
    let mut store = SqliteHistoryStore::new(":memory:").unwrap();

    store.append_at(record("old", "a"), 1_000).unwrap();
    store.append_at(record("newest", "b"), 3_000).unwrap();
    store.append_at(record("middle", "c"), 2_000).unwrap();

    let texts: Vec<String> = store
        .query_all()
        .unwrap()
        .into_iter()
        .map(|r| r.source_text)
        .collect();
    assert_eq!(texts, vec!["newest", "middle", "old"]);
}

#[test]
fn test_same_timestamp_orders_by_insertion() {
    let mut store = SqliteHistoryStore::new(":memory:").unwrap();

    store.append_at(record("first", "a"), 5_000).unwrap();
    store.append_at(record("second", "b"), 5_000).unwrap();

    let records = store.query_all().unwrap();
    assert_eq!(records[0].source_text, "second");
    assert_eq!(records[1].source_text, "first");
}

#[test]
fn test_query_recent_limit() {
    let mut store = SqliteHistoryStore::new(":memory:").unwrap();
    for i in 0..5u64 {
        store.append_at(record(&format!("s{}", i), "a"), 100 + i).unwrap();
    }

    let recent = store.query_recent(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].source_text, "s4");
    assert_eq!(recent[1].source_text, "s3");
    assert_eq!(store.count().unwrap(), 5);
}

#[test]
fn test_clear() {
    let mut store = SqliteHistoryStore::new(":memory:").unwrap();
    store.append(record("a", "b")).unwrap();
    store.append(record("c", "d")).unwrap();

    assert_eq!(store.clear().unwrap(), 2);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_text_with_quotes_and_newlines() {
    let mut store = SqliteHistoryStore::new(":memory:").unwrap();
    let tricky = "He said \"hi\"\nand left; DROP TABLE study_history;";
    store.append(record(tricky, tricky)).unwrap();

    let records = store.query_all().unwrap();
    assert_eq!(records[0].source_text, tricky);
    assert_eq!(records[0].user_input, tricky);
}

#[test]
fn test_persistence_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");

    {
        let mut store = SqliteHistoryStore::new(&path).unwrap();
        store.append(record("persisted", "yes")).unwrap();
    }

    let store = SqliteHistoryStore::new(&path).unwrap();
    let records = store.query_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_text, "persisted");
}
