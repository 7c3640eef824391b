//! End-to-end walkthroughs of the documented read/write scenarios.

use std::sync::Arc;

use verlog_types::{Document, DocumentId, EntryId, LogEntry, ManualClock, Timestamp};

use crate::{LogEngine, ViewQuery};

fn engine() -> LogEngine {
    LogEngine::with_clock(Arc::new(ManualClock::new(Timestamp::from_millis(42))))
}

fn eid(s: &str) -> EntryId {
    EntryId::new(s).unwrap()
}

fn doc(version: u64, logs: &[(&str, u64)]) -> Document {
    let mut d = Document::new(DocumentId::new("100").unwrap(), Timestamp::zero());
    d.version = version;
    d.logs = logs
        .iter()
        .map(|(id, v)| LogEntry::live(eid(id), *v, Timestamp::zero()))
        .collect();
    d
}

fn summary(d: &Document) -> Vec<(&str, u64)> {
    d.logs.iter().map(|e| (e.entry_id.as_str(), e.version)).collect()
}

#[test]
fn first_upsert_into_empty_log() {
    let next = engine().upsert_entry(&doc(5, &[]), &eid("1000")).unwrap();
    assert_eq!(next.version, 6);
    assert_eq!(summary(&next), [("1000", 6)]);
}

#[test]
fn repeated_upsert_replaces_in_place() {
    let next = engine().upsert_entry(&doc(6, &[("1000", 6)]), &eid("1000")).unwrap();
    assert_eq!(next.version, 7);
    assert_eq!(summary(&next), [("1000", 7)]);
}

#[test]
fn batch_replace_keeps_only_fresh_entry() {
    let before = doc(1, &[("1000", 1), ("1001", 1), ("1003", 1), ("2000", 1)]);
    let remove = [eid("1000"), eid("1001"), eid("1003"), eid("2000")];
    let append = vec![LogEntry::live(eid("1003"), 0, Timestamp::zero())];

    let next = engine().batch_replace_entries(&before, &remove, append).unwrap();
    assert_eq!(next.version, 2);
    assert_eq!(summary(&next), [("1003", 2)]);
    assert_eq!(next.logs[0].update_time, Timestamp::from_millis(42));
}

#[test]
fn stale_document_hides_log() {
    let view = engine().filtered_view(&doc(2, &[("e", 1), ("f", 5)]), &ViewQuery::since(3, 1));
    assert!(view.logs.is_empty());
}

#[test]
fn oversized_recent_history_hides_log() {
    let view = engine().filtered_view(
        &doc(10, &[("e", 4), ("f", 5), ("g", 9)]),
        &ViewQuery::since(3, 1),
    );
    assert_eq!(view.log_len, 3);
    assert!(view.logs.is_empty());
}

#[test]
fn bounded_recent_history_is_returned() {
    let view = engine().filtered_view(&doc(10, &[("e", 4), ("f", 9)]), &ViewQuery::since(3, 5));
    let versions: Vec<u64> = view.logs.iter().map(|e| e.version).collect();
    assert_eq!(versions, [4, 9]);
}
