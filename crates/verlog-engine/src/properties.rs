//! Property tests over random operation sequences.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::collection::vec;
use proptest::prelude::*;
use verlog_types::{Document, DocumentId, EntryId, LogEntry, ManualClock, Timestamp};

use crate::{LogEngine, ViewQuery};

#[derive(Clone, Debug)]
enum Op {
    Upsert(EntryId),
    Delete(EntryId),
    Batch(Vec<EntryId>, Vec<EntryId>),
}

fn entry_id() -> impl Strategy<Value = EntryId> {
    "[a-e][0-3]".prop_map(|s| EntryId::new(s).unwrap())
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        entry_id().prop_map(Op::Upsert),
        entry_id().prop_map(Op::Delete),
        (vec(entry_id(), 0..4), vec(entry_id(), 0..4)).prop_map(|(r, a)| Op::Batch(r, a)),
    ]
}

fn engine() -> LogEngine {
    LogEngine::with_clock(Arc::new(ManualClock::new(Timestamp::from_millis(1))))
}

fn apply(engine: &LogEngine, doc: &Document, op: &Op) -> Document {
    match op {
        Op::Upsert(id) => engine.upsert_entry(doc, id).unwrap(),
        Op::Delete(id) => engine.mark_deleted(doc, id).unwrap(),
        Op::Batch(remove, append) => {
            let append = append
                .iter()
                .map(|id| LogEntry::live(id.clone(), 0, Timestamp::zero()))
                .collect();
            engine.batch_replace_entries(doc, remove, append).unwrap()
        }
    }
}

/// A well-formed document reached by replaying `ops` from `start`.
fn document() -> impl Strategy<Value = Document> {
    (0u64..5, vec(op(), 0..12)).prop_map(|(start, ops)| {
        let engine = engine();
        let mut doc = Document::new(DocumentId::new("doc").unwrap(), Timestamp::zero());
        doc.version = start;
        for op in &ops {
            doc = apply(&engine, &doc, op);
        }
        doc
    })
}

proptest! {
    #[test]
    fn version_counts_mutations(start in 0u64..100, ops in vec(op(), 0..20)) {
        let engine = engine();
        let mut doc = Document::new(DocumentId::new("doc").unwrap(), Timestamp::zero());
        doc.version = start;
        for op in &ops {
            let next = apply(&engine, &doc, op);
            prop_assert_eq!(next.version, doc.version + 1);
            prop_assert!(next.has_unique_entry_ids());
            prop_assert!(next.entry_versions_bounded());
            doc = next;
        }
        prop_assert_eq!(doc.version, start + ops.len() as u64);
    }

    #[test]
    fn upsert_leaves_exactly_one_entry(doc in document(), id in entry_id()) {
        let next = engine().upsert_entry(&doc, &id).unwrap();
        let count = next.logs.iter().filter(|e| e.entry_id == id).count();
        prop_assert_eq!(count, 1);
        prop_assert_eq!(next.entry(id.as_str()).map(|e| e.version), Some(next.version));
    }

    #[test]
    fn upsert_of_existing_keeps_index(doc in document(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!doc.logs.is_empty());
        let id = doc.logs[pick.index(doc.logs.len())].entry_id.clone();
        let next = engine().upsert_entry(&doc, &id).unwrap();

        prop_assert_eq!(next.position(id.as_str()), doc.position(id.as_str()));
        prop_assert_eq!(next.logs.len(), doc.logs.len());
        for (before, after) in doc.logs.iter().zip(&next.logs) {
            if before.entry_id != id {
                prop_assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn batch_drops_removed_and_appends_in_order(
        doc in document(),
        remove in vec(entry_id(), 0..5),
        append in vec(entry_id(), 0..5),
    ) {
        let engine = engine();
        let next = apply(&engine, &doc, &Op::Batch(remove.clone(), append.clone()));

        let mut seen = HashSet::new();
        let expected_tail: Vec<&EntryId> = append.iter().filter(|id| seen.insert(*id)).collect();
        let tail_start = next.logs.len() - expected_tail.len();
        let tail: Vec<&EntryId> = next.logs[tail_start..].iter().map(|e| &e.entry_id).collect();
        prop_assert_eq!(tail, expected_tail);
        for entry in &next.logs[tail_start..] {
            prop_assert_eq!(entry.version, doc.version + 1);
        }

        for id in remove.iter().filter(|id| !append.contains(*id)) {
            prop_assert!(next.position(id.as_str()).is_none());
        }
    }

    #[test]
    fn view_is_deterministic(doc in document(), min in 0u64..20, max in 0usize..8) {
        let engine = engine();
        let query = ViewQuery::since(min, max);
        prop_assert_eq!(engine.filtered_view(&doc, &query), engine.filtered_view(&doc, &query));
    }

    #[test]
    fn view_fails_closed(doc in document(), min in 0u64..20, max in 0usize..8) {
        let view = engine().filtered_view(&doc, &ViewQuery::since(min, max));
        if doc.version < min {
            prop_assert!(view.logs.is_empty());
        }
        if view.log_len > max {
            prop_assert!(view.logs.is_empty());
        }
        prop_assert!(view.logs.len() <= max);
        prop_assert!(view.logs.iter().all(|e| e.version > min));
    }
}
