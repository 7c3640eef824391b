use serde::{Deserialize, Serialize};
use verlog_types::{EntryId, LogEntry, Timestamp};

/// Thresholds for [`LogEngine::filtered_view`](crate::LogEngine::filtered_view).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    /// The reader's known version. Only entries written after it are shown.
    pub min_version: u64,
    /// Upper bound on the number of visible entries. When more entries
    /// qualify, the whole view is suppressed instead of truncated. `None`
    /// disables the bound.
    pub max_allowed_len: Option<usize>,
}

impl ViewQuery {
    pub fn new(min_version: u64, max_allowed_len: Option<usize>) -> Self {
        Self {
            min_version,
            max_allowed_len,
        }
    }

    /// Entries newer than `min_version`, suppressed beyond `max_allowed_len`.
    pub fn since(min_version: u64, max_allowed_len: usize) -> Self {
        Self::new(min_version, Some(max_allowed_len))
    }
}

/// Why a [`ChangeLog`] came back empty even though the log may hold entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Suppression {
    /// The document is older than the reader's known version.
    Stale,
    /// The document's delete watermark is at or past the reader's version.
    Reset,
    /// More entries qualified than the reader allows.
    TooLarge { log_len: usize, max_allowed_len: usize },
}

/// Read-only projection of a document's log. The document id is stripped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    pub version: u64,
    pub deleted: u64,
    pub update_time: Timestamp,
    /// Number of entries that passed the version filter, before the size
    /// rule was applied.
    pub log_len: usize,
    pub logs: Vec<LogEntry>,
    pub suppressed: Option<Suppression>,
}

/// Visible entry ids split by their soft-delete marker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub changed: Vec<EntryId>,
    pub deleted: Vec<EntryId>,
}

impl ChangeLog {
    /// Returns `true` if an incremental read is impossible and the reader
    /// must fetch its data from scratch.
    pub fn requires_full_sync(&self) -> bool {
        self.suppressed.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Split the visible entries into changed and deleted ids, preserving
    /// log order within each group.
    pub fn partition(&self) -> ChangeSet {
        let mut set = ChangeSet::default();
        for entry in &self.logs {
            if entry.deleted {
                set.deleted.push(entry.entry_id.clone());
            } else {
                set.changed.push(entry.entry_id.clone());
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, deleted: bool, version: u64) -> LogEntry {
        LogEntry::new(EntryId::new(id).unwrap(), deleted, version, Timestamp::zero())
    }

    #[test]
    fn query_constructors() {
        assert_eq!(ViewQuery::since(3, 1), ViewQuery::new(3, Some(1)));
        assert_eq!(ViewQuery::new(0, None).max_allowed_len, None);
    }

    #[test]
    fn partition_by_deleted_marker() {
        let log = ChangeLog {
            version: 9,
            deleted: 0,
            update_time: Timestamp::zero(),
            log_len: 3,
            logs: vec![entry("a", false, 4), entry("b", true, 5), entry("c", false, 9)],
            suppressed: None,
        };
        let set = log.partition();
        assert_eq!(set.changed, vec![EntryId::new("a").unwrap(), EntryId::new("c").unwrap()]);
        assert_eq!(set.deleted, vec![EntryId::new("b").unwrap()]);
        assert!(!log.requires_full_sync());
    }

    #[test]
    fn suppression_serializes_with_reason_tag() {
        let json = serde_json::to_value(Suppression::TooLarge {
            log_len: 3,
            max_allowed_len: 1,
        })
        .unwrap();
        assert_eq!(json["reason"], "too_large");
        assert_eq!(json["log_len"], 3);
    }
}
