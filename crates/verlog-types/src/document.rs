use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::{DocumentId, EntryId};
use crate::temporal::Timestamp;

/// Version of a document created outside the engine.
pub const INITIAL_VERSION: u64 = 0;

/// Version of a document bootstrapped by its first write.
pub const FIRST_VERSION: u64 = 1;

/// Default value of the document-level delete watermark.
pub const DEFAULT_DELETE_VERSION: u64 = 0;

/// One tagged record inside a document's log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "e_id")]
    pub entry_id: EntryId,
    /// Soft-delete marker.
    pub deleted: bool,
    /// Document version at the time this entry was last written.
    pub version: u64,
    pub update_time: Timestamp,
}

impl LogEntry {
    pub fn new(entry_id: EntryId, deleted: bool, version: u64, update_time: Timestamp) -> Self {
        Self {
            entry_id,
            deleted,
            version,
            update_time,
        }
    }

    /// A live (not deleted) entry.
    pub fn live(entry_id: EntryId, version: u64, update_time: Timestamp) -> Self {
        Self::new(entry_id, false, version, update_time)
    }
}

/// The aggregate root: a keyed, versioned, ordered log.
///
/// Invariants maintained by the engine:
/// - at most one entry per [`EntryId`] in `logs`;
/// - `version` grows by exactly one per mutating operation;
/// - every entry's `version` is `<=` the document's `version`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "d_id")]
    pub id: DocumentId,
    pub version: u64,
    /// Delete watermark: a reader whose known version is at or below this
    /// value has missed a reset and must resynchronize from scratch.
    #[serde(default)]
    pub deleted: u64,
    pub update_time: Timestamp,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl Document {
    /// An empty document at [`INITIAL_VERSION`], as created externally.
    pub fn new(id: DocumentId, update_time: Timestamp) -> Self {
        Self {
            id,
            version: INITIAL_VERSION,
            deleted: DEFAULT_DELETE_VERSION,
            update_time,
            logs: Vec::new(),
        }
    }

    /// Index of the first entry tagged `entry_id`.
    pub fn position(&self, entry_id: &str) -> Option<usize> {
        self.logs
            .iter()
            .position(|e| e.entry_id.as_str() == entry_id)
    }

    pub fn entry(&self, entry_id: &str) -> Option<&LogEntry> {
        self.position(entry_id).map(|i| &self.logs[i])
    }

    pub fn entry_ids(&self) -> impl Iterator<Item = &EntryId> {
        self.logs.iter().map(|e| &e.entry_id)
    }

    /// Returns `true` if no entry id appears twice in `logs`.
    pub fn has_unique_entry_ids(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.logs.len());
        self.logs.iter().all(|e| seen.insert(e.entry_id.as_str()))
    }

    /// Returns `true` if no entry claims a version newer than the document.
    pub fn entry_versions_bounded(&self) -> bool {
        self.logs.iter().all(|e| e.version <= self.version)
    }
}
