use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};
use verlog_types::{Clock, Document, EntryId, LogEntry, SystemClock, Timestamp};

use crate::error::{EngineError, EngineResult};
use crate::view::{ChangeLog, Suppression, ViewQuery};

/// Versioned mutations and filtered reads over one document snapshot.
///
/// The engine performs no I/O and keeps no state between calls beyond its
/// clock. Every write takes a full snapshot and returns a full replacement
/// snapshot whose `version` is exactly one higher; the caller persists it
/// with a conditional write keyed on the version it read. A document at
/// `u64::MAX` cannot be written again: writes fail with
/// [`EngineError::VersionOverflow`] instead of wrapping.
#[derive(Clone)]
pub struct LogEngine {
    clock: Arc<dyn Clock>,
}

impl LogEngine {
    /// An engine stamping writes with the system wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Current time according to the engine's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Write a live entry tagged `entry_id`.
    ///
    /// An existing entry with that tag is replaced at its current index; an
    /// unknown tag is appended. If the log already holds duplicates of the
    /// tag, only the first one is replaced.
    pub fn upsert_entry(
        &self,
        document: &Document,
        entry_id: &EntryId,
    ) -> EngineResult<Document> {
        self.write_entry(document, entry_id, false)
    }

    /// Write a soft-delete tombstone for `entry_id`, with the same placement
    /// rules as [`upsert_entry`](Self::upsert_entry).
    pub fn mark_deleted(
        &self,
        document: &Document,
        entry_id: &EntryId,
    ) -> EngineResult<Document> {
        self.write_entry(document, entry_id, true)
    }

    fn write_entry(
        &self,
        document: &Document,
        entry_id: &EntryId,
        deleted: bool,
    ) -> EngineResult<Document> {
        let version = next_version(document)?;
        let now = self.clock.now();
        let mut next = document.clone();
        next.version = version;
        next.update_time = now;

        let entry = LogEntry::new(entry_id.clone(), deleted, next.version, now);
        match next.position(entry_id.as_str()) {
            Some(index) => {
                next.logs[index] = entry;
                debug!(doc = %next.id, entry = %entry_id, index, version = next.version, deleted, "log entry replaced");
            }
            None => {
                next.logs.push(entry);
                debug!(doc = %next.id, entry = %entry_id, version = next.version, deleted, "log entry appended");
            }
        }
        Ok(next)
    }

    /// Drop every entry tagged in `remove`, then append `append` in order.
    ///
    /// Removal is a filter, so replaced entries lose their position and
    /// reappear at the tail. Tags of appended entries are removed as well so
    /// a tag never occurs twice; a tag repeated inside `append` keeps its
    /// first occurrence. Appended entries are stamped with the new document
    /// version and the operation time. Unknown tags in `remove` are ignored.
    pub fn batch_replace_entries(
        &self,
        document: &Document,
        remove: &[EntryId],
        append: Vec<LogEntry>,
    ) -> EngineResult<Document> {
        let version = next_version(document)?;
        let now = self.clock.now();

        let mut appended: Vec<LogEntry> = Vec::with_capacity(append.len());
        let mut appended_ids: HashSet<EntryId> = HashSet::with_capacity(append.len());
        for mut entry in append {
            if !appended_ids.insert(entry.entry_id.clone()) {
                warn!(doc = %document.id, entry = %entry.entry_id, "duplicate entry in batch dropped");
                continue;
            }
            entry.version = version;
            entry.update_time = now;
            appended.push(entry);
        }

        let removed: HashSet<&str> = remove.iter().map(EntryId::as_str).collect();
        let mut logs: Vec<LogEntry> = document
            .logs
            .iter()
            .filter(|e| {
                !removed.contains(e.entry_id.as_str()) && !appended_ids.contains(&e.entry_id)
            })
            .cloned()
            .collect();
        let dropped = document.logs.len() - logs.len();
        logs.extend(appended);

        debug!(
            doc = %document.id,
            version,
            dropped,
            appended = appended_ids.len(),
            "log batch replaced"
        );

        Ok(Document {
            id: document.id.clone(),
            version,
            deleted: document.deleted,
            update_time: now,
            logs,
        })
    }

    /// Project the entries a reader at `query.min_version` has not seen.
    ///
    /// The view fails closed: it is empty when the document is older than
    /// the reader, when its delete watermark has reached the reader's
    /// version, or when more entries qualify than `query.max_allowed_len`.
    pub fn filtered_view(&self, document: &Document, query: &ViewQuery) -> ChangeLog {
        let mut view = ChangeLog {
            version: document.version,
            deleted: document.deleted,
            update_time: document.update_time,
            log_len: 0,
            logs: Vec::new(),
            suppressed: None,
        };

        if document.version < query.min_version {
            view.suppressed = Some(Suppression::Stale);
        } else if document.deleted >= query.min_version {
            view.suppressed = Some(Suppression::Reset);
        }
        if view.suppressed.is_some() {
            debug!(doc = %document.id, min_version = query.min_version, suppressed = ?view.suppressed, "log view suppressed");
            return view;
        }

        let logs: Vec<LogEntry> = document
            .logs
            .iter()
            .filter(|e| e.version > query.min_version)
            .cloned()
            .collect();
        view.log_len = logs.len();

        match query.max_allowed_len {
            Some(max_allowed_len) if view.log_len > max_allowed_len => {
                view.suppressed = Some(Suppression::TooLarge {
                    log_len: view.log_len,
                    max_allowed_len,
                });
                debug!(doc = %document.id, log_len = view.log_len, max_allowed_len, "log view too large");
            }
            _ => view.logs = logs,
        }
        view
    }
}

fn next_version(document: &Document) -> EngineResult<u64> {
    document
        .version
        .checked_add(1)
        .ok_or_else(|| EngineError::VersionOverflow {
            id: document.id.clone(),
        })
}

impl Default for LogEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogEngine").finish_non_exhaustive()
    }
}
