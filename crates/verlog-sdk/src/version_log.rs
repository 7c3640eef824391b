use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info, warn};
use verlog_engine::{ChangeLog, EngineResult, LogEngine, ViewQuery};
use verlog_store::{DocumentStore, InMemoryDocumentStore, StoreError};
use verlog_types::{
    Document, DocumentId, EntryId, LogEntry, Timestamp, DEFAULT_DELETE_VERSION, FIRST_VERSION,
};

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};

/// High-level versioned-log API over a [`DocumentStore`].
///
/// Every write is one read-modify-write cycle: load the snapshot, let the
/// [`LogEngine`] compute the replacement, then compare-and-swap it keyed on
/// the version read. A version conflict reloads and recomputes, up to
/// [`SdkConfig::max_conflict_retries`] extra times.
pub struct VersionLog<S> {
    store: S,
    engine: LogEngine,
    config: SdkConfig,
}

impl VersionLog<InMemoryDocumentStore> {
    /// A version log over an empty in-memory collection laid out per
    /// `config.collection`.
    pub fn in_memory(config: SdkConfig) -> Self {
        let store = InMemoryDocumentStore::with_schema(config.collection.clone());
        Self::with_config(store, config)
    }
}

impl<S: DocumentStore> VersionLog<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, SdkConfig::default())
    }

    pub fn with_config(store: S, config: SdkConfig) -> Self {
        Self::with_engine(store, LogEngine::new(), config)
    }

    pub fn with_engine(store: S, engine: LogEngine, config: SdkConfig) -> Self {
        Self {
            store,
            engine,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &LogEngine {
        &self.engine
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    // ---- Reads ----

    pub fn load(&self, id: &DocumentId) -> SdkResult<Document> {
        self.store
            .load(id)?
            .ok_or_else(|| SdkError::NotFound(id.clone()))
    }

    /// Filtered view of an existing document.
    pub fn find_change_log(&self, id: &DocumentId, query: &ViewQuery) -> SdkResult<ChangeLog> {
        let document = self.load(id)?;
        Ok(self.engine.filtered_view(&document, query))
    }

    /// Filtered view of a document, creating it empty at [`FIRST_VERSION`]
    /// if it does not exist yet.
    ///
    /// A freshly created document is still viewed through `query`, so a
    /// read at `min_version = 0` reports [`Suppression::Reset`]
    /// for it like for any other document: the reader has to fully sync.
    ///
    /// [`Suppression::Reset`]: verlog_engine::Suppression::Reset
    pub fn find_change_log_or_init(
        &self,
        id: &DocumentId,
        query: &ViewQuery,
    ) -> SdkResult<ChangeLog> {
        let document = match self.store.load(id)? {
            Some(document) => document,
            None => self.init_empty(id)?,
        };
        Ok(self.engine.filtered_view(&document, query))
    }

    /// Entries written after `min_version`, bounded by
    /// [`SdkConfig::default_max_log_len`].
    pub fn changes_since(&self, id: &DocumentId, min_version: u64) -> SdkResult<ChangeLog> {
        let query = ViewQuery::new(min_version, self.config.default_max_log_len);
        self.find_change_log_or_init(id, &query)
    }

    // ---- Writes ----

    /// Write a live entry, replacing an existing one in place.
    pub fn upsert_entry(&self, id: &DocumentId, entry_id: &EntryId) -> SdkResult<Document> {
        self.mutate(id, |document| self.engine.upsert_entry(document, entry_id))
    }

    /// Write a soft-delete tombstone, replacing an existing entry in place.
    pub fn mark_deleted(&self, id: &DocumentId, entry_id: &EntryId) -> SdkResult<Document> {
        self.mutate(id, |document| self.engine.mark_deleted(document, entry_id))
    }

    /// Remove the tagged entries and append `append` at the tail.
    pub fn batch_replace(
        &self,
        id: &DocumentId,
        remove: &[EntryId],
        append: Vec<LogEntry>,
    ) -> SdkResult<Document> {
        self.mutate(id, |document| {
            self.engine
                .batch_replace_entries(document, remove, append.clone())
        })
    }

    /// Record a change to every id in `entry_ids` under one version bump.
    ///
    /// The ids move to the tail of the log carrying the given `deleted`
    /// marker. A missing document is created at [`FIRST_VERSION`] holding
    /// just these entries. The batch must be non-empty and free of
    /// duplicates.
    pub fn incr_version(
        &self,
        id: &DocumentId,
        entry_ids: &[EntryId],
        deleted: bool,
    ) -> SdkResult<Document> {
        validate_batch(id, entry_ids)?;
        let fresh = || -> Vec<LogEntry> {
            entry_ids
                .iter()
                .map(|e| LogEntry::new(e.clone(), deleted, 0, Timestamp::zero()))
                .collect()
        };
        let update = |document: &Document| -> EngineResult<Document> {
            self.engine
                .batch_replace_entries(document, entry_ids, fresh())
        };

        match self.mutate(id, &update) {
            Err(SdkError::NotFound(_)) => {}
            other => return other,
        }

        let now = self.engine.now();
        let document = Document {
            id: id.clone(),
            version: FIRST_VERSION,
            deleted: DEFAULT_DELETE_VERSION,
            update_time: now,
            logs: entry_ids
                .iter()
                .map(|e| LogEntry::new(e.clone(), deleted, FIRST_VERSION, now))
                .collect(),
        };
        match self.store.insert(&document) {
            Ok(()) => {
                debug!(doc = %id, entries = entry_ids.len(), "document created by first write");
                Ok(document)
            }
            Err(StoreError::AlreadyExists(_)) => {
                debug!(doc = %id, "lost creation race, updating instead");
                self.mutate(id, &update)
            }
            Err(e) => Err(e.into()),
        }
    }

    // ---- Lifecycle ----

    pub fn delete(&self, id: &DocumentId) -> SdkResult<bool> {
        Ok(self.store.delete(id)?)
    }

    /// Delete every document not modified within `older_than`.
    pub fn prune_unchanged(&self, older_than: Duration) -> SdkResult<usize> {
        let deadline = self.engine.now().saturating_sub(older_than);
        let removed = self.store.delete_unchanged_before(deadline)?;
        info!(%deadline, removed, "pruned unchanged documents");
        Ok(removed)
    }

    fn init_empty(&self, id: &DocumentId) -> SdkResult<Document> {
        let mut document = Document::new(id.clone(), self.engine.now());
        document.version = FIRST_VERSION;
        match self.store.insert(&document) {
            Ok(()) => {
                debug!(doc = %id, "empty document initialized");
                Ok(document)
            }
            Err(StoreError::AlreadyExists(_)) => self.load(id),
            Err(e) => Err(e.into()),
        }
    }

    fn mutate<F>(&self, id: &DocumentId, apply: F) -> SdkResult<Document>
    where
        F: Fn(&Document) -> EngineResult<Document>,
    {
        let attempts = self.config.max_conflict_retries.saturating_add(1);
        for attempt in 1..=attempts {
            let current = self.load(id)?;
            let next = apply(&current)?;
            match self.store.compare_and_swap(id, current.version, &next) {
                Ok(()) => return Ok(next),
                Err(StoreError::VersionConflict {
                    expected, actual, ..
                }) => {
                    warn!(doc = %id, attempt, expected, actual, "version conflict, retrying");
                }
                Err(StoreError::NotFound(_)) => return Err(SdkError::NotFound(id.clone())),
                Err(e) => return Err(e.into()),
            }
        }
        Err(SdkError::RetriesExhausted {
            id: id.clone(),
            attempts,
        })
    }
}

fn validate_batch(id: &DocumentId, entry_ids: &[EntryId]) -> SdkResult<()> {
    if entry_ids.is_empty() {
        return Err(SdkError::InvalidArgument {
            id: id.clone(),
            reason: "entry id batch is empty".into(),
        });
    }
    let mut seen = HashSet::with_capacity(entry_ids.len());
    if let Some(dup) = entry_ids.iter().find(|e| !seen.insert(e.as_str())) {
        return Err(SdkError::InvalidArgument {
            id: id.clone(),
            reason: format!("entry id {dup} appears twice in batch"),
        });
    }
    Ok(())
}

impl<S> std::fmt::Debug for VersionLog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionLog")
            .field("collection", &self.config.collection.name)
            .field("max_conflict_retries", &self.config.max_conflict_retries)
            .finish_non_exhaustive()
    }
}
