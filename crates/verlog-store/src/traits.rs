//! The [`DocumentStore`] trait defining the storage boundary.
//!
//! The engine never performs I/O. Callers load a snapshot through this
//! trait, hand it to the engine, and persist the result with
//! [`DocumentStore::compare_and_swap`] keyed on the version they read.

use verlog_types::{Document, DocumentId, Timestamp};

use crate::error::StoreResult;

/// External document store holding one record per [`DocumentId`].
///
/// All implementations must satisfy these invariants:
/// - Writes are atomic per document. There are no cross-document
///   transactions.
/// - `compare_and_swap` succeeds only if the stored version equals
///   `expected_version` at the instant of the swap.
/// - Reads never observe a partially written document.
pub trait DocumentStore: Send + Sync {
    /// Load a document snapshot.
    ///
    /// Returns `Ok(None)` if the document does not exist.
    fn load(&self, id: &DocumentId) -> StoreResult<Option<Document>>;

    /// Replace the document at `id` if its stored version is still
    /// `expected_version`.
    ///
    /// Fails with `VersionConflict` if another writer got there first and
    /// with `NotFound` if the document vanished.
    fn compare_and_swap(
        &self,
        id: &DocumentId,
        expected_version: u64,
        document: &Document,
    ) -> StoreResult<()>;

    /// Insert a new document. Fails with `AlreadyExists` if the id is taken.
    fn insert(&self, document: &Document) -> StoreResult<()>;

    /// Delete a document. Returns `true` if it existed.
    fn delete(&self, id: &DocumentId) -> StoreResult<bool>;

    /// Delete every document whose `update_time` is strictly before
    /// `deadline`. Returns the number of documents removed.
    fn delete_unchanged_before(&self, deadline: Timestamp) -> StoreResult<usize>;

    /// Check whether a document exists.
    ///
    /// Default implementation loads the document. Backends may override
    /// with a cheaper lookup.
    fn exists(&self, id: &DocumentId) -> StoreResult<bool> {
        Ok(self.load(id)?.is_some())
    }
}
