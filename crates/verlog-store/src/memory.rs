//! In-memory document store for tests and embedding.
//!
//! [`InMemoryDocumentStore`] keeps physical records (as produced by its
//! [`CollectionSchema`]) in a `HashMap` behind a `RwLock`. Compare-and-swap
//! holds the write lock across the version check and the swap, which gives
//! the per-document atomicity the engine relies on.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use verlog_types::{Document, DocumentId, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::schema::CollectionSchema;
use crate::traits::DocumentStore;

/// An in-memory implementation of [`DocumentStore`].
///
/// Data is lost when the store is dropped.
pub struct InMemoryDocumentStore {
    schema: CollectionSchema,
    records: RwLock<HashMap<DocumentId, Value>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store using the default collection schema.
    pub fn new() -> Self {
        Self::with_schema(CollectionSchema::default())
    }

    /// Create an empty store for a collection with the given field names.
    pub fn with_schema(schema: CollectionSchema) -> Self {
        Self {
            schema,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    /// The physical record stored for `id`, exactly as the collection
    /// would hold it.
    pub fn raw(&self, id: &DocumentId) -> StoreResult<Option<Value>> {
        Ok(self.read_lock()?.get(id).cloned())
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_lock()?.len())
    }

    /// Returns `true` if the store holds no documents.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_lock()?.is_empty())
    }

    /// Sorted list of every stored document id.
    pub fn ids(&self) -> StoreResult<Vec<DocumentId>> {
        let mut ids: Vec<DocumentId> = self.read_lock()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn read_lock(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<DocumentId, Value>>> {
        self.records.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_lock(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<DocumentId, Value>>> {
        self.records.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self, id: &DocumentId) -> StoreResult<Option<Document>> {
        let record = self.read_lock()?.get(id).cloned();
        record.map(|r| self.schema.decode(r)).transpose()
    }

    fn compare_and_swap(
        &self,
        id: &DocumentId,
        expected_version: u64,
        document: &Document,
    ) -> StoreResult<()> {
        if &document.id != id {
            return Err(StoreError::IdMismatch {
                keyed: id.clone(),
                carried: document.id.clone(),
            });
        }
        let encoded = self.schema.encode(document)?;

        let mut records = self.write_lock()?;
        let current = records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let actual = self.schema.decode(current)?.version;
        if actual != expected_version {
            return Err(StoreError::VersionConflict {
                id: id.clone(),
                expected: expected_version,
                actual,
            });
        }
        records.insert(id.clone(), encoded);
        Ok(())
    }

    fn insert(&self, document: &Document) -> StoreResult<()> {
        let encoded = self.schema.encode(document)?;
        let mut records = self.write_lock()?;
        if records.contains_key(&document.id) {
            return Err(StoreError::AlreadyExists(document.id.clone()));
        }
        records.insert(document.id.clone(), encoded);
        Ok(())
    }

    fn delete(&self, id: &DocumentId) -> StoreResult<bool> {
        Ok(self.write_lock()?.remove(id).is_some())
    }

    fn delete_unchanged_before(&self, deadline: Timestamp) -> StoreResult<usize> {
        let mut records = self.write_lock()?;
        let mut expired = Vec::new();
        for (id, record) in records.iter() {
            let document = self.schema.decode(record.clone())?;
            if document.update_time < deadline {
                expired.push(id.clone());
            }
        }
        for id in &expired {
            records.remove(id);
        }
        Ok(expired.len())
    }

    fn exists(&self, id: &DocumentId) -> StoreResult<bool> {
        Ok(self.read_lock()?.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.records.read().map(|r| r.len()).unwrap_or_default();
        f.debug_struct("InMemoryDocumentStore")
            .field("collection", &self.schema.name)
            .field("document_count", &count)
            .finish()
    }
}
