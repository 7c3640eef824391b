use verlog_types::DocumentId;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested document was not found.
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// Conditional write rejected: the stored version moved on.
    #[error("version conflict on {id}: expected {expected}, found {actual}")]
    VersionConflict {
        id: DocumentId,
        expected: u64,
        actual: u64,
    },

    /// Insert rejected: a document with this id already exists.
    #[error("document already exists: {0}")]
    AlreadyExists(DocumentId),

    /// The replacement document carries a different id than the key it is
    /// written under.
    #[error("document id mismatch: keyed {keyed}, document carries {carried}")]
    IdMismatch {
        keyed: DocumentId,
        carried: DocumentId,
    },

    /// A stored record cannot be mapped back to a document.
    #[error("corrupt record in {collection}: {reason}")]
    Corrupt { collection: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A backend lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
