//! # verlog-sdk
//!
//! High-level API for versioned change logs.
//!
//! [`VersionLog`] ties a [`DocumentStore`] to the [`LogEngine`]: every write
//! is a load, a pure engine transformation, and a compare-and-swap keyed on
//! the version that was read. Conflicting writers reload and retry, so no
//! acknowledged update is lost.
//!
//! ```rust
//! use verlog_sdk::{DocumentId, EntryId, SdkConfig, VersionLog, ViewQuery};
//!
//! let log = VersionLog::in_memory(SdkConfig::default());
//! let owner = DocumentId::new("100").unwrap();
//!
//! log.incr_version(&owner, &[EntryId::new("1000").unwrap()], false).unwrap();
//! log.incr_version(&owner, &[EntryId::new("1001").unwrap()], false).unwrap();
//!
//! let view = log.find_change_log(&owner, &ViewQuery::since(1, 10)).unwrap();
//! assert_eq!(view.version, 2);
//! assert_eq!(view.logs.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod version_log;

pub use config::SdkConfig;
pub use error::{SdkError, SdkResult};
pub use version_log::VersionLog;

pub use verlog_engine::{ChangeLog, ChangeSet, LogEngine, Suppression, ViewQuery};
pub use verlog_store::{CollectionSchema, DocumentStore, InMemoryDocumentStore, StoreError};
pub use verlog_types::{
    Clock, Document, DocumentId, EntryId, LogEntry, ManualClock, SystemClock, Timestamp,
    DEFAULT_DELETE_VERSION, FIRST_VERSION, INITIAL_VERSION,
};
