//! Foundation types for verlog, the versioned embedded-log engine.
//!
//! Every other verlog crate depends on `verlog-types`. The model is small:
//! a [`Document`] owns a monotonically versioned, ordered log of
//! [`LogEntry`] records, each tagged by an [`EntryId`].
//!
//! # Key Types
//!
//! - [`DocumentId`] -- stable external identifier of a document
//! - [`EntryId`] -- tag of a log entry, unique within one document
//! - [`Timestamp`] -- wall-clock milliseconds since the UNIX epoch
//! - [`Clock`] -- source of "now" for mutating operations
//! - [`LogEntry`] / [`Document`] -- the aggregate and its embedded log

pub mod document;
pub mod error;
pub mod identity;
pub mod temporal;

pub use document::{
    Document, LogEntry, DEFAULT_DELETE_VERSION, FIRST_VERSION, INITIAL_VERSION,
};
pub use error::TypeError;
pub use identity::{DocumentId, EntryId};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
